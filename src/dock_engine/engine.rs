//! The docking context: per-frame `begin`/`end` protocol, the root dock
//! area, splitter interaction, tab bars, and garbage collection.

use tracing::{debug, trace, warn};

use crate::common::config::DockSettings;
use crate::common::geometry::{Point, Rect, Size};
use crate::dock_engine::drag::{DragInteraction, do_dock};
use crate::dock_engine::layout::{self, LayoutMetrics};
use crate::dock_engine::location;
use crate::host::{Host, Paint};
use crate::model::node::{DockStatus, Orientation, PanelFlags};
use crate::model::tree::{DockTree, NodeId};

#[derive(Clone, Copy)]
struct PressedTab {
    node: NodeId,
    at: Point,
}

/// Retained docking state spanning frames. The host drives it with one
/// `begin`/`end` pair per panel per frame plus a `root_dock` call for the
/// docked area.
pub struct DockContext {
    pub(crate) tree: DockTree,
    pub(crate) settings: DockSettings,
    pub(crate) drag_offset: Point,
    pressed_tab: Option<PressedTab>,
    active_splitter: Option<NodeId>,
    current: Option<NodeId>,
    /// Height of the chrome band above the current panel's content region.
    content_inset: f32,
    last_clean_frame: u64,
    last_splitter_frame: u64,
    is_begin_open: bool,
    first_root_call: bool,
    line_height: f32,
}

impl Default for DockContext {
    fn default() -> Self { Self::new(DockSettings::default()) }
}

impl DockContext {
    pub fn new(settings: DockSettings) -> Self {
        DockContext {
            tree: DockTree::new(),
            settings,
            drag_offset: Point::default(),
            pressed_tab: None,
            active_splitter: None,
            current: None,
            content_inset: 0.0,
            last_clean_frame: 0,
            last_splitter_frame: 0,
            is_begin_open: false,
            first_root_call: true,
            line_height: 0.0,
        }
    }

    /// Read access to the tree, for hosts that want to inspect or persist
    /// the layout.
    pub fn tree(&self) -> &DockTree { &self.tree }

    pub fn settings(&self) -> &DockSettings { &self.settings }

    pub(crate) fn metrics(&self) -> LayoutMetrics {
        LayoutMetrics { line_height: self.line_height, min_edge: self.settings.min_panel_edge }
    }

    /// Opens a panel for this frame. Returns whether the host should submit
    /// the panel's content; `end` must be called either way.
    ///
    /// `opened` is the host's visibility flag: `None` means the panel cannot
    /// be closed. On the panel's very first frame the stored state wins and
    /// is written back through the flag.
    pub fn begin(
        &mut self,
        host: &mut dyn Host,
        label: &str,
        mut opened: Option<&mut bool>,
        flags: PanelFlags,
        default_size: Size,
    ) -> bool {
        assert!(!self.is_begin_open, "begin('{label}') inside another begin/end pair");
        self.is_begin_open = true;
        self.line_height = host.text_line_height();

        let frame = host.frame_index();
        let want_open = opened.as_deref().is_none_or(|o| *o);
        let node = self.tree.get_or_create(label, want_open, default_size, host.display_size());

        // stamp before the sweep so a panel returning after an absence is
        // not collected out from under us
        let first_seen = self.tree.nodes[node].last_active_frame == 0;
        self.tree.nodes[node].last_active_frame = frame;
        if !first_seen && self.last_clean_frame != frame {
            self.clean_docks(frame);
        }

        if !self.tree.nodes[node].opened && want_open {
            self.try_dock_to_stored_location(host, node);
        }

        if self.tree.nodes[node].first_frame
            && let Some(o) = opened.as_deref_mut()
        {
            *o = self.tree.nodes[node].opened;
        }
        self.tree.nodes[node].first_frame = false;

        let want_open = opened.as_deref().is_none_or(|o| *o);
        if !want_open {
            if self.tree.nodes[node].status != DockStatus::Float {
                self.record_location(node);
                let metrics = self.metrics();
                self.tree.undock(node, metrics);
                self.tree.nodes[node].status = DockStatus::Float;
            }
            self.tree.nodes[node].opened = false;
            return false;
        }
        self.tree.nodes[node].opened = true;

        self.update_splitters(host, frame);
        self.current = Some(node);
        self.content_inset = 0.0;

        if self.tree.nodes[node].status == DockStatus::Dragged {
            DragInteraction::handle(self, host, node);
        }

        match self.tree.nodes[node].status {
            DockStatus::Dragged => true,
            DockStatus::Float => {
                if !flags.contains(PanelFlags::NO_TAB_BAR) {
                    let head = self.tree.first_tab(node);
                    let closable = opened.is_some() && !flags.contains(PanelFlags::NO_CLOSE_BUTTON);
                    self.content_inset = self.settings.tab_bar_lines * self.line_height;
                    if self.tab_bar(host, head, closable) {
                        self.tree.nodes[node].opened = false;
                        if let Some(o) = opened.as_deref_mut() {
                            *o = false;
                        }
                        return false;
                    }
                }
                true
            }
            DockStatus::Docked => {
                if !self.tree.nodes[node].active {
                    return false;
                }
                if flags.contains(PanelFlags::NO_TAB_BAR) {
                    return true;
                }
                let head = self.tree.first_tab(node);
                let closable = opened.is_some() && !flags.contains(PanelFlags::NO_CLOSE_BUTTON);
                self.content_inset = self.settings.tab_bar_lines * self.line_height;
                if self.tab_bar(host, head, closable) {
                    self.record_location(node);
                    self.tree.nodes[node].opened = false;
                    if let Some(o) = opened.as_deref_mut() {
                        *o = false;
                    }
                }
                true
            }
        }
    }

    pub fn end(&mut self) {
        assert!(self.is_begin_open, "end() without a matching begin()");
        self.current = None;
        self.is_begin_open = false;
    }

    /// Lays out the docked root over `pos`/`size` and prunes leaves that
    /// stopped calling `begin`. The prune is skipped on the very first call
    /// so a host can register its panels one frame late.
    pub fn root_dock(&mut self, host: &mut dyn Host, pos: Point, size: Size) {
        let Some(root) = self.tree.root_dock() else {
            return;
        };
        self.line_height = host.text_line_height();
        let metrics = self.metrics();
        let min = layout::min_size(&self.tree, root, metrics);
        layout::set_pos_size(&mut self.tree, root, pos, size.max(min), metrics);

        if !self.first_root_call {
            let frame = host.frame_index();
            let stale: Vec<NodeId> = self
                .tree
                .nodes
                .iter()
                .filter(|&(id, n)| {
                    n.is_leaf() && id != root && frame.saturating_sub(n.last_active_frame) > 1
                })
                .map(|(id, _)| id)
                .collect();
            for id in stale {
                self.record_location(id);
                self.tree.undock(id, metrics);
                debug!(label = %self.tree.nodes[id].label, "pruned stale dock");
                self.tree.remove(id);
            }
        }
        self.first_root_call = false;
    }

    /// Makes the panel inside the current `begin`/`end` pair the active tab
    /// of its group.
    pub fn set_dock_active(&mut self) {
        let node = self.current.expect("set_dock_active() outside begin/end");
        self.tree.set_active(node);
    }

    /// Top-left of the content region for the panel inside the current
    /// `begin`/`end` pair, below its tab bar when one was laid out.
    pub fn current_position(&self) -> Point {
        let node = self.current.expect("current_position() outside begin/end");
        let n = &self.tree.nodes[node];
        Point::new(n.pos.x, n.pos.y + self.content_inset)
    }

    pub fn current_size(&self) -> Size {
        let node = self.current.expect("current_size() outside begin/end");
        let n = &self.tree.nodes[node];
        Size::new(n.size.width, n.size.height - self.content_inset)
    }

    /// Once-per-frame sweep: abandoned floats are recorded and reclaimed,
    /// degenerate containers collapse, tab activation is reconciled.
    fn clean_docks(&mut self, frame: u64) {
        self.last_clean_frame = frame;
        let metrics = self.metrics();
        loop {
            let stale = self.tree.nodes.iter().find_map(|(id, n)| {
                (n.is_leaf()
                    && n.status == DockStatus::Float
                    && frame.saturating_sub(n.last_active_frame) > 1)
                    .then_some(id)
            });
            let Some(id) = stale else { break };
            self.record_location(id);
            self.tree.undock(id, metrics);
            debug!(label = %self.tree.nodes[id].label, "garbage-collected abandoned float");
            self.tree.remove(id);
        }
        self.tree.collapse_degenerate(metrics);
        self.tree.reconcile_tab_activation();
    }

    /// Stores the panel's current tree position so it can come back after
    /// being hidden. A failed encode clears the path; the panel will float
    /// on reopen instead.
    fn record_location(&mut self, node: NodeId) {
        if self.tree.nodes[node].status == DockStatus::Float {
            return;
        }
        match location::encode(&self.tree, node) {
            Ok(path) => self.tree.nodes[node].location = path,
            Err(err) => {
                warn!(%err, "location not recorded, panel will not restore to its slot");
                self.tree.nodes[node].location.clear();
            }
        }
    }

    /// Re-docks a reopening panel along its recorded path, best effort
    /// against whatever the tree looks like now.
    fn try_dock_to_stored_location(&mut self, host: &mut dyn Host, node: NodeId) {
        if self.tree.nodes[node].status == DockStatus::Docked {
            return;
        }
        if self.tree.nodes[node].location.is_empty() {
            return;
        }
        let Some(root) = self.tree.root_dock() else {
            return;
        };
        let path = self.tree.nodes[node].location.clone();
        let (dest, slot) = location::resolve(&self.tree, root, &path);
        let metrics = self.metrics();
        do_dock(&mut self.tree, node, Some(dest), slot, host.display_size(), metrics);
        trace!(label = %self.tree.nodes[node].label, ?slot, "restored dock to stored location");
    }

    /// Runs every splitter once per frame: hover, grab, clamped drag, and
    /// the handle's draw call.
    fn update_splitters(&mut self, host: &mut dyn Host, frame: u64) {
        if self.last_splitter_frame == frame {
            return;
        }
        self.last_splitter_frame = frame;

        let pointer = host.pointer_position();
        let delta = host.pointer_delta();
        let down = host.is_button_down();
        let pressed = host.is_button_pressed();
        let metrics = self.metrics();
        let thickness = self.settings.splitter_thickness;
        if !down {
            self.active_splitter = None;
        }

        let containers: Vec<NodeId> = self
            .tree
            .nodes
            .iter()
            .filter(|(_, n)| n.is_container())
            .map(|(id, _)| id)
            .collect();
        for container in containers {
            let (Some(c0), Some(c1)) =
                (self.tree.nodes[container].children[0], self.tree.nodes[container].children[1])
            else {
                continue;
            };

            let orientation = self.tree.nodes[container].orientation;
            let handle = match orientation {
                Orientation::Horizontal => Rect::new(
                    Point::new(
                        self.tree.nodes[c1].pos.x - thickness * 0.5,
                        self.tree.nodes[container].pos.y,
                    ),
                    Size::new(thickness, self.tree.nodes[container].size.height),
                ),
                Orientation::Vertical => Rect::new(
                    Point::new(
                        self.tree.nodes[container].pos.x,
                        self.tree.nodes[c1].pos.y - thickness * 0.5,
                    ),
                    Size::new(self.tree.nodes[container].size.width, thickness),
                ),
            };
            let hovered = handle.contains(pointer);
            if hovered && pressed {
                self.active_splitter = Some(container);
            }

            if self.active_splitter == Some(container) {
                let raw = match orientation {
                    Orientation::Horizontal => delta.x,
                    Orientation::Vertical => delta.y,
                };
                let clamped = layout::clamp_splitter_delta(&self.tree, container, raw, metrics);
                if clamped != 0.0 {
                    let r0 = self.tree.rect(c0);
                    let r1 = self.tree.rect(c1);
                    match orientation {
                        Orientation::Horizontal => {
                            layout::set_pos_size(
                                &mut self.tree,
                                c0,
                                r0.origin,
                                Size::new(r0.size.width + clamped, r0.size.height),
                                metrics,
                            );
                            layout::set_pos_size(
                                &mut self.tree,
                                c1,
                                Point::new(r1.origin.x + clamped, r1.origin.y),
                                Size::new(r1.size.width - clamped, r1.size.height),
                                metrics,
                            );
                        }
                        Orientation::Vertical => {
                            layout::set_pos_size(
                                &mut self.tree,
                                c0,
                                r0.origin,
                                Size::new(r0.size.width, r0.size.height + clamped),
                                metrics,
                            );
                            layout::set_pos_size(
                                &mut self.tree,
                                c1,
                                Point::new(r1.origin.x, r1.origin.y + clamped),
                                Size::new(r1.size.width, r1.size.height - clamped),
                                metrics,
                            );
                        }
                    }
                }
            }
            host.draw_rect(handle, Paint::Splitter { hovered });
        }
    }

    /// Lays out and services one tab bar. Click activates, a drag past the
    /// threshold tears the tab out, and the active tab's close button
    /// reports a close request back to `begin`.
    fn tab_bar(&mut self, host: &mut dyn Host, head: NodeId, closable: bool) -> bool {
        let rect = self.tree.rect(head);
        let line = self.line_height;
        let bar = Rect::new(
            rect.origin,
            Size::new(rect.size.width, self.settings.tab_bar_lines * line),
        );
        host.draw_rect(bar, Paint::TabBar);

        let pointer = host.pointer_position();
        let pressed = host.is_button_pressed();
        let down = host.is_button_down();
        let spacing = self.settings.tab_spacing;

        let mut x = rect.origin.x + spacing;
        let mut closed = false;
        let mut tab = Some(head);
        while let Some(t) = tab {
            let label = self.tree.nodes[t].label.clone();
            let text = host.text_size(&label);
            let tab_rect = Rect::new(Point::new(x, rect.origin.y), Size::new(text.width, line));
            let hovered = tab_rect.contains(pointer);
            host.draw_rect(tab_rect, Paint::Tab { active: self.tree.nodes[t].active, hovered });
            host.draw_text(tab_rect.origin, &label);

            if hovered && pressed {
                self.tree.set_active(t);
                self.pressed_tab = Some(PressedTab { node: t, at: pointer });
            }

            if down
                && let Some(p) = self.pressed_tab
                && p.node == t
                && (pointer - p.at).length() > self.settings.drag_threshold
            {
                self.pressed_tab = None;
                self.drag_offset = pointer - self.tree.nodes[t].pos;
                let metrics = self.metrics();
                self.tree.undock(t, metrics);
                self.tree.nodes[t].status = DockStatus::Dragged;
                trace!(label = %self.tree.nodes[t].label, "tab drag started");
            }

            x += text.width;
            if closable && self.tree.nodes[t].active {
                let close =
                    Rect::new(Point::new(x + 4.0, rect.origin.y), Size::new(line, line));
                let close_hovered = close.contains(pointer);
                host.draw_rect(close, Paint::CloseButton { hovered: close_hovered });
                if close_hovered && pressed {
                    closed = true;
                }
                x += line + 4.0;
            }
            x += spacing;

            // an undock above cleared the link, ending the walk
            tab = self.tree.nodes[t].next_tab;
        }

        if !down {
            self.pressed_tab = None;
        }
        closed
    }
}

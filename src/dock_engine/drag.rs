//! Drag-to-redock: per-frame servicing of a panel in `Dragged` state, and
//! the structural commit that splices it back into the tree.

use strum::IntoEnumIterator;
use tracing::trace;

use crate::common::geometry::{Point, Rect, Size};
use crate::dock_engine::engine::DockContext;
use crate::dock_engine::layout::{self, LayoutMetrics};
use crate::dock_engine::slots::{self, Slot};
use crate::host::{Host, Paint};
use crate::model::node::DockStatus;
use crate::model::tree::{DockTree, NodeId};

pub(crate) struct DragInteraction;

impl DragInteraction {
    /// One frame of drag servicing: follow the pointer, offer slots over the
    /// hovered panel or the display border, commit on release over a slot,
    /// float on release anywhere else.
    pub fn handle(ctx: &mut DockContext, host: &mut dyn Host, node: NodeId) {
        let pointer = host.pointer_position();
        {
            let n = &mut ctx.tree.nodes[node];
            n.pos = pointer - ctx.drag_offset;
        }

        if let Some(dest) = ctx.tree.dock_at(pointer) {
            let rect = ctx.tree.rect(dest);
            if Self::dock_slots(ctx, host, node, Some(dest), rect, false) {
                return;
            }
        }
        let area = Rect::new(Point::default(), host.display_size());
        if Self::dock_slots(ctx, host, node, None, area, true) {
            return;
        }

        let shadow = ctx.tree.rect(node);
        host.draw_rect(shadow, Paint::DragShadow);

        if !host.is_button_down() {
            let n = &mut ctx.tree.nodes[node];
            n.status = DockStatus::Float;
            n.location.clear();
            ctx.tree.set_active(node);
            trace!(label = %ctx.tree.nodes[node].label, "drag released clear of any slot, floating");
        }
    }

    /// Draws the slot cluster for `rect` and handles hover/commit. Returns
    /// true once the drag has been committed.
    fn dock_slots(
        ctx: &mut DockContext,
        host: &mut dyn Host,
        node: NodeId,
        dest: Option<NodeId>,
        rect: Rect,
        on_border: bool,
    ) -> bool {
        let pointer = host.pointer_position();
        for slot in Slot::iter() {
            let hot = if on_border {
                match slots::border_slot_rect(rect, slot, &ctx.settings) {
                    Some(r) => r,
                    None => continue,
                }
            } else {
                slots::slot_rect(rect, slot, &ctx.settings)
            };
            let hovered = hot.contains(pointer);
            host.draw_rect(hot, Paint::SlotBox { hovered });
            if !hovered {
                continue;
            }

            if !host.is_button_down() {
                let target = dest.or_else(|| ctx.tree.root_dock());
                let metrics = ctx.metrics();
                do_dock(&mut ctx.tree, node, target, slot, host.display_size(), metrics);
                trace!(label = %ctx.tree.nodes[node].label, ?slot, "drag committed");
                return true;
            }
            host.draw_rect(slots::docked_rect(rect, slot), Paint::DockPreview);
        }
        false
    }
}

/// Splices an unparented node into the tree at `slot` relative to `dest`.
///
/// With no destination the node becomes a fullscreen root. A tab slot appends
/// to the destination's group. Any other slot creates a split container in
/// the destination's place, holding the destination's group on one side and
/// the node on the other; `children[0]` is always the geometrically first
/// (left or top) side.
pub fn do_dock(
    tree: &mut DockTree,
    node: NodeId,
    dest: Option<NodeId>,
    slot: Slot,
    display: Size,
    metrics: LayoutMetrics,
) {
    assert!(
        tree.nodes[node].parent.is_none(),
        "dock '{}' is still parented",
        tree.nodes[node].label
    );

    match dest {
        None => {
            tree.nodes[node].status = DockStatus::Docked;
            layout::set_pos_size(tree, node, Point::default(), display, metrics);
        }
        Some(dest) if slot == Slot::Tab => {
            let last = tree.last_tab(dest);
            let (pos, size, parent) = {
                let d = &tree.nodes[last];
                (d.pos, d.size, d.parent)
            };
            tree.nodes[last].next_tab = Some(node);
            let n = &mut tree.nodes[node];
            n.prev_tab = Some(last);
            n.parent = parent;
            n.pos = pos;
            n.size = size;
            n.status = DockStatus::Docked;
        }
        Some(dest) => {
            let orientation = slot.split_orientation().expect("tab slot handled above");
            let container = tree.make_container(orientation);
            let dest_head = tree.first_tab(dest);
            let (dest_pos, dest_size, grandparent) = {
                let d = &tree.nodes[dest_head];
                (d.pos, d.size, d.parent)
            };
            {
                let c = &mut tree.nodes[container];
                c.children = [Some(dest_head), Some(node)];
                c.parent = grandparent;
                c.pos = dest_pos;
                c.size = dest_size;
            }
            if let Some(gp) = grandparent {
                let idx = if tree.nodes[gp].children[0] == Some(dest_head) { 0 } else { 1 };
                tree.nodes[gp].children[idx] = Some(container);
            }
            tree.set_parent_group(dest, Some(container));
            tree.nodes[node].parent = Some(container);
            tree.nodes[node].status = DockStatus::Docked;
            split_rects(tree, dest_head, node, slot, container, metrics);
        }
    }
    tree.set_active(node);
}

/// Hands each side of a fresh split its half of the container rectangle and
/// reorders the children so `children[0]` is the left/top side.
fn split_rects(
    tree: &mut DockTree,
    dest: NodeId,
    node: NodeId,
    slot: Slot,
    container: NodeId,
    metrics: LayoutMetrics,
) {
    {
        let n = &tree.nodes[node];
        assert!(
            n.prev_tab.is_none() && n.next_tab.is_none() && n.is_leaf(),
            "dock '{}' must be a lone leaf to open a split",
            n.label
        );
    }
    let (pos, size) = {
        let c = &tree.nodes[container];
        (c.pos, c.size)
    };
    let mut dest_pos = pos;
    let mut dest_size = size;
    let mut node_pos = pos;
    let mut node_size = size;
    match slot {
        Slot::Right => {
            dest_size.width *= 0.5;
            node_size.width *= 0.5;
            node_pos.x += dest_size.width;
        }
        Slot::Left => {
            dest_size.width *= 0.5;
            node_size.width *= 0.5;
            dest_pos.x += node_size.width;
        }
        Slot::Bottom => {
            dest_size.height *= 0.5;
            node_size.height *= 0.5;
            node_pos.y += dest_size.height;
        }
        Slot::Top => {
            dest_size.height *= 0.5;
            node_size.height *= 0.5;
            dest_pos.y += node_size.height;
        }
        Slot::Tab => unreachable!("tab slot does not split"),
    }
    {
        let n = &mut tree.nodes[node];
        n.pos = node_pos;
        n.size = node_size;
    }
    layout::set_pos_size(tree, dest, dest_pos, dest_size, metrics);

    let children = tree.nodes[container].children;
    let (c0, c1) = (children[0].expect("split container"), children[1].expect("split container"));
    let (p0, p1) = (tree.nodes[c0].pos, tree.nodes[c1].pos);
    if p1.x < p0.x || p1.y < p0.y {
        tree.nodes[container].children.swap(0, 1);
    }
}

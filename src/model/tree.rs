use slotmap::SlotMap;
use tracing::trace;

use crate::common::collections::HashMap;
use crate::common::geometry::{Point, Rect, Size};
use crate::dock_engine::layout::{self, LayoutMetrics};
use crate::model::node::{DockId, DockNode, DockStatus, Orientation};

slotmap::new_key_type! {
    pub struct NodeId;
}

/// Arena of dock nodes plus the label-hash registry index.
///
/// The arena owns every node; `parent`, `children`, and the tab links inside
/// `DockNode` are bare indices. Any removal goes through `undock`/`remove`
/// so back-references are severed before the slot is reclaimed.
#[derive(Default)]
pub struct DockTree {
    pub nodes: SlotMap<NodeId, DockNode>,
    index: HashMap<DockId, NodeId>,
}

impl DockTree {
    pub fn new() -> Self { Self::default() }

    /// Registry lookup-or-create. New panels start floating, active, sized to
    /// `default_size` with negative components replaced by the display size.
    pub fn get_or_create(
        &mut self,
        label: &str,
        want_open: bool,
        default_size: Size,
        display: Size,
    ) -> NodeId {
        let id = DockId::from_label(label);
        if let Some(&node) = self.index.get(&id) {
            debug_assert_eq!(
                self.nodes[node].label, label,
                "two labels hash to the same dock id"
            );
            return node;
        }

        let size = Size::new(
            if default_size.width < 0.0 { display.width } else { default_size.width },
            if default_size.height < 0.0 { display.height } else { default_size.height },
        );
        let node = self.nodes.insert(DockNode::leaf(id, label, want_open, size));
        self.index.insert(id, node);
        trace!(label, "created dock node");
        node
    }

    pub fn find(&self, label: &str) -> Option<NodeId> {
        self.index.get(&DockId::from_label(label)).copied()
    }

    pub fn make_container(&mut self, orientation: Orientation) -> NodeId {
        self.nodes.insert(DockNode::container(orientation))
    }

    /// Removes a node from the arena and the registry. The node must already
    /// be undocked (no parent, no tab links).
    pub fn remove(&mut self, node: NodeId) {
        let n = &self.nodes[node];
        assert!(
            n.parent.is_none() && n.prev_tab.is_none() && n.next_tab.is_none(),
            "removing dock '{}' while it is still linked into the tree",
            n.label
        );
        if let Some(id) = n.id {
            self.index.remove(&id);
        }
        self.nodes.remove(node);
    }

    pub fn rect(&self, node: NodeId) -> Rect {
        let n = &self.nodes[node];
        Rect::new(n.pos, n.size)
    }

    pub fn first_tab(&self, node: NodeId) -> NodeId {
        let mut t = node;
        while let Some(prev) = self.nodes[t].prev_tab {
            t = prev;
        }
        t
    }

    pub fn last_tab(&self, node: NodeId) -> NodeId {
        let mut t = node;
        while let Some(next) = self.nodes[t].next_tab {
            t = next;
        }
        t
    }

    pub fn tab_group(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut t = Some(self.first_tab(node));
        while let Some(id) = t {
            out.push(id);
            t = self.nodes[id].next_tab;
        }
        out
    }

    /// The other side of the node's parent container.
    pub fn sibling(&self, node: NodeId) -> NodeId {
        let parent = self.nodes[node]
            .parent
            .unwrap_or_else(|| panic!("dock '{}' has no parent", self.nodes[node].label));
        let head = self.first_tab(node);
        let children = &self.nodes[parent].children;
        let other = if children[0] == Some(head) { children[1] } else { children[0] };
        other.unwrap_or_else(|| {
            panic!("container holding dock '{}' has a single child", self.nodes[node].label)
        })
    }

    /// Marks `node` the active tab and deactivates the rest of its group.
    pub fn set_active(&mut self, node: NodeId) {
        self.nodes[node].active = true;
        let mut t = self.nodes[node].prev_tab;
        while let Some(id) = t {
            self.nodes[id].active = false;
            t = self.nodes[id].prev_tab;
        }
        let mut t = self.nodes[node].next_tab;
        while let Some(id) = t {
            self.nodes[id].active = false;
            t = self.nodes[id].next_tab;
        }
    }

    /// Assigns `parent` to `node` and every member of its tab group.
    pub fn set_parent_group(&mut self, node: NodeId, parent: Option<NodeId>) {
        self.nodes[node].parent = parent;
        let mut t = self.nodes[node].prev_tab;
        while let Some(id) = t {
            self.nodes[id].parent = parent;
            t = self.nodes[id].prev_tab;
        }
        let mut t = self.nodes[node].next_tab;
        while let Some(id) = t {
            self.nodes[id].parent = parent;
            t = self.nodes[id].next_tab;
        }
    }

    /// The single docked root, if any: a parentless node that is either
    /// docked or a container.
    pub fn root_dock(&self) -> Option<NodeId> {
        self.nodes.iter().find_map(|(id, n)| {
            (n.parent.is_none() && (n.status == DockStatus::Docked || n.is_container()))
                .then_some(id)
        })
    }

    /// The docked leaf under the pointer, if any.
    pub fn dock_at(&self, pointer: Point) -> Option<NodeId> {
        self.nodes.iter().find_map(|(id, n)| {
            (n.is_leaf() && n.status == DockStatus::Docked && self.rect(id).contains(pointer))
                .then_some(id)
        })
    }

    /// Detaches `node` from its container and tab group. If the container is
    /// left with one side empty it collapses: the surviving side is promoted
    /// into the container's slot (or becomes a new root) and the container is
    /// reclaimed.
    pub fn undock(&mut self, node: NodeId, metrics: LayoutMetrics) {
        if let Some(prev) = self.nodes[node].prev_tab {
            self.set_active(prev);
        } else if let Some(next) = self.nodes[node].next_tab {
            self.set_active(next);
        } else {
            self.nodes[node].active = false;
        }

        if let Some(container) = self.nodes[node].parent {
            let sibling = self.sibling(node);
            let next = self.nodes[node].next_tab;

            let c = &mut self.nodes[container];
            if c.children[0] == Some(node) {
                c.children[0] = next;
            } else if c.children[1] == Some(node) {
                c.children[1] = next;
            }

            let degenerate = c.children[0].is_none() || c.children[1].is_none();
            if degenerate {
                self.promote_survivor(container, sibling, metrics);
            }
        }

        let (prev, next) = {
            let n = &self.nodes[node];
            (n.prev_tab, n.next_tab)
        };
        if let Some(p) = prev {
            self.nodes[p].next_tab = next;
        }
        if let Some(nx) = next {
            self.nodes[nx].prev_tab = prev;
        }
        let n = &mut self.nodes[node];
        n.parent = None;
        n.prev_tab = None;
        n.next_tab = None;
    }

    /// Replaces `container` with `survivor` in the grandparent's slot (or as
    /// a new root), hands it the container's rectangle, and reclaims the
    /// container node.
    fn promote_survivor(&mut self, container: NodeId, survivor: NodeId, metrics: LayoutMetrics) {
        let (pos, size, grandparent) = {
            let c = &self.nodes[container];
            (c.pos, c.size, c.parent)
        };

        if let Some(gp) = grandparent {
            let idx = if self.nodes[gp].children[0] == Some(container) { 0 } else { 1 };
            self.nodes[gp].children[idx] = Some(survivor);
            self.set_parent_group(survivor, Some(gp));
        } else {
            self.set_parent_group(survivor, None);
        }
        layout::set_pos_size(self, survivor, pos, size, metrics);

        self.nodes.remove(container);
        trace!("collapsed degenerate container");
    }

    /// Collapses every container left with fewer than two children. Runs to
    /// a fixed point since a promotion can expose another degenerate level.
    pub fn collapse_degenerate(&mut self, metrics: LayoutMetrics) {
        loop {
            let found = self.nodes.iter().find_map(|(id, n)| {
                (n.is_container() && (n.children[0].is_none() || n.children[1].is_none()))
                    .then_some(id)
            });
            let Some(container) = found else { break };
            let survivor = self.nodes[container].children[0]
                .or(self.nodes[container].children[1])
                .expect("degenerate container with no surviving child");
            self.promote_survivor(container, survivor, metrics);
        }
    }

    /// Restores the one-active-member-per-group invariant after arbitrary
    /// mutation: extra actives are cleared front to back, an all-inactive
    /// group activates its head.
    pub fn reconcile_tab_activation(&mut self) {
        let heads: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.is_leaf() && n.prev_tab.is_none())
            .map(|(id, _)| id)
            .collect();
        for head in heads {
            let mut seen_active = false;
            let mut t = Some(head);
            while let Some(id) = t {
                if self.nodes[id].active {
                    if seen_active {
                        self.nodes[id].active = false;
                    } else {
                        seen_active = true;
                    }
                }
                t = self.nodes[id].next_tab;
            }
            if !seen_active {
                self.nodes[head].active = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn get_or_create_is_idempotent_per_label() {
        let mut tree = DockTree::new();
        let display = Size::new(1024.0, 768.0);
        let a = tree.get_or_create("scene", true, Size::new(300.0, 200.0), display);
        let again = tree.get_or_create("scene", true, Size::new(999.0, 999.0), display);
        assert_eq!(a, again);
        assert_eq!(tree.nodes[a].size, Size::new(300.0, 200.0));
    }

    #[test]
    fn negative_default_size_falls_back_to_display() {
        let mut tree = DockTree::new();
        let display = Size::new(1024.0, 768.0);
        let a = tree.get_or_create("log", true, Size::new(-1.0, 200.0), display);
        assert_eq!(tree.nodes[a].size, Size::new(1024.0, 200.0));
        assert_eq!(tree.nodes[a].status, DockStatus::Float);
        assert!(tree.nodes[a].active);
        assert!(tree.nodes[a].location.is_empty());
    }

    #[test]
    fn remove_drops_registry_entry() {
        let mut tree = DockTree::new();
        let display = Size::new(800.0, 600.0);
        let a = tree.get_or_create("tools", true, display, display);
        tree.remove(a);
        assert_eq!(tree.find("tools"), None);
    }

    #[test]
    fn reconcile_activates_exactly_one_member() {
        let mut tree = DockTree::new();
        let display = Size::new(800.0, 600.0);
        let a = tree.get_or_create("a", true, display, display);
        let b = tree.get_or_create("b", true, display, display);
        let c = tree.get_or_create("c", true, display, display);
        tree.nodes[a].next_tab = Some(b);
        tree.nodes[b].prev_tab = Some(a);
        tree.nodes[b].next_tab = Some(c);
        tree.nodes[c].prev_tab = Some(b);

        for id in [a, b, c] {
            tree.nodes[id].active = false;
        }
        tree.reconcile_tab_activation();
        assert!(tree.nodes[a].active);
        assert!(!tree.nodes[b].active && !tree.nodes[c].active);

        tree.nodes[b].active = true;
        tree.nodes[c].active = true;
        tree.reconcile_tab_activation();
        assert_eq!(
            [true, false, false],
            [tree.nodes[a].active, tree.nodes[b].active, tree.nodes[c].active]
        );
    }
}

//! Top-down rectangle propagation through the dock tree.
//!
//! A container re-derives its split ratio from the children's current sizes
//! every pass, so proportions survive window resizes without a stored ratio.
//! Minimum sizes are clamped recursively; the split position moves to satisfy
//! both children before recursing.

use crate::common::geometry::{Point, Size};
use crate::model::node::Orientation;
use crate::model::tree::{DockTree, NodeId};

/// Per-frame inputs the solver needs from the host and settings.
#[derive(Clone, Copy, Debug)]
pub struct LayoutMetrics {
    pub line_height: f32,
    pub min_edge: f32,
}

/// Smallest rectangle `node` can occupy: a fixed floor plus one text line for
/// leaves, the axis-wise combination of the children's minimums for
/// containers.
pub fn min_size(tree: &DockTree, node: NodeId, metrics: LayoutMetrics) -> Size {
    let n = &tree.nodes[node];
    let Some(c0) = n.children[0] else {
        return Size::new(metrics.min_edge, metrics.min_edge + metrics.line_height);
    };
    let s0 = min_size(tree, c0, metrics);
    let Some(c1) = n.children[1] else {
        return s0;
    };
    let s1 = min_size(tree, c1, metrics);
    match n.orientation {
        Orientation::Horizontal => {
            Size::new(s0.width + s1.width, s0.height.max(s1.height))
        }
        Orientation::Vertical => Size::new(s0.width.max(s1.width), s0.height + s1.height),
    }
}

/// Assigns `pos`/`size` to `node` and its whole tab group, then recursively
/// splits the rectangle between a container's children: each child keeps its
/// previous share of the split axis, clamped so neither drops below its
/// minimum.
pub fn set_pos_size(
    tree: &mut DockTree,
    node: NodeId,
    pos: Point,
    size: Size,
    metrics: LayoutMetrics,
) {
    {
        let n = &mut tree.nodes[node];
        n.pos = pos;
        n.size = size;
    }
    let mut t = tree.nodes[node].prev_tab;
    while let Some(id) = t {
        let n = &mut tree.nodes[id];
        n.pos = pos;
        n.size = size;
        t = n.prev_tab;
    }
    let mut t = tree.nodes[node].next_tab;
    while let Some(id) = t {
        let n = &mut tree.nodes[id];
        n.pos = pos;
        n.size = size;
        t = n.next_tab;
    }

    let (Some(c0), Some(c1)) = (tree.nodes[node].children[0], tree.nodes[node].children[1])
    else {
        return;
    };
    let orientation = tree.nodes[node].orientation;
    let min0 = min_size(tree, c0, metrics);
    let min1 = min_size(tree, c1, metrics);

    match orientation {
        Orientation::Horizontal => {
            let prev0 = tree.nodes[c0].size.width;
            let prev1 = tree.nodes[c1].size.width;
            let share = if prev0 + prev1 > 0.0 { prev0 / (prev0 + prev1) } else { 0.5 };
            let mut w0 = (size.width * share).floor();
            if w0 < min0.width {
                w0 = min0.width;
            } else if size.width - w0 < min1.width {
                w0 = size.width - min1.width;
            }
            set_pos_size(tree, c0, pos, Size::new(w0, size.height), metrics);
            let w0 = tree.nodes[c0].size.width;
            set_pos_size(
                tree,
                c1,
                Point::new(pos.x + w0, pos.y),
                Size::new(size.width - w0, size.height),
                metrics,
            );
        }
        Orientation::Vertical => {
            let prev0 = tree.nodes[c0].size.height;
            let prev1 = tree.nodes[c1].size.height;
            let share = if prev0 + prev1 > 0.0 { prev0 / (prev0 + prev1) } else { 0.5 };
            let mut h0 = (size.height * share).floor();
            if h0 < min0.height {
                h0 = min0.height;
            } else if size.height - h0 < min1.height {
                h0 = size.height - min1.height;
            }
            set_pos_size(tree, c0, pos, Size::new(size.width, h0), metrics);
            let h0 = tree.nodes[c0].size.height;
            set_pos_size(
                tree,
                c1,
                Point::new(pos.x, pos.y + h0),
                Size::new(size.width, size.height - h0),
                metrics,
            );
        }
    }
}

/// Clamps a splitter drag so neither child shrinks below its minimum along
/// the container's split axis.
pub fn clamp_splitter_delta(
    tree: &DockTree,
    container: NodeId,
    delta: f32,
    metrics: LayoutMetrics,
) -> f32 {
    let (Some(c0), Some(c1)) =
        (tree.nodes[container].children[0], tree.nodes[container].children[1])
    else {
        return 0.0;
    };
    let min0 = min_size(tree, c0, metrics);
    let min1 = min_size(tree, c1, metrics);
    match tree.nodes[container].orientation {
        Orientation::Horizontal => delta
            .max(-(tree.nodes[c0].size.width - min0.width))
            .min(tree.nodes[c1].size.width - min1.width),
        Orientation::Vertical => delta
            .max(-(tree.nodes[c0].size.height - min0.height))
            .min(tree.nodes[c1].size.height - min1.height),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::common::geometry::{Point, Size};
    use crate::model::node::Orientation;
    use crate::model::tree::DockTree;

    const METRICS: LayoutMetrics = LayoutMetrics { line_height: 16.0, min_edge: 16.0 };

    fn split_pair(
        orientation: Orientation,
        size0: Size,
        size1: Size,
    ) -> (DockTree, NodeId, NodeId, NodeId) {
        let mut tree = DockTree::new();
        let display = Size::new(1000.0, 1000.0);
        let a = tree.get_or_create("first", true, size0, display);
        let b = tree.get_or_create("second", true, size1, display);
        let c = tree.make_container(orientation);
        tree.nodes[c].children = [Some(a), Some(b)];
        tree.nodes[a].parent = Some(c);
        tree.nodes[b].parent = Some(c);
        (tree, c, a, b)
    }

    #[test]
    fn children_partition_the_container_exactly() {
        let (mut tree, c, a, b) = split_pair(
            Orientation::Horizontal,
            Size::new(300.0, 600.0),
            Size::new(100.0, 600.0),
        );
        set_pos_size(&mut tree, c, Point::new(0.0, 0.0), Size::new(600.0, 400.0), METRICS);

        let (ra, rb) = (tree.rect(a), tree.rect(b));
        assert_eq!(ra.size.width + rb.size.width, 600.0);
        assert_eq!(rb.origin.x, ra.origin.x + ra.size.width);
        // both children span the full perpendicular extent
        assert_eq!(ra.size.height, 400.0);
        assert_eq!(rb.size.height, 400.0);
        // 3:1 proportion preserved
        assert_eq!(ra.size.width, 450.0);
    }

    #[test]
    fn vertical_split_preserves_proportions() {
        let (mut tree, c, a, b) = split_pair(
            Orientation::Vertical,
            Size::new(800.0, 200.0),
            Size::new(800.0, 200.0),
        );
        set_pos_size(&mut tree, c, Point::new(0.0, 0.0), Size::new(800.0, 600.0), METRICS);
        assert_eq!(tree.rect(a).size, Size::new(800.0, 300.0));
        assert_eq!(tree.rect(b).origin, Point::new(0.0, 300.0));
        assert_eq!(tree.rect(b).size, Size::new(800.0, 300.0));
    }

    #[test]
    fn shrinking_clamps_to_child_minimum() {
        let (mut tree, c, a, b) = split_pair(
            Orientation::Horizontal,
            Size::new(20.0, 100.0),
            Size::new(380.0, 100.0),
        );
        set_pos_size(&mut tree, c, Point::new(0.0, 0.0), Size::new(100.0, 100.0), METRICS);

        // first child would get 5px proportionally; floor is min_edge
        assert_eq!(tree.rect(a).size.width, METRICS.min_edge);
        assert_eq!(tree.rect(b).size.width, 100.0 - METRICS.min_edge);
    }

    #[test]
    fn min_size_combines_axiswise() {
        let (tree, c, _, _) = split_pair(
            Orientation::Horizontal,
            Size::new(100.0, 100.0),
            Size::new(100.0, 100.0),
        );
        let leaf_min = Size::new(16.0, 32.0);
        assert_eq!(
            min_size(&tree, c, METRICS),
            Size::new(leaf_min.width * 2.0, leaf_min.height)
        );
    }

    #[test]
    fn splitter_delta_is_clamped_both_ways() {
        let (mut tree, c, _, _) = split_pair(
            Orientation::Horizontal,
            Size::new(100.0, 100.0),
            Size::new(100.0, 100.0),
        );
        set_pos_size(&mut tree, c, Point::new(0.0, 0.0), Size::new(200.0, 100.0), METRICS);
        assert_eq!(clamp_splitter_delta(&tree, c, 500.0, METRICS), 100.0 - 16.0);
        assert_eq!(clamp_splitter_delta(&tree, c, -500.0, METRICS), -(100.0 - 16.0));
        assert_eq!(clamp_splitter_delta(&tree, c, 10.0, METRICS), 10.0);
    }
}

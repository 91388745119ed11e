//! Location paths: a compact record of where a panel sat in the tree, kept
//! while the panel is hidden so reopening puts it back in (or near) its old
//! slot.
//!
//! One byte per tree level, nearest ancestor first. The byte says which half
//! of the parent the panel's group occupied, derived from the parent's split
//! axis and child order. Restoring walks the bytes in reverse from the root,
//! descending into whichever child matches each code until the path runs out
//! or the walk bottoms out on a leaf.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dock_engine::slots::Slot;
use crate::model::node::Orientation;
use crate::model::tree::{DockTree, NodeId};

/// Deepest nesting a location can record.
pub const MAX_LOCATION_DEPTH: usize = 16;

pub const CODE_RIGHT: u8 = b'0';
pub const CODE_LEFT: u8 = b'1';
pub const CODE_TOP: u8 = b'2';
pub const CODE_BOTTOM: u8 = b'3';

#[derive(Debug, Error)]
pub enum LocationError {
    #[error(
        "dock '{label}' sits {depth} levels deep; locations record at most {MAX_LOCATION_DEPTH}"
    )]
    DepthExceeded { label: String, depth: usize },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationPath(Vec<u8>);

impl LocationPath {
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn depth(&self) -> usize { self.0.len() }

    pub fn clear(&mut self) { self.0.clear(); }

    pub fn bytes(&self) -> &[u8] { &self.0 }
}

/// Which half of its parent the node's tab group occupies, as a path byte.
/// Parentless nodes report the default code.
pub fn location_code(tree: &DockTree, node: NodeId) -> u8 {
    let Some(parent) = tree.nodes[node].parent else {
        return CODE_RIGHT;
    };
    let head = tree.first_tab(node);
    let is_first = tree.nodes[parent].children[0] == Some(head);
    match tree.nodes[parent].orientation {
        Orientation::Horizontal => {
            if is_first { CODE_LEFT } else { CODE_RIGHT }
        }
        Orientation::Vertical => {
            if is_first { CODE_TOP } else { CODE_BOTTOM }
        }
    }
}

pub fn slot_from_code(code: u8) -> Slot {
    match code {
        CODE_LEFT => Slot::Left,
        CODE_TOP => Slot::Top,
        CODE_BOTTOM => Slot::Bottom,
        _ => Slot::Right,
    }
}

/// Records the node's root path, nearest ancestor first.
pub fn encode(tree: &DockTree, node: NodeId) -> Result<LocationPath, LocationError> {
    let mut depth = 0;
    let mut cur = node;
    while let Some(parent) = tree.nodes[cur].parent {
        depth += 1;
        cur = parent;
    }
    if depth > MAX_LOCATION_DEPTH {
        return Err(LocationError::DepthExceeded { label: tree.nodes[node].label.clone(), depth });
    }

    let mut bytes = Vec::with_capacity(depth);
    let mut cur = node;
    while tree.nodes[cur].parent.is_some() {
        bytes.push(location_code(tree, cur));
        cur = tree.nodes[cur].parent.unwrap();
    }
    Ok(LocationPath(bytes))
}

/// Walks `path` down from `root` through the current tree and names the node
/// and slot to dock at. A walk that bottoms out on a leaf with bytes left
/// splits that leaf by the next code; a path that runs out on a leaf tabs
/// onto it; a path that runs out inside a container splits the container by
/// the innermost matched code.
pub fn resolve(tree: &DockTree, root: NodeId, path: &LocationPath) -> (NodeId, Slot) {
    let mut dest = root;
    let mut matched = CODE_RIGHT;
    for &code in path.bytes().iter().rev() {
        matched = code;
        let n = &tree.nodes[dest];
        let (Some(c0), Some(c1)) = (n.children[0], n.children[1]) else {
            return (dest, slot_from_code(code));
        };
        dest = if location_code(tree, c0) == code { c0 } else { c1 };
    }
    if tree.nodes[dest].is_leaf() {
        (dest, Slot::Tab)
    } else {
        (dest, slot_from_code(matched))
    }
}

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use crate::common::geometry::{Point, Size};
use crate::dock_engine::location::LocationPath;
use crate::model::tree::NodeId;

/// Stable panel identifier hashed from the display label.
///
/// Two distinct labels hashing equal is an unchecked caller contract
/// violation; the registry debug-asserts it but does not recover.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DockId(pub u64);

impl DockId {
    pub fn from_label(label: &str) -> Self {
        let mut hasher = FxHasher::default();
        label.hash(&mut hasher);
        DockId(hasher.finish())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DockStatus {
    Docked,
    Float,
    Dragged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

bitflags::bitflags! {
    /// Per-panel chrome switches passed to `begin`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct PanelFlags: u32 {
        const NO_TAB_BAR = 1 << 0;
        const NO_CLOSE_BUTTON = 1 << 1;
    }
}

/// A node in the docking tree: either a user-visible leaf panel or an
/// internal split container with exactly two children.
///
/// Ownership lives in the arena; `parent` and the tab links are plain
/// indices. A node is a container iff `children[0]` is set, and containers
/// always hold both children (a one-child container is degenerate and only
/// exists transiently until the next collapse pass).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DockNode {
    /// Registry id. `None` for containers, which are never looked up by label.
    pub id: Option<DockId>,
    pub label: String,
    pub status: DockStatus,
    pub pos: Point,
    pub size: Size,
    pub parent: Option<NodeId>,
    pub children: [Option<NodeId>; 2],
    pub prev_tab: Option<NodeId>,
    pub next_tab: Option<NodeId>,
    /// Split axis, fixed when the container is created. Meaningless for
    /// leaves.
    pub orientation: Orientation,
    pub active: bool,
    pub opened: bool,
    pub first_frame: bool,
    pub last_active_frame: u64,
    pub location: LocationPath,
}

impl DockNode {
    pub fn leaf(id: DockId, label: &str, opened: bool, size: Size) -> Self {
        DockNode {
            id: Some(id),
            label: label.to_string(),
            status: DockStatus::Float,
            pos: Point::default(),
            size,
            parent: None,
            children: [None, None],
            prev_tab: None,
            next_tab: None,
            orientation: Orientation::Horizontal,
            active: true,
            opened,
            first_frame: true,
            last_active_frame: 0,
            location: LocationPath::default(),
        }
    }

    pub fn container(orientation: Orientation) -> Self {
        DockNode {
            id: None,
            label: String::new(),
            status: DockStatus::Docked,
            pos: Point::default(),
            size: Size::default(),
            parent: None,
            children: [None, None],
            prev_tab: None,
            next_tab: None,
            orientation,
            active: true,
            opened: false,
            first_frame: false,
            last_active_frame: 0,
            location: LocationPath::default(),
        }
    }

    pub fn is_container(&self) -> bool { self.children[0].is_some() || self.children[1].is_some() }

    pub fn is_leaf(&self) -> bool { !self.is_container() }
}

//! Docking topology engine for immediate-mode UIs.
//!
//! The host owns a [`DockContext`] and drives it with one `begin`/`end` pair
//! per panel per frame, plus a `root_dock` call for the docked area. The
//! engine maintains a binary-space-partition tree of panels with tab groups,
//! handles drag-to-redock, and remembers where hidden panels sat so they can
//! be restored. Input, text metrics, and drawing come in through the
//! [`Host`] trait.

pub mod common;
pub mod dock_engine;
pub mod host;
pub mod model;

pub use common::config::DockSettings;
pub use common::geometry::{Point, Rect, Size};
pub use dock_engine::{DockContext, LocationError, Slot};
pub use host::{Host, Paint};
pub use model::node::{DockId, DockStatus, Orientation, PanelFlags};
pub use model::tree::{DockTree, NodeId};

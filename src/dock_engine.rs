pub mod drag;
pub mod engine;
pub mod layout;
pub mod location;
pub mod slots;

pub use engine::DockContext;
pub use layout::LayoutMetrics;
pub use location::{LocationError, LocationPath, MAX_LOCATION_DEPTH};
pub use slots::Slot;

//! Drop slot geometry. Pure functions of a rectangle and the settings, so
//! the drag handler stays free of pixel math.

use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::common::config::DockSettings;
use crate::common::geometry::{Point, Rect};
use crate::model::node::Orientation;

/// Where a dragged panel lands relative to its destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Left,
    Right,
    Top,
    Bottom,
    Tab,
}

impl Slot {
    /// Split axis a dock at this slot creates. `None` for tabbing, which
    /// joins a group instead of splitting.
    pub fn split_orientation(self) -> Option<Orientation> {
        match self {
            Slot::Left | Slot::Right => Some(Orientation::Horizontal),
            Slot::Top | Slot::Bottom => Some(Orientation::Vertical),
            Slot::Tab => None,
        }
    }
}

/// Hot rectangle for `slot` in the cluster centered on `panel`. The tab box
/// sits on the center, the directional boxes are pushed out by the offset.
pub fn slot_rect(panel: Rect, slot: Slot, settings: &DockSettings) -> Rect {
    let c = panel.center();
    let e = settings.slot_box_extent;
    let near = settings.slot_box_offset;
    let far = near + 2.0 * e;
    match slot {
        Slot::Tab => {
            Rect::from_min_max(Point::new(c.x - e, c.y - e), Point::new(c.x + e, c.y + e))
        }
        Slot::Left => {
            Rect::from_min_max(Point::new(c.x - far, c.y - e), Point::new(c.x - near, c.y + e))
        }
        Slot::Right => {
            Rect::from_min_max(Point::new(c.x + near, c.y - e), Point::new(c.x + far, c.y + e))
        }
        Slot::Top => {
            Rect::from_min_max(Point::new(c.x - e, c.y - far), Point::new(c.x + e, c.y - near))
        }
        Slot::Bottom => {
            Rect::from_min_max(Point::new(c.x - e, c.y + near), Point::new(c.x + e, c.y + far))
        }
    }
}

/// Hot rectangle for `slot` hugging the matching edge of `area`, used when
/// the pointer is over no docked panel. There is no border tab slot.
pub fn border_slot_rect(area: Rect, slot: Slot, settings: &DockSettings) -> Option<Rect> {
    let c = area.center();
    let (min, max) = (area.min(), area.max());
    let e = settings.slot_box_extent;
    let i = settings.border_inset;
    let rect = match slot {
        Slot::Tab => return None,
        Slot::Left => Rect::from_min_max(
            Point::new(min.x + i, c.y - e),
            Point::new(min.x + i + e, c.y + e),
        ),
        Slot::Right => Rect::from_min_max(
            Point::new(max.x - i - e, c.y - e),
            Point::new(max.x - i, c.y + e),
        ),
        Slot::Top => Rect::from_min_max(
            Point::new(c.x - e, min.y + i),
            Point::new(c.x + e, min.y + i + e),
        ),
        Slot::Bottom => Rect::from_min_max(
            Point::new(c.x - e, max.y - i - e),
            Point::new(c.x + e, max.y - i),
        ),
    };
    Some(rect)
}

/// Rectangle the dragged panel would occupy after docking at `slot`: the
/// matching half of `panel`, or all of it for a tab.
pub fn docked_rect(panel: Rect, slot: Slot) -> Rect {
    let (min, max) = (panel.min(), panel.max());
    let half_w = panel.size.width * 0.5;
    let half_h = panel.size.height * 0.5;
    match slot {
        Slot::Tab => panel,
        Slot::Left => Rect::from_min_max(min, Point::new(min.x + half_w, max.y)),
        Slot::Right => Rect::from_min_max(Point::new(min.x + half_w, min.y), max),
        Slot::Top => Rect::from_min_max(min, Point::new(max.x, min.y + half_h)),
        Slot::Bottom => Rect::from_min_max(Point::new(min.x, min.y + half_h), max),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;
    use crate::common::geometry::Size;

    fn settings() -> DockSettings { DockSettings::default() }

    #[test]
    fn slot_cluster_sits_on_the_panel_center() {
        let panel = Rect::new(Point::new(100.0, 100.0), Size::new(200.0, 200.0));
        let s = settings();
        // center is (200, 200); extent 20, offset 30
        assert_eq!(
            slot_rect(panel, Slot::Tab, &s),
            Rect::from_min_max(Point::new(180.0, 180.0), Point::new(220.0, 220.0))
        );
        assert_eq!(
            slot_rect(panel, Slot::Right, &s),
            Rect::from_min_max(Point::new(230.0, 180.0), Point::new(270.0, 220.0))
        );
        assert_eq!(
            slot_rect(panel, Slot::Top, &s),
            Rect::from_min_max(Point::new(180.0, 130.0), Point::new(220.0, 170.0))
        );
    }

    #[test]
    fn slot_rects_do_not_overlap() {
        let panel = Rect::new(Point::default(), Size::new(400.0, 400.0));
        let s = settings();
        let rects: Vec<Rect> = Slot::iter().map(|slot| slot_rect(panel, slot, &s)).collect();
        for (i, a) in rects.iter().enumerate() {
            for b in rects.iter().skip(i + 1) {
                let disjoint = a.max().x <= b.min().x
                    || b.max().x <= a.min().x
                    || a.max().y <= b.min().y
                    || b.max().y <= a.min().y;
                assert!(disjoint, "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn border_slots_hug_the_display_edges() {
        let area = Rect::new(Point::default(), Size::new(800.0, 600.0));
        let s = settings();
        assert_eq!(border_slot_rect(area, Slot::Tab, &s), None);
        assert_eq!(
            border_slot_rect(area, Slot::Left, &s),
            Some(Rect::from_min_max(Point::new(10.0, 280.0), Point::new(30.0, 320.0)))
        );
        assert_eq!(
            border_slot_rect(area, Slot::Bottom, &s),
            Some(Rect::from_min_max(Point::new(380.0, 570.0), Point::new(420.0, 590.0)))
        );
    }

    #[test]
    fn docked_rect_halves_the_destination() {
        let panel = Rect::new(Point::new(100.0, 50.0), Size::new(400.0, 300.0));
        assert_eq!(
            docked_rect(panel, Slot::Left),
            Rect::new(Point::new(100.0, 50.0), Size::new(200.0, 300.0))
        );
        assert_eq!(
            docked_rect(panel, Slot::Bottom),
            Rect::new(Point::new(100.0, 200.0), Size::new(400.0, 150.0))
        );
        assert_eq!(docked_rect(panel, Slot::Tab), panel);
    }
}

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self { Point { x, y } }

    pub fn length(self) -> f32 { (self.x * self.x + self.y * self.y).sqrt() }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point { Point::new(self.x + rhs.x, self.y + rhs.y) }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point { Point::new(self.x - rhs.x, self.y - rhs.y) }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self { Size { width, height } }

    pub fn max(self, other: Size) -> Size {
        Size::new(self.width.max(other.width), self.height.max(other.height))
    }
}

/// Axis-aligned rectangle in screen space, y growing downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(origin: Point, size: Size) -> Self { Rect { origin, size } }

    pub fn from_min_max(min: Point, max: Point) -> Self {
        Rect::new(min, Size::new(max.x - min.x, max.y - min.y))
    }

    pub fn min(&self) -> Point { self.origin }

    pub fn max(&self) -> Point {
        Point::new(self.origin.x + self.size.width, self.origin.y + self.size.height)
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width * 0.5,
            self.origin.y + self.size.height * 0.5,
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        let max = self.max();
        p.x >= self.origin.x && p.y >= self.origin.y && p.x < max.x && p.y < max.y
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn from_min_max_round_trips() {
        let r = Rect::from_min_max(Point::new(10.0, 20.0), Point::new(30.0, 60.0));
        assert_eq!(r.size, Size::new(20.0, 40.0));
        assert_eq!(r.max(), Point::new(30.0, 60.0));
        assert_eq!(r.center(), Point::new(20.0, 40.0));
    }

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(r.contains(Point::new(9.9, 9.9)));
        assert!(!r.contains(Point::new(10.0, 5.0)));
        assert!(!r.contains(Point::new(-0.1, 5.0)));
    }
}

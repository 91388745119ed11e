//! Seam between the docking engine and the surrounding immediate-mode UI.
//!
//! The engine never touches raw input or issues real draw calls; the host
//! hands it a frame counter, pointer/button state, text metrics, and a place
//! to send overlay paint commands. Everything else (fonts, clipping, z-order)
//! stays on the host's side of the seam.

use crate::common::geometry::{Point, Rect, Size};

/// What an engine-issued rectangle means, so the host can style it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Paint {
    /// Slot hot-box shown while a panel is being dragged.
    SlotBox { hovered: bool },
    /// Translucent preview of where the dragged panel would land.
    DockPreview,
    /// The dragged panel's rectangle following the pointer.
    DragShadow,
    Splitter { hovered: bool },
    TabBar,
    Tab { active: bool, hovered: bool },
    CloseButton { hovered: bool },
}

pub trait Host {
    /// Monotonic frame counter; must advance between rendered frames.
    fn frame_index(&self) -> u64;
    fn display_size(&self) -> Size;
    fn pointer_position(&self) -> Point;
    /// Pointer movement since the previous frame.
    fn pointer_delta(&self) -> Point;
    fn is_button_down(&self) -> bool;
    /// True only on the frame the button went down.
    fn is_button_pressed(&self) -> bool;
    fn text_line_height(&self) -> f32;
    fn text_size(&self, text: &str) -> Size;
    fn draw_rect(&mut self, rect: Rect, paint: Paint);
    fn draw_text(&mut self, pos: Point, text: &str);
}

#[cfg(test)]
pub mod testing {
    use super::*;

    pub const LINE_HEIGHT: f32 = 16.0;

    /// Deterministic host: scripted pointer/button state, recorded draws,
    /// fixed-width text metrics.
    pub struct TestHost {
        pub frame: u64,
        pub display: Size,
        pub pointer: Point,
        pub delta: Point,
        pub button_down: bool,
        pub button_pressed: bool,
        pub draws: Vec<(Rect, Paint)>,
    }

    impl TestHost {
        pub fn new(display: Size) -> Self {
            TestHost {
                frame: 1,
                display,
                pointer: Point::default(),
                delta: Point::default(),
                button_down: false,
                button_pressed: false,
                draws: Vec::new(),
            }
        }

        pub fn next_frame(&mut self) {
            self.frame += 1;
            self.delta = Point::default();
            self.button_pressed = false;
            self.draws.clear();
        }

        pub fn move_pointer(&mut self, to: Point) {
            self.delta = to - self.pointer;
            self.pointer = to;
        }

        pub fn press(&mut self) {
            self.button_down = true;
            self.button_pressed = true;
        }

        pub fn release(&mut self) { self.button_down = false; }
    }

    impl Host for TestHost {
        fn frame_index(&self) -> u64 { self.frame }

        fn display_size(&self) -> Size { self.display }

        fn pointer_position(&self) -> Point { self.pointer }

        fn pointer_delta(&self) -> Point { self.delta }

        fn is_button_down(&self) -> bool { self.button_down }

        fn is_button_pressed(&self) -> bool { self.button_pressed }

        fn text_line_height(&self) -> f32 { LINE_HEIGHT }

        fn text_size(&self, text: &str) -> Size {
            Size::new(8.0 * text.chars().count() as f32, LINE_HEIGHT)
        }

        fn draw_rect(&mut self, rect: Rect, paint: Paint) { self.draws.push((rect, paint)); }

        fn draw_text(&mut self, _pos: Point, _text: &str) {}
    }
}

//! Rectangle describing the area covered by the panel
use embedded_graphics_core::geometry::{Point, Size};
use embedded_graphics_core::primitives::Rectangle;

/// A rectangle
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Rect {
    /// Origin X
    pub x: u32,
    /// Origin Y
    pub y: u32,
    /// Width
    pub w: u32,
    /// Height
    pub h: u32,
}

impl Rect {
    /// Construct a new rectangle
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Rect {
        Rect { x, y, w, h }
    }

    /// Test whether the rectangle is empty.
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Test whether the point lies inside the rectangle
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && y >= self.y && x - self.x < self.w && y - self.y < self.h
    }
}

impl From<Rect> for Rectangle {
    fn from(r: Rect) -> Rectangle {
        Rectangle::new(
            Point::new(r.x as i32, r.y as i32),
            Size::new(r.w, r.h),
        )
    }
}

#[test]
fn contains() {
    let r = Rect::new(10, 10, 5, 5);
    assert!(r.contains(10, 10));
    assert!(r.contains(14, 14));
    assert!(!r.contains(15, 14));
    assert!(!r.contains(9, 12));
    assert!(!Rect::new(0, 0, 0, 10).contains(0, 0));
}

#[test]
fn into_rectangle() {
    let r: Rectangle = Rect::new(0, 0, 800, 480).into();
    assert_eq!(r.top_left, Point::zero());
    assert_eq!(r.size, Size::new(800, 480));
}

#[test]
fn empty() {
    assert!(Rect::new(3, 3, 0, 1).is_empty());
    assert!(!Rect::new(0, 0, 1, 1).is_empty());
}

// Screen-space primitives shared by the desktop surface, drag controller and dialogs

use serde::{Deserialize, Serialize};

/// A point in CSS pixels, origin at the top-left of the viewport
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `other` to `self`
    pub fn delta_from(&self, other: Point) -> (f64, f64) {
        (self.x - other.x, self.y - other.y)
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Represents a spatial rectangle for positioning elements
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn from_size(size: Size) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: size.width,
            height: size.height,
        }
    }

    /// Origin that puts an element of `size` in the middle of this rectangle.
    /// Elements larger than the rectangle end up with a negative offset.
    pub fn centered_origin(&self, size: Size) -> Point {
        Point::new(
            self.x + (self.width - size.width) / 2.0,
            self.y + (self.height - size.height) / 2.0,
        )
    }

    /// Clamp an element origin so the element stays inside this rectangle.
    /// When the element is larger than the rectangle its top-left edge wins.
    pub fn clamp_origin(&self, origin: Point, size: Size) -> Point {
        let max_x = (self.x + self.width - size.width).max(self.x);
        let max_y = (self.y + self.height - size.height).max(self.y);
        Point::new(origin.x.clamp(self.x, max_x), origin.y.clamp(self.y, max_y))
    }
}

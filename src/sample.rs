//! Particle and bounding-box types shared by every stage of the tracker.

use serde::Deserialize;

/// Axis-aligned integer rectangle (top-left corner plus extent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn area(&self) -> i64 {
        i64::from(self.width.max(0)) * i64::from(self.height.max(0))
    }

    /// Area shared by both rectangles (0 when disjoint).
    pub fn intersection_area(&self, other: &Rect) -> i64 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w <= 0 || h <= 0 {
            0
        } else {
            i64::from(w) * i64::from(h)
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection_area(other) > 0
    }

    /// Whether the rectangle lies completely inside a `width` x `height` image.
    pub fn is_inside(&self, width: usize, height: usize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.width > 0
            && self.height > 0
            && self.right() as i64 <= width as i64
            && self.bottom() as i64 <= height as i64
    }
}

/// One particle: a square box hypothesis with velocity and importance weight.
///
/// `(x, y)` is the centre of the box, `size` its side length. The velocity
/// `(vx, vy, v_size)` is the displacement applied by the last transition, with
/// `v_size` being a multiplicative size change.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub x: i32,
    pub y: i32,
    pub size: i32,
    pub vx: i32,
    pub vy: i32,
    pub v_size: f64,
    pub weight: f64,
    pub is_target: bool,
}

impl Sample {
    /// Create a motionless sample with zero weight.
    pub fn new(x: i32, y: i32, size: i32) -> Self {
        Self {
            x,
            y,
            size,
            vx: 0,
            vy: 0,
            v_size: 1.0,
            weight: 0.0,
            is_target: false,
        }
    }

    /// Create a sample whose box equals the given rectangle (the larger side wins).
    pub fn from_rect(rect: &Rect) -> Self {
        let size = rect.width.max(rect.height);
        Self::new(rect.x + rect.width / 2, rect.y + rect.height / 2, size)
    }

    /// Bounding box of the sample.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x - self.size / 2, self.y - self.size / 2, self.size, self.size)
    }

    /// Reset the velocity to "no motion".
    pub fn clear_velocity(&mut self) {
        self.vx = 0;
        self.vy = 0;
        self.v_size = 1.0;
    }
}

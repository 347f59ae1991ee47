//! Axis-aligned rectangle and circle overlap tests
//!
//! Everything on the board is either the ball (a circle) or an axis-aligned
//! rectangle, so these three predicates are all the collision geometry needed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Top-middle point, where score popups start
    pub fn top_center(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x * 0.5, self.pos.y)
    }
}

/// Rectangle overlap test
///
/// Two rectangles only count as separate when there is a strictly positive
/// gap between them on some axis; shared edges overlap.
pub fn rectangles_overlap(a: &Rect, b: &Rect) -> bool {
    let a_max = a.max();
    let b_max = b.max();
    !(a_max.x < b.pos.x || b_max.x < a.pos.x || a_max.y < b.pos.y || b_max.y < a.pos.y)
}

/// Circle vs rectangle overlap
///
/// Clamps the center onto the rectangle to find the nearest point, then
/// compares squared distances (strict).
pub fn ball_overlaps_rectangle(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = center.clamp(rect.pos, rect.max());
    center.distance_squared(closest) < radius * radius
}

/// Food pickup test
///
/// Compares the ball's bounding box against the food rectangle using the
/// ball center snapped to whole pixels. Corners count, so this is a little
/// more generous than [`ball_overlaps_rectangle`].
pub fn ball_touches_food(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let c = center.round();
    let max = rect.max();
    c.x + radius > rect.pos.x
        && c.x - radius < max.x
        && c.y + radius > rect.pos.y
        && c.y - radius < max.y
}

/// Plane geometry shared by the live world and the save format
///
/// Everything in the play area is positioned with `f32` world coordinates.
/// The helpers here are pure functions with no knowledge of entities.
///
/// # Rust Learning Notes
///
/// - **Copy types**: `Point` is two floats, so it is passed by value everywhere
/// - **Operator-free math**: small named functions read better than trait impls here
use serde::{Deserialize, Serialize};

/// A position (or velocity) in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    /// Squared Euclidean distance to `other`.
    ///
    /// Used for nearest-point comparisons, where the square root would only
    /// cost time without changing the ordering.
    pub fn distance_sq(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: Point) -> f32 {
        self.distance_sq(other).sqrt()
    }

    /// Replaces NaN/infinite components with zero.
    pub fn finite_or_zero(self) -> Self {
        Point {
            x: if self.x.is_finite() { self.x } else { 0.0 },
            y: if self.y.is_finite() { self.y } else { 0.0 },
        }
    }

    /// Moves from `self` toward `target` by at most `max_step`.
    ///
    /// Returns the new position and whether the target was reached.
    pub fn step_toward(self, target: Point, max_step: f32) -> (Point, bool) {
        let dist = self.distance(target);
        if dist <= max_step || dist == 0.0 {
            return (target, true);
        }
        let t = max_step / dist;
        (
            Point::new(self.x + (target.x - self.x) * t, self.y + (target.y - self.y) * t),
            false,
        )
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Point { x, y }
    }
}

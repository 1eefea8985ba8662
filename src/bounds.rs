/// Play-area bounds validation
///
/// Any position that comes from outside the running simulation (a save file,
/// a default spawn point, a snapshot taken on another map) passes through
/// `PlayArea::clamp` before it is applied to a live object.
///
/// # Rust Learning Notes
///
/// - **Pure functions**: clamping has no side effects and no dependencies
/// - **Serde defaults**: the rectangle can be overridden from a config file
use crate::geometry::Point;
use serde::{Deserialize, Serialize};

// Game resolution constants
pub const GAME_WIDTH: f32 = 640.0;
pub const GAME_HEIGHT: f32 = 360.0;

/// The legal rectangle `[min_x, max_x] × [min_y, max_y]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl PlayArea {
    pub fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        PlayArea { min_x, max_x, min_y, max_y }
    }

    /// Clamps each axis independently into the rectangle.
    ///
    /// Non-finite components land on the lower bound so a NaN read from a
    /// corrupt file still yields a usable position.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let area = PlayArea::default();
    /// assert_eq!(area.clamp(Point::new(-5.0, 999.0)), Point::new(0.0, 360.0));
    /// ```
    pub fn clamp(&self, pos: Point) -> Point {
        Point {
            x: clamp_axis(pos.x, self.min_x, self.max_x),
            y: clamp_axis(pos.y, self.min_y, self.max_y),
        }
    }

    pub fn contains(&self, pos: Point) -> bool {
        pos.x >= self.min_x && pos.x <= self.max_x && pos.y >= self.min_y && pos.y <= self.max_y
    }
}

impl Default for PlayArea {
    fn default() -> Self {
        PlayArea::new(0.0, GAME_WIDTH, 0.0, GAME_HEIGHT)
    }
}

fn clamp_axis(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        return min;
    }
    // max() then min() instead of f32::clamp, which panics on min > max
    value.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_out_of_range() {
        let area = PlayArea::default();
        let clamped = area.clamp(Point::new(-5.0, 999.0));
        assert_eq!(clamped, Point::new(0.0, GAME_HEIGHT));
        assert!(area.contains(clamped));
    }

    #[test]
    fn test_clamp_inside_is_identity() {
        let area = PlayArea::default();
        let p = Point::new(120.5, 42.25);
        assert_eq!(area.clamp(p), p);
    }

    #[test]
    fn test_clamp_non_finite() {
        let area = PlayArea::new(10.0, 20.0, 10.0, 20.0);
        let clamped = area.clamp(Point::new(f32::NAN, f32::INFINITY));
        assert_eq!(clamped, Point::new(10.0, 20.0));
    }
}

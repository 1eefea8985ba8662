/// Enemy path waypoints and forward-progression resolution
///
/// Each map's path generator exposes an ordered list of canonical waypoints.
/// Enemies walk them front to back, always heading for `waypoints[target]`.
/// When an enemy is rebuilt from a save only its position survives, so the
/// target index has to be re-derived here.
use crate::geometry::Point;

/// Supplies the canonical waypoints of the active map.
///
/// An empty list means the path is not available (map not generated yet,
/// unknown map id) and callers must degrade gracefully.
pub trait PathProvider {
    fn canonical_waypoints(&self) -> Vec<Point>;
}

/// A path known up front, e.g. loaded from a level file.
#[derive(Debug, Clone, Default)]
pub struct FixedPath {
    waypoints: Vec<Point>,
}

impl FixedPath {
    pub fn new(waypoints: Vec<Point>) -> Self {
        FixedPath { waypoints }
    }

    /// A path with no waypoints.
    pub fn unavailable() -> Self {
        FixedPath::default()
    }
}

impl PathProvider for FixedPath {
    fn canonical_waypoints(&self) -> Vec<Point> {
        self.waypoints.clone()
    }
}

/// Picks the waypoint a restored enemy should head for.
///
/// Finds the nearest waypoint to `saved`, then looks one step ahead: if the
/// next waypoint is not farther away than the nearest one, the enemy has
/// already passed the nearest and targets the next. Otherwise it keeps the
/// nearest as its target.
///
/// This is a one-step lookahead, not a projection onto the path's arc
/// length. Paths that fold back on themselves with segments close together
/// can resolve to the wrong segment.
///
/// Returns 0 for an empty path.
///
/// # Example
///
/// ```ignore
/// let path = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(20.0, 0.0)];
/// assert_eq!(resolve_start_index(&path, Point::new(9.0, 0.0)), 1);
/// ```
pub fn resolve_start_index(waypoints: &[Point], saved: Point) -> usize {
    let mut nearest = 0;
    let mut nearest_dist = f32::INFINITY;

    for (i, waypoint) in waypoints.iter().enumerate() {
        let dist = waypoint.distance_sq(saved);
        // Strict < keeps the earliest waypoint on ties
        if dist < nearest_dist {
            nearest = i;
            nearest_dist = dist;
        }
    }

    if nearest + 1 < waypoints.len() && waypoints[nearest + 1].distance_sq(saved) <= nearest_dist {
        nearest + 1
    } else {
        nearest
    }
}

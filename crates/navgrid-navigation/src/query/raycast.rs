//! Grid line-of-sight tests.
//!
//! Rays walk the integer Bresenham line between two cell coordinates, visiting
//! one cell per step (a diagonal step moves on both axes at once). This is the
//! same traversal [`Query::find_straight_path`] relies on when it decides that
//! two waypoints see each other.

use super::Query;
use crate::map::Position;

impl Query<'_> {
    /// Casts a ray from `start` to `end` and returns the first blocked cell on it.
    ///
    /// With `hit_starting_cell` false the start cell is skipped even if blocked,
    /// so a ray can leave an obstacle. Returns `None` when the whole line up to
    /// and including `end` is passable.
    pub fn ray_test(&self, start: Position, end: Position, hit_starting_cell: bool) -> Option<Position> {
        let (mut x, mut y) = (i64::from(start.x), i64::from(start.y));
        let (end_x, end_y) = (i64::from(end.x), i64::from(end.y));
        let dx = (end_x - x).abs();
        let dy = (end_y - y).abs();
        let step_x = if x < end_x { 1 } else { -1 };
        let step_y = if y < end_y { 1 } else { -1 };
        let mut err = (if dx > dy { dx } else { -dy }) / 2;

        loop {
            if !self.grid.contains(x, y) {
                return None;
            }
            let cell = Position::new(x as u32, y as u32);
            if !self.is_passable(cell) && (hit_starting_cell || cell != start) {
                return Some(cell);
            }
            if cell == end {
                return None;
            }

            let e = err;
            if e > -dx {
                err -= dy;
                x += step_x;
            }
            if e < dy {
                err += dx;
                y += step_y;
            }
        }
    }
}

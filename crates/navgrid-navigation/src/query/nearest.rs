//! Ring searches for the nearest usable cell.
//!
//! Ring `d` is the square of cells at Chebyshev distance `d` from the origin.
//! It is walked with a zig-zag offset `o = 0, +1, -1, +2, -2, ..., +d` and, for
//! each offset, the four sides in a fixed order:
//!
//! ```text
//! top    (x + o, y - d)
//! right  (x + d, y + o)
//! bottom (x - o, y + d)
//! left   (x - d, y - o)
//! ```
//!
//! so every cell of the ring is visited exactly once, axis-aligned cells first.

use super::Query;
use crate::map::Position;

/// Offsets for ring `d`: `0, +1, -1, +2, -2, ..., +d`.
fn ring_offsets(d: i64) -> impl Iterator<Item = i64> {
    (0..2 * d).map(|i| if i % 2 == 1 { (i + 1) / 2 } else { -(i / 2) })
}

/// Cells of ring `d` at offset `o`, in side order top, right, bottom, left.
fn ring_cells(x: i64, y: i64, d: i64, o: i64) -> [(i64, i64); 4] {
    [(x + o, y - d), (x + d, y + o), (x - o, y + d), (x - d, y - o)]
}

impl Query<'_> {
    /// Rings beyond this contain no grid cells.
    fn ring_limit(&self, max_distance: u32) -> i64 {
        i64::from(max_distance.min(self.grid.width().max(self.grid.height())))
    }

    /// Finds the passable cell closest to `from` within `max_distance` rings.
    ///
    /// `from` itself is returned when it is passable. Ties within a ring are
    /// broken by the ring walk order.
    pub fn find_nearest(&self, from: Position, max_distance: u32) -> Option<Position> {
        if self.is_passable(from) {
            return Some(from);
        }
        let (x, y) = (i64::from(from.x), i64::from(from.y));
        for d in 1..=self.ring_limit(max_distance) {
            for o in ring_offsets(d) {
                for (cx, cy) in ring_cells(x, y, d, o) {
                    if self.passable_at(cx, cy) {
                        return Some(Position::new(cx as u32, cy as u32));
                    }
                }
            }
        }
        None
    }

    /// Finds a cell near `from` that is connected to `connected_to`.
    ///
    /// Walks the same rings as [`Query::find_nearest`]. Among connected
    /// candidates the one with the smallest Manhattan distance to
    /// `connected_to` wins; the search stops at the next non-negative offset
    /// after a candidate is found, so the `+o`/`-o` pair of cells is weighed
    /// together. Requires connectivity; returns `None` when it is disabled or
    /// `connected_to` is blocked.
    pub fn find_nearest_connected(&self, from: Position, max_distance: u32, connected_to: Position) -> Option<Position> {
        let target = self.connectivity_id(connected_to);
        if target == 0 {
            return None;
        }
        if self.connectivity_id(from) == target {
            return Some(from);
        }

        let (x, y) = (i64::from(from.x), i64::from(from.y));
        let mut best: Option<(Position, u32)> = None;
        for d in 1..=self.ring_limit(max_distance) {
            for o in ring_offsets(d) {
                if o >= 0 {
                    if let Some((found, _)) = best {
                        return Some(found);
                    }
                }
                for (cx, cy) in ring_cells(x, y, d, o) {
                    if !self.grid.contains(cx, cy) {
                        continue;
                    }
                    let candidate = Position::new(cx as u32, cy as u32);
                    if self.connectivity_id(candidate) != target {
                        continue;
                    }
                    let distance = candidate.manhattan_distance(connected_to);
                    if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                        best = Some((candidate, distance));
                    }
                }
            }
        }
        best.map(|(found, _)| found)
    }
}

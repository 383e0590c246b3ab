//! String pulling for grid paths.
//!
//! A full cell path is reduced in two passes: interior cells of straight runs
//! (same step direction in and out) are dropped, then a greedy line-of-sight
//! pass keeps a corner only when the previous kept waypoint cannot see past it.

use tracing::debug;

use super::{Query, QueryState};
use crate::map::Position;

fn step(from: Position, to: Position) -> (i64, i64) {
    (
        i64::from(to.x) - i64::from(from.x),
        i64::from(to.y) - i64::from(from.y),
    )
}

/// Drops waypoints whose incoming and outgoing steps are equal.
fn prune_collinear(waypoints: &mut Vec<Position>, scratch: &mut Vec<Position>) {
    if waypoints.len() <= 2 {
        return;
    }
    scratch.clear();
    scratch.push(waypoints[0]);
    for window in waypoints.windows(3) {
        if step(window[0], window[1]) != step(window[1], window[2]) {
            scratch.push(window[1]);
        }
    }
    scratch.push(waypoints[waypoints.len() - 1]);
    std::mem::swap(waypoints, scratch);
}

impl Query<'_> {
    /// Drops waypoints the previous kept waypoint can see past.
    ///
    /// Consecutive input waypoints must already see each other; every
    /// consecutive pair of the output then does too.
    fn prune_visible(&self, waypoints: &mut Vec<Position>, scratch: &mut Vec<Position>) {
        if waypoints.len() <= 2 {
            return;
        }
        scratch.clear();
        scratch.push(waypoints[0]);
        let mut anchor = waypoints[0];
        let mut current = waypoints[1];
        for &next in &waypoints[2..] {
            if self.ray_test(anchor, next, true).is_some() {
                scratch.push(current);
                anchor = current;
            }
            current = next;
        }
        scratch.push(current);
        std::mem::swap(waypoints, scratch);
    }

    /// Finds a path like [`Query::find_path`] and keeps only the waypoints needed
    /// to preserve line of sight between consecutive ones.
    ///
    /// The result never has more waypoints than the full path, and
    /// [`Query::ray_test`] reports no hit between any two consecutive waypoints.
    pub fn find_straight_path(&self, state: &mut QueryState, start: Position, end: Position) -> bool {
        if !self.find_path(state, start, end) {
            return false;
        }
        let full = state.waypoints.len();
        prune_collinear(&mut state.waypoints, &mut state.pruned);
        self.prune_visible(&mut state.waypoints, &mut state.pruned);
        debug!(%start, %end, full, straight = state.waypoints.len(), "Straightened path");
        true
    }
}

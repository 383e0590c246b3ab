//! Read-only spatial queries over a [`Grid`].
//!
//! A [`Query`] borrows one grid and answers passability, reachability, path,
//! nearest-cell and line-of-sight questions about it. Movement is 8-connected:
//! a diagonal step is allowed only if at least one of the two orthogonal cells
//! it passes between is passable, so paths never squeeze between two blocked
//! corners. Connectivity labels, path search and nearest-connected search all
//! share that rule.
//!
//! Every query that produces a path writes into a caller-owned [`QueryState`];
//! the query itself is immutable and may be shared across threads.

#![warn(missing_docs)]

mod connectivity;
mod nearest;
mod raycast;
mod smoothing;
mod state;

pub use state::QueryState;

use tracing::debug;

use crate::astar::{DIAGONAL_COST, STRAIGHT_COST, SearchSpace, astar_search, octile_distance};
use crate::map::{Grid, Position};

/// Default blocker mask: any nonzero cell blocks.
pub const DEFAULT_BLOCKER_MASK: u8 = 0xFF;
/// Default force-passable mask: no cell is forced open.
pub const DEFAULT_FORCE_PASSABLE_MASK: u8 = 0;

bitflags::bitflags! {
    /// Construction options for a [`Query`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct QueryConfig: u16 {
        /// Skip connectivity labeling. Every connectivity check then reports
        /// "not connected" and path searches run without the early rejection.
        const DISABLE_CONNECTIVITY = 1 << 0;
    }
}

/// Neighbour offsets: orthogonal first (N, E, S, W), then diagonal (NE, SE, SW, NW).
const DIRECTIONS: [(i64, i64); 8] = [(0, -1), (1, 0), (0, 1), (-1, 0), (1, -1), (1, 1), (-1, 1), (-1, -1)];

/// Spatial queries bound to one grid.
#[derive(Debug, Clone)]
pub struct Query<'a> {
    grid: &'a Grid,
    config: QueryConfig,
    blocker_mask: u8,
    force_passable_mask: u8,
    /// Component label per cell, 0 for impassable cells; `None` when disabled
    components: Option<Vec<u32>>,
}

impl<'a> Query<'a> {
    /// Binds a query to `grid`.
    ///
    /// # Arguments
    /// * `grid` - The grid to query; it cannot be mutated while the query lives
    /// * `config` - Construction flags
    /// * `blocker_mask` - A cell blocks when `value & blocker_mask != 0`
    /// * `force_passable_mask` - A cell with `value & force_passable_mask != 0` is passable
    ///   regardless of `blocker_mask`
    pub fn new(grid: &'a Grid, config: QueryConfig, blocker_mask: u8, force_passable_mask: u8) -> Self {
        let mut query = Query {
            grid,
            config,
            blocker_mask,
            force_passable_mask,
            components: None,
        };
        if !config.contains(QueryConfig::DISABLE_CONNECTIVITY) {
            query.components = Some(connectivity::label_components(&query));
        }
        query
    }

    /// Binds a query with connectivity enabled, where exactly the zero-valued cells are passable.
    pub fn with_defaults(grid: &'a Grid) -> Self {
        Self::new(grid, QueryConfig::empty(), DEFAULT_BLOCKER_MASK, DEFAULT_FORCE_PASSABLE_MASK)
    }

    /// The grid this query reads.
    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    /// The flags the query was built with.
    pub fn config(&self) -> QueryConfig {
        self.config
    }

    /// Whether a cell value is traversable under this query's masks.
    pub fn is_value_passable(&self, value: u8) -> bool {
        value & self.force_passable_mask != 0 || value & self.blocker_mask == 0
    }

    /// Whether the cell at `pos` is traversable.
    pub fn is_passable(&self, pos: Position) -> bool {
        self.is_value_passable(self.grid.cell(pos.x, pos.y))
    }

    /// Bounds-checked passability for signed coordinates; outside the grid is blocked.
    pub(crate) fn passable_at(&self, x: i64, y: i64) -> bool {
        self.grid.contains(x, y) && self.is_passable(Position::new(x as u32, y as u32))
    }

    /// Calls `visit(neighbor, step_cost)` for every legal single step from `pos`.
    pub(crate) fn for_each_step<F: FnMut(Position, u32)>(&self, pos: Position, mut visit: F) {
        let (x, y) = (i64::from(pos.x), i64::from(pos.y));
        for (dx, dy) in DIRECTIONS {
            let (nx, ny) = (x + dx, y + dy);
            if !self.passable_at(nx, ny) {
                continue;
            }
            let cost = if dx != 0 && dy != 0 {
                if !self.passable_at(x + dx, y) && !self.passable_at(x, y + dy) {
                    continue;
                }
                DIAGONAL_COST
            } else {
                STRAIGHT_COST
            };
            visit(Position::new(nx as u32, ny as u32), cost);
        }
    }

    /// Finds a shortest path and writes every traversed cell, `start` and `end`
    /// inclusive, to `state.waypoints`.
    ///
    /// Fails if either endpoint is blocked or no path exists. When `start == end`
    /// on a passable cell the result is the two waypoints `[start, end]`.
    pub fn find_path(&self, state: &mut QueryState, start: Position, end: Position) -> bool {
        state.waypoints.clear();
        if !self.is_passable(start) || !self.is_passable(end) {
            debug!(%start, %end, "Path endpoint is blocked");
            return false;
        }
        if self.has_connectivity() && !self.is_connected(start, end) {
            debug!(%start, %end, "Path endpoints are not connected");
            return false;
        }
        if start == end {
            state.waypoints.extend([start, end]);
            return true;
        }

        let found = astar_search(
            self,
            &mut state.search,
            self.grid.index(start),
            self.grid.index(end),
            &mut state.node_path,
        );
        if !found {
            debug!(%start, %end, explored = state.nodes_explored(), "No path found");
            return false;
        }

        let grid = self.grid;
        state.waypoints.extend(state.node_path.iter().map(|&index| grid.position(index)));
        debug!(
            %start,
            %end,
            waypoints = state.waypoints.len(),
            explored = state.nodes_explored(),
            "Path found"
        );
        true
    }

    /// Like [`Query::find_straight_path`], but first substitutes unusable endpoints.
    ///
    /// If the direct query fails, the start is replaced by the nearest passable
    /// cell within `max_start_distance` rings and the end by the nearest cell
    /// within `max_end_distance` rings that is connected to the new start, then
    /// the query is retried. The substitution needs connectivity; without it
    /// only the direct attempt is made.
    pub fn robust_find_straight_path(
        &self,
        state: &mut QueryState,
        start: Position,
        end: Position,
        max_start_distance: u32,
        max_end_distance: u32,
    ) -> bool {
        if self.find_straight_path(state, start, end) {
            return true;
        }
        if !self.has_connectivity() {
            return false;
        }

        let Some(new_start) = self.find_nearest(start, max_start_distance) else {
            debug!(%start, max_start_distance, "No passable start within range");
            return false;
        };
        let Some(new_end) = self.find_nearest_connected(end, max_end_distance, new_start) else {
            debug!(%end, %new_start, max_end_distance, "No connected end within range");
            return false;
        };
        debug!(%start, %new_start, %end, %new_end, "Retrying with substituted endpoints");
        self.find_straight_path(state, new_start, new_end)
    }
}

impl SearchSpace for Query<'_> {
    fn node_count(&self) -> usize {
        self.grid.cells().len()
    }

    fn heuristic(&self, node: usize, goal: usize) -> u32 {
        let a = self.grid.position(node);
        let b = self.grid.position(goal);
        octile_distance(a.x.abs_diff(b.x), a.y.abs_diff(b.y))
    }

    fn for_each_neighbor<F: FnMut(usize, u32)>(&self, node: usize, mut visit: F) {
        self.for_each_step(self.grid.position(node), |pos, cost| visit(self.grid.index(pos), cost));
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::map::{Grid, Position};

    /// Builds a grid from rows of cell values, row 0 first.
    pub fn grid_from_rows(rows: &[&[u8]]) -> Grid {
        let mut grid = Grid::new(rows[0].len() as u32, rows.len() as u32).unwrap();
        for (y, row) in rows.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                grid.set_cell(x as u32, y as u32, value);
            }
        }
        grid
    }

    pub fn pos(x: u32, y: u32) -> Position {
        Position::new(x, y)
    }

    pub fn path(points: &[(u32, u32)]) -> Vec<Position> {
        points.iter().map(|&p| Position::from(p)).collect()
    }

    /// 8x4 grid with a connected upper region and a disconnected lower-left pocket.
    pub fn path_grid() -> Grid {
        grid_from_rows(&[
            &[1, 0, 1, 1, 0, 1, 0, 0],
            &[0, 0, 0, 0, 0, 0, 0, 0],
            &[1, 0, 1, 1, 1, 0, 1, 0],
            &[1, 0, 0, 0, 0, 1, 0, 1],
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_passability_masks() {
        let grid = grid_from_rows(&[&[0, 1, 2, 3, 0x80]]);

        let default = Query::with_defaults(&grid);
        let passable: Vec<bool> = (0..5).map(|x| default.is_passable(pos(x, 0))).collect();
        assert_eq!(passable, vec![true, false, false, false, false]);

        // Only bit 0 blocks.
        let bit0 = Query::new(&grid, QueryConfig::empty(), 1, 0);
        let passable: Vec<bool> = (0..5).map(|x| bit0.is_passable(pos(x, 0))).collect();
        assert_eq!(passable, vec![true, false, true, false, true]);

        // Bit 1 forces cells open even when they also carry a blocking bit.
        let forced = Query::new(&grid, QueryConfig::empty(), 0xFF, 2);
        let passable: Vec<bool> = (0..5).map(|x| forced.is_passable(pos(x, 0))).collect();
        assert_eq!(passable, vec![true, false, true, true, false]);
    }

    #[test]
    fn test_find_path_basic() {
        let grid = path_grid();
        let query = Query::new(&grid, QueryConfig::empty(), 1, 0);
        let mut state = QueryState::new();

        let cases: [((u32, u32), (u32, u32), &[(u32, u32)]); 6] = [
            ((1, 0), (1, 0), &[(1, 0), (1, 0)]),
            ((1, 0), (3, 1), &[(1, 0), (2, 1), (3, 1)]),
            ((1, 0), (7, 1), &[(1, 0), (2, 1), (3, 1), (4, 1), (5, 1), (6, 1), (7, 1)]),
            ((4, 3), (5, 2), &[(4, 3), (3, 3), (2, 3), (1, 2), (2, 1), (3, 1), (4, 1), (5, 2)]),
            ((5, 2), (3, 3), &[(5, 2), (4, 1), (3, 1), (2, 1), (1, 2), (2, 3), (3, 3)]),
            ((1, 0), (7, 2), &[(1, 0), (2, 1), (3, 1), (4, 1), (5, 1), (6, 1), (7, 2)]),
        ];
        for (start, end, expected) in cases {
            assert!(query.find_path(&mut state, start.into(), end.into()), "{start:?} -> {end:?}");
            assert_eq!(state.waypoints, path(expected), "{start:?} -> {end:?}");
        }

        // Two equally short routes exist here.
        assert!(query.find_path(&mut state, pos(6, 0), pos(7, 2)));
        assert_eq!(state.waypoints.len(), 3);
        assert_eq!(state.waypoints[0], pos(6, 0));
        assert_eq!(state.waypoints[2], pos(7, 2));

        assert!(!query.find_path(&mut state, pos(1, 0), pos(0, 3)));
        assert!(!query.find_path(&mut state, pos(1, 0), pos(6, 3)));
    }

    #[test]
    fn test_find_path_without_connectivity() {
        let grid = path_grid();
        let query = Query::new(&grid, QueryConfig::DISABLE_CONNECTIVITY, 1, 0);
        let mut state = QueryState::new();

        assert!(!query.has_connectivity());
        assert!(query.find_path(&mut state, pos(4, 3), pos(5, 2)));
        assert_eq!(state.waypoints.len(), 8);
        assert!(!query.find_path(&mut state, pos(1, 0), pos(6, 3)));
        assert!(state.nodes_explored() > 0);
    }

    #[test]
    fn test_find_path_blocked_endpoints() {
        let grid = path_grid();
        let query = Query::with_defaults(&grid);
        let mut state = QueryState::new();

        assert!(!query.find_path(&mut state, pos(0, 0), pos(1, 1)));
        assert!(!query.find_path(&mut state, pos(1, 1), pos(0, 0)));
        assert!(!query.find_path(&mut state, pos(0, 0), pos(0, 0)));
        assert!(state.waypoints.is_empty());
    }

    #[test]
    fn test_no_corner_cutting() {
        // (0,0) and (1,1) touch only diagonally between two blocked cells.
        let grid = grid_from_rows(&[&[0, 1], &[1, 0]]);
        let query = Query::with_defaults(&grid);
        let mut state = QueryState::new();
        assert!(!query.is_connected(pos(0, 0), pos(1, 1)));
        assert!(!query.find_path(&mut state, pos(0, 0), pos(1, 1)));

        let unlabeled = Query::new(&grid, QueryConfig::DISABLE_CONNECTIVITY, 0xFF, 0);
        assert!(!unlabeled.find_path(&mut state, pos(0, 0), pos(1, 1)));

        // One open corner is enough.
        let grid = grid_from_rows(&[&[0, 0], &[1, 0]]);
        let query = Query::with_defaults(&grid);
        assert!(query.find_path(&mut state, pos(0, 0), pos(1, 1)));
        assert_eq!(state.waypoints, path(&[(0, 0), (1, 1)]));
    }

    #[test]
    fn test_robust_find_straight_path() {
        let grid = path_grid();
        let query = Query::new(&grid, QueryConfig::empty(), 1, 0);
        let mut state = QueryState::new();

        let direct: [((u32, u32), (u32, u32), &[(u32, u32)]); 3] = [
            ((1, 0), (1, 0), &[(1, 0), (1, 0)]),
            ((1, 0), (7, 1), &[(1, 0), (2, 1), (7, 1)]),
            ((4, 3), (5, 2), &[(4, 3), (2, 3), (1, 2), (2, 1), (4, 1), (5, 2)]),
        ];
        for (start, end, expected) in direct {
            assert!(query.robust_find_straight_path(&mut state, start.into(), end.into(), 0, 0));
            assert_eq!(state.waypoints, path(expected));
        }

        // Blocked start, substituted within one ring.
        assert!(query.robust_find_straight_path(&mut state, pos(0, 0), pos(7, 2), 1, 0));
        assert_eq!(state.waypoints, path(&[(1, 0), (2, 1), (6, 1), (7, 2)]));
        assert!(!query.robust_find_straight_path(&mut state, pos(0, 0), pos(7, 2), 0, 0));

        // Blocked end, substituted with a cell connected to the start.
        assert!(query.robust_find_straight_path(&mut state, pos(1, 0), pos(0, 3), 0, 1));
        assert_eq!(state.waypoints, path(&[(1, 0), (1, 3)]));

        // Passable but disconnected end.
        assert!(query.robust_find_straight_path(&mut state, pos(0, 1), pos(6, 2), 0, 1));
        assert_eq!(state.waypoints, path(&[(0, 1), (6, 1)]));

        assert!(!query.robust_find_straight_path(&mut state, pos(1, 0), pos(0, 3), 0, 0));
        assert!(!query.robust_find_straight_path(&mut state, pos(1, 0), pos(6, 3), 0, 0));

        let unlabeled = Query::new(&grid, QueryConfig::DISABLE_CONNECTIVITY, 1, 0);
        assert!(!unlabeled.robust_find_straight_path(&mut state, pos(0, 0), pos(7, 2), 1, 0));
    }

    #[test]
    fn test_query_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Query<'static>>();
        assert_send_sync::<QueryState>();
    }
}

use crate::astar::SearchScratch;
use crate::map::Position;

/// Caller-owned result and scratch buffer for [`super::Query`] operations.
///
/// Keep one per caller and reuse it: the search working set is kept between
/// calls, so repeated queries against grids of the same size do not allocate.
/// `waypoints` is overwritten by every path query; after a failed query its
/// contents are unspecified.
#[derive(Debug, Default, Clone)]
pub struct QueryState {
    /// Path produced by the last successful path query, start first.
    pub waypoints: Vec<Position>,
    pub(crate) search: SearchScratch,
    pub(crate) node_path: Vec<usize>,
    pub(crate) pruned: Vec<Position>,
}

impl QueryState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cells expanded by the most recent path search.
    pub fn nodes_explored(&self) -> usize {
        self.search.nodes_explored()
    }
}

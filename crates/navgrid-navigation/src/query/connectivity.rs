use std::collections::VecDeque;

use tracing::debug;

use super::Query;
use crate::map::Position;

/// Flood-fills the passable cells of the query's grid into components.
///
/// Labels start at 1 in row-major order of each component's first cell;
/// impassable cells keep label 0.
pub(super) fn label_components(query: &Query<'_>) -> Vec<u32> {
    let grid = query.grid();
    let mut labels = vec![0u32; grid.cells().len()];
    let mut frontier = VecDeque::new();
    let mut next_label = 1;

    for index in 0..labels.len() {
        if labels[index] != 0 {
            continue;
        }
        let seed = grid.position(index);
        if !query.is_passable(seed) {
            continue;
        }

        labels[index] = next_label;
        frontier.push_back(seed);
        while let Some(cell) = frontier.pop_front() {
            query.for_each_step(cell, |neighbor, _| {
                let slot = &mut labels[grid.index(neighbor)];
                if *slot == 0 {
                    *slot = next_label;
                    frontier.push_back(neighbor);
                }
            });
        }
        next_label += 1;
    }

    debug!(
        components = next_label - 1,
        width = grid.width(),
        height = grid.height(),
        "Labeled connectivity"
    );
    labels
}

impl Query<'_> {
    /// Whether connectivity labels were built.
    pub fn has_connectivity(&self) -> bool {
        self.components.is_some()
    }

    /// Component label of `pos`: 0 for a blocked cell or when connectivity is disabled.
    pub fn connectivity_id(&self, pos: Position) -> u32 {
        self.components
            .as_ref()
            .map_or(0, |labels| labels[self.grid.index(pos)])
    }

    /// True iff connectivity is enabled, both cells are passable and they lie
    /// in the same component. Always false with connectivity disabled, even for `a == b`.
    pub fn is_connected(&self, a: Position, b: Position) -> bool {
        let id = self.connectivity_id(a);
        id != 0 && id == self.connectivity_id(b)
    }
}

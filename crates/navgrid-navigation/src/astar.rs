/*

A* = f(n) = g(n) + h(n)

Where:
    n = a node in the graph (a grid cell index)
    g(n) = actual cost from start node to n
    h(n) = estimated cost from n to the goal (heuristic)
    f(n) = total estimated cost of the cheapest solution through n

Costs are integers: 10 for an orthogonal step, 14 for a diagonal one, with the
octile distance as heuristic. The heuristic is consistent, so a node popped
from the open set is final and can be closed.

Scratch storage lives in `SearchScratch` and is reused between searches. A
generation counter marks which entries belong to the current search, so
starting a new search does not touch every node.

*/

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Cost of a horizontal or vertical step.
pub const STRAIGHT_COST: u32 = 10;
/// Cost of a diagonal step.
pub const DIAGONAL_COST: u32 = 14;

/// Octile distance between two cells for 10/14 step costs.
pub fn octile_distance(dx: u32, dy: u32) -> u32 {
    let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
    STRAIGHT_COST * (hi - lo) + DIAGONAL_COST * lo
}

/// A graph the searcher can walk. Nodes are dense indices `0..node_count()`.
pub trait SearchSpace {
    /// Number of nodes.
    fn node_count(&self) -> usize;

    /// Admissible, consistent estimate of the cost from `node` to `goal`.
    fn heuristic(&self, node: usize, goal: usize) -> u32;

    /// Calls `visit(neighbor, step_cost)` for every node reachable in one step.
    fn for_each_neighbor<F: FnMut(usize, u32)>(&self, node: usize, visit: F);
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
struct State {
    f: u32,
    h: u32,
    node: usize,
}

// The priority queue depends on `Ord`.
// Flip the ordering so the queue becomes a min-heap on f, then h, then node
// index, which keeps results independent of insertion order.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reusable working set for [`astar_search`].
#[derive(Debug, Default, Clone)]
pub struct SearchScratch {
    generation: u32,
    /// Generation in which `g_score`/`came_from` were last written
    seen: Vec<u32>,
    /// Generation in which the node was closed
    closed: Vec<u32>,
    g_score: Vec<u32>,
    came_from: Vec<usize>,
    open_set: BinaryHeap<State>,
    nodes_explored: usize,
}

impl SearchScratch {
    /// Nodes expanded by the most recent search.
    pub fn nodes_explored(&self) -> usize {
        self.nodes_explored
    }

    fn begin(&mut self, node_count: usize) {
        if self.seen.len() != node_count {
            self.seen = vec![0; node_count];
            self.closed = vec![0; node_count];
            self.g_score = vec![0; node_count];
            self.came_from = vec![0; node_count];
            self.generation = 0;
        }
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.seen.fill(0);
            self.closed.fill(0);
            self.generation = 1;
        }
        self.open_set.clear();
        self.nodes_explored = 0;
    }

    fn g(&self, node: usize) -> u32 {
        if self.seen[node] == self.generation {
            self.g_score[node]
        } else {
            u32::MAX
        }
    }

    fn is_closed(&self, node: usize) -> bool {
        self.closed[node] == self.generation
    }

    fn record(&mut self, node: usize, g: u32, parent: usize) {
        self.seen[node] = self.generation;
        self.g_score[node] = g;
        self.came_from[node] = parent;
    }

    /// Appends the path ending at `goal` to `out`, start first.
    fn reconstruct_path(&self, start: usize, goal: usize, out: &mut Vec<usize>) {
        let first = out.len();
        let mut current = goal;
        out.push(current);
        while current != start {
            current = self.came_from[current];
            out.push(current);
        }
        out[first..].reverse();
    }
}

/// Searches `space` for a cheapest path from `start` to `goal`.
///
/// On success the node sequence, `start` and `goal` inclusive, is written to
/// `path` (which is cleared first) and `true` is returned.
pub fn astar_search<S: SearchSpace>(
    space: &S,
    scratch: &mut SearchScratch,
    start: usize,
    goal: usize,
    path: &mut Vec<usize>,
) -> bool {
    path.clear();
    scratch.begin(space.node_count());

    let h = space.heuristic(start, goal);
    scratch.record(start, 0, start);
    scratch.open_set.push(State { f: h, h, node: start });

    while let Some(State { node: current, .. }) = scratch.open_set.pop() {
        // Stale entries from earlier, costlier pushes.
        if scratch.is_closed(current) {
            continue;
        }
        scratch.closed[current] = scratch.generation;
        scratch.nodes_explored += 1;

        if current == goal {
            scratch.reconstruct_path(start, goal, path);
            return true;
        }

        let current_g = scratch.g(current);
        space.for_each_neighbor(current, |neighbor, step| {
            if scratch.is_closed(neighbor) {
                return;
            }
            let tentative_g_score = current_g + step;
            if tentative_g_score < scratch.g(neighbor) {
                scratch.record(neighbor, tentative_g_score, current);
                let h = space.heuristic(neighbor, goal);
                scratch.open_set.push(State {
                    f: tentative_g_score + h,
                    h,
                    node: neighbor,
                });
            }
        });
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4-connected toy grid, 0 = walkable, row-major.
    struct Toy {
        width: usize,
        cells: Vec<u8>,
    }

    impl Toy {
        fn new(rows: &[&[u8]]) -> Self {
            Toy {
                width: rows[0].len(),
                cells: rows.iter().flat_map(|r| r.iter().copied()).collect(),
            }
        }
    }

    impl SearchSpace for Toy {
        fn node_count(&self) -> usize {
            self.cells.len()
        }

        fn heuristic(&self, node: usize, goal: usize) -> u32 {
            let dx = (node % self.width).abs_diff(goal % self.width);
            let dy = (node / self.width).abs_diff(goal / self.width);
            STRAIGHT_COST * (dx + dy) as u32
        }

        fn for_each_neighbor<F: FnMut(usize, u32)>(&self, node: usize, mut visit: F) {
            let (x, y) = (node % self.width, node / self.width);
            let height = self.cells.len() / self.width;
            let mut try_visit = |nx: usize, ny: usize| {
                let idx = ny * self.width + nx;
                if self.cells[idx] == 0 {
                    visit(idx, STRAIGHT_COST);
                }
            };
            if y > 0 {
                try_visit(x, y - 1);
            }
            if x + 1 < self.width {
                try_visit(x + 1, y);
            }
            if y + 1 < height {
                try_visit(x, y + 1);
            }
            if x > 0 {
                try_visit(x - 1, y);
            }
        }
    }

    #[test]
    fn test_octile_distance() {
        assert_eq!(octile_distance(0, 0), 0);
        assert_eq!(octile_distance(3, 0), 30);
        assert_eq!(octile_distance(0, 3), 30);
        assert_eq!(octile_distance(2, 2), 28);
        assert_eq!(octile_distance(5, 2), 58);
    }

    #[test]
    fn test_astar_simple_path() {
        let toy = Toy::new(&[
            &[0, 0, 0, 0, 1],
            &[1, 1, 0, 1, 0],
            &[0, 0, 0, 0, 0],
            &[0, 1, 1, 1, 1],
            &[0, 0, 0, 0, 0],
        ]);
        let mut scratch = SearchScratch::default();
        let mut path = Vec::new();

        assert!(astar_search(&toy, &mut scratch, 0, 24, &mut path));
        assert_eq!(path.first(), Some(&0));
        assert_eq!(path.last(), Some(&24));
        // Shortest route detours through column 0 on rows 2..4: 12 steps.
        assert_eq!(path.len(), 13);
        for pair in path.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert_eq!(toy.heuristic(a, b), STRAIGHT_COST);
        }
        assert!(scratch.nodes_explored() >= path.len());
    }

    #[test]
    fn test_astar_no_path() {
        let toy = Toy::new(&[&[0, 1, 0], &[0, 1, 0], &[0, 1, 0]]);
        let mut scratch = SearchScratch::default();
        let mut path = vec![99];
        assert!(!astar_search(&toy, &mut scratch, 0, 2, &mut path));
        assert!(path.is_empty());
    }

    #[test]
    fn test_astar_start_equals_goal() {
        let toy = Toy::new(&[&[0, 0], &[0, 0]]);
        let mut scratch = SearchScratch::default();
        let mut path = Vec::new();
        assert!(astar_search(&toy, &mut scratch, 3, 3, &mut path));
        assert_eq!(path, vec![3]);
    }

    #[test]
    fn test_scratch_reuse_across_sizes() {
        let small = Toy::new(&[&[0, 0, 0]]);
        let large = Toy::new(&[&[0, 0, 0, 0], &[0, 1, 1, 0], &[0, 0, 0, 0]]);
        let mut scratch = SearchScratch::default();
        let mut path = Vec::new();

        for _ in 0..3 {
            assert!(astar_search(&small, &mut scratch, 0, 2, &mut path));
            assert_eq!(path, vec![0, 1, 2]);
            assert!(astar_search(&large, &mut scratch, 4, 7, &mut path));
            assert_eq!(path.len(), 6);
        }
    }
}

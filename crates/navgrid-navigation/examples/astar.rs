use navgrid_navigation::{Grid, Position, Query, QueryState};
use std::collections::HashSet;

fn print_grid(grid: &Grid, start: Position, goal: Position, path: &HashSet<Position>) {
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let p = Position::new(x, y);
            if p == start {
                print!("S ");
            } else if p == goal {
                print!("G ");
            } else if path.contains(&p) {
                print!("* ");
            } else if grid.cell(x, y) != 0 {
                print!("X ");
            } else {
                print!(". ");
            }
        }
        println!();
    }
}

fn main() {
    // 0 = walkable
    // 1 = blocked
    let rows: [[u8; 10]; 10] = [
        [0, 0, 0, 0, 0, 0, 0, 0, 0, 0], // Row 0
        [0, 1, 1, 0, 0, 0, 0, 1, 1, 0], // Row 1
        [0, 0, 0, 0, 1, 0, 0, 0, 0, 0], // Row 2
        [0, 0, 1, 1, 1, 1, 0, 1, 0, 0], // Row 3
        [0, 0, 0, 0, 0, 1, 0, 1, 0, 0], // Row 4
        [0, 1, 1, 1, 0, 1, 0, 1, 1, 0], // Row 5
        [0, 0, 0, 1, 0, 0, 0, 0, 0, 0], // Row 6
        [0, 1, 0, 1, 0, 1, 1, 1, 0, 0], // Row 7
        [0, 1, 0, 0, 0, 0, 0, 0, 1, 0], // Row 8
        [0, 0, 0, 1, 1, 1, 0, 0, 0, 0], // Row 9
    ];
    let mut grid = Grid::new(10, 10).expect("10x10 is a valid grid");
    for (y, row) in rows.iter().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            grid.set_cell(x as u32, y as u32, value);
        }
    }

    let start = Position::new(0, 0);
    let goal = Position::new(9, 9);

    println!("Grid:");
    print_grid(&grid, start, goal, &HashSet::new());
    println!("\nStart: {}, Goal: {}", start, goal);

    let query = Query::with_defaults(&grid);
    let mut state = QueryState::new();

    if query.find_path(&mut state, start, goal) {
        println!(
            "\nPath found ({} cells, {} explored): {:?}",
            state.waypoints.len(),
            state.nodes_explored(),
            state.waypoints
        );
        let path_set: HashSet<Position> = state.waypoints.iter().copied().collect();
        println!("\nGrid with path:");
        print_grid(&grid, start, goal, &path_set);
    } else {
        println!("\nNo path found.");
        return;
    }

    if query.find_straight_path(&mut state, start, goal) {
        println!("\nStraight path: {:?}", state.waypoints);
    }
}

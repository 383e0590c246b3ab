use navgrid_navigation::{Grid, Position, Query, QueryState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=navgrid_navigation=debug shows per-query search stats
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let seed = std::env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(1);
    let mut rng = StdRng::seed_from_u64(seed);

    let (width, height) = (24u32, 12u32);
    let mut grid = Grid::new(width, height)?;
    let num_obstacles = 18;
    let max_obstacle_size = 3;

    println!("Generating {} random obstacles (seed {})...", num_obstacles, seed);
    for _ in 0..num_obstacles {
        let start_x = rng.random_range(0..width);
        let start_y = rng.random_range(0..height);
        let w = rng.random_range(1..=max_obstacle_size);
        let h = rng.random_range(1..=max_obstacle_size);
        for x in start_x..(start_x + w).min(width) {
            for y in start_y..(start_y + h).min(height) {
                grid.set_cell(x, y, 1);
            }
        }
    }

    let query = Query::with_defaults(&grid);
    let mut state = QueryState::new();
    let start = Position::new(0, 0);
    let goal = Position::new(width - 1, height - 1);

    // Corners may be buried in an obstacle; let the robust query move them.
    if query.robust_find_straight_path(&mut state, start, goal, 3, 3) {
        println!("Straight path: {:?}", state.waypoints);
    } else {
        println!("No path between the corners.");
    }

    for y in 0..height {
        for x in 0..width {
            let p = Position::new(x, y);
            let c = if state.waypoints.contains(&p) {
                '*'
            } else if query.is_passable(p) {
                '.'
            } else {
                'X'
            };
            print!("{c}");
        }
        println!();
    }
    Ok(())
}

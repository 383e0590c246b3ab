use anyhow::{Context, Result, bail};
use navgrid_navigation::{Grid, NavigationSettings, Position, QueryState};
use tracing::info;

use crate::render;

fn parse<T: std::str::FromStr>(args: &[String], index: usize, name: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = args.get(index).with_context(|| format!("missing <{name}>"))?;
    raw.parse().with_context(|| format!("invalid <{name}>: {raw}"))
}

fn load_grid(path: &str) -> Result<Grid> {
    let bytes = std::fs::read(path).with_context(|| format!("reading grid {path}"))?;
    let grid = Grid::from_bytes(&bytes).with_context(|| format!("decoding grid {path}"))?;
    info!(path, width = grid.width(), height = grid.height(), "Loaded grid");
    Ok(grid)
}

fn save_grid(grid: &Grid, path: &str) -> Result<()> {
    std::fs::write(path, grid.save()).with_context(|| format!("writing grid {path}"))?;
    info!(path, width = grid.width(), height = grid.height(), "Saved grid");
    Ok(())
}

fn position(args: &[String], index: usize, grid: &Grid) -> Result<Position> {
    let p = Position::new(parse(args, index, "x")?, parse(args, index + 1, "y")?);
    if p.x >= grid.width() || p.y >= grid.height() {
        bail!("{p} is outside the {}x{} grid", grid.width(), grid.height());
    }
    Ok(p)
}

pub fn new(args: &[String]) -> Result<()> {
    let out: String = parse(args, 0, "out")?;
    let grid = Grid::new(parse(args, 1, "width")?, parse(args, 2, "height")?)?;
    save_grid(&grid, &out)
}

pub fn resize(args: &[String]) -> Result<()> {
    let source = load_grid(&parse::<String>(args, 0, "grid")?)?;
    let grid = Grid::from_grid(parse(args, 1, "width")?, parse(args, 2, "height")?, &source)?;
    save_grid(&grid, &parse::<String>(args, 3, "out")?)
}

pub fn set(args: &[String]) -> Result<()> {
    let path: String = parse(args, 0, "grid")?;
    let mut grid = load_grid(&path)?;
    let p = position(args, 1, &grid)?;
    grid.set_cell(p.x, p.y, parse(args, 3, "value")?);
    save_grid(&grid, &path)
}

pub fn show(args: &[String]) -> Result<()> {
    let grid = load_grid(&parse::<String>(args, 0, "grid")?)?;
    print!("{grid}");
    Ok(())
}

pub fn path(args: &[String], settings: &NavigationSettings) -> Result<()> {
    let grid = load_grid(&parse::<String>(args, 0, "grid")?)?;
    let start = position(args, 1, &grid)?;
    let end = position(args, 3, &grid)?;

    let query = settings.query.build_query(&grid);
    let mut state = QueryState::new();
    let found = query.robust_find_straight_path(
        &mut state,
        start,
        end,
        settings.robust.max_start_distance,
        settings.robust.max_end_distance,
    );
    if !found {
        bail!("no path from {start} to {end}");
    }

    let waypoints: Vec<String> = state.waypoints.iter().map(ToString::to_string).collect();
    println!("{}", waypoints.join(" -> "));
    print!("{}", render::draw(&query, &state.waypoints));
    Ok(())
}

pub fn nearest(args: &[String], settings: &NavigationSettings) -> Result<()> {
    let grid = load_grid(&parse::<String>(args, 0, "grid")?)?;
    let from = position(args, 1, &grid)?;
    let max_distance = if args.len() > 3 {
        parse(args, 3, "max-distance")?
    } else {
        settings.robust.max_start_distance
    };

    let query = settings.query.build_query(&grid);
    match query.find_nearest(from, max_distance) {
        Some(found) => println!("{found}"),
        None => bail!("no passable cell within {max_distance} of {from}"),
    }
    Ok(())
}

pub fn ray(args: &[String], settings: &NavigationSettings) -> Result<()> {
    let grid = load_grid(&parse::<String>(args, 0, "grid")?)?;
    let start = position(args, 1, &grid)?;
    let end = position(args, 3, &grid)?;

    let query = settings.query.build_query(&grid);
    match query.ray_test(start, end, false) {
        Some(hit) => println!("blocked at {hit}"),
        None => println!("clear"),
    }
    Ok(())
}

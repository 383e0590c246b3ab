use navgrid_navigation::{CoverageRasterizer, Grid, RASTER_RES, UpAxis, WorldPoint3};

fn main() {
    let (width, height) = (6u32, 4u32);
    let samples = (width * height * RASTER_RES * RASTER_RES) as usize;

    // Flat floor at height 0 everywhere.
    let heights = vec![0.0f32; samples];
    let mut rasterizer = CoverageRasterizer::new(width, height, WorldPoint3::default(), heights, UpAxis::Z)
        .expect("height-field matches grid size");

    // A ramp covering most of the grid, and a triangle sunk below the floor.
    let ramp = [
        WorldPoint3::new(0.0, 0.0, 0.0),
        WorldPoint3::new(5.0, 0.0, 1.0),
        WorldPoint3::new(0.0, 4.0, 1.0),
    ];
    rasterizer.rasterize_triangle(ramp[0], ramp[1], ramp[2]);
    rasterizer.rasterize_triangle(
        WorldPoint3::new(3.0, 2.0, -1.0),
        WorldPoint3::new(6.0, 2.0, -1.0),
        WorldPoint3::new(6.0, 4.0, -1.0),
    );

    println!("Sample counts (max {}):", RASTER_RES * RASTER_RES);
    for y in 0..height {
        for x in 0..width {
            print!("{:3} ", rasterizer.sample_count(x, y));
        }
        println!();
    }

    // Everything starts blocked; well-covered cells become walkable.
    let mut grid = Grid::new(width, height).expect("valid grid");
    grid.cells_mut().fill(1);
    let written = rasterizer
        .apply_to_grid(&mut grid, RASTER_RES * RASTER_RES / 2, 0)
        .expect("grid matches rasterizer");
    println!("\n{} cells marked walkable", written);
    print!("{}", grid);
}

//! Sub-cell triangle rasterization into per-cell coverage counts.
//!
//! Every grid cell is divided into `RASTER_RES x RASTER_RES` samples. Sample
//! `(sx, sy)` sits at grid-space point `(sx / RASTER_RES, sy / RASTER_RES)`,
//! belongs to cell `(sx / RASTER_RES, sy / RASTER_RES)` and owns one entry of
//! the caller-supplied height-field. A triangle covers a sample when the sample
//! lies inside its 2D projection (top-left fill rule, so a sample on an edge
//! shared by two triangles is claimed by exactly one of them) and the
//! triangle's interpolated height there is at or above the height-field value.
//!
//! Counts accumulate across calls until [`CoverageRasterizer::clear`]; a sample
//! is counted at most once, so a cell never exceeds `RASTER_RES * RASTER_RES`.

#![warn(missing_docs)]

use tracing::{debug, warn};

use super::{Grid, WorldPoint3};
use crate::error::NavigationError;

/// Samples per cell along each axis.
pub const RASTER_RES: u32 = 4;

/// Which world axis points up in the source geometry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum UpAxis {
    /// Grid plane is world X/Z with Y up. Grid rows run along -Z.
    Y,
    /// Grid plane is world X/Y with Z up.
    #[default]
    Z,
}

/// A vertex projected into sample space.
#[derive(Debug, Clone, Copy)]
struct Projected {
    x: f32,
    y: f32,
    h: f32,
}

/// Signed edge function of `p` against the directed edge `a -> b`.
///
/// Positive on the inner side of a triangle wound so that `edge(a, b, c) > 0`.
fn edge(a: Projected, b: Projected, px: f32, py: f32) -> f32 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

/// Top and left edges own the samples lying exactly on them (y axis points down).
fn is_top_left(a: Projected, b: Projected) -> bool {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dy < 0.0 || (dy == 0.0 && dx > 0.0)
}

fn covers(w: f32, top_left: bool) -> bool {
    w > 0.0 || (w == 0.0 && top_left)
}

/// Accumulates walkable-surface coverage for a grid of cells.
#[derive(Debug, Clone)]
pub struct CoverageRasterizer {
    width: u32,
    height: u32,
    origin: WorldPoint3,
    up_axis: UpAxis,
    /// Height threshold per sample, row-major over `width*R x height*R`
    heights: Vec<f32>,
    /// Samples already counted since the last clear
    covered: Vec<bool>,
    /// Covered samples per cell, row-major over `width x height`
    counts: Vec<u32>,
}

impl CoverageRasterizer {
    /// Creates a rasterizer for a `width x height` cell grid.
    ///
    /// # Arguments
    /// * `width` - Width of the target grid in cells
    /// * `height` - Height of the target grid in cells
    /// * `origin` - World position of the grid's (0, 0) corner; subtracted from every vertex
    /// * `heights` - Minimum walkable height per sample, `width * height * RASTER_RES²` values
    ///   laid out row-major at sample resolution
    /// * `up_axis` - Which world axis carries the height
    ///
    /// # Returns
    /// * `Result<Self, NavigationError>` - The rasterizer, or an error if the dimensions are
    ///   zero or the height-field size does not match
    pub fn new(
        width: u32,
        height: u32,
        origin: WorldPoint3,
        heights: Vec<f32>,
        up_axis: UpAxis,
    ) -> Result<Self, NavigationError> {
        if width == 0 || height == 0 {
            return Err(NavigationError::InvalidDimensions("Width and height must be non-zero"));
        }
        let cells = (width as usize)
            .checked_mul(height as usize)
            .ok_or(NavigationError::InvalidDimensions("Grid dimensions too large, would cause overflow"))?;
        let samples = cells
            .checked_mul((RASTER_RES * RASTER_RES) as usize)
            .ok_or(NavigationError::InvalidDimensions("Grid dimensions too large, would cause overflow"))?;
        if heights.len() != samples {
            warn!(expected = samples, actual = heights.len(), "Height-field size mismatch");
            return Err(NavigationError::DimensionMismatch(
                "Height-field must hold RASTER_RES² samples per cell",
            ));
        }

        Ok(CoverageRasterizer {
            width,
            height,
            origin,
            up_axis,
            heights,
            covered: vec![false; samples],
            counts: vec![0; cells],
        })
    }

    /// Width of the target grid in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the target grid in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    fn project(&self, v: WorldPoint3) -> Projected {
        let res = RASTER_RES as f32;
        let (gx, gy, h) = match self.up_axis {
            UpAxis::Z => (v.x - self.origin.x, v.y - self.origin.y, v.z - self.origin.z),
            UpAxis::Y => (v.x - self.origin.x, -(v.z - self.origin.z), v.y - self.origin.y),
        };
        Projected {
            x: gx * res,
            y: gy * res,
            h,
        }
    }

    /// Adds the samples covered by one triangle to the per-cell counts.
    ///
    /// Zero-area triangles and samples where the triangle lies below the
    /// height-field contribute nothing. Winding order does not matter.
    pub fn rasterize_triangle(&mut self, v0: WorldPoint3, v1: WorldPoint3, v2: WorldPoint3) {
        let a = self.project(v0);
        let mut b = self.project(v1);
        let mut c = self.project(v2);

        let mut area = edge(a, b, c.x, c.y);
        if area == 0.0 || !area.is_finite() {
            return;
        }
        if area < 0.0 {
            std::mem::swap(&mut b, &mut c);
            area = -area;
        }

        let sample_w = i64::from(self.width * RASTER_RES);
        let sample_h = i64::from(self.height * RASTER_RES);
        let min_x = (a.x.min(b.x).min(c.x).floor() as i64).max(0);
        let min_y = (a.y.min(b.y).min(c.y).floor() as i64).max(0);
        let max_x = (a.x.max(b.x).max(c.x).ceil() as i64).min(sample_w - 1);
        let max_y = (a.y.max(b.y).max(c.y).ceil() as i64).min(sample_h - 1);
        if min_x > max_x || min_y > max_y {
            return;
        }

        let tl_ab = is_top_left(a, b);
        let tl_bc = is_top_left(b, c);
        let tl_ca = is_top_left(c, a);
        let mut newly_covered = 0u32;

        for sy in min_y..=max_y {
            let py = sy as f32;
            for sx in min_x..=max_x {
                let px = sx as f32;
                let w_bc = edge(b, c, px, py);
                let w_ca = edge(c, a, px, py);
                let w_ab = edge(a, b, px, py);
                if !(covers(w_bc, tl_bc) && covers(w_ca, tl_ca) && covers(w_ab, tl_ab)) {
                    continue;
                }

                let h = a.h + (w_ca * (b.h - a.h) + w_ab * (c.h - a.h)) / area;
                let sample = (sy * sample_w + sx) as usize;
                if h < self.heights[sample] || self.covered[sample] {
                    continue;
                }
                self.covered[sample] = true;
                let cell = (sy as u32 / RASTER_RES) as usize * self.width as usize
                    + (sx as u32 / RASTER_RES) as usize;
                self.counts[cell] += 1;
                newly_covered += 1;
            }
        }
        debug!(newly_covered, "Rasterized triangle");
    }

    /// Number of covered samples in cell `(x, y)`, at most `RASTER_RES²`.
    pub fn sample_count(&self, x: u32, y: u32) -> u32 {
        debug_assert!(x < self.width && y < self.height, "cell ({x}, {y}) outside rasterizer");
        self.counts[y as usize * self.width as usize + x as usize]
    }

    /// Resets all coverage. This is the only way counts decrease.
    pub fn clear(&mut self) {
        self.covered.fill(false);
        self.counts.fill(0);
    }

    /// Writes `covered_value` into every grid cell with at least `min_samples` covered samples.
    ///
    /// Cells below the threshold are left untouched.
    ///
    /// # Returns
    /// * `Result<usize, NavigationError>` - Number of cells written, or an error if the grid
    ///   size differs from the rasterizer's
    pub fn apply_to_grid(&self, grid: &mut Grid, min_samples: u32, covered_value: u8) -> Result<usize, NavigationError> {
        if grid.width() != self.width || grid.height() != self.height {
            warn!(
                grid_width = grid.width(),
                grid_height = grid.height(),
                width = self.width,
                height = self.height,
                "Grid does not match rasterizer dimensions"
            );
            return Err(NavigationError::DimensionMismatch("Grid does not match rasterizer dimensions"));
        }
        let mut written = 0;
        for (cell, &count) in grid.cells_mut().iter_mut().zip(&self.counts) {
            if count >= min_samples {
                *cell = covered_value;
                written += 1;
            }
        }
        debug!(written, min_samples, covered_value, "Applied coverage to grid");
        Ok(written)
    }
}

//! Passability grid storage and its binary file format.
//!
//! A [`Grid`] is a row-major array of single-byte cell values. The core never
//! interprets a cell value beyond "zero or not" (see [`crate::query::Query`]);
//! authoring tools are free to use the byte as a category or cost.
//!
//! The serialized form is a fixed 8-byte little-endian header
//! (`width: u32`, `height: u32`) followed by `width * height` raw cell bytes.

#![warn(missing_docs)]

use tracing::warn;

use super::Position;
use crate::error::NavigationError;

const HEADER_LEN: usize = 8;

/// A width x height grid of single-byte cell values.
///
/// Coordinates handed to [`Grid::cell`] and [`Grid::set_cell`] must be in
/// range; out-of-range access panics like any other slice index.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    /// Width of the grid in cells
    width: u32,
    /// Height of the grid in cells
    height: u32,
    /// Cell values, index = y * width + x
    cells: Vec<u8>,
}

fn cell_count(width: u32, height: u32) -> Result<usize, NavigationError> {
    if width == 0 || height == 0 {
        return Err(NavigationError::InvalidDimensions("Width and height must be non-zero"));
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(NavigationError::InvalidDimensions("Grid dimensions too large, would cause overflow"))
}

impl Grid {
    /// Creates a new grid with every cell set to zero (passable).
    ///
    /// # Arguments
    /// * `width` - Width of the grid in cells
    /// * `height` - Height of the grid in cells
    ///
    /// # Returns
    /// * `Result<Self, NavigationError>` - The created Grid or an error if the dimensions are invalid
    pub fn new(width: u32, height: u32) -> Result<Self, NavigationError> {
        let count = cell_count(width, height)?;
        Ok(Grid {
            width,
            height,
            cells: vec![0; count],
        })
    }

    /// Creates a grid of a new size holding a copy of `source`.
    ///
    /// Cells inside both grids are copied; cells beyond the source's bounds are zero.
    ///
    /// # Arguments
    /// * `width` - Width of the new grid in cells
    /// * `height` - Height of the new grid in cells
    /// * `source` - Grid whose overlapping region is copied
    pub fn from_grid(width: u32, height: u32, source: &Grid) -> Result<Self, NavigationError> {
        let mut grid = Grid::new(width, height)?;
        let copy_w = width.min(source.width) as usize;
        let copy_h = height.min(source.height);
        for y in 0..copy_h {
            let src = source.row_start(y);
            let dst = grid.row_start(y);
            grid.cells[dst..dst + copy_w].copy_from_slice(&source.cells[src..src + copy_w]);
        }
        Ok(grid)
    }

    /// Decodes a grid from its serialized byte form.
    ///
    /// # Arguments
    /// * `bytes` - The complete contents of a grid file
    ///
    /// # Returns
    /// * `Result<Self, NavigationError>` - The decoded Grid, or an error if the input is truncated,
    ///   oversized, or declares invalid dimensions
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, NavigationError> {
        let Some((header, payload)) = bytes.split_first_chunk::<HEADER_LEN>() else {
            warn!(len = bytes.len(), "Grid data shorter than header");
            return Err(NavigationError::MalformedData("Grid data shorter than header"));
        };
        let width = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let height = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

        let count = cell_count(width, height).map_err(|e| {
            warn!(width, height, "Grid header declares invalid dimensions");
            e
        })?;
        if payload.len() != count {
            warn!(width, height, payload = payload.len(), "Grid payload size does not match header");
            return Err(NavigationError::MalformedData("Grid payload size does not match header"));
        }

        Ok(Grid {
            width,
            height,
            cells: payload.to_vec(),
        })
    }

    /// Serializes the grid. The result decodes back to an identical grid via [`Grid::from_bytes`].
    pub fn save(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.cells.len());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&self.cells);
        out
    }

    /// Width of the grid in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the grid in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns true if `(x, y)` lies inside the grid.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }

    /// Row-major index of a cell.
    pub fn index(&self, p: Position) -> usize {
        debug_assert!(p.x < self.width && p.y < self.height, "cell {p} outside grid");
        self.row_start(p.y) + p.x as usize
    }

    /// Position of a row-major index.
    pub fn position(&self, index: usize) -> Position {
        let w = self.width as usize;
        Position::new((index % w) as u32, (index / w) as u32)
    }

    fn row_start(&self, y: u32) -> usize {
        y as usize * self.width as usize
    }

    /// Value of the cell at `(x, y)`.
    pub fn cell(&self, x: u32, y: u32) -> u8 {
        self.cells[self.index(Position::new(x, y))]
    }

    /// Sets the value of the cell at `(x, y)`.
    pub fn set_cell(&mut self, x: u32, y: u32, value: u8) {
        let idx = self.index(Position::new(x, y));
        self.cells[idx] = value;
    }

    /// All cell values in row-major order.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Mutable access to all cell values in row-major order.
    pub fn cells_mut(&mut self) -> &mut [u8] {
        &mut self.cells
    }

    /// Sets every cell to zero.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Grid ({}x{})", self.width, self.height)?;
        for row in self.cells.chunks(self.width as usize) {
            for value in row {
                write!(f, "{:3} ", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterned(width: u32, height: u32) -> Grid {
        let mut grid = Grid::new(width, height).unwrap();
        for y in 0..height {
            for x in 0..width {
                grid.set_cell(x, y, ((x * 7 + y * 13) % 5) as u8);
            }
        }
        grid
    }

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(10, 3).unwrap();
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.cells().len(), 30);
        assert!(grid.cells().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_invalid_creation() {
        assert!(matches!(Grid::new(0, 10), Err(NavigationError::InvalidDimensions(_))));
        assert!(matches!(Grid::new(10, 0), Err(NavigationError::InvalidDimensions(_))));
    }

    #[test]
    fn test_cell_operations() {
        let mut grid = Grid::new(5, 4).unwrap();
        grid.set_cell(4, 3, 9);
        grid.set_cell(0, 1, 1);
        assert_eq!(grid.cell(4, 3), 9);
        assert_eq!(grid.cell(0, 1), 1);
        assert_eq!(grid.cells()[3 * 5 + 4], 9);
        assert_eq!(grid.position(3 * 5 + 4), Position::new(4, 3));
        grid.clear();
        assert_eq!(grid.cell(4, 3), 0);
    }

    #[test]
    fn test_save_load_round_trip() {
        let grid = patterned(7, 5);
        let bytes = grid.save();
        assert_eq!(bytes.len(), 8 + 35);
        assert_eq!(&bytes[..8], &[7, 0, 0, 0, 5, 0, 0, 0]);

        let loaded = Grid::from_bytes(&bytes).unwrap();
        assert_eq!(loaded, grid);
        assert_eq!(loaded.save(), bytes);
    }

    #[test]
    fn test_load_malformed() {
        let bytes = patterned(4, 4).save();

        assert!(matches!(Grid::from_bytes(&[]), Err(NavigationError::MalformedData(_))));
        assert!(matches!(Grid::from_bytes(&bytes[..7]), Err(NavigationError::MalformedData(_))));
        assert!(matches!(
            Grid::from_bytes(&bytes[..bytes.len() - 1]),
            Err(NavigationError::MalformedData(_))
        ));

        let mut extra = bytes.clone();
        extra.push(0);
        assert!(matches!(Grid::from_bytes(&extra), Err(NavigationError::MalformedData(_))));

        let mut zero_width = bytes.clone();
        zero_width[..4].copy_from_slice(&0u32.to_le_bytes());
        assert!(matches!(Grid::from_bytes(&zero_width), Err(NavigationError::InvalidDimensions(_))));

        let mut huge = bytes;
        huge[..8].copy_from_slice(&[0xFF; 8]);
        assert!(Grid::from_bytes(&huge).is_err());
    }

    #[test]
    fn test_from_grid_clamped_copy() {
        let source = patterned(6, 4);

        let grown = Grid::from_grid(9, 7, &source).unwrap();
        for y in 0..7 {
            for x in 0..9 {
                let expected = if x < 6 && y < 4 { source.cell(x, y) } else { 0 };
                assert_eq!(grown.cell(x, y), expected, "cell ({x}, {y})");
            }
        }

        let shrunk = Grid::from_grid(3, 2, &source).unwrap();
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(shrunk.cell(x, y), source.cell(x, y));
            }
        }

        let mixed = Grid::from_grid(2, 8, &source).unwrap();
        assert_eq!(mixed.cell(1, 3), source.cell(1, 3));
        assert_eq!(mixed.cell(1, 7), 0);

        assert!(Grid::from_grid(0, 2, &source).is_err());
    }

    #[test]
    fn test_display() {
        let mut grid = Grid::new(3, 2).unwrap();
        grid.set_cell(1, 1, 254);
        let display_str = format!("{}", grid);
        assert!(display_str.contains("Grid (3x2)"));
        assert!(display_str.contains("254"));
    }
}

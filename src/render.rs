use navgrid_navigation::{Grid, Position, Query};
use std::collections::HashSet;
use std::fmt::Write;

/// Draws the grid one character per cell.
///
/// `S`/`G` mark the path ends, `*` other waypoints, `X` blocked cells and `.` open ones.
pub fn draw(query: &Query<'_>, waypoints: &[Position]) -> String {
    let grid: &Grid = query.grid();
    let on_path: HashSet<Position> = waypoints.iter().copied().collect();
    let start = waypoints.first().copied();
    let goal = waypoints.last().copied();

    let mut out = String::new();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let p = Position::new(x, y);
            let c = if Some(p) == start {
                'S'
            } else if Some(p) == goal {
                'G'
            } else if on_path.contains(&p) {
                '*'
            } else if !query.is_passable(p) {
                'X'
            } else {
                '.'
            };
            let _ = write!(out, "{c} ");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_path() {
        let mut grid = Grid::new(3, 2).unwrap();
        grid.set_cell(1, 0, 1);
        let query = Query::with_defaults(&grid);
        let path = [Position::new(0, 0), Position::new(1, 1), Position::new(2, 0)];
        assert_eq!(draw(&query, &path), "S X G \n. * . \n");
        assert_eq!(draw(&query, &[]), ". X . \n. . . \n");
    }
}

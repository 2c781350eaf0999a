//! # ASCII Grid Preview
//!
//! Renders a wavy grid to the terminal for development mode (`--stdout`),
//! so the distortion can be eyeballed without producing files. Horizontal
//! lines draw as `-`, verticals as `|`, crossings as `+`.

use crate::grid::{Bounds, LinePath};
use crate::path::Direction;

const COLS: usize = 72;
const ROWS: usize = 36;

/// Map rendered line paths onto a character raster.
///
/// Points the wave pushes outside the bounds are skipped, matching the
/// raster exporter's behavior.
fn rasterize_ascii(lines: &[LinePath], bounds: &Bounds, cols: usize, rows: usize) -> Vec<String> {
    let mut grid = vec![vec![' '; cols]; rows];

    for line in lines {
        let ch = match line.direction {
            Direction::Horizontal => '-',
            Direction::Vertical => '|',
        };

        for p in &line.points {
            let fx = (p.x - bounds.x) / bounds.width * (cols as f64 - 1.0);
            let fy = (p.y - bounds.y) / bounds.height * (rows as f64 - 1.0);
            if fx < 0.0 || fy < 0.0 {
                continue;
            }
            let (col, row) = (fx.round() as usize, fy.round() as usize);
            if col >= cols || row >= rows {
                continue;
            }

            let cell = &mut grid[row][col];
            *cell = if *cell == ' ' || *cell == ch { ch } else { '+' };
        }
    }

    grid.into_iter()
        .map(|row| row.into_iter().collect())
        .collect()
}

/// Print the grid preview to stdout.
pub fn draw_ascii(lines: &[LinePath], bounds: &Bounds) {
    for row in rasterize_ascii(lines, bounds, COLS, ROWS) {
        println!("{row}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{render_grid, GridSpec};
    use crate::wave::WaveParams;

    fn preview_rows() -> Vec<String> {
        let spec = GridSpec {
            size: 4,
            bounds: Bounds {
                x: 0.0,
                y: 0.0,
                width: 400.0,
                height: 400.0,
            },
        };
        let params = WaveParams {
            amplitude: 6.0,
            frequency: 2.0,
            phase: 0.0,
        };
        let lines = render_grid(&spec, &params);
        rasterize_ascii(&lines, &spec.bounds, COLS, ROWS)
    }

    #[test]
    fn preview_contains_both_orientations_and_crossings() {
        let joined = preview_rows().join("\n");
        assert!(joined.contains('-'));
        assert!(joined.contains('|'));
        assert!(joined.contains('+'));
    }

    #[test]
    fn preview_has_expected_dimensions() {
        let rows = preview_rows();
        assert_eq!(rows.len(), ROWS);
        assert!(rows.iter().all(|r| r.chars().count() == COLS));
    }

    #[test]
    fn out_of_bounds_wave_points_are_skipped() {
        // Amplitude far beyond the bounds must not panic or wrap
        let spec = GridSpec {
            size: 2,
            bounds: Bounds {
                x: 0.0,
                y: 0.0,
                width: 100.0,
                height: 100.0,
            },
        };
        let params = WaveParams {
            amplitude: 500.0,
            frequency: 3.0,
            phase: 0.0,
        };
        let lines = render_grid(&spec, &params);
        let rows = rasterize_ascii(&lines, &spec.bounds, COLS, ROWS);
        assert_eq!(rows.len(), ROWS);
    }
}

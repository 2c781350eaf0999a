//! # Grid Assembly
//!
//! Orchestrates wavy-line generation across an N×N grid inside a bounding
//! box: `size + 1` horizontal lines followed by `size + 1` vertical lines,
//! each staggered by its own index. Output ordering is stable (horizontals
//! first, then verticals, each in increasing index order) so exports are
//! byte-reproducible and strokes overlap in a predictable z-order.

use crate::path::{generate_wavy_line, Direction, Point, DEFAULT_SEGMENTS};
use crate::wave::WaveParams;
use serde::{Deserialize, Serialize};

/// Pixel-space rectangle the grid is rendered into.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Cell count and pixel bounds of a rendered grid.
///
/// `size` is cells per axis; the renderer draws `size + 1` lines each way.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub size: u32,
    pub bounds: Bounds,
}

/// One rendered grid line: its orientation, index, and sampled points.
#[derive(Clone, Debug, PartialEq)]
pub struct LinePath {
    pub direction: Direction,
    pub index: u32,
    pub points: Vec<Point>,
}

/// Render the full set of wavy grid lines for a spec and wave parameters.
///
/// Uses [`DEFAULT_SEGMENTS`] samples per line; see
/// [`render_grid_with_segments`] to control smoothness.
pub fn render_grid(spec: &GridSpec, params: &WaveParams) -> Vec<LinePath> {
    render_grid_with_segments(spec, params, DEFAULT_SEGMENTS)
}

/// Render the grid with an explicit per-line sample count.
///
/// Emits exactly `2 * (size + 1)` paths: horizontals at
/// `y = bounds.y + i * bounds.height / size`, then verticals at
/// `x = bounds.x + i * bounds.width / size`, for `i` in `0..=size`.
///
/// # Panics
/// Panics if `spec.size == 0`.
pub fn render_grid_with_segments(
    spec: &GridSpec,
    params: &WaveParams,
    segments: u32,
) -> Vec<LinePath> {
    assert!(spec.size > 0, "grid size must be positive");

    let b = spec.bounds;
    let mut lines = Vec::with_capacity(2 * (spec.size as usize + 1));

    for i in 0..=spec.size {
        let y = b.y + i as f64 * b.height / spec.size as f64;
        lines.push(LinePath {
            direction: Direction::Horizontal,
            index: i,
            points: generate_wavy_line(
                b.x,
                y,
                b.x + b.width,
                y,
                params,
                Direction::Horizontal,
                i,
                segments,
            ),
        });
    }

    for i in 0..=spec.size {
        let x = b.x + i as f64 * b.width / spec.size as f64;
        lines.push(LinePath {
            direction: Direction::Vertical,
            index: i,
            points: generate_wavy_line(
                x,
                b.y,
                x,
                b.y + b.height,
                params,
                Direction::Vertical,
                i,
                segments,
            ),
        });
    }

    lines
}

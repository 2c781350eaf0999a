//! # Wavy Line Path Generation
//!
//! Samples a sinusoidal offset along a straight line segment, producing the
//! polyline for one grid line. Horizontal lines interpolate x and displace
//! y; vertical lines interpolate y and displace x.
//!
//! Parallel lines are de-synchronized by a fixed per-line phase step so the
//! grid reads as a coherent wave field instead of one line stamped
//! repeatedly. That stagger is part of the geometric contract, not a
//! cosmetic detail.

use crate::wave::WaveParams;
use std::f64::consts::TAU;

/// Phase stagger between adjacent parallel lines, radians per line index
pub const LINE_PHASE_STEP: f64 = 0.4;

/// Default samples per line
pub const DEFAULT_SEGMENTS: u32 = 60;

/// A sampled point on a line path, in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Orientation of a grid line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
}

/// Sample one wavy line from `(x1, y1)` to `(x2, y2)`.
///
/// Returns `segments + 1` points: `t = i / segments` runs over `0..=segments`
/// and reaches exactly 0 and 1, so the interpolated coordinate lands exactly
/// on both endpoints. The cross-axis offset at parameter `t` is
///
/// ```text
/// amplitude * sin(TAU * frequency * t + phase + line_index * LINE_PHASE_STEP)
/// ```
///
/// Zero amplitude degenerates to a straight interpolated line; zero
/// frequency to a constant offset of `sin(phase + line_index * step)` along
/// the whole line. Both are ordinary finite outputs.
///
/// # Panics
/// Panics if `segments == 0`.
pub fn generate_wavy_line(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    params: &WaveParams,
    direction: Direction,
    line_index: u32,
    segments: u32,
) -> Vec<Point> {
    assert!(segments > 0, "segments must be positive");

    let line_phase = params.phase + line_index as f64 * LINE_PHASE_STEP;
    let mut points = Vec::with_capacity(segments as usize + 1);

    for i in 0..=segments {
        let t = i as f64 / segments as f64;
        let wave = params.amplitude * (TAU * params.frequency * t + line_phase).sin();

        let point = match direction {
            Direction::Horizontal => Point {
                x: x1 + (x2 - x1) * t,
                y: y1 + wave,
            },
            Direction::Vertical => Point {
                x: x1 + wave,
                y: y1 + (y2 - y1) * t,
            },
        };
        points.push(point);
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(amplitude: f64, frequency: f64, phase: f64) -> WaveParams {
        WaveParams {
            amplitude,
            frequency,
            phase,
        }
    }

    #[test]
    fn produces_segments_plus_one_points() {
        let pts = generate_wavy_line(
            0.0,
            0.0,
            100.0,
            0.0,
            &params(5.0, 2.0, 0.0),
            Direction::Horizontal,
            0,
            35,
        );
        assert_eq!(pts.len(), 36);
    }

    #[test]
    fn interpolation_reaches_exact_endpoints() {
        let wave = params(8.0, 3.0, 1.1);
        let pts = generate_wavy_line(
            10.0,
            50.0,
            210.0,
            50.0,
            &wave,
            Direction::Horizontal,
            2,
            47,
        );

        // t hits exactly 0 and 1, so the along-axis coordinate is exact
        assert_eq!(pts.first().unwrap().x, 10.0);
        assert_eq!(pts.last().unwrap().x, 210.0);

        // Cross-axis values are the wave formula evaluated at t = 0 and 1
        let line_phase = 1.1 + 2.0 * LINE_PHASE_STEP;
        let expected_first = 50.0 + 8.0 * line_phase.sin();
        let expected_last = 50.0 + 8.0 * (TAU * 3.0 + line_phase).sin();
        assert!((pts.first().unwrap().y - expected_first).abs() < 1e-12);
        assert!((pts.last().unwrap().y - expected_last).abs() < 1e-12);
    }

    #[test]
    fn vertical_lines_displace_x() {
        let pts = generate_wavy_line(
            40.0,
            0.0,
            40.0,
            100.0,
            &params(5.0, 1.0, 0.0),
            Direction::Vertical,
            0,
            10,
        );
        assert_eq!(pts.first().unwrap().y, 0.0);
        assert_eq!(pts.last().unwrap().y, 100.0);
        // Mid-span x should wobble away from the base line somewhere
        assert!(pts.iter().any(|p| (p.x - 40.0).abs() > 1.0));
    }

    #[test]
    fn zero_amplitude_degenerates_to_straight_line() {
        let pts = generate_wavy_line(
            0.0,
            25.0,
            100.0,
            25.0,
            &params(0.0, 4.0, 2.0),
            Direction::Horizontal,
            3,
            20,
        );
        for p in &pts {
            assert!(p.y.is_finite());
            assert_eq!(p.y, 25.0);
        }
    }

    #[test]
    fn zero_frequency_gives_constant_offset() {
        let amplitude = 6.0;
        let phase = 0.9;
        let line_index = 4;
        let pts = generate_wavy_line(
            0.0,
            0.0,
            100.0,
            0.0,
            &params(amplitude, 0.0, phase),
            Direction::Horizontal,
            line_index,
            20,
        );
        let expected = amplitude * (phase + line_index as f64 * LINE_PHASE_STEP).sin();
        for p in &pts {
            assert!(p.y.is_finite());
            assert!((p.y - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn identical_inputs_yield_identical_paths() {
        let wave = params(7.0, 2.5, 0.3);
        let a = generate_wavy_line(0.0, 0.0, 50.0, 0.0, &wave, Direction::Horizontal, 1, 35);
        let b = generate_wavy_line(0.0, 0.0, 50.0, 0.0, &wave, Direction::Horizontal, 1, 35);
        assert_eq!(a, b);
    }

    #[test]
    fn parallel_lines_are_desynchronized() {
        let wave = params(5.0, 2.0, 0.0);
        let a = generate_wavy_line(0.0, 0.0, 100.0, 0.0, &wave, Direction::Horizontal, 0, 40);
        let b = generate_wavy_line(0.0, 0.0, 100.0, 0.0, &wave, Direction::Horizontal, 1, 40);

        // Same base line, different index: the offsets must differ
        let differs = a
            .iter()
            .zip(&b)
            .any(|(pa, pb)| (pa.y - pb.y).abs() > 1e-9);
        assert!(differs, "adjacent lines should not be identical");
    }
}

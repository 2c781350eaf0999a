//! # Wave Parameter Mapping
//!
//! Maps a [`Reading`] plus the user's base amplitude/frequency sliders onto
//! a concrete [`WaveParams`] triple. This is the point where real-world data
//! becomes visual distortion: a rising tide swells the amplitude and packs
//! the frequency, net ship flow swings the phase.
//!
//! The mapping is a pure function — no randomness, no clock — so an exported
//! asset can be regenerated exactly from the parameters recorded in its
//! metadata.
//!
//! Readings outside their nominal domain (tide beyond -2..+4 mAOD, more
//! than 20 vessels) are not clamped: they scale the output past its nominal
//! band, which reads as more extreme visuals, not an error.

use crate::Reading;
use std::f64::consts::TAU;

/// Lower edge of the nominal tide domain, mAOD
const TIDAL_LEVEL_FLOOR: f64 = -2.0;
/// Width of the nominal tide domain, meters
const TIDAL_LEVEL_SPAN: f64 = 6.0;

/// Nominal half-range of ship flow used for normalization
const FLOW_HALF_RANGE: f64 = 10.0;
/// Vessel count that maps to full activity
const ACTIVITY_FULL_SCALE: f64 = 20.0;

/// The (amplitude, frequency, phase) triple controlling a sinusoidal line
/// distortion.
///
/// Amplitude is a pixel offset magnitude, frequency counts full sine cycles
/// across a line's length, and phase (radians) is added to every sample's
/// angular argument. Recomputed on every render; no independent lifecycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveParams {
    pub amplitude: f64,
    pub frequency: f64,
    pub phase: f64,
}

/// Derive wave parameters from a reading and the base sliders.
///
/// With no reading the sliders pass through unchanged — no data means no
/// distortion beyond what the user dialed in. With a tidal reading the
/// level is normalized over the -2..+4 mAOD band; with a ship reading the
/// net flow and total count drive the triple. Both mappings are monotonic
/// in their signal.
pub fn compute_wave_params(
    base_amplitude: f64,
    base_frequency: f64,
    reading: Option<&Reading>,
    base_phase: f64,
) -> WaveParams {
    match reading {
        None => WaveParams {
            amplitude: base_amplitude,
            frequency: base_frequency,
            phase: base_phase,
        },
        Some(Reading::Tidal(tidal)) => {
            let normalized = (tidal.level - TIDAL_LEVEL_FLOOR) / TIDAL_LEVEL_SPAN;
            WaveParams {
                // 50% of base at lowest tide, 100% at highest
                amplitude: base_amplitude * (0.5 + normalized * 0.5),
                frequency: base_frequency * (0.8 + normalized * 0.4),
                // one full rotation across the tidal range
                phase: base_phase + normalized * TAU,
            }
        }
        Some(Reading::Ships(ships)) => {
            let flow_ratio = (ships.flow as f64 + FLOW_HALF_RANGE) / (FLOW_HALF_RANGE * 2.0);
            let activity = ships.total as f64 / ACTIVITY_FULL_SCALE;
            WaveParams {
                amplitude: base_amplitude * (0.5 + activity * 0.5),
                frequency: base_frequency * (0.5 + flow_ratio),
                phase: base_phase + flow_ratio * TAU,
            }
        }
    }
}

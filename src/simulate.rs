//! # Simulated Data Fallback
//!
//! Deterministic stand-ins for the live data sources, used whenever a fetch
//! fails and in development. Two generators live here:
//!
//! - [`simulated_tidal`]: a semidiurnal harmonic tide model (M2 + S2
//!   constituents) whose phase is tied to the real-time clock, so the
//!   simulated level advances the way a real tide does between runs
//! - [`simulated_ships`]: synthetic harbour traffic drawn from an injected
//!   random source, so tests can seed a fixed generator and production can
//!   pass thread-local entropy
//!
//! ## Model Characteristics
//!
//! The tide model trades accuracy for reliability: correct period (12.42 h
//! lunar, 12.00 h solar), plausible Harwich amplitudes in mAOD, no
//! meteorological effects. It exists so the grid always has a signal to
//! draw, not to predict water levels.

use crate::{Reading, ShipReading, TidalReading};
use chrono::{DateTime, Utc};
use rand::Rng;

/// Lunar M2 constituent amplitude for Harwich, meters
const A_M2: f64 = 1.52;
const P_M2_HRS: f64 = 12.42;

/// Solar S2 constituent amplitude for Harwich, meters
const A_S2: f64 = 0.43;
const P_S2_HRS: f64 = 12.00;

/// Moon transit to local high water at Harwich, hours
const LUNITIDAL_OFFSET_HRS: f64 = 0.8;

/// Mean water level relative to ordnance datum, meters
const MEAN_LEVEL_M: f64 = 0.4;

/// Largest simulated vessel count; keeps activity inside the nominal
/// mapping band (total / 20) most of the time
const MAX_SIMULATED_SHIPS: u32 = 16;

/// Generate a simulated tide gauge reading for the given instant.
/// If `now` is `None`, fall back to `Utc::now()`.
///
/// The level is the sum of the two constituents evaluated at `now`, so
/// repeated calls with the same instant are bit-identical.
pub fn simulated_tidal(now: Option<DateTime<Utc>>) -> TidalReading {
    let now = now.unwrap_or_else(Utc::now);
    let tau = std::f64::consts::TAU;

    // Real-time phase of each constituent
    let theta_m2 = ((now.timestamp() as f64 + LUNITIDAL_OFFSET_HRS * 3600.0)
        .rem_euclid(P_M2_HRS * 3600.0))
        / (P_M2_HRS * 3600.0)
        * tau;
    let theta_s2 =
        ((now.timestamp() as f64).rem_euclid(P_S2_HRS * 3600.0)) / (P_S2_HRS * 3600.0) * tau;

    let level = MEAN_LEVEL_M + A_M2 * theta_m2.sin() + A_S2 * theta_s2.sin();

    TidalReading {
        level,
        unit: "mAOD".to_string(),
        station: "Harwich (simulated)".to_string(),
        time: now,
        station_id: None,
        coordinates: None,
    }
}

/// Generate a simulated ship traffic snapshot for the given instant.
///
/// The count invariants (`arrivals + departures == total`,
/// `flow == arrivals - departures`) hold for every draw because the reading
/// goes through [`ShipReading::new`].
pub fn simulated_ships<R: Rng>(rng: &mut R, now: Option<DateTime<Utc>>) -> ShipReading {
    let now = now.unwrap_or_else(Utc::now);
    let total = rng.gen_range(0..=MAX_SIMULATED_SHIPS);
    let arrivals = rng.gen_range(0..=total);
    ShipReading::new(total, arrivals, now)
}

/// Convenience wrapper: a simulated tidal reading as a tagged [`Reading`].
pub fn simulated_tidal_reading(now: Option<DateTime<Utc>>) -> Reading {
    Reading::Tidal(simulated_tidal(now))
}

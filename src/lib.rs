//! # Tidegrid Core Library
//!
//! Procedural wavy-grid generation driven by real-world maritime data.
//! A timestamped [`Reading`] (tide level or ship traffic) is mapped onto the
//! amplitude, frequency, and phase of a sinusoidal distortion, which is then
//! applied to a regular grid of lines and exported as a vector or raster
//! asset with embedded provenance metadata.
//!
//! ## Data Flow
//!
//! 1. **Fetch**: [`data_source`] obtains a live tide reading (UK Environment
//!    Agency gauge) or falls back to the deterministic harmonic model in
//!    [`simulate`] — the caller never sees a fetch failure
//! 2. **Map**: [`wave::compute_wave_params`] turns the reading plus the base
//!    amplitude/frequency sliders into a concrete [`wave::WaveParams`]
//! 3. **Render**: [`grid::render_grid`] samples a wavy polyline for every
//!    horizontal and vertical grid line
//! 4. **Export**: [`export`] serializes the line set to SVG (metadata
//!    embedded) or PNG (metadata in a same-stem companion file)
//!
//! ## Determinism
//!
//! Everything between the reading and the serialized geometry is a pure
//! function: identical inputs yield bit-identical wave parameters and paths.
//! This is what makes an exported asset reproducible from the metadata it
//! carries. The only non-deterministic steps are the wall-clock export
//! timestamp and the random component of the asset id, and both sit behind
//! seams that tests can pin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod config;
pub mod data_source;
pub mod export;
pub mod grid;
pub mod metadata;
pub mod path;
pub mod preview;
pub mod simulate;
pub mod wave;

/// A tide gauge reading: water level relative to ordnance datum.
///
/// Levels at UK east-coast stations typically sit in the -2..+4 mAOD band.
/// Out-of-band levels are carried through unchanged — downstream mapping
/// performs no clamping, so extreme readings produce extreme visuals rather
/// than errors.
///
/// # Example
/// ```
/// use chrono::Utc;
/// use tidegrid::TidalReading;
///
/// let reading = TidalReading {
///     level: 1.0,
///     unit: "mAOD".to_string(),
///     station: "Harwich".to_string(),
///     time: Utc::now(),
///     station_id: None,
///     coordinates: None,
/// };
/// assert_eq!(reading.unit, "mAOD");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TidalReading {
    /// Water level in meters above ordnance datum (signed)
    pub level: f64,
    /// Measurement unit label, e.g. "mAOD"
    pub unit: String,
    /// Human-readable station name
    pub station: String,
    /// Instant the gauge recorded this level
    #[serde(rename = "timestamp")]
    pub time: DateTime<Utc>,
    /// Gauge station identifier, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_id: Option<String>,
    /// Station position, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

/// Latitude/longitude of a gauge station in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A snapshot of harbour ship traffic.
///
/// The counts always satisfy `arrivals + departures == total` and
/// `flow == arrivals - departures`; construct through [`ShipReading::new`]
/// to keep those invariants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShipReading {
    /// Total vessels in the snapshot
    pub total: u32,
    /// Vessels inbound
    pub arrivals: u32,
    /// Vessels outbound (`total - arrivals`)
    pub departures: u32,
    /// Net traffic direction (`arrivals - departures`, signed)
    pub flow: i32,
    /// Instant the snapshot was taken
    #[serde(rename = "timestamp")]
    pub time: DateTime<Utc>,
}

impl ShipReading {
    /// Build a consistent reading from a total count and its inbound share.
    ///
    /// # Panics
    /// Panics if `arrivals > total`; callers generate both numbers, so this
    /// indicates a programming error rather than bad external data.
    pub fn new(total: u32, arrivals: u32, time: DateTime<Utc>) -> Self {
        assert!(
            arrivals <= total,
            "arrivals ({arrivals}) exceed total ({total})"
        );
        let departures = total - arrivals;
        ShipReading {
            total,
            arrivals,
            departures,
            flow: arrivals as i32 - departures as i32,
            time,
        }
    }
}

/// A timestamped real-world measurement that drives the grid distortion.
///
/// The serialized form carries a `type` tag (`"tidal"` or `"ships"`), which
/// is also the discriminator used when a reading is embedded in exported
/// asset metadata. Adding a variant forces every mapping site to be
/// revisited — the match in [`wave::compute_wave_params`] is exhaustive on
/// purpose.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Reading {
    Tidal(TidalReading),
    Ships(ShipReading),
}

impl Reading {
    /// Instant the underlying measurement was taken.
    pub fn time(&self) -> DateTime<Utc> {
        match self {
            Reading::Tidal(t) => t.time,
            Reading::Ships(s) => s.time,
        }
    }
}

//! # Live Data Fetching and Caching
//!
//! Obtains the [`Reading`] that drives a render. Tide levels come from the
//! UK Environment Agency flood-monitoring API (latest reading for a
//! configured station); ship traffic has no live feed and is always
//! simulated.
//!
//! ## Fallback Contract
//!
//! The public entry points never fail. Any fetch problem — network, HTTP
//! status, missing payload, stale cache — ends in the deterministic
//! harmonic model from [`crate::simulate`], logged at warn level. The
//! renderer downstream never sees an error from this module.
//!
//! ## Caching
//!
//! Successful readings are cached as JSON in `/tmp` with a configurable
//! TTL (default 30 minutes), checked against the cache file's mtime. A
//! stale, missing, or corrupt cache silently falls through to a fresh
//! fetch; cache write failures are ignored.

use crate::config::StationConfig;
use crate::simulate;
use crate::{Reading, TidalReading};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::{fs, io, time::SystemTime};
use thiserror::Error;
use tracing::{info, warn};

/// Cache file location; /tmp clears on reboot
const CACHE: &str = "/tmp/tidegrid_reading.json";

/// EA flood-monitoring API base
const EA_API_BASE: &str = "https://environment.data.gov.uk/flood-monitoring";

/// Errors internal to the fetch pipeline. These never escape the module;
/// they select the fallback path and feed the warning log.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request failed (network, server, or protocol error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered but carried no usable reading
    #[error("no reading in API response")]
    MissingData,

    /// Cache file operations failed
    #[error("cache IO: {0}")]
    Cache(#[from] io::Error),
}

/// Latest-readings payload from the EA API. Only the fields the mapper
/// needs are modeled.
#[derive(Debug, Deserialize)]
struct EaResponse {
    items: Vec<EaItem>,
}

#[derive(Debug, Deserialize)]
struct EaItem {
    #[serde(rename = "dateTime")]
    date_time: DateTime<Utc>,
    value: f64,
}

/// Fetch the current tide reading for the configured station.
///
/// Cache-first: a fresh cached reading short-circuits the network call.
/// On any failure the harmonic simulation stands in, so this function
/// always produces a [`Reading`].
pub async fn current_tidal(station: &StationConfig) -> Reading {
    match fetch(station).await {
        Ok(reading) => Reading::Tidal(reading),
        Err(error) => {
            warn!(%error, "tide fetch failed, using simulated reading");
            simulate::simulated_tidal_reading(None)
        }
    }
}

/// Current ship traffic snapshot.
///
/// There is no live AIS feed; traffic is always simulated, through the
/// same infallible contract a live source would use.
pub fn current_ships() -> Reading {
    info!("no live ship feed configured, simulating traffic");
    Reading::Ships(simulate::simulated_ships(&mut rand::thread_rng(), None))
}

async fn fetch(station: &StationConfig) -> Result<TidalReading, FetchError> {
    let ttl_secs = station.cache_ttl_minutes * 60;

    // Try cache first
    if let Ok(reading) = load_cache(ttl_secs) {
        return Ok(reading);
    }

    // Cache miss or stale - fetch fresh data from the EA API
    let reading = fetch_latest(station).await?;

    // Save for future requests (ignore cache write failures)
    let _ = save_cache(&reading);

    Ok(reading)
}

/// Hit the latest-readings endpoint for the station and convert the
/// payload into a [`TidalReading`].
async fn fetch_latest(station: &StationConfig) -> Result<TidalReading, FetchError> {
    let url = format!("{EA_API_BASE}/id/stations/{}/readings?latest", station.id);

    let response = reqwest::get(&url).await?.error_for_status()?;
    let payload: EaResponse = response.json().await?;

    reading_from_response(payload, station)
}

/// Pure payload-to-reading conversion, split out for testability.
fn reading_from_response(
    payload: EaResponse,
    station: &StationConfig,
) -> Result<TidalReading, FetchError> {
    let item = payload.items.first().ok_or(FetchError::MissingData)?;
    if !item.value.is_finite() {
        return Err(FetchError::MissingData);
    }

    Ok(TidalReading {
        level: item.value,
        unit: "mAOD".to_string(),
        station: station.name.clone(),
        time: item.date_time,
        station_id: Some(station.id.clone()),
        coordinates: None,
    })
}

/// Load the cached reading if still within its TTL.
fn load_cache(ttl_secs: u64) -> Result<TidalReading, io::Error> {
    let meta = fs::metadata(CACHE)?;

    let age = SystemTime::now()
        .duration_since(meta.modified()?)
        .map_err(|_| io::Error::other("time error"))?
        .as_secs();

    if age > ttl_secs {
        return Err(io::Error::other("stale"));
    }

    let data = fs::read(CACHE)?;
    let reading = serde_json::from_slice(&data)?;

    Ok(reading)
}

/// Cache a freshly fetched reading. Failure is non-fatal.
fn save_cache(reading: &TidalReading) -> Result<(), io::Error> {
    let data = serde_json::to_vec(reading)?;
    fs::write(CACHE, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn harwich() -> StationConfig {
        Config::default().station
    }

    #[test]
    fn parses_ea_latest_reading_payload() {
        let payload: EaResponse = serde_json::from_str(
            r#"{
                "items": [
                    {"dateTime": "2025-06-01T10:30:00Z", "value": 1.42, "measure": "ignored"}
                ]
            }"#,
        )
        .unwrap();

        let reading = reading_from_response(payload, &harwich()).unwrap();
        assert_eq!(reading.level, 1.42);
        assert_eq!(reading.station, "Harwich");
        assert_eq!(reading.station_id.as_deref(), Some("E71539"));
        assert_eq!(reading.unit, "mAOD");
        assert_eq!(
            reading.time.to_rfc3339(),
            "2025-06-01T10:30:00+00:00"
        );
    }

    #[test]
    fn empty_payload_is_missing_data() {
        let payload: EaResponse = serde_json::from_str(r#"{"items": []}"#).unwrap();
        let err = reading_from_response(payload, &harwich()).unwrap_err();
        assert!(matches!(err, FetchError::MissingData));
    }

    #[test]
    fn non_finite_level_is_rejected() {
        let payload = EaResponse {
            items: vec![EaItem {
                date_time: Utc::now(),
                value: f64::NAN,
            }],
        };
        let err = reading_from_response(payload, &harwich()).unwrap_err();
        assert!(matches!(err, FetchError::MissingData));
    }

    #[test]
    fn cache_roundtrip_preserves_reading() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let reading = TidalReading {
            level: 0.9,
            unit: "mAOD".to_string(),
            station: "Harwich".to_string(),
            time: Utc::now(),
            station_id: Some("E71539".to_string()),
            coordinates: None,
        };

        let data = serde_json::to_vec(&reading).unwrap();
        fs::write(temp_file.path(), data).unwrap();

        let loaded: TidalReading =
            serde_json::from_slice(&fs::read(temp_file.path()).unwrap()).unwrap();
        assert_eq!(loaded, reading);
    }

    #[test]
    fn simulated_ships_satisfy_the_reading_contract() {
        let reading = current_ships();
        match reading {
            Reading::Ships(s) => assert_eq!(s.arrivals + s.departures, s.total),
            Reading::Tidal(_) => panic!("ship fetch must produce a ship reading"),
        }
    }
}

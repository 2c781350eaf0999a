//! # Asset Provenance Metadata
//!
//! Builds the structured, versioned provenance record attached to every
//! exported asset: a fresh id, the export instant, the producing tool's
//! name and parameters, and an optional snapshot of the data-source reading
//! that drove the render.
//!
//! Everything here is a direct copy of its inputs except the id and the
//! export timestamp. Those two are the only non-deterministic parts, and
//! both accept injected values through [`create_asset_metadata_at`] so
//! tests can pin them.

use crate::Reading;
use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Metadata schema version recorded in every asset
pub const SCHEMA_VERSION: &str = "1.0";

/// Fallback creator when the caller doesn't supply one
const DEFAULT_CREATOR: &str = "Tidegrid";
/// Fallback license when the caller doesn't supply one
const DEFAULT_LICENSE: &str = "CC BY-NC 4.0";

/// Length of the random id suffix. Six alphanumerics give ~57 bits of
/// headroom combined with the millisecond component — collisions are
/// negligible at festival-tool volumes, though not cryptographically ruled
/// out.
const ID_SUFFIX_LEN: usize = 6;

/// Content classification attached to an exported asset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub content_type: String,
    pub tags: Vec<String>,
}

/// Provenance record for one exported asset.
///
/// Created once at export time and never mutated. Persisted either embedded
/// in the vector file or as a sibling JSON file; both serializations come
/// from the same value, so either one reconstructs it exactly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetMetadata {
    /// Globally unique asset id, generated at export time, never reused
    pub id: String,
    /// Producing tool's name
    pub app: String,
    /// Metadata schema version
    pub version: String,
    /// Export instant (distinct from any data-source reading time)
    pub timestamp: DateTime<Utc>,
    pub creator: String,
    pub license: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxonomy: Option<Taxonomy>,
    /// The generating tool's inputs, carried opaquely
    pub parameters: serde_json::Value,
    /// Snapshot of the reading active at render time, when there was one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source: Option<Reading>,
}

/// Build a metadata record for an export happening now.
///
/// Uses the wall clock and thread-local entropy; see
/// [`create_asset_metadata_at`] for the deterministic variant.
pub fn create_asset_metadata(
    app: &str,
    parameters: serde_json::Value,
    data_source: Option<&Reading>,
    taxonomy: Option<Taxonomy>,
) -> AssetMetadata {
    create_asset_metadata_at(
        app,
        parameters,
        data_source,
        taxonomy,
        DEFAULT_CREATOR,
        DEFAULT_LICENSE,
        Utc::now(),
        &mut rand::thread_rng(),
    )
}

/// Build a metadata record with every non-deterministic input supplied.
///
/// `now` becomes both the export timestamp and the time component of the
/// id; `rng` feeds the id's random suffix. Apart from id and timestamp the
/// record is a field-for-field copy of its arguments.
#[allow(clippy::too_many_arguments)]
pub fn create_asset_metadata_at<R: Rng>(
    app: &str,
    parameters: serde_json::Value,
    data_source: Option<&Reading>,
    taxonomy: Option<Taxonomy>,
    creator: &str,
    license: &str,
    now: DateTime<Utc>,
    rng: &mut R,
) -> AssetMetadata {
    AssetMetadata {
        id: asset_id(app, now, rng),
        app: app.to_string(),
        version: SCHEMA_VERSION.to_string(),
        timestamp: now,
        creator: creator.to_string(),
        license: license.to_string(),
        taxonomy,
        parameters,
        data_source: data_source.cloned(),
    }
}

/// Generate a namespaced asset id: `{app-slug}-{unix millis}-{suffix}`.
fn asset_id<R: Rng>(app: &str, now: DateTime<Utc>, rng: &mut R) -> String {
    let slug: String = app
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let suffix: String = rng
        .sample_iter(&Alphanumeric)
        .take(ID_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{slug}-{}-{suffix}", now.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TidalReading;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use serde_json::json;

    fn reading_at(time: DateTime<Utc>) -> Reading {
        Reading::Tidal(TidalReading {
            level: 0.8,
            unit: "mAOD".to_string(),
            station: "Harwich".to_string(),
            time,
            station_id: None,
            coordinates: None,
        })
    }

    #[test]
    fn id_carries_slug_time_and_suffix() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let id = asset_id("Grid Generator", now, &mut rng);

        assert!(id.starts_with("grid-generator-"));
        let rest = id.trim_start_matches("grid-generator-");
        let (millis, suffix) = rest.split_once('-').unwrap();
        assert_eq!(millis, now.timestamp_millis().to_string());
        assert_eq!(suffix.len(), ID_SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn repeated_calls_produce_fresh_ids() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let a = asset_id("tide-table", now, &mut rng);
        let b = asset_id("tide-table", now, &mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn snapshot_keeps_its_own_timestamp() {
        let reading_time = Utc.with_ymd_and_hms(2025, 6, 1, 10, 30, 0).unwrap();
        let export_time = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let reading = reading_at(reading_time);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let metadata = create_asset_metadata_at(
            "tide-table",
            json!({"baseAmplitude": 15.0}),
            Some(&reading),
            None,
            "Festival",
            "CC0",
            export_time,
            &mut rng,
        );

        assert_eq!(metadata.timestamp, export_time);
        assert_eq!(metadata.data_source.as_ref().unwrap().time(), reading_time);
        assert_ne!(metadata.timestamp, metadata.data_source.as_ref().unwrap().time());
    }

    #[test]
    fn parameters_are_copied_opaquely() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let parameters = json!({
            "baseAmplitude": 15.0,
            "gridSize": 12,
            "palette": "harbour",
            "nested": {"anything": [1, 2, 3]}
        });

        let metadata = create_asset_metadata_at(
            "social-generator",
            parameters.clone(),
            None,
            Some(Taxonomy {
                content_type: "social-tile".to_string(),
                tags: vec!["festival".to_string(), "tide".to_string()],
            }),
            "Festival",
            "CC0",
            now,
            &mut rng,
        );

        assert_eq!(metadata.parameters, parameters);
        assert_eq!(metadata.version, SCHEMA_VERSION);
        assert!(metadata.data_source.is_none());
    }

    #[test]
    fn metadata_roundtrips_through_json() {
        let reading_time = Utc.with_ymd_and_hms(2025, 6, 1, 10, 30, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let metadata = create_asset_metadata_at(
            "grid-generator",
            json!({"baseFrequency": 2.0}),
            Some(&reading_at(reading_time)),
            None,
            "Festival",
            "CC BY-NC 4.0",
            now,
            &mut rng,
        );

        let json = serde_json::to_string(&metadata).unwrap();
        let back: AssetMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, metadata);
    }
}

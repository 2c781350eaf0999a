//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the
//! tidegrid.toml file. It provides a centralized way to configure the tide
//! gauge station, grid geometry defaults, and export options.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Application configuration loaded from tidegrid.toml
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Tide gauge station configuration
    pub station: StationConfig,
    /// Grid geometry defaults
    pub grid: GridConfig,
    /// Export options
    pub export: ExportConfig,
}

/// Environment Agency tide gauge station configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct StationConfig {
    /// EA measurement station ID (e.g. "E71539" for Harwich)
    pub id: String,
    /// Human-readable station name for reference
    pub name: String,
    /// Reading cache TTL in minutes
    pub cache_ttl_minutes: u64,
}

/// Grid geometry and wave-slider defaults
#[derive(Debug, Deserialize, Serialize)]
pub struct GridConfig {
    /// Cells per axis (the grid draws size + 1 lines each way)
    pub size: u32,
    /// Rendering area width in pixels
    pub width: f64,
    /// Rendering area height in pixels
    pub height: f64,
    /// Base wave amplitude slider, in pixels of offset
    pub base_amplitude: f64,
    /// Base wave frequency slider, in cycles per line
    pub base_frequency: f64,
    /// Samples per line (more segments, smoother curve)
    pub segments: u32,
}

/// Export and provenance options
#[derive(Debug, Deserialize, Serialize)]
pub struct ExportConfig {
    /// Directory exported assets are written into
    pub output_dir: String,
    /// Stroke width for SVG paths, in pixels
    pub stroke_width: f64,
    /// Creator recorded in asset metadata
    pub creator: String,
    /// License recorded in asset metadata
    pub license: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            station: StationConfig {
                id: "E71539".to_string(),
                name: "Harwich".to_string(),
                cache_ttl_minutes: 30,
            },
            grid: GridConfig {
                size: 12,
                width: 800.0,
                height: 800.0,
                base_amplitude: 15.0,
                base_frequency: 2.0,
                segments: 60,
            },
            export: ExportConfig {
                output_dir: ".".to_string(),
                stroke_width: 1.5,
                creator: "Tidegrid".to_string(),
                license: "CC BY-NC 4.0".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from tidegrid.toml file.
    /// Falls back to default configuration if the file doesn't exist or is invalid.
    pub fn load() -> Self {
        Self::load_from_path("tidegrid.toml")
    }

    /// Load configuration from the specified path.
    /// Falls back to default configuration if the file doesn't exist or is invalid.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(station = %config.station.name, "loaded configuration");
                    config
                }
                Err(e) => {
                    warn!("invalid config file format: {e}");
                    warn!("using default configuration (Harwich)");
                    Self::default()
                }
            },
            Err(_) => {
                info!("no config file found, using default configuration (Harwich)");
                Self::default()
            }
        }
    }

    /// Save current configuration to tidegrid.toml
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        fs::write("tidegrid.toml", contents)?;
        info!("configuration saved to tidegrid.toml");
        Ok(())
    }
}

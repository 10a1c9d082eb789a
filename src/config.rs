//! # Simulator Configuration
//!
//! Every section is optional; an empty document (or no document at all)
//! yields the built-in constants the simulator was designed around: a
//! 220 mm square bed rendered at 10 pixels per millimetre.
//!
//! ## Example: TOML Configuration
//!
//! ```toml
//! [simulation]
//! gcode = "CE3E3V2_xyzCalibration_cube.gcode"
//! output_dir = "img"
//! flush_final_layer = false
//!
//! [bed]
//! size_mm = 220.0
//! pixels_per_mm = 10.0
//!
//! [render]
//! intensity = 255
//! jpeg_quality = 100
//! ```
//!
//! ## Example: Rust Usage
//!
//! ```rust
//! use gcode_layer_sim::config::Config;
//! let config: Config = toml::from_str("[bed]\nsize_mm = 100.0").unwrap();
//! assert_eq!(config.bed.canvas_size(), 1000);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration for a simulator run.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub bed: BedConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Input program and output location.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    #[serde(default = "default_gcode")]
    pub gcode: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Capture whatever is left on the canvas when the input ends.
    #[serde(default)]
    pub flush_final_layer: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gcode: default_gcode(),
            output_dir: default_output_dir(),
            flush_final_layer: false,
        }
    }
}

/// Physical bed geometry. The canvas is square.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BedConfig {
    #[serde(default = "default_bed_size")]
    pub size_mm: f64,
    #[serde(default = "default_pixels_per_mm")]
    pub pixels_per_mm: f64,
}

impl Default for BedConfig {
    fn default() -> Self {
        Self {
            size_mm: default_bed_size(),
            pixels_per_mm: default_pixels_per_mm(),
        }
    }
}

impl BedConfig {
    /// Canvas edge length in pixels.
    pub fn canvas_size(&self) -> usize {
        (self.size_mm * self.pixels_per_mm).round().max(0.0) as usize
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RenderConfig {
    /// Foreground value written for every extruding move.
    #[serde(default = "default_intensity")]
    pub intensity: u8,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            intensity: default_intensity(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.bed.size_mm > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "bed.size_mm must be positive, got {}",
                self.bed.size_mm
            )));
        }
        if !(self.bed.pixels_per_mm > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "bed.pixels_per_mm must be positive, got {}",
                self.bed.pixels_per_mm
            )));
        }
        if self.bed.canvas_size() == 0 {
            return Err(ConfigError::Invalid("bed resolves to an empty canvas".to_string()));
        }
        if !(1..=100).contains(&self.render.jpeg_quality) {
            return Err(ConfigError::Invalid(format!(
                "render.jpeg_quality must be within 1..=100, got {}",
                self.render.jpeg_quality
            )));
        }
        Ok(())
    }
}

fn default_gcode() -> PathBuf {
    PathBuf::from("CE3E3V2_xyzCalibration_cube.gcode")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("img")
}
fn default_bed_size() -> f64 {
    220.0
}
fn default_pixels_per_mm() -> f64 {
    10.0
}
fn default_intensity() -> u8 {
    255
}
fn default_jpeg_quality() -> u8 {
    100
}

/// Load and validate a configuration file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_uses_builtin_constants() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.simulation.gcode, PathBuf::from("CE3E3V2_xyzCalibration_cube.gcode"));
        assert_eq!(config.simulation.output_dir, PathBuf::from("img"));
        assert!(!config.simulation.flush_final_layer);
        assert_eq!(config.bed.canvas_size(), 2200);
        assert_eq!(config.render.intensity, 255);
        assert_eq!(config.render.jpeg_quality, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config: Config = toml::from_str("[bed]\npixels_per_mm = 5.0\n").unwrap();
        assert_eq!(config.bed.size_mm, 220.0);
        assert_eq!(config.bed.canvas_size(), 1100);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.bed.size_mm = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.bed.pixels_per_mm = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.render.jpeg_quality = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[simulation]\ngcode = \"cube.gcode\"\nflush_final_layer = true").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.simulation.gcode, PathBuf::from("cube.gcode"));
        assert!(config.simulation.flush_final_layer);
    }

    #[test]
    fn test_load_config_reports_toml_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[bed\nsize_mm = 1").unwrap();
        assert!(matches!(load_config(file.path()), Err(ConfigError::Toml(_))));
    }
}

//! Configuration for the geoar overlay engine.
//!
//! Settings are read from a `geoar.toml` file. Every field has a default equal
//! to the reference behavior, so an empty file (or no file at all) yields a
//! working configuration.
//!
//! Lookup order used by [`GeoArConfig::load`]:
//! 1. an explicit path passed by the caller
//! 2. the `GEOAR_CONFIG` environment variable
//! 3. `geoar.toml` in the platform config directory
//! 4. built-in defaults

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "GEOAR_CONFIG";

/// File name looked up in the platform config directory
pub const CONFIG_FILE_NAME: &str = "geoar.toml";

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Which relative bearing counts as "straight ahead" for the projector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForwardReference {
    /// Items are centered when their relative bearing is 180°
    #[default]
    Reverse,
    /// Items are centered when their relative bearing is 0°
    Heading,
}

/// Orientation smoothing strategy applied before projection
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SmoothingConfig {
    /// Raw samples, last write wins
    #[default]
    None,
    /// Exponential moving average, `alpha` in (0, 1]
    Ema { alpha: f64 },
    /// Ignore changes smaller than `degrees`
    DeadBand { degrees: f64 },
}

/// On-screen overlay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Radius in meters for on-screen items
    pub radius_m: f64,
    /// Keep only the closest N items
    pub max_items: Option<usize>,
    /// Horizontal field of view in degrees
    pub fov_degrees: f64,
    pub forward_reference: ForwardReference,
    /// Skip bearing-dependent layout until a real orientation sample arrives
    pub hide_when_heading_unknown: bool,
    /// Target render loop rate in frames per second
    pub frame_rate: u32,
    /// Opaque high-contrast bubbles for bright outdoor light
    pub high_contrast: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            radius_m: 1000.0,
            max_items: None,
            fov_degrees: 60.0,
            forward_reference: ForwardReference::Reverse,
            hide_when_heading_unknown: true,
            frame_rate: 60,
            high_contrast: false,
        }
    }
}

/// Message bubble geometry in pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleConfig {
    pub max_width: f32,
    /// Inner padding on each side
    pub padding: f32,
    /// Line height as a multiple of the font size
    pub line_spacing: f32,
    /// Room reserved above the content for the author row
    pub header_space: f32,
    pub corner_radius: f32,
    /// Edge length of the bearing indicator triangle
    pub indicator_size: f32,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            max_width: 250.0,
            padding: 10.0,
            line_spacing: 1.25,
            header_space: 22.0,
            corner_radius: 12.0,
            indicator_size: 10.0,
        }
    }
}

/// Orientation tracking settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrientationConfig {
    pub smoothing: SmoothingConfig,
}

/// Paired-device synchronization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Radius in meters for items sent to the device
    pub radius_m: f64,
    pub max_items: Option<usize>,
    /// How often the pending batch is flushed (in seconds)
    pub flush_interval_secs: u64,
    /// How often the observer position is re-checked (in seconds)
    pub movement_check_secs: u64,
    /// Displacement in meters that forces a resync
    pub movement_threshold_m: f64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            radius_m: 500.0,
            max_items: None,
            flush_interval_secs: 5,
            movement_check_secs: 30,
            movement_threshold_m: 150.0,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoArConfig {
    pub overlay: OverlayConfig,
    pub bubble: BubbleConfig,
    pub orientation: OrientationConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
}

impl GeoArConfig {
    /// Load configuration following the documented lookup order
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::from_file(Path::new(&path));
        }

        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read and validate a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Platform config location (`~/.config/geoar/geoar.toml` on Linux)
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "geoar").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        let overlay = &self.overlay;
        if !(overlay.radius_m > 0.0) {
            return Err(ConfigError::Invalid("overlay.radius_m must be positive".into()));
        }
        if !(overlay.fov_degrees > 0.0 && overlay.fov_degrees <= 360.0) {
            return Err(ConfigError::Invalid(
                "overlay.fov_degrees must be in (0, 360]".into(),
            ));
        }
        if overlay.frame_rate == 0 {
            return Err(ConfigError::Invalid("overlay.frame_rate must be non-zero".into()));
        }

        let bubble = &self.bubble;
        if !(bubble.max_width > 2.0 * bubble.padding) {
            return Err(ConfigError::Invalid(
                "bubble.max_width must exceed twice the padding".into(),
            ));
        }
        if !(bubble.line_spacing > 0.0) {
            return Err(ConfigError::Invalid("bubble.line_spacing must be positive".into()));
        }

        match self.orientation.smoothing {
            SmoothingConfig::Ema { alpha } if !(alpha > 0.0 && alpha <= 1.0) => {
                return Err(ConfigError::Invalid(
                    "orientation.smoothing.alpha must be in (0, 1]".into(),
                ));
            }
            SmoothingConfig::DeadBand { degrees } if !(degrees >= 0.0) => {
                return Err(ConfigError::Invalid(
                    "orientation.smoothing.degrees must not be negative".into(),
                ));
            }
            _ => {}
        }

        let sync = &self.sync;
        if !(sync.radius_m > 0.0) {
            return Err(ConfigError::Invalid("sync.radius_m must be positive".into()));
        }
        if sync.flush_interval_secs == 0 || sync.movement_check_secs == 0 {
            return Err(ConfigError::Invalid("sync intervals must be non-zero".into()));
        }
        if !(sync.movement_threshold_m >= 0.0) {
            return Err(ConfigError::Invalid(
                "sync.movement_threshold_m must not be negative".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_reference_values() {
        let config = GeoArConfig::default();
        assert_eq!(config.overlay.radius_m, 1000.0);
        assert_eq!(config.overlay.fov_degrees, 60.0);
        assert_eq!(config.overlay.forward_reference, ForwardReference::Reverse);
        assert!(!config.overlay.high_contrast);
        assert_eq!(config.bubble.max_width, 250.0);
        assert_eq!(config.sync.radius_m, 500.0);
        assert_eq!(config.sync.flush_interval_secs, 5);
        assert_eq!(config.sync.movement_check_secs, 30);
        assert_eq!(config.sync.movement_threshold_m, 150.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = GeoArConfig::from_toml_str(
            r#"
            [overlay]
            radius_m = 750.0
            forward_reference = "heading"

            [orientation.smoothing]
            kind = "ema"
            alpha = 0.3
            "#,
        )
        .unwrap();

        assert_eq!(config.overlay.radius_m, 750.0);
        assert_eq!(config.overlay.forward_reference, ForwardReference::Heading);
        assert_eq!(config.overlay.fov_degrees, 60.0);
        assert_eq!(config.orientation.smoothing, SmoothingConfig::Ema { alpha: 0.3 });
        assert_eq!(config.sync, SyncConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = GeoArConfig::from_toml_str("[sync]\nflush_interval_secs = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = GeoArConfig::from_toml_str(
            "[orientation.smoothing]\nkind = \"ema\"\nalpha = 1.5",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = GeoArConfig::from_toml_str("[overlay]\nfov_degrees = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_error_reports_path() {
        let err = GeoArConfig::from_toml_str("[overlay\nradius_m = ").unwrap_err();
        assert!(err.to_string().contains("<inline>"));
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sync]\nradius_m = 250.0\nmax_items = 10").unwrap();

        let config = GeoArConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.sync.radius_m, 250.0);
        assert_eq!(config.sync.max_items, Some(10));
    }

    #[test]
    fn test_missing_explicit_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GeoArConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}

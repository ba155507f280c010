//! Sync driver settings

use std::time::Duration;

use geoar_config::SyncConfig;

/// Runtime settings for the device sync path
#[derive(Debug, Clone, PartialEq)]
pub struct SyncSettings {
    /// Radius in meters for items sent to the device
    pub radius_m: f64,
    pub max_items: Option<usize>,
    pub flush_interval: Duration,
    pub movement_check_interval: Duration,
    pub movement_threshold_m: f64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self::from(&SyncConfig::default())
    }
}

impl From<&SyncConfig> for SyncSettings {
    fn from(config: &SyncConfig) -> Self {
        Self {
            radius_m: config.radius_m,
            max_items: config.max_items,
            flush_interval: Duration::from_secs(config.flush_interval_secs),
            movement_check_interval: Duration::from_secs(config.movement_check_secs),
            movement_threshold_m: config.movement_threshold_m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_constants() {
        let settings = SyncSettings::default();
        assert_eq!(settings.radius_m, 500.0);
        assert_eq!(settings.flush_interval, Duration::from_secs(5));
        assert_eq!(settings.movement_check_interval, Duration::from_secs(30));
        assert_eq!(settings.movement_threshold_m, 150.0);
    }
}

//! Game tuning constants.
//!
//! Every number the rules depend on lives in [`GameConfig`]. The defaults
//! reproduce the shipped game; a JSON file can override any subset of them
//! (missing fields keep their defaults).
//!
//! ```
//! use ecohavoc_logic::config::GameConfig;
//!
//! let cfg: GameConfig = serde_json::from_str(r#"{ "start_credits": 1000 }"#).unwrap();
//! assert_eq!(cfg.start_credits, 1000);
//! assert_eq!(cfg.collect_radius, 5.0);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to load a configuration override file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // Starting progression
    pub start_credits: u64,
    pub start_level: u32,
    pub start_xp_next: u64,
    pub start_pollution: f32,
    pub start_skill_points: u32,
    pub start_district: usize,

    // XP
    /// Threshold multiplier applied on each level-up (floored).
    pub xp_growth: f64,
    pub xp_correct_sort: u64,
    pub xp_world_collect: u64,
    pub xp_asset_built: u64,

    // World
    pub collect_radius: f32,
    /// Radius of the auto-detect nearby scanner.
    pub scan_radius: f32,
    pub walk_speed: f32,
    pub boosted_walk_speed: f32,
    /// Player is clamped to `[-world_bound, world_bound]` on both axes.
    pub world_bound: f32,
    pub eye_height: f32,
    /// Waste spawns within `[-spawn_half_extent, spawn_half_extent]`.
    pub spawn_half_extent: f32,
    pub look_sensitivity: f32,
    pub pitch_limit: f32,

    // Timers (seconds)
    pub income_interval: f32,
    pub income_per_bank: u64,
    pub creep_interval: f32,
    pub creep_amount: f32,
    pub respawn_delay: f32,
    pub minimap_interval: f32,
    pub ticker_interval: f32,

    /// Added to a district's cleanliness each time it is fully cleared.
    pub district_clean_step: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start_credits: 500,
            start_level: 1,
            start_xp_next: 100,
            start_pollution: 70.0,
            start_skill_points: 2,
            start_district: 0,

            xp_growth: 1.5,
            xp_correct_sort: 15,
            xp_world_collect: 10,
            xp_asset_built: 20,

            collect_radius: 5.0,
            scan_radius: 20.0,
            walk_speed: 8.0,
            boosted_walk_speed: 11.0,
            world_bound: 90.0,
            eye_height: 2.0,
            spawn_half_extent: 50.0,
            look_sensitivity: 0.002,
            pitch_limit: std::f32::consts::FRAC_PI_3,

            // 300 and 600 frames at 60 fps
            income_interval: 5.0,
            income_per_bank: 50,
            creep_interval: 10.0,
            creep_amount: 0.5,
            respawn_delay: 2.0,
            minimap_interval: 1.0 / 6.0,
            ticker_interval: 4.0,

            district_clean_step: 20,
        }
    }
}

impl GameConfig {
    /// Load overrides from a JSON file on top of the defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the world loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("income_interval", self.income_interval),
            ("creep_interval", self.creep_interval),
            ("minimap_interval", self.minimap_interval),
            ("ticker_interval", self.ticker_interval),
            ("spawn_half_extent", self.spawn_half_extent),
            ("world_bound", self.world_bound),
            ("collect_radius", self.collect_radius),
            ("scan_radius", self.scan_radius),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if self.respawn_delay.is_nan() || self.respawn_delay < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "respawn_delay must not be negative, got {}",
                self.respawn_delay
            )));
        }
        if self.xp_growth.is_nan() || self.xp_growth < 1.0 {
            return Err(ConfigError::Invalid(format!(
                "xp_growth must be at least 1.0, got {}",
                self.xp_growth
            )));
        }
        if self.start_xp_next == 0 {
            return Err(ConfigError::Invalid("start_xp_next must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_game() {
        let c = GameConfig::default();
        assert_eq!(c.start_credits, 500);
        assert_eq!(c.start_xp_next, 100);
        assert!((c.start_pollution - 70.0).abs() < f32::EPSILON);
        assert_eq!(c.start_skill_points, 2);
        assert!((c.collect_radius - 5.0).abs() < f32::EPSILON);
        assert!((c.pitch_limit - std::f32::consts::PI / 3.0).abs() < 1e-6);
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let c = GameConfig::from_json_str(r#"{"walk_speed": 12.5, "respawn_delay": 0.5}"#).unwrap();
        assert!((c.walk_speed - 12.5).abs() < f32::EPSILON);
        assert!((c.respawn_delay - 0.5).abs() < f32::EPSILON);
        assert_eq!(c.income_per_bank, 50);
    }

    #[test]
    fn bad_json_is_parse_error() {
        let err = GameConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn non_positive_intervals_rejected() {
        for field in ["income_interval", "creep_interval", "minimap_interval", "ticker_interval"] {
            let err = GameConfig::from_json_str(&format!(r#"{{"{field}": 0.0}}"#)).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(ref m) if m.contains(field)), "{field}");
        }
    }

    #[test]
    fn non_positive_extents_and_radii_rejected() {
        for field in ["spawn_half_extent", "world_bound", "collect_radius", "scan_radius"] {
            let err = GameConfig::from_json_str(&format!(r#"{{"{field}": -1.0}}"#)).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(ref m) if m.contains(field)), "{field}");
        }
    }

    #[test]
    fn negative_respawn_delay_rejected_zero_allowed() {
        let err = GameConfig::from_json_str(r#"{"respawn_delay": -0.5}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let c = GameConfig::from_json_str(r#"{"respawn_delay": 0.0}"#).unwrap();
        assert_eq!(c.respawn_delay, 0.0);
    }

    #[test]
    fn shrinking_xp_growth_rejected() {
        let err = GameConfig::from_json_str(r#"{"xp_growth": 0.9}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref m) if m.contains("xp_growth")));
        assert!(GameConfig::from_json_str(r#"{"xp_growth": 1.0}"#).is_ok());
    }

    #[test]
    fn zero_xp_threshold_rejected() {
        let err = GameConfig::from_json_str(r#"{"start_xp_next": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GameConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}

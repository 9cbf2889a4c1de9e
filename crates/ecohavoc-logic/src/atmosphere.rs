//! Pollution-driven atmosphere: sky tint, fog density, smog overlay.
//!
//! Everything here is a pure function of the world pollution metric. The
//! renderer recomputes it whenever pollution changes; nothing is stored.

use serde::{Deserialize, Serialize};

/// Fog density at zero pollution.
pub const BASE_FOG_DENSITY: f32 = 0.012;
/// Extra fog density at full pollution.
pub const FOG_DENSITY_RANGE: f32 = 0.018;
/// Smog particle opacity at full pollution.
pub const MAX_SMOG_OPACITY: f32 = 0.6;

const SMOG_TINT_DIRTY: u32 = 0x554400;
const SMOG_TINT_CLEAN: u32 = 0x004400;

/// Derived atmosphere parameters for one pollution value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Atmosphere {
    /// Sky and fog color as 8-bit RGB.
    pub sky_rgb: [u8; 3],
    pub fog_density: f32,
    pub smog_opacity: f32,
    /// Smog particle color (0xRRGGBB).
    pub smog_tint: u32,
}

impl Atmosphere {
    /// Map pollution in `[0, 100]` to atmosphere. Out-of-range input is clamped.
    pub fn from_pollution(pollution: f32) -> Self {
        let p = (pollution / 100.0).clamp(0.0, 1.0);
        let r = (p * 25.0).floor() as u8;
        let g = ((1.0 - p) * 20.0 + 5.0).floor() as u8;
        let b = (p * 15.0).floor() as u8;
        Self {
            sky_rgb: [r, g, b],
            fog_density: BASE_FOG_DENSITY + p * FOG_DENSITY_RANGE,
            smog_opacity: p * MAX_SMOG_OPACITY,
            smog_tint: if p > 0.5 {
                SMOG_TINT_DIRTY
            } else {
                SMOG_TINT_CLEAN
            },
        }
    }

    /// Sky color as linear-ish floats in `[0, 1]` for renderers.
    pub fn sky_rgb_f32(&self) -> [f32; 3] {
        self.sky_rgb.map(|c| c as f32 / 255.0)
    }
}

/// HUD badge for world pollution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PollutionStatus {
    Clean,
    InProgress,
    Critical,
}

impl PollutionStatus {
    pub fn from_pollution(pollution: f32) -> Self {
        if pollution < 30.0 {
            PollutionStatus::Clean
        } else if pollution < 60.0 {
            PollutionStatus::InProgress
        } else {
            PollutionStatus::Critical
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PollutionStatus::Clean => "CLEAN",
            PollutionStatus::InProgress => "IN PROGRESS",
            PollutionStatus::Critical => "CRITICAL",
        }
    }
}

/// Status shown on a district card in the city panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistrictStatus {
    Locked,
    Clean,
    Critical,
    InProgress,
}

impl DistrictStatus {
    pub fn classify(unlocked: bool, clean: u8, base_pollution: u8) -> Self {
        if !unlocked {
            DistrictStatus::Locked
        } else if clean > 60 {
            DistrictStatus::Clean
        } else if base_pollution > 70 {
            DistrictStatus::Critical
        } else {
            DistrictStatus::InProgress
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DistrictStatus::Locked => "🔒 LOCKED",
            DistrictStatus::Clean => "✅ CLEAN",
            DistrictStatus::Critical => "☠️ CRITICAL",
            DistrictStatus::InProgress => "⚠️ IN PROGRESS",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_sky_is_green() {
        let a = Atmosphere::from_pollution(0.0);
        assert_eq!(a.sky_rgb, [0, 25, 0]);
        assert!((a.fog_density - 0.012).abs() < 1e-6);
        assert_eq!(a.smog_opacity, 0.0);
        assert_eq!(a.smog_tint, 0x004400);
    }

    #[test]
    fn toxic_sky_is_brown() {
        let a = Atmosphere::from_pollution(100.0);
        assert_eq!(a.sky_rgb, [25, 5, 15]);
        assert!((a.fog_density - 0.030).abs() < 1e-6);
        assert!((a.smog_opacity - 0.6).abs() < 1e-6);
        assert_eq!(a.smog_tint, 0x554400);
    }

    #[test]
    fn starting_pollution() {
        let a = Atmosphere::from_pollution(70.0);
        assert_eq!(a.sky_rgb, [17, 11, 10]);
        assert_eq!(a.smog_tint, 0x554400);
    }

    #[test]
    fn fog_is_monotonic() {
        let mut prev = 0.0;
        for p in 0..=100 {
            let d = Atmosphere::from_pollution(p as f32).fog_density;
            assert!(d >= prev);
            prev = d;
        }
    }

    #[test]
    fn out_of_range_clamped() {
        assert_eq!(
            Atmosphere::from_pollution(-20.0),
            Atmosphere::from_pollution(0.0)
        );
        assert_eq!(
            Atmosphere::from_pollution(250.0),
            Atmosphere::from_pollution(100.0)
        );
    }

    #[test]
    fn hud_badge_thresholds() {
        assert_eq!(PollutionStatus::from_pollution(29.9), PollutionStatus::Clean);
        assert_eq!(PollutionStatus::from_pollution(30.0), PollutionStatus::InProgress);
        assert_eq!(PollutionStatus::from_pollution(60.0), PollutionStatus::Critical);
    }

    #[test]
    fn district_card_status() {
        assert_eq!(DistrictStatus::classify(false, 100, 5), DistrictStatus::Locked);
        assert_eq!(DistrictStatus::classify(true, 80, 90), DistrictStatus::Clean);
        assert_eq!(DistrictStatus::classify(true, 20, 90), DistrictStatus::Critical);
        assert_eq!(DistrictStatus::classify(true, 60, 55), DistrictStatus::InProgress);
    }
}

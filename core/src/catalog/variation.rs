use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::prelude::{ConfigurationError, Rgb, Vec3};

/// How strongly scene parameters are randomised across a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariationLevel {
    Minimal,
    Low,
    Medium,
    High,
}

impl VariationLevel {
    pub const ALL: [VariationLevel; 4] = [
        VariationLevel::Minimal,
        VariationLevel::Low,
        VariationLevel::Medium,
        VariationLevel::High,
    ];

    pub fn name(self) -> &'static str {
        match self {
            VariationLevel::Minimal => "minimal",
            VariationLevel::Low => "low",
            VariationLevel::Medium => "medium",
            VariationLevel::High => "high",
        }
    }

    pub fn profile(self) -> &'static VariationProfile {
        match self {
            VariationLevel::Minimal => &MINIMAL,
            VariationLevel::Low => &LOW,
            VariationLevel::Medium => &MEDIUM,
            VariationLevel::High => &HIGH,
        }
    }
}

impl fmt::Display for VariationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VariationLevel {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        VariationLevel::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigurationError::UnknownVariation(s.to_string()))
    }
}

/// Looks up a profile by level name.
pub fn profile_for(name: &str) -> Result<&'static VariationProfile, ConfigurationError> {
    name.parse::<VariationLevel>().map(VariationLevel::profile)
}

/// Pre-authored fall clip family. The tag doubles as the clip name requested
/// from the imported model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallType {
    Forward,
    Backward,
    Sideways,
    Collapse,
}

impl FallType {
    pub fn clip_name(self) -> &'static str {
        match self {
            FallType::Forward => "fall_forward",
            FallType::Backward => "fall_backward",
            FallType::Sideways => "fall_sideways",
            FallType::Collapse => "fall_collapse",
        }
    }
}

/// Spine bend/twist applied before the clip starts, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialPose {
    pub bend_deg: f32,
    pub twist_deg: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightingCondition {
    pub energy: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundMaterial {
    pub color: Rgb,
    pub roughness: f32,
}

/// Sampleable parameter sets for one variation level.
///
/// `micro_jitter` scales the camera and light jitter bounds applied on top of
/// the drawn values; `position_jitter` bounds the character's planar offset in
/// metres. Both are zero for [`VariationLevel::Minimal`], so minimal scenes use
/// exactly the tabulated values.
#[derive(Debug, PartialEq)]
pub struct VariationProfile {
    pub rotation_angles_deg: &'static [f32],
    pub initial_poses: &'static [InitialPose],
    pub fall_speeds: &'static [f32],
    pub fall_types: &'static [FallType],
    pub camera_heights: &'static [f32],
    pub camera_angles: &'static [Vec3],
    pub lighting: &'static [LightingCondition],
    pub ground_materials: &'static [GroundMaterial],
    pub noise_enabled: bool,
    pub position_jitter: f32,
    pub micro_jitter: f32,
    pub secondary_rotation_chance: f64,
}

const WHITE: Rgb = [1.0, 1.0, 1.0];
const WARM: Rgb = [1.0, 0.9, 0.75];
const COOL: Rgb = [0.8, 0.88, 1.0];
const SODIUM: Rgb = [1.0, 0.72, 0.4];

const CONCRETE: GroundMaterial = GroundMaterial {
    color: [0.5, 0.5, 0.5],
    roughness: 0.5,
};
const TILE: GroundMaterial = GroundMaterial {
    color: [0.82, 0.8, 0.76],
    roughness: 0.2,
};
const CARPET: GroundMaterial = GroundMaterial {
    color: [0.35, 0.22, 0.18],
    roughness: 0.95,
};
const WOOD: GroundMaterial = GroundMaterial {
    color: [0.55, 0.38, 0.22],
    roughness: 0.45,
};
const LINOLEUM: GroundMaterial = GroundMaterial {
    color: [0.62, 0.7, 0.64],
    roughness: 0.3,
};

const fn pose(bend_deg: f32, twist_deg: f32) -> InitialPose {
    InitialPose {
        bend_deg,
        twist_deg,
    }
}

const fn light(energy: f32, color: Rgb) -> LightingCondition {
    LightingCondition { energy, color }
}

static MINIMAL: VariationProfile = VariationProfile {
    rotation_angles_deg: &[0.0],
    initial_poses: &[pose(0.0, 0.0)],
    fall_speeds: &[1.0],
    fall_types: &[FallType::Backward],
    camera_heights: &[4.0],
    camera_angles: &[[1.0, 0.0, 0.0]],
    lighting: &[light(1.0, WHITE)],
    ground_materials: &[CONCRETE],
    noise_enabled: false,
    position_jitter: 0.0,
    micro_jitter: 0.0,
    secondary_rotation_chance: 0.0,
};

static LOW: VariationProfile = VariationProfile {
    rotation_angles_deg: &[0.0, 90.0, 180.0, 270.0],
    initial_poses: &[pose(0.0, 0.0), pose(10.0, 0.0)],
    fall_speeds: &[0.9, 1.0, 1.1],
    fall_types: &[FallType::Forward, FallType::Backward],
    camera_heights: &[3.5, 4.0, 4.5],
    camera_angles: &[[1.0, 0.0, 0.0], [1.1, 0.0, 0.0]],
    lighting: &[light(1.0, WHITE), light(0.8, WARM)],
    ground_materials: &[CONCRETE, TILE],
    noise_enabled: false,
    position_jitter: 0.25,
    micro_jitter: 0.25,
    secondary_rotation_chance: 0.1,
};

static MEDIUM: VariationProfile = VariationProfile {
    rotation_angles_deg: &[0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0],
    initial_poses: &[
        pose(0.0, 0.0),
        pose(10.0, 0.0),
        pose(15.0, 10.0),
        pose(5.0, -10.0),
    ],
    fall_speeds: &[0.8, 0.9, 1.0, 1.1, 1.25],
    fall_types: &[FallType::Forward, FallType::Backward, FallType::Sideways],
    camera_heights: &[3.0, 4.0, 5.0],
    camera_angles: &[[1.0, 0.0, 0.0], [1.1, 0.0, 0.05], [1.2, 0.0, -0.05]],
    lighting: &[light(1.0, WHITE), light(0.8, WARM), light(1.2, COOL)],
    ground_materials: &[CONCRETE, TILE, WOOD],
    noise_enabled: true,
    position_jitter: 0.5,
    micro_jitter: 0.5,
    secondary_rotation_chance: 0.25,
};

static HIGH: VariationProfile = VariationProfile {
    rotation_angles_deg: &[
        0.0, 30.0, 60.0, 90.0, 120.0, 150.0, 180.0, 210.0, 240.0, 270.0, 300.0, 330.0,
    ],
    initial_poses: &[
        pose(0.0, 0.0),
        pose(10.0, 0.0),
        pose(15.0, 10.0),
        pose(5.0, -10.0),
        pose(25.0, 15.0),
        pose(20.0, -20.0),
    ],
    fall_speeds: &[0.7, 0.8, 0.9, 1.0, 1.1, 1.25, 1.5],
    fall_types: &[
        FallType::Forward,
        FallType::Backward,
        FallType::Sideways,
        FallType::Collapse,
    ],
    camera_heights: &[2.5, 3.5, 4.5, 5.5, 6.0],
    camera_angles: &[
        [1.0, 0.0, 0.0],
        [1.1, 0.0, 0.05],
        [1.2, 0.0, -0.05],
        [0.9, 0.05, 0.1],
        [1.3, -0.05, -0.1],
    ],
    lighting: &[
        light(1.0, WHITE),
        light(0.8, WARM),
        light(1.2, COOL),
        light(0.5, SODIUM),
        light(1.5, WHITE),
    ],
    ground_materials: &[CONCRETE, TILE, CARPET, WOOD, LINOLEUM],
    noise_enabled: true,
    position_jitter: 1.0,
    micro_jitter: 1.0,
    secondary_rotation_chance: 0.5,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_profile_has_non_empty_sets() {
        for level in VariationLevel::ALL {
            let profile = level.profile();
            assert!(!profile.rotation_angles_deg.is_empty(), "{level}");
            assert!(!profile.initial_poses.is_empty(), "{level}");
            assert!(!profile.fall_speeds.is_empty(), "{level}");
            assert!(!profile.fall_types.is_empty(), "{level}");
            assert!(!profile.camera_heights.is_empty(), "{level}");
            assert!(!profile.camera_angles.is_empty(), "{level}");
            assert!(!profile.lighting.is_empty(), "{level}");
            assert!(!profile.ground_materials.is_empty(), "{level}");
            assert!((0.0..=1.0).contains(&profile.secondary_rotation_chance));
            assert!(profile.fall_speeds.iter().all(|&speed| speed > 0.0));
        }
    }

    #[test]
    fn minimal_profile_pins_camera() {
        let profile = VariationLevel::Minimal.profile();
        assert_eq!(profile.camera_angles, &[[1.0f32, 0.0, 0.0]]);
        assert_eq!(profile.camera_heights, &[4.0f32]);
        assert_eq!(profile.micro_jitter, 0.0);
        assert_eq!(profile.position_jitter, 0.0);
    }

    #[test]
    fn level_names_parse_case_insensitively() {
        assert_eq!("High".parse::<VariationLevel>(), Ok(VariationLevel::High));
        assert_eq!(" minimal ".parse::<VariationLevel>(), Ok(VariationLevel::Minimal));
        assert!(profile_for("medium").is_ok());
    }

    #[test]
    fn unknown_level_is_configuration_error() {
        assert_eq!(
            profile_for("extreme"),
            Err(ConfigurationError::UnknownVariation("extreme".into()))
        );
    }
}

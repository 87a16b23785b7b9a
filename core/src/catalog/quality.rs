use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::prelude::ConfigurationError;

/// Named output quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Tiny,
    Small,
    Medium,
    High,
    Full,
}

impl QualityTier {
    pub const ALL: [QualityTier; 5] = [
        QualityTier::Tiny,
        QualityTier::Small,
        QualityTier::Medium,
        QualityTier::High,
        QualityTier::Full,
    ];

    pub fn name(self) -> &'static str {
        match self {
            QualityTier::Tiny => "tiny",
            QualityTier::Small => "small",
            QualityTier::Medium => "medium",
            QualityTier::High => "high",
            QualityTier::Full => "full",
        }
    }

    pub fn preset(self) -> QualityPreset {
        let (resolution, fps, samples, compression, noise_enabled) = match self {
            QualityTier::Tiny => ((160, 120), 12, 4, CompressionTier::Lowest, true),
            QualityTier::Small => ((320, 240), 24, 16, CompressionTier::Low, true),
            QualityTier::Medium => ((640, 480), 30, 32, CompressionTier::Medium, true),
            QualityTier::High => ((1280, 720), 30, 64, CompressionTier::High, false),
            QualityTier::Full => ((1920, 1080), 60, 128, CompressionTier::High, false),
        };
        QualityPreset {
            tier: self,
            resolution,
            fps,
            samples,
            compression,
            noise_enabled,
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QualityTier {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        QualityTier::ALL
            .into_iter()
            .find(|tier| tier.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigurationError::UnknownQuality(s.to_string()))
    }
}

/// Encoder compression tier. Lower tiers trade fidelity for smaller files and
/// more visible block artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionTier {
    Lowest,
    Low,
    Medium,
    High,
}

impl CompressionTier {
    /// H.264 constant rate factor.
    pub fn crf(self) -> u8 {
        match self {
            CompressionTier::Lowest => 32,
            CompressionTier::Low => 26,
            CompressionTier::Medium => 23,
            CompressionTier::High => 20,
        }
    }

    /// Encoder bitrate bounds in kbit/s as `(min, max)`.
    pub fn bitrate_kbps(self) -> (u32, u32) {
        match self {
            CompressionTier::Lowest => (0, 500),
            CompressionTier::Low => (0, 1_500),
            CompressionTier::Medium => (500, 4_000),
            CompressionTier::High => (1_000, 9_000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityPreset {
    pub tier: QualityTier,
    pub resolution: (u32, u32),
    pub fps: u32,
    pub samples: u32,
    pub compression: CompressionTier,
    pub noise_enabled: bool,
}

impl QualityPreset {
    /// Replaces the preset resolution. Sides must be even for yuv420p output.
    pub fn with_resolution(
        mut self,
        resolution: Option<(u32, u32)>,
    ) -> Result<Self, ConfigurationError> {
        if let Some((width, height)) = resolution {
            if width == 0 || height == 0 || width % 2 != 0 || height % 2 != 0 {
                return Err(ConfigurationError::InvalidResolution { width, height });
            }
            self.resolution = (width, height);
        }
        Ok(self)
    }
}

pub fn preset_for(name: &str) -> Result<QualityPreset, ConfigurationError> {
    name.parse::<QualityTier>().map(QualityTier::preset)
}

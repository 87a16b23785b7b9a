use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::catalog::QualityPreset;
use crate::host::RenderTarget;
use crate::prelude::{ConfigurationError, HostResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    #[default]
    Mpeg4,
    Matroska,
}

impl Container {
    pub fn extension(self) -> &'static str {
        match self {
            Container::Mpeg4 => "mp4",
            Container::Matroska => "mkv",
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Container {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp4" | "mpeg4" => Ok(Container::Mpeg4),
            "mkv" | "matroska" => Ok(Container::Matroska),
            _ => Err(ConfigurationError::UnknownContainer(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    H264,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderSettings {
    pub container: Container,
    pub codec: Codec,
    pub crf: u8,
    pub min_kbps: u32,
    pub max_kbps: u32,
}

/// Everything the host needs to write one video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub output_path: PathBuf,
    pub resolution: (u32, u32),
    pub fps: u32,
    pub samples: u32,
    pub film_transparent: bool,
    pub encoder: EncoderSettings,
}

/// Binds quality-preset parameters to the host's render job. Does not render.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderJobConfigurator {
    container: Container,
}

impl RenderJobConfigurator {
    pub fn new(container: Container) -> Self {
        Self { container }
    }

    pub fn container(&self) -> Container {
        self.container
    }

    pub fn settings(&self, preset: &QualityPreset, output_path: &Path) -> RenderSettings {
        let (min_kbps, max_kbps) = preset.compression.bitrate_kbps();
        RenderSettings {
            output_path: output_path.to_path_buf(),
            resolution: preset.resolution,
            fps: preset.fps,
            samples: preset.samples,
            film_transparent: true,
            encoder: EncoderSettings {
                container: self.container,
                codec: Codec::H264,
                crf: preset.compression.crf(),
                min_kbps,
                max_kbps,
            },
        }
    }

    pub fn configure<R: RenderTarget + ?Sized>(
        &self,
        render: &mut R,
        preset: &QualityPreset,
        output_path: &Path,
    ) -> HostResult<RenderSettings> {
        let settings = self.settings(preset, output_path);
        debug!(
            "render job {} at {}x{} {}fps, {} samples, crf {}",
            settings.output_path.display(),
            settings.resolution.0,
            settings.resolution.1,
            settings.fps,
            settings.samples,
            settings.encoder.crf
        );
        render.apply_render_settings(&settings)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CompressionTier, QualityTier};
    use crate::host::MemoryHost;

    #[test]
    fn settings_follow_preset() {
        let preset = QualityTier::Medium.preset();
        let job = RenderJobConfigurator::new(Container::Matroska);
        let settings = job.settings(&preset, Path::new("out/fall_scene_000.mkv"));

        assert_eq!(settings.resolution, (640, 480));
        assert_eq!(settings.fps, 30);
        assert_eq!(settings.samples, 32);
        assert_eq!(settings.encoder.container, Container::Matroska);
        assert_eq!(settings.encoder.crf, CompressionTier::Medium.crf());
        assert_eq!((settings.encoder.min_kbps, settings.encoder.max_kbps), (500, 4_000));
    }

    #[test]
    fn configure_binds_settings_on_host() {
        let preset = QualityTier::Tiny.preset();
        let mut host = MemoryHost::new();
        let settings = RenderJobConfigurator::default()
            .configure(&mut host, &preset, Path::new("out/a.mp4"))
            .unwrap();
        assert_eq!(host.state().render.as_ref(), Some(&settings));
    }

    #[test]
    fn container_names_parse() {
        assert_eq!("MP4".parse::<Container>(), Ok(Container::Mpeg4));
        assert_eq!("mkv".parse::<Container>(), Ok(Container::Matroska));
        assert!("webm".parse::<Container>().is_err());
    }
}

use anyhow::Context;
use fallcore::configure::Container;
use fallcore::pipeline::{BatchPlan, BatchSettings};
use fallcore::{ConfigurationError, QualityTier, VariationLevel};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// User-facing generation settings. Names are kept as strings so that an
/// unknown preset or level surfaces as a `ConfigurationError`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub model_dir: PathBuf,
    pub output_dir: PathBuf,
    pub resolution: Option<[u32; 2]>,
    pub quality: String,
    pub variation: String,
    /// Absent renders one video per discovered model.
    pub num_videos: Option<usize>,
    pub seed: u64,
    pub model_extension: String,
    pub container: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            output_dir: PathBuf::from("output"),
            resolution: None,
            quality: QualityTier::Small.name().to_string(),
            variation: VariationLevel::Medium.name().to_string(),
            num_videos: None,
            seed: 0,
            model_extension: "fbx".to_string(),
            container: "mp4".to_string(),
        }
    }
}

impl GenerationConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading generation config {}", path_ref.display()))?;
        let config: GenerationConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing generation config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(model_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            model_dir,
            output_dir,
            ..Default::default()
        }
    }

    pub fn to_batch_settings(&self) -> Result<BatchSettings, ConfigurationError> {
        let plan = match self.num_videos {
            Some(0) => return Err(ConfigurationError::ZeroVideos),
            Some(count) => BatchPlan::Count(count),
            None => BatchPlan::PerAsset,
        };
        Ok(BatchSettings {
            output_dir: self.output_dir.clone(),
            quality: self.quality.parse()?,
            resolution: self.resolution.map(|[width, height]| (width, height)),
            variation: self.variation.parse()?,
            plan,
            seed: self.seed,
            container: self.container.parse::<Container>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_uses_defaults() {
        let cfg = GenerationConfig::from_args("in".into(), "out".into());
        let settings = cfg.to_batch_settings().unwrap();
        assert_eq!(settings.quality, QualityTier::Small);
        assert_eq!(settings.variation, VariationLevel::Medium);
        assert_eq!(settings.plan, BatchPlan::PerAsset);
        assert_eq!(settings.container, Container::Mpeg4);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"model_dir: assets/mixamo\noutput_dir: out\nquality: tiny\nvariation: minimal\nnum_videos: 2\nresolution: [640, 480]\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = GenerationConfig::load(&path).unwrap();
        assert_eq!(cfg.model_dir, PathBuf::from("assets/mixamo"));

        let settings = cfg.to_batch_settings().unwrap();
        assert_eq!(settings.plan, BatchPlan::Count(2));
        assert_eq!(settings.resolution, Some((640, 480)));
        assert_eq!(settings.quality, QualityTier::Tiny);
    }

    #[test]
    fn unknown_names_fail_fast() {
        let mut cfg = GenerationConfig::from_args("in".into(), "out".into());
        cfg.quality = "ultra".into();
        assert_eq!(
            cfg.to_batch_settings(),
            Err(ConfigurationError::UnknownQuality("ultra".into()))
        );

        cfg.quality = "tiny".into();
        cfg.variation = "chaotic".into();
        assert_eq!(
            cfg.to_batch_settings(),
            Err(ConfigurationError::UnknownVariation("chaotic".into()))
        );
    }

    #[test]
    fn zero_videos_is_rejected() {
        let mut cfg = GenerationConfig::from_args("in".into(), "out".into());
        cfg.num_videos = Some(0);
        assert_eq!(cfg.to_batch_settings(), Err(ConfigurationError::ZeroVideos));
    }
}

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::catalog::{QualityPreset, QualityTier, VariationLevel};
use crate::configure::{Container, RenderJobConfigurator};
use crate::host::SceneHost;
use crate::pipeline::assets::AssetPool;
use crate::pipeline::scene::{SceneJob, ScenePipeline};
use crate::prelude::{BatchError, ConfigurationError, PipelineState};
use crate::sampling::{SceneDraw, SceneSampler};
use crate::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};

/// How many scenes to produce and how to name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPlan {
    /// One scene per discovered asset, named `fall_scene_{i}`.
    PerAsset,
    /// Exactly `n` scenes cycling over the pool, named `fall_scene_{i:03}`.
    Count(usize),
}

impl BatchPlan {
    pub fn scene_count(self, pool_len: usize) -> usize {
        match self {
            BatchPlan::PerAsset => pool_len,
            BatchPlan::Count(count) => count,
        }
    }

    pub fn output_name(self, index: usize, extension: &str) -> String {
        match self {
            BatchPlan::PerAsset => format!("fall_scene_{index}.{extension}"),
            BatchPlan::Count(_) => format!("fall_scene_{index:03}.{extension}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSettings {
    pub output_dir: PathBuf,
    pub quality: QualityTier,
    pub resolution: Option<(u32, u32)>,
    pub variation: VariationLevel,
    pub plan: BatchPlan,
    pub seed: u64,
    pub container: Container,
}

/// Outcome of one scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResult {
    pub index: usize,
    pub asset_index: usize,
    pub asset_path: PathBuf,
    pub output_path: PathBuf,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Pipeline state a failed scene stopped in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_in: Option<PipelineState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_fps: Option<u32>,
    pub draw: SceneDraw,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub requested: usize,
    pub attempted: usize,
    pub succeeded: usize,
    pub variation: VariationLevel,
    pub quality: QualityTier,
    pub seed: u64,
    pub metrics: MetricsSnapshot,
    pub results: Vec<GenerationResult>,
}

impl BatchReport {
    pub fn summary_line(&self) -> String {
        format!(
            "Generated {}/{} videos (variation: {}, quality: {})",
            self.succeeded, self.requested, self.variation, self.quality
        )
    }

    /// Pool slot used by each scene, in scene order.
    pub fn asset_indices(&self) -> Vec<usize> {
        self.results.iter().map(|result| result.asset_index).collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = &GenerationResult> {
        self.results.iter().filter(|result| !result.success)
    }
}

/// Runs every scene of a batch against one host, absorbing per-scene
/// failures into the report.
pub struct DatasetBatchDriver {
    settings: BatchSettings,
    preset: QualityPreset,
    logger: LogManager,
}

impl DatasetBatchDriver {
    pub fn new(settings: BatchSettings) -> Result<Self, ConfigurationError> {
        if settings.plan == BatchPlan::Count(0) {
            return Err(ConfigurationError::ZeroVideos);
        }
        let preset = settings.quality.preset().with_resolution(settings.resolution)?;
        Ok(Self {
            settings,
            preset,
            logger: LogManager::new(),
        })
    }

    pub fn settings(&self) -> &BatchSettings {
        &self.settings
    }

    /// Quality preset with any resolution override applied.
    pub fn preset(&self) -> &QualityPreset {
        &self.preset
    }

    pub fn output_path(&self, index: usize) -> PathBuf {
        let name = self
            .settings
            .plan
            .output_name(index, self.settings.container.extension());
        self.settings.output_dir.join(name)
    }

    /// Fails only when the pool is empty or the output directory cannot be
    /// created; both are checked before any scene runs.
    pub fn run<H: SceneHost>(
        &self,
        host: &mut H,
        pool: &AssetPool,
    ) -> Result<BatchReport, BatchError> {
        if pool.is_empty() {
            return Err(BatchError::NoAssets {
                dir: pool.origin().to_path_buf(),
            });
        }
        let output_dir = &self.settings.output_dir;
        fs::create_dir_all(output_dir).map_err(|source| BatchError::OutputDir {
            path: output_dir.clone(),
            source,
        })?;

        let requested = self.settings.plan.scene_count(pool.len());
        let profile = self.settings.variation.profile();
        let mut sampler = SceneSampler::seeded(self.settings.seed);
        let metrics = MetricsRecorder::new();
        let mut pipeline = ScenePipeline::new(
            &self.preset,
            RenderJobConfigurator::new(self.settings.container),
        );

        self.logger.record(&format!(
            "Starting batch of {} scenes from {} assets (variation: {}, quality: {})",
            requested,
            pool.len(),
            self.settings.variation,
            self.settings.quality
        ));

        let mut results = Vec::with_capacity(requested);
        for index in 0..requested {
            let Some((asset_index, asset)) = pool.select(index) else {
                break;
            };
            let job = SceneJob {
                index,
                asset,
                output_path: self.output_path(index),
                draw: sampler.draw(profile),
            };
            self.logger
                .scene_started(index, requested, &asset.path, &job.output_path);
            metrics.record_attempt();

            let (success, error, failed_in, effective_fps) = match pipeline.run(host, &job) {
                Ok(outcome) => {
                    metrics.record_success();
                    (true, None, None, Some(outcome.effective_fps))
                }
                Err(err) => {
                    self.logger.scene_failed(index, requested, &asset.path, &err);
                    metrics.record_failure(&err);
                    (false, Some(err.to_string()), Some(err.state()), None)
                }
            };

            results.push(GenerationResult {
                index,
                asset_index,
                asset_path: asset.path.clone(),
                output_path: job.output_path,
                success,
                error,
                failed_in,
                effective_fps,
                draw: job.draw,
            });
        }

        let metrics = metrics.snapshot();
        let report = BatchReport {
            requested,
            attempted: metrics.attempted,
            succeeded: metrics.succeeded,
            variation: self.settings.variation,
            quality: self.settings.quality,
            seed: self.settings.seed,
            metrics,
            results,
        };
        self.logger.record(&report.summary_line());
        Ok(report)
    }
}

use std::path::PathBuf;

use log::debug;
use serde::Serialize;

use crate::catalog::QualityPreset;
use crate::configure::{
    AnimationController, Character, PostProcessConfigurator, RenderJobConfigurator,
    SceneConfigurator,
};
use crate::host::SceneHost;
use crate::pipeline::assets::AssetRecord;
use crate::prelude::{PipelineState, SceneError};
use crate::sampling::SceneDraw;

/// One scene to produce.
#[derive(Debug, Clone)]
pub struct SceneJob<'a> {
    pub index: usize,
    pub asset: &'a AssetRecord,
    pub output_path: PathBuf,
    pub draw: SceneDraw,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneOutcome {
    pub output_path: PathBuf,
    pub effective_fps: u32,
    pub noise_chain: bool,
}

/// Drives one scene through
/// `Init -> AssetLoading -> Configuring -> Rendering -> Done`, or into `Failed`.
///
/// Configuration order is fixed: the animation and post-process steps need
/// the objects created by the scene step.
pub struct ScenePipeline<'a> {
    preset: &'a QualityPreset,
    render_job: RenderJobConfigurator,
    state: PipelineState,
    trace: Vec<PipelineState>,
}

impl<'a> ScenePipeline<'a> {
    pub fn new(preset: &'a QualityPreset, render_job: RenderJobConfigurator) -> Self {
        Self {
            preset,
            render_job,
            state: PipelineState::Init,
            trace: Vec::new(),
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// States visited by the most recent run, in order.
    pub fn trace(&self) -> &[PipelineState] {
        &self.trace
    }

    pub fn run<H: SceneHost>(
        &mut self,
        host: &mut H,
        job: &SceneJob<'_>,
    ) -> Result<SceneOutcome, SceneError> {
        self.trace.clear();
        self.enter(PipelineState::Init);
        match self.run_stages(host, job) {
            Ok(outcome) => {
                self.enter(PipelineState::Done);
                Ok(outcome)
            }
            Err(err) => {
                self.enter(PipelineState::Failed);
                Err(err)
            }
        }
    }

    fn run_stages<H: SceneHost>(
        &mut self,
        host: &mut H,
        job: &SceneJob<'_>,
    ) -> Result<SceneOutcome, SceneError> {
        let staged = SceneConfigurator::reset_baseline(host).map_err(SceneError::Baseline)?;

        self.enter(PipelineState::AssetLoading);
        let path = &job.asset.path;
        let root = host
            .import_model(path)
            .map_err(|err| SceneError::AssetLoad {
                path: path.clone(),
                reason: err.to_string(),
            })?
            .ok_or_else(|| SceneError::MissingCharacter { path: path.clone() })?;
        let armature = host
            .armature_of(root)
            .ok_or_else(|| SceneError::MissingCharacter { path: path.clone() })?;
        let character = Character { root, armature };

        self.enter(PipelineState::Configuring);
        SceneConfigurator::configure(host, &staged, &character, &job.draw)
            .map_err(|source| SceneError::Configure {
                step: "scene",
                source,
            })?;
        let plan = AnimationController::apply(host, armature, &job.draw, self.preset).map_err(
            |source| SceneError::Configure {
                step: "animation",
                source,
            },
        )?;
        let noise_chain = PostProcessConfigurator::configure(host, self.preset).map_err(
            |source| SceneError::Configure {
                step: "post-process",
                source,
            },
        )?;
        self.render_job
            .configure(host, self.preset, &job.output_path)
            .map_err(|source| SceneError::Configure {
                step: "render job",
                source,
            })?;

        self.enter(PipelineState::Rendering);
        host.render(true).map_err(SceneError::Render)?;

        Ok(SceneOutcome {
            output_path: job.output_path.clone(),
            effective_fps: plan.effective_fps,
            noise_chain,
        })
    }

    fn enter(&mut self, state: PipelineState) {
        debug!("scene pipeline {:?} -> {:?}", self.state, state);
        self.state = state;
        self.trace.push(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{QualityTier, VariationLevel};
    use crate::host::MemoryHost;
    use crate::sampling::SceneSampler;

    fn job<'a>(asset: &'a AssetRecord, output: &str) -> SceneJob<'a> {
        SceneJob {
            index: 0,
            asset,
            output_path: PathBuf::from(output),
            draw: SceneSampler::seeded(1).draw(VariationLevel::Medium.profile()),
        }
    }

    fn asset(path: &str) -> AssetRecord {
        AssetRecord {
            path: PathBuf::from(path),
        }
    }

    #[test]
    fn successful_scene_visits_every_state() {
        let preset = QualityTier::Small.preset();
        let mut pipeline = ScenePipeline::new(&preset, RenderJobConfigurator::default());
        let mut host = MemoryHost::new();
        let model = asset("m/a.fbx");

        let outcome = pipeline.run(&mut host, &job(&model, "out/s.mp4")).unwrap();

        assert_eq!(
            pipeline.trace(),
            &[
                PipelineState::Init,
                PipelineState::AssetLoading,
                PipelineState::Configuring,
                PipelineState::Rendering,
                PipelineState::Done,
            ]
        );
        assert!(outcome.noise_chain);
        assert_eq!(host.rendered(), &[PathBuf::from("out/s.mp4")]);
    }

    #[test]
    fn import_failure_stops_before_configuring() {
        let preset = QualityTier::Small.preset();
        let mut pipeline = ScenePipeline::new(&preset, RenderJobConfigurator::default());
        let mut host = MemoryHost::new().fail_import("m/bad.fbx");
        let model = asset("m/bad.fbx");

        let err = pipeline.run(&mut host, &job(&model, "out/s.mp4")).unwrap_err();

        assert!(matches!(err, SceneError::AssetLoad { .. }));
        assert_eq!(pipeline.state(), PipelineState::Failed);
        assert_eq!(pipeline.trace().last(), Some(&PipelineState::Failed));
        assert!(!pipeline.trace().contains(&PipelineState::Configuring));
        assert!(host.state().render.is_none());
    }

    #[test]
    fn empty_import_is_missing_character() {
        let preset = QualityTier::Tiny.preset();
        let mut pipeline = ScenePipeline::new(&preset, RenderJobConfigurator::default());
        let mut host = MemoryHost::new().empty_import("m/empty.fbx");
        let model = asset("m/empty.fbx");

        let err = pipeline.run(&mut host, &job(&model, "out/s.mp4")).unwrap_err();
        assert!(matches!(err, SceneError::MissingCharacter { .. }));
        assert_eq!(err.state(), PipelineState::AssetLoading);
    }

    #[test]
    fn reset_failure_fails_from_init() {
        let preset = QualityTier::Tiny.preset();
        let mut pipeline = ScenePipeline::new(&preset, RenderJobConfigurator::default());
        let mut host = MemoryHost::new().fail_reset_call(1);
        let model = asset("m/a.fbx");

        let err = pipeline.run(&mut host, &job(&model, "out/s.mp4")).unwrap_err();
        assert!(matches!(err, SceneError::Baseline(_)));
        assert_eq!(pipeline.trace(), &[PipelineState::Init, PipelineState::Failed]);
        assert!(host.imports().is_empty());
    }

    #[test]
    fn configure_failure_never_reaches_rendering() {
        let preset = QualityTier::Tiny.preset();
        let mut pipeline = ScenePipeline::new(&preset, RenderJobConfigurator::default());
        let mut host = MemoryHost::new().fail_material_call(1);
        let model = asset("m/a.fbx");

        let err = pipeline.run(&mut host, &job(&model, "out/s.mp4")).unwrap_err();
        assert!(matches!(err, SceneError::Configure { step: "scene", .. }));
        assert_eq!(
            pipeline.trace(),
            &[
                PipelineState::Init,
                PipelineState::AssetLoading,
                PipelineState::Configuring,
                PipelineState::Failed,
            ]
        );
        assert!(host.state().render.is_none());
        assert!(host.rendered().is_empty());
    }

    #[test]
    fn render_failure_is_reported_from_rendering() {
        let preset = QualityTier::Tiny.preset();
        let mut pipeline = ScenePipeline::new(&preset, RenderJobConfigurator::default());
        let mut host = MemoryHost::new().fail_render("out/s.mp4");
        let model = asset("m/a.fbx");

        let err = pipeline.run(&mut host, &job(&model, "out/s.mp4")).unwrap_err();
        assert!(matches!(err, SceneError::Render(_)));
        assert!(pipeline.trace().contains(&PipelineState::Rendering));
    }

    #[test]
    fn pipeline_is_reusable_across_scenes() {
        let preset = QualityTier::Tiny.preset();
        let mut pipeline = ScenePipeline::new(&preset, RenderJobConfigurator::default());
        let mut host = MemoryHost::new().fail_import("m/bad.fbx");
        let bad = asset("m/bad.fbx");
        let good = asset("m/a.fbx");

        assert!(pipeline.run(&mut host, &job(&bad, "out/0.mp4")).is_err());
        assert!(pipeline.run(&mut host, &job(&good, "out/1.mp4")).is_ok());
        assert_eq!(pipeline.state(), PipelineState::Done);
        assert_eq!(pipeline.trace().first(), Some(&PipelineState::Init));
        assert_eq!(host.state().objects.len(), 5);
    }
}

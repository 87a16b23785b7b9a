use log::debug;
use serde::Serialize;

use crate::catalog::QualityPreset;
use crate::host::{AnimationTarget, ObjectId};
use crate::prelude::{HostResult, Vec3};
use crate::sampling::SceneDraw;

pub const CLIP_START_FRAME: u32 = 1;
/// Fall clips are authored as 90 frames, three seconds at 30 fps.
pub const CLIP_FRAMES: u32 = 90;
pub const MIDPOINT_FRAME: u32 = 45;
pub const MAX_ENCODER_FPS: u32 = 120;

/// Output frame rate after applying a fall-speed multiplier, rounded to a
/// whole rate in `1..=MAX_ENCODER_FPS`.
pub fn effective_fps(base_fps: u32, speed: f32) -> u32 {
    let scaled = (base_fps as f32 * speed).round();
    if scaled.is_finite() && scaled >= 1.0 {
        (scaled as u32).min(MAX_ENCODER_FPS)
    } else {
        1
    }
}

/// Timeline and keyframes produced for one scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationPlan {
    pub frame_start: u32,
    pub frame_end: u32,
    pub effective_fps: u32,
    pub fps_base: f32,
    pub clip: &'static str,
    /// Armature-local yaw keyframes as `(frame, rotation)`.
    pub keyframes: Vec<(u32, Vec3)>,
}

pub struct AnimationController;

impl AnimationController {
    pub fn plan(draw: &SceneDraw, preset: &QualityPreset) -> AnimationPlan {
        let effective = effective_fps(preset.fps, draw.fall_speed);
        let mut keyframes = vec![(CLIP_START_FRAME, [0.0, 0.0, 0.0])];
        if let Some(divergence) = draw.secondary_rotation_deg {
            keyframes.push((MIDPOINT_FRAME, [0.0, 0.0, divergence.to_radians()]));
        }

        AnimationPlan {
            frame_start: CLIP_START_FRAME,
            frame_end: CLIP_START_FRAME + CLIP_FRAMES - 1,
            effective_fps: effective,
            fps_base: preset.fps as f32 / effective as f32,
            clip: draw.fall_type.clip_name(),
            keyframes,
        }
    }

    /// Writes the plan to the host. Prior rotation keyframes on the armature are
    /// dropped first, so repeated calls leave the same keyframe set.
    pub fn apply<A: AnimationTarget + ?Sized>(
        anim: &mut A,
        armature: ObjectId,
        draw: &SceneDraw,
        preset: &QualityPreset,
    ) -> HostResult<AnimationPlan> {
        let plan = Self::plan(draw, preset);

        anim.set_frame_range(plan.frame_start, plan.frame_end)?;
        anim.set_frame_rate_base(plan.fps_base)?;
        anim.set_active_clip(armature, plan.clip)?;
        anim.clear_rotation_keyframes(armature)?;
        for &(frame, rotation) in &plan.keyframes {
            anim.insert_rotation_keyframe(armature, frame, rotation)?;
        }

        debug!(
            "clip {} at {} fps ({} keyframes)",
            plan.clip,
            plan.effective_fps,
            plan.keyframes.len()
        );
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{QualityTier, VariationLevel};
    use crate::configure::RenderJobConfigurator;
    use crate::host::{MemoryHost, SceneGraph};
    use crate::sampling::SceneSampler;
    use std::path::Path;

    fn imported() -> (MemoryHost, ObjectId) {
        let mut host = MemoryHost::new();
        let root = host.import_model(Path::new("a.fbx")).unwrap().unwrap();
        let armature = host.armature_of(root).unwrap();
        (host, armature)
    }

    #[test]
    fn effective_fps_rounds_and_clamps() {
        assert_eq!(effective_fps(24, 1.0), 24);
        assert_eq!(effective_fps(24, 1.1), 26);
        assert_eq!(effective_fps(30, 1.25), 38);
        assert_eq!(effective_fps(60, 3.0), MAX_ENCODER_FPS);
        assert_eq!(effective_fps(12, 0.0), 1);
    }

    #[test]
    fn apply_twice_does_not_accumulate() {
        let (mut host, armature) = imported();
        let preset = QualityTier::Small.preset();
        let mut draw = SceneSampler::seeded(2).draw(VariationLevel::High.profile());
        draw.secondary_rotation_deg = Some(20.0);

        AnimationController::apply(&mut host, armature, &draw, &preset).unwrap();
        let once = host.object(armature).unwrap().keyframes.clone();
        AnimationController::apply(&mut host, armature, &draw, &preset).unwrap();
        let twice = host.object(armature).unwrap().keyframes.clone();

        assert_eq!(once, twice);
        assert_eq!(twice.len(), 2);
        assert_eq!(twice[1].frame, MIDPOINT_FRAME);
    }

    #[test]
    fn no_stumble_means_single_keyframe() {
        let (mut host, armature) = imported();
        let preset = QualityTier::Tiny.preset();
        let draw = SceneSampler::seeded(2).draw(VariationLevel::Minimal.profile());

        let plan = AnimationController::apply(&mut host, armature, &draw, &preset).unwrap();
        assert_eq!(plan.keyframes, vec![(CLIP_START_FRAME, [0.0, 0.0, 0.0])]);
        assert_eq!((plan.frame_start, plan.frame_end), (1, 90));
        assert_eq!(host.state().timeline.frame_end, 90);
    }

    #[test]
    fn speed_changes_output_rate_not_render_fps() {
        let (mut host, armature) = imported();
        let preset = QualityTier::Medium.preset();
        let mut draw = SceneSampler::seeded(4).draw(VariationLevel::Medium.profile());
        draw.fall_speed = 0.8;

        AnimationController::apply(&mut host, armature, &draw, &preset).unwrap();
        RenderJobConfigurator::default()
            .configure(&mut host, &preset, Path::new("a.mp4"))
            .unwrap();

        assert_eq!(host.state().render.as_ref().map(|r| r.fps), Some(30));
        assert_eq!(host.effective_fps(), Some(24));
    }
}

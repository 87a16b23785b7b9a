use crate::host::{ObjectId, SceneGraph};
use crate::prelude::{HostResult, Vec3};
use crate::sampling::SceneDraw;

pub const GROUND_SIZE: f32 = 10.0;
pub const CAMERA_BASE_LOCATION: Vec3 = [0.0, -7.0, 5.0];
pub const CAMERA_BASE_ROTATION: Vec3 = [1.1, 0.0, 0.0];
pub const SUN_LOCATION: Vec3 = [0.0, 0.0, 10.0];
/// Keeps the character's feet from intersecting the ground plane.
pub const CHARACTER_LIFT: f32 = 0.1;
pub const SPINE_BONE: &str = "Spine";

/// Handles to the baseline primitives of a freshly reset scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagedScene {
    pub ground: ObjectId,
    pub camera: ObjectId,
    pub sun: ObjectId,
}

/// An imported character and the armature driving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Character {
    pub root: ObjectId,
    pub armature: ObjectId,
}

/// Applies a [`SceneDraw`] to the host's object graph.
pub struct SceneConfigurator;

impl SceneConfigurator {
    /// Clears the scene and adds the ground plane, camera and sun at their
    /// base transforms.
    pub fn reset_baseline<S: SceneGraph + ?Sized>(scene: &mut S) -> HostResult<StagedScene> {
        scene.reset_scene()?;
        let ground = scene.add_ground_plane(GROUND_SIZE)?;
        let camera = scene.add_camera(CAMERA_BASE_LOCATION, CAMERA_BASE_ROTATION)?;
        scene.set_active_camera(camera)?;
        let sun = scene.add_sun(SUN_LOCATION)?;
        Ok(StagedScene {
            ground,
            camera,
            sun,
        })
    }

    /// Applies ground, camera, light and character parameters.
    pub fn configure<S: SceneGraph + ?Sized>(
        scene: &mut S,
        staged: &StagedScene,
        character: &Character,
        draw: &SceneDraw,
    ) -> HostResult<()> {
        scene.set_material(staged.ground, &draw.ground)?;

        scene.set_location(staged.camera, draw.camera_location)?;
        scene.set_rotation(staged.camera, draw.camera_rotation)?;

        scene.set_light(staged.sun, draw.light_energy, draw.light_color)?;
        scene.set_rotation(staged.sun, draw.light_rotation)?;

        scene.set_scene_property("fall_type", draw.fall_type.clip_name().to_string())?;
        scene.set_scene_property("fall_speed", format!("{:.2}", draw.fall_speed))?;
        scene.set_scene_property("sensor_noise", draw.sensor_noise.to_string())?;

        let spine = [
            draw.pose.bend_deg.to_radians(),
            0.0,
            draw.pose.twist_deg.to_radians(),
        ];
        scene.set_bone_rotation(character.armature, SPINE_BONE, spine)?;
        scene.set_rotation(character.root, [0.0, 0.0, draw.rotation_deg.to_radians()])?;
        scene.set_location(
            character.root,
            [
                draw.character_offset[0],
                draw.character_offset[1],
                CHARACTER_LIFT,
            ],
        )?;
        Ok(())
    }
}

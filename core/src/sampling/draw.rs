use std::f32::consts::PI;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;

use crate::catalog::{FallType, GroundMaterial, InitialPose, VariationProfile};
use crate::configure::scene::CAMERA_BASE_LOCATION;
use crate::prelude::{Rgb, Vec3};

// Jitter bounds at micro_jitter = 1.0.
const CAMERA_X_JITTER: f32 = 2.0;
const CAMERA_Y_JITTER: f32 = 1.0;
const CAMERA_Z_JITTER: f32 = 0.25;
const CAMERA_TILT_JITTER: f32 = 0.05;
const CAMERA_ROLL_JITTER: f32 = 0.1;
const LIGHT_ENERGY_JITTER: f32 = 0.5;
const LIGHT_COLOR_JITTER: f32 = 0.05;
const LIGHT_TILT_JITTER: f32 = 0.1;
const CHARACTER_YAW_JITTER_DEG: f32 = 5.0;

pub const MAX_SECONDARY_ROTATION_DEG: f32 = 30.0;

/// Every variable parameter of one generated scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneDraw {
    pub rotation_deg: f32,
    pub pose: InitialPose,
    pub fall_speed: f32,
    pub fall_type: FallType,
    pub camera_location: Vec3,
    pub camera_rotation: Vec3,
    pub light_energy: f32,
    pub light_color: Rgb,
    pub light_rotation: Vec3,
    pub ground: GroundMaterial,
    pub character_offset: [f32; 2],
    /// Divergence of the mid-clip rotation keyframe, when the scene stumbles.
    pub secondary_rotation_deg: Option<f32>,
    pub sensor_noise: bool,
}

/// Seeded source of [`SceneDraw`]s. The same seed and profile sequence yields
/// the same draws.
pub struct SceneSampler {
    rng: StdRng,
}

impl SceneSampler {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn draw(&mut self, profile: &VariationProfile) -> SceneDraw {
        let scale = profile.micro_jitter;

        let rotation_deg = pick(&mut self.rng, profile.rotation_angles_deg)
            + jitter(&mut self.rng, CHARACTER_YAW_JITTER_DEG * scale);
        let pose = pick(&mut self.rng, profile.initial_poses);
        let fall_speed = pick(&mut self.rng, profile.fall_speeds);
        let fall_type = pick(&mut self.rng, profile.fall_types);

        let height = pick(&mut self.rng, profile.camera_heights);
        let camera_location = [
            jitter(&mut self.rng, CAMERA_X_JITTER * scale),
            CAMERA_BASE_LOCATION[1] + jitter(&mut self.rng, CAMERA_Y_JITTER * scale),
            height + jitter(&mut self.rng, CAMERA_Z_JITTER * scale),
        ];
        let angle = pick(&mut self.rng, profile.camera_angles);
        let camera_rotation = [
            angle[0] + jitter(&mut self.rng, CAMERA_TILT_JITTER * scale),
            angle[1] + jitter(&mut self.rng, CAMERA_ROLL_JITTER * scale),
            angle[2] + jitter(&mut self.rng, CAMERA_ROLL_JITTER * scale),
        ];

        let lighting = pick(&mut self.rng, profile.lighting);
        let light_energy =
            lighting.energy * (1.0 + jitter(&mut self.rng, LIGHT_ENERGY_JITTER * scale));
        let mut light_color = lighting.color;
        for channel in light_color.iter_mut() {
            let shifted = *channel + jitter(&mut self.rng, LIGHT_COLOR_JITTER * scale);
            *channel = shifted.clamp(0.0, 1.0);
        }
        let light_rotation = [
            jitter(&mut self.rng, LIGHT_TILT_JITTER * scale),
            jitter(&mut self.rng, LIGHT_TILT_JITTER * scale),
            jitter(&mut self.rng, PI * scale),
        ];

        let ground = pick(&mut self.rng, profile.ground_materials);
        let character_offset = [
            jitter(&mut self.rng, profile.position_jitter),
            jitter(&mut self.rng, profile.position_jitter),
        ];

        let secondary_rotation_deg = if self.rng.gen_bool(profile.secondary_rotation_chance) {
            Some(jitter(&mut self.rng, MAX_SECONDARY_ROTATION_DEG))
        } else {
            None
        };

        SceneDraw {
            rotation_deg,
            pose,
            fall_speed,
            fall_type,
            camera_location,
            camera_rotation,
            light_energy,
            light_color,
            light_rotation,
            ground,
            character_offset,
            secondary_rotation_deg,
            sensor_noise: profile.noise_enabled,
        }
    }
}

// Catalog profiles are static and every set is non-empty (see catalog tests).
fn pick<T: Copy>(rng: &mut StdRng, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}

fn jitter(rng: &mut StdRng, bound: f32) -> f32 {
    if bound > 0.0 {
        rng.gen_range(-bound..=bound)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VariationLevel;

    #[test]
    fn same_seed_yields_same_draws() {
        let profile = VariationLevel::High.profile();
        let mut first = SceneSampler::seeded(7);
        let mut second = SceneSampler::seeded(7);
        for _ in 0..16 {
            assert_eq!(first.draw(profile), second.draw(profile));
        }
    }

    #[test]
    fn minimal_draws_use_tabulated_values() {
        let profile = VariationLevel::Minimal.profile();
        let mut sampler = SceneSampler::seeded(99);
        for _ in 0..8 {
            let draw = sampler.draw(profile);
            assert_eq!(draw.camera_rotation, [1.0, 0.0, 0.0]);
            assert_eq!(draw.camera_location, [0.0, CAMERA_BASE_LOCATION[1], 4.0]);
            assert_eq!(draw.rotation_deg, 0.0);
            assert_eq!(draw.character_offset, [0.0, 0.0]);
            assert_eq!(draw.secondary_rotation_deg, None);
            assert_eq!(draw.light_energy, 1.0);
        }
    }

    #[test]
    fn draws_stay_within_profile_bounds() {
        let profile = VariationLevel::High.profile();
        let mut sampler = SceneSampler::seeded(3);
        for _ in 0..64 {
            let draw = sampler.draw(profile);
            assert!(profile.fall_speeds.contains(&draw.fall_speed));
            assert!(profile.fall_types.contains(&draw.fall_type));
            assert!(profile.ground_materials.contains(&draw.ground));
            assert!(draw.character_offset[0].abs() <= profile.position_jitter);
            assert!(draw.light_color.iter().all(|c| (0.0..=1.0).contains(c)));
            if let Some(divergence) = draw.secondary_rotation_deg {
                assert!(divergence.abs() <= MAX_SECONDARY_ROTATION_DEG);
            }
        }
    }

    #[test]
    fn high_variation_eventually_stumbles() {
        let profile = VariationLevel::High.profile();
        let mut sampler = SceneSampler::seeded(11);
        let stumbles = (0..200)
            .filter(|_| sampler.draw(profile).secondary_rotation_deg.is_some())
            .count();
        assert!(stumbles > 0 && stumbles < 200);
    }
}

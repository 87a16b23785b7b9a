pub mod quality;
pub mod variation;

pub use quality::{preset_for, CompressionTier, QualityPreset, QualityTier};
pub use variation::{
    profile_for, FallType, GroundMaterial, InitialPose, LightingCondition, VariationLevel,
    VariationProfile,
};

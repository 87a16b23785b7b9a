//! Scene-variation and render-job pipeline for synthetic fall-detection footage.
//!
//! A batch samples one [`sampling::SceneDraw`] per scene from the active
//! variation profile, applies it to the render host through the configurators,
//! and renders. Per-scene failures are absorbed into the [`BatchReport`].

pub mod catalog;
pub mod configure;
pub mod host;
pub mod pipeline;
pub mod prelude;
pub mod sampling;
pub mod telemetry;

pub use catalog::{preset_for, profile_for, QualityPreset, QualityTier, VariationLevel};
pub use host::{MemoryHost, SceneHost};
pub use pipeline::{AssetPool, BatchPlan, BatchReport, BatchSettings, DatasetBatchDriver};
pub use prelude::{BatchError, ConfigurationError, SceneError};

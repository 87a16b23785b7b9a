pub mod assets;
pub mod batch;
pub mod scene;

pub use assets::{AssetPool, AssetRecord};
pub use batch::{BatchPlan, BatchReport, BatchSettings, DatasetBatchDriver, GenerationResult};
pub use scene::{SceneJob, SceneOutcome, ScenePipeline};

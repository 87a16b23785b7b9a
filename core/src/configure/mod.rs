pub mod animation;
pub mod post;
pub mod render;
pub mod scene;

pub use animation::{effective_fps, AnimationController, AnimationPlan};
pub use post::PostProcessConfigurator;
pub use render::{Codec, Container, EncoderSettings, RenderJobConfigurator, RenderSettings};
pub use scene::{Character, SceneConfigurator, StagedScene};

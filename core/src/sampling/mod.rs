pub mod draw;

pub use draw::{SceneDraw, SceneSampler};

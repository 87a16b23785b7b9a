use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Euler angles or positions in host scene units (metres, radians).
pub type Vec3 = [f32; 3];

/// Linear RGB in `[0, 1]`.
pub type Rgb = [f32; 3];

pub type HostResult<T> = Result<T, HostError>;

/// Unknown or invalid names and values in the generation settings.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("unknown quality preset '{0}'")]
    UnknownQuality(String),
    #[error("unknown variation level '{0}'")]
    UnknownVariation(String),
    #[error("unknown container '{0}'")]
    UnknownContainer(String),
    #[error("invalid resolution {width}x{height} (both sides must be even and non-zero)")]
    InvalidResolution { width: u32, height: u32 },
    #[error("number of videos must be positive")]
    ZeroVideos,
}

/// Failure reported by the render host for a single capability request.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HostError(pub String);

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Stages a single scene passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineState {
    Init,
    AssetLoading,
    Configuring,
    Rendering,
    Done,
    Failed,
}

/// Per-scene failure. Never escapes the batch driver.
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    #[error("resetting scene baseline: {0}")]
    Baseline(#[source] HostError),
    #[error("failed to load asset {}: {reason}", .path.display())]
    AssetLoad { path: PathBuf, reason: String },
    #[error("asset {} imported without a usable armature", .path.display())]
    MissingCharacter { path: PathBuf },
    #[error("configuring {step}: {source}")]
    Configure {
        step: &'static str,
        #[source]
        source: HostError,
    },
    #[error("render failed: {0}")]
    Render(#[source] HostError),
}

impl SceneError {
    /// The state the pipeline was in when the error was raised.
    pub fn state(&self) -> PipelineState {
        match self {
            SceneError::Baseline(_) => PipelineState::Init,
            SceneError::AssetLoad { .. } | SceneError::MissingCharacter { .. } => {
                PipelineState::AssetLoading
            }
            SceneError::Configure { .. } => PipelineState::Configuring,
            SceneError::Render(_) => PipelineState::Rendering,
        }
    }
}

/// Fatal errors that abort a batch before any scene runs.
#[derive(thiserror::Error, Debug)]
pub enum BatchError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("no assets found in {}", .dir.display())]
    NoAssets { dir: PathBuf },
    #[error("cannot create output directory {}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

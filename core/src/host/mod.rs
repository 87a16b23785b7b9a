//! Capability requests the pipeline makes of the render host.
//!
//! The host owns a single mutable scene graph. Every configurator receives it
//! explicitly as `&mut` so no two scenes can be configured at once.

pub mod memory;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::GroundMaterial;
use crate::configure::render::RenderSettings;
use crate::prelude::{HostResult, Rgb, Vec3};

pub use memory::MemoryHost;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    Add,
    Mix,
}

/// Compositor node types the post-process chain can request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    RenderLayers,
    Composite,
    Grain { amount: f32, size: f32 },
    Blur { radius_px: u32 },
    BrightContrast { brightness: f32, contrast: f32 },
    Mix { blend: BlendMode, factor: f32 },
}

/// Object graph and pose capabilities.
pub trait SceneGraph {
    /// Removes every object from the scene.
    fn reset_scene(&mut self) -> HostResult<()>;
    fn add_ground_plane(&mut self, size: f32) -> HostResult<ObjectId>;
    fn add_camera(&mut self, location: Vec3, rotation: Vec3) -> HostResult<ObjectId>;
    fn set_active_camera(&mut self, camera: ObjectId) -> HostResult<()>;
    fn add_sun(&mut self, location: Vec3) -> HostResult<ObjectId>;
    fn set_location(&mut self, object: ObjectId, location: Vec3) -> HostResult<()>;
    fn set_rotation(&mut self, object: ObjectId, rotation: Vec3) -> HostResult<()>;
    fn set_material(&mut self, object: ObjectId, material: &GroundMaterial) -> HostResult<()>;
    fn set_light(&mut self, light: ObjectId, energy: f32, color: Rgb) -> HostResult<()>;
    fn set_bone_rotation(
        &mut self,
        armature: ObjectId,
        bone: &str,
        rotation: Vec3,
    ) -> HostResult<()>;
    /// Attaches a label to the scene; exported alongside the render.
    fn set_scene_property(&mut self, key: &str, value: String) -> HostResult<()>;
    /// Imports a character model. `Ok(None)` means the file imported cleanly
    /// but produced no object.
    fn import_model(&mut self, path: &Path) -> HostResult<Option<ObjectId>>;
    fn armature_of(&self, object: ObjectId) -> Option<ObjectId>;
}

/// Timeline and keyframe capabilities.
pub trait AnimationTarget {
    fn set_frame_range(&mut self, start: u32, end: u32) -> HostResult<()>;
    /// Output rate divisor: frames are written at `fps / base`.
    fn set_frame_rate_base(&mut self, base: f32) -> HostResult<()>;
    fn set_active_clip(&mut self, armature: ObjectId, clip: &str) -> HostResult<()>;
    fn clear_rotation_keyframes(&mut self, object: ObjectId) -> HostResult<()>;
    fn insert_rotation_keyframe(
        &mut self,
        object: ObjectId,
        frame: u32,
        rotation: Vec3,
    ) -> HostResult<()>;
}

/// Post-render compositing graph.
pub trait Compositor {
    /// Enables the node graph, creating the render-layers input and composite
    /// output if they do not exist yet.
    fn use_nodes(&mut self) -> HostResult<()>;
    /// Drops every node except the input and output and reconnects them.
    fn clear_chain(&mut self) -> HostResult<()>;
    fn render_layers(&self) -> HostResult<NodeId>;
    fn composite_output(&self) -> HostResult<NodeId>;
    fn add_node(&mut self, kind: NodeKind) -> HostResult<NodeId>;
    /// Connects `from`'s image output to `to`'s input slot, replacing any
    /// existing link into that slot.
    fn link(&mut self, from: NodeId, to: NodeId, input: usize) -> HostResult<()>;
}

pub trait RenderTarget {
    fn apply_render_settings(&mut self, settings: &RenderSettings) -> HostResult<()>;
    /// Blocks until the host has finished rendering and encoding.
    fn render(&mut self, animation: bool) -> HostResult<()>;
}

/// Everything a scene pipeline needs from the host.
pub trait SceneHost: SceneGraph + AnimationTarget + Compositor + RenderTarget {}

impl<T: SceneGraph + AnimationTarget + Compositor + RenderTarget> SceneHost for T {}

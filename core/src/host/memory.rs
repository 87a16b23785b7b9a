use std::collections::{BTreeMap, HashSet};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;

use crate::catalog::GroundMaterial;
use crate::configure::render::RenderSettings;
use crate::host::{
    AnimationTarget, Compositor, NodeId, NodeKind, ObjectId, RenderTarget, SceneGraph,
};
use crate::prelude::{HostError, HostResult, Rgb, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Ground,
    Camera,
    Sun,
    Character,
    Armature,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LightSettings {
    pub energy: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Keyframe {
    pub frame: u32,
    pub rotation: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
    pub parent: Option<ObjectId>,
    pub location: Vec3,
    pub rotation: Vec3,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<GroundMaterial>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light: Option<LightSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub bones: BTreeMap<String, Vec3>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keyframes: Vec<Keyframe>,
}

impl SceneObject {
    fn new(id: ObjectId, name: &str, kind: ObjectKind) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind,
            parent: None,
            location: [0.0; 3],
            rotation: [0.0; 3],
            size: None,
            material: None,
            light: None,
            source: None,
            clip: None,
            bones: BTreeMap::new(),
            keyframes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub frame_start: u32,
    pub frame_end: u32,
    pub fps_base: f32,
}

impl Default for Timeline {
    fn default() -> Self {
        Self {
            frame_start: 1,
            frame_end: 250,
            fps_base: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeLink {
    pub from: NodeId,
    pub to: NodeId,
    pub input: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompositorState {
    pub use_nodes: bool,
    pub nodes: Vec<(NodeId, NodeKind)>,
    pub links: Vec<NodeLink>,
}

impl CompositorState {
    pub fn node(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes
            .iter()
            .find(|(node, _)| *node == id)
            .map(|(_, kind)| kind)
    }

    fn find(&self, wanted: NodeKind) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, kind)| *kind == wanted)
            .map(|(id, _)| *id)
    }
}

/// Snapshot of everything configured on a [`MemoryHost`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SceneState {
    pub objects: Vec<SceneObject>,
    pub active_camera: Option<ObjectId>,
    pub properties: BTreeMap<String, String>,
    pub timeline: Timeline,
    pub compositor: CompositorState,
    pub render: Option<RenderSettings>,
}

/// In-process scene host. Records every capability request instead of
/// rendering, optionally exporting the configured scene as a JSON job
/// manifest per render. Failures can be injected per asset or output path,
/// or on the n-th call (1-based) of a scene-graph operation.
#[derive(Debug, Default)]
pub struct MemoryHost {
    state: SceneState,
    next_id: u32,
    export_manifests: bool,
    failing_imports: HashSet<PathBuf>,
    empty_imports: HashSet<PathBuf>,
    failing_renders: HashSet<PathBuf>,
    failing_resets: HashSet<usize>,
    failing_materials: HashSet<usize>,
    reset_calls: usize,
    material_calls: usize,
    imports: Vec<PathBuf>,
    rendered: Vec<PathBuf>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `<output>.json` describing the scene on every successful render.
    pub fn with_manifest_export(mut self) -> Self {
        self.export_manifests = true;
        self
    }

    /// Importing `path` raises a host error.
    pub fn fail_import(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing_imports.insert(path.into());
        self
    }

    /// Importing `path` succeeds but yields no object.
    pub fn empty_import(mut self, path: impl Into<PathBuf>) -> Self {
        self.empty_imports.insert(path.into());
        self
    }

    /// Rendering to `output` raises a host error.
    pub fn fail_render(mut self, output: impl Into<PathBuf>) -> Self {
        self.failing_renders.insert(output.into());
        self
    }

    /// The `call`-th `reset_scene` raises a host error.
    pub fn fail_reset_call(mut self, call: usize) -> Self {
        self.failing_resets.insert(call);
        self
    }

    /// The `call`-th `set_material` raises a host error.
    pub fn fail_material_call(mut self, call: usize) -> Self {
        self.failing_materials.insert(call);
        self
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.state.objects.iter().find(|object| object.id == id)
    }

    /// Every model path passed to `import_model`, in call order.
    pub fn imports(&self) -> &[PathBuf] {
        &self.imports
    }

    /// Output paths of successful renders, in call order.
    pub fn rendered(&self) -> &[PathBuf] {
        &self.rendered
    }

    /// Frame rate the encoder would write: `fps / fps_base`.
    pub fn effective_fps(&self) -> Option<u32> {
        let render = self.state.render.as_ref()?;
        Some((render.fps as f32 / self.state.timeline.fps_base).round() as u32)
    }

    pub fn manifest_path(output: &Path) -> PathBuf {
        let mut name = OsString::from(output.as_os_str());
        name.push(".json");
        PathBuf::from(name)
    }

    fn allocate(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn spawn(&mut self, name: &str, kind: ObjectKind) -> &mut SceneObject {
        let id = ObjectId(self.allocate());
        self.state.objects.push(SceneObject::new(id, name, kind));
        let last = self.state.objects.len() - 1;
        &mut self.state.objects[last]
    }

    fn object_mut(&mut self, id: ObjectId) -> HostResult<&mut SceneObject> {
        self.state
            .objects
            .iter_mut()
            .find(|object| object.id == id)
            .ok_or_else(|| HostError::new(format!("{id} is not in the scene")))
    }

    fn armature_mut(&mut self, id: ObjectId) -> HostResult<&mut SceneObject> {
        let object = self.object_mut(id)?;
        if object.kind != ObjectKind::Armature {
            return Err(HostError::new(format!("{id} is not an armature")));
        }
        Ok(object)
    }

    fn require_node(&self, id: NodeId) -> HostResult<()> {
        self.state
            .compositor
            .node(id)
            .map(|_| ())
            .ok_or_else(|| HostError::new(format!("{id} is not in the compositor")))
    }

    fn export_manifest(&self, output: &Path) -> HostResult<()> {
        let manifest = Self::manifest_path(output);
        let body = serde_json::to_string_pretty(&self.state)
            .map_err(|err| HostError::new(format!("serializing scene manifest: {err}")))?;
        fs::write(&manifest, body).map_err(|err| {
            HostError::new(format!("writing manifest {}: {err}", manifest.display()))
        })?;
        info!("wrote scene manifest {}", manifest.display());
        Ok(())
    }
}

impl SceneGraph for MemoryHost {
    fn reset_scene(&mut self) -> HostResult<()> {
        self.reset_calls += 1;
        if self.failing_resets.contains(&self.reset_calls) {
            return Err(HostError::new(format!(
                "scene reset {} rejected",
                self.reset_calls
            )));
        }
        self.state.objects.clear();
        self.state.active_camera = None;
        self.state.properties.clear();
        Ok(())
    }

    fn add_ground_plane(&mut self, size: f32) -> HostResult<ObjectId> {
        let ground = self.spawn("Ground", ObjectKind::Ground);
        ground.size = Some(size);
        Ok(ground.id)
    }

    fn add_camera(&mut self, location: Vec3, rotation: Vec3) -> HostResult<ObjectId> {
        let camera = self.spawn("Camera", ObjectKind::Camera);
        camera.location = location;
        camera.rotation = rotation;
        Ok(camera.id)
    }

    fn set_active_camera(&mut self, camera: ObjectId) -> HostResult<()> {
        if self.object_mut(camera)?.kind != ObjectKind::Camera {
            return Err(HostError::new(format!("{camera} is not a camera")));
        }
        self.state.active_camera = Some(camera);
        Ok(())
    }

    fn add_sun(&mut self, location: Vec3) -> HostResult<ObjectId> {
        let sun = self.spawn("Sun", ObjectKind::Sun);
        sun.location = location;
        sun.light = Some(LightSettings {
            energy: 1.0,
            color: [1.0; 3],
        });
        Ok(sun.id)
    }

    fn set_location(&mut self, object: ObjectId, location: Vec3) -> HostResult<()> {
        self.object_mut(object)?.location = location;
        Ok(())
    }

    fn set_rotation(&mut self, object: ObjectId, rotation: Vec3) -> HostResult<()> {
        self.object_mut(object)?.rotation = rotation;
        Ok(())
    }

    fn set_material(&mut self, object: ObjectId, material: &GroundMaterial) -> HostResult<()> {
        self.material_calls += 1;
        if self.failing_materials.contains(&self.material_calls) {
            return Err(HostError::new(format!("material on {object} rejected")));
        }
        self.object_mut(object)?.material = Some(*material);
        Ok(())
    }

    fn set_light(&mut self, light: ObjectId, energy: f32, color: Rgb) -> HostResult<()> {
        let object = self.object_mut(light)?;
        if object.kind != ObjectKind::Sun {
            return Err(HostError::new(format!("{light} is not a light")));
        }
        object.light = Some(LightSettings { energy, color });
        Ok(())
    }

    fn set_bone_rotation(
        &mut self,
        armature: ObjectId,
        bone: &str,
        rotation: Vec3,
    ) -> HostResult<()> {
        self.armature_mut(armature)?
            .bones
            .insert(bone.to_string(), rotation);
        Ok(())
    }

    fn set_scene_property(&mut self, key: &str, value: String) -> HostResult<()> {
        self.state.properties.insert(key.to_string(), value);
        Ok(())
    }

    fn import_model(&mut self, path: &Path) -> HostResult<Option<ObjectId>> {
        self.imports.push(path.to_path_buf());
        if self.failing_imports.contains(path) {
            return Err(HostError::new(format!("importer rejected {}", path.display())));
        }
        if self.empty_imports.contains(path) {
            debug!("{} imported no objects", path.display());
            return Ok(None);
        }

        let human = self.spawn("Human", ObjectKind::Character);
        human.source = Some(path.to_path_buf());
        let root = human.id;
        let armature = self.spawn("Armature", ObjectKind::Armature);
        armature.parent = Some(root);
        Ok(Some(root))
    }

    fn armature_of(&self, object: ObjectId) -> Option<ObjectId> {
        self.state
            .objects
            .iter()
            .find(|child| child.parent == Some(object) && child.kind == ObjectKind::Armature)
            .map(|child| child.id)
    }
}

impl AnimationTarget for MemoryHost {
    fn set_frame_range(&mut self, start: u32, end: u32) -> HostResult<()> {
        if end < start {
            return Err(HostError::new(format!("invalid frame range {start}..{end}")));
        }
        self.state.timeline.frame_start = start;
        self.state.timeline.frame_end = end;
        Ok(())
    }

    fn set_frame_rate_base(&mut self, base: f32) -> HostResult<()> {
        if !(base.is_finite() && base > 0.0) {
            return Err(HostError::new(format!("invalid frame rate base {base}")));
        }
        self.state.timeline.fps_base = base;
        Ok(())
    }

    fn set_active_clip(&mut self, armature: ObjectId, clip: &str) -> HostResult<()> {
        self.armature_mut(armature)?.clip = Some(clip.to_string());
        Ok(())
    }

    fn clear_rotation_keyframes(&mut self, object: ObjectId) -> HostResult<()> {
        self.object_mut(object)?.keyframes.clear();
        Ok(())
    }

    fn insert_rotation_keyframe(
        &mut self,
        object: ObjectId,
        frame: u32,
        rotation: Vec3,
    ) -> HostResult<()> {
        let keyframes = &mut self.object_mut(object)?.keyframes;
        keyframes.retain(|key| key.frame != frame);
        keyframes.push(Keyframe { frame, rotation });
        keyframes.sort_by_key(|key| key.frame);
        Ok(())
    }
}

impl Compositor for MemoryHost {
    fn use_nodes(&mut self) -> HostResult<()> {
        if self.state.compositor.use_nodes {
            return Ok(());
        }
        self.state.compositor.use_nodes = true;
        self.clear_chain()
    }

    fn clear_chain(&mut self) -> HostResult<()> {
        if !self.state.compositor.use_nodes {
            return Err(HostError::new("compositor nodes are disabled"));
        }
        let input = match self.state.compositor.find(NodeKind::RenderLayers) {
            Some(id) => id,
            None => NodeId(self.allocate()),
        };
        let output = match self.state.compositor.find(NodeKind::Composite) {
            Some(id) => id,
            None => NodeId(self.allocate()),
        };
        let compositor = &mut self.state.compositor;
        compositor.nodes = vec![(input, NodeKind::RenderLayers), (output, NodeKind::Composite)];
        compositor.links = vec![NodeLink {
            from: input,
            to: output,
            input: 0,
        }];
        Ok(())
    }

    fn render_layers(&self) -> HostResult<NodeId> {
        self.state
            .compositor
            .find(NodeKind::RenderLayers)
            .ok_or_else(|| HostError::new("compositor has no render layers node"))
    }

    fn composite_output(&self) -> HostResult<NodeId> {
        self.state
            .compositor
            .find(NodeKind::Composite)
            .ok_or_else(|| HostError::new("compositor has no composite node"))
    }

    fn add_node(&mut self, kind: NodeKind) -> HostResult<NodeId> {
        if !self.state.compositor.use_nodes {
            return Err(HostError::new("compositor nodes are disabled"));
        }
        let id = NodeId(self.allocate());
        self.state.compositor.nodes.push((id, kind));
        Ok(id)
    }

    fn link(&mut self, from: NodeId, to: NodeId, input: usize) -> HostResult<()> {
        self.require_node(from)?;
        self.require_node(to)?;
        let links = &mut self.state.compositor.links;
        links.retain(|link| !(link.to == to && link.input == input));
        links.push(NodeLink { from, to, input });
        Ok(())
    }
}

impl RenderTarget for MemoryHost {
    fn apply_render_settings(&mut self, settings: &RenderSettings) -> HostResult<()> {
        self.state.render = Some(settings.clone());
        Ok(())
    }

    fn render(&mut self, animation: bool) -> HostResult<()> {
        let output = self
            .state
            .render
            .as_ref()
            .map(|render| render.output_path.clone())
            .ok_or_else(|| HostError::new("render requested before render settings"))?;
        if !animation {
            return Err(HostError::new("still renders are not supported"));
        }
        if self.failing_renders.contains(&output) {
            return Err(HostError::new(format!("encoder failed for {}", output.display())));
        }
        if self.export_manifests {
            self.export_manifest(&output)?;
        }
        self.rendered.push(output);
        Ok(())
    }
}

use std::sync::Arc;

use glam::Mat4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Geometry,
    Material,
    Texture,
}

#[derive(Debug, Clone, Default)]
pub struct SceneMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl SceneMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Decoded RGBA8 image, rows top to bottom.
#[derive(Debug, Clone)]
pub struct SceneTexture {
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<[u8]>,
    pub srgb: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneMaterialMode {
    Normal,
    Unlit,
    Lit,
}

#[derive(Debug, Clone)]
pub struct SceneMaterial {
    pub id: ResourceId,
    pub mode: SceneMaterialMode,
    pub roughness: f32,
    pub texture: Option<(ResourceId, SceneTexture)>,
}

#[derive(Debug, Clone)]
pub struct SceneUpload {
    pub version: u64,
    pub geometry: ResourceId,
    pub mesh: Arc<SceneMesh>,
    pub material: SceneMaterial,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneDirectionalLight {
    /// Unit vector pointing from the surface towards the light.
    pub direction: [f32; 3],
    pub color: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneLights {
    pub ambient: [f32; 3],
    pub directional: Option<SceneDirectionalLight>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSnapshot {
    pub frame_index: u64,
    pub scene_version: u64,
    pub view: Mat4,
    pub projection: Mat4,
    pub model: Mat4,
    pub camera_position: [f32; 3],
    pub lights: SceneLights,
    pub material_mode: SceneMaterialMode,
    pub roughness: f32,
    pub background: [f32; 3],
    pub surface_size: [u32; 2],
}

impl FrameSnapshot {
    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view
    }
}

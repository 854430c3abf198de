use std::sync::Arc;

use glam::{EulerRot, Mat4, Vec3};
use serde::{Deserialize, Serialize};
use solido_scene::{
    FrameSnapshot, ResourceId, ResourceKind, SceneDirectionalLight, SceneLights, SceneMaterial,
    SceneMaterialMode, SceneTexture, SceneUpload,
};

use crate::camera::PerspectiveCamera;
use crate::controls::OrbitController;
use crate::geometry::{geometry_for, GeometryDesc};
use crate::material::{
    select_material, ColorSpace, MaterialDesc, MaterialKind, MaterialVariant, TexturePayload,
};
use crate::mesh::Mesh;
use crate::resources::ResourceLedger;
use crate::settings::{MaterialSettings, ViewerSettings};
use crate::shape::ShapeSpec;

#[cfg(test)]
mod tests;

/// What the host asks to display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub shape: ShapeSpec,
    #[serde(skip)]
    pub texture: Option<TexturePayload>,
}

impl SceneConfig {
    pub fn new(shape: impl Into<ShapeSpec>, texture: Option<TexturePayload>) -> Self {
        Self {
            shape: shape.into(),
            texture,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        color: [f32; 3],
        intensity: f32,
    },
    Directional {
        color: [f32; 3],
        intensity: f32,
        position: [f32; 3],
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshResources {
    pub geometry: ResourceId,
    pub material: ResourceId,
    pub texture: Option<ResourceId>,
}

#[derive(Debug, Clone)]
pub struct MeshNode {
    pub shape: ShapeSpec,
    pub geometry: GeometryDesc,
    pub mesh: Arc<Mesh>,
    pub material: MaterialDesc,
    /// Euler angles in radians, applied X then Y then Z.
    pub rotation: Vec3,
    pub resources: MeshResources,
}

impl MeshNode {
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }
}

/// Camera, lights, the single mesh and the orbit controller.
#[derive(Debug)]
pub struct SceneState {
    settings: ViewerSettings,
    camera: PerspectiveCamera,
    controller: OrbitController,
    lights: Vec<Light>,
    mesh: Option<MeshNode>,
    ledger: ResourceLedger,
    version: u64,
}

impl SceneState {
    pub fn assemble(config: &SceneConfig, settings: &ViewerSettings, aspect: f32) -> Self {
        let camera = PerspectiveCamera::new(&settings.camera, aspect);
        let controller =
            OrbitController::new(camera.position, camera.target, settings.controls.clone());
        let mut scene = Self {
            settings: settings.clone(),
            camera,
            controller,
            lights: lights_for(settings),
            mesh: None,
            ledger: ResourceLedger::default(),
            version: 0,
        };
        scene.rebuild(config);
        scene
    }

    /// Replaces the mesh. The previous geometry, material and texture are
    /// released before the new ones are allocated.
    pub fn rebuild(&mut self, config: &SceneConfig) {
        if let Some(previous) = self.mesh.take() {
            self.release_mesh(&previous);
        }

        if !config.shape.is_recognized() {
            tracing::debug!("unrecognized shape {:?}; using fallback box", config.shape.to_string());
        }
        let geometry = geometry_for(&config.shape);
        let mesh = Arc::new(geometry.build());
        let material = select_material(config.texture.as_ref(), &self.settings.material);

        let resources = MeshResources {
            geometry: self.ledger.allocate(ResourceKind::Geometry),
            material: self.ledger.allocate(ResourceKind::Material),
            texture: material
                .texture()
                .map(|_| self.ledger.allocate(ResourceKind::Texture)),
        };

        self.version += 1;
        tracing::info!(
            "scene v{}: {} ({}, {} triangles) with {:?} material",
            self.version,
            config.shape,
            geometry.name(),
            mesh.triangle_count(),
            material.kind()
        );
        self.mesh = Some(MeshNode {
            shape: config.shape.clone(),
            geometry,
            mesh,
            material,
            rotation: Vec3::ZERO,
            resources,
        });
    }

    /// Drops the mesh and releases every live resource.
    pub fn teardown(&mut self) {
        self.mesh = None;
        self.ledger.release_all();
    }

    fn release_mesh(&mut self, node: &MeshNode) {
        self.ledger.release(node.resources.geometry);
        self.ledger.release(node.resources.material);
        if let Some(texture) = node.resources.texture {
            self.ledger.release(texture);
        }
    }

    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    pub fn material_settings(&self) -> &MaterialSettings {
        &self.settings.material
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut PerspectiveCamera {
        &mut self.camera
    }

    pub fn controller(&self) -> &OrbitController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut OrbitController {
        &mut self.controller
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn mesh(&self) -> Option<&MeshNode> {
        self.mesh.as_ref()
    }

    pub fn mesh_count(&self) -> usize {
        usize::from(self.mesh.is_some())
    }

    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    pub fn drain_released(&mut self) -> Vec<ResourceId> {
        self.ledger.drain_released()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn background(&self) -> [f32; 3] {
        self.settings.background
    }

    pub fn rotate_mesh(&mut self, step: f32) {
        if let Some(node) = self.mesh.as_mut() {
            node.rotation.x += step;
            node.rotation.y += step;
        }
    }

    /// Integrates controller motion into the camera. Returns true when it moved.
    pub fn update_controls(&mut self) -> bool {
        let moved = self.controller.update();
        self.controller.apply_to(&mut self.camera);
        moved
    }

    /// Data the renderer needs to (re)create GPU buffers for the current mesh.
    pub fn upload(&self) -> Option<SceneUpload> {
        let node = self.mesh.as_ref()?;
        let texture = match (node.resources.texture, node.material.texture()) {
            (Some(id), Some(image)) => Some((
                id,
                SceneTexture {
                    width: image.width,
                    height: image.height,
                    pixels: image.pixels.clone(),
                    srgb: image.color_space == ColorSpace::Srgb,
                },
            )),
            _ => None,
        };
        Some(SceneUpload {
            version: self.version,
            geometry: node.resources.geometry,
            mesh: Arc::new(node.mesh.to_scene_mesh()),
            material: SceneMaterial {
                id: node.resources.material,
                mode: material_mode(node.material.kind()),
                roughness: node.material.roughness(),
                texture,
            },
        })
    }

    pub fn snapshot(&self, frame_index: u64, surface_size: [u32; 2]) -> Option<FrameSnapshot> {
        let node = self.mesh.as_ref()?;
        Some(FrameSnapshot {
            frame_index,
            scene_version: self.version,
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(),
            model: node.model_matrix(),
            camera_position: self.camera.position.to_array(),
            lights: self.scene_lights(),
            material_mode: material_mode(node.material.kind()),
            roughness: node.material.roughness(),
            background: self.settings.background,
            surface_size,
        })
    }

    fn scene_lights(&self) -> SceneLights {
        let mut lights = SceneLights {
            ambient: [0.0; 3],
            directional: None,
        };
        for light in &self.lights {
            match *light {
                Light::Ambient { color, intensity } => {
                    for (channel, value) in lights.ambient.iter_mut().zip(color) {
                        *channel += value * intensity;
                    }
                }
                Light::Directional {
                    color,
                    intensity,
                    position,
                } => {
                    let direction = Vec3::from(position).normalize_or_zero();
                    lights.directional = Some(SceneDirectionalLight {
                        direction: direction.to_array(),
                        color: (Vec3::from(color) * intensity).to_array(),
                    });
                }
            }
        }
        lights
    }
}

fn lights_for(settings: &ViewerSettings) -> Vec<Light> {
    let mut lights = vec![Light::Ambient {
        color: settings.lights.ambient_color,
        intensity: settings.lights.ambient_intensity,
    }];
    if settings.material.variant == MaterialVariant::Lit {
        lights.push(Light::Directional {
            color: settings.lights.directional_color,
            intensity: settings.lights.directional_intensity,
            position: settings.lights.directional_position,
        });
    }
    lights
}

fn material_mode(kind: MaterialKind) -> SceneMaterialMode {
    match kind {
        MaterialKind::Normal => SceneMaterialMode::Normal,
        MaterialKind::Unlit => SceneMaterialMode::Unlit,
        MaterialKind::Lit => SceneMaterialMode::Lit,
    }
}

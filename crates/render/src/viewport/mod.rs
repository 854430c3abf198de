use std::sync::{Arc, Mutex};

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

use egui::epaint::{PaintCallback, Rect};
use egui_wgpu::{Callback, CallbackResources};
use solido_scene::{FrameSnapshot, ResourceId, SceneUpload};

mod callback;
mod mesh;
mod pipeline;
mod pipeline_scene;
mod pipeline_shaders;
mod pipeline_targets;

use callback::ViewportCallback;
use pipeline::PipelineState;

pub struct ViewportRenderer {
    target_format: egui_wgpu::wgpu::TextureFormat,
    stats: Arc<Mutex<ViewportStatsState>>,
    scene: Arc<Mutex<ViewportSceneState>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ViewportStats {
    pub fps: f32,
    pub frame_time_ms: f32,
    pub frame_index: u64,
    pub vertex_count: u32,
    pub triangle_count: u32,
    pub mesh_count: u32,
    pub texture_count: u32,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_uploads: u64,
    pub released: u64,
}

pub(super) struct ViewportStatsState {
    last_frame: Option<Instant>,
    stats: ViewportStats,
}

pub(super) struct ViewportSceneState {
    version: u64,
    upload: Option<Arc<SceneUpload>>,
    released: Vec<ResourceId>,
}

impl ViewportRenderer {
    pub fn new(target_format: egui_wgpu::wgpu::TextureFormat) -> Self {
        Self {
            target_format,
            stats: Arc::new(Mutex::new(ViewportStatsState {
                last_frame: None,
                stats: ViewportStats::default(),
            })),
            scene: Arc::new(Mutex::new(ViewportSceneState {
                version: 0,
                upload: None,
                released: Vec::new(),
            })),
        }
    }

    pub fn paint_callback(&self, rect: Rect, frame: FrameSnapshot) -> PaintCallback {
        Callback::new_paint_callback(
            rect,
            ViewportCallback {
                target_format: self.target_format,
                rect,
                frame,
                stats: self.stats.clone(),
                scene: self.scene.clone(),
            },
        )
    }

    pub fn stats_snapshot(&self) -> ViewportStats {
        self.stats
            .lock()
            .map(|state| state.stats)
            .unwrap_or_default()
    }

    /// Version of the last scene handed over with [`ViewportRenderer::set_scene`].
    pub fn scene_version(&self) -> Option<u64> {
        self.scene
            .lock()
            .ok()
            .and_then(|state| state.upload.as_ref().map(|upload| upload.version))
    }

    pub fn set_scene(&self, upload: SceneUpload) {
        if let Ok(mut state) = self.scene.lock() {
            state.version = state.version.wrapping_add(1);
            state.upload = Some(Arc::new(upload));
        }
    }

    pub fn clear_scene(&self) {
        if let Ok(mut state) = self.scene.lock() {
            state.version = state.version.wrapping_add(1);
            state.upload = None;
        }
    }

    /// Queues GPU objects for destruction in the next `prepare`.
    pub fn release(&self, ids: impl IntoIterator<Item = ResourceId>) {
        if let Ok(mut state) = self.scene.lock() {
            state.released.extend(ids);
        }
    }
}

/// Drops the viewport's GPU state from the renderer, destroying every buffer
/// and texture it holds. Returns false if nothing was ever created.
pub fn destroy_viewport_resources(callback_resources: &mut CallbackResources) -> bool {
    match callback_resources.remove::<PipelineState>() {
        Some(pipeline) => {
            pipeline.destroy();
            true
        }
        None => false,
    }
}

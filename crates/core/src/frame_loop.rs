use solido_scene::{FrameSnapshot, ResourceId, SceneUpload};

use crate::assembler::{SceneConfig, SceneState};
use crate::camera::ViewportState;
use crate::settings::ViewerSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Uninitialized,
    Running,
    Stopped,
}

/// Drives the scene one frame at a time. The host calls [`FrameLoop::tick`]
/// whenever it draws and only asks for another frame while
/// [`FrameLoop::should_schedule`] holds.
#[derive(Debug)]
pub struct FrameLoop {
    state: LoopState,
    settings: ViewerSettings,
    scene: Option<SceneState>,
    viewport: ViewportState,
    pending_config: Option<SceneConfig>,
    pending_resize: Option<[u32; 2]>,
    frame_index: u64,
    released: Vec<ResourceId>,
}

impl FrameLoop {
    pub fn new(settings: ViewerSettings) -> Self {
        Self {
            state: LoopState::Uninitialized,
            settings,
            scene: None,
            viewport: ViewportState::default(),
            pending_config: None,
            pending_resize: None,
            frame_index: 0,
            released: Vec::new(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    /// Builds the scene and starts running. A resize that arrived earlier
    /// overrides `surface`. Does nothing unless uninitialized.
    pub fn initialize(&mut self, config: SceneConfig, surface: [u32; 2]) {
        if self.state != LoopState::Uninitialized {
            tracing::debug!("frame loop already initialized ({:?})", self.state);
            return;
        }
        let [width, height] = self.pending_resize.take().unwrap_or(surface);
        self.viewport = ViewportState::new(width, height);
        self.scene = Some(SceneState::assemble(
            &config,
            &self.settings,
            self.viewport.aspect(),
        ));
        self.state = LoopState::Running;
        tracing::info!("frame loop running at {}x{}", self.viewport.width, self.viewport.height);
    }

    /// Queues a new configuration; it is applied at the start of the next tick.
    pub fn reconfigure(&mut self, config: SceneConfig) {
        match self.state {
            LoopState::Stopped => tracing::debug!("ignoring configuration after stop"),
            _ => self.pending_config = Some(config),
        }
    }

    /// Returns true when the surface size changed. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            tracing::debug!("ignoring zero-sized resize {width}x{height}");
            return false;
        }
        match self.state {
            LoopState::Uninitialized => {
                self.pending_resize = Some([width, height]);
                false
            }
            LoopState::Stopped => false,
            LoopState::Running => {
                if self.viewport.size() == [width, height] {
                    return false;
                }
                self.viewport = ViewportState::new(width, height);
                if let Some(scene) = self.scene.as_mut() {
                    scene.camera_mut().set_aspect(self.viewport.aspect());
                }
                tracing::debug!("surface resized to {width}x{height}");
                true
            }
        }
    }

    pub fn tick(&mut self) -> Option<FrameSnapshot> {
        if self.state != LoopState::Running {
            return None;
        }
        let scene = self.scene.as_mut()?;
        if let Some(config) = self.pending_config.take() {
            scene.rebuild(&config);
        }
        scene.rotate_mesh(self.settings.motion.rotation_step);
        scene.update_controls();
        self.frame_index += 1;
        scene.snapshot(self.frame_index, self.viewport.size())
    }

    /// True while a reconfiguration waits for the next tick.
    pub fn has_pending_config(&self) -> bool {
        self.pending_config.is_some()
    }

    pub fn should_schedule(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Stops scheduling and releases every live resource. Returns the ids the
    /// renderer still has to destroy.
    pub fn stop(&mut self) -> Vec<ResourceId> {
        if self.state == LoopState::Stopped {
            return self.drain_released();
        }
        self.state = LoopState::Stopped;
        self.pending_config = None;
        if let Some(mut scene) = self.scene.take() {
            scene.teardown();
            self.released.extend(scene.drain_released());
        }
        tracing::info!(
            "frame loop stopped after {} frames; releasing {} resources",
            self.frame_index,
            self.released.len()
        );
        self.drain_released()
    }

    pub fn drain_released(&mut self) -> Vec<ResourceId> {
        let mut released = std::mem::take(&mut self.released);
        if let Some(scene) = self.scene.as_mut() {
            released.extend(scene.drain_released());
        }
        released
    }

    pub fn upload(&self) -> Option<SceneUpload> {
        self.scene.as_ref()?.upload()
    }

    pub fn scene(&self) -> Option<&SceneState> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut SceneState> {
        self.scene.as_mut()
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

use std::sync::atomic::AtomicU8;
use std::sync::Arc;

use render::ViewportRenderer;
use solido_core::{FrameLoop, FrameSnapshot, LoopState, SceneConfig, ShapeSpec, ViewerSettings};
use tracing_subscriber::filter::LevelFilter;

use crate::error::ViewerError;
use crate::host::{HostInbox, HostMessage};

#[cfg(not(target_arch = "wasm32"))]
mod io;
mod logging;
mod ui;
mod viewport;

pub(crate) use logging::ConsoleBuffer;

#[cfg(not(target_arch = "wasm32"))]
pub(crate) use io::load_texture_file;

use logging::level_filter_to_u8;
use viewport::FrameGate;

pub(crate) struct SolidoApp {
    console: ConsoleBuffer,
    log_level: LevelFilter,
    log_level_state: Arc<AtomicU8>,
    render_state: egui_wgpu::RenderState,
    viewport_renderer: ViewportRenderer,
    frame_loop: FrameLoop,
    frame_gate: FrameGate,
    last_snapshot: Option<FrameSnapshot>,
    config: SceneConfig,
    inbox: HostInbox,
    show_console: bool,
}

pub(crate) fn setup_tracing() -> (ConsoleBuffer, Arc<AtomicU8>) {
    logging::setup_tracing()
}

impl SolidoApp {
    /// Fails when eframe was started without a wgpu render state; there is
    /// no software path to fall back to.
    pub(crate) fn new(
        cc: &eframe::CreationContext<'_>,
        console: ConsoleBuffer,
        log_level_state: Arc<AtomicU8>,
        settings: ViewerSettings,
        config: SceneConfig,
        inbox: HostInbox,
    ) -> Result<Self, ViewerError> {
        let render_state = cc
            .wgpu_render_state
            .clone()
            .ok_or(ViewerError::NoGraphicsContext)?;
        let viewport_renderer = ViewportRenderer::new(render_state.target_format);
        tracing::info!(
            "viewer ready: shape {}, texture {}",
            config.shape,
            if config.texture.is_some() { "yes" } else { "no" }
        );

        Ok(Self {
            console,
            log_level: LevelFilter::INFO,
            log_level_state,
            render_state,
            viewport_renderer,
            frame_loop: FrameLoop::new(settings),
            frame_gate: FrameGate::default(),
            last_snapshot: None,
            config,
            inbox,
            show_console: false,
        })
    }

    fn set_log_level(&mut self, new_level: LevelFilter) {
        if new_level == self.log_level {
            return;
        }

        self.log_level_state.store(
            level_filter_to_u8(new_level),
            std::sync::atomic::Ordering::Relaxed,
        );
        self.log_level = new_level;
    }

    /// Applies everything the host queued since the last frame. Scene
    /// changes reach the frame loop as one pending configuration, picked up
    /// before the next rotation step.
    fn apply_host_messages(&mut self) {
        let messages = self.inbox.drain();
        if messages.is_empty() {
            return;
        }

        let mut changed = false;
        let mut stop = false;
        for message in messages {
            match message {
                HostMessage::SetShape(tag) => {
                    self.config.shape = ShapeSpec::parse(&tag);
                    changed = true;
                }
                HostMessage::SetTexture(payload) => {
                    self.config.texture = Some(payload);
                    changed = true;
                }
                HostMessage::ClearTexture => {
                    self.config.texture = None;
                    changed = true;
                }
                HostMessage::Stop => stop = true,
            }
        }

        if stop {
            self.stop();
            return;
        }
        if changed && self.frame_loop.state() == LoopState::Running {
            self.frame_loop.reconfigure(self.config.clone());
        }
    }

    fn stop(&mut self) {
        if self.frame_loop.state() == LoopState::Stopped {
            return;
        }
        let released = self.frame_loop.stop();
        self.last_snapshot = None;
        self.viewport_renderer.release(released);
        self.viewport_renderer.clear_scene();
        self.destroy_gpu_resources();
    }

    fn destroy_gpu_resources(&self) {
        let mut renderer = self.render_state.renderer.write();
        if render::destroy_viewport_resources(&mut renderer.callback_resources) {
            tracing::info!("viewport GPU resources destroyed");
        }
    }
}

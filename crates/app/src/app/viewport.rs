use eframe::egui;
use render::ViewportStats;
use solido_core::LoopState;

use super::SolidoApp;

/// Remembers which egui frame already advanced the scene. A frame can run
/// more than one layout pass; only the first one ticks.
#[derive(Debug, Default)]
pub(super) struct FrameGate {
    last_frame: Option<u64>,
}

impl FrameGate {
    pub(super) fn first_pass(&mut self, frame_nr: u64) -> bool {
        if self.last_frame == Some(frame_nr) {
            return false;
        }
        self.last_frame = Some(frame_nr);
        true
    }
}

impl SolidoApp {
    /// Lays out the drawing surface, feeds it input and draws one frame.
    /// Width follows the panel, height comes from the settings.
    pub(super) fn show_viewport(&mut self, ui: &mut egui::Ui) {
        let available = ui.available_size();
        let height = self
            .frame_loop
            .settings()
            .surface_height
            .min(available.y)
            .max(1.0);
        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(available.x, height),
            egui::Sense::click_and_drag(),
        );
        let pixels_per_point = ui.ctx().pixels_per_point();
        let surface = [
            (rect.width() * pixels_per_point).round() as u32,
            (rect.height() * pixels_per_point).round() as u32,
        ];

        self.frame_loop.resize(surface[0], surface[1]);
        if self.frame_loop.state() == LoopState::Uninitialized && surface[0] > 0 && surface[1] > 0
        {
            self.frame_loop.initialize(self.config.clone(), surface);
        }

        if self.frame_loop.state() == LoopState::Stopped {
            let [r, g, b] = self.frame_loop.settings().background.map(|c| (c * 255.0).round() as u8);
            let background = egui::Color32::from_rgb(r, g, b);
            ui.painter().rect_filled(rect, 0.0, background);
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Stopped",
                egui::FontId::proportional(14.0),
                egui::Color32::GRAY,
            );
            return;
        }

        if self.frame_gate.first_pass(ui.ctx().cumulative_frame_nr()) {
            self.handle_viewport_input(&response, surface[1] as f32, pixels_per_point);
            self.last_snapshot = self.frame_loop.tick();
        }
        let Some(snapshot) = self.last_snapshot else {
            return;
        };
        if self.viewport_renderer.scene_version() != Some(snapshot.scene_version) {
            if let Some(upload) = self.frame_loop.upload() {
                self.viewport_renderer.set_scene(upload);
            }
        }
        let callback = self.viewport_renderer.paint_callback(rect, snapshot);
        ui.painter().add(egui::Shape::Callback(callback));
        self.viewport_renderer
            .release(self.frame_loop.drain_released());

        if self.frame_loop.settings().show_stats {
            self.draw_stats_overlay(ui, rect);
        }
    }

    fn handle_viewport_input(
        &mut self,
        response: &egui::Response,
        surface_height: f32,
        pixels_per_point: f32,
    ) {
        let Some(scene) = self.frame_loop.scene_mut() else {
            return;
        };
        let controller = scene.controller_mut();
        controller.set_viewport_height(surface_height);

        if response.drag_started_by(egui::PointerButton::Primary) {
            controller.begin_drag();
        }
        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_motion() * pixels_per_point;
            controller.rotate(delta.x, delta.y);
        }
        if response.drag_stopped_by(egui::PointerButton::Primary) {
            controller.end_drag();
        }

        if response.hovered() {
            let (scroll, zoom) = response
                .ctx
                .input(|i| (i.raw_scroll_delta, i.zoom_delta()));
            if scroll.y != 0.0 {
                controller.wheel(-scroll.y);
            }
            if zoom != 1.0 {
                controller.dolly(1.0 / zoom);
            }
        }
    }

    fn draw_stats_overlay(&self, ui: &egui::Ui, rect: egui::Rect) {
        let text = stats_text(&self.viewport_renderer.stats_snapshot());
        let font_id = egui::FontId::monospace(12.0);
        let galley =
            ui.fonts_mut(|f| f.layout_no_wrap(text, font_id, egui::Color32::WHITE));
        let padding = egui::vec2(6.0, 4.0);
        let bg_rect = egui::Rect::from_min_size(
            rect.min + egui::vec2(8.0, 8.0),
            galley.size() + padding * 2.0,
        );
        let painter = ui.painter();
        painter.rect_filled(bg_rect, 4.0, egui::Color32::from_black_alpha(160));
        painter.galley(bg_rect.min + padding, galley, egui::Color32::WHITE);
    }
}

fn stats_text(stats: &ViewportStats) -> String {
    format!(
        "FPS: {:.1}\nFrame: #{} ({:.2} ms)\nMeshes: {}\nVerts: {}\nTris: {}\nTextures: {}\nCache: {} hits / {} misses / {} uploads\nReleased: {}",
        stats.fps,
        stats.frame_index,
        stats.frame_time_ms,
        stats.mesh_count,
        stats.vertex_count,
        stats.triangle_count,
        stats.texture_count,
        stats.cache_hits,
        stats.cache_misses,
        stats.cache_uploads,
        stats.released
    )
}

use eframe::egui;
use solido_core::{LoopState, MaterialKind, ShapeKind};
use tracing_subscriber::filter::LevelFilter;

use crate::host::HostMessage;

use super::SolidoApp;

const LOG_LEVELS: [LevelFilter; 5] = [
    LevelFilter::ERROR,
    LevelFilter::WARN,
    LevelFilter::INFO,
    LevelFilter::DEBUG,
    LevelFilter::TRACE,
];

impl eframe::App for SolidoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_host_messages();

        egui::SidePanel::left("scene_panel")
            .resizable(false)
            .default_width(220.0)
            .show(ctx, |ui| self.show_scene_panel(ui));

        if self.show_console {
            egui::TopBottomPanel::bottom("console_panel")
                .resizable(true)
                .default_height(160.0)
                .show(ctx, |ui| self.show_console_panel(ui));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.show_viewport(ui));

        if self.frame_loop.should_schedule() {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self) {
        self.stop();
    }
}

impl SolidoApp {
    fn show_scene_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Solido");
        ui.separator();

        let running = self.frame_loop.state() != LoopState::Stopped;
        ui.add_enabled_ui(running, |ui| {
            let selected = self.config.shape.kind();
            let selected_text = selected
                .map(|kind| kind.label().to_string())
                .unwrap_or_else(|| format!("{} (box)", self.config.shape));
            egui::ComboBox::from_label("Shape")
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    for kind in ShapeKind::ALL {
                        if ui
                            .selectable_label(selected == Some(kind), kind.label())
                            .clicked()
                        {
                            self.inbox.push(HostMessage::SetShape(kind.tag().to_string()));
                        }
                    }
                });

            ui.add_space(6.0);
            let requested = self.config.texture.as_ref().map(|t| t.mime_type());
            let applied = if self.frame_loop.has_pending_config() {
                None
            } else {
                self.frame_loop
                    .scene()
                    .and_then(|scene| scene.mesh())
                    .map(|node| node.material.kind())
            };
            ui.label(format!("Texture: {}", texture_status(requested, applied)));
            ui.horizontal(|ui| {
                #[cfg(not(target_arch = "wasm32"))]
                {
                    if ui.button("Load texture...").clicked() {
                        self.open_texture_dialog();
                    }
                }
                if ui
                    .add_enabled(self.config.texture.is_some(), egui::Button::new("Clear"))
                    .clicked()
                {
                    self.inbox.push(HostMessage::ClearTexture);
                }
            });
        });

        ui.separator();
        if let Some(scene) = self.frame_loop.scene() {
            if let Some(node) = scene.mesh() {
                ui.label(format!("Geometry: {}", node.geometry.name()));
                ui.label(format!("Material: {:?}", node.material.kind()));
                ui.label(format!(
                    "Rotation: {:.2}, {:.2}",
                    node.rotation.x, node.rotation.y
                ));
            }
            ui.label(format!("Camera distance: {:.2}", scene.controller().distance()));
            ui.label(format!("Live resources: {}", scene.ledger().live_len()));
        }
        let [width, height] = self.frame_loop.viewport().size();
        ui.label(format!("Surface: {width}x{height}"));
        ui.label(format!("State: {:?}", self.frame_loop.state()));

        ui.separator();
        if ui.add_enabled(running, egui::Button::new("Stop")).clicked() {
            self.inbox.push(HostMessage::Stop);
        }
        ui.checkbox(&mut self.show_console, "Console");
    }

    fn show_console_panel(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let mut level = self.log_level;
            egui::ComboBox::from_id_salt("log_level")
                .selected_text(level.to_string())
                .show_ui(ui, |ui| {
                    for option in LOG_LEVELS {
                        ui.selectable_value(&mut level, option, option.to_string());
                    }
                });
            self.set_log_level(level);
            if ui.button("Clear").clicked() {
                self.console.clear();
            }
        });
        ui.separator();

        let lines = self.console.snapshot();
        egui::ScrollArea::vertical()
            .stick_to_bottom(true)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for line in lines {
                    ui.monospace(line);
                }
            });
    }
}

/// Describes the requested texture by what the mesh actually shows.
fn texture_status(requested: Option<&str>, applied: Option<MaterialKind>) -> String {
    match (requested, applied) {
        (None, _) => "none".to_string(),
        (Some(mime), None) => format!("{mime} (loading)"),
        (Some(mime), Some(MaterialKind::Normal)) => {
            format!("{mime} (decode failed, showing normals)")
        }
        (Some(mime), Some(kind)) => format!("{mime} ({kind:?})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_status_follows_the_applied_material() {
        assert_eq!(texture_status(None, Some(MaterialKind::Normal)), "none");
        assert_eq!(texture_status(Some("image/png"), None), "image/png (loading)");
        assert_eq!(
            texture_status(Some("image/png"), Some(MaterialKind::Unlit)),
            "image/png (Unlit)"
        );
        assert_eq!(
            texture_status(Some("image/png"), Some(MaterialKind::Normal)),
            "image/png (decode failed, showing normals)"
        );
    }
}

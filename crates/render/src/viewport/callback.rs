use std::sync::{Arc, Mutex};

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

use egui::epaint::Rect;
use egui_wgpu::wgpu;
use egui_wgpu::{CallbackResources, CallbackTrait};
use solido_scene::{FrameSnapshot, SceneMaterialMode};

use super::pipeline::{PipelineState, Uniforms};
use super::pipeline_scene::apply_scene_to_pipeline;
use super::pipeline_targets::ensure_offscreen_targets;
use super::{ViewportSceneState, ViewportStatsState};

pub(super) struct ViewportCallback {
    pub(super) target_format: wgpu::TextureFormat,
    pub(super) rect: Rect,
    pub(super) frame: FrameSnapshot,
    pub(super) stats: Arc<Mutex<ViewportStatsState>>,
    pub(super) scene: Arc<Mutex<ViewportSceneState>>,
}

impl CallbackTrait for ViewportCallback {
    fn prepare(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
        egui_encoder: &mut wgpu::CommandEncoder,
        callback_resources: &mut CallbackResources,
    ) -> Vec<wgpu::CommandBuffer> {
        if callback_resources.get::<PipelineState>().is_none() {
            callback_resources.insert(PipelineState::new(device, queue, self.target_format));
        }
        let Some(pipeline) = callback_resources.get_mut::<PipelineState>() else {
            return Vec::new();
        };

        let width = (self.rect.width() * screen_descriptor.pixels_per_point)
            .round()
            .max(1.0) as u32;
        let height = (self.rect.height() * screen_descriptor.pixels_per_point)
            .round()
            .max(1.0) as u32;
        ensure_offscreen_targets(device, pipeline, self.target_format, width, height);

        let mut released = 0;
        if let Ok(mut scene_state) = self.scene.lock() {
            // Released resources are destroyed before the new scene is uploaded.
            let ids = std::mem::take(&mut scene_state.released);
            released = pipeline.release(&ids);
            if scene_state.version != pipeline.scene_version {
                match scene_state.upload.clone() {
                    Some(upload) => apply_scene_to_pipeline(device, queue, pipeline, &upload),
                    None => {
                        pipeline.mesh_id = None;
                        pipeline.texture_id = None;
                        pipeline.vertex_count = 0;
                        pipeline.index_count = 0;
                    }
                }
                pipeline.scene_version = scene_state.version;
            }
        }

        let uniforms = frame_uniforms(
            &self.frame,
            self.target_format.is_srgb(),
            pipeline.texture_id.is_some(),
        );
        queue.write_buffer(&pipeline.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        if let Ok(mut stats_state) = self.stats.lock() {
            let now = Instant::now();
            if let Some(last) = stats_state.last_frame {
                let dt = (now - last).as_secs_f32();
                if dt > 0.0 {
                    let fps = 1.0 / dt;
                    let frame_ms = dt * 1000.0;
                    let alpha = 0.1;
                    if stats_state.stats.fps == 0.0 {
                        stats_state.stats.fps = fps;
                        stats_state.stats.frame_time_ms = frame_ms;
                    } else {
                        stats_state.stats.fps += (fps - stats_state.stats.fps) * alpha;
                        stats_state.stats.frame_time_ms +=
                            (frame_ms - stats_state.stats.frame_time_ms) * alpha;
                    }
                }
            }
            stats_state.last_frame = Some(now);

            let cache_stats = pipeline.mesh_cache.stats_snapshot();
            stats_state.stats.mesh_count = cache_stats.mesh_count;
            stats_state.stats.texture_count = pipeline.textures.len() as u32;
            stats_state.stats.cache_hits = cache_stats.hits;
            stats_state.stats.cache_misses = cache_stats.misses;
            stats_state.stats.cache_uploads = cache_stats.uploads;
            stats_state.stats.released += released as u64;
            stats_state.stats.vertex_count = pipeline.vertex_count;
            stats_state.stats.triangle_count = pipeline.index_count / 3;
            stats_state.stats.frame_index = self.frame.frame_index;
        }

        let mut render_pass = egui_encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("solido_viewport_offscreen"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &pipeline.offscreen_view,
                resolve_target: None,
                depth_slice: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color(
                        self.frame.background,
                        self.target_format.is_srgb(),
                    )),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &pipeline.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);
        let mesh = pipeline
            .mesh_id
            .and_then(|id| pipeline.mesh_cache.get(id));
        if let Some(mesh) = mesh {
            if mesh.index_count > 0 {
                render_pass.set_pipeline(&pipeline.mesh_pipeline);
                render_pass.set_bind_group(0, &pipeline.uniform_bind_group, &[]);
                render_pass.set_bind_group(1, pipeline.material_bind_group(), &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        Vec::new()
    }

    fn paint(
        &self,
        info: egui::epaint::PaintCallbackInfo,
        render_pass: &mut wgpu::RenderPass<'static>,
        callback_resources: &CallbackResources,
    ) {
        let viewport = info.viewport_in_pixels();
        if viewport.width_px <= 0 || viewport.height_px <= 0 {
            return;
        }

        let clip = info.clip_rect_in_pixels();
        if clip.width_px <= 0 || clip.height_px <= 0 {
            return;
        }

        let Some(pipeline) = callback_resources.get::<PipelineState>() else {
            return;
        };

        render_pass.set_viewport(
            viewport.left_px as f32,
            viewport.top_px as f32,
            viewport.width_px as f32,
            viewport.height_px as f32,
            0.0,
            1.0,
        );
        render_pass.set_scissor_rect(
            clip.left_px.max(0) as u32,
            clip.top_px.max(0) as u32,
            clip.width_px.max(0) as u32,
            clip.height_px.max(0) as u32,
        );
        render_pass.set_pipeline(&pipeline.blit_pipeline);
        render_pass.set_bind_group(0, &pipeline.blit_bind_group, &[]);
        render_pass.draw(0..3, 0..1);
    }
}

/// Textured modes fall back to normal shading when no texture made it to the GPU.
pub(super) fn frame_uniforms(
    frame: &FrameSnapshot,
    srgb_target: bool,
    texture_bound: bool,
) -> Uniforms {
    let mode = match frame.material_mode {
        SceneMaterialMode::Normal => 0.0,
        _ if !texture_bound => 0.0,
        SceneMaterialMode::Unlit => 1.0,
        SceneMaterialMode::Lit => 2.0,
    };
    let (light_dir, light_color, directional) = match frame.lights.directional {
        Some(light) => (light.direction, light.color, 1.0),
        None => ([0.0, 1.0, 0.0], [0.0; 3], 0.0),
    };
    Uniforms {
        view_proj: frame.view_proj().to_cols_array_2d(),
        view: frame.view.to_cols_array_2d(),
        model: frame.model.to_cols_array_2d(),
        normal_matrix: frame.model.inverse().transpose().to_cols_array_2d(),
        camera_pos: frame.camera_position,
        _pad0: 0.0,
        ambient: frame.lights.ambient,
        _pad1: 0.0,
        light_dir,
        _pad2: 0.0,
        light_color,
        _pad3: 0.0,
        material_params: [
            mode,
            frame.roughness,
            directional,
            if srgb_target { 1.0 } else { 0.0 },
        ],
    }
}

/// Background colors are display values; sRGB targets expect linear input.
pub(super) fn clear_color(background: [f32; 3], srgb_target: bool) -> wgpu::Color {
    let channel = |value: f32| {
        let value = value.clamp(0.0, 1.0) as f64;
        if !srgb_target {
            value
        } else if value <= 0.04045 {
            value / 12.92
        } else {
            ((value + 0.055) / 1.055).powf(2.4)
        }
    };
    wgpu::Color {
        r: channel(background[0]),
        g: channel(background[1]),
        b: channel(background[2]),
        a: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use glam::Mat4;
    use solido_scene::{SceneDirectionalLight, SceneLights};

    use super::*;

    fn frame(mode: SceneMaterialMode, directional: bool) -> FrameSnapshot {
        FrameSnapshot {
            frame_index: 1,
            scene_version: 1,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            model: Mat4::from_rotation_y(0.5),
            camera_position: [0.0, 0.0, 4.0],
            lights: SceneLights {
                ambient: [0.6; 3],
                directional: directional.then_some(SceneDirectionalLight {
                    direction: [0.0, 1.0, 0.0],
                    color: [0.8; 3],
                }),
            },
            material_mode: mode,
            roughness: 0.5,
            background: [14.0 / 255.0, 17.0 / 255.0, 23.0 / 255.0],
            surface_size: [800, 600],
        }
    }

    #[test]
    fn uniforms_encode_material_mode() {
        let uniforms = frame_uniforms(&frame(SceneMaterialMode::Lit, true), false, true);
        assert_eq!(uniforms.material_params, [2.0, 0.5, 1.0, 0.0]);
        assert_eq!(uniforms.light_color, [0.8; 3]);

        let uniforms = frame_uniforms(&frame(SceneMaterialMode::Normal, false), true, false);
        assert_eq!(uniforms.material_params[0], 0.0);
        assert_eq!(uniforms.material_params[2], 0.0);
        assert_eq!(uniforms.material_params[3], 1.0);
    }

    #[test]
    fn textured_modes_without_a_bound_texture_shade_normals() {
        let uniforms = frame_uniforms(&frame(SceneMaterialMode::Unlit, false), false, false);
        assert_eq!(uniforms.material_params[0], 0.0);
        let uniforms = frame_uniforms(&frame(SceneMaterialMode::Lit, true), false, false);
        assert_eq!(uniforms.material_params[0], 0.0);
        let uniforms = frame_uniforms(&frame(SceneMaterialMode::Unlit, false), false, true);
        assert_eq!(uniforms.material_params[0], 1.0);
    }

    #[test]
    fn uniform_block_is_aligned() {
        assert_eq!(std::mem::size_of::<Uniforms>() % 16, 0);
    }

    #[test]
    fn clear_color_linearizes_for_srgb_targets() {
        let background = [14.0 / 255.0, 17.0 / 255.0, 23.0 / 255.0];
        let plain = clear_color(background, false);
        assert!((plain.r - 14.0 / 255.0).abs() < 1.0e-6);
        let linear = clear_color(background, true);
        assert!(linear.r < plain.r);
        assert!(linear.b < plain.b);
        assert_eq!(linear.a, 1.0);
    }
}

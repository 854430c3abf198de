use egui_wgpu::wgpu;
use egui_wgpu::wgpu::util::DeviceExt as _;
use solido_scene::ResourceId;

use crate::mesh_cache::GpuMeshCache;

use super::mesh::{Vertex, VERTEX_ATTRIBUTES};
use super::pipeline_scene::{create_texture_bind_group, upload_texture, GpuTextureCache};
use super::pipeline_shaders::{create_blit_shader, create_mesh_shader};
use super::pipeline_targets::{create_blit_bind_group, create_offscreen_targets};

pub(super) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub(super) struct Uniforms {
    pub(super) view_proj: [[f32; 4]; 4],
    pub(super) view: [[f32; 4]; 4],
    pub(super) model: [[f32; 4]; 4],
    pub(super) normal_matrix: [[f32; 4]; 4],
    pub(super) camera_pos: [f32; 3],
    pub(super) _pad0: f32,
    pub(super) ambient: [f32; 3],
    pub(super) _pad1: f32,
    pub(super) light_dir: [f32; 3],
    pub(super) _pad2: f32,
    pub(super) light_color: [f32; 3],
    pub(super) _pad3: f32,
    pub(super) material_params: [f32; 4],
}

impl Default for Uniforms {
    fn default() -> Self {
        let identity = glam::Mat4::IDENTITY.to_cols_array_2d();
        Self {
            view_proj: identity,
            view: identity,
            model: identity,
            normal_matrix: identity,
            camera_pos: [0.0, 0.0, 4.0],
            _pad0: 0.0,
            ambient: [1.0, 1.0, 1.0],
            _pad1: 0.0,
            light_dir: [0.0, 1.0, 0.0],
            _pad2: 0.0,
            light_color: [0.0, 0.0, 0.0],
            _pad3: 0.0,
            material_params: [0.0, 1.0, 0.0, 0.0],
        }
    }
}

pub(super) struct PipelineState {
    pub(super) mesh_pipeline: wgpu::RenderPipeline,
    pub(super) blit_pipeline: wgpu::RenderPipeline,
    pub(super) blit_bind_group: wgpu::BindGroup,
    pub(super) blit_bind_group_layout: wgpu::BindGroupLayout,
    pub(super) blit_sampler: wgpu::Sampler,
    pub(super) offscreen_texture: wgpu::Texture,
    pub(super) offscreen_view: wgpu::TextureView,
    pub(super) depth_texture: wgpu::Texture,
    pub(super) depth_view: wgpu::TextureView,
    pub(super) offscreen_size: [u32; 2],
    pub(super) uniform_buffer: wgpu::Buffer,
    pub(super) uniform_bind_group: wgpu::BindGroup,
    pub(super) texture_bind_group_layout: wgpu::BindGroupLayout,
    pub(super) texture_sampler: wgpu::Sampler,
    pub(super) fallback_texture: wgpu::Texture,
    pub(super) fallback_bind_group: wgpu::BindGroup,
    pub(super) mesh_cache: GpuMeshCache,
    pub(super) textures: GpuTextureCache,
    pub(super) mesh_id: Option<ResourceId>,
    pub(super) texture_id: Option<ResourceId>,
    pub(super) vertex_count: u32,
    pub(super) index_count: u32,
    pub(super) scene_version: u64,
}

impl PipelineState {
    pub(super) fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = create_mesh_shader(device);

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("solido_viewport_uniforms"),
            contents: bytemuck::bytes_of(&Uniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("solido_viewport_uniform_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("solido_viewport_texture_layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("solido_viewport_uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let texture_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("solido_material_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let (fallback_texture, fallback_view) =
            upload_texture(device, queue, "solido_material_fallback", 1, 1, true, &[255; 4]);
        let fallback_bind_group = create_texture_bind_group(
            device,
            &texture_bind_group_layout,
            &fallback_view,
            &texture_sampler,
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("solido_viewport_layout"),
            bind_group_layouts: &[&uniform_layout, &texture_bind_group_layout],
            push_constant_ranges: &[],
        });

        let mesh_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("solido_viewport_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &VERTEX_ATTRIBUTES,
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let blit_shader = create_blit_shader(device);
        let blit_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("solido_viewport_blit_layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });
        let blit_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("solido_viewport_blit_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let blit_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("solido_viewport_blit_pipeline_layout"),
            bind_group_layouts: &[&blit_bind_group_layout],
            push_constant_ranges: &[],
        });
        let blit_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("solido_viewport_blit_pipeline"),
            layout: Some(&blit_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &blit_shader,
                entry_point: Some("vs_blit"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &blit_shader,
                entry_point: Some("fs_blit"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let (offscreen_texture, offscreen_view, depth_texture, depth_view) =
            create_offscreen_targets(device, target_format, 1, 1);
        let blit_bind_group =
            create_blit_bind_group(device, &blit_bind_group_layout, &offscreen_view, &blit_sampler);

        Self {
            mesh_pipeline,
            blit_pipeline,
            blit_bind_group,
            blit_bind_group_layout,
            blit_sampler,
            offscreen_texture,
            offscreen_view,
            depth_texture,
            depth_view,
            offscreen_size: [1, 1],
            uniform_buffer,
            uniform_bind_group,
            texture_bind_group_layout,
            texture_sampler,
            fallback_texture,
            fallback_bind_group,
            mesh_cache: GpuMeshCache::new(),
            textures: GpuTextureCache::default(),
            mesh_id: None,
            texture_id: None,
            vertex_count: 0,
            index_count: 0,
            scene_version: 0,
        }
    }

    /// Bind group for the active material texture, or the 1x1 white fallback.
    pub(super) fn material_bind_group(&self) -> &wgpu::BindGroup {
        self.texture_id
            .and_then(|id| self.textures.get(id))
            .map(|texture| &texture.bind_group)
            .unwrap_or(&self.fallback_bind_group)
    }

    /// Destroys GPU objects for ids the scene no longer owns.
    pub(super) fn release(&mut self, ids: &[ResourceId]) -> usize {
        let mut destroyed = 0;
        for &id in ids {
            if self.mesh_cache.release(id) {
                destroyed += 1;
            }
            if self.textures.release(id) {
                destroyed += 1;
            }
            if self.mesh_id == Some(id) {
                self.mesh_id = None;
                self.vertex_count = 0;
                self.index_count = 0;
            }
            if self.texture_id == Some(id) {
                self.texture_id = None;
            }
        }
        destroyed
    }

    /// Destroys every buffer and texture this state owns.
    pub(super) fn destroy(mut self) {
        self.mesh_cache.clear();
        self.textures.clear();
        self.fallback_texture.destroy();
        self.offscreen_texture.destroy();
        self.depth_texture.destroy();
        self.uniform_buffer.destroy();
    }
}

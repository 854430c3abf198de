use std::collections::HashMap;

use egui_wgpu::wgpu;
use egui_wgpu::wgpu::util::DeviceExt as _;
use solido_scene::{ResourceId, SceneTexture, SceneUpload};

use super::mesh::{build_vertices, Vertex};
use super::pipeline::PipelineState;

pub(super) struct GpuTexture {
    texture: wgpu::Texture,
    pub(super) bind_group: wgpu::BindGroup,
    pub(super) size: [u32; 2],
}

#[derive(Default)]
pub(super) struct GpuTextureCache {
    textures: HashMap<ResourceId, GpuTexture>,
}

impl GpuTextureCache {
    pub(super) fn get(&self, id: ResourceId) -> Option<&GpuTexture> {
        self.textures.get(&id)
    }

    pub(super) fn contains(&self, id: ResourceId) -> bool {
        self.textures.contains_key(&id)
    }

    pub(super) fn insert(&mut self, id: ResourceId, texture: GpuTexture) {
        if let Some(previous) = self.textures.insert(id, texture) {
            previous.texture.destroy();
        }
    }

    pub(super) fn release(&mut self, id: ResourceId) -> bool {
        match self.textures.remove(&id) {
            Some(texture) => {
                texture.texture.destroy();
                true
            }
            None => false,
        }
    }

    pub(super) fn clear(&mut self) {
        for (_, texture) in self.textures.drain() {
            texture.texture.destroy();
        }
    }

    pub(super) fn len(&self) -> usize {
        self.textures.len()
    }
}

pub(super) fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    width: u32,
    height: u32,
    srgb: bool,
    pixels: &[u8],
) -> (wgpu::Texture, wgpu::TextureView) {
    let format = if srgb {
        wgpu::TextureFormat::Rgba8UnormSrgb
    } else {
        wgpu::TextureFormat::Rgba8Unorm
    };
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        pixels,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

pub(super) fn create_texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("solido_material_bind_group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

/// Checks that the pixel buffer and the texture limits agree with the
/// declared size.
pub(super) fn texture_is_uploadable(texture: &SceneTexture, max_dimension: u32) -> bool {
    let expected = (texture.width as usize)
        .saturating_mul(texture.height as usize)
        .saturating_mul(4);
    texture.width > 0
        && texture.height > 0
        && texture.width <= max_dimension
        && texture.height <= max_dimension
        && texture.pixels.len() == expected
}

pub(super) fn apply_scene_to_pipeline(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    pipeline: &mut PipelineState,
    upload: &SceneUpload,
) {
    let (vertices, indices) = build_vertices(&upload.mesh);
    let uploaded = pipeline
        .mesh_cache
        .upload_or_update(
            device,
            upload.geometry,
            bytemuck::cast_slice(&vertices),
            std::mem::size_of::<Vertex>(),
            &indices,
        )
        .is_some();
    if uploaded {
        pipeline.mesh_id = Some(upload.geometry);
        pipeline.vertex_count = vertices.len() as u32;
        pipeline.index_count = indices.len() as u32;
    } else {
        pipeline.mesh_id = None;
        pipeline.vertex_count = 0;
        pipeline.index_count = 0;
    }

    pipeline.texture_id = None;
    if let Some((id, texture)) = &upload.material.texture {
        let max_dimension = device.limits().max_texture_dimension_2d;
        if pipeline.textures.contains(*id) {
            pipeline.texture_id = Some(*id);
        } else if texture_is_uploadable(texture, max_dimension) {
            let (gpu_texture, view) = upload_texture(
                device,
                queue,
                "solido_material_texture",
                texture.width,
                texture.height,
                texture.srgb,
                &texture.pixels,
            );
            let bind_group = create_texture_bind_group(
                device,
                &pipeline.texture_bind_group_layout,
                &view,
                &pipeline.texture_sampler,
            );
            pipeline.textures.insert(
                *id,
                GpuTexture {
                    texture: gpu_texture,
                    bind_group,
                    size: [texture.width, texture.height],
                },
            );
            pipeline.texture_id = Some(*id);
        } else {
            tracing::warn!(
                "skipping texture {}x{} ({} bytes); limit {}; shading normals",
                texture.width,
                texture.height,
                texture.pixels.len(),
                max_dimension
            );
        }
    }

    tracing::debug!(
        "uploaded scene v{}: {} vertices, {} triangles, texture {:?}",
        upload.version,
        pipeline.vertex_count,
        pipeline.index_count / 3,
        pipeline
            .texture_id
            .and_then(|id| pipeline.textures.get(id))
            .map(|t| t.size)
    );
}

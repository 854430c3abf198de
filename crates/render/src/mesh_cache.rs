use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use egui_wgpu::wgpu;
use egui_wgpu::wgpu::util::DeviceExt as _;
use solido_scene::ResourceId;

pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    pub index_count: u32,
    hash: u64,
}

impl GpuMesh {
    fn destroy(&self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GpuMeshCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub uploads: u64,
    pub released: u64,
    pub mesh_count: u32,
}

/// Vertex and index buffers keyed by the scene's geometry id.
pub struct GpuMeshCache {
    meshes: HashMap<ResourceId, GpuMesh>,
    hits: AtomicU64,
    misses: AtomicU64,
    uploads: AtomicU64,
    released: AtomicU64,
}

impl GpuMeshCache {
    pub fn new() -> Self {
        Self {
            meshes: HashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            uploads: AtomicU64::new(0),
            released: AtomicU64::new(0),
        }
    }

    pub fn get(&self, id: ResourceId) -> Option<&GpuMesh> {
        let mesh = self.meshes.get(&id);
        if mesh.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        mesh
    }

    /// Uploads unless a mesh with identical contents is already cached under `id`.
    pub fn upload_or_update(
        &mut self,
        device: &wgpu::Device,
        id: ResourceId,
        vertices: &[u8],
        vertex_stride: usize,
        indices: &[u32],
    ) -> Option<&GpuMesh> {
        let hash = hash_mesh(vertices, indices);
        let index_count = indices.len() as u32;
        let needs_upload = self
            .meshes
            .get(&id)
            .map(|mesh| mesh.hash != hash || mesh.index_count != index_count)
            .unwrap_or(true);

        if needs_upload {
            let max_buffer_size = device.limits().max_buffer_size as usize;
            let index_bytes = indices.len() * std::mem::size_of::<u32>();
            if vertices.len() > max_buffer_size || index_bytes > max_buffer_size {
                tracing::warn!(
                    "mesh {:?} exceeds the device buffer limit ({} bytes)",
                    id,
                    max_buffer_size
                );
                return None;
            }
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("solido_mesh_vertices"),
                contents: vertices,
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("solido_mesh_indices"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            let mesh = GpuMesh {
                vertex_buffer,
                index_buffer,
                vertex_count: (vertices.len() / vertex_stride.max(1)) as u32,
                index_count,
                hash,
            };
            if let Some(previous) = self.meshes.insert(id, mesh) {
                previous.destroy();
            }
            self.uploads.fetch_add(1, Ordering::Relaxed);
        }

        self.meshes.get(&id)
    }

    /// Destroys the buffers behind `id`. Unknown ids are ignored.
    pub fn release(&mut self, id: ResourceId) -> bool {
        match self.meshes.remove(&id) {
            Some(mesh) => {
                mesh.destroy();
                self.released.fetch_add(1, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        for (_, mesh) in self.meshes.drain() {
            mesh.destroy();
            self.released.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn stats_snapshot(&self) -> GpuMeshCacheStats {
        GpuMeshCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            uploads: self.uploads.load(Ordering::Relaxed),
            released: self.released.load(Ordering::Relaxed),
            mesh_count: self.meshes.len() as u32,
        }
    }
}

fn hash_mesh(vertices: &[u8], indices: &[u32]) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    vertices.hash(&mut hasher);
    indices.hash(&mut hasher);
    hasher.finish()
}

use egui_wgpu::wgpu;
use solido_scene::SceneMesh;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct Vertex {
    pub(crate) position: [f32; 3],
    pub(crate) normal: [f32; 3],
    pub(crate) uv: [f32; 2],
}

pub(crate) const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

/// Interleaves the mesh streams. Missing normals or UVs fall back to +Y and (0, 0);
/// out-of-range indices are dropped with their triangle.
pub(crate) fn build_vertices(mesh: &SceneMesh) -> (Vec<Vertex>, Vec<u32>) {
    let fallback_normal = [0.0, 1.0, 0.0];
    let vertices: Vec<Vertex> = mesh
        .positions
        .iter()
        .enumerate()
        .map(|(idx, position)| Vertex {
            position: *position,
            normal: mesh.normals.get(idx).copied().unwrap_or(fallback_normal),
            uv: mesh.uvs.get(idx).copied().unwrap_or([0.0, 0.0]),
        })
        .collect();

    let vertex_count = vertices.len() as u32;
    let indices = mesh
        .indices
        .chunks_exact(3)
        .filter(|tri| tri.iter().all(|&i| i < vertex_count))
        .flatten()
        .copied()
        .collect();
    (vertices, indices)
}

use glam::Vec3;
use solido_scene::SceneMesh;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Aabb {
    pub fn size(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

/// Indexed triangle mesh with one normal and one UV per vertex.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub(crate) fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(normal);
        self.uvs.push(uv);
        index
    }

    pub(crate) fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    pub fn bounds(&self) -> Option<Aabb> {
        let first = *self.positions.first()?;
        let mut min = first;
        let mut max = first;
        for position in &self.positions[1..] {
            for i in 0..3 {
                min[i] = min[i].min(position[i]);
                max[i] = max[i].max(position[i]);
            }
        }
        Some(Aabb { min, max })
    }

    /// Geometric normal of triangle `tri`, following its winding.
    pub fn face_normal(&self, tri: usize) -> Option<Vec3> {
        let base = tri * 3;
        let corners = self.indices.get(base..base + 3)?;
        let a = Vec3::from(*self.positions.get(corners[0] as usize)?);
        let b = Vec3::from(*self.positions.get(corners[1] as usize)?);
        let c = Vec3::from(*self.positions.get(corners[2] as usize)?);
        Some((b - a).cross(c - a).normalize_or_zero())
    }

    pub fn to_scene_mesh(&self) -> SceneMesh {
        SceneMesh {
            positions: self.positions.clone(),
            normals: self.normals.clone(),
            uvs: self.uvs.clone(),
            indices: self.indices.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_for_simple_points() {
        let mut mesh = Mesh::new();
        mesh.push_vertex([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0]);
        mesh.push_vertex([2.0, 1.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0]);
        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.min, [0.0, 0.0, -1.0]);
        assert_eq!(bounds.max, [2.0, 1.0, 0.0]);
        assert_eq!(bounds.size(), [2.0, 1.0, 1.0]);
    }

    #[test]
    fn empty_mesh_has_no_bounds() {
        assert!(Mesh::new().bounds().is_none());
    }

    #[test]
    fn face_normal_follows_winding() {
        let mut mesh = Mesh::new();
        let a = mesh.push_vertex([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]);
        let b = mesh.push_vertex([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]);
        let c = mesh.push_vertex([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]);
        mesh.push_triangle(a, b, c);
        let normal = mesh.face_normal(0).unwrap();
        assert!((normal - Vec3::Z).length() < 1.0e-6);
        assert!(mesh.face_normal(1).is_none());
    }
}

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::mesh::Mesh;

const GOLDEN: f32 = 1.618_034;

// (normal, u axis, v axis) per face, u x v == normal so corners wind CCW from outside.
const BOX_FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
];

pub fn make_box(size: [f32; 3]) -> Mesh {
    let half = [size[0] * 0.5, size[1] * 0.5, size[2] * 0.5];
    let corners = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];

    let mut mesh = Mesh::new();
    for (normal, u_dir, v_dir) in BOX_FACES {
        let base = mesh.vertex_count() as u32;
        for [cu, cv] in corners {
            let mut position = [0.0; 3];
            for i in 0..3 {
                position[i] = (normal[i] + u_dir[i] * cu + v_dir[i] * cv) * half[i];
            }
            let uv = [(cu + 1.0) * 0.5, (1.0 - cv) * 0.5];
            mesh.push_vertex(position, normal, uv);
        }
        mesh.push_triangle(base, base + 1, base + 2);
        mesh.push_triangle(base, base + 2, base + 3);
    }
    mesh
}

pub fn make_uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let rows = height_segments.max(2);
    let cols = width_segments.max(3);
    let mut mesh = Mesh::new();

    for r in 0..=rows {
        let v = r as f32 / rows as f32;
        let theta = v * PI;
        let (sin_theta, cos_theta) = theta.sin_cos();
        for c in 0..=cols {
            let u = c as f32 / cols as f32;
            let (sin_phi, cos_phi) = (u * TAU).sin_cos();
            let normal = [-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta];
            let position = [normal[0] * radius, normal[1] * radius, normal[2] * radius];
            mesh.push_vertex(position, normal, [u, v]);
        }
    }

    let stride = cols + 1;
    for r in 0..rows {
        for c in 0..cols {
            let i0 = r * stride + c;
            let i1 = i0 + 1;
            let i2 = i0 + stride;
            let i3 = i2 + 1;
            // The first and last rows collapse into the poles.
            if r != rows - 1 {
                mesh.push_triangle(i0, i2, i3);
            }
            if r != 0 {
                mesh.push_triangle(i0, i3, i1);
            }
        }
    }
    mesh
}

/// Capped frustum along Y. A zero top radius gives a cone.
pub fn make_cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Mesh {
    let segments = radial_segments.max(3);
    let radius_top = radius_top.max(0.0);
    let radius_bottom = radius_bottom.max(0.0);
    let height = height.max(0.0);
    let half = height * 0.5;
    let slope = if height > 0.0 {
        (radius_bottom - radius_top) / height
    } else {
        0.0
    };

    let mut mesh = Mesh::new();
    let stride = segments + 1;
    for (row, (y, radius)) in [(half, radius_top), (-half, radius_bottom)].into_iter().enumerate() {
        for c in 0..=segments {
            let u = c as f32 / segments as f32;
            let (sin_t, cos_t) = (u * TAU).sin_cos();
            let normal = Vec3::new(sin_t, slope, cos_t).normalize_or_zero();
            mesh.push_vertex(
                [radius * sin_t, y, radius * cos_t],
                normal.to_array(),
                [u, row as f32],
            );
        }
    }
    for c in 0..segments {
        let a = c;
        let b = c + stride;
        let cc = b + 1;
        let d = a + 1;
        if radius_top > 0.0 {
            mesh.push_triangle(a, b, d);
        }
        if radius_bottom > 0.0 {
            mesh.push_triangle(b, cc, d);
        }
    }

    if radius_top > 0.0 {
        push_cap(&mut mesh, radius_top, half, segments, true);
    }
    if radius_bottom > 0.0 {
        push_cap(&mut mesh, radius_bottom, -half, segments, false);
    }
    mesh
}

pub fn make_cone(radius: f32, height: f32, radial_segments: u32) -> Mesh {
    make_cylinder(0.0, radius, height, radial_segments)
}

fn push_cap(mesh: &mut Mesh, radius: f32, y: f32, segments: u32, top: bool) {
    let sign = if top { 1.0 } else { -1.0 };
    let normal = [0.0, sign, 0.0];
    let center = mesh.push_vertex([0.0, y, 0.0], normal, [0.5, 0.5]);
    let ring_start = mesh.vertex_count() as u32;
    for c in 0..=segments {
        let u = c as f32 / segments as f32;
        let (sin_t, cos_t) = (u * TAU).sin_cos();
        mesh.push_vertex(
            [radius * sin_t, y, radius * cos_t],
            normal,
            [sin_t * 0.5 + 0.5, cos_t * 0.5 * sign + 0.5],
        );
    }
    for c in 0..segments {
        let i = ring_start + c;
        if top {
            mesh.push_triangle(center, i, i + 1);
        } else {
            mesh.push_triangle(center, i + 1, i);
        }
    }
}

pub fn make_tetrahedron(radius: f32) -> Mesh {
    let vertices = [
        [1.0, 1.0, 1.0],
        [-1.0, -1.0, 1.0],
        [-1.0, 1.0, -1.0],
        [1.0, -1.0, -1.0],
    ];
    let faces = [[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]];
    make_polyhedron(&vertices, &faces, radius)
}

pub fn make_octahedron(radius: f32) -> Mesh {
    let vertices = [
        [1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
    ];
    let faces = [
        [0, 2, 4],
        [0, 4, 3],
        [0, 3, 5],
        [0, 5, 2],
        [1, 2, 5],
        [1, 5, 3],
        [1, 3, 4],
        [1, 4, 2],
    ];
    make_polyhedron(&vertices, &faces, radius)
}

pub fn make_icosahedron(radius: f32) -> Mesh {
    let t = GOLDEN;
    let vertices = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ];
    let faces = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    make_polyhedron(&vertices, &faces, radius)
}

pub fn make_dodecahedron(radius: f32) -> Mesh {
    let t = GOLDEN;
    let r = 1.0 / t;
    let vertices = [
        [-1.0, -1.0, -1.0],
        [-1.0, -1.0, 1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, 1.0, 1.0],
        [1.0, -1.0, -1.0],
        [1.0, -1.0, 1.0],
        [1.0, 1.0, -1.0],
        [1.0, 1.0, 1.0],
        [0.0, -r, -t],
        [0.0, -r, t],
        [0.0, r, -t],
        [0.0, r, t],
        [-r, -t, 0.0],
        [-r, t, 0.0],
        [r, -t, 0.0],
        [r, t, 0.0],
        [-t, 0.0, -r],
        [t, 0.0, -r],
        [-t, 0.0, r],
        [t, 0.0, r],
    ];
    // Each pentagon is fanned into three triangles.
    let faces = [
        [3, 11, 7],
        [3, 7, 15],
        [3, 15, 13],
        [7, 19, 17],
        [7, 17, 6],
        [7, 6, 15],
        [17, 4, 8],
        [17, 8, 10],
        [17, 10, 6],
        [8, 0, 16],
        [8, 16, 2],
        [8, 2, 10],
        [0, 12, 1],
        [0, 1, 18],
        [0, 18, 16],
        [6, 10, 2],
        [6, 2, 13],
        [6, 13, 15],
        [2, 16, 18],
        [2, 18, 3],
        [2, 3, 13],
        [18, 1, 9],
        [18, 9, 11],
        [18, 11, 3],
        [4, 14, 12],
        [4, 12, 0],
        [4, 0, 8],
        [11, 9, 5],
        [11, 5, 19],
        [11, 19, 7],
        [19, 5, 14],
        [19, 14, 4],
        [19, 4, 17],
        [1, 12, 14],
        [1, 14, 5],
        [1, 5, 9],
    ];
    make_polyhedron(&vertices, &faces, radius)
}

/// Projects the seed vertices onto a sphere of `radius` and emits one flat-shaded
/// triangle per face, flipping any face whose winding points inwards.
fn make_polyhedron(vertices: &[[f32; 3]], faces: &[[usize; 3]], radius: f32) -> Mesh {
    let projected: Vec<Vec3> = vertices
        .iter()
        .map(|v| Vec3::from(*v).normalize_or_zero() * radius)
        .collect();

    let mut mesh = Mesh::new();
    for face in faces {
        let mut corners = [projected[face[0]], projected[face[1]], projected[face[2]]];
        let centroid = (corners[0] + corners[1] + corners[2]) / 3.0;
        let mut normal = (corners[1] - corners[0])
            .cross(corners[2] - corners[0])
            .normalize_or_zero();
        if normal.dot(centroid) < 0.0 {
            corners.swap(1, 2);
            normal = -normal;
        }

        let base = mesh.vertex_count() as u32;
        for corner in corners {
            mesh.push_vertex(corner.to_array(), normal.to_array(), spherical_uv(corner));
        }
        mesh.push_triangle(base, base + 1, base + 2);
    }
    mesh
}

fn spherical_uv(position: Vec3) -> [f32; 2] {
    let dir = position.normalize_or_zero();
    let u = dir.z.atan2(dir.x) / TAU + 0.5;
    let v = 0.5 - dir.y.clamp(-1.0, 1.0).asin() / PI;
    [u, v]
}

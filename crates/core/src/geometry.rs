use serde::Serialize;

use crate::mesh::Mesh;
use crate::mesh_primitives::{
    make_box, make_cone, make_cylinder, make_dodecahedron, make_icosahedron, make_octahedron,
    make_tetrahedron, make_uv_sphere,
};
use crate::shape::{ShapeKind, ShapeSpec};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeometryDesc {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Tetrahedron {
        radius: f32,
    },
    Octahedron {
        radius: f32,
    },
    Dodecahedron {
        radius: f32,
    },
    Icosahedron {
        radius: f32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
    Cone {
        radius: f32,
        height: f32,
        radial_segments: u32,
    },
}

pub const FALLBACK_GEOMETRY: GeometryDesc = GeometryDesc::Box {
    width: 2.0,
    height: 2.0,
    depth: 2.0,
};

const POLY_RADIUS: f32 = 1.8;

pub const SHAPE_TABLE: [(ShapeKind, GeometryDesc); 9] = [
    (
        ShapeKind::Cube,
        GeometryDesc::Box {
            width: 2.5,
            height: 2.5,
            depth: 2.5,
        },
    ),
    (
        ShapeKind::Rect,
        GeometryDesc::Box {
            width: 1.5,
            height: 3.0,
            depth: 1.5,
        },
    ),
    (
        ShapeKind::Tetrahedron,
        GeometryDesc::Tetrahedron {
            radius: POLY_RADIUS,
        },
    ),
    (
        ShapeKind::Octahedron,
        GeometryDesc::Octahedron {
            radius: POLY_RADIUS,
        },
    ),
    (
        ShapeKind::Dodecahedron,
        GeometryDesc::Dodecahedron {
            radius: POLY_RADIUS,
        },
    ),
    (
        ShapeKind::Icosahedron,
        GeometryDesc::Icosahedron {
            radius: POLY_RADIUS,
        },
    ),
    (
        ShapeKind::Sphere,
        GeometryDesc::Sphere {
            radius: 1.6,
            width_segments: 32,
            height_segments: 32,
        },
    ),
    (
        ShapeKind::Cylinder,
        GeometryDesc::Cylinder {
            radius_top: 1.0,
            radius_bottom: 1.0,
            height: 3.0,
            radial_segments: 32,
        },
    ),
    (
        ShapeKind::Pyramid,
        GeometryDesc::Cone {
            radius: 1.8,
            height: 2.5,
            radial_segments: 4,
        },
    ),
];

/// Never fails: anything outside the table gets [`FALLBACK_GEOMETRY`].
pub fn geometry_for(spec: &ShapeSpec) -> GeometryDesc {
    let Some(kind) = spec.kind() else {
        return FALLBACK_GEOMETRY;
    };
    SHAPE_TABLE
        .iter()
        .find(|(entry, _)| *entry == kind)
        .map(|(_, desc)| *desc)
        .unwrap_or(FALLBACK_GEOMETRY)
}

impl GeometryDesc {
    pub fn name(&self) -> &'static str {
        match self {
            GeometryDesc::Box { .. } => "box",
            GeometryDesc::Tetrahedron { .. } => "tetrahedron",
            GeometryDesc::Octahedron { .. } => "octahedron",
            GeometryDesc::Dodecahedron { .. } => "dodecahedron",
            GeometryDesc::Icosahedron { .. } => "icosahedron",
            GeometryDesc::Sphere { .. } => "sphere",
            GeometryDesc::Cylinder { .. } => "cylinder",
            GeometryDesc::Cone { .. } => "cone",
        }
    }

    pub fn build(&self) -> Mesh {
        match *self {
            GeometryDesc::Box {
                width,
                height,
                depth,
            } => make_box([width, height, depth]),
            GeometryDesc::Tetrahedron { radius } => make_tetrahedron(radius),
            GeometryDesc::Octahedron { radius } => make_octahedron(radius),
            GeometryDesc::Dodecahedron { radius } => make_dodecahedron(radius),
            GeometryDesc::Icosahedron { radius } => make_icosahedron(radius),
            GeometryDesc::Sphere {
                radius,
                width_segments,
                height_segments,
            } => make_uv_sphere(radius, width_segments, height_segments),
            GeometryDesc::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => make_cylinder(radius_top, radius_bottom, height, radial_segments),
            GeometryDesc::Cone {
                radius,
                height,
                radial_segments,
            } => make_cone(radius, height, radial_segments),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_tag_maps_to_its_table_entry() {
        for (kind, desc) in SHAPE_TABLE {
            assert_eq!(geometry_for(&ShapeSpec::Known(kind)), desc);
        }
        assert_eq!(SHAPE_TABLE.len(), ShapeKind::ALL.len());
    }

    #[test]
    fn table_parameters() {
        assert_eq!(
            geometry_for(&ShapeSpec::parse("cube")),
            GeometryDesc::Box {
                width: 2.5,
                height: 2.5,
                depth: 2.5
            }
        );
        assert_eq!(
            geometry_for(&ShapeSpec::parse("rect")),
            GeometryDesc::Box {
                width: 1.5,
                height: 3.0,
                depth: 1.5
            }
        );
        assert_eq!(
            geometry_for(&ShapeSpec::parse("pyramid")),
            GeometryDesc::Cone {
                radius: 1.8,
                height: 2.5,
                radial_segments: 4
            }
        );
        assert_eq!(
            geometry_for(&ShapeSpec::parse("sphere")),
            GeometryDesc::Sphere {
                radius: 1.6,
                width_segments: 32,
                height_segments: 32
            }
        );
    }

    #[test]
    fn unknown_tags_fall_back_to_unit_box() {
        for tag in ["", "torus", "cubes", "123", "\u{1F4A9}"] {
            assert_eq!(geometry_for(&ShapeSpec::parse(tag)), FALLBACK_GEOMETRY);
        }
    }

    #[test]
    fn every_entry_builds_a_non_empty_mesh() {
        for (_, desc) in SHAPE_TABLE {
            let mesh = desc.build();
            assert!(mesh.triangle_count() > 0, "{} is empty", desc.name());
            assert_eq!(mesh.positions.len(), mesh.normals.len());
            assert_eq!(mesh.positions.len(), mesh.uvs.len());
            assert!(mesh
                .indices
                .iter()
                .all(|&i| (i as usize) < mesh.vertex_count()));
        }
    }

    #[test]
    fn fallback_box_is_two_units() {
        let bounds = FALLBACK_GEOMETRY.build().bounds().unwrap();
        assert_eq!(bounds.size(), [2.0, 2.0, 2.0]);
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Cube,
    Rect,
    Tetrahedron,
    Octahedron,
    Dodecahedron,
    Icosahedron,
    Sphere,
    Cylinder,
    Pyramid,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 9] = [
        ShapeKind::Cube,
        ShapeKind::Rect,
        ShapeKind::Tetrahedron,
        ShapeKind::Octahedron,
        ShapeKind::Dodecahedron,
        ShapeKind::Icosahedron,
        ShapeKind::Sphere,
        ShapeKind::Cylinder,
        ShapeKind::Pyramid,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            ShapeKind::Cube => "cube",
            ShapeKind::Rect => "rect",
            ShapeKind::Tetrahedron => "tetrahedron",
            ShapeKind::Octahedron => "octahedron",
            ShapeKind::Dodecahedron => "dodecahedron",
            ShapeKind::Icosahedron => "icosahedron",
            ShapeKind::Sphere => "sphere",
            ShapeKind::Cylinder => "cylinder",
            ShapeKind::Pyramid => "pyramid",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::Cube => "Cube",
            ShapeKind::Rect => "Rectangular prism",
            ShapeKind::Tetrahedron => "Tetrahedron",
            ShapeKind::Octahedron => "Octahedron",
            ShapeKind::Dodecahedron => "Dodecahedron",
            ShapeKind::Icosahedron => "Icosahedron",
            ShapeKind::Sphere => "Sphere",
            ShapeKind::Cylinder => "Cylinder",
            ShapeKind::Pyramid => "Pyramid",
        }
    }

    /// Case-insensitive lookup; surrounding whitespace is ignored.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag().eq_ignore_ascii_case(tag))
    }
}

/// Shape request as it arrives from the host. Unknown tags are kept verbatim
/// so they can be logged and reported; they render as the fallback box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShapeSpec {
    Known(ShapeKind),
    Unrecognized(String),
}

impl ShapeSpec {
    pub fn parse(tag: &str) -> Self {
        match ShapeKind::from_tag(tag) {
            Some(kind) => ShapeSpec::Known(kind),
            None => ShapeSpec::Unrecognized(tag.to_string()),
        }
    }

    pub fn kind(&self) -> Option<ShapeKind> {
        match self {
            ShapeSpec::Known(kind) => Some(*kind),
            ShapeSpec::Unrecognized(_) => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, ShapeSpec::Known(_))
    }
}

impl Default for ShapeSpec {
    fn default() -> Self {
        ShapeSpec::Known(ShapeKind::Cube)
    }
}

impl From<ShapeKind> for ShapeSpec {
    fn from(kind: ShapeKind) -> Self {
        ShapeSpec::Known(kind)
    }
}

impl From<String> for ShapeSpec {
    fn from(tag: String) -> Self {
        ShapeSpec::parse(&tag)
    }
}

impl From<&str> for ShapeSpec {
    fn from(tag: &str) -> Self {
        ShapeSpec::parse(tag)
    }
}

impl From<ShapeSpec> for String {
    fn from(spec: ShapeSpec) -> Self {
        spec.to_string()
    }
}

impl fmt::Display for ShapeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeSpec::Known(kind) => f.write_str(kind.tag()),
            ShapeSpec::Unrecognized(tag) => f.write_str(tag),
        }
    }
}

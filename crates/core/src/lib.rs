mod assembler;
mod camera;
mod controls;
mod frame_loop;
mod geometry;
mod material;
mod mesh;
mod mesh_primitives;
mod report;
mod resources;
mod settings;
mod shape;

pub use assembler::{Light, MeshNode, MeshResources, SceneConfig, SceneState};
pub use camera::{PerspectiveCamera, ViewportState};
pub use controls::{ControllerPhase, OrbitController};
pub use frame_loop::{FrameLoop, LoopState};
pub use geometry::{geometry_for, GeometryDesc, FALLBACK_GEOMETRY, SHAPE_TABLE};
pub use material::{
    decode_texture, select_material, ColorSpace, MaterialDesc, MaterialKind, MaterialVariant,
    TextureDecodeError, TextureImage, TexturePayload,
};
pub use mesh::{Aabb, Mesh};
pub use mesh_primitives::{
    make_box, make_cone, make_cylinder, make_dodecahedron, make_icosahedron, make_octahedron,
    make_tetrahedron, make_uv_sphere,
};
pub use report::SceneReport;
pub use resources::ResourceLedger;
pub use settings::{
    hex_to_rgb, CameraSettings, ControlSettings, LightSettings, MaterialSettings, MotionSettings,
    SettingsError, ViewerSettings, DEFAULT_BACKGROUND,
};
pub use shape::{ShapeKind, ShapeSpec};
pub use solido_scene::{FrameSnapshot, ResourceId, ResourceKind, SceneUpload};

use super::{Light, SceneConfig, SceneState};
use crate::frame_loop::FrameLoop;
use crate::geometry::{GeometryDesc, FALLBACK_GEOMETRY};
use crate::material::{png_bytes, MaterialKind, MaterialVariant, TexturePayload};
use crate::settings::ViewerSettings;
use crate::shape::{ShapeKind, ShapeSpec};
use solido_scene::{ResourceKind, SceneMaterialMode};

fn lit_settings() -> ViewerSettings {
    let mut settings = ViewerSettings::default();
    settings.material.variant = MaterialVariant::Lit;
    settings
}

fn png_payload() -> TexturePayload {
    TexturePayload::new(png_bytes(8, 8), "image/png")
}

#[test]
fn assemble_builds_camera_lights_and_one_mesh() {
    let scene = SceneState::assemble(&SceneConfig::default(), &ViewerSettings::default(), 4.0 / 3.0);
    assert_eq!(scene.mesh_count(), 1);
    assert_eq!(scene.camera().fov_y_degrees, 75.0);
    assert_eq!(scene.camera().near, 0.1);
    assert_eq!(scene.camera().far, 1000.0);
    assert_eq!(scene.camera().position.z, 4.0);
    assert_eq!(scene.lights().len(), 1);
    assert!(matches!(scene.lights()[0], Light::Ambient { .. }));
    assert_eq!(scene.background(), [14.0 / 255.0, 17.0 / 255.0, 23.0 / 255.0]);
    assert_eq!(scene.version(), 1);
}

#[test]
fn lit_variant_adds_directional_light() {
    let scene = SceneState::assemble(&SceneConfig::default(), &lit_settings(), 1.0);
    assert_eq!(scene.lights().len(), 2);
    let Light::Directional { position, .. } = scene.lights()[1] else {
        panic!("expected a directional light");
    };
    assert_eq!(position, [5.0, 5.0, 5.0]);

    let snapshot = scene.snapshot(1, [100, 100]).unwrap();
    let directional = snapshot.lights.directional.unwrap();
    let expected = 1.0 / 3f32.sqrt();
    for component in directional.direction {
        assert!((component - expected).abs() < 1.0e-6);
    }
}

#[test]
fn texture_payload_selects_textured_material() {
    let config = SceneConfig::new(ShapeKind::Cube, Some(png_payload()));
    let scene = SceneState::assemble(&config, &ViewerSettings::default(), 1.0);
    let node = scene.mesh().unwrap();
    assert!(node.material.texture().is_some());
    assert!(node.resources.texture.is_some());
    assert_eq!(scene.ledger().live_count(ResourceKind::Texture), 1);

    let upload = scene.upload().unwrap();
    let (texture_id, texture) = upload.material.texture.unwrap();
    assert_eq!(Some(texture_id), node.resources.texture);
    assert_eq!((texture.width, texture.height), (8, 8));
    assert!(texture.srgb);
}

#[test]
fn missing_texture_selects_normal_material() {
    let scene = SceneState::assemble(&SceneConfig::default(), &ViewerSettings::default(), 1.0);
    let node = scene.mesh().unwrap();
    assert_eq!(node.material.kind(), MaterialKind::Normal);
    assert!(node.resources.texture.is_none());
    assert_eq!(scene.ledger().live_count(ResourceKind::Texture), 0);
    assert!(scene.upload().unwrap().material.texture.is_none());
}

#[test]
fn repeated_rebuilds_keep_one_mesh_and_one_geometry() {
    let shapes = ["cube", "sphere", "pyramid", "nonsense", "icosahedron"];
    for rebuilds in 1..=50usize {
        let mut scene =
            SceneState::assemble(&SceneConfig::default(), &ViewerSettings::default(), 1.0);
        for i in 0..rebuilds {
            let texture = (i % 3 == 0).then(png_payload);
            scene.rebuild(&SceneConfig::new(shapes[i % shapes.len()], texture));
        }
        assert_eq!(scene.mesh_count(), 1);
        assert_eq!(scene.ledger().live_count(ResourceKind::Geometry), 1);
        assert_eq!(scene.ledger().live_count(ResourceKind::Material), 1);
        assert!(scene.ledger().live_count(ResourceKind::Texture) <= 1);
        assert_eq!(scene.version(), rebuilds as u64 + 1);

        let node = scene.mesh().unwrap();
        assert!(scene.ledger().is_live(node.resources.geometry));
        assert!(scene.ledger().is_live(node.resources.material));
    }
}

#[test]
fn rebuild_releases_the_previous_resources() {
    let config = SceneConfig::new(ShapeKind::Sphere, Some(png_payload()));
    let mut scene = SceneState::assemble(&config, &ViewerSettings::default(), 1.0);
    let previous = scene.mesh().unwrap().resources;

    scene.rebuild(&SceneConfig::new(ShapeKind::Rect, None));
    let released = scene.drain_released();
    assert_eq!(released.len(), 3);
    assert!(released.contains(&previous.geometry));
    assert!(released.contains(&previous.material));
    assert!(released.contains(&previous.texture.unwrap()));
    assert!(!scene.ledger().is_live(previous.geometry));
}

#[test]
fn teardown_releases_everything() {
    let config = SceneConfig::new(ShapeKind::Cube, Some(png_payload()));
    let mut scene = SceneState::assemble(&config, &ViewerSettings::default(), 1.0);
    scene.teardown();
    assert_eq!(scene.mesh_count(), 0);
    assert_eq!(scene.ledger().live_len(), 0);
    assert_eq!(scene.drain_released().len(), 3);
    assert!(scene.snapshot(0, [1, 1]).is_none());
}

#[test]
fn snapshot_carries_model_rotation() {
    let mut scene = SceneState::assemble(&SceneConfig::default(), &ViewerSettings::default(), 1.0);
    scene.rotate_mesh(0.25);
    let snapshot = scene.snapshot(7, [320, 200]).unwrap();
    let expected = glam::Mat4::from_euler(glam::EulerRot::XYZ, 0.25, 0.25, 0.0);
    assert!(snapshot.model.abs_diff_eq(expected, 1.0e-6));
    assert_eq!(snapshot.frame_index, 7);
    assert_eq!(snapshot.surface_size, [320, 200]);
    assert_eq!(snapshot.material_mode, SceneMaterialMode::Normal);
}

#[test]
fn sphere_with_png_renders_textured_sphere() {
    let mut frame_loop = FrameLoop::new(ViewerSettings::default());
    frame_loop.initialize(
        SceneConfig::new("sphere", Some(png_payload())),
        [800, 600],
    );
    let snapshot = frame_loop.tick().unwrap();
    let node = frame_loop.scene().unwrap().mesh().unwrap();
    assert_eq!(
        node.geometry,
        GeometryDesc::Sphere {
            radius: 1.6,
            width_segments: 32,
            height_segments: 32
        }
    );
    assert_eq!(node.material.kind(), MaterialKind::Unlit);
    assert_eq!(snapshot.material_mode, SceneMaterialMode::Unlit);
    assert_eq!(node.rotation.x, 0.005);
    assert_eq!(node.rotation.y, 0.005);
}

#[test]
fn pyramid_without_texture_renders_normal_colored_cone() {
    let mut frame_loop = FrameLoop::new(ViewerSettings::default());
    frame_loop.initialize(SceneConfig::new("pyramid", None), [800, 600]);
    let snapshot = frame_loop.tick().unwrap();
    let node = frame_loop.scene().unwrap().mesh().unwrap();
    assert_eq!(
        node.geometry,
        GeometryDesc::Cone {
            radius: 1.8,
            height: 2.5,
            radial_segments: 4
        }
    );
    assert_eq!(snapshot.material_mode, SceneMaterialMode::Normal);
    assert!(snapshot.lights.directional.is_none());
}

#[test]
fn sphere_without_texture_renders_normal_colored_sphere() {
    let mut frame_loop = FrameLoop::new(ViewerSettings::default());
    frame_loop.initialize(SceneConfig::new("sphere", None), [800, 600]);
    let snapshot = frame_loop.tick().unwrap();
    let scene = frame_loop.scene().unwrap();
    assert_eq!(scene.mesh_count(), 1);
    let node = scene.mesh().unwrap();
    assert_eq!(node.shape, ShapeSpec::Known(ShapeKind::Sphere));
    assert_eq!(
        node.geometry,
        GeometryDesc::Sphere {
            radius: 1.6,
            width_segments: 32,
            height_segments: 32
        }
    );
    assert_eq!(node.material.kind(), MaterialKind::Normal);
    assert!(node.material.texture().is_none());
    assert!(node.resources.texture.is_none());
    assert_eq!(snapshot.material_mode, SceneMaterialMode::Normal);
    assert!(scene.upload().unwrap().material.texture.is_none());
}

#[test]
fn pyramid_with_png_renders_textured_cone() {
    let scene = SceneState::assemble(
        &SceneConfig::new("pyramid", Some(png_payload())),
        &ViewerSettings::default(),
        4.0 / 3.0,
    );
    assert_eq!(scene.mesh_count(), 1);
    let node = scene.mesh().unwrap();
    assert_eq!(node.shape, ShapeSpec::Known(ShapeKind::Pyramid));
    assert_eq!(
        node.geometry,
        GeometryDesc::Cone {
            radius: 1.8,
            height: 2.5,
            radial_segments: 4
        }
    );
    assert_eq!(node.material.kind(), MaterialKind::Unlit);
    let texture = node.material.texture().unwrap();
    assert_eq!((texture.width, texture.height), (8, 8));
    let texture_id = node.resources.texture.unwrap();
    let upload = scene.upload().unwrap();
    assert_eq!(upload.material.mode, SceneMaterialMode::Unlit);
    let (uploaded_id, uploaded) = upload.material.texture.as_ref().unwrap();
    assert_eq!(*uploaded_id, texture_id);
    assert_eq!((uploaded.width, uploaded.height), (8, 8));
    assert_eq!(
        scene.snapshot(0, [800, 600]).unwrap().material_mode,
        SceneMaterialMode::Unlit
    );
}

#[test]
fn unknown_shape_renders_fallback_box() {
    let mut frame_loop = FrameLoop::new(ViewerSettings::default());
    frame_loop.initialize(SceneConfig::new("unknown_shape_xyz", None), [800, 600]);
    assert!(frame_loop.tick().is_some());
    let node = frame_loop.scene().unwrap().mesh().unwrap();
    assert_eq!(node.geometry, FALLBACK_GEOMETRY);
    assert_eq!(
        node.shape,
        ShapeSpec::Unrecognized("unknown_shape_xyz".to_string())
    );
    assert_eq!(node.mesh.bounds().unwrap().size(), [2.0, 2.0, 2.0]);
}

#[test]
fn config_json_parses_shape_only() {
    let config: SceneConfig = serde_json::from_str(r#"{"shape": "Cylinder"}"#).unwrap();
    assert_eq!(config.shape, ShapeSpec::Known(ShapeKind::Cylinder));
    assert!(config.texture.is_none());
    let config: SceneConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config.shape, ShapeSpec::Known(ShapeKind::Cube));
}

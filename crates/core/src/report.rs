use serde::Serialize;

use crate::assembler::Light;
use crate::frame_loop::FrameLoop;
use crate::geometry::GeometryDesc;
use crate::material::MaterialKind;

/// Plain summary of a running scene, printed by the headless mode.
#[derive(Debug, Clone, Serialize)]
pub struct SceneReport {
    pub shape: String,
    pub recognized: bool,
    pub geometry: GeometryDesc,
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub bounds_size: [f32; 3],
    pub material: MaterialKind,
    pub texture_size: Option<[u32; 2]>,
    pub lights: Vec<&'static str>,
    pub rotation: [f32; 3],
    pub camera_position: [f32; 3],
    pub aspect: f32,
    pub surface_size: [u32; 2],
    pub frames: u64,
    pub scene_version: u64,
    pub live_resources: usize,
}

impl SceneReport {
    pub fn from_loop(frame_loop: &FrameLoop) -> Option<Self> {
        let scene = frame_loop.scene()?;
        let node = scene.mesh()?;
        Some(Self {
            shape: node.shape.to_string(),
            recognized: node.shape.is_recognized(),
            geometry: node.geometry,
            vertex_count: node.mesh.vertex_count(),
            triangle_count: node.mesh.triangle_count(),
            bounds_size: node.mesh.bounds().map(|b| b.size()).unwrap_or([0.0; 3]),
            material: node.material.kind(),
            texture_size: node.material.texture().map(|t| [t.width, t.height]),
            lights: scene
                .lights()
                .iter()
                .map(|light| match light {
                    Light::Ambient { .. } => "ambient",
                    Light::Directional { .. } => "directional",
                })
                .collect(),
            rotation: node.rotation.to_array(),
            camera_position: scene.camera().position.to_array(),
            aspect: scene.camera().aspect,
            surface_size: frame_loop.viewport().size(),
            frames: frame_loop.frame_index(),
            scene_version: scene.version(),
            live_resources: scene.ledger().live_len(),
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::SceneConfig;
    use crate::settings::ViewerSettings;

    #[test]
    fn report_describes_the_running_scene() {
        let mut frame_loop = FrameLoop::new(ViewerSettings::default());
        assert!(SceneReport::from_loop(&frame_loop).is_none());
        frame_loop.initialize(SceneConfig::new("dodecahedron", None), [640, 480]);
        for _ in 0..3 {
            frame_loop.tick();
        }
        let report = SceneReport::from_loop(&frame_loop).unwrap();
        assert_eq!(report.shape, "dodecahedron");
        assert!(report.recognized);
        assert_eq!(report.triangle_count, 36);
        assert_eq!(report.material, MaterialKind::Normal);
        assert_eq!(report.lights, vec!["ambient"]);
        assert_eq!(report.frames, 3);
        assert_eq!(report.live_resources, 2);

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["geometry"]["type"], "dodecahedron");
        assert_eq!(json["material"], "normal");
        assert_eq!(json["surface_size"][0], 640);
    }
}

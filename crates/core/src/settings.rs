use std::fmt;

use serde::{Deserialize, Serialize};

use crate::material::MaterialVariant;

pub const DEFAULT_BACKGROUND: u32 = 0x0E1117;

pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub background: [f32; 3],
    pub surface_height: f32,
    pub camera: CameraSettings,
    pub material: MaterialSettings,
    pub lights: LightSettings,
    pub motion: MotionSettings,
    pub controls: ControlSettings,
    pub show_stats: bool,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            background: hex_to_rgb(DEFAULT_BACKGROUND),
            surface_height: 600.0,
            camera: CameraSettings::default(),
            material: MaterialSettings::default(),
            lights: LightSettings::default(),
            motion: MotionSettings::default(),
            controls: ControlSettings::default(),
            show_stats: false,
        }
    }
}

impl ViewerSettings {
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(text).map_err(SettingsError::Parse)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(SettingsError::Io)?;
        Self::from_json(&text)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            distance: 4.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialSettings {
    pub variant: MaterialVariant,
    pub roughness: f32,
    /// Decoded textures larger than this on either side are downscaled.
    pub max_texture_size: u32,
}

impl Default for MaterialSettings {
    fn default() -> Self {
        Self {
            variant: MaterialVariant::Unlit,
            roughness: 0.5,
            max_texture_size: 4096,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightSettings {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub directional_color: [f32; 3],
    pub directional_intensity: f32,
    pub directional_position: [f32; 3],
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 0.6,
            directional_color: [1.0, 1.0, 1.0],
            directional_intensity: 0.8,
            directional_position: [5.0, 5.0, 5.0],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    /// Radians added to the mesh's x and y rotation every frame.
    pub rotation_step: f32,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            rotation_step: 0.005,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.5,
            max_distance: 100.0,
        }
    }
}

#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(err) => write!(f, "failed to read settings: {err}"),
            SettingsError::Parse(err) => write!(f, "invalid settings json: {err}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(err) => Some(err),
            SettingsError::Parse(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_viewer_constants() {
        let settings = ViewerSettings::default();
        assert_eq!(settings.camera.fov_degrees, 75.0);
        assert_eq!(settings.camera.near, 0.1);
        assert_eq!(settings.camera.far, 1000.0);
        assert_eq!(settings.camera.distance, 4.0);
        assert_eq!(settings.motion.rotation_step, 0.005);
        assert_eq!(settings.material.variant, MaterialVariant::Unlit);
        assert_eq!(settings.surface_height, 600.0);
    }

    #[test]
    fn background_is_decoded_from_hex() {
        let rgb = hex_to_rgb(DEFAULT_BACKGROUND);
        assert_eq!(rgb, [14.0 / 255.0, 17.0 / 255.0, 23.0 / 255.0]);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let settings =
            ViewerSettings::from_json(r#"{"material": {"variant": "lit"}, "show_stats": true}"#)
                .unwrap();
        assert_eq!(settings.material.variant, MaterialVariant::Lit);
        assert_eq!(settings.material.roughness, 0.5);
        assert_eq!(settings.material.max_texture_size, 4096);
        assert!(settings.show_stats);
        assert_eq!(settings.camera.fov_degrees, 75.0);
    }

    #[test]
    fn empty_object_is_default() {
        let settings = ViewerSettings::from_json("{}").unwrap();
        assert_eq!(settings.controls.damping_factor, 0.05);
        assert!(settings.controls.enable_damping);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = ViewerSettings::from_json("{ nope").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
        assert!(err.to_string().starts_with("invalid settings json"));
    }
}

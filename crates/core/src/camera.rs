use glam::{Mat4, Vec3};

use crate::settings::CameraSettings;

#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
    projection: Mat4,
}

impl PerspectiveCamera {
    /// Camera on +Z at the configured distance, looking at the origin.
    pub fn new(settings: &CameraSettings, aspect: f32) -> Self {
        let mut camera = Self {
            fov_y_degrees: settings.fov_degrees,
            aspect: sanitize_aspect(aspect),
            near: settings.near,
            far: settings.far,
            position: Vec3::new(0.0, 0.0, settings.distance),
            target: Vec3::ZERO,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = sanitize_aspect(aspect);
        self.update_projection();
    }

    pub fn update_projection(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

/// Physical surface size plus the aspect derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub width: u32,
    pub height: u32,
}

impl ViewportState {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn size(&self) -> [u32; 2] {
        [self.width, self.height]
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_sits_on_positive_z() {
        let camera = PerspectiveCamera::new(&CameraSettings::default(), 1.5);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 4.0));
        let origin = camera.view_proj().project_point3(Vec3::ZERO);
        assert!(origin.x.abs() < 1.0e-6 && origin.y.abs() < 1.0e-6);
    }

    #[test]
    fn projection_follows_aspect() {
        let mut camera = PerspectiveCamera::new(&CameraSettings::default(), 1.0);
        let square = camera.projection_matrix();
        camera.set_aspect(2.0);
        assert_ne!(camera.projection_matrix(), square);
        assert_eq!(
            camera.projection_matrix(),
            Mat4::perspective_rh(75f32.to_radians(), 2.0, 0.1, 1000.0)
        );
    }

    #[test]
    fn invalid_aspect_is_clamped() {
        let camera = PerspectiveCamera::new(&CameraSettings::default(), f32::NAN);
        assert_eq!(camera.aspect, 1.0);
    }
}

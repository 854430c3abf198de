use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::camera::PerspectiveCamera;
use crate::settings::ControlSettings;

const POLAR_EPSILON: f32 = 1.0e-6;
const REST_EPSILON: f32 = 1.0e-6;
const WHEEL_SCALE: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    Idle,
    Dragging,
    Inertial,
}

/// Orbits the camera around a fixed target. Input only records pending
/// deltas; [`OrbitController::update`] integrates them once per frame.
#[derive(Debug, Clone)]
pub struct OrbitController {
    target: Vec3,
    radius: f32,
    theta: f32,
    phi: f32,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    dragging: bool,
    viewport_height: f32,
    settings: ControlSettings,
}

impl OrbitController {
    pub fn new(position: Vec3, target: Vec3, settings: ControlSettings) -> Self {
        let offset = position - target;
        let radius = offset.length().max(POLAR_EPSILON);
        Self {
            target,
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            dragging: false,
            viewport_height: 600.0,
            settings,
        }
    }

    pub fn settings(&self) -> &ControlSettings {
        &self.settings
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        if height > 0.0 {
            self.viewport_height = height;
        }
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Pointer or single-finger motion in physical pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        let per_pixel = TAU / self.viewport_height * self.settings.rotate_speed;
        self.delta_theta -= dx * per_pixel;
        self.delta_phi -= dy * per_pixel;
    }

    /// Wheel delta with DOM sign: positive scrolls away and dollies out.
    pub fn wheel(&mut self, delta_y: f32) {
        if delta_y == 0.0 {
            return;
        }
        let step = 0.95_f32.powf(self.settings.zoom_speed * (delta_y * WHEEL_SCALE).abs());
        if delta_y < 0.0 {
            self.scale *= step;
        } else {
            self.scale /= step;
        }
    }

    /// Multiplies the orbit radius; below one moves closer. Used for pinch.
    pub fn dolly(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.scale *= factor;
        }
    }

    pub fn phase(&self) -> ControllerPhase {
        if self.dragging {
            ControllerPhase::Dragging
        } else if self.delta_theta != 0.0 || self.delta_phi != 0.0 || self.scale != 1.0 {
            ControllerPhase::Inertial
        } else {
            ControllerPhase::Idle
        }
    }

    /// Advances one frame. Returns true when the camera moved.
    pub fn update(&mut self) -> bool {
        let before = (self.theta, self.phi, self.radius);
        let factor = if self.settings.enable_damping {
            self.settings.damping_factor.clamp(0.0, 1.0)
        } else {
            1.0
        };

        self.theta += self.delta_theta * factor;
        self.phi = (self.phi + self.delta_phi * factor).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        let (min_distance, max_distance) = self.distance_limits();
        self.radius = (self.radius * self.scale).clamp(min_distance, max_distance);
        self.scale = 1.0;

        if self.settings.enable_damping {
            self.delta_theta *= 1.0 - factor;
            self.delta_phi *= 1.0 - factor;
            if self.delta_theta.abs() < REST_EPSILON {
                self.delta_theta = 0.0;
            }
            if self.delta_phi.abs() < REST_EPSILON {
                self.delta_phi = 0.0;
            }
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }

        before != (self.theta, self.phi, self.radius)
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    pub fn position(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        self.target
            + Vec3::new(
                self.radius * sin_phi * self.theta.sin(),
                self.radius * self.phi.cos(),
                self.radius * sin_phi * self.theta.cos(),
            )
    }

    pub fn apply_to(&self, camera: &mut PerspectiveCamera) {
        camera.position = self.position();
        camera.target = self.target;
    }

    fn distance_limits(&self) -> (f32, f32) {
        let min = self.settings.min_distance.max(POLAR_EPSILON);
        (min, self.settings.max_distance.max(min))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> OrbitController {
        OrbitController::new(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO, ControlSettings::default())
    }

    #[test]
    fn starts_at_given_position() {
        let controller = controller();
        assert!((controller.position() - Vec3::new(0.0, 0.0, 4.0)).length() < 1.0e-5);
        assert_eq!(controller.phase(), ControllerPhase::Idle);
    }

    #[test]
    fn update_without_input_is_a_no_op() {
        let mut controller = controller();
        for _ in 0..10 {
            assert!(!controller.update());
        }
        assert!((controller.position() - Vec3::new(0.0, 0.0, 4.0)).length() < 1.0e-5);
    }

    #[test]
    fn damped_rotation_decays_to_rest() {
        let mut controller = controller();
        controller.set_viewport_height(600.0);
        controller.rotate(30.0, 0.0);
        assert_eq!(controller.phase(), ControllerPhase::Inertial);

        let mut steps = Vec::new();
        let mut last = controller.position();
        for _ in 0..400 {
            controller.update();
            let now = controller.position();
            steps.push((now - last).length());
            last = now;
        }
        assert!(steps[0] > steps[10]);
        assert!(steps[10] > steps[100]);
        assert_eq!(controller.phase(), ControllerPhase::Idle);
        assert!((controller.distance() - 4.0).abs() < 1.0e-4);
    }

    #[test]
    fn velocity_freezes_without_update() {
        let mut controller = controller();
        controller.rotate(30.0, 10.0);
        controller.update();
        let position = controller.position();
        // No update calls: the camera stays put even though motion is pending.
        assert_eq!(controller.position(), position);
        assert_eq!(controller.phase(), ControllerPhase::Inertial);
    }

    #[test]
    fn undamped_rotation_applies_at_once() {
        let settings = ControlSettings {
            enable_damping: false,
            ..ControlSettings::default()
        };
        let mut controller = OrbitController::new(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO, settings);
        controller.set_viewport_height(100.0);
        // A quarter of the viewport height turns a quarter of a full orbit.
        controller.rotate(-25.0, 0.0);
        assert!(controller.update());
        assert!((controller.position() - Vec3::new(4.0, 0.0, 0.0)).length() < 1.0e-4);
        assert_eq!(controller.phase(), ControllerPhase::Idle);
    }

    #[test]
    fn polar_angle_stays_off_the_poles() {
        let settings = ControlSettings {
            enable_damping: false,
            ..ControlSettings::default()
        };
        let mut controller = OrbitController::new(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO, settings);
        controller.rotate(0.0, 10_000.0);
        controller.update();
        let position = controller.position();
        assert!(position.is_finite());
        assert!(position.y > 3.99 && position.y <= 4.0);
        assert!((controller.distance() - 4.0).abs() < 1.0e-4);
    }

    #[test]
    fn wheel_dollies_within_limits() {
        let mut controller = controller();
        controller.wheel(-100.0);
        controller.update();
        assert!((controller.distance() - 4.0 * 0.95).abs() < 1.0e-4);

        controller.wheel(100.0);
        controller.update();
        assert!((controller.distance() - 4.0).abs() < 1.0e-4);

        controller.dolly(1.0e-6);
        controller.update();
        assert_eq!(controller.distance(), controller.settings().min_distance);
    }

    #[test]
    fn dragging_phase_tracks_pointer() {
        let mut controller = controller();
        controller.begin_drag();
        assert_eq!(controller.phase(), ControllerPhase::Dragging);
        controller.end_drag();
        assert_eq!(controller.phase(), ControllerPhase::Idle);
    }
}

//! Orbit controls: left-drag rotates around a fixed target, the wheel zooms.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Mat4, Vec3};
use winit::event::MouseButton;

use cubeview_config::CameraConfig;

use crate::MouseState;

/// Keeps the camera off the poles, where the up vector degenerates.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 1e-3;

/// Distance multiplier per wheel line at zoom speed 1.
const ZOOM_STEP: f32 = 0.95;

/// Spherical-coordinate camera around `target`.
///
/// Yaw is measured around +Y from +Z towards +X; pitch is the elevation
/// above the XZ plane.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitCamera {
    /// Camera at `position` looking at `target`.
    pub fn new(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length();
        let (yaw, pitch) = if distance > 0.0 {
            (
                offset.x.atan2(offset.z),
                (offset.y / distance).clamp(-1.0, 1.0).asin(),
            )
        } else {
            (0.0, 0.0)
        };
        Self {
            target,
            distance,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
        }
    }

    /// Camera at the configured start position orbiting the origin.
    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self::new(Vec3::from_array(config.position), Vec3::ZERO);
        camera.apply_config(config);
        camera
    }

    /// Take speeds and distance limits from `config`, keeping the current
    /// orientation. The distance is pulled back inside the new limits.
    pub fn apply_config(&mut self, config: &CameraConfig) {
        self.rotate_speed = config.rotate_speed;
        self.zoom_speed = config.zoom_speed;
        self.min_distance = config.min_distance;
        self.max_distance = config.max_distance.max(config.min_distance);
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
    }

    /// Eye position in world space.
    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }

    /// Right-handed view matrix looking at the target with +Y up.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    /// Rotate by a pointer drag of `dx, dy` pixels. A drag across the full
    /// viewport height turns the camera once around.
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let per_pixel = TAU / viewport_height.max(1.0) * self.rotate_speed;
        self.yaw = (self.yaw - dx * per_pixel).rem_euclid(TAU);
        self.pitch = (self.pitch + dy * per_pixel).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Zoom by wheel lines; positive moves closer.
    pub fn zoom(&mut self, lines: f32) {
        let factor = ZOOM_STEP.powf(lines * self.zoom_speed);
        self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
    }

    /// Apply this tick's pointer input. Returns whether the camera moved.
    pub fn update(&mut self, mouse: &MouseState, viewport_height: f32) -> bool {
        let before = (self.yaw, self.pitch, self.distance);
        let drag = mouse.drag_delta(MouseButton::Left);
        if drag != glam::Vec2::ZERO {
            self.rotate(drag.x, drag.y, viewport_height);
        }
        if mouse.scroll() != 0.0 {
            self.zoom(mouse.scroll());
        }
        let moved = before != (self.yaw, self.pitch, self.distance);
        if moved {
            tracing::trace!(
                "Orbit camera: yaw {:.3}, pitch {:.3}, distance {:.3}",
                self.yaw,
                self.pitch,
                self.distance
            );
        }
        moved
    }
}

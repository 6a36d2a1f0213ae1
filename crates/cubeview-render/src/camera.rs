//! View and reverse-Z projection matrices.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Camera uniform shared by the sphere and skybox programs.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    /// Model-view-projection of the sphere (the model transform is identity).
    pub view_proj: [[f32; 4]; 4],
    /// Inverse of the rotation-only view-projection, for sky directions.
    pub inv_sky_view_proj: [[f32; 4]; 4],
}

/// Perspective camera looking from `eye` at `target`.
#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    /// Perspective projection with reverse-Z: near maps to 1, far to 0.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_aspect_ratio(&mut self, width: u32, height: u32) {
        self.aspect_ratio = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn to_uniform(&self) -> CameraUniform {
        let mut rotation = self.view_matrix();
        rotation.w_axis = glam::Vec4::W;
        let sky = (self.projection_matrix() * rotation).inverse();
        CameraUniform {
            view_proj: self.view_projection_matrix().to_cols_array_2d(),
            inv_sky_view_proj: sky.to_cols_array_2d(),
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 15.0, 15.0),
            target: Vec3::ZERO,
            fov_y: 90f32.to_radians(),
            aspect_ratio: 1.0,
            near: 0.001,
            far: 100.0,
        }
    }
}

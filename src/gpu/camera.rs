//! Fixed perspective camera looking at the field.

use glam::{EulerRot, Mat4, Vec3};

use crate::config::BackdropConfig;

/// Perspective camera on the +Z axis, looking at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Distance from the origin along +Z.
    pub distance: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self::from_config(&BackdropConfig::default())
    }

    pub fn from_config(config: &BackdropConfig) -> Self {
        Self {
            fov_degrees: config.fov_degrees,
            distance: config.camera_distance,
            near: config.near,
            far: config.far,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.distance)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, self.near, self.far)
    }

    /// Full transform for the field rotated by XYZ Euler angles `rotation`.
    pub fn model_view_proj(&self, aspect: f32, rotation: Vec3) -> Mat4 {
        let model = Mat4::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z);
        self.projection_matrix(aspect) * self.view_matrix() * model
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

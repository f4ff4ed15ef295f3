//! Camera description shared by the viewport controller and the renderer.
//!
//! The camera stays where the session placed it; only its field of view and
//! aspect change, and only on resize. The renderer reads the matrices fresh
//! every frame.

use crate::constants::*;
use glam::{EulerRot, Mat4, Quat, Vec3};

/// Right-handed perspective camera placed by position and XYZ Euler rotation.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Vec3,
    pub aspect: f32,
    pub fov_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// The session's fixed vantage point looking across the field.
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Vec3::from_array(CAMERA_POSITION),
            rotation: Vec3::from_array(CAMERA_ROTATION),
            aspect,
            fov_degrees: CAMERA_FOV_DEGREES,
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation(), self.position).inverse()
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

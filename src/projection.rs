//! Camera-relative perspective projection and origin rotation
//!
//! This is the simple divide-by-depth path used by the lighting scenes,
//! not the full matrix pipeline (see `transform` for that).

use crate::math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point sat at or behind the eye plane and cannot be projected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BehindCamera;

impl fmt::Display for BehindCamera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "point is behind the camera")
    }
}

impl std::error::Error for BehindCamera {}

/// Perspective projection: eye position plus a fixed focal constant
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projection {
    pub eye: Vec3,
    /// Focal scale applied to the depth divisor (1/focal-length)
    pub perspective: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 600.0),
            perspective: 0.002,
        }
    }
}

impl Projection {
    /// Project a world point onto the screen plane.
    ///
    /// The camera looks down -Z, so an adjusted depth at or past the eye
    /// plane means the point is behind the camera. The eye plane itself
    /// is rejected too: dividing by zero depth would blow the screen
    /// point out to infinity.
    pub fn project(&self, p: Vec3) -> Result<Vec2, BehindCamera> {
        let adj_z = p.z - self.eye.z;
        if adj_z >= 0.0 {
            return Err(BehindCamera);
        }
        let adj_z = -adj_z;

        Ok(Vec2::new(
            p.x / (adj_z * self.perspective),
            p.y / (adj_z * self.perspective),
        ))
    }

    /// Invert the perspective divide for a point of known depth
    pub fn unproject(&self, screen: Vec2, z: f32) -> Vec3 {
        let adj_z = -(z - self.eye.z);
        Vec3::new(
            screen.x * (adj_z * self.perspective),
            screen.y * (adj_z * self.perspective),
            z,
        )
    }
}

/// Rotate a point about the world origin by the same angle on every axis.
///
/// Three plane rotations applied in a fixed order: X-Z (about Y), then
/// X-Y (about Z), then Y-Z (about X). The order is load-bearing; the
/// result is a compound rotation, not three independent Euler angles.
pub fn rotate(p: Vec3, theta: f32) -> Vec3 {
    let (sin, cos) = theta.sin_cos();

    let (x, z) = (p.x * cos - p.z * sin, p.x * sin + p.z * cos);
    let (x, y) = (x * cos - p.y * sin, x * sin + p.y * cos);
    let (y, z) = (y * cos - z * sin, y * sin + z * cos);

    Vec3::new(x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_behind_camera_fails() {
        let proj = Projection::default();
        assert_eq!(proj.project(Vec3::new(0.0, 0.0, 700.0)), Err(BehindCamera));
        // a vertex exactly on the eye plane is behind-camera, not a
        // division by zero
        assert_eq!(proj.project(Vec3::new(0.0, 0.0, 600.0)), Err(BehindCamera));
        assert!(proj.project(Vec3::new(0.0, 0.0, 599.0)).is_ok());
    }

    #[test]
    fn test_project_unproject_round_trip() {
        let proj = Projection::default();
        let p = Vec3::new(120.0, -45.0, 100.0);
        let screen = proj.project(p).unwrap();
        let back = proj.unproject(screen, p.z);
        assert!((back.x - p.x).abs() < 0.01);
        assert!((back.y - p.y).abs() < 0.01);
    }

    #[test]
    fn test_project_scales_with_depth() {
        let proj = Projection::default();
        let near = proj.project(Vec3::new(100.0, 0.0, 350.0)).unwrap();
        let far = proj.project(Vec3::new(100.0, 0.0, -500.0)).unwrap();
        assert!(near.x > far.x);
    }

    #[test]
    fn test_rotate_preserves_magnitude() {
        let p = Vec3::new(3.0, -7.0, 2.0);
        for i in 0..16 {
            let theta = i as f32 * std::f32::consts::PI / 8.0;
            let r = rotate(p, theta);
            assert!((r.magnitude() - p.magnitude()).abs() < 0.001);
        }
    }

    #[test]
    fn test_rotate_zero_angle_is_identity() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let r = rotate(p, 0.0);
        assert!((r.x - p.x).abs() < 0.0001);
        assert!((r.y - p.y).abs() < 0.0001);
        assert!((r.z - p.z).abs() < 0.0001);
    }

    #[test]
    fn test_rotate_matches_sequential_planes() {
        // One explicit step of the Y-then-Z-then-X ordering
        let p = Vec3::new(1.0, 0.0, 0.0);
        let theta = std::f32::consts::FRAC_PI_2;
        let r = rotate(p, theta);
        // about Y: (1,0,0) -> (0,0,1); about Z: unchanged x=0 -> (0,0,1);
        // about X: (0,0,1) -> (0,-1,0)
        assert!((r.x).abs() < 0.0001);
        assert!((r.y + 1.0).abs() < 0.0001);
        assert!((r.z).abs() < 0.0001);
    }
}

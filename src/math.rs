//! Vector and color math for the rasterizer

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// 2D point/vector in screen or projected space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// 2D scalar cross product (z component of the 3D cross)
    pub fn cross(self, other: Vec2) -> f32 {
        self.x * other.y - self.y * other.x
    }

    /// Round to the integer pixel grid (half-away-from-zero)
    pub fn round(self) -> Vec2i {
        Vec2i {
            x: self.x.round() as i32,
            y: self.y.round() as i32,
        }
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

/// Integer pixel coordinate, used for barycentric tests on the rounded grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vec2i {
    pub x: i32,
    pub y: i32,
}

impl Vec2i {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Widened to i64: products of squared pixel spans overflow i32 for
    /// triangles only a few hundred pixels across
    pub fn dot(self, other: Vec2i) -> i64 {
        self.x as i64 * other.x as i64 + self.y as i64 * other.y as i64
    }
}

impl Sub for Vec2i {
    type Output = Vec2i;
    fn sub(self, other: Vec2i) -> Vec2i {
        Vec2i {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

/// 3D point or direction in world/model space
///
/// The type does not distinguish points from directions; callers track
/// which arithmetic is meaningful (only directions are normalized).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Right-handed cross product
    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn magnitude(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Scale to unit length.
    ///
    /// Precondition: non-zero length. A zero vector divides by zero and
    /// propagates NaN; the rasterizer never feeds one in.
    pub fn normalize(self) -> Vec3 {
        let m = self.magnitude();
        Vec3 {
            x: self.x / m,
            y: self.y / m,
            z: self.z / m,
        }
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

/// Linear RGB color with unclamped f32 channels
///
/// Arithmetic never clamps; channels are clamped to [0,255] exactly once,
/// at pixel write (`to_rgba8`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Color3 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color3 {
    pub const BLACK: Color3 = Color3 { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Color3 = Color3 { r: 1.0, g: 1.0, b: 1.0 };

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn scale(self, s: f32) -> Color3 {
        Color3 {
            r: self.r * s,
            g: self.g * s,
            b: self.b * s,
        }
    }

    /// Convert logical 0-1 channels to clamped RGBA bytes
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            (self.r * 255.0).clamp(0.0, 255.0) as u8,
            (self.g * 255.0).clamp(0.0, 255.0) as u8,
            (self.b * 255.0).clamp(0.0, 255.0) as u8,
            255,
        ]
    }
}

impl Add for Color3 {
    type Output = Color3;
    fn add(self, other: Color3) -> Color3 {
        Color3 {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

impl Mul<f32> for Color3 {
    type Output = Color3;
    fn mul(self, s: f32) -> Color3 {
        self.scale(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert!((a.dot(b) - 32.0).abs() < 0.001);
    }

    #[test]
    fn test_vec3_cross_right_handed() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        let z = x.cross(y);
        assert!((z.x).abs() < 0.001);
        assert!((z.y).abs() < 0.001);
        assert!((z.z - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_normalize_unit_length() {
        let v = Vec3::new(3.0, 4.0, 0.0).normalize();
        assert!((v.magnitude() - 1.0).abs() < 0.001);
        assert!((v.x - 0.6).abs() < 0.001);
        assert!((v.y - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_vec2_cross_sign_flips_with_order() {
        let a = Vec2::new(1.0, 0.0);
        let b = Vec2::new(0.0, 1.0);
        assert!(a.cross(b) > 0.0);
        assert!(b.cross(a) < 0.0);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(Vec2::new(0.5, -0.5).round(), Vec2i::new(1, -1));
        assert_eq!(Vec2::new(1.4, -1.6).round(), Vec2i::new(1, -2));
    }

    #[test]
    fn test_vec2i_dot() {
        assert_eq!(Vec2i::new(2, 3).dot(Vec2i::new(4, 5)), 23);
    }

    #[test]
    fn test_vec2i_dot_does_not_overflow_pixel_spans() {
        // squared spans of a screen-sized edge exceed i32
        let v = Vec2i::new(50_000, 50_000);
        assert_eq!(v.dot(v), 5_000_000_000i64);
    }

    #[test]
    fn test_vec2_add_sub_round_trip() {
        let a = Vec2::new(3.5, -2.0);
        let b = Vec2::new(-1.5, 4.0);
        let sum = a + b;
        assert!((sum.x - 2.0).abs() < 0.001);
        assert!((sum.y - 2.0).abs() < 0.001);
        let back = sum - b;
        assert!((back.x - a.x).abs() < 0.001);
        assert!((back.y - a.y).abs() < 0.001);
    }

    #[test]
    fn test_color_arithmetic_is_unclamped() {
        let c = Color3::new(0.9, 0.9, 0.9) + Color3::new(0.9, 0.9, 0.9);
        assert!((c.r - 1.8).abs() < 0.001);
        let d = Color3::new(0.5, 0.5, 0.5) * -2.0;
        assert!((d.r + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_clamp_and_convert_is_idempotent() {
        for c in [
            Color3::new(1.7, -0.3, 0.5),
            Color3::new(0.0, 1.0, 0.999),
        ] {
            let once = c.to_rgba8();
            let back = Color3::new(
                once[0] as f32 / 255.0,
                once[1] as f32 / 255.0,
                once[2] as f32 / 255.0,
            );
            // within one step of quantization either way
            let twice = back.to_rgba8();
            for i in 0..3 {
                assert!((once[i] as i32 - twice[i] as i32).abs() <= 1);
            }
        }
        // clamped extremes are exact fixed points
        assert_eq!(Color3::new(2.0, -1.0, 1.0).to_rgba8(), [255, 0, 255, 255]);
    }
}

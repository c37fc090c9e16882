//! Triangle primitive with cached screen-space projection

use crate::math::{Vec2, Vec2i, Vec3};
use crate::projection::{self, Projection};
use serde::{Deserialize, Serialize};

/// A triangle in world space plus its projected screen vertices.
///
/// The projected vertices (pp1..pp3) are a cache derived from p1..p3 by
/// `project()`; they are recomputed every frame before rasterization and
/// are never a source of truth. The p1->p2->p3 winding fixes the outward
/// face normal and the backface-culling sign.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Triangle {
    pub p1: Vec3,
    pub p2: Vec3,
    pub p3: Vec3,

    pub pp1: Vec2,
    pub pp2: Vec2,
    pub pp3: Vec2,
}

impl Triangle {
    pub fn new(p1: Vec3, p2: Vec3, p3: Vec3) -> Self {
        Self {
            p1,
            p2,
            p3,
            pp1: Vec2::ZERO,
            pp2: Vec2::ZERO,
            pp3: Vec2::ZERO,
        }
    }

    /// Refresh the projected vertices from the world vertices.
    ///
    /// A behind-camera failure leaves that vertex at the zero point; the
    /// triangle still rasterizes (possibly wrong, never crashing).
    pub fn project(&mut self, projection: &Projection) {
        self.pp1 = projection.project(self.p1).unwrap_or_default();
        self.pp2 = projection.project(self.p2).unwrap_or_default();
        self.pp3 = projection.project(self.p3).unwrap_or_default();
    }

    /// New triangle with every vertex rotated about the origin
    pub fn rotated(&self, theta: f32) -> Triangle {
        Triangle::new(
            projection::rotate(self.p1, theta),
            projection::rotate(self.p2, theta),
            projection::rotate(self.p3, theta),
        )
    }

    // Projected bounding box, truncated toward zero like the fill loop
    // expects at a screen-center origin.
    pub fn min_px(&self) -> i32 {
        self.pp1.x.min(self.pp2.x).min(self.pp3.x) as i32
    }

    pub fn max_px(&self) -> i32 {
        self.pp1.x.max(self.pp2.x).max(self.pp3.x) as i32
    }

    pub fn min_py(&self) -> i32 {
        self.pp1.y.min(self.pp2.y).min(self.pp3.y) as i32
    }

    pub fn max_py(&self) -> i32 {
        self.pp1.y.max(self.pp2.y).max(self.pp3.y) as i32
    }

    /// Outward face normal under the p1->p2->p3 winding
    pub fn normal(&self) -> Vec3 {
        let v1 = self.p2 - self.p1;
        let v2 = self.p3 - self.p1;
        v2.cross(v1).normalize()
    }

    /// Vertex-averaged normal. Only meaningful when the vertices lie on a
    /// sphere centered at the origin, where the position is the normal.
    pub fn spherical_normal(&self) -> Vec3 {
        let avg = Vec3::new(
            (self.p1.x + self.p2.x + self.p3.x) / 3.0,
            (self.p1.y + self.p2.y + self.p3.y) / 3.0,
            (self.p1.z + self.p2.z + self.p3.z) / 3.0,
        );
        avg.normalize()
    }

    /// World-space centroid
    pub fn centroid(&self) -> Vec3 {
        Vec3::new(
            (self.p1.x + self.p2.x + self.p3.x) / 3.0,
            (self.p1.y + self.p2.y + self.p3.y) / 3.0,
            (self.p1.z + self.p2.z + self.p3.z) / 3.0,
        )
    }

    /// Classify pixel `p` against the rounded projected triangle.
    ///
    /// Returns (inside, (u, v)) with p = pp1 + u*(pp3-pp1) + v*(pp2-pp1);
    /// the remaining weight 1-u-v belongs to pp1. A zero-area triangle
    /// divides by zero into a non-finite (u, v) that fails every
    /// comparison, so all pixels are rejected without a special case.
    pub fn barycentric(&self, p: Vec2i) -> (bool, Vec2) {
        let v0 = self.pp3.round() - self.pp1.round();
        let v1 = self.pp2.round() - self.pp1.round();
        let v2 = p - self.pp1.round();

        let dot00 = v0.dot(v0);
        let dot01 = v0.dot(v1);
        let dot02 = v0.dot(v2);
        let dot11 = v1.dot(v1);
        let dot12 = v1.dot(v2);

        let inv_denom = 1.0 / (dot00 * dot11 - dot01 * dot01) as f32;
        let u = (dot11 * dot02 - dot01 * dot12) as f32 * inv_denom;
        let v = (dot00 * dot12 - dot01 * dot02) as f32 * inv_denom;

        (u >= 0.0 && v >= 0.0 && u + v <= 1.0, Vec2::new(u, v))
    }
}

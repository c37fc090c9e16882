//! 4x4 affine transforms, the model-matrix stack, and the 2D scene pipeline
//!
//! World points flow world -> model (top of stack) -> view -> projection
//! -> homogeneous divide (perspective only) -> viewport. Matrices are
//! row-major; vectors multiply on the right as columns.

use crate::math::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn scale(self, s: f32) -> Vec4 {
        Vec4::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }

    pub fn xy(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Row-major 4x4 matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mat4 {
    pub m: [[f32; 4]; 4],
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn from_rows(r0: [f32; 4], r1: [f32; 4], r2: [f32; 4], r3: [f32; 4]) -> Self {
        Self { m: [r0, r1, r2, r3] }
    }

    pub fn mul(self, other: Mat4) -> Mat4 {
        let mut out = [[0.0f32; 4]; 4];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.m[i][k] * other.m[k][j]).sum();
            }
        }
        Mat4 { m: out }
    }

    pub fn mul_vec4(self, v: Vec4) -> Vec4 {
        let col = [v.x, v.y, v.z, v.w];
        let mut out = [0.0f32; 4];
        for (i, o) in out.iter_mut().enumerate() {
            *o = (0..4).map(|k| self.m[i][k] * col[k]).sum();
        }
        Vec4::new(out[0], out[1], out[2], out[3])
    }

    /// Copy with the translation column zeroed, for transforming directions
    pub fn without_translation(self) -> Mat4 {
        let mut out = self;
        out.m[0][3] = 0.0;
        out.m[1][3] = 0.0;
        out.m[2][3] = 0.0;
        out
    }

    /// General inverse by cofactor expansion.
    ///
    /// Returns the identity for a singular matrix; the pipeline only
    /// inverts view/projection matrices, which are invertible by
    /// construction.
    pub fn inverse(self) -> Mat4 {
        let f = [
            self.m[0][0], self.m[0][1], self.m[0][2], self.m[0][3],
            self.m[1][0], self.m[1][1], self.m[1][2], self.m[1][3],
            self.m[2][0], self.m[2][1], self.m[2][2], self.m[2][3],
            self.m[3][0], self.m[3][1], self.m[3][2], self.m[3][3],
        ];
        let mut inv = [0.0f32; 16];

        inv[0] = f[5] * f[10] * f[15] - f[5] * f[11] * f[14] - f[9] * f[6] * f[15]
            + f[9] * f[7] * f[14] + f[13] * f[6] * f[11] - f[13] * f[7] * f[10];
        inv[4] = -f[4] * f[10] * f[15] + f[4] * f[11] * f[14] + f[8] * f[6] * f[15]
            - f[8] * f[7] * f[14] - f[12] * f[6] * f[11] + f[12] * f[7] * f[10];
        inv[8] = f[4] * f[9] * f[15] - f[4] * f[11] * f[13] - f[8] * f[5] * f[15]
            + f[8] * f[7] * f[13] + f[12] * f[5] * f[11] - f[12] * f[7] * f[9];
        inv[12] = -f[4] * f[9] * f[14] + f[4] * f[10] * f[13] + f[8] * f[5] * f[14]
            - f[8] * f[6] * f[13] - f[12] * f[5] * f[10] + f[12] * f[6] * f[9];
        inv[1] = -f[1] * f[10] * f[15] + f[1] * f[11] * f[14] + f[9] * f[2] * f[15]
            - f[9] * f[3] * f[14] - f[13] * f[2] * f[11] + f[13] * f[3] * f[10];
        inv[5] = f[0] * f[10] * f[15] - f[0] * f[11] * f[14] - f[8] * f[2] * f[15]
            + f[8] * f[3] * f[14] + f[12] * f[2] * f[11] - f[12] * f[3] * f[10];
        inv[9] = -f[0] * f[9] * f[15] + f[0] * f[11] * f[13] + f[8] * f[1] * f[15]
            - f[8] * f[3] * f[13] - f[12] * f[1] * f[11] + f[12] * f[3] * f[9];
        inv[13] = f[0] * f[9] * f[14] - f[0] * f[10] * f[13] - f[8] * f[1] * f[14]
            + f[8] * f[2] * f[13] + f[12] * f[1] * f[10] - f[12] * f[2] * f[9];
        inv[2] = f[1] * f[6] * f[15] - f[1] * f[7] * f[14] - f[5] * f[2] * f[15]
            + f[5] * f[3] * f[14] + f[13] * f[2] * f[7] - f[13] * f[3] * f[6];
        inv[6] = -f[0] * f[6] * f[15] + f[0] * f[7] * f[14] + f[4] * f[2] * f[15]
            - f[4] * f[3] * f[14] - f[12] * f[2] * f[7] + f[12] * f[3] * f[6];
        inv[10] = f[0] * f[5] * f[15] - f[0] * f[7] * f[13] - f[4] * f[1] * f[15]
            + f[4] * f[3] * f[13] + f[12] * f[1] * f[7] - f[12] * f[3] * f[5];
        inv[14] = -f[0] * f[5] * f[14] + f[0] * f[6] * f[13] + f[4] * f[1] * f[14]
            - f[4] * f[2] * f[13] - f[12] * f[1] * f[6] + f[12] * f[2] * f[5];
        inv[3] = -f[1] * f[6] * f[11] + f[1] * f[7] * f[10] + f[5] * f[2] * f[11]
            - f[5] * f[3] * f[10] - f[9] * f[2] * f[7] + f[9] * f[3] * f[6];
        inv[7] = f[0] * f[6] * f[11] - f[0] * f[7] * f[10] - f[4] * f[2] * f[11]
            + f[4] * f[3] * f[10] + f[8] * f[2] * f[7] - f[8] * f[3] * f[6];
        inv[11] = -f[0] * f[5] * f[11] + f[0] * f[7] * f[9] + f[4] * f[1] * f[11]
            - f[4] * f[3] * f[9] - f[8] * f[1] * f[7] + f[8] * f[3] * f[5];
        inv[15] = f[0] * f[5] * f[10] - f[0] * f[6] * f[9] - f[4] * f[1] * f[10]
            + f[4] * f[2] * f[9] + f[8] * f[1] * f[6] - f[8] * f[2] * f[5];

        let det = f[0] * inv[0] + f[1] * inv[4] + f[2] * inv[8] + f[3] * inv[12];
        if det == 0.0 {
            return Mat4::IDENTITY;
        }
        let det = 1.0 / det;

        let mut out = [[0.0f32; 4]; 4];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = inv[i * 4 + j] * det;
            }
        }
        Mat4 { m: out }
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::from_rows(
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        )
    }

    /// Rotation about the Z axis (the 2D scene rotation)
    pub fn rotation_z(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        Mat4::from_rows(
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        )
    }

    pub fn scaling(s: f32) -> Mat4 {
        Mat4::from_rows(
            [s, 0.0, 0.0, 0.0],
            [0.0, s, 0.0, 0.0],
            [0.0, 0.0, s, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        )
    }
}

/// Centered orthographic projection from the given world-space bounds.
///
/// Near/far are fixed at +-1; the Z flip into NDC rides in the translate.
pub fn ortho(left: f32, right: f32, bottom: f32, top: f32) -> Mat4 {
    let far = -1.0;
    let near = 1.0;

    let translate = Mat4::from_rows(
        [1.0, 0.0, 0.0, -(left + right) / 2.0],
        [0.0, 1.0, 0.0, -(top + bottom) / 2.0],
        [0.0, 0.0, -1.0, -(far + near) / 2.0],
        [0.0, 0.0, 0.0, 1.0],
    );

    let scale = Mat4::from_rows(
        [2.0 / (right - left), 0.0, 0.0, 0.0],
        [0.0, 2.0 / (top - bottom), 0.0, 0.0],
        [0.0, 0.0, 2.0 / (far - 1.0), 0.0],
        [0.0, 0.0, 0.0, 1.0],
    );

    scale.mul(translate)
}

/// Perspective view frustum. Near and far are negative (camera looks
/// down -Z); the output W carries the input Z for the homogeneous divide.
pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    Mat4::from_rows(
        [
            2.0 * near / (right - left),
            0.0,
            (left + right) / (left - right),
            0.0,
        ],
        [
            0.0,
            2.0 * near / (top - bottom),
            (bottom + top) / (bottom - top),
            0.0,
        ],
        [
            0.0,
            0.0,
            (far + near) / (near - far),
            (2.0 * far * near) / (far - near),
        ],
        [0.0, 0.0, 1.0, 0.0],
    )
}

/// Frustum half-plane width for a field of view at the near distance
pub fn fov_to_width(fov: f32, near: f32) -> f32 {
    2.0 * near * (fov / 2.0).tan()
}

/// NDC [-1,1]^2 to pixel coordinates, Y flipped to screen-down
pub fn viewport(width: f32, height: f32) -> Mat4 {
    let translate = Mat4::translation(width / 2.0, height / 2.0, 0.0);

    let scale = Mat4::from_rows(
        [width / 2.0, 0.0, 0.0, 0.0],
        [0.0, -height / 2.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    );

    translate.mul(scale)
}

/// View matrix: translate to the camera target, zoom, orient by up-vector
pub fn camera(up: Vec2, center: Vec2, zoom: f32) -> Mat4 {
    let translate = Mat4::translation(-center.x, -center.y, 0.0);
    let scale = Mat4::scaling(zoom);

    let orient = Mat4::from_rows(
        [up.y, -up.x, 0.0, 0.0],
        [up.x, up.y, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    );

    orient.mul(scale.mul(translate))
}

/// Stack of nested model transforms. Never empty; the bottom entry is the
/// identity and is never popped.
#[derive(Debug, Clone)]
pub struct MatrixStack {
    mats: Vec<Mat4>,
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixStack {
    pub fn new() -> Self {
        Self {
            mats: vec![Mat4::IDENTITY],
        }
    }

    pub fn top(&self) -> Mat4 {
        *self.mats.last().unwrap()
    }

    pub fn depth(&self) -> usize {
        self.mats.len()
    }

    /// Duplicate the current top
    pub fn push(&mut self) {
        self.mats.push(self.top());
    }

    pub fn pop(&mut self) {
        if self.mats.len() > 1 {
            self.mats.pop();
        }
    }

    /// Run `f` inside a push/pop pair; the pop is guaranteed even when
    /// `f` pushes and pops its own nested scopes.
    pub fn saved<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.push();
        let out = f(self);
        self.pop();
        out
    }

    fn compose(&mut self, m: Mat4) {
        let top = self.mats.last_mut().unwrap();
        *top = top.mul(m);
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.compose(Mat4::translation(x, y, z));
    }

    pub fn rotate(&mut self, angle: f32) {
        self.compose(Mat4::rotation_z(angle));
    }

    pub fn scale(&mut self, s: f32) {
        self.compose(Mat4::scaling(s));
    }
}

/// Whether the pipeline performs the homogeneous divide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectionKind {
    /// W is identically 1; the divide is skipped
    Orthographic,
    Perspective,
}

/// The full matrix pipeline for the 2D transform scenes
pub struct Pipeline {
    pub kind: ProjectionKind,
    pub projection: Mat4,
    pub view: Mat4,
    pub viewport: Mat4,
    pub stack: MatrixStack,
}

impl Pipeline {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            kind: ProjectionKind::Orthographic,
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            viewport: viewport(width, height),
            stack: MatrixStack::new(),
        }
    }

    /// World point (on the Z=0 plane) to pixel coordinates
    pub fn project(&self, world_x: f32, world_y: f32) -> Vec2 {
        let world = Vec4::new(world_x, world_y, 0.0, 1.0);

        let model = self.stack.top().mul_vec4(world);
        let camera = self.view.mul_vec4(model);
        let ndc = self.projection.mul_vec4(camera);

        let ndc = match self.kind {
            ProjectionKind::Orthographic => ndc,
            ProjectionKind::Perspective => ndc.scale(1.0 / ndc.w),
        };

        self.viewport.mul_vec4(ndc).xy()
    }
}

/// 2D camera state the view matrix is rebuilt from each frame
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Camera2d {
    pub target: Vec2,
    pub zoom: f32,
    pub rotation: f32,
}

impl Default for Camera2d {
    fn default() -> Self {
        Self {
            target: Vec2::ZERO,
            zoom: 1.0,
            rotation: 0.0,
        }
    }
}

impl Camera2d {
    pub fn view_matrix(&self) -> Mat4 {
        let (s, c) = self.rotation.sin_cos();
        // up-vector (0,1) rotated by the camera roll
        let up = Vec2::new(s, c);
        camera(up, self.target, self.zoom)
    }

    /// Apply a pointer-drag delta (in pixels) to the camera target.
    ///
    /// The pixel delta becomes an NDC delta, then runs backwards through
    /// the translation-stripped projection and view matrices so the world
    /// under the pointer tracks the drag at any zoom or roll.
    pub fn pan(&mut self, dx: f32, dy: f32, width: f32, height: f32, projection: Mat4) {
        let delta_ndc = Vec4::new(-dx / width * 2.0, dy / height * 2.0, 0.0, 0.0);

        let inv_projection = projection.without_translation().inverse();
        let inv_view = self.view_matrix().without_translation().inverse();

        let delta_view = inv_projection.mul_vec4(delta_ndc);
        let delta_world = inv_view.mul_vec4(delta_view);

        self.target.x += delta_world.x;
        self.target.y += delta_world.y;
    }

    /// Zoom about the world point under the pointer
    pub fn zoom_at(
        &mut self,
        mouse_x: f32,
        mouse_y: f32,
        width: f32,
        height: f32,
        projection: Mat4,
        wheel: f32,
    ) {
        if wheel == 0.0 {
            return;
        }

        let mouse_ndc = Vec4::new(
            mouse_x * 2.0 / width - 1.0,
            -(mouse_y * 2.0 / height - 1.0),
            0.0,
            0.0,
        );

        let mouse_view = projection.inverse().mul_vec4(mouse_ndc);
        let mouse_world = self.view_matrix().inverse().mul_vec4(mouse_view);

        self.target = mouse_world.xy();
        self.zoom *= if wheel > 0.0 { 0.9 } else { 1.1 };
    }
}

//! Per-frame scene drivers
//!
//! `SpinScene` owns an immutable base mesh and derives rotated/projected
//! copies each frame; `Starfield` drives the matrix pipeline's perspective
//! path. Both are fed toggle/tick events by an external input layer.

use crate::lighting::SceneLighting;
use crate::math::{Color3, Vec3};
use crate::projection::Projection;
use crate::render::{self, Framebuffer, RenderSettings};
use crate::transform::Pipeline;
use crate::triangle::Triangle;

/// Rotation advance per tick
const ROTATE_DELTA: f32 = 0.01;

const TAU: f32 = std::f32::consts::PI * 2.0;

/// A mesh spinning about the origin under the lighting rasterizer
pub struct SpinScene {
    base: Vec<Triangle>,
    rotated: Vec<Triangle>,

    pub theta: f32,
    pub rotate: bool,
    pub settings: RenderSettings,
    pub lighting: SceneLighting,
    pub projection: Projection,
}

impl SpinScene {
    /// The base mesh is read-only for the scene's lifetime; rotation
    /// derives fresh copies and never writes back.
    pub fn new(triangles: Vec<Triangle>) -> Self {
        let rotated = triangles.clone();
        Self {
            base: triangles,
            rotated,
            theta: 0.0,
            rotate: false,
            settings: RenderSettings::default(),
            lighting: SceneLighting::default(),
            projection: Projection::default(),
        }
    }

    pub fn toggle_rotation(&mut self) {
        self.rotate = !self.rotate;
    }

    pub fn toggle_culling(&mut self) {
        self.settings.cull_backfaces = !self.settings.cull_backfaces;
    }

    pub fn toggle_outline(&mut self) {
        self.settings.draw_outline = !self.settings.draw_outline;
    }

    pub fn toggle_normals(&mut self) {
        self.settings.draw_normals = !self.settings.draw_normals;
    }

    pub fn cycle_mode(&mut self) {
        self.settings.mode = self.settings.mode.cycle();
    }

    /// Advance the rotation angle one frame, wrapping at a full turn
    pub fn tick(&mut self) {
        if self.rotate {
            self.theta += ROTATE_DELTA;
            while self.theta > TAU {
                self.theta -= TAU;
            }
        }
    }

    /// Clear, derive this frame's rotated mesh, project and rasterize
    pub fn draw(&mut self, fb: &mut Framebuffer) {
        fb.clear(Color3::BLACK);

        self.rotated.clear();
        self.rotated
            .extend(self.base.iter().map(|t| t.rotated(self.theta)));

        render::render_triangles(
            fb,
            &mut self.rotated,
            &self.settings,
            &self.lighting,
            &self.projection,
        );
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Stars streaming toward the camera through the perspective frustum.
///
/// Star positions come from the caller so the library stays free of a
/// randomness source.
pub struct Starfield {
    stars: Vec<Star>,
    pub active: bool,
    speed: f32,
    /// Depth at which exhausted stars reappear (negative, far plane)
    appear_distance: f32,
}

impl Starfield {
    pub fn new(stars: Vec<Star>, appear_distance: f32) -> Self {
        Self {
            stars,
            active: true,
            speed: 1.0,
            appear_distance,
        }
    }

    /// Advance every star toward the camera, wrapping past the eye plane
    pub fn update(&mut self) {
        if !self.active {
            return;
        }

        self.speed += 0.01;

        for star in &mut self.stars {
            star.z += self.speed;
            if star.z > 0.0 {
                star.z = self.appear_distance;
            }
        }
    }

    /// Draw each star as a single depth-faded pixel through the pipeline
    pub fn draw(&self, fb: &mut Framebuffer, pipeline: &mut Pipeline) {
        for star in &self.stars {
            pipeline.stack.push();
            pipeline.stack.translate(star.x, star.y, star.z);
            let xy = pipeline.project(star.x, star.y);
            pipeline.stack.pop();

            let brightness = 1.0 - star.z / self.appear_distance;
            let color = Color3::WHITE * brightness;

            if xy.x >= 0.0 && xy.y >= 0.0 {
                fb.set_pixel(xy.x as usize, xy.y as usize, color);
            }
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }
}

/// Unit triangle scaled to `size`, facing the default eye
pub fn sample_triangle(size: f32) -> Vec<Triangle> {
    vec![Triangle::new(
        Vec3::new(0.0, size, size),
        Vec3::new(size, -size, size),
        Vec3::new(-size, -size, size),
    )]
}

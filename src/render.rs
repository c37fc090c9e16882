//! Framebuffer and triangle rasterization
//!
//! Fill runs over the projected bounding box, classifying pixels with the
//! barycentric test and picking colors per shading mode. Drawing uses a
//! logical coordinate system with the origin at screen center and Y up;
//! the translation to the top-left, Y-down byte buffer happens at the one
//! pixel-write point.

use crate::lighting::SceneLighting;
use crate::math::{Color3, Vec2, Vec2i};
use crate::projection::Projection;
use crate::triangle::Triangle;
use serde::{Deserialize, Serialize};

/// RGBA pixel buffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>, // RGBA, 4 bytes per pixel
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color3) {
        let bytes = color.to_rgba8();
        for i in 0..(self.width * self.height) {
            self.pixels[i * 4..i * 4 + 4].copy_from_slice(&bytes);
        }
    }

    /// Raw write in buffer coordinates (origin top-left, Y down).
    /// Out-of-bounds writes are discarded.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color3) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_rgba8());
        }
    }

    /// Write in logical coordinates: origin at screen center, Y up.
    /// Out-of-bounds writes are discarded; the channel clamp happens
    /// here, in `to_rgba8`, and nowhere earlier.
    pub fn plot(&mut self, x: i32, y: i32, color: Color3) {
        let x = x + self.width as i32 / 2;
        let y = self.height as i32 - (y + self.height as i32 / 2);

        if x < 0 || x >= self.width as i32 || y < 0 || y >= self.height as i32 {
            return;
        }

        self.set_pixel(x as usize, y as usize, color);
    }

    /// Read back a pixel in buffer coordinates (tests and presentation)
    pub fn get_pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let idx = (y * self.width + x) * 4;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }
}

/// How filled pixels get their color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShadingMode {
    /// Fill disabled (outline/normals still draw)
    None,
    /// Constant fill color
    Flat,
    /// Barycentric weights as RGB, for debugging interpolation
    Barycentric,
    /// Phong evaluated once per face at the face normal
    PhongFace,
    /// Phong evaluated once per face at the vertex-averaged normal
    PhongVertex,
    /// Phong at the three vertices, colors interpolated per pixel
    Gouraud,
    /// Normal interpolated per pixel, Phong evaluated per pixel
    PhongPixel,
}

impl ShadingMode {
    /// Next mode in the demo cycling order, wrapping to `None`
    pub fn cycle(self) -> ShadingMode {
        match self {
            ShadingMode::None => ShadingMode::Flat,
            ShadingMode::Flat => ShadingMode::Barycentric,
            ShadingMode::Barycentric => ShadingMode::PhongFace,
            ShadingMode::PhongFace => ShadingMode::PhongVertex,
            ShadingMode::PhongVertex => ShadingMode::Gouraud,
            ShadingMode::Gouraud => ShadingMode::PhongPixel,
            ShadingMode::PhongPixel => ShadingMode::None,
        }
    }
}

/// Per-frame rasterizer settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RenderSettings {
    pub mode: ShadingMode,
    pub cull_backfaces: bool,
    pub draw_outline: bool,
    pub draw_normals: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            mode: ShadingMode::None,
            cull_backfaces: true,
            draw_outline: true,
            draw_normals: false,
        }
    }
}

/// Line from `start` to `end` in logical coordinates.
///
/// Steps one pixel along the major axis, accumulating a fractional error
/// for the minor axis and stepping it when the error exceeds 0.5. Both
/// endpoints are drawn.
pub fn draw_line(fb: &mut Framebuffer, start: Vec2, end: Vec2, color: Color3) {
    let dx = end.x - start.x;
    let dy = end.y - start.y;

    let step_x: i32 = if start.x > end.x { -1 } else { 1 };
    let step_y: i32 = if start.y > end.y { -1 } else { 1 };

    let mut x = start.x as i32;
    let mut y = start.y as i32;
    let mut err = 0.0f32;

    if dy.abs() > dx.abs() {
        let slope = (dx / dy).abs();
        for _ in 0..=dy.abs() as i32 {
            fb.plot(x, y, color);
            y += step_y;
            err += slope;
            if err > 0.5 {
                err -= 1.0;
                x += step_x;
            }
        }
    } else {
        let slope = (dy / dx).abs();
        for _ in 0..=dx.abs() as i32 {
            fb.plot(x, y, color);
            x += step_x;
            err += slope;
            if err > 0.5 {
                err -= 1.0;
                y += step_y;
            }
        }
    }
}

/// Scanline-fill a projected triangle under the given shading mode
fn fill_triangle(fb: &mut Framebuffer, t: &Triangle, mode: ShadingMode, lighting: &SceneLighting) {
    let min_x = t.min_px();
    let max_x = t.max_px();
    let min_y = t.min_py();
    let max_y = t.max_py();

    let face_color = lighting.phong(t.normal());
    let average_color = lighting.phong(t.spherical_normal());
    let v1_color = lighting.phong(t.p1.normalize());
    let v2_color = lighting.phong(t.p2.normalize());
    let v3_color = lighting.phong(t.p3.normalize());

    for y in (min_y..=max_y).rev() {
        for x in min_x..=max_x {
            let (inside, uv) = t.barycentric(Vec2i::new(x, y));
            if !inside {
                continue;
            }

            // weights map u -> p3, v -> p2, 1-u-v -> p1, matching the
            // edge vectors of the barycentric solve
            let color = match mode {
                ShadingMode::None | ShadingMode::Flat => lighting.fill_color,
                ShadingMode::Barycentric => Color3::new(uv.x, uv.y, 1.0 - uv.x - uv.y),
                ShadingMode::PhongFace => face_color,
                ShadingMode::PhongVertex => average_color,
                ShadingMode::Gouraud => {
                    v3_color * uv.x + v2_color * uv.y + v1_color * (1.0 - uv.x - uv.y)
                }
                ShadingMode::PhongPixel => {
                    let normal = (t.p1 * (1.0 - uv.x - uv.y) + t.p2 * uv.y + t.p3 * uv.x)
                        .normalize();
                    lighting.phong(normal)
                }
            };

            fb.plot(x, y, color);
        }
    }
}

fn draw_outline(fb: &mut Framebuffer, t: &Triangle, color: Color3) {
    draw_line(fb, t.pp1, t.pp2, color);
    draw_line(fb, t.pp2, t.pp3, color);
    draw_line(fb, t.pp3, t.pp1, color);
}

/// Overlay the face normal as a short line out of the centroid
fn draw_normal(
    fb: &mut Framebuffer,
    t: &Triangle,
    lighting: &SceneLighting,
    projection: &Projection,
) {
    const NORMAL_LENGTH: f32 = 20.0;

    let start = t.centroid();
    let end = start + t.normal() * NORMAL_LENGTH;

    let screen_start = projection.project(start).unwrap_or_default();
    let screen_end = projection.project(end).unwrap_or_default();

    draw_line(fb, screen_start, screen_end, lighting.normal_color);
}

/// Draw one projected triangle: cull, fill, then overlays.
///
/// A culled back face draws nothing at all, overlays included.
pub fn draw_triangle(
    fb: &mut Framebuffer,
    t: &Triangle,
    settings: &RenderSettings,
    lighting: &SceneLighting,
    projection: &Projection,
) {
    let vec_a = t.pp3 - t.pp1;
    let vec_b = t.pp2 - t.pp1;
    if vec_a.cross(vec_b) < 0.0 && settings.cull_backfaces {
        return;
    }

    if settings.mode != ShadingMode::None {
        fill_triangle(fb, t, settings.mode, lighting);
    }

    if settings.draw_outline {
        draw_outline(fb, t, lighting.outline_color);
    }

    if settings.draw_normals {
        draw_normal(fb, t, lighting, projection);
    }
}

/// Project and draw a frame's worth of triangles
pub fn render_triangles(
    fb: &mut Framebuffer,
    triangles: &mut [Triangle],
    settings: &RenderSettings,
    lighting: &SceneLighting,
    projection: &Projection,
) {
    for t in triangles.iter_mut() {
        t.project(projection);
        draw_triangle(fb, t, settings, lighting, projection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    fn lit_pixels(fb: &Framebuffer) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for y in 0..fb.height {
            for x in 0..fb.width {
                if fb.get_pixel(x, y)[0] > 0 {
                    out.push((x, y));
                }
            }
        }
        out
    }

    // logical (0,0) lands at buffer (8, 8) in a 16x16 buffer
    fn to_buffer(x: i32, y: i32) -> (usize, usize) {
        ((x + 8) as usize, (16 - (y + 8)) as usize)
    }

    #[test]
    fn test_line_horizontal_endpoints() {
        let mut fb = Framebuffer::new(16, 16);
        draw_line(&mut fb, Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0), Color3::WHITE);
        let lit = lit_pixels(&fb);
        assert_eq!(lit.len(), 6);
        for x in 0..=5 {
            assert!(lit.contains(&to_buffer(x, 0)));
        }
    }

    #[test]
    fn test_line_vertical_endpoints() {
        let mut fb = Framebuffer::new(16, 16);
        draw_line(&mut fb, Vec2::new(0.0, 0.0), Vec2::new(0.0, 5.0), Color3::WHITE);
        let lit = lit_pixels(&fb);
        assert_eq!(lit.len(), 6);
        for y in 0..=5 {
            assert!(lit.contains(&to_buffer(0, y)));
        }
    }

    #[test]
    fn test_line_diagonal_no_drift() {
        let mut fb = Framebuffer::new(16, 16);
        draw_line(&mut fb, Vec2::new(0.0, 0.0), Vec2::new(3.0, 3.0), Color3::WHITE);
        let lit = lit_pixels(&fb);
        assert_eq!(lit.len(), 4);
        for d in 0..=3 {
            assert!(lit.contains(&to_buffer(d, d)));
        }
    }

    #[test]
    fn test_line_reverse_direction() {
        let mut fb = Framebuffer::new(16, 16);
        draw_line(&mut fb, Vec2::new(5.0, 0.0), Vec2::new(0.0, 0.0), Color3::WHITE);
        assert_eq!(lit_pixels(&fb).len(), 6);
    }

    #[test]
    fn test_plot_discards_out_of_bounds() {
        let mut fb = Framebuffer::new(16, 16);
        fb.plot(100, 0, Color3::WHITE);
        fb.plot(0, -100, Color3::WHITE);
        assert!(lit_pixels(&fb).is_empty());
    }

    #[test]
    fn test_plot_clamps_at_write() {
        let mut fb = Framebuffer::new(16, 16);
        fb.plot(0, 0, Color3::new(2.0, -1.0, 0.5));
        let (bx, by) = to_buffer(0, 0);
        assert_eq!(fb.get_pixel(bx, by), [255, 0, 127, 255]);
    }

    #[test]
    fn test_clear_resets_every_pixel() {
        let mut fb = Framebuffer::new(8, 8);
        fb.plot(0, 0, Color3::WHITE);
        fb.clear(Color3::BLACK);
        assert!(lit_pixels(&fb).is_empty());
    }

    fn sample_triangle(size: f32) -> Triangle {
        Triangle::new(
            Vec3::new(0.0, size, size),
            Vec3::new(size, -size, size),
            Vec3::new(-size, -size, size),
        )
    }

    #[test]
    fn test_fill_matches_polygon_area() {
        // size-100 triangle at z=100 seen from z=600 with k=0.002
        // projects to (0,100), (100,-100), (-100,-100) exactly
        let mut fb = Framebuffer::new(640, 640);
        let projection = Projection::default();
        let lighting = SceneLighting::default();
        let settings = RenderSettings {
            mode: ShadingMode::Flat,
            cull_backfaces: false,
            draw_outline: false,
            draw_normals: false,
        };

        let mut tris = [sample_triangle(100.0)];
        render_triangles(&mut fb, &mut tris, &settings, &lighting, &projection);

        let t = &tris[0];
        let area = (t.pp3 - t.pp1).cross(t.pp2 - t.pp1) / 2.0;
        assert!(area > 0.0);
        assert!((area - 20000.0).abs() < 100.0);

        // inclusive rasterization covers area + boundary; a few percent over
        let count = lit_pixels(&fb).len() as f32;
        assert!(count >= area * 0.99 && count <= area * 1.03);
    }

    #[test]
    fn test_backface_cull_skips_everything() {
        let mut fb = Framebuffer::new(640, 640);
        let projection = Projection::default();
        let lighting = SceneLighting::default();
        let settings = RenderSettings {
            mode: ShadingMode::Flat,
            cull_backfaces: true,
            draw_outline: true,
            draw_normals: true,
        };

        // reversed winding: projected cross goes negative
        let t = sample_triangle(100.0);
        let mut tris = [Triangle::new(t.p1, t.p3, t.p2)];
        render_triangles(&mut fb, &mut tris, &settings, &lighting, &projection);
        assert!(lit_pixels(&fb).is_empty());

        // same triangle with culling off draws
        let mut relaxed = settings;
        relaxed.cull_backfaces = false;
        render_triangles(&mut fb, &mut tris, &relaxed, &lighting, &projection);
        assert!(!lit_pixels(&fb).is_empty());
    }

    #[test]
    fn test_eye_plane_vertex_degrades_without_crash() {
        // a vertex sitting exactly on the eye plane swallows to the zero
        // point and the triangle still rasterizes
        let mut fb = Framebuffer::new(640, 640);
        let projection = Projection::default();
        let lighting = SceneLighting::default();
        let settings = RenderSettings {
            mode: ShadingMode::Flat,
            cull_backfaces: false,
            draw_outline: true,
            draw_normals: false,
        };

        let mut tris = [Triangle::new(
            Vec3::new(1.0, 1.0, 600.0),
            Vec3::new(100.0, -100.0, 100.0),
            Vec3::new(-100.0, -100.0, 100.0),
        )];
        render_triangles(&mut fb, &mut tris, &settings, &lighting, &projection);
        assert_eq!(tris[0].pp1, Vec2::ZERO);
    }

    #[test]
    fn test_cull_sign_flips_with_winding() {
        let projection = Projection::default();
        let mut t = sample_triangle(100.0);
        t.project(&projection);
        let forward = (t.pp3 - t.pp1).cross(t.pp2 - t.pp1);

        let mut r = Triangle::new(t.p1, t.p3, t.p2);
        r.project(&projection);
        let reversed = (r.pp3 - r.pp1).cross(r.pp2 - r.pp1);

        assert!(forward * reversed < 0.0);
    }

    #[test]
    fn test_gouraud_interpolates_between_vertex_colors() {
        let mut fb = Framebuffer::new(640, 640);
        let projection = Projection::default();
        let lighting = SceneLighting::default();
        let settings = RenderSettings {
            mode: ShadingMode::Gouraud,
            cull_backfaces: false,
            draw_outline: false,
            draw_normals: false,
        };

        let mut tris = [sample_triangle(100.0)];
        render_triangles(&mut fb, &mut tris, &settings, &lighting, &projection);

        let v1 = lighting.phong(tris[0].p1.normalize()).to_rgba8();
        let v2 = lighting.phong(tris[0].p2.normalize()).to_rgba8();
        let v3 = lighting.phong(tris[0].p3.normalize()).to_rgba8();
        let lo = v1[0].min(v2[0]).min(v3[0]);
        let hi = v1[0].max(v2[0]).max(v3[0]);

        for (x, y) in lit_pixels(&fb) {
            let px = fb.get_pixel(x, y)[0];
            assert!(px >= lo.saturating_sub(2) && px <= hi.saturating_add(2));
        }
    }

    #[test]
    fn test_mode_cycle_wraps() {
        let mut mode = ShadingMode::None;
        for _ in 0..7 {
            mode = mode.cycle();
        }
        assert_eq!(mode, ShadingMode::None);
    }
}

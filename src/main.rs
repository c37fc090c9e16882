//! Demo viewer for the softrender pipeline
//!
//! Owns the window, input dispatch, mesh generation and presentation;
//! the library core only ever sees triangle lists and the framebuffer.
//!
//! Keys: space toggles rotation (or starfield motion), C backface
//! culling, O outlines, N normal overlays, M cycles the shading mode,
//! Tab switches between the lighting and starfield demos.

use macroquad::prelude::*;
use macroquad::rand::gen_range;

use softrender::math::{Color3, Vec3};
use softrender::scene::{SpinScene, Star, Starfield};
use softrender::transform::{fov_to_width, frustum, Pipeline, ProjectionKind};
use softrender::{Framebuffer, Triangle, HEIGHT, HEIGHT_WIDE, WIDTH, WIDTH_WIDE};

const SPHERE_RADIUS: f32 = 250.0;
const SPHERE_DIVISIONS: usize = 20;

const STAR_COUNT: usize = 500;
const STAR_NEAR: f32 = -10.0;
const STAR_FAR: f32 = -500.0;
const STAR_FOV: f32 = std::f32::consts::FRAC_PI_2;

/// Tessellate a sphere into triangles, poles collapsed to single fans
fn make_sphere(radius: f32, divisions: usize) -> Vec<Triangle> {
    let mut tris = Vec::new();

    for phi_step in 0..divisions {
        for theta_step in 0..(divisions * 2) {
            let phi1 = std::f32::consts::PI * phi_step as f32 / divisions as f32;
            let phi2 = std::f32::consts::PI * (phi_step + 1) as f32 / divisions as f32;
            let theta1 =
                2.0 * std::f32::consts::PI * theta_step as f32 / (divisions * 2) as f32;
            let theta2 =
                2.0 * std::f32::consts::PI * (theta_step + 1) as f32 / (divisions * 2) as f32;

            let y12 = radius * phi1.cos();
            let y34 = radius * phi2.cos();

            let pt1 = Vec3::new(
                radius * phi1.sin() * theta1.sin(),
                y12,
                radius * phi1.sin() * theta1.cos(),
            );
            let pt2 = Vec3::new(
                radius * phi1.sin() * theta2.sin(),
                y12,
                radius * phi1.sin() * theta2.cos(),
            );
            let pt3 = Vec3::new(
                radius * phi2.sin() * theta2.sin(),
                y34,
                radius * phi2.sin() * theta2.cos(),
            );
            let pt4 = Vec3::new(
                radius * phi2.sin() * theta1.sin(),
                y34,
                radius * phi2.sin() * theta1.cos(),
            );

            if phi_step == 0 {
                // top cap
                tris.push(Triangle::new(pt1, pt3, pt4));
            } else if phi_step == divisions - 1 {
                // bottom cap
                tris.push(Triangle::new(pt1, pt2, pt4));
            } else {
                tris.push(Triangle::new(pt1, pt2, pt3));
                tris.push(Triangle::new(pt1, pt3, pt4));
            }
        }
    }

    tris
}

fn make_stars() -> Vec<Star> {
    (0..STAR_COUNT)
        .map(|_| Star {
            x: gen_range(-(WIDTH_WIDE as f32) / 2.0, WIDTH_WIDE as f32 / 2.0),
            y: gen_range(-(HEIGHT_WIDE as f32) / 2.0, HEIGHT_WIDE as f32 / 2.0),
            z: gen_range(STAR_FAR, 0.0),
        })
        .collect()
}

fn make_star_pipeline() -> Pipeline {
    let right = fov_to_width(STAR_FOV, STAR_NEAR.abs());
    let top = right * HEIGHT_WIDE as f32 / WIDTH_WIDE as f32;

    let mut pipeline = Pipeline::new(WIDTH_WIDE as f32, HEIGHT_WIDE as f32);
    pipeline.kind = ProjectionKind::Perspective;
    pipeline.projection = frustum(-right, right, -top, top, STAR_NEAR, STAR_FAR);
    pipeline
}

fn present(fb: &Framebuffer) {
    let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
    texture.set_filter(FilterMode::Nearest);
    draw_texture_ex(
        &texture,
        0.0,
        0.0,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(screen_width(), screen_height())),
            ..Default::default()
        },
    );
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Demo {
    Lighting,
    Starfield,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "softrender".to_owned(),
        window_width: WIDTH as i32,
        window_height: HEIGHT as i32,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let mut fb = Framebuffer::new(WIDTH, HEIGHT);
    let mut scene = SpinScene::new(make_sphere(SPHERE_RADIUS, SPHERE_DIVISIONS));

    let mut star_fb = Framebuffer::new(WIDTH_WIDE, HEIGHT_WIDE);
    let mut star_pipeline = make_star_pipeline();
    let mut starfield = Starfield::new(make_stars(), STAR_FAR);

    let mut demo = Demo::Lighting;

    println!("space: rotate  c: cull  o: outline  n: normals  m: shading  tab: demo");

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        if is_key_pressed(KeyCode::Tab) {
            demo = match demo {
                Demo::Lighting => Demo::Starfield,
                Demo::Starfield => Demo::Lighting,
            };
        }

        clear_background(BLACK);

        match demo {
            Demo::Lighting => {
                if is_key_pressed(KeyCode::Space) {
                    scene.toggle_rotation();
                }
                if is_key_pressed(KeyCode::C) {
                    scene.toggle_culling();
                }
                if is_key_pressed(KeyCode::O) {
                    scene.toggle_outline();
                }
                if is_key_pressed(KeyCode::N) {
                    scene.toggle_normals();
                }
                if is_key_pressed(KeyCode::M) {
                    scene.cycle_mode();
                    println!("shading mode: {:?}", scene.settings.mode);
                }

                scene.tick();
                scene.draw(&mut fb);
                present(&fb);
            }
            Demo::Starfield => {
                if is_key_pressed(KeyCode::Space) {
                    starfield.active = !starfield.active;
                }

                starfield.update();
                star_fb.clear(Color3::BLACK);
                starfield.draw(&mut star_fb, &mut star_pipeline);
                present(&star_fb);
            }
        }

        next_frame().await
    }
}

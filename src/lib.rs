//! Software 3D rasterizer core
//!
//! A from-scratch CPU scanline renderer:
//! - Divide-by-depth perspective projection with backface culling
//! - Barycentric triangle fill with flat / Phong / Gouraud shading modes
//! - Wireframe outlines and face-normal overlays
//! - A 4x4 matrix stack (model/view/projection/viewport) for 2D scenes
//!
//! The library owns no window: embedders hand it triangle lists and read
//! back a pixel buffer each frame (see `render::Framebuffer`).

pub mod math;
pub mod projection;
pub mod transform;
pub mod triangle;
pub mod lighting;
pub mod render;
pub mod scene;

pub use math::{Color3, Vec2, Vec2i, Vec3};
pub use projection::{BehindCamera, Projection};
pub use render::{Framebuffer, RenderSettings, ShadingMode};
pub use triangle::Triangle;

/// Canvas dimensions for the lighting scenes
pub const WIDTH: usize = 640;
pub const HEIGHT: usize = 640;

/// Canvas dimensions for the starfield variant
pub const WIDTH_WIDE: usize = 640;
pub const HEIGHT_WIDE: usize = 480;

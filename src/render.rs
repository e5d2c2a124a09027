use log::{error, info};

use crate::color::Color;
use crate::math::Mat4;
use crate::mesh::Mesh;
use crate::rasterizer::Rasterizer;
use crate::texture::Texture;

const WINDOW_TITLE: &str = "softrender";

/// Glue between the rasterizer and the window: owns the pixel buffer handed
/// to the rasterizer each frame and presents it through minifb.
pub struct Renderer {
    rasterizer: Rasterizer,
    window: minifb::Window,
    pixels: Vec<u32>,
    width: usize,
    height: usize,
}

impl Renderer {
    pub fn new(width: usize, height: usize, clear_color: Color) -> Renderer {
        let window = minifb::Window::new(
            WINDOW_TITLE,
            width,
            height,
            minifb::WindowOptions {
                resize: true,
                ..minifb::WindowOptions::default()
            },
        )
        .expect("failed to create a window");

        Renderer {
            rasterizer: Rasterizer::new(width, height, clear_color),
            window,
            pixels: vec![0; width * height],
            width,
            height,
        }
    }

    /// Picks up window size changes before a new frame starts. Both buffers
    /// hold garbage afterwards until the next `clear`.
    pub fn handle_resize(&mut self) {
        let (width, height) = self.window.get_size();
        if width != self.width || height != self.height {
            info!("resizing frame target to {}x{}", width, height);
            self.width = width;
            self.height = height;
            self.pixels.clear();
            self.pixels.resize(width * height, 0);
            self.rasterizer.resize(width, height);
        }
    }

    pub fn clear(&mut self) {
        self.rasterizer.clear(&mut self.pixels);
    }

    pub fn draw_mesh(
        &mut self,
        mesh: &Mesh,
        texture: &Texture,
        rotation: &Mat4,
        translation: &Mat4,
        fov_deg: f32,
    ) {
        self.rasterizer
            .draw_mesh(mesh, texture, &mut self.pixels, rotation, translation, fov_deg);
    }

    pub fn set_fps_title(&mut self, fps: u32) {
        self.window
            .set_title(&format!("{} ({} FPS)", WINDOW_TITLE, fps));
    }

    /// Pushes the finished frame to the screen. Returns false once the
    /// window has been closed, Escape pressed, or the surface lost.
    pub fn present(&mut self) -> bool {
        if !self.window.is_open() || self.window.is_key_down(minifb::Key::Escape) {
            return false;
        }

        if let Err(e) = self
            .window
            .update_with_buffer(&self.pixels)
        {
            error!("failed to present frame: {}", e);
            return false;
        }

        true
    }
}

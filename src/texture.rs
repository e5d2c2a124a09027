use std::fs::File;
use std::path::Path;

use log::info;

use crate::color::Color;
use crate::model::LoadError;

/// Read-only 2D byte raster. Rows are tightly packed, `width * bytes_per_pixel`
/// apart; (0, 0) is the upper left corner. Texels are stored B, G, R(, A).
#[derive(Clone)]
pub struct Texture {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Texture ({} channels), w: {}, h: {}",
            self.bytes_per_pixel, self.width, self.height
        )
    }
}

impl Texture {
    pub fn new(width: u32, height: u32, bytes_per_pixel: usize, pixels: Vec<u8>) -> Self {
        assert!(bytes_per_pixel == 3 || bytes_per_pixel == 4);
        assert!(width > 0 && height > 0);
        assert_eq!(
            pixels.len(),
            width as usize * height as usize * bytes_per_pixel
        );
        Texture {
            pixels,
            width,
            height,
            bytes_per_pixel,
        }
    }

    /// Decodes an 8-bit RGB(A) PNG. The sampler reads blue first, so the
    /// channels are swizzled once here instead of per texel fetch.
    pub fn from_png_file(path: impl AsRef<Path>) -> Result<Texture, LoadError> {
        let file = File::open(path.as_ref()).map_err(LoadError::Io)?;
        let decoder = png::Decoder::new(file);
        let (png_info, mut reader) = decoder
            .read_info()
            .map_err(|e| LoadError::TextureDecode(e.to_string()))?;
        let mut buf = vec![0u8; png_info.buffer_size()];
        reader
            .next_frame(&mut buf)
            .map_err(|e| LoadError::TextureDecode(e.to_string()))?;

        if png_info.bit_depth != png::BitDepth::Eight {
            return Err(LoadError::TextureDecode(format!(
                "unsupported bit depth {:?}",
                png_info.bit_depth
            )));
        }
        let bytes_per_pixel = match png_info.color_type {
            png::ColorType::RGB => 3,
            png::ColorType::RGBA => 4,
            other => {
                return Err(LoadError::TextureDecode(format!(
                    "unsupported color type {:?}",
                    other
                )))
            }
        };

        for texel in buf.chunks_exact_mut(bytes_per_pixel) {
            texel.swap(0, 2);
        }

        info!(
            "loaded {}x{} texture ({} channels) from {}",
            png_info.width,
            png_info.height,
            bytes_per_pixel,
            path.as_ref().display()
        );
        Ok(Texture::new(
            png_info.width,
            png_info.height,
            bytes_per_pixel,
            buf,
        ))
    }

    /// A `width` x `height` checkerboard alternating between two colors, one
    /// cell per texel.
    pub fn checkerboard(width: u32, height: u32, even: Color, odd: Color) -> Texture {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                let color = if (x + y) % 2 == 0 { even } else { odd };
                pixels.push(color.b);
                pixels.push(color.g);
                pixels.push(color.r);
                pixels.push(color.a);
            }
        }
        Texture::new(width, height, 4, pixels)
    }

    fn read_texel(&self, x: u32, y: u32) -> Color {
        debug_assert!(x < self.width, "x: {}", x);
        debug_assert!(y < self.height, "y: {}", y);
        let idx = (y * self.width + x) as usize * self.bytes_per_pixel;
        // Alpha is forced opaque even for four-channel sources.
        Color {
            b: self.pixels[idx],
            g: self.pixels[idx + 1],
            r: self.pixels[idx + 2],
            a: 255,
        }
    }

    /// Nearest-neighbor sample with wrap-around. Coordinates are expected to
    /// be non-negative; values past 1.0 wrap.
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let ui = (u * self.width as f32) as u32;
        let vi = (v * self.height as f32) as u32;
        let x = if ui >= self.width {
            ui % self.width
        } else {
            ui
        };
        let y = if vi >= self.height {
            vi % self.height
        } else {
            vi
        };
        self.read_texel(x, y)
    }
}

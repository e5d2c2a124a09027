use crate::color::Color;
use crate::math::{self, Mat4, Vec4};
use crate::mesh::{Mesh, Vertex};
use crate::texture::Texture;

mod buffers;

use crate::rasterizer::buffers::FrameTarget;

// Near and far planes baked into the projection used by draw_mesh.
const NEAR_PLANE: f32 = 0.01;
const FAR_PLANE: f32 = 100.0;

/// Applies the composite transform and maps the result to screen-normalized
/// coordinates: x and y in [0, 1] inside the frustum (but unclamped), z kept
/// for depth testing, u and v carried through untouched. A vertex on w = 0
/// has no meaningful screen position and yields None.
fn transform_vertex(vertex: &Vertex, matrix: &Mat4) -> Option<Vertex> {
    let clip: Vec4 = math::mul(matrix, &vertex.xyzw());
    let w = clip.w();
    if w == 0.0 {
        return None;
    }
    Some(Vertex {
        x: (clip.x() / w + 1.0) / 2.0,
        y: (clip.y() / w + 1.0) / 2.0,
        z: clip.z() / w,
        w: 1.0,
        u: vertex.u,
        v: vertex.v,
    })
}

/// Scanline rasterizer with a z-buffer. Owns nothing but the depth buffer;
/// the color buffer is borrowed from the host for the duration of each call
/// and both are laid out row-major from the top-left corner.
///
/// The hot path does not allocate. Everything off the viewport is clipped at
/// the span level, so arbitrary screen coordinates are safe, but there is no
/// near-plane clipping: keep the model in front of the camera.
pub struct Rasterizer {
    target: FrameTarget,
    clear_color: Color,
}

impl Rasterizer {
    pub fn new(width: usize, height: usize, clear_color: Color) -> Self {
        Rasterizer {
            target: FrameTarget::new(width, height),
            clear_color,
        }
    }

    /// Invalidates both buffers; call `clear` before the next draw.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.target.resize(width, height);
    }

    /// Takes effect on the next `clear`.
    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    pub fn clear(&mut self, pixels: &mut [u32]) {
        self.target.clear(pixels, self.clear_color.to_bgra());
    }

    /// Draws every triangle of `mesh` into `pixels`, depth-tested against the
    /// internal z-buffer. `rotation` and `translation` position the mesh in
    /// the world; the projection is rebuilt from the current viewport size
    /// and `fov_deg` every call.
    pub fn draw_mesh(
        &mut self,
        mesh: &Mesh,
        texture: &Texture,
        pixels: &mut [u32],
        rotation: &Mat4,
        translation: &Mat4,
        fov_deg: f32,
    ) {
        let mtx = self.transform_matrix(rotation, translation, fov_deg);

        for triangle in mesh.vertices().chunks_exact(3) {
            let transformed = (
                transform_vertex(&triangle[0], &mtx),
                transform_vertex(&triangle[1], &mtx),
                transform_vertex(&triangle[2], &mtx),
            );
            let (mut v1, mut v2, mut v3) = match transformed {
                (Some(v1), Some(v2), Some(v3)) => (v1, v2, v3),
                _ => continue,
            };

            if v3.y < v1.y {
                std::mem::swap(&mut v3, &mut v1);
            }
            if v2.y < v1.y {
                std::mem::swap(&mut v2, &mut v1);
            }
            if v3.y < v2.y {
                std::mem::swap(&mut v3, &mut v2);
            }

            self.draw_triangle(&v1, &v2, &v3, pixels, texture);
        }
    }

    fn transform_matrix(&self, rotation: &Mat4, translation: &Mat4, fov_deg: f32) -> Mat4 {
        let proj = math::projection(
            self.target.width(),
            self.target.height(),
            NEAR_PLANE,
            FAR_PLANE,
            fov_deg,
        );
        math::mul(&proj, &math::mul(translation, rotation))
    }

    /// Scanline fill of one screen-normalized triangle, split into an upper
    /// and a lower half at the middle vertex. Vertices must arrive sorted by
    /// y. The float x coordinates are kept for the edge slope math; only y is
    /// truncated to whole scanlines.
    fn draw_triangle(
        &mut self,
        v1: &Vertex,
        v2: &Vertex,
        v3: &Vertex,
        pixels: &mut [u32],
        texture: &Texture,
    ) {
        debug_assert!(v1.y <= v2.y && v2.y <= v3.y);

        let width = self.target.width() as f32;
        let height = self.target.height() as f32;

        // Shared denominator of the screen-space barycentrics. A zero area
        // would divide to infinities, so force the weights towards the third
        // vertex instead; such triangles generate no spans below.
        let mut denom = (v2.x * width - v1.x * width) * (v3.y * height - v1.y * height)
            - (v3.x * width - v1.x * width) * (v2.y * height - v1.y * height);
        if denom == 0.0 {
            denom = f32::MAX;
        }

        let x1 = v1.x * width;
        let y1 = (v1.y * height) as i64;
        let x2 = v2.x * width;
        let y2 = (v2.y * height) as i64;
        let x3 = v3.x * width;
        let y3 = (v3.y * height) as i64;

        let frame_height = self.target.height() as i64;
        if y1 >= frame_height || y3 < 0 {
            return;
        }

        let dy_ab = y2 - y1;
        let dy_bc = y3 - y2;
        let dy_ac = y3 - y1;

        if dy_ab > 0 {
            let dx_ab = (x2 - x1) / dy_ab as f32;
            let dx_ac = (x3 - x1) / dy_ac as f32;

            for i in 0..dy_ab {
                let y = y1 + i;
                if y < 0 {
                    continue;
                }
                if y >= frame_height {
                    break;
                }

                let x_start = (x1 + dx_ab * i as f32) as i64;
                let x_end = (x1 + dx_ac * i as f32) as i64;
                self.draw_span(v1, v2, v3, denom, x_start, x_end, y, pixels, texture);
            }
        }

        if dy_bc > 0 {
            // x on the long edge (v1 -> v3) at the height of the middle
            // vertex; the lower half runs between that edge and v2 -> v3.
            let mx = x1 + dy_ab as f32 * (x3 - x1) / dy_ac as f32;
            let dx_bc = (x3 - x2) / dy_bc as f32;
            let dx_ec = (x3 - mx) / dy_bc as f32;

            for i in 0..=dy_bc {
                let y = y2 + i;
                if y < 0 {
                    continue;
                }
                if y >= frame_height {
                    break;
                }

                let x_start = (x2 + dx_bc * i as f32) as i64;
                let x_end = (mx + dx_ec * i as f32) as i64;
                self.draw_span(v1, v2, v3, denom, x_start, x_end, y, pixels, texture);
            }
        }
    }

    /// Fills the span [x_start, x_end] on scanline `y`, both ends inclusive,
    /// clamped to the viewport.
    fn draw_span(
        &mut self,
        v1: &Vertex,
        v2: &Vertex,
        v3: &Vertex,
        denom: f32,
        mut x_start: i64,
        mut x_end: i64,
        y: i64,
        pixels: &mut [u32],
        texture: &Texture,
    ) {
        if x_end < x_start {
            std::mem::swap(&mut x_start, &mut x_end);
        }
        x_start = x_start.max(0);
        x_end = x_end.min(self.target.width() as i64 - 1);

        for x in x_start..=x_end {
            self.draw_pixel(x, y, v1, v2, v3, denom, pixels, texture);
        }
    }

    fn draw_pixel(
        &mut self,
        x: i64,
        y: i64,
        v1: &Vertex,
        v2: &Vertex,
        v3: &Vertex,
        denom: f32,
        pixels: &mut [u32],
        texture: &Texture,
    ) {
        let (a, b, c) = self.barycentric(x, y, v1, v2, v3, denom);

        let z = v1.z * a + v2.z * b + v3.z * c;
        if z >= self.target.depth_at(x, y) {
            return;
        }

        let u = v1.u * a + v2.u * b + v3.u * c;
        let v = v1.v * a + v2.v * b + v3.v * c;
        let color = texture.sample(u, v);
        self.target.put(pixels, x, y, color.to_bgra(), z);
    }

    /// Barycentric weights of pixel (x, y) in screen space. Depth and UVs
    /// interpolated with these are linear in screen space, not perspective
    /// correct: textures shear on triangles with large depth variation.
    fn barycentric(
        &self,
        x: i64,
        y: i64,
        v1: &Vertex,
        v2: &Vertex,
        v3: &Vertex,
        denom: f32,
    ) -> (f32, f32, f32) {
        let width = self.target.width() as f32;
        let height = self.target.height() as f32;
        let px = x as f32;
        let py = y as f32;

        let a = ((v2.x * width - px) * (v3.y * height - py)
            - (v3.x * width - px) * (v2.y * height - py))
            / denom;
        let b = ((v3.x * width - px) * (v1.y * height - py)
            - (v1.x * width - px) * (v3.y * height - py))
            / denom;
        let c = 1.0 - a - b;
        (a, b, c)
    }
}

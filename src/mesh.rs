use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::info;
use obj::raw::object::Polygon;
use obj::raw::parse_obj;

use crate::math::Vec4;
use crate::model::LoadError;

/// One corner of a triangle: a homogeneous position plus texture coordinates.
/// `w` is 1.0 for every loaded vertex and only becomes meaningful after
/// projection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
    pub u: f32,
    pub v: f32,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, u: f32, v: f32) -> Self {
        Vertex {
            x,
            y,
            z,
            w: 1.0,
            u,
            v,
        }
    }

    pub fn xyzw(&self) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, self.w)
    }
}

/// An immutable triangle list: every three consecutive vertices form one
/// triangle. Winding is preserved from the source data; there is no index
/// buffer.
pub struct Mesh {
    vertices: Vec<Vertex>,
}

impl Mesh {
    pub fn from_vertices(vertices: Vec<Vertex>) -> Self {
        assert!(
            !vertices.is_empty() && vertices.len() % 3 == 0,
            "mesh length must be a positive multiple of 3, got {}",
            vertices.len()
        );
        Mesh { vertices }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn from_obj_file(path: impl AsRef<Path>) -> Result<Mesh, LoadError> {
        let file = File::open(path.as_ref()).map_err(LoadError::Io)?;
        let mesh = Mesh::from_obj(BufReader::new(file))?;
        info!(
            "loaded {} triangles from {}",
            mesh.vertices.len() / 3,
            path.as_ref().display()
        );
        Ok(mesh)
    }

    /// Reads a triangulated OBJ with texture coordinates. The OBJ `v` axis
    /// grows upwards while the texture origin is the top-left corner, so `v`
    /// is flipped here, once, at load.
    pub fn from_obj(input: impl BufRead) -> Result<Mesh, LoadError> {
        let raw = parse_obj(input).map_err(|e| LoadError::MeshDecode(e.to_string()))?;

        let mut vertices = Vec::with_capacity(raw.polygons.len() * 3);
        for polygon in &raw.polygons {
            let corners: Vec<(usize, usize)> = match polygon {
                Polygon::PT(corners) => corners.iter().cloned().collect(),
                Polygon::PTN(corners) => corners.iter().map(|&(p, t, _)| (p, t)).collect(),
                _ => {
                    return Err(LoadError::MeshDecode(
                        "face without texture coordinates".to_string(),
                    ))
                }
            };
            if corners.len() != 3 {
                return Err(LoadError::MeshDecode(format!(
                    "face with {} corners; triangulate the model first",
                    corners.len()
                )));
            }
            for (p, t) in corners {
                let (x, y, z, _) = raw.positions[p];
                let (u, v, _) = raw.tex_coords[t];
                vertices.push(Vertex::new(x, y, z, u, 1.0 - v));
            }
        }

        if vertices.is_empty() {
            return Err(LoadError::MeshDecode("model has no faces".to_string()));
        }
        Ok(Mesh::from_vertices(vertices))
    }
}

/// An axis-aligned cube centered on the origin, two triangles per face, each
/// face covered by the full texture.
pub fn textured_cube(width: f32) -> Mesh {
    let w = width / 2.0;
    let mut vertices = Vec::with_capacity(36);

    let mut face = |a: [f32; 3], b: [f32; 3], c: [f32; 3], d: [f32; 3]| {
        vertices.push(Vertex::new(a[0], a[1], a[2], 0.0, 0.0));
        vertices.push(Vertex::new(b[0], b[1], b[2], 1.0, 0.0));
        vertices.push(Vertex::new(c[0], c[1], c[2], 1.0, 1.0));
        vertices.push(Vertex::new(a[0], a[1], a[2], 0.0, 0.0));
        vertices.push(Vertex::new(c[0], c[1], c[2], 1.0, 1.0));
        vertices.push(Vertex::new(d[0], d[1], d[2], 0.0, 1.0));
    };

    // Front
    face([-w, w, -w], [w, w, -w], [w, -w, -w], [-w, -w, -w]);
    // Back
    face([w, w, w], [-w, w, w], [-w, -w, w], [w, -w, w]);
    // Left
    face([-w, w, w], [-w, w, -w], [-w, -w, -w], [-w, -w, w]);
    // Right
    face([w, w, -w], [w, w, w], [w, -w, w], [w, -w, -w]);
    // Top
    face([-w, w, w], [w, w, w], [w, w, -w], [-w, w, -w]);
    // Bottom
    face([-w, -w, -w], [w, -w, -w], [w, -w, w], [-w, -w, w]);

    Mesh::from_vertices(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_is_a_triangle_list() {
        let mesh = textured_cube(2.0);
        assert_eq!(mesh.vertices().len(), 36);
        assert_eq!(mesh.vertices().len() % 3, 0);
        assert!(mesh.vertices().iter().all(|v| v.w == 1.0));
    }

    #[test]
    #[should_panic]
    fn rejects_partial_triangles() {
        Mesh::from_vertices(vec![
            Vertex::new(0.0, 0.0, 0.0, 0.0, 0.0),
            Vertex::new(1.0, 0.0, 0.0, 1.0, 0.0),
        ]);
    }

    #[test]
    fn obj_corners_carry_flipped_v() {
        let input = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.25
vt 1.0 0.5
vt 0.5 1.0
f 1/1 2/2 3/3
";
        let mesh = Mesh::from_obj(input.as_bytes()).unwrap();

        assert_eq!(mesh.vertices().len(), 3);
        let v = mesh.vertices();
        assert_eq!(v[0].v, 0.75);
        assert_eq!(v[1].v, 0.5);
        assert_eq!(v[2].v, 0.0);
        assert_eq!(v[1].x, 1.0);
        assert_eq!(v[2].y, 1.0);
    }

    #[test]
    fn obj_without_uvs_is_rejected() {
        let input = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
f 1 2 3
";
        assert!(Mesh::from_obj(input.as_bytes()).is_err());
    }
}

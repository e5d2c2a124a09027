use std::fmt;
use std::io;

use crate::color::Color;
use crate::mesh::{self, Mesh};
use crate::texture::Texture;

/// Errors surfaced by the asset loaders. The renderer core itself never
/// fails; whether a failed load is fatal is the host's call.
#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    MeshDecode(String),
    TextureDecode(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "io error: {}", e),
            LoadError::MeshDecode(msg) => write!(f, "mesh decode error: {}", msg),
            LoadError::TextureDecode(msg) => write!(f, "texture decode error: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// A mesh paired with the texture it samples.
pub struct Model {
    mesh: Mesh,
    texture: Texture,
}

impl Model {
    /// Loads `<prefix>.obj` and `<prefix>.png`.
    pub fn load(prefix: &str) -> Result<Model, LoadError> {
        let mesh = Mesh::from_obj_file(format!("{}.obj", prefix))?;
        let texture = Texture::from_png_file(format!("{}.png", prefix))?;
        Ok(Model { mesh, texture })
    }

    /// Fallback scene when no model is given on the command line.
    pub fn demo_cube() -> Model {
        Model {
            mesh: mesh::textured_cube(15.0),
            texture: Texture::checkerboard(
                8,
                8,
                Color::new(230, 230, 230, 255),
                Color::new(40, 40, 40, 255),
            ),
        }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }
}

//! A small fixed-size matrix algebra the renderer is built on. There is
//! deliberately no separate vector or point type: a vector is a single-column
//! matrix and goes through the same `mul` as everything else. See
//! `matrix::Matrix` for the multiplication convention that the transform
//! builders and every call site in the rasterizer rely on.
//!
//! The pipeline runs
//! model -> world (rotation, translation) -> clip (projection);
//! the perspective divide and viewport mapping happen in the rasterizer,
//! not here.

pub mod matrix;
pub mod transform;

pub use crate::math::matrix::*;
pub use crate::math::transform::*;

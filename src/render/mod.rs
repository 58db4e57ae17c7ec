//! Read-only projection of the simulation into triangles
//!
//! Produces a flat triangle list in screen coordinates. Whatever draws it
//! (GPU, canvas, test) only needs [`Vertex`] and [`as_bytes`].

pub mod shapes;
pub mod vertex;

pub use shapes::build_frame;
pub use vertex::{Vertex, as_bytes, colors};

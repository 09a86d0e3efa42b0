//! Wavefront OBJ input and output.

mod surface;
mod writer;

pub use surface::ObjSurface;
pub use writer::write_obj;

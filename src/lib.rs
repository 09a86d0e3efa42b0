pub mod config;
pub mod error;
pub mod geometry;
pub mod math;
pub mod obj;
pub mod tessellation;

pub use error::{ParasurfError, Result};
pub use geometry::{ParametricInterval, SurfaceKind};
pub use obj::ObjSurface;
pub use tessellation::{
    MeshBuffers, MeshIndex, MeshSource, ParametricSurface, VertexFlags, VertexLayout,
};

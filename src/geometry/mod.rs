pub mod interval;
pub mod surface;

pub use interval::ParametricInterval;
pub use surface::{
    Cone, KleinBottle, MobiusStrip, Quad, Sphere, SurfaceKind, TextureMapping, Torus, TrefoilKnot,
};

mod cone;
mod klein_bottle;
mod mobius_strip;
mod quad;
mod sphere;
mod torus;
mod trefoil_knot;

pub use cone::Cone;
pub use klein_bottle::KleinBottle;
pub use mobius_strip::MobiusStrip;
pub use quad::Quad;
pub use sphere::Sphere;
pub use torus::Torus;
pub use trefoil_knot::TrefoilKnot;

use crate::math::{Point2, Point3};

use super::ParametricInterval;

/// How texture coordinates are assigned to grid vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureMapping {
    /// `(texture_count.x * i / (m - 1), texture_count.y * j / (n - 1))`.
    Domain,
    /// `(0.5 * x, 0.5 * z)` of the evaluated position.
    ObjectSpace,
}

/// The closed set of built-in parametric surfaces.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceKind {
    Quad(Quad),
    Sphere(Sphere),
    Torus(Torus),
    Cone(Cone),
    TrefoilKnot(TrefoilKnot),
    KleinBottle(KleinBottle),
    MobiusStrip(MobiusStrip),
}

impl SurfaceKind {
    /// Maps a domain point to a point in 3D space.
    #[must_use]
    pub fn evaluate(&self, domain: &Point2) -> Point3 {
        match self {
            Self::Quad(s) => s.evaluate(domain),
            Self::Sphere(s) => s.evaluate(domain),
            Self::Torus(s) => s.evaluate(domain),
            Self::Cone(s) => s.evaluate(domain),
            Self::TrefoilKnot(s) => s.evaluate(domain),
            Self::KleinBottle(s) => s.evaluate(domain),
            Self::MobiusStrip(s) => s.evaluate(domain),
        }
    }

    /// Whether the estimated normal at `domain` must be negated.
    #[must_use]
    pub fn invert_normal(&self, domain: &Point2) -> bool {
        match self {
            Self::KleinBottle(s) => s.invert_normal(domain),
            _ => false,
        }
    }

    #[must_use]
    pub fn texture_mapping(&self) -> TextureMapping {
        match self {
            Self::Cone(_) => TextureMapping::ObjectSpace,
            _ => TextureMapping::Domain,
        }
    }

    /// The interval a freshly constructed surface of this kind uses.
    #[must_use]
    pub fn default_interval(&self) -> ParametricInterval {
        match self {
            Self::Quad(_) => Quad::default_interval(),
            Self::Sphere(_) => Sphere::default_interval(),
            Self::Torus(_) => Torus::default_interval(),
            Self::Cone(_) => Cone::default_interval(),
            Self::TrefoilKnot(_) => TrefoilKnot::default_interval(),
            Self::KleinBottle(_) => KleinBottle::default_interval(),
            Self::MobiusStrip(_) => MobiusStrip::default_interval(),
        }
    }

    /// Short lowercase name, used for logging and export file names.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Quad(_) => "quad",
            Self::Sphere(_) => "sphere",
            Self::Torus(_) => "torus",
            Self::Cone(_) => "cone",
            Self::TrefoilKnot(_) => "trefoil_knot",
            Self::KleinBottle(_) => "klein_bottle",
            Self::MobiusStrip(_) => "mobius_strip",
        }
    }
}

macro_rules! impl_from_surface {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<$ty> for SurfaceKind {
                fn from(surface: $ty) -> Self {
                    Self::$ty(surface)
                }
            }
        )*
    };
}

impl_from_surface!(Quad, Sphere, Torus, Cone, TrefoilKnot, KleinBottle, MobiusStrip);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn dispatch_matches_variant() {
        let sphere = Sphere::new(2.0).unwrap();
        let kind = SurfaceKind::from(sphere.clone());
        let d = Point2::new(0.4, 1.2);
        assert_relative_eq!(kind.evaluate(&d), sphere.evaluate(&d));
        assert_eq!(kind.name(), "sphere");
        assert_eq!(kind.default_interval(), Sphere::default_interval());
    }

    #[test]
    fn only_klein_bottle_inverts_normals() {
        let d = Point2::new(1.0, 6.0);
        let klein = SurfaceKind::from(KleinBottle::new(1.0).unwrap());
        let torus = SurfaceKind::from(Torus::new(1.0, 0.5).unwrap());
        assert!(klein.invert_normal(&d));
        assert!(!torus.invert_normal(&d));
    }

    #[test]
    fn only_cone_uses_object_space_texturing() {
        let cone = SurfaceKind::from(Cone::new(1.0, 1.0).unwrap());
        let quad = SurfaceKind::from(Quad::new(1.0, 1.0).unwrap());
        assert_eq!(cone.texture_mapping(), TextureMapping::ObjectSpace);
        assert_eq!(quad.texture_mapping(), TextureMapping::Domain);
    }
}

/// 2D point type, used for `(u, v)` domain points and fractional grid coordinates.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Returns `true` if `value` is finite and strictly greater than [`TOLERANCE`].
#[must_use]
pub fn is_positive(value: f64) -> bool {
    value.is_finite() && value > TOLERANCE
}

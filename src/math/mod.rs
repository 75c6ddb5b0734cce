/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Unit quaternion used for particle orientations.
pub type UnitQuaternion = nalgebra::UnitQuaternion<f64>;

/// Default relative tolerance for overlap decisions.
///
/// Scaled by the characteristic size of the shape pair before use, so the
/// same value works across simulations with different particle sizes.
pub const TOLERANCE: f64 = 1e-10;

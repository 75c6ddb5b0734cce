mod closest_point;
mod gjk;

pub use closest_point::{ClosestPointOnHull, ClosestPointResult};

use serde::Deserialize;

use crate::error::{Result, ShapeError};
use crate::math::{UnitQuaternion, Vector3, TOLERANCE};
use crate::shape::{SupportMap, Transformed};

use gjk::{gjk, GjkStatus};

/// Numerical settings for overlap and projection queries.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlapConfig {
    /// Relative tolerance. The absolute contact slack of a pair is this value
    /// times the sum of the two circumsphere diameters.
    pub tolerance: f64,
    /// Iteration cap for the GJK loop.
    pub max_iterations: u32,
}

impl Default for OverlapConfig {
    fn default() -> Self {
        Self {
            tolerance: TOLERANCE,
            max_iterations: 128,
        }
    }
}

impl OverlapConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::InvalidParameter`] if the tolerance is negative or
    /// non-finite, or if `max_iterations` is zero.
    pub fn new(tolerance: f64, max_iterations: u32) -> Result<Self> {
        let config = Self {
            tolerance,
            max_iterations,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks a configuration obtained by deserialization.
    ///
    /// # Errors
    ///
    /// Same conditions as [`OverlapConfig::new`].
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ShapeError::InvalidParameter {
                parameter: "tolerance",
                value: self.tolerance,
            }
            .into());
        }
        if self.max_iterations == 0 {
            return Err(ShapeError::InvalidParameter {
                parameter: "max_iterations",
                value: 0.0,
            }
            .into());
        }
        Ok(())
    }

    /// Absolute slack for a pair of shapes.
    fn slack<A, B>(&self, a: &A, b: &B) -> f64
    where
        A: SupportMap + ?Sized,
        B: SupportMap + ?Sized,
    {
        self.tolerance * (a.circumsphere_diameter() + b.circumsphere_diameter())
    }
}

/// Tests whether shape `b`, placed at `r_ab` with orientation `q_ab` in the
/// frame of shape `a`, overlaps `a`.
///
/// Both shapes are inflated by their sweep radii. Contacts within the
/// configured slack count as overlap, so exact tangency resolves to `true`.
/// The routine returns on the first direction that proves a larger gap and
/// does not allocate.
pub fn test_overlap<A, B>(
    a: &A,
    b: &B,
    r_ab: &Vector3,
    q_ab: &UnitQuaternion,
    config: &OverlapConfig,
) -> bool
where
    A: SupportMap + ?Sized,
    B: SupportMap + ?Sized,
{
    let eps = config.slack(a, b);
    let margin = a.sweep_radius() + b.sweep_radius() + eps;

    // Circumsphere pre-check.
    let reach = 0.5 * (a.circumsphere_diameter() + b.circumsphere_diameter()) + eps;
    if r_ab.norm_squared() > reach * reach {
        return false;
    }

    let placed = Transformed::new(b, *r_ab, *q_ab);
    match gjk(a, &placed, eps, Some(margin), config) {
        GjkStatus::Separated => false,
        GjkStatus::Overlap | GjkStatus::Closest(_) => true,
    }
}

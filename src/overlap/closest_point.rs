use crate::math::{Point3, Vector3};
use crate::shape::SupportMap;

use super::gjk::{gjk, GjkStatus};
use super::OverlapConfig;

/// Result of a closest point query.
#[derive(Debug, Clone, Copy)]
pub struct ClosestPointResult {
    /// The closest point on the hull.
    pub point: Point3,
    /// The distance from the query point to the closest point.
    pub distance: f64,
}

/// Projects a point onto the convex hull of a shape.
///
/// The hull is taken without its sweep radius. Points inside the hull
/// project onto themselves.
pub struct ClosestPointOnHull {
    point: Point3,
}

impl ClosestPointOnHull {
    /// Creates a new `ClosestPointOnHull` query.
    #[must_use]
    pub fn new(point: Point3) -> Self {
        Self { point }
    }

    /// Executes the query against `shape`, given in its own frame.
    #[must_use]
    pub fn execute<S>(&self, shape: &S, config: &OverlapConfig) -> ClosestPointResult
    where
        S: SupportMap + ?Sized,
    {
        let eps = config.slack(shape, &self.point);
        let offset = match gjk(shape, &self.point, eps, None, config) {
            GjkStatus::Closest(v) => v,
            GjkStatus::Overlap | GjkStatus::Separated => Vector3::zeros(),
        };
        ClosestPointResult {
            point: self.point + offset,
            distance: offset.norm(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::shape::{PolyhedronVerts, ShapeSubmission};

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn cube() -> PolyhedronVerts {
        let mut list = Vec::new();
        for z in [-0.5, 0.5] {
            for y in [-0.5, 0.5] {
                for x in [-0.5, 0.5] {
                    list.push([x, y, z]);
                }
            }
        }
        PolyhedronVerts::new(&ShapeSubmission::new(&list)).unwrap()
    }

    #[test]
    fn projection_onto_cube() {
        let c = cube();
        let cfg = OverlapConfig::default();
        for (query, expected) in [
            (p(0.0, 0.0, 0.0), p(0.0, 0.0, 0.0)),
            (p(1.0, 0.0, 0.0), p(0.5, 0.0, 0.0)),
            (p(0.0, 2.0, 0.0), p(0.0, 0.5, 0.0)),
            (p(0.0, 0.0, 3.0), p(0.0, 0.0, 0.5)),
            (p(1.0, 0.25, 0.25), p(0.5, 0.25, 0.25)),
            (p(1.0, 1.0, 1.0), p(0.5, 0.5, 0.5)),
        ] {
            let res = ClosestPointOnHull::new(query).execute(&c, &cfg);
            assert_relative_eq!(res.point, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn distance_to_corner() {
        let res = ClosestPointOnHull::new(p(1.0, 1.0, 1.0)).execute(&cube(), &OverlapConfig::default());
        assert_relative_eq!(res.distance, 0.75_f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn projection_onto_segment() {
        let seg = PolyhedronVerts::new(&ShapeSubmission::new(&[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0]]))
            .unwrap();
        let res = ClosestPointOnHull::new(p(1.0, 3.0, 0.0)).execute(&seg, &OverlapConfig::default());
        assert_relative_eq!(res.point, p(1.0, 0.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(res.distance, 3.0, epsilon = 1e-9);
    }
}

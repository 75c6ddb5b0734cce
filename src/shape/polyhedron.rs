use crate::error::{Result, ShapeError};
use crate::math::{Point3, Vector3};

use super::{ShapeParams, ShapeSubmission, SupportMap};

/// Vertex store for one convex polyhedron type.
///
/// Holds exactly the vertex sequence it was built from: no reordering,
/// deduplication or hull reduction. The convex hull is implied by the
/// vertices and is never stored. Instances are immutable; replacing a type's
/// shape means building a new `PolyhedronVerts`.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyhedronVerts {
    vertices: Box<[Point3]>,
    ignore_statistics: bool,
    sweep_radius: f64,
    diameter: f64,
}

impl PolyhedronVerts {
    /// Validates a submission and builds the vertex store.
    ///
    /// Checks run in order: at least one vertex, every vertex a finite
    /// 3-tuple, then a non-negative finite sweep radius. Degenerate but
    /// well-formed input (duplicate, collinear or coplanar points) is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::NoVertices`] for an empty vertex list,
    /// [`ShapeError::InvalidVertex`] for a wrong arity or non-finite
    /// component, and [`ShapeError::InvalidParameter`] for a negative or
    /// non-finite sweep radius.
    pub fn new(submission: &ShapeSubmission) -> Result<Self> {
        if submission.vertices.is_empty() {
            return Err(ShapeError::NoVertices.into());
        }

        let vertices = submission
            .vertices
            .iter()
            .enumerate()
            .map(|(index, v)| parse_vertex(index, v))
            .collect::<std::result::Result<Box<[Point3]>, ShapeError>>()?;

        let ignore_statistics = submission
            .ignore_statistics
            .is_some_and(super::Flag::as_bool);

        let sweep_radius = submission.sweep_radius.unwrap_or(0.0);
        if !sweep_radius.is_finite() || sweep_radius < 0.0 {
            return Err(ShapeError::InvalidParameter {
                parameter: "sweep_radius",
                value: sweep_radius,
            }
            .into());
        }

        Ok(Self::from_parts(vertices, ignore_statistics, sweep_radius))
    }

    fn from_parts(vertices: Box<[Point3]>, ignore_statistics: bool, sweep_radius: f64) -> Self {
        let max_norm = vertices
            .iter()
            .map(|p| p.coords.norm())
            .fold(0.0_f64, f64::max);
        Self {
            vertices,
            ignore_statistics,
            sweep_radius,
            diameter: 2.0 * (max_norm + sweep_radius),
        }
    }

    /// Returns the stored vertices in submission order.
    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Returns the number of stored vertices, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always `false`: a validated store holds at least one vertex.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns whether the integrator should skip statistics for this type.
    #[must_use]
    pub fn ignore_statistics(&self) -> bool {
        self.ignore_statistics
    }

    /// Polyhedra are anisotropic, so orientation always matters.
    #[must_use]
    pub fn has_orientation(&self) -> bool {
        true
    }

    /// Returns the read-back view of this shape.
    #[must_use]
    pub fn to_params(&self) -> ShapeParams {
        ShapeParams {
            vertices: self.vertices.iter().map(|p| [p.x, p.y, p.z]).collect(),
            ignore_statistics: self.ignore_statistics,
            sweep_radius: (self.sweep_radius > 0.0).then_some(self.sweep_radius),
        }
    }
}

impl TryFrom<&ShapeSubmission> for PolyhedronVerts {
    type Error = crate::error::HpmcError;

    fn try_from(submission: &ShapeSubmission) -> Result<Self> {
        Self::new(submission)
    }
}

impl TryFrom<ShapeParams> for PolyhedronVerts {
    type Error = crate::error::HpmcError;

    fn try_from(params: ShapeParams) -> Result<Self> {
        Self::new(&params.into())
    }
}

fn parse_vertex(index: usize, raw: &[f64]) -> std::result::Result<Point3, ShapeError> {
    let &[x, y, z] = raw else {
        return Err(ShapeError::InvalidVertex {
            index,
            reason: format!("expected 3 components, got {}", raw.len()),
        });
    };
    if !(x.is_finite() && y.is_finite() && z.is_finite()) {
        return Err(ShapeError::InvalidVertex {
            index,
            reason: format!("non-finite component in ({x}, {y}, {z})"),
        });
    }
    Ok(Point3::new(x, y, z))
}

impl SupportMap for PolyhedronVerts {
    /// Returns the vertex farthest along `direction`. Ties go to the vertex
    /// that comes first in stored order.
    fn support(&self, direction: &Vector3) -> Point3 {
        let mut best = self.vertices[0];
        let mut best_dot = best.coords.dot(direction);
        for p in &self.vertices[1..] {
            let d = p.coords.dot(direction);
            if d > best_dot {
                best_dot = d;
                best = *p;
            }
        }
        best
    }

    fn sweep_radius(&self) -> f64 {
        self.sweep_radius
    }

    fn circumsphere_diameter(&self) -> f64 {
        self.diameter
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::HpmcError;

    fn verts(list: &[[f64; 3]]) -> PolyhedronVerts {
        PolyhedronVerts::new(&ShapeSubmission::new(list)).unwrap()
    }

    #[test]
    fn round_trip_preserves_duplicates_and_order() {
        let list = [
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 1.0],
            [1.0, 0.0, 1.0],
            [0.0, 1.0, 1.0],
            [1.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, 1.0],
        ];
        let shape = verts(&list);
        let params = shape.to_params();
        assert_eq!(params.vertices, list.to_vec());
        assert!(!params.ignore_statistics);
        assert_eq!(params.sweep_radius, None);
        assert_eq!(PolyhedronVerts::try_from(params).unwrap(), shape);
    }

    #[test]
    fn round_trip_is_bit_exact() {
        let list = [[0.1, 1.0 / 3.0, -2.0e-300], [f64::MAX, -0.0, 7.25]];
        let params = verts(&list).to_params();
        for (a, b) in params.vertices.iter().zip(&list) {
            for k in 0..3 {
                assert_eq!(a[k].to_bits(), b[k].to_bits());
            }
        }
    }

    #[test]
    fn single_point_is_accepted() {
        let shape = verts(&[[1.0, 2.0, 3.0]]);
        assert_eq!(shape.len(), 1);
        assert!(!shape.is_empty());
    }

    #[test]
    fn empty_vertex_list_is_rejected() {
        let err = PolyhedronVerts::new(&ShapeSubmission::default()).unwrap_err();
        assert!(matches!(err, HpmcError::Shape(ShapeError::NoVertices)));
    }

    #[test]
    fn wrong_arity_is_rejected() {
        let sub = ShapeSubmission {
            vertices: vec![vec![0.0, 0.0, 0.0], vec![1.0, 2.0]],
            ..ShapeSubmission::default()
        };
        let err = PolyhedronVerts::new(&sub).unwrap_err();
        assert!(matches!(
            err,
            HpmcError::Shape(ShapeError::InvalidVertex { index: 1, .. })
        ));
    }

    #[test]
    fn non_finite_component_is_rejected() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let sub = ShapeSubmission::new(&[[0.0, 0.0, 0.0], [1.0, bad, 0.0]]);
            let err = PolyhedronVerts::new(&sub).unwrap_err();
            assert!(matches!(
                err,
                HpmcError::Shape(ShapeError::InvalidVertex { index: 1, .. })
            ));
        }
    }

    #[test]
    fn negative_sweep_radius_is_rejected() {
        let sub = ShapeSubmission::new(&[[0.0, 0.0, 0.0]]).with_sweep_radius(-0.1);
        let err = PolyhedronVerts::new(&sub).unwrap_err();
        assert!(matches!(
            err,
            HpmcError::Shape(ShapeError::InvalidParameter {
                parameter: "sweep_radius",
                ..
            })
        ));
    }

    #[test]
    fn sweep_radius_is_read_back_when_set() {
        let sub = ShapeSubmission::new(&[[0.0, 0.0, 0.0]]).with_sweep_radius(0.25);
        let shape = PolyhedronVerts::new(&sub).unwrap();
        assert_eq!(shape.to_params().sweep_radius, Some(0.25));
    }

    #[test]
    fn circumsphere_diameter_uses_farthest_vertex() {
        let shape = verts(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.25, 0.0],
            [0.0, 0.0, 1.1],
        ]);
        assert_relative_eq!(shape.circumsphere_diameter(), 2.5);
        assert!(shape.has_orientation());
    }

    #[test]
    fn support_of_tetrahedron() {
        let shape = verts(&[
            [-0.5, -0.5, -0.5],
            [-0.5, 0.5, 0.5],
            [0.5, -0.5, 0.5],
            [0.5, 0.5, -0.5],
        ]);
        let cases = [
            (Vector3::new(-0.5, -0.5, -0.5), Point3::new(-0.5, -0.5, -0.5)),
            (Vector3::new(-0.1, 0.1, 0.1), Point3::new(-0.5, 0.5, 0.5)),
            (Vector3::new(1.0, -1.0, 1.0), Point3::new(0.5, -0.5, 0.5)),
            (Vector3::new(0.51, 0.49, -0.1), Point3::new(0.5, 0.5, -0.5)),
        ];
        for (dir, expected) in cases {
            assert_eq!(shape.support(&dir), expected);
        }
    }
}

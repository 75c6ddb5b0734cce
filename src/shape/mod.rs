mod params;
mod polyhedron;

pub use params::{Flag, ShapeParams, ShapeSubmission};
pub use polyhedron::PolyhedronVerts;

use crate::math::{Point3, UnitQuaternion, Vector3};

/// Capability interface for convex shapes used by the overlap routine.
///
/// Any convex body that can report its farthest point along a direction can
/// take part in overlap and projection queries.
pub trait SupportMap {
    /// Returns the point of the shape farthest along `direction`,
    /// excluding the sweep radius.
    fn support(&self, direction: &Vector3) -> Point3;

    /// Returns the rounding radius added uniformly to the shape's surface.
    fn sweep_radius(&self) -> f64 {
        0.0
    }

    /// Returns the diameter of a sphere about the local origin that
    /// encloses the shape, sweep radius included.
    fn circumsphere_diameter(&self) -> f64;
}

impl<S: SupportMap + ?Sized> SupportMap for &S {
    fn support(&self, direction: &Vector3) -> Point3 {
        (**self).support(direction)
    }

    fn sweep_radius(&self) -> f64 {
        (**self).sweep_radius()
    }

    fn circumsphere_diameter(&self) -> f64 {
        (**self).circumsphere_diameter()
    }
}

impl SupportMap for Point3 {
    fn support(&self, _direction: &Vector3) -> Point3 {
        *self
    }

    fn circumsphere_diameter(&self) -> f64 {
        2.0 * self.coords.norm()
    }
}

/// A shape placed with a rigid transform, evaluated lazily.
///
/// `support` rotates the query direction into the shape frame and maps the
/// result back, so no transformed vertex list is ever built.
#[derive(Debug, Clone, Copy)]
pub struct Transformed<'a, S: ?Sized> {
    shape: &'a S,
    position: Vector3,
    orientation: UnitQuaternion,
}

impl<'a, S: SupportMap + ?Sized> Transformed<'a, S> {
    /// Places `shape` at `position` with `orientation`.
    #[must_use]
    pub fn new(shape: &'a S, position: Vector3, orientation: UnitQuaternion) -> Self {
        Self {
            shape,
            position,
            orientation,
        }
    }

    /// Returns the placement position.
    #[must_use]
    pub fn position(&self) -> &Vector3 {
        &self.position
    }
}

impl<S: SupportMap + ?Sized> SupportMap for Transformed<'_, S> {
    fn support(&self, direction: &Vector3) -> Point3 {
        let local = self.orientation.inverse_transform_vector(direction);
        let p = self.shape.support(&local);
        Point3::from(self.orientation.transform_vector(&p.coords) + self.position)
    }

    fn sweep_radius(&self) -> f64 {
        self.shape.sweep_radius()
    }

    /// Diameter about the shape's own center; the placement does not change it.
    fn circumsphere_diameter(&self) -> f64 {
        self.shape.circumsphere_diameter()
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Computes the bounding box of a shape from its support function,
    /// inflated by the sweep radius.
    #[must_use]
    pub fn of<S: SupportMap + ?Sized>(shape: &S) -> Self {
        let r = shape.sweep_radius();
        let mut min = Point3::origin();
        let mut max = Point3::origin();
        for axis in 0..3 {
            let mut dir = Vector3::zeros();
            dir[axis] = 1.0;
            max[axis] = shape.support(&dir)[axis] + r;
            min[axis] = shape.support(&-dir)[axis] - r;
        }
        Self { min, max }
    }

    /// Returns whether two boxes intersect, touching faces included.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        (0..3).all(|k| self.min[k] <= other.max[k] && other.min[k] <= self.max[k])
    }
}

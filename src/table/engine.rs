use std::sync::Arc;

use crate::error::{Result, TableError};
use crate::math::{UnitQuaternion, Vector3};
use crate::overlap::{test_overlap, OverlapConfig};
use crate::shape::PolyhedronVerts;

use super::RuntimeMirror;

/// Per-move overlap queries against an attached [`ShapeTable`](super::ShapeTable).
///
/// Cheap to clone; each worker thread can hold its own handle. A query keeps
/// the read locks of both types for its whole duration, so a concurrent
/// `set` on either type waits for it and never exposes a half-updated shape.
#[derive(Debug, Clone)]
pub struct OverlapEngine {
    mirror: Arc<RuntimeMirror>,
    config: OverlapConfig,
}

impl OverlapEngine {
    pub(crate) fn new(mirror: Arc<RuntimeMirror>, config: OverlapConfig) -> Self {
        Self { mirror, config }
    }

    /// Returns the configuration this engine evaluates with.
    #[must_use]
    pub fn config(&self) -> &OverlapConfig {
        &self.config
    }

    /// Returns the number of attached types.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.mirror.len()
    }

    /// Returns the index of `type_name` in the attach order.
    #[must_use]
    pub fn type_index(&self, type_name: &str) -> Option<usize> {
        self.mirror.index_of(type_name)
    }

    /// Returns the current shape for type `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::NotAttached`] after detach, or
    /// [`TableError::TypeIndexOutOfRange`] for an unknown index.
    pub fn shape(&self, index: usize) -> Result<Arc<PolyhedronVerts>> {
        self.check(index)?;
        Ok(Arc::clone(&self.mirror.read(index)))
    }

    /// Tests whether a particle of type `type_b`, at `r_ab` with orientation
    /// `q_ab` relative to a particle of type `type_a`, overlaps it.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::NotAttached`] after detach, or
    /// [`TableError::TypeIndexOutOfRange`] for an unknown index.
    pub fn overlap(
        &self,
        type_a: usize,
        type_b: usize,
        r_ab: &Vector3,
        q_ab: &UnitQuaternion,
    ) -> Result<bool> {
        self.check(type_a)?;
        self.check(type_b)?;

        // Lock in index order.
        let (lo, hi) = (type_a.min(type_b), type_a.max(type_b));
        let first = self.mirror.read(lo);
        if lo == hi {
            return Ok(test_overlap(&**first, &**first, r_ab, q_ab, &self.config));
        }
        let second = self.mirror.read(hi);
        let (a, b) = if type_a == lo {
            (&**first, &**second)
        } else {
            (&**second, &**first)
        };
        Ok(test_overlap(a, b, r_ab, q_ab, &self.config))
    }

    /// Like [`OverlapEngine::overlap`], but takes both particles' absolute
    /// orientations and the separation `r_ab = pos_b - pos_a` in the box frame.
    ///
    /// # Errors
    ///
    /// Same conditions as [`OverlapEngine::overlap`].
    pub fn overlap_oriented(
        &self,
        type_a: usize,
        q_a: &UnitQuaternion,
        type_b: usize,
        r_ab: &Vector3,
        q_b: &UnitQuaternion,
    ) -> Result<bool> {
        let q_ab = q_a.inverse() * q_b;
        let r_local = q_a.inverse_transform_vector(r_ab);
        self.overlap(type_a, type_b, &r_local, &q_ab)
    }

    fn check(&self, index: usize) -> Result<()> {
        if !self.mirror.is_live() {
            return Err(TableError::NotAttached.into());
        }
        if index >= self.mirror.len() {
            return Err(TableError::TypeIndexOutOfRange {
                index,
                count: self.mirror.len(),
            }
            .into());
        }
        Ok(())
    }
}

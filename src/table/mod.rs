mod engine;

pub use engine::OverlapEngine;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, info};

use crate::error::{Result, TableError};
use crate::overlap::OverlapConfig;
use crate::shape::{PolyhedronVerts, ShapeParams, ShapeSubmission};

/// Per-type shape parameters for one integrator.
///
/// The table starts out editable. [`ShapeTable::attach`] copies the current
/// contents into a runtime mirror that [`OverlapEngine`] handles read from
/// concurrently. While attached, [`ShapeTable::set`] swaps the new shape into
/// both the table and the mirror before returning, and [`ShapeTable::get`]
/// reads through the mirror.
#[derive(Debug, Default)]
pub struct ShapeTable {
    shapes: IndexMap<String, Arc<PolyhedronVerts>>,
    config: OverlapConfig,
    state: TableState,
}

#[derive(Debug, Default)]
enum TableState {
    #[default]
    Editable,
    Attached(Arc<RuntimeMirror>),
}

impl ShapeTable {
    /// Creates an empty table with the default overlap configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table whose engines use `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn with_config(config: OverlapConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            shapes: IndexMap::new(),
            config,
            state: TableState::Editable,
        })
    }

    /// Returns the overlap configuration handed to engines.
    #[must_use]
    pub fn config(&self) -> &OverlapConfig {
        &self.config
    }

    /// Returns whether a runtime mirror is live.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        matches!(self.state, TableState::Attached(_))
    }

    /// Returns the number of types with a shape.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns whether no type has a shape yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Iterates over type names in first-insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.shapes.keys().map(String::as_str)
    }

    /// Validates `submission` and stores it as the shape for `type_name`.
    ///
    /// Nothing changes if validation fails. While attached, the mirror slot is
    /// swapped under its write lock, so in-flight overlap queries on that type
    /// finish first and later queries see the new shape.
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeError`](crate::error::ShapeError) for invalid input,
    /// or [`TableError::UnknownType`] when attached and `type_name` is not
    /// one of the attached types.
    pub fn set(&mut self, type_name: &str, submission: &ShapeSubmission) -> Result<()> {
        let shape = Arc::new(PolyhedronVerts::new(submission)?);

        let mirrored = match &self.state {
            TableState::Editable => false,
            TableState::Attached(mirror) => {
                let index = mirror
                    .index_of(type_name)
                    .ok_or_else(|| TableError::UnknownType(type_name.into()))?;
                mirror.replace(index, Arc::clone(&shape));
                true
            }
        };

        debug!(
            type_name,
            vertices = shape.len(),
            ignore_statistics = shape.ignore_statistics(),
            mirrored,
            "shape parameters set"
        );
        self.shapes.insert(type_name.to_owned(), shape);
        Ok(())
    }

    /// Returns the read-back view of the shape for `type_name`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownType`] if no shape is set for the type.
    pub fn get(&self, type_name: &str) -> Result<ShapeParams> {
        Ok(self.shape(type_name)?.to_params())
    }

    /// Returns the stored shape for `type_name`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownType`] if no shape is set for the type.
    pub fn shape(&self, type_name: &str) -> Result<Arc<PolyhedronVerts>> {
        let unknown = || TableError::UnknownType(type_name.into());
        let shape = match &self.state {
            TableState::Editable => self.shapes.get(type_name).cloned().ok_or_else(unknown)?,
            TableState::Attached(mirror) => {
                let index = mirror.index_of(type_name).ok_or_else(unknown)?;
                Arc::clone(&mirror.read(index))
            }
        };
        Ok(shape)
    }

    /// Builds the runtime mirror for the simulation's type list and returns
    /// an engine over it. Type indices follow the order of `type_names`.
    ///
    /// Attaching an already attached table rebuilds the mirror and
    /// invalidates engines handed out earlier.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownType`] if a listed type has no shape, or
    /// [`TableError::TypeCountMismatch`] if the list repeats a name or the
    /// table holds types the list does not name.
    pub fn attach<S: AsRef<str>>(&mut self, type_names: &[S]) -> Result<OverlapEngine> {
        let names: IndexSet<String> = type_names.iter().map(|s| s.as_ref().to_owned()).collect();

        if let Some(missing) = names.iter().find(|n| !self.shapes.contains_key(n.as_str())) {
            return Err(TableError::UnknownType(missing.clone()).into());
        }
        if names.len() != type_names.len() || self.shapes.len() != names.len() {
            return Err(TableError::TypeCountMismatch {
                expected: type_names.len(),
                found: self.shapes.len(),
            }
            .into());
        }

        let slots = names
            .iter()
            .filter_map(|n| self.shapes.get(n.as_str()))
            .map(|shape| RwLock::new(Arc::clone(shape)))
            .collect();

        self.detach();
        let mirror = Arc::new(RuntimeMirror {
            names,
            slots,
            live: AtomicBool::new(true),
        });
        info!(types = mirror.len(), "shape table attached");
        self.state = TableState::Attached(Arc::clone(&mirror));
        Ok(OverlapEngine::new(mirror, self.config))
    }

    /// Returns a new engine over the live mirror.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::NotAttached`] before [`ShapeTable::attach`].
    pub fn engine(&self) -> Result<OverlapEngine> {
        match &self.state {
            TableState::Attached(mirror) => Ok(OverlapEngine::new(Arc::clone(mirror), self.config)),
            TableState::Editable => Err(TableError::NotAttached.into()),
        }
    }

    /// Discards the runtime mirror. Engines over it start failing with
    /// [`TableError::NotAttached`]. Does nothing when not attached.
    pub fn detach(&mut self) {
        if let TableState::Attached(mirror) = std::mem::take(&mut self.state) {
            mirror.live.store(false, Ordering::Release);
            info!(types = mirror.len(), "shape table detached");
        }
    }
}

impl Drop for ShapeTable {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Runtime copy of the table, indexed by type id.
///
/// Each slot holds an `Arc` behind its own lock so a replacement is a single
/// pointer swap: readers see either the old shape or the new one.
#[derive(Debug)]
pub(crate) struct RuntimeMirror {
    names: IndexSet<String>,
    slots: Box<[RwLock<Arc<PolyhedronVerts>>]>,
    live: AtomicBool,
}

impl RuntimeMirror {
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn index_of(&self, type_name: &str) -> Option<usize> {
        self.names.get_index_of(type_name)
    }

    pub(crate) fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Locks slot `index` for reading. A slot only ever holds a complete
    /// `Arc`, so a poisoned lock is still safe to read.
    pub(crate) fn read(&self, index: usize) -> RwLockReadGuard<'_, Arc<PolyhedronVerts>> {
        self.slots[index]
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn replace(&self, index: usize, shape: Arc<PolyhedronVerts>) {
        let mut slot = self.slots[index]
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = shape;
    }
}

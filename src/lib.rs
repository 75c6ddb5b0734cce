//! Convex polyhedron shapes for hard-particle Monte Carlo.
//!
//! [`shape`] holds the validated per-type vertex store, [`table`] keeps the
//! editable parameter table in sync with the runtime mirror used during a run,
//! and [`overlap`] decides whether two oriented shapes intersect.

pub mod error;
pub mod math;
pub mod overlap;
pub mod shape;
pub mod table;

pub use error::{HpmcError, Result};
pub use overlap::{test_overlap, OverlapConfig};
pub use shape::{PolyhedronVerts, ShapeParams, ShapeSubmission, SupportMap};
pub use table::{OverlapEngine, ShapeTable};

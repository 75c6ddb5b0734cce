use serde::{Deserialize, Serialize};

/// Raw shape submission, as received from the caller.
///
/// Vertex arity is not enforced by the type so that malformed tuples reach the
/// validator and are reported as [`ShapeError::InvalidVertex`](crate::error::ShapeError::InvalidVertex)
/// rather than as a deserialization failure.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShapeSubmission {
    /// Vertex coordinates in the particle frame.
    pub vertices: Vec<Vec<f64>>,
    /// Exclude this type from integrator statistics. Absent means `false`.
    #[serde(default)]
    pub ignore_statistics: Option<Flag>,
    /// Rounding radius. Absent means `0`.
    #[serde(default)]
    pub sweep_radius: Option<f64>,
}

impl ShapeSubmission {
    /// Creates a submission from a vertex list with every flag left at its default.
    #[must_use]
    pub fn new(vertices: &[[f64; 3]]) -> Self {
        Self {
            vertices: vertices.iter().map(|v| v.to_vec()).collect(),
            ignore_statistics: None,
            sweep_radius: None,
        }
    }

    /// Sets the `ignore_statistics` flag.
    #[must_use]
    pub fn with_ignore_statistics(mut self, ignore: bool) -> Self {
        self.ignore_statistics = Some(Flag::Bool(ignore));
        self
    }

    /// Sets the sweep radius.
    #[must_use]
    pub fn with_sweep_radius(mut self, radius: f64) -> Self {
        self.sweep_radius = Some(radius);
        self
    }
}

/// A boolean flag that also accepts integers (non-zero is `true`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Int(i64),
}

impl Flag {
    /// Coerces the flag to a boolean.
    #[must_use]
    pub fn as_bool(self) -> bool {
        match self {
            Flag::Bool(b) => b,
            Flag::Int(i) => i != 0,
        }
    }
}

/// Read-back view of a stored shape.
///
/// `sweep_radius` is only emitted when it differs from the default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShapeParams {
    pub vertices: Vec<[f64; 3]>,
    pub ignore_statistics: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweep_radius: Option<f64>,
}

impl From<ShapeParams> for ShapeSubmission {
    fn from(params: ShapeParams) -> Self {
        Self {
            vertices: params.vertices.iter().map(|v| v.to_vec()).collect(),
            ignore_statistics: Some(Flag::Bool(params.ignore_statistics)),
            sweep_radius: params.sweep_radius,
        }
    }
}

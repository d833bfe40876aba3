//! Linestring Simplifier Library - Budget-Constrained GeoJSON LineString Simplification
//!
//! This library reduces the coordinate count of a geographic polyline to fit within a
//! caller-supplied budget while keeping its corners and curved sections, which plain
//! distance-based simplification tends to erase.
//!
//! # Architecture
//!
//! - **[`utils`]**: Great-circle distance, bearing and bearing-delta primitives
//! - **[`Polyline`]**: Validated LineString built from a loose GeoJSON [`Geometry`]
//! - **[`TurnProfile`]** / [`DetectedFeatures`]: Corner and curve-run detection
//! - **[`CriticalPointSet`]**: Endpoints, corners and curve representatives, pruned to budget
//! - **[`fill_to_budget`]**: Rank-ordered Douglas-Peucker fill of the remaining budget
//! - **[`SimplificationEngine`]**: Stateless entry point for `simplify`, `analyze` and `preview`
//!
//! # Performance Characteristics
//!
//! - **Detection**: O(N) over the precomputed bearing sequence
//! - **Pruning**: O(K log K) for K critical points
//! - **Fill**: O(N log N) amortized (one heap entry per open gap)

mod critical;
mod engine;
mod features;
mod fill;
mod geometry;
mod metrics;
pub mod utils;

#[cfg(test)]
mod test_fixtures;

// Public API exports
pub use critical::{CriticalKind, CriticalPoint, CriticalPointSet, PrunedPoint};
pub use engine::{
    GeometryAnalysis, PreviewEntry, SimplificationEngine, SimplificationResult, SimplifyOptions,
};
pub use features::{Corner, CurveRun, DetectedFeatures, TurnProfile};
pub use fill::{FillOutcome, fill_to_budget};
pub use geometry::{Geometry, LineStringGeometry, Polyline};
pub use metrics::{length_preserved, reduction_ratio};

/// Error types for the simplification engine
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimplifyError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error(
        "Cannot represent this geometry with only {provided_limit} coordinates. Minimum required: {minimum_required}"
    )]
    InsufficientCoordinates {
        minimum_required: usize,
        provided_limit: usize,
    },

    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

impl SimplifyError {
    /// Stable name of the error kind, as reported in preview entries
    pub fn kind_name(&self) -> &'static str {
        match self {
            SimplifyError::InvalidGeometry(_) => "InvalidGeometryError",
            SimplifyError::InsufficientCoordinates { .. } => "InsufficientCoordinatesError",
            SimplifyError::InvalidOptions(_) => "InvalidOptionsError",
        }
    }
}

pub type Result<T> = std::result::Result<T, SimplifyError>;

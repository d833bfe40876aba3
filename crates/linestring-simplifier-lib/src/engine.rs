//! SimplificationEngine - Stateless entry point for simplification and analysis
//!
//! The pipeline for one budget is:
//! precompute bearings → detect corners and curves → build and prune the critical
//! point set → fill the remaining budget by deviation → assemble metrics and warnings.

use crate::{
    CriticalPointSet, DetectedFeatures, Geometry, LineStringGeometry, Polyline, Result,
    SimplifyError, TurnProfile, fill_to_budget, metrics, utils,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Detection settings for one simplification
///
/// All thresholds are explicit inputs; the defaults match the documented behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifyOptions {
    /// Keep vertices whose bearing change reaches `min_angle_for_corners` (default: true)
    pub preserve_corners: bool,
    /// Keep representative vertices of curve runs (default: true)
    pub preserve_curves: bool,
    /// Minimum |bearing change| in degrees for a corner (default: 30.0)
    pub min_angle_for_corners: f64,
    /// Minimum accumulated same-direction turning in degrees for a curve run (default: 45.0)
    pub curve_detection_threshold: f64,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self {
            preserve_corners: true,
            preserve_curves: true,
            min_angle_for_corners: 30.0,
            curve_detection_threshold: 45.0,
        }
    }
}

impl SimplifyOptions {
    /// Check that the thresholds are usable
    ///
    /// The corner angle must lie in (0, 180] and the curve threshold must be positive.
    pub fn validate(&self) -> Result<()> {
        let angle = self.min_angle_for_corners;
        if !angle.is_finite() || angle <= 0.0 || angle > 180.0 {
            return Err(SimplifyError::InvalidOptions(format!(
                "min_angle_for_corners must be in (0, 180], got {}",
                angle
            )));
        }
        let threshold = self.curve_detection_threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(SimplifyError::InvalidOptions(format!(
                "curve_detection_threshold must be a positive number, got {}",
                threshold
            )));
        }
        Ok(())
    }
}

/// Outcome of simplifying one geometry to one budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplificationResult {
    /// Simplified geometry: an ordered subsequence of the original coordinates
    pub geometry: LineStringGeometry,
    pub original_count: usize,
    pub simplified_count: usize,
    /// Percentage of coordinates removed
    pub reduction_ratio: f64,
    /// Simplified length as a percentage of the original length
    pub length_preserved: f64,
    pub warnings: Vec<String>,
    /// False when critical points had to be dropped to fit the budget
    pub was_sufficient: bool,
}

/// Read-only analysis of a geometry (no fill stage)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryAnalysis {
    pub is_valid: bool,
    /// Why the geometry is invalid, if it is
    pub error: Option<String>,
    pub geometry_type: Option<String>,
    pub coordinate_count: usize,
    /// Great-circle length in meters
    pub total_length: f64,
    /// Critical point count before pruning
    pub minimum_coordinates_required: usize,
    pub detected_corners: usize,
    /// Number of qualifying curve runs
    pub detected_curves: usize,
    /// `minimum_coordinates_required / coordinate_count`, in [0, 1]
    pub complexity_score: f64,
}

/// One budget's entry in a preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreviewEntry {
    Simplified(SimplificationResult),
    Failed { error: String, error_type: String },
}

/// Stateless simplification engine holding only default options
///
/// All per-call data lives on the stack of each call, so one engine can be shared
/// across threads without synchronization.
#[derive(Debug, Clone, Default)]
pub struct SimplificationEngine {
    options: SimplifyOptions,
}

impl PreviewEntry {
    /// The result, if this budget succeeded
    pub fn result(&self) -> Option<&SimplificationResult> {
        match self {
            PreviewEntry::Simplified(result) => Some(result),
            PreviewEntry::Failed { .. } => None,
        }
    }

    /// Whether this budget failed
    pub fn is_error(&self) -> bool {
        matches!(self, PreviewEntry::Failed { .. })
    }
}

impl From<Result<SimplificationResult>> for PreviewEntry {
    fn from(outcome: Result<SimplificationResult>) -> Self {
        match outcome {
            Ok(result) => PreviewEntry::Simplified(result),
            Err(e) => PreviewEntry::Failed {
                error: e.to_string(),
                error_type: e.kind_name().to_string(),
            },
        }
    }
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl SimplificationEngine {
    /// Create an engine with the given default options
    pub fn new(options: SimplifyOptions) -> Self {
        Self { options }
    }

    /// Default options used by `simplify`, `analyze` and `preview`
    #[inline]
    pub fn options(&self) -> &SimplifyOptions {
        &self.options
    }

    /// Simplify a GeoJSON LineString to at most `max_coordinates` coordinates
    ///
    /// # Errors
    /// - `InvalidGeometry` if the geometry is not a valid LineString
    /// - `InsufficientCoordinates` if `max_coordinates < 2`
    pub fn simplify(
        &self,
        geometry: &Geometry,
        max_coordinates: usize,
    ) -> Result<SimplificationResult> {
        self.simplify_with_options(geometry, max_coordinates, &self.options)
    }

    /// Simplify with explicit options instead of the engine defaults
    pub fn simplify_with_options(
        &self,
        geometry: &Geometry,
        max_coordinates: usize,
        options: &SimplifyOptions,
    ) -> Result<SimplificationResult> {
        let polyline = Polyline::from_geometry(geometry)?;
        self.simplify_polyline(&polyline, max_coordinates, options)
    }

    /// Simplify an already validated polyline
    pub fn simplify_polyline(
        &self,
        polyline: &Polyline,
        max_coordinates: usize,
        options: &SimplifyOptions,
    ) -> Result<SimplificationResult> {
        #[cfg(feature = "profiling")]
        profiling::scope!("engine::simplify");

        options.validate()?;
        if max_coordinates < 2 {
            return Err(SimplifyError::InsufficientCoordinates {
                minimum_required: 2,
                provided_limit: max_coordinates,
            });
        }

        let original_count = polyline.len();
        if original_count <= max_coordinates {
            tracing::debug!(
                original_count,
                max_coordinates,
                "no simplification needed"
            );
            return Ok(SimplificationResult {
                geometry: polyline.to_geometry(),
                original_count,
                simplified_count: original_count,
                reduction_ratio: 0.0,
                length_preserved: 100.0,
                warnings: Vec::new(),
                was_sufficient: true,
            });
        }

        let profile = TurnProfile::new(polyline);
        let features = DetectedFeatures::detect(&profile, options);
        let mut critical = CriticalPointSet::build(original_count, &features);
        critical.prune_to(&profile, max_coordinates)?;

        let remaining_budget = max_coordinates.saturating_sub(critical.len());
        let fill = fill_to_budget(polyline.coords(), &critical.indices(), remaining_budget);

        let simplified = polyline.select(&fill.indices);
        let simplified_count = simplified.len();
        let length_preserved =
            metrics::length_preserved(profile.total_length(), utils::path_length(&simplified));

        let mut warnings = critical.pruning_warnings(max_coordinates);
        warnings.extend(metrics::quality_warnings(
            simplified_count,
            max_coordinates,
            length_preserved,
            &fill,
        ));

        tracing::debug!(
            original_count,
            simplified_count,
            max_coordinates,
            minimum_required = critical.minimum_coordinates_required(),
            length_preserved,
            "simplification finished"
        );

        Ok(SimplificationResult {
            geometry: LineStringGeometry::new(simplified.iter().map(|c| [c.x, c.y]).collect()),
            original_count,
            simplified_count,
            reduction_ratio: metrics::reduction_ratio(original_count, simplified_count),
            length_preserved,
            warnings,
            was_sufficient: !critical.was_pruned(),
        })
    }

    /// Validate a geometry and report its size and feature density
    ///
    /// Never fails: invalid input is reported with `is_valid = false` and an `error`.
    pub fn analyze(&self, geometry: &Geometry) -> GeometryAnalysis {
        #[cfg(feature = "profiling")]
        profiling::scope!("engine::analyze");

        let invalid = |error: SimplifyError| GeometryAnalysis {
            is_valid: false,
            error: Some(error.to_string()),
            geometry_type: Some(geometry.geometry_type.clone()),
            coordinate_count: 0,
            total_length: 0.0,
            minimum_coordinates_required: 0,
            detected_corners: 0,
            detected_curves: 0,
            complexity_score: 0.0,
        };

        let polyline = match self
            .options
            .validate()
            .and_then(|_| Polyline::from_geometry(geometry))
        {
            Ok(polyline) => polyline,
            Err(e) => return invalid(e),
        };

        let profile = TurnProfile::new(&polyline);
        let features = DetectedFeatures::detect(&profile, &self.options);
        let critical = CriticalPointSet::build(polyline.len(), &features);
        let coordinate_count = polyline.len();
        let minimum_coordinates_required = critical.minimum_coordinates_required();

        GeometryAnalysis {
            is_valid: true,
            error: None,
            geometry_type: Some(geometry.geometry_type.clone()),
            coordinate_count,
            total_length: profile.total_length(),
            minimum_coordinates_required,
            detected_corners: features.corners.len(),
            detected_curves: features.curves.len(),
            complexity_score: minimum_coordinates_required as f64 / coordinate_count as f64,
        }
    }

    /// Simplify the same geometry to several budgets
    ///
    /// Each budget runs the full pipeline independently (in parallel). A budget that
    /// cannot be satisfied is recorded as a failed entry; an invalid geometry aborts the
    /// whole preview since no budget could succeed.
    pub fn preview(
        &self,
        geometry: &Geometry,
        max_coordinates_options: &[usize],
    ) -> Result<BTreeMap<usize, PreviewEntry>> {
        #[cfg(feature = "profiling")]
        profiling::scope!("engine::preview");

        let polyline = Polyline::from_geometry(geometry)?;
        self.options.validate()?;

        Ok(max_coordinates_options
            .par_iter()
            .map(|&max_coordinates| {
                let entry: PreviewEntry = self
                    .simplify_polyline(&polyline, max_coordinates, &self.options)
                    .into();
                (max_coordinates, entry)
            })
            .collect())
    }
}

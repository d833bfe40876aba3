//! GeoJSON geometry model and validation
//!
//! This module provides the loose input [`Geometry`] as it arrives from a GeoJSON
//! document, the validated [`Polyline`] the engine works on, and the typed
//! [`LineStringGeometry`] returned in results.

use crate::{Result, SimplifyError, utils};
use geo::Coord;
use serde::{Deserialize, Serialize};

/// GeoJSON type tag accepted by the engine
pub const LINE_STRING_TYPE: &str = "LineString";

/// A GeoJSON geometry object as supplied by the caller (not yet validated)
///
/// `coordinates` is kept as raw JSON so that malformed or non-LineString input can be
/// reported as an invalid geometry instead of a deserialization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub geometry_type: String,
    #[serde(default)]
    pub coordinates: serde_json::Value,
}

/// A simplified (or original) LineString ready to be written back as GeoJSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStringGeometry {
    #[serde(rename = "type")]
    pub geometry_type: String,
    pub coordinates: Vec<[f64; 2]>,
}

/// A validated LineString: at least two finite, in-range coordinates with no
/// degenerate consecutive pair
///
/// Identity of a coordinate within a computation is its index in this sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    coords: Vec<Coord<f64>>,
}

impl Geometry {
    /// Parse a geometry from a JSON string
    ///
    /// Malformed JSON and objects without a `type` member are invalid geometries.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SimplifyError::InvalidGeometry(format!("Invalid JSON string: {}", e)))
    }

    /// Interpret an already parsed JSON value as a geometry
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| SimplifyError::InvalidGeometry(format!("Invalid geometry object: {}", e)))
    }

    /// Build a LineString geometry from `[longitude, latitude]` pairs
    pub fn line_string(coordinates: &[[f64; 2]]) -> Self {
        Self {
            geometry_type: LINE_STRING_TYPE.to_string(),
            coordinates: serde_json::Value::from(
                coordinates
                    .iter()
                    .map(|pair| serde_json::Value::from(pair.to_vec()))
                    .collect::<Vec<_>>(),
            ),
        }
    }
}

impl From<&LineStringGeometry> for Geometry {
    fn from(line: &LineStringGeometry) -> Self {
        Geometry::line_string(&line.coordinates)
    }
}

impl LineStringGeometry {
    /// Create a LineString geometry from coordinates
    pub fn new(coordinates: Vec<[f64; 2]>) -> Self {
        Self {
            geometry_type: LINE_STRING_TYPE.to_string(),
            coordinates,
        }
    }

    /// Number of coordinates
    #[inline]
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// Check if the geometry has no coordinates
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Polyline {
    /// Validate a coordinate sequence
    ///
    /// # Errors
    /// `InvalidGeometry` if there are fewer than two coordinates, a value is not finite,
    /// a longitude/latitude is out of range, or two consecutive coordinates coincide
    /// (identical, or the same position written two ways).
    pub fn new(coords: Vec<Coord<f64>>) -> Result<Self> {
        if coords.len() < 2 {
            return Err(SimplifyError::InvalidGeometry(format!(
                "a LineString needs at least 2 coordinates, got {}",
                coords.len()
            )));
        }

        for (index, coord) in coords.iter().enumerate() {
            if !coord.x.is_finite() || !coord.y.is_finite() {
                return Err(SimplifyError::InvalidGeometry(format!(
                    "coordinate {} is not a pair of finite numbers",
                    index
                )));
            }
            if !(-180.0..=180.0).contains(&coord.x) || !(-90.0..=90.0).contains(&coord.y) {
                return Err(SimplifyError::InvalidGeometry(format!(
                    "coordinate {} ({}, {}) is outside longitude/latitude bounds",
                    index, coord.x, coord.y
                )));
            }
        }

        for (index, pair) in coords.windows(2).enumerate() {
            if utils::coincident(pair[0], pair[1]) {
                return Err(SimplifyError::InvalidGeometry(format!(
                    "coordinates {} and {} are degenerate consecutive duplicates",
                    index,
                    index + 1
                )));
            }
        }

        Ok(Self { coords })
    }

    /// Validate a GeoJSON geometry as a LineString
    pub fn from_geometry(geometry: &Geometry) -> Result<Self> {
        if geometry.geometry_type != LINE_STRING_TYPE {
            return Err(SimplifyError::InvalidGeometry(format!(
                "expected a {} geometry, got {:?}",
                LINE_STRING_TYPE, geometry.geometry_type
            )));
        }

        let entries = geometry.coordinates.as_array().ok_or_else(|| {
            SimplifyError::InvalidGeometry("coordinates must be an array".to_string())
        })?;

        let coords = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| parse_position(index, entry))
            .collect::<Result<Vec<_>>>()?;

        Self::new(coords)
    }

    /// All coordinates in path order
    #[inline]
    pub fn coords(&self) -> &[Coord<f64>] {
        &self.coords
    }

    /// Number of coordinates (always at least 2)
    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Always false; kept for API symmetry with `len`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Total great-circle length in meters
    pub fn total_length(&self) -> f64 {
        utils::path_length(&self.coords)
    }

    /// The full polyline as GeoJSON
    pub fn to_geometry(&self) -> LineStringGeometry {
        LineStringGeometry::new(self.coords.iter().map(|c| [c.x, c.y]).collect())
    }

    /// Coordinates at the given (sorted) indices
    pub fn select(&self, indices: &[usize]) -> Vec<Coord<f64>> {
        indices
            .iter()
            .filter_map(|&i| self.coords.get(i).copied())
            .collect()
    }
}

impl TryFrom<&Geometry> for Polyline {
    type Error = SimplifyError;

    fn try_from(geometry: &Geometry) -> Result<Self> {
        Polyline::from_geometry(geometry)
    }
}

/// Parse one `[longitude, latitude, ...]` position; extra members are ignored
fn parse_position(index: usize, entry: &serde_json::Value) -> Result<Coord<f64>> {
    let invalid = || {
        SimplifyError::InvalidGeometry(format!(
            "coordinate {} must be a [longitude, latitude] pair of numbers",
            index
        ))
    };

    let values = entry.as_array().ok_or_else(invalid)?;
    if values.len() < 2 {
        return Err(invalid());
    }
    let x = values[0].as_f64().ok_or_else(invalid)?;
    let y = values[1].as_f64().ok_or_else(invalid)?;
    Ok(Coord { x, y })
}

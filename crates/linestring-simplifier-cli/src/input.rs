//! Input loading: GeoJSON geometry or Feature documents and GPX tracks

use crate::error::CliError;
use geo::Coord;
use linestring_simplifier_lib::{Geometry, utils};
use std::io::Read;
use std::path::Path;

/// Path value that selects stdin
pub const STDIN_PATH: &str = "-";

/// Load a geometry from a file, or from stdin when `path` is `-`
///
/// Files ending in `.gpx` are read as GPX; anything else is sniffed: documents starting
/// with `<` are GPX, the rest GeoJSON.
pub fn load_geometry(path: &Path) -> Result<Geometry, CliError> {
    let text = if path == Path::new(STDIN_PATH) {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|source| CliError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        text
    } else {
        std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?
    };

    let is_gpx_file = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gpx"));
    let geometry = if is_gpx_file || text.trim_start().starts_with('<') {
        parse_gpx(&text)?
    } else {
        parse_geojson(&text)?
    };

    tracing::debug!(
        path = %path.display(),
        geometry_type = %geometry.geometry_type,
        "input loaded"
    );
    Ok(geometry)
}

/// Parse a GeoJSON geometry, or the geometry of a Feature
pub fn parse_geojson(text: &str) -> Result<Geometry, CliError> {
    let mut value: serde_json::Value = serde_json::from_str(text)?;

    match value.get("type").and_then(|t| t.as_str()) {
        Some("Feature") => {
            let geometry = value
                .get_mut("geometry")
                .map(serde_json::Value::take)
                .filter(|g| !g.is_null())
                .ok_or_else(|| CliError::UnsupportedInput("Feature has no geometry".into()))?;
            Ok(Geometry::from_value(geometry)?)
        }
        Some("FeatureCollection") => Err(CliError::UnsupportedInput(
            "FeatureCollection is not supported; pass a single Feature or geometry".into(),
        )),
        _ => Ok(Geometry::from_value(value)?),
    }
}

/// Concatenate every track point (or route point, if there are no tracks) into one LineString
///
/// Consecutive repeated fixes are dropped since a LineString may not contain them.
pub fn parse_gpx(text: &str) -> Result<Geometry, CliError> {
    let gpx = gpx::read(text.as_bytes())?;

    let track_points = gpx
        .tracks
        .iter()
        .flat_map(|track| track.segments.iter())
        .flat_map(|segment| segment.points.iter());
    let route_points = gpx.routes.iter().flat_map(|route| route.points.iter());

    let points: Vec<Coord<f64>> = if gpx.tracks.is_empty() {
        route_points.map(|wpt| wpt.point().0).collect()
    } else {
        track_points.map(|wpt| wpt.point().0).collect()
    };

    if points.is_empty() {
        return Err(CliError::UnsupportedInput(
            "GPX contains no track or route points".into(),
        ));
    }

    let mut coordinates: Vec<[f64; 2]> = Vec::with_capacity(points.len());
    let mut last: Option<Coord<f64>> = None;
    let mut repeated = 0usize;
    for point in points {
        if last.is_some_and(|prev| utils::coincident(prev, point)) {
            repeated += 1;
            continue;
        }
        coordinates.push([point.x, point.y]);
        last = Some(point);
    }

    if repeated > 0 {
        tracing::warn!(repeated, "Dropped repeated GPX fixes");
    }
    Ok(Geometry::line_string(&coordinates))
}

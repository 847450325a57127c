//! Coastline and political boundary lines read from GeoJSON.

use std::{fs, path::Path};

use serde_json::Value;

use super::{projection::MapExtent, RenderError};

/// Polylines of (lon, lat) vertices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Boundaries {
    lines: Vec<Vec<(f64, f64)>>,
}

impl Boundaries {
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let text = fs::read_to_string(path).map_err(|e| RenderError::Boundaries {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Self::from_geojson(&text).map_err(|e| RenderError::Boundaries {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_geojson(text: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(text)?;
        let mut lines = Vec::new();
        collect(&value, &mut lines);

        Ok(Boundaries { lines })
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Runs of consecutive vertices inside the extent, in its longitude convention.
    pub fn clipped(&self, extent: &MapExtent) -> Vec<Vec<(f64, f64)>> {
        let mut runs = Vec::new();

        for line in &self.lines {
            let mut run = Vec::new();
            for &(lon, lat) in line {
                let lon = extent.normalize_lon(lon);
                if extent.contains(lon, lat) {
                    run.push((lon, lat));
                } else if run.len() > 1 {
                    runs.push(std::mem::take(&mut run));
                } else {
                    run.clear();
                }
            }
            if run.len() > 1 {
                runs.push(run);
            }
        }

        runs
    }
}

fn collect(value: &Value, lines: &mut Vec<Vec<(f64, f64)>>) {
    let kind = value.get("type").and_then(Value::as_str).unwrap_or_default();
    let coordinates = value.get("coordinates");

    match kind {
        "FeatureCollection" => {
            for feature in value.get("features").and_then(Value::as_array).into_iter().flatten() {
                collect(feature, lines);
            }
        }
        "Feature" => {
            if let Some(geometry) = value.get("geometry") {
                collect(geometry, lines);
            }
        }
        "GeometryCollection" => {
            let geometries = value.get("geometries").and_then(Value::as_array);
            for geometry in geometries.into_iter().flatten() {
                collect(geometry, lines);
            }
        }
        "LineString" => lines.extend(coordinates.and_then(line).into_iter()),
        "MultiLineString" | "Polygon" => lines.extend(
            coordinates
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .filter_map(line),
        ),
        "MultiPolygon" => lines.extend(
            coordinates
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .filter_map(Value::as_array)
                .flatten()
                .filter_map(line),
        ),
        _ => {}
    }
}

fn line(value: &Value) -> Option<Vec<(f64, f64)>> {
    let points: Vec<(f64, f64)> = value
        .as_array()?
        .iter()
        .filter_map(|point| {
            let point = point.as_array()?;
            Some((point.first()?.as_f64()?, point.get(1)?.as_f64()?))
        })
        .collect();

    (points.len() > 1).then_some(points)
}

// -- Tests -------------------------------------------------------------------

//! Mercator map geometry for the panels.
//!
//! Panels are drawn in (longitude, Mercator y) space: longitude is linear in
//! Mercator x, so only latitude needs transforming.

/// Latitudes are clamped here before projecting; the poles map to infinity.
const MAX_LATITUDE: f64 = 85.0;

pub fn mercator_y(lat_deg: f64) -> f64 {
    lat_deg.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians().tan().asinh()
}

/// Lat/lon bounds of the data, from the extreme cell centres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapExtent {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl MapExtent {
    /// Bounds of the finite coordinates; `None` when either axis is empty or flat.
    pub fn from_coordinates(lat: &[f64], lon: &[f64]) -> Option<Self> {
        let (lat_min, lat_max) = bounds(lat)?;
        let (lon_min, lon_max) = bounds(lon)?;

        Some(MapExtent {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        })
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        (self.lon_min..=self.lon_max).contains(&lon) && (self.lat_min..=self.lat_max).contains(&lat)
    }

    /// Shifts a longitude into the extent's convention (-180..180 or 0..360).
    pub fn normalize_lon(&self, lon: f64) -> f64 {
        if self.lon_max <= 180.0 && lon > 180.0 {
            lon - 360.0
        } else if self.lon_min >= 0.0 && lon < 0.0 {
            lon + 360.0
        } else {
            lon
        }
    }

    pub fn y_range(&self) -> (f64, f64) {
        (mercator_y(self.lat_min), mercator_y(self.lat_max))
    }
}

fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    let (min, max) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| (min.min(v), max.max(v)));

    (min < max).then_some((min, max))
}

/// Cell edges at the midpoints between centres, extrapolated at both ends.
pub fn cell_edges(centers: &[f64]) -> Vec<f64> {
    match centers.len() {
        0 => Vec::new(),
        1 => vec![centers[0] - 0.5, centers[0] + 0.5],
        n => {
            let mut edges = Vec::with_capacity(n + 1);
            edges.push(centers[0] - (centers[1] - centers[0]) / 2.0);
            for pair in centers.windows(2) {
                edges.push((pair[0] + pair[1]) / 2.0);
            }
            edges.push(centers[n - 1] + (centers[n - 1] - centers[n - 2]) / 2.0);
            edges
        }
    }
}

/// The lat/lon mesh shared by all four panels of a figure.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGrid {
    pub extent: MapExtent,
    lon_edges: Vec<f64>,
    y_edges: Vec<f64>,
}

impl MeshGrid {
    pub fn new(lat: &[f64], lon: &[f64]) -> Option<Self> {
        let extent = MapExtent::from_coordinates(lat, lon)?;
        let (y_min, y_max) = extent.y_range();

        let lon_edges = cell_edges(lon)
            .into_iter()
            .map(|x| x.clamp(extent.lon_min, extent.lon_max))
            .collect();
        let y_edges = cell_edges(lat)
            .into_iter()
            .map(|lat| mercator_y(lat).clamp(y_min, y_max))
            .collect();

        Some(MeshGrid {
            extent,
            lon_edges,
            y_edges,
        })
    }

    pub fn rows(&self) -> usize {
        self.y_edges.len().saturating_sub(1)
    }

    pub fn cols(&self) -> usize {
        self.lon_edges.len().saturating_sub(1)
    }

    /// Projected corners of a cell, clipped to the map extent.
    pub fn cell(&self, row: usize, col: usize) -> ((f64, f64), (f64, f64)) {
        (
            (self.lon_edges[col], self.y_edges[row]),
            (self.lon_edges[col + 1], self.y_edges[row + 1]),
        )
    }
}

/// Parallels every `spacing` degrees from the equator to 90°N inside the extent.
pub fn parallels(extent: &MapExtent, spacing: f64) -> Vec<f64> {
    graticule(0.0, 90.0, spacing)
        .into_iter()
        .filter(|lat| (extent.lat_min..=extent.lat_max).contains(lat))
        .collect()
}

/// Meridians every `spacing` degrees over 180..360°E, in the extent's convention.
pub fn meridians(extent: &MapExtent, spacing: f64) -> Vec<f64> {
    graticule(180.0, 360.0, spacing)
        .into_iter()
        .map(|lon| extent.normalize_lon(lon))
        .filter(|lon| (extent.lon_min..=extent.lon_max).contains(lon))
        .collect()
}

fn graticule(start: f64, stop: f64, spacing: f64) -> Vec<f64> {
    if spacing <= 0.0 {
        return Vec::new();
    }
    let steps = ((stop - start) / spacing).ceil() as usize;
    (0..steps).map(|i| start + i as f64 * spacing).collect()
}

pub fn format_latitude(lat: f64) -> String {
    let rounded = lat.round();
    match rounded {
        r if r > 0.0 => format!("{}°N", r),
        r if r < 0.0 => format!("{}°S", -r),
        _ => "0°".to_string(),
    }
}

pub fn format_longitude(lon: f64) -> String {
    let lon = if lon > 180.0 { lon - 360.0 } else { lon };
    let rounded = lon.round();
    match rounded {
        r if r > 0.0 && r < 180.0 => format!("{}°E", r),
        r if r < 0.0 => format!("{}°W", -r),
        r if r == 0.0 => "0°".to_string(),
        _ => "180°".to_string(),
    }
}

// -- Tests -------------------------------------------------------------------

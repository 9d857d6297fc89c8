//! Nearest-cell lookup over the two axis naming conventions found in model output.
//!
//! The search is a 1-D minimum absolute difference along each axis independently, not a
//! geodesic nearest point. Model grids are close to uniform over the distances involved.
use super::GridDataset;
use crate::{error::DecodeError, utility::nearest_index};

/// Find the `(row, column)` cell of a dataset nearest a latitude and longitude.
pub trait CoordinateAccessor {
    /// Names of the (row, column) axes this accessor reads.
    fn axis_names(&self) -> (&'static str, &'static str);

    /// The nearest cell, `None` if an axis has no usable values.
    fn nearest_cell(&self, lat: f64, lon: f64) -> Option<(usize, usize)>;
}

/// Axes named `latitude` and `longitude`, as on regular lat/lon grids.
#[derive(Debug, Clone, Copy)]
pub struct GeographicAxes<'a> {
    latitude: &'a [f64],
    longitude: &'a [f64],
}

impl<'a> CoordinateAccessor for GeographicAxes<'a> {
    fn axis_names(&self) -> (&'static str, &'static str) {
        ("latitude", "longitude")
    }

    fn nearest_cell(&self, lat: f64, lon: f64) -> Option<(usize, usize)> {
        let row = nearest_index(self.latitude, lat)?;
        let lon = match_longitude_convention(self.longitude, lon);
        let col = nearest_index(self.longitude, lon)?;
        Some((row, col))
    }
}

/// Axes named `y` and `x`, as on projected or rotated grids.
#[derive(Debug, Clone, Copy)]
pub struct ProjectedAxes<'a> {
    y: &'a [f64],
    x: &'a [f64],
}

impl<'a> CoordinateAccessor for ProjectedAxes<'a> {
    fn axis_names(&self) -> (&'static str, &'static str) {
        ("y", "x")
    }

    fn nearest_cell(&self, lat: f64, lon: f64) -> Option<(usize, usize)> {
        let row = nearest_index(self.y, lat)?;
        let col = nearest_index(self.x, lon)?;
        Some((row, col))
    }
}

/// Pick the accessor for a dataset once, from its dimension names.
pub fn coordinate_accessor(
    ds: &GridDataset,
) -> Result<Box<dyn CoordinateAccessor + '_>, DecodeError> {
    let rows = ds.rows();
    let cols = ds.columns();

    let accessor: Box<dyn CoordinateAccessor + '_> =
        match (rows.name.as_str(), cols.name.as_str()) {
            ("latitude", "longitude") => Box::new(GeographicAxes {
                latitude: &rows.values,
                longitude: &cols.values,
            }),
            ("y", "x") => Box::new(ProjectedAxes {
                y: &rows.values,
                x: &cols.values,
            }),
            _ => return Err(DecodeError::UnknownAxes(ds.dims())),
        };

    if rows.values.is_empty() || cols.values.is_empty() {
        return Err(DecodeError::EmptyAxis);
    }

    Ok(accessor)
}

// Longitudes on 0..360 axes need a western-hemisphere target shifted up, and vice versa.
fn match_longitude_convention(axis: &[f64], lon: f64) -> f64 {
    let max = axis
        .iter()
        .cloned()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);

    if max > 180.0 && lon < 0.0 {
        lon + 360.0
    } else if max <= 180.0 && lon > 180.0 {
        lon - 360.0
    } else {
        lon
    }
}

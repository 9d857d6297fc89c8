//! Grids held in memory, looked up by file name.
use super::{Axis, GridDataset, GridField, GridSource, Variable};
use crate::error::DecodeError;
use ndarray::Array2;
use std::{collections::HashMap, io, path::Path};

/// A `GridSource` over datasets that are already decoded, keyed by file name. Opening a path
/// whose file name was never registered fails as if the file were unreadable.
///
/// # Examples
///
/// ```rust
/// use grib_sounding::grid::{GridSource, MemorySource, Variable};
/// use std::path::Path;
///
/// let source = MemorySource::new()
///     .with_uniform_field("AirTemp_IsbL-0500.grib2", Variable::Temperature, 253.15);
///
/// let ds = source.open(Path::new("/any/dir/AirTemp_IsbL-0500.grib2")).unwrap();
/// assert_eq!(ds.fields().len(), 1);
/// assert!(source.open(Path::new("WindU_IsbL-0500.grib2")).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    datasets: HashMap<String, GridDataset>,
}

impl MemorySource {
    /// Create an empty source.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to register a dataset under a file name, replacing any earlier one.
    pub fn with_dataset<S: Into<String>>(mut self, file_name: S, dataset: GridDataset) -> Self {
        self.datasets.insert(file_name.into(), dataset);
        self
    }

    /// Builder method to add a field with the same value everywhere. The first field for a file
    /// name creates a small regular latitude/longitude grid covering the globe.
    pub fn with_uniform_field<S: Into<String>>(
        mut self,
        file_name: S,
        variable: Variable,
        value: f64,
    ) -> Self {
        let ds = self
            .datasets
            .entry(file_name.into())
            .or_insert_with(global_grid);
        let shape = (ds.rows.values.len(), ds.columns.values.len());

        ds.fields.push(GridField {
            variable,
            values: Array2::from_elem(shape, value),
        });
        self
    }

    /// Number of registered file names.
    #[inline]
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// True if nothing is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

fn global_grid() -> GridDataset {
    let lats = (0..=18).map(|i| 90.0 - 10.0 * f64::from(i)).collect();
    let lons = (0..36).map(|i| 10.0 * f64::from(i)).collect();
    GridDataset::new(Axis::new("latitude", lats), Axis::new("longitude", lons))
}

impl GridSource for MemorySource {
    fn open(&self, path: &Path) -> Result<GridDataset, DecodeError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.datasets.get(&file_name).cloned().ok_or_else(|| {
            DecodeError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no grid registered for {}", file_name),
            ))
        })
    }
}

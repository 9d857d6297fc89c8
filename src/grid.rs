//! Decoded grids: one variable (or a few) on one pressure level, with the coordinate axes needed
//! to find the cell nearest a point.

use crate::error::DecodeError;
use ndarray::Array2;
use std::path::Path;
use strum_macros::{Display, EnumIter, EnumString};

pub use self::{
    accessor::{coordinate_accessor, CoordinateAccessor, GeographicAxes, ProjectedAxes},
    grib2::Grib2Source,
    memory::MemorySource,
};

/// The variables the sounding is assembled from. The string forms are the cfgrib short names.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter,
)]
pub enum Variable {
    /// Air temperature, Kelvin in the grid.
    #[strum(serialize = "t")]
    Temperature,
    /// Relative humidity, percent in the grid.
    #[strum(serialize = "r")]
    RelativeHumidity,
    /// U wind component, m/s in the grid.
    #[strum(serialize = "u")]
    WindU,
    /// V wind component, m/s in the grid.
    #[strum(serialize = "v")]
    WindV,
    /// Geopotential height, gpm in the grid.
    #[strum(serialize = "gh")]
    GeopotentialHeight,
}

/// A named 1-D coordinate axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    /// Dimension name, e.g. `latitude` or `y`.
    pub name: String,
    /// Coordinate values along the dimension.
    pub values: Vec<f64>,
}

impl Axis {
    /// Create a new axis.
    pub fn new<S: Into<String>>(name: S, values: Vec<f64>) -> Self {
        Axis {
            name: name.into(),
            values,
        }
    }
}

/// One decoded field, indexed `[row, column]` along the dataset's axes.
#[derive(Debug, Clone, PartialEq)]
pub struct GridField {
    /// Which variable this is.
    pub variable: Variable,
    /// Values in the units of the source file.
    pub values: Array2<f64>,
}

/// Everything decoded from one grid file.
#[derive(Debug, Clone, PartialEq)]
pub struct GridDataset {
    rows: Axis,
    columns: Axis,
    fields: Vec<GridField>,
}

impl GridDataset {
    /// Create a dataset with no fields yet. `rows` is the first array dimension.
    pub fn new(rows: Axis, columns: Axis) -> Self {
        GridDataset {
            rows,
            columns,
            fields: vec![],
        }
    }

    /// Builder method to add a field. A field whose shape disagrees with the axes is rejected.
    pub fn with_field(
        mut self,
        variable: Variable,
        values: Array2<f64>,
    ) -> Result<Self, DecodeError> {
        let expected = (self.rows.values.len(), self.columns.values.len());
        let found = values.dim();
        if expected != found {
            return Err(DecodeError::ShapeMismatch { expected, found });
        }
        self.fields.push(GridField { variable, values });
        Ok(self)
    }

    /// The row (first) axis.
    #[inline]
    pub fn rows(&self) -> &Axis {
        &self.rows
    }

    /// The column (second) axis.
    #[inline]
    pub fn columns(&self) -> &Axis {
        &self.columns
    }

    /// Dimension names in array order.
    pub fn dims(&self) -> Vec<String> {
        vec![self.rows.name.clone(), self.columns.name.clone()]
    }

    /// All decoded fields.
    #[inline]
    pub fn fields(&self) -> &[GridField] {
        &self.fields
    }
}

/// Something that can turn a grid file on disk into a `GridDataset`.
///
/// The file is opened, decoded and closed inside `open`; nothing is held afterwards.
pub trait GridSource {
    /// Decode one file.
    fn open(&self, path: &Path) -> Result<GridDataset, DecodeError>;
}

mod accessor;
mod grib2;
mod memory;

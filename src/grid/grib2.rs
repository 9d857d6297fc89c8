//! GRIB2 decoding with the pure Rust `grib` crate.
use super::{Axis, GridDataset, GridSource, Variable};
use crate::error::DecodeError;
use grib::Grib2SubmessageDecoder;
use log::debug;
use ndarray::Array2;
use std::{fs::File, io::BufReader, path::Path};

// Grid definition template 3.0, the regular latitude/longitude grid.
const REGULAR_LAT_LON_TEMPLATE: u16 = 0;

/// Decode GRIB2 files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct Grib2Source;

impl GridSource for Grib2Source {
    fn open(&self, path: &Path) -> Result<GridDataset, DecodeError> {
        let f = BufReader::new(File::open(path)?);
        let grib2 = grib::from_reader(f).map_err(grib_err)?;

        let mut dataset: Option<GridDataset> = None;

        for (index, submessage) in grib2.iter() {
            let discipline = submessage.indicator().discipline;
            let category = submessage.prod_def().parameter_category();
            let number = submessage.prod_def().parameter_number();

            let variable = match (category, number) {
                (Some(c), Some(n)) => match identify_parameter(discipline, c, n) {
                    Some(var) => var,
                    None => continue,
                },
                _ => continue,
            };
            debug!("  submessage {:?} holds {}", index, variable);

            let (ni, nj) = submessage.grid_shape().map_err(grib_err)?;
            let template = submessage.grid_def().grid_tmpl_num();

            let ds = match dataset.take() {
                Some(ds) => ds,
                None => {
                    let latlons: Vec<(f32, f32)> =
                        submessage.latlons().map_err(grib_err)?.collect();
                    build_axes(template, ni, nj, &latlons)?
                }
            };

            let decoder = Grib2SubmessageDecoder::from(submessage).map_err(grib_err)?;
            let values: Vec<f64> = decoder.dispatch().map_err(grib_err)?.map(f64::from).collect();
            let found = (values.len(), 1);
            let values = Array2::from_shape_vec((nj, ni), values).map_err(|_| {
                DecodeError::ShapeMismatch {
                    expected: (nj, ni),
                    found,
                }
            })?;

            dataset = Some(ds.with_field(variable, values)?);
        }

        dataset.ok_or(DecodeError::NoRecognizedVariable)
    }
}

/// Map a GRIB2 (discipline, parameter category, parameter number) triple onto a variable.
pub(crate) fn identify_parameter(discipline: u8, category: u8, number: u8) -> Option<Variable> {
    use Variable::*;

    match (discipline, category, number) {
        (0, 0, 0) => Some(Temperature),
        (0, 1, 1) => Some(RelativeHumidity),
        (0, 2, 2) => Some(WindU),
        (0, 2, 3) => Some(WindV),
        (0, 3, 5) => Some(GeopotentialHeight),
        _ => None,
    }
}

// The grid points come in scan order, `ni` points along a row, `nj` rows. Regular lat/lon grids
// get latitude/longitude axes, anything else gets y/x axes read off the first column and row.
fn build_axes(
    template: u16,
    ni: usize,
    nj: usize,
    latlons: &[(f32, f32)],
) -> Result<GridDataset, DecodeError> {
    if ni == 0 || nj == 0 {
        return Err(DecodeError::EmptyAxis);
    }
    if latlons.len() != ni * nj {
        return Err(DecodeError::ShapeMismatch {
            expected: (nj, ni),
            found: (latlons.len(), 1),
        });
    }

    let row_values: Vec<f64> = (0..nj).map(|j| f64::from(latlons[j * ni].0)).collect();
    let col_values: Vec<f64> = (0..ni).map(|i| f64::from(latlons[i].1)).collect();

    let (row_name, col_name) = if template == REGULAR_LAT_LON_TEMPLATE {
        ("latitude", "longitude")
    } else {
        ("y", "x")
    };

    Ok(GridDataset::new(
        Axis::new(row_name, row_values),
        Axis::new(col_name, col_values),
    ))
}

fn grib_err<E: std::fmt::Display>(err: E) -> DecodeError {
    DecodeError::Grib(err.to_string())
}

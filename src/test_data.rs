//! Data used in tests.
use crate::grid::{Axis, GridDataset, Variable};
use ndarray::Array2;

/// A dataset on axes the coordinate accessor does not recognize.
pub fn bad_axes_dataset() -> GridDataset {
    GridDataset::new(
        Axis::new("rlat", vec![1.0, 0.0]),
        Axis::new("rlon", vec![0.0, 1.0]),
    )
    .with_field(Variable::Temperature, Array2::from_elem((2, 2), 273.15))
    .unwrap()
}

/// A 3 x 3 regular latitude/longitude dataset on 0..360 longitudes, one field whose value
/// encodes the cell: `100 * row + col`.
pub fn indexed_dataset(variable: Variable) -> GridDataset {
    let values = Array2::from_shape_fn((3, 3), |(r, c)| (100 * r + c) as f64);
    GridDataset::new(
        Axis::new("latitude", vec![46.0, 45.0, 44.0]),
        Axis::new("longitude", vec![284.0, 285.0, 286.0]),
    )
    .with_field(variable, values)
    .unwrap()
}

/// A complete GRIB2 message holding 850 hPa temperature on a 3 x 2 regular latitude/longitude
/// grid from 46N to 45N and 284E to 286E. The values are 280 K to 285 K in scan order, so the row
/// at 45N holds 283, 284 and 285 K.
pub fn grib2_temperature_message() -> Vec<u8> {
    fn section(number: u8, body: &[u8]) -> Vec<u8> {
        let mut sect = ((body.len() + 5) as u32).to_be_bytes().to_vec();
        sect.push(number);
        sect.extend_from_slice(body);
        sect
    }

    let mut identification = vec![];
    identification.extend_from_slice(&54u16.to_be_bytes()); // Montreal
    identification.extend_from_slice(&0u16.to_be_bytes());
    identification.extend_from_slice(&[2, 0, 1]);
    identification.extend_from_slice(&2025u16.to_be_bytes());
    identification.extend_from_slice(&[10, 18, 12, 0, 0, 0, 1]);

    let mut grid = vec![0];
    grid.extend_from_slice(&6u32.to_be_bytes());
    grid.extend_from_slice(&[0, 0]);
    grid.extend_from_slice(&0u16.to_be_bytes());
    grid.extend_from_slice(&[6, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    for val in &[3u32, 2, 0, 0xFFFF_FFFF, 46_000_000, 284_000_000] {
        grid.extend_from_slice(&val.to_be_bytes());
    }
    grid.push(0x30);
    for val in &[45_000_000u32, 286_000_000, 1_000_000, 1_000_000] {
        grid.extend_from_slice(&val.to_be_bytes());
    }
    grid.push(0);

    let mut product = vec![];
    product.extend_from_slice(&0u16.to_be_bytes());
    product.extend_from_slice(&0u16.to_be_bytes());
    product.extend_from_slice(&[0, 0, 2, 0, 0, 0, 0, 0, 1]);
    product.extend_from_slice(&0u32.to_be_bytes());
    product.extend_from_slice(&[100, 0]);
    product.extend_from_slice(&85_000u32.to_be_bytes());
    product.extend_from_slice(&[255, 0]);
    product.extend_from_slice(&0u32.to_be_bytes());

    // Simple packing, 8 bits per value on top of a 280 K reference.
    let mut representation = vec![];
    representation.extend_from_slice(&6u32.to_be_bytes());
    representation.extend_from_slice(&0u16.to_be_bytes());
    representation.extend_from_slice(&280.0f32.to_be_bytes());
    representation.extend_from_slice(&0u16.to_be_bytes());
    representation.extend_from_slice(&0u16.to_be_bytes());
    representation.extend_from_slice(&[8, 0]);

    let body: Vec<u8> = [
        section(1, &identification),
        section(3, &grid),
        section(4, &product),
        section(5, &representation),
        section(6, &[255]),
        section(7, &[0, 1, 2, 3, 4, 5]),
    ]
    .concat();

    let total = (16 + body.len() + 4) as u64;
    let mut msg = b"GRIB".to_vec();
    msg.extend_from_slice(&[0, 0, 0, 2]);
    msg.extend_from_slice(&total.to_be_bytes());
    msg.extend_from_slice(&body);
    msg.extend_from_slice(b"7777");
    msg
}

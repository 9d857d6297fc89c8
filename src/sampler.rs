//! Pull the value nearest a point out of one grid file.
use crate::{
    error::DecodeError,
    grid::{coordinate_accessor, GridSource, Variable},
    levels::LevelRecord,
};
use log::debug;
use metfor::{Celsius, Kelvin, Knots, Meters, Quantity};
use std::path::Path;

/// Conversion factor from m/s to knots.
pub const MPS_TO_KNOTS: f64 = 1.94384;

/// What one grid file contributed: the variables it carried, already in sounding units, at the
/// pressure level named in its file name.
#[derive(Debug, Clone, Copy)]
pub struct LevelSample {
    /// Pressure level in hPa.
    pub level: i32,
    /// Values found at that level.
    pub record: LevelRecord,
}

/// Extract the pressure level in hPa from a file name token like `ISBL_500` or `IsbL-0850`.
/// A level that is not positive is no level.
pub fn parse_level_token(file_name: &str) -> Option<i32> {
    ["ISBL_", "IsbL-"].iter().find_map(|tag| {
        file_name.match_indices(tag).find_map(|(start, _)| {
            let rest = &file_name[start + tag.len()..];
            let end = rest
                .char_indices()
                .find(|(_, c)| !c.is_ascii_digit())
                .map(|(i, _)| i)
                .unwrap_or_else(|| rest.len());
            rest[..end].parse::<i32>().ok().filter(|&level| level > 0)
        })
    })
}

/// Open one grid file, find the cell nearest `(lat, lon)` and read every recognized variable.
///
/// The file is closed before this returns, whether decoding succeeded or not.
pub fn sample_file<S>(
    source: &S,
    path: &Path,
    lat: f64,
    lon: f64,
) -> Result<LevelSample, DecodeError>
where
    S: GridSource + ?Sized,
{
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let level = parse_level_token(&file_name)
        .ok_or_else(|| DecodeError::MissingLevelToken(file_name.clone()))?;
    debug!("  Pressure level from filename: {} hPa", level);

    let ds = source.open(path)?;
    let accessor = coordinate_accessor(&ds)?;
    let (row, col) = accessor
        .nearest_cell(lat, lon)
        .ok_or(DecodeError::EmptyAxis)?;
    debug!(
        "  nearest cell ({}, {}) on {:?} axes",
        row,
        col,
        accessor.axis_names()
    );

    let mut record = LevelRecord::default();
    let mut found_any = false;
    for field in ds.fields() {
        let raw = match field.values.get((row, col)) {
            Some(v) => *v,
            None => continue,
        };
        found_any = true;

        if !raw.is_finite() {
            debug!("    {} is missing at the nearest cell", field.variable);
            continue;
        }

        let value = convert_units(field.variable, raw);
        debug!("    {}: {} -> {}", field.variable, raw, value);
        record.set(field.variable, value);
    }

    if !found_any {
        return Err(DecodeError::NoRecognizedVariable);
    }

    Ok(LevelSample { level, record })
}

/// Convert a raw grid value to sounding units: Celsius, RH fraction, knots, meters.
pub fn convert_units(variable: Variable, raw: f64) -> f64 {
    match variable {
        Variable::Temperature => Celsius::from(Kelvin(raw)).unpack(),
        Variable::RelativeHumidity => raw / 100.0,
        Variable::WindU | Variable::WindV => Knots(raw * MPS_TO_KNOTS).unpack(),
        Variable::GeopotentialHeight => Meters(raw).unpack(),
    }
}

use metfor::{Celsius, HectoPascal, Knots, Meters, WindSpdDir};

/// A copy of one level of a profile with the analysis defaults applied: a missing dew point
/// becomes the temperature less a fixed depression and a missing wind becomes the placeholder
/// wind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DataRow {
    /// Pressure in hPa
    pub pressure: HectoPascal,
    /// Geopotential Height in meters
    pub height: Meters,
    /// Temperature in C
    pub temperature: Celsius,
    /// Dew point in C
    pub dew_point: Celsius,
    /// Wind
    pub wind: WindSpdDir<Knots>,
}

//! Quantities computed from the sampled levels: dew point from temperature and relative humidity,
//! and a complete height profile.
//!
//! Nothing here is taken from the grid files directly; see `levels` for how those are collected.
use crate::{
    error::Result,
    interpolation::linear_interpolate_or_extrapolate,
    levels::LevelColumns,
    sounding::{Profile, StationInfo},
};
use itertools::{izip, Itertools};
use log::{debug, warn};
use metfor::{Celsius, HectoPascal, Kelvin, Meters, Quantity};
use optional::{none, some, Optioned};

// Bolton (1980) saturation vapor pressure over liquid water, hPa with T in C.
const ES_AT_ZERO: f64 = 6.112;
const ES_A: f64 = 17.67;
const ES_B: f64 = 243.5;

/// Gas constant for dry air used by the hydrostatic fallback, J/(kg K).
pub const R_DRY_AIR: f64 = 287.0;
/// Gravitational acceleration used by the hydrostatic fallback, m/s^2.
pub const GRAVITY: f64 = 9.81;

/// Saturation vapor pressure over liquid water.
#[inline]
pub fn saturation_vapor_pressure(temperature: Celsius) -> HectoPascal {
    let t = temperature.unpack();
    HectoPascal(ES_AT_ZERO * (ES_A * t / (t + ES_B)).exp())
}

/// Dew point from temperature and relative humidity as a fraction.
///
/// The vapor pressure is `rh * es(T)`, and the dew point is the temperature at which that is the
/// saturation vapor pressure. Relative humidity above 1 is treated as saturation. `None` if the
/// humidity is not positive or anything is non-finite.
///
/// # Examples
///
/// ```rust
/// use grib_sounding::derived::dew_point;
/// use metfor::Celsius;
///
/// let dp = dew_point(Celsius(20.0), 0.5).unwrap();
/// assert!(dp < Celsius(20.0));
///
/// assert_eq!(dew_point(Celsius(20.0), 0.0), None);
/// ```
pub fn dew_point(temperature: Celsius, relative_humidity: f64) -> Option<Celsius> {
    if !(temperature.unpack().is_finite() && relative_humidity.is_finite())
        || relative_humidity <= 0.0
    {
        return None;
    }

    let rh = relative_humidity.min(1.0);
    let vapor_pressure = rh * saturation_vapor_pressure(temperature).unpack();

    let ln_ratio = (vapor_pressure / ES_AT_ZERO).ln();
    let dp = ES_B * ln_ratio / (ES_A - ln_ratio);

    if dp.is_finite() {
        Some(Celsius(dp))
    } else {
        None
    }
}

/// Dew point at every level, missing where the relative humidity is missing or unusable.
pub fn dew_point_profile(
    temperature: &[Celsius],
    relative_humidity: &[Optioned<f64>],
) -> Vec<Optioned<Celsius>> {
    izip!(temperature, relative_humidity)
        .map(|(&t, rh)| {
            rh.into_option()
                .and_then(|rh| dew_point(t, rh))
                .map(some)
                .unwrap_or_else(none)
        })
        .collect()
}

/// How the heights in a profile were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightMethod {
    /// Every level had a height in the source.
    Observed,
    /// Gaps were filled linearly in pressure from the known heights.
    Interpolated,
    /// Too few heights were known, so all of them were integrated up from 0 m at the first
    /// level. Only as good as the assumption that the first level is the surface.
    Hydrostatic,
}

/// Heights by integrating the hypsometric equation upward from 0 m at the first level, using the
/// mean temperature of each layer.
pub fn hydrostatic_heights(pressure: &[HectoPascal], temperature: &[Celsius]) -> Vec<Meters> {
    debug_assert_eq!(pressure.len(), temperature.len());

    if pressure.is_empty() {
        return vec![];
    }

    let mut heights = Vec::with_capacity(pressure.len());
    heights.push(Meters(0.0));

    let mut current = 0.0;
    for ((&p_lower, &t_lower), (&p_upper, &t_upper)) in
        izip!(pressure, temperature).tuple_windows::<(_, _)>()
    {
        let t_avg = (Kelvin::from(t_lower).unpack() + Kelvin::from(t_upper).unpack()) / 2.0;
        current += R_DRY_AIR * t_avg / GRAVITY * (p_lower.unpack() / p_upper.unpack()).ln();
        heights.push(Meters(current));
    }

    heights
}

/// Fill in missing heights.
///
/// With at least two known heights the gaps are filled linearly in pressure, extrapolating off
/// the end segments. With fewer the whole profile comes from `hydrostatic_heights`.
pub fn fill_heights(
    pressure: &[HectoPascal],
    temperature: &[Celsius],
    height: &[Optioned<Meters>],
) -> (Vec<Meters>, HeightMethod) {
    debug_assert_eq!(pressure.len(), height.len());

    let known = height.iter().filter(|h| h.is_some()).count();

    if known == height.len() {
        let heights = height.iter().filter_map(|h| h.into_option()).collect();
        return (heights, HeightMethod::Observed);
    }

    if known >= 2 {
        let filled: Option<Vec<Meters>> = izip!(pressure, height)
            .map(|(&p, h)| {
                h.into_option().or_else(|| {
                    linear_interpolate_or_extrapolate(pressure, height, p).into_option()
                })
            })
            .collect();

        if let Some(filled) = filled {
            return (filled, HeightMethod::Interpolated);
        }
    }

    (
        hydrostatic_heights(pressure, temperature),
        HeightMethod::Hydrostatic,
    )
}

/// Turn the accumulated columns into a complete, validated profile.
pub fn build_profile(cols: LevelColumns, station: StationInfo) -> Result<Profile> {
    let dew_point = dew_point_profile(&cols.temperature, &cols.relative_humidity);
    debug!(
        "dew point derived at {} of {} levels",
        dew_point.iter().filter(|dp| dp.is_some()).count(),
        cols.len()
    );

    let (height, method) = fill_heights(&cols.pressure, &cols.temperature, &cols.height);
    match method {
        HeightMethod::Observed => debug!("all heights observed"),
        HeightMethod::Interpolated => debug!("missing heights interpolated in pressure"),
        HeightMethod::Hydrostatic => warn!(
            "fewer than two heights known, heights estimated hydrostatically from 0 m at {} hPa",
            cols.pressure[0].unpack()
        ),
    }

    Profile::new()
        .with_station_info(station)
        .with_pressure_profile(cols.pressure)
        .with_temperature_profile(cols.temperature)
        .with_dew_point_profile(dew_point)
        .with_wind_u_profile(cols.wind_u)
        .with_wind_v_profile(cols.wind_v)
        .with_height_profile(height)
        .validated()
}

//! The SHARPpy text sounding format.
//!
//! ```text
//! %TITLE%
//! GRIB2   251018/1200   45.0,-75.0
//!    LEVEL       HGHT       TEMP       DWPT       WDIR       WSPD
//! -------------------------------------------------------------------
//! %RAW%
//!  1000.00,     110.00,     20.00,     10.00,    270.00,      5.00
//! %END%
//! ```
//!
//! Missing values are written as `-9999.00`. A level whose wind components were absent in the
//! source gets that for both direction and speed, not the placeholder wind used for analysis.
use crate::{
    error::{Result, SoundingError},
    sounding::Profile,
};
use chrono::NaiveDateTime;
use metfor::{Celsius, HectoPascal, Knots, Meters, Quantity};
use optional::{none, some, Optioned};
use std::fmt::Write;

/// Value written for a missing number.
pub const MISSING_VALUE: f64 = -9999.0;

const TIME_FORMAT: &str = "%y%m%d/%H%M";
const COLUMN_HEADER: &str = "   LEVEL       HGHT       TEMP       DWPT       WDIR       WSPD";
const RULE: &str = "-------------------------------------------------------------------";

/// Render a profile as SHARPpy text, labelled with `valid_time`.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use grib_sounding::sharppy::to_sharppy_text;
/// # use grib_sounding::doctest::make_test_profile;
///
/// let prof = make_test_profile();
/// let vt = NaiveDate::from_ymd_opt(2025, 10, 18)
///     .and_then(|d| d.and_hms_opt(12, 0, 0))
///     .unwrap();
/// let text = to_sharppy_text(&prof, vt);
///
/// let mut lines = text.lines();
/// assert_eq!(lines.next(), Some("%TITLE%"));
/// assert_eq!(lines.next(), Some("GRIB2   251018/1200   45.0,-75.0"));
/// assert!(text.ends_with("%END%"));
/// ```
pub fn to_sharppy_text(profile: &Profile, valid_time: NaiveDateTime) -> String {
    let station = profile.station_info();
    let (lat, lon) = station.location().unwrap_or((MISSING_VALUE, MISSING_VALUE));

    let mut text = String::with_capacity(128 + 70 * profile.len());

    text.push_str("%TITLE%\n");
    // Writing into a String does not fail.
    let _ = writeln!(
        text,
        "{:>4}   {}   {:.1},{:.1}",
        station.code().unwrap_or(""),
        valid_time.format(TIME_FORMAT),
        lat,
        lon
    );
    text.push_str(COLUMN_HEADER);
    text.push('\n');
    text.push_str(RULE);
    text.push('\n');
    text.push_str("%RAW%\n");

    for idx in 0..profile.len() {
        let dew_point = profile.dew_point_profile()[idx]
            .into_option()
            .map_or(MISSING_VALUE, |dp| dp.unpack());
        let (direction, speed) = profile
            .observed_wind(idx)
            .map(|wind| (wind.direction, wind.speed.unpack()))
            .unwrap_or((MISSING_VALUE, MISSING_VALUE));

        let _ = writeln!(
            text,
            "{:8.2},  {:8.2},  {:8.2},  {:8.2},  {:8.2},  {:8.2}",
            profile.pressure_profile()[idx].unpack(),
            profile.height_profile()[idx].unpack(),
            profile.temperature_profile()[idx].unpack(),
            dew_point,
            direction,
            speed,
        );
    }

    text.push_str("%END%");
    text
}

/// One data line read back from the text format.
#[derive(Debug, Clone, Copy)]
pub struct RawRow {
    /// Pressure in hPa
    pub pressure: HectoPascal,
    /// Height in meters
    pub height: Optioned<Meters>,
    /// Temperature in C
    pub temperature: Optioned<Celsius>,
    /// Dew point in C
    pub dew_point: Optioned<Celsius>,
    /// Direction the wind blows from, degrees
    pub direction: Optioned<f64>,
    /// Wind speed
    pub speed: Optioned<Knots>,
}

/// A parsed text sounding.
#[derive(Debug, Clone)]
pub struct ParsedSounding {
    /// Location code from the title line.
    pub location: String,
    /// Valid time from the title line.
    pub valid_time: NaiveDateTime,
    /// Latitude and longitude from the title line.
    pub lat_lon: Option<(f64, f64)>,
    /// The data lines, in file order.
    pub rows: Vec<RawRow>,
}

/// Read text written by `to_sharppy_text`, or any SHARPpy text sounding with the same columns.
pub fn parse_sharppy_text(text: &str) -> Result<ParsedSounding> {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

    match lines.next() {
        Some("%TITLE%") => {}
        _ => return Err(format_err("missing %TITLE% marker")),
    }

    let title = lines
        .next()
        .ok_or_else(|| format_err("missing title line"))?;
    let (location, valid_time, lat_lon) = parse_title(title)?;

    // Skip the column header and rule.
    if !lines.any(|line| line == "%RAW%") {
        return Err(format_err("missing %RAW% marker"));
    }

    let mut rows = vec![];
    let mut terminated = false;
    for line in lines {
        if line == "%END%" {
            terminated = true;
            break;
        }
        rows.push(parse_row(line)?);
    }

    if !terminated {
        return Err(format_err("missing %END% marker"));
    }

    Ok(ParsedSounding {
        location,
        valid_time,
        lat_lon,
        rows,
    })
}

fn parse_title(title: &str) -> Result<(String, NaiveDateTime, Option<(f64, f64)>)> {
    let tokens: Vec<&str> = title.split_whitespace().collect();

    // The location code may be blank.
    let (location, time_str, coords) = match tokens.as_slice() {
        [loc, time, coords] => ((*loc).to_owned(), *time, *coords),
        [time, coords] => (String::new(), *time, *coords),
        _ => return Err(format_err(format!("malformed title line: {}", title))),
    };

    let valid_time = NaiveDateTime::parse_from_str(time_str, TIME_FORMAT)
        .map_err(|err| format_err(format!("bad valid time {}: {}", time_str, err)))?;

    let lat_lon = match coords.split(',').collect::<Vec<_>>().as_slice() {
        [lat, lon] => {
            let lat = parse_number(lat)?;
            let lon = parse_number(lon)?;
            if is_missing(lat) || is_missing(lon) {
                None
            } else {
                Some((lat, lon))
            }
        }
        _ => return Err(format_err(format!("bad coordinates: {}", coords))),
    };

    Ok((location, valid_time, lat_lon))
}

fn parse_row(line: &str) -> Result<RawRow> {
    let vals: Vec<f64> = line
        .split(',')
        .map(parse_number)
        .collect::<Result<Vec<f64>>>()?;

    if vals.len() != 6 {
        return Err(format_err(format!(
            "expected 6 columns, found {}: {}",
            vals.len(),
            line
        )));
    }

    if is_missing(vals[0]) {
        return Err(format_err(format!("missing pressure: {}", line)));
    }

    fn opt<T: optional::Noned + Copy>(val: f64, f: fn(f64) -> T) -> Optioned<T> {
        if is_missing(val) {
            none()
        } else {
            some(f(val))
        }
    }

    Ok(RawRow {
        pressure: HectoPascal(vals[0]),
        height: opt(vals[1], Meters),
        temperature: opt(vals[2], Celsius),
        dew_point: opt(vals[3], Celsius),
        direction: opt(vals[4], |v| v),
        speed: opt(vals[5], Knots),
    })
}

fn parse_number(token: &str) -> Result<f64> {
    let token = token.trim();
    token
        .parse::<f64>()
        .map_err(|_| format_err(format!("not a number: {:?}", token)))
}

#[inline]
fn is_missing(val: f64) -> bool {
    !val.is_finite() || (val - MISSING_VALUE).abs() < 0.5
}

fn format_err<S: Into<String>>(msg: S) -> SoundingError {
    SoundingError::Format(msg.into())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{sounding::doctest::make_test_profile, utility::test_tools::approx_equal};
    use chrono::NaiveDate;
    use itertools::izip;

    fn valid_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 18)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap()
    }

    fn test_profile() -> Profile {
        make_test_profile()
            .with_dew_point_profile(vec![
                some(Celsius(9.271)),
                some(Celsius(5.0)),
                none(),
                some(Celsius(-12.346)),
            ])
            .with_wind_u_profile(vec![some(Knots(10.0)), none(), some(Knots(-3.0)), none()])
            .with_wind_v_profile(vec![
                some(Knots(0.0)),
                some(Knots(4.0)),
                some(Knots(-4.0)),
                none(),
            ])
    }

    #[test]
    fn test_layout() {
        let text = to_sharppy_text(&test_profile(), valid_time());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "%TITLE%");
        assert_eq!(lines[1], "GRIB2   251018/1200   45.0,-75.0");
        assert_eq!(lines[2], COLUMN_HEADER);
        assert_eq!(lines[3].len(), 67);
        assert_eq!(lines[4], "%RAW%");
        assert_eq!(
            lines[5],
            " 1000.00,      0.00,     20.00,      9.27,    270.00,     10.00"
        );
        assert_eq!(
            lines[6],
            "  925.00,    700.00,     18.00,      5.00,  -9999.00,  -9999.00"
        );
        assert_eq!(
            lines[7],
            "  850.00,   1450.00,     10.00,  -9999.00,     36.87,      5.00"
        );
        assert_eq!(lines[9], "%END%");
        assert_eq!(lines.len(), 10);
    }

    #[test]
    fn test_short_location_is_padded() {
        let prof = test_profile().with_station_info(
            crate::sounding::StationInfo::new()
                .with_code("AB".to_owned())
                .with_lat_lon((45.04, -75.06)),
        );
        let text = to_sharppy_text(&prof, valid_time());
        assert_eq!(text.lines().nth(1), Some("  AB   251018/1200   45.0,-75.1"));
    }

    #[test]
    fn test_round_trip() {
        let prof = test_profile();
        let text = to_sharppy_text(&prof, valid_time());
        let parsed = parse_sharppy_text(&text).unwrap();

        assert_eq!(parsed.location, "GRIB2");
        assert_eq!(parsed.valid_time, valid_time());
        assert_eq!(parsed.lat_lon, Some((45.0, -75.0)));
        assert_eq!(parsed.rows.len(), prof.len());

        for (idx, row) in parsed.rows.iter().enumerate() {
            let p = prof.pressure_profile()[idx];
            let h = prof.height_profile()[idx];
            let t = prof.temperature_profile()[idx];
            assert!(approx_equal(row.pressure.unpack(), p.unpack(), 0.006));
            assert!(approx_equal(row.height.unwrap().unpack(), h.unpack(), 0.006));
            assert!(approx_equal(row.temperature.unwrap().unpack(), t.unpack(), 0.006));

            match prof.dew_point_profile()[idx].into_option() {
                Some(dp) => {
                    assert!(approx_equal(row.dew_point.unwrap().unpack(), dp.unpack(), 0.006))
                }
                None => assert!(row.dew_point.is_none()),
            }

            match prof.observed_wind(idx) {
                Some(wind) => {
                    assert!(approx_equal(row.direction.unwrap(), wind.direction, 0.006));
                    assert!(approx_equal(
                        row.speed.unwrap().unpack(),
                        wind.speed.unpack(),
                        0.006
                    ));
                }
                None => {
                    assert!(row.direction.is_none());
                    assert!(row.speed.is_none());
                }
            }
        }

        // The sentinel appears exactly where the source wind was missing.
        let missing_in_text: Vec<bool> = parsed.rows.iter().map(|r| r.speed.is_none()).collect();
        let missing_in_profile: Vec<bool> = izip!(prof.wind_u_profile(), prof.wind_v_profile())
            .map(|(u, v)| u.is_none() || v.is_none())
            .collect();
        assert_eq!(missing_in_text, missing_in_profile);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_sharppy_text(""),
            Err(SoundingError::Format(_))
        ));
        assert!(parse_sharppy_text("%TITLE%\nGRIB2 bad 45.0,-75.0\n%RAW%\n%END%").is_err());

        let good = to_sharppy_text(&test_profile(), valid_time());
        let unterminated = good.trim_end_matches("%END%");
        assert!(parse_sharppy_text(unterminated).is_err());

        let short_row = good.replace("  -9999.00,  -9999.00", "");
        assert!(parse_sharppy_text(&short_row).is_err());
    }
}

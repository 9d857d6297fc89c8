//! Data type and methods to store an assembled vertical profile.

use crate::{
    error::{Result, SoundingError},
    wind::{observed_wind, DEFAULT_WIND},
};
use itertools::{izip, Itertools};
use metfor::{Celsius, HectoPascal, Knots, Meters, Quantity, WindSpdDir};
use optional::Optioned;

pub use self::{data_row::DataRow, station_info::StationInfo};

/// Dew point depression in C used in place of a missing dew point.
pub const DEFAULT_DEW_POINT_DEPRESSION: f64 = 10.0;

/// A vertical profile at one point.
///
/// The variables are stored in parallel vectors ordered surface first, so pressure is strictly
/// decreasing along them. Temperature, pressure and height are always present. Dew point and the
/// wind components keep their missing state so the text output can tell "absent in the source"
/// apart from the defaults used for analysis.
#[derive(Clone, Debug, Default)]
pub struct Profile {
    // Station info
    station: StationInfo,

    // Profiles
    pressure: Vec<HectoPascal>,
    temperature: Vec<Celsius>,
    dew_point: Vec<Optioned<Celsius>>,
    wind_u: Vec<Optioned<Knots>>,
    wind_v: Vec<Optioned<Knots>>,
    height: Vec<Meters>,
}

// Missing values are stored as NaN, so the derived comparison would never find two profiles with
// a missing value equal.
impl PartialEq for Profile {
    fn eq(&self, other: &Self) -> bool {
        fn opt_eq<T>(left: &[Optioned<T>], right: &[Optioned<T>]) -> bool
        where
            T: optional::Noned + Copy + PartialEq,
        {
            left.len() == right.len()
                && izip!(left, right).all(|(l, r)| l.into_option() == r.into_option())
        }

        self.station == other.station
            && self.pressure == other.pressure
            && self.temperature == other.temperature
            && self.height == other.height
            && opt_eq(&self.dew_point, &other.dew_point)
            && opt_eq(&self.wind_u, &other.wind_u)
            && opt_eq(&self.wind_v, &other.wind_v)
    }
}

macro_rules! make_profile_setter {
    ($(#[$attr:meta])* => $name:tt, $inner_type:ty, $p_var:ident) => {
        $(#[$attr])*
        pub fn $name(self, profile: Vec<$inner_type>) -> Self {
            Self {$p_var: profile, ..self}
        }
    };
}

impl Profile {
    /// Create a new, empty profile. This is a proxy for default with a clearer name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use grib_sounding::Profile;
    ///
    /// let prof = Profile::new();
    /// assert!(prof.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Profile::default()
    }

    /// Builder function for setting the station info.
    #[inline]
    pub fn with_station_info(mut self, new_value: StationInfo) -> Self {
        self.station = new_value;
        self
    }

    /// Get the station info
    #[inline]
    pub fn station_info(&self) -> &StationInfo {
        &self.station
    }

    make_profile_setter!(
        /// Builder method for the pressure profile.
        ///
        /// # Examples
        /// ```rust
        /// use grib_sounding::Profile;
        /// use metfor::HectoPascal;
        ///
        /// let data = vec![1000.0, 925.0, 850.0, 700.0, 500.0, 300.0];
        /// let pressure_data: Vec<HectoPascal> = data.into_iter().map(HectoPascal).collect();
        ///
        /// let prof = Profile::new().with_pressure_profile(pressure_data);
        /// assert_eq!(prof.len(), 6);
        /// ```
        #[inline]
        => with_pressure_profile, HectoPascal, pressure
    );

    make_profile_setter!(
        /// Builder method for the temperature profile.
        #[inline]
        => with_temperature_profile, Celsius, temperature
    );

    make_profile_setter!(
        /// Builder method for the dew point profile.
        #[inline]
        => with_dew_point_profile, Optioned<Celsius>, dew_point
    );

    make_profile_setter!(
        /// Builder method for the U wind component profile.
        #[inline]
        => with_wind_u_profile, Optioned<Knots>, wind_u
    );

    make_profile_setter!(
        /// Builder method for the V wind component profile.
        #[inline]
        => with_wind_v_profile, Optioned<Knots>, wind_v
    );

    make_profile_setter!(
        /// Builder method for the geopotential height profile.
        #[inline]
        => with_height_profile, Meters, height
    );

    /// Get the pressure profile
    #[inline]
    pub fn pressure_profile(&self) -> &[HectoPascal] {
        &self.pressure
    }

    /// Get the temperature profile
    #[inline]
    pub fn temperature_profile(&self) -> &[Celsius] {
        &self.temperature
    }

    /// Get the dew point profile, without defaults.
    #[inline]
    pub fn dew_point_profile(&self) -> &[Optioned<Celsius>] {
        &self.dew_point
    }

    /// Get the U wind component profile
    #[inline]
    pub fn wind_u_profile(&self) -> &[Optioned<Knots>] {
        &self.wind_u
    }

    /// Get the V wind component profile
    #[inline]
    pub fn wind_v_profile(&self) -> &[Optioned<Knots>] {
        &self.wind_v
    }

    /// Get the geopotential height profile
    #[inline]
    pub fn height_profile(&self) -> &[Meters] {
        &self.height
    }

    /// Number of levels.
    #[inline]
    pub fn len(&self) -> usize {
        self.pressure.len()
    }

    /// True if the profile has no levels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pressure.is_empty()
    }

    /// Check that the profile is usable: at least one level, every vector the same length,
    /// pressure strictly decreasing and every stored number finite.
    pub fn validate(&self) -> Result<()> {
        let n = self.pressure.len();
        if n == 0 {
            return Err(SoundingError::InvalidProfile("no levels"));
        }

        if [
            self.temperature.len(),
            self.dew_point.len(),
            self.wind_u.len(),
            self.wind_v.len(),
            self.height.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err(SoundingError::InvalidProfile("profiles differ in length"));
        }

        if !self
            .pressure
            .iter()
            .tuple_windows::<(_, _)>()
            .all(|(p0, p1)| p0 > p1)
        {
            return Err(SoundingError::InvalidProfile(
                "pressure not strictly decreasing",
            ));
        }

        let finite = |val: f64| val.is_finite();
        let all_finite = izip!(&self.pressure, &self.temperature, &self.height)
            .all(|(p, t, h)| finite(p.unpack()) && finite(t.unpack()) && finite(h.unpack()))
            && self
                .dew_point
                .iter()
                .filter_map(|dp| dp.into_option())
                .all(|dp| finite(dp.unpack()));
        if !all_finite {
            return Err(SoundingError::InvalidProfile("non-finite value"));
        }

        Ok(())
    }

    /// Validate and return self, for the end of a builder chain.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use grib_sounding::Profile;
    /// use metfor::{Celsius, HectoPascal, Meters};
    /// use optional::none;
    ///
    /// let prof = Profile::new()
    ///     .with_pressure_profile(vec![HectoPascal(850.0), HectoPascal(1000.0)])
    ///     .with_temperature_profile(vec![Celsius(10.0), Celsius(20.0)])
    ///     .with_dew_point_profile(vec![none(), none()])
    ///     .with_wind_u_profile(vec![none(), none()])
    ///     .with_wind_v_profile(vec![none(), none()])
    ///     .with_height_profile(vec![Meters(1500.0), Meters(0.0)]);
    ///
    /// // Upside down!
    /// assert!(prof.validated().is_err());
    /// ```
    #[inline]
    pub fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    /// Dew point at a level, or the temperature less `DEFAULT_DEW_POINT_DEPRESSION` if the dew
    /// point is missing there.
    pub fn dew_point_or_default(&self, idx: usize) -> Option<Celsius> {
        let t = *self.temperature.get(idx)?;
        let dp = self.dew_point.get(idx).and_then(|dp| dp.into_option());

        Some(dp.unwrap_or_else(|| Celsius(t.unpack() - DEFAULT_DEW_POINT_DEPRESSION)))
    }

    /// The wind at a level, `None` if either component is missing or unusable.
    pub fn observed_wind(&self, idx: usize) -> Option<WindSpdDir<Knots>> {
        let u = *self.wind_u.get(idx)?;
        let v = *self.wind_v.get(idx)?;
        observed_wind(u, v)
    }

    /// The wind at a level with the placeholder wind substituted for missing components.
    #[inline]
    pub fn wind(&self, idx: usize) -> Option<WindSpdDir<Knots>> {
        if idx >= self.len() {
            return None;
        }
        Some(self.observed_wind(idx).unwrap_or(DEFAULT_WIND))
    }

    /// Get a row of data values from this profile, with defaults applied.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use metfor::{Celsius, HectoPascal, Knots};
    /// # use grib_sounding::doctest::make_test_profile;
    ///
    /// let prof = make_test_profile();
    ///
    /// let row = prof.data_row(0).unwrap(); // This is the surface
    /// assert_eq!(row.pressure, HectoPascal(1000.0));
    /// assert_eq!(row.temperature, Celsius(20.0));
    /// assert_eq!(row.dew_point, Celsius(10.0)); // Defaulted, there was no dew point.
    /// assert_eq!(row.wind.speed, Knots(5.0)); // Defaulted, there was no wind.
    ///
    /// assert!(prof.data_row(4).is_none()); // There weren't that many rows!
    /// ```
    pub fn data_row(&self, idx: usize) -> Option<DataRow> {
        Some(DataRow {
            pressure: *self.pressure.get(idx)?,
            height: *self.height.get(idx)?,
            temperature: *self.temperature.get(idx)?,
            dew_point: self.dew_point_or_default(idx)?,
            wind: self.wind(idx)?,
        })
    }

    /// Get a bottom up iterator over the data rows, surface first. This is the record handed to
    /// analysis and plotting.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use metfor::HectoPascal;
    /// # use grib_sounding::doctest::make_test_profile;
    ///
    /// let prof = make_test_profile();
    /// let pressures: Vec<HectoPascal> = prof.bottom_up().map(|row| row.pressure).collect();
    /// assert_eq!(pressures[0], HectoPascal(1000.0));
    /// assert_eq!(pressures.len(), 4);
    /// ```
    #[inline]
    pub fn bottom_up<'a>(&'a self) -> impl Iterator<Item = DataRow> + 'a {
        (0..self.len()).filter_map(move |idx| self.data_row(idx))
    }

    /// Get a top down iterator over the data rows, surface last.
    #[inline]
    pub fn top_down<'a>(&'a self) -> impl Iterator<Item = DataRow> + 'a {
        (0..self.len()).rev().filter_map(move |idx| self.data_row(idx))
    }
}

// Public so doc tests and benches can build a profile.
#[doc(hidden)]
pub mod doctest {
    use super::*;

    pub fn make_test_profile() -> super::Profile {
        use optional::none;

        let p = vec![1000.0, 925.0, 850.0, 700.0]
            .into_iter()
            .map(HectoPascal)
            .collect();
        let t = vec![20.0, 18.0, 10.0, 2.0].into_iter().map(Celsius).collect();
        let h = vec![0.0, 700.0, 1450.0, 3000.0]
            .into_iter()
            .map(Meters)
            .collect();

        Profile::new()
            .with_station_info(StationInfo::new_with_values("GRIB2", (45.0, -75.0)))
            .with_pressure_profile(p)
            .with_temperature_profile(t)
            .with_dew_point_profile(vec![none(); 4])
            .with_wind_u_profile(vec![none(); 4])
            .with_wind_v_profile(vec![none(); 4])
            .with_height_profile(h)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use optional::{none, some};

    #[test]
    fn test_profile() {
        let prof = doctest::make_test_profile();

        println!("prof = {:#?}", prof);
        assert!(prof.validate().is_ok());
        assert_eq!(prof.len(), 4);
        assert_eq!(prof.station_info().code(), Some("GRIB2"));
        assert_eq!(prof.bottom_up().count(), 4);
        assert_eq!(
            prof.top_down().next().map(|row| row.pressure),
            Some(HectoPascal(700.0))
        );
    }

    #[test]
    fn test_eq_with_missing_values() {
        let prof = doctest::make_test_profile();
        assert!(prof.dew_point_profile().iter().all(|dp| dp.is_none()));
        assert_eq!(prof, prof.clone());

        let other = prof
            .clone()
            .with_dew_point_profile(vec![some(Celsius(15.0)), none(), none(), none()]);
        assert_ne!(prof, other);
        assert_eq!(other, other.clone());

        let shorter = prof.clone().with_wind_u_profile(vec![none(); 3]);
        assert_ne!(prof, shorter);
    }

    #[test]
    fn test_validate() {
        let prof = doctest::make_test_profile();

        let short = prof.clone().with_height_profile(vec![Meters(0.0)]);
        assert!(matches!(
            short.validate(),
            Err(SoundingError::InvalidProfile(_))
        ));

        let repeated = prof.clone().with_pressure_profile(vec![
            HectoPascal(1000.0),
            HectoPascal(925.0),
            HectoPascal(925.0),
            HectoPascal(700.0),
        ]);
        assert!(repeated.validate().is_err());

        let hot = prof.with_temperature_profile(vec![
            Celsius(20.0),
            Celsius(std::f64::INFINITY),
            Celsius(10.0),
            Celsius(2.0),
        ]);
        assert!(hot.validate().is_err());

        assert!(Profile::new().validate().is_err());
    }

    #[test]
    fn test_defaults() {
        let prof = doctest::make_test_profile()
            .with_dew_point_profile(vec![some(Celsius(15.0)), none(), none(), none()])
            .with_wind_u_profile(vec![
                some(Knots(10.0)),
                some(Knots(std::f64::INFINITY)),
                none(),
                none(),
            ])
            .with_wind_v_profile(vec![some(Knots(0.0)), some(Knots(3.0)), none(), none()]);

        assert_eq!(prof.dew_point_or_default(0), Some(Celsius(15.0)));
        assert_eq!(prof.dew_point_or_default(1), Some(Celsius(8.0)));
        assert_eq!(prof.dew_point_or_default(4), None);

        assert!(prof.observed_wind(0).is_some());
        assert!(prof.observed_wind(1).is_none());

        let wind = prof.wind(1).unwrap();
        assert_eq!(wind.speed, Knots(5.0));
        assert_eq!(wind.direction, 270.0);
        assert!(prof.wind(4).is_none());
    }
}

mod data_row;
mod station_info;

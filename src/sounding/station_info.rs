/// Where a profile was taken: a short location code for the text title and the point the grids
/// were sampled at.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StationInfo {
    /// Location code, e.g. `GRIB2` or a station identifier.
    code: Option<String>,
    /// Latitude and longitude.
    location: Option<(f64, f64)>,
}

impl StationInfo {
    /// Create a new `StationInfo` object.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use grib_sounding::StationInfo;
    ///
    /// let stn = StationInfo::new_with_values("GRIB2", (45.0, -75.0));
    /// assert_eq!(stn.code(), Some("GRIB2"));
    ///
    /// let stn = StationInfo::new_with_values(None, Some((45.0, -75.0)));
    /// assert!(stn.code().is_none());
    /// assert_eq!(stn.location(), Some((45.0, -75.0)));
    /// ```
    #[inline]
    pub fn new_with_values<T, U>(code: T, location: U) -> Self
    where
        T: Into<Option<&'static str>>,
        U: Into<Option<(f64, f64)>>,
    {
        StationInfo {
            code: code.into().map(str::to_owned),
            location: location.into(),
        }
    }

    /// Create a new object with default values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use grib_sounding::StationInfo;
    ///
    /// assert!(StationInfo::new().code().is_none());
    /// assert!(StationInfo::new().location().is_none());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add a location code.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use grib_sounding::StationInfo;
    ///
    /// assert_eq!(StationInfo::new().with_code("KMSO".to_owned()).code(), Some("KMSO"));
    /// assert_eq!(StationInfo::new().with_code(Some("KMSO".to_owned())).code(), Some("KMSO"));
    /// ```
    #[inline]
    pub fn with_code<T>(mut self, code: T) -> Self
    where
        Option<String>: From<T>,
    {
        self.code = Option::from(code);
        self
    }

    /// Builder method to add a location.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use grib_sounding::StationInfo;
    ///
    /// assert_eq!(
    ///     StationInfo::new().with_lat_lon((45.0, -116.0)).location().unwrap(), (45.0, -116.0));
    /// ```
    #[inline]
    pub fn with_lat_lon<T>(mut self, coords: T) -> Self
    where
        Option<(f64, f64)>: From<T>,
    {
        self.location = Option::from(coords);
        self
    }

    /// Location code.
    #[inline]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Latitude and longitude.
    #[inline]
    pub fn location(&self) -> Option<(f64, f64)> {
        self.location
    }
}

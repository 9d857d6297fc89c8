//! Gather per-file samples into pressure levels.
//!
//! Each grid file contributes some variables at one pressure level. The accumulator keeps an
//! ordered map from level to a fixed-shape record where every field is either a value or
//! explicitly missing. When the files are exhausted the levels with a temperature are turned
//! into parallel columns ordered from the surface up (pressure descending).
use crate::{
    error::{Result, SoundingError},
    grid::Variable,
    sampler::LevelSample,
};
use log::debug;
use metfor::{Celsius, HectoPascal, Knots, Meters};
use optional::{some, Optioned};
use std::collections::BTreeMap;

/// The variables observed at one pressure level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelRecord {
    /// Temperature in C
    pub temperature: Optioned<Celsius>,
    /// Relative humidity as a fraction
    pub relative_humidity: Optioned<f64>,
    /// U wind component in knots
    pub wind_u: Optioned<Knots>,
    /// V wind component in knots
    pub wind_v: Optioned<Knots>,
    /// Geopotential height in meters
    pub height: Optioned<Meters>,
}

impl LevelRecord {
    /// Set one variable, the value is already in sounding units.
    pub fn set(&mut self, variable: Variable, value: f64) {
        match variable {
            Variable::Temperature => self.temperature = some(Celsius(value)),
            Variable::RelativeHumidity => self.relative_humidity = some(value),
            Variable::WindU => self.wind_u = some(Knots(value)),
            Variable::WindV => self.wind_v = some(Knots(value)),
            Variable::GeopotentialHeight => self.height = some(Meters(value)),
        }
    }

    /// Overlay the values present in `other`. Present values in `other` win.
    pub fn merge(&mut self, other: &LevelRecord) {
        macro_rules! overlay {
            ($field:ident) => {
                if other.$field.is_some() {
                    self.$field = other.$field;
                }
            };
        }

        overlay!(temperature);
        overlay!(relative_humidity);
        overlay!(wind_u);
        overlay!(wind_v);
        overlay!(height);
    }
}

/// Ordered map from pressure level (hPa) to what has been seen there so far.
#[derive(Debug, Clone, Default)]
pub struct LevelAccumulator {
    levels: BTreeMap<i32, LevelRecord>,
}

/// Parallel columns for the retained levels, pressure descending.
#[derive(Debug, Clone, Default)]
pub struct LevelColumns {
    /// Pressure in hPa
    pub pressure: Vec<HectoPascal>,
    /// Temperature in C, never missing.
    pub temperature: Vec<Celsius>,
    /// Relative humidity fraction
    pub relative_humidity: Vec<Optioned<f64>>,
    /// U wind in knots
    pub wind_u: Vec<Optioned<Knots>>,
    /// V wind in knots
    pub wind_v: Vec<Optioned<Knots>>,
    /// Height in meters
    pub height: Vec<Optioned<Meters>>,
}

impl LevelColumns {
    /// Number of levels.
    #[inline]
    pub fn len(&self) -> usize {
        self.pressure.len()
    }

    /// True if there are no levels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pressure.is_empty()
    }
}

impl LevelAccumulator {
    /// Create an empty accumulator.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one sample in. A value for a (level, variable) pair already seen is overwritten, so
    /// feed samples in a deterministic order.
    pub fn add(&mut self, sample: &LevelSample) {
        let entry = self.levels.entry(sample.level).or_default();
        entry.merge(&sample.record);
    }

    /// Number of distinct levels seen, with or without temperature.
    #[inline]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// The record at a level, if any sample reported it.
    #[inline]
    pub fn get(&self, level: i32) -> Option<&LevelRecord> {
        self.levels.get(&level)
    }

    /// Turn the levels into columns, surface first. Levels without temperature are dropped.
    ///
    /// Fails with `DataInsufficiency` if no level has a temperature.
    pub fn into_columns(self) -> Result<LevelColumns> {
        let mut cols = LevelColumns::default();

        for (level, rec) in self.levels.into_iter().rev() {
            let temperature = match rec.temperature.into_option() {
                Some(t) => t,
                None => {
                    debug!("  dropping {} hPa, no temperature", level);
                    continue;
                }
            };

            cols.pressure.push(HectoPascal(f64::from(level)));
            cols.temperature.push(temperature);
            cols.relative_humidity.push(rec.relative_humidity);
            cols.wind_u.push(rec.wind_u);
            cols.wind_v.push(rec.wind_v);
            cols.height.push(rec.height);
        }

        if cols.is_empty() {
            return Err(SoundingError::DataInsufficiency);
        }

        Ok(cols)
    }
}

impl Extend<LevelSample> for LevelAccumulator {
    fn extend<I: IntoIterator<Item = LevelSample>>(&mut self, iter: I) {
        for sample in iter {
            self.add(&sample);
        }
    }
}

use grib_sounding::{
    grid::{Axis, GridDataset},
    Config, MemorySource, Variable,
};
use ndarray::Array2;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// A directory of empty grid files on disk plus the decoded grids they stand for.
pub struct Fixture {
    pub dir: TempDir,
    pub source: MemorySource,
}

/// File name in the style of the RDPS per-level GRIB2 files.
pub fn file_name(variable: Variable, level: i32) -> String {
    let token = match variable {
        Variable::Temperature => "AirTemp",
        Variable::RelativeHumidity => "RelativeHumidity",
        Variable::WindU => "WindU",
        Variable::WindV => "WindV",
        Variable::GeopotentialHeight => "GeopotentialHeight",
    };
    format!(
        "20251018T12Z_MSC_RDPS_{}_IsbL-{:04}_RLatLon0.09_PT000H.grib2",
        token, level
    )
}

/// A configuration that reads every file in the fixtures and caches under `dir`.
pub fn config(dir: &TempDir) -> Config {
    Config::default()
        .with_max_files(100)
        .with_cache_dir(dir.path().join("cache"))
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("grids")).unwrap();

        Fixture {
            dir,
            source: MemorySource::new(),
        }
    }

    /// The directory holding the grid files.
    pub fn grids(&self) -> PathBuf {
        self.dir.path().join("grids")
    }

    /// Add a file with a value in grid units, the same everywhere.
    pub fn with_value(mut self, variable: Variable, level: i32, value: f64) -> Self {
        let name = file_name(variable, level);
        fs::write(self.grids().join(&name), b"").unwrap();
        self.source = self.source.with_uniform_field(name, variable, value);
        self
    }

    /// Add a file the source cannot sample.
    pub fn with_bad_axes(mut self, variable: Variable, level: i32) -> Self {
        let name = file_name(variable, level);
        fs::write(self.grids().join(&name), b"").unwrap();

        let ds = GridDataset::new(
            Axis::new("rlat", vec![0.0, 1.0]),
            Axis::new("rlon", vec![0.0, 1.0]),
        )
        .with_field(variable, Array2::zeros((2, 2)))
        .unwrap();
        self.source = self.source.with_dataset(name, ds);
        self
    }

    /// Add an unrelated file that is on disk only.
    pub fn with_other_file(self, name: &str) -> Self {
        fs::write(self.grids().join(name), b"").unwrap();
        self
    }

    /// A moist, calm lower troposphere with heights only at 1000 and 500 hPa.
    pub fn standard() -> Self {
        let levels = [
            (1000, 288.15, 80.0),
            (925, 283.15, 75.0),
            (850, 278.15, 70.0),
            (700, 268.15, 50.0),
            (500, 253.15, 30.0),
            (300, 228.15, 20.0),
        ];

        let mut fix = Fixture::new();
        for &(level, t, rh) in levels.iter() {
            fix = fix
                .with_value(Variable::Temperature, level, t)
                .with_value(Variable::RelativeHumidity, level, rh)
                .with_value(Variable::WindU, level, 5.0)
                .with_value(Variable::WindV, level, -5.0);
        }

        fix.with_value(Variable::GeopotentialHeight, 1000, 110.0)
            .with_value(Variable::GeopotentialHeight, 500, 5570.0)
    }
}

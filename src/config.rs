//! Settings for the resolver, the cache and the text output.
use crate::error::{Result, SoundingError};
use chrono::Duration;
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};

/// Default cap on the number of grid files read from a directory.
pub const DEFAULT_MAX_FILES: usize = 20;

/// Default freshness window of a cache entry, in seconds.
pub const DEFAULT_CACHE_MAX_AGE_SECS: i64 = 3600;

/// Runtime configuration. Every field has a default so a partial TOML file is fine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding one cache entry per fingerprint.
    pub cache_dir: PathBuf,
    /// Entries older than this are ignored.
    pub cache_max_age_secs: i64,
    /// Maximum number of candidate files taken from a directory.
    pub max_files: usize,
    /// File name substrings identifying the variables of interest.
    pub variable_tokens: Vec<String>,
    /// File extension of grid files, without the dot.
    pub extension: String,
    /// Location code written in the sounding title.
    pub location: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cache_dir: std::env::temp_dir().join("grib-sounding-cache"),
            cache_max_age_secs: DEFAULT_CACHE_MAX_AGE_SECS,
            max_files: DEFAULT_MAX_FILES,
            variable_tokens: [
                "AirTemp",
                "RelativeHumidity",
                "GeopotentialHeight",
                "WindU",
                "WindV",
            ]
            .iter()
            .map(|s| (*s).to_owned())
            .collect(),
            extension: "grib2".to_owned(),
            location: "GRIB2".to_owned(),
        }
    }
}

impl Config {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(text).map_err(|err| SoundingError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| SoundingError::Input {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Builder method for the cache directory.
    #[inline]
    pub fn with_cache_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Builder method for the location code.
    #[inline]
    pub fn with_location<S: Into<String>>(mut self, location: S) -> Self {
        self.location = location.into();
        self
    }

    /// Builder method for the directory file cap.
    #[inline]
    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    /// The cache freshness window.
    #[inline]
    pub fn cache_max_age(&self) -> Duration {
        Duration::seconds(self.cache_max_age_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.max_files == 0 {
            return Err(SoundingError::Config("max_files must be positive".to_owned()));
        }
        if self.cache_max_age_secs < 0 {
            return Err(SoundingError::Config(
                "cache_max_age_secs must not be negative".to_owned(),
            ));
        }
        if self.variable_tokens.is_empty() {
            return Err(SoundingError::Config(
                "at least one variable token is required".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg = Config::from_toml_str("max_files = 5\nlocation = \"CYOW\"\n").unwrap();

        assert_eq!(cfg.max_files, 5);
        assert_eq!(cfg.location, "CYOW");
        assert_eq!(cfg.extension, "grib2");
        assert_eq!(cfg.variable_tokens.len(), 5);
        assert_eq!(cfg.cache_max_age(), Duration::hours(1));
    }

    #[test]
    fn test_rejects_zero_file_cap() {
        assert!(Config::from_toml_str("max_files = 0").is_err());
        assert!(Config::from_toml_str("max_files = \"many\"").is_err());
    }
}

//! Error types for the grib-sounding crate.
use std::{io, path::PathBuf};
use thiserror::Error;

/// Error type for the crate.
#[derive(Debug, Error)]
pub enum SoundingError {
    /// The source path is missing or unreadable. Fatal to the whole run.
    #[error("Unable to read input {}: {source}", path.display())]
    Input {
        /// The location that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A single grid file could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
    /// No level with a temperature value survived filtering.
    #[error("No usable profile, no pressure level had a temperature value.")]
    DataInsufficiency,
    /// The profile arrays violate a structural invariant.
    #[error("Invalid profile: {0}")]
    InvalidProfile(&'static str),
    /// Forward an error from the cache layer.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
    /// Malformed sounding text.
    #[error("Invalid sounding text: {0}")]
    Format(String),
    /// Bad configuration file or value.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Shorthand for results.
pub type Result<T> = ::std::result::Result<T, SoundingError>;

/// Failure to sample one grid file. These are recovered by skipping the file.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file name carries no `ISBL_<n>` or `IsbL-<n>` token.
    #[error("no pressure level token in file name {0}")]
    MissingLevelToken(String),
    /// The file could not be opened.
    #[error("unable to open grid file: {0}")]
    Io(#[from] io::Error),
    /// The GRIB2 decoder rejected the file.
    #[error("GRIB2 decoding failed: {0}")]
    Grib(String),
    /// The dataset's axes are neither latitude/longitude nor y/x.
    #[error("unrecognized coordinate axes {0:?}")]
    UnknownAxes(Vec<String>),
    /// The dataset has an empty axis so there is no nearest cell.
    #[error("empty coordinate axis")]
    EmptyAxis,
    /// The grid shape does not agree with the axes.
    #[error("grid field shape {found:?} does not match axes {expected:?}")]
    ShapeMismatch {
        /// Shape implied by the axes (rows, columns).
        expected: (usize, usize),
        /// Shape of the decoded field.
        found: (usize, usize),
    },
    /// None of the recognized variables is present in the file.
    #[error("no recognized variable in grid file")]
    NoRecognizedVariable,
}

/// Cache failures. Always downgraded to a miss or a no-op by the cache manager.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Reading or writing the cache directory failed.
    #[error("cache I/O failure: {0}")]
    Io(#[from] io::Error),
    /// A cache entry could not be (de)serialized.
    #[error("corrupt cache entry: {0}")]
    Corrupt(#[from] serde_json::Error),
    /// The stored profile no longer satisfies the profile invariants.
    #[error("cached profile rejected: {0}")]
    Rejected(&'static str),
}

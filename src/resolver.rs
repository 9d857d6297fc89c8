//! Find the per-level grid files to process for a path.
//!
//! A single file is used as is. A directory is scanned for files with the configured extension
//! whose names carry one of the variable tokens. The scan is sorted by file name so the order,
//! and with it the tie-break between files reporting the same level and variable, is the same on
//! every platform.
use crate::{
    config::Config,
    error::{Result, SoundingError},
};
use log::{debug, info};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Resolve the ordered list of candidate grid files for `path`.
///
/// Zero matches is not an error here, the empty list flows through and is reported downstream
/// as a no-data condition.
pub fn resolve_grid_files(path: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    let input_error = |source| SoundingError::Input {
        path: path.to_path_buf(),
        source,
    };

    let meta = fs::metadata(path).map_err(input_error)?;
    if !meta.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut all_files: Vec<PathBuf> = fs::read_dir(path)
        .map_err(input_error)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| has_extension(p, &config.extension))
        .collect();
    all_files.sort();

    let total = all_files.len();
    let candidates: Vec<PathBuf> = all_files
        .into_iter()
        .filter(|p| matches_token(p, &config.variable_tokens))
        .take(config.max_files)
        .collect();

    info!(
        "Processing {} key grid files out of {} total in {}",
        candidates.len(),
        total,
        path.display()
    );
    for c in &candidates {
        debug!("  candidate {}", c.display());
    }

    Ok(candidates)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == extension)
        .unwrap_or(false)
}

fn matches_token(path: &Path, tokens: &[String]) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| tokens.iter().any(|tok| name.contains(tok.as_str())))
        .unwrap_or(false)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs::File;

    fn touch(dir: &Path, name: &str) {
        File::create(dir.join(name)).unwrap();
    }

    #[test]
    fn test_single_file() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "anything.bin");

        let file = dir.path().join("anything.bin");
        let files = resolve_grid_files(&file, &Config::default()).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_directory_filter_sort_and_cap() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "RDPS_WindV_IsbL-0500.grib2");
        touch(dir.path(), "RDPS_AirTemp_IsbL-1000.grib2");
        touch(dir.path(), "RDPS_Snow_Sfc.grib2");
        touch(dir.path(), "RDPS_AirTemp_IsbL-0850.grib2");
        touch(dir.path(), "RDPS_AirTemp_IsbL-0700.txt");

        let files = resolve_grid_files(dir.path(), &Config::default()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "RDPS_AirTemp_IsbL-0850.grib2",
                "RDPS_AirTemp_IsbL-1000.grib2",
                "RDPS_WindV_IsbL-0500.grib2",
            ]
        );

        let capped = resolve_grid_files(dir.path(), &Config::default().with_max_files(2)).unwrap();
        assert_eq!(capped.len(), 2);
        assert_eq!(capped[..], files[..2]);
    }

    #[test]
    fn test_missing_path_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let res = resolve_grid_files(&dir.path().join("nope"), &Config::default());
        assert!(matches!(res, Err(SoundingError::Input { .. })));
    }

    #[test]
    fn test_empty_directory_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_grid_files(dir.path(), &Config::default())
            .unwrap()
            .is_empty());
    }
}

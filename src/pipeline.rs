//! From a path and a point to a finished profile.
//!
//! `assemble_profile` is the whole pipeline with no caching: resolve the grid files, sample each
//! one at the point, gather the samples into levels and derive the rest. `load_profile` puts the
//! disk cache in front of it.
use crate::{
    cache::{fingerprint_files, DiskCache},
    config::Config,
    derived::build_profile,
    error::Result,
    grid::GridSource,
    levels::LevelAccumulator,
    resolver::resolve_grid_files,
    sampler::sample_file,
    sounding::{Profile, StationInfo},
};
use log::{debug, info, warn};
use metfor::Quantity;
use std::path::{Path, PathBuf};

/// Whether `load_profile` found the profile in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// The profile came from the cache.
    Hit,
    /// The profile was assembled from the grid files.
    Miss,
}

/// Assemble the profile at `(lat, lon)` from the grid file or directory at `path`.
///
/// Grid files that cannot be sampled are logged and skipped. Fails with `Input` if `path` does
/// not exist and with `DataInsufficiency` if no level ends up with a temperature.
pub fn assemble_profile<S>(
    source: &S,
    path: &Path,
    lat: f64,
    lon: f64,
    config: &Config,
) -> Result<Profile>
where
    S: GridSource + ?Sized,
{
    let files = resolve_grid_files(path, config)?;
    assemble_from_files(source, &files, lat, lon, config)
}

/// Same as `assemble_profile`, but return a fresh cached profile if there is one and cache the
/// result otherwise.
pub fn load_profile<S>(
    source: &S,
    cache: &DiskCache,
    path: &Path,
    lat: f64,
    lon: f64,
    config: &Config,
) -> Result<(Profile, CacheStatus)>
where
    S: GridSource + ?Sized,
{
    let files = resolve_grid_files(path, config)?;
    let fingerprint = fingerprint_files(path, lat, lon, &config.location, &files);
    debug!("fingerprint {}", fingerprint);

    if let Some(profile) = cache.lookup(&fingerprint) {
        info!("Using cached profile {}", fingerprint);
        return Ok((profile, CacheStatus::Hit));
    }

    let profile = assemble_from_files(source, &files, lat, lon, config)?;
    cache.store(&fingerprint, &profile);

    Ok((profile, CacheStatus::Miss))
}

fn assemble_from_files<S>(
    source: &S,
    files: &[PathBuf],
    lat: f64,
    lon: f64,
    config: &Config,
) -> Result<Profile>
where
    S: GridSource + ?Sized,
{
    let mut acc = LevelAccumulator::new();
    let mut skipped = 0;

    for file in files {
        debug!("Processing {}", file.display());
        match sample_file(source, file, lat, lon) {
            Ok(sample) => acc.add(&sample),
            Err(err) => {
                warn!("skipping {}: {}", file.display(), err);
                skipped += 1;
            }
        }
    }

    info!(
        "Sampled {} of {} files, {} pressure levels",
        files.len() - skipped,
        files.len(),
        acc.level_count()
    );

    let cols = acc.into_columns()?;
    let station = StationInfo::new()
        .with_code(config.location.clone())
        .with_lat_lon((lat, lon));

    let profile = build_profile(cols, station)?;
    info!(
        "Profile has {} levels from {} to {} hPa",
        profile.len(),
        profile.pressure_profile()[0].unpack(),
        profile.pressure_profile()[profile.len() - 1].unpack()
    );

    Ok(profile)
}

//! On-disk cache of assembled profiles, keyed by a fingerprint of the inputs.
//!
//! Decoding a directory of grids is the expensive part of building a profile, so a finished
//! profile is stored as one JSON file per fingerprint. The fingerprint covers the source path, the
//! target point and the modification time of every candidate grid file, so touching any of them
//! changes the key. Entries older than the freshness window are ignored but never deleted here.
//!
//! Nothing in this module fails the caller. Unreadable, corrupt, stale or mismatched entries are
//! misses and failed writes are logged and dropped.
use crate::{
    config::Config,
    error::{CacheError, Result, SoundingError},
    resolver::resolve_grid_files,
    sounding::{Profile, StationInfo},
};
use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use metfor::{Celsius, HectoPascal, Knots, Meters, Quantity};
use optional::{none, some, Optioned};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    time::UNIX_EPOCH,
};

/// Hex encoded SHA-256 digest identifying one set of inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// The hex digest.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fingerprint the inputs of one pipeline run, resolving the candidate files with `config`.
///
/// Fails only if the path does not exist.
pub fn fingerprint(path: &Path, lat: f64, lon: f64, config: &Config) -> Result<Fingerprint> {
    let files = resolve_grid_files(path, config)?;
    Ok(fingerprint_files(path, lat, lon, &config.location, &files))
}

/// Fingerprint the inputs given an already resolved list of candidate files. The location code
/// is part of the key since it is stored with the profile.
pub fn fingerprint_files(
    path: &Path,
    lat: f64,
    lon: f64,
    location: &str,
    files: &[PathBuf],
) -> Fingerprint {
    let mut hasher = Sha256::new();

    let normalized = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    hasher.update(normalized.to_string_lossy().as_bytes());
    hasher.update(b"\0");
    hasher.update(lat.to_bits().to_le_bytes());
    hasher.update(lon.to_bits().to_le_bytes());
    hasher.update(location.as_bytes());

    for file in files {
        hasher.update(b"\0");
        hasher.update(file.to_string_lossy().as_bytes());
        hasher.update(b"\0");
        match modified_nanos(file) {
            Some(nanos) => hasher.update(nanos.to_le_bytes()),
            None => hasher.update(b"?"),
        }
    }

    Fingerprint(format!("{:x}", hasher.finalize()))
}

fn modified_nanos(path: &Path) -> Option<u128> {
    let modified = fs::metadata(path).and_then(|md| md.modified()).ok()?;
    modified
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|elapsed| elapsed.as_nanos())
}

/// What is written to disk for one fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Key the entry was stored under.
    pub fingerprint: Fingerprint,
    /// When the entry was written.
    pub created: DateTime<Utc>,
    /// The profile.
    pub profile: CachedProfile,
}

/// Serializable copy of a `Profile`. Missing values are `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedProfile {
    /// Location code
    pub location: Option<String>,
    /// Latitude and longitude
    pub lat_lon: Option<(f64, f64)>,
    /// Pressure in hPa
    pub pressure: Vec<f64>,
    /// Temperature in C
    pub temperature: Vec<f64>,
    /// Dew point in C
    pub dew_point: Vec<Option<f64>>,
    /// U wind in knots
    pub wind_u: Vec<Option<f64>>,
    /// V wind in knots
    pub wind_v: Vec<Option<f64>>,
    /// Height in meters
    pub height: Vec<f64>,
}

fn unpack_opt<T: Quantity + optional::Noned + Copy>(vals: &[Optioned<T>]) -> Vec<Option<f64>> {
    vals.iter()
        .map(|v| v.into_option().map(|v| v.unpack()).filter(|v| v.is_finite()))
        .collect()
}

fn pack_opt<T>(vals: Vec<Option<f64>>, f: fn(f64) -> T) -> Vec<Optioned<T>>
where
    T: optional::Noned + Copy,
{
    vals.into_iter()
        .map(|v| v.map(|v| some(f(v))).unwrap_or_else(none))
        .collect()
}

impl From<&Profile> for CachedProfile {
    fn from(profile: &Profile) -> Self {
        let station = profile.station_info();

        CachedProfile {
            location: station.code().map(str::to_owned),
            lat_lon: station.location(),
            pressure: profile.pressure_profile().iter().map(|p| p.unpack()).collect(),
            temperature: profile.temperature_profile().iter().map(|t| t.unpack()).collect(),
            dew_point: unpack_opt(profile.dew_point_profile()),
            wind_u: unpack_opt(profile.wind_u_profile()),
            wind_v: unpack_opt(profile.wind_v_profile()),
            height: profile.height_profile().iter().map(|h| h.unpack()).collect(),
        }
    }
}

impl CachedProfile {
    /// Rebuild the profile, rejecting it if it breaks the profile invariants.
    pub fn into_profile(self) -> std::result::Result<Profile, CacheError> {
        let station = StationInfo::new()
            .with_code(self.location)
            .with_lat_lon(self.lat_lon);

        Profile::new()
            .with_station_info(station)
            .with_pressure_profile(self.pressure.into_iter().map(HectoPascal).collect())
            .with_temperature_profile(self.temperature.into_iter().map(Celsius).collect())
            .with_dew_point_profile(pack_opt(self.dew_point, Celsius))
            .with_wind_u_profile(pack_opt(self.wind_u, Knots))
            .with_wind_v_profile(pack_opt(self.wind_v, Knots))
            .with_height_profile(self.height.into_iter().map(Meters).collect())
            .validated()
            .map_err(|err| match err {
                SoundingError::InvalidProfile(msg) => CacheError::Rejected(msg),
                _ => CacheError::Rejected("invalid profile"),
            })
    }
}

/// A directory of cache entries with a freshness window.
#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
    max_age: Duration,
}

impl DiskCache {
    /// Create a cache in `dir`. The directory is created on the first store.
    pub fn new<P: Into<PathBuf>>(dir: P, max_age: Duration) -> Self {
        DiskCache {
            dir: dir.into(),
            max_age,
        }
    }

    /// Create a cache with the directory and freshness window from the configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cache_dir.clone(), config.cache_max_age())
    }

    /// The cache directory.
    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the entry for a fingerprint lives.
    pub fn entry_path(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.dir.join(format!("{}.json", fingerprint))
    }

    /// The stored profile for `fingerprint` if there is a fresh, valid entry.
    #[inline]
    pub fn lookup(&self, fingerprint: &Fingerprint) -> Option<Profile> {
        self.lookup_at(fingerprint, Utc::now())
    }

    /// Same as `lookup` with the current time supplied.
    pub fn lookup_at(&self, fingerprint: &Fingerprint, now: DateTime<Utc>) -> Option<Profile> {
        match self.try_lookup(fingerprint, now) {
            Ok(Some(profile)) => {
                debug!("cache hit for {}", fingerprint);
                Some(profile)
            }
            Ok(None) => None,
            Err(err) => {
                warn!("cache entry for {} unusable: {}", fingerprint, err);
                None
            }
        }
    }

    /// Store a profile under `fingerprint`, replacing any older entry. Returns `false` if the
    /// entry could not be written.
    #[inline]
    pub fn store(&self, fingerprint: &Fingerprint, profile: &Profile) -> bool {
        self.store_at(fingerprint, profile, Utc::now())
    }

    /// Same as `store` with the creation time supplied.
    pub fn store_at(
        &self,
        fingerprint: &Fingerprint,
        profile: &Profile,
        created: DateTime<Utc>,
    ) -> bool {
        match self.try_store(fingerprint, profile, created) {
            Ok(()) => {
                debug!("cached profile as {}", self.entry_path(fingerprint).display());
                true
            }
            Err(err) => {
                warn!("unable to cache profile {}: {}", fingerprint, err);
                false
            }
        }
    }

    fn try_lookup(
        &self,
        fingerprint: &Fingerprint,
        now: DateTime<Utc>,
    ) -> std::result::Result<Option<Profile>, CacheError> {
        let path = self.entry_path(fingerprint);
        if !path.exists() {
            debug!("cache miss for {}", fingerprint);
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let entry: CacheEntry = serde_json::from_slice(&bytes)?;

        if &entry.fingerprint != fingerprint {
            debug!("cache entry {} holds {}", path.display(), entry.fingerprint);
            return Ok(None);
        }

        let age = now.signed_duration_since(entry.created);
        if age < Duration::zero() {
            debug!(
                "cache entry for {} was created in the future, {}",
                fingerprint, entry.created
            );
            return Ok(None);
        }
        if age >= self.max_age {
            debug!(
                "cache entry for {} is stale, {} s old",
                fingerprint,
                age.num_seconds()
            );
            return Ok(None);
        }

        entry.profile.into_profile().map(Some)
    }

    fn try_store(
        &self,
        fingerprint: &Fingerprint,
        profile: &Profile,
        created: DateTime<Utc>,
    ) -> std::result::Result<(), CacheError> {
        fs::create_dir_all(&self.dir)?;

        let entry = CacheEntry {
            fingerprint: fingerprint.clone(),
            created,
            profile: CachedProfile::from(profile),
        };
        let bytes = serde_json::to_vec(&entry)?;

        // Readers never see a half written entry.
        let path = self.entry_path(fingerprint);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, &bytes)?;
        fs::rename(&tmp_path, &path)?;

        Ok(())
    }
}

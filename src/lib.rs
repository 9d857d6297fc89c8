#![warn(missing_docs)]
/*!
Assemble atmospheric soundings from per-level GRIB2 model output.

Model output often comes as one file per variable per pressure level. Given a file or a directory
of them and a point, this crate samples the nearest grid cell in every file, gathers the values
by pressure level, derives dew point and height, and produces a `Profile` ordered from the
surface up. The profile can be written in the SHARPpy text format and is cached on disk, keyed
by a fingerprint of the inputs, so repeated requests skip the decoding.

```rust,no_run
use grib_sounding::{load_profile, Config, DiskCache, Grib2Source};
use std::path::Path;

let config = Config::default();
let cache = DiskCache::from_config(&config);
let (profile, _status) =
    load_profile(&Grib2Source, &cache, Path::new("/data/rdps"), 45.4, -75.7, &config)?;

for row in profile.bottom_up() {
    println!("{:?}", row);
}
# Ok::<(), grib_sounding::SoundingError>(())
```
*/

//
// API
//
pub use crate::{
    cache::{fingerprint, CacheEntry, CachedProfile, DiskCache, Fingerprint},
    config::Config,
    error::{CacheError, DecodeError, Result, SoundingError},
    grid::{GridDataset, GridSource, Grib2Source, MemorySource, Variable},
    interpolation::linear_interpolate_or_extrapolate,
    pipeline::{assemble_profile, load_profile, CacheStatus},
    sharppy::{parse_sharppy_text, to_sharppy_text, ParsedSounding},
    sounding::{DataRow, Profile, StationInfo, DEFAULT_DEW_POINT_DEPRESSION},
    wind::{wind_speed_direction, DEFAULT_WIND},
};

#[doc(hidden)]
pub use crate::sounding::doctest;

pub mod cache;
pub mod config;
pub mod derived;
pub mod grid;
pub mod levels;
pub mod resolver;
pub mod sampler;
pub mod sharppy;
pub mod wind;

//
// Internal use only
//

// Modules
mod error;
mod interpolation;
mod pipeline;
mod sounding;
#[cfg(test)]
mod test_data;
mod utility;

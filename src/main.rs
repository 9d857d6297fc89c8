use chrono::Utc;
use clap::Parser;
use grib_sounding::{
    assemble_profile, load_profile, to_sharppy_text, CacheStatus, Config, DiskCache, Grib2Source,
    Profile, SoundingError,
};
use itertools::Itertools;
use log::{error, info};
use metfor::Quantity;
use std::{fs, path::PathBuf};

/// Build a sounding at a point from per-level GRIB2 files and write it as SHARPpy text.
#[derive(Debug, Parser)]
#[command(name = "grib-sounding", version)]
struct Args {
    /// A GRIB2 file or a directory of per-level GRIB2 files.
    path: PathBuf,

    /// Latitude of the sounding, decimal degrees.
    #[arg(allow_negative_numbers = true)]
    lat: f64,

    /// Longitude of the sounding, decimal degrees.
    #[arg(allow_negative_numbers = true)]
    lon: f64,

    /// Write the sounding here instead of to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Location code for the sounding title.
    #[arg(short, long)]
    location: Option<String>,

    /// Always rebuild the profile, neither reading nor writing the cache.
    #[arg(long)]
    no_cache: bool,
}

fn main() {
    pretty_env_logger::init();

    let args = Args::parse();

    if let Err(err) = run(args) {
        error!("{}", err);
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), SoundingError> {
    let mut config = match args.config {
        Some(ref path) => Config::from_toml_file(path)?,
        None => Config::default(),
    };
    if let Some(location) = args.location {
        config = config.with_location(location);
    }

    info!(
        "Building sounding at {}, {} from {}",
        args.lat,
        args.lon,
        args.path.display()
    );

    let profile = if args.no_cache {
        assemble_profile(&Grib2Source, &args.path, args.lat, args.lon, &config)?
    } else {
        let cache = DiskCache::from_config(&config);
        let (profile, status) =
            load_profile(&Grib2Source, &cache, &args.path, args.lat, args.lon, &config)?;
        if status == CacheStatus::Hit {
            info!("Profile loaded from cache in {}", cache.dir().display());
        }
        profile
    };

    log_summary(&profile);

    let text = to_sharppy_text(&profile, Utc::now().naive_utc());
    match args.output {
        Some(path) => {
            fs::write(&path, &text).map_err(|source| SoundingError::Input {
                path: path.clone(),
                source,
            })?;
            info!("Sounding written to {}", path.display());
        }
        None => println!("{}", text),
    }

    Ok(())
}

fn log_summary(profile: &Profile) {
    let range = |vals: Vec<f64>| match vals.iter().cloned().minmax().into_option() {
        Some((min, max)) => format!("{:.1} to {:.1}", min, max),
        None => "n/a".to_owned(),
    };

    info!("Profile summary:");
    info!("  Levels: {}", profile.len());
    info!(
        "  Pressure: {} hPa",
        range(profile.pressure_profile().iter().map(|p| p.unpack()).collect())
    );
    info!(
        "  Temperature: {} C",
        range(profile.temperature_profile().iter().map(|t| t.unpack()).collect())
    );
    info!(
        "  Height: {} m",
        range(profile.height_profile().iter().map(|h| h.unpack()).collect())
    );
    info!(
        "  Dew point: {} of {} levels derived",
        profile
            .dew_point_profile()
            .iter()
            .filter(|dp| dp.is_some())
            .count(),
        profile.len()
    );
}

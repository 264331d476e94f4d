//! Constellation Tool CLI
//!
//! Usage:
//!   constellation-tool synthesize --count 15 --altitude-km 15000 --inclination-deg 55 \
//!                                 --prefix Ben --output tleFiles/Ben.txt
//!   constellation-tool scan --catalog tleFiles/GPS.txt --lat 32.08 --lon 34.78 \
//!                           --min-elevation 10 --output visibleSats.csv
//!   constellation-tool relay --catalog tleFiles/GPS.txt --relay tleFiles/relay.txt \
//!                            --output visibleSatsForSat.csv
//!   constellation-tool summary --input visibleSatsForSat.csv

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use constellation_tool::{commands, loader, ToolConfig};
use orbital_mechanics::codec::parse_timestamp;
use orbital_mechanics::{ElevationConvention, GeodeticPosition};
use visibility_scanner::report::{
    write_aggregate_csv, write_detail_csv, write_ground_track_csv, write_json, write_route_csv,
};
use visibility_scanner::FailurePolicy;

#[derive(Parser, Debug)]
#[command(
    name = "constellation-tool",
    about = "Synthesize satellite constellations and scan their visibility"
)]
struct Cli {
    /// JSON config file; flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write an evenly phased single-shell constellation
    Synthesize {
        #[arg(long)]
        count: usize,
        #[arg(long)]
        altitude_km: f64,
        #[arg(long)]
        inclination_deg: f64,
        /// Epoch (RFC 3339); defaults to now
        #[arg(long)]
        epoch: Option<String>,
        /// Object name prefix
        #[arg(long)]
        prefix: Option<String>,
        /// First catalog number
        #[arg(long)]
        base_catalog_number: Option<u32>,
        /// Write JSON element sets instead of element-set text
        #[arg(long)]
        json: bool,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Count catalog objects inside an elevation band from a ground site
    Scan {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long, default_value_t = 0.0)]
        alt_km: f64,
        #[command(flatten)]
        band: BandArgs,
        #[command(flatten)]
        grid: GridArgs,
        #[arg(short, long, default_value = "visibleSats.csv")]
        output: PathBuf,
    },
    /// List catalog objects inside an elevation band from a relay satellite
    Relay {
        #[arg(long)]
        catalog: PathBuf,
        /// Element file holding the relay satellite
        #[arg(long)]
        relay: PathBuf,
        /// Relay object name; first entry when omitted
        #[arg(long)]
        relay_name: Option<String>,
        #[command(flatten)]
        band: BandArgs,
        #[command(flatten)]
        grid: GridArgs,
        #[arg(short, long, default_value = "visibleSatsForSat.csv")]
        output: PathBuf,
    },
    /// Position series of one object
    Route {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        grid: GridArgs,
        #[arg(short, long, default_value = "satRoute.csv")]
        output: PathBuf,
    },
    /// Continuous ground track of one object
    Track {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        grid: GridArgs,
        #[arg(short, long, default_value = "groundTrack.csv")]
        output: PathBuf,
    },
    /// Sub-satellite points of a catalog at one instant (JSON on stdout)
    Snapshot {
        #[arg(long)]
        catalog: PathBuf,
        /// Instant (RFC 3339); defaults to now
        #[arg(long)]
        at: Option<String>,
    },
    /// Visible count per instant of a relay report
    Summary {
        #[arg(short, long, default_value = "visibleSatsForSat.csv")]
        input: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ConventionArg {
    Nadir,
    Horizon,
}

impl From<ConventionArg> for ElevationConvention {
    fn from(arg: ConventionArg) -> Self {
        match arg {
            ConventionArg::Nadir => ElevationConvention::Nadir,
            ConventionArg::Horizon => ElevationConvention::Horizon,
        }
    }
}

#[derive(Args, Debug)]
struct BandArgs {
    /// Minimum elevation in degrees
    #[arg(long, allow_hyphen_values = true)]
    min_elevation: Option<f64>,
    /// Maximum elevation in degrees
    #[arg(long, allow_hyphen_values = true)]
    max_elevation: Option<f64>,
    #[arg(long, value_enum)]
    convention: Option<ConventionArg>,
    /// Stop at the first object that cannot be propagated
    #[arg(long)]
    abort_on_failure: bool,
}

impl BandArgs {
    fn apply(&self, config: &mut ToolConfig) {
        if let Some(min) = self.min_elevation {
            config.min_elevation_deg = min;
        }
        if let Some(max) = self.max_elevation {
            config.max_elevation_deg = max;
        }
        if let Some(convention) = self.convention {
            config.convention = Some(convention.into());
        }
        if self.abort_on_failure {
            config.failure_policy = FailurePolicy::Abort;
        }
    }
}

#[derive(Args, Debug)]
struct GridArgs {
    /// UTC calendar day to sample (YYYY-MM-DD); today when neither this nor --start is set
    #[arg(long, conflicts_with = "start")]
    date: Option<NaiveDate>,
    /// First instant (RFC 3339)
    #[arg(long)]
    start: Option<String>,
    /// Seconds between instants
    #[arg(long)]
    step_seconds: Option<i64>,
    /// Number of instants
    #[arg(long)]
    samples: Option<usize>,
}

impl GridArgs {
    fn start(&self) -> Result<DateTime<Utc>> {
        match (&self.start, self.date) {
            (Some(text), _) => Ok(parse_timestamp(text)?),
            (None, Some(date)) => Ok(midnight(date)),
            (None, None) => Ok(midnight(Utc::now().date_naive())),
        }
    }

    fn apply(&self, config: &mut ToolConfig) {
        if let Some(step) = self.step_seconds {
            config.step_seconds = step;
        }
        if let Some(samples) = self.samples {
            config.samples = samples;
        }
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    visibility_scanner::TimeGrid::day(date).start()
}

fn instant_or_now(text: Option<&str>) -> Result<DateTime<Utc>> {
    match text {
        Some(text) => Ok(parse_timestamp(text)?),
        None => Ok(Utc::now()),
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
    Ok(BufWriter::new(file))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("constellation_tool=info,info"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut config = match &cli.config {
        Some(path) => loader::load_config(path)?,
        None => ToolConfig::default(),
    };

    match cli.command {
        Command::Synthesize {
            count,
            altitude_km,
            inclination_deg,
            epoch,
            prefix,
            base_catalog_number,
            json,
            output,
        } => {
            if let Some(prefix) = prefix {
                config.constellation.prefix = prefix;
            }
            if let Some(base) = base_catalog_number {
                config.constellation.base_catalog_number = base;
            }
            let epoch = instant_or_now(epoch.as_deref())?;
            let constellation =
                commands::synthesize(&config, count, altitude_km, inclination_deg, epoch)?;

            let mut writer: Box<dyn Write> = match &output {
                Some(path) => Box::new(create(path)?),
                None => Box::new(io::stdout().lock()),
            };
            if json {
                write_json(&mut writer, &constellation)?;
            } else {
                writeln!(writer, "{}", constellation.to_tle_text())?;
            }
            writer.flush()?;
            if let Some(path) = output {
                info!("Wrote {} objects to {:?}", constellation.len(), path);
            }
        }

        Command::Scan {
            catalog,
            lat,
            lon,
            alt_km,
            band,
            grid,
            output,
        } => {
            band.apply(&mut config);
            grid.apply(&mut config);
            let catalog = loader::load_catalog(&catalog)?;
            let site = GeodeticPosition::new(lat, lon, alt_km)?;
            let grid = config.grid(grid.start()?)?;

            let report = commands::scan(&config, &catalog, site, &grid)?;
            write_aggregate_csv(create(&output)?, &report.records)?;
            info!("file made successfully: {:?}", output);
        }

        Command::Relay {
            catalog,
            relay,
            relay_name,
            band,
            grid,
            output,
        } => {
            band.apply(&mut config);
            grid.apply(&mut config);
            let catalog = loader::load_catalog(&catalog)?;
            let relays = loader::load_catalog(&relay)?;
            let relay = loader::select_entry(&relays, relay_name.as_deref())?;
            let grid = config.grid(grid.start()?)?;

            let report = commands::relay(&config, &catalog, &relay, &grid)?;
            write_detail_csv(create(&output)?, &report.records)?;
            info!("{:?} created", output);
        }

        Command::Route {
            catalog,
            name,
            grid,
            output,
        } => {
            grid.apply(&mut config);
            let catalog = loader::load_catalog(&catalog)?;
            let entry = loader::select_entry(&catalog, name.as_deref())?;
            let grid = config.grid(grid.start()?)?;

            let samples = commands::satellite_route(&entry, &grid)?;
            write_route_csv(create(&output)?, &samples)?;
            info!("{:?} created", output);
        }

        Command::Track {
            catalog,
            name,
            grid,
            output,
        } => {
            grid.apply(&mut config);
            let catalog = loader::load_catalog(&catalog)?;
            let entry = loader::select_entry(&catalog, name.as_deref())?;
            let grid = config.grid(grid.start()?)?;

            let samples = commands::track(&entry, &grid)?;
            write_ground_track_csv(create(&output)?, &samples)?;
            info!("{:?} created", output);
        }

        Command::Snapshot { catalog, at } => {
            let catalog = loader::load_catalog(&catalog)?;
            let instant = instant_or_now(at.as_deref())?;
            let points = commands::snapshot(&catalog, instant);
            write_json(io::stdout().lock(), &points)?;
        }

        Command::Summary { input } => {
            let file = File::open(&input).with_context(|| format!("opening {:?}", input))?;
            let counts = commands::summary(file)?;
            let mut out = io::stdout().lock();
            writeln!(out, "time,count")?;
            for (instant, count) in counts {
                writeln!(out, "{},{}", instant.to_rfc3339(), count)?;
            }
        }
    }

    Ok(())
}

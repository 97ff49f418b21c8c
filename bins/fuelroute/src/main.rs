//! fuelroute: plan cheap fuel stops along a driving route.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use fuelroute_cli::output::{self, format_count, format_duration, format_miles, Status};
use fuelroute_cli::progress;
use fuelroute_core::config::{Config, ConfigSchema};
use fuelroute_core::error::Error;
use fuelroute_core::prelude::*;
use fuelroute_core::report::AlternativeView;
use fuelroute_geo::{haversine_distance, haversine_miles, locate_on_route, Coordinate};
use fuelroute_telemetry::{metrics, PlanSample, TelemetryConfig, Timer};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fuelroute")]
#[command(about = "Plan cheap fuel stops along a driving route")]
#[command(version)]
struct Cli {
    /// Path to a fuelroute.toml configuration file
    #[arg(short, long, global = true, env = "FUELROUTE_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Print planning metrics to stderr on exit
    #[arg(long, global = true)]
    metrics: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Choose fuel stops and estimate fuel cost for a route
    Plan(PlanArgs),
    /// List the cheapest stations near a point
    #[command(allow_negative_numbers = true)]
    Nearby(NearbyArgs),
    /// Great-circle distance between two points
    #[command(allow_negative_numbers = true)]
    Distance {
        lat1: f64,
        lon1: f64,
        lat2: f64,
        lon2: f64,
    },
    /// Find the point a given distance along a route
    Sample {
        /// Route JSON file
        #[arg(short, long)]
        route: PathBuf,
        /// Miles from the start of the route
        #[arg(short, long)]
        miles: f64,
    },
}

#[derive(Args)]
struct CatalogArgs {
    /// Station price file (CSV price export or JSON array of records)
    #[arg(short, long)]
    prices: Option<PathBuf>,
    /// City geocode table (JSON object keyed "City_ST")
    #[arg(short, long)]
    geocoded: Option<PathBuf>,
}

#[derive(Args)]
struct PlanArgs {
    /// Route JSON file
    #[arg(short, long)]
    route: PathBuf,
    #[command(flatten)]
    catalog: CatalogArgs,
    /// Override vehicle fuel economy
    #[arg(long)]
    mpg: Option<f64>,
    /// Override vehicle range on a full tank
    #[arg(long)]
    max_range: Option<f64>,
    /// Override miles between planned stops
    #[arg(long)]
    interval: Option<f64>,
}

#[derive(Args)]
struct NearbyArgs {
    #[arg(long)]
    lat: f64,
    #[arg(long)]
    lon: f64,
    /// Search radius in miles (defaults to the primary search radius)
    #[arg(long)]
    radius: Option<f64>,
    /// Maximum stations to list
    #[arg(long)]
    top: Option<usize>,
    #[command(flatten)]
    catalog: CatalogArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    let config_path = cli.config.as_ref().map(|p| p.to_string_lossy().into_owned());
    let config = match Config::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            report_error(&e, cli.json);
            std::process::exit(e.exit_code());
        }
    };

    fuelroute_telemetry::init_with_config(TelemetryConfig {
        log_level: config.schema.telemetry.log_level.clone(),
        json: config.schema.telemetry.json,
        ..TelemetryConfig::default()
    })?;
    log_loaded_config(&config);

    let outcome = match cli.command {
        Commands::Plan(args) => run_plan(args, &config.schema, cli.json),
        Commands::Nearby(args) => run_nearby(args, &config.schema, cli.json),
        Commands::Distance { lat1, lon1, lat2, lon2 } => run_distance((lat1, lon1), (lat2, lon2), cli.json),
        Commands::Sample { route, miles } => run_sample(&route, miles, cli.json),
    };

    if cli.metrics {
        eprintln!("{}", serde_json::to_string_pretty(&metrics().export_json())?);
    }

    if let Err(e) = outcome {
        report_error(&e, cli.json);
        std::process::exit(e.exit_code());
    }

    Ok(())
}

fn log_loaded_config(config: &Config) {
    let schema = &config.schema;
    tracing::debug!(
        path = config.path.as_deref().unwrap_or("<defaults>"),
        max_range_miles = schema.vehicle.max_range_miles,
        refuel_interval_miles = schema.vehicle.refuel_interval_miles,
        mpg = schema.vehicle.mpg,
        primary_radius_miles = schema.search.primary_radius_miles,
        fallback_radius_miles = schema.search.fallback_radius_miles,
        top_n = schema.search.top_n,
        "Configuration loaded"
    );
}

fn report_error(error: &Error, json: bool) {
    if json {
        match serde_json::to_string_pretty(&error.to_report()) {
            Ok(body) => println!("{}", body),
            Err(_) => Status::error(&error.to_string()),
        }
    } else {
        Status::error(&error.to_string());
    }
}

fn print_json<T: Serialize>(value: &T) -> fuelroute_core::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_plan(args: PlanArgs, config: &ConfigSchema, json: bool) -> fuelroute_core::Result<()> {
    let config = with_vehicle_overrides(config, &args)?;
    let catalog = load_catalog(&args.catalog, &config, json)?;
    let route = RouteFile::new(&args.route).route()?;

    let timer = Timer::start("plan");
    let planned = Optimizer::from_config(config).optimize(&route, &catalog);
    let elapsed = timer.stop();

    let optimized = match planned {
        Ok(optimized) => optimized,
        Err(e) => {
            metrics().record_failure();
            return Err(e);
        }
    };

    metrics().record_plan(PlanSample {
        waypoints: optimized.stats.waypoints,
        stops: optimized.stats.stops,
        widened_searches: optimized.stats.widened_searches,
        missed_waypoints: optimized.stats.missed_waypoints.len(),
    });

    let report = PlanReport::new(&route, &optimized)?;
    if json {
        return print_json(&report);
    }

    output::print_plan(&report);
    println!();
    Status::success(&format!(
        "Planned {} over {} in {}",
        format_count(optimized.result.stop_count(), "stop", "stops"),
        format_miles(optimized.result.total_distance_miles),
        format_duration(elapsed)
    ));
    Ok(())
}

/// Apply command-line vehicle overrides and re-validate.
fn with_vehicle_overrides(config: &ConfigSchema, args: &PlanArgs) -> fuelroute_core::Result<ConfigSchema> {
    let mut config = config.clone();
    if let Some(mpg) = args.mpg {
        config.vehicle.mpg = mpg;
    }
    if let Some(max_range) = args.max_range {
        config.vehicle.max_range_miles = max_range;
    }
    if let Some(interval) = args.interval {
        config.vehicle.refuel_interval_miles = interval;
    }
    config.validate()?;
    Ok(config)
}

fn run_nearby(args: NearbyArgs, config: &ConfigSchema, json: bool) -> fuelroute_core::Result<()> {
    let point = Coordinate::new(args.lat, args.lon).validated()?;
    let radius = args.radius.unwrap_or(config.search.primary_radius_miles);
    if !radius.is_finite() || radius <= 0.0 {
        return Err(Error::invalid_input(format!("Radius must be a positive number of miles, got {}", radius)));
    }
    let top_n = args.top.unwrap_or(config.search.top_n);

    let catalog = load_catalog(&args.catalog, config, json)?;
    let candidates = nearby(&point, catalog.stations(), radius, top_n);

    if json {
        let views: Vec<AlternativeView> = candidates.iter().map(AlternativeView::from).collect();
        return print_json(&views);
    }

    Status::header(&format!(
        "{} within {} of ({:.4}, {:.4})",
        format_count(candidates.len(), "station", "stations"),
        format_miles(radius),
        point.latitude,
        point.longitude
    ));
    output::print_candidates(&candidates);
    Ok(())
}

#[derive(Serialize)]
struct DistanceView {
    miles: f64,
    kilometers: f64,
}

fn run_distance(from: (f64, f64), to: (f64, f64), json: bool) -> fuelroute_core::Result<()> {
    let from = Coordinate::from(from).validated()?;
    let to = Coordinate::from(to).validated()?;

    let view = DistanceView {
        miles: haversine_miles(&from, &to),
        kilometers: haversine_distance(&from, &to),
    };

    if json {
        return print_json(&view);
    }
    println!("{} ({:.1} km)", format_miles(view.miles), view.kilometers);
    Ok(())
}

#[derive(Serialize)]
struct SampleView {
    miles: f64,
    lat: f64,
    lon: f64,
    segment_index: usize,
    segment_fraction: f64,
}

fn run_sample(route_path: &Path, miles: f64, json: bool) -> fuelroute_core::Result<()> {
    if !miles.is_finite() {
        return Err(Error::invalid_distance(miles));
    }
    let route = RouteFile::new(route_path).route()?;
    let position = locate_on_route(&route.polyline, miles)?;

    let view = SampleView {
        miles,
        lat: position.coordinate.latitude,
        lon: position.coordinate.longitude,
        segment_index: position.segment_index,
        segment_fraction: position.fraction,
    };

    if json {
        return print_json(&view);
    }
    println!(
        "{} → ({:.5}, {:.5}) on segment {} at {:.0}%",
        format_miles(view.miles),
        view.lat,
        view.lon,
        view.segment_index,
        view.segment_fraction * 100.0
    );
    Ok(())
}

/// Resolve catalog paths from flags or config, then load with a spinner.
fn load_catalog(args: &CatalogArgs, config: &ConfigSchema, quiet: bool) -> fuelroute_core::Result<StationCatalog> {
    let prices = args
        .prices
        .clone()
        .or_else(|| config.catalog.prices_path.as_ref().map(PathBuf::from))
        .ok_or_else(|| {
            Error::invalid_input("No station price file given")
                .with_suggestion("Pass --prices or set [catalog] prices_path in fuelroute.toml")
        })?;
    let geocoded = args
        .geocoded
        .clone()
        .or_else(|| config.catalog.geocoded_path.as_ref().map(PathBuf::from));

    let pb = if quiet { progress::hidden() } else { progress::spinner("Loading station catalog...") };

    let geocodes = geocoded.map(GeocodeTable::load_or_empty).unwrap_or_default();
    match StationCatalog::load(&prices, &geocodes) {
        Ok(catalog) => {
            let stats = catalog.geocode_stats();
            tracing::debug!(
                city = stats.city,
                state_centroid = stats.state_centroid,
                default_centroid = stats.default_centroid,
                "Geocode sources"
            );
            progress::finish_success(&pb, &format!("Loaded {}", format_count(catalog.len(), "station", "stations")));
            Ok(catalog)
        }
        Err(e) => {
            progress::finish_error(&pb, "Could not load station catalog");
            Err(e)
        }
    }
}

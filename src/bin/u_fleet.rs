//! Allocates vehicles to a batch of trip records and writes a JSON fleet
//! report.
use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use u_fleet::allocation::{sort_for_allocation, AllocationEngine, SelectionPolicy};
use u_fleet::config::FleetConfig;
use u_fleet::ingest::{read_route_config_file, read_trips_file, TripFilter};
use u_fleet::models::{Category, RouteConfigIndex, RoutePair};
use u_fleet::report::FleetReport;
use u_fleet::validation::audit_allocation;

/// greedy vehicle allocation over trip records
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct FleetApp {
    /// trip records CSV
    #[arg(long)]
    pub trips: PathBuf,
    /// route-group configuration CSV
    #[arg(long)]
    pub routes: PathBuf,
    /// fleet configuration TOML
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// only allocate trips on this city pair, e.g. "Chennai-Vellore"
    #[arg(long)]
    pub route_group: Option<String>,
    /// only allocate trips of this category
    #[arg(long)]
    pub category: Option<Category>,
    /// serve every known class from the sedan pool
    #[arg(long)]
    pub sedan_only: bool,
    /// vehicle selection policy (first-fit, earliest-available)
    #[arg(long)]
    pub policy: Option<SelectionPolicy>,
    /// include one vehicle's schedule, as "<category>:<vehicle id>"
    #[arg(long)]
    pub schedule: Option<String>,
    /// write the report here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_schedule_selector(raw: &str) -> Result<(Category, u32), String> {
    let (category, vehicle_id) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected <category>:<vehicle id>, found '{raw}'"))?;
    let category = category.parse::<Category>().map_err(|e| e.to_string())?;
    let vehicle_id = vehicle_id
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid vehicle id '{vehicle_id}': {e}"))?;
    Ok((category, vehicle_id))
}

fn run(args: FleetApp) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => FleetConfig::from_file(path)?,
        None => FleetConfig::default(),
    };
    if args.sedan_only {
        config = config.with_sedan_only(true);
    }
    if let Some(policy) = args.policy {
        config = config.with_policy(policy);
    }

    let mut filter = TripFilter::all();
    if let Some(label) = &args.route_group {
        let pair = RoutePair::parse(label)
            .ok_or_else(|| format!("invalid route group '{label}', expected CityA-CityB"))?;
        filter = filter.with_route(pair);
    }
    if let Some(category) = args.category {
        filter = filter.with_category(category);
    }
    let selector = args
        .schedule
        .as_deref()
        .map(parse_schedule_selector)
        .transpose()?;

    let routes = RouteConfigIndex::from_rows(read_route_config_file(&args.routes)?)
        .with_default(config.default_route);
    let mut trips = filter.apply(read_trips_file(&args.trips, &config)?);
    sort_for_allocation(&mut trips);

    let allocation = AllocationEngine::new(&routes)
        .with_policy(config.policy)
        .allocate(&trips)?;

    for violation in audit_allocation(&allocation, &routes) {
        log::warn!("{}", violation.message);
    }

    let mut report = FleetReport::build(&allocation, &routes, config.policy);
    if let Some((category, vehicle_id)) = selector {
        report = report.with_vehicle_schedule(&allocation, category, vehicle_id);
    }
    let json = report.to_json_pretty()?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json)?;
            log::info!("wrote fleet report to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = FleetApp::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

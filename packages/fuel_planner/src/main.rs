use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use fuel_planner::common::config::{PlanConfig, UserPlanConfig};
use fuel_planner::loading::route::read_route_file;
use fuel_planner::loading::stations::read_catalog_file;
use fuel_planner::planning::planner::plan_refuel_stops;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Plan the cheapest refuelling stops along a driving route"
)]
struct Args {
    /// Route geometry, either GeoJSON style coordinates or an encoded polyline
    #[arg(long)]
    route: PathBuf,

    /// JSON array of station records with their current prices
    #[arg(long)]
    stations: PathBuf,

    /// Tank capacity in gallons
    #[arg(long, env = "FP_TANK_GALLONS")]
    tank: Option<f64>,

    /// Fuel economy in miles per gallon
    #[arg(long, env = "FP_MPG")]
    mpg: Option<f64>,

    /// Furthest a station may sit from the route, in miles
    #[arg(long, env = "FP_MAX_DETOUR_MILES")]
    max_detour: Option<f64>,

    /// Price per gallon used when the catalog has no usable prices
    #[arg(long, env = "FP_FALLBACK_PRICE")]
    fallback_price: Option<f64>,
}

impl From<&Args> for UserPlanConfig {
    fn from(args: &Args) -> UserPlanConfig {
        UserPlanConfig {
            tank_capacity: args.tank,
            mpg: args.mpg,
            max_detour_miles: args.max_detour,
            fallback_price: args.fallback_price,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fuel_planner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let now = Instant::now();

    let config: PlanConfig = UserPlanConfig::from(&args).into();

    let route = read_route_file(&args.route).with_context(|| {
        format!("loading route from {}", args.route.display())
    })?;
    let catalog = read_catalog_file(&args.stations).with_context(|| {
        format!("loading stations from {}", args.stations.display())
    })?;
    tracing::info!(
        route_points = route.points().len(),
        stations = catalog.len(),
        "loaded planner inputs"
    );

    let plan = plan_refuel_stops(&route, &catalog, &config)
        .context("planning refuel stops")?;

    println!("{}", serde_json::to_string_pretty(&plan)?);

    tracing::info!("elapsed: {:.2?}", now.elapsed());

    Ok(())
}

//! solent: plan a walking evacuation to high ground on the Isle of Wight.
//!
//! Reads an ESRI ASCII elevation grid and an OS ITN road network, finds the
//! highest point within reach of the given location, and prints the
//! shortest and fastest walking routes to it.
//!
//! ```text
//! solent --easting 450000 --northing 85000 --fitness 7 \
//!        --elevation material/elevation/SZ.asc --network material/itn/solent_itn.json
//! ```
//!
//! Logging follows `RUST_LOG` (default `info`).

mod area;
mod prompt;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use evac_core::{Coord, Fitness, SearchConfig};
use evac_elevation::read_asc;
use evac_plan::{RoutePlan, RoutePlanner, write_route_csv};
use evac_spatial::itn::load_itn;

use area::{OperatingArea, Placement};
use prompt::Confirm;

#[derive(Parser, Debug)]
#[command(author, version, about = "Plan a walking evacuation route to the highest point nearby")]
struct Args {
    /// User easting, British National Grid metres.
    #[arg(long, allow_hyphen_values = true)]
    easting: f64,

    /// User northing, British National Grid metres.
    #[arg(long, allow_hyphen_values = true)]
    northing: f64,

    /// Self-reported fitness, 1 (low) to 10 (high).
    #[arg(long)]
    fitness: u8,

    /// Override the initial search radius implied by fitness, metres.
    #[arg(long)]
    radius: Option<f64>,

    /// ESRI ASCII elevation grid.
    #[arg(long, default_value = "material/elevation/SZ.asc")]
    elevation: PathBuf,

    /// OS ITN road network JSON.
    #[arg(long, default_value = "material/itn/solent_itn.json")]
    network: PathBuf,

    /// JSON file overriding the search configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep searching past the hard cap without asking, up to
    /// --max-extensions times.
    #[arg(long, conflicts_with = "no")]
    yes: bool,

    /// Never search past the hard cap.
    #[arg(long)]
    no: bool,

    #[arg(long, default_value_t = 10)]
    max_extensions: u32,

    /// GeoJSON outline of the island.  Locations outside the bounding box
    /// are still accepted if they fall on it.
    #[arg(long)]
    boundary: Option<PathBuf>,

    /// Skip the operating-area check.
    #[arg(long)]
    anywhere: bool,

    /// Print the plan as JSON instead of a summary.
    #[arg(long)]
    json: bool,

    /// Write both routes link by link to this CSV file.
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let user = Coord::new(args.easting, args.northing);
    if !args.anywhere {
        let mut operating_area = OperatingArea::new();
        if let Some(path) = &args.boundary {
            operating_area = operating_area.with_island(area::load_boundary(path)?);
        }
        if operating_area.check(user)? == Placement::OnIsland {
            info!("{user} is outside the bounding box but on the island");
        }
    }
    let fitness = Fitness::new(args.fitness)?;
    let speed = fitness.speed_class();
    let radius = args.radius.unwrap_or(speed.search_radius());

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => SearchConfig::default(),
    };

    // ── Load data ─────────────────────────────────────────────────────────
    let t0 = Instant::now();
    let raster = read_asc(&args.elevation)
        .with_context(|| format!("reading elevation grid {}", args.elevation.display()))?;
    let network = load_itn(&args.network)
        .with_context(|| format!("reading road network {}", args.network.display()))?;
    info!("data loaded in {:.2}s", t0.elapsed().as_secs_f64());

    // ── Plan ──────────────────────────────────────────────────────────────
    let confirm = if args.yes {
        Confirm::Scripted { remaining: args.max_extensions }
    } else if args.no {
        Confirm::Scripted { remaining: 0 }
    } else {
        Confirm::Stdin
    };
    let mut planner = RoutePlanner::new(&raster, &network).config(config).confirmation(confirm);
    let plan = planner
        .compute_plan(user, speed, radius)
        .with_context(|| format!("planning from {user}"))?;

    // ── Report ────────────────────────────────────────────────────────────
    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_summary(&plan);
    }

    if let Some(path) = &args.csv {
        write_route_csv(&plan, path).with_context(|| format!("writing {}", path.display()))?;
        info!("routes written to {}", path.display());
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<SearchConfig> {
    let file = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
    let config = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

fn print_summary(plan: &RoutePlan) {
    println!("=== Evacuation plan ({} walker) ===", plan.speed_class);
    println!("  Your altitude:      {:.1} m", plan.user_altitude);
    println!(
        "  Safe place:         {} at {:.1} m (search radius {} m)",
        plan.destination, plan.destination_altitude, plan.final_search_radius
    );
    if !plan.threshold_met {
        println!("  Warning: no point within reach meets the safe altitude; this is the highest found.");
    }
    println!("  Start node:         {}", plan.nearest_user_node);
    println!("  End node:           {}", plan.nearest_dest_node);
    println!();
    for (label, path) in [("Shortest", &plan.shortest_path), ("Fastest", &plan.fastest_path)] {
        println!(
            "  {label:<9} {:>3} links  {:>8.0} m  {:>6.1} min",
            path.len(),
            path.total_length,
            path.total_time
        );
    }
}

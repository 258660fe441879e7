// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sidstar_core::config::PlannerConfig;
use sidstar_core::transition::SeededRandom;
use sidstar_core::{Event, NavData, Planner, Side};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding waypoints.json, sids.json and stars.json
    #[arg(short, long, env = "SIDSTAR_DATA", default_value = "data")]
    data: PathBuf,

    /// Config file (defaults to sidstar.json in the user config directory)
    #[arg(short, long, env = "SIDSTAR_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List airports with at least one procedure
    Airports,
    /// List runways served by an airport's SIDs (or STARs with --arrival)
    Runways {
        airport: String,
        #[arg(long)]
        arrival: bool,
    },
    /// List procedures for an airport/runway
    Procedures {
        airport: String,
        runway: String,
        #[arg(long)]
        arrival: bool,
    },
    /// Build a route and print it
    Route(RouteArgs),
}

#[derive(Args)]
struct RouteArgs {
    /// Departure airport
    #[arg(long)]
    from: String,
    /// Departure runway (first available if omitted)
    #[arg(long)]
    dep_rwy: Option<String>,
    /// Arrival airport
    #[arg(long)]
    to: String,
    /// Arrival runway (first available if omitted)
    #[arg(long)]
    arr_rwy: Option<String>,
    /// Direct routing between the airports instead of procedures
    #[arg(long)]
    direct: bool,
    /// Cycle forward this many SIDs
    #[arg(long, default_value_t = 0)]
    sid_step: usize,
    /// Cycle forward this many STARs
    #[arg(long, default_value_t = 0)]
    star_step: usize,
    /// Pick transitions at random with this seed
    #[arg(long)]
    seed: Option<u64>,
    /// Only draw waypoints on the route
    #[arg(long)]
    route_only: bool,
    /// Write the rendered frame as JSON
    #[arg(long)]
    frame: Option<PathBuf>,
}

fn side(arrival: bool) -> Side {
    if arrival {
        Side::Arrival
    } else {
        Side::Departure
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Failed to initialise logger")?;

    let config = match &cli.config {
        Some(path) => PlannerConfig::load(path),
        None => PlannerConfig::load_default(),
    }
    .context("Failed to load configuration")?;

    let data = NavData::load_dir(&cli.data)
        .with_context(|| format!("Could not load navigation data from {:?}", cli.data))?;

    match &cli.command {
        Commands::Airports => {
            let planner = Planner::new(data, config)?;
            for airport in planner.procedures().airports() {
                println!("{}", airport);
            }
        }
        Commands::Runways { airport, arrival } => {
            let planner = Planner::new(data, config)?;
            let runways = planner.procedures().runways_for(airport, side(*arrival));
            if runways.is_empty() {
                println!("No {} found for '{}'", side(*arrival), airport);
            }
            for runway in runways {
                println!("{}", runway);
            }
        }
        Commands::Procedures {
            airport,
            runway,
            arrival,
        } => {
            let planner = Planner::new(data, config)?;
            let procs = planner
                .procedures()
                .procedures_for(airport, runway, side(*arrival));
            if procs.is_empty() {
                println!("No {} for {} runway {}", side(*arrival), airport, runway);
            }
            for p in procs {
                let transitions: Vec<&str> =
                    p.transitions.iter().map(|t| t.name.as_str()).collect();
                if transitions.is_empty() {
                    println!("{}", p.id);
                } else {
                    println!("{} [{}]", p.id, transitions.join(", "));
                }
            }
        }
        Commands::Route(args) => run_route(data, config, args)?,
    }

    Ok(())
}

fn run_route(data: NavData, config: PlannerConfig, args: &RouteArgs) -> Result<()> {
    let mut planner = Planner::new(data, config)?;
    if let Some(seed) = args.seed {
        planner = planner.with_selector(Box::new(SeededRandom::new(seed)));
    }

    let mut events = vec![Event::SelectAirport {
        side: Side::Departure,
        airport: args.from.clone(),
    }];
    if let Some(runway) = &args.dep_rwy {
        events.push(Event::SelectRunway {
            side: Side::Departure,
            runway: runway.clone(),
        });
    }
    events.push(Event::SelectAirport {
        side: Side::Arrival,
        airport: args.to.clone(),
    });
    if let Some(runway) = &args.arr_rwy {
        events.push(Event::SelectRunway {
            side: Side::Arrival,
            runway: runway.clone(),
        });
    }
    events.extend(std::iter::repeat(Event::NextProcedure(Side::Departure)).take(args.sid_step));
    events.extend(std::iter::repeat(Event::NextProcedure(Side::Arrival)).take(args.star_step));
    events.push(Event::SetDirectMode(args.direct));
    if args.route_only {
        events.push(Event::ToggleRouteOnly);
    }

    for event in &events {
        planner.apply(event);
    }
    let frame = planner.frame();

    println!("SID:   {}", frame.route.sid);
    println!("STAR:  {}", frame.route.star);
    println!("Route: {}", frame.route.text);
    println!("Fixes: {}", frame.route.fixes.join(" "));
    if !frame.route.drawable {
        println!("Route is not drawable (fewer than two known fixes).");
    }

    if let Some(path) = &args.frame {
        let json = serde_json::to_string_pretty(&frame).context("Failed to serialize frame")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
        log::info!(
            "Wrote frame: path={} commands={}",
            path.display(),
            frame.commands.len()
        );
    }

    Ok(())
}

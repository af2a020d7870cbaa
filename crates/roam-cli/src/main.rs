//! Roam CLI - headless wandering-characters simulation.
//!
//! - `roam run` - step the simulation and print where everyone ends up
//! - `roam rooms` - list rooms, doorways, and corridors
//! - `roam route` - room-level route between two rooms
//! - `roam check` - validate a map file

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use roam_agents::{AgentSnapshot, SimConfig, Simulation};
use roam_core::SplitMix64;
use roam_map::{RouteDestination, SceneMap};
use roam_nav::Vec2;

#[derive(Parser)]
#[command(name = "roam")]
#[command(about = "Characters wandering a castle of rooms and corridors", version)]
struct Cli {
    /// Map and roster YAML; the bundled castle when omitted
    #[arg(short, long, global = true)]
    map: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation headless
    Run {
        /// Number of fixed ticks to run
        #[arg(long, default_value_t = 1800)]
        ticks: u64,

        /// Seconds per tick
        #[arg(long, default_value_t = 1.0 / 30.0)]
        dt: f32,

        /// Override the seed from the map file
        #[arg(long)]
        seed: Option<u64>,

        /// Print snapshots every N ticks (0 prints only the final state)
        #[arg(long, default_value_t = 0)]
        every: u64,

        /// Snapshots as JSON lines instead of a table
        #[arg(long)]
        json: bool,

        /// Send the player to this point first, as "x,z"
        #[arg(long, value_parser = parse_point)]
        player_target: Option<Vec2>,
    },

    /// List rooms and corridors
    Rooms {
        #[arg(long)]
        json: bool,
    },

    /// Room-level route between two rooms
    Route {
        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,
    },

    /// Validate the map and report doorways the meshes cannot reach
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    if cli.log_json {
        fmt().json().with_env_filter(filter).with_target(false).init();
    } else {
        fmt().with_env_filter(filter).with_target(false).init();
    }

    let config = load_config(cli.map.as_ref())?;

    match cli.command {
        Some(Commands::Run {
            ticks,
            dt,
            seed,
            every,
            json,
            player_target,
        }) => run_simulation(config, ticks, dt, seed, every, json, player_target),
        Some(Commands::Rooms { json }) => list_rooms(&config, json),
        Some(Commands::Route { from, to }) => show_route(&config, &from, &to),
        Some(Commands::Check) => check_map(&config),
        None => {
            println!("Roam - wandering characters");
            println!();
            println!("Usage: roam [--map FILE] <COMMAND>");
            println!();
            println!("Commands:");
            println!("  run    Run the simulation headless");
            println!("  rooms  List rooms and corridors");
            println!("  route  Room-level route between two rooms");
            println!("  check  Validate a map file");
            println!();
            println!("Run 'roam --help' for more information.");
            Ok(())
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<SimConfig> {
    match path {
        Some(path) => {
            SimConfig::load(path).with_context(|| format!("loading {}", path.display()))
        }
        None => SimConfig::embedded().context("parsing the bundled map"),
    }
}

fn parse_point(s: &str) -> Result<Vec2, String> {
    let (x, z) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,z\", got {s:?}"))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
    let z: f32 = z.trim().parse().map_err(|e| format!("bad z: {e}"))?;
    Ok(Vec2::new(x, z))
}

#[derive(Serialize)]
struct Frame<'a> {
    tick: u64,
    seconds: f64,
    agents: &'a [AgentSnapshot],
}

fn run_simulation(
    mut config: SimConfig,
    ticks: u64,
    dt: f32,
    seed: Option<u64>,
    every: u64,
    json: bool,
    player_target: Option<Vec2>,
) -> Result<()> {
    if !(dt > 0.0 && dt.is_finite()) {
        bail!("--dt must be a positive number of seconds, got {dt}");
    }
    if let Some(seed) = seed {
        config.seed = seed;
    }

    let mut sim = Simulation::new(&config)?;
    tracing::info!(seed = sim.seed(), ticks, dt, "Starting simulation");

    if let Some(target) = player_target {
        if !sim.player_target(target) {
            tracing::warn!(x = target.x, z = target.z, "player target unreachable");
        }
    }

    for _ in 0..ticks {
        sim.step(dt);
        if every > 0 && sim.tick() % every == 0 {
            print_frame(&sim, json)?;
        }
    }
    if every == 0 || ticks % every != 0 {
        print_frame(&sim, json)?;
    }
    Ok(())
}

fn print_frame(sim: &Simulation, json: bool) -> Result<()> {
    let agents = sim.snapshots();
    if json {
        let frame = Frame {
            tick: sim.tick(),
            seconds: sim.elapsed_seconds(),
            agents: &agents,
        };
        println!("{}", serde_json::to_string(&frame)?);
        return Ok(());
    }

    println!("tick {} ({:.1}s)", sim.tick(), sim.elapsed_seconds());
    for agent in &agents {
        let behavior = agent
            .behavior
            .map(|b| b.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<12} {:<20} ({:>7.2}, {:>7.2})  {}",
            agent.id, agent.room, agent.position.x, agent.position.z, behavior
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct RoomSummary<'a> {
    id: &'a str,
    name: &'a str,
    center: Vec2,
    obstacles: usize,
    nav_nodes: usize,
    neighbors: &'a [String],
    unreachable_doorways: Vec<&'a str>,
}

fn list_rooms(config: &SimConfig, json: bool) -> Result<()> {
    let scene = SceneMap::build(&config.scene)?;
    let summaries: Vec<RoomSummary<'_>> = scene
        .rooms()
        .iter()
        .map(|room| RoomSummary {
            id: room.id(),
            name: room.name(),
            center: room.center(),
            obstacles: room.obstacles().len(),
            nav_nodes: room.nav_mesh().node_count(),
            neighbors: scene.graph().neighbors(room.id()),
            unreachable_doorways: room.unreachable_connections(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!("Rooms: {}", summaries.len());
    for room in &summaries {
        println!(
            "  {:<20} {:<28} obstacles: {:>2}  nodes: {:>4}  -> {}",
            room.id,
            room.name,
            room.obstacles,
            room.nav_nodes,
            room.neighbors.join(", ")
        );
        if !room.unreachable_doorways.is_empty() {
            println!("      unreachable doorways: {}", room.unreachable_doorways.join(", "));
        }
    }
    println!();
    println!("Corridors: {}", scene.corridors().len());
    for corridor in scene.corridors() {
        println!(
            "  {:<28} {}.{} <-> {}.{}  width {:.1}",
            corridor.id(),
            corridor.room_a(),
            corridor.connection_a(),
            corridor.room_b(),
            corridor.connection_b(),
            corridor.width()
        );
    }
    Ok(())
}

fn show_route(config: &SimConfig, from: &str, to: &str) -> Result<()> {
    let scene = SceneMap::build(&config.scene)?;
    let Some(start) = scene.room(from) else {
        bail!("unknown room {from:?}");
    };
    if scene.room(to).is_none() {
        bail!("unknown room {to:?}");
    }

    let rooms = scene.graph().find_room_path(from, to);
    if rooms.is_empty() {
        bail!("no route from {from} to {to}");
    }
    println!("{}", rooms.join(" -> "));

    let mut rng = SplitMix64::new(config.seed);
    let from_point = start.nearest_walkable_point(start.center());
    let path = scene.build_route(&rooms, from_point, RouteDestination::Explore, &mut rng);
    println!("{} waypoints", path.points.len());
    for p in &path.points {
        println!("  ({:>7.2}, {:>7.2})", p.x, p.z);
    }
    Ok(())
}

fn check_map(config: &SimConfig) -> Result<()> {
    config.validate()?;
    let scene = SceneMap::build(&config.scene)?;

    let mut problems = 0;
    for room in scene.rooms() {
        for name in room.unreachable_connections() {
            println!("room {}: doorway {name} is not reachable on the mesh", room.id());
            problems += 1;
        }
    }
    for corridor in scene.corridors() {
        if !corridor.is_initialized() {
            println!("corridor {}: no navigation mesh", corridor.id());
            problems += 1;
        }
    }
    let ids: Vec<&str> = scene.room_ids().collect();
    if let Some(first) = ids.first() {
        for id in &ids[1..] {
            if scene.graph().find_room_path(first, id).is_empty() {
                println!("room {id}: not reachable from {first}");
                problems += 1;
            }
        }
    }

    println!(
        "{} rooms, {} corridors, {} characters: {}",
        scene.rooms().len(),
        scene.corridors().len(),
        config.characters.len(),
        if problems == 0 { "ok" } else { "problems found" }
    );
    if problems > 0 {
        bail!("{problems} problem(s) in map");
    }
    Ok(())
}

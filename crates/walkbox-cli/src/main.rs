//! Walkbox CLI - room inspection and walk simulation.
//!
//! - `walkbox inspect` - box table
//! - `walkbox matrix` - compiled next-hop rows
//! - `walkbox route` - box chain and gates between two boxes
//! - `walkbox walk` - simulate one actor, one JSON line per tick

mod config;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use walkbox_actor::{Actor, ActorId, PolicyKind, WalkSpeed, WalkState, WalkStatus};
use walkbox_nav::{BoxId, BoxStore, Point, Room, RoomData, SearchConfig};

use crate::config::SimConfig;

#[derive(Parser)]
#[command(name = "walkbox")]
#[command(about = "Inspect walkbox rooms and simulate walking actors", version)]
struct Cli {
    /// Config file (defaults to .walkbox/config.yaml in the current directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List boxes with their corners, flags and scale
    Inspect {
        /// Room file (.yaml, .yml, .json or binary box records)
        room: PathBuf,
    },

    /// Dump the compiled path matrix
    Matrix { room: PathBuf },

    /// Show the box chain between two boxes
    Route { room: PathBuf, from: u16, to: u16 },

    /// Simulate one actor walking and print its state every tick
    Walk {
        room: PathBuf,

        /// Start position, `x,y`
        #[arg(long, value_parser = parse_point)]
        from: Point,

        /// Destination, `x,y`
        #[arg(long, value_parser = parse_point)]
        to: Point,

        /// Facing to turn to on arrival, in degrees
        #[arg(long)]
        dir: Option<u16>,

        /// Override the configured walk policy
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,

        /// Override the configured walk speed, `x,y`
        #[arg(long, value_parser = parse_speed)]
        speed: Option<WalkSpeed>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Scaled,
    Rectangular,
    Legacy,
}

impl From<PolicyArg> for PolicyKind {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Scaled => PolicyKind::ScaledStep,
            PolicyArg::Rectangular => PolicyKind::RectangularSpeed,
            PolicyArg::Legacy => PolicyKind::LegacyCounter,
        }
    }
}

#[derive(Serialize)]
struct TickRecord {
    tick: u64,
    x: i32,
    y: i32,
    facing: u16,
    scale: u8,
    walkbox: Option<u16>,
    state: WalkState,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => SimConfig::load(path)?,
        None => {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            SimConfig::load_from_dir(&cwd)?
        }
    };

    match cli.command {
        Commands::Inspect { room } => inspect(&load_room(&room, &config.search)?),
        Commands::Matrix { room } => dump_matrix(&load_room(&room, &config.search)?),
        Commands::Route { room, from, to } => show_route(&load_room(&room, &config.search)?, from, to),
        Commands::Walk {
            room,
            from,
            to,
            dir,
            policy,
            speed,
        } => {
            let room = load_room(&room, &config.search)?;
            simulate(&room, &config, from, to, dir, policy.map(Into::into), speed)
        }
    }
}

fn load_room(path: &Path, search: &SearchConfig) -> Result<Room> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let data = match ext {
        "yaml" | "yml" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read room from {}", path.display()))?;
            serde_yaml::from_str::<RoomData>(&text)
                .with_context(|| format!("Failed to parse room from {}", path.display()))?
        }
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read room from {}", path.display()))?;
            serde_json::from_str::<RoomData>(&text)
                .with_context(|| format!("Failed to parse room from {}", path.display()))?
        }
        _ => {
            let bytes = std::fs::read(path).with_context(|| format!("Failed to read room from {}", path.display()))?;
            RoomData::from_bytes(&bytes).with_context(|| format!("Failed to decode room from {}", path.display()))?
        }
    };

    let store = BoxStore::new(data.boxes, data.scale_slots)
        .with_context(|| format!("Invalid room data in {}", path.display()))?;
    let room = Room::with_search(store, search.clone());
    tracing::info!(room = %path.display(), boxes = room.box_count(), "Loaded room");
    Ok(room)
}

fn inspect(room: &Room) -> Result<()> {
    println!("{:>4}  {:<40}  {:<28}  scale", "box", "corners (ul ur lr ll)", "flags");
    for (index, walkbox) in room.store().boxes().iter().enumerate() {
        let c = walkbox.coords;
        let corners = format!(
            "({},{}) ({},{}) ({},{}) ({},{})",
            c.ul.x, c.ul.y, c.ur.x, c.ur.y, c.lr.x, c.lr.y, c.ll.x, c.ll.y
        );
        println!(
            "{:>4}  {:<40}  {:<28}  {:?}",
            index,
            corners,
            format!("{:?}", walkbox.flags),
            walkbox.scale
        );
    }
    for (slot, ramp) in room.store().scale_slots().iter().enumerate() {
        println!(
            "slot {slot}: ({},{})={} -> ({},{})={}",
            ramp.x1, ramp.y1, ramp.scale1, ramp.x2, ramp.y2, ramp.scale2
        );
    }
    Ok(())
}

fn dump_matrix(room: &Room) -> Result<()> {
    for (source, runs) in room.matrix().rows() {
        let cells: Vec<String> = runs
            .iter()
            .map(|run| format!("{}..={} -> {}", run.lo.0, run.hi.0, run.next.0))
            .collect();
        println!("{:>4}: {}", source.0, cells.join(", "));
    }
    Ok(())
}

fn show_route(room: &Room, from: u16, to: u16) -> Result<()> {
    let Some(route) = room.route(BoxId(from), BoxId(to))? else {
        bail!("box {to} is not reachable from box {from}");
    };

    let chain: Vec<String> = route.boxes.iter().map(|b| b.0.to_string()).collect();
    println!("{} ({} crossings)", chain.join(" -> "), route.hops());
    for (pair, gate) in route.boxes.windows(2).zip(&route.gates) {
        println!(
            "  {} -> {}: from ({},{})-({},{}) via ({},{})-({},{})",
            pair[0].0,
            pair[1].0,
            gate.from_side[0].x,
            gate.from_side[0].y,
            gate.from_side[1].x,
            gate.from_side[1].y,
            gate.via_side[0].x,
            gate.via_side[0].y,
            gate.via_side[1].x,
            gate.via_side[1].y,
        );
    }
    Ok(())
}

fn simulate(
    room: &Room,
    config: &SimConfig,
    from: Point,
    to: Point,
    dir: Option<u16>,
    policy: Option<PolicyKind>,
    speed: Option<WalkSpeed>,
) -> Result<()> {
    let mut walk_config = config.walk;
    if let Some(policy) = policy {
        walk_config.policy = policy;
    }

    let mut actor = Actor::with_config(ActorId(0), walk_config);
    if config.player {
        actor = actor.player();
    }
    if let Some(speed) = speed {
        actor.set_walk_speed(speed)?;
    }
    actor.put_actor(room, from);
    actor.set_destination(room, to, dir);

    for tick in 1..=config.max_ticks {
        let status = actor.tick(room);
        let view = actor.view();
        let record = TickRecord {
            tick,
            x: view.pos.x,
            y: view.pos.y,
            facing: view.facing,
            scale: view.scale,
            walkbox: view.walkbox.map(|b| b.0),
            state: actor.state(),
        };
        println!("{}", serde_json::to_string(&record)?);

        if status == WalkStatus::Idle {
            tracing::info!(ticks = tick, x = view.pos.x, y = view.pos.y, "Walk finished");
            return Ok(());
        }
    }

    bail!("walk did not finish within {} ticks", config.max_ticks)
}

fn parse_pair(s: &str) -> Result<(i32, i32), String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in `{s}`: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in `{s}`: {e}"))?;
    Ok((x, y))
}

fn parse_point(s: &str) -> Result<Point, String> {
    parse_pair(s).map(Point::from)
}

fn parse_speed(s: &str) -> Result<WalkSpeed, String> {
    let (x, y) = parse_pair(s)?;
    let x = u16::try_from(x).map_err(|_| format!("speed out of range: `{s}`"))?;
    let y = u16::try_from(y).map_err(|_| format!("speed out of range: `{s}`"))?;
    Ok(WalkSpeed::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_coordinate_pairs() {
        assert_eq!(parse_point("12, -4"), Ok(Point::new(12, -4)));
        assert!(parse_point("12").is_err());
        assert_eq!(parse_speed("4,1"), Ok(WalkSpeed::new(4, 1)));
        assert!(parse_speed("-1,2").is_err());
    }

    #[test]
    fn demo_room_loads_from_yaml() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/corridor.yaml");
        let room = load_room(&path, &SearchConfig::default()).expect("demo room");
        assert_eq!(room.box_count(), 4);
        let route = room.route(BoxId(0), BoxId(3)).expect("ids").expect("reachable");
        assert_eq!(route.boxes.first(), Some(&BoxId(0)));
        assert_eq!(route.boxes.last(), Some(&BoxId(3)));
    }
}

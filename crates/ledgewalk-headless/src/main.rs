//! Headless stage runner.
//!
//! Loads a decoded stage (and optionally a config) from JSON, steps a world
//! with a scripted walking player for a fixed number of ticks and prints a
//! summary.
//!
//! Usage:
//!   ledgewalk-headless stage.json --ticks 600 --walk 1.0
//!   ledgewalk-headless stage.json --config sim.json --events --json
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use ledgewalk_core::actors::{
    enemy_body, enemy_exit_camera, player_body, ActorFactory, EnemyActor, GroundLatch,
    PlayerActor, SpawnPoint,
};
use ledgewalk_core::behavior::{Collidable, Damageable, Movable, TickContext};
use ledgewalk_core::entity::{ActorTag, Body};
use ledgewalk_core::progress::{Counter, SetKey};
use ledgewalk_core::{Rect, SimConfig, SimEvent, Stage, StageDesc, World};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ledgewalk-headless")]
#[command(about = "Step a platformer stage without rendering")]
struct Cli {
    /// Decoded stage JSON
    stage: PathBuf,
    /// Simulation config JSON; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of ticks to run
    #[arg(long, default_value_t = 600)]
    ticks: u64,
    /// Horizontal input held by the player, -1.0 to 1.0
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    walk: f32,
    /// Override the config seed
    #[arg(long)]
    seed: Option<u64>,
    /// Print every event as it happens
    #[arg(long)]
    events: bool,
    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

// =============================================================================
// Scripted actors
// =============================================================================

/// Holds a fixed input, breaks blocks and turns around at walls.
#[derive(Debug)]
struct Walker {
    body: Body,
    latch: GroundLatch,
    input: f32,
}

impl Movable for Walker {
    fn tag(&self) -> ActorTag {
        ActorTag::Player
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn pre_movement(&mut self, _ctx: &mut TickContext<'_>) {
        self.body.target.x = self.input;
    }

    fn post_movement(&mut self, _ctx: &mut TickContext<'_>) {
        self.latch.end_tick();
    }
}

impl Collidable for Walker {
    fn vertical_collision_event(&mut self, dir: f32, _ctx: &mut TickContext<'_>) {
        if dir > 0.0 {
            self.latch.land();
        }
    }

    fn wall_collision_event(&mut self, dir: f32, _ctx: &mut TickContext<'_>) {
        if self.input * dir > 0.0 {
            self.input = -self.input;
        }
    }

    fn break_collision(&mut self, _area: Rect, _level: u8, _ctx: &mut TickContext<'_>) -> bool {
        true
    }
}

impl Damageable for Walker {
    fn hurt(&mut self, _source: Rect, dir: f32, _ctx: &mut TickContext<'_>) -> bool {
        self.body.speed.x = dir * 2.0;
        true
    }
}

impl PlayerActor for Walker {
    fn is_grounded(&self) -> bool {
        self.latch.is_grounded()
    }
}

/// Stands at its spawn point under gravity.
#[derive(Debug)]
struct Sentry {
    body: Body,
    spawn: SpawnPoint,
}

impl Movable for Sentry {
    fn tag(&self) -> ActorTag {
        ActorTag::Enemy
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn outside_camera_event(&mut self) {
        enemy_exit_camera(self);
    }
}

impl Collidable for Sentry {}

impl Damageable for Sentry {
    fn hurt(&mut self, _source: Rect, _dir: f32, _ctx: &mut TickContext<'_>) -> bool {
        self.body.start_dying();
        true
    }
}

impl EnemyActor for Sentry {
    fn spawn_point(&self) -> &SpawnPoint {
        &self.spawn
    }

    fn spawn_point_mut(&mut self) -> &mut SpawnPoint {
        &mut self.spawn
    }
}

struct ScriptedFactory {
    walk: f32,
}

impl ActorFactory for ScriptedFactory {
    fn player(&mut self, pos: Vec2) -> Box<dyn PlayerActor> {
        Box::new(Walker {
            body: player_body(pos),
            latch: GroundLatch::default(),
            input: self.walk,
        })
    }

    fn enemy(&mut self, _variant: u16, pos: Vec2, _index: usize) -> Option<Box<dyn EnemyActor>> {
        Some(Box::new(Sentry {
            body: enemy_body(pos, true),
            spawn: SpawnPoint::new(pos),
        }))
    }
}

// =============================================================================
// Run
// =============================================================================

#[derive(Debug, Serialize)]
struct Summary {
    ticks: u64,
    player_pos: [f32; 2],
    player_grounded: bool,
    room: [f32; 2],
    rooms_visited: usize,
    kills: i64,
    events: usize,
    tiles_broken: usize,
    transitions: usize,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {what} from {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {what} in {}", path.display()))
}

fn run(cli: &Cli) -> Result<Summary> {
    let desc: StageDesc = read_json(&cli.stage, "stage")?;
    let mut config: SimConfig = match &cli.config {
        Some(path) => read_json(path, "config")?,
        None => SimConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let stage = Stage::from_desc(desc).context("Invalid stage")?;
    let mut factory = ScriptedFactory { walk: cli.walk };
    let mut world = World::new(stage, config, &mut factory).context("Failed to build world")?;

    let mut events = world.take_events();
    for _ in 0..cli.ticks {
        world.step();
        let batch = world.take_events();
        if cli.events {
            for event in &batch {
                println!("{:>6} {event:?}", world.tick());
            }
        }
        events.extend(batch);
    }

    let player = world.player().body();
    let room = world.camera().room();
    Ok(Summary {
        ticks: world.tick(),
        player_pos: player.pos.to_array(),
        player_grounded: world.player().is_grounded(),
        room: room.to_array(),
        rooms_visited: world.progress().count(SetKey::RoomsVisited),
        kills: world.progress().counter(Counter::Kills),
        events: events.len(),
        tiles_broken: events
            .iter()
            .filter(|e| matches!(e, SimEvent::TileBroken { .. }))
            .count(),
        transitions: events
            .iter()
            .filter(|e| matches!(e, SimEvent::TransitionStarted { .. }))
            .count(),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    info!(stage = %cli.stage.display(), ticks = cli.ticks, "headless_run");

    let summary = run(&cli)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("ticks:          {}", summary.ticks);
        println!(
            "player:         ({:.2}, {:.2}){}",
            summary.player_pos[0],
            summary.player_pos[1],
            if summary.player_grounded { " grounded" } else { "" }
        );
        println!("room:           ({}, {})", summary.room[0], summary.room[1]);
        println!("rooms visited:  {}", summary.rooms_visited);
        println!("kills:          {}", summary.kills);
        println!("tiles broken:   {}", summary.tiles_broken);
        println!("transitions:    {}", summary.transitions);
        println!("events:         {}", summary.events);
    }
    Ok(())
}

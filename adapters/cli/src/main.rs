#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives headless Rampart sessions.
//!
//! Wires the pure systems to the authoritative world in a fixed-step loop,
//! plays a session with a simple automatic build policy, and reports progress
//! as text frames.

mod presenter;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use rampart_core::{Command, Event, GameState, Position, TowerKind};
use rampart_system_movement::Movement;
use rampart_system_spawning::Spawning;
use rampart_system_tower_combat::TowerCombat;
use rampart_system_wave_generation::WaveGeneration;
use rampart_world::layout::HitRegion;
use rampart_world::{apply, query, World};

/// Arguments accepted by the headless session driver.
#[derive(Debug, Parser)]
#[command(name = "rampart", about = "Headless Rampart session driver")]
struct Args {
    /// Session seed; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of waves to clear before stopping.
    #[arg(long, default_value_t = 3)]
    waves: u32,
    /// Simulated milliseconds advanced per frame.
    #[arg(long, default_value_t = 30)]
    tick_ms: u64,
    /// Hard cap on simulated frames.
    #[arg(long, default_value_t = 100_000)]
    max_frames: u64,
    /// Print the board every N frames; zero prints only the final frame.
    #[arg(long, default_value_t = 0)]
    show_every: u64,
}

fn main() -> Result<()> {
    run(Args::parse())
}

fn run(args: Args) -> Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);
    println!("session seed: {seed}");

    let mut world = World::new();
    let generator = WaveGeneration::new(seed);
    let mut spawning = Spawning::new();
    let mut movement = Movement::new();
    let mut combat = TowerCombat::new();

    let mut events = Vec::new();
    click_region(&mut world, &mut events, HitRegion::Start)?;
    auto_build(&mut world, &mut events)?;

    let dt = Duration::from_millis(args.tick_ms);
    let mut waves_cleared = 0_u32;

    for frame in 0..args.max_frames {
        let state = query::game_state(&world);
        let towers = query::tower_view(&world);
        let enemies = query::enemy_view(&world);

        let mut commands = Vec::new();
        generator.handle(&events, &mut commands);
        spawning.handle(&events, state, &mut commands);
        movement.handle(&events, state, &mut commands);
        combat.handle(&events, state, &towers, &enemies, &mut commands);

        events.clear();
        for command in commands {
            apply(&mut world, command, &mut events);
        }
        apply(&mut world, Command::Tick { dt }, &mut events);

        report(&events, &world);

        match query::game_state(&world) {
            GameState::Cleared => {
                waves_cleared += 1;
                if waves_cleared >= args.waves {
                    break;
                }
                click_region(&mut world, &mut events, HitRegion::Continue)?;
                auto_build(&mut world, &mut events)?;
            }
            GameState::Menu => break,
            _ => {}
        }

        if args.show_every > 0 && frame % args.show_every == 0 {
            println!("{}", presenter::render_text(&presenter::snapshot(&world)?));
        }
    }

    println!("{}", presenter::render_text(&presenter::snapshot(&world)?));
    println!(
        "waves cleared: {waves_cleared}  final score: {}",
        query::score(&world)
    );
    Ok(())
}

fn report(events: &[Event], world: &World) {
    for event in events {
        match event {
            Event::WaveQueued { wave, pending } => {
                println!("wave {} queued with {pending} enemies", wave.get());
            }
            Event::EnemyLeaked { .. } => {
                println!("an enemy slipped through; session over");
            }
            Event::WaveCleared { wave } => {
                println!("wave {} cleared, score {}", wave.get(), query::score(world));
            }
            _ => {}
        }
    }
}

fn click_region(world: &mut World, events: &mut Vec<Event>, region: HitRegion) -> Result<()> {
    let point = query::layout(world)
        .region_rect(region)
        .with_context(|| format!("layout is missing the {region:?} region"))?
        .center();
    apply(world, Command::Click { point }, events);
    Ok(())
}

/// Greedy build policy: while a fire tower is affordable, claim the next free
/// grass tile that can reach the path by selecting it and clicking it again.
fn auto_build(world: &mut World, events: &mut Vec<Event>) -> Result<()> {
    click_region(world, events, HitRegion::TowerOption(TowerKind::Fire))?;
    let range = TowerKind::Fire.base_range();
    loop {
        if query::score(world) < TowerKind::Fire.cost() {
            return Ok(());
        }
        let tiles = query::tile_view(world);
        let path_centers: Vec<Position> = tiles
            .iter()
            .filter(|tile| !matches!(tile.kind, rampart_world::path::TileKind::Grass))
            .map(|tile| tile.rect.center())
            .collect();
        let Some(site) = tiles.iter().find(|tile| {
            matches!(tile.kind, rampart_world::path::TileKind::Grass)
                && !tile.occupied
                && path_centers
                    .iter()
                    .any(|center| tile.rect.center().distance_to(*center) <= range)
        }) else {
            return Ok(());
        };
        let point = site.rect.center();
        let placed_before = query::tower_view(world).iter().count();
        apply(world, Command::Click { point }, events);
        apply(world, Command::Click { point }, events);
        if query::tower_view(world).iter().count() == placed_before {
            // The world rejected the placement; stop instead of spinning.
            return Ok(());
        }
    }
}

//! End-to-end motion: the pacing system driving the world's path walk.

use std::time::Duration;

use rampart_core::{Command, EnemyKind, EnemySeed, Event, GameState};
use rampart_system_movement::Movement;
use rampart_world::{apply, layout::HitRegion, query, SessionOutcome, World};

const FRAME: Duration = Duration::from_millis(30);

fn start_with_one_enemy(kind: EnemyKind) -> (World, Vec<Event>) {
    let mut world = World::new();
    let mut events = Vec::new();
    let start = query::layout(&world)
        .region_rect(HitRegion::Start)
        .expect("start button")
        .center();
    apply(&mut world, Command::Click { point: start }, &mut events);

    let spawn = query::spawn_position(&world).expect("spawn position");
    let wave = query::wave(&world);
    apply(
        &mut world,
        Command::QueueWave {
            wave,
            seeds: vec![EnemySeed::new(kind, spawn)],
        },
        &mut events,
    );
    apply(&mut world, Command::ReleaseEnemy, &mut events);
    (world, events)
}

fn drive(world: &mut World, events: &mut Vec<Event>, movement: &mut Movement, frames: usize) {
    for _ in 0..frames {
        let mut commands = Vec::new();
        movement.handle(events, query::game_state(world), &mut commands);
        events.clear();
        for command in commands {
            apply(world, command, events);
        }
        apply(world, Command::Tick { dt: FRAME }, events);
        if query::game_state(world) != GameState::InGame {
            break;
        }
    }
}

#[test]
fn enemies_walk_the_waypoints_in_order() {
    let (mut world, mut events) = start_with_one_enemy(EnemyKind::Bat);
    let mut movement = Movement::new();

    let mut last_waypoint = 0;
    for _ in 0..100 {
        drive(&mut world, &mut events, &mut movement, 1);
        if query::game_state(&world) != GameState::InGame {
            break;
        }
        if let Some(snapshot) = query::enemy_view(&world).iter().next() {
            assert!(
                snapshot.waypoint >= last_waypoint,
                "waypoint cursor moved backwards"
            );
            last_waypoint = snapshot.waypoint;
        }
    }
    assert!(last_waypoint > 1, "enemy never advanced along the path");
}

#[test]
fn an_undefended_enemy_leaks_and_ends_the_session() {
    let (mut world, mut events) = start_with_one_enemy(EnemyKind::Bat);
    let mut movement = Movement::new();

    // Bat covers 3.5 px per step; the full path is well under 2000 steps.
    drive(&mut world, &mut events, &mut movement, 2000);

    assert_eq!(query::game_state(&world), GameState::Menu);
    assert_eq!(query::session_outcome(&world), Some(SessionOutcome::Leaked));
    assert!(query::enemy_view(&world).iter().next().is_none());
}

#[test]
fn identical_runs_trace_identical_paths() {
    let trace = |frames: usize| {
        let (mut world, mut events) = start_with_one_enemy(EnemyKind::Normal);
        let mut movement = Movement::new();
        let mut positions = Vec::new();
        for _ in 0..frames {
            drive(&mut world, &mut events, &mut movement, 1);
            if let Some(snapshot) = query::enemy_view(&world).iter().next() {
                positions.push((snapshot.position.x, snapshot.position.y));
            }
        }
        positions
    };
    assert_eq!(trace(300), trace(300));
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tower targeting and fire pacing system.
//!
//! On every targeting interval each tower that is not cooling raycasts the
//! live enemy set in release order and fires at the first enemy inside its
//! range. One shot per tower per interval; the world applies the damage and
//! arms the cooldown.

use std::time::Duration;

use rampart_core::{Command, EnemyView, Event, GameState, TowerView};

/// Simulated time between targeting sweeps.
pub const TARGET_INTERVAL: Duration = Duration::from_millis(30);

/// Pure system that selects targets for idle towers.
#[derive(Debug, Default)]
pub struct TowerCombat {
    accumulator: Duration,
}

impl TowerCombat {
    /// Creates a new combat system with an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes events and views to emit `FireAt` commands for due sweeps.
    pub fn handle(
        &mut self,
        events: &[Event],
        state: GameState,
        towers: &TowerView,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        if state != GameState::InGame {
            self.accumulator = Duration::ZERO;
            return;
        }

        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                self.accumulator = self.accumulator.saturating_add(*dt);
            }
        }

        let mut sweeps = 0_u32;
        while self.accumulator >= TARGET_INTERVAL {
            self.accumulator -= TARGET_INTERVAL;
            sweeps += 1;
        }
        if sweeps == 0 {
            return;
        }

        // The view is a snapshot: a tower that fires stays eligible in later
        // sweeps of the same call, but the world rejects the extra shots
        // because the cooldown is already armed. One sweep is enough.
        sweep(towers, enemies, out);
    }
}

fn sweep(towers: &TowerView, enemies: &EnemyView, out: &mut Vec<Command>) {
    for tower in towers.iter().filter(|tower| !tower.cooling) {
        let target = enemies
            .iter()
            .filter(|enemy| !enemy.dead)
            .find(|enemy| tower.center.distance_to(enemy.position) <= tower.range);
        if let Some(enemy) = target {
            out.push(Command::FireAt {
                tower: tower.id,
                enemy: enemy.id,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::{
        EnemyId, EnemyKind, EnemySnapshot, Health, Position, TowerId, TowerKind, TowerSnapshot,
    };

    fn advanced(ms: u64) -> Event {
        Event::TimeAdvanced {
            dt: Duration::from_millis(ms),
        }
    }

    fn tower(id: u32, center: Position, cooling: bool) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            kind: TowerKind::Fire,
            center,
            cooling,
            range: TowerKind::Fire.base_range(),
        }
    }

    fn enemy(id: u32, position: Position) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Normal,
            position,
            waypoint: 0,
            health: EnemyKind::Normal.max_health(),
            dead: false,
        }
    }

    fn fire_commands(towers: Vec<TowerSnapshot>, enemies: Vec<EnemySnapshot>) -> Vec<Command> {
        let mut system = TowerCombat::new();
        let mut out = Vec::new();
        system.handle(
            &[advanced(30)],
            GameState::InGame,
            &TowerView::from_snapshots(towers),
            &EnemyView::from_snapshots(enemies),
            &mut out,
        );
        out
    }

    #[test]
    fn fires_at_the_first_enemy_in_release_order() {
        let origin = Position::new(75.0, 75.0);
        let out = fire_commands(
            vec![tower(0, origin, false)],
            vec![
                enemy(10, Position::new(75.0, 125.0)),
                enemy(11, Position::new(75.0, 130.0)),
            ],
        );
        assert_eq!(
            out,
            vec![Command::FireAt {
                tower: TowerId::new(0),
                enemy: EnemyId::new(10),
            }]
        );
    }

    #[test]
    fn cooling_towers_hold_their_fire() {
        let origin = Position::new(75.0, 75.0);
        let out = fire_commands(
            vec![tower(0, origin, true)],
            vec![enemy(10, Position::new(75.0, 125.0))],
        );
        assert!(out.is_empty());
    }

    #[test]
    fn out_of_range_enemies_are_ignored() {
        let origin = Position::new(75.0, 75.0);
        let out = fire_commands(
            vec![tower(0, origin, false)],
            vec![enemy(10, Position::new(500.0, 400.0))],
        );
        assert!(out.is_empty());
    }

    #[test]
    fn dead_enemies_are_skipped() {
        let origin = Position::new(75.0, 75.0);
        let mut corpse = enemy(10, Position::new(75.0, 125.0));
        corpse.dead = true;
        corpse.health = Health::new(0);
        let out = fire_commands(
            vec![tower(0, origin, false)],
            vec![corpse, enemy(11, Position::new(75.0, 130.0))],
        );
        assert_eq!(
            out,
            vec![Command::FireAt {
                tower: TowerId::new(0),
                enemy: EnemyId::new(11),
            }]
        );
    }

    #[test]
    fn each_idle_tower_fires_at_most_once_per_sweep() {
        let out = fire_commands(
            vec![
                tower(0, Position::new(75.0, 75.0), false),
                tower(1, Position::new(125.0, 75.0), false),
            ],
            vec![enemy(10, Position::new(75.0, 125.0))],
        );
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn no_sweep_before_the_interval_elapses() {
        let mut system = TowerCombat::new();
        let mut out = Vec::new();
        system.handle(
            &[advanced(29)],
            GameState::InGame,
            &TowerView::from_snapshots(vec![tower(0, Position::new(75.0, 75.0), false)]),
            &EnemyView::from_snapshots(vec![enemy(10, Position::new(75.0, 125.0))]),
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn pausing_drops_the_accumulator() {
        let mut system = TowerCombat::new();
        let mut out = Vec::new();
        let towers = TowerView::from_snapshots(vec![tower(0, Position::new(75.0, 75.0), false)]);
        let enemies = EnemyView::from_snapshots(vec![enemy(10, Position::new(75.0, 125.0))]);
        system.handle(&[advanced(29)], GameState::InGame, &towers, &enemies, &mut out);
        system.handle(&[], GameState::Paused, &towers, &enemies, &mut out);
        system.handle(&[advanced(29)], GameState::InGame, &towers, &enemies, &mut out);
        assert!(out.is_empty());
    }
}

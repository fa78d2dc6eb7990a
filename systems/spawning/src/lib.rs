#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawn release pacing system.
//!
//! The system holds at most one armed delay. Installing a wave arms the
//! initial delay; every release re-arms with the delay of the enemy that just
//! entered the path, so heavier enemies buy the player a longer gap before
//! the next one follows. With the queue drained the system idles until the
//! next wave is installed.

use std::time::Duration;

use rampart_core::{Command, Event, GameState};

/// Delay between installing a wave and releasing its first enemy.
const INITIAL_DELAY: Duration = Duration::from_millis(2000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Arm {
    Idle,
    Armed { remaining: Duration },
}

/// Pure system that emits release commands at the catalog's cadence.
#[derive(Debug, Default)]
pub struct Spawning {
    arm: Option<Duration>,
}

impl Spawning {
    /// Creates a new, idle spawning system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes events to pace enemy releases while a session runs.
    ///
    /// Leaving the in-game state disarms the pending delay; the next wave
    /// installation arms a fresh one.
    pub fn handle(&mut self, events: &[Event], state: GameState, out: &mut Vec<Command>) {
        if state != GameState::InGame {
            self.arm = None;
            return;
        }

        let mut arm = match self.arm {
            Some(remaining) => Arm::Armed { remaining },
            None => Arm::Idle,
        };

        for event in events {
            match event {
                Event::WaveQueued { pending, .. } => {
                    if *pending > 0 {
                        arm = Arm::Armed {
                            remaining: INITIAL_DELAY,
                        };
                    }
                }
                Event::EnemyReleased {
                    kind, remaining, ..
                } => {
                    arm = if *remaining > 0 {
                        Arm::Armed {
                            remaining: kind.spawn_delay(),
                        }
                    } else {
                        Arm::Idle
                    };
                }
                Event::TimeAdvanced { dt } => {
                    if let Arm::Armed { remaining } = arm {
                        let remaining = remaining.saturating_sub(*dt);
                        if remaining.is_zero() {
                            out.push(Command::ReleaseEnemy);
                            // Stay idle until the release confirmation
                            // re-arms with the released enemy's delay.
                            arm = Arm::Idle;
                        } else {
                            arm = Arm::Armed { remaining };
                        }
                    }
                }
                _ => {}
            }
        }

        self.arm = match arm {
            Arm::Armed { remaining } => Some(remaining),
            Arm::Idle => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::{EnemyId, EnemyKind, WaveNumber};

    fn queued(pending: u32) -> Event {
        Event::WaveQueued {
            wave: WaveNumber::new(1),
            pending,
        }
    }

    fn released(kind: EnemyKind, remaining: u32) -> Event {
        Event::EnemyReleased {
            enemy: EnemyId::new(0),
            kind,
            remaining,
        }
    }

    fn advanced(ms: u64) -> Event {
        Event::TimeAdvanced {
            dt: Duration::from_millis(ms),
        }
    }

    #[test]
    fn first_release_waits_for_the_initial_delay() {
        let mut spawning = Spawning::new();
        let mut out = Vec::new();
        spawning.handle(&[queued(3), advanced(1999)], GameState::InGame, &mut out);
        assert!(out.is_empty());
        spawning.handle(&[advanced(1)], GameState::InGame, &mut out);
        assert_eq!(out, vec![Command::ReleaseEnemy]);
    }

    #[test]
    fn release_rearms_with_the_released_kind_delay() {
        let mut spawning = Spawning::new();
        let mut out = Vec::new();
        spawning.handle(
            &[released(EnemyKind::Badass, 2), advanced(2499)],
            GameState::InGame,
            &mut out,
        );
        assert!(out.is_empty());
        spawning.handle(&[advanced(1)], GameState::InGame, &mut out);
        assert_eq!(out, vec![Command::ReleaseEnemy]);
    }

    #[test]
    fn draining_the_queue_idles_the_system() {
        let mut spawning = Spawning::new();
        let mut out = Vec::new();
        spawning.handle(
            &[released(EnemyKind::Bat, 0), advanced(60_000)],
            GameState::InGame,
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn leaving_the_game_disarms_the_delay() {
        let mut spawning = Spawning::new();
        let mut out = Vec::new();
        spawning.handle(&[queued(2), advanced(1500)], GameState::InGame, &mut out);
        spawning.handle(&[], GameState::Paused, &mut out);
        // Back in game, no wave installation: nothing is armed.
        spawning.handle(&[advanced(10_000)], GameState::InGame, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn one_release_per_armed_delay() {
        let mut spawning = Spawning::new();
        let mut out = Vec::new();
        // A huge dt must not release more than the single armed enemy.
        spawning.handle(&[queued(5), advanced(30_000)], GameState::InGame, &mut out);
        assert_eq!(out, vec![Command::ReleaseEnemy]);
    }
}

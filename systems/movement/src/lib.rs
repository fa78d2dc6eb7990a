#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Motion pacing system.
//!
//! Accumulates simulated time and emits one `StepEnemies` command per elapsed
//! motion interval. The world resolves the actual geometry; this system only
//! decides when a step is due.

use std::time::Duration;

use rampart_core::{Command, Event, GameState};

/// Simulated time between motion steps.
pub const STEP_INTERVAL: Duration = Duration::from_millis(30);

/// Pure system that paces enemy motion steps.
#[derive(Debug, Default)]
pub struct Movement {
    accumulator: Duration,
}

impl Movement {
    /// Creates a new movement system with an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes `TimeAdvanced` events and emits due `StepEnemies` commands.
    ///
    /// Outside the in-game state the accumulator is dropped so a pause does
    /// not bank motion steps.
    pub fn handle(&mut self, events: &[Event], state: GameState, out: &mut Vec<Command>) {
        if state != GameState::InGame {
            self.accumulator = Duration::ZERO;
            return;
        }

        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                self.accumulator = self.accumulator.saturating_add(*dt);
            }
        }

        while self.accumulator >= STEP_INTERVAL {
            self.accumulator -= STEP_INTERVAL;
            out.push(Command::StepEnemies);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advanced(ms: u64) -> Event {
        Event::TimeAdvanced {
            dt: Duration::from_millis(ms),
        }
    }

    #[test]
    fn no_step_before_the_interval_elapses() {
        let mut movement = Movement::new();
        let mut out = Vec::new();
        movement.handle(&[advanced(29)], GameState::InGame, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn remainder_carries_across_calls() {
        let mut movement = Movement::new();
        let mut out = Vec::new();
        movement.handle(&[advanced(29)], GameState::InGame, &mut out);
        movement.handle(&[advanced(1)], GameState::InGame, &mut out);
        assert_eq!(out, vec![Command::StepEnemies]);
    }

    #[test]
    fn large_deltas_emit_multiple_steps() {
        let mut movement = Movement::new();
        let mut out = Vec::new();
        movement.handle(&[advanced(95)], GameState::InGame, &mut out);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn pausing_drops_the_accumulator() {
        let mut movement = Movement::new();
        let mut out = Vec::new();
        movement.handle(&[advanced(29)], GameState::InGame, &mut out);
        movement.handle(&[], GameState::Paused, &mut out);
        movement.handle(&[advanced(29)], GameState::InGame, &mut out);
        assert!(out.is_empty());
    }
}

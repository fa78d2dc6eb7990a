#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic token-budget wave generation system.
//!
//! Every wave receives a token budget derived from its number. The generator
//! draws enemy kinds uniformly and spends the budget until it is exhausted;
//! draws the remaining budget cannot afford are skipped and redrawn. Because
//! the cheapest kind costs one token, the loop always terminates with the
//! budget spent exactly.

use rampart_core::{Command, EnemyKind, EnemySeed, Event, Position, WaveNumber};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Tokens granted per budget tier; a tier covers five waves.
const TOKENS_PER_TIER: u32 = 10;

/// Pure system that turns wave requests into spawn queues.
#[derive(Debug)]
pub struct WaveGeneration {
    global_seed: u64,
}

impl WaveGeneration {
    /// Creates a new generator bound to the provided session seed.
    #[must_use]
    pub const fn new(global_seed: u64) -> Self {
        Self { global_seed }
    }

    /// Consumes `WaveRequested` events and emits `QueueWave` commands.
    pub fn handle(&self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            if let Event::WaveRequested {
                wave,
                spawn_position,
            } = event
            {
                let seeds = self.generate(*wave, *spawn_position);
                out.push(Command::QueueWave { wave: *wave, seeds });
            }
        }
    }

    fn generate(&self, wave: WaveNumber, spawn_position: Position) -> Vec<EnemySeed> {
        let mut rng = ChaCha8Rng::seed_from_u64(derive_wave_seed(self.global_seed, wave));
        let mut tokens = wave_budget(wave);
        let mut seeds = Vec::new();
        while tokens > 0 {
            let kind = draw_kind(&mut rng);
            let cost = kind.token_cost();
            if cost > tokens {
                continue;
            }
            tokens -= cost;
            seeds.push(EnemySeed::new(kind, spawn_position));
        }
        seeds
    }
}

/// Token budget of a wave: `ceil(wave / 5) * 10`.
#[must_use]
pub fn wave_budget(wave: WaveNumber) -> u32 {
    let wave = wave.get();
    wave.div_ceil(5) * TOKENS_PER_TIER
}

fn draw_kind(rng: &mut ChaCha8Rng) -> EnemyKind {
    let index = rng.gen_range(0..EnemyKind::ALL.len());
    EnemyKind::ALL[index]
}

fn derive_wave_seed(global_seed: u64, wave: WaveNumber) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(wave.get().to_le_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[0..8]);
    u64::from_le_bytes(bytes)
}

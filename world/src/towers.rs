//! Authoritative tower state and the session-scoped upgrade ledgers.

use std::time::Duration;

use rampart_core::{Rect, TowerId, TowerKind, UpgradeStat};

/// Cooldowns never drop below this floor regardless of upgrades.
const COOLDOWN_FLOOR: Duration = Duration::from_millis(200);
/// Cooldown reduction purchased per rate level.
const COOLDOWN_STEP: Duration = Duration::from_millis(120);
/// Damage added per damage level.
const DAMAGE_STEP: u32 = 2;
/// Range added per range level, in pixels.
const RANGE_STEP: f32 = 12.0;

/// Tower stored inside the world.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Screen rectangle the tower occupies.
    pub(crate) rect: Rect,
    /// Indicates the tower is inside its refractory window.
    pub(crate) cooling: bool,
    /// Bumped on every cooldown arm so stale clear tasks can be detected.
    pub(crate) generation: u64,
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Clone, Debug)]
pub(crate) struct TowerRegistry {
    entries: Vec<TowerState>,
    next_tower_id: u32,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_tower_id: 0,
        }
    }

    /// Places a tower and returns the identifier allocated for it.
    pub(crate) fn place(&mut self, kind: TowerKind, rect: Rect) -> TowerId {
        let id = TowerId::new(self.next_tower_id);
        self.next_tower_id = self.next_tower_id.saturating_add(1);
        self.entries.push(TowerState {
            id,
            kind,
            rect,
            cooling: false,
            generation: 0,
        });
        id
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.iter().find(|tower| tower.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.iter_mut().find(|tower| tower.id == id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.iter()
    }

    /// Removes every tower; identifiers restart from zero for the new session.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.next_tower_id = 0;
    }
}

/// Shared upgrade levels for a single tower kind.
///
/// Levels are global to the kind: purchasing a damage upgrade strengthens
/// every existing and future tower of that kind at once.
#[derive(Clone, Copy, Debug, Default)]
struct UpgradeLedger {
    damage_level: u32,
    range_level: u32,
    rate_level: u32,
}

impl UpgradeLedger {
    fn level(&self, stat: UpgradeStat) -> u32 {
        match stat {
            UpgradeStat::Damage => self.damage_level,
            UpgradeStat::Range => self.range_level,
            UpgradeStat::Rate => self.rate_level,
        }
    }

    fn advance(&mut self, stat: UpgradeStat) -> u32 {
        let slot = match stat {
            UpgradeStat::Damage => &mut self.damage_level,
            UpgradeStat::Range => &mut self.range_level,
            UpgradeStat::Rate => &mut self.rate_level,
        };
        *slot = slot.saturating_add(1);
        *slot
    }
}

/// Session-scoped upgrade economy covering every tower kind.
///
/// Passed around explicitly instead of living in a global so that a new game
/// can reset it wholesale.
#[derive(Clone, Debug, Default)]
pub(crate) struct EconomyContext {
    ledgers: [UpgradeLedger; 3],
}

impl EconomyContext {
    fn ledger(&self, kind: TowerKind) -> &UpgradeLedger {
        &self.ledgers[kind_index(kind)]
    }

    /// Effective damage per hit for the provided kind.
    pub(crate) fn damage(&self, kind: TowerKind) -> u32 {
        kind.base_damage() + DAMAGE_STEP * self.ledger(kind).damage_level
    }

    /// Effective targeting radius for the provided kind, in pixels.
    pub(crate) fn range(&self, kind: TowerKind) -> f32 {
        kind.base_range() + RANGE_STEP * self.ledger(kind).range_level as f32
    }

    /// Effective refractory period for the provided kind, floored so rate
    /// purchases can never disable the cooldown entirely.
    pub(crate) fn cooldown(&self, kind: TowerKind) -> Duration {
        let reduction = COOLDOWN_STEP.saturating_mul(self.ledger(kind).rate_level);
        kind.base_cooldown().saturating_sub(reduction).max(COOLDOWN_FLOOR)
    }

    /// Score required for the next upgrade of the provided statistic.
    pub(crate) fn upgrade_cost(&self, kind: TowerKind, stat: UpgradeStat) -> u32 {
        let level = self.ledger(kind).level(stat);
        let base = match stat {
            UpgradeStat::Damage => 5,
            UpgradeStat::Range => 4,
            UpgradeStat::Rate => 6,
        };
        base * (level + 1)
    }

    /// Advances the statistic one level, returning the level reached.
    pub(crate) fn purchase(&mut self, kind: TowerKind, stat: UpgradeStat) -> u32 {
        self.ledgers[kind_index(kind)].advance(stat)
    }

    /// Current level of the statistic, exposed for queries.
    pub(crate) fn level(&self, kind: TowerKind, stat: UpgradeStat) -> u32 {
        self.ledger(kind).level(stat)
    }

    /// Resets every ledger to level zero for a fresh session.
    pub(crate) fn reset(&mut self) {
        self.ledgers = [UpgradeLedger::default(); 3];
    }
}

fn kind_index(kind: TowerKind) -> usize {
    match kind {
        TowerKind::Fire => 0,
        TowerKind::Ice => 1,
        TowerKind::Earth => 2,
    }
}

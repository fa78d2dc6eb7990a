#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rampart engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.
//!
//! The enemy and tower catalogs live here as `const fn` tables on the kind
//! enums so that every crate reads balance numbers from a single source.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Describes the top-level mode the simulation is currently in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Title screen; no simulation runs.
    Menu,
    /// A wave is actively being resolved.
    InGame,
    /// Simulation suspended; periodic drivers hold their accumulators.
    Paused,
    /// Every enemy of the current wave was destroyed.
    Cleared,
    /// Help pages; reachable only from the menu.
    Help,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Reports the pointer position so the world can refresh hover state.
    Hover {
        /// Pointer position in screen coordinates.
        point: Position,
    },
    /// Reports a pointer press so the world can hit-test its regions.
    Click {
        /// Pointer position in screen coordinates.
        point: Position,
    },
    /// Reports that the pause key was pressed.
    PressPause,
    /// Installs a freshly generated spawn queue for the requested wave.
    QueueWave {
        /// Wave the seeds belong to.
        wave: WaveNumber,
        /// Enemies to release, drained from the back of the list.
        seeds: Vec<EnemySeed>,
    },
    /// Releases the next queued enemy into the live set.
    ReleaseEnemy,
    /// Advances every live enemy one motion step along the path.
    StepEnemies,
    /// Requests that a tower fire at the selected enemy.
    FireAt {
        /// Tower performing the attack.
        tower: TowerId,
        /// Enemy the tower selected this tick.
        enemy: EnemyId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the simulation entered a new top-level state.
    StateChanged {
        /// State that became active after processing commands.
        state: GameState,
    },
    /// Asks the wave generator to produce a spawn queue.
    WaveRequested {
        /// Wave to generate enemies for.
        wave: WaveNumber,
        /// Position newly created enemies start from.
        spawn_position: Position,
    },
    /// Confirms that a spawn queue was installed.
    WaveQueued {
        /// Wave the queue belongs to.
        wave: WaveNumber,
        /// Number of enemies waiting to be released.
        pending: u32,
    },
    /// Confirms that a queued enemy entered the live set.
    EnemyReleased {
        /// Identifier allocated to the released enemy.
        enemy: EnemyId,
        /// Kind of the released enemy.
        kind: EnemyKind,
        /// Number of enemies still waiting in the queue.
        remaining: u32,
    },
    /// Reports that an enemy reached the end of the path alive.
    EnemyLeaked {
        /// Enemy that escaped.
        enemy: EnemyId,
    },
    /// Confirms that a tower was placed onto a tile.
    TowerPlaced {
        /// Identifier allocated to the tower.
        tower: TowerId,
        /// Kind of tower that was purchased.
        kind: TowerKind,
        /// Index of the tile the tower occupies.
        tile: u32,
    },
    /// Confirms that a shared upgrade was purchased for a tower kind.
    UpgradePurchased {
        /// Tower kind whose ledger advanced.
        kind: TowerKind,
        /// Statistic that was upgraded.
        stat: UpgradeStat,
        /// Level reached by the purchase.
        level: u32,
        /// Score deducted for the purchase.
        cost: u32,
    },
    /// Confirms that a tower fired at an enemy.
    TowerFired {
        /// Tower that fired.
        tower: TowerId,
        /// Enemy that was struck.
        enemy: EnemyId,
        /// Damage applied to the enemy.
        damage: u32,
    },
    /// Reports that a tower finished its refractory period.
    CooldownCleared {
        /// Tower that may select targets again.
        tower: TowerId,
    },
    /// Confirms that an enemy died and its reward was credited.
    EnemyKilled {
        /// Enemy that was destroyed.
        enemy: EnemyId,
        /// Score credited for the kill.
        reward: u32,
    },
    /// Confirms that a floating damage number was created.
    DecalSpawned {
        /// Identifier allocated to the decal.
        decal: DecalId,
        /// Damage amount the decal displays.
        amount: u32,
    },
    /// Reports that a floating damage number reached its display duration.
    DecalExpired {
        /// Decal that was removed.
        decal: DecalId,
    },
    /// Announces that the final enemy of the wave was destroyed.
    WaveCleared {
        /// Wave that was resolved.
        wave: WaveNumber,
    },
    /// Asks the hosting adapter to terminate the process.
    ExitRequested,
}

/// Unique identifier assigned to a live enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a floating damage number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DecalId(u32);

impl DecalId {
    /// Creates a new decal identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the decal identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Wave counter, monotonically increasing within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WaveNumber(u32);

impl WaveNumber {
    /// Creates a new wave number wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying wave index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the wave that follows this one.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Remaining hit points of an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the remaining hit points.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Applies damage, saturating at zero.
    #[must_use]
    pub const fn damaged(self, amount: u32) -> Self {
        Self(self.0.saturating_sub(amount))
    }

    /// Reports whether no hit points remain.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 == 0
    }
}

/// Point in continuous screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate in pixels.
    pub x: f32,
    /// Vertical coordinate in pixels.
    pub y: f32,
}

impl Position {
    /// Creates a new position from explicit coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance_to(&self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns this position shifted by the provided deltas.
    #[must_use]
    pub const fn offset(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Axis-aligned rectangle in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge of the rectangle.
    pub x: f32,
    /// Top edge of the rectangle.
    pub y: f32,
    /// Horizontal extent of the rectangle.
    pub width: f32,
    /// Vertical extent of the rectangle.
    pub height: f32,
}

impl Rect {
    /// Creates a new rectangle from its top-left corner and extents.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle of the given extents centered on a position.
    #[must_use]
    pub const fn centered_on(center: Position, width: f32, height: f32) -> Self {
        Self {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
            width,
            height,
        }
    }

    /// Reports whether the rectangle contains the provided point.
    #[must_use]
    pub fn contains(&self, point: Position) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Center of the rectangle.
    #[must_use]
    pub const fn center(&self) -> Position {
        Position::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Enemy archetypes available to the wave generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Baseline walker; cheap and plentiful.
    Normal,
    /// Slow, heavily armored bruiser.
    Badass,
    /// Fast, fragile flyer.
    Bat,
}

impl EnemyKind {
    /// Every enemy kind the wave generator may draw from.
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Normal, EnemyKind::Badass, EnemyKind::Bat];

    /// Wave-budget tokens consumed by spawning one enemy of this kind.
    #[must_use]
    pub const fn token_cost(self) -> u32 {
        match self {
            Self::Normal => 1,
            Self::Badass => 3,
            Self::Bat => 3,
        }
    }

    /// Hit points an enemy of this kind starts with.
    #[must_use]
    pub const fn max_health(self) -> Health {
        match self {
            Self::Normal => Health::new(10),
            Self::Badass => Health::new(30),
            Self::Bat => Health::new(8),
        }
    }

    /// Distance covered per motion step, in pixels.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Normal => 2.0,
            Self::Badass => 1.2,
            Self::Bat => 3.5,
        }
    }

    /// Score credited when an enemy of this kind dies.
    #[must_use]
    pub const fn reward(self) -> u32 {
        match self {
            Self::Normal => 2,
            Self::Badass => 6,
            Self::Bat => 4,
        }
    }

    /// Delay before the next queued enemy follows this one onto the path.
    #[must_use]
    pub const fn spawn_delay(self) -> Duration {
        match self {
            Self::Normal => Duration::from_millis(1000),
            Self::Badass => Duration::from_millis(2500),
            Self::Bat => Duration::from_millis(600),
        }
    }
}

/// Tower archetypes available for purchase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerKind {
    /// Balanced damage dealer.
    Fire,
    /// Rapid, low-damage attacker with long reach.
    Ice,
    /// Slow, devastating short-range bombard.
    Earth,
}

impl TowerKind {
    /// Every tower kind offered on the build panel, in panel order.
    pub const ALL: [TowerKind; 3] = [TowerKind::Fire, TowerKind::Ice, TowerKind::Earth];

    /// Score required to place one tower of this kind.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Fire => 10,
            Self::Ice => 15,
            Self::Earth => 20,
        }
    }

    /// Damage per hit before ledger upgrades are applied.
    #[must_use]
    pub const fn base_damage(self) -> u32 {
        match self {
            Self::Fire => 4,
            Self::Ice => 2,
            Self::Earth => 9,
        }
    }

    /// Targeting radius in pixels before ledger upgrades are applied.
    #[must_use]
    pub const fn base_range(self) -> f32 {
        match self {
            Self::Fire => 90.0,
            Self::Ice => 120.0,
            Self::Earth => 70.0,
        }
    }

    /// Refractory period after firing before ledger upgrades are applied.
    #[must_use]
    pub const fn base_cooldown(self) -> Duration {
        match self {
            Self::Fire => Duration::from_millis(800),
            Self::Ice => Duration::from_millis(450),
            Self::Earth => Duration::from_millis(1400),
        }
    }
}

/// Statistics that can be upgraded per tower kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeStat {
    /// Damage applied per hit.
    Damage,
    /// Targeting radius.
    Range,
    /// Firing rate; purchases shorten the cooldown.
    Rate,
}

impl UpgradeStat {
    /// Every upgradeable statistic, in panel order.
    pub const ALL: [UpgradeStat; 3] = [UpgradeStat::Damage, UpgradeStat::Range, UpgradeStat::Rate];
}

/// Description of a not-yet-released enemy sitting in the spawn queue.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySeed {
    /// Kind of enemy to release.
    pub kind: EnemyKind,
    /// Position the enemy starts from.
    pub position: Position,
}

impl EnemySeed {
    /// Creates a new seed for the provided kind and spawn position.
    #[must_use]
    pub const fn new(kind: EnemyKind, position: Position) -> Self {
        Self { kind, position }
    }
}

/// Immutable representation of a single live enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier allocated to the enemy by the world.
    pub id: EnemyId,
    /// Kind of the enemy.
    pub kind: EnemyKind,
    /// Current position of the enemy's center.
    pub position: Position,
    /// Index of the waypoint the enemy most recently passed.
    pub waypoint: usize,
    /// Remaining hit points.
    pub health: Health,
    /// Indicates the enemy died and awaits cleanup.
    pub dead: bool,
}

/// Read-only snapshot describing all live enemies, in release order.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    ///
    /// Order is preserved: targeting scans enemies in live-set order, so the
    /// view must not re-sort what the world captured.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<EnemySnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in live-set order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower used for queries.
///
/// Range and the cooling flag are resolved through the shared upgrade ledger
/// before the snapshot is captured, so consumers never need ledger access of
/// their own.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of the tower.
    pub kind: TowerKind,
    /// Center of the tile the tower occupies.
    pub center: Position,
    /// Indicates the tower is inside its refractory window.
    pub cooling: bool,
    /// Effective targeting radius in pixels.
    pub range: f32,
}

/// Read-only snapshot describing all placed towers in deterministic order.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a floating damage number.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecalSnapshot {
    /// Identifier allocated to the decal by the world.
    pub id: DecalId,
    /// Damage amount the decal displays.
    pub amount: u32,
    /// Current position of the decal.
    pub position: Position,
}

#[cfg(test)]
mod tests {
    use super::{
        EnemyId, EnemyKind, EnemySeed, GameState, Health, Position, Rect, TowerId, TowerKind,
        WaveNumber,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn identifiers_round_trip_through_bincode() {
        assert_round_trip(&EnemyId::new(7));
        assert_round_trip(&TowerId::new(42));
        assert_round_trip(&WaveNumber::new(3));
    }

    #[test]
    fn enemy_seed_round_trips_through_bincode() {
        let seed = EnemySeed::new(EnemyKind::Badass, Position::new(75.0, 125.0));
        assert_round_trip(&seed);
    }

    #[test]
    fn game_state_round_trips_through_bincode() {
        assert_round_trip(&GameState::Cleared);
    }

    #[test]
    fn health_saturates_at_zero() {
        let health = Health::new(5).damaged(9);
        assert!(health.is_depleted());
        assert_eq!(health.get(), 0);
    }

    #[test]
    fn rect_contains_its_center() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert!(rect.contains(rect.center()));
        assert!(!rect.contains(Position::new(0.0, 0.0)));
    }

    #[test]
    fn centered_rect_reports_original_center() {
        let center = Position::new(100.0, 50.0);
        let rect = Rect::centered_on(center, 30.0, 30.0);
        assert_eq!(rect.center(), center);
    }

    #[test]
    fn token_costs_match_catalog() {
        assert_eq!(EnemyKind::Normal.token_cost(), 1);
        assert_eq!(EnemyKind::Badass.token_cost(), 3);
        assert_eq!(EnemyKind::Bat.token_cost(), 3);
    }

    #[test]
    fn fire_tower_costs_ten() {
        assert_eq!(TowerKind::Fire.cost(), 10);
    }

    #[test]
    fn wave_number_advances_monotonically() {
        let wave = WaveNumber::new(4);
        assert_eq!(wave.next().get(), 5);
        assert!(wave.next() > wave);
    }

    #[test]
    fn distance_is_euclidean() {
        let origin = Position::new(0.0, 0.0);
        let point = Position::new(3.0, 4.0);
        assert!((origin.distance_to(point) - 5.0).abs() < f32::EPSILON);
    }
}

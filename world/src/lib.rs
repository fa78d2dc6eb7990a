#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Rampart.
//!
//! The world owns every mutable fact of the simulation: the tile map, the
//! live enemy set, placed towers, the score, the spawn queue, floating damage
//! numbers, and the simulated-time task queue. Adapters and systems never
//! mutate it directly; they submit [`Command`] values through [`apply`] and
//! observe the resulting [`Event`] stream plus the read-only [`query`] views.

pub mod layout;
pub mod path;
mod timeline;
mod towers;

use std::time::Duration;

use rampart_core::{
    Command, DecalId, EnemyId, EnemyKind, EnemySeed, Event, GameState, Health, Position, Rect,
    TowerId, TowerKind, UpgradeStat, WaveNumber,
};

use crate::layout::{HitRegion, Layout};
use crate::path::{PathNetwork, TileMap, TILE_LENGTH};
use crate::timeline::{Timeline, TimelineTask};
use crate::towers::{EconomyContext, TowerRegistry};

/// Score every fresh session starts with.
pub const STARTING_SCORE: u32 = 20;
/// Side length of the square an enemy occupies on screen.
pub const ENEMY_EXTENT: f32 = 30.0;
/// Number of help pages the help screen can flip through.
pub const HELP_PAGE_COUNT: usize = 3;

/// Display duration of a floating damage number.
const DECAL_TTL: Duration = Duration::from_millis(1000);
/// Upward drift of a floating damage number, in pixels per second.
const DECAL_DRIFT: f32 = 20.0;
const DECAL_RNG_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// How the most recent session ended, if it ended at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    /// An enemy reached the end of the path alive.
    Leaked,
}

/// A single live enemy walking the path.
#[derive(Clone, Copy, Debug)]
struct EnemyState {
    id: EnemyId,
    kind: EnemyKind,
    position: Position,
    /// Index of the waypoint the enemy is currently walking toward.
    waypoint: usize,
    health: Health,
    dead: bool,
}

/// A floating damage number drifting upward until its lifetime expires.
#[derive(Clone, Copy, Debug)]
struct DecalState {
    id: DecalId,
    amount: u32,
    position: Position,
}

/// Session purse with a defensive clamp on overdraw.
///
/// Every purchase path checks affordability before calling [`Economy::spend`],
/// so an overdraw indicates a bookkeeping bug; the flag records it instead of
/// letting the score wrap.
#[derive(Clone, Copy, Debug)]
struct Economy {
    score: u32,
    overspend_detected: bool,
}

impl Economy {
    const fn new(score: u32) -> Self {
        Self {
            score,
            overspend_detected: false,
        }
    }

    fn can_afford(&self, cost: u32) -> bool {
        self.score >= cost
    }

    fn spend(&mut self, cost: u32) {
        if cost > self.score {
            self.overspend_detected = true;
        }
        self.score = self.score.saturating_sub(cost);
    }

    fn credit(&mut self, amount: u32) {
        self.score = self.score.saturating_add(amount);
    }
}

/// Linear congruential generator used for cosmetic jitter only.
#[derive(Clone, Copy, Debug)]
struct Lcg {
    state: u64,
}

impl Lcg {
    const fn seeded(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_random(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.state
    }

    /// Integer pixel offset in `-2..=2`.
    fn jitter(&mut self) -> f32 {
        (self.next_random() % 5) as f32 - 2.0
    }
}

/// Represents the authoritative Rampart world state.
#[derive(Debug)]
pub struct World {
    state: GameState,
    clock: Duration,
    timeline: Timeline,
    map: TileMap,
    path: PathNetwork,
    layout: Layout,
    towers: TowerRegistry,
    upgrades: EconomyContext,
    economy: Economy,
    wave: WaveNumber,
    wave_active: bool,
    spawn_queue: Vec<EnemySeed>,
    enemies: Vec<EnemyState>,
    decals: Vec<DecalState>,
    next_enemy_id: u32,
    next_decal_id: u32,
    rng: Lcg,
    selected_tile: Option<usize>,
    current_tower_kind: TowerKind,
    hover: Option<Position>,
    help_page: usize,
    outcome: Option<SessionOutcome>,
}

impl World {
    /// Creates a new world sitting on the menu with the standard map.
    #[must_use]
    pub fn new() -> Self {
        let map = TileMap::standard();
        let path = PathNetwork::from_map(&map);
        Self {
            state: GameState::Menu,
            clock: Duration::ZERO,
            timeline: Timeline::default(),
            map,
            path,
            layout: Layout::standard(),
            towers: TowerRegistry::new(),
            upgrades: EconomyContext::default(),
            economy: Economy::new(0),
            wave: WaveNumber::new(0),
            wave_active: false,
            spawn_queue: Vec::new(),
            enemies: Vec::new(),
            decals: Vec::new(),
            next_enemy_id: 0,
            next_decal_id: 0,
            rng: Lcg::seeded(DECAL_RNG_SEED),
            selected_tile: None,
            current_tower_kind: TowerKind::Fire,
            hover: None,
            help_page: 0,
            outcome: None,
        }
    }

    fn transition(&mut self, state: GameState, out_events: &mut Vec<Event>) {
        if self.state != state {
            self.state = state;
            out_events.push(Event::StateChanged { state });
        }
    }

    /// Resets every session-scoped fact and requests the first wave.
    fn new_session(&mut self, out_events: &mut Vec<Event>) {
        self.map.clear_session();
        self.towers.clear();
        self.upgrades.reset();
        self.economy = Economy::new(STARTING_SCORE);
        self.spawn_queue.clear();
        self.enemies.clear();
        self.decals.clear();
        self.timeline.clear();
        self.next_enemy_id = 0;
        self.next_decal_id = 0;
        self.selected_tile = None;
        self.current_tower_kind = TowerKind::Fire;
        self.wave = WaveNumber::new(0);
        self.wave_active = false;
        self.outcome = None;
        self.transition(GameState::InGame, out_events);
        self.request_next_wave(out_events);
    }

    fn request_next_wave(&mut self, out_events: &mut Vec<Event>) {
        self.wave = self.wave.next();
        if let Some(spawn_position) = self.path.spawn_position() {
            out_events.push(Event::WaveRequested {
                wave: self.wave,
                spawn_position,
            });
        }
    }

    /// Tears the live session down after a leak.
    fn end_session(&mut self, outcome: SessionOutcome, out_events: &mut Vec<Event>) {
        self.spawn_queue.clear();
        self.enemies.clear();
        self.decals.clear();
        self.timeline.clear();
        self.wave_active = false;
        self.selected_tile = None;
        self.outcome = Some(outcome);
        self.transition(GameState::Menu, out_events);
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.state != GameState::InGame {
            return;
        }
        self.clock = self.clock.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        for decal in &mut self.decals {
            decal.position.y -= DECAL_DRIFT * dt.as_secs_f32();
        }

        while let Some(task) = self.timeline.due(self.clock) {
            match task {
                TimelineTask::ClearCooldown { tower, generation } => {
                    if let Some(entry) = self.towers.get_mut(tower) {
                        if entry.generation == generation && entry.cooling {
                            entry.cooling = false;
                            out_events.push(Event::CooldownCleared { tower });
                        }
                    }
                }
                TimelineTask::ExpireDecal { decal } => {
                    let before = self.decals.len();
                    self.decals.retain(|entry| entry.id != decal);
                    if self.decals.len() != before {
                        out_events.push(Event::DecalExpired { decal });
                    }
                }
            }
        }
    }

    fn install_wave(&mut self, wave: WaveNumber, seeds: Vec<EnemySeed>, out_events: &mut Vec<Event>) {
        // A queue generated for a wave the session has moved past is dropped.
        if self.state != GameState::InGame || wave != self.wave {
            return;
        }
        let pending = seeds.len() as u32;
        self.spawn_queue = seeds;
        self.wave_active = true;
        out_events.push(Event::WaveQueued { wave, pending });
    }

    fn release_enemy(&mut self, out_events: &mut Vec<Event>) {
        if self.state != GameState::InGame {
            return;
        }
        let Some(seed) = self.spawn_queue.pop() else {
            return;
        };
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.saturating_add(1);
        self.enemies.push(EnemyState {
            id,
            kind: seed.kind,
            position: seed.position,
            waypoint: 0,
            health: seed.kind.max_health(),
            dead: false,
        });
        out_events.push(Event::EnemyReleased {
            enemy: id,
            kind: seed.kind,
            remaining: self.spawn_queue.len() as u32,
        });
    }

    fn step_enemies(&mut self, out_events: &mut Vec<Event>) {
        if self.state != GameState::InGame {
            return;
        }
        let Some(final_waypoint) = self.path.final_waypoint() else {
            return;
        };
        let final_rect = Rect::centered_on(final_waypoint, TILE_LENGTH, TILE_LENGTH);

        let mut leaked = None;
        for enemy in &mut self.enemies {
            if enemy.dead {
                continue;
            }
            // The leak test runs before the waypoint test so an enemy inside
            // the final tile ends the session instead of advancing further.
            if final_rect.contains(enemy.position) {
                leaked = Some(enemy.id);
                break;
            }
            if enemy.waypoint < self.path.len() {
                if let Some(target) = self.path.waypoint(enemy.waypoint) {
                    let target_rect = Rect::centered_on(target, TILE_LENGTH, TILE_LENGTH);
                    if target_rect.contains(enemy.position) {
                        enemy.waypoint += 1;
                    }
                }
            }
            if let Some(target) = self.path.waypoint(enemy.waypoint.min(self.path.len() - 1)) {
                let distance = enemy.position.distance_to(target);
                let step = enemy.kind.speed();
                if distance <= step {
                    enemy.position = target;
                } else {
                    let dx = (target.x - enemy.position.x) / distance;
                    let dy = (target.y - enemy.position.y) / distance;
                    enemy.position = enemy.position.offset(dx * step, dy * step);
                }
            }
        }

        if let Some(enemy) = leaked {
            out_events.push(Event::EnemyLeaked { enemy });
            self.end_session(SessionOutcome::Leaked, out_events);
        }
    }

    /// Credits rewards for dead enemies, then removes them from the live set.
    fn reap_dead(&mut self, out_events: &mut Vec<Event>) {
        for enemy in self.enemies.iter().filter(|enemy| enemy.dead) {
            let reward = enemy.kind.reward();
            self.economy.credit(reward);
            out_events.push(Event::EnemyKilled {
                enemy: enemy.id,
                reward,
            });
        }
        self.enemies.retain(|enemy| !enemy.dead);
    }

    fn check_wave_cleared(&mut self, out_events: &mut Vec<Event>) {
        if self.state == GameState::InGame
            && self.wave_active
            && self.spawn_queue.is_empty()
            && self.enemies.is_empty()
        {
            self.wave_active = false;
            out_events.push(Event::WaveCleared { wave: self.wave });
            self.transition(GameState::Cleared, out_events);
        }
    }

    fn fire_at(&mut self, tower: TowerId, enemy: EnemyId, out_events: &mut Vec<Event>) {
        if self.state != GameState::InGame {
            return;
        }
        let Some(tower_state) = self.towers.get(tower) else {
            return;
        };
        if tower_state.cooling {
            return;
        }
        let kind = tower_state.kind;
        let origin = tower_state.rect.center();
        let Some(target) = self
            .enemies
            .iter_mut()
            .find(|candidate| candidate.id == enemy && !candidate.dead)
        else {
            return;
        };
        if origin.distance_to(target.position) > self.upgrades.range(kind) {
            return;
        }

        let damage = self.upgrades.damage(kind);
        target.health = target.health.damaged(damage);
        let killed = target.health.is_depleted();
        if killed {
            target.dead = true;
        }
        let impact = target.position;
        out_events.push(Event::TowerFired {
            tower,
            enemy,
            damage,
        });

        let cooldown = self.upgrades.cooldown(kind);
        if let Some(entry) = self.towers.get_mut(tower) {
            entry.cooling = true;
            entry.generation = entry.generation.saturating_add(1);
            self.timeline.run_once(
                self.clock,
                cooldown,
                TimelineTask::ClearCooldown {
                    tower,
                    generation: entry.generation,
                },
            );
        }

        self.spawn_decal(impact, damage, out_events);

        // Kills are settled immediately: reward, removal, and the wave-clear
        // check all happen before the next command is applied.
        if killed {
            self.reap_dead(out_events);
            self.check_wave_cleared(out_events);
        }
    }

    fn spawn_decal(&mut self, impact: Position, amount: u32, out_events: &mut Vec<Event>) {
        let id = DecalId::new(self.next_decal_id);
        self.next_decal_id = self.next_decal_id.saturating_add(1);
        let position = impact.offset(self.rng.jitter(), self.rng.jitter());
        self.decals.push(DecalState {
            id,
            amount,
            position,
        });
        self.timeline
            .run_once(self.clock, DECAL_TTL, TimelineTask::ExpireDecal { decal: id });
        out_events.push(Event::DecalSpawned { decal: id, amount });
    }

    fn toggle_pause(&mut self, out_events: &mut Vec<Event>) {
        match self.state {
            GameState::InGame => self.transition(GameState::Paused, out_events),
            GameState::Paused => self.transition(GameState::InGame, out_events),
            _ => {}
        }
    }

    fn click(&mut self, point: Position, out_events: &mut Vec<Event>) {
        if let Some(region) = self.layout.hit_test(self.state, point) {
            self.activate_region(region, out_events);
            return;
        }
        if self.state == GameState::InGame {
            self.select_tile(point, out_events);
        }
    }

    fn activate_region(&mut self, region: HitRegion, out_events: &mut Vec<Event>) {
        match region {
            HitRegion::Start => self.new_session(out_events),
            HitRegion::Help => {
                self.help_page = 0;
                self.transition(GameState::Help, out_events);
            }
            HitRegion::Quit => out_events.push(Event::ExitRequested),
            HitRegion::Resume => self.transition(GameState::InGame, out_events),
            HitRegion::MainMenu => {
                self.spawn_queue.clear();
                self.enemies.clear();
                self.decals.clear();
                self.timeline.clear();
                self.wave_active = false;
                self.selected_tile = None;
                self.transition(GameState::Menu, out_events);
            }
            HitRegion::PrevPage => {
                self.help_page = self
                    .help_page
                    .checked_sub(1)
                    .unwrap_or(HELP_PAGE_COUNT - 1);
            }
            HitRegion::NextPage => {
                self.help_page = (self.help_page + 1) % HELP_PAGE_COUNT;
            }
            HitRegion::Back => self.transition(GameState::Menu, out_events),
            HitRegion::Continue => {
                self.transition(GameState::InGame, out_events);
                self.request_next_wave(out_events);
            }
            HitRegion::TowerOption(kind) => self.current_tower_kind = kind,
            HitRegion::Upgrade(stat) => self.purchase_upgrade(stat, out_events),
        }
    }

    /// First click selects a free grass tile; a second click on the selected
    /// tile buys the current tower kind there. Clicking anywhere else clears
    /// the selection.
    fn select_tile(&mut self, point: Position, out_events: &mut Vec<Event>) {
        let hit = self.map.hit_test(point);
        if hit.is_some() && hit == self.selected_tile {
            self.place_tower(self.current_tower_kind, out_events);
            return;
        }
        self.selected_tile = None;
        if let Some(index) = hit {
            if let Some(tile) = self.map.tile_mut(index) {
                if !tile.is_path() && !tile.occupied {
                    tile.selected = true;
                    self.selected_tile = Some(index);
                }
            }
        }
        self.map.deselect_except(self.selected_tile);
    }

    /// Rejections are silent: the click simply has no effect.
    fn place_tower(&mut self, kind: TowerKind, out_events: &mut Vec<Event>) {
        let Some(index) = self.selected_tile else {
            return;
        };
        let cost = kind.cost();
        if !self.economy.can_afford(cost) {
            return;
        }
        let Some(tile) = self.map.tile_mut(index) else {
            return;
        };
        if tile.is_path() || tile.occupied {
            return;
        }
        tile.occupied = true;
        tile.selected = false;
        let rect = tile.rect;
        self.economy.spend(cost);
        let tower = self.towers.place(kind, rect);
        self.selected_tile = None;
        self.map.deselect_except(None);
        out_events.push(Event::TowerPlaced {
            tower,
            kind,
            tile: index as u32,
        });
    }

    /// Upgrades apply to the current tower kind and are shared by every tower
    /// of that kind, existing and future.
    fn purchase_upgrade(&mut self, stat: UpgradeStat, out_events: &mut Vec<Event>) {
        let kind = self.current_tower_kind;
        let cost = self.upgrades.upgrade_cost(kind, stat);
        if !self.economy.can_afford(cost) {
            return;
        }
        self.economy.spend(cost);
        let level = self.upgrades.purchase(kind, stat);
        out_events.push(Event::UpgradePurchased {
            kind,
            stat,
            level,
            cost,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::Hover { point } => world.hover = Some(point),
        Command::Click { point } => world.click(point, out_events),
        Command::PressPause => world.toggle_pause(out_events),
        Command::QueueWave { wave, seeds } => world.install_wave(wave, seeds, out_events),
        Command::ReleaseEnemy => world.release_enemy(out_events),
        Command::StepEnemies => world.step_enemies(out_events),
        Command::FireAt { tower, enemy } => world.fire_at(tower, enemy, out_events),
    }
}

/// Read-only views over the world for systems and adapters.
pub mod query {
    use rampart_core::{
        DecalSnapshot, EnemySnapshot, EnemyView, GameState, Position, Rect, TowerKind,
        TowerSnapshot, TowerView, UpgradeStat, WaveNumber,
    };

    use super::{SessionOutcome, World};
    use crate::layout::{HitRegion, Layout};
    use crate::path::TileKind;

    /// Current top-level state of the simulation.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state
    }

    /// Current score of the session.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.economy.score
    }

    /// Wave the session is currently resolving.
    #[must_use]
    pub fn wave(world: &World) -> WaveNumber {
        world.wave
    }

    /// Number of enemies still waiting in the spawn queue.
    #[must_use]
    pub fn pending_spawns(world: &World) -> u32 {
        world.spawn_queue.len() as u32
    }

    /// Index of the currently selected tile, if any.
    #[must_use]
    pub fn selected_tile(world: &World) -> Option<usize> {
        world.selected_tile
    }

    /// Help page currently shown on the help screen.
    #[must_use]
    pub fn help_page(world: &World) -> usize {
        world.help_page
    }

    /// How the previous session ended, if one ended.
    #[must_use]
    pub fn session_outcome(world: &World) -> Option<SessionOutcome> {
        world.outcome
    }

    /// Reports whether a purchase ever overdrew the score.
    #[must_use]
    pub fn overspend_detected(world: &World) -> bool {
        world.economy.overspend_detected
    }

    /// Fixed screen layout for rendering and tooltip placement.
    #[must_use]
    pub fn layout(world: &World) -> &Layout {
        &world.layout
    }

    /// Interactive region currently under the pointer, if any.
    #[must_use]
    pub fn hover_region(world: &World) -> Option<HitRegion> {
        world
            .hover
            .and_then(|point| world.layout.hit_test(world.state, point))
    }

    /// Tooltip text for the region under the pointer, if one applies.
    #[must_use]
    pub fn tooltip(world: &World) -> Option<String> {
        match hover_region(world)? {
            HitRegion::TowerOption(kind) => {
                Some(format!("{kind:?} tower: {} points", kind.cost()))
            }
            HitRegion::Upgrade(stat) => {
                let kind = world.current_tower_kind;
                let cost = world.upgrades.upgrade_cost(kind, stat);
                let level = world.upgrades.level(kind, stat);
                Some(format!(
                    "{kind:?} {stat:?} level {next}: {cost} points",
                    next = level + 1
                ))
            }
            _ => None,
        }
    }

    /// Tower kind the next placement or upgrade purchase applies to.
    #[must_use]
    pub fn selected_tower_kind(world: &World) -> TowerKind {
        world.current_tower_kind
    }

    /// Score required for the next upgrade of the statistic on the current
    /// tower kind.
    #[must_use]
    pub fn upgrade_cost(world: &World, stat: UpgradeStat) -> u32 {
        world.upgrades.upgrade_cost(world.current_tower_kind, stat)
    }

    /// Captures a read-only view of the live enemies in release order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let snapshots: Vec<EnemySnapshot> = world
            .enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                kind: enemy.kind,
                position: enemy.position,
                waypoint: enemy.waypoint,
                health: enemy.health,
                dead: enemy.dead,
            })
            .collect();
        EnemyView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of every placed tower.
    ///
    /// Range and the cooling flag are resolved through the shared upgrade
    /// ledger here so consumers never need ledger access of their own.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        let snapshots: Vec<TowerSnapshot> = world
            .towers
            .iter()
            .map(|tower| TowerSnapshot {
                id: tower.id,
                kind: tower.kind,
                center: tower.rect.center(),
                cooling: tower.cooling,
                range: world.upgrades.range(tower.kind),
            })
            .collect();
        TowerView::from_snapshots(snapshots)
    }

    /// Captures the floating damage numbers currently on screen.
    #[must_use]
    pub fn decal_view(world: &World) -> Vec<DecalSnapshot> {
        world
            .decals
            .iter()
            .map(|decal| DecalSnapshot {
                id: decal.id,
                amount: decal.amount,
                position: decal.position,
            })
            .collect()
    }

    /// One tile of the map as seen by adapters.
    #[derive(Clone, Copy, Debug)]
    pub struct TileSnapshot {
        /// Classification of the tile.
        pub kind: TileKind,
        /// Screen rectangle of the tile.
        pub rect: Rect,
        /// Indicates a tower occupies the tile.
        pub occupied: bool,
        /// Indicates the tile is the current selection.
        pub selected: bool,
    }

    /// Captures the full tile grid for rendering.
    #[must_use]
    pub fn tile_view(world: &World) -> Vec<TileSnapshot> {
        world
            .map
            .tiles()
            .iter()
            .map(|tile| TileSnapshot {
                kind: tile.kind,
                rect: tile.rect,
                occupied: tile.occupied,
                selected: tile.selected,
            })
            .collect()
    }

    /// Position newly released enemies start from.
    #[must_use]
    pub fn spawn_position(world: &World) -> Option<Position> {
        world.path.spawn_position()
    }
}

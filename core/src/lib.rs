#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Emberline combat simulation.
//!
//! This crate defines the message surface that connects the headless driver,
//! the authoritative world, and pure systems. Drivers submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! views, and respond exclusively with new command batches.
//!
//! All simulated time is measured in nanoseconds and all distances in world
//! tiles.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Double precision 2D vector used for every position and velocity.
pub type Vec2 = glam::DVec2;

/// Number of simulated nanoseconds in one second.
pub const NANOS_PER_SECOND: f64 = 1e9;

/// Horizon over which a target's planned motion is projected when aiming.
pub const MAX_FLIGHT_TIME_NS: i64 = 10_000_000_000;

/// Converts a tick duration into signed nanoseconds, saturating on overflow.
#[must_use]
pub fn duration_to_nanos(duration: Duration) -> i64 {
    i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX)
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a new enemy enter the road network at a waypoint.
    SpawnEnemy {
        /// Route node the enemy starts from.
        waypoint: WaypointCoord,
        /// Kind of enemy to create.
        kind: EnemyKind,
    },
    /// Requests placement of a tower at a world position.
    PlaceTower {
        /// Launch point used for every projectile fired by the tower.
        position: Vec2,
        /// Combat parameters of the tower.
        loadout: TowerLoadout,
    },
    /// Switches the aim strategy of an existing tower.
    SetAimStrategy {
        /// Tower to reconfigure.
        tower: TowerId,
        /// Strategy to activate.
        strategy: AimStrategy,
    },
    /// Requests that a tower fire at the first candidate it can intercept.
    FireProjectile {
        /// Tower that fires.
        tower: TowerId,
        /// Candidate targets in order of preference.
        candidates: Vec<EnemyId>,
    },
    /// Requests that the next wave's road network replace the current one.
    AdvanceWave,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an enemy entered the road network.
    EnemySpawned {
        /// Identifier assigned to the new enemy.
        enemy: EnemyId,
        /// Kind of the new enemy.
        kind: EnemyKind,
        /// Route node the enemy started from.
        waypoint: WaypointCoord,
    },
    /// Reports that a spawn request was rejected.
    SpawnRejected {
        /// Route node provided in the request.
        waypoint: WaypointCoord,
        /// Kind provided in the request.
        kind: EnemyKind,
        /// Specific reason the spawn failed.
        reason: SpawnRejection,
    },
    /// Reports damage dealt to an enemy by a landing projectile or a burn.
    EnemyDamaged {
        /// Enemy that was damaged.
        enemy: EnemyId,
        /// Amount of health removed.
        damage: f64,
        /// Health left after the damage was applied.
        health: f64,
    },
    /// Announces that an enemy reached the final waypoint of its route.
    EnemyArrived {
        /// Enemy that completed its route.
        enemy: EnemyId,
    },
    /// Announces that an enemy ran out of health and left the world.
    EnemyDied {
        /// Enemy that died.
        enemy: EnemyId,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Launch point of the tower.
        position: Vec2,
    },
    /// Confirms that a tower switched aim strategy.
    AimStrategyChanged {
        /// Tower that was reconfigured.
        tower: TowerId,
        /// Strategy now active.
        strategy: AimStrategy,
    },
    /// Reports that a command referenced a tower that does not exist.
    TowerMissing {
        /// Identifier provided in the command.
        tower: TowerId,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileLaunched {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Enemy the intercept was computed for.
        target: EnemyId,
        /// Point where the projectile will land.
        impact: Vec2,
        /// Flight duration in nanoseconds.
        flight_time_ns: i64,
    },
    /// Reports that no candidate could be intercepted; the tower retries next tick.
    ShotSkipped {
        /// Tower whose shot was skipped.
        tower: TowerId,
    },
    /// Announces that a projectile reached its impact point.
    ProjectileLanded {
        /// Projectile that landed.
        projectile: ProjectileId,
        /// Landing location.
        position: Vec2,
    },
    /// Announces that the next wave's road network is now active.
    WaveAdvanced {
        /// Zero-based index of the wave that started.
        wave: u32,
    },
    /// Reports that a wave advance request was rejected.
    WaveAdvanceRejected {
        /// Specific reason the wave could not advance.
        reason: WaveRejection,
    },
}

/// Reasons a wave advance may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveRejection {
    /// Enemies of the current wave are still on the roads.
    EnemiesRemaining,
    /// The current wave is the last one.
    NoMoreWaves,
}

/// Reasons a spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnRejection {
    /// The waypoint is not a node of the road network.
    UnknownWaypoint,
    /// The waypoint has no outgoing road, so the route would be empty.
    EmptyRoute,
    /// Route resolution did not terminate within the allowed number of hops.
    RouteTooLong,
    /// The spawn position lies outside the world bounds.
    OutOfBounds,
}

/// Unique identifier assigned to an enemy.
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

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the projectile identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Integer grid coordinate identifying a node of the road network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WaypointCoord {
    x: i32,
    y: i32,
}

impl WaypointCoord {
    /// Creates a new waypoint coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the tile hosting the waypoint.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the tile hosting the waypoint.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// World position of the waypoint, the centre of its tile.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(f64::from(self.x) + 0.5, f64::from(self.y) + 0.5)
    }
}

/// Inclusive rectangle of world space tracked by the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldBounds {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

impl WorldBounds {
    /// Creates bounds from the top-left and bottom-right corners.
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Result<Self, BoundsError> {
        if min_x >= max_x || min_y >= max_y {
            return Err(BoundsError::Degenerate {
                min_x,
                min_y,
                max_x,
                max_y,
            });
        }

        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Smallest x coordinate inside the bounds.
    #[must_use]
    pub const fn min_x(&self) -> i32 {
        self.min_x
    }

    /// Smallest y coordinate inside the bounds.
    #[must_use]
    pub const fn min_y(&self) -> i32 {
        self.min_y
    }

    /// Largest x coordinate inside the bounds.
    #[must_use]
    pub const fn max_x(&self) -> i32 {
        self.max_x
    }

    /// Largest y coordinate inside the bounds.
    #[must_use]
    pub const fn max_y(&self) -> i32 {
        self.max_y
    }

    /// Reports whether the point lies inside the bounds, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= f64::from(self.min_x)
            && point.x <= f64::from(self.max_x)
            && point.y >= f64::from(self.min_y)
            && point.y <= f64::from(self.max_y)
    }
}

/// Errors raised when constructing [`WorldBounds`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BoundsError {
    /// The rectangle has no interior.
    #[error("invalid world bounds ({min_x}, {min_y})-({max_x}, {max_y})")]
    Degenerate {
        /// Requested minimum x.
        min_x: i32,
        /// Requested minimum y.
        min_y: i32,
        /// Requested maximum x.
        max_x: i32,
        /// Requested maximum y.
        max_y: i32,
    },
}

/// Weighted directed road between two waypoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoadArc {
    /// Column of the source waypoint.
    pub from_x: i32,
    /// Row of the source waypoint.
    pub from_y: i32,
    /// Column of the destination waypoint.
    pub to_x: i32,
    /// Row of the destination waypoint.
    pub to_y: i32,
    /// Number of consecutive dispatches along this road before rotating.
    pub weight: u32,
}

impl RoadArc {
    /// Source waypoint of the road.
    #[must_use]
    pub const fn source(&self) -> WaypointCoord {
        WaypointCoord::new(self.from_x, self.from_y)
    }

    /// Destination waypoint of the road.
    #[must_use]
    pub const fn destination(&self) -> WaypointCoord {
        WaypointCoord::new(self.to_x, self.to_y)
    }
}

/// Motion `origin + velocity * t` for `t` in `[0, duration_ns]` nanoseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformMotion {
    /// Position at `t = 0`.
    pub origin: Vec2,
    /// Velocity in tiles per nanosecond.
    pub velocity: Vec2,
    /// Length of the segment in nanoseconds.
    pub duration_ns: i64,
}

impl UniformMotion {
    /// Position reached after `t` nanoseconds into the segment.
    #[must_use]
    pub fn position_at(&self, t: f64) -> Vec2 {
        self.origin + self.velocity * t
    }
}

/// Kinds of enemies that can walk the road network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Fast, fragile enemy.
    Pig,
    /// Slow, sturdy enemy.
    Ogre,
}

/// Configured numbers that cannot drive the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum StatsError {
    /// An enemy kind walks at a speed that is not finite and positive.
    #[error("{kind:?} speed {speed} must be finite and positive")]
    EnemySpeed {
        /// Kind whose stats are invalid.
        kind: EnemyKind,
        /// Configured speed in tiles per second.
        speed: f64,
    },
    /// An enemy kind spawns with health that is not finite and positive.
    #[error("{kind:?} health {health} must be finite and positive")]
    EnemyHealth {
        /// Kind whose stats are invalid.
        kind: EnemyKind,
        /// Configured full health.
        health: f64,
    },
    /// A tower number is negative, non-finite, or zero where it must not be.
    #[error("tower {field} {value} is out of range")]
    Tower {
        /// Name of the offending field.
        field: &'static str,
        /// Configured value.
        value: f64,
    },
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Fixed movement and durability numbers for an enemy kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    /// Walking speed in tiles per second.
    pub speed: f64,
    /// Health of a freshly spawned enemy.
    pub full_health: f64,
    /// Gold paid to the player when the enemy is killed.
    #[serde(default)]
    pub gold_reward: u32,
}

impl EnemyStats {
    /// Walking speed converted to tiles per nanosecond.
    #[must_use]
    pub fn speed_per_ns(&self) -> f64 {
        self.speed / NANOS_PER_SECOND
    }

    fn validate(&self, kind: EnemyKind) -> Result<(), StatsError> {
        if !is_positive(self.speed) {
            return Err(StatsError::EnemySpeed {
                kind,
                speed: self.speed,
            });
        }
        if !is_positive(self.full_health) {
            return Err(StatsError::EnemyHealth {
                kind,
                health: self.full_health,
            });
        }
        Ok(())
    }
}

/// Stats for every enemy kind, loaded from external configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyRoster {
    /// Stats applied to [`EnemyKind::Pig`].
    pub pig: EnemyStats,
    /// Stats applied to [`EnemyKind::Ogre`].
    pub ogre: EnemyStats,
}

impl EnemyRoster {
    /// Stats configured for the provided kind.
    #[must_use]
    pub const fn stats(&self, kind: EnemyKind) -> EnemyStats {
        match kind {
            EnemyKind::Pig => self.pig,
            EnemyKind::Ogre => self.ogre,
        }
    }

    /// Checks that every kind walks forwards and spawns alive.
    pub fn validate(&self) -> Result<(), StatsError> {
        self.pig.validate(EnemyKind::Pig)?;
        self.ogre.validate(EnemyKind::Ogre)
    }
}

impl Default for EnemyRoster {
    fn default() -> Self {
        Self {
            pig: EnemyStats {
                speed: 1.2,
                full_health: 60.0,
                gold_reward: 5,
            },
            ogre: EnemyStats {
                speed: 0.6,
                full_health: 240.0,
                gold_reward: 20,
            },
        }
    }
}

/// Firing parameters of a tower.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerStats {
    /// Shots per second.
    pub fire_rate: f64,
    /// Damage dealt to every enemy hit by a projectile.
    pub damage: f64,
    /// Radius of the area damaged on landing, or `None` for single-target shots.
    #[serde(default)]
    pub damage_area: Option<f64>,
    /// Targeting radius in tiles.
    pub range: f64,
    /// Projectile speed along its arc in tiles per second.
    pub projectile_speed: f64,
}

impl TowerStats {
    /// Time between consecutive shots, or `None` when the tower never fires.
    #[must_use]
    pub fn fire_interval(&self) -> Option<Duration> {
        if !is_positive(self.fire_rate) {
            return None;
        }
        Duration::try_from_secs_f64(self.fire_rate.recip()).ok()
    }

    /// Checks that every number can drive a tower.
    pub fn validate(&self) -> Result<(), StatsError> {
        let positive = [
            ("fire_rate", self.fire_rate),
            ("range", self.range),
            ("projectile_speed", self.projectile_speed),
        ];
        for (field, value) in positive {
            if !is_positive(value) {
                return Err(StatsError::Tower { field, value });
            }
        }
        if !self.damage.is_finite() || self.damage < 0.0 {
            return Err(StatsError::Tower {
                field: "damage",
                value: self.damage,
            });
        }
        if let Some(area) = self.damage_area.filter(|area| !is_positive(*area)) {
            return Err(StatsError::Tower {
                field: "damage_area",
                value: area,
            });
        }
        Ok(())
    }

    /// Projectile speed converted to tiles per nanosecond.
    #[must_use]
    pub fn projectile_speed_per_ns(&self) -> f64 {
        self.projectile_speed / NANOS_PER_SECOND
    }
}

/// Status effect carried by a tower's projectiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Enchantment {
    /// Projectiles carry no effect.
    #[default]
    None,
    /// Burns the enemy for a fixed amount of damage per second.
    Fire {
        /// Damage dealt per second while the effect lasts.
        damage_per_second: f64,
        /// Effect duration in seconds.
        duration: f64,
    },
    /// Slows the enemy down by a multiplicative factor.
    Ice {
        /// Multiplier applied to the enemy speed while the effect lasts.
        slowing_factor: f64,
        /// Effect duration in seconds.
        duration: f64,
    },
}

/// Criterion a tower uses to rank the enemies in its range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AimStrategy {
    /// Prefers the enemy closest to the tower.
    #[default]
    Close,
    /// Prefers the enemy with the longest road still ahead of it.
    Last,
    /// Prefers the enemy with the most health.
    Strong,
}

/// Complete combat configuration of a tower.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerLoadout {
    /// Firing parameters.
    pub stats: TowerStats,
    /// Effect applied by landing projectiles.
    #[serde(default)]
    pub enchantment: Enchantment,
    /// Targeting criterion.
    #[serde(default)]
    pub strategy: AimStrategy,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Kind of the enemy.
    pub kind: EnemyKind,
    /// Current world position.
    pub position: Vec2,
    /// Health left.
    pub health: f64,
    /// Length of road between the enemy and the end of its route.
    pub remaining_distance: f64,
}

/// Read-only snapshot describing a set of enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Launch point of the tower.
    pub position: Vec2,
    /// Targeting radius in tiles.
    pub range: f64,
    /// Active targeting criterion.
    pub strategy: AimStrategy,
}

/// Read-only snapshot describing all towers placed in the world.
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

/// Remaining cooldown of a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerCooldownSnapshot {
    /// Tower the cooldown belongs to.
    pub tower: TowerId,
    /// Time left before the tower may fire again.
    pub ready_in: Duration,
}

/// Read-only snapshot of every tower's cooldown, sorted by tower.
#[derive(Clone, Debug, Default)]
pub struct TowerCooldownView {
    snapshots: Vec<TowerCooldownSnapshot>,
}

impl TowerCooldownView {
    /// Creates a new cooldown view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerCooldownSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.tower);
        Self { snapshots }
    }

    /// Iterator over the captured cooldowns in tower order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerCooldownSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerCooldownSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: ProjectileId,
    /// Tower that fired the projectile.
    pub tower: TowerId,
    /// Current world position.
    pub position: Vec2,
    /// Direction of travel in radians, measured in world coordinates.
    pub heading: f64,
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectiles in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Ordered preference of targets computed for a tower.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TowerTarget {
    /// Tower the ordering was computed for.
    pub tower: TowerId,
    /// Enemies in range, most preferred first.
    pub candidates: Vec<EnemyId>,
}

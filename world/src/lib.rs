#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Emberline.
//!
//! The world owns every enemy, tower and projectile together with the spatial
//! index and road network they rely on. It is mutated exclusively through
//! [`apply`], one command at a time, and read through the [`query`] module.

mod enemies;
mod motion;
mod projectiles;
mod roads;
mod spatial;
mod towers;

use std::{
    collections::{BTreeMap, VecDeque},
    time::Duration,
};

use emberline_ballistics::{solve_intercept, BallisticsError, Trajectory};
use emberline_core::{
    duration_to_nanos, Command, EnemyId, EnemyKind, EnemyRoster, Event, RoadArc, StatsError,
    TowerId, Vec2, WaveRejection, WaypointCoord, WorldBounds, MAX_FLIGHT_TIME_NS,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use enemies::{Enemy, EnemyState};
use projectiles::{Payload, ProjectileRegistry};
use towers::TowerRegistry;

pub use motion::{MotionError, MotionState, RouteMotion};
pub use roads::{Roads, RoadsError, SpawnError};
pub use spatial::{SpatialIndex, SpatialIndexError};

/// Errors raised while assembling a world.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum WorldError {
    /// No wave was provided.
    #[error("a battle needs at least one wave")]
    NoWaves,
    /// A wave's road network could not be built.
    #[error("wave {wave} has an invalid road network")]
    Roads {
        /// Zero-based index of the offending wave.
        wave: usize,
        /// Underlying construction failure.
        #[source]
        source: RoadsError,
    },
    /// Enemy stats cannot drive a walk.
    #[error("invalid enemy roster")]
    Roster(#[from] StatsError),
}

/// Represents the authoritative Emberline world state.
#[derive(Debug)]
pub struct World {
    bounds: WorldBounds,
    roads: Roads,
    upcoming_waves: VecDeque<Roads>,
    wave: u32,
    roster: EnemyRoster,
    enemies: BTreeMap<EnemyId, Enemy>,
    next_enemy_id: EnemyId,
    index: SpatialIndex<EnemyId>,
    towers: TowerRegistry,
    projectiles: ProjectileRegistry,
    clock_ns: i64,
}

impl World {
    /// Creates an empty single-wave world over `bounds` whose enemies walk
    /// the road network described by `arcs`.
    pub fn new(
        bounds: WorldBounds,
        arcs: &[RoadArc],
        roster: EnemyRoster,
    ) -> Result<Self, WorldError> {
        Self::with_waves(bounds, &[arcs], roster)
    }

    /// Creates an empty world that plays `waves` in order, each wave walking
    /// its own road network. The first wave is active immediately.
    pub fn with_waves<A: AsRef<[RoadArc]>>(
        bounds: WorldBounds,
        waves: &[A],
        roster: EnemyRoster,
    ) -> Result<Self, WorldError> {
        roster.validate()?;
        let mut networks = waves
            .iter()
            .enumerate()
            .map(|(wave, arcs)| {
                Roads::from_arcs(bounds, arcs.as_ref())
                    .map_err(|source| WorldError::Roads { wave, source })
            })
            .collect::<Result<VecDeque<_>, _>>()?;
        let Some(roads) = networks.pop_front() else {
            return Err(WorldError::NoWaves);
        };

        Ok(Self {
            bounds,
            roads,
            upcoming_waves: networks,
            wave: 0,
            roster,
            enemies: BTreeMap::new(),
            next_enemy_id: EnemyId::new(0),
            index: SpatialIndex::new(bounds),
            towers: TowerRegistry::new(),
            projectiles: ProjectileRegistry::new(),
            clock_ns: 0,
        })
    }

    fn spawn(&mut self, waypoint: WaypointCoord, kind: EnemyKind) -> Result<EnemyId, SpawnError> {
        let route = self.roads.resolve_route(waypoint)?;
        let start = waypoint.center();
        if !self.bounds.contains(start) {
            return Err(SpawnError::OutOfBounds);
        }

        let id = self.next_enemy_id;
        let destinations = route.iter().map(WaypointCoord::center).collect();
        let enemy = Enemy::new(id, kind, self.roster.stats(kind), start, destinations)
            .map_err(|_| SpawnError::EmptyRoute)?;

        match self.index.insert(id, start) {
            Ok(()) => {}
            Err(SpatialIndexError::OutOfBounds { .. }) => return Err(SpawnError::OutOfBounds),
            Err(error) => index_corrupted(error),
        }

        self.next_enemy_id = EnemyId::new(id.get().saturating_add(1));
        let _ = self.enemies.insert(id, enemy);
        Ok(id)
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        out_events.push(Event::TimeAdvanced { dt });
        let elapsed_ns = duration_to_nanos(dt);
        self.clock_ns = self.clock_ns.saturating_add(elapsed_ns);

        for enemy in self.enemies.values_mut() {
            if !enemy.is_hittable() {
                continue;
            }

            let burn = enemy.tick_effect(elapsed_ns);
            if burn > 0.0 {
                let health = enemy.take_damage(burn);
                out_events.push(Event::EnemyDamaged {
                    enemy: enemy.id,
                    damage: burn,
                    health,
                });
            }

            if let Err(error) = enemy.walk(elapsed_ns) {
                error!(enemy = enemy.id.get(), %error, "enemy motion diverged");
                panic!("enemy {} motion diverged: {error}", enemy.id.get());
            }

            if let Err(error) = self.index.relocate(enemy.id, enemy.position()) {
                index_corrupted(error);
            }
        }

        for (projectile_id, projectile) in self.projectiles.advance(elapsed_ns) {
            let landing = projectile.landing_point();
            out_events.push(Event::ProjectileLanded {
                projectile: projectile_id,
                position: landing,
            });
            self.resolve_hit(landing, projectile.payload(), out_events);
        }

        for tower in self.towers.iter_mut() {
            tower.cool_down(dt);
        }

        let finished: Vec<(EnemyId, EnemyState)> = self
            .enemies
            .values()
            .filter(|enemy| enemy.state() != EnemyState::Walking)
            .map(|enemy| (enemy.id, enemy.state()))
            .collect();

        for (enemy, state) in finished {
            let _ = self.enemies.remove(&enemy);
            if let Err(error) = self.index.remove(enemy) {
                index_corrupted(error);
            }

            out_events.push(match state {
                EnemyState::Arrived => Event::EnemyArrived { enemy },
                EnemyState::Dead | EnemyState::Walking => Event::EnemyDied { enemy },
            });
        }
    }

    fn resolve_hit(&mut self, landing: Vec2, payload: Payload, out_events: &mut Vec<Event>) {
        let mut struck = self.hittable_near(landing, payload.radius());
        if !payload.is_area() {
            let closest = struck.iter().copied().min_by(|left, right| {
                let left_distance = self.distance_to(*left, landing);
                let right_distance = self.distance_to(*right, landing);
                left_distance
                    .total_cmp(&right_distance)
                    .then_with(|| left.cmp(right))
            });
            struck = closest.into_iter().collect();
        }

        for id in struck {
            let Some(enemy) = self.enemies.get_mut(&id) else {
                continue;
            };
            enemy.enchant(payload.enchantment);
            let health = enemy.take_damage(payload.damage);
            out_events.push(Event::EnemyDamaged {
                enemy: id,
                damage: payload.damage,
                health,
            });
        }
    }

    fn fire(&mut self, tower_id: TowerId, candidates: &[EnemyId], out_events: &mut Vec<Event>) {
        let Some(tower) = self.towers.get(tower_id) else {
            out_events.push(Event::TowerMissing { tower: tower_id });
            return;
        };

        if !tower.is_ready() {
            debug!(tower = tower_id.get(), "tower is still cooling down");
            out_events.push(Event::ShotSkipped { tower: tower_id });
            return;
        }

        let origin = tower.position;
        let stats = tower.loadout.stats;
        let payload = Payload {
            damage: stats.damage,
            damage_area: stats.damage_area,
            enchantment: tower.loadout.enchantment,
        };
        let speed = stats.projectile_speed_per_ns();

        for &candidate in candidates {
            let Some(enemy) = self.enemies.get(&candidate) else {
                continue;
            };
            if !enemy.is_hittable() {
                continue;
            }

            let motion = enemy.motion_until(MAX_FLIGHT_TIME_NS);
            let aimed = solve_intercept(origin, speed, &motion).and_then(|intercept| {
                Trajectory::new(origin, intercept.position, speed)
                    .map(|trajectory| (intercept, trajectory))
            });

            let (intercept, trajectory) = match aimed {
                Ok(aimed) => aimed,
                Err(BallisticsError::NoIntercept) => continue,
                Err(error) => {
                    warn!(tower = tower_id.get(), %error, "tower cannot fire");
                    break;
                }
            };

            let projectile = self.projectiles.launch(tower_id, trajectory, payload);
            if let Some(tower) = self.towers.get_mut(tower_id) {
                tower.mark_fired();
            }
            out_events.push(Event::ProjectileLaunched {
                projectile,
                tower: tower_id,
                target: candidate,
                impact: intercept.position,
                flight_time_ns: intercept.flight_time_ns,
            });
            return;
        }

        debug!(tower = tower_id.get(), "no candidate could be intercepted");
        out_events.push(Event::ShotSkipped { tower: tower_id });
    }

    fn advance_wave(&mut self) -> Result<u32, WaveRejection> {
        if !self.enemies.is_empty() {
            return Err(WaveRejection::EnemiesRemaining);
        }
        let Some(roads) = self.upcoming_waves.pop_front() else {
            return Err(WaveRejection::NoMoreWaves);
        };

        self.roads = roads;
        self.wave += 1;
        Ok(self.wave)
    }

    fn hittable_near(&self, point: Vec2, radius: f64) -> Vec<EnemyId> {
        self.index
            .query_radius(point, radius)
            .into_iter()
            .filter(|id| self.enemies.get(id).is_some_and(Enemy::is_hittable))
            .collect()
    }

    fn distance_to(&self, enemy: EnemyId, point: Vec2) -> f64 {
        self.enemies
            .get(&enemy)
            .map_or(f64::INFINITY, |enemy| enemy.position().distance(point))
    }
}

fn index_corrupted(error: SpatialIndexError) -> ! {
    error!(%error, "spatial index corrupted");
    panic!("spatial index corrupted: {error}");
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SpawnEnemy { waypoint, kind } => match world.spawn(waypoint, kind) {
            Ok(enemy) => out_events.push(Event::EnemySpawned {
                enemy,
                kind,
                waypoint,
            }),
            Err(error) => {
                debug!(x = waypoint.x(), y = waypoint.y(), %error, "spawn rejected");
                out_events.push(Event::SpawnRejected {
                    waypoint,
                    kind,
                    reason: error.rejection(),
                });
            }
        },
        Command::PlaceTower { position, loadout } => {
            let tower = world.towers.insert(position, loadout);
            out_events.push(Event::TowerPlaced { tower, position });
        }
        Command::SetAimStrategy { tower, strategy } => {
            if world.towers.set_strategy(tower, strategy) {
                out_events.push(Event::AimStrategyChanged { tower, strategy });
            } else {
                out_events.push(Event::TowerMissing { tower });
            }
        }
        Command::FireProjectile { tower, candidates } => {
            world.fire(tower, &candidates, out_events);
        }
        Command::AdvanceWave => match world.advance_wave() {
            Ok(wave) => {
                info!(wave, "wave started");
                out_events.push(Event::WaveAdvanced { wave });
            }
            Err(reason) => {
                debug!(?reason, "wave advance rejected");
                out_events.push(Event::WaveAdvanceRejected { reason });
            }
        },
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use emberline_core::{
        EnemyId, EnemySnapshot, EnemyView, ProjectileView, TowerCooldownView, TowerView,
        UniformMotion, Vec2, WorldBounds,
    };

    use super::World;

    /// Bounds of the simulated area.
    #[must_use]
    pub fn bounds(world: &World) -> WorldBounds {
        world.bounds
    }

    /// Simulated nanoseconds elapsed since the world was created.
    #[must_use]
    pub fn elapsed_ns(world: &World) -> i64 {
        world.clock_ns
    }

    /// Captures a read-only view of every enemy in the world.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.values().map(|enemy| enemy.snapshot()).collect())
    }

    /// Number of enemies still on the roads, hittable or not.
    #[must_use]
    pub fn enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Zero-based index of the active wave.
    #[must_use]
    pub fn current_wave(world: &World) -> u32 {
        world.wave
    }

    /// Number of waves still waiting after the active one.
    #[must_use]
    pub fn upcoming_waves(world: &World) -> usize {
        world.upcoming_waves.len()
    }

    /// Hittable enemies within `radius` of `point`, edges included, in
    /// identifier order.
    #[must_use]
    pub fn enemies_near(world: &World, point: Vec2, radius: f64) -> Vec<EnemySnapshot> {
        world
            .hittable_near(point, radius)
            .into_iter()
            .filter_map(|id| world.enemies.get(&id).map(|enemy| enemy.snapshot()))
            .collect()
    }

    /// Planned motion of an enemy over the next `horizon_ns` nanoseconds.
    #[must_use]
    pub fn planned_motion(world: &World, enemy: EnemyId, horizon_ns: i64) -> Option<Vec<UniformMotion>> {
        world
            .enemies
            .get(&enemy)
            .map(|enemy| enemy.motion_until(horizon_ns))
    }

    /// Number of enemies tracked by the spatial index.
    #[must_use]
    pub fn indexed_enemy_count(world: &World) -> usize {
        world.index.len()
    }

    /// Captures a read-only view of every placed tower.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures the remaining cooldown of every tower.
    #[must_use]
    pub fn tower_cooldowns(world: &World) -> TowerCooldownView {
        TowerCooldownView::from_snapshots(
            world.towers.iter().map(|tower| tower.cooldown()).collect(),
        )
    }

    /// Captures a read-only view of every projectile in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{apply, query, RoadsError, World, WorldError};
    use emberline_core::{
        AimStrategy, Command, EnemyKind, EnemyRoster, EnemyStats, Enchantment, Event, RoadArc,
        SpawnRejection, StatsError, TowerId, TowerLoadout, TowerStats, Vec2, WaveRejection,
        WaypointCoord, WorldBounds,
    };
    use std::time::Duration;

    fn roster() -> EnemyRoster {
        EnemyRoster {
            pig: EnemyStats {
                speed: 1.0,
                full_health: 10.0,
                gold_reward: 1,
            },
            ogre: EnemyStats {
                speed: 0.5,
                full_health: 40.0,
                gold_reward: 4,
            },
        }
    }

    fn straight_world() -> World {
        World::new(
            WorldBounds::new(0, 0, 20, 20).expect("bounds"),
            &[RoadArc {
                from_x: 0,
                from_y: 5,
                to_x: 10,
                to_y: 5,
                weight: 1,
            }],
            roster(),
        )
        .expect("world")
    }

    fn loadout() -> TowerLoadout {
        TowerLoadout {
            stats: TowerStats {
                fire_rate: 1.0,
                damage: 4.0,
                damage_area: None,
                range: 5.0,
                projectile_speed: 6.0,
            },
            enchantment: Enchantment::None,
            strategy: AimStrategy::Close,
        }
    }

    #[test]
    fn apply_spawns_enemy_at_waypoint_center() {
        let mut world = straight_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnEnemy {
                waypoint: WaypointCoord::new(0, 5),
                kind: EnemyKind::Pig,
            },
            &mut events,
        );

        assert!(matches!(events.as_slice(), [Event::EnemySpawned { .. }]));
        let view = query::enemy_view(&world);
        let enemy = view.iter().next().expect("enemy");
        assert_eq!(enemy.position, Vec2::new(0.5, 5.5));
        assert_eq!(enemy.health, 10.0);
        assert_eq!(query::indexed_enemy_count(&world), 1);
    }

    #[test]
    fn spawn_rejections_are_reported_as_events() {
        let mut world = straight_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnEnemy {
                waypoint: WaypointCoord::new(10, 5),
                kind: EnemyKind::Ogre,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SpawnEnemy {
                waypoint: WaypointCoord::new(3, 3),
                kind: EnemyKind::Ogre,
            },
            &mut events,
        );

        let reasons: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                Event::SpawnRejected { reason, .. } => Some(*reason),
                _ => None,
            })
            .collect();
        assert_eq!(
            reasons,
            vec![SpawnRejection::EmptyRoute, SpawnRejection::UnknownWaypoint]
        );
        assert!(query::enemy_view(&world).is_empty());
    }

    #[test]
    fn aim_strategy_switch_requires_existing_tower() {
        let mut world = straight_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceTower {
                position: Vec2::new(5.0, 7.0),
                loadout: loadout(),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SetAimStrategy {
                tower: TowerId::new(0),
                strategy: AimStrategy::Last,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SetAimStrategy {
                tower: TowerId::new(3),
                strategy: AimStrategy::Last,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::TowerPlaced {
                    tower: TowerId::new(0),
                    position: Vec2::new(5.0, 7.0),
                },
                Event::AimStrategyChanged {
                    tower: TowerId::new(0),
                    strategy: AimStrategy::Last,
                },
                Event::TowerMissing {
                    tower: TowerId::new(3),
                },
            ]
        );
        let tower = query::tower_view(&world).into_vec()[0];
        assert_eq!(tower.strategy, AimStrategy::Last);
    }

    #[test]
    fn tick_advances_clock_and_enemies() {
        let mut world = straight_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnEnemy {
                waypoint: WaypointCoord::new(0, 5),
                kind: EnemyKind::Pig,
            },
            &mut events,
        );
        events.clear();

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(2),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::TimeAdvanced {
                dt: Duration::from_secs(2)
            }]
        );
        assert_eq!(query::elapsed_ns(&world), 2_000_000_000);
        let enemy = query::enemy_view(&world).into_vec()[0];
        assert!((enemy.position.x - 2.5).abs() < 1e-9);
        assert!((enemy.remaining_distance - 8.0).abs() < 1e-9);
    }

    fn road(from: (i32, i32), to: (i32, i32)) -> RoadArc {
        RoadArc {
            from_x: from.0,
            from_y: from.1,
            to_x: to.0,
            to_y: to.1,
            weight: 1,
        }
    }

    fn spawn(world: &mut World, waypoint: WaypointCoord, events: &mut Vec<Event>) {
        apply(
            world,
            Command::SpawnEnemy {
                waypoint,
                kind: EnemyKind::Pig,
            },
            events,
        );
    }

    #[test]
    fn backwards_walking_roster_is_rejected() {
        let mut backwards = roster();
        backwards.pig.speed = -1.0;

        let result = World::new(
            WorldBounds::new(0, 0, 20, 20).expect("bounds"),
            &[road((0, 5), (10, 5))],
            backwards,
        );

        assert!(matches!(
            result,
            Err(WorldError::Roster(StatsError::EnemySpeed {
                kind: EnemyKind::Pig,
                ..
            }))
        ));
    }

    #[test]
    fn wave_errors_name_the_offending_wave() {
        let bounds = WorldBounds::new(0, 0, 20, 20).expect("bounds");
        let valid = vec![road((0, 5), (10, 5))];
        let outside = vec![road((0, 5), (40, 5))];

        assert!(matches!(
            World::with_waves(bounds, &[valid, outside], roster()),
            Err(WorldError::Roads {
                wave: 1,
                source: RoadsError::OutOfBounds { .. }
            })
        ));
        assert!(matches!(
            World::with_waves::<Vec<RoadArc>>(bounds, &[], roster()),
            Err(WorldError::NoWaves)
        ));
    }

    #[test]
    fn waves_swap_road_networks_once_the_roads_are_clear() {
        let mut world = World::with_waves(
            WorldBounds::new(0, 0, 20, 20).expect("bounds"),
            &[vec![road((0, 5), (2, 5))], vec![road((0, 9), (4, 9))]],
            roster(),
        )
        .expect("world");
        let mut events = Vec::new();

        spawn(&mut world, WaypointCoord::new(0, 5), &mut events);
        apply(&mut world, Command::AdvanceWave, &mut events);
        assert_eq!(
            events.last(),
            Some(&Event::WaveAdvanceRejected {
                reason: WaveRejection::EnemiesRemaining
            })
        );

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(3),
            },
            &mut events,
        );
        assert_eq!(query::enemy_count(&world), 0);
        events.clear();

        apply(&mut world, Command::AdvanceWave, &mut events);
        assert_eq!(events, vec![Event::WaveAdvanced { wave: 1 }]);
        assert_eq!(query::current_wave(&world), 1);
        assert_eq!(query::upcoming_waves(&world), 0);

        events.clear();
        spawn(&mut world, WaypointCoord::new(0, 5), &mut events);
        spawn(&mut world, WaypointCoord::new(0, 9), &mut events);
        apply(&mut world, Command::AdvanceWave, &mut events);

        assert!(matches!(
            events.as_slice(),
            [
                Event::SpawnRejected {
                    reason: SpawnRejection::UnknownWaypoint,
                    ..
                },
                Event::EnemySpawned { .. },
                Event::WaveAdvanceRejected {
                    reason: WaveRejection::EnemiesRemaining
                },
            ]
        ));
    }

    #[test]
    fn last_wave_cannot_advance() {
        let mut world = straight_world();
        let mut events = Vec::new();
        apply(&mut world, Command::AdvanceWave, &mut events);

        assert_eq!(
            events,
            vec![Event::WaveAdvanceRejected {
                reason: WaveRejection::NoMoreWaves
            }]
        );
        assert_eq!(query::current_wave(&world), 0);
    }
}

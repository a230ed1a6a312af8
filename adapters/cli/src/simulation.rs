//! Fixed-timestep driver wiring the world to the combat systems.

use std::time::Duration;

use anyhow::{Context, Result};
use emberline_core::{Command, Event, TowerTarget};
use emberline_system_spawning::Spawning;
use emberline_system_tower_combat::TowerCombat;
use emberline_system_tower_targeting::TowerTargeting;
use emberline_world::{self as world, query, World};
use serde::Serialize;
use tracing::{debug, info};

use crate::{player::Player, scenario::Scenario};

/// How a run ended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Outcome {
    /// Every wave was played out and the player survived.
    Victory,
    /// The player ran out of health.
    Defeat,
    /// The time limit elapsed first.
    #[default]
    OutOfTime,
}

impl Outcome {
    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::Victory => "victory",
            Self::Defeat => "defeat",
            Self::OutOfTime => "out of time",
        }
    }
}

/// Totals gathered while running a scenario.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub(crate) struct Summary {
    pub(crate) outcome: Outcome,
    pub(crate) ticks: u64,
    pub(crate) simulated_ms: u64,
    pub(crate) spawned: u32,
    pub(crate) spawn_rejections: u32,
    pub(crate) launched: u32,
    pub(crate) skipped_shots: u32,
    pub(crate) landed: u32,
    pub(crate) died: u32,
    pub(crate) arrived: u32,
    pub(crate) survivors: u32,
    pub(crate) waves_started: u32,
    pub(crate) player_health: u32,
    pub(crate) gold: u32,
}

impl Summary {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::EnemySpawned { .. } => self.spawned += 1,
                Event::SpawnRejected { .. } => self.spawn_rejections += 1,
                Event::ProjectileLaunched { .. } => self.launched += 1,
                Event::ShotSkipped { .. } => self.skipped_shots += 1,
                Event::ProjectileLanded { .. } => self.landed += 1,
                Event::EnemyDied { .. } => self.died += 1,
                Event::EnemyArrived { .. } => self.arrived += 1,
                Event::WaveAdvanced { .. } => self.waves_started += 1,
                _ => {}
            }
        }
    }
}

/// Headless combat run assembled from a scenario.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    spawning: Spawning,
    player: Player,
    targeting: TowerTargeting,
    combat: TowerCombat,
    targets: Vec<TowerTarget>,
    commands: Vec<Command>,
    events: Vec<Event>,
    summary: Summary,
}

impl Simulation {
    pub(crate) fn new(scenario: &Scenario) -> Result<Self> {
        let bounds = scenario.world_bounds()?;
        let world = World::with_waves(bounds, &scenario.wave_roads(), scenario.roster)
            .context("scenario world is invalid")?;

        let mut simulation = Self {
            world,
            spawning: Spawning::with_waves(&scenario.wave_spawn_points()),
            player: Player::new(scenario.player, scenario.roster),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            targets: Vec::new(),
            commands: Vec::new(),
            events: Vec::new(),
            summary: Summary {
                waves_started: 1,
                ..Summary::default()
            },
        };

        for tower in &scenario.towers {
            simulation.commands.push(Command::PlaceTower {
                position: tower.position(),
                loadout: tower.loadout,
            });
        }
        simulation.spawning.handle(&[], 0, 0, &mut simulation.commands);
        simulation.flush_commands();
        simulation.settle_events();

        Ok(simulation)
    }

    /// Runs ticks of length `tick` until `duration` elapses, the player is
    /// defeated, or every wave is over, whichever happens first.
    pub(crate) fn run(&mut self, tick: Duration, duration: Duration) -> Summary {
        let mut elapsed = Duration::ZERO;
        while elapsed < duration {
            self.step(tick);
            elapsed = elapsed.saturating_add(tick);

            if self.player.is_defeated() {
                info!(elapsed_ms = elapsed.as_millis() as u64, "player defeated");
                self.summary.outcome = Outcome::Defeat;
                break;
            }
            if self.is_settled() {
                info!(elapsed_ms = elapsed.as_millis() as u64, "battle settled");
                self.summary.outcome = Outcome::Victory;
                break;
            }
        }

        self.summary.survivors = u32::try_from(query::enemy_count(&self.world)).unwrap_or(u32::MAX);
        self.summary.player_health = self.player.health();
        self.summary.gold = self.player.gold();
        self.summary
    }

    fn step(&mut self, tick: Duration) {
        world::apply(&mut self.world, Command::Tick { dt: tick }, &mut self.events);

        self.spawning.handle(
            &self.events,
            query::current_wave(&self.world),
            query::enemy_count(&self.world),
            &mut self.commands,
        );
        self.flush_commands();

        let world = &self.world;
        self.targeting.handle(
            &query::tower_view(world),
            |point, radius| query::enemies_near(world, point, radius),
            &mut self.targets,
        );
        self.combat
            .handle(query::tower_cooldowns(&self.world), &self.targets, &mut self.commands);
        self.flush_commands();

        for event in &self.events {
            match event {
                Event::EnemyDied { enemy } => debug!(enemy = enemy.get(), "enemy died"),
                Event::EnemyArrived { enemy } => info!(enemy = enemy.get(), "enemy reached the end of the road"),
                _ => {}
            }
        }

        self.summary.ticks += 1;
        self.summary.simulated_ms = self
            .summary
            .simulated_ms
            .saturating_add(tick.as_millis() as u64);
        self.settle_events();
    }

    fn settle_events(&mut self) {
        self.summary.record(&self.events);
        self.player.handle(&self.events);
        self.events.clear();
    }

    fn flush_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    fn is_settled(&self) -> bool {
        self.spawning.is_exhausted()
            && query::enemy_count(&self.world) == 0
            && query::projectile_view(&self.world).iter().next().is_none()
    }
}

//! Scenario files describing a complete combat run.

use std::{fs, path::Path};

use anyhow::{ensure, Context, Result};
use emberline_core::{EnemyRoster, RoadArc, TowerLoadout, Vec2, WorldBounds};
use emberline_system_spawning::SpawnPoint;
use serde::{Deserialize, Serialize};

use crate::player::PlayerConfig;

const DEFAULT_TICK_MS: u64 = 10;
const DEFAULT_DURATION_SECS: u64 = 120;

/// Inclusive extent of the simulated area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct BoundsConfig {
    pub(crate) min_x: i32,
    pub(crate) min_y: i32,
    pub(crate) max_x: i32,
    pub(crate) max_y: i32,
}

/// Tower placed before the first tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct TowerPlacement {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) loadout: TowerLoadout,
}

impl TowerPlacement {
    pub(crate) fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Road network and spawn schedule played during one wave.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct WaveConfig {
    pub(crate) roads: Vec<RoadArc>,
    #[serde(default)]
    pub(crate) spawn_points: Vec<SpawnPoint>,
}

/// Everything needed to run a headless combat simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Scenario {
    #[serde(default = "default_tick_ms")]
    pub(crate) tick_ms: u64,
    #[serde(default = "default_duration_secs")]
    pub(crate) duration_secs: u64,
    pub(crate) bounds: BoundsConfig,
    #[serde(default)]
    pub(crate) roster: EnemyRoster,
    #[serde(default)]
    pub(crate) player: PlayerConfig,
    pub(crate) waves: Vec<WaveConfig>,
    #[serde(default)]
    pub(crate) towers: Vec<TowerPlacement>,
}

const fn default_tick_ms() -> u64 {
    DEFAULT_TICK_MS
}

const fn default_duration_secs() -> u64 {
    DEFAULT_DURATION_SECS
}

impl Scenario {
    /// Loads a scenario, reading JSON for `.json` files and TOML otherwise.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario at {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));

        let scenario = if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_toml_str(&contents)
        };
        scenario.with_context(|| format!("invalid scenario {}", path.display()))
    }

    pub(crate) fn from_toml_str(contents: &str) -> Result<Self> {
        let scenario: Self =
            toml::from_str(contents).context("failed to parse scenario toml contents")?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub(crate) fn from_json_str(contents: &str) -> Result<Self> {
        let scenario: Self =
            serde_json::from_str(contents).context("failed to parse scenario json contents")?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub(crate) fn world_bounds(&self) -> Result<WorldBounds> {
        let BoundsConfig {
            min_x,
            min_y,
            max_x,
            max_y,
        } = self.bounds;
        WorldBounds::new(min_x, min_y, max_x, max_y).context("scenario bounds are degenerate")
    }

    /// Road arcs of every wave, in play order.
    pub(crate) fn wave_roads(&self) -> Vec<&[RoadArc]> {
        self.waves.iter().map(|wave| wave.roads.as_slice()).collect()
    }

    /// Spawn points of every wave, in play order.
    pub(crate) fn wave_spawn_points(&self) -> Vec<&[SpawnPoint]> {
        self.waves
            .iter()
            .map(|wave| wave.spawn_points.as_slice())
            .collect()
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.tick_ms > 0, "tick_ms must be positive");
        ensure!(!self.waves.is_empty(), "scenario declares no waves");
        for (index, wave) in self.waves.iter().enumerate() {
            ensure!(!wave.roads.is_empty(), "wave {index} declares no roads");
        }
        ensure!(self.player.health > 0, "player must start with some health");
        let _ = self.world_bounds()?;
        self.roster
            .validate()
            .context("scenario roster is invalid")?;
        for (index, tower) in self.towers.iter().enumerate() {
            tower
                .loadout
                .stats
                .validate()
                .with_context(|| format!("tower {index} has invalid stats"))?;
        }
        Ok(())
    }
}

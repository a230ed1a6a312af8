//! Player health and gold, settled from enemies leaving the roads.

use std::collections::BTreeMap;

use emberline_core::{EnemyId, EnemyKind, EnemyRoster, Event};
use serde::{Deserialize, Serialize};

const DEFAULT_HEALTH: u32 = 20;

/// Resources the player starts a scenario with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct PlayerConfig {
    #[serde(default = "default_health")]
    pub(crate) health: u32,
    #[serde(default)]
    pub(crate) gold: u32,
}

const fn default_health() -> u32 {
    DEFAULT_HEALTH
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            health: DEFAULT_HEALTH,
            gold: 0,
        }
    }
}

/// Loses one health per enemy that walks through and earns the kind's
/// reward for every kill.
#[derive(Debug)]
pub(crate) struct Player {
    health: u32,
    gold: u32,
    roster: EnemyRoster,
    walking: BTreeMap<EnemyId, EnemyKind>,
}

impl Player {
    pub(crate) fn new(config: PlayerConfig, roster: EnemyRoster) -> Self {
        Self {
            health: config.health,
            gold: config.gold,
            roster,
            walking: BTreeMap::new(),
        }
    }

    pub(crate) fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::EnemySpawned { enemy, kind, .. } => {
                    let _ = self.walking.insert(*enemy, *kind);
                }
                Event::EnemyDied { enemy } => {
                    if let Some(kind) = self.walking.remove(enemy) {
                        let reward = self.roster.stats(kind).gold_reward;
                        self.gold = self.gold.saturating_add(reward);
                    }
                }
                Event::EnemyArrived { enemy } => {
                    let _ = self.walking.remove(enemy);
                    self.health = self.health.saturating_sub(1);
                }
                _ => {}
            }
        }
    }

    pub(crate) const fn health(&self) -> u32 {
        self.health
    }

    pub(crate) const fn gold(&self) -> u32 {
        self.gold
    }

    pub(crate) const fn is_defeated(&self) -> bool {
        self.health == 0
    }
}

//! Authoritative tower state management utilities.

use std::{collections::BTreeMap, time::Duration};

use emberline_core::{
    AimStrategy, TowerCooldownSnapshot, TowerId, TowerLoadout, TowerSnapshot, Vec2,
};

/// Tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Launch point of every projectile fired by the tower.
    pub(crate) position: Vec2,
    /// Combat parameters, including the active aim strategy.
    pub(crate) loadout: TowerLoadout,
    since_last_shot: Duration,
}

impl TowerState {
    /// Time between shots, or `None` for towers that never fire.
    fn interval(&self) -> Option<Duration> {
        self.loadout.stats.fire_interval()
    }

    /// Accumulates time since the last launch.
    pub(crate) fn cool_down(&mut self, dt: Duration) {
        self.since_last_shot = self.since_last_shot.saturating_add(dt);
    }

    /// Reports whether enough time has accumulated to fire.
    pub(crate) fn is_ready(&self) -> bool {
        self.interval()
            .is_some_and(|interval| self.since_last_shot >= interval)
    }

    /// Restarts the cooldown after a successful launch.
    pub(crate) fn mark_fired(&mut self) {
        self.since_last_shot = Duration::ZERO;
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            position: self.position,
            range: self.loadout.stats.range,
            strategy: self.loadout.strategy,
        }
    }

    pub(crate) fn cooldown(&self) -> TowerCooldownSnapshot {
        let ready_in = self.interval().map_or(Duration::MAX, |interval| {
            interval.saturating_sub(self.since_last_shot)
        });
        TowerCooldownSnapshot {
            tower: self.id,
            ready_in,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Registers a tower and returns its identifier.
    pub(crate) fn insert(&mut self, position: Vec2, loadout: TowerLoadout) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(
            id,
            TowerState {
                id,
                position,
                loadout,
                since_last_shot: Duration::ZERO,
            },
        );
        id
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    /// Switches the strategy of a tower, reporting whether it exists.
    pub(crate) fn set_strategy(&mut self, id: TowerId, strategy: AimStrategy) -> bool {
        match self.entries.get_mut(&id) {
            Some(tower) => {
                tower.loadout.strategy = strategy;
                true
            }
            None => false,
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.values_mut()
    }
}

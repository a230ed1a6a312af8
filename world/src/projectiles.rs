//! Projectiles in flight.

use std::collections::BTreeMap;

use emberline_ballistics::{Trajectory, TrajectorySample};
use emberline_core::{Enchantment, ProjectileId, ProjectileSnapshot, TowerId, Vec2};

/// Radius searched around the landing point of single-target projectiles.
pub(crate) const SINGLE_TARGET_RADIUS: f64 = 0.1;

/// What a projectile does to the enemies it lands on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Payload {
    pub(crate) damage: f64,
    pub(crate) damage_area: Option<f64>,
    pub(crate) enchantment: Enchantment,
}

impl Payload {
    /// Radius of the area affected on landing.
    pub(crate) fn radius(&self) -> f64 {
        self.damage_area.unwrap_or(SINGLE_TARGET_RADIUS)
    }

    /// Whether every enemy in the radius is affected, or only the closest.
    pub(crate) const fn is_area(&self) -> bool {
        self.damage_area.is_some()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    id: ProjectileId,
    tower: TowerId,
    trajectory: Trajectory,
    payload: Payload,
    elapsed_ns: i64,
    sample: TrajectorySample,
}

impl Projectile {
    /// Advances the flight clock and reports whether the projectile landed.
    pub(crate) fn fly(&mut self, elapsed_ns: i64) -> bool {
        self.elapsed_ns = self.elapsed_ns.saturating_add(elapsed_ns.max(0));
        self.sample = self.trajectory.sample(self.elapsed_ns);
        self.elapsed_ns >= self.trajectory.duration_ns()
    }

    pub(crate) const fn landing_point(&self) -> Vec2 {
        self.trajectory.end()
    }

    pub(crate) const fn payload(&self) -> Payload {
        self.payload
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            tower: self.tower,
            position: self.sample.position,
            heading: self.sample.heading,
        }
    }
}

/// Registry of projectiles in flight.
#[derive(Debug)]
pub(crate) struct ProjectileRegistry {
    entries: BTreeMap<ProjectileId, Projectile>,
    next_projectile_id: ProjectileId,
}

impl ProjectileRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_projectile_id: ProjectileId::new(0),
        }
    }

    /// Launches a projectile along the provided trajectory.
    pub(crate) fn launch(
        &mut self,
        tower: TowerId,
        trajectory: Trajectory,
        payload: Payload,
    ) -> ProjectileId {
        let id = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(
            id,
            Projectile {
                id,
                tower,
                trajectory,
                payload,
                elapsed_ns: 0,
                sample: trajectory.sample(0),
            },
        );
        id
    }

    /// Advances every projectile and removes the ones that landed, returning
    /// them in identifier order.
    pub(crate) fn advance(&mut self, elapsed_ns: i64) -> Vec<(ProjectileId, Projectile)> {
        let landed: Vec<ProjectileId> = self
            .entries
            .iter_mut()
            .filter_map(|(id, projectile)| projectile.fly(elapsed_ns).then_some(*id))
            .collect();

        landed
            .into_iter()
            .filter_map(|id| self.entries.remove(&id).map(|projectile| (id, projectile)))
            .collect()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::{Payload, ProjectileRegistry, SINGLE_TARGET_RADIUS};
    use emberline_ballistics::{Trajectory, ARC_LENGTH_PER_TILE};
    use emberline_core::{Enchantment, ProjectileId, TowerId, Vec2};

    fn payload(damage_area: Option<f64>) -> Payload {
        Payload {
            damage: 3.0,
            damage_area,
            enchantment: Enchantment::None,
        }
    }

    #[test]
    fn projectiles_land_when_flight_time_elapses() {
        let speed = ARC_LENGTH_PER_TILE / 1_000.0;
        let trajectory =
            Trajectory::new(Vec2::ZERO, Vec2::new(2.0, 0.0), speed).expect("trajectory");
        let mut registry = ProjectileRegistry::new();
        let id = registry.launch(TowerId::new(0), trajectory, payload(None));

        assert_eq!(id, ProjectileId::new(0));
        assert!(registry.advance(1_500).is_empty());
        let in_flight = registry.iter().next().expect("projectile").snapshot();
        assert!(in_flight.position.x > 0.0 && in_flight.position.x < 2.0);

        let landed = registry.advance(500);
        assert_eq!(landed.len(), 1);
        assert_eq!(landed[0].0, id);
        assert_eq!(landed[0].1.landing_point(), Vec2::new(2.0, 0.0));
        assert_eq!(registry.iter().count(), 0);
    }

    #[test]
    fn zero_length_flights_land_on_the_first_update() {
        let trajectory = Trajectory::new(Vec2::ONE, Vec2::ONE, 1e-9).expect("trajectory");
        let mut registry = ProjectileRegistry::new();
        let _ = registry.launch(TowerId::new(0), trajectory, payload(Some(1.0)));

        assert_eq!(registry.advance(0).len(), 1);
    }

    #[test]
    fn payload_radius_defaults_to_single_target() {
        assert_eq!(payload(None).radius(), SINGLE_TARGET_RADIUS);
        assert!(!payload(None).is_area());
        assert_eq!(payload(Some(1.5)).radius(), 1.5);
        assert!(payload(Some(1.5)).is_area());
    }
}

//! Enemy state stored inside the world.

use emberline_core::{
    EnemyId, EnemyKind, EnemySnapshot, EnemyStats, Enchantment, UniformMotion, Vec2,
    NANOS_PER_SECOND,
};

use crate::motion::{MotionError, MotionState, RouteMotion};

/// Lifecycle of an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EnemyState {
    /// Walking its route; the only state in which it can be hit.
    Walking,
    /// Health dropped to zero; removed at the end of the tick.
    Dead,
    /// Reached the end of its route; removed at the end of the tick.
    Arrived,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum EffectKind {
    Burn { damage_per_second: f64 },
    Slow { factor: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ActiveEffect {
    kind: EffectKind,
    remaining_ns: i64,
}

/// Enemy walking the road network.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    health: f64,
    motion: RouteMotion,
    effect: Option<ActiveEffect>,
    state: EnemyState,
}

impl Enemy {
    /// Creates an enemy at `start` that will walk the provided destinations.
    pub(crate) fn new(
        id: EnemyId,
        kind: EnemyKind,
        stats: EnemyStats,
        start: Vec2,
        destinations: Vec<Vec2>,
    ) -> Result<Self, MotionError> {
        Ok(Self {
            id,
            kind,
            health: stats.full_health,
            motion: RouteMotion::new(start, destinations, stats.speed_per_ns())?,
            effect: None,
            state: EnemyState::Walking,
        })
    }

    pub(crate) const fn state(&self) -> EnemyState {
        self.state
    }

    pub(crate) fn is_hittable(&self) -> bool {
        self.state == EnemyState::Walking
    }

    pub(crate) const fn position(&self) -> Vec2 {
        self.motion.position()
    }

    /// Multiplier applied to the walking speed by the active effect.
    pub(crate) fn slow_factor(&self) -> f64 {
        match self.effect {
            Some(ActiveEffect {
                kind: EffectKind::Slow { factor },
                ..
            }) => factor,
            _ => 1.0,
        }
    }

    /// Replaces the active effect with the provided enchantment.
    pub(crate) fn enchant(&mut self, enchantment: Enchantment) {
        let (kind, duration) = match enchantment {
            Enchantment::None => return,
            Enchantment::Fire {
                damage_per_second,
                duration,
            } => (EffectKind::Burn { damage_per_second }, duration),
            Enchantment::Ice {
                slowing_factor,
                duration,
            } => (
                EffectKind::Slow {
                    factor: slowing_factor.max(0.0),
                },
                duration,
            ),
        };

        let remaining_ns = (duration.max(0.0) * NANOS_PER_SECOND).round() as i64;
        self.effect = (remaining_ns > 0).then_some(ActiveEffect { kind, remaining_ns });
    }

    /// Ages the active effect by `elapsed_ns` and returns the burn damage it
    /// deals over that span.
    pub(crate) fn tick_effect(&mut self, elapsed_ns: i64) -> f64 {
        let Some(effect) = self.effect.as_mut() else {
            return 0.0;
        };

        let active_ns = elapsed_ns.clamp(0, effect.remaining_ns);
        effect.remaining_ns -= active_ns;
        let damage = match effect.kind {
            EffectKind::Burn { damage_per_second } => {
                damage_per_second * active_ns as f64 / NANOS_PER_SECOND
            }
            EffectKind::Slow { .. } => 0.0,
        };

        if effect.remaining_ns == 0 {
            self.effect = None;
        }
        damage
    }

    /// Removes health and reports what is left. Enemies that run out of health
    /// die and lose any active effect.
    pub(crate) fn take_damage(&mut self, damage: f64) -> f64 {
        self.health -= damage;
        if self.health <= 0.0 && self.state == EnemyState::Walking {
            self.state = EnemyState::Dead;
            self.effect = None;
        }
        self.health
    }

    /// Walks the route for `elapsed_ns` at the effect-adjusted speed.
    pub(crate) fn walk(&mut self, elapsed_ns: i64) -> Result<(), MotionError> {
        if self.state != EnemyState::Walking {
            return Ok(());
        }

        let slow_factor = self.slow_factor();
        if self.motion.advance(elapsed_ns, slow_factor)? == MotionState::Arrived {
            self.state = EnemyState::Arrived;
            self.effect = None;
        }
        Ok(())
    }

    /// Planned motion used to aim at this enemy.
    pub(crate) fn motion_until(&self, horizon_ns: i64) -> Vec<UniformMotion> {
        self.motion.motion_until(horizon_ns, self.slow_factor())
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position(),
            health: self.health,
            remaining_distance: self.motion.remaining_distance(),
        }
    }
}

//! Constant-speed motion along a resolved waypoint route.

use emberline_core::{UniformMotion, Vec2};
use thiserror::Error;

/// Errors raised by [`RouteMotion`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MotionError {
    /// A route needs at least one destination.
    #[error("route has no destinations")]
    EmptyRoute,
    /// Waypoint transitions within one update exceeded the waypoints left,
    /// which means the overshoot correction failed to converge.
    #[error("waypoint transitions exceeded {limit} in a single update")]
    TransitionLimitExceeded {
        /// Transition budget of the update.
        limit: usize,
    },
}

/// Progress of a [`RouteMotion`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionState {
    /// Destinations remain ahead.
    Moving,
    /// The final destination was reached; the position is pinned there.
    Arrived,
}

/// Walks a fixed list of destinations at a constant speed.
///
/// Speeds are expressed in tiles per nanosecond. The slow factor is supplied
/// per call so status effects can scale the walk without touching the route.
#[derive(Clone, Debug)]
pub struct RouteMotion {
    position: Vec2,
    destinations: Vec<Vec2>,
    next: usize,
    direction: Vec2,
    speed: f64,
    state: MotionState,
}

impl RouteMotion {
    /// Starts walking from `start` towards each destination in turn.
    pub fn new(start: Vec2, destinations: Vec<Vec2>, speed: f64) -> Result<Self, MotionError> {
        let Some(first) = destinations.first() else {
            return Err(MotionError::EmptyRoute);
        };

        let direction = (*first - start).normalize_or_zero();
        Ok(Self {
            position: start,
            destinations,
            next: 0,
            direction,
            speed,
            state: MotionState::Moving,
        })
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Current progress.
    #[must_use]
    pub const fn state(&self) -> MotionState {
        self.state
    }

    /// Unit direction of the current leg; zero once arrived.
    #[must_use]
    pub const fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Destinations that have not been reached yet.
    #[must_use]
    pub fn remaining_destinations(&self) -> &[Vec2] {
        &self.destinations[self.next..]
    }

    /// Moves the walker for `elapsed_ns` nanoseconds.
    ///
    /// Distance carried past a destination is re-applied along the next leg,
    /// so the walked distance equals `speed * slow_factor * elapsed_ns` until
    /// the final destination pins the position.
    pub fn advance(
        &mut self,
        elapsed_ns: i64,
        slow_factor: f64,
    ) -> Result<MotionState, MotionError> {
        if self.state == MotionState::Arrived {
            return Ok(MotionState::Arrived);
        }

        let step = self.speed * slow_factor * elapsed_ns.max(0) as f64;
        let limit = self.destinations.len() - self.next + 1;
        let mut transitions = 0;
        let mut carried = 0.0;

        // A walker spawned on its first destination has no heading yet.
        if self.direction == Vec2::ZERO {
            carried = step;
        } else {
            self.position += self.direction * step;
        }

        loop {
            let destination = self.destinations[self.next];
            let to_destination = destination - self.position;
            if to_destination.dot(self.direction) > 0.0 {
                return Ok(MotionState::Moving);
            }

            transitions += 1;
            if transitions > limit {
                return Err(MotionError::TransitionLimitExceeded { limit });
            }

            carried += to_destination.length();
            self.position = destination;
            self.next += 1;

            if self.next == self.destinations.len() {
                self.direction = Vec2::ZERO;
                self.state = MotionState::Arrived;
                return Ok(MotionState::Arrived);
            }

            self.direction = (self.destinations[self.next] - destination).normalize_or_zero();
            self.position = destination + self.direction * carried;
            if self.direction != Vec2::ZERO {
                carried = 0.0;
            }
        }
    }

    /// Planned motion from the current position out to `horizon_ns`.
    ///
    /// One segment per remaining leg, then a stationary segment covering any
    /// time left once the route is exhausted. Leaves the walker untouched.
    #[must_use]
    pub fn motion_until(&self, horizon_ns: i64, slow_factor: f64) -> Vec<UniformMotion> {
        let speed = self.speed * slow_factor;
        let mut segments = Vec::new();
        let mut origin = self.position;
        let mut planned: i64 = 0;

        if speed > 0.0 {
            for destination in self.remaining_destinations() {
                if planned >= horizon_ns {
                    break;
                }

                let offset = *destination - origin;
                let duration_ns = (offset.length() / speed).round() as i64;
                segments.push(UniformMotion {
                    origin,
                    velocity: offset.normalize_or_zero() * speed,
                    duration_ns,
                });
                planned = planned.saturating_add(duration_ns);
                origin = *destination;
            }
        }

        if planned < horizon_ns {
            segments.push(UniformMotion {
                origin,
                velocity: Vec2::ZERO,
                duration_ns: horizon_ns - planned,
            });
        }

        segments
    }

    /// Road length between the current position and the final destination.
    #[must_use]
    pub fn remaining_distance(&self) -> f64 {
        let mut total = 0.0;
        let mut from = self.position;
        for destination in self.remaining_destinations() {
            total += from.distance(*destination);
            from = *destination;
        }
        total
    }
}

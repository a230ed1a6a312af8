#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Closed-form projectile maths shared by the world and its tests.
//!
//! Projectiles travel along a fixed-shape circular arc scaled to the distance
//! between the launch and impact points. The arc's length is therefore
//! proportional to that straight-line distance, which lets [`solve_intercept`]
//! reason about flight times without knowing the arc itself, and lets
//! [`Trajectory`] reproduce exactly the flight time the solver promised.

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

use thiserror::Error;

mod intercept;
mod trajectory;

pub use intercept::{solve_intercept, Intercept};
pub use trajectory::{Trajectory, TrajectorySample};

/// Arc angle at launch, in canonical space.
const START_THETA: f64 = 3.0 * FRAC_PI_4;
/// Arc angle at impact, in canonical space.
const END_THETA: f64 = FRAC_PI_4;

/// Radius of the canonical arc spanning a chord of one tile, `1 / (2 cos(END_THETA))`.
pub const UNIT_RADIUS: f64 = FRAC_1_SQRT_2;

/// Length of the canonical arc per tile of straight-line distance.
pub const ARC_LENGTH_PER_TILE: f64 = UNIT_RADIUS * (START_THETA - END_THETA);

/// Errors produced while aiming or shaping a projectile's flight.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum BallisticsError {
    /// The target cannot be reached within its projected motion.
    #[error("no intercept exists within the projected motion of the target")]
    NoIntercept,
    /// Projectile speed must be strictly positive and finite.
    #[error("projectile speed {speed} is not a positive finite number")]
    InvalidSpeed {
        /// Rejected speed in tiles per nanosecond.
        speed: f64,
    },
}

/// Nanoseconds needed to cover `distance` tiles of chord at `speed` tiles per
/// nanosecond along the arc.
///
/// Both the intercept solver and the trajectory derive their flight time from
/// this function, so the two always agree for a given launch and impact pair.
#[must_use]
pub fn flight_duration(distance: f64, speed: f64) -> i64 {
    if distance <= 0.0 {
        return 0;
    }
    (distance * ARC_LENGTH_PER_TILE / speed).round() as i64
}

fn validate_speed(speed: f64) -> Result<f64, BallisticsError> {
    if speed.is_finite() && speed > 0.0 {
        Ok(speed)
    } else {
        Err(BallisticsError::InvalidSpeed { speed })
    }
}

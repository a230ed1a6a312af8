use emberline_core::{UniformMotion, Vec2};

use crate::{flight_duration, validate_speed, BallisticsError, ARC_LENGTH_PER_TILE};

const LINEAR_EPSILON: f64 = 1e-12;

/// Meeting point between a projectile launched now and its target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intercept {
    /// Position the target occupies when the projectile lands.
    pub position: Vec2,
    /// Flight time of the projectile in nanoseconds.
    pub flight_time_ns: i64,
}

/// Finds the earliest instant at which a projectile launched from `launch`
/// reaches the target described by `motion`.
///
/// `speed` is the projectile speed along its arc in tiles per nanosecond.
/// Segments are examined in order; within a segment the smallest root lying
/// in `[0, duration]` wins. The target and the launch point are not touched.
pub fn solve_intercept(
    launch: Vec2,
    speed: f64,
    motion: &[UniformMotion],
) -> Result<Intercept, BallisticsError> {
    let speed = validate_speed(speed)?;
    let nanos_per_tile = ARC_LENGTH_PER_TILE / speed;
    let k_squared = nanos_per_tile * nanos_per_tile;

    let mut elapsed = 0.0_f64;
    for segment in motion {
        let duration = segment.duration_ns as f64;
        let offset = segment.origin - launch;

        let a = 1.0 - k_squared * segment.velocity.length_squared();
        let b = 2.0 * elapsed - 2.0 * k_squared * offset.dot(segment.velocity);
        let c = elapsed * elapsed - k_squared * offset.length_squared();

        let earliest = quadratic_roots(a, b, c)
            .into_iter()
            .flatten()
            .filter(|root| *root >= 0.0 && *root <= duration)
            .min_by(f64::total_cmp);

        if let Some(local) = earliest {
            let position = segment.position_at(local);
            return Ok(Intercept {
                position,
                flight_time_ns: flight_duration(position.distance(launch), speed),
            });
        }

        elapsed += duration;
    }

    Err(BallisticsError::NoIntercept)
}

/// Real roots of `a x² + b x + c = 0`, falling back to the linear equation
/// when `a` vanishes.
fn quadratic_roots(a: f64, b: f64, c: f64) -> [Option<f64>; 2] {
    if a.abs() < LINEAR_EPSILON {
        if b.abs() < LINEAR_EPSILON {
            return [(c == 0.0).then_some(0.0), None];
        }
        return [Some(-c / b), None];
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return [None, None];
    }

    let root = discriminant.sqrt();
    let q = -0.5 * (b + root.copysign(b));
    if q == 0.0 {
        return [Some(0.0), None];
    }
    [Some(q / a), Some(c / q)]
}

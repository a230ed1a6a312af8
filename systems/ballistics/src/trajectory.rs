use emberline_core::Vec2;

use crate::{
    flight_duration, validate_speed, BallisticsError, END_THETA, START_THETA, UNIT_RADIUS,
};

/// Position and direction of travel of a projectile at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectorySample {
    /// World position.
    pub position: Vec2,
    /// Direction of travel in radians, measured from the world x axis.
    pub heading: f64,
}

/// Circular arc flown by a projectile between its launch and impact points.
///
/// The arc is a scaled copy of one canonical arc. Canonical space is world
/// space with the y axis flipped; a basis built from the launch to impact
/// direction maps the canonical chord onto the real one and mirrors the arc
/// when the impact lies to the left of the launch point, so projectiles always
/// bulge the same way on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trajectory {
    start: Vec2,
    end: Vec2,
    along: Vec2,
    across: Vec2,
    radius: f64,
    angular_velocity: f64,
    duration_ns: i64,
}

impl Trajectory {
    /// Shapes the arc from `start` to `end` flown at `speed` tiles per nanosecond.
    pub fn new(start: Vec2, end: Vec2, speed: f64) -> Result<Self, BallisticsError> {
        let speed = validate_speed(speed)?;
        let distance = start.distance(end);

        if distance == 0.0 {
            return Ok(Self {
                start,
                end,
                along: Vec2::X,
                across: Vec2::Y,
                radius: 0.0,
                angular_velocity: 0.0,
                duration_ns: 0,
            });
        }

        let along = (to_canonical(end) - to_canonical(start)) / distance;
        let mirror = if along.x >= 0.0 { 1.0 } else { -1.0 };
        let across = along.perp() * mirror;
        let radius = distance * UNIT_RADIUS;

        Ok(Self {
            start,
            end,
            along,
            across,
            radius,
            angular_velocity: -(speed / radius),
            duration_ns: flight_duration(distance, speed),
        })
    }

    /// Total flight time in nanoseconds.
    #[must_use]
    pub const fn duration_ns(&self) -> i64 {
        self.duration_ns
    }

    /// Launch point.
    #[must_use]
    pub const fn start(&self) -> Vec2 {
        self.start
    }

    /// Impact point.
    #[must_use]
    pub const fn end(&self) -> Vec2 {
        self.end
    }

    /// Samples the arc `elapsed_ns` nanoseconds after launch.
    ///
    /// Times are clamped to `[0, duration]`; at or past the duration the sample
    /// sits exactly on the impact point.
    #[must_use]
    pub fn sample(&self, elapsed_ns: i64) -> TrajectorySample {
        if self.duration_ns == 0 {
            return TrajectorySample {
                position: if elapsed_ns > 0 { self.end } else { self.start },
                heading: self.heading_at(END_THETA),
            };
        }

        if elapsed_ns >= self.duration_ns {
            return TrajectorySample {
                position: self.end,
                heading: self.heading_at(END_THETA),
            };
        }

        let elapsed = elapsed_ns.max(0) as f64;
        let theta = START_THETA + self.angular_velocity * elapsed;
        let local = Vec2::new(
            theta.cos() - START_THETA.cos(),
            theta.sin() - START_THETA.sin(),
        ) * self.radius;
        let canonical = to_canonical(self.start) + self.along * local.x + self.across * local.y;

        TrajectorySample {
            position: to_canonical(canonical),
            heading: self.heading_at(theta),
        }
    }

    fn heading_at(&self, theta: f64) -> f64 {
        // The angular velocity is negative, so the tangent is flipped to point
        // along the direction of flight.
        let tangent = Vec2::new(theta.sin(), -theta.cos());
        let world = to_canonical(self.along * tangent.x + self.across * tangent.y);
        world.y.atan2(world.x)
    }
}

/// Canonical space flips the y axis; the mapping is its own inverse.
fn to_canonical(point: Vec2) -> Vec2 {
    Vec2::new(point.x, -point.y)
}

//! Engine thrust along the flight path.

use bevy::math::DVec3;
use bevy::prelude::*;

/// Speed below which the flight path has no usable direction (m/s).
const MIN_DIRECTION_SPEED: f64 = 1e-6;

/// Which way the engine points relative to the velocity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ThrustDirection {
    /// Opposite to velocity (braking, lowers the far side of the orbit)
    #[default]
    Retrograde,
    /// Along velocity (raises the far side of the orbit)
    Prograde,
}

/// Thruster command attached to an orbiting body.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Thruster {
    pub enabled: bool,
    pub direction: ThrustDirection,
}

impl Thruster {
    pub fn firing(direction: ThrustDirection) -> Self {
        Self {
            enabled: true,
            direction,
        }
    }
}

/// Unit vector the engine pushes along, or zero if the body is at rest.
pub fn thrust_direction(velocity: DVec3, direction: ThrustDirection) -> DVec3 {
    let speed = velocity.length();
    if speed <= MIN_DIRECTION_SPEED {
        return DVec3::ZERO;
    }
    match direction {
        ThrustDirection::Prograde => velocity / speed,
        ThrustDirection::Retrograde => -velocity / speed,
    }
}

/// Thrust force and burn time used over one tick.
///
/// # Arguments
/// * `velocity` - Current velocity (m/s)
/// * `thruster` - Engine command
/// * `thrust` - Engine thrust in N
/// * `remaining_burn_time` - Burn time left in seconds
/// * `dt` - Tick length in seconds
///
/// # Returns
/// `(force, burn_time_used)`; the force is zero when the engine is off,
/// the tank is empty or the velocity has no direction. When the tank runs
/// dry partway through the tick the force is averaged over the whole tick,
/// so the impulse matches the burn time actually used.
pub fn thrust_force(
    velocity: DVec3,
    thruster: &Thruster,
    thrust: f64,
    remaining_burn_time: f64,
    dt: f64,
) -> (DVec3, f64) {
    if !thruster.enabled || remaining_burn_time <= 0.0 {
        return (DVec3::ZERO, 0.0);
    }
    let direction = thrust_direction(velocity, thruster.direction);
    if direction == DVec3::ZERO {
        return (DVec3::ZERO, 0.0);
    }
    let used = dt.max(0.0).min(remaining_burn_time);
    let duty = if dt > 0.0 { used / dt } else { 1.0 };
    (direction * thrust * duty, used)
}

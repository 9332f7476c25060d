//! Per-tick force model: gravity, drag, thrust and the accumulator deltas
//! they cause. Nothing here integrates.

use bevy::math::DVec3;

use super::atmosphere::{Environment, drag_force};
use super::gravity::gravity_force;
use super::heat::heat_generated;
use super::thrust::{Thruster, thrust_force};
use crate::capsule::{CapsuleConfig, CapsuleStatus};
use crate::orbit::OrbitError;
use crate::types::{CartesianState, ReferenceBody};

/// Forces acting on a capsule at one instant plus what they cost over a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ForceBreakdown {
    /// Gravity from the reference body (N)
    pub gravity: DVec3,
    /// Aerodynamic drag (N)
    pub drag: DVec3,
    /// Engine thrust (N)
    pub thrust: DVec3,
    /// Heat generated over the tick
    pub heat_delta: f64,
    /// Burn time used over the tick (s)
    pub fuel_delta: f64,
}

impl ForceBreakdown {
    /// Sum of all forces.
    pub fn total(&self) -> DVec3 {
        self.gravity + self.drag + self.thrust
    }

    /// Acceleration felt on board: everything except gravity.
    pub fn sensed_acceleration(&self, mass: f64) -> f64 {
        (self.drag + self.thrust).length() / mass
    }
}

/// Compute every force on the capsule for one tick of length `dt`.
///
/// `state` is in the world frame. The reference body is pinned, so the
/// velocity is also the airspeed.
pub fn compute_forces(
    state: &CartesianState,
    reference: &ReferenceBody,
    thruster: &Thruster,
    environment: &Environment,
    capsule: &CapsuleConfig,
    status: &CapsuleStatus,
    dt: f64,
) -> Result<ForceBreakdown, OrbitError> {
    let gravity = gravity_force(state.position, capsule.mass, reference)?;

    let altitude = reference.altitude_of(state.position);
    let density = environment.density(altitude);
    let drag = drag_force(
        state.velocity,
        density,
        capsule.drag_coefficient,
        capsule.reference_area,
    );

    let (thrust, fuel_delta) = thrust_force(
        state.velocity,
        thruster,
        capsule.thrust,
        status.remaining_burn_time,
        dt,
    );

    let heat_delta = heat_generated(
        drag.length() / capsule.mass,
        altitude < reference.atmosphere_height,
        capsule.heating_coefficient,
        capsule.heating_threshold,
        capsule.outside_atmosphere_heating,
        dt,
    );

    let forces = ForceBreakdown {
        gravity,
        drag,
        thrust,
        heat_delta,
        fuel_delta,
    };
    if forces.total().is_finite() && heat_delta.is_finite() {
        Ok(forces)
    } else {
        Err(OrbitError::DegenerateInput("force model produced a non-finite force"))
    }
}

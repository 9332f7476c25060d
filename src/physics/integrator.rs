//! Numerical integrators for physics mode.
//!
//! Integrators advance a Cartesian state by one step given an acceleration
//! function; they know nothing about where the forces come from.

use bevy::math::DVec3;
use bevy::prelude::Resource;

use crate::orbit::OrbitError;
use crate::types::CartesianState;

/// Acceleration as a function of state, in m/s².
pub type AccelerationFn<'a> = dyn Fn(&CartesianState) -> Result<DVec3, OrbitError> + 'a;

/// One fixed-size integration step.
pub trait Integrator: Send + Sync {
    /// Human-readable name for logs.
    fn name(&self) -> &'static str;

    /// Advance `state` by `dt` seconds.
    fn step(
        &self,
        state: &CartesianState,
        dt: f64,
        acceleration: &AccelerationFn<'_>,
    ) -> Result<CartesianState, OrbitError>;
}

/// Semi-implicit (symplectic) Euler: velocity first, then position with the
/// new velocity. The scheme rigid-body engines use.
#[derive(Clone, Copy, Debug, Default)]
pub struct SemiImplicitEuler;

impl Integrator for SemiImplicitEuler {
    fn name(&self) -> &'static str {
        "semi-implicit Euler"
    }

    fn step(
        &self,
        state: &CartesianState,
        dt: f64,
        acceleration: &AccelerationFn<'_>,
    ) -> Result<CartesianState, OrbitError> {
        let acc = acceleration(state)?;
        let velocity = state.velocity + acc * dt;
        let position = state.position + velocity * dt;
        Ok(CartesianState::new(position, velocity))
    }
}

/// Velocity Verlet (leapfrog), 2nd order and symplectic.
#[derive(Clone, Copy, Debug, Default)]
pub struct VelocityVerlet;

impl Integrator for VelocityVerlet {
    fn name(&self) -> &'static str {
        "velocity Verlet"
    }

    fn step(
        &self,
        state: &CartesianState,
        dt: f64,
        acceleration: &AccelerationFn<'_>,
    ) -> Result<CartesianState, OrbitError> {
        // 1. x_new = x + v*dt + 0.5*a*dt²
        // 2. a_new = acceleration(x_new, v)
        // 3. v_new = v + 0.5*(a + a_new)*dt
        let acc = acceleration(state)?;
        let position = state.position + state.velocity * dt + acc * (0.5 * dt * dt);
        // Velocity-dependent forces (drag) see the start-of-step velocity
        let acc_new = acceleration(&CartesianState::new(position, state.velocity))?;
        let velocity = state.velocity + (acc + acc_new) * (0.5 * dt);
        Ok(CartesianState::new(position, velocity))
    }
}

/// Integrator selected for physics mode.
#[derive(Resource)]
pub struct PhysicsIntegrator(pub Box<dyn Integrator>);

impl Default for PhysicsIntegrator {
    fn default() -> Self {
        Self(Box::new(SemiImplicitEuler))
    }
}

impl PhysicsIntegrator {
    pub fn new(integrator: impl Integrator + 'static) -> Self {
        Self(Box::new(integrator))
    }
}

/// Split a tick into equal sub-steps no longer than `max_substep`, with at
/// most `max_substeps` of them.
///
/// # Returns
/// `(count, step_length)`; `(0, 0.0)` for an empty tick
pub fn substeps(dt: f64, max_substep: f64, max_substeps: u32) -> (u32, f64) {
    if !dt.is_finite() || dt <= 0.0 {
        return (0, 0.0);
    }
    let wanted = if max_substep > 0.0 {
        (dt / max_substep).ceil()
    } else {
        1.0
    };
    let count = (wanted as u32).clamp(1, max_substeps.max(1));
    (count, dt / count as f64)
}

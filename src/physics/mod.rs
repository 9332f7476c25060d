//! Force model and numerical integration for physics-mode bodies.
//!
//! Forces (gravity, drag, thrust) and the heat/fuel they cost are computed
//! by [`compute_forces`]; an [`Integrator`] turns them into motion. The
//! simulation systems drive both, sub-stepping each tick so the integrator
//! never takes steps longer than [`PhysicsConfig::max_substep`].

mod atmosphere;
mod forces;
mod gravity;
mod heat;
mod integrator;
mod thrust;

#[cfg(test)]
mod proptest_physics;

use bevy::prelude::*;

pub use atmosphere::{Environment, drag_force};
pub use forces::{ForceBreakdown, compute_forces};
pub use gravity::{gravity_acceleration, gravity_force};
pub use heat::heat_generated;
pub use integrator::{
    AccelerationFn, Integrator, PhysicsIntegrator, SemiImplicitEuler, VelocityVerlet, substeps,
};
pub use thrust::{ThrustDirection, Thruster, thrust_direction, thrust_force};

/// Plugin providing the physics-mode configuration.
///
/// Adds:
/// - [`PhysicsConfig`] sub-stepping limits
/// - [`PhysicsIntegrator`] (semi-implicit Euler unless already inserted)
/// - [`Environment`] atmosphere constants
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PhysicsConfig>()
            .init_resource::<PhysicsIntegrator>()
            .init_resource::<Environment>();
    }
}

/// Sub-stepping limits for physics mode.
#[derive(Resource, Clone, Debug)]
pub struct PhysicsConfig {
    /// Longest integrator step in simulated seconds. Default: 1/60.
    pub max_substep: f64,
    /// Most integrator steps per body per tick. Default: 2000.
    ///
    /// At high time warp the step grows past `max_substep` instead of the
    /// work growing without bound.
    pub max_substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            max_substep: 1.0 / 60.0,
            max_substeps: 2000,
        }
    }
}

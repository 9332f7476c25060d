//! Common test utilities for integration tests.

use bevy::math::DVec3;
use bevy::prelude::Entity;
use reentry::capsule::CapsuleConfig;
use reentry::physics::{Environment, Integrator, PhysicsConfig, Thruster};
use reentry::simulation::{OrbitingBody, SimulationMode, TickContext};
use reentry::types::{CartesianState, GM_PLANET, PLANET_RADIUS, ReferenceBody};

/// Circular orbit at the given altitude, on +x moving +y.
pub fn circular_orbit(altitude: f64) -> CartesianState {
    let r = PLANET_RADIUS + altitude;
    CartesianState::new(DVec3::new(r, 0.0, 0.0), DVec3::new(0.0, (GM_PLANET / r).sqrt(), 0.0))
}

/// 411 km up at 7666 m/s.
pub fn parking_orbit() -> CartesianState {
    CartesianState::new(
        DVec3::new(PLANET_RADIUS + 411_000.0, 0.0, 0.0),
        DVec3::new(0.0, 7666.0, 0.0),
    )
}

/// Inside the atmosphere, mostly horizontal, sinking.
pub fn entry_state(altitude: f64, horizontal_speed: f64, sink_rate: f64) -> CartesianState {
    CartesianState::new(
        DVec3::new(PLANET_RADIUS + altitude, 0.0, 0.0),
        DVec3::new(-sink_rate, horizontal_speed, 0.0),
    )
}

/// Orbital period for a semi-major axis around the default planet.
pub fn orbital_period(semi_major_axis: f64) -> f64 {
    use std::f64::consts::TAU;
    TAU * (semi_major_axis.powi(3) / GM_PLANET).sqrt()
}

/// Specific orbital energy around the default planet.
pub fn orbital_energy(state: &CartesianState) -> f64 {
    0.5 * state.velocity.length_squared() - GM_PLANET / state.position.length()
}

/// Everything a body needs to be stepped outside of an app.
pub struct Harness {
    pub reference: ReferenceBody,
    pub environment: Environment,
    pub capsule: CapsuleConfig,
    pub physics: PhysicsConfig,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            reference: ReferenceBody::default(),
            environment: Environment::default(),
            capsule: CapsuleConfig::default(),
            physics: PhysicsConfig::default(),
        }
    }

    pub fn with_max_substep(mut self, max_substep: f64) -> Self {
        self.physics.max_substep = max_substep;
        self
    }

    pub fn ctx<'a>(&'a self, integrator: &'a dyn Integrator, thruster: Thruster) -> TickContext<'a> {
        TickContext {
            reference: &self.reference,
            environment: &self.environment,
            capsule: &self.capsule,
            physics: &self.physics,
            integrator,
            thruster,
        }
    }

    pub fn body(&self, state: CartesianState, mode: SimulationMode) -> OrbitingBody {
        OrbitingBody::new(state, mode, Entity::PLACEHOLDER, &self.reference, &self.capsule)
            .expect("body should be constructible")
    }
}

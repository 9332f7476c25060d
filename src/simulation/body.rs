//! The orbiting body component and its per-tick update.

use bevy::math::DVec3;
use bevy::prelude::*;

use super::mode::{ModeTransition, SimulationMode, TransitionEffect, transition_effect};
use crate::capsule::{CapsuleConfig, CapsuleStatus};
use crate::orbit::{OrbitError, OrbitalParameters, VectorExt};
use crate::physics::{Environment, Integrator, PhysicsConfig, Thruster, compute_forces, substeps};
use crate::types::{CartesianState, ReferenceBody};

/// A capsule (or any point mass) orbiting a [`ReferenceBody`].
///
/// Holds the world-frame state, the current mode and, when available, the
/// orbital elements the state was last derived into. The elements are
/// replaced wholesale and `elements_revision` bumps on every replacement so
/// display caches know when to rebuild.
#[derive(Component, Clone, Debug)]
pub struct OrbitingBody {
    state: CartesianState,
    mode: SimulationMode,
    elements: Option<OrbitalParameters>,
    elements_revision: u64,
    /// Seconds of simulated time since the elements were last seeded
    local_time: f64,
    reference: Entity,
    landed: bool,
    /// Fuel, heat and load accumulators
    pub status: CapsuleStatus,
}

/// Everything one tick of [`OrbitingBody::advance`] needs to read.
pub struct TickContext<'a> {
    pub reference: &'a ReferenceBody,
    pub environment: &'a Environment,
    pub capsule: &'a CapsuleConfig,
    pub physics: &'a PhysicsConfig,
    pub integrator: &'a dyn Integrator,
    pub thruster: Thruster,
}

/// Notable things that happened during one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Integrator steps taken (zero on rails)
    pub substeps: u32,
    /// The engine ran dry this tick
    pub burn_ended: bool,
    /// The heat shield was used up this tick
    pub shield_depleted: bool,
    /// Touchdown speed if the body reached the surface this tick
    pub touchdown: Option<f64>,
}

impl OrbitingBody {
    /// Create a body with the given world-frame state.
    ///
    /// On-rails bodies need a closed orbit; physics bodies only derive
    /// elements for display.
    pub fn new(
        state: CartesianState,
        mode: SimulationMode,
        reference: Entity,
        reference_body: &ReferenceBody,
        capsule: &CapsuleConfig,
    ) -> Result<Self, OrbitError> {
        if !mode.has_valid_time_scale() {
            return Err(OrbitError::DegenerateInput("time scale must be finite and non-negative"));
        }
        let mut body = Self {
            state,
            mode,
            elements: None,
            elements_revision: 0,
            local_time: 0.0,
            reference,
            landed: false,
            status: CapsuleStatus::new(capsule),
        };
        if mode.is_on_rails() {
            body.reseed(reference_body)?;
        } else {
            body.refresh_elements(reference_body);
        }
        Ok(body)
    }

    /// World-frame position and velocity.
    pub fn state(&self) -> &CartesianState {
        &self.state
    }

    pub fn mode(&self) -> SimulationMode {
        self.mode
    }

    /// Current elements; `None` while they cannot be derived (radial
    /// trajectory, landed).
    pub fn elements(&self) -> Option<&OrbitalParameters> {
        self.elements.as_ref()
    }

    pub fn elements_revision(&self) -> u64 {
        self.elements_revision
    }

    pub fn local_time(&self) -> f64 {
        self.local_time
    }

    /// Entity of the body this one orbits.
    pub fn reference(&self) -> Entity {
        self.reference
    }

    pub fn is_landed(&self) -> bool {
        self.landed
    }

    /// Height above the reference body's surface.
    pub fn altitude(&self, reference: &ReferenceBody) -> f64 {
        reference.altitude_of(self.state.position)
    }

    pub fn inside_atmosphere(&self, reference: &ReferenceBody) -> bool {
        reference.contains_in_atmosphere(self.state.position)
    }

    /// Apoapsis height above the surface (infinite for open orbits).
    pub fn apoapsis_altitude(&self, reference: &ReferenceBody) -> Option<f64> {
        self.elements.map(|e| e.apoapsis() - reference.radius)
    }

    /// Periapsis height above the surface.
    pub fn periapsis_altitude(&self, reference: &ReferenceBody) -> Option<f64> {
        self.elements.map(|e| e.periapsis() - reference.radius)
    }

    /// Switch mode.
    ///
    /// Leaving physics for rails re-derives the elements from the current
    /// state and restarts local time. If that orbit is open or degenerate
    /// the change is refused and the body stays in physics.
    pub fn set_mode(
        &mut self,
        mode: SimulationMode,
        reference: &ReferenceBody,
    ) -> Result<ModeTransition, OrbitError> {
        if !mode.has_valid_time_scale() {
            return Err(OrbitError::DegenerateInput("time scale must be finite and non-negative"));
        }
        let effect = transition_effect(self.mode, mode);
        match effect {
            TransitionEffect::Reseed => self.reseed(reference)?,
            TransitionEffect::Release => self.refresh_elements(reference),
            TransitionEffect::Retime => {}
        }
        let transition = ModeTransition {
            from: self.mode,
            to: mode,
            effect,
        };
        self.mode = mode;
        Ok(transition)
    }

    /// Advance by `dt` real seconds (scaled by the mode's time scale).
    pub fn advance(&mut self, dt: f64, ctx: &TickContext<'_>) -> Result<TickReport, OrbitError> {
        let scaled = dt * self.mode.time_scale();
        if self.landed || scaled.is_nan() || scaled <= 0.0 {
            return Ok(TickReport::default());
        }
        match self.mode {
            SimulationMode::OnRails { .. } => {
                self.propagate(scaled, ctx.reference)?;
                Ok(TickReport::default())
            }
            SimulationMode::Physics { .. } => self.integrate(scaled, ctx),
        }
    }

    fn propagate(&mut self, dt: f64, reference: &ReferenceBody) -> Result<(), OrbitError> {
        let elements = self
            .elements
            .ok_or(OrbitError::DegenerateInput("on-rails body has no elements"))?;
        let local_time = self.local_time + dt;
        let state = elements
            .cartesian_state_after(local_time)?
            .offset_by(reference.position);
        if !state.is_finite() {
            return Err(OrbitError::DegenerateInput("propagated state is not finite"));
        }
        self.state = state;
        self.local_time = local_time;
        Ok(())
    }

    fn integrate(&mut self, dt: f64, ctx: &TickContext<'_>) -> Result<TickReport, OrbitError> {
        let (count, step) = substeps(dt, ctx.physics.max_substep, ctx.physics.max_substeps);
        let mass = ctx.capsule.mass;
        let mut report = TickReport::default();

        let mut state = self.state;
        let mut status = self.status.clone();
        for _ in 0..count {
            let forces = compute_forces(
                &state,
                ctx.reference,
                &ctx.thruster,
                ctx.environment,
                ctx.capsule,
                &status,
                step,
            )?;
            // Integrators sample the start state first; reuse those forces
            let start = state;
            let start_acceleration = forces.total() / mass;
            let current = &status;
            let acceleration = |sample: &CartesianState| -> Result<DVec3, OrbitError> {
                if *sample == start {
                    return Ok(start_acceleration);
                }
                let forces = compute_forces(
                    sample,
                    ctx.reference,
                    &ctx.thruster,
                    ctx.environment,
                    ctx.capsule,
                    current,
                    step,
                )?;
                Ok(forces.total() / mass)
            };
            let next = ctx.integrator.step(&state, step, &acceleration)?;
            report.substeps += 1;

            let had_fuel = status.has_fuel();
            let had_shield = status.heat_shield > 0.0;
            status.apply(
                forces.heat_delta,
                forces.fuel_delta,
                forces.sensed_acceleration(mass),
                step,
                ctx.capsule,
            );
            report.burn_ended |= had_fuel && !status.has_fuel();
            report.shield_depleted |= had_shield && status.heat_shield <= 0.0;

            if ctx.reference.altitude_of(next.position) <= 0.0 {
                let up = (next.position - ctx.reference.position).unit()?;
                state = CartesianState::new(
                    ctx.reference.position + up * ctx.reference.radius,
                    DVec3::ZERO,
                );
                report.touchdown = Some(next.velocity.length());
                break;
            }
            state = next;
        }

        if !state.is_finite() {
            return Err(OrbitError::DegenerateInput("integrated state is not finite"));
        }
        self.state = state;
        self.status = status;
        self.local_time += dt;

        if report.touchdown.is_some() {
            self.landed = true;
            self.elements = None;
            self.elements_revision += 1;
        } else {
            self.refresh_elements(ctx.reference);
        }
        Ok(report)
    }

    /// Re-derive the elements from the current state and restart local
    /// time. Fails on degenerate states and open orbits.
    fn reseed(&mut self, reference: &ReferenceBody) -> Result<(), OrbitError> {
        let elements = OrbitalParameters::from_state(
            &self.state.relative_to(reference.position),
            reference.gravitational_parameter(),
        )?;
        elements.ensure_closed()?;
        self.elements = Some(elements);
        self.elements_revision += 1;
        self.local_time = 0.0;
        Ok(())
    }

    /// Best-effort element refresh for display.
    fn refresh_elements(&mut self, reference: &ReferenceBody) {
        self.elements = OrbitalParameters::from_state(
            &self.state.relative_to(reference.position),
            reference.gravitational_parameter(),
        )
        .ok();
        self.elements_revision += 1;
    }
}

//! Core physics types and constants for the reentry simulation.

use bevy::math::DVec3;
use bevy::prelude::*;

/// System sets ordering one simulation tick.
///
/// A tick advances the clock, then steps every orbiting body, then rebuilds
/// display-facing caches from the new state.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Simulation clock bookkeeping
    Clock,
    /// Mode commands, propagation and force integration
    Step,
    /// Orbit path and marker caches
    Display,
}

/// Physical constants (SI units)

/// Gravitational constant (m³·kg⁻¹·s⁻²)
pub const G: f64 = 6.674e-11;

/// Standard gravity (m/s²)
pub const G0: f64 = 9.80665;

/// Radius of the default (Earth-like) planet in meters
pub const PLANET_RADIUS: f64 = 6.3781e6;

/// Mass of the default planet in kilograms
pub const PLANET_MASS: f64 = 5.9722e24;

/// Height of the default planet's atmosphere above the surface in meters
pub const ATMOSPHERE_HEIGHT: f64 = 100_000.0;

/// Standard gravitational parameter of the default planet (m³/s²)
pub const GM_PLANET: f64 = G * PLANET_MASS;

/// Position and velocity of a point mass.
///
/// Whether the vectors are relative to the central body or to the world
/// origin depends on the caller; element derivation always takes the
/// body-relative form (see [`CartesianState::relative_to`]).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CartesianState {
    /// Position in meters
    pub position: DVec3,
    /// Velocity in meters per second
    pub velocity: DVec3,
}

impl CartesianState {
    pub fn new(position: DVec3, velocity: DVec3) -> Self {
        Self { position, velocity }
    }

    /// Express this state relative to `origin` (velocity is unchanged, the
    /// central body is pinned).
    pub fn relative_to(&self, origin: DVec3) -> Self {
        Self {
            position: self.position - origin,
            velocity: self.velocity,
        }
    }

    /// Inverse of [`CartesianState::relative_to`].
    pub fn offset_by(&self, origin: DVec3) -> Self {
        Self {
            position: self.position + origin,
            velocity: self.velocity,
        }
    }

    /// Speed in m/s
    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Specific orbital energy E = v²/2 - μ/r (body-relative state).
    pub fn specific_energy(&self, mu: f64) -> f64 {
        0.5 * self.velocity.length_squared() - mu / self.position.length()
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

/// The central body an orbiting entity is bound to.
///
/// Orbiting bodies only hold the [`Entity`] of their reference; this
/// component is looked up each tick for position and mass.
#[derive(Component, Clone, Debug)]
pub struct ReferenceBody {
    /// Position of the body centre in meters (world frame)
    pub position: DVec3,
    /// Mass in kilograms
    pub mass: f64,
    /// Surface radius in meters
    pub radius: f64,
    /// Height of the atmosphere above the surface in meters
    pub atmosphere_height: f64,
}

impl Default for ReferenceBody {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            mass: PLANET_MASS,
            radius: PLANET_RADIUS,
            atmosphere_height: ATMOSPHERE_HEIGHT,
        }
    }
}

impl ReferenceBody {
    /// μ = G·M
    pub fn gravitational_parameter(&self) -> f64 {
        G * self.mass
    }

    /// Height of a world-frame position above the surface.
    pub fn altitude_of(&self, position: DVec3) -> f64 {
        (position - self.position).length() - self.radius
    }

    /// Whether a world-frame position lies inside the atmosphere.
    pub fn contains_in_atmosphere(&self, position: DVec3) -> bool {
        self.altitude_of(position) < self.atmosphere_height
    }

    /// Circular orbit speed at the given distance from the body centre.
    pub fn circular_speed(&self, distance: f64) -> f64 {
        (self.gravitational_parameter() / distance).sqrt()
    }
}

/// Simulation clock resource.
#[derive(Resource, Clone, Debug, Default)]
pub struct SimulationTime {
    /// Wall-clock seconds simulated since startup (before per-entity time scaling)
    pub current: f64,
    /// Whether the simulation is paused
    pub paused: bool,
}

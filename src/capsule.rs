//! Capsule parameters and per-entity thermal/fuel accumulators.

use bevy::prelude::*;

use crate::types::G0;

/// Physical and thermal characteristics of the reentry capsule.
#[derive(Resource, Clone, Debug)]
pub struct CapsuleConfig {
    /// Mass in kg
    pub mass: f64,
    /// Drag coefficient (blunt body)
    pub drag_coefficient: f64,
    /// Cross-section facing the flow in m²
    pub reference_area: f64,
    /// Engine thrust in N
    pub thrust: f64,
    /// Total engine burn time in seconds
    pub burn_time: f64,
    /// Heat units shed per second
    pub heat_dissipation: f64,
    /// Heat the shield can absorb before it is spent
    pub heat_shield_capacity: f64,
    /// Heat at which the capsule is lost
    pub heat_limit: f64,
    /// Heat units per second per m/s² of drag deceleration above the threshold
    pub heating_coefficient: f64,
    /// Drag deceleration (m/s²) below which no heat is generated
    pub heating_threshold: f64,
    /// Multiplier on heating outside the atmosphere's nominal height
    pub outside_atmosphere_heating: f64,
    /// Sensed acceleration (m/s²) the capsule survives
    pub max_tolerated_acceleration: f64,
    /// Touchdown speed (m/s) counted as a landing rather than a crash
    pub settling_speed: f64,
}

impl Default for CapsuleConfig {
    fn default() -> Self {
        Self {
            mass: 6400.0,
            drag_coefficient: 1.05,
            reference_area: 12.0,
            thrust: 934_000.0,
            burn_time: 10.0,
            heat_dissipation: 10.0,
            heat_shield_capacity: 200_000.0,
            heat_limit: 15_000.0,
            heating_coefficient: 20.0,
            heating_threshold: 0.5 * G0,
            outside_atmosphere_heating: 0.1,
            max_tolerated_acceleration: 150.0,
            settling_speed: 5.0,
        }
    }
}

impl CapsuleConfig {
    /// Whether a sensed acceleration would crush the capsule.
    pub fn is_crushing(&self, acceleration: f64) -> bool {
        acceleration > self.max_tolerated_acceleration
    }

    /// Whether a touchdown at this speed is survivable.
    pub fn is_soft_touchdown(&self, speed: f64) -> bool {
        speed <= self.settling_speed
    }
}

/// Mutable accumulators carried by each capsule.
#[derive(Clone, Debug, PartialEq)]
pub struct CapsuleStatus {
    /// Engine burn time left in seconds
    pub remaining_burn_time: f64,
    /// Heat soaked into the capsule
    pub heat: f64,
    /// Heat the shield can still absorb
    pub heat_shield: f64,
    /// Largest non-gravitational acceleration seen (m/s²)
    pub peak_acceleration: f64,
}

impl CapsuleStatus {
    /// Fresh capsule: full tank, full shield, cold.
    pub fn new(config: &CapsuleConfig) -> Self {
        Self {
            remaining_burn_time: config.burn_time,
            heat: 0.0,
            heat_shield: config.heat_shield_capacity,
            peak_acceleration: 0.0,
        }
    }

    pub fn has_fuel(&self) -> bool {
        self.remaining_burn_time > 0.0
    }

    pub fn is_overheated(&self, config: &CapsuleConfig) -> bool {
        self.heat > config.heat_limit
    }

    /// Fraction of burn time left, 0..=1.
    pub fn fuel_fraction(&self, config: &CapsuleConfig) -> f64 {
        if config.burn_time > 0.0 {
            (self.remaining_burn_time / config.burn_time).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Fraction of the shield left, 0..=1.
    pub fn heat_shield_fraction(&self, config: &CapsuleConfig) -> f64 {
        if config.heat_shield_capacity > 0.0 {
            (self.heat_shield / config.heat_shield_capacity).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Apply one tick of accumulator changes.
    ///
    /// `heat_delta` is incoming heat (never negative); the shield takes it
    /// first, the rest lands in the capsule. Dissipation over `dt` then
    /// cools the capsule, never below zero.
    pub fn apply(
        &mut self,
        heat_delta: f64,
        fuel_delta: f64,
        sensed_acceleration: f64,
        dt: f64,
        config: &CapsuleConfig,
    ) {
        self.remaining_burn_time = (self.remaining_burn_time - fuel_delta).max(0.0);

        let absorbed = heat_delta.min(self.heat_shield);
        self.heat_shield -= absorbed;
        self.heat += heat_delta - absorbed;
        self.heat = (self.heat - config.heat_dissipation * dt).max(0.0);

        if sensed_acceleration > self.peak_acceleration {
            self.peak_acceleration = sensed_acceleration;
        }
    }
}

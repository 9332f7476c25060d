//! Exponential atmosphere and aerodynamic drag.

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::types::G0;

/// Atmospheric constants used by the drag and heating model.
///
/// Density follows the isothermal barometric formula
/// ρ(h) = ρ0·exp(−g·M·h / (R·T)).
#[derive(Resource, Clone, Debug)]
pub struct Environment {
    /// Sea-level air density in kg/m³
    pub sea_level_density: f64,
    /// Gravitational acceleration used in the scale height (m/s²)
    pub surface_gravity: f64,
    /// Molar mass of air in kg/mol
    pub molar_mass_of_air: f64,
    /// Universal gas constant in J/(mol·K)
    pub gas_constant: f64,
    /// Isothermal temperature in K
    pub temperature: f64,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            sea_level_density: 1.225,
            surface_gravity: G0,
            molar_mass_of_air: 0.0289644,
            gas_constant: 8.31432,
            temperature: 250.0,
        }
    }
}

impl Environment {
    /// Height over which density drops by a factor e, in meters.
    pub fn scale_height(&self) -> f64 {
        self.gas_constant * self.temperature / (self.surface_gravity * self.molar_mass_of_air)
    }

    /// Air density at the given altitude above the surface.
    pub fn density(&self, altitude: f64) -> f64 {
        self.sea_level_density * (-altitude / self.scale_height()).exp()
    }
}

/// Aerodynamic drag opposing the velocity.
///
/// # Arguments
/// * `velocity` - Velocity relative to the air (m/s)
/// * `density` - Air density (kg/m³)
/// * `drag_coefficient` - Cd
/// * `reference_area` - Cross-section in m²
///
/// # Returns
/// Drag force in N (zero at rest)
pub fn drag_force(velocity: DVec3, density: f64, drag_coefficient: f64, reference_area: f64) -> DVec3 {
    let speed_squared = velocity.length_squared();
    let Some(direction) = velocity.try_normalize() else {
        return DVec3::ZERO;
    };
    // F = ½·Cd·ρ·v²·A
    -direction * (0.5 * drag_coefficient * density * speed_squared * reference_area)
}

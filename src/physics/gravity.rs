//! Newtonian gravity from a single central body.

use bevy::math::DVec3;

use crate::orbit::{OrbitError, VectorExt};
use crate::types::{G, ReferenceBody};

/// Gravitational force on a point mass from the reference body.
///
/// # Arguments
/// * `position` - Entity position in meters (world frame)
/// * `mass` - Entity mass in kg
/// * `reference` - Attracting body
///
/// # Returns
/// Force vector in N, pointing at the body centre
///
/// # Errors
/// [`OrbitError::DegenerateInput`] when the entity sits at the body centre.
#[inline]
pub fn gravity_force(
    position: DVec3,
    mass: f64,
    reference: &ReferenceBody,
) -> Result<DVec3, OrbitError> {
    let delta = reference.position - position;
    let direction = delta.unit()?;
    let r_squared = delta.length_squared();

    // F = G·m1·m2/r² towards the body
    Ok(direction * (G * reference.mass * mass / r_squared))
}

/// Gravitational acceleration at a position (independent of the entity's mass).
#[inline]
pub fn gravity_acceleration(position: DVec3, reference: &ReferenceBody) -> Result<DVec3, OrbitError> {
    gravity_force(position, 1.0, reference)
}

//! Aerodynamic heating of the capsule.

/// Heat generated over one tick.
///
/// Heating starts once the drag deceleration exceeds `threshold` and grows
/// linearly with the excess. Above the nominal atmosphere height the rate
/// is damped by `outside_factor`.
///
/// # Arguments
/// * `drag_deceleration` - |F_drag| / m in m/s²
/// * `inside_atmosphere` - Whether the body is below the atmosphere height
/// * `coefficient` - Heat units per second per m/s² of excess
/// * `threshold` - Deceleration (m/s²) where heating starts
/// * `outside_factor` - Multiplier applied outside the atmosphere
/// * `dt` - Tick length in seconds
///
/// # Returns
/// Heat units, never negative
pub fn heat_generated(
    drag_deceleration: f64,
    inside_atmosphere: bool,
    coefficient: f64,
    threshold: f64,
    outside_factor: f64,
    dt: f64,
) -> f64 {
    let excess = (drag_deceleration - threshold).max(0.0);
    let damping = if inside_atmosphere { 1.0 } else { outside_factor };
    excess * coefficient * damping * dt.max(0.0)
}

//! Test utilities for the reentry simulation.
//!
//! Provides fixtures for low-orbit states and assertions for verifying
//! physical invariants like energy and angular momentum conservation.

use bevy::math::DVec3;

use crate::types::{CartesianState, GM_PLANET, PLANET_RADIUS};

/// Fixtures for creating body-relative states around the default planet.
pub mod fixtures {
    use super::*;

    /// Circular orbit at the given altitude.
    ///
    /// The body is placed on the positive x-axis moving in +y (prograde).
    pub fn circular_orbit(altitude: f64) -> CartesianState {
        let r = PLANET_RADIUS + altitude;
        // Circular orbit velocity: v = sqrt(GM/r)
        let v = (GM_PLANET / r).sqrt();
        CartesianState::new(DVec3::new(r, 0.0, 0.0), DVec3::new(0.0, v, 0.0))
    }

    /// Elliptical orbit starting at periapsis on the positive x-axis.
    pub fn elliptical_orbit(periapsis_altitude: f64, eccentricity: f64) -> CartesianState {
        assert!(
            (0.0..1.0).contains(&eccentricity),
            "Eccentricity must be in [0, 1) for elliptical orbit"
        );

        let r_p = PLANET_RADIUS + periapsis_altitude;
        // Semi-major axis from periapsis and eccentricity: a = r_p / (1 - e)
        let a = r_p / (1.0 - eccentricity);
        // Vis-viva equation at periapsis: v = sqrt(GM * (2/r - 1/a))
        let v = (GM_PLANET * (2.0 / r_p - 1.0 / a)).sqrt();

        CartesianState::new(DVec3::new(r_p, 0.0, 0.0), DVec3::new(0.0, v, 0.0))
    }

    /// Escape trajectory (1.1x escape velocity) at the given altitude.
    pub fn escape_trajectory(altitude: f64) -> CartesianState {
        let r = PLANET_RADIUS + altitude;
        let v = (2.0 * GM_PLANET / r).sqrt() * 1.1;
        CartesianState::new(DVec3::new(r, 0.0, 0.0), DVec3::new(0.0, v, 0.0))
    }

    /// The scenario's starting orbit: 411 km up at 7666 m/s.
    pub fn parking_orbit() -> CartesianState {
        CartesianState::new(
            DVec3::new(PLANET_RADIUS + 411_000.0, 0.0, 0.0),
            DVec3::new(0.0, 7666.0, 0.0),
        )
    }

    /// Entry interface state: inside the atmosphere, mostly horizontal,
    /// sinking slightly.
    pub fn entry_interface(altitude: f64, horizontal_speed: f64, sink_rate: f64) -> CartesianState {
        CartesianState::new(
            DVec3::new(PLANET_RADIUS + altitude, 0.0, 0.0),
            DVec3::new(-sink_rate, horizontal_speed, 0.0),
        )
    }
}

/// Assertions for verifying physical invariants.
pub mod assertions {
    use super::*;

    /// Specific orbital energy E = v²/2 - GM/r.
    pub fn orbital_energy(pos: DVec3, vel: DVec3) -> f64 {
        0.5 * vel.length_squared() - GM_PLANET / pos.length()
    }

    /// Specific angular momentum, z-component of r × v.
    pub fn angular_momentum(pos: DVec3, vel: DVec3) -> f64 {
        pos.cross(vel).z
    }

    /// Assert that energy is conserved within tolerance.
    ///
    /// # Panics
    /// Panics if relative energy drift exceeds tolerance.
    pub fn assert_energy_conserved(initial_energy: f64, final_energy: f64, tolerance: f64) {
        let drift = if initial_energy.abs() > 1e-10 {
            ((final_energy - initial_energy) / initial_energy).abs()
        } else {
            (final_energy - initial_energy).abs()
        };
        assert!(
            drift <= tolerance,
            "Energy not conserved: initial={initial_energy:.6e}, final={final_energy:.6e}, drift={drift:.6e}, tolerance={tolerance:.6e}"
        );
    }

    /// Assert that angular momentum is conserved within tolerance.
    ///
    /// # Panics
    /// Panics if relative angular momentum drift exceeds tolerance.
    pub fn assert_angular_momentum_conserved(initial_l: f64, final_l: f64, tolerance: f64) {
        let drift = if initial_l.abs() > 1e-10 {
            ((final_l - initial_l) / initial_l).abs()
        } else {
            (final_l - initial_l).abs()
        };
        assert!(
            drift <= tolerance,
            "Angular momentum not conserved: initial={initial_l:.6e}, final={final_l:.6e}, drift={drift:.6e}, tolerance={tolerance:.6e}"
        );
    }

    /// Relative distance between two vectors, normalized by the expected one.
    pub fn relative_error(actual: DVec3, expected: DVec3) -> f64 {
        (actual - expected).length() / expected.length().max(1e-12)
    }

    /// Assert two states agree to a relative tolerance.
    ///
    /// # Panics
    /// Panics if position or velocity differ by more than `tolerance`.
    pub fn assert_states_close(actual: &CartesianState, expected: &CartesianState, tolerance: f64) {
        let pos = relative_error(actual.position, expected.position);
        let vel = relative_error(actual.velocity, expected.velocity);
        assert!(
            pos <= tolerance && vel <= tolerance,
            "States differ: position error {pos:.3e}, velocity error {vel:.3e}, tolerance {tolerance:.3e}\n actual: {actual:?}\n expected: {expected:?}"
        );
    }

    /// Escape velocity at a distance from the planet centre.
    pub fn escape_velocity(distance: f64) -> f64 {
        (2.0 * GM_PLANET / distance).sqrt()
    }
}

/// Utilities for creating headless Bevy apps for testing.
pub mod bevy_test {
    use bevy::prelude::*;

    /// Create a minimal Bevy app for testing without rendering.
    ///
    /// This app uses MinimalPlugins for a lightweight test environment.
    pub fn headless_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_circular_orbit_has_correct_velocity() {
        let state = fixtures::circular_orbit(400_000.0);
        let expected_v = (GM_PLANET / (PLANET_RADIUS + 400_000.0)).sqrt();
        assert_relative_eq!(state.speed(), expected_v, epsilon = 1e-9);
    }

    #[test]
    fn test_escape_trajectory_is_unbound() {
        let state = fixtures::escape_trajectory(400_000.0);
        assert!(assertions::orbital_energy(state.position, state.velocity) > 0.0);
    }

    #[test]
    fn test_elliptical_orbit_energy() {
        let state = fixtures::elliptical_orbit(300_000.0, 0.2);
        assert!(assertions::orbital_energy(state.position, state.velocity) < 0.0);
    }

    #[test]
    fn test_parking_orbit_is_nearly_circular() {
        let state = fixtures::parking_orbit();
        let circular = fixtures::circular_orbit(411_000.0);
        assert!((state.speed() - circular.speed()).abs() < 20.0);
    }
}

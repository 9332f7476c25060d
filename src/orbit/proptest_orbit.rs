//! Property-based tests for the two-body core using proptest.
//!
//! These tests check the conversion and propagation invariants across a wide
//! range of low-orbit states.

use std::f64::consts::TAU;

use bevy::math::DVec3;
use proptest::prelude::*;

use super::{KeplerSolver, OrbitError, OrbitalParameters, derive_elements};
use crate::types::{GM_PLANET, PLANET_RADIUS};

/// Bound planar state: radius between 200 km and 30000 km altitude, speed
/// between 60% and 135% of circular, flight-path angle within ±60°.
fn bound_planar_state() -> impl Strategy<Value = (DVec3, DVec3)> {
    (
        200_000.0f64..30_000_000.0,
        0.0f64..TAU,
        0.6f64..1.35,
        -1.0f64..1.0,
        prop::bool::ANY,
    )
        .prop_map(|(altitude, angle, speed_factor, flight_path, retrograde)| {
            let r = PLANET_RADIUS + altitude;
            let position = DVec3::new(r * angle.cos(), r * angle.sin(), 0.0);
            let radial = position / r;
            let tangential = if retrograde {
                DVec3::new(radial.y, -radial.x, 0.0)
            } else {
                DVec3::new(-radial.y, radial.x, 0.0)
            };
            let speed = speed_factor * (GM_PLANET / r).sqrt();
            let velocity =
                speed * (flight_path.cos() * tangential + flight_path.sin() * radial);
            (position, velocity)
        })
        .prop_filter("orbit must be bound", |(r, v)| {
            0.5 * v.length_squared() - GM_PLANET / r.length() < 0.0
        })
}

fn relative_error(actual: DVec3, expected: DVec3) -> f64 {
    (actual - expected).length() / expected.length()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Converting a state to elements and propagating zero seconds gives the
    /// state back.
    #[test]
    fn prop_round_trip((position, velocity) in bound_planar_state()) {
        let elements = derive_elements(position, velocity, GM_PLANET).unwrap();
        let state = elements.cartesian_state_after(0.0).unwrap();

        prop_assert!(
            relative_error(state.position, position) < 1e-6,
            "position drifted: {:?} vs {:?} (e = {})",
            state.position, position, elements.eccentricity()
        );
        prop_assert!(
            relative_error(state.velocity, velocity) < 1e-6,
            "velocity drifted: {:?} vs {:?} (e = {})",
            state.velocity, velocity, elements.eccentricity()
        );
    }

    /// Propagating one full period returns to the starting state.
    #[test]
    fn prop_period_closure((position, velocity) in bound_planar_state()) {
        let elements = derive_elements(position, velocity, GM_PLANET).unwrap();
        let start = elements.cartesian_state_after(0.0).unwrap();
        let after = elements.cartesian_state_after(elements.orbital_period()).unwrap();

        prop_assert!(
            relative_error(after.position, start.position) < 1e-6,
            "orbit did not close: {:?} vs {:?}",
            after.position, start.position
        );
        prop_assert!(
            relative_error(after.velocity, start.velocity) < 1e-6,
            "velocity did not return: {:?} vs {:?}",
            after.velocity, start.velocity
        );
    }

    /// Newton-Raphson converges within its cap for every bound eccentricity.
    #[test]
    fn prop_kepler_converges(
        eccentricity in 0.0f64..0.99,
        mean_anomaly in -50.0f64..50.0,
    ) {
        let solver = KeplerSolver::default();
        let solution = solver.solve(mean_anomaly, eccentricity).unwrap();

        prop_assert!(solution.iterations <= solver.max_iterations);
        prop_assert!(solution.last_step < solver.tolerance);

        let e_anomaly = solution.eccentric_anomaly;
        let residual =
            e_anomaly - eccentricity * e_anomaly.sin() - mean_anomaly.rem_euclid(TAU);
        prop_assert!(residual.abs() < 1e-8, "residual {} for e = {}", residual, eccentricity);
    }

    /// Open orbits never reach the Kepler solver.
    #[test]
    fn prop_hyperbolic_guard(
        altitude in 200_000.0f64..10_000_000.0,
        excess in 1.01f64..3.0,
        time in 0.0f64..1.0e5,
    ) {
        let r = PLANET_RADIUS + altitude;
        let escape = (2.0 * GM_PLANET / r).sqrt();
        let elements = derive_elements(
            DVec3::new(r, 0.0, 0.0),
            DVec3::new(0.0, escape * excess, 0.0),
            GM_PLANET,
        )
        .unwrap();

        prop_assert!(elements.eccentricity() > 1.0);
        prop_assert!(
            matches!(
                elements.cartesian_state_after(time),
                Err(OrbitError::HyperbolicOrbit { .. })
            ),
            "hyperbolic orbit propagated"
        );
    }

    /// Apoapsis is never below periapsis, bound or not.
    #[test]
    fn prop_apoapsis_not_below_periapsis(
        altitude in 200_000.0f64..30_000_000.0,
        speed_factor in 0.3f64..2.5,
        flight_path in -1.2f64..1.2,
    ) {
        let r = PLANET_RADIUS + altitude;
        let speed = speed_factor * (GM_PLANET / r).sqrt();
        let velocity = speed * DVec3::new(flight_path.sin(), flight_path.cos(), 0.0);
        if let Ok(elements) = derive_elements(DVec3::new(r, 0.0, 0.0), velocity, GM_PLANET) {
            prop_assert!(elements.apoapsis() >= elements.periapsis());
        }
    }

    /// Elements built directly survive propagation and re-derivation.
    #[test]
    fn prop_elements_reproduced(
        a in 6.6e6f64..4.0e7,
        e in 0.001f64..0.9,
        w in 0.0f64..TAU,
        m in 0.0f64..TAU,
        t in 0.0f64..2.0e4,
    ) {
        let elements = OrbitalParameters::planar(a, e, w, m, GM_PLANET).unwrap();
        let state = elements.cartesian_state_after(t).unwrap();
        let again = derive_elements(state.position, state.velocity, GM_PLANET).unwrap();

        prop_assert!((again.semi_major_axis() - a).abs() / a < 1e-6);
        prop_assert!((again.eccentricity() - e).abs() < 1e-6);
    }
}

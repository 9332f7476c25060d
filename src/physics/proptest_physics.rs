//! Property-based tests for the force model using proptest.
//!
//! These tests verify the force and accumulator invariants across a wide
//! range of states.

use bevy::math::DVec3;
use proptest::prelude::*;

use super::{
    Environment, Integrator, SemiImplicitEuler, ThrustDirection, Thruster, compute_forces,
    gravity_force,
};
use crate::capsule::{CapsuleConfig, CapsuleStatus};
use crate::test_utils::{assertions, fixtures};
use crate::types::{CartesianState, PLANET_RADIUS, ReferenceBody};

fn any_direction() -> impl Strategy<Value = ThrustDirection> {
    prop_oneof![
        Just(ThrustDirection::Prograde),
        Just(ThrustDirection::Retrograde)
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Gravity always points at the body centre.
    #[test]
    fn prop_gravity_points_inward(
        x in -1.0e7f64..1.0e7,
        y in -1.0e7f64..1.0e7,
    ) {
        let position = DVec3::new(x, y, 0.0);
        prop_assume!(position.length() > 1.0);

        let planet = ReferenceBody::default();
        let force = gravity_force(position, 6400.0, &planet).unwrap();
        let cos = force.dot(-position) / (force.length() * position.length());
        prop_assert!((cos - 1.0).abs() < 1e-9, "gravity not radial: cos = {}", cos);
    }

    /// Drag never adds energy: it opposes the velocity.
    #[test]
    fn prop_drag_opposes_velocity(
        altitude in 0.0f64..120_000.0,
        vx in -8000.0f64..8000.0,
        vy in -8000.0f64..8000.0,
    ) {
        let velocity = DVec3::new(vx, vy, 0.0);
        prop_assume!(velocity.length() > 1.0);

        let capsule = CapsuleConfig::default();
        let state = CartesianState::new(DVec3::X * (PLANET_RADIUS + altitude), velocity);
        let forces = compute_forces(
            &state,
            &ReferenceBody::default(),
            &Thruster::default(),
            &Environment::default(),
            &capsule,
            &CapsuleStatus::new(&capsule),
            0.1,
        )
        .unwrap();

        prop_assert!(forces.drag.dot(velocity) <= 0.0);
        prop_assert!(forces.heat_delta >= 0.0);
    }

    /// Density falls monotonically with altitude.
    #[test]
    fn prop_density_monotonic(low in 0.0f64..200_000.0, gap in 1.0f64..50_000.0) {
        let env = Environment::default();
        prop_assert!(env.density(low + gap) < env.density(low));
    }

    /// Burn time used never exceeds the tick or what is left.
    #[test]
    fn prop_fuel_delta_bounded(
        remaining in 0.0f64..10.0,
        dt in 0.0f64..5.0,
        direction in any_direction(),
        enabled in prop::bool::ANY,
    ) {
        let capsule = CapsuleConfig::default();
        let status = CapsuleStatus {
            remaining_burn_time: remaining,
            ..CapsuleStatus::new(&capsule)
        };
        let state = fixtures::parking_orbit();
        let forces = compute_forces(
            &state,
            &ReferenceBody::default(),
            &Thruster { enabled, direction },
            &Environment::default(),
            &capsule,
            &status,
            dt,
        )
        .unwrap();

        prop_assert!(forces.fuel_delta >= 0.0);
        prop_assert!(forces.fuel_delta <= dt);
        prop_assert!(forces.fuel_delta <= remaining);
        if !enabled {
            prop_assert_eq!(forces.thrust, DVec3::ZERO);
        }
    }

    /// Heat never goes negative and the shield never exceeds its capacity.
    #[test]
    fn prop_accumulators_stay_in_range(
        heats in prop::collection::vec(0.0f64..50_000.0, 1..30),
        dt in 0.0f64..2.0,
    ) {
        let capsule = CapsuleConfig::default();
        let mut status = CapsuleStatus::new(&capsule);
        for heat in heats {
            status.apply(heat, 0.0, 0.0, dt, &capsule);
            prop_assert!(status.heat >= 0.0);
            prop_assert!(status.heat_shield >= 0.0);
            prop_assert!(status.heat_shield <= capsule.heat_shield_capacity);
        }
    }

    /// Semi-implicit Euler keeps angular momentum under a central force.
    #[test]
    fn prop_angular_momentum_conservation(
        altitude in 200_000.0f64..2_000_000.0,
        eccentricity in 0.0f64..0.5,
    ) {
        let start = fixtures::elliptical_orbit(altitude, eccentricity);
        let planet = ReferenceBody::default();
        let acceleration = |state: &CartesianState| gravity_force(state.position, 1.0, &planet);

        let mut state = start;
        for _ in 0..2000 {
            state = SemiImplicitEuler.step(&state, 1.0, &acceleration).unwrap();
        }

        let initial = assertions::angular_momentum(start.position, start.velocity);
        let last = assertions::angular_momentum(state.position, state.velocity);
        prop_assert!(((last - initial) / initial).abs() < 1e-9);
    }
}

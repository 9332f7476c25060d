//! Analytic propagation: Kepler's equation and elements → state.

use std::f64::consts::{PI, TAU};

use bevy::math::DVec3;

use super::{OrbitError, OrbitalParameters};
use crate::types::CartesianState;

/// Newton-Raphson solver for Kepler's equation M = E - e·sin(E).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeplerSolver {
    /// Stop once |ΔE| drops below this (radians)
    pub tolerance: f64,
    /// Iteration cap; exceeding it is a [`OrbitError::NonConvergence`]
    pub max_iterations: u32,
}

impl Default for KeplerSolver {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 100,
        }
    }
}

/// Result of a converged solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeplerSolution {
    /// Eccentric anomaly E in radians
    pub eccentric_anomaly: f64,
    /// Newton steps taken
    pub iterations: u32,
    /// Size of the final Newton step
    pub last_step: f64,
}

impl KeplerSolver {
    /// Solve Kepler's equation for the eccentric anomaly.
    ///
    /// # Arguments
    /// * `mean_anomaly` - Mean anomaly M in radians (any value, reduced to [0, 2π))
    /// * `eccentricity` - Eccentricity, 0 ≤ e < 1
    ///
    /// # Returns
    /// Eccentric anomaly E in radians, within one step of [0, 2π)
    pub fn solve(&self, mean_anomaly: f64, eccentricity: f64) -> Result<KeplerSolution, OrbitError> {
        if !mean_anomaly.is_finite() || !(eccentricity >= 0.0) {
            return Err(OrbitError::DegenerateInput(
                "Kepler's equation needs a finite mean anomaly and e >= 0",
            ));
        }
        if eccentricity >= 1.0 {
            return Err(OrbitError::HyperbolicOrbit { eccentricity });
        }

        let m = mean_anomaly.rem_euclid(TAU);

        // Initial guess: E = M for low eccentricity, π for high e
        let mut e_anomaly = if eccentricity < 0.8 { m } else { PI };

        let mut last_step = f64::INFINITY;
        for iteration in 1..=self.max_iterations {
            // f(E) = E - e*sin(E) - M
            let f = e_anomaly - eccentricity * e_anomaly.sin() - m;
            // f'(E) = 1 - e*cos(E), strictly positive for e < 1
            let f_prime = 1.0 - eccentricity * e_anomaly.cos();

            let delta = f / f_prime;
            e_anomaly -= delta;
            last_step = delta.abs();

            if last_step < self.tolerance {
                return Ok(KeplerSolution {
                    eccentric_anomaly: e_anomaly,
                    iterations: iteration,
                    last_step,
                });
            }
        }

        Err(OrbitError::NonConvergence {
            iterations: self.max_iterations,
            last_step,
        })
    }
}

impl OrbitalParameters {
    /// Mean anomaly after `time` seconds of local time.
    pub fn mean_anomaly_after(&self, time: f64) -> f64 {
        if time == 0.0 {
            self.mean_anomaly()
        } else {
            self.mean_anomaly() + time * self.mean_motion()
        }
    }

    /// Eccentric anomaly after `time` seconds, using the default solver.
    pub fn eccentric_anomaly_after(&self, time: f64) -> Result<f64, OrbitError> {
        self.eccentric_anomaly_after_with(time, &KeplerSolver::default())
    }

    /// Eccentric anomaly after `time` seconds with an explicit solver.
    pub fn eccentric_anomaly_after_with(
        &self,
        time: f64,
        solver: &KeplerSolver,
    ) -> Result<f64, OrbitError> {
        self.ensure_closed()?;
        let solution = solver.solve(self.mean_anomaly_after(time), self.eccentricity())?;
        Ok(solution.eccentric_anomaly)
    }

    /// Body-relative state at the given eccentric anomaly.
    ///
    /// # Arguments
    /// * `eccentric_anomaly` - Eccentric anomaly E in radians
    ///
    /// # Returns
    /// Position and velocity relative to the central body
    pub fn cartesian_state_at_anomaly(
        &self,
        eccentric_anomaly: f64,
    ) -> Result<CartesianState, OrbitError> {
        self.ensure_closed()?;

        let e = self.eccentricity();
        let a = self.semi_major_axis();
        let half_e = eccentric_anomaly / 2.0;

        // atan2 for full quadrant coverage
        let true_anomaly =
            2.0 * ((1.0 + e).sqrt() * half_e.sin()).atan2((1.0 - e).sqrt() * half_e.cos());

        let rc = a * (1.0 - e * eccentric_anomaly.cos());

        // Perifocal frame
        let o = DVec3::new(rc * true_anomaly.cos(), rc * true_anomaly.sin(), 0.0);
        let o_dot = (self.standard_gravitational_parameter() * a).sqrt() / rc
            * DVec3::new(
                -eccentric_anomaly.sin(),
                (1.0 - e * e).sqrt() * eccentric_anomaly.cos(),
                0.0,
            );

        let (p, q) = self.perifocal_basis();
        let state = CartesianState::new(o.x * p + o.y * q, o_dot.x * p + o_dot.y * q);

        if state.is_finite() {
            Ok(state)
        } else {
            Err(OrbitError::DegenerateInput("propagated state is not finite"))
        }
    }

    /// Body-relative state after `time` seconds of local time.
    pub fn cartesian_state_after(&self, time: f64) -> Result<CartesianState, OrbitError> {
        let eccentric_anomaly = self.eccentric_anomaly_after(time)?;
        self.cartesian_state_at_anomaly(eccentric_anomaly)
    }

    /// Unit vectors of the perifocal x (towards periapsis) and y axes in
    /// the reference frame, i.e. the first two columns of R_z(Ω)·R_x(i)·R_z(ω).
    pub(crate) fn perifocal_basis(&self) -> (DVec3, DVec3) {
        let (sin_w, cos_w) = self.argument_of_periapsis().sin_cos();
        let (sin_o, cos_o) = self.longitude_of_ascending_node().sin_cos();
        let (sin_i, cos_i) = self.inclination().sin_cos();

        let p = DVec3::new(
            cos_w * cos_o - sin_w * cos_i * sin_o,
            cos_w * sin_o + sin_w * cos_i * cos_o,
            sin_w * sin_i,
        );
        let q = DVec3::new(
            -sin_w * cos_o - cos_w * cos_i * sin_o,
            cos_w * cos_i * cos_o - sin_w * sin_o,
            cos_w * sin_i,
        );
        (p, q)
    }

    pub(crate) fn ensure_closed(&self) -> Result<(), OrbitError> {
        if self.is_closed() {
            Ok(())
        } else {
            Err(OrbitError::HyperbolicOrbit {
                eccentricity: self.eccentricity(),
            })
        }
    }
}

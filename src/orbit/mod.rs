//! Two-body orbital dynamics.
//!
//! Converts Cartesian state vectors to classical orbital elements and back,
//! propagates elements analytically by solving Kepler's equation, and samples
//! closed orbits for display.
//!
//! Coordinate frame:
//! - Vectors are relative to the central body.
//! - Simulated motion is planar (z = 0). Inclination and the ascending node
//!   are derived and honoured by the rotation but otherwise unused.

pub mod elements;
pub mod kepler;
pub mod path;
pub mod vector;

#[cfg(test)]
mod proptest_orbit;

pub use elements::{OrbitalParameters, derive_elements};
pub use kepler::{KeplerSolution, KeplerSolver};
pub use path::{DEFAULT_PATH_STEP, OrbitPath, OrbitPathIter};
pub use vector::{Vector, VectorExt};

/// Failures of the orbital-dynamics core.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum OrbitError {
    /// Input for which the requested quantity is undefined: a zero-length
    /// vector, a non-positive gravitational parameter, a radial trajectory.
    #[error("degenerate input: {0}")]
    DegenerateInput(&'static str),

    /// Analytic propagation requested on an open (e >= 1) orbit.
    #[error("orbit is not closed (e = {eccentricity}), analytic propagation unavailable")]
    HyperbolicOrbit { eccentricity: f64 },

    /// Newton-Raphson exceeded its iteration cap.
    #[error("Kepler solver did not converge after {iterations} iterations (last step {last_step:e})")]
    NonConvergence { iterations: u32, last_step: f64 },
}

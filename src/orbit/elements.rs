//! Classical orbital elements derived from Cartesian state vectors.

use std::f64::consts::{PI, TAU};

use bevy::math::DVec3;

use super::OrbitError;
use super::vector::VectorExt;
use crate::types::CartesianState;

/// Below this eccentricity the eccentricity vector carries no usable
/// direction and the orbit is treated as circular.
pub const CIRCULAR_EPSILON: f64 = 1e-11;

/// Relative size of |r × ṙ| (against |r|·|ṙ|) under which a trajectory is
/// considered radial.
const RADIAL_EPSILON: f64 = 1e-12;

/// Relative size of the node vector (against |h|) under which an orbit is
/// considered non-inclined.
const NODE_EPSILON: f64 = 1e-12;

/// Classical orbital elements of a two-body orbit.
///
/// A snapshot: derived from one state and μ, never mutated, only replaced.
/// All angles in radians, distances in meters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitalParameters {
    semi_major_axis: f64,
    eccentricity: f64,
    argument_of_periapsis: f64,
    /// Zero for non-inclined orbits
    longitude_of_ascending_node: f64,
    inclination: f64,
    /// Mean anomaly at local time zero. For open orbits this is the
    /// hyperbolic mean anomaly.
    mean_anomaly: f64,
    standard_gravitational_parameter: f64,
}

/// Derive orbital elements from a body-relative position and velocity.
pub fn derive_elements(
    position: DVec3,
    velocity: DVec3,
    mu: f64,
) -> Result<OrbitalParameters, OrbitError> {
    OrbitalParameters::from_state(&CartesianState::new(position, velocity), mu)
}

impl OrbitalParameters {
    /// Derive elements from a body-relative state and gravitational
    /// parameter μ.
    ///
    /// # Errors
    /// [`OrbitError::DegenerateInput`] when μ is not positive, the state is
    /// not finite, the position is zero, the trajectory is radial (no orbital
    /// plane, e.g. zero velocity) or the energy is exactly parabolic.
    pub fn from_state(state: &CartesianState, mu: f64) -> Result<Self, OrbitError> {
        if !(mu.is_finite() && mu > 0.0) {
            return Err(OrbitError::DegenerateInput(
                "gravitational parameter must be positive",
            ));
        }
        if !state.is_finite() {
            return Err(OrbitError::DegenerateInput("state vector is not finite"));
        }

        let r = state.position;
        let r_dot = state.velocity;
        let r_len = r.length();
        let r_hat = r.unit()?;

        // Orbital momentum
        let h = r.cross(r_dot);
        let h_len = h.length();
        if h_len <= RADIAL_EPSILON * r_len * r_dot.length() {
            return Err(OrbitError::DegenerateInput(
                "radial trajectory has no orbital plane",
            ));
        }

        // Eccentricity vector
        let e_vec = r_dot.cross(h) / mu - r_hat;
        let ec = e_vec.length();

        // Vector pointing towards the ascending node
        let n = DVec3::Z.cross(h);
        let n_len = n.length();
        let inclined = n_len > NODE_EPSILON * h_len;

        let inclination = (h.z / h_len).clamp(-1.0, 1.0).acos();

        let longitude_of_ascending_node = if !inclined {
            0.0
        } else {
            let node = (n.x / n_len).clamp(-1.0, 1.0).acos();
            if n.y >= 0.0 { node } else { TAU - node }
        };

        let circular = ec < CIRCULAR_EPSILON;

        let true_anomaly = if circular {
            // No periapsis to measure from: use the line of nodes (or +x for
            // flat orbits), counting in the direction of motion.
            let reference = if inclined { n / n_len } else { DVec3::X };
            let normal = h / h_len;
            reference
                .cross(r)
                .dot(normal)
                .atan2(reference.dot(r))
                .rem_euclid(TAU)
        } else {
            let v = (e_vec.dot(r) / (ec * r_len)).clamp(-1.0, 1.0).acos();
            if r.dot(r_dot) >= 0.0 { v } else { TAU - v }
        };

        // Flat orbits measure ω from +x; the retrograde flip mirrors the angle
        // for orbits whose momentum points along -z. Inclined orbits measure
        // it from the ascending node.
        let argument_of_periapsis = if circular {
            0.0
        } else if inclined {
            let w = (n.dot(e_vec) / (n_len * ec)).clamp(-1.0, 1.0).acos();
            if e_vec.z >= 0.0 { w } else { TAU - w }
        } else if h.z >= 0.0 {
            e_vec.y.atan2(e_vec.x)
        } else {
            TAU - e_vec.y.atan2(e_vec.x)
        };

        let mean_anomaly = if ec < 1.0 {
            let eccentric_anomaly =
                2.0 * ((true_anomaly / 2.0).tan() / ((1.0 + ec) / (1.0 - ec)).sqrt()).atan();
            eccentric_anomaly - ec * eccentric_anomaly.sin()
        } else if ec == 1.0 {
            // Barker's equation
            let d = (true_anomaly / 2.0).tan();
            d + d.powi(3) / 3.0
        } else {
            let hyperbolic_anomaly =
                2.0 * ((true_anomaly / 2.0).tan() * ((ec - 1.0) / (ec + 1.0)).sqrt()).atanh();
            ec * hyperbolic_anomaly.sinh() - hyperbolic_anomaly
        };

        let semi_major_axis = 1.0 / (2.0 / r_len - r_dot.length_squared() / mu);
        if !semi_major_axis.is_finite() {
            return Err(OrbitError::DegenerateInput(
                "parabolic trajectory has no finite semi-major axis",
            ));
        }

        let elements = Self {
            semi_major_axis,
            eccentricity: ec,
            argument_of_periapsis,
            longitude_of_ascending_node,
            inclination,
            mean_anomaly,
            standard_gravitational_parameter: mu,
        };

        if elements.is_finite() {
            Ok(elements)
        } else {
            Err(OrbitError::DegenerateInput("derived elements are not finite"))
        }
    }

    /// Build elements for a flat (non-inclined, prograde) orbit directly.
    ///
    /// # Errors
    /// [`OrbitError::DegenerateInput`] for non-positive μ, a zero or
    /// non-finite semi-major axis, or a negative eccentricity.
    pub fn planar(
        semi_major_axis: f64,
        eccentricity: f64,
        argument_of_periapsis: f64,
        mean_anomaly: f64,
        mu: f64,
    ) -> Result<Self, OrbitError> {
        if !(mu.is_finite() && mu > 0.0) {
            return Err(OrbitError::DegenerateInput(
                "gravitational parameter must be positive",
            ));
        }
        if !semi_major_axis.is_finite() || semi_major_axis == 0.0 {
            return Err(OrbitError::DegenerateInput("semi-major axis must be finite and non-zero"));
        }
        if !(eccentricity >= 0.0) {
            return Err(OrbitError::DegenerateInput("eccentricity must be non-negative"));
        }

        let elements = Self {
            semi_major_axis,
            eccentricity,
            argument_of_periapsis,
            longitude_of_ascending_node: 0.0,
            inclination: 0.0,
            mean_anomaly,
            standard_gravitational_parameter: mu,
        };
        if elements.is_finite() {
            Ok(elements)
        } else {
            Err(OrbitError::DegenerateInput("elements are not finite"))
        }
    }

    /// Same orbit tilted out of the reference plane.
    pub fn with_orientation(self, inclination: f64, longitude_of_ascending_node: f64) -> Self {
        Self {
            inclination,
            longitude_of_ascending_node,
            ..self
        }
    }

    /// Semi-major axis a in meters (negative for hyperbolic orbits)
    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    /// Eccentricity e
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    /// Argument of periapsis ω in radians
    pub fn argument_of_periapsis(&self) -> f64 {
        self.argument_of_periapsis
    }

    /// Longitude of the ascending node Ω in radians
    pub fn longitude_of_ascending_node(&self) -> f64 {
        self.longitude_of_ascending_node
    }

    /// Inclination i in radians
    pub fn inclination(&self) -> f64 {
        self.inclination
    }

    /// Mean anomaly M at local time zero, in radians
    pub fn mean_anomaly(&self) -> f64 {
        self.mean_anomaly
    }

    /// Standard gravitational parameter μ in m³/s²
    pub fn standard_gravitational_parameter(&self) -> f64 {
        self.standard_gravitational_parameter
    }

    /// Farthest distance from the central body's centre.
    ///
    /// Infinite for open orbits, so `apoapsis() >= periapsis()` always holds.
    pub fn apoapsis(&self) -> f64 {
        if self.is_closed() {
            self.semi_major_axis * (1.0 + self.eccentricity)
        } else {
            f64::INFINITY
        }
    }

    /// Closest distance to the central body's centre.
    pub fn periapsis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    /// Orbital period in seconds (infinite for open orbits).
    pub fn orbital_period(&self) -> f64 {
        if self.is_closed() {
            TAU * (self.semi_major_axis.powi(3) / self.standard_gravitational_parameter).sqrt()
        } else {
            f64::INFINITY
        }
    }

    /// Mean motion n = sqrt(μ/|a|³) in rad/s.
    pub fn mean_motion(&self) -> f64 {
        (self.standard_gravitational_parameter / self.semi_major_axis.abs().powi(3)).sqrt()
    }

    /// Specific orbital energy -μ/(2a) in J/kg.
    pub fn specific_energy(&self) -> f64 {
        -self.standard_gravitational_parameter / (2.0 * self.semi_major_axis)
    }

    pub fn is_hyperbolic(&self) -> bool {
        self.eccentricity > 1.0
    }

    /// Whether the orbit is an ellipse (e < 1) and can be propagated
    /// analytically.
    pub fn is_closed(&self) -> bool {
        self.eccentricity < 1.0
    }

    /// Body-relative state at apoapsis (eccentric anomaly π).
    pub fn apoapsis_state(&self) -> Result<CartesianState, OrbitError> {
        self.cartesian_state_at_anomaly(PI)
    }

    /// Body-relative state at periapsis (eccentric anomaly 0).
    pub fn periapsis_state(&self) -> Result<CartesianState, OrbitError> {
        self.cartesian_state_at_anomaly(0.0)
    }

    fn is_finite(&self) -> bool {
        self.semi_major_axis.is_finite()
            && self.eccentricity.is_finite()
            && self.argument_of_periapsis.is_finite()
            && self.longitude_of_ascending_node.is_finite()
            && self.inclination.is_finite()
            && self.mean_anomaly.is_finite()
    }
}

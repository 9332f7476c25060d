//! Sampled orbit outline for display.
//!
//! Points are taken at evenly spaced eccentric anomalies, which bunches
//! them near apoapsis where the ellipse curves least. Good enough for a
//! polyline; the simulation never reads these points back.

use std::f64::consts::TAU;

use bevy::math::{DVec2, DVec3};

use super::{OrbitError, OrbitalParameters};

/// Default spacing between samples in radians of eccentric anomaly.
pub const DEFAULT_PATH_STEP: f64 = 0.01;

/// Smallest accepted step, bounds the number of samples.
const MIN_PATH_STEP: f64 = 1e-6;

/// Finite, restartable sequence of body-relative (x, y) points on a closed
/// orbit, sampling E over [0, 2π).
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitPath {
    /// Periapsis direction scaled by a
    p: DVec3,
    /// Perifocal y direction scaled by b
    q: DVec3,
    eccentricity: f64,
    semi_major_axis: f64,
    step: f64,
    len: usize,
}

impl OrbitPath {
    /// Number of points the path yields.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Spacing between samples in radians.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Semi-major axis of the sampled orbit in meters.
    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    /// Point at the given eccentric anomaly (body-relative, projected on x/y).
    pub fn point_at(&self, eccentric_anomaly: f64) -> DVec2 {
        let (sin_e, cos_e) = eccentric_anomaly.sin_cos();
        ((cos_e - self.eccentricity) * self.p + sin_e * self.q).truncate()
    }

    pub fn iter(&self) -> OrbitPathIter<'_> {
        OrbitPathIter {
            path: self,
            front: 0,
            back: self.len,
        }
    }
}

impl<'a> IntoIterator for &'a OrbitPath {
    type Item = DVec2;
    type IntoIter = OrbitPathIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over an [`OrbitPath`].
#[derive(Clone, Debug)]
pub struct OrbitPathIter<'a> {
    path: &'a OrbitPath,
    front: usize,
    back: usize,
}

impl Iterator for OrbitPathIter<'_> {
    type Item = DVec2;

    fn next(&mut self) -> Option<DVec2> {
        if self.front >= self.back {
            return None;
        }
        let point = self.path.point_at(self.front as f64 * self.path.step);
        self.front += 1;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for OrbitPathIter<'_> {
    fn next_back(&mut self) -> Option<DVec2> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.path.point_at(self.back as f64 * self.path.step))
    }
}

impl ExactSizeIterator for OrbitPathIter<'_> {}

impl OrbitalParameters {
    /// Sample the orbit outline every `step` radians of eccentric anomaly.
    ///
    /// # Errors
    /// [`OrbitError::DegenerateInput`] for a non-finite or too small step,
    /// [`OrbitError::HyperbolicOrbit`] for open orbits.
    pub fn orbit_path(&self, step: f64) -> Result<OrbitPath, OrbitError> {
        if !step.is_finite() || step < MIN_PATH_STEP {
            return Err(OrbitError::DegenerateInput(
                "path step must be finite and positive",
            ));
        }
        self.ensure_closed()?;

        let a = self.semi_major_axis();
        let e = self.eccentricity();
        let (p, q) = self.perifocal_basis();

        Ok(OrbitPath {
            p: a * p,
            q: a * (1.0 - e * e).sqrt() * q,
            eccentricity: e,
            semi_major_axis: a,
            step,
            len: (TAU / step).ceil() as usize,
        })
    }
}

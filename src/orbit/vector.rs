//! Vector algebra for the orbital core.
//!
//! The crate uses glam's `DVec3` (re-exported by Bevy) as its vector type; it
//! already provides the arithmetic, dot and cross products, length and index
//! access. The one operation it leaves open is a normalisation that refuses
//! zero-length input instead of producing NaN.

use bevy::math::DVec3;

use super::OrbitError;

/// Three-component f64 vector.
pub type Vector = DVec3;

/// Fallible normalisation.
pub trait VectorExt: Sized {
    /// Unit vector in the same direction.
    ///
    /// Fails with [`OrbitError::DegenerateInput`] for zero-length or
    /// non-finite input.
    fn unit(self) -> Result<Self, OrbitError>;
}

impl VectorExt for DVec3 {
    #[inline]
    fn unit(self) -> Result<Self, OrbitError> {
        self.try_normalize()
            .ok_or(OrbitError::DegenerateInput("cannot normalize a zero-length vector"))
    }
}

//! Reentry - capsule orbit and atmospheric reentry simulator
//!
//! Orbital elements and Kepler propagation for coasting ("on rails")
//! bodies, a gravity/drag/thrust force model for powered flight and
//! reentry, and Bevy plugins that step both each frame.

pub mod capsule;
pub mod display;
pub mod orbit;
pub mod physics;
pub mod simulation;
pub mod time;
pub mod types;

#[cfg(test)]
pub mod test_utils;

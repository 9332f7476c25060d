//! On-rails / physics mode state machine.

use std::fmt;

/// How an orbiting body is advanced each tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimulationMode {
    /// Analytic Kepler propagation from the current elements.
    OnRails { time_scale: f64 },
    /// Numerical integration of gravity, drag and thrust.
    Physics { time_scale: f64 },
}

impl Default for SimulationMode {
    fn default() -> Self {
        SimulationMode::OnRails { time_scale: 1.0 }
    }
}

impl SimulationMode {
    /// Simulated seconds per real second.
    pub fn time_scale(&self) -> f64 {
        match *self {
            SimulationMode::OnRails { time_scale } | SimulationMode::Physics { time_scale } => {
                time_scale
            }
        }
    }

    pub fn is_on_rails(&self) -> bool {
        matches!(self, SimulationMode::OnRails { .. })
    }

    pub fn is_physics(&self) -> bool {
        matches!(self, SimulationMode::Physics { .. })
    }

    /// Same kind of mode with a different time scale.
    pub fn with_time_scale(self, time_scale: f64) -> Self {
        match self {
            SimulationMode::OnRails { .. } => SimulationMode::OnRails { time_scale },
            SimulationMode::Physics { .. } => SimulationMode::Physics { time_scale },
        }
    }

    /// Time scales must be finite and non-negative; zero freezes the body.
    pub fn has_valid_time_scale(&self) -> bool {
        let scale = self.time_scale();
        scale.is_finite() && scale >= 0.0
    }
}

impl fmt::Display for SimulationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationMode::OnRails { time_scale } => write!(f, "on rails ({time_scale}x)"),
            SimulationMode::Physics { time_scale } => write!(f, "physics ({time_scale}x)"),
        }
    }
}

/// What a mode change does to the body's elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionEffect {
    /// Physics → on rails: elements re-derived from the current state and
    /// local time reset, so propagation continues from where the body is.
    Reseed,
    /// On rails → physics: the current state seeds the integrator; elements
    /// are refreshed for display only.
    Release,
    /// Same kind of mode: only the time scale changes.
    Retime,
}

/// Transition between two modes.
pub fn transition_effect(from: SimulationMode, to: SimulationMode) -> TransitionEffect {
    match (from, to) {
        (SimulationMode::Physics { .. }, SimulationMode::OnRails { .. }) => TransitionEffect::Reseed,
        (SimulationMode::OnRails { .. }, SimulationMode::Physics { .. }) => TransitionEffect::Release,
        _ => TransitionEffect::Retime,
    }
}

/// A completed mode change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeTransition {
    pub from: SimulationMode,
    pub to: SimulationMode,
    pub effect: TransitionEffect,
}

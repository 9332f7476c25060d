//! Simulation clock.
//!
//! Tracks wall-clock seconds simulated while unpaused. Per-body time warp
//! lives on each body's [`SimulationMode`](crate::simulation::SimulationMode).

use bevy::prelude::*;

use crate::types::{SimulationSet, SimulationTime};

/// Plugin providing the simulation clock.
pub struct TimePlugin;

impl Plugin for TimePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationTime>()
            .add_systems(Update, advance_time.in_set(SimulationSet::Clock));
    }
}

/// Advance simulation time unless paused.
fn advance_time(mut sim_time: ResMut<SimulationTime>, time: Res<Time>) {
    if sim_time.paused {
        return;
    }
    sim_time.current += time.delta_secs_f64();
}

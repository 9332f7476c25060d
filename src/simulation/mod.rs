//! Per-tick stepping of orbiting bodies.
//!
//! Each tick, pending [`SetSimulationMode`] commands are applied, then every
//! [`OrbitingBody`] is advanced on rails or under physics. Failures are
//! handled here rather than propagated:
//! - an on-rails body whose propagation fails is demoted to physics
//! - a physics body whose integration fails is despawned and reported
//!   through [`EntityLost`]

mod body;
mod mode;

use bevy::prelude::*;

pub use body::{OrbitingBody, TickContext, TickReport};
pub use mode::{ModeTransition, SimulationMode, TransitionEffect, transition_effect};

use crate::capsule::CapsuleConfig;
use crate::orbit::OrbitError;
use crate::physics::{Environment, PhysicsConfig, PhysicsIntegrator, Thruster};
use crate::types::{ReferenceBody, SimulationSet, SimulationTime};

/// Mode a body falls back to when on-rails propagation fails.
pub const FALLBACK_MODE: SimulationMode = SimulationMode::Physics { time_scale: 1.0 };

/// Plugin stepping every [`OrbitingBody`] in [`SimulationSet::Step`].
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CapsuleConfig>()
            .init_resource::<SimulationTime>()
            .add_message::<SetSimulationMode>()
            .add_message::<ModeChanged>()
            .add_message::<EntityLost>()
            .add_message::<Touchdown>()
            .configure_sets(
                Update,
                (
                    SimulationSet::Clock,
                    SimulationSet::Step,
                    SimulationSet::Display,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (apply_mode_commands, step_orbiting_bodies)
                    .chain()
                    .in_set(SimulationSet::Step),
            );
    }
}

/// Request a mode change for one body.
#[derive(Message, Clone, Copy, Debug)]
pub struct SetSimulationMode {
    pub entity: Entity,
    pub mode: SimulationMode,
}

/// A body changed mode, by request or by fallback.
#[derive(Message, Clone, Copy, Debug)]
pub struct ModeChanged {
    pub entity: Entity,
    pub transition: ModeTransition,
}

/// A body was removed because its state could no longer be advanced.
#[derive(Message, Clone, Debug)]
pub struct EntityLost {
    pub entity: Entity,
    pub error: OrbitError,
}

/// A body reached the surface of its reference body.
#[derive(Message, Clone, Copy, Debug)]
pub struct Touchdown {
    pub entity: Entity,
    /// Speed at contact (m/s)
    pub speed: f64,
    /// Whether the speed was within the capsule's settling speed
    pub soft: bool,
}

/// Apply queued mode commands. Refused transitions leave the body as it was.
fn apply_mode_commands(
    mut requests: MessageReader<SetSimulationMode>,
    mut bodies: Query<&mut OrbitingBody>,
    references: Query<&ReferenceBody>,
    mut changed: MessageWriter<ModeChanged>,
) {
    for request in requests.read() {
        let Ok(mut body) = bodies.get_mut(request.entity) else {
            warn!("Mode change for {:?} ignored: not an orbiting body", request.entity);
            continue;
        };
        let Ok(reference) = references.get(body.reference()) else {
            warn!("Mode change for {:?} ignored: reference body missing", request.entity);
            continue;
        };

        match body.set_mode(request.mode, reference) {
            Ok(transition) => {
                info!(
                    "{:?}: {} -> {}",
                    request.entity, transition.from, transition.to
                );
                changed.write(ModeChanged {
                    entity: request.entity,
                    transition,
                });
            }
            Err(error) => {
                warn!(
                    "{:?}: refused switch to {}: {}",
                    request.entity, request.mode, error
                );
            }
        }
    }
}

/// Advance every orbiting body by this frame's delta.
fn step_orbiting_bodies(
    mut commands: Commands,
    time: Res<Time>,
    sim_time: Res<SimulationTime>,
    environment: Res<Environment>,
    capsule: Res<CapsuleConfig>,
    physics: Res<PhysicsConfig>,
    integrator: Res<PhysicsIntegrator>,
    mut bodies: Query<(Entity, &mut OrbitingBody, Option<Ref<Thruster>>)>,
    references: Query<&ReferenceBody>,
    mut changed: MessageWriter<ModeChanged>,
    mut lost: MessageWriter<EntityLost>,
    mut touchdowns: MessageWriter<Touchdown>,
) {
    if sim_time.paused {
        return;
    }
    let dt = time.delta_secs_f64();
    if dt <= 0.0 {
        return;
    }

    for (entity, mut body, thruster) in bodies.iter_mut() {
        let Ok(reference) = references.get(body.reference()) else {
            error!("{entity:?}: reference body missing, removing");
            commands.entity(entity).despawn();
            lost.write(EntityLost {
                entity,
                error: OrbitError::DegenerateInput("reference body missing"),
            });
            continue;
        };

        let ctx = TickContext {
            reference,
            environment: &environment,
            capsule: &capsule,
            physics: &physics,
            integrator: integrator.0.as_ref(),
            thruster: thruster.as_deref().copied().unwrap_or_default(),
        };
        if thruster.is_some_and(|t| t.is_changed() && t.enabled) && body.status.has_fuel() {
            info!(
                "{entity:?}: engine on ({:?}), {:.2} s of burn left",
                ctx.thruster.direction, body.status.remaining_burn_time
            );
        }

        match body.advance(dt, &ctx) {
            Ok(report) => {
                if report.burn_ended {
                    info!("{entity:?}: burn complete, engine dry");
                }
                if report.shield_depleted {
                    warn!("{entity:?}: heat shield depleted");
                }
                if let Some(speed) = report.touchdown {
                    let soft = capsule.is_soft_touchdown(speed);
                    info!(
                        "{entity:?}: touchdown at {speed:.1} m/s ({})",
                        if soft { "soft" } else { "hard" }
                    );
                    touchdowns.write(Touchdown {
                        entity,
                        speed,
                        soft,
                    });
                }
            }
            Err(error) if body.mode().is_on_rails() => {
                warn!("{entity:?}: on-rails propagation failed ({error}), switching to physics");
                match body.set_mode(FALLBACK_MODE, reference) {
                    Ok(transition) => {
                        changed.write(ModeChanged { entity, transition });
                    }
                    Err(error) => {
                        error!("{entity:?}: fallback to physics failed: {error}");
                    }
                }
            }
            Err(error) => {
                error!("{entity:?}: integration failed ({error}), removing");
                commands.entity(entity).despawn();
                lost.write(EntityLost { entity, error });
            }
        }
    }
}

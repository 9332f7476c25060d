//! Reentry - headless deorbit scenario
//!
//! Flies a capsule from a 411 km parking orbit down to the surface: coast
//! on rails, burn retrograde under physics, coast to the atmosphere, then
//! integrate the entry with decreasing time warp near the ground.

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::math::DVec3;
use bevy::prelude::*;

use reentry::capsule::CapsuleConfig;
use reentry::display::DisplayPlugin;
use reentry::physics::{PhysicsPlugin, ThrustDirection, Thruster};
use reentry::simulation::{
    EntityLost, OrbitingBody, SetSimulationMode, SimulationMode, SimulationPlugin, Touchdown,
};
use reentry::time::TimePlugin;
use reentry::types::{CartesianState, ReferenceBody, SimulationSet, SimulationTime};

/// Starting orbit: altitude (m) and horizontal speed (m/s)
const PARKING_ALTITUDE: f64 = 411_000.0;
const PARKING_SPEED: f64 = 7666.0;

/// Real seconds spent coasting before the deorbit burn
const COAST_SECONDS: f64 = 3.0;
/// Periapsis altitude the deorbit burn aims for
const TARGET_PERIAPSIS: f64 = 40_000.0;
/// Altitude above the atmosphere where the descent leaves the rails
const ENTRY_MARGIN: f64 = 20_000.0;
/// Altitude below which the simulation runs in real time
const FINAL_APPROACH: f64 = 1_000.0;

const COAST_WARP: f64 = 1000.0;
const DESCENT_WARP: f64 = 100.0;
const ENTRY_WARP: f64 = 10.0;

fn main() {
    App::new()
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(
            Duration::from_secs_f64(1.0 / 60.0),
        )))
        .add_plugins(LogPlugin::default())
        .add_plugins((TimePlugin, PhysicsPlugin, SimulationPlugin, DisplayPlugin))
        .add_systems(Startup, spawn_scenario)
        .add_systems(
            Update,
            (fly_mission, report_telemetry)
                .run_if(resource_exists::<Mission>)
                .after(SimulationSet::Step)
                .before(SimulationSet::Display),
        )
        .run();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Coast,
    DeorbitBurn,
    Descent,
    Entry,
    Done,
}

#[derive(Resource, Debug)]
struct Mission {
    capsule: Entity,
    planet: Entity,
    phase: Phase,
}

fn spawn_scenario(mut commands: Commands, capsule: Res<CapsuleConfig>) {
    let planet = ReferenceBody::default();
    let start = CartesianState::new(
        planet.position + DVec3::X * (planet.radius + PARKING_ALTITUDE),
        DVec3::Y * PARKING_SPEED,
    );
    let planet_entity = commands.spawn(planet.clone()).id();

    let body = match OrbitingBody::new(
        start,
        SimulationMode::OnRails {
            time_scale: COAST_WARP,
        },
        planet_entity,
        &planet,
        &capsule,
    ) {
        Ok(body) => body,
        Err(error) => {
            error!("Could not place capsule in parking orbit: {error}");
            commands.write_message(AppExit::error());
            return;
        }
    };
    if let Some(elements) = body.elements() {
        info!(
            "Parking orbit: a = {:.0} km, e = {:.4}, period {:.0} s",
            elements.semi_major_axis() / 1000.0,
            elements.eccentricity(),
            elements.orbital_period()
        );
    }

    let capsule_entity = commands.spawn((body, Thruster::default())).id();
    commands.insert_resource(Mission {
        capsule: capsule_entity,
        planet: planet_entity,
        phase: Phase::Coast,
    });
}

fn fly_mission(
    mut mission: ResMut<Mission>,
    sim_time: Res<SimulationTime>,
    capsule: Res<CapsuleConfig>,
    mut bodies: Query<(&OrbitingBody, &mut Thruster)>,
    references: Query<&ReferenceBody>,
    mut modes: MessageWriter<SetSimulationMode>,
    mut touchdowns: MessageReader<Touchdown>,
    mut lost: MessageReader<EntityLost>,
    mut exit: MessageWriter<AppExit>,
) {
    if mission.phase == Phase::Done {
        return;
    }
    let entity = mission.capsule;

    if let Some(event) = lost.read().find(|event| event.entity == entity) {
        error!("Capsule lost: {}", event.error);
        mission.phase = Phase::Done;
        exit.write(AppExit::error());
        return;
    }
    if let Some(event) = touchdowns.read().find(|event| event.entity == entity) {
        if event.soft {
            info!("Landed at {:.1} m/s after {:.0} s", event.speed, sim_time.current);
        } else {
            warn!("Hit the ground at {:.1} m/s", event.speed);
        }
        mission.phase = Phase::Done;
        exit.write(AppExit::Success);
        return;
    }

    let (Ok((body, mut thruster)), Ok(planet)) =
        (bodies.get_mut(entity), references.get(mission.planet))
    else {
        return;
    };

    if body.status.is_overheated(&capsule) {
        error!("Capsule burned up (heat {:.0})", body.status.heat);
        mission.phase = Phase::Done;
        exit.write(AppExit::error());
        return;
    }
    if capsule.is_crushing(body.status.peak_acceleration) {
        error!(
            "Crew crushed at {:.1} m/s²",
            body.status.peak_acceleration
        );
        mission.phase = Phase::Done;
        exit.write(AppExit::error());
        return;
    }

    let altitude = body.altitude(planet);
    match mission.phase {
        Phase::Coast if sim_time.current >= COAST_SECONDS => {
            info!("Starting deorbit burn at {:.0} km", altitude / 1000.0);
            modes.write(SetSimulationMode {
                entity,
                mode: SimulationMode::Physics { time_scale: 1.0 },
            });
            *thruster = Thruster::firing(ThrustDirection::Retrograde);
            mission.phase = Phase::DeorbitBurn;
        }
        Phase::DeorbitBurn if body.mode().is_physics() => {
            let periapsis = body.periapsis_altitude(planet).unwrap_or(f64::INFINITY);
            if periapsis <= TARGET_PERIAPSIS || !body.status.has_fuel() {
                thruster.enabled = false;
                info!(
                    "Burn cut off: periapsis {:.1} km, {:.2} s of fuel left",
                    periapsis / 1000.0,
                    body.status.remaining_burn_time
                );
                modes.write(SetSimulationMode {
                    entity,
                    mode: SimulationMode::OnRails {
                        time_scale: DESCENT_WARP,
                    },
                });
                mission.phase = Phase::Descent;
            }
        }
        Phase::Descent if altitude < planet.atmosphere_height + ENTRY_MARGIN => {
            info!("Entry interface at {:.0} km", altitude / 1000.0);
            modes.write(SetSimulationMode {
                entity,
                mode: SimulationMode::Physics {
                    time_scale: ENTRY_WARP,
                },
            });
            mission.phase = Phase::Entry;
        }
        Phase::Entry if altitude < FINAL_APPROACH && body.mode().time_scale() > 1.0 => {
            modes.write(SetSimulationMode {
                entity,
                mode: SimulationMode::Physics { time_scale: 1.0 },
            });
        }
        _ => {}
    }
}

fn report_telemetry(
    mission: Res<Mission>,
    sim_time: Res<SimulationTime>,
    capsule: Res<CapsuleConfig>,
    bodies: Query<&OrbitingBody>,
    references: Query<&ReferenceBody>,
    mut last_report: Local<f64>,
) {
    if sim_time.current - *last_report < 2.0 {
        return;
    }
    *last_report = sim_time.current;

    let (Ok(body), Ok(planet)) = (bodies.get(mission.capsule), references.get(mission.planet))
    else {
        return;
    };
    info!(
        "[{:?}] {} | alt {:.1} km | v {:.0} m/s | heat {:.0} | shield {:.0}% | fuel {:.0}%",
        mission.phase,
        body.mode(),
        body.altitude(planet) / 1000.0,
        body.state().speed(),
        body.status.heat,
        body.status.heat_shield_fraction(&capsule) * 100.0,
        body.status.fuel_fraction(&capsule) * 100.0,
    );
}

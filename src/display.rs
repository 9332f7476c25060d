//! Display caches for orbiting bodies.
//!
//! Sampling an ellipse every frame is wasted work when the elements have not
//! changed, so each body carries an [`OrbitDisplay`] rebuilt only when its
//! elements revision moves (or the settings change). Points are world-frame
//! and projected onto the orbital plane's x/y for a top-down view.

use bevy::math::DVec2;
use bevy::prelude::*;

use crate::orbit::{DEFAULT_PATH_STEP, OrbitalParameters};
use crate::simulation::OrbitingBody;
use crate::types::{ReferenceBody, SimulationSet};

/// Plugin maintaining [`OrbitDisplay`] caches in [`SimulationSet::Display`].
pub struct DisplayPlugin;

impl Plugin for DisplayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitDisplaySettings>().add_systems(
            Update,
            (attach_orbit_display, refresh_orbit_display)
                .chain()
                .in_set(SimulationSet::Display),
        );
    }
}

/// Settings for orbit path sampling.
#[derive(Resource, Clone, Debug)]
pub struct OrbitDisplaySettings {
    /// Whether orbit paths are shown at all.
    pub visible: bool,
    /// Eccentric anomaly step between path points (radians).
    pub path_step: f64,
}

impl Default for OrbitDisplaySettings {
    fn default() -> Self {
        Self {
            visible: true,
            path_step: DEFAULT_PATH_STEP,
        }
    }
}

/// Cached orbit path and apsis markers of one body.
#[derive(Component, Clone, Debug, Default)]
pub struct OrbitDisplay {
    /// Elements revision the cache was built from.
    pub revision: Option<u64>,
    /// Closed polyline of the orbit, world frame.
    pub path: Vec<DVec2>,
    pub apoapsis: Option<DVec2>,
    pub periapsis: Option<DVec2>,
    /// False while there is nothing sensible to draw (open orbit, landed,
    /// degenerate state or display switched off).
    pub visible: bool,
}

impl OrbitDisplay {
    /// Rebuild from `elements`, or hide when there are none.
    pub fn rebuild(
        &mut self,
        elements: Option<&OrbitalParameters>,
        reference: &ReferenceBody,
        settings: &OrbitDisplaySettings,
    ) {
        self.path.clear();
        self.apoapsis = None;
        self.periapsis = None;
        self.visible = false;

        let Some(elements) = elements.filter(|_| settings.visible) else {
            return;
        };
        let Ok(path) = elements.orbit_path(settings.path_step) else {
            return;
        };

        let origin = reference.position.truncate();
        self.path.extend(path.iter().map(|point| point + origin));
        self.apoapsis = elements
            .apoapsis_state()
            .ok()
            .map(|state| state.position.truncate() + origin);
        self.periapsis = elements
            .periapsis_state()
            .ok()
            .map(|state| state.position.truncate() + origin);
        self.visible = true;
    }
}

/// Give every new orbiting body an empty display cache.
fn attach_orbit_display(
    mut commands: Commands,
    bodies: Query<Entity, (With<OrbitingBody>, Without<OrbitDisplay>)>,
) {
    for entity in bodies.iter() {
        commands.entity(entity).insert(OrbitDisplay::default());
    }
}

/// Rebuild stale caches.
fn refresh_orbit_display(
    settings: Res<OrbitDisplaySettings>,
    mut bodies: Query<(&OrbitingBody, &mut OrbitDisplay)>,
    references: Query<&ReferenceBody>,
) {
    for (body, mut display) in bodies.iter_mut() {
        let revision = body.elements_revision();
        if display.revision == Some(revision) && !settings.is_changed() {
            continue;
        }
        let Ok(reference) = references.get(body.reference()) else {
            continue;
        };
        display.rebuild(body.elements(), reference, &settings);
        display.revision = Some(revision);
    }
}

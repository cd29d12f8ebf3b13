use orrery_types::InstanceSink;

use crate::{BodyKind, CelestialBody, SimParams, Simulation};

/// Index of the sun in a populated scene.
pub const SUN_INDEX: usize = 0;
/// Index of the planet in a populated scene.
pub const PLANET_INDEX: usize = 1;

/// Owns the tunable parameters and the simulation built from them.
///
/// The GUI edits [`Scene::params`] in place; the frame loop calls
/// [`Scene::update`] once per frame and [`Scene::reset`] when the GUI asks for
/// a rebuild.
#[derive(Debug, Clone)]
pub struct Scene {
    pub params: SimParams,
    simulation: Simulation,
}

impl Scene {
    /// Creates a scene with no bodies. Call [`Scene::reset`] to populate it.
    pub fn new(params: SimParams) -> Self {
        Self {
            simulation: Simulation::new(params.gravitational_constant),
            params,
        }
    }

    /// Rebuilds every body from the current parameters, resizes the instance
    /// storage to the new asteroid count and uploads the initial transforms.
    pub fn reset(&mut self, sink: &mut dyn InstanceSink) {
        profiling::scope!("Scene::reset");

        self.simulation.populate(&self.params);

        sink.reallocate(self.simulation.asteroid_count());
        self.simulation.upload_instances(sink);

        log::info!(
            "simulation reset: {} asteroids, seed {:#x}",
            self.simulation.asteroid_count(),
            self.params.seed
        );
    }

    /// Pushes the live-editable parameters (gravity, sun mass and size) into
    /// the running simulation.
    pub fn apply_live_params(&mut self) {
        self.simulation
            .set_gravitational_constant(self.params.gravitational_constant);
        if let Some(sun) = self.simulation.body_mut(SUN_INDEX) {
            if sun.kind() == BodyKind::Sun {
                sun.set_mass(self.params.sun_mass);
                sun.set_radius_scale(self.params.sun_radius_scale);
            }
        }
    }

    /// Advances the scene by one frame of `frame_time` wall-clock seconds.
    ///
    /// Returns whether anything moved.
    pub fn update(&mut self, frame_time: f32, sink: &mut dyn InstanceSink) -> bool {
        self.apply_live_params();
        let dt = self.params.effective_dt(frame_time);
        self.simulation.step(dt, sink)
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn sun(&self) -> Option<&CelestialBody> {
        self.simulation.find(BodyKind::Sun)
    }

    pub fn planet(&self) -> Option<&CelestialBody> {
        self.simulation.find(BodyKind::Planet)
    }

    /// Number of asteroids currently simulated.
    pub fn asteroid_count(&self) -> usize {
        self.simulation.asteroid_count()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SimParams::default())
    }
}

use std::f32::consts::TAU;

use glam::{Mat3, Mat4, Quat, Vec3};
use orrery_types::{normal_matrix, InstanceSink};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{circular_orbit_speed, BodyKind, CelestialBody, SimParams};

/// Squared softening length. Pair distances are clamped to at least this so
/// coincident bodies produce a bounded force.
pub const SOFTENING_SQUARED: f32 = 1e-4;

/// Fraction of the orbit speed used as in-plane velocity jitter on asteroids.
const PLANAR_JITTER: f32 = 0.1;
/// Fraction of the orbit speed used as vertical velocity jitter on asteroids.
const VERTICAL_JITTER: f32 = 0.01;

/// Gravitational pull on `body` from `other`.
///
/// `|F| = g * m_body * m_other / max(r², SOFTENING_SQUARED)` along the
/// direction from `body` to `other`. Bodies sharing a position exert no force
/// on each other.
pub fn gravitational_force(gravitational_constant: f32, body: &CelestialBody, other: &CelestialBody) -> Vec3 {
    let offset = other.position() - body.position();
    let distance_squared = offset.length_squared().max(SOFTENING_SQUARED);
    let magnitude = gravitational_constant * body.mass() * other.mass() / distance_squared;
    offset.normalize_or_zero() * magnitude
}

/// The body set plus the pairwise gravity integrator.
///
/// Asteroids are attracted by every other body but ignore each other; all
/// other bodies feel everything. That keeps a step at O(N·K) for N asteroids
/// and K non-asteroids.
#[derive(Debug, Clone)]
pub struct Simulation {
    gravitational_constant: f32,
    bodies: Vec<CelestialBody>,
    /// Indices of every non-asteroid body.
    attractors: Vec<usize>,

    instance_models: Vec<Mat4>,
    instance_normals: Vec<Mat3>,
}

impl Simulation {
    pub fn new(gravitational_constant: f32) -> Self {
        Self {
            gravitational_constant,
            bodies: Vec::new(),
            attractors: Vec::new(),
            instance_models: Vec::new(),
            instance_normals: Vec::new(),
        }
    }

    /// Replaces every body with a freshly generated solar system.
    ///
    /// Body 0 is the sun at rest at the origin, body 1 the planet on a circular
    /// orbit, followed by `params.asteroid_count` asteroids in insertion order.
    pub fn populate(&mut self, params: &SimParams) {
        profiling::scope!("Simulation::populate");

        self.gravitational_constant = params.gravitational_constant;
        self.clear();

        let g = params.gravitational_constant;

        self.push(CelestialBody::new(
            BodyKind::Sun,
            Vec3::ZERO,
            Vec3::ZERO,
            params.sun_mass,
            params.sun_radius_scale,
        ));

        let radius = params.planet_orbit_radius;
        let (sin, cos) = params.planet_initial_angle.sin_cos();
        let speed = circular_orbit_speed(g, params.sun_mass, radius);
        self.push(CelestialBody::new(
            BodyKind::Planet,
            Vec3::new(radius * cos, 0.0, radius * sin),
            Vec3::new(-speed * sin, 0.0, speed * cos),
            params.planet_mass,
            params.planet_radius_scale,
        ));

        let mut rng = StdRng::seed_from_u64(params.seed);
        self.bodies.reserve(params.asteroid_count as usize);
        for _ in 0..params.asteroid_count {
            let asteroid = spawn_asteroid(&mut rng, params);
            self.push(asteroid);
        }

        log::debug!(
            "populated simulation with {} bodies ({} asteroids)",
            self.bodies.len(),
            self.asteroid_count()
        );
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
        self.attractors.clear();
        self.instance_models.clear();
        self.instance_normals.clear();
    }

    pub fn push(&mut self, body: CelestialBody) {
        if !body.is_asteroid() {
            self.attractors.push(self.bodies.len());
        }
        self.bodies.push(body);
    }

    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    pub fn body_mut(&mut self, index: usize) -> Option<&mut CelestialBody> {
        self.bodies.get_mut(index)
    }

    pub fn asteroid_count(&self) -> usize {
        self.bodies.len() - self.attractors.len()
    }

    pub fn asteroids(&self) -> impl Iterator<Item = &CelestialBody> + '_ {
        self.bodies.iter().filter(|body| body.is_asteroid())
    }

    /// First body of the given kind.
    pub fn find(&self, kind: BodyKind) -> Option<&CelestialBody> {
        self.bodies.iter().find(|body| body.kind() == kind)
    }

    pub fn gravitational_constant(&self) -> f32 {
        self.gravitational_constant
    }

    pub fn set_gravitational_constant(&mut self, gravitational_constant: f32) {
        self.gravitational_constant = gravitational_constant;
    }

    /// Sum of the forces acting on body `index` this step.
    pub fn net_force(&self, index: usize) -> Vec3 {
        let body = &self.bodies[index];
        let g = self.gravitational_constant;

        if body.is_asteroid() {
            self.attractors
                .iter()
                .map(|&other| gravitational_force(g, body, &self.bodies[other]))
                .sum()
        } else {
            self.bodies
                .iter()
                .enumerate()
                .filter(|&(other, _)| other != index)
                .map(|(_, other)| gravitational_force(g, body, other))
                .sum()
        }
    }

    /// Accumulates the gravitational forces into every non-static body's
    /// acceleration without moving anything.
    pub fn accumulate_forces(&mut self) {
        profiling::scope!("accumulate forces");
        for index in 0..self.bodies.len() {
            if self.bodies[index].is_static() {
                continue;
            }
            let force = self.net_force(index);
            self.bodies[index].apply_force(force);
        }
    }

    /// Advances the system by `dt` simulated seconds and uploads the asteroid
    /// transforms to `sink`.
    ///
    /// Returns false, touching nothing, when `dt` is not positive.
    pub fn step(&mut self, dt: f32, sink: &mut dyn InstanceSink) -> bool {
        profiling::scope!("Simulation::step");
        if dt <= 0.0 || !dt.is_finite() {
            return false;
        }

        self.accumulate_forces();

        self.instance_models.clear();
        self.instance_normals.clear();
        for body in &mut self.bodies {
            body.step(dt);
            if body.is_asteroid() {
                let model = body.model_matrix();
                self.instance_models.push(model);
                self.instance_normals.push(normal_matrix(model));
            }
        }

        sink.upload(&self.instance_models, &self.instance_normals);
        true
    }

    /// Writes the current asteroid transforms to `sink` without stepping.
    pub fn upload_instances(&mut self, sink: &mut dyn InstanceSink) {
        self.instance_models.clear();
        self.instance_normals.clear();
        for body in self.bodies.iter().filter(|body| body.is_asteroid()) {
            let model = body.model_matrix();
            self.instance_models.push(model);
            self.instance_normals.push(normal_matrix(model));
        }
        sink.upload(&self.instance_models, &self.instance_normals);
    }

    /// Asteroid model matrices written by the last step or upload.
    pub fn instance_models(&self) -> &[Mat4] {
        &self.instance_models
    }

    /// Asteroid normal matrices written by the last step or upload.
    pub fn instance_normals(&self) -> &[Mat3] {
        &self.instance_normals
    }
}

fn uniform(rng: &mut StdRng, a: f32, b: f32) -> f32 {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    rng.gen_range(low..=high)
}

fn spawn_asteroid(rng: &mut StdRng, params: &SimParams) -> CelestialBody {
    let radius = uniform(rng, params.belt_inner_radius, params.belt_outer_radius);
    let angle = uniform(rng, 0.0, TAU);
    let half_height = params.belt_height.abs() * 0.5;
    let height = uniform(rng, -half_height, half_height);

    let (sin, cos) = angle.sin_cos();
    let position = Vec3::new(radius * cos, height, radius * sin);

    let speed = circular_orbit_speed(params.gravitational_constant, params.sun_mass, radius);
    let mut velocity = Vec3::new(-speed * sin, 0.0, speed * cos);
    velocity.x += uniform(rng, -PLANAR_JITTER, PLANAR_JITTER) * speed;
    velocity.z += uniform(rng, -PLANAR_JITTER, PLANAR_JITTER) * speed;
    velocity.y += uniform(rng, -VERTICAL_JITTER, VERTICAL_JITTER) * speed;

    let mass = params.asteroid_average_mass * uniform(rng, 0.5, 1.5);
    let scale = uniform(rng, params.asteroid_min_scale, params.asteroid_max_scale);

    let axis = Vec3::new(uniform(rng, -1.0, 1.0), uniform(rng, -1.0, 1.0), uniform(rng, -1.0, 1.0))
        .try_normalize()
        .unwrap_or(Vec3::Y);
    let rotation = uniform(rng, 0.0, TAU);

    CelestialBody::new(BodyKind::Asteroid, position, velocity, mass, scale)
        .with_orientation(Quat::from_axis_angle(axis, rotation))
}

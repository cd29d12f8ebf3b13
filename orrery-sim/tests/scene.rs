use glam::{Mat4, Vec3};
use orrery_sim::{circular_orbit_speed, BodyKind, Scene, SimParams, PLANET_INDEX, SUN_INDEX};
use orrery_types::normal_matrix;

mod common;
use common::RecordingSink;

fn small_params() -> SimParams {
    SimParams {
        asteroid_count: 200,
        planet_initial_angle: 0.7,
        ..SimParams::default()
    }
}

#[test]
fn bodies_are_built_in_order() {
    let params = small_params();
    let mut scene = Scene::new(params.clone());
    scene.reset(&mut RecordingSink::default());

    let bodies = scene.simulation().bodies();
    assert_eq!(bodies.len(), 2 + params.asteroid_count as usize);

    let sun = &bodies[SUN_INDEX];
    assert_eq!(sun.kind(), BodyKind::Sun);
    assert!(!sun.is_static());
    assert_eq!(sun.position(), Vec3::ZERO);
    assert_eq!(sun.velocity(), Vec3::ZERO);
    assert_eq!(sun.mass(), params.sun_mass);

    let planet = &bodies[PLANET_INDEX];
    assert_eq!(planet.kind(), BodyKind::Planet);
    let radius = params.planet_orbit_radius;
    let angle = params.planet_initial_angle;
    let expected_position = Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin());
    assert!(planet.position().abs_diff_eq(expected_position, 1e-4));
    assert!(planet.velocity().dot(planet.position()).abs() < 1e-2);
    let speed = circular_orbit_speed(params.gravitational_constant, params.sun_mass, radius);
    assert!((planet.velocity().length() - speed).abs() < 1e-3 * speed);

    for asteroid in &bodies[2..] {
        assert_eq!(asteroid.kind(), BodyKind::Asteroid);

        let position = asteroid.position();
        let planar = Vec3::new(position.x, 0.0, position.z).length();
        assert!(planar >= params.belt_inner_radius - 1e-3 && planar <= params.belt_outer_radius + 1e-3);
        assert!(position.y.abs() <= params.belt_height / 2.0 + 1e-4);

        let mass = asteroid.mass();
        assert!(mass >= params.asteroid_average_mass * 0.5 - 1e-6);
        assert!(mass <= params.asteroid_average_mass * 1.5 + 1e-6);

        let scale = asteroid.radius_scale();
        assert!(scale >= params.asteroid_min_scale && scale <= params.asteroid_max_scale);

        let orbit = circular_orbit_speed(params.gravitational_constant, params.sun_mass, planar);
        let vertical = asteroid.velocity().y.abs();
        assert!(vertical <= 0.01 * orbit + 1e-4);
        assert!((asteroid.orientation().length() - 1.0).abs() < 1e-5);
    }
}

#[test]
fn reset_is_idempotent_for_a_fixed_seed() {
    let mut scene = Scene::new(small_params());

    let mut first = RecordingSink::default();
    scene.reset(&mut first);
    let first_bodies = scene.simulation().bodies().to_vec();

    let mut second = RecordingSink::default();
    scene.reset(&mut second);

    assert_eq!(scene.simulation().bodies(), &first_bodies[..]);
    assert_eq!(first.model_bytes(), second.model_bytes());
    assert_eq!(first.normal_bytes(), second.normal_bytes());
}

#[test]
fn different_seeds_produce_different_belts() {
    let mut scene = Scene::new(small_params());
    let mut sink = RecordingSink::default();
    scene.reset(&mut sink);
    let before = sink.model_bytes().to_vec();

    scene.params.seed = scene.params.seed.wrapping_add(1);
    scene.reset(&mut sink);
    assert_ne!(before, sink.model_bytes());
}

#[test]
fn instance_buffers_mirror_asteroids_after_step() {
    let mut scene = Scene::new(small_params());
    let mut sink = RecordingSink::default();
    scene.reset(&mut sink);
    assert_eq!(sink.capacity(), 200);

    for _ in 0..5 {
        assert!(scene.update(1.0 / 60.0, &mut sink));
    }

    let models: Vec<Mat4> = scene.simulation().asteroids().map(|body| body.model_matrix()).collect();
    assert_eq!(models.len(), 200);
    assert_eq!(sink.last_upload_len, 200);
    assert_eq!(sink.model_bytes(), bytemuck::cast_slice::<Mat4, u8>(&models));

    for (model, normal) in models.iter().zip(&sink.normals) {
        assert!(normal.abs_diff_eq(normal_matrix(*model), 1e-4));
    }
}

#[test]
fn reset_reallocates_for_new_count() {
    let mut scene = Scene::new(small_params());
    let mut sink = RecordingSink::default();
    scene.reset(&mut sink);

    scene.params.asteroid_count = 50;
    scene.reset(&mut sink);
    assert_eq!(sink.reallocations, 2);
    assert_eq!(sink.capacity(), 50);
    assert_eq!(scene.asteroid_count(), 50);

    scene.update(0.01, &mut sink);
    assert_eq!(sink.last_upload_len, 50);
}

#[test]
fn empty_belt() {
    let mut scene = Scene::new(SimParams {
        asteroid_count: 0,
        ..SimParams::default()
    });
    let mut sink = RecordingSink::default();
    scene.reset(&mut sink);
    assert_eq!(scene.simulation().bodies().len(), 2);
    assert!(scene.update(0.01, &mut sink));
    assert_eq!(sink.last_upload_len, 0);
}

#[test]
fn paused_scene_does_not_move_or_upload() {
    let mut scene = Scene::new(small_params());
    let mut sink = RecordingSink::default();
    scene.reset(&mut sink);
    let uploads = sink.uploads;
    let before = scene.simulation().bodies().to_vec();

    scene.params.paused = true;
    assert!(!scene.update(0.5, &mut sink));
    scene.params.paused = false;
    scene.params.simulation_speed = 0.0;
    assert!(!scene.update(0.5, &mut sink));

    assert_eq!(sink.uploads, uploads);
    assert_eq!(scene.simulation().bodies(), &before[..]);
}

#[test]
fn sun_edits_apply_without_reset() {
    let mut scene = Scene::new(small_params());
    let mut sink = RecordingSink::default();
    scene.reset(&mut sink);

    scene.params.sun_mass = 50000.0;
    scene.params.sun_radius_scale = 30.0;
    scene.params.paused = true;
    scene.update(0.1, &mut sink);

    let sun = scene.sun().expect("populated scene has a sun");
    assert_eq!(sun.mass(), 50000.0);
    assert_eq!(sun.radius_scale(), 30.0);
    assert!((sun.model_matrix().x_axis.length() - 30.0).abs() < 1e-3);
    assert_eq!(sink.reallocations, 1);
}

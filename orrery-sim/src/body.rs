use glam::{Mat4, Quat, Vec3};
use orrery_types::model_matrix;

/// What a body is, and therefore which pipeline draws it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Sun,
    Planet,
    Asteroid,
}

/// A point mass with a visual representation.
///
/// The cached model matrix is kept equal to
/// `translate(position) * rotate(orientation) * scale(radius_scale)` by every
/// mutator. Static bodies never move: their velocity and acceleration stay
/// zero.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    kind: BodyKind,
    is_static: bool,

    position: Vec3,
    velocity: Vec3,
    acceleration: Vec3,

    mass: f32,
    radius_scale: f32,
    orientation: Quat,

    model_matrix: Mat4,
}

impl CelestialBody {
    pub fn new(kind: BodyKind, position: Vec3, velocity: Vec3, mass: f32, radius_scale: f32) -> Self {
        let mut body = Self {
            kind,
            is_static: false,
            position,
            velocity,
            acceleration: Vec3::ZERO,
            mass,
            radius_scale,
            orientation: Quat::IDENTITY,
            model_matrix: Mat4::IDENTITY,
        };
        body.update_model_matrix();
        body
    }

    /// Sets the orientation. The quaternion is renormalized.
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation.normalize();
        self.update_model_matrix();
        self
    }

    /// Pins the body in place, zeroing its velocity.
    pub fn into_static(mut self) -> Self {
        self.is_static = true;
        self.velocity = Vec3::ZERO;
        self.acceleration = Vec3::ZERO;
        self
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    pub fn is_asteroid(&self) -> bool {
        self.kind == BodyKind::Asteroid
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Acceleration accumulated since the last step.
    pub fn acceleration(&self) -> Vec3 {
        self.acceleration
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
    }

    pub fn radius_scale(&self) -> f32 {
        self.radius_scale
    }

    pub fn set_radius_scale(&mut self, radius_scale: f32) {
        self.radius_scale = radius_scale;
        self.update_model_matrix();
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.model_matrix
    }

    /// Accumulates `force / mass` into the acceleration. No-op on static or
    /// massless bodies.
    pub fn apply_force(&mut self, force: Vec3) {
        if self.is_static || self.mass == 0.0 {
            return;
        }
        self.acceleration += force / self.mass;
    }

    /// Advances the body by `dt` with semi-implicit Euler: velocity first,
    /// then position using the new velocity. Clears the acceleration.
    pub fn step(&mut self, dt: f32) {
        if !self.is_static {
            self.velocity += self.acceleration * dt;
            self.position += self.velocity * dt;
        }
        self.acceleration = Vec3::ZERO;
        self.update_model_matrix();
    }

    fn update_model_matrix(&mut self) {
        self.model_matrix = model_matrix(self.position, self.orientation, self.radius_scale);
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Quat, Vec3};

    use super::{BodyKind, CelestialBody};

    #[test]
    fn step_is_semi_implicit() {
        let mut body = CelestialBody::new(BodyKind::Planet, Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.5, 0.0, 0.0), 2.0, 1.0);
        body.apply_force(Vec3::new(0.0, 4.0, 0.0));
        assert_eq!(body.acceleration(), Vec3::new(0.0, 2.0, 0.0));

        body.step(0.5);

        // v' = v + a dt, x' = x + v' dt
        assert!(body.velocity().abs_diff_eq(Vec3::new(0.5, 1.0, 0.0), 1e-6));
        assert!(body.position().abs_diff_eq(Vec3::new(1.25, 2.5, 3.0), 1e-6));
        assert_eq!(body.acceleration(), Vec3::ZERO);
    }

    #[test]
    fn static_and_massless_bodies_ignore_forces() {
        let mut pinned = CelestialBody::new(BodyKind::Sun, Vec3::X, Vec3::Y, 5.0, 1.0).into_static();
        assert_eq!(pinned.velocity(), Vec3::ZERO);
        pinned.apply_force(Vec3::splat(100.0));
        pinned.step(1.0);
        assert_eq!(pinned.position(), Vec3::X);
        assert_eq!(pinned.velocity(), Vec3::ZERO);
        assert_eq!(pinned.acceleration(), Vec3::ZERO);

        let mut massless = CelestialBody::new(BodyKind::Asteroid, Vec3::ZERO, Vec3::ZERO, 0.0, 1.0);
        massless.apply_force(Vec3::ONE);
        assert_eq!(massless.acceleration(), Vec3::ZERO);
    }

    #[test]
    fn model_matrix_tracks_state() {
        let rotation = Quat::from_axis_angle(Vec3::Y, 1.0);
        let mut body = CelestialBody::new(BodyKind::Asteroid, Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 1.0, 0.5)
            .with_orientation(rotation);
        body.step(2.0);
        let expected = Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0))
            * Mat4::from_quat(rotation)
            * Mat4::from_scale(Vec3::splat(0.5));
        assert!(body.model_matrix().abs_diff_eq(expected, 1e-6));

        body.set_radius_scale(3.0);
        assert!((body.model_matrix().x_axis.truncate().length() - 3.0).abs() < 1e-5);
    }
}

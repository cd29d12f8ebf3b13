use glam::{Mat4, Vec3};
use orrery_types::direction_from_yaw_pitch;

/// Pitch never reaches straight up or down, keeping the basis well defined.
pub const PITCH_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;
/// Narrowest vertical field of view scrolling can reach.
pub const MIN_ZOOM: f32 = 1.0 * std::f32::consts::PI / 180.0;
/// Widest vertical field of view, also the default.
pub const MAX_ZOOM: f32 = 45.0 * std::f32::consts::PI / 180.0;

pub const DEFAULT_YAW: f32 = -std::f32::consts::FRAC_PI_2;
pub const DEFAULT_SPEED: f32 = 2.5;
/// Radians of rotation per pixel of mouse motion.
pub const DEFAULT_SENSITIVITY: f32 = 0.1 * std::f32::consts::PI / 180.0;

pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 3000.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Free-flying camera driven by yaw and pitch.
///
/// `front`, `right` and `up` are kept orthonormal and recomputed after every
/// change of orientation. All angles are in radians.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,

    yaw: f32,
    pitch: f32,

    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    zoom: f32,
}

impl Camera {
    pub fn new(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: world_up.try_normalize().unwrap_or(Vec3::Y),
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            movement_speed: DEFAULT_SPEED,
            mouse_sensitivity: DEFAULT_SENSITIVITY,
            zoom: MAX_ZOOM,
        };
        camera.update_vectors();
        camera
    }

    /// Camera at `position` looking down -Z.
    pub fn looking_forward(position: Vec3) -> Self {
        Self::new(position, Vec3::Y, DEFAULT_YAW, 0.0)
    }

    pub fn with_speed(mut self, movement_speed: f32) -> Self {
        self.movement_speed = movement_speed;
        self
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn world_up(&self) -> Vec3 {
        self.world_up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in radians.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Perspective projection for a viewport of `aspect` width over height.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.zoom, aspect, NEAR_PLANE, FAR_PLANE)
    }

    /// Moves along the requested axis by `movement_speed * dt`.
    pub fn process_keyboard(&mut self, direction: CameraMovement, dt: f32) {
        let velocity = self.movement_speed * dt;
        let axis = match direction {
            CameraMovement::Forward => self.front,
            CameraMovement::Backward => -self.front,
            CameraMovement::Left => -self.right,
            CameraMovement::Right => self.right,
            CameraMovement::Up => self.world_up,
            CameraMovement::Down => -self.world_up,
        };
        self.position += axis * velocity;
    }

    /// Turns by a mouse delta in pixels. Positive `dy` looks up.
    pub fn process_mouse_movement(&mut self, dx: f32, dy: f32, constrain_pitch: bool) {
        self.yaw += dx * self.mouse_sensitivity;
        self.pitch += dy * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_vectors();
    }

    /// Narrows the field of view by `dy` degrees, clamped to 1°..45°.
    pub fn process_mouse_scroll(&mut self, dy: f32) {
        self.zoom = (self.zoom - dy.to_radians()).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    fn update_vectors(&mut self) {
        self.front = direction_from_yaw_pitch(self.yaw, self.pitch);
        // Looking straight along world up keeps the previous right vector.
        self.right = self.front.cross(self.world_up).try_normalize().unwrap_or(self.right);
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::looking_forward(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec3, Vec4};

    use super::*;

    fn assert_orthonormal(camera: &Camera) {
        for axis in [camera.front(), camera.right(), camera.up()] {
            assert!((axis.length() - 1.0).abs() < 1e-5, "{axis:?} is not unit length");
        }
        assert!(camera.front().dot(camera.right()).abs() < 1e-5);
        assert!(camera.front().dot(camera.up()).abs() < 1e-5);
        assert!(camera.right().dot(camera.up()).abs() < 1e-5);
    }

    #[test]
    fn default_pose_looks_down_negative_z() {
        let camera = Camera::looking_forward(Vec3::new(0.0, 0.0, 3.0));
        assert!(camera.front().abs_diff_eq(Vec3::NEG_Z, 1e-6));

        let origin = camera.view_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(origin.abs_diff_eq(Vec4::new(0.0, 0.0, -3.0, 1.0), 1e-5));
    }

    #[test]
    fn pitch_is_clamped_and_basis_stays_orthonormal() {
        let mut camera = Camera::default();
        for _ in 0..100 {
            camera.process_mouse_movement(37.0, 500.0, true);
            assert!(camera.pitch() <= PITCH_LIMIT);
            assert_orthonormal(&camera);
        }
        for _ in 0..200 {
            camera.process_mouse_movement(-11.0, -500.0, true);
            assert!(camera.pitch() >= -PITCH_LIMIT);
            assert_orthonormal(&camera);
        }
    }

    #[test]
    fn degenerate_world_up_keeps_a_finite_basis() {
        let camera = Camera::new(Vec3::ZERO, Vec3::ZERO, DEFAULT_YAW, 0.0);
        assert_eq!(camera.world_up(), Vec3::Y);
        assert!(camera.front().is_finite() && camera.right().is_finite() && camera.up().is_finite());

        let along_front = Camera::new(Vec3::ZERO, Vec3::NEG_Z, DEFAULT_YAW, 0.0);
        assert!(along_front.right().is_normalized());
        assert!(along_front.up().is_normalized());
        assert!(along_front.view_matrix().is_finite());
    }

    #[test]
    fn keyboard_moves_along_the_basis() {
        let mut camera = Camera::looking_forward(Vec3::ZERO).with_speed(2.0);
        camera.process_keyboard(CameraMovement::Forward, 0.5);
        assert!(camera.position.abs_diff_eq(Vec3::NEG_Z, 1e-6));
        camera.process_keyboard(CameraMovement::Right, 1.0);
        assert!(camera.position.abs_diff_eq(Vec3::new(2.0, 0.0, -1.0), 1e-6));
        camera.process_keyboard(CameraMovement::Up, 0.25);
        camera.process_keyboard(CameraMovement::Backward, 0.5);
        camera.process_keyboard(CameraMovement::Left, 1.0);
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 0.5, 0.0), 1e-6));
        camera.process_keyboard(CameraMovement::Down, 0.25);
        assert!(camera.position.abs_diff_eq(Vec3::ZERO, 1e-6));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = Camera::default();
        assert_eq!(camera.zoom(), MAX_ZOOM);
        camera.process_mouse_scroll(10.0);
        assert!((camera.zoom() - 35f32.to_radians()).abs() < 1e-6);
        camera.process_mouse_scroll(100.0);
        assert_eq!(camera.zoom(), MIN_ZOOM);
        camera.process_mouse_scroll(-100.0);
        assert_eq!(camera.zoom(), MAX_ZOOM);
    }
}

use orrery::{Camera, CameraMovement};
use winit::keyboard::KeyCode;

use crate::KeyState;

const BINDINGS: &[(KeyCode, CameraMovement)] = &[
    (KeyCode::KeyW, CameraMovement::Forward),
    (KeyCode::KeyS, CameraMovement::Backward),
    (KeyCode::KeyA, CameraMovement::Left),
    (KeyCode::KeyD, CameraMovement::Right),
    (KeyCode::Space, CameraMovement::Up),
    (KeyCode::ControlLeft, CameraMovement::Down),
];

const SPRINT_KEYS: &[KeyCode] = &[KeyCode::ShiftLeft, KeyCode::ShiftRight];

/// Flies a [`Camera`] from held keys.
#[derive(Debug, Clone)]
pub struct CameraController {
    pub camera: Camera,
    /// Speed multiplier while Shift is held.
    pub sprint_multiplier: f32,
}

impl CameraController {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            sprint_multiplier: 1.0,
        }
    }

    pub fn with_sprint(mut self, sprint_multiplier: f32) -> Self {
        self.sprint_multiplier = sprint_multiplier;
        self
    }

    /// Applies every held movement key for `dt` seconds.
    pub fn update(&mut self, keys: &KeyState, dt: f32) {
        let dt = if keys.any_pressed(SPRINT_KEYS) {
            dt * self.sprint_multiplier
        } else {
            dt
        };
        for &(key, movement) in BINDINGS {
            if keys.pressed(key) {
                self.camera.process_keyboard(movement, dt);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn held_keys_move_the_camera() {
        let mut controller = CameraController::new(Camera::looking_forward(Vec3::ZERO).with_speed(10.0));
        let mut keys = KeyState::default();
        keys.set(KeyCode::KeyW, true);
        keys.set(KeyCode::Space, true);

        controller.update(&keys, 0.5);
        assert!(controller.camera.position.abs_diff_eq(Vec3::new(0.0, 5.0, -5.0), 1e-5));
    }

    #[test]
    fn shift_sprints() {
        let mut controller =
            CameraController::new(Camera::looking_forward(Vec3::ZERO).with_speed(50.0)).with_sprint(3.5);
        let mut keys = KeyState::default();
        keys.set(KeyCode::KeyD, true);
        keys.set(KeyCode::ShiftLeft, true);

        controller.update(&keys, 0.1);
        assert!(controller.camera.position.abs_diff_eq(Vec3::new(17.5, 0.0, 0.0), 1e-4));
    }

    #[test]
    fn released_keys_do_nothing() {
        let mut controller = CameraController::new(Camera::looking_forward(Vec3::ONE));
        let mut keys = KeyState::default();
        keys.set(KeyCode::KeyS, false);
        controller.update(&keys, 1.0);
        assert_eq!(controller.camera.position, Vec3::ONE);
    }
}

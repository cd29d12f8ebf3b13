//! Keyboard and mouse state plus the camera/UI focus machine.

use glam::Vec2;
use orrery::util::typedefs::FastHashMap;
use winit::keyboard::KeyCode;

/// Who receives keyboard and mouse input.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum InputFocus {
    /// Cursor captured, input drives the camera.
    #[default]
    CameraActive,
    /// Cursor free, input goes to the GUI.
    UiActive,
}

impl InputFocus {
    pub fn toggled(self) -> Self {
        match self {
            Self::CameraActive => Self::UiActive,
            Self::UiActive => Self::CameraActive,
        }
    }

    pub fn camera_active(self) -> bool {
        self == Self::CameraActive
    }
}

/// Pressed state of every key seen so far.
#[derive(Debug, Default, Clone)]
pub struct KeyState {
    keys: FastHashMap<KeyCode, bool>,
}

impl KeyState {
    pub fn set(&mut self, key: KeyCode, pressed: bool) {
        self.keys.insert(key, pressed);
    }

    pub fn pressed(&self, key: KeyCode) -> bool {
        self.keys.get(&key).copied().unwrap_or(false)
    }

    pub fn any_pressed(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|&key| self.pressed(key))
    }

    /// Releases every key.
    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

/// Turns absolute cursor positions into deltas.
///
/// The first position after a reset only primes the tracker, so a cursor
/// jump while the camera had no focus never turns into a rotation.
#[derive(Debug, Default, Clone)]
pub struct MouseTracker {
    last: Option<Vec2>,
}

impl MouseTracker {
    /// Delta since the previous position, with y growing upwards.
    pub fn delta(&mut self, position: Vec2) -> Option<Vec2> {
        let last = self.last.replace(position)?;
        Some(Vec2::new(position.x - last.x, last.y - position.y))
    }

    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn is_primed(&self) -> bool {
        self.last.is_some()
    }
}

/// What the framework must do in response to a key event.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Exit,
    FocusChanged(InputFocus),
}

/// Focus, keys and mouse tracking for one window.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    focus: InputFocus,
    pub keys: KeyState,
    pub mouse: MouseTracker,
}

impl InputState {
    pub fn focus(&self) -> InputFocus {
        self.focus
    }

    /// Records a key transition. Escape exits and a fresh Backspace press
    /// toggles focus, whatever the current focus is.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool, repeat: bool) -> KeyAction {
        self.keys.set(key, pressed);

        match key {
            KeyCode::Escape if pressed => KeyAction::Exit,
            KeyCode::Backspace if pressed && !repeat => KeyAction::FocusChanged(self.toggle_focus()),
            _ => KeyAction::None,
        }
    }

    pub fn toggle_focus(&mut self) -> InputFocus {
        self.set_focus(self.focus.toggled());
        self.focus
    }

    pub fn set_focus(&mut self, focus: InputFocus) {
        if focus == self.focus {
            return;
        }
        self.focus = focus;
        // Movement keys held across the switch would otherwise stick.
        self.keys.clear();
        if focus.camera_active() {
            self.mouse.reset();
        }
        log::debug!("input focus: {:?}", focus);
    }

    /// Cursor delta to apply to the camera, if it has focus.
    pub fn cursor_moved(&mut self, position: Vec2) -> Option<Vec2> {
        let delta = self.mouse.delta(position);
        delta.filter(|_| self.focus.camera_active())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_camera_focus() {
        assert_eq!(InputState::default().focus(), InputFocus::CameraActive);
    }

    #[test]
    fn backspace_edges_toggle_focus() {
        let mut input = InputState::default();

        assert_eq!(
            input.handle_key(KeyCode::Backspace, true, false),
            KeyAction::FocusChanged(InputFocus::UiActive)
        );
        assert_eq!(input.handle_key(KeyCode::Backspace, true, true), KeyAction::None);
        assert_eq!(input.handle_key(KeyCode::Backspace, false, false), KeyAction::None);
        assert_eq!(input.focus(), InputFocus::UiActive);

        assert_eq!(
            input.handle_key(KeyCode::Backspace, true, false),
            KeyAction::FocusChanged(InputFocus::CameraActive)
        );
    }

    #[test]
    fn escape_exits_from_either_focus() {
        let mut input = InputState::default();
        assert_eq!(input.handle_key(KeyCode::Escape, true, false), KeyAction::Exit);
        input.set_focus(InputFocus::UiActive);
        assert_eq!(input.handle_key(KeyCode::Escape, true, false), KeyAction::Exit);
        assert_eq!(input.handle_key(KeyCode::Escape, false, false), KeyAction::None);
    }

    #[test]
    fn entering_camera_focus_resets_first_mouse() {
        let mut input = InputState::default();
        assert_eq!(input.cursor_moved(Vec2::new(10.0, 10.0)), None);
        assert_eq!(input.cursor_moved(Vec2::new(15.0, 4.0)), Some(Vec2::new(5.0, 6.0)));

        input.set_focus(InputFocus::UiActive);
        assert_eq!(input.cursor_moved(Vec2::new(500.0, 500.0)), None);
        assert!(input.mouse.is_primed());

        input.set_focus(InputFocus::CameraActive);
        assert!(!input.mouse.is_primed());
        assert_eq!(input.cursor_moved(Vec2::new(100.0, 100.0)), None);
        assert_eq!(input.cursor_moved(Vec2::new(101.0, 101.0)), Some(Vec2::new(1.0, -1.0)));
    }

    #[test]
    fn switching_focus_releases_keys() {
        let mut input = InputState::default();
        input.handle_key(KeyCode::KeyW, true, false);
        assert!(input.keys.pressed(KeyCode::KeyW));
        input.toggle_focus();
        assert!(!input.keys.pressed(KeyCode::KeyW));
    }
}

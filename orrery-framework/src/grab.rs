use winit::window::{CursorGrabMode, Window};

/// Hides and captures the cursor while the camera has focus.
pub struct Grabber {
    grabbed: bool,
}
impl Grabber {
    pub fn new() -> Self {
        Self { grabbed: false }
    }

    pub fn request_grab(&mut self, window: &Window) {
        if let Err(e) = window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked))
        {
            log::warn!("Could not grab the cursor: {}", e);
        }
        window.set_cursor_visible(false);

        self.grabbed = true;
    }

    pub fn request_ungrab(&mut self, window: &Window) {
        let _ = window.set_cursor_grab(CursorGrabMode::None);
        window.set_cursor_visible(true);

        self.grabbed = false;
    }

    pub fn grabbed(&self) -> bool {
        self.grabbed
    }
}

impl Default for Grabber {
    fn default() -> Self {
        Self::new()
    }
}

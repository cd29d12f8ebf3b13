use web_time::Instant;

/// Wall-clock time between consecutive frames.
pub struct FrameTimer {
    last_frame: Instant,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
        }
    }

    /// Seconds since the previous call, or since creation.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        delta
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Averages frame rate over windows of at least one second.
#[derive(Debug, Default, Clone)]
pub struct FpsCounter {
    frames: u32,
    elapsed: f32,
    fps: f32,
    frame_time: f32,
}

impl FpsCounter {
    /// Counts one frame that took `delta` seconds. Returns the new average
    /// when a window closes.
    pub fn tick(&mut self, delta: f32) -> Option<f32> {
        self.frames += 1;
        self.elapsed += delta;
        if self.elapsed < 1.0 {
            return None;
        }

        self.fps = self.frames as f32 / self.elapsed;
        self.frame_time = self.elapsed / self.frames as f32;
        self.frames = 0;
        self.elapsed = 0.0;
        Some(self.fps)
    }

    /// Average of the last closed window, zero before the first.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Average seconds per frame of the last closed window.
    pub fn frame_time(&self) -> f32 {
        self.frame_time
    }
}

/// Window title carrying the frame rate.
pub fn fps_title(title: &str, fps: f32) -> String {
    format!("{title} - FPS: {}", fps.round() as u32)
}

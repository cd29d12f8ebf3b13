use wgpu::{Device, ErrorFilter};

/// Captures the errors of one filter class raised between `new` and `end`.
#[must_use = "All error scopes must end in a call to `end`"]
pub struct ErrorScope<'a> {
    device: &'a Device,
}

impl<'a> ErrorScope<'a> {
    pub fn new(device: &'a Device, filter: ErrorFilter) -> Self {
        device.push_error_scope(filter);
        Self { device }
    }

    /// Catches validation errors, which is how bad shaders and pipelines
    /// surface.
    pub fn validation(device: &'a Device) -> Self {
        Self::new(device, ErrorFilter::Validation)
    }

    pub fn end(self) -> Result<(), wgpu::Error> {
        let device = self.device;
        std::mem::forget(self);

        // Native backends resolve the scope immediately.
        match pollster::block_on(device.pop_error_scope()) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl<'a> Drop for ErrorScope<'a> {
    fn drop(&mut self) {
        log::error!("ErrorScope dropped without calling `end`");
        let _ = pollster::block_on(self.device.pop_error_scope());
    }
}

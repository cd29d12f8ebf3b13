#![allow(dead_code)]

use std::sync::Arc;

use orrery::{
    setup::{create_iad, create_instance},
    Renderer,
};

/// Requests a device, or returns None on machines without a usable adapter.
pub fn renderer() -> Option<Arc<Renderer>> {
    let _ = env_logger::builder().is_test(true).try_init();

    match pollster::block_on(create_iad(create_instance(), None, None, None)) {
        Ok(iad) => Some(Renderer::new(&iad)),
        Err(e) => {
            eprintln!("skipping GPU test: {e}");
            None
        }
    }
}

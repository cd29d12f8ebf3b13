//! Common utilities used throughout the crate.

mod interfaces;
mod pipeline;
mod samplers;

pub use interfaces::*;
pub use pipeline::*;
pub use samplers::*;

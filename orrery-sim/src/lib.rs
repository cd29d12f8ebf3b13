//! Gravitational simulation of a sun, one planet and an asteroid belt.
//!
//! The crate is GPU agnostic. Per-instance transforms of the asteroids are
//! handed to an [`InstanceSink`](orrery_types::InstanceSink) after every step;
//! the renderer plugs its instance buffers in there.

mod body;
mod params;
mod scene;
mod simulation;

pub use body::*;
pub use params::*;
pub use scene::*;
pub use simulation::*;

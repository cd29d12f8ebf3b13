//! GPU side of the orrery renderer.
//!
//! Holds everything that owns a wgpu handle: device setup, meshes, models and
//! their textures, shader programs, uniform and instance buffers and the frame
//! targets. Pipelines live in `orrery-routine`; this crate only supplies the
//! pieces they are built from.

mod camera;
mod error;
mod instances;
mod material;
mod mesh;
mod model;
mod renderer;
pub mod setup;
mod shader;
mod targets;
mod texture;
mod uniforms;
pub mod util;

pub use camera::*;
pub use error::*;
pub use instances::*;
pub use material::*;
pub use mesh::*;
pub use model::*;
pub use renderer::*;
pub use setup::{create_iad, InstanceAdapterDevice};
pub use shader::*;
pub use targets::*;
pub use texture::*;
pub use uniforms::*;

/// Reexport of the orrery-types crate.
pub use orrery_types as types;

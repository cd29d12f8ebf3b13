//! Render routines for orrery.
//!
//! Each routine owns one or two pipelines and knows which bind groups and
//! buffers its draws need. Routines record into a render pass the caller
//! opened; they never begin passes themselves.

pub mod common;
pub mod light_source;
pub mod lit;
pub mod shaders;
pub mod skybox;
pub mod textured;
pub mod uniforms;

pub use light_source::LightSourceRoutine;
pub use lit::LitRoutine;
pub use skybox::SkyboxRoutine;
pub use textured::TexturedRoutine;

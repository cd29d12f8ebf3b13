//! Helpers shared by the GPU resource types.

pub mod bind_merge;
pub mod error_scope;
pub mod mipmap;
pub mod typedefs;

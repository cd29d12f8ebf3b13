//! Type declarations for the orrery renderer and simulation crates.
//!
//! Everything in here is GPU-agnostic: CPU-side mesh data, the vertex layout
//! shared by every pipeline, the UV-sphere and cube factories and a handful of matrix
//! helpers. The GPU crate and the simulation crate both build on top of it.

use std::fmt;

/// Reexport of the glam version orrery is using.
pub use glam;
use glam::{Mat3, Mat4};
/// Reexport of the wgpu-types version orrery is using.
pub use wgt;

mod cube;
mod math;
mod mesh;
mod sphere;

pub use cube::*;
pub use math::*;
pub use mesh::*;
pub use sphere::*;

/// Number of samples used by a render target.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SampleCount {
    One = 1,
    Four = 4,
}

impl Default for SampleCount {
    fn default() -> Self {
        Self::Four
    }
}

impl TryFrom<u8> for SampleCount {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => Self::One,
            4 => Self::Four,
            v => return Err(v),
        })
    }
}

impl SampleCount {
    pub const ARRAY: [Self; 2] = [Self::One, Self::Four];

    /// Determines if a resolve texture is needed for this texture.
    pub const fn needs_resolve(self) -> bool {
        !matches!(self, Self::One)
    }
}

/// The role a material texture plays when shading a mesh.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureKind {
    Diffuse,
    Specular,
    Normal,
    Height,
}

impl TextureKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Diffuse => "diffuse",
            Self::Specular => "specular",
            Self::Normal => "normal",
            Self::Height => "height",
        }
    }

    /// Name of the fragment sampler the `index`-th texture of this kind binds
    /// to. `index` is 1-based, so the first diffuse map is `texture_diffuse1`.
    pub fn sampler_name(self, index: usize) -> String {
        format!("texture_{}{}", self.as_str(), index)
    }
}

impl fmt::Display for TextureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination for the per-instance transforms the simulation produces every
/// step.
///
/// The GPU crate implements this on its instance buffers; tests implement it
/// on plain vectors.
pub trait InstanceSink {
    /// Throws away the current storage and makes room for `capacity`
    /// instances.
    fn reallocate(&mut self, capacity: usize);

    /// Overwrites the first `models.len()` instances. `normals` is always the
    /// same length as `models`.
    fn upload(&mut self, models: &[Mat4], normals: &[Mat3]);
}

/// Discards everything.
impl InstanceSink for () {
    fn reallocate(&mut self, _capacity: usize) {}

    fn upload(&mut self, _models: &[Mat4], _normals: &[Mat3]) {}
}

#[cfg(test)]
mod tests {
    use super::{SampleCount, TextureKind};

    #[test]
    fn sampler_names_are_one_based_per_kind() {
        assert_eq!(TextureKind::Diffuse.sampler_name(1), "texture_diffuse1");
        assert_eq!(TextureKind::Specular.sampler_name(2), "texture_specular2");
        assert_eq!(TextureKind::Height.sampler_name(1), "texture_height1");
    }

    #[test]
    fn sample_count_round_trips_through_u8() {
        for count in SampleCount::ARRAY {
            assert_eq!(SampleCount::try_from(count as u8), Ok(count));
        }
        assert_eq!(SampleCount::try_from(2), Err(2));
        assert!(SampleCount::Four.needs_resolve());
        assert!(!SampleCount::One.needs_resolve());
    }
}

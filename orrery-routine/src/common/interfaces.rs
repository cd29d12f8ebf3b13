use orrery::{
    types::SampleCount,
    util::bind_merge::BindGroupLayoutBuilder,
    CameraUniform, LightUniform, ObjectUniform, UniformBuffer,
};
use wgpu::{
    BindGroupLayout, BindingType, Device, SamplerBindingType, ShaderStages, TextureFormat, TextureSampleType,
    TextureViewDimension,
};

/// Bind group index of the per frame camera and light blocks.
pub const FRAME_GROUP: u32 = 0;
/// Bind group index of the per draw object block, or the skybox cubemap.
pub const OBJECT_GROUP: u32 = 1;

/// Bind group layouts shared by every pipeline.
pub struct ShaderInterfaces {
    /// Camera block at binding 0, light block at binding 1.
    pub frame_bgl: BindGroupLayout,
    /// Object block at binding 0.
    pub object_bgl: BindGroupLayout,
    /// Cubemap at binding 0, sampler at binding 1.
    pub skybox_bgl: BindGroupLayout,
}

impl ShaderInterfaces {
    pub fn new(device: &Device) -> Self {
        profiling::scope!("ShaderInterfaces::new");

        let frame_bgl = BindGroupLayoutBuilder::new()
            .append(
                ShaderStages::VERTEX_FRAGMENT,
                UniformBuffer::<CameraUniform>::binding_type(),
                None,
            )
            .append(ShaderStages::FRAGMENT, UniformBuffer::<LightUniform>::binding_type(), None)
            .build(device, Some("frame bgl"));

        let object_bgl = BindGroupLayoutBuilder::new()
            .append(
                ShaderStages::VERTEX_FRAGMENT,
                UniformBuffer::<ObjectUniform>::binding_type(),
                None,
            )
            .build(device, Some("object bgl"));

        let skybox_bgl = BindGroupLayoutBuilder::new()
            .append(
                ShaderStages::FRAGMENT,
                BindingType::Texture {
                    sample_type: TextureSampleType::Float { filterable: true },
                    view_dimension: TextureViewDimension::Cube,
                    multisampled: false,
                },
                None,
            )
            .append(
                ShaderStages::FRAGMENT,
                BindingType::Sampler(SamplerBindingType::Filtering),
                None,
            )
            .build(device, Some("skybox bgl"));

        Self {
            frame_bgl,
            object_bgl,
            skybox_bgl,
        }
    }
}

/// Format and sample count of the color target pipelines draw into.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TargetInfo {
    pub format: TextureFormat,
    pub samples: SampleCount,
}

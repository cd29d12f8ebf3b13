use wgpu::{
    AddressMode, BindGroup, BindGroupLayout, BindingType, Device, FilterMode, Queue, Sampler, SamplerBindingType,
    SamplerDescriptor, ShaderStages, TextureSampleType, TextureView, TextureViewDimension,
};

use crate::{
    util::bind_merge::{BindGroupBuilder, BindGroupLayoutBuilder},
    Texture2d,
};

/// Bind group index every pipeline reads material textures from.
pub const MATERIAL_GROUP: u32 = 2;

/// Fragment samplers of the material group, in binding order.
pub const MATERIAL_SAMPLERS: [&str; 2] = ["texture_diffuse1", "texture_specular1"];

/// Layout and shared state for material bind groups: the first diffuse map at
/// binding 0, the first specular map at binding 1 and a repeating trilinear
/// sampler at binding 2.
pub struct MaterialInterface {
    pub bgl: BindGroupLayout,
    pub sampler: Sampler,
    /// Opaque white, bound in place of absent or unreadable textures.
    pub null_texture: Texture2d,
}

impl MaterialInterface {
    pub fn new(device: &Device, queue: &Queue) -> Self {
        profiling::scope!("MaterialInterface::new");

        let texture = BindingType::Texture {
            sample_type: TextureSampleType::Float { filterable: true },
            view_dimension: TextureViewDimension::D2,
            multisampled: false,
        };
        let bgl = BindGroupLayoutBuilder::new()
            .append(ShaderStages::FRAGMENT, texture, None)
            .append(ShaderStages::FRAGMENT, texture, None)
            .append(
                ShaderStages::FRAGMENT,
                BindingType::Sampler(SamplerBindingType::Filtering),
                None,
            )
            .build(device, Some("material bgl"));

        let sampler = device.create_sampler(&SamplerDescriptor {
            label: Some("material sampler"),
            address_mode_u: AddressMode::Repeat,
            address_mode_v: AddressMode::Repeat,
            address_mode_w: AddressMode::Repeat,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            mipmap_filter: FilterMode::Linear,
            ..Default::default()
        });

        let null_texture = Texture2d::solid(device, queue, [255; 4], Some("null texture"));

        Self {
            bgl,
            sampler,
            null_texture,
        }
    }

    /// Builds a material bind group, substituting the null texture for any
    /// missing view.
    pub fn bind_group(
        &self,
        device: &Device,
        diffuse: Option<&TextureView>,
        specular: Option<&TextureView>,
        label: Option<&str>,
    ) -> BindGroup {
        BindGroupBuilder::new()
            .append_texture_view(diffuse.unwrap_or(&self.null_texture.view))
            .append_texture_view(specular.unwrap_or(&self.null_texture.view))
            .append_sampler(&self.sampler)
            .build(device, label, &self.bgl)
    }
}

use wgpu::{AddressMode, Device, FilterMode, Sampler, SamplerDescriptor};

/// Samplers not owned by the material interface.
pub struct Samplers {
    /// Clamped bilinear sampling for cubemaps.
    pub cube: Sampler,
}

impl Samplers {
    pub fn new(device: &Device) -> Self {
        profiling::scope!("Samplers::new");

        let cube = device.create_sampler(&SamplerDescriptor {
            label: Some("cube sampler"),
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
            address_mode_w: AddressMode::ClampToEdge,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            mipmap_filter: FilterMode::Nearest,
            ..Default::default()
        });

        Self { cube }
    }
}

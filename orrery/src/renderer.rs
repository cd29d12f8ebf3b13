use std::sync::Arc;

use wgpu::{Device, Queue, TextureFormat};

use crate::{setup::ExtendedAdapterInfo, util::mipmap::MipmapGenerator, InstanceAdapterDevice, MaterialInterface};

/// Device handles plus the GPU state shared by every resource loader.
pub struct Renderer {
    pub device: Arc<Device>,
    pub queue: Arc<Queue>,
    pub adapter_info: ExtendedAdapterInfo,

    pub mipmaps: MipmapGenerator,
    pub material: MaterialInterface,
}

impl Renderer {
    pub fn new(iad: &InstanceAdapterDevice) -> Arc<Self> {
        Arc::new(Self::from_parts(
            Arc::clone(&iad.device),
            Arc::clone(&iad.queue),
            iad.info.clone(),
        ))
    }

    pub fn from_parts(device: Arc<Device>, queue: Arc<Queue>, adapter_info: ExtendedAdapterInfo) -> Self {
        profiling::scope!("Renderer::new");

        let mipmaps = MipmapGenerator::new(&device, &[TextureFormat::Rgba8UnormSrgb, TextureFormat::Rgba8Unorm]);
        let material = MaterialInterface::new(&device, &queue);

        log::debug!("renderer created on {}", adapter_info.name);

        Self {
            device,
            queue,
            adapter_info,
            mipmaps,
            material,
        }
    }
}

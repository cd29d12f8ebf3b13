use std::sync::Arc;

use arrayvec::ArrayVec;
use wgpu::{
    Adapter, AdapterInfo, Backend, Backends, Device, DeviceDescriptor, DeviceType, Features, Instance,
    InstanceDescriptor, Limits, PresentMode, Queue, Surface, SurfaceConfiguration, TextureFormat, TextureUsages,
};

use crate::{GpuStateError, LimitType, RendererInitializationError};

/// Largest uniform buffer binding needed to draw a frame.
pub const MAX_UNIFORM_BUFFER_BINDING_SIZE: u32 = 1024;

/// Limits required to draw the scenes.
///
/// The instanced pipeline reads three vertex buffers and ten attributes; every
/// fragment shader samples at most two textures.
pub fn required_limits() -> Limits {
    let mut limits = Limits::downlevel_webgl2_defaults();
    limits.max_texture_dimension_2d = 2048;
    limits.max_bind_groups = 4;
    limits.max_sampled_textures_per_shader_stage = 4;
    limits.max_samplers_per_shader_stage = 2;
    limits.max_uniform_buffers_per_shader_stage = 3;
    limits.max_uniform_buffer_binding_size = MAX_UNIFORM_BUFFER_BINDING_SIZE;
    limits.max_vertex_buffers = 3;
    limits.max_vertex_attributes = 10;
    limits.max_vertex_buffer_array_stride = 128;
    limits
}

fn check_limit(d: u32, r: u32, ty: LimitType) -> Result<u32, RendererInitializationError> {
    if d < r {
        Err(RendererInitializationError::LowDeviceLimit {
            ty,
            device_limit: d,
            required_limit: r,
        })
    } else {
        Ok(d)
    }
}

/// Check that all required limits are present in the given limit set.
///
/// Returns the required limits raised to whatever the device offers for the
/// checked fields.
pub fn check_limits(device_limits: &Limits) -> Result<Limits, RendererInitializationError> {
    let required = required_limits();

    Ok(Limits {
        max_texture_dimension_2d: check_limit(
            device_limits.max_texture_dimension_2d,
            required.max_texture_dimension_2d,
            LimitType::MaxTextureDimension2d,
        )?,
        max_texture_array_layers: check_limit(
            device_limits.max_texture_array_layers,
            required.max_texture_array_layers,
            LimitType::MaxTextureArrayLayers,
        )?,
        max_bind_groups: check_limit(
            device_limits.max_bind_groups,
            required.max_bind_groups,
            LimitType::BindGroups,
        )?,
        max_sampled_textures_per_shader_stage: check_limit(
            device_limits.max_sampled_textures_per_shader_stage,
            required.max_sampled_textures_per_shader_stage,
            LimitType::SampledTexturesPerShaderStages,
        )?,
        max_samplers_per_shader_stage: check_limit(
            device_limits.max_samplers_per_shader_stage,
            required.max_samplers_per_shader_stage,
            LimitType::SamplersPerShaderStages,
        )?,
        max_uniform_buffers_per_shader_stage: check_limit(
            device_limits.max_uniform_buffers_per_shader_stage,
            required.max_uniform_buffers_per_shader_stage,
            LimitType::UniformBuffersPerShaderStages,
        )?,
        max_uniform_buffer_binding_size: check_limit(
            device_limits.max_uniform_buffer_binding_size,
            required.max_uniform_buffer_binding_size,
            LimitType::UniformBufferBindingSize,
        )?,
        max_vertex_buffers: check_limit(
            device_limits.max_vertex_buffers,
            required.max_vertex_buffers,
            LimitType::MaxVertexBuffers,
        )?,
        max_vertex_attributes: check_limit(
            device_limits.max_vertex_attributes,
            required.max_vertex_attributes,
            LimitType::MaxVertexAttributes,
        )?,
        max_vertex_buffer_array_stride: check_limit(
            device_limits.max_vertex_buffer_array_stride,
            required.max_vertex_buffer_array_stride,
            LimitType::MaxVertexBufferArrayStride,
        )?,
        ..required
    })
}

/// Adapter name and kind, kept for logging and the GUI.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtendedAdapterInfo {
    pub name: String,
    pub device_type: DeviceType,
    pub backend: Backend,
    pub driver: String,
}
impl From<AdapterInfo> for ExtendedAdapterInfo {
    fn from(info: AdapterInfo) -> Self {
        Self {
            name: info.name,
            device_type: info.device_type,
            backend: info.backend,
            driver: info.driver_info,
        }
    }
}

/// Validated set of limits for a given adapter.
pub struct PotentialAdapter<T> {
    pub inner: T,
    pub info: ExtendedAdapterInfo,
    pub limits: Limits,
}
impl<T> PotentialAdapter<T> {
    pub fn new(inner: T, inner_info: AdapterInfo, inner_limits: Limits) -> Result<Self, RendererInitializationError> {
        Ok(PotentialAdapter {
            inner,
            info: ExtendedAdapterInfo::from(inner_info),
            limits: check_limits(&inner_limits)?,
        })
    }
}

/// Container for Instance/Adapter/Device/Queue.
///
/// Create these yourself, or call [`create_iad`].
pub struct InstanceAdapterDevice {
    pub instance: Arc<Instance>,
    pub adapter: Arc<Adapter>,
    pub device: Arc<Device>,
    pub queue: Arc<Queue>,
    pub info: ExtendedAdapterInfo,
}

fn device_type_rank(ty: DeviceType) -> u8 {
    match ty {
        DeviceType::DiscreteGpu => 0,
        DeviceType::IntegratedGpu => 1,
        DeviceType::VirtualGpu => 2,
        DeviceType::Cpu => 3,
        DeviceType::Other => 4,
    }
}

/// Creates an Instance/Adapter/Device/Queue, preferring discrete GPUs.
///
/// When `surface` is given only adapters able to present to it are
/// considered. An adapter whose name contains `desired_device` (case
/// insensitive) wins over the device type ranking.
pub async fn create_iad(
    instance: Instance,
    surface: Option<&Surface<'_>>,
    desired_backend: Option<Backend>,
    desired_device: Option<&str>,
) -> Result<InstanceAdapterDevice, RendererInitializationError> {
    profiling::scope!("create_iad");

    let backends = match desired_backend {
        Some(backend) => Backends::from(backend),
        None => Backends::all(),
    };
    let desired_device = desired_device.map(str::to_lowercase);

    let mut potential_adapters = ArrayVec::<PotentialAdapter<Adapter>, 8>::new();
    for (idx, adapter) in instance.enumerate_adapters(backends).into_iter().enumerate() {
        let info = adapter.get_info();
        let limits = adapter.limits();

        if let Some(surface) = surface {
            if !adapter.is_surface_supported(surface) {
                log::debug!("Adapter {} ({}) cannot present to the window", idx, info.name);
                continue;
            }
        }

        let potential = PotentialAdapter::new(adapter, info, limits);
        log::debug!("Adapter {}: {:#?}", idx, potential.as_ref().map(|p| &p.info));

        match potential {
            Ok(potential) if !potential_adapters.is_full() => potential_adapters.push(potential),
            Ok(_) => log::debug!("Ignoring adapter {}, too many candidates", idx),
            Err(e) => log::debug!("Adapter not usable: {}", e),
        }
    }

    potential_adapters.sort_by_key(|a| {
        let named = desired_device
            .as_deref()
            .map_or(false, |desired| a.info.name.to_lowercase().contains(desired));
        (!named, device_type_rank(a.info.device_type))
    });

    let adapter = potential_adapters
        .into_iter()
        .next()
        .ok_or(RendererInitializationError::MissingAdapter)?;

    log::info!("Chosen adapter: {} ({:?})", adapter.info.name, adapter.info.backend);
    log::debug!("Chosen limits: {:#?}", adapter.limits);

    let (device, queue) = adapter
        .inner
        .request_device(
            &DeviceDescriptor {
                label: Some("orrery device"),
                required_features: Features::empty(),
                required_limits: adapter.limits.clone(),
            },
            None,
        )
        .await
        .map_err(RendererInitializationError::RequestDeviceFailed)?;

    install_error_handler(&device);

    Ok(InstanceAdapterDevice {
        instance: Arc::new(instance),
        adapter: Arc::new(adapter.inner),
        device: Arc::new(device),
        queue: Arc::new(queue),
        info: adapter.info,
    })
}

/// Creates the default instance for native backends.
pub fn create_instance() -> Instance {
    Instance::new(InstanceDescriptor {
        backends: Backends::all(),
        ..Default::default()
    })
}

/// Routes errors raised outside an error scope to the log instead of
/// panicking.
pub fn install_error_handler(device: &Device) {
    device.on_uncaptured_error(Box::new(|error| {
        let error = GpuStateError(error.to_string());
        log::error!("{}", error);
    }));
}

/// Picks an sRGB surface format if the adapter offers one.
pub fn preferred_surface_format(surface: &Surface<'_>, adapter: &Adapter) -> TextureFormat {
    let caps = surface.get_capabilities(adapter);
    caps.formats
        .iter()
        .copied()
        .find(TextureFormat::is_srgb)
        .or_else(|| caps.formats.first().copied())
        .unwrap_or(TextureFormat::Bgra8UnormSrgb)
}

/// Configures `surface` for `size`, clamping zero extents to one pixel.
pub fn configure_surface(
    surface: &Surface<'_>,
    device: &Device,
    format: TextureFormat,
    size: glam::UVec2,
    present_mode: PresentMode,
) -> SurfaceConfiguration {
    let config = SurfaceConfiguration {
        usage: TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.x.max(1),
        height: size.y.max(1),
        present_mode,
        desired_maximum_frame_latency: 2,
        alpha_mode: wgpu::CompositeAlphaMode::Auto,
        view_formats: Vec::new(),
    };
    surface.configure(device, &config);
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_limits_pass_their_own_check() {
        let checked = check_limits(&required_limits()).expect("required limits are self-consistent");
        assert_eq!(checked.max_vertex_attributes, 10);
    }

    #[test]
    fn low_limit_is_reported() {
        let mut limits = required_limits();
        limits.max_vertex_buffers = 2;
        match check_limits(&limits) {
            Err(RendererInitializationError::LowDeviceLimit {
                ty: LimitType::MaxVertexBuffers,
                device_limit: 2,
                required_limit: 3,
            }) => {}
            other => panic!("unexpected result {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn discrete_gpus_rank_first() {
        assert!(device_type_rank(DeviceType::DiscreteGpu) < device_type_rank(DeviceType::IntegratedGpu));
        assert!(device_type_rank(DeviceType::IntegratedGpu) < device_type_rank(DeviceType::Cpu));
    }
}

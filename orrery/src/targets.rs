use glam::UVec2;
use orrery_types::SampleCount;
use wgpu::{
    Color, Device, Extent3d, LoadOp, Operations, RenderPassColorAttachment, RenderPassDepthStencilAttachment,
    StoreOp, TextureDescriptor, TextureDimension, TextureFormat, TextureUsages, TextureView, TextureViewDescriptor,
};

/// Format of the depth buffer every pipeline tests against.
pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

/// Multisampled color and depth attachments sized to the surface.
pub struct FrameTargets {
    size: UVec2,
    format: TextureFormat,
    samples: SampleCount,
    /// Present when `samples` needs a resolve into the surface texture.
    msaa: Option<TextureView>,
    depth: TextureView,
}

impl FrameTargets {
    pub fn new(device: &Device, size: UVec2, format: TextureFormat, samples: SampleCount) -> Self {
        profiling::scope!("FrameTargets::new");
        let size = size.max(UVec2::ONE);
        let extent = Extent3d {
            width: size.x,
            height: size.y,
            depth_or_array_layers: 1,
        };
        let create = |label, format| {
            device
                .create_texture(&TextureDescriptor {
                    label: Some(label),
                    size: extent,
                    mip_level_count: 1,
                    sample_count: samples as u32,
                    dimension: TextureDimension::D2,
                    format,
                    usage: TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                })
                .create_view(&TextureViewDescriptor::default())
        };

        let msaa = samples.needs_resolve().then(|| create("msaa color target", format));
        let depth = create("depth target", DEPTH_FORMAT);

        log::debug!("frame targets created at {}x{} ({:?})", size.x, size.y, samples);

        Self {
            size,
            format,
            samples,
            msaa,
            depth,
        }
    }

    /// Recreates the targets if `size` changed. Returns whether it did.
    pub fn resize(&mut self, device: &Device, size: UVec2) -> bool {
        if size.max(UVec2::ONE) == self.size {
            return false;
        }
        *self = Self::new(device, size, self.format, self.samples);
        true
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn samples(&self) -> SampleCount {
        self.samples
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.size.x as f32 / self.size.y as f32
    }

    /// Color attachment clearing to `clear` and resolving into `surface`.
    pub fn color_attachment<'a>(&'a self, surface: &'a TextureView, clear: Color) -> RenderPassColorAttachment<'a> {
        let (view, resolve_target) = match &self.msaa {
            Some(msaa) => (msaa, Some(surface)),
            None => (surface, None),
        };
        RenderPassColorAttachment {
            view,
            resolve_target,
            ops: Operations {
                load: LoadOp::Clear(clear),
                store: StoreOp::Store,
            },
        }
    }

    pub fn depth_attachment(&self) -> RenderPassDepthStencilAttachment<'_> {
        RenderPassDepthStencilAttachment {
            view: &self.depth,
            depth_ops: Some(Operations {
                load: LoadOp::Clear(1.0),
                store: StoreOp::Discard,
            }),
            stencil_ops: None,
        }
    }
}

//! Mipmap generation tools.

use arrayvec::ArrayVec;
use parking_lot::RwLock;
use wgpu::{
    AddressMode, BindGroup, BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType, Color,
    ColorTargetState, ColorWrites, CommandEncoder, Device, FilterMode, FragmentState, FrontFace, LoadOp,
    MultisampleState, Operations, PipelineLayout, PipelineLayoutDescriptor, PolygonMode, PrimitiveState,
    PrimitiveTopology, RenderPassColorAttachment, RenderPassDescriptor, RenderPipeline, RenderPipelineDescriptor,
    SamplerBindingType, SamplerDescriptor, ShaderModule, ShaderStages, StoreOp, Texture, TextureDimension,
    TextureFormat, TextureSampleType, TextureViewDescriptor, TextureViewDimension, VertexState,
};

use crate::{
    format_sso,
    util::{bind_merge::BindGroupBuilder, typedefs::FastHashMap},
};

/// Largest mip chain generated, enough for 32k textures.
const MAX_MIPS: usize = 16;

/// Generator for mipmaps.
pub struct MipmapGenerator {
    texture_bgl: BindGroupLayout,
    sampler_bg: BindGroup,
    sm: ShaderModule,
    pll: PipelineLayout,
    pipelines: RwLock<FastHashMap<TextureFormat, RenderPipeline>>,
}

impl MipmapGenerator {
    pub fn new(device: &Device, default_formats: &[TextureFormat]) -> Self {
        profiling::scope!("MipmapGenerator::new");

        let texture_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("mipmap generator texture bgl"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Texture {
                    sample_type: TextureSampleType::Float { filterable: true },
                    view_dimension: TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            }],
        });

        let sampler_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("mipmap generator sampler bgl"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Sampler(SamplerBindingType::Filtering),
                count: None,
            }],
        });

        let sampler = device.create_sampler(&SamplerDescriptor {
            label: Some("mipmap generator sampler"),
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
            address_mode_w: AddressMode::ClampToEdge,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            mipmap_filter: FilterMode::Nearest,
            ..Default::default()
        });

        let sampler_bg = BindGroupBuilder::new().append_sampler(&sampler).build(
            device,
            Some("mipmap generator sampler bg"),
            &sampler_bgl,
        );

        let sm = device.create_shader_module(wgpu::include_wgsl!("../../shaders/mipmap.wgsl"));

        let pll = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("mipmap generator pipeline layout"),
            bind_group_layouts: &[&texture_bgl, &sampler_bgl],
            push_constant_ranges: &[],
        });

        let pipelines = default_formats
            .iter()
            .map(|&format| (format, Self::build_blit_pipeline(device, format, &pll, &sm)))
            .collect();

        Self {
            texture_bgl,
            sampler_bg,
            sm,
            pll,
            pipelines: RwLock::new(pipelines),
        }
    }

    fn build_blit_pipeline(
        device: &Device,
        format: TextureFormat,
        pll: &PipelineLayout,
        sm: &ShaderModule,
    ) -> RenderPipeline {
        let label = format_sso!("mipmap pipeline {:?}", format);
        profiling::scope!(&label);
        device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(&label),
            layout: Some(pll),
            vertex: VertexState {
                module: sm,
                entry_point: "vs_main",
                buffers: &[],
            },
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: MultisampleState::default(),
            fragment: Some(FragmentState {
                module: sm,
                entry_point: "fs_main",
                targets: &[Some(ColorTargetState {
                    format,
                    blend: None,
                    write_mask: ColorWrites::ALL,
                })],
            }),
            multiview: None,
        })
    }

    /// Fills mip levels `1..` of `texture` by repeatedly downsampling the
    /// previous level. Level 0 must already hold the image.
    pub fn generate_mipmaps(&self, device: &Device, encoder: &mut CommandEncoder, texture: &Texture) {
        profiling::scope!("generating mipmaps");
        let format = texture.format();
        let mip_count = texture.mip_level_count().min(MAX_MIPS as u32);
        if mip_count < 2 {
            return;
        }

        let mips: ArrayVec<_, MAX_MIPS> = (0..mip_count)
            .map(|mip_level| {
                texture.create_view(&TextureViewDescriptor {
                    label: None,
                    dimension: Some(TextureViewDimension::D2),
                    base_mip_level: mip_level,
                    mip_level_count: Some(1),
                    ..Default::default()
                })
            })
            .collect();

        if !self.pipelines.read().contains_key(&format) {
            let pipeline = Self::build_blit_pipeline(device, format, &self.pll, &self.sm);
            self.pipelines.write().entry(format).or_insert(pipeline);
        }
        let pipelines = self.pipelines.read();
        let Some(pipeline) = pipelines.get(&format) else {
            return;
        };

        for (idx, view_window) in mips.windows(2).enumerate() {
            let src_view = &view_window[0];
            let dst_view = &view_window[1];

            let src_label = format_sso!("mipmap level {}", idx);
            let dst_label = format_sso!("mipmap level {}", idx + 1);
            profiling::scope!(&dst_label);

            let bg = BindGroupBuilder::new().append_texture_view(src_view).build(
                device,
                Some(&src_label),
                &self.texture_bgl,
            );

            let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some(&dst_label),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: dst_view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(Color::BLACK),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, &bg, &[]);
            rpass.set_bind_group(1, &self.sampler_bg, &[]);
            rpass.draw(0..3, 0..1);
        }
    }
}

/// Number of mips a full chain for a `width` x `height` texture has.
pub fn full_mip_count(width: u32, height: u32) -> u32 {
    wgpu::Extent3d {
        width: width.max(1),
        height: height.max(1),
        depth_or_array_layers: 1,
    }
    .max_mips(TextureDimension::D2)
}

#[cfg(test)]
mod tests {
    use super::full_mip_count;

    #[test]
    fn mip_counts() {
        assert_eq!(full_mip_count(1, 1), 1);
        assert_eq!(full_mip_count(2, 1), 2);
        assert_eq!(full_mip_count(512, 256), 10);
        assert_eq!(full_mip_count(0, 0), 1);
    }
}

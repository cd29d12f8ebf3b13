use orrery::{ShaderProgram, DEPTH_FORMAT};
use wgpu::{
    BindGroupLayout, BlendState, ColorTargetState, ColorWrites, CompareFunction, DepthBiasState, DepthStencilState,
    Device, Face, FragmentState, FrontFace, MultisampleState, PipelineLayoutDescriptor, PolygonMode, PrimitiveState,
    PrimitiveTopology, RenderPipeline, RenderPipelineDescriptor, StencilState, VertexBufferLayout, VertexState,
};

use crate::common::TargetInfo;

/// The knobs that differ between the pipelines of a frame.
pub struct PipelineSettings<'a> {
    pub label: &'a str,
    pub bind_group_layouts: &'a [&'a BindGroupLayout],
    pub vertex_buffers: &'a [VertexBufferLayout<'a>],
    pub depth_compare: CompareFunction,
    pub depth_write: bool,
    pub cull_mode: Option<Face>,
}

impl<'a> PipelineSettings<'a> {
    /// Opaque geometry: depth test `Less` with writes, back faces culled.
    pub fn opaque(
        label: &'a str,
        bind_group_layouts: &'a [&'a BindGroupLayout],
        vertex_buffers: &'a [VertexBufferLayout<'a>],
    ) -> Self {
        Self {
            label,
            bind_group_layouts,
            vertex_buffers,
            depth_compare: CompareFunction::Less,
            depth_write: true,
            cull_mode: Some(Face::Back),
        }
    }
}

/// Builds a triangle list pipeline drawing `program`'s `vs_main` and
/// `fs_main` into `target`.
pub fn build_pipeline(
    device: &Device,
    program: &ShaderProgram,
    target: TargetInfo,
    settings: &PipelineSettings<'_>,
) -> RenderPipeline {
    profiling::scope!("build_pipeline", settings.label);

    let pll = device.create_pipeline_layout(&PipelineLayoutDescriptor {
        label: Some(settings.label),
        bind_group_layouts: settings.bind_group_layouts,
        push_constant_ranges: &[],
    });

    program.create_pipeline(
        device,
        &RenderPipelineDescriptor {
            label: Some(settings.label),
            layout: Some(&pll),
            vertex: VertexState {
                module: program.module(),
                entry_point: "vs_main",
                buffers: settings.vertex_buffers,
            },
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: settings.cull_mode,
                unclipped_depth: false,
                polygon_mode: PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: settings.depth_write,
                depth_compare: settings.depth_compare,
                stencil: StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: MultisampleState {
                count: target.samples as u32,
                ..Default::default()
            },
            fragment: Some(FragmentState {
                module: program.module(),
                entry_point: "fs_main",
                targets: &[Some(ColorTargetState {
                    format: target.format,
                    blend: Some(BlendState::REPLACE),
                    write_mask: ColorWrites::ALL,
                })],
            }),
            multiview: None,
        },
    )
}

//! Routine that renders a cubemap as a skybox.
//!
//! Drawn last: the vertex stage pins every fragment to the far plane and the
//! depth test passes on equal, so only pixels nothing else covered are
//! filled.

use orrery::{
    types::cube, util::bind_merge::BindGroupBuilder, Mesh, Renderer, ShaderError, ShaderProgram, TextureCube,
};
use wgpu::{BindGroup, CompareFunction, RenderPass, RenderPipeline};

use crate::{
    common::{build_pipeline, PipelineSettings, Samplers, ShaderInterfaces, TargetInfo, FRAME_GROUP, OBJECT_GROUP},
    shaders,
    uniforms::FrameUniforms,
};

pub struct SkyboxRoutine {
    pipeline: RenderPipeline,
    samplers: Samplers,
    cube: Mesh,
    bind_group: Option<BindGroup>,
    _program: ShaderProgram,
}

impl SkyboxRoutine {
    pub fn new(renderer: &Renderer, interfaces: &ShaderInterfaces, target: TargetInfo) -> Result<Self, ShaderError> {
        profiling::scope!("SkyboxRoutine::new");
        let device = &renderer.device;

        let program = shaders::program(device, "skybox", shaders::SKYBOX)?;
        let pipeline = build_pipeline(
            device,
            &program,
            target,
            &PipelineSettings {
                label: "skybox pipeline",
                bind_group_layouts: &[&interfaces.frame_bgl, &interfaces.skybox_bgl],
                vertex_buffers: &[Mesh::LAYOUT],
                depth_compare: CompareFunction::LessEqual,
                depth_write: false,
                cull_mode: None,
            },
        );

        let cube = match Mesh::new(device, &cube(2.0), "skybox cube") {
            Ok(mesh) => mesh,
            Err(e) => unreachable!("generated cube is invalid: {e}"),
        };

        Ok(Self {
            pipeline,
            samplers: Samplers::new(device),
            cube,
            bind_group: None,
            _program: program,
        })
    }

    /// Sets the cubemap drawn. `None` disables the skybox.
    pub fn set_background_texture(
        &mut self,
        renderer: &Renderer,
        interfaces: &ShaderInterfaces,
        texture: Option<&TextureCube>,
    ) {
        log::debug!("skybox {}", if texture.is_some() { "enabled" } else { "disabled" });
        self.bind_group = texture.map(|texture| {
            BindGroupBuilder::new()
                .append_texture_view(&texture.view)
                .append_sampler(&self.samplers.cube)
                .build(&renderer.device, Some("skybox"), &interfaces.skybox_bgl)
        });
    }

    pub fn draw<'a>(&'a self, rpass: &mut RenderPass<'a>, frame: &'a FrameUniforms) {
        let Some(bind_group) = &self.bind_group else {
            return;
        };
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(FRAME_GROUP, frame.centred_bind_group(), &[]);
        rpass.set_bind_group(OBJECT_GROUP, bind_group, &[]);
        self.cube.draw(rpass, 0..1);
    }
}

//! Unlit, flat white geometry marking where a light sits.

use orrery::{Mesh, Renderer, ShaderError, ShaderProgram};
use wgpu::{RenderPass, RenderPipeline};

use crate::{
    common::{build_pipeline, PipelineSettings, ShaderInterfaces, TargetInfo, FRAME_GROUP, OBJECT_GROUP},
    shaders,
    uniforms::{FrameUniforms, ObjectBinding},
};

pub struct LightSourceRoutine {
    pipeline: RenderPipeline,
    _program: ShaderProgram,
}

impl LightSourceRoutine {
    pub fn new(renderer: &Renderer, interfaces: &ShaderInterfaces, target: TargetInfo) -> Result<Self, ShaderError> {
        let program = shaders::program(&renderer.device, "light source", shaders::LIGHT_SOURCE)?;
        let pipeline = build_pipeline(
            &renderer.device,
            &program,
            target,
            &PipelineSettings::opaque(
                "light source pipeline",
                &[&interfaces.frame_bgl, &interfaces.object_bgl],
                &[Mesh::LAYOUT],
            ),
        );
        Ok(Self {
            pipeline,
            _program: program,
        })
    }

    pub fn draw<'a>(&'a self, rpass: &mut RenderPass<'a>, frame: &'a FrameUniforms, object: &'a ObjectBinding, mesh: &'a Mesh) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(FRAME_GROUP, frame.bind_group(), &[]);
        rpass.set_bind_group(OBJECT_GROUP, object.bind_group(), &[]);
        mesh.draw(rpass, 0..1);
    }
}

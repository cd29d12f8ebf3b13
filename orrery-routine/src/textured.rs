//! Unlit geometry blending two textures 80/20.

use orrery::{Mesh, Renderer, ShaderError, ShaderProgram, MATERIAL_GROUP};
use wgpu::{BindGroup, RenderPass, RenderPipeline};

use crate::{
    common::{build_pipeline, PipelineSettings, ShaderInterfaces, TargetInfo, FRAME_GROUP, OBJECT_GROUP},
    shaders,
    uniforms::{FrameUniforms, ObjectBinding},
};

pub struct TexturedRoutine {
    pipeline: RenderPipeline,
    _program: ShaderProgram,
}

impl TexturedRoutine {
    pub fn new(renderer: &Renderer, interfaces: &ShaderInterfaces, target: TargetInfo) -> Result<Self, ShaderError> {
        let program = shaders::program(&renderer.device, "textured", shaders::TEXTURED)?;
        let pipeline = build_pipeline(
            &renderer.device,
            &program,
            target,
            &PipelineSettings::opaque(
                "textured pipeline",
                &[&interfaces.frame_bgl, &interfaces.object_bgl, &renderer.material.bgl],
                &[Mesh::LAYOUT],
            ),
        );
        Ok(Self {
            pipeline,
            _program: program,
        })
    }

    /// `textures` is a material bind group holding the two blended textures.
    pub fn draw<'a>(
        &'a self,
        rpass: &mut RenderPass<'a>,
        frame: &'a FrameUniforms,
        object: &'a ObjectBinding,
        textures: &'a BindGroup,
        mesh: &'a Mesh,
    ) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(FRAME_GROUP, frame.bind_group(), &[]);
        rpass.set_bind_group(OBJECT_GROUP, object.bind_group(), &[]);
        rpass.set_bind_group(MATERIAL_GROUP, textures, &[]);
        mesh.draw(rpass, 0..1);
    }
}

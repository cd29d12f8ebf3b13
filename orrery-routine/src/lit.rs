//! Phong shading of textured models under the frame's light block.
//!
//! Two pipelines share the fragment stage: one reads the model matrix from
//! the object block, the other from per-instance vertex buffers.

use orrery::{InstanceBuffers, Mesh, Model, Renderer, ShaderError, ShaderProgram, MATERIAL_GROUP};
use wgpu::{RenderPass, RenderPipeline};

use crate::{
    common::{build_pipeline, PipelineSettings, ShaderInterfaces, TargetInfo, FRAME_GROUP, OBJECT_GROUP},
    shaders,
    uniforms::{FrameUniforms, ObjectBinding},
};

pub struct LitRoutine {
    pipeline: RenderPipeline,
    instanced_pipeline: RenderPipeline,
    _program: ShaderProgram,
    _instanced_program: ShaderProgram,
}

impl LitRoutine {
    pub fn new(renderer: &Renderer, interfaces: &ShaderInterfaces, target: TargetInfo) -> Result<Self, ShaderError> {
        profiling::scope!("LitRoutine::new");
        let device = &renderer.device;
        let bgls = [&interfaces.frame_bgl, &interfaces.object_bgl, &renderer.material.bgl];

        let program = shaders::program(device, "lit", shaders::LIT)?;
        let pipeline = build_pipeline(
            device,
            &program,
            target,
            &PipelineSettings::opaque("lit pipeline", &bgls, &[Mesh::LAYOUT]),
        );

        let [models, normals] = InstanceBuffers::layouts();
        let instanced_program = shaders::program(device, "lit instanced", shaders::LIT_INSTANCED)?;
        let instanced_pipeline = build_pipeline(
            device,
            &instanced_program,
            target,
            &PipelineSettings::opaque(
                "lit instanced pipeline",
                &bgls,
                &[Mesh::BASE_LAYOUT, models, normals],
            ),
        );

        Ok(Self {
            pipeline,
            instanced_pipeline,
            _program: program,
            _instanced_program: instanced_program,
        })
    }

    /// Draws every mesh of `model` once with the transform in `object`.
    pub fn draw_model<'a>(
        &'a self,
        rpass: &mut RenderPass<'a>,
        frame: &'a FrameUniforms,
        object: &'a ObjectBinding,
        model: &'a Model,
    ) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(FRAME_GROUP, frame.bind_group(), &[]);
        rpass.set_bind_group(OBJECT_GROUP, object.bind_group(), &[]);
        model.draw(rpass, MATERIAL_GROUP, 0..1);
    }

    /// Draws every mesh of `model` once per live instance. Only the view
    /// position of `object` is read.
    pub fn draw_instanced<'a>(
        &'a self,
        rpass: &mut RenderPass<'a>,
        frame: &'a FrameUniforms,
        object: &'a ObjectBinding,
        model: &'a Model,
        instances: &'a InstanceBuffers,
    ) {
        profiling::scope!("LitRoutine::draw_instanced");
        rpass.set_pipeline(&self.instanced_pipeline);
        rpass.set_bind_group(FRAME_GROUP, frame.bind_group(), &[]);
        rpass.set_bind_group(OBJECT_GROUP, object.bind_group(), &[]);
        model.draw_instanced(rpass, MATERIAL_GROUP, instances);
    }
}

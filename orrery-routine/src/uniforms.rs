//! Helpers for building the per frame and per draw uniform bind groups.

use glam::{Mat4, Vec3};
use orrery::{
    util::bind_merge::BindGroupBuilder, Camera, CameraUniform, LightUniform, ObjectUniform, UniformBuffer,
};
use wgpu::{BindGroup, Device, Queue};

use crate::common::ShaderInterfaces;

/// Camera and light blocks, bound once per frame at group 0.
///
/// A second group shares the light block but sees the camera with its
/// translation removed, for the skybox.
pub struct FrameUniforms {
    camera: UniformBuffer<CameraUniform>,
    centred_camera: UniformBuffer<CameraUniform>,
    lights: UniformBuffer<LightUniform>,
    bind_group: BindGroup,
    centred_bind_group: BindGroup,
}

impl FrameUniforms {
    pub fn new(device: &Device, interfaces: &ShaderInterfaces, lights: &LightUniform) -> Self {
        let camera = UniformBuffer::new(device, "camera uniforms", &CameraUniform::default());
        let centred_camera = UniformBuffer::new(device, "centred camera uniforms", &CameraUniform::default());
        let lights = UniformBuffer::new(device, "light uniforms", lights);
        let bind_group = BindGroupBuilder::new()
            .append(camera.binding())
            .append(lights.binding())
            .build(device, Some("frame uniforms"), &interfaces.frame_bgl);
        let centred_bind_group = BindGroupBuilder::new()
            .append(centred_camera.binding())
            .append(lights.binding())
            .build(device, Some("centred frame uniforms"), &interfaces.frame_bgl);

        Self {
            camera,
            centred_camera,
            lights,
            bind_group,
            centred_bind_group,
        }
    }

    /// Writes projection and view for `camera` seen through a viewport of
    /// `aspect` width over height.
    pub fn write_camera(&self, queue: &Queue, camera: &Camera, aspect: f32) -> CameraUniform {
        let uniform = CameraUniform {
            projection: camera.projection_matrix(aspect),
            view: camera.view_matrix(),
        };
        self.camera.write(queue, &uniform);
        self.centred_camera.write(queue, &uniform.without_translation());
        uniform
    }

    /// Overwrites the whole light block.
    pub fn write_lights(&self, queue: &Queue, lights: &LightUniform) {
        self.lights.write(queue, lights);
    }

    pub fn bind_group(&self) -> &BindGroup {
        &self.bind_group
    }

    /// Same as [`FrameUniforms::bind_group`] with the camera at the origin.
    pub fn centred_bind_group(&self) -> &BindGroup {
        &self.centred_bind_group
    }
}

/// One object block and its group 1 bind group.
///
/// Every object drawn in a pass needs its own binding, since all writes land
/// before the pass executes.
pub struct ObjectBinding {
    buffer: UniformBuffer<ObjectUniform>,
    bind_group: BindGroup,
}

impl ObjectBinding {
    pub fn new(device: &Device, interfaces: &ShaderInterfaces, label: &str) -> Self {
        let buffer = UniformBuffer::new(device, label, &ObjectUniform::default());
        let bind_group = BindGroupBuilder::new()
            .append(buffer.binding())
            .build(device, Some(label), &interfaces.object_bgl);
        Self { buffer, bind_group }
    }

    pub fn write(&self, queue: &Queue, model: Mat4, view_position: Vec3) {
        self.buffer.write(queue, &ObjectUniform::new(model, view_position));
    }

    pub fn bind_group(&self) -> &BindGroup {
        &self.bind_group
    }
}

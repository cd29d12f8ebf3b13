use std::{mem::size_of, sync::Arc};

use glam::{Mat3, Mat4};
use orrery_types::InstanceSink;
use wgpu::{
    vertex_attr_array, Buffer, BufferAddress, BufferDescriptor, BufferUsages, Device, Queue, RenderPass,
    VertexAttribute, VertexBufferLayout, VertexStepMode,
};

/// Vertex buffer slot of the model matrices.
pub const MODEL_BUFFER_SLOT: u32 = 1;
/// Vertex buffer slot of the normal matrices.
pub const NORMAL_BUFFER_SLOT: u32 = 2;

/// Model matrix columns at shader locations 3..6.
pub const MODEL_ATTRIBUTES: [VertexAttribute; 4] = vertex_attr_array![
    3 => Float32x4,
    4 => Float32x4,
    5 => Float32x4,
    6 => Float32x4,
];

/// Normal matrix columns at shader locations 7..9.
pub const NORMAL_ATTRIBUTES: [VertexAttribute; 3] = vertex_attr_array![
    7 => Float32x3,
    8 => Float32x3,
    9 => Float32x3,
];

const MODEL_STRIDE: BufferAddress = size_of::<Mat4>() as BufferAddress;
const NORMAL_STRIDE: BufferAddress = size_of::<Mat3>() as BufferAddress;

/// Per-instance model and normal matrices for an instanced draw.
///
/// Both buffers hold `capacity` entries. Uploads overwrite the first `live`
/// entries; shrinking the live count never shrinks the buffers.
pub struct InstanceBuffers {
    device: Arc<Device>,
    queue: Arc<Queue>,

    models: Buffer,
    normals: Buffer,
    capacity: usize,
    live: usize,
}

impl InstanceBuffers {
    pub fn new(device: Arc<Device>, queue: Arc<Queue>, capacity: usize) -> Self {
        let (models, normals) = Self::create_buffers(&device, capacity);
        Self {
            device,
            queue,
            models,
            normals,
            capacity,
            live: 0,
        }
    }

    /// Layouts of buffers 1 and 2 of the instanced pipeline.
    pub fn layouts() -> [VertexBufferLayout<'static>; 2] {
        [
            VertexBufferLayout {
                array_stride: MODEL_STRIDE,
                step_mode: VertexStepMode::Instance,
                attributes: &MODEL_ATTRIBUTES,
            },
            VertexBufferLayout {
                array_stride: NORMAL_STRIDE,
                step_mode: VertexStepMode::Instance,
                attributes: &NORMAL_ATTRIBUTES,
            },
        ]
    }

    fn create_buffers(device: &Device, capacity: usize) -> (Buffer, Buffer) {
        // Zero sized vertex buffers can't be bound.
        let entries = capacity.max(1) as BufferAddress;
        let create = |label, stride| {
            device.create_buffer(&BufferDescriptor {
                label: Some(label),
                size: entries * stride,
                usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        (
            create("instance model matrices", MODEL_STRIDE),
            create("instance normal matrices", NORMAL_STRIDE),
        )
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Instances written by the last upload.
    pub fn live(&self) -> usize {
        self.live
    }

    pub fn bind<'a>(&'a self, rpass: &mut RenderPass<'a>) {
        rpass.set_vertex_buffer(MODEL_BUFFER_SLOT, self.models.slice(..));
        rpass.set_vertex_buffer(NORMAL_BUFFER_SLOT, self.normals.slice(..));
    }
}

impl InstanceSink for InstanceBuffers {
    fn reallocate(&mut self, capacity: usize) {
        profiling::scope!("InstanceBuffers::reallocate");
        self.models.destroy();
        self.normals.destroy();
        let (models, normals) = Self::create_buffers(&self.device, capacity);
        self.models = models;
        self.normals = normals;
        self.capacity = capacity;
        self.live = 0;
        log::debug!("instance buffers reallocated for {} instances", capacity);
    }

    fn upload(&mut self, models: &[Mat4], normals: &[Mat3]) {
        profiling::scope!("InstanceBuffers::upload");
        let mut count = models.len().min(normals.len());
        if count > self.capacity {
            log::warn!(
                "{} instances uploaded into buffers sized for {}, truncating",
                count,
                self.capacity
            );
            count = self.capacity;
        }

        self.live = count;
        if count == 0 {
            return;
        }
        self.queue
            .write_buffer(&self.models, 0, bytemuck::cast_slice(&models[..count]));
        self.queue
            .write_buffer(&self.normals, 0, bytemuck::cast_slice(&normals[..count]));
    }
}

impl Drop for InstanceBuffers {
    fn drop(&mut self) {
        self.models.destroy();
        self.normals.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_layouts_follow_mesh_slots() {
        let [models, normals] = InstanceBuffers::layouts();
        assert_eq!(models.array_stride, 64);
        assert_eq!(normals.array_stride, 36);

        let model_locations: Vec<_> = models.attributes.iter().map(|a| (a.shader_location, a.offset)).collect();
        assert_eq!(model_locations, vec![(3, 0), (4, 16), (5, 32), (6, 48)]);
        let normal_locations: Vec<_> = normals.attributes.iter().map(|a| (a.shader_location, a.offset)).collect();
        assert_eq!(normal_locations, vec![(7, 0), (8, 12), (9, 24)]);
    }
}

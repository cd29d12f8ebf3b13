use std::{ops::Range, path::PathBuf};

use orrery_types::{MeshData, MeshValidationError, TextureKind, Vertex};
use wgpu::{
    util::{BufferInitDescriptor, DeviceExt},
    BindGroup, Buffer, BufferUsages, Device, IndexFormat, RenderPass, VertexBufferLayout, VertexStepMode,
};

/// Reference from a mesh to a texture owned by its model.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshTexture {
    pub kind: TextureKind,
    pub path: PathBuf,
    /// Index into the owning model's texture registry.
    pub handle: usize,
}

/// Vertex and index buffers for one mesh.
///
/// The buffers are destroyed when the mesh is dropped. Drawing never touches
/// pipeline or uniform state; callers bind those first.
pub struct Mesh {
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    index_count: u32,
    vertex_count: u32,

    pub textures: Vec<MeshTexture>,
    pub material: Option<BindGroup>,
}

impl Mesh {
    /// Per-vertex layout at slots 0..6.
    pub const LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
        array_stride: Vertex::STRIDE,
        step_mode: VertexStepMode::Vertex,
        attributes: &Vertex::ATTRIBUTES,
    };

    /// Position, normal and uv only, for pipelines that feed instance data
    /// through slots 3 and up.
    pub const BASE_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
        array_stride: Vertex::STRIDE,
        step_mode: VertexStepMode::Vertex,
        attributes: &Vertex::BASE_ATTRIBUTES,
    };

    /// Uploads `data` into static buffers.
    pub fn new(device: &Device, data: &MeshData, label: &str) -> Result<Self, MeshValidationError> {
        profiling::scope!("Mesh::new");
        data.validate()?;

        let vertex_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some(&format!("{label} vertices")),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some(&format!("{label} indices")),
            contents: bytemuck::cast_slice(&data.indices),
            usage: BufferUsages::INDEX,
        });

        Ok(Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
            vertex_count: data.vertices.len() as u32,
            textures: Vec::new(),
            material: None,
        })
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Binds the vertex and index buffers and draws every index.
    pub fn draw<'a>(&'a self, rpass: &mut RenderPass<'a>, instances: Range<u32>) {
        if self.index_count == 0 {
            return;
        }
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.index_buffer.slice(..), IndexFormat::Uint32);
        rpass.draw_indexed(0..self.index_count, 0, instances);
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
    }
}

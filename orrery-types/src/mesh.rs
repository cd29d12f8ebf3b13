use std::path::PathBuf;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use thiserror::Error;
use wgt::{BufferAddress, VertexAttribute, VertexFormat};

use crate::TextureKind;

/// Vertex attribute slot of [`Vertex::position`].
pub const VERTEX_SLOT_POSITION: u32 = 0;
/// Vertex attribute slot of [`Vertex::normal`].
pub const VERTEX_SLOT_NORMAL: u32 = 1;
/// Vertex attribute slot of [`Vertex::uv`].
pub const VERTEX_SLOT_UV: u32 = 2;
/// Vertex attribute slot of [`Vertex::tangent`].
pub const VERTEX_SLOT_TANGENT: u32 = 3;
/// Vertex attribute slot of [`Vertex::bitangent`].
pub const VERTEX_SLOT_BITANGENT: u32 = 4;
/// Vertex attribute slot of [`Vertex::bone_ids`].
pub const VERTEX_SLOT_BONE_IDS: u32 = 5;
/// Vertex attribute slot of [`Vertex::bone_weights`].
pub const VERTEX_SLOT_BONE_WEIGHTS: u32 = 6;

/// Value of an unused entry in [`Vertex::bone_ids`].
pub const UNUSED_BONE: i32 = -1;

/// Interleaved vertex as stored in every mesh vertex buffer.
///
/// The skeletal fields are carried so the layout matches what model files can
/// describe, but nothing drives them.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    pub tangent: Vec3,
    pub bitangent: Vec3,
    pub bone_ids: [i32; 4],
    pub bone_weights: [f32; 4],
}

impl Vertex {
    /// Size of one vertex in the vertex buffer.
    pub const STRIDE: BufferAddress = std::mem::size_of::<Self>() as BufferAddress;

    /// Every attribute at its fixed slot.
    pub const ATTRIBUTES: [VertexAttribute; 7] = [
        VertexAttribute {
            format: VertexFormat::Float32x3,
            offset: 0,
            shader_location: VERTEX_SLOT_POSITION,
        },
        VertexAttribute {
            format: VertexFormat::Float32x3,
            offset: 12,
            shader_location: VERTEX_SLOT_NORMAL,
        },
        VertexAttribute {
            format: VertexFormat::Float32x2,
            offset: 24,
            shader_location: VERTEX_SLOT_UV,
        },
        VertexAttribute {
            format: VertexFormat::Float32x3,
            offset: 32,
            shader_location: VERTEX_SLOT_TANGENT,
        },
        VertexAttribute {
            format: VertexFormat::Float32x3,
            offset: 44,
            shader_location: VERTEX_SLOT_BITANGENT,
        },
        VertexAttribute {
            format: VertexFormat::Sint32x4,
            offset: 56,
            shader_location: VERTEX_SLOT_BONE_IDS,
        },
        VertexAttribute {
            format: VertexFormat::Float32x4,
            offset: 72,
            shader_location: VERTEX_SLOT_BONE_WEIGHTS,
        },
    ];

    /// Position, normal and uv only. Pipelines that put per-instance data in
    /// slots 3 and up declare this subset.
    pub const BASE_ATTRIBUTES: [VertexAttribute; 3] = [Self::ATTRIBUTES[0], Self::ATTRIBUTES[1], Self::ATTRIBUTES[2]];

    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            normal,
            uv,
            ..Self::default()
        }
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            normal: Vec3::ZERO,
            uv: Vec2::ZERO,
            tangent: Vec3::ZERO,
            bitangent: Vec3::ZERO,
            bone_ids: [UNUSED_BONE; 4],
            bone_weights: [0.0; 4],
        }
    }
}

/// Reference from a mesh to one of its material textures, by file path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MaterialTexture {
    pub kind: TextureKind,
    pub path: PathBuf,
}

/// Error returned from mesh validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshValidationError {
    #[error("Mesh has {count} indices which is not a multiple of three. Meshes are always composed of triangles")]
    IndexCountNotMultipleOfThree { count: usize },
    #[error(
        "Index at position {index} has the value {value} which is out of bounds for vertex buffers of {max} length"
    )]
    IndexOutOfBounds { index: usize, value: u32, max: u32 },
}

/// CPU side mesh: vertices, triangle indices and material texture references.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub textures: Vec<MaterialTexture>,
}

impl MeshData {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            textures: Vec::new(),
        }
    }

    pub fn with_texture(mut self, kind: TextureKind, path: impl Into<PathBuf>) -> Self {
        self.textures.push(MaterialTexture {
            kind,
            path: path.into(),
        });
        self
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Checks that the index buffer only describes whole triangles over
    /// existing vertices.
    pub fn validate(&self) -> Result<(), MeshValidationError> {
        let indices_length = self.indices.len();
        if indices_length % 3 != 0 {
            return Err(MeshValidationError::IndexCountNotMultipleOfThree { count: indices_length });
        }

        let vertex_count = self.vertices.len();
        for (index, &value) in self.indices.iter().enumerate() {
            if value as usize >= vertex_count {
                return Err(MeshValidationError::IndexOutOfBounds {
                    index,
                    value,
                    max: vertex_count as u32,
                });
            }
        }

        Ok(())
    }

    /// Calculate smooth per-vertex normals by summing the area weighted face
    /// normals of every triangle touching the vertex.
    ///
    /// Assumes counter-clockwise front faces. The mesh must be valid.
    pub fn calculate_normals(&mut self) {
        for vertex in &mut self.vertices {
            vertex.normal = Vec3::ZERO;
        }

        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let pos_a = self.vertices[a].position;
            let pos_b = self.vertices[b].position;
            let pos_c = self.vertices[c].position;

            let face = (pos_b - pos_a).cross(pos_c - pos_a);

            self.vertices[a].normal += face;
            self.vertices[b].normal += face;
            self.vertices[c].normal += face;
        }

        for vertex in &mut self.vertices {
            vertex.normal = vertex.normal.normalize_or_zero();
        }
    }

    /// Calculate per-vertex tangents and bitangents from positions and uvs.
    ///
    /// Triangles with a degenerate uv mapping contribute nothing. The mesh must
    /// be valid.
    pub fn calculate_tangents(&mut self) {
        for vertex in &mut self.vertices {
            vertex.tangent = Vec3::ZERO;
            vertex.bitangent = Vec3::ZERO;
        }

        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let (va, vb, vc) = (self.vertices[a], self.vertices[b], self.vertices[c]);

            let edge1 = vb.position - va.position;
            let edge2 = vc.position - va.position;
            let duv1 = vb.uv - va.uv;
            let duv2 = vc.uv - va.uv;

            let det = duv1.x * duv2.y - duv2.x * duv1.y;
            if det.abs() <= f32::EPSILON {
                continue;
            }
            let r = det.recip();

            let tangent = (edge1 * duv2.y - edge2 * duv1.y) * r;
            let bitangent = (edge2 * duv1.x - edge1 * duv2.x) * r;

            for idx in [a, b, c] {
                self.vertices[idx].tangent += tangent;
                self.vertices[idx].bitangent += bitangent;
            }
        }

        for vertex in &mut self.vertices {
            // Gram-Schmidt against the normal.
            let n = vertex.normal;
            let t = vertex.tangent - n * n.dot(vertex.tangent);
            vertex.tangent = t.normalize_or_zero();
            vertex.bitangent = vertex.bitangent.normalize_or_zero();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::mem::offset_of;

    use glam::{Vec2, Vec3};

    use super::*;

    fn quad() -> MeshData {
        let vertices = vec![
            Vertex::new(Vec3::new(0.0, 0.0, 0.0), Vec3::ZERO, Vec2::new(0.0, 0.0)),
            Vertex::new(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO, Vec2::new(1.0, 0.0)),
            Vertex::new(Vec3::new(1.0, 1.0, 0.0), Vec3::ZERO, Vec2::new(1.0, 1.0)),
            Vertex::new(Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO, Vec2::new(0.0, 1.0)),
        ];
        MeshData::new(vertices, vec![0, 1, 2, 0, 2, 3])
    }

    #[test]
    fn attribute_offsets_match_struct() {
        let offsets = [
            offset_of!(Vertex, position),
            offset_of!(Vertex, normal),
            offset_of!(Vertex, uv),
            offset_of!(Vertex, tangent),
            offset_of!(Vertex, bitangent),
            offset_of!(Vertex, bone_ids),
            offset_of!(Vertex, bone_weights),
        ];
        for (attribute, offset) in Vertex::ATTRIBUTES.iter().zip(offsets) {
            assert_eq!(attribute.offset, offset as u64);
        }
        for (slot, attribute) in Vertex::ATTRIBUTES.iter().enumerate() {
            assert_eq!(attribute.shader_location, slot as u32);
        }
        assert_eq!(Vertex::STRIDE, 88);
    }

    #[test]
    fn default_vertex_marks_bones_unused() {
        let vertex = Vertex::default();
        assert_eq!(vertex.bone_ids, [UNUSED_BONE; 4]);
        assert_eq!(vertex.bone_weights, [0.0; 4]);
    }

    #[test]
    fn validation() {
        assert_eq!(quad().validate(), Ok(()));

        let mut partial = quad();
        partial.indices.pop();
        assert_eq!(
            partial.validate(),
            Err(MeshValidationError::IndexCountNotMultipleOfThree { count: 5 })
        );

        let mut out_of_bounds = quad();
        out_of_bounds.indices[4] = 4;
        assert_eq!(
            out_of_bounds.validate(),
            Err(MeshValidationError::IndexOutOfBounds {
                index: 4,
                value: 4,
                max: 4
            })
        );
    }

    #[test]
    fn normals_face_counter_clockwise_side() {
        let mut mesh = quad();
        mesh.calculate_normals();
        for vertex in &mesh.vertices {
            assert!(vertex.normal.abs_diff_eq(Vec3::Z, 1e-6));
        }
    }

    #[test]
    fn tangents_follow_u_axis() {
        let mut mesh = quad();
        mesh.calculate_normals();
        mesh.calculate_tangents();
        for vertex in &mesh.vertices {
            assert!(vertex.tangent.abs_diff_eq(Vec3::X, 1e-6));
            assert!(vertex.bitangent.abs_diff_eq(Vec3::Y, 1e-6));
        }
    }
}

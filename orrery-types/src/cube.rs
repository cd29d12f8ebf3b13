use glam::{Vec2, Vec3};

use crate::{MeshData, Vertex};

/// Outward normal plus the in-face axes of each cube face, with
/// `u × v = normal`.
const FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
];

/// Axis aligned cube of edge length `size` centred on the origin.
///
/// Each face has its own four vertices so normals and uvs stay flat; the uv
/// square covers the whole face. Triangles are counter-clockwise seen from
/// outside.
pub fn cube(size: f32) -> MeshData {
    let half = size * 0.5;
    let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in FACES {
        let base = vertices.len() as u32;
        for (cu, cv) in corners {
            let position = (normal + u * cu + v * cv) * half;
            let uv = Vec2::new((cu + 1.0) * 0.5, (cv + 1.0) * 0.5);
            vertices.push(Vertex::new(position, normal, uv));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    let mut data = MeshData::new(vertices, indices);
    data.calculate_tangents();
    data
}

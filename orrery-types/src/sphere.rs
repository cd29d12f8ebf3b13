use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Vec2, Vec3};

use crate::{MeshData, Vertex};

/// Smallest sector count [`sphere`] will generate.
pub const MIN_SPHERE_SECTORS: u32 = 3;
/// Smallest stack count [`sphere`] will generate.
pub const MIN_SPHERE_STACKS: u32 = 2;

/// Generates a UV sphere centred on the origin.
///
/// Vertices are laid out row-major by (stack, sector), starting at the +Z pole.
/// Stack `i` sits at latitude `π/2 - i·π/stacks`, sector `j` at longitude
/// `j·2π/sectors`; the seam column is duplicated so uvs run 0..=1 on both
/// axes. Tangents are left zeroed. Triangles are counter-clockwise when seen
/// from outside the sphere.
///
/// Sector and stack counts below [`MIN_SPHERE_SECTORS`] and
/// [`MIN_SPHERE_STACKS`] are raised to those minimums.
pub fn sphere(radius: f32, sectors: u32, stacks: u32) -> MeshData {
    let sectors = sectors.max(MIN_SPHERE_SECTORS);
    let stacks = stacks.max(MIN_SPHERE_STACKS);

    let sector_step = TAU / sectors as f32;
    let stack_step = PI / stacks as f32;

    let mut vertices = Vec::with_capacity(((sectors + 1) * (stacks + 1)) as usize);
    for i in 0..=stacks {
        let stack_angle = FRAC_PI_2 - i as f32 * stack_step;
        let xy = radius * stack_angle.cos();
        let z = radius * stack_angle.sin();

        for j in 0..=sectors {
            let sector_angle = j as f32 * sector_step;
            let position = Vec3::new(xy * sector_angle.cos(), xy * sector_angle.sin(), z);
            let uv = Vec2::new(j as f32 / sectors as f32, i as f32 / stacks as f32);

            vertices.push(Vertex::new(position, position.normalize_or_zero(), uv));
        }
    }

    let mut indices = Vec::with_capacity((sectors * stacks * 6) as usize);
    for i in 0..stacks {
        for j in 0..sectors {
            let first = i * (sectors + 1) + j;
            let second = first + sectors + 1;

            indices.extend_from_slice(&[first, second, first + 1]);
            indices.extend_from_slice(&[second, second + 1, first + 1]);
        }
    }

    MeshData::new(vertices, indices)
}

//! Uniform block layouts shared with the WGSL programs, and a typed buffer to
//! hold them.
//!
//! Every struct is `repr(C)` with explicit padding so its bytes match the
//! uniform address space layout of the matching WGSL struct.

use std::{marker::PhantomData, mem::size_of, num::NonZeroU64};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use wgpu::{
    util::{BufferInitDescriptor, DeviceExt},
    BindingResource, BindingType, Buffer, BufferBindingType, BufferUsages, Device, Queue,
};

/// Maximum number of point lights the light block carries.
pub const MAX_POINT_LIGHTS: usize = 4;

/// Projection followed by view.
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct CameraUniform {
    pub projection: Mat4,
    pub view: Mat4,
}

impl CameraUniform {
    /// The same camera with its eye moved to the origin, for geometry that
    /// must stay centred on the viewer.
    pub fn without_translation(self) -> Self {
        Self {
            view: orrery_types::strip_translation(self.view),
            ..self
        }
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
        }
    }
}

/// Distance falloff `1 / (constant + linear * d + quadratic * d²)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    pub const fn new(constant: f32, linear: f32, quadratic: f32) -> Self {
        Self {
            constant,
            linear,
            quadratic,
        }
    }

    pub fn at(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

/// Ambient, diffuse and specular colors of a light.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LightColors {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl LightColors {
    pub const fn new(ambient: Vec3, diffuse: Vec3, specular: Vec3) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct MaterialUniform {
    pub shininess: f32,
    pub point_light_count: u32,
    pub _padding: [u32; 2],
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct DirectionalLightUniform {
    pub direction: Vec3,
    pub _padding0: f32,
    pub ambient: Vec3,
    pub _padding1: f32,
    pub diffuse: Vec3,
    pub _padding2: f32,
    pub specular: Vec3,
    pub _padding3: f32,
}

impl DirectionalLightUniform {
    pub fn new(direction: Vec3, colors: LightColors) -> Self {
        Self {
            direction,
            ambient: colors.ambient,
            diffuse: colors.diffuse,
            specular: colors.specular,
            ..Self::default()
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct PointLightUniform {
    pub position: Vec4,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    pub _padding0: f32,
    pub ambient: Vec3,
    pub _padding1: f32,
    pub diffuse: Vec3,
    pub _padding2: f32,
    pub specular: Vec3,
    pub _padding3: f32,
}

impl PointLightUniform {
    pub fn new(position: Vec3, attenuation: Attenuation, colors: LightColors) -> Self {
        Self {
            position: position.extend(1.0),
            constant: attenuation.constant,
            linear: attenuation.linear,
            quadratic: attenuation.quadratic,
            ambient: colors.ambient,
            diffuse: colors.diffuse,
            specular: colors.specular,
            ..Self::default()
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct SpotLightUniform {
    pub position: Vec3,
    pub _padding0: f32,
    pub direction: Vec3,
    /// Cosine of the inner cone angle.
    pub cut_off: f32,
    /// Cosine of the outer cone angle.
    pub outer_cut_off: f32,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    pub ambient: Vec3,
    pub _padding1: f32,
    pub diffuse: Vec3,
    pub _padding2: f32,
    pub specular: Vec3,
    pub _padding3: f32,
}

impl SpotLightUniform {
    /// Cone angles are in radians.
    pub fn new(inner_angle: f32, outer_angle: f32, attenuation: Attenuation, colors: LightColors) -> Self {
        Self {
            cut_off: inner_angle.cos(),
            outer_cut_off: outer_angle.cos(),
            constant: attenuation.constant,
            linear: attenuation.linear,
            quadratic: attenuation.quadratic,
            ambient: colors.ambient,
            diffuse: colors.diffuse,
            specular: colors.specular,
            ..Self::default()
        }
    }

    pub fn place(&mut self, position: Vec3, direction: Vec3) {
        self.position = position;
        self.direction = direction;
    }
}

/// The whole lighting block, bound at group 0 binding 1.
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct LightUniform {
    pub material: MaterialUniform,
    pub directional: DirectionalLightUniform,
    pub point_lights: [PointLightUniform; MAX_POINT_LIGHTS],
    pub spot: SpotLightUniform,
}

impl LightUniform {
    /// Replaces the point lights. Lights past [`MAX_POINT_LIGHTS`] are dropped
    /// with a warning.
    pub fn set_point_lights(&mut self, lights: &[PointLightUniform]) {
        if lights.len() > MAX_POINT_LIGHTS {
            log::warn!(
                "{} point lights requested, only {} are supported",
                lights.len(),
                MAX_POINT_LIGHTS
            );
        }
        let count = lights.len().min(MAX_POINT_LIGHTS);
        self.point_lights = [PointLightUniform::default(); MAX_POINT_LIGHTS];
        self.point_lights[..count].copy_from_slice(&lights[..count]);
        self.material.point_light_count = count as u32;
    }

    pub fn point_lights(&self) -> &[PointLightUniform] {
        &self.point_lights[..self.material.point_light_count as usize]
    }

    pub fn point_light_mut(&mut self, index: usize) -> Option<&mut PointLightUniform> {
        self.point_lights[..self.material.point_light_count as usize].get_mut(index)
    }
}

/// Per draw transforms, bound at group 1.
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct ObjectUniform {
    pub model: Mat4,
    /// Columns of the normal matrix, each padded to four floats.
    pub normal: [Vec4; 3],
    pub view_position: Vec4,
}

impl ObjectUniform {
    pub fn new(model: Mat4, view_position: Vec3) -> Self {
        let normal = orrery_types::normal_matrix(model);
        Self {
            model,
            normal: [
                normal.x_axis.extend(0.0),
                normal.y_axis.extend(0.0),
                normal.z_axis.extend(0.0),
            ],
            view_position: view_position.extend(1.0),
        }
    }
}

impl Default for ObjectUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Vec3::ZERO)
    }
}

/// A uniform buffer holding exactly one `T`.
pub struct UniformBuffer<T> {
    buffer: Buffer,
    _phantom: PhantomData<T>,
}

impl<T: Pod> UniformBuffer<T> {
    pub fn new(device: &Device, label: &str, initial: &T) -> Self {
        let buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(initial),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        Self {
            buffer,
            _phantom: PhantomData,
        }
    }

    /// Overwrites the whole block.
    pub fn write(&self, queue: &Queue, value: &T) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(value));
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn binding(&self) -> BindingResource<'_> {
        self.buffer.as_entire_binding()
    }

    /// Binding type for a layout entry reading this block.
    pub fn binding_type() -> BindingType {
        BindingType::Buffer {
            ty: BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(size_of::<T>() as u64),
        }
    }
}

impl<T> Drop for UniformBuffer<T> {
    fn drop(&mut self) {
        self.buffer.destroy();
    }
}

#[cfg(test)]
mod tests {
    use std::mem::{offset_of, size_of};

    use glam::{Mat4, Vec3};

    use super::*;

    #[test]
    fn camera_block_is_projection_then_view() {
        assert_eq!(size_of::<CameraUniform>(), 128);
        assert_eq!(offset_of!(CameraUniform, projection), 0);
        assert_eq!(offset_of!(CameraUniform, view), 64);
    }

    #[test]
    fn centred_camera_keeps_projection_and_rotation() {
        let camera = CameraUniform {
            projection: Mat4::perspective_rh(1.0, 1.5, 0.1, 100.0),
            view: Mat4::look_at_rh(Vec3::new(3.0, 4.0, 5.0), Vec3::ZERO, Vec3::Y),
        };
        let centred = camera.without_translation();
        assert_eq!(centred.projection, camera.projection);
        assert_eq!(centred.view.w_axis, Vec4::W);
        assert!(centred.view.z_axis.abs_diff_eq(camera.view.z_axis, 1e-6));
        assert!(centred.view.transform_point3(Vec3::ZERO).abs_diff_eq(Vec3::ZERO, 1e-6));
    }

    #[test]
    fn light_block_matches_uniform_layout() {
        assert_eq!(size_of::<MaterialUniform>(), 16);
        assert_eq!(size_of::<DirectionalLightUniform>(), 64);
        assert_eq!(offset_of!(DirectionalLightUniform, ambient), 16);
        assert_eq!(offset_of!(DirectionalLightUniform, specular), 48);

        assert_eq!(size_of::<PointLightUniform>(), 80);
        assert_eq!(offset_of!(PointLightUniform, constant), 16);
        assert_eq!(offset_of!(PointLightUniform, quadratic), 24);
        assert_eq!(offset_of!(PointLightUniform, ambient), 32);
        assert_eq!(offset_of!(PointLightUniform, diffuse), 48);
        assert_eq!(offset_of!(PointLightUniform, specular), 64);

        assert_eq!(size_of::<SpotLightUniform>(), 96);
        assert_eq!(offset_of!(SpotLightUniform, direction), 16);
        assert_eq!(offset_of!(SpotLightUniform, cut_off), 28);
        assert_eq!(offset_of!(SpotLightUniform, outer_cut_off), 32);
        assert_eq!(offset_of!(SpotLightUniform, quadratic), 44);
        assert_eq!(offset_of!(SpotLightUniform, ambient), 48);
        assert_eq!(offset_of!(SpotLightUniform, specular), 80);

        assert_eq!(offset_of!(LightUniform, directional), 16);
        assert_eq!(offset_of!(LightUniform, point_lights), 80);
        assert_eq!(offset_of!(LightUniform, spot), 400);
        assert_eq!(size_of::<LightUniform>(), 496);
    }

    #[test]
    fn object_block_layout() {
        assert_eq!(size_of::<ObjectUniform>(), 128);
        assert_eq!(offset_of!(ObjectUniform, normal), 64);
        assert_eq!(offset_of!(ObjectUniform, view_position), 112);

        let object = ObjectUniform::new(Mat4::from_scale(Vec3::new(2.0, 4.0, 8.0)), Vec3::ONE);
        assert!((object.normal[0].x - 0.5).abs() < 1e-6);
        assert!((object.normal[2].z - 0.125).abs() < 1e-6);
        assert_eq!(object.view_position.w, 1.0);
    }

    #[test]
    fn point_lights_are_capped() {
        let mut lights = LightUniform::default();
        let light = PointLightUniform::new(
            Vec3::X,
            Attenuation::new(1.0, 0.09, 0.032),
            LightColors::new(Vec3::splat(0.05), Vec3::splat(0.8), Vec3::ONE),
        );
        lights.set_point_lights(&[light; 6]);
        assert_eq!(lights.material.point_light_count, MAX_POINT_LIGHTS as u32);
        assert_eq!(lights.point_lights().len(), MAX_POINT_LIGHTS);

        lights.set_point_lights(&[light]);
        assert_eq!(lights.point_lights().len(), 1);
        assert_eq!(lights.point_lights[1], PointLightUniform::default());
        assert!(lights.point_light_mut(1).is_none());
    }

    #[test]
    fn spot_cone_is_stored_as_cosines() {
        let spot = SpotLightUniform::new(
            12.5f32.to_radians(),
            15f32.to_radians(),
            Attenuation::new(1.0, 0.022, 0.0019),
            LightColors::new(Vec3::ZERO, Vec3::splat(0.8), Vec3::splat(0.5)),
        );
        assert!(spot.cut_off > spot.outer_cut_off);
        assert!((spot.cut_off - 0.976_296).abs() < 1e-5);
    }

    #[test]
    fn attenuation_falls_off() {
        let attenuation = Attenuation::new(1.0, 0.0007, 0.000002);
        assert_eq!(attenuation.at(0.0), 1.0);
        assert!(attenuation.at(100.0) < attenuation.at(10.0));
    }
}

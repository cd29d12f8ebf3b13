//! One Phong-lit cube next to the lamp lighting it.

use std::path::Path;

use glam::{Mat4, Vec3};
use orrery::{
    types::cube, Attenuation, DirectionalLightUniform, LightColors, LightUniform, MaterialUniform, Mesh, Model,
    PointLightUniform, SpotLightUniform, Texture2d,
};
use orrery_framework::{App, RedrawContext, SetupContext};
use orrery_routine::{
    uniforms::{FrameUniforms, ObjectBinding},
    LightSourceRoutine, LitRoutine,
};
use wgpu::{Color, RenderPassDescriptor};
use winit::window::WindowBuilder;

const LAMP_POSITION: Vec3 = Vec3::new(1.2, 1.0, 2.0);
const LAMP_SCALE: f32 = 0.2;

/// Coral surface with a half-strength highlight.
const CUBE_DIFFUSE: [u8; 4] = [255, 128, 79, 255];
const CUBE_SPECULAR: [u8; 4] = [128, 128, 128, 255];

const LAMP_COLORS: LightColors = LightColors::new(Vec3::splat(0.1), Vec3::splat(0.5), Vec3::splat(0.8));
/// The lamp lights the whole scene evenly.
const NO_FALLOFF: Attenuation = Attenuation::new(1.0, 0.0, 0.0);
const DARK: LightColors = LightColors::new(Vec3::ZERO, Vec3::ZERO, Vec3::ZERO);

const CLEAR_COLOR: Color = Color {
    r: 0.1,
    g: 0.1,
    b: 0.1,
    a: 1.0,
};

/// A single lamp. The directional and spot slots stay dark but keep valid
/// directions and attenuation so the shader never divides by zero.
fn lamp_lights() -> LightUniform {
    let mut lights = LightUniform {
        material: MaterialUniform {
            shininess: 32.0,
            ..MaterialUniform::default()
        },
        directional: DirectionalLightUniform::new(Vec3::NEG_Y, DARK),
        spot: SpotLightUniform::new(0.0, 0.0, NO_FALLOFF, DARK),
        ..LightUniform::default()
    };
    lights.spot.place(Vec3::ZERO, Vec3::NEG_Z);
    lights.set_point_lights(&[PointLightUniform::new(LAMP_POSITION, NO_FALLOFF, LAMP_COLORS)]);
    lights
}

fn lamp_transform() -> Mat4 {
    Mat4::from_translation(LAMP_POSITION) * Mat4::from_scale(Vec3::splat(LAMP_SCALE))
}

struct LitCubeData {
    frame: FrameUniforms,
    cube_object: ObjectBinding,
    lamp_object: ObjectBinding,
    cube: Model,
    lamp: Mesh,
    _diffuse: Texture2d,
    _specular: Texture2d,
    light_source: LightSourceRoutine,
    lit: LitRoutine,
}

#[derive(Default)]
pub struct LitCube {
    data: Option<LitCubeData>,
}

impl App for LitCube {
    const TITLE: &'static str = "Lit Cube";

    fn setup(&mut self, context: SetupContext<'_>) -> anyhow::Result<()> {
        let renderer = context.renderer;
        let device = &renderer.device;
        let interfaces = context.interfaces;

        let light_source = LightSourceRoutine::new(renderer, interfaces, context.target)?;
        let lit = LitRoutine::new(renderer, interfaces, context.target)?;

        let diffuse = Texture2d::solid(device, &renderer.queue, CUBE_DIFFUSE, Some("cube diffuse"));
        let specular = Texture2d::solid(device, &renderer.queue, CUBE_SPECULAR, Some("cube specular"));

        let mut cube_model = Model::from_mesh_data(renderer, vec![cube(1.0)], Path::new(""), "cube");
        for mesh in &mut cube_model.meshes {
            mesh.material = Some(renderer.material.bind_group(
                device,
                Some(&diffuse.view),
                Some(&specular.view),
                Some("cube material"),
            ));
        }
        let lamp = Mesh::new(device, &cube(1.0), "lamp")?;

        self.data = Some(LitCubeData {
            frame: FrameUniforms::new(device, interfaces, &lamp_lights()),
            cube_object: ObjectBinding::new(device, interfaces, "cube object"),
            lamp_object: ObjectBinding::new(device, interfaces, "lamp object"),
            cube: cube_model,
            lamp,
            _diffuse: diffuse,
            _specular: specular,
            light_source,
            lit,
        });
        Ok(())
    }

    fn handle_redraw(&mut self, context: RedrawContext<'_>) {
        let Some(data) = self.data.as_ref() else {
            return;
        };
        let queue = &context.renderer.queue;
        let camera = context.camera;

        data.frame.write_camera(queue, camera, context.targets.aspect_ratio());
        data.cube_object.write(queue, Mat4::IDENTITY, camera.position);
        data.lamp_object.write(queue, lamp_transform(), camera.position);

        let mut rpass = context.encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("lit cube"),
            color_attachments: &[Some(context.targets.color_attachment(context.surface_view, CLEAR_COLOR))],
            depth_stencil_attachment: Some(context.targets.depth_attachment()),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        data.lit
            .draw_model(&mut rpass, &data.frame, &data.cube_object, &data.cube);
        data.light_source
            .draw(&mut rpass, &data.frame, &data.lamp_object, &data.lamp);
    }
}

pub fn main() -> anyhow::Result<()> {
    orrery_framework::start(
        LitCube::default(),
        WindowBuilder::new().with_inner_size(winit::dpi::LogicalSize::new(800.0, 600.0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_lamp_at_its_cube() {
        let lights = lamp_lights();
        assert_eq!(lights.point_lights().len(), 1);
        assert_eq!(lights.point_lights()[0].position, LAMP_POSITION.extend(1.0));
        assert_eq!(lights.material.shininess, 32.0);
        assert_eq!(lights.spot.constant, 1.0);
        assert_ne!(lights.directional.direction, Vec3::ZERO);

        let lamp_center = lamp_transform().transform_point3(Vec3::ZERO);
        assert!(lamp_center.abs_diff_eq(LAMP_POSITION, 1e-6));
    }
}

//! A loaded model under four point lights, a directional light and a torch
//! held by the camera.

use glam::{Mat4, Vec3};
use orrery::{
    types::cube, Attenuation, Camera, DirectionalLightUniform, LightColors, LightUniform, MaterialUniform, Mesh, Model,
    PointLightUniform, SpotLightUniform,
};
use orrery_framework::{App, RedrawContext, SetupContext};
use orrery_routine::{
    uniforms::{FrameUniforms, ObjectBinding},
    LightSourceRoutine, LitRoutine,
};
use wgpu::{Color, RenderPassDescriptor};
use winit::window::WindowBuilder;

const MODEL_PATH: &str = "objects/backpack/backpack.obj";

const POINT_LIGHT_POSITIONS: [Vec3; 4] = [
    Vec3::new(0.7, 0.2, 2.0),
    Vec3::new(2.3, -3.3, -4.0),
    Vec3::new(-4.0, 2.0, -12.0),
    Vec3::new(0.0, 0.0, -3.0),
];
const LAMP_SCALE: f32 = 0.2;

const ATTENUATION: Attenuation = Attenuation::new(1.0, 0.09, 0.032);
const POINT_COLORS: LightColors = LightColors::new(Vec3::splat(0.05), Vec3::splat(0.8), Vec3::ONE);

const SUN_DIRECTION: Vec3 = Vec3::new(-0.2, -1.0, -0.3);
const SUN_COLORS: LightColors = LightColors::new(Vec3::splat(0.05), Vec3::splat(0.4), Vec3::splat(0.5));

const TORCH_INNER_DEGREES: f32 = 12.5;
const TORCH_OUTER_DEGREES: f32 = 15.0;
const TORCH_COLORS: LightColors = LightColors::new(Vec3::ZERO, Vec3::ONE, Vec3::ONE);

const CLEAR_COLOR: Color = Color {
    r: 0.1,
    g: 0.1,
    b: 0.1,
    a: 1.0,
};

fn scene_lights() -> LightUniform {
    let mut lights = LightUniform {
        material: MaterialUniform {
            shininess: 32.0,
            ..MaterialUniform::default()
        },
        directional: DirectionalLightUniform::new(SUN_DIRECTION, SUN_COLORS),
        spot: SpotLightUniform::new(
            TORCH_INNER_DEGREES.to_radians(),
            TORCH_OUTER_DEGREES.to_radians(),
            ATTENUATION,
            TORCH_COLORS,
        ),
        ..LightUniform::default()
    };
    let points = POINT_LIGHT_POSITIONS.map(|position| PointLightUniform::new(position, ATTENUATION, POINT_COLORS));
    lights.set_point_lights(&points);
    lights
}

fn lamp_transform(position: Vec3) -> Mat4 {
    Mat4::from_translation(position) * Mat4::from_scale(Vec3::splat(LAMP_SCALE))
}

struct LitModelData {
    frame: FrameUniforms,
    model_object: ObjectBinding,
    lamp_objects: Vec<ObjectBinding>,
    model: Model,
    lamp: Mesh,
    light_source: LightSourceRoutine,
    lit: LitRoutine,
}

pub struct LitModel {
    data: Option<LitModelData>,
    lights: LightUniform,
}

impl Default for LitModel {
    fn default() -> Self {
        Self {
            data: None,
            lights: scene_lights(),
        }
    }
}

impl LitModel {
    fn follow_camera(&mut self, camera: &Camera) {
        self.lights.spot.place(camera.position, camera.front());
    }
}

impl App for LitModel {
    const TITLE: &'static str = "Lit Model";

    fn setup(&mut self, context: SetupContext<'_>) -> anyhow::Result<()> {
        let renderer = context.renderer;
        let device = &renderer.device;
        let interfaces = context.interfaces;
        let loader = crate::asset_loader();

        let light_source = LightSourceRoutine::new(renderer, interfaces, context.target)?;
        let lit = LitRoutine::new(renderer, interfaces, context.target)?;

        let model = Model::load(renderer, &loader.path(MODEL_PATH))?;
        let lamp = Mesh::new(device, &cube(1.0), "lamp")?;

        let lamp_objects = (0..POINT_LIGHT_POSITIONS.len())
            .map(|idx| ObjectBinding::new(device, interfaces, &format!("lamp {idx}")))
            .collect();

        self.data = Some(LitModelData {
            frame: FrameUniforms::new(device, interfaces, &self.lights),
            model_object: ObjectBinding::new(device, interfaces, "model object"),
            lamp_objects,
            model,
            lamp,
            light_source,
            lit,
        });
        Ok(())
    }

    fn handle_redraw(&mut self, context: RedrawContext<'_>) {
        let camera = context.camera;
        self.follow_camera(camera);

        let Some(data) = self.data.as_ref() else {
            return;
        };
        let queue = &context.renderer.queue;

        data.frame.write_lights(queue, &self.lights);
        data.frame.write_camera(queue, camera, context.targets.aspect_ratio());
        data.model_object.write(queue, Mat4::IDENTITY, camera.position);
        for (object, light) in data.lamp_objects.iter().zip(self.lights.point_lights()) {
            object.write(queue, lamp_transform(light.position.truncate()), camera.position);
        }

        let mut rpass = context.encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("lit model"),
            color_attachments: &[Some(context.targets.color_attachment(context.surface_view, CLEAR_COLOR))],
            depth_stencil_attachment: Some(context.targets.depth_attachment()),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        data.lit
            .draw_model(&mut rpass, &data.frame, &data.model_object, &data.model);
        for object in &data.lamp_objects {
            data.light_source.draw(&mut rpass, &data.frame, object, &data.lamp);
        }
    }
}

pub fn main() -> anyhow::Result<()> {
    orrery_framework::start(
        LitModel::default(),
        WindowBuilder::new().with_inner_size(winit::dpi::LogicalSize::new(1280.0, 720.0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_point_lights_and_a_torch() {
        let lights = scene_lights();
        assert_eq!(lights.point_lights().len(), 4);
        for (light, position) in lights.point_lights().iter().zip(POINT_LIGHT_POSITIONS) {
            assert_eq!(light.position, position.extend(1.0));
            assert_eq!((light.linear, light.quadratic), (0.09, 0.032));
        }
        assert_eq!(lights.directional.direction, SUN_DIRECTION);
        assert!(lights.spot.cut_off > lights.spot.outer_cut_off);
    }

    #[test]
    fn torch_tracks_the_camera() {
        let mut app = LitModel::default();
        let camera = Camera::looking_forward(Vec3::new(1.0, 2.0, 3.0));
        app.follow_camera(&camera);
        assert_eq!(app.lights.spot.position, camera.position);
        assert_eq!(app.lights.spot.direction, camera.front());
    }
}

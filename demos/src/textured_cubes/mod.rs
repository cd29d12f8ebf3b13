//! Ten unlit cubes blending two textures.

use glam::{Mat4, Vec3};
use orrery::{types::cube, LightUniform, Mesh, Texture2d};
use orrery_framework::{App, RedrawContext, SetupContext};
use orrery_routine::{
    uniforms::{FrameUniforms, ObjectBinding},
    TexturedRoutine,
};
use wgpu::{BindGroup, Color, RenderPassDescriptor};
use winit::window::WindowBuilder;

const CUBE_POSITIONS: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

const ROTATION_AXIS: Vec3 = Vec3::new(1.0, 0.3, 0.5);
const DEGREES_PER_CUBE: f32 = 20.0;

const CLEAR_COLOR: Color = Color {
    r: 0.2,
    g: 0.3,
    b: 0.3,
    a: 1.0,
};

/// Placement of the `index`th cube.
fn cube_transform(index: usize) -> Mat4 {
    let angle = (DEGREES_PER_CUBE * index as f32).to_radians();
    Mat4::from_translation(CUBE_POSITIONS[index]) * Mat4::from_axis_angle(ROTATION_AXIS.normalize(), angle)
}

struct TexturedCubesData {
    frame: FrameUniforms,
    objects: Vec<ObjectBinding>,
    textures: BindGroup,
    _container: Texture2d,
    _face: Texture2d,
    cube: Mesh,
    routine: TexturedRoutine,
}

#[derive(Default)]
pub struct TexturedCubes {
    data: Option<TexturedCubesData>,
}

impl App for TexturedCubes {
    const TITLE: &'static str = "Textured Cubes";

    fn setup(&mut self, context: SetupContext<'_>) -> anyhow::Result<()> {
        let renderer = context.renderer;
        let device = &renderer.device;
        let loader = crate::asset_loader();

        let routine = TexturedRoutine::new(renderer, context.interfaces, context.target)?;
        let cube = Mesh::new(device, &cube(1.0), "cube")?;

        let container = Texture2d::load(renderer, &loader.path("textures/container.jpg"), true)?;
        let face = Texture2d::load(renderer, &loader.path("textures/kaguya.jpg"), true)?;
        let textures = renderer
            .material
            .bind_group(device, Some(&container.view), Some(&face.view), Some("cube textures"));

        let objects = (0..CUBE_POSITIONS.len())
            .map(|idx| ObjectBinding::new(device, context.interfaces, &format!("cube {idx}")))
            .collect();

        self.data = Some(TexturedCubesData {
            frame: FrameUniforms::new(device, context.interfaces, &LightUniform::default()),
            objects,
            textures,
            _container: container,
            _face: face,
            cube,
            routine,
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
        for (idx, object) in data.objects.iter().enumerate() {
            object.write(queue, cube_transform(idx), camera.position);
        }

        let mut rpass = context.encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("textured cubes"),
            color_attachments: &[Some(context.targets.color_attachment(context.surface_view, CLEAR_COLOR))],
            depth_stencil_attachment: Some(context.targets.depth_attachment()),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        for object in &data.objects {
            data.routine
                .draw(&mut rpass, &data.frame, object, &data.textures, &data.cube);
        }
    }
}

pub fn main() -> anyhow::Result<()> {
    orrery_framework::start(
        TexturedCubes::default(),
        WindowBuilder::new().with_inner_size(winit::dpi::LogicalSize::new(800.0, 600.0)),
    )
}

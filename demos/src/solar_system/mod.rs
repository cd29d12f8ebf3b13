//! A sun, one planet and an instanced asteroid belt pulled around by
//! gravity, with a control panel for the simulation parameters.

use std::sync::Arc;

use glam::Vec3;
use orrery::{
    cube_face_paths, types::sphere, Camera, InstanceBuffers, LightUniform, Mesh, Model, TextureCube,
};
use orrery_framework::{App, CameraController, EventContext, RedrawContext, SetupContext};
use orrery_routine::{
    common::ShaderInterfaces,
    uniforms::{FrameUniforms, ObjectBinding},
    LightSourceRoutine, LitRoutine, SkyboxRoutine,
};
use orrery_sim::{Scene, SimParams};
use wgpu::{Color, RenderPassDescriptor};
use winit::{event::WindowEvent, window::WindowBuilder};

mod gui;
mod lighting;

use gui::Gui;

const CAMERA_START: Vec3 = Vec3::new(0.0, 20.0, 150.0);
const CAMERA_SPEED: f32 = 50.0;
const CAMERA_SPRINT: f32 = 3.5;

const CLEAR_COLOR: Color = Color {
    r: 0.01,
    g: 0.01,
    b: 0.01,
    a: 1.0,
};

const SUN_SECTORS: u32 = 36;
const SUN_STACKS: u32 = 18;

const PLANET_PATH: &str = "objects/planet/planet.obj";
const ROCK_PATH: &str = "objects/rock/rock.obj";
const SKYBOX_DIR: &str = "textures/skybox";
const SKYBOX_PREFIX: &str = "GalaxyTex_";

/// Everything that lives on the GPU. Fields drop in declaration order.
struct SolarSystemData {
    gui: Gui,

    frame: FrameUniforms,
    sun_object: ObjectBinding,
    planet_object: ObjectBinding,
    asteroid_object: ObjectBinding,

    asteroids: InstanceBuffers,

    sun_mesh: Mesh,
    planet: Model,
    rock: Model,
    _skybox_texture: Option<TextureCube>,

    light_source: LightSourceRoutine,
    lit: LitRoutine,
    skybox: SkyboxRoutine,
}

pub struct SolarSystem {
    data: Option<SolarSystemData>,
    scene: Scene,
    lights: LightUniform,
}

impl SolarSystem {
    fn new(params: SimParams) -> Self {
        Self {
            data: None,
            scene: Scene::new(params),
            lights: lighting::initial_lights(),
        }
    }
}

fn load_skybox(renderer: &orrery::Renderer) -> Option<TextureCube> {
    let loader = crate::asset_loader();
    let faces = cube_face_paths(&loader.path(SKYBOX_DIR), SKYBOX_PREFIX, "png");
    TextureCube::load(renderer, &faces)
        .map_err(|e| log::error!("Failed to load skybox: {}", orrery::error_chain(&e)))
        .ok()
}

impl App for SolarSystem {
    const TITLE: &'static str = "Solar System Sim";

    fn camera(&self) -> CameraController {
        let camera = Camera::looking_forward(CAMERA_START).with_speed(CAMERA_SPEED);
        CameraController::new(camera).with_sprint(CAMERA_SPRINT)
    }

    fn setup(&mut self, context: SetupContext<'_>) -> anyhow::Result<()> {
        profiling::scope!("SolarSystem::setup");
        let renderer = context.renderer;
        let interfaces: &ShaderInterfaces = context.interfaces;
        let loader = crate::asset_loader();

        let light_source = LightSourceRoutine::new(renderer, interfaces, context.target)?;
        let lit = LitRoutine::new(renderer, interfaces, context.target)?;
        let mut skybox = SkyboxRoutine::new(renderer, interfaces, context.target)?;

        let skybox_texture = load_skybox(renderer);
        skybox.set_background_texture(renderer, interfaces, skybox_texture.as_ref());

        let sun_mesh = Mesh::new(&renderer.device, &sphere(1.0, SUN_SECTORS, SUN_STACKS), "sun")?;
        let planet = Model::load_or_empty(renderer, &loader.path(PLANET_PATH));
        let rock = Model::load_or_empty(renderer, &loader.path(ROCK_PATH));

        let mut asteroids = InstanceBuffers::new(
            Arc::clone(&renderer.device),
            Arc::clone(&renderer.queue),
            self.scene.params.asteroid_count as usize,
        );
        self.scene.reset(&mut asteroids);

        self.data = Some(SolarSystemData {
            gui: Gui::new(context.window, renderer, context.surface_format),
            frame: FrameUniforms::new(&renderer.device, interfaces, &self.lights),
            sun_object: ObjectBinding::new(&renderer.device, interfaces, "sun object"),
            planet_object: ObjectBinding::new(&renderer.device, interfaces, "planet object"),
            asteroid_object: ObjectBinding::new(&renderer.device, interfaces, "asteroid object"),
            asteroids,
            sun_mesh,
            planet,
            rock,
            _skybox_texture: skybox_texture,
            light_source,
            lit,
            skybox,
        });

        Ok(())
    }

    fn handle_event(&mut self, context: EventContext<'_>, event: &WindowEvent) -> bool {
        let Some(data) = self.data.as_mut() else {
            return false;
        };
        data.gui.handle_event(context.window, context.focus, event)
    }

    fn handle_redraw(&mut self, context: RedrawContext<'_>) {
        profiling::scope!("SolarSystem::handle_redraw");
        let Some(data) = self.data.as_mut() else {
            return;
        };
        let renderer = context.renderer;
        let queue = &renderer.queue;

        let (gui_input, actions) = data.gui.run(context.window, context.fps, &mut self.scene.params);
        if actions.reset {
            self.scene.reset(&mut data.asteroids);
        }

        self.scene.update(context.delta_t_seconds, &mut data.asteroids);

        let camera = context.camera;
        lighting::follow(&mut self.lights, self.scene.sun().map(|sun| sun.position()), camera);
        data.frame.write_lights(queue, &self.lights);
        data.frame.write_camera(queue, camera, context.targets.aspect_ratio());

        let sun = self.scene.sun().map(|body| body.model_matrix());
        let planet = self.scene.planet().map(|body| body.model_matrix());
        if let Some(model) = sun {
            data.sun_object.write(queue, model, camera.position);
        }
        if let Some(model) = planet {
            data.planet_object.write(queue, model, camera.position);
        }
        data.asteroid_object.write(queue, glam::Mat4::IDENTITY, camera.position);

        {
            profiling::scope!("scene pass");
            let mut rpass = context.encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("solar system"),
                color_attachments: &[Some(context.targets.color_attachment(context.surface_view, CLEAR_COLOR))],
                depth_stencil_attachment: Some(context.targets.depth_attachment()),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if sun.is_some() {
                data.light_source
                    .draw(&mut rpass, &data.frame, &data.sun_object, &data.sun_mesh);
            }
            if planet.is_some() && !data.planet.is_empty() {
                data.lit
                    .draw_model(&mut rpass, &data.frame, &data.planet_object, &data.planet);
            }
            if !data.rock.is_empty() {
                data.lit.draw_instanced(
                    &mut rpass,
                    &data.frame,
                    &data.asteroid_object,
                    &data.rock,
                    &data.asteroids,
                );
            }
            data.skybox.draw(&mut rpass, &data.frame);
        }

        let extra = data
            .gui
            .render(renderer, context.encoder, context.surface_view, &gui_input);
        context.command_buffers.extend(extra);
    }
}

pub fn main() -> anyhow::Result<()> {
    let app = SolarSystem::new(SimParams::default());
    orrery_framework::start(
        app,
        WindowBuilder::new()
            .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 720.0))
            .with_maximized(true),
    )
}

//! Window, surface and event loop shared by every orrery application.
//!
//! Implement [`App`] and hand it to [`start`]. The framework owns the camera
//! and input focus; the app draws whatever it likes in
//! [`App::handle_redraw`].

use std::sync::Arc;

use glam::{UVec2, Vec2, Vec3};
use orrery::{
    setup::{configure_surface, create_instance, preferred_surface_format},
    types::SampleCount,
    Camera, FrameTargets, RendererInitializationError, Renderer,
};
use orrery_routine::common::{ShaderInterfaces, TargetInfo};
use wgpu::{CommandBuffer, CommandEncoder, PresentMode, Surface, SurfaceError, TextureFormat, TextureView};
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    keyboard::PhysicalKey,
    window::{Window, WindowBuilder},
};

mod assets;
mod controller;
mod grab;
mod input;
mod timing;

pub use assets::*;
pub use controller::*;
pub use grab::*;
pub use input::*;
pub use timing::*;

/// Scroll pixels treated as one wheel notch.
const PIXELS_PER_LINE: f32 = 20.0;

pub struct SetupContext<'a> {
    pub window: &'a Window,
    pub renderer: &'a Arc<Renderer>,
    pub interfaces: &'a ShaderInterfaces,
    pub target: TargetInfo,
    pub surface_format: TextureFormat,
    pub resolution: UVec2,
    pub scale_factor: f32,
}

pub struct EventContext<'a> {
    pub window: &'a Window,
    pub renderer: &'a Arc<Renderer>,
    pub focus: InputFocus,
}

pub struct RedrawContext<'a> {
    pub window: &'a Window,
    pub renderer: &'a Arc<Renderer>,
    pub interfaces: &'a ShaderInterfaces,
    pub targets: &'a FrameTargets,
    pub surface_view: &'a TextureView,
    pub encoder: &'a mut CommandEncoder,
    /// Submitted ahead of `encoder`.
    pub command_buffers: &'a mut Vec<CommandBuffer>,
    pub camera: &'a Camera,
    pub focus: InputFocus,
    pub fps: &'a FpsCounter,
    pub resolution: UVec2,
    pub delta_t_seconds: f32,
}

pub trait App {
    /// Window title, also the prefix of the FPS display.
    const TITLE: &'static str;
    /// Amount of samples the color target should have.
    const DEFAULT_SAMPLE_COUNT: SampleCount = SampleCount::Four;

    fn register_logger(&mut self) {
        register_logger();
    }

    fn sample_count(&self) -> SampleCount {
        Self::DEFAULT_SAMPLE_COUNT
    }

    fn present_mode(&self) -> PresentMode {
        PresentMode::AutoVsync
    }

    /// Initial camera pose and flight settings.
    fn camera(&self) -> CameraController {
        CameraController::new(Camera::looking_forward(Vec3::new(0.0, 0.0, 3.0)))
    }

    /// Errors abort startup before the window is shown.
    fn setup(&mut self, context: SetupContext<'_>) -> anyhow::Result<()>;

    /// Sees every window event before the camera does. Returning true keeps
    /// the event from the camera.
    fn handle_event(&mut self, context: EventContext<'_>, event: &WindowEvent) -> bool {
        let _ = (context, event);
        false
    }

    /// Called once per frame with a surface texture to draw into. Never
    /// called while the window has zero area.
    fn handle_redraw(&mut self, context: RedrawContext<'_>);
}

/// Installs env_logger at `info`, quieting wgpu internals. `RUST_LOG`
/// overrides both.
pub fn register_logger() {
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .filter_module("wgpu_core", log::LevelFilter::Warn)
        .filter_module("wgpu_hal", log::LevelFilter::Warn)
        .filter_module("naga", log::LevelFilter::Warn)
        .parse_default_env()
        .try_init();
}

/// Everything the event loop owns. Fields drop top to bottom: the app's GPU
/// resources go before the targets, the surface, the device and finally the
/// window.
struct Runtime<A: App> {
    app: A,
    targets: FrameTargets,
    interfaces: ShaderInterfaces,
    surface: Surface<'static>,
    renderer: Arc<Renderer>,
    window: Arc<Window>,

    format: TextureFormat,
    present_mode: PresentMode,
    resolution: UVec2,
    controller: CameraController,
    input: InputState,
    grabber: Grabber,
    timer: FrameTimer,
    fps: FpsCounter,
}

impl<A: App> Runtime<A> {
    fn apply_focus(&mut self, focus: InputFocus) {
        match focus {
            InputFocus::CameraActive => self.grabber.request_grab(&self.window),
            InputFocus::UiActive => self.grabber.request_ungrab(&self.window),
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        log::debug!("resize {:?}", size);
        self.resolution = UVec2::new(size.width, size.height);
        if self.resolution.cmpeq(UVec2::ZERO).any() {
            return;
        }

        configure_surface(
            &self.surface,
            &self.renderer.device,
            self.format,
            self.resolution,
            self.present_mode,
        );
        self.targets.resize(&self.renderer.device, self.resolution);
    }

    fn handle_window_event(&mut self, event: WindowEvent, elwt: &EventLoopWindowTarget<()>) {
        match event {
            WindowEvent::CloseRequested => {
                elwt.exit();
                return;
            }
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::RedrawRequested => {
                self.redraw(elwt);
                return;
            }
            _ => {}
        }

        // Escape and Backspace belong to the framework no matter who has focus.
        if let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(key),
                    state,
                    repeat,
                    ..
                },
            ..
        } = event
        {
            match self.input.handle_key(key, state == ElementState::Pressed, repeat) {
                KeyAction::Exit => {
                    elwt.exit();
                    return;
                }
                KeyAction::FocusChanged(focus) => {
                    self.apply_focus(focus);
                    return;
                }
                KeyAction::None => {}
            }
        }

        let context = EventContext {
            window: &self.window,
            renderer: &self.renderer,
            focus: self.input.focus(),
        };
        if self.app.handle_event(context, &event) {
            return;
        }

        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let position = Vec2::new(position.x as f32, position.y as f32);
                if let Some(delta) = self.input.cursor_moved(position) {
                    self.controller.camera.process_mouse_movement(delta.x, delta.y, true);
                }
            }
            WindowEvent::MouseWheel { delta, .. } if self.input.focus().camera_active() => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
                };
                self.controller.camera.process_mouse_scroll(lines);
            }
            WindowEvent::Focused(focused) => {
                if !focused {
                    self.grabber.request_ungrab(&self.window);
                } else if self.input.focus().camera_active() {
                    self.input.mouse.reset();
                    self.grabber.request_grab(&self.window);
                }
            }
            _ => {}
        }
    }

    fn redraw(&mut self, elwt: &EventLoopWindowTarget<()>) {
        profiling::scope!("RedrawRequested");

        let delta_t_seconds = self.timer.tick();
        if let Some(fps) = self.fps.tick(delta_t_seconds) {
            self.window.set_title(&fps_title(A::TITLE, fps));
        }
        if self.input.focus().camera_active() {
            self.controller.update(&self.input.keys, delta_t_seconds);
        }

        if self.resolution.cmpeq(UVec2::ZERO).any() {
            return;
        }

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(SurfaceError::Outdated | SurfaceError::Lost) => {
                log::debug!("surface lost, reconfiguring");
                configure_surface(
                    &self.surface,
                    &self.renderer.device,
                    self.format,
                    self.resolution,
                    self.present_mode,
                );
                return;
            }
            Err(SurfaceError::Timeout) => {
                log::warn!("timed out acquiring a surface texture");
                return;
            }
            Err(e @ SurfaceError::OutOfMemory) => {
                log::error!("{}", e);
                elwt.exit();
                return;
            }
        };
        let surface_view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .renderer
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("frame") });
        let mut command_buffers = Vec::new();

        self.app.handle_redraw(RedrawContext {
            window: &self.window,
            renderer: &self.renderer,
            interfaces: &self.interfaces,
            targets: &self.targets,
            surface_view: &surface_view,
            encoder: &mut encoder,
            command_buffers: &mut command_buffers,
            camera: &self.controller.camera,
            focus: self.input.focus(),
            fps: &self.fps,
            resolution: self.resolution,
            delta_t_seconds,
        });

        command_buffers.push(encoder.finish());
        self.renderer.queue.submit(command_buffers);
        frame.present();

        // mark the end of the frame for tracy/other profilers
        profiling::finish_frame!();
    }
}

pub async fn async_start<A: App>(mut app: A, window_builder: WindowBuilder) -> anyhow::Result<()> {
    app.register_logger();

    let event_loop = EventLoop::new()?;
    // Create the window invisible until we are rendering
    let window = Arc::new(
        window_builder
            .with_title(A::TITLE)
            .with_visible(false)
            .build(&event_loop)?,
    );
    let window_size = window.inner_size();
    let resolution = UVec2::new(window_size.width, window_size.height);

    let instance = create_instance();
    let surface = instance
        .create_surface(Arc::clone(&window))
        .map_err(RendererInitializationError::CreateSurface)?;
    let iad = orrery::create_iad(instance, Some(&surface), None, None).await?;
    let renderer = Renderer::new(&iad);

    let format = preferred_surface_format(&surface, &iad.adapter);
    let present_mode = app.present_mode();
    configure_surface(&surface, &renderer.device, format, resolution, present_mode);

    let samples = app.sample_count();
    let interfaces = ShaderInterfaces::new(&renderer.device);
    let target = TargetInfo { format, samples };
    let targets = FrameTargets::new(&renderer.device, resolution, format, samples);

    app.setup(SetupContext {
        window: &window,
        renderer: &renderer,
        interfaces: &interfaces,
        target,
        surface_format: format,
        resolution,
        scale_factor: window.scale_factor() as f32,
    })?;

    let controller = app.camera();
    let mut runtime = Runtime {
        app,
        targets,
        interfaces,
        surface,
        renderer,
        window,
        format,
        present_mode,
        resolution,
        controller,
        input: InputState::default(),
        grabber: Grabber::new(),
        timer: FrameTimer::new(),
        fps: FpsCounter::default(),
    };

    // We're ready, so lets make things visible
    runtime.window.set_visible(true);
    runtime.apply_focus(runtime.input.focus());
    log::info!("{} running on {}", A::TITLE, runtime.renderer.adapter_info.name);

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);
        match event {
            Event::WindowEvent { window_id, event } if window_id == runtime.window.id() => {
                runtime.handle_window_event(event, elwt)
            }
            Event::AboutToWait => runtime.window.request_redraw(),
            Event::LoopExiting => log::debug!("event loop exiting"),
            _ => {}
        }
    })?;

    Ok(())
}

pub fn start<A: App>(app: A, window_builder: WindowBuilder) -> anyhow::Result<()> {
    pollster::block_on(async_start(app, window_builder))
}

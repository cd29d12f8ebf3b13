//! Egui overlay drawn on top of a finished frame.
//!
//! [`EguiPlatform`] turns winit events into egui input and runs the UI;
//! [`EguiRenderRoutine`] draws the result straight into the surface texture.

use egui::{ClippedPrimitive, TexturesDelta};
use orrery::Renderer;
use wgpu::{
    CommandBuffer, CommandEncoder, LoadOp, Operations, RenderPassColorAttachment, RenderPassDescriptor, StoreOp,
    TextureFormat, TextureView,
};
use winit::{event::WindowEvent, window::Window};

/// Winit side of egui: collects input and runs UI frames.
pub struct EguiPlatform {
    state: egui_winit::State,
}

impl EguiPlatform {
    pub fn new(window: &Window) -> Self {
        let context = egui::Context::default();
        let state = egui_winit::State::new(
            context,
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
        );
        Self { state }
    }

    pub fn context(&self) -> &egui::Context {
        self.state.egui_ctx()
    }

    /// Feeds `event` to egui. Returns true if egui wants the event for itself.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Whether egui is currently using pointer or keyboard input.
    pub fn wants_input(&self) -> bool {
        let context = self.context();
        context.wants_pointer_input() || context.wants_keyboard_input()
    }

    /// Runs one UI frame and tessellates it.
    pub fn run(&mut self, window: &Window, ui: impl FnOnce(&egui::Context)) -> Input {
        profiling::scope!("EguiPlatform::run");

        let raw_input = self.state.take_egui_input(window);
        let context = self.state.egui_ctx().clone();
        let output = context.run(raw_input, ui);
        self.state.handle_platform_output(window, output.platform_output);

        Input {
            clipped_meshes: context.tessellate(output.shapes, output.pixels_per_point),
            textures_delta: output.textures_delta,
            pixels_per_point: output.pixels_per_point,
        }
    }
}

/// One tessellated UI frame.
pub struct Input {
    pub clipped_meshes: Vec<ClippedPrimitive>,
    pub textures_delta: TexturesDelta,
    pub pixels_per_point: f32,
}

pub struct EguiRenderRoutine {
    pub internal: egui_wgpu::Renderer,
    size_in_pixels: [u32; 2],
}

impl EguiRenderRoutine {
    /// Creates a new render routine to render a egui UI.
    ///
    /// Egui will always output gamma-encoded color. It will determine if to do
    /// this in the shader manually based on the output format.
    pub fn new(renderer: &Renderer, surface_format: TextureFormat, width: u32, height: u32) -> Self {
        let internal = egui_wgpu::Renderer::new(&renderer.device, surface_format, None, 1);

        Self {
            internal,
            size_in_pixels: [width, height],
        }
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        self.size_in_pixels = [new_width, new_height];
    }

    /// Uploads the frame's textures and buffers, then records a pass that
    /// loads `target` and draws the UI over it.
    ///
    /// The returned command buffers must be submitted before `encoder`.
    pub fn render(
        &mut self,
        renderer: &Renderer,
        encoder: &mut CommandEncoder,
        target: &TextureView,
        input: &Input,
    ) -> Vec<CommandBuffer> {
        profiling::scope!("EguiRenderRoutine::render");

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: self.size_in_pixels,
            pixels_per_point: input.pixels_per_point,
        };

        for (id, image_delta) in &input.textures_delta.set {
            self.internal
                .update_texture(&renderer.device, &renderer.queue, *id, image_delta);
        }
        let command_buffers = self.internal.update_buffers(
            &renderer.device,
            &renderer.queue,
            encoder,
            &input.clipped_meshes,
            &screen_descriptor,
        );

        {
            let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("egui"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Load,
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.internal
                .render(&mut rpass, &input.clipped_meshes, &screen_descriptor);
        }

        for id in &input.textures_delta.free {
            self.internal.free_texture(id);
        }

        if !command_buffers.is_empty() {
            log::trace!("egui produced {} callback command buffers", command_buffers.len());
        }
        command_buffers
    }
}

//! Control panel for the solar system scene.

use std::ops::RangeInclusive;

use egui::{CollapsingHeader, Slider, Ui};
use orrery::Renderer;
use orrery_egui::{EguiPlatform, EguiRenderRoutine, Input};
use orrery_framework::{FpsCounter, InputFocus};
use orrery_sim::SimParams;
use wgpu::{CommandBuffer, CommandEncoder, TextureFormat, TextureView};
use winit::{event::WindowEvent, window::Window};

/// What the panel asked for this frame.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct GuiActions {
    pub reset: bool,
}

impl GuiActions {
    /// The belt is rebuilt when asked to, or as soon as the asteroid count
    /// changes.
    pub fn from_edit(before: &SimParams, after: &SimParams, reset_clicked: bool) -> Self {
        Self {
            reset: reset_clicked || before.asteroid_count != after.asteroid_count,
        }
    }
}

pub struct Gui {
    platform: EguiPlatform,
    routine: EguiRenderRoutine,
}

impl Gui {
    pub fn new(window: &Window, renderer: &Renderer, surface_format: TextureFormat) -> Self {
        let size = window.inner_size();
        Self {
            platform: EguiPlatform::new(window),
            routine: EguiRenderRoutine::new(renderer, surface_format, size.width, size.height),
        }
    }

    /// Returns true if the panel took the event.
    pub fn handle_event(&mut self, window: &Window, focus: InputFocus, event: &WindowEvent) -> bool {
        if let WindowEvent::Resized(size) = event {
            self.routine.resize(size.width, size.height);
        }
        // The panel only listens while the cursor is free.
        if focus.camera_active() {
            return false;
        }
        let consumed = self.platform.on_window_event(window, event);
        claims_event(focus, consumed, self.platform.wants_input())
    }

    pub fn run(&mut self, window: &Window, fps: &FpsCounter, params: &mut SimParams) -> (Input, GuiActions) {
        let mut actions = GuiActions::default();
        let input = self.platform.run(window, |ctx| {
            egui::Window::new("Simulation Controls")
                .resizable(true)
                .default_width(320.0)
                .show(ctx, |ui| actions = controls(ui, fps, params));
        });
        (input, actions)
    }

    pub fn render(
        &mut self,
        renderer: &Renderer,
        encoder: &mut CommandEncoder,
        target: &TextureView,
        input: &Input,
    ) -> Vec<CommandBuffer> {
        self.routine.render(renderer, encoder, target, input)
    }
}

/// Events go to the panel first; it keeps them while the cursor is free and
/// egui either consumed the event or is busy with a widget.
fn claims_event(focus: InputFocus, consumed: bool, wants_input: bool) -> bool {
    !focus.camera_active() && (consumed || wants_input)
}

fn slider(ui: &mut Ui, value: &mut f32, range: RangeInclusive<f32>, text: &str) -> bool {
    ui.add(Slider::new(value, range).text(text)).changed()
}

fn controls(ui: &mut Ui, fps: &FpsCounter, params: &mut SimParams) -> GuiActions {
    let before = params.clone();

    ui.label(format!(
        "FPS: {:.1} ({:.3} ms/frame)",
        fps.fps(),
        fps.frame_time() * 1000.0
    ));
    ui.checkbox(&mut params.paused, "Pause Simulation");
    slider(ui, &mut params.simulation_speed, 0.0..=10.0, "Sim Speed");
    ui.separator();

    ui.label("Physics:");
    ui.add(
        Slider::new(&mut params.gravitational_constant, 0.0..=20000.0)
            .text("G Scaled")
            .fixed_decimals(0),
    );
    ui.separator();

    CollapsingHeader::new("Sun Properties").show(ui, |ui| {
        ui.add(
            Slider::new(&mut params.sun_mass, 1000.0..=100000.0)
                .text("Sun Mass")
                .fixed_decimals(0),
        );
        slider(ui, &mut params.sun_radius_scale, 1.0..=50.0, "Sun Radius Scale");
    });

    CollapsingHeader::new("Planet Properties").show(ui, |ui| {
        slider(ui, &mut params.planet_mass, 1.0..=1000.0, "Planet Mass");
        slider(ui, &mut params.planet_radius_scale, 0.1..=10.0, "Planet Radius Scale");
        slider(ui, &mut params.planet_orbit_radius, 10.0..=300.0, "Planet Orbit Radius");
        let mut degrees = params.planet_initial_angle.to_degrees();
        if ui
            .add(Slider::new(&mut degrees, 0.0..=360.0).text("Planet Initial Angle").suffix("°"))
            .changed()
        {
            params.planet_initial_angle = degrees.to_radians();
        }
    });

    CollapsingHeader::new("Asteroid Properties").show(ui, |ui| {
        ui.add(Slider::new(&mut params.asteroid_count, 0..=20000).text("Asteroid Count"));
        ui.add(
            Slider::new(&mut params.asteroid_average_mass, 0.001..=1.0)
                .text("Avg. Asteroid Mass")
                .fixed_decimals(3),
        );
        slider(ui, &mut params.asteroid_min_scale, 0.01..=0.5, "Min Asteroid Scale");
        slider(ui, &mut params.asteroid_max_scale, 0.05..=1.0, "Max Asteroid Scale");
        slider(ui, &mut params.belt_inner_radius, 20.0..=500.0, "Belt Inner Radius");
        slider(ui, &mut params.belt_outer_radius, 50.0..=600.0, "Belt Outer Radius");
        slider(ui, &mut params.belt_height, 1.0..=50.0, "Belt Height");
        ui.horizontal(|ui| {
            ui.label(format!("Seed: {:#x}", params.seed));
            if ui.button("Reseed").clicked() {
                params.seed = rand::random();
            }
        });
    });

    ui.separator();
    let reset_clicked = ui.button("Reset Simulation Full").clicked();
    ui.label("Backspace toggles camera / panel focus, Escape quits.");

    GuiActions::from_edit(&before, params, reset_clicked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_edits_trigger_a_reset() {
        let before = SimParams::default();
        let mut after = before.clone();
        assert_eq!(GuiActions::from_edit(&before, &after, false), GuiActions { reset: false });

        after.planet_mass = 5.0;
        assert!(!GuiActions::from_edit(&before, &after, false).reset);
        assert!(GuiActions::from_edit(&before, &after, true).reset);

        after.asteroid_count = 12;
        assert!(GuiActions::from_edit(&before, &after, false).reset);
    }

    #[test]
    fn panel_claims_events_only_with_a_free_cursor() {
        assert!(!claims_event(InputFocus::CameraActive, true, true));
        assert!(!claims_event(InputFocus::UiActive, false, false));
        assert!(claims_event(InputFocus::UiActive, true, false));
        assert!(claims_event(InputFocus::UiActive, false, true));
    }

    #[test]
    fn untouched_panel_changes_nothing() {
        let ctx = egui::Context::default();
        let fps = FpsCounter::default();
        let mut params = SimParams::default();
        let mut actions = GuiActions { reset: true };

        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| actions = controls(ui, &fps, &mut params));
        });

        assert_eq!(actions, GuiActions::default());
        assert_eq!(params, SimParams::default());
    }
}

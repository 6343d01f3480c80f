//! Parameter panel: egui overlay bound to the store's control table.

use egui::Context;
use egui_wgpu::{Renderer, RendererOptions};
use egui_winit::State;
use nova_sim::{Clock, ParamStore, CONTROLS};
use wgpu::{Device, TextureFormat};
use winit::{event::WindowEvent, window::Window};

pub struct Gui {
    context: Context,
    state: State,
    renderer: Renderer,
}

impl Gui {
    pub fn new(device: &Device, output_color_format: TextureFormat, window: &Window) -> Self {
        let context = Context::default();
        let id = context.viewport_id();

        let state = State::new(
            context.clone(),
            id,
            window,
            Some(window.scale_factor() as f32),
            None,
            Some(device.limits().max_texture_dimension_2d as usize),
        );

        let renderer = Renderer::new(
            device,
            output_color_format,
            RendererOptions {
                msaa_samples: 1,
                depth_stencil_format: None,
                dithering: false,
                predictable_texture_filtering: false,
            },
        );

        Self {
            context,
            state,
            renderer,
        }
    }

    /// Let the panel consume the event before the camera sees it.
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.state.on_window_event(window, event);
        response.consumed
    }

    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &Window,
        view: &wgpu::TextureView,
        store: &mut ParamStore,
        clock: &mut Clock,
    ) {
        let raw_input = self.state.take_egui_input(window);

        let full_output = self.context.run(raw_input, |ctx| {
            Self::ui(ctx, store, clock);
        });

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let clipped_primitives = self
            .context
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let size = window.inner_size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &clipped_primitives,
            &screen_descriptor,
        );

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Egui Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        // SAFETY: Workaround for lifetime issues with egui-wgpu render pass
        let render_pass: &mut wgpu::RenderPass<'static> =
            unsafe { std::mem::transmute(&mut render_pass) };

        self.renderer
            .render(render_pass, &clipped_primitives, &screen_descriptor);

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }

    fn ui(ctx: &Context, store: &mut ParamStore, clock: &mut Clock) {
        // Every slider comes from the declarative control table; the
        // panel knows nothing about individual parameters.
        egui::Window::new("Parameters")
            .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
            .resizable(false)
            .collapsible(true)
            .show(ctx, |ui| {
                for control in CONTROLS {
                    let mut value = store.value(control.param);
                    let changed = ui
                        .add(
                            egui::Slider::new(&mut value, control.min..=control.max)
                                .step_by(control.step as f64)
                                .text(control.label),
                        )
                        .changed();
                    if changed {
                        store.set(control.param, value);
                    }
                }

                ui.separator();
                ui.horizontal(|ui| {
                    ui.label("Particle Color");
                    let mut color = store.params().particle_color;
                    if ui.color_edit_button_rgb(&mut color).changed() {
                        store.set_particle_color(color);
                    }
                });
            });

        egui::Window::new("Playback")
            .anchor(egui::Align2::LEFT_BOTTOM, [10.0, -10.0])
            .resizable(false)
            .collapsible(true)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let label = if clock.is_playing() { "Pause" } else { "Play" };
                    if ui.button(label).clicked() {
                        clock.toggle_playing();
                    }
                    if ui.button("Reset").clicked() {
                        clock.trigger_reset();
                    }
                });
                ui.label(format!("t = {:.2} s", clock.time()));
            });
    }
}

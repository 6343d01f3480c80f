//! Particle Explosion Visualizer
//!
//! A spherical burst of glowing particles with an expanding shockwave
//! shell, bloom post-processing and an orbit camera.

mod gui;

use gui::Gui;
use nova_render::{
    clear_color, BloomPass, Camera, CameraUniform, ParticleUniforms, PointCloudRenderer,
    ShellRenderer, HDR_FORMAT,
};
use nova_sim::{Clock, ParamStore, ParticleField, ResetListener, Shockwave, ShockwaveConfig};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

const SHADER_DIR: &str = "assets/shaders";
const PARTICLE_SCALE: f32 = 3.0; // Global scale multiplier for visibility

struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    clock: Clock,
    store: ParamStore,
    field: ParticleField,
    shockwave: Shockwave,
    // Regeneration triggers: parameter invalidations and user resets.
    built_field_generation: u64,
    field_reset: ResetListener,

    camera: Camera,
    camera_buffer: wgpu::Buffer,

    // Each renderer is absent when its shader asset failed to load;
    // the rest of the scene carries on without it.
    point_cloud: Option<PointCloudRenderer>,
    shell: Option<ShellRenderer>,
    bloom: Option<BloomPass>,

    gui: Gui,

    frame_times: VecDeque<f32>,
    last_frame_time: Instant,
}

impl GpuState {
    async fn new(window: Arc<Window>) -> Self {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone()).unwrap();

        // Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .unwrap();

        log::info!("✓ Using GPU: {}", adapter.get_info().name);

        // Create device and queue
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .unwrap();

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoNoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader_dir = Path::new(SHADER_DIR);

        // Post-process chain first: it decides what format the scene
        // passes render into. Without bloom they hit the surface format
        // directly.
        let bloom = BloomPass::new(&device, config.format, size.width, size.height, shader_dir);
        let scene_format = if bloom.is_some() {
            HDR_FORMAT
        } else {
            config.format
        };
        if bloom.is_some() {
            log::info!("✓ Bloom chain initialized");
        }

        // Camera and its shared uniform buffer
        let camera = Camera::new(size.width, size.height);
        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut point_cloud = PointCloudRenderer::new(&device, scene_format, shader_dir);
        let shell = ShellRenderer::new(&device, scene_format, &camera_buffer, shader_dir);
        if point_cloud.is_some() {
            log::info!("✓ Point cloud renderer initialized");
        }
        if shell.is_some() {
            log::info!("✓ Shell renderer initialized");
        }

        // Simulation state
        let clock = Clock::new();
        let store = ParamStore::new();
        let shockwave = Shockwave::new(ShockwaveConfig::default(), &clock);
        let field_reset = ResetListener::attached(&clock);

        let field = ParticleField::generate(
            store.params().particle_count,
            store.params().explosion_speed,
            &mut rand::rng(),
        );
        log::info!("✓ Generated {} particle seeds", field.len());
        if let Some(renderer) = &mut point_cloud {
            renderer.rebuild_seeds(&device, &camera_buffer, &field);
        }
        let built_field_generation = store.field_generation();

        let gui = Gui::new(&device, config.format, &window);

        Self {
            surface,
            device,
            queue,
            config,
            clock,
            store,
            field,
            shockwave,
            built_field_generation,
            field_reset,
            camera,
            camera_buffer,
            point_cloud,
            shell,
            bloom,
            gui,
            frame_times: VecDeque::with_capacity(100),
            last_frame_time: Instant::now(),
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.camera.resize(new_size.width, new_size.height);

            if let Some(bloom) = &mut self.bloom {
                bloom.resize(&self.device, new_size.width, new_size.height);
            }
        }
    }

    fn render(&mut self, window: &Window) -> Result<(f32, f32), wgpu::SurfaceError> {
        // Track frame time
        let now = Instant::now();
        let frame_time = (now - self.last_frame_time).as_secs_f32() * 1000.0;
        self.last_frame_time = now;

        self.frame_times.push_back(frame_time);
        if self.frame_times.len() > 100 {
            self.frame_times.pop_front();
        }
        let avg_frame_time = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        let fps = 1000.0 / avg_frame_time;

        // Advance simulation time (clamped inside the clock).
        self.clock.advance(frame_time * 0.001);

        // Regenerate the field on parameter invalidation or user reset.
        let invalidated = self.store.field_generation() != self.built_field_generation;
        if self.field_reset.take(&self.clock) || invalidated {
            self.field = ParticleField::generate(
                self.store.params().particle_count,
                self.store.params().explosion_speed,
                &mut rand::rng(),
            );
            if let Some(renderer) = &mut self.point_cloud {
                renderer.rebuild_seeds(&self.device, &self.camera_buffer, &self.field);
            }
            self.built_field_generation = self.store.field_generation();
        }
        if invalidated {
            // A field-dirty parameter re-fires the explosion; the
            // shell re-fires with it at the current clock time.
            self.shockwave.restart(&self.clock);
        }

        // Shockwave re-syncs with the clock before sampling.
        self.shockwave
            .set_thickness(self.store.params().shockwave_thickness);
        self.shockwave.update(&self.clock);

        // Upload per-frame uniforms
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera.to_uniform()]),
        );

        let params = self.store.params();
        let time = self.clock.time();

        if let Some(renderer) = &self.point_cloud {
            renderer.update(
                &self.queue,
                ParticleUniforms {
                    color: params.particle_color,
                    time,
                    size: params.particle_size,
                    scale: PARTICLE_SCALE,
                    max_life: params.max_life,
                    _padding: 0.0,
                },
            );
        }

        if let Some(shell) = &mut self.shell {
            let color = self.shockwave.config().color;
            shell.update(
                &self.queue,
                self.shockwave.sample(time),
                color,
                params.shockwave_thickness,
                time,
            );
        }

        if let Some(bloom) = &self.bloom {
            bloom.update(
                &self.queue,
                params.bloom_intensity,
                params.bloom_luminance_threshold,
                params.bloom_luminance_smoothing,
            );
        }

        // Render
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        {
            let mut encoder = self
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Scene Encoder"),
                });

            {
                let scene_target = match &self.bloom {
                    Some(bloom) => bloom.scene_view(),
                    None => &view,
                };
                let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Scene Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: scene_target,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(clear_color()),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });

                if let Some(renderer) = &self.point_cloud {
                    renderer.draw(&mut render_pass);
                }
                if let Some(shell) = &self.shell {
                    shell.draw(&mut render_pass);
                }
            }

            if let Some(bloom) = &self.bloom {
                bloom.encode(&mut encoder, &view);
            }

            self.queue.submit(std::iter::once(encoder.finish()));
        }

        // Render GUI
        {
            let mut encoder = self
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("GUI Encoder"),
                });

            self.gui.render(
                &self.device,
                &self.queue,
                &mut encoder,
                window,
                &view,
                &mut self.store,
                &mut self.clock,
            );

            self.queue.submit(std::iter::once(encoder.finish()));
        }

        output.present();
        Ok((fps, avg_frame_time))
    }
}

struct App {
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window_attributes = Window::default_attributes()
                .with_title("Particle Explosion")
                .with_inner_size(winit::dpi::LogicalSize::new(1920, 1080));

            let window = Arc::new(event_loop.create_window(window_attributes).unwrap());
            self.window = Some(window.clone());
            self.gpu_state = Some(pollster::block_on(GpuState::new(window)));
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Handle GUI events
        if let (Some(gpu_state), Some(window)) = (&mut self.gpu_state, &self.window) {
            if gpu_state.gui.handle_event(window, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Space),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.clock.toggle_playing();
                }
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::KeyR),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.clock.trigger_reset();
                }
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if button == winit::event::MouseButton::Right {
                    self.mouse_pressed = state == ElementState::Pressed;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let Some(last_pos) = self.last_mouse_pos {
                        let delta_x = (position.x - last_pos.0) as f32;
                        let delta_y = (position.y - last_pos.1) as f32;

                        if let Some(gpu_state) = &mut self.gpu_state {
                            gpu_state.camera.rotate(-delta_x * 0.005, delta_y * 0.005);
                        }
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_x, y) => y * 10.0,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };

                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state
                        .camera
                        .zoom(-scroll * gpu_state.camera.distance / 100.0);
                }
            }

            WindowEvent::RedrawRequested => {
                if let (Some(window), Some(gpu_state)) = (&self.window, &mut self.gpu_state) {
                    match gpu_state.render(window) {
                        Ok((fps, frame_time)) => {
                            window.set_title(&format!(
                                "Particle Explosion - {:.0} FPS ({:.2}ms) - {} particles",
                                fps,
                                frame_time,
                                gpu_state.field.len()
                            ));
                        }
                        Err(wgpu::SurfaceError::Lost) => gpu_state.resize(window.inner_size()),
                        Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                        Err(e) => eprintln!("Render error: {:?}", e),
                    }
                }
            }

            _ => {}
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting particle explosion visualizer...");

    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        window: None,
        gpu_state: None,
        mouse_pressed: false,
        last_mouse_pos: None,
    };

    event_loop.run_app(&mut app).unwrap();
}

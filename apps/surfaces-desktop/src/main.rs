use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use surfaces_camera::{Camera, CameraMode};
use surfaces_common::{DemoConfig, SurfaceKind};
use surfaces_input::{Control, InputState};
use surfaces_render_wgpu::{FrameUniforms, WgpuRenderer};
use surfaces_surface::{InstanceTransform, SurfaceSampler};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

/// Trackpads report scroll in pixels; this many pixels count as one wheel notch.
const PIXELS_PER_LINE: f32 = 20.0;
const FPS_UPDATE_INTERVAL: f32 = 0.5;

#[derive(Parser)]
#[command(
    name = "surfaces-desktop",
    about = "Instanced cubes on animated mathematical surfaces"
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Camera mode: free_fly or ground_locked
    #[arg(long)]
    mode: Option<CameraMode>,

    /// Surface: plane, wave or torus
    #[arg(long)]
    surface: Option<SurfaceKind>,

    /// Cubes per grid side (even)
    #[arg(long)]
    resolution: Option<u32>,
}

impl Cli {
    fn load_config(&self) -> Result<DemoConfig> {
        let mut config = match &self.config {
            Some(path) => DemoConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => DemoConfig::default(),
        };
        if let Some(mode) = self.mode {
            config.camera.mode = mode;
        }
        if let Some(kind) = self.surface {
            config.surface.kind = kind;
        }
        if let Some(resolution) = self.resolution {
            config.surface.resolution = resolution;
        }
        config.validate()?;
        Ok(config)
    }
}

fn control_for(key: KeyCode) -> Option<Control> {
    match key {
        KeyCode::KeyW => Some(Control::Forward),
        KeyCode::KeyS => Some(Control::Backward),
        KeyCode::KeyA => Some(Control::Left),
        KeyCode::KeyD => Some(Control::Right),
        KeyCode::Space => Some(Control::Up),
        KeyCode::ControlLeft => Some(Control::Down),
        KeyCode::ShiftLeft => Some(Control::Boost),
        _ => None,
    }
}

/// Application state.
struct AppState {
    config: DemoConfig,
    camera: Camera,
    sampler: SurfaceSampler,
    input: InputState,
    instances: Vec<InstanceTransform>,
    start: Instant,
    elapsed: f32,
    show_hud: bool,
    cursor_captured: bool,
    // Frame rate readout
    fps: f32,
    fps_frames: u32,
    fps_timer: f32,
}

impl AppState {
    fn new(config: DemoConfig) -> Self {
        let camera = Camera::from_config(&config.camera);
        let sampler = SurfaceSampler::from_config(&config.surface);
        let instances = Vec::with_capacity(sampler.instance_count());
        Self {
            config,
            camera,
            sampler,
            input: InputState::new(),
            instances,
            start: Instant::now(),
            elapsed: 0.0,
            show_hud: true,
            cursor_captured: false,
            fps: 0.0,
            fps_frames: 0,
            fps_timer: 0.0,
        }
    }

    /// One frame tick: input first, then the surface for the current time.
    fn update(&mut self) {
        let now = self.start.elapsed().as_secs_f64();
        let dt = self.input.clock.tick(now);
        self.elapsed = now as f32;

        self.input.apply(&mut self.camera, dt);
        self.sampler
            .fill_transforms(self.elapsed, &mut self.instances);

        self.fps_frames += 1;
        self.fps_timer += dt;
        if self.fps_timer >= FPS_UPDATE_INTERVAL {
            self.fps = self.fps_frames as f32 / self.fps_timer;
            self.fps_frames = 0;
            self.fps_timer = 0.0;
        }
    }

    fn frame_uniforms(&self, width: u32, height: u32) -> FrameUniforms {
        let aspect = width as f32 / height.max(1) as f32;
        let projection = &self.config.projection;
        FrameUniforms {
            view: self.camera.view_matrix(),
            projection: self
                .camera
                .projection_matrix(aspect, projection.near, projection.far),
        }
    }

    /// Returns true when the key asks the application to quit.
    fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        if let Some(control) = control_for(key) {
            self.input.set_control(control, pressed);
        }

        if !pressed {
            return false;
        }

        match key {
            KeyCode::Escape => return true,
            KeyCode::F1 => {
                self.show_hud = !self.show_hud;
            }
            KeyCode::Tab => {
                let mode = self.camera.mode().toggled();
                self.camera.set_mode(mode);
                tracing::info!("camera mode: {mode}");
            }
            KeyCode::Digit1 | KeyCode::Digit2 | KeyCode::Digit3 => {
                let kind = match key {
                    KeyCode::Digit1 => SurfaceKind::Plane,
                    KeyCode::Digit2 => SurfaceKind::Wave,
                    _ => SurfaceKind::Torus,
                };
                self.sampler.set_kind(kind);
                tracing::info!("surface: {kind}");
            }
            _ => {}
        }
        false
    }

    fn draw_ui(&self, ctx: &EguiContext) {
        if !self.show_hud {
            return;
        }

        let camera = &self.camera;
        egui::Window::new("Mathematical Surfaces")
            .default_pos([12.0, 12.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!("FPS: {:.0}", self.fps));
                ui.label(format!(
                    "Surface: {}  ({} cubes)",
                    self.sampler.kind(),
                    self.instances.len()
                ));
                ui.label(format!("Time: {:.1}s", self.elapsed));
                ui.separator();
                let p = camera.position();
                ui.label(format!("Camera: ({:.1}, {:.1}, {:.1})", p.x, p.y, p.z));
                ui.label(format!(
                    "Yaw: {:.1}  Pitch: {:.1}  FOV: {:.0}",
                    camera.yaw(),
                    camera.pitch(),
                    camera.fov()
                ));
                ui.label(format!("Mode: {}", camera.mode()));
                ui.separator();
                ui.small("WASD: Move | Space/Ctrl: Up/Down | Shift: Boost");
                ui.small("Tab: Mode | 1-3: Surface | F1: HUD | Esc: Quit");
            });
    }
}

/// Window plus every GPU object tied to it.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(
        event_loop: &ActiveEventLoop,
        demo: &DemoConfig,
        egui_ctx: &EguiContext,
        max_instances: usize,
    ) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(demo.window.title.clone())
            .with_inner_size(PhysicalSize::new(demo.window.width, demo.window.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("surfaces_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no texture formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let max_instances =
            u32::try_from(max_instances).context("instance count does not fit in u32")?;
        let buffer_size = WgpuRenderer::instance_buffer_size(max_instances);
        let buffer_limit = device.limits().max_buffer_size;
        if buffer_size > buffer_limit {
            anyhow::bail!(
                "{max_instances} instances need a {buffer_size}-byte buffer, \
                 the device allows at most {buffer_limit}; lower the resolution"
            );
        }
        let renderer = WgpuRenderer::new(
            &device,
            surface_format,
            config.width,
            config.height,
            max_instances,
        );

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    /// Hide and lock the cursor for mouse look. Returns false when the
    /// platform refuses every grab mode.
    fn capture_cursor(&self) -> bool {
        let grabbed = self
            .window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
        self.window.set_cursor_visible(false);
        match grabbed {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("cursor grab unavailable, tracking cursor position instead: {e}");
                false
            }
        }
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.config.width = new_size.width.max(1);
        self.config.height = new_size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    fn render(&mut self, state: &AppState, egui_ctx: &EguiContext) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let frame = state.frame_uniforms(self.config.width, self.config.height);
        self.renderer
            .render(&self.device, &self.queue, &view, &frame, &state.instances);

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
    }
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
    startup_error: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(config: DemoConfig) -> Self {
        Self {
            state: AppState::new(config),
            gpu: None,
            egui_ctx: EguiContext::default(),
            startup_error: None,
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        match Gpu::new(
            event_loop,
            &self.state.config,
            &self.egui_ctx,
            self.state.sampler.instance_count(),
        ) {
            Ok(gpu) => {
                self.state.cursor_captured = gpu.capture_cursor();
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("startup failed: {e:#}");
                self.startup_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                gpu.resize(new_size);
            }
            WindowEvent::Focused(focused) => {
                if !focused {
                    self.state.input.release_all();
                }
                self.state.input.reset_cursor();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if self
                    .state
                    .handle_key(key, key_state == ElementState::Pressed)
                {
                    event_loop.exit();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if !self.state.cursor_captured {
                    self.state
                        .input
                        .cursor_moved(position.x as f32, position.y as f32);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
                };
                self.state.input.scroll(lines);
            }
            WindowEvent::RedrawRequested => {
                self.state.update();
                gpu.render(&self.state, &self.egui_ctx);
                gpu.window.request_redraw();
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.cursor_captured {
                self.state
                    .input
                    .mouse_motion(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = cli.load_config()?;
    tracing::info!(
        surface = %config.surface.kind,
        resolution = config.surface.resolution,
        mode = %config.camera.mode,
        "surfaces-desktop starting"
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(config);
    event_loop.run_app(&mut app)?;

    match app.startup_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_map_to_controls() {
        assert_eq!(control_for(KeyCode::KeyW), Some(Control::Forward));
        assert_eq!(control_for(KeyCode::ControlLeft), Some(Control::Down));
        assert_eq!(control_for(KeyCode::ShiftLeft), Some(Control::Boost));
        assert_eq!(control_for(KeyCode::KeyQ), None);
    }

    #[test]
    fn cli_flags_override_config() {
        let cli = Cli::parse_from([
            "surfaces-desktop",
            "--mode",
            "ground_locked",
            "--surface",
            "wave",
            "--resolution",
            "64",
        ]);
        let config = cli.load_config().unwrap();
        assert_eq!(config.camera.mode, CameraMode::GroundLocked);
        assert_eq!(config.surface.kind, SurfaceKind::Wave);
        assert_eq!(config.surface.resolution, 64);
    }

    #[test]
    fn odd_resolution_flag_is_rejected() {
        let cli = Cli::parse_from(["surfaces-desktop", "--resolution", "63"]);
        assert!(cli.load_config().is_err());
    }

    #[test]
    fn oversized_resolution_flag_is_rejected() {
        let cli = Cli::parse_from(["surfaces-desktop", "--resolution", "2100"]);
        assert!(cli.load_config().is_err());
    }

    #[test]
    fn keys_drive_state() {
        let mut state = AppState::new(DemoConfig::default());
        assert!(!state.handle_key(KeyCode::Tab, true));
        assert_eq!(state.camera.mode(), CameraMode::GroundLocked);
        state.handle_key(KeyCode::Digit1, true);
        assert_eq!(state.sampler.kind(), SurfaceKind::Plane);
        state.handle_key(KeyCode::KeyW, true);
        assert!(state.input.is_held(Control::Forward));
        state.handle_key(KeyCode::KeyW, false);
        assert!(!state.input.is_held(Control::Forward));
        assert!(state.handle_key(KeyCode::Escape, true));
    }

    #[test]
    fn update_fills_every_instance() {
        let mut config = DemoConfig::default();
        config.surface.resolution = 16;
        let mut state = AppState::new(config);
        state.update();
        assert_eq!(state.instances.len(), 256);
        let frame = state.frame_uniforms(1600, 900);
        assert!(frame.view.is_finite());
        assert!(frame.projection.is_finite());
    }
}

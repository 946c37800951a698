//! Window, event handling and the per-frame update / draw sequence.

use std::sync::Arc;

use orrery_config::Config;
use orrery_input::{Controls, InputMap, KeyboardState};
use orrery_render::{
    RenderContext, RendererSettings, SceneRenderer, SurfaceError, init_render_context_blocking,
};
use tracing::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::error::EventLoopError;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::game_loop::GameLoop;
use crate::state::SceneState;

/// Window attributes for the configured title, size and fullscreen mode.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    let attrs = WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ));
    if config.window.fullscreen {
        attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attrs
    }
}

/// Renderer settings drawn from the `render` and `assets` sections.
pub fn renderer_settings_from_config(config: &Config) -> RendererSettings {
    RendererSettings {
        texture_dir: config.assets.texture_dir.clone(),
        require_textures: config.assets.require_textures,
        ambient: config.render.ambient,
        orbit_color: config.render.orbit_color,
        clear_color: config.render.clear_color,
    }
}

/// The running application: window, GPU state and the scene.
pub struct OrreryApp {
    config: Config,
    state: SceneState,
    input_map: InputMap,
    keyboard: KeyboardState,
    game_loop: GameLoop,
    window: Option<Arc<Window>>,
    gpu: Option<RenderContext>,
    renderer: Option<SceneRenderer>,
    init_failed: bool,
}

impl OrreryApp {
    pub fn new(config: Config, state: SceneState, input_map: InputMap) -> Self {
        Self {
            config,
            state,
            input_map,
            keyboard: KeyboardState::new(),
            game_loop: GameLoop::new(),
            window: None,
            gpu: None,
            renderer: None,
            init_failed: false,
        }
    }

    /// Whether startup failed and the loop exited without drawing.
    pub fn init_failed(&self) -> bool {
        self.init_failed
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) {
        let attrs = window_attributes_from_config(&self.config);
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, &format!("Window creation failed: {e}"));
                return;
            }
        };

        let ctx = match init_render_context_blocking(window.clone(), self.config.window.vsync) {
            Ok(ctx) => ctx,
            Err(e) => {
                self.fail(event_loop, &format!("GPU initialization failed: {e}"));
                return;
            }
        };

        let settings = renderer_settings_from_config(&self.config);
        let renderer = match SceneRenderer::for_context(&ctx, &self.state.system, settings) {
            Ok(renderer) => renderer,
            Err(e) => {
                self.fail(event_loop, &format!("Renderer initialization failed: {e}"));
                return;
            }
        };
        info!(
            meshes = renderer.mesh_count(),
            textures = renderer.texture_count(),
            "Scene uploaded"
        );

        let (width, height) = ctx.size();
        self.state.resize(width, height);
        self.gpu = Some(ctx);
        self.renderer = Some(renderer);
        self.game_loop.reset_clock();
        window.request_redraw();
        self.window = Some(window);
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, message: &str) {
        error!("{message}");
        self.init_failed = true;
        event_loop.exit();
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.state.resize(width, height);
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(width, height);
            if let Some(renderer) = &mut self.renderer {
                let (w, h) = gpu.size();
                renderer.resize(&gpu.device, w, h);
            }
        }
        debug!("Window resized to {width}x{height}");
    }

    fn toggle_fullscreen(&self) {
        let Some(window) = &self.window else {
            return;
        };
        if window.fullscreen().is_some() {
            info!("Leaving fullscreen");
            window.set_fullscreen(None);
        } else {
            info!("Entering borderless fullscreen");
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let controls = Controls::resolve(
            &self.input_map,
            &self.keyboard,
            self.config.debug.always_show_orbits,
        );
        if controls.exit {
            info!("Exit requested");
            event_loop.exit();
            return;
        }
        if controls.toggle_fullscreen {
            self.toggle_fullscreen();
        }

        let state = &mut self.state;
        self.game_loop
            .tick(|dt, _| state.update(dt, &controls), |_| {});
        self.draw(event_loop);

        self.keyboard.clear_transients();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn draw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gpu), Some(renderer)) = (self.gpu.as_mut(), self.renderer.as_mut()) else {
            return;
        };
        let projection = self.state.projection.matrix();
        let plan = self.state.plan();

        match renderer.render(gpu, plan, projection) {
            Ok(()) => {}
            Err(SurfaceError::Lost) => {
                let (w, h) = gpu.size();
                gpu.resize(w, h);
            }
            Err(SurfaceError::OutOfMemory) => {
                error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(SurfaceError::Timeout) => {
                warn!("Surface timeout, skipping frame");
            }
        }
    }
}

impl ApplicationHandler for OrreryApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() && !self.init_failed {
            self.initialize(event_loop);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.resize(size.width, size.height);
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self.window.as_ref().map(|w| w.inner_size()) {
                    self.resize(size.width, size.height);
                }
            }
            WindowEvent::Focused(false) => {
                self.keyboard.release_all();
            }
            WindowEvent::Focused(true) => {
                self.game_loop.reset_clock();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.keyboard.process_event(&event);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }
}

/// Run `app` on a new event loop until the window closes.
pub fn run(app: &mut OrreryApp) -> Result<(), EventLoopError> {
    let event_loop = EventLoop::new()?;
    event_loop.run_app(app)
}

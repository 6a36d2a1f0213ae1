//! Window creation and event handling via winit.
//!
//! [`App`] implements winit's [`ApplicationHandler`]. The scene is built on
//! the first `resumed` call, texture loads start immediately, and every
//! `RedrawRequested` runs one [`RenderLoop`] tick.

use std::sync::Arc;

use cubeview_config::{CameraConfig, Config, TextureConfig};
use cubeview_cubemap::{CubeMapLoader, CubeMapSlot, LoadRequest};
use cubeview_input::{MouseState, OrbitCamera};
use cubeview_mesh::icosphere;
use cubeview_render::{
    Camera, RenderContext, SceneRenderer, SurfaceError, init_render_context_blocking,
};
use cubeview_shading::ShadingParameters;
use tracing::{error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::error::AppError;
use crate::reload::{ConfigWatcher, restart_required};
use crate::render_loop::{FrameSteps, RenderLoop};

/// One thread per cube-map slot.
const LOADER_THREADS: usize = 3;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// Projection camera for the configured field of view and clip planes.
pub fn camera_from_config(config: &CameraConfig, aspect_ratio: f32) -> Camera {
    let mut camera = Camera {
        eye: glam::Vec3::from_array(config.position),
        target: glam::Vec3::ZERO,
        aspect_ratio,
        ..Camera::default()
    };
    apply_projection(&mut camera, config);
    camera
}

/// Field of view and clip planes from `config`; eye, target and aspect stay.
pub fn apply_projection(camera: &mut Camera, config: &CameraConfig) {
    camera.fov_y = config.fov_y_degrees.to_radians();
    camera.near = config.near;
    camera.far = config.far;
}

/// The face sets a scene variant needs. The height map is always loaded
/// since it also paints the background.
pub fn load_requests(textures: &TextureConfig, params: &ShadingParameters<'_>) -> Vec<LoadRequest> {
    let request = |slot, prefix: &str| LoadRequest {
        slot,
        directory: textures.directory.clone(),
        prefix: prefix.to_string(),
        extension: textures.extension.clone(),
    };

    let mut requests = vec![request(CubeMapSlot::Height, &textures.height_prefix)];
    if params.uses_normal_map() {
        requests.push(request(CubeMapSlot::Normal, &textures.normal_prefix));
    }
    if params.uses_color_map() {
        requests.push(request(CubeMapSlot::Color, &textures.color_prefix));
    }
    requests
}

/// Everything that exists once the window does.
struct Scene {
    window: Arc<Window>,
    ctx: RenderContext,
    renderer: SceneRenderer,
    loader: CubeMapLoader,
    orbit: OrbitCamera,
    camera: Camera,
    mouse: MouseState,
}

impl Scene {
    fn create(event_loop: &ActiveEventLoop, config: &Config) -> Result<Self, AppError> {
        let window = Arc::new(event_loop.create_window(window_attributes_from_config(config))?);
        let ctx = init_render_context_blocking(window.clone(), config.window.vsync)?;
        let (width, height) = ctx.size();
        info!("Surface configured: {}x{} {:?}", width, height, ctx.surface_format);

        let mesh = icosphere(config.mesh.radius, config.mesh.detail);
        info!(
            "Icosphere built: radius {}, detail {}, {} vertices, {} triangles",
            mesh.radius,
            mesh.detail,
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        let params = ShadingParameters::from_config(&config.shading).with_radius(config.mesh.radius);
        let renderer = SceneRenderer::new(
            &ctx.device,
            &ctx.queue,
            ctx.surface_format,
            ctx.size(),
            &mesh,
            &params,
        );

        let loader = CubeMapLoader::new(LOADER_THREADS);
        for request in load_requests(&config.textures, &params) {
            info!(
                "Loading {:?} cube map {}/{}_*.{}",
                request.slot,
                request.directory.display(),
                request.prefix,
                request.extension
            );
            loader.submit(request);
        }

        let orbit = OrbitCamera::from_config(&config.camera);
        let mut camera = camera_from_config(&config.camera, ctx.aspect_ratio());
        camera.eye = orbit.eye();
        camera.target = orbit.target;

        Ok(Self {
            window,
            ctx,
            renderer,
            loader,
            orbit,
            camera,
            mouse: MouseState::new(),
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
        let (w, h) = self.ctx.size();
        self.renderer.resize(&self.ctx.device, w, h);
        self.camera.set_aspect_ratio(w, h);
        info!("Window resized to {}x{}", w, h);
    }

    /// Apply the live part of a reloaded config.
    fn apply_config(&mut self, current: &Config, new: &Config) {
        self.orbit.apply_config(&new.camera);
        apply_projection(&mut self.camera, &new.camera);
        self.camera.eye = self.orbit.eye();
        info!("Camera settings reloaded");

        let pending = restart_required(current, new);
        if !pending.is_empty() {
            warn!("Config sections {:?} changed; restart to apply them", pending);
        }
    }
}

impl FrameSteps for Scene {
    type Error = SurfaceError;

    fn drain_loads(&mut self) {
        for loaded in self.loader.drain_completed() {
            let missing = loaded.set.missing_faces();
            if missing.is_empty() {
                info!("{:?} cube map loaded", loaded.slot);
            } else {
                let names: Vec<&str> = missing.iter().map(|f| f.suffix()).collect();
                warn!(
                    "{:?} cube map incomplete, missing faces {:?} sample as zero",
                    loaded.slot, names
                );
            }
            if let Err(e) = self
                .renderer
                .set_cube_map(&self.ctx.device, &self.ctx.queue, loaded.slot, &loaded.set)
            {
                warn!("{:?} cube map not uploaded, keeping the previous one: {e}", loaded.slot);
            }
        }
    }

    fn update_input(&mut self) {
        let (_, height) = self.ctx.size();
        if self.orbit.update(&self.mouse, height as f32) {
            self.camera.eye = self.orbit.eye();
            self.camera.target = self.orbit.target;
        }
        self.mouse.clear_transients();
    }

    fn draw(&mut self) -> Result<(), SurfaceError> {
        self.renderer.render(&self.ctx, &self.camera)
    }

    fn request_next(&mut self) {
        self.window.request_redraw();
    }
}

/// winit application state.
pub struct App {
    config: Config,
    watcher: Option<ConfigWatcher>,
    scene: Option<Scene>,
    render_loop: RenderLoop,
    startup_error: Option<AppError>,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            watcher: None,
            scene: None,
            render_loop: RenderLoop::new(),
            startup_error: None,
        }
    }

    /// Follow edits to the config file while running.
    pub fn with_config_watcher(mut self, watcher: ConfigWatcher) -> Self {
        self.watcher = Some(watcher);
        self
    }

    /// Ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.render_loop.tick_count()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.scene.is_some() {
            return;
        }
        match Scene::create(event_loop, &self.config) {
            Ok(scene) => {
                scene.window.request_redraw();
                self.scene = Some(scene);
            }
            Err(e) => {
                error!("Startup failed: {e}");
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
        let Some(scene) = &mut self.scene else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                scene.resize(new_size.width, new_size.height);
            }
            WindowEvent::CursorMoved { position, .. } => {
                scene.mouse.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                scene.mouse.on_button(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                scene.mouse.on_scroll(delta);
            }
            WindowEvent::CursorLeft { .. } => {
                scene.mouse.on_cursor_left();
            }
            WindowEvent::RedrawRequested => {
                if let Some(new) = self.watcher.as_mut().and_then(ConfigWatcher::poll) {
                    scene.apply_config(&self.config, &new);
                    self.config = new;
                }
                match self.render_loop.tick(scene) {
                    Ok(()) => {}
                    Err(SurfaceError::Lost) => {
                        let (w, h) = scene.ctx.size();
                        scene.ctx.resize(w, h);
                    }
                    Err(SurfaceError::OutOfMemory) => {
                        error!("GPU out of memory");
                        event_loop.exit();
                    }
                    Err(SurfaceError::Timeout) => {
                        warn!("Surface timeout, skipping frame");
                    }
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(scene) = &self.scene {
            info!(
                "Exiting after {} ticks ({} frames presented, {:.1}s)",
                self.render_loop.tick_count(),
                scene.renderer.frames_rendered(),
                self.render_loop.elapsed_secs()
            );
        }
    }
}

/// Creates an event loop and runs the viewer until the window closes,
/// applying config edits reported by `watcher`.
///
/// Returns the startup error if the window or GPU could not be initialized.
#[instrument(skip_all)]
pub fn run(config: Config, watcher: ConfigWatcher) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config).with_config_watcher(watcher);
    event_loop.run_app(&mut app)?;
    app.startup_error.take().map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubeview_config::ShadingPreset;

    fn slots(preset: ShadingPreset) -> Vec<CubeMapSlot> {
        let params = ShadingParameters::from_preset(preset);
        load_requests(&TextureConfig::default(), &params)
            .into_iter()
            .map(|r| r.slot)
            .collect()
    }

    #[test]
    fn test_biome_loads_all_three_maps() {
        assert_eq!(
            slots(ShadingPreset::Biome),
            [CubeMapSlot::Height, CubeMapSlot::Normal, CubeMapSlot::Color]
        );
    }

    #[test]
    fn test_grayscale_presets_skip_color() {
        assert_eq!(
            slots(ShadingPreset::Relief),
            [CubeMapSlot::Height, CubeMapSlot::Normal]
        );
        assert_eq!(
            slots(ShadingPreset::Flat),
            [CubeMapSlot::Height, CubeMapSlot::Normal]
        );
    }

    #[test]
    fn test_passthrough_loads_background_only() {
        assert_eq!(slots(ShadingPreset::Passthrough), [CubeMapSlot::Height]);
    }

    #[test]
    fn test_requests_use_configured_prefixes() {
        let textures = TextureConfig::default();
        let params = ShadingParameters::from_preset(ShadingPreset::Biome);
        let requests = load_requests(&textures, &params);
        assert_eq!(requests[0].prefix, textures.height_prefix);
        assert_eq!(requests[1].prefix, textures.normal_prefix);
        assert_eq!(requests[2].prefix, textures.color_prefix);
        assert!(requests.iter().all(|r| r.directory == textures.directory));
        assert!(requests.iter().all(|r| r.extension == textures.extension));
    }

    #[test]
    fn test_camera_from_default_config() {
        let camera = camera_from_config(&CameraConfig::default(), 16.0 / 9.0);
        assert_eq!(camera.eye, glam::Vec3::new(0.0, 15.0, 15.0));
        assert_eq!(camera.target, glam::Vec3::ZERO);
        assert!((camera.fov_y - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(camera.near, 0.001);
        assert_eq!(camera.far, 100.0);
    }

    #[test]
    fn test_window_attributes_from_config() {
        let config = Config::default();
        let attrs = window_attributes_from_config(&config);
        assert_eq!(attrs.title, config.window.title);
    }

    #[test]
    fn test_new_app_has_no_ticks() {
        let app = App::new(Config::default());
        assert!(app.scene.is_none());
        assert_eq!(app.tick_count(), 0);
    }

    #[test]
    fn test_projection_follows_reloaded_camera() {
        let mut camera = camera_from_config(&CameraConfig::default(), 2.0);
        camera.eye = glam::Vec3::new(1.0, 2.0, 3.0);
        let config = CameraConfig {
            fov_y_degrees: 60.0,
            near: 0.5,
            far: 50.0,
            ..CameraConfig::default()
        };
        apply_projection(&mut camera, &config);
        assert!((camera.fov_y - 60f32.to_radians()).abs() < 1e-6);
        assert_eq!((camera.near, camera.far), (0.5, 50.0));
        assert_eq!(camera.eye, glam::Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.aspect_ratio, 2.0);
    }

    #[test]
    fn test_app_holds_config_watcher() {
        let tmp = tempfile::tempdir().unwrap();
        let watcher = ConfigWatcher::new(
            tmp.path().to_path_buf(),
            Config::default(),
            cubeview_config::CliArgs::default(),
        );
        let app = App::new(Config::default()).with_config_watcher(watcher);
        assert!(app.watcher.is_some());
    }
}

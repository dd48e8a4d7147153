use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use treemap_view::app::App;
use treemap_view::config::Config;
use treemap_view::render::RenderState;
use treemap_view::ui::input::{self, InputAction};

/// Main application handler for winit's event loop.
struct TreemapViewer {
    app: App,
    render_state: Option<RenderState>,
    window: Option<Arc<Window>>,
}

impl TreemapViewer {
    fn new(app: App) -> Self {
        Self {
            app,
            render_state: None,
            window: None,
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn update_window_title(&self) {
        let Some(window) = &self.window else {
            return;
        };
        let name = self
            .app
            .data_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        window.set_title(&format!("Treemap - {} ({} items)", name, self.app.items.len()));
    }

    fn handle_action(&mut self, event_loop: &ActiveEventLoop, action: InputAction) {
        match action {
            InputAction::Quit => event_loop.exit(),
            InputAction::ToggleLabels => {
                self.app.toggle_labels();
                self.request_redraw();
            }
            InputAction::Reload => {
                match self.app.reload() {
                    Ok(()) => tracing::info!("Reloaded {}", self.app.data_path.display()),
                    Err(e) => tracing::error!("Reload failed: {:#}", e),
                }
                self.update_window_title();
                self.request_redraw();
            }
            InputAction::None => {}
        }
    }
}

impl ApplicationHandler for TreemapViewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title("Treemap")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.app.config.view.window_width,
                self.app.config.view.window_height,
            ));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        // Initialize GPU rendering
        match pollster::block_on(RenderState::new(window.clone())) {
            Ok(state) => {
                let size = window.inner_size();
                tracing::info!(
                    "Window initialized: scale_factor={:.3}, physical_size={}x{}",
                    window.scale_factor(),
                    size.width,
                    size.height
                );
                self.app.resize(size.width, size.height);
                self.render_state = Some(state);
                self.update_window_title();
                window.request_redraw();
            }
            Err(e) => {
                tracing::error!("Failed to initialize GPU: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(render) = &mut self.render_state {
                    render.resize(size.width, size.height);
                }
                self.app.resize(size.width, size.height);
                self.request_redraw();
            }

            WindowEvent::CursorMoved { position, .. } => {
                let changed = self.app.cursor_moved(position.x as f32, position.y as f32);
                // The tooltip follows the cursor, so any move over a box redraws.
                if changed || self.app.hover_id.is_some() {
                    self.request_redraw();
                }
            }

            WindowEvent::CursorLeft { .. } => {
                if self.app.cursor_left() {
                    self.request_redraw();
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let action = input::process_key(event.logical_key.clone(), event.state);
                self.handle_action(event_loop, action);
            }

            WindowEvent::RedrawRequested => {
                if self.app.needs_relayout {
                    self.app.relayout();
                }

                self.app.rebuild_scene();

                if let Some(render) = &mut self.render_state {
                    let base = self.app.config.theme.container_background.to_peniko();
                    if let Err(e) = render.render(&self.app.scene, base) {
                        tracing::error!("Render error: {:#}", e);
                    }
                }
            }

            _ => {}
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("treemap_view=info".parse()?),
        )
        .init();

    // Command line: [DATA.json] [CONFIG.toml]
    let mut args = std::env::args().skip(1);
    let data_path = match args.next() {
        Some(path) => PathBuf::from(path),
        None => rfd::FileDialog::new()
            .set_title("Open treemap data")
            .add_filter("JSON", &["json"])
            .pick_file()
            .context("no data file given")?,
    };
    let config_path = args.next().map(PathBuf::from);
    let config = Config::load(config_path.as_deref());

    tracing::info!("Treemap viewer starting, data: {}", data_path.display());
    let app = App::open(data_path, config)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut viewer = TreemapViewer::new(app);
    event_loop.run_app(&mut viewer)?;

    Ok(())
}

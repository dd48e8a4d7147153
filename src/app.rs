use std::path::PathBuf;

use anyhow::Result;
use compact_str::CompactString;
use vello::Scene;

use crate::config::Config;
use crate::data::{self, DataItem};
use crate::layout::{self, Layout};
use crate::render::scene::{build_scene, HoverState};
use crate::render::text::{TextRenderer, DEFAULT_FONT};
use crate::ui::input::{self, MouseState};

/// Top-level application state.
pub struct App {
    pub data_path: PathBuf,
    pub config: Config,

    // Data
    pub items: Vec<DataItem>,
    pub layout: Layout,
    pub text_renderer: TextRenderer,

    // UI state
    pub mouse: MouseState,
    /// Id of the hovered item; survives relayouts.
    pub hover_id: Option<CompactString>,

    // Rendering
    pub scene: Scene,
    pub needs_relayout: bool,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl App {
    pub fn new(data_path: PathBuf, config: Config, items: Vec<DataItem>) -> Self {
        let mut text_renderer = TextRenderer::new();
        let font_loaded = match &config.theme.font_path {
            Some(path) => match text_renderer.load_font_from_path(DEFAULT_FONT, path) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Failed to load theme font: {:#}", e);
                    false
                }
            },
            None => false,
        };
        if !font_loaded && text_renderer.load_system_font(DEFAULT_FONT).is_err() {
            tracing::warn!("Failed to load a system font, labels and tooltip text will not be drawn");
        }

        Self {
            data_path,
            viewport_width: config.view.window_width as f32,
            viewport_height: config.view.window_height as f32,
            config,
            items,
            layout: Layout::default(),
            text_renderer,
            mouse: MouseState::default(),
            hover_id: None,
            scene: Scene::new(),
            needs_relayout: true,
        }
    }

    /// Load the data file and build the app around it.
    pub fn open(data_path: PathBuf, config: Config) -> Result<Self> {
        let items = data::load_records(&data_path, &config.data)?;
        Ok(Self::new(data_path, config, items))
    }

    /// Re-read the data file. On failure the current data stays on screen.
    pub fn reload(&mut self) -> Result<()> {
        self.items = data::load_records(&self.data_path, &self.config.data)?;
        self.needs_relayout = true;
        Ok(())
    }

    /// Recompute the whole layout for the current viewport.
    pub fn relayout(&mut self) {
        self.layout = layout::compute_layout(
            &self.items,
            self.viewport_width as f64,
            self.viewport_height as f64,
        );
        tracing::info!(
            "Layout computed: {} rectangles for {} items in {}x{}",
            self.layout.rects.len(),
            self.items.len(),
            self.viewport_width,
            self.viewport_height
        );
        self.needs_relayout = false;
        self.refresh_hover();
    }

    /// Handle viewport resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport_width = width as f32;
        self.viewport_height = height as f32;
        self.needs_relayout = true;
    }

    /// Track the cursor; returns true when the hovered item changed.
    pub fn cursor_moved(&mut self, x: f32, y: f32) -> bool {
        self.mouse.x = x;
        self.mouse.y = y;
        self.mouse.inside = true;
        self.refresh_hover()
    }

    /// Cursor left the window; returns true when something was hovered.
    pub fn cursor_left(&mut self) -> bool {
        self.mouse.inside = false;
        self.hover_id.take().is_some()
    }

    pub fn toggle_labels(&mut self) {
        self.config.view.show_labels = !self.config.view.show_labels;
    }

    /// Index into `layout.rects` of the hovered item.
    pub fn hovered_rect(&self) -> Option<usize> {
        self.hover_id
            .as_deref()
            .and_then(|id| self.layout.index_by_id.get(id).copied())
    }

    fn refresh_hover(&mut self) -> bool {
        let new_hover = if self.mouse.inside {
            input::hit_test(&self.layout.rects, self.mouse.x, self.mouse.y)
                .and_then(|i| self.layout.rects.get(i))
                .and_then(|rect| self.items.get(rect.key))
                .map(|item| item.id.clone())
        } else {
            None
        };
        if new_hover != self.hover_id {
            self.hover_id = new_hover;
            true
        } else {
            false
        }
    }

    /// Rebuild the Vello scene from the current layout.
    pub fn rebuild_scene(&mut self) {
        let hover = HoverState {
            rect: self.hovered_rect(),
            mouse: (self.mouse.x, self.mouse.y),
        };
        build_scene(
            &mut self.scene,
            &self.layout,
            &self.items,
            &self.config,
            hover,
            &mut self.text_renderer,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(values: &[(&str, f64)]) -> App {
        let items = values.iter().map(|&(id, v)| DataItem::new(id, v)).collect();
        let mut config = Config::default();
        config.view.window_width = 200;
        config.view.window_height = 100;
        App::new(PathBuf::from("data.json"), config, items)
    }

    #[test]
    fn relayout_fills_viewport() {
        let mut app = app(&[("a", 3.0), ("b", 1.0)]);
        assert!(app.needs_relayout);
        app.relayout();
        assert!(!app.needs_relayout);
        assert_eq!(app.layout.rects.len(), 2);
        assert!((app.layout.total_area() - 20_000.0).abs() < 1e-6);
    }

    #[test]
    fn resize_replaces_layout_wholesale() {
        let mut app = app(&[("a", 3.0), ("b", 1.0)]);
        app.relayout();
        app.resize(400, 400);
        assert!(app.needs_relayout);
        app.relayout();
        assert!((app.layout.total_area() - 160_000.0).abs() < 1e-6);

        app.resize(0, 400);
        app.relayout();
        assert!(app.layout.rects.is_empty());
    }

    #[test]
    fn hover_tracks_item_under_cursor() {
        let mut app = app(&[("a", 3.0), ("b", 1.0)]);
        app.relayout();

        let a = app.layout.rect_for("a").unwrap().clone();
        assert!(app.cursor_moved((a.x + 1.0) as f32, (a.y + 1.0) as f32));
        assert_eq!(app.hover_id.as_deref(), Some("a"));
        assert_eq!(app.hovered_rect(), app.layout.index_by_id.get("a").copied());

        // Same item again: no change.
        assert!(!app.cursor_moved((a.x + 2.0) as f32, (a.y + 2.0) as f32));

        assert!(app.cursor_left());
        assert_eq!(app.hover_id, None);
        assert!(!app.cursor_left());
    }

    #[test]
    fn toggling_labels_flips_config() {
        let mut app = app(&[("a", 1.0)]);
        let before = app.config.view.show_labels;
        app.toggle_labels();
        assert_eq!(app.config.view.show_labels, !before);
        app.relayout();
        app.rebuild_scene();
    }

    #[test]
    fn reload_failure_keeps_current_items() {
        let mut app = app(&[("a", 1.0)]);
        app.data_path = PathBuf::from("/definitely/missing/data.json");
        assert!(app.reload().is_err());
        assert_eq!(app.items.len(), 1);
    }
}

use std::sync::Arc;

use vello::kurbo::{Affine, Rect, RoundedRect, Stroke};
use vello::peniko::{Blob, Fill, Image, ImageFormat, Mix};
use vello::Scene;

use super::colors::AppColor;
use super::text::{TextRenderResult, TextRenderer, DEFAULT_FONT};
use crate::config::Config;
use crate::data::DataItem;
use crate::layout::Layout;
use crate::ui::node::{content_lines, node_visual, NodeVisual};
use crate::ui::tooltip::{build_tooltip, place_tooltip, TooltipInfo, ESTIMATED_SIZE, MIN_WIDTH};

/// Interaction state the scene depends on.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoverState {
    /// Index into `Layout::rects`
    pub rect: Option<usize>,
    pub mouse: (f32, f32),
}

/// Build a Vello scene: container background, one box per rect, then the
/// tooltip for the hovered box on top.
pub fn build_scene(
    scene: &mut Scene,
    layout: &Layout,
    items: &[DataItem],
    config: &Config,
    hover: HoverState,
    text_renderer: &mut TextRenderer,
) {
    scene.reset();

    let theme = &config.theme;
    let container = Rect::new(0.0, 0.0, layout.width, layout.height);
    scene.fill(
        Fill::NonZero,
        Affine::IDENTITY,
        theme.container_background.to_peniko(),
        None,
        &container,
    );

    let mut drawn = 0usize;
    for (idx, rect) in layout.rects.iter().enumerate() {
        let Some(item) = items.get(rect.key) else {
            continue;
        };
        let hovered = hover.rect == Some(idx);
        let Some(visual) = node_visual(
            rect,
            item,
            hovered,
            config.view.positive_threshold,
            config.view.gap,
            theme,
        ) else {
            continue;
        };

        draw_node(scene, &visual);
        if config.view.show_labels && visual.show_content {
            draw_node_content(scene, &visual, item, theme.node_text, theme.node_font_size, text_renderer);
        }
        drawn += 1;
    }
    tracing::trace!("Scene: drew {} of {} boxes", drawn, layout.rects.len());

    let hovered_item = hover
        .rect
        .and_then(|i| layout.rects.get(i))
        .and_then(|rect| items.get(rect.key));
    if let Some(item) = hovered_item {
        let info = build_tooltip(item, &config.view.tooltip_fields);
        draw_tooltip(
            scene,
            &info,
            hover.mouse,
            [0.0, 0.0, layout.width as f32, layout.height as f32],
            config,
            text_renderer,
        );
    }
}

fn draw_node(scene: &mut Scene, visual: &NodeVisual) {
    let shape = Rect::new(
        visual.x as f64,
        visual.y as f64,
        (visual.x + visual.w) as f64,
        (visual.y + visual.h) as f64,
    );
    scene.fill(Fill::NonZero, Affine::IDENTITY, visual.fill.to_peniko(), None, &shape);

    // Border sits inside the box.
    let bw = visual.border_width.min(visual.w / 2.0).min(visual.h / 2.0) as f64;
    if bw > 0.0 {
        let inset = shape.inset(-bw / 2.0);
        scene.stroke(
            &Stroke::new(bw),
            Affine::IDENTITY,
            visual.border.to_peniko(),
            None,
            &inset,
        );
    }
}

fn draw_node_content(
    scene: &mut Scene,
    visual: &NodeVisual,
    item: &DataItem,
    color: AppColor,
    font_size: f32,
    text_renderer: &mut TextRenderer,
) {
    let pad = 4.0;
    let max_text_w = visual.w - pad * 2.0;
    if max_text_w <= 0.0 {
        return;
    }

    let rendered: Vec<TextRenderResult> = content_lines(item)
        .iter()
        .map(|line| truncate_label(line, max_text_w, font_size))
        .filter(|line| !line.is_empty())
        .filter_map(|line| text_renderer.render_text(&line, DEFAULT_FONT, font_size, None, color))
        .collect();
    if rendered.is_empty() {
        return;
    }

    let line_gap = 2.0;
    let block_h: f32 = rendered.iter().map(|r| r.height as f32).sum::<f32>()
        + line_gap * (rendered.len() - 1) as f32;

    let clip = Rect::new(
        visual.x as f64,
        visual.y as f64,
        (visual.x + visual.w) as f64,
        (visual.y + visual.h) as f64,
    );
    scene.push_layer(Mix::Clip, 1.0, Affine::IDENTITY, &clip);
    let mut ty = visual.y + (visual.h - block_h).max(pad) / 2.0;
    for text in rendered {
        let tx = visual.x + ((visual.w - text.width as f32) / 2.0).max(pad);
        let h = text.height as f32;
        draw_text_to_scene(scene, text, tx, ty);
        ty += h + line_gap;
    }
    scene.pop_layer();
}

fn draw_tooltip(
    scene: &mut Scene,
    info: &TooltipInfo,
    mouse: (f32, f32),
    container: [f32; 4],
    config: &Config,
    text_renderer: &mut TextRenderer,
) {
    let theme = &config.theme;
    let (pad_y, pad_x) = theme.tooltip_padding;
    let line_gap = 3.0;

    let measured: Option<Vec<(f32, f32)>> = info
        .lines
        .iter()
        .map(|line| text_renderer.measure(line, DEFAULT_FONT, theme.tooltip_font_size))
        .collect();
    let size = match &measured {
        Some(lines) if !lines.is_empty() => {
            let text_w = lines.iter().map(|&(w, _)| w).fold(0.0, f32::max);
            let text_h: f32 = lines.iter().map(|&(_, h)| h).sum::<f32>()
                + line_gap * (lines.len() - 1) as f32;
            ((text_w + pad_x * 2.0).max(MIN_WIDTH), text_h + pad_y * 2.0)
        }
        _ => ESTIMATED_SIZE,
    };

    let (x, y) = place_tooltip(mouse, size, container);
    let bounds = Rect::new(x as f64, y as f64, (x + size.0) as f64, (y + size.1) as f64);
    let radius = theme.tooltip_border_radius as f64;

    scene.draw_blurred_rounded_rect(
        Affine::translate((0.0, theme.tooltip_shadow_offset as f64)),
        bounds,
        theme.tooltip_shadow.to_peniko(),
        radius,
        theme.tooltip_shadow_blur as f64 / 2.0,
    );
    let shape = RoundedRect::from_rect(bounds, radius);
    scene.fill(
        Fill::NonZero,
        Affine::IDENTITY,
        theme.tooltip_background.to_peniko(),
        None,
        &shape,
    );
    if theme.node_border_width > 0.0 {
        scene.stroke(
            &Stroke::new(theme.node_border_width as f64),
            Affine::IDENTITY,
            theme.tooltip_border.to_peniko(),
            None,
            &shape,
        );
    }

    let mut ty = y + pad_y;
    for (i, line) in info.lines.iter().enumerate() {
        let line_h = measured
            .as_ref()
            .and_then(|m| m.get(i))
            .map(|&(_, h)| h)
            .unwrap_or(theme.tooltip_font_size);
        if let Some(text) = text_renderer.render_text(
            line,
            DEFAULT_FONT,
            theme.tooltip_font_size,
            None,
            theme.tooltip_text,
        ) {
            draw_text_to_scene(scene, text, x + pad_x, ty);
        }
        ty += line_h + line_gap;
    }
}

/// Draw rendered text to a Vello scene.
fn draw_text_to_scene(scene: &mut Scene, text_result: TextRenderResult, x: f32, y: f32) {
    for glyph in text_result.glyphs {
        if glyph.bitmap.is_empty() {
            continue;
        }

        let glyph_image = Image::new(
            Blob::new(Arc::new(glyph.bitmap)),
            ImageFormat::Rgba8,
            glyph.width as u32,
            glyph.height as u32,
        );

        let transform = Affine::translate((x as f64 + glyph.x as f64, y as f64 + glyph.y as f64));
        scene.draw_image(&glyph_image, transform);
    }
}

/// Shorten `text` with a trailing "..." so it fits `max_width` at `font_size`.
/// Returns an empty string when not even "..." fits.
fn truncate_label(text: &str, max_width: f32, font_size: f32) -> String {
    let approx_char_w = (font_size * 0.58).max(1.0);
    let max_chars = (max_width / approx_char_w) as usize;
    if max_chars < 3 {
        return String::new();
    }
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 3 {
        return "...".to_string();
    }
    let truncated: String = text.chars().take(max_chars - 3).collect();
    format!("{}...", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_layout;

    #[test]
    fn truncation_keeps_short_labels() {
        assert_eq!(truncate_label("ID: a", 200.0, 12.0), "ID: a");
        assert_eq!(truncate_label("Val: 123456.00", 40.0, 10.0), "Val...");
        assert_eq!(truncate_label("anything", 10.0, 12.0), "");
    }

    #[test]
    fn builds_scene_without_fonts() {
        let items = vec![DataItem::new("a", 3.0), DataItem::new("b", 1.0)];
        let layout = compute_layout(&items, 400.0, 300.0);
        let mut scene = Scene::new();
        let mut text = TextRenderer::new();
        let hover = HoverState {
            rect: Some(0),
            mouse: (10.0, 10.0),
        };

        build_scene(&mut scene, &layout, &items, &Config::default(), hover, &mut text);
        // Rebuilding replaces the previous content.
        build_scene(&mut scene, &layout, &items, &Config::default(), HoverState::default(), &mut text);
    }
}

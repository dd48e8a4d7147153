use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};
use fontdue::Font;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use super::colors::AppColor;

pub const DEFAULT_FONT: &str = "default";

pub struct TextRenderer {
    fonts: HashMap<String, Font>,
    layout: Layout,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self {
            fonts: HashMap::new(),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }

    pub fn has_font(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    pub fn load_font_from_path(&mut self, name: &str, path: &Path) -> Result<()> {
        let font_data =
            std::fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
        let font = Font::from_bytes(font_data, fontdue::FontSettings::default())
            .map_err(|e| anyhow!("parsing font {}: {}", path.display(), e))?;
        self.fonts.insert(name.to_string(), font);
        tracing::info!("Loaded text font from {}", path.display());
        Ok(())
    }

    pub fn load_system_font(&mut self, name: &str) -> Result<()> {
        let mut candidates: Vec<PathBuf> = Vec::new();

        if let Ok(windir) = std::env::var("WINDIR") {
            candidates.push(PathBuf::from(format!("{windir}\\Fonts\\segoeui.ttf")));
            candidates.push(PathBuf::from(format!("{windir}\\Fonts\\arial.ttf")));
        }
        candidates.push(PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"));
        candidates.push(PathBuf::from("/usr/share/fonts/TTF/DejaVuSans.ttf"));
        candidates.push(PathBuf::from("/usr/share/fonts/dejavu/DejaVuSans.ttf"));
        candidates.push(PathBuf::from("/System/Library/Fonts/Supplemental/Arial.ttf"));
        candidates.push(PathBuf::from("/Library/Fonts/Arial.ttf"));

        for path in candidates {
            if self.load_font_from_path(name, &path).is_ok() {
                return Ok(());
            }
        }

        Err(anyhow!("unable to load a system font from known locations"))
    }

    /// Lay out `text` and report its size without rasterizing.
    pub fn measure(&mut self, text: &str, font_name: &str, font_size: f32) -> Option<(f32, f32)> {
        let font = self.fonts.get(font_name)?;
        self.layout.reset(&LayoutSettings::default());
        self.layout.append(&[font], &TextStyle::new(text, font_size, 0));

        let width = self
            .layout
            .glyphs()
            .iter()
            .map(|g| g.x + g.width as f32)
            .fold(0.0, f32::max);
        Some((width, self.layout.height()))
    }

    /// Rasterize `text` into RGBA glyph bitmaps tinted with `color`.
    pub fn render_text(
        &mut self,
        text: &str,
        font_name: &str,
        font_size: f32,
        max_width: Option<f32>,
        color: AppColor,
    ) -> Option<TextRenderResult> {
        let font = self.fonts.get(font_name)?;

        self.layout.reset(&LayoutSettings {
            max_width,
            ..Default::default()
        });
        self.layout.append(&[font], &TextStyle::new(text, font_size, 0));

        let [r, g, b, a] = color.to_rgba8();
        let mut glyphs = Vec::new();
        let mut width: f32 = 0.0;
        let mut height: f32 = 0.0;

        for glyph in self.layout.glyphs() {
            let (metrics, bitmap) = font.rasterize_config(GlyphRasterConfig {
                glyph_index: glyph.key.glyph_index,
                px: font_size,
                font_hash: 0,
            });

            // Coverage becomes alpha, scaled by the color's own alpha.
            let mut rgba_bitmap = Vec::with_capacity(bitmap.len() * 4);
            for &coverage in &bitmap {
                rgba_bitmap.extend_from_slice(&[r, g, b, ((coverage as u16 * a as u16) / 255) as u8]);
            }

            let right = glyph.x + metrics.width as f32;
            let bottom = glyph.y + metrics.height as f32;
            width = width.max(right);
            height = height.max(bottom);

            glyphs.push(TextGlyph {
                x: glyph.x,
                y: glyph.y,
                width: metrics.width,
                height: metrics.height,
                bitmap: rgba_bitmap,
            });
        }

        if glyphs.is_empty() {
            return None;
        }

        Some(TextRenderResult {
            glyphs,
            width: width.ceil() as u32,
            height: height.ceil() as u32,
        })
    }
}

pub struct TextRenderResult {
    pub glyphs: Vec<TextGlyph>,
    pub width: u32,
    pub height: u32,
}

pub struct TextGlyph {
    pub x: f32,
    pub y: f32,
    pub width: usize,
    pub height: usize,
    pub bitmap: Vec<u8>, // RGBA format
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_font_renders_nothing() {
        let mut text = TextRenderer::new();
        assert!(!text.has_font(DEFAULT_FONT));
        assert!(text.measure("hello", DEFAULT_FONT, 12.0).is_none());
        assert!(text
            .render_text("hello", DEFAULT_FONT, 12.0, None, AppColor::new(0.0, 0.0, 0.0))
            .is_none());
    }

    #[test]
    fn unreadable_font_file_is_an_error() {
        let mut text = TextRenderer::new();
        let dir = tempfile::tempdir().unwrap();
        assert!(text
            .load_font_from_path(DEFAULT_FONT, &dir.path().join("missing.ttf"))
            .is_err());
        assert!(!text.has_font(DEFAULT_FONT));
    }
}

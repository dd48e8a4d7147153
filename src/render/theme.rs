use std::path::PathBuf;

use serde::Deserialize;

use super::colors::{parse_color, AppColor};

/// Every style knob of the treemap: container, boxes and tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct TreemapTheme {
    // Container
    pub container_background: AppColor,
    /// TTF/OTF file for labels; system font candidates are tried when unset.
    pub font_path: Option<PathBuf>,

    // Node
    pub node_default_background: AppColor,
    pub node_positive_background: AppColor,
    pub node_negative_background: AppColor,
    pub node_border: AppColor,
    pub node_border_width: f32,
    pub node_hover_border: AppColor,
    pub node_hover_background: Option<AppColor>,
    pub node_text: AppColor,
    pub node_font_size: f32,

    // Tooltip
    pub tooltip_background: AppColor,
    pub tooltip_border: AppColor,
    pub tooltip_border_radius: f32,
    pub tooltip_shadow: AppColor,
    pub tooltip_shadow_offset: f32,
    pub tooltip_shadow_blur: f32,
    pub tooltip_text: AppColor,
    pub tooltip_font_size: f32,
    /// Vertical, horizontal
    pub tooltip_padding: (f32, f32),
}

impl Default for TreemapTheme {
    fn default() -> Self {
        Self {
            container_background: AppColor::rgba8(0xf9, 0xf9, 0xf9, 1.0),
            font_path: None,

            node_default_background: AppColor::rgba8(200, 200, 200, 0.7),
            node_positive_background: AppColor::rgba8(163, 225, 167, 0.8),
            node_negative_background: AppColor::rgba8(245, 169, 169, 0.8),
            node_border: AppColor::rgba8(0, 0, 0, 0.1),
            node_border_width: 1.0,
            node_hover_border: AppColor::rgba8(0, 0, 0, 0.5),
            node_hover_background: None,
            node_text: AppColor::rgba8(0x33, 0x33, 0x33, 1.0),
            node_font_size: 12.0,

            tooltip_background: AppColor::rgba8(255, 255, 255, 0.98),
            tooltip_border: AppColor::rgba8(0, 0, 0, 0.1),
            tooltip_border_radius: 8.0,
            tooltip_shadow: AppColor::rgba8(0, 0, 0, 0.15),
            tooltip_shadow_offset: 4.0,
            tooltip_shadow_blur: 12.0,
            tooltip_text: AppColor::rgba8(0x2c, 0x3e, 0x50, 1.0),
            tooltip_font_size: 13.0,
            tooltip_padding: (8.0, 12.0),
        }
    }
}

/// Partial theme as written in a config file; unset fields keep the base theme.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeOverrides {
    pub container_background: Option<String>,
    pub font_path: Option<PathBuf>,
    pub node_default_background: Option<String>,
    pub node_positive_background: Option<String>,
    pub node_negative_background: Option<String>,
    pub node_border: Option<String>,
    pub node_border_width: Option<f32>,
    pub node_hover_border: Option<String>,
    pub node_hover_background: Option<String>,
    pub node_text: Option<String>,
    pub node_font_size: Option<f32>,
    pub tooltip_background: Option<String>,
    pub tooltip_border: Option<String>,
    pub tooltip_border_radius: Option<f32>,
    pub tooltip_shadow: Option<String>,
    pub tooltip_text: Option<String>,
    pub tooltip_font_size: Option<f32>,
    pub tooltip_padding: Option<[f32; 2]>,
}

impl TreemapTheme {
    /// Merge `overrides` on top of this theme. Colors that fail to parse are
    /// logged and leave the base value in place.
    pub fn merged(mut self, overrides: &ThemeOverrides) -> Self {
        let colors: [(&str, &Option<String>, &mut AppColor); 11] = [
            ("container_background", &overrides.container_background, &mut self.container_background),
            ("node_default_background", &overrides.node_default_background, &mut self.node_default_background),
            ("node_positive_background", &overrides.node_positive_background, &mut self.node_positive_background),
            ("node_negative_background", &overrides.node_negative_background, &mut self.node_negative_background),
            ("node_border", &overrides.node_border, &mut self.node_border),
            ("node_hover_border", &overrides.node_hover_border, &mut self.node_hover_border),
            ("node_text", &overrides.node_text, &mut self.node_text),
            ("tooltip_background", &overrides.tooltip_background, &mut self.tooltip_background),
            ("tooltip_border", &overrides.tooltip_border, &mut self.tooltip_border),
            ("tooltip_shadow", &overrides.tooltip_shadow, &mut self.tooltip_shadow),
            ("tooltip_text", &overrides.tooltip_text, &mut self.tooltip_text),
        ];
        for (name, raw, slot) in colors {
            if let Some(color) = raw.as_deref().and_then(|s| resolve_color(name, s)) {
                *slot = color;
            }
        }

        if let Some(raw) = overrides.node_hover_background.as_deref() {
            if let Some(color) = resolve_color("node_hover_background", raw) {
                self.node_hover_background = Some(color);
            }
        }
        if let Some(path) = &overrides.font_path {
            self.font_path = Some(path.clone());
        }

        let sizes: [(&str, Option<f32>, &mut f32); 4] = [
            ("node_border_width", overrides.node_border_width, &mut self.node_border_width),
            ("node_font_size", overrides.node_font_size, &mut self.node_font_size),
            ("tooltip_border_radius", overrides.tooltip_border_radius, &mut self.tooltip_border_radius),
            ("tooltip_font_size", overrides.tooltip_font_size, &mut self.tooltip_font_size),
        ];
        for (name, value, slot) in sizes {
            match value {
                Some(v) if v.is_finite() && v >= 0.0 => *slot = v,
                Some(v) => tracing::warn!("Theme: ignoring {} = {} (must be >= 0)", name, v),
                None => {}
            }
        }
        if let Some([vertical, horizontal]) = overrides.tooltip_padding {
            self.tooltip_padding = (vertical.max(0.0), horizontal.max(0.0));
        }

        self
    }
}

fn resolve_color(name: &str, raw: &str) -> Option<AppColor> {
    let color = parse_color(raw);
    if color.is_none() {
        tracing::warn!("Theme: ignoring {} = '{}' (not a color)", name, raw);
    }
    color
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_light_palette() {
        let theme = TreemapTheme::default();
        assert_eq!(theme.node_positive_background.to_rgba8(), [163, 225, 167, 204]);
        assert_eq!(theme.node_border_width, 1.0);
        assert!(theme.node_hover_background.is_none());
        assert_eq!(theme.tooltip_padding, (8.0, 12.0));
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let overrides: ThemeOverrides = toml::from_str(
            r##"
            container_background = "#000000"
            node_hover_background = "rgba(0, 0, 255, 0.2)"
            node_font_size = 16.0
            tooltip_padding = [4.0, 6.0]
            "##,
        )
        .unwrap();
        let theme = TreemapTheme::default().merged(&overrides);

        assert_eq!(theme.container_background.to_rgba8(), [0, 0, 0, 255]);
        assert_eq!(theme.node_hover_background.unwrap().to_rgba8(), [0, 0, 255, 51]);
        assert_eq!(theme.node_font_size, 16.0);
        assert_eq!(theme.tooltip_padding, (4.0, 6.0));
        assert_eq!(theme.node_text, TreemapTheme::default().node_text);
    }

    #[test]
    fn bad_values_keep_the_base_theme() {
        let overrides = ThemeOverrides {
            node_border: Some("not-a-color".into()),
            node_border_width: Some(-2.0),
            ..ThemeOverrides::default()
        };
        let theme = TreemapTheme::default().merged(&overrides);
        assert_eq!(theme, TreemapTheme::default());
    }

    #[test]
    fn unknown_theme_keys_are_rejected() {
        assert!(toml::from_str::<ThemeOverrides>("node_colour = \"#fff\"").is_err());
    }
}

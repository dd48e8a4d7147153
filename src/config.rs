use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::FieldMapping;
use crate::render::theme::{ThemeOverrides, TreemapTheme};

// ---------------------------------------------------------------------------
// ViewConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    /// Space left between neighbouring boxes (px), split around each box.
    pub gap: f32,
    /// Coloring values above this are drawn with the positive color.
    pub positive_threshold: f64,
    pub show_labels: bool,
    /// Extra record fields listed in the tooltip, in this order.
    pub tooltip_fields: Vec<String>,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            gap: 4.0,
            positive_threshold: 0.0,
            show_labels: true,
            tooltip_fields: Vec::new(),
            window_width: 1280,
            window_height: 800,
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub data: FieldMapping,
    pub view: ViewConfig,
    pub theme: TreemapTheme,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    data: Option<FieldMapping>,
    view: Option<RawView>,
    theme: Option<ThemeOverrides>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawView {
    gap: Option<f32>,
    positive_threshold: Option<f64>,
    show_labels: Option<bool>,
    tooltip_fields: Option<Vec<String>>,
    window_width: Option<u32>,
    window_height: Option<u32>,
}

impl Config {
    /// Load the config file at `path`, falling back to defaults when there is
    /// no file or it can't be used.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::from_file(path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Using default config: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("invalid config at {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawConfig) -> Self {
        let mut config = Self::default();

        if let Some(data) = raw.data {
            config.data = data;
        }

        if let Some(v) = raw.view {
            match v.gap {
                Some(gap) if gap.is_finite() && gap >= 0.0 => config.view.gap = gap,
                Some(gap) => tracing::warn!("Config: ignoring view.gap = {} (must be >= 0)", gap),
                None => {}
            }
            if let Some(t) = v.positive_threshold {
                config.view.positive_threshold = t;
            }
            if let Some(show) = v.show_labels {
                config.view.show_labels = show;
            }
            if let Some(fields) = v.tooltip_fields {
                config.view.tooltip_fields = fields;
            }
            if let Some(w) = v.window_width.filter(|&w| w > 0) {
                config.view.window_width = w;
            }
            if let Some(h) = v.window_height.filter(|&h| h > 0) {
                config.view.window_height = h;
            }
        }

        if let Some(overrides) = raw.theme {
            config.theme = config.theme.merged(&overrides);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn parses_all_sections() {
        let config = Config::from_toml_str(
            r##"
            [data]
            id = "ticker"
            value = "market_cap"
            color = "change"

            [view]
            gap = 2.0
            positive_threshold = 1.5
            show_labels = false
            tooltip_fields = ["sector", "change"]

            [theme]
            node_positive_background = "#00ff00"
            "##,
        )
        .unwrap();

        assert_eq!(config.data.id, "ticker");
        assert_eq!(config.data.value, "market_cap");
        assert_eq!(config.data.color.as_deref(), Some("change"));
        assert_eq!(config.data.label, None);
        assert_eq!(config.view.gap, 2.0);
        assert_eq!(config.view.positive_threshold, 1.5);
        assert!(!config.view.show_labels);
        assert_eq!(config.view.tooltip_fields, vec!["sector", "change"]);
        assert_eq!(config.view.window_width, 1280);
        assert_eq!(config.theme.node_positive_background.to_rgba8(), [0, 255, 0, 255]);
    }

    #[test]
    fn partial_data_section_keeps_default_field_names() {
        let config = Config::from_toml_str("[data]\nvalue = \"size\"\n").unwrap();
        assert_eq!(config.data.id, "id");
        assert_eq!(config.data.value, "size");
    }

    #[test]
    fn negative_gap_is_ignored() {
        let config = Config::from_toml_str("[view]\ngap = -3.0\n").unwrap();
        assert_eq!(config.view.gap, ViewConfig::default().gap);
    }

    #[test]
    fn unknown_keys_are_errors() {
        assert!(Config::from_toml_str("[view]\ngapp = 1.0\n").is_err());
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[view\n").unwrap();
        assert!(Config::from_file(file.path()).is_err());
        assert_eq!(Config::load(Some(file.path())), Config::default());
        assert_eq!(Config::load(None), Config::default());
    }
}

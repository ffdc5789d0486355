//! Application configuration.
//!
//! The configuration is loaded from `$XDG_CONFIG_HOME/tagbridge/config.json`.
//! Every section is optional; a minimal `{}` file is valid and all values
//! fall back to their compiled-in defaults.
//!
//! # Example
//!
//! ```json
//! {
//!   "source": {
//!     "program": "yashiki",
//!     "args": ["subscribe", "--snapshot", "--filter", "tags,focus,window,display"],
//!     "backoff_ms": 2000
//!   },
//!   "render": { "program": "ranma" },
//!   "layout": {
//!     "max_slots": 3,
//!     "num_tags": 10,
//!     "font_family": "Hack Nerd Font",
//!     "font_size": 12,
//!     "tag_click": "yashiki tag-view {tag}"
//!   },
//!   "theme": { "accent": "#7aa2f7", "tint_strength": 0.35 }
//! }
//! ```

use crate::event::MAX_TAGS;
use crate::palette::{Color, Palette, DEFAULT_TINT_STRENGTH};
use crate::render::LayoutStyle;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// How to reach the window manager's event stream.
    #[serde(default)]
    pub source: SourceConfig,

    /// How to reach the bar.
    #[serde(default)]
    pub render: RenderConfig,

    /// Slot and tag element layout.
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Colors.
    #[serde(default)]
    pub theme: ThemeConfig,
}

/// Event-stream subprocess settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Subscriber executable, looked up in `PATH`.
    pub program: String,
    /// Arguments passed to the subscriber.
    pub args: Vec<String>,
    /// Pause between a lost connection and the next attempt (ms).
    pub backoff_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            program: "yashiki".into(),
            args: ["subscribe", "--snapshot", "--filter", "tags,focus,window,display"]
                .into_iter()
                .map(String::from)
                .collect(),
            backoff_ms: 2000,
        }
    }
}

impl SourceConfig {
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

/// Bar CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Bar control executable, looked up in `PATH`.
    pub program: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            program: "ranma".into(),
        }
    }
}

/// Slot and tag layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Number of displays that can be rendered at once.
    pub max_slots: u8,
    /// Number of tags shown per display (1..=32).
    pub num_tags: u8,
    pub font_family: String,
    pub font_size: u16,
    /// Command run when a tag is clicked.  `{tag}` and `{display}` are
    /// replaced by the tag number and display id.
    pub tag_click: Option<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_slots: 3,
            num_tags: 10,
            font_family: "Hack Nerd Font".into(),
            font_size: 12,
            tag_click: None,
        }
    }
}

impl LayoutConfig {
    /// Element styling for a session drawing with `palette`.
    ///
    /// `num_tags` is clamped to `1..=MAX_TAGS` so an unvalidated layout
    /// never asks for tags the mask cannot represent.
    pub fn style(&self, palette: &Palette) -> LayoutStyle {
        LayoutStyle {
            num_tags: self.num_tags.clamp(1, MAX_TAGS),
            font_family: self.font_family.clone(),
            font_size: self.font_size,
            tag_click: self.tag_click.clone(),
            initial_label: palette.vacant_label.focused,
        }
    }
}

/// Color settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Accent color (`#rrggbb`).  Without it the neutral palette is used.
    pub accent: Option<String>,
    /// How strongly the accent tints the greys, `0.0..=1.0`.
    pub tint_strength: f64,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            accent: None,
            tint_strength: DEFAULT_TINT_STRENGTH,
        }
    }
}

impl ThemeConfig {
    /// Derive the session palette.
    pub fn palette(&self) -> Result<Palette, ConfigError> {
        match &self.accent {
            Some(accent) => {
                let accent: Color = accent
                    .parse()
                    .map_err(|e| ConfigError(format!("theme.accent: {}", e)))?;
                Ok(Palette::from_accent(accent, self.tint_strength))
            }
            None => Ok(Palette::default()),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the bridge cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.max_slots == 0 {
            return Err(ConfigError("layout.max_slots must be at least 1".into()));
        }
        if self.layout.num_tags == 0 || self.layout.num_tags > MAX_TAGS {
            return Err(ConfigError(format!(
                "layout.num_tags must be in 1..={}, got {}",
                MAX_TAGS, self.layout.num_tags
            )));
        }
        if self.source.program.trim().is_empty() {
            return Err(ConfigError("source.program must not be empty".into()));
        }
        if self.render.program.trim().is_empty() {
            return Err(ConfigError("render.program must not be empty".into()));
        }
        self.theme.palette()?;
        Ok(())
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);

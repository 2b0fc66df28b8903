//! Global editor options.

use peniko::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default grid cell size in canvas pixels.
pub const DEFAULT_GRID_SIZE: f64 = 20.0;

/// Option validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {axis}: {value} (must be a positive, finite pixel size)")]
    InvalidDimension { axis: &'static str, value: f64 },
    #[error("Invalid grid size: {0}")]
    InvalidGridSize(f64),
    #[error("Invalid grid thickness: {0}")]
    InvalidGridThickness(f64),
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),
    #[error("Invalid options JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for option handling.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Background decoration.
///
/// Everything except `color` is passed through to the host untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackgroundConfig {
    pub color: Option<String>,
    pub image: Option<String>,
    pub repeat: Option<String>,
    pub size: Option<String>,
    pub position: Option<String>,
}

impl BackgroundConfig {
    /// Parsed fill color, or `None` when no color is set.
    pub fn fill_color(&self) -> ConfigResult<Option<Color>> {
        self.color.as_deref().map(parse_color).transpose()
    }
}

/// Grid pattern style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridKind {
    /// A dot at each intersection.
    #[default]
    Dot,
    /// Full grid lines.
    Mesh,
}

/// Grid decoration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    pub size: f64,
    pub visible: bool,
    #[serde(rename = "type")]
    pub kind: GridKind,
    pub color: String,
    pub thickness: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIZE,
            visible: true,
            kind: GridKind::Dot,
            color: "#ababab".to_string(),
            thickness: 1.0,
        }
    }
}

impl GridConfig {
    /// Parsed mark color.
    pub fn line_color(&self) -> ConfigResult<Color> {
        parse_color(&self.color)
    }

    /// Check size, thickness and color.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(ConfigError::InvalidGridSize(self.size));
        }
        if !(self.thickness.is_finite() && self.thickness >= 0.0) {
            return Err(ConfigError::InvalidGridThickness(self.thickness));
        }
        self.line_color().map(|_| ())
    }
}

/// Options recognised by the graph view.
///
/// Presence matters for `background` and `grid`: a supplied bag mounts
/// the corresponding layer, an absent one does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphOptions {
    /// Container width in pixels. `None` inherits from the parent.
    pub width: Option<f64>,
    /// Container height in pixels. `None` inherits from the parent.
    pub height: Option<f64>,
    pub background: Option<BackgroundConfig>,
    pub grid: Option<GridConfig>,
    /// Read-only mode without interaction chrome.
    pub is_silent_mode: bool,
    /// Alignment guides. Only an explicit `false` disables them.
    pub snapline: Option<bool>,
    pub node_selected_outline: bool,
    pub edge_selected_outline: bool,
    pub hover_outline: bool,
    /// Tool names hidden from the tool layer.
    pub disabled_tools: Vec<String>,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            background: None,
            grid: None,
            is_silent_mode: false,
            snapline: None,
            node_selected_outline: true,
            edge_selected_outline: true,
            hover_outline: true,
            disabled_tools: Vec::new(),
        }
    }
}

impl GraphOptions {
    /// Options with every default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate options from JSON.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Fix the container size in pixels.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Mount a background layer with `background`.
    pub fn with_background(mut self, background: BackgroundConfig) -> Self {
        self.background = Some(background);
        self
    }

    /// Mount a grid layer with `grid`.
    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Toggle read-only mode.
    pub fn with_silent_mode(mut self, silent: bool) -> Self {
        self.is_silent_mode = silent;
        self
    }

    /// Set the alignment guide flag explicitly.
    pub fn with_snapline(mut self, enabled: bool) -> Self {
        self.snapline = Some(enabled);
        self
    }

    /// Whether the alignment guide feature is on.
    pub fn snapline_enabled(&self) -> bool {
        self.snapline != Some(false)
    }

    /// Reject malformed values before they reach a render.
    pub fn validate(&self) -> ConfigResult<()> {
        for (axis, value) in [("width", self.width), ("height", self.height)] {
            if let Some(value) = value {
                if !(value.is_finite() && value > 0.0) {
                    return Err(ConfigError::InvalidDimension { axis, value });
                }
            }
        }
        if let Some(grid) = &self.grid {
            grid.validate()?;
        }
        if let Some(background) = &self.background {
            background.fill_color()?;
        }
        Ok(())
    }
}

/// Parse a `#rgb`, `#rrggbb` or `#rrggbbaa` color, or `transparent`.
pub fn parse_color(color: &str) -> ConfigResult<Color> {
    let color = color.trim();
    if color == "transparent" {
        return Ok(Color::from_rgba8(0, 0, 0, 0));
    }

    let invalid = || ConfigError::InvalidColor(color.to_string());
    let hex = color.strip_prefix('#').ok_or_else(invalid)?;
    // from_str_radix alone would accept a sign in each channel
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
    };

    match hex.len() {
        3 => Ok(Color::from_rgba8(
            channel(0..1)? * 17,
            channel(1..2)? * 17,
            channel(2..3)? * 17,
            255,
        )),
        6 => Ok(Color::from_rgba8(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
        8 => Ok(Color::from_rgba8(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        )),
        _ => Err(invalid()),
    }
}

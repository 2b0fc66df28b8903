//! Alignment guide (snapline) state.

use serde::{Deserialize, Serialize};

/// Resolved guide positions in canvas coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SnaplinePosition {
    /// Vertical guide at this x.
    pub x: Option<f64>,
    /// Horizontal guide at this y.
    pub y: Option<f64>,
}

/// Guide lines shown while a node is dragged into alignment.
///
/// The alignment math lives with the drag gesture; this model only
/// carries its result to the snapline overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnaplineModel {
    pub position: SnaplinePosition,
    pub stroke: String,
    pub stroke_width: f64,
}

impl Default for SnaplineModel {
    fn default() -> Self {
        Self {
            position: SnaplinePosition::default(),
            stroke: "#1e90ff".to_string(),
            stroke_width: 1.0,
        }
    }
}

impl SnaplineModel {
    /// No guides, default stroke.
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a vertical guide at canvas `x`.
    pub fn show_vertical(&mut self, x: f64) {
        self.position.x = Some(x);
    }

    /// Show a horizontal guide at canvas `y`.
    pub fn show_horizontal(&mut self, y: f64) {
        self.position.y = Some(y);
    }

    /// Hide both guides.
    pub fn clear(&mut self) {
        self.position = SnaplinePosition::default();
    }

    /// Whether at least one guide is visible.
    pub fn is_showing(&self) -> bool {
        self.position.x.is_some() || self.position.y.is_some()
    }
}

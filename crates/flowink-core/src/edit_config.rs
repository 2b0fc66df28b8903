//! Edit-mode flags owned by the graph model.

use serde::{Deserialize, Serialize};

/// Which optional interaction modes are currently active.
///
/// Gestures flip these flags through [`GraphModel::update_edit_config`];
/// renderers only read them.
///
/// [`GraphModel::update_edit_config`]: crate::GraphModel::update_edit_config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditConfig {
    /// Edge curve adjustment is in progress (shows bezier handles).
    pub adjust_edge: bool,
    /// Nodes may be repositioned by dragging.
    pub adjust_node_position: bool,
    /// Panning the canvas is disabled.
    pub stop_move_graph: bool,
    /// Zooming the canvas is disabled.
    pub stop_zoom_graph: bool,
    /// Node anchors are hidden.
    pub hide_anchors: bool,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            adjust_edge: false,
            adjust_node_position: true,
            stop_move_graph: false,
            stop_zoom_graph: false,
            hide_anchors: false,
        }
    }
}

impl EditConfig {
    /// Default flags: node dragging on, everything else off.
    pub fn new() -> Self {
        Self::default()
    }
}

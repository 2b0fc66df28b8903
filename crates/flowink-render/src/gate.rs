//! Overlay eligibility for a render pass.

use flowink_core::{EditConfig, GraphOptions};

/// Which optional overlays may mount this render.
///
/// Derived from configuration and edit mode only, never from scene content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayGate {
    pub bezier_adjust: bool,
    pub snapline: bool,
    pub background: bool,
    pub grid: bool,
}

impl OverlayGate {
    /// Decide overlay eligibility for one render.
    pub fn evaluate(edit_config: &EditConfig, options: &GraphOptions) -> Self {
        Self {
            bezier_adjust: edit_config.adjust_edge,
            snapline: !options.is_silent_mode && options.snapline_enabled(),
            background: options.background.is_some(),
            grid: options.grid.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowink_core::{BackgroundConfig, GridConfig};

    #[test]
    fn test_defaults() {
        let gate = OverlayGate::evaluate(&EditConfig::new(), &GraphOptions::new());
        assert_eq!(
            gate,
            OverlayGate { bezier_adjust: false, snapline: true, background: false, grid: false }
        );
    }

    #[test]
    fn test_adjust_edge_enables_handles() {
        let edit = EditConfig { adjust_edge: true, ..EditConfig::new() };
        assert!(OverlayGate::evaluate(&edit, &GraphOptions::new()).bezier_adjust);
    }

    #[test]
    fn test_silent_mode_suppresses_snapline() {
        let options = GraphOptions::new().with_silent_mode(true).with_snapline(true);
        assert!(!OverlayGate::evaluate(&EditConfig::new(), &options).snapline);
    }

    #[test]
    fn test_snapline_disabled_explicitly() {
        let options = GraphOptions::new().with_snapline(false);
        assert!(!OverlayGate::evaluate(&EditConfig::new(), &options).snapline);
    }

    #[test]
    fn test_presence_gates_decorations() {
        let options = GraphOptions::new()
            .with_background(BackgroundConfig::default())
            .with_grid(GridConfig { visible: false, ..GridConfig::default() });
        let gate = OverlayGate::evaluate(&EditConfig::new(), &options);
        assert!(gate.background);
        assert!(gate.grid);
    }
}

//! Fixed-precedence stacking of the scene content and its overlays.
//!
//! Bottom to top:
//!
//! 1. background (when configured)
//! 2. canvas overlay: base group, preview, selection outline, curve handles
//! 3. snapline (when eligible)
//! 4. grid (when configured)
//! 5. tool layer (always)
//!
//! Only presence varies between renders; the relative order never does.

use crate::content::{base_layer, preview_layer};
use crate::error::RenderResult;
use crate::gate::OverlayGate;
use crate::layer::{Layer, LayerKind};
use crate::overlays::{
    background_layer, bezier_adjust_layer, grid_layer, outline_layer, snapline_layer, tool_layer,
};
use crate::views::ViewRegistry;
use flowink_core::{EventCenter, GraphModel, GraphOptions, SnaplineModel, ToolContext};

/// Everything one composition pass reads.
#[derive(Clone, Copy)]
pub struct Composition<'a> {
    pub graph: &'a GraphModel,
    pub options: &'a GraphOptions,
    pub gate: OverlayGate,
    pub registry: &'a ViewRegistry,
    pub event_center: &'a EventCenter,
    pub snapline: &'a SnaplineModel,
    pub tool: &'a ToolContext,
}

/// The clipped, transformed container holding the scene content.
pub fn canvas_layer(input: &Composition<'_>) -> RenderResult<Layer> {
    let mut canvas = Layer::new(LayerKind::CanvasOverlay)
        .with_transform(input.graph.transform().affine())
        .clipped();
    canvas.push_child(base_layer(input.graph, input.registry, input.event_center)?);
    if let Some(preview) = preview_layer(input.graph, input.registry, input.event_center)? {
        canvas.push_child(preview);
    }
    canvas.push_child(outline_layer(input.graph, input.options));
    // Handles last so nothing in the clip can cover them
    if input.gate.bezier_adjust {
        canvas.push_child(bezier_adjust_layer(input.graph));
    }
    Ok(canvas)
}

/// Build the full layer stack, bottom to top.
pub fn compose(input: &Composition<'_>) -> RenderResult<Vec<Layer>> {
    let mut layers = Vec::with_capacity(5);

    if input.gate.background {
        if let Some(background) = &input.options.background {
            layers.push(background_layer(background)?);
        }
    }

    layers.push(canvas_layer(input)?);

    if input.gate.snapline {
        layers.push(snapline_layer(input.snapline)?.with_transform(input.graph.transform().affine()));
    }

    if input.gate.grid {
        if let Some(grid) = &input.options.grid {
            layers.push(grid_layer(grid)?.with_transform(input.graph.transform().affine()));
        }
    }

    layers.push(tool_layer(input.tool, input.graph, input.options));

    Ok(layers)
}

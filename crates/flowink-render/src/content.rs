//! Scene content: committed elements plus the preview element.

use crate::error::RenderResult;
use crate::layer::{Layer, LayerKind};
use crate::views::{ViewProps, ViewRegistry};
use flowink_core::{EventCenter, GraphModel};

/// Committed elements in paint order, inside the base group.
pub fn base_layer(
    graph: &GraphModel,
    registry: &ViewRegistry,
    event_center: &EventCenter,
) -> RenderResult<Layer> {
    let mut layer = Layer::new(LayerKind::Base);
    for element in graph.sort_elements() {
        let props = ViewProps {
            element,
            graph,
            overlay: LayerKind::CanvasOverlay,
            event_center,
        };
        layer.views.push(registry.resolve(&props)?);
    }
    Ok(layer)
}

/// The preview element, if a creation gesture is active.
///
/// Lives in its own layer after the base group, so it paints over every
/// committed element whatever its z-index.
pub fn preview_layer(
    graph: &GraphModel,
    registry: &ViewRegistry,
    event_center: &EventCenter,
) -> RenderResult<Option<Layer>> {
    let Some(element) = graph.faker_element() else {
        return Ok(None);
    };
    let props = ViewProps {
        element,
        graph,
        overlay: LayerKind::CanvasOverlay,
        event_center,
    };
    let mut layer = Layer::new(LayerKind::Preview);
    layer.views.push(registry.resolve(&props)?);
    Ok(Some(layer))
}

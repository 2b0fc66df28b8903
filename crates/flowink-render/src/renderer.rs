//! Renderer trait abstraction.

use crate::layer::{DrawCommand, Frame, Layer, LayerKind};
use flowink_core::ElementId;
use kurbo::Affine;

/// A draw command positioned in container space.
#[derive(Debug, Clone)]
pub struct DisplayItem {
    /// Innermost layer the command was emitted in.
    pub layer: LayerKind,
    /// Element whose view produced the command, if any.
    pub owner: Option<ElementId>,
    /// Accumulated transform from canvas to container space.
    pub transform: Affine,
    pub command: DrawCommand,
}

/// Trait for rendering backends.
///
/// Implementations consume a composed [`Frame`]; they never see the graph
/// model directly.
pub trait Renderer {
    /// Build the scene/command buffer for a frame.
    fn build_scene(&mut self, frame: &Frame);
}

/// Flatten a frame into paint order (first item is painted first).
pub fn flatten(frame: &Frame) -> Vec<DisplayItem> {
    let mut items = Vec::new();
    for layer in &frame.layers {
        flatten_layer(layer, Affine::IDENTITY, &mut items);
    }
    items
}

fn flatten_layer(layer: &Layer, parent: Affine, items: &mut Vec<DisplayItem>) {
    let transform = parent * layer.transform;
    let mut commands = Vec::new();
    for view in &layer.views {
        view.view.paint(&mut commands);
        items.extend(commands.drain(..).map(|command| DisplayItem {
            layer: layer.kind,
            owner: Some(view.key),
            transform,
            command,
        }));
    }
    items.extend(layer.commands.iter().cloned().map(|command| DisplayItem {
        layer: layer.kind,
        owner: None,
        transform,
        command,
    }));
    for child in &layer.children {
        flatten_layer(child, transform, items);
    }
}

/// Renderer that records the flattened display list.
#[derive(Debug, Default)]
pub struct DisplayListRenderer {
    items: Vec<DisplayItem>,
}

impl DisplayListRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items recorded by the last `build_scene`, in paint order.
    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    /// Paint position of the last command owned by `id`.
    pub fn last_index_of(&self, id: ElementId) -> Option<usize> {
        self.items.iter().rposition(|item| item.owner == Some(id))
    }

    /// Paint position of the first command owned by `id`.
    pub fn first_index_of(&self, id: ElementId) -> Option<usize> {
        self.items.iter().position(|item| item.owner == Some(id))
    }

    /// Paint position of the first command emitted in `layer`.
    pub fn first_index_in(&self, layer: LayerKind) -> Option<usize> {
        self.items.iter().position(|item| item.layer == layer)
    }
}

impl Renderer for DisplayListRenderer {
    fn build_scene(&mut self, frame: &Frame) {
        self.items = flatten(frame);
        log::debug!("display list rebuilt: {} item(s)", self.items.len());
    }
}

//! Layer tree produced by one render pass.

use crate::gate::OverlayGate;
use crate::renderer::{DisplayItem, flatten};
use crate::surface::ContainerStyle;
use crate::views::MountedView;
use flowink_core::{ElementId, GridKind};
use kurbo::{Affine, BezPath, Point};
use peniko::Color;
use std::collections::HashSet;

/// Named layers, in the vocabulary the host uses for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Background,
    /// Clipped, transformed container of the scene content.
    CanvasOverlay,
    /// Committed elements in paint order.
    Base,
    /// The transient preview element.
    Preview,
    /// Selection and hover outlines.
    Outline,
    /// Curve adjustment handles.
    BezierAdjust,
    /// Alignment guides.
    Snapline,
    Grid,
    Tool,
}

impl LayerKind {
    /// Host-facing layer name.
    pub fn name(self) -> &'static str {
        match self {
            LayerKind::Background => "background",
            LayerKind::CanvasOverlay => "canvas-overlay",
            LayerKind::Base => "base",
            LayerKind::Preview => "preview",
            LayerKind::Outline => "outline",
            LayerKind::BezierAdjust => "bezier-adjust",
            LayerKind::Snapline => "snapline",
            LayerKind::Grid => "grid",
            LayerKind::Tool => "tool",
        }
    }
}

/// A single paint operation.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Fill {
        path: BezPath,
        color: Color,
    },
    Stroke {
        path: BezPath,
        color: Color,
        width: f64,
        /// Dash length, solid when `None`.
        dash: Option<f64>,
    },
    Text {
        anchor: Point,
        text: String,
        color: Color,
        size: f64,
    },
    /// Full-container background.
    Background {
        color: Option<Color>,
        image: Option<String>,
        repeat: Option<String>,
        size: Option<String>,
        position: Option<String>,
    },
    /// Repeating grid pattern.
    Grid {
        size: f64,
        kind: GridKind,
        color: Color,
        thickness: f64,
    },
    /// Marker for a mounted tool.
    Tool {
        name: String,
    },
}

/// A node of the layer tree.
///
/// Paint order within a layer: views, then commands, then children.
#[derive(Debug)]
pub struct Layer {
    pub kind: LayerKind,
    /// Transform relative to the parent layer.
    pub transform: Affine,
    /// Whether children are clipped to the container.
    pub clips: bool,
    pub views: Vec<MountedView>,
    pub commands: Vec<DrawCommand>,
    pub children: Vec<Layer>,
}

impl Layer {
    /// Empty, untransformed, unclipped layer.
    pub fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            transform: Affine::IDENTITY,
            clips: false,
            views: Vec::new(),
            commands: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set the transform relative to the parent.
    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    /// Clip children to the container.
    pub fn clipped(mut self) -> Self {
        self.clips = true;
        self
    }

    /// Append a child; later children paint on top.
    pub fn push_child(&mut self, child: Layer) {
        self.children.push(child);
    }

    /// Depth-first search for a layer.
    pub fn find(&self, kind: LayerKind) -> Option<&Layer> {
        if self.kind == kind {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(kind))
    }

    fn collect_kinds(&self, out: &mut Vec<LayerKind>) {
        out.push(self.kind);
        for child in &self.children {
            child.collect_kinds(out);
        }
    }
}

/// A view that mounted, stayed or went away between two frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewKey {
    pub layer: LayerKind,
    pub id: ElementId,
}

/// Differences between the previous frame and this one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountDiff {
    pub mounted: Vec<ViewKey>,
    pub retained: Vec<ViewKey>,
    pub unmounted: Vec<ViewKey>,
    pub layers_mounted: Vec<LayerKind>,
    pub layers_unmounted: Vec<LayerKind>,
}

impl MountDiff {
    /// True when nothing mounted or unmounted.
    pub fn is_unchanged(&self) -> bool {
        self.mounted.is_empty()
            && self.unmounted.is_empty()
            && self.layers_mounted.is_empty()
            && self.layers_unmounted.is_empty()
    }
}

/// Output of one render pass.
#[derive(Debug)]
pub struct Frame {
    pub style: ContainerStyle,
    pub gate: OverlayGate,
    /// Top-level layers, bottom to top.
    pub layers: Vec<Layer>,
    pub diff: MountDiff,
}

impl Frame {
    /// First layer of `kind`, searching nested layers.
    pub fn find(&self, kind: LayerKind) -> Option<&Layer> {
        self.layers.iter().find_map(|l| l.find(kind))
    }

    /// Whether a layer of `kind` is mounted anywhere in the tree.
    pub fn has_layer(&self, kind: LayerKind) -> bool {
        self.find(kind).is_some()
    }

    /// Top-level layer kinds, bottom to top.
    pub fn layer_order(&self) -> Vec<LayerKind> {
        self.layers.iter().map(|l| l.kind).collect()
    }

    /// Every layer kind, depth-first in paint order.
    pub fn all_layer_kinds(&self) -> Vec<LayerKind> {
        let mut kinds = Vec::new();
        for layer in &self.layers {
            layer.collect_kinds(&mut kinds);
        }
        kinds
    }

    /// Keys of all mounted element views, in paint order.
    pub fn view_keys(&self) -> Vec<ViewKey> {
        fn walk(layer: &Layer, out: &mut Vec<ViewKey>) {
            out.extend(layer.views.iter().map(|v| ViewKey { layer: layer.kind, id: v.key }));
            for child in &layer.children {
                walk(child, out);
            }
        }
        let mut keys = Vec::new();
        for layer in &self.layers {
            walk(layer, &mut keys);
        }
        keys
    }

    /// Ids of all mounted element views, in paint order.
    pub fn element_keys(&self) -> Vec<ElementId> {
        self.view_keys().into_iter().map(|k| k.id).collect()
    }

    /// Set of mounted view keys.
    pub fn key_set(&self) -> HashSet<ViewKey> {
        self.view_keys().into_iter().collect()
    }

    /// Flattened paint-ordered commands.
    pub fn display_list(&self) -> Vec<DisplayItem> {
        flatten(self)
    }
}

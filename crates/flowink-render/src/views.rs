//! Element renderers and the type-tag registry that resolves them.

use crate::error::{RenderError, RenderResult};
use crate::layer::{DrawCommand, LayerKind};
use flowink_core::options::parse_color;
use flowink_core::{Element, ElementId, ElementKind, EventCenter, GraphModel};
use kurbo::{BezPath, Ellipse, Point, Rect, RoundedRect, Shape as _};
use peniko::Color;
use std::collections::HashMap;
use std::fmt;

/// Construction contract for every element renderer.
///
/// The graph is borrowed immutably: a renderer that wants to change the
/// model must do so through the event center or the model's own API
/// outside of rendering.
#[derive(Clone, Copy)]
pub struct ViewProps<'a> {
    pub element: &'a Element,
    pub graph: &'a GraphModel,
    /// Layer the view is rendered into.
    pub overlay: LayerKind,
    pub event_center: &'a EventCenter,
}

/// A renderer instance for one element.
pub trait ElementView {
    /// Append this element's paint operations.
    fn paint(&self, out: &mut Vec<DrawCommand>);
}

/// Builds a renderer instance from its props.
pub type ViewFactory = Box<dyn Fn(&ViewProps<'_>) -> Box<dyn ElementView>>;

/// A resolved renderer, keyed by the element it draws.
pub struct MountedView {
    pub key: ElementId,
    pub type_tag: String,
    pub overlay: LayerKind,
    pub view: Box<dyn ElementView>,
}

impl fmt::Debug for MountedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountedView")
            .field("key", &self.key)
            .field("type_tag", &self.type_tag)
            .field("overlay", &self.overlay)
            .finish()
    }
}

/// Mapping from element type tag to renderer factory.
#[derive(Default)]
pub struct ViewRegistry {
    factories: HashMap<String, ViewFactory>,
}

impl fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.factories.keys().collect();
        tags.sort();
        f.debug_struct("ViewRegistry").field("types", &tags).finish()
    }
}

impl ViewRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in node and edge renderers.
    pub fn with_builtin_views() -> Self {
        let mut registry = Self::new();
        registry.register("rect", |props| Box::new(NodeView::new(props, NodeShape::Rect)));
        registry.register("circle", |props| Box::new(NodeView::new(props, NodeShape::Ellipse)));
        registry.register("ellipse", |props| Box::new(NodeView::new(props, NodeShape::Ellipse)));
        registry.register("diamond", |props| Box::new(NodeView::new(props, NodeShape::Diamond)));
        registry.register("text", |props| Box::new(NodeView::new(props, NodeShape::TextOnly)));
        registry.register("line", |props| Box::new(EdgeView::new(props)));
        registry.register("polyline", |props| Box::new(EdgeView::new(props)));
        registry.register("bezier", |props| Box::new(EdgeView::new(props)));
        registry
    }

    /// Register (or replace) the renderer for a type tag.
    pub fn register<F>(&mut self, type_tag: impl Into<String>, factory: F)
    where
        F: Fn(&ViewProps<'_>) -> Box<dyn ElementView> + 'static,
    {
        self.factories.insert(type_tag.into(), Box::new(factory));
    }

    /// Whether a renderer is registered for `type_tag`.
    pub fn contains(&self, type_tag: &str) -> bool {
        self.factories.contains_key(type_tag)
    }

    /// Instantiate the renderer for `props.element`.
    pub fn resolve(&self, props: &ViewProps<'_>) -> RenderResult<MountedView> {
        let element = props.element;
        let factory = self
            .factories
            .get(&element.type_tag)
            .ok_or_else(|| RenderError::UnknownElementType {
                type_tag: element.type_tag.clone(),
                id: element.id,
            })?;
        Ok(MountedView {
            key: element.id,
            type_tag: element.type_tag.clone(),
            overlay: props.overlay,
            view: factory(props),
        })
    }

    /// Check that every element currently in `graph` has a renderer.
    pub fn validate(&self, graph: &GraphModel) -> RenderResult<()> {
        let elements = graph.sort_elements().into_iter().chain(graph.faker_element());
        for element in elements {
            if !self.contains(&element.type_tag) {
                log::warn!("no renderer for type {:?} (element {})", element.type_tag, element.id);
                return Err(RenderError::UnknownElementType {
                    type_tag: element.type_tag.clone(),
                    id: element.id,
                });
            }
        }
        Ok(())
    }
}

const DEFAULT_FILL: Color = Color::WHITE;
const DEFAULT_STROKE: Color = Color::BLACK;
const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Read a `#hex` color from the element's property bag.
fn property_color(element: &Element, key: &str, fallback: Color) -> Color {
    element
        .properties
        .get(key)
        .and_then(|v| v.as_str())
        .and_then(|s| parse_color(s).ok())
        .unwrap_or(fallback)
}

fn property_f64(element: &Element, key: &str, fallback: f64) -> f64 {
    element.properties.get(key).and_then(|v| v.as_f64()).unwrap_or(fallback)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeShape {
    Rect,
    Ellipse,
    Diamond,
    TextOnly,
}

/// Built-in node renderer.
struct NodeView {
    shape: NodeShape,
    bounds: Rect,
    radius: f64,
    fill: Color,
    stroke: Color,
    stroke_width: f64,
    text: Option<String>,
}

impl NodeView {
    fn new(props: &ViewProps<'_>, shape: NodeShape) -> Self {
        let element = props.element;
        Self {
            shape,
            bounds: element.bounds(),
            radius: property_f64(element, "radius", 0.0),
            fill: property_color(element, "fill", DEFAULT_FILL),
            stroke: property_color(element, "stroke", DEFAULT_STROKE),
            stroke_width: property_f64(element, "strokeWidth", 1.0),
            text: element.text.clone(),
        }
    }

    fn outline(&self) -> Option<BezPath> {
        let b = self.bounds;
        match self.shape {
            NodeShape::Rect => Some(RoundedRect::from_rect(b, self.radius).to_path(0.1)),
            NodeShape::Ellipse => Some(Ellipse::from_rect(b).to_path(0.1)),
            NodeShape::Diamond => {
                let c = b.center();
                let mut path = BezPath::new();
                path.move_to(Point::new(c.x, b.y0));
                path.line_to(Point::new(b.x1, c.y));
                path.line_to(Point::new(c.x, b.y1));
                path.line_to(Point::new(b.x0, c.y));
                path.close_path();
                Some(path)
            }
            NodeShape::TextOnly => None,
        }
    }
}

impl ElementView for NodeView {
    fn paint(&self, out: &mut Vec<DrawCommand>) {
        if let Some(path) = self.outline() {
            out.push(DrawCommand::Fill { path: path.clone(), color: self.fill });
            out.push(DrawCommand::Stroke {
                path,
                color: self.stroke,
                width: self.stroke_width,
                dash: None,
            });
        }
        if let Some(text) = &self.text {
            out.push(DrawCommand::Text {
                anchor: self.bounds.center(),
                text: text.clone(),
                color: self.stroke,
                size: DEFAULT_FONT_SIZE,
            });
        }
    }
}

/// Built-in edge renderer for straight, polyline and bezier edges.
struct EdgeView {
    path: BezPath,
    stroke: Color,
    stroke_width: f64,
    text: Option<(Point, String)>,
}

impl EdgeView {
    fn new(props: &ViewProps<'_>) -> Self {
        let element = props.element;
        let (path, mid) = match &element.kind {
            ElementKind::Edge(edge) => (edge.path(), edge.bounds().center()),
            ElementKind::Node(node) => (BezPath::new(), node.center),
        };
        Self {
            path,
            stroke: property_color(element, "stroke", DEFAULT_STROKE),
            stroke_width: property_f64(element, "strokeWidth", 1.0),
            text: element.text.clone().map(|t| (mid, t)),
        }
    }
}

impl ElementView for EdgeView {
    fn paint(&self, out: &mut Vec<DrawCommand>) {
        out.push(DrawCommand::Stroke {
            path: self.path.clone(),
            color: self.stroke,
            width: self.stroke_width,
            dash: None,
        });
        if let Some((anchor, text)) = &self.text {
            out.push(DrawCommand::Text {
                anchor: *anchor,
                text: text.clone(),
                color: self.stroke,
                size: DEFAULT_FONT_SIZE,
            });
        }
    }
}

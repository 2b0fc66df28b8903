//! Diagram elements (nodes and edges).

use kurbo::{BezPath, CubicBez, ParamCurveExtrema as _, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an element.
pub type ElementId = Uuid;

/// Default z-index for new nodes.
pub const DEFAULT_NODE_Z_INDEX: i64 = 1;
/// Default z-index for new edges (below nodes).
pub const DEFAULT_EDGE_Z_INDEX: i64 = 0;

/// Geometry of a node, in canvas coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeGeometry {
    /// Center of the node.
    pub center: Point,
    pub width: f64,
    pub height: f64,
}

impl NodeGeometry {
    /// Node geometry centred on `center`.
    pub fn new(center: Point, width: f64, height: f64) -> Self {
        Self { center, width, height }
    }

    /// Axis-aligned box of the node.
    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, (self.width, self.height))
    }
}

/// Geometry of an edge, in canvas coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeGeometry {
    /// Source node.
    pub source: ElementId,
    /// Target node.
    pub target: ElementId,
    /// Path points from source to target (at least start and end).
    pub points: Vec<Point>,
    /// Bezier control points (start side, end side), for curved edges.
    pub control: Option<(Point, Point)>,
}

impl EdgeGeometry {
    /// First path point, at the source node.
    pub fn start(&self) -> Option<Point> {
        self.points.first().copied()
    }

    /// Last path point, at the target node.
    pub fn end(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Path of the edge: a cubic when control points exist, otherwise a polyline.
    pub fn path(&self) -> BezPath {
        let mut path = BezPath::new();
        let (Some(start), Some(end)) = (self.start(), self.end()) else {
            return path;
        };
        path.move_to(start);
        match self.control {
            Some((c1, c2)) => path.curve_to(c1, c2, end),
            None => {
                for &point in &self.points[1..] {
                    path.line_to(point);
                }
            }
        }
        path
    }

    /// Bounding box of the path, including curve extrema.
    pub fn bounds(&self) -> Rect {
        match (self.control, self.start(), self.end()) {
            (Some((c1, c2)), Some(start), Some(end)) => {
                CubicBez::new(start, c1, c2, end).bounding_box()
            }
            _ => self
                .points
                .iter()
                .fold(None, |acc: Option<Rect>, &p| {
                    Some(match acc {
                        Some(r) => r.union_pt(p),
                        None => Rect::from_points(p, p),
                    })
                })
                .unwrap_or(Rect::ZERO),
        }
    }
}

/// Node or edge payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementKind {
    Node(NodeGeometry),
    Edge(EdgeGeometry),
}

/// An element of the diagram.
///
/// The `type_tag` selects the renderer; `properties` is an open bag of
/// renderer-specific state that the pipeline never interprets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    pub type_tag: String,
    /// Rendering priority. Higher paints later.
    pub z_index: i64,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub hovered: bool,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl Element {
    /// Create a node with a fresh id.
    pub fn node(type_tag: impl Into<String>, geometry: NodeGeometry) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ElementKind::Node(geometry),
            type_tag: type_tag.into(),
            z_index: DEFAULT_NODE_Z_INDEX,
            selected: false,
            hovered: false,
            text: None,
            properties: serde_json::Map::new(),
        }
    }

    /// Create an edge with a fresh id.
    pub fn edge(type_tag: impl Into<String>, geometry: EdgeGeometry) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ElementKind::Edge(geometry),
            type_tag: type_tag.into(),
            z_index: DEFAULT_EDGE_Z_INDEX,
            selected: false,
            hovered: false,
            text: None,
            properties: serde_json::Map::new(),
        }
    }

    /// Replace the generated id.
    pub fn with_id(mut self, id: ElementId) -> Self {
        self.id = id;
        self
    }

    /// Set the rendering priority.
    pub fn with_z_index(mut self, z_index: i64) -> Self {
        self.z_index = z_index;
        self
    }

    /// Set the label.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Insert a renderer-specific property.
    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn is_node(&self) -> bool {
        matches!(self.kind, ElementKind::Node(_))
    }

    pub fn is_edge(&self) -> bool {
        matches!(self.kind, ElementKind::Edge(_))
    }

    /// Node geometry, if this is a node.
    pub fn as_node(&self) -> Option<&NodeGeometry> {
        match &self.kind {
            ElementKind::Node(node) => Some(node),
            ElementKind::Edge(_) => None,
        }
    }

    /// Edge geometry, if this is an edge.
    pub fn as_edge(&self) -> Option<&EdgeGeometry> {
        match &self.kind {
            ElementKind::Edge(edge) => Some(edge),
            ElementKind::Node(_) => None,
        }
    }

    /// Bounding box in canvas coordinates.
    pub fn bounds(&self) -> Rect {
        match &self.kind {
            ElementKind::Node(node) => node.bounds(),
            ElementKind::Edge(edge) => edge.bounds(),
        }
    }
}

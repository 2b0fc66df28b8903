//! Feedback overlays stacked over the scene content.

use crate::error::RenderResult;
use crate::layer::{DrawCommand, Layer, LayerKind};
use flowink_core::{BackgroundConfig, GraphModel, GraphOptions, GridConfig, SnaplineModel, ToolContext};
use flowink_core::options::parse_color;
use flowink_core::tool::MULTIPLE_SELECT_TOOL;
use kurbo::{BezPath, Circle, Line, Point, Rect, Shape as _};
use peniko::Color;

/// Gap between an element and its outline, in canvas pixels.
pub const OUTLINE_PADDING: f64 = 5.0;
/// Radius of a curve adjustment handle.
pub const HANDLE_RADIUS: f64 = 4.0;
/// Half-length of a snapline, in canvas pixels.
pub const SNAPLINE_EXTENT: f64 = 100_000.0;

const OUTLINE_DASH: f64 = 3.0;

fn outline_color() -> Color {
    Color::from_rgba8(0x94, 0x94, 0x94, 0xff)
}

fn rect_path(rect: Rect) -> BezPath {
    rect.to_path(0.1)
}

fn line_path(from: Point, to: Point) -> BezPath {
    Line::new(from, to).to_path(0.1)
}

/// Dashed outlines around selected and hovered elements.
pub fn outline_layer(graph: &GraphModel, options: &GraphOptions) -> Layer {
    let mut layer = Layer::new(LayerKind::Outline);
    for element in graph.sort_elements() {
        let selected_outline = if element.is_node() {
            options.node_selected_outline
        } else {
            options.edge_selected_outline
        };
        let wants_outline =
            (element.selected && selected_outline) || (element.hovered && options.hover_outline);
        if !wants_outline {
            continue;
        }
        layer.commands.push(DrawCommand::Stroke {
            path: rect_path(element.bounds().inflate(OUTLINE_PADDING, OUTLINE_PADDING)),
            color: outline_color(),
            width: 1.0,
            dash: Some(OUTLINE_DASH),
        });
    }
    layer
}

/// Control point guides and handles for selected curved edges.
pub fn bezier_adjust_layer(graph: &GraphModel) -> Layer {
    let mut layer = Layer::new(LayerKind::BezierAdjust);
    for element in graph.sort_elements() {
        if !element.selected {
            continue;
        }
        let Some(edge) = element.as_edge() else {
            continue;
        };
        let (Some((c1, c2)), Some(start), Some(end)) = (edge.control, edge.start(), edge.end())
        else {
            continue;
        };
        for (anchor, control) in [(start, c1), (end, c2)] {
            layer.commands.push(DrawCommand::Stroke {
                path: line_path(anchor, control),
                color: outline_color(),
                width: 1.0,
                dash: None,
            });
        }
        for control in [c1, c2] {
            let handle = Circle::new(control, HANDLE_RADIUS).to_path(0.1);
            layer.commands.push(DrawCommand::Fill { path: handle.clone(), color: Color::WHITE });
            layer.commands.push(DrawCommand::Stroke {
                path: handle,
                color: outline_color(),
                width: 1.0,
                dash: None,
            });
        }
    }
    layer
}

/// Alignment guide lines at the snapline model's positions.
pub fn snapline_layer(snapline: &SnaplineModel) -> RenderResult<Layer> {
    let mut layer = Layer::new(LayerKind::Snapline);
    if !snapline.is_showing() {
        return Ok(layer);
    }
    let color = parse_color(&snapline.stroke)?;
    let mut push = |from: Point, to: Point| {
        layer.commands.push(DrawCommand::Stroke {
            path: line_path(from, to),
            color,
            width: snapline.stroke_width,
            dash: None,
        });
    };
    if let Some(x) = snapline.position.x {
        push(Point::new(x, -SNAPLINE_EXTENT), Point::new(x, SNAPLINE_EXTENT));
    }
    if let Some(y) = snapline.position.y {
        push(Point::new(-SNAPLINE_EXTENT, y), Point::new(SNAPLINE_EXTENT, y));
    }
    Ok(layer)
}

/// Container background.
pub fn background_layer(config: &BackgroundConfig) -> RenderResult<Layer> {
    let mut layer = Layer::new(LayerKind::Background);
    layer.commands.push(DrawCommand::Background {
        color: config.fill_color()?,
        image: config.image.clone(),
        repeat: config.repeat.clone(),
        size: config.size.clone(),
        position: config.position.clone(),
    });
    Ok(layer)
}

/// Grid pattern. A hidden grid still mounts its layer, without marks.
pub fn grid_layer(config: &GridConfig) -> RenderResult<Layer> {
    let mut layer = Layer::new(LayerKind::Grid);
    if config.visible {
        layer.commands.push(DrawCommand::Grid {
            size: config.size,
            kind: config.kind,
            color: config.line_color()?,
            thickness: config.thickness,
        });
    }
    Ok(layer)
}

/// Tool chrome. One marker per enabled tool; the multi-select tool also
/// frames a multi-element selection.
pub fn tool_layer(tool: &ToolContext, graph: &GraphModel, options: &GraphOptions) -> Layer {
    let mut layer = Layer::new(LayerKind::Tool);
    for entry in tool.enabled_tools(options) {
        layer.commands.push(DrawCommand::Tool { name: entry.name.clone() });
        if entry.name != MULTIPLE_SELECT_TOOL {
            continue;
        }
        let selected = graph.selected_elements();
        if selected.len() < 2 {
            continue;
        }
        let bounds = selected
            .iter()
            .map(|e| e.bounds())
            .reduce(|a, b| a.union(b))
            .unwrap_or(Rect::ZERO);
        // The tool layer is not transformed, so map to container space
        let frame = graph.transform().affine().transform_rect_bbox(bounds);
        layer.commands.push(DrawCommand::Stroke {
            path: rect_path(frame.inflate(OUTLINE_PADDING, OUTLINE_PADDING)),
            color: outline_color(),
            width: 1.0,
            dash: None,
        });
    }
    layer
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowink_core::{EdgeGeometry, Element, NodeGeometry, ToolContext};

    fn graph_with_two_nodes() -> (GraphModel, flowink_core::ElementId, flowink_core::ElementId) {
        let mut graph = GraphModel::new();
        let a = graph
            .add_node(Element::node("rect", NodeGeometry::new(Point::new(0.0, 0.0), 20.0, 20.0)))
            .unwrap();
        let b = graph
            .add_node(Element::node("rect", NodeGeometry::new(Point::new(100.0, 0.0), 20.0, 20.0)))
            .unwrap();
        (graph, a, b)
    }

    #[test]
    fn test_outline_only_for_selected_and_hovered() {
        let (mut graph, a, b) = graph_with_two_nodes();
        let options = GraphOptions::new();
        assert!(outline_layer(&graph, &options).commands.is_empty());

        graph.select(a).unwrap();
        graph.set_hovered(Some(b)).unwrap();
        assert_eq!(outline_layer(&graph, &options).commands.len(), 2);

        let options = GraphOptions { hover_outline: false, ..GraphOptions::new() };
        assert_eq!(outline_layer(&graph, &options).commands.len(), 1);
    }

    #[test]
    fn test_outline_is_padded() {
        let (mut graph, a, _) = graph_with_two_nodes();
        graph.select(a).unwrap();
        let layer = outline_layer(&graph, &GraphOptions::new());
        let DrawCommand::Stroke { path, dash, .. } = &layer.commands[0] else {
            panic!("expected stroke");
        };
        assert_eq!(path.bounding_box(), Rect::new(-15.0, -15.0, 15.0, 15.0));
        assert_eq!(*dash, Some(OUTLINE_DASH));
    }

    #[test]
    fn test_bezier_handles_for_selected_curves() {
        let (mut graph, a, b) = graph_with_two_nodes();
        let edge = graph
            .add_edge(Element::edge(
                "bezier",
                EdgeGeometry {
                    source: a,
                    target: b,
                    points: vec![Point::new(10.0, 0.0), Point::new(90.0, 0.0)],
                    control: Some((Point::new(40.0, 30.0), Point::new(60.0, 30.0))),
                },
            ))
            .unwrap();
        assert!(bezier_adjust_layer(&graph).commands.is_empty());

        graph.select(edge).unwrap();
        // Two guide lines plus fill and stroke for two handles
        assert_eq!(bezier_adjust_layer(&graph).commands.len(), 6);
    }

    #[test]
    fn test_snapline_lines() {
        let mut snapline = SnaplineModel::new();
        assert!(snapline_layer(&snapline).unwrap().commands.is_empty());

        snapline.show_vertical(50.0);
        snapline.show_horizontal(20.0);
        assert_eq!(snapline_layer(&snapline).unwrap().commands.len(), 2);
    }

    #[test]
    fn test_background_carries_config() {
        let config = BackgroundConfig {
            color: Some("#fafafa".to_string()),
            image: Some("paper.png".to_string()),
            repeat: Some("repeat".to_string()),
            ..BackgroundConfig::default()
        };
        let layer = background_layer(&config).unwrap();
        assert_eq!(layer.commands.len(), 1);
        let DrawCommand::Background { color, image, repeat, .. } = &layer.commands[0] else {
            panic!("expected background");
        };
        assert_eq!(color.map(|c| c.to_rgba8().r), Some(0xfa));
        assert_eq!(image.as_deref(), Some("paper.png"));
        assert_eq!(repeat.as_deref(), Some("repeat"));
    }

    #[test]
    fn test_hidden_grid_has_no_marks() {
        let layer = grid_layer(&GridConfig { visible: false, ..GridConfig::default() }).unwrap();
        assert!(layer.commands.is_empty());

        let layer = grid_layer(&GridConfig { size: 10.0, ..GridConfig::default() }).unwrap();
        assert!(matches!(layer.commands[0], DrawCommand::Grid { size, .. } if size == 10.0));
    }

    #[test]
    fn test_tool_layer_frames_multi_selection() {
        let (mut graph, a, b) = graph_with_two_nodes();
        let tools = ToolContext::new();
        let options = GraphOptions::new();
        assert_eq!(tool_layer(&tools, &graph, &options).commands.len(), 2);

        graph.select(a).unwrap();
        graph.add_to_selection(b).unwrap();
        let layer = tool_layer(&tools, &graph, &options);
        assert_eq!(layer.commands.len(), 3);
        let DrawCommand::Stroke { path, .. } = &layer.commands[2] else {
            panic!("expected selection frame");
        };
        assert_eq!(path.bounding_box(), Rect::new(-15.0, -15.0, 115.0, 15.0));
    }
}

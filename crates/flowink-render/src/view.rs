//! The graph view: mounts the root surface and re-renders on change.

use crate::compositor::{Composition, compose};
use crate::error::{RenderError, RenderResult};
use crate::gate::OverlayGate;
use crate::layer::{Frame, MountDiff};
use crate::reconcile::Reconciler;
use crate::surface::{ContainerStyle, SurfaceBinder};
use crate::views::ViewRegistry;
use flowink_core::{
    DragAndDrop, EventCenter, GraphModel, GraphOptions, PointerEvent, SnaplineModel, Subscription,
    ToolContext,
};

/// Root of the render pipeline.
///
/// Every collaborator is handed in explicitly. The view binds the
/// drag-and-drop handlers once per mount, subscribes to the graph model and
/// recomputes a whole [`Frame`] whenever a notification arrives.
#[derive(Debug)]
pub struct GraphView {
    registry: ViewRegistry,
    options: GraphOptions,
    tool: ToolContext,
    event_center: EventCenter,
    dnd: DragAndDrop,
    snapline: SnaplineModel,
    surface: SurfaceBinder,
    subscription: Option<Subscription>,
    reconciler: Reconciler,
    /// View-owned state changed since the last render.
    dirty: bool,
}

impl GraphView {
    /// Create an unmounted view. Options are validated here.
    pub fn new(
        registry: ViewRegistry,
        options: GraphOptions,
        tool: ToolContext,
        event_center: EventCenter,
        dnd: DragAndDrop,
    ) -> RenderResult<Self> {
        options.validate()?;
        Ok(Self {
            registry,
            options,
            tool,
            event_center,
            dnd,
            snapline: SnaplineModel::new(),
            surface: SurfaceBinder::new(),
            subscription: None,
            reconciler: Reconciler::new(),
            dirty: false,
        })
    }

    /// Mount onto `graph` and produce the first frame.
    ///
    /// Fails without leaving anything bound if an element has no renderer
    /// or the first frame cannot be built.
    pub fn mount(&mut self, graph: &mut GraphModel) -> RenderResult<Frame> {
        if self.surface.is_bound() {
            return Err(RenderError::AlreadyMounted);
        }
        self.registry.validate(graph)?;
        self.surface.bind(self.dnd.event_map())?;
        match self.render(graph) {
            Ok(frame) => {
                self.subscription = Some(graph.subscribe());
                log::info!("graph view mounted ({} element(s))", graph.len());
                Ok(frame)
            }
            Err(err) => {
                log::warn!("graph view mount failed: {}", err);
                self.surface.unbind();
                self.reconciler.reset();
                Err(err)
            }
        }
    }

    /// Release the bound handlers and the model subscription.
    pub fn unmount(&mut self) {
        self.surface.unbind();
        self.subscription = None;
        self.reconciler.reset();
        log::info!("graph view unmounted");
    }

    /// Whether handlers are currently bound to the root container.
    pub fn is_mounted(&self) -> bool {
        self.surface.is_bound()
    }

    /// Render the current state of `graph`.
    pub fn render(&mut self, graph: &GraphModel) -> RenderResult<Frame> {
        if !self.is_mounted() {
            return Err(RenderError::NotMounted);
        }
        let gate = OverlayGate::evaluate(graph.edit_config(), &self.options);
        let layers = compose(&Composition {
            graph,
            options: &self.options,
            gate,
            registry: &self.registry,
            event_center: &self.event_center,
            snapline: &self.snapline,
            tool: &self.tool,
        })?;

        let mut frame = Frame {
            style: ContainerStyle::from_options(&self.options),
            gate,
            layers,
            diff: MountDiff::default(),
        };
        frame.diff = self.reconciler.reconcile(&frame);
        self.dirty = false;

        log::debug!(
            "rendered {} element view(s), gate {:?}, {} mounted / {} unmounted",
            frame.diff.mounted.len() + frame.diff.retained.len(),
            gate,
            frame.diff.mounted.len(),
            frame.diff.unmounted.len()
        );
        Ok(frame)
    }

    /// Drain pending notifications and re-render once if anything changed.
    pub fn poll(&mut self, graph: &GraphModel) -> RenderResult<Option<Frame>> {
        let subscription = self.subscription.as_ref().ok_or(RenderError::NotMounted)?;
        let changed = subscription.has_changes();
        if !(changed || self.dirty) {
            return Ok(None);
        }
        match self.render(graph) {
            Ok(frame) => Ok(Some(frame)),
            Err(err) => {
                // Notifications are already drained; retry on the next poll
                self.dirty = true;
                Err(err)
            }
        }
    }

    /// Route a pointer event through the bound handlers.
    pub fn dispatch(&mut self, graph: &mut GraphModel, event: &PointerEvent) -> RenderResult<bool> {
        self.surface.dispatch(graph, event)
    }

    /// Current options.
    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    /// Replace the options; the next poll re-renders.
    pub fn set_options(&mut self, options: GraphOptions) -> RenderResult<()> {
        options.validate()?;
        self.options = options;
        self.dirty = true;
        Ok(())
    }

    /// Alignment guide state drawn by the snapline layer.
    pub fn snapline(&self) -> &SnaplineModel {
        &self.snapline
    }

    /// Mutable snapline state; the next poll re-renders.
    pub fn snapline_mut(&mut self) -> &mut SnaplineModel {
        self.dirty = true;
        &mut self.snapline
    }

    /// Mutable registry; the next poll re-renders.
    pub fn registry_mut(&mut self) -> &mut ViewRegistry {
        self.dirty = true;
        &mut self.registry
    }

    /// Tools shown in the tool layer.
    pub fn tool(&self) -> &ToolContext {
        &self.tool
    }

    /// Event channel handed to every renderer.
    pub fn event_center(&self) -> &EventCenter {
        &self.event_center
    }

    /// Drag-and-drop collaborator whose handlers are bound on mount.
    pub fn dnd(&self) -> &DragAndDrop {
        &self.dnd
    }

    /// Root container binding state.
    pub fn surface(&self) -> &SurfaceBinder {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{DrawCommand, LayerKind};
    use crate::renderer::{DisplayListRenderer, Renderer};
    use flowink_core::{
        BackgroundConfig, EdgeGeometry, Element, ElementId, GridConfig, NodeConfig, NodeGeometry,
        PointerEventKind,
    };
    use kurbo::Point;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn view_with(options: GraphOptions) -> GraphView {
        init_logging();
        let events = EventCenter::new();
        GraphView::new(
            ViewRegistry::with_builtin_views(),
            options,
            ToolContext::new(),
            events.clone(),
            DragAndDrop::new(events),
        )
        .unwrap()
    }

    fn rect(x: f64, y: f64) -> Element {
        Element::node("rect", NodeGeometry::new(Point::new(x, y), 80.0, 40.0))
    }

    /// Two nodes joined by a bezier edge.
    fn sample_graph() -> (GraphModel, ElementId, ElementId, ElementId) {
        let mut graph = GraphModel::new();
        let a = graph.add_node(rect(0.0, 0.0)).unwrap();
        let b = graph.add_node(rect(200.0, 0.0)).unwrap();
        let edge = graph
            .add_edge(Element::edge(
                "bezier",
                EdgeGeometry {
                    source: a,
                    target: b,
                    points: vec![Point::new(40.0, 0.0), Point::new(160.0, 0.0)],
                    control: Some((Point::new(90.0, 60.0), Point::new(110.0, 60.0))),
                },
            ))
            .unwrap();
        (graph, a, b, edge)
    }

    struct Cloud(kurbo::Rect);

    impl crate::views::ElementView for Cloud {
        fn paint(&self, out: &mut Vec<DrawCommand>) {
            use kurbo::Shape as _;
            out.push(DrawCommand::Fill {
                path: self.0.to_path(0.1),
                color: peniko::Color::WHITE,
            });
        }
    }

    fn count(frame: &Frame, kind: LayerKind) -> usize {
        frame.all_layer_kinds().into_iter().filter(|k| *k == kind).count()
    }

    #[test]
    fn test_render_twice_is_idempotent() {
        let (mut graph, _, _, _) = sample_graph();
        let mut view = view_with(GraphOptions::new());
        let first = view.mount(&mut graph).unwrap();
        let second = view.render(&graph).unwrap();

        assert_eq!(first.element_keys(), second.element_keys());
        assert_eq!(first.key_set(), second.key_set());
        assert!(second.diff.is_unchanged());
        assert_eq!(second.diff.retained.len(), 3);
    }

    #[test]
    fn test_elements_paint_in_sequence_order() {
        let (mut graph, a, b, edge) = sample_graph();
        graph.to_front(a).unwrap();
        let mut view = view_with(GraphOptions::new());
        let frame = view.mount(&mut graph).unwrap();
        assert_eq!(frame.element_keys(), vec![edge, b, a]);
    }

    #[test]
    fn test_preview_paints_over_committed_content() {
        let (mut graph, a, b, edge) = sample_graph();
        graph.set_z_index(a, 50).unwrap();
        // Lowest possible priority: would paint first if it were committed
        let preview = rect(100.0, 0.0).with_z_index(i64::MIN);
        let preview_id = preview.id;
        graph.set_faker_element(preview);

        let mut view = view_with(GraphOptions::new());
        let frame = view.mount(&mut graph).unwrap();
        let mut renderer = DisplayListRenderer::new();
        renderer.build_scene(&frame);

        let preview_first = renderer.first_index_of(preview_id).unwrap();
        for committed in [a, b, edge] {
            assert!(renderer.last_index_of(committed).unwrap() < preview_first);
        }
        assert_eq!(frame.element_keys().last(), Some(&preview_id));
    }

    #[test]
    fn test_preview_sharing_committed_id_is_rendered_separately() {
        let (mut graph, a, _, _) = sample_graph();
        graph.set_faker_element(rect(10.0, 10.0).with_id(a));

        let mut view = view_with(GraphOptions::new());
        let frame = view.mount(&mut graph).unwrap();

        let base = frame.find(LayerKind::Base).unwrap();
        assert_eq!(base.views.iter().filter(|v| v.key == a).count(), 1);
        let preview = frame.find(LayerKind::Preview).unwrap();
        assert_eq!(preview.views.len(), 1);
        assert_eq!(frame.view_keys().len(), 4);
    }

    #[test]
    fn test_adjust_edge_mounts_handles_without_remount() {
        let (mut graph, _, _, edge) = sample_graph();
        graph.select(edge).unwrap();
        let mut view = view_with(GraphOptions::new());
        let before = view.mount(&mut graph).unwrap();
        assert!(!before.has_layer(LayerKind::BezierAdjust));

        graph.update_edit_config(|c| c.adjust_edge = true);
        let after = view.poll(&graph).unwrap().expect("edit config change re-renders");

        assert_eq!(after.diff.layers_mounted, vec![LayerKind::BezierAdjust]);
        assert!(after.diff.layers_unmounted.is_empty());
        assert!(after.diff.mounted.is_empty());
        assert!(after.diff.unmounted.is_empty());
        assert_eq!(before.element_keys(), after.element_keys());

        let canvas = after.find(LayerKind::CanvasOverlay).unwrap();
        let inner: Vec<_> = canvas.children.iter().map(|l| l.kind).collect();
        assert_eq!(inner, vec![LayerKind::Base, LayerKind::Outline, LayerKind::BezierAdjust]);
        assert!(!after.find(LayerKind::BezierAdjust).unwrap().commands.is_empty());

        graph.update_edit_config(|c| c.adjust_edge = false);
        let reverted = view.poll(&graph).unwrap().unwrap();
        assert_eq!(reverted.diff.layers_unmounted, vec![LayerKind::BezierAdjust]);
    }

    #[test]
    fn test_handles_paint_above_outline() {
        let (mut graph, _, _, edge) = sample_graph();
        graph.select(edge).unwrap();
        graph.update_edit_config(|c| c.adjust_edge = true);
        let mut view = view_with(GraphOptions::new());
        let frame = view.mount(&mut graph).unwrap();

        let mut renderer = DisplayListRenderer::new();
        renderer.build_scene(&frame);
        let outline = renderer.first_index_in(LayerKind::Outline).unwrap();
        let handles = renderer.first_index_in(LayerKind::BezierAdjust).unwrap();
        assert!(outline < handles);
        assert!(renderer.last_index_of(edge).unwrap() < outline);
    }

    #[test]
    fn test_silent_mode_suppresses_snapline() {
        let (mut graph, _, _, _) = sample_graph();
        let mut view = view_with(GraphOptions::new().with_silent_mode(true).with_snapline(true));
        let frame = view.mount(&mut graph).unwrap();
        assert!(!frame.gate.snapline);
        assert!(!frame.has_layer(LayerKind::Snapline));

        let mut view = view_with(GraphOptions::new());
        let frame = view.mount(&mut graph).unwrap();
        assert!(frame.has_layer(LayerKind::Snapline));
    }

    #[test]
    fn test_decorations_follow_configuration() {
        let (mut graph, _, _, _) = sample_graph();
        let mut view = view_with(GraphOptions::new());
        let frame = view.mount(&mut graph).unwrap();
        assert_eq!(count(&frame, LayerKind::Background), 0);
        assert_eq!(count(&frame, LayerKind::Grid), 0);

        let options = GraphOptions::new()
            .with_background(BackgroundConfig {
                color: Some("#f5f5f5".to_string()),
                ..BackgroundConfig::default()
            })
            .with_grid(GridConfig { size: 16.0, ..GridConfig::default() });
        view.set_options(options).unwrap();
        let frame = view.poll(&graph).unwrap().expect("option change re-renders");

        assert_eq!(count(&frame, LayerKind::Background), 1);
        assert_eq!(count(&frame, LayerKind::Grid), 1);
        let grid = frame.find(LayerKind::Grid).unwrap();
        assert_eq!(grid.commands.len(), 1);
        assert!(matches!(grid.commands[0], DrawCommand::Grid { size, .. } if size == 16.0));
        assert_eq!(frame.layer_order().first(), Some(&LayerKind::Background));
        assert_eq!(frame.layer_order().last(), Some(&LayerKind::Tool));
    }

    #[test]
    fn test_container_style() {
        let mut graph = GraphModel::new();
        let mut view = view_with(GraphOptions::new().with_size(800.0, 600.0));
        let frame = view.mount(&mut graph).unwrap();
        assert_eq!(frame.style.width.as_deref(), Some("800px"));
        assert_eq!(frame.style.height.as_deref(), Some("600px"));

        let mut view = view_with(GraphOptions::new());
        let frame = view.mount(&mut graph).unwrap();
        assert_eq!(frame.style.width, None);
        assert_eq!(frame.style.height, None);
    }

    #[test]
    fn test_unknown_type_fails_mount() {
        let mut graph = GraphModel::new();
        graph.add_node(Element::node("cloud", NodeGeometry::new(Point::ZERO, 10.0, 10.0))).unwrap();
        let mut view = view_with(GraphOptions::new());

        let err = view.mount(&mut graph).unwrap_err();
        assert!(matches!(err, RenderError::UnknownElementType { ref type_tag, .. } if type_tag == "cloud"));
        assert!(!view.is_mounted());
    }

    #[test]
    fn test_unknown_type_fails_rerender() {
        let (mut graph, _, _, _) = sample_graph();
        let mut view = view_with(GraphOptions::new());
        view.mount(&mut graph).unwrap();

        graph.add_node(Element::node("cloud", NodeGeometry::new(Point::ZERO, 10.0, 10.0))).unwrap();
        assert!(matches!(view.poll(&graph), Err(RenderError::UnknownElementType { .. })));

        view.registry_mut().register("cloud", |props| Box::new(Cloud(props.element.bounds())));
        let frame = view.poll(&graph).unwrap().unwrap();
        assert_eq!(frame.element_keys().len(), 4);
    }

    #[test]
    fn test_failed_first_frame_leaves_view_unmounted() {
        let (mut graph, _, _, _) = sample_graph();
        let mut view = view_with(GraphOptions::new());
        view.snapline_mut().stroke = "blue".to_string();
        view.snapline_mut().show_vertical(10.0);

        assert!(matches!(view.mount(&mut graph), Err(RenderError::InvalidOptions(_))));
        assert!(!view.is_mounted());
        assert!(matches!(view.poll(&graph), Err(RenderError::NotMounted)));

        view.snapline_mut().stroke = "#1e90ff".to_string();
        let frame = view.mount(&mut graph).unwrap();
        assert_eq!(frame.find(LayerKind::Snapline).unwrap().commands.len(), 1);
        assert!(frame.diff.unmounted.is_empty());
        assert_eq!(frame.diff.mounted.len(), 3);
        assert_eq!(view.surface().bind_count(), 2);
    }

    #[test]
    fn test_invalid_options_rejected() {
        let events = EventCenter::new();
        let result = GraphView::new(
            ViewRegistry::new(),
            GraphOptions::new().with_size(-1.0, 10.0),
            ToolContext::new(),
            events.clone(),
            DragAndDrop::new(events),
        );
        assert!(matches!(result, Err(RenderError::InvalidOptions(_))));
    }

    #[test]
    fn test_poll_without_changes() {
        let (mut graph, _, _, _) = sample_graph();
        let mut view = view_with(GraphOptions::new());
        view.mount(&mut graph).unwrap();
        assert!(view.poll(&graph).unwrap().is_none());

        graph.batch(|g| {
            g.add_node(rect(400.0, 0.0)).unwrap();
            g.add_node(rect(500.0, 0.0)).unwrap();
        });
        let frame = view.poll(&graph).unwrap().unwrap();
        assert_eq!(frame.diff.mounted.len(), 2);
        assert!(view.poll(&graph).unwrap().is_none());
    }

    #[test]
    fn test_drag_and_drop_lifecycle() {
        let mut graph = GraphModel::new();
        let mut view = view_with(GraphOptions::new());
        view.mount(&mut graph).unwrap();

        view.dnd().start_drag(NodeConfig::new("circle").with_size(40.0, 40.0));
        let over = PointerEvent::new(PointerEventKind::DragOver, Point::new(120.0, 80.0));
        assert!(view.dispatch(&mut graph, &over).unwrap());
        let frame = view.poll(&graph).unwrap().unwrap();
        let preview = frame.find(LayerKind::Preview).expect("preview mounted");
        let preview_id = preview.views[0].key;
        assert!(frame.find(LayerKind::Base).unwrap().views.is_empty());

        // Moving the preview keeps its identity
        let over = PointerEvent::new(PointerEventKind::DragOver, Point::new(130.0, 90.0));
        view.dispatch(&mut graph, &over).unwrap();
        let frame = view.poll(&graph).unwrap().unwrap();
        assert!(frame.diff.mounted.is_empty());
        assert_eq!(frame.element_keys(), vec![preview_id]);

        let drop = PointerEvent::new(PointerEventKind::Drop, Point::new(130.0, 90.0));
        view.dispatch(&mut graph, &drop).unwrap();
        let frame = view.poll(&graph).unwrap().unwrap();
        assert!(!frame.has_layer(LayerKind::Preview));
        assert_eq!(frame.find(LayerKind::Base).unwrap().views.len(), 1);
        assert_eq!(frame.diff.layers_unmounted, vec![LayerKind::Preview]);

        assert_eq!(view.surface().bind_count(), 1);
    }

    #[test]
    fn test_snapline_state_rerenders() {
        let (mut graph, _, _, _) = sample_graph();
        let mut view = view_with(GraphOptions::new());
        view.mount(&mut graph).unwrap();

        view.snapline_mut().show_vertical(40.0);
        let frame = view.poll(&graph).unwrap().unwrap();
        assert_eq!(frame.find(LayerKind::Snapline).unwrap().commands.len(), 1);
    }

    #[test]
    fn test_mount_lifecycle() {
        let mut graph = GraphModel::new();
        let mut view = view_with(GraphOptions::new());
        assert!(matches!(view.render(&graph), Err(RenderError::NotMounted)));

        view.mount(&mut graph).unwrap();
        assert!(matches!(view.mount(&mut graph), Err(RenderError::AlreadyMounted)));
        for _ in 0..3 {
            view.render(&graph).unwrap();
        }
        assert_eq!(view.surface().bind_count(), 1);

        view.unmount();
        assert!(matches!(view.poll(&graph), Err(RenderError::NotMounted)));
        let frame = view.mount(&mut graph).unwrap();
        assert_eq!(view.surface().bind_count(), 2);
        assert!(frame.diff.layers_unmounted.is_empty());
    }
}

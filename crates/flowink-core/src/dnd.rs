//! Drag-and-drop node creation.
//!
//! [`DragAndDrop`] owns a fixed [`EventMap`] that the root surface binds
//! once. While a drag is armed, pointer events over the canvas maintain a
//! preview element in the graph model; a drop commits it as a real node.

use crate::element::{Element, ElementId, NodeGeometry};
use crate::event::{EventArgs, EventCenter, NODE_DND_ADD, NODE_DND_CANCEL};
use crate::graph::{GraphModel, GraphResult};
use kurbo::Point;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// Pointer events the root surface forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    DragEnter,
    DragOver,
    DragLeave,
    Drop,
    MouseUp,
}

impl PointerEventKind {
    /// Host event name.
    pub fn name(self) -> &'static str {
        match self {
            PointerEventKind::DragEnter => "dragenter",
            PointerEventKind::DragOver => "dragover",
            PointerEventKind::DragLeave => "dragleave",
            PointerEventKind::Drop => "drop",
            PointerEventKind::MouseUp => "mouseup",
        }
    }
}

/// A pointer event in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub position: Point,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, position: Point) -> Self {
        Self { kind, position }
    }
}

/// Handler bound to the root container.
pub type PointerHandler = Rc<dyn Fn(&mut GraphModel, &PointerEvent) -> GraphResult<()>>;

/// Event-name to handler mapping.
///
/// Handlers are reference counted so the map can be handed out repeatedly
/// without changing listener identity.
#[derive(Clone, Default)]
pub struct EventMap {
    handlers: Vec<(PointerEventKind, PointerHandler)>,
}

impl fmt::Debug for EventMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.handlers.iter().map(|(kind, _)| kind.name()))
            .finish()
    }
}

impl EventMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to `kind`, replacing any previous handler.
    pub fn insert(&mut self, kind: PointerEventKind, handler: PointerHandler) {
        self.handlers.retain(|(k, _)| *k != kind);
        self.handlers.push((kind, handler));
    }

    /// Handler for `kind`, if any.
    pub fn get(&self, kind: PointerEventKind) -> Option<&PointerHandler> {
        self.handlers.iter().find(|(k, _)| *k == kind).map(|(_, h)| h)
    }

    /// Bound event kinds in insertion order.
    pub fn kinds(&self) -> impl Iterator<Item = PointerEventKind> + '_ {
        self.handlers.iter().map(|(k, _)| *k)
    }

    /// Number of bound event kinds.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Whether both maps hold the very same handler instances.
    pub fn same_listeners(&self, other: &EventMap) -> bool {
        self.handlers.len() == other.handlers.len()
            && self
                .handlers
                .iter()
                .zip(&other.handlers)
                .all(|((ka, ha), (kb, hb))| ka == kb && Rc::ptr_eq(ha, hb))
    }
}

/// Template for a node created by dragging.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeConfig {
    pub type_tag: String,
    pub width: f64,
    pub height: f64,
    pub text: Option<String>,
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl NodeConfig {
    /// Template for a node of `type_tag` at the default size.
    pub fn new(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            width: 100.0,
            height: 80.0,
            text: None,
            properties: serde_json::Map::new(),
        }
    }

    /// Override the node size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Label for the created node.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    fn build(&self, id: ElementId, center: Point) -> Element {
        let mut element = Element::node(
            self.type_tag.clone(),
            NodeGeometry::new(center, self.width, self.height),
        )
        .with_id(id);
        element.text = self.text.clone();
        element.properties = self.properties.clone();
        element
    }
}

#[derive(Debug)]
struct DragSession {
    config: NodeConfig,
    /// Stable id of the preview element for the whole gesture.
    preview_id: ElementId,
}

type SharedSession = Rc<RefCell<Option<DragSession>>>;

/// Drag-and-drop collaborator.
pub struct DragAndDrop {
    session: SharedSession,
    event_map: EventMap,
}

impl fmt::Debug for DragAndDrop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragAndDrop")
            .field("dragging", &self.is_dragging())
            .field("event_map", &self.event_map)
            .finish()
    }
}

impl DragAndDrop {
    /// Build the collaborator and its handlers. Results are emitted on `event_center`.
    pub fn new(event_center: EventCenter) -> Self {
        let session: SharedSession = Rc::new(RefCell::new(None));
        let event_map = build_event_map(&session, &event_center);
        Self { session, event_map }
    }

    /// Arm a drag that will create a node from `config`.
    pub fn start_drag(&self, config: NodeConfig) {
        *self.session.borrow_mut() = Some(DragSession {
            config,
            preview_id: Uuid::new_v4(),
        });
    }

    /// Whether a drag is armed.
    pub fn is_dragging(&self) -> bool {
        self.session.borrow().is_some()
    }

    /// The handlers to bind on the root container. Always the same instances.
    pub fn event_map(&self) -> &EventMap {
        &self.event_map
    }
}

fn build_event_map(session: &SharedSession, event_center: &EventCenter) -> EventMap {
    let mut map = EventMap::new();

    let track: PointerHandler = {
        let session = Rc::clone(session);
        Rc::new(move |model: &mut GraphModel, event: &PointerEvent| -> GraphResult<()> {
            let session = session.borrow();
            let Some(drag) = session.as_ref() else {
                return Ok(());
            };
            let center = model.transform().container_to_canvas(event.position);
            model.set_faker_element(drag.config.build(drag.preview_id, center));
            Ok(())
        })
    };
    map.insert(PointerEventKind::DragEnter, Rc::clone(&track));
    map.insert(PointerEventKind::DragOver, track);

    map.insert(
        PointerEventKind::DragLeave,
        Rc::new(|model: &mut GraphModel, _: &PointerEvent| -> GraphResult<()> {
            model.clear_faker_element();
            Ok(())
        }),
    );

    let drop_session = Rc::clone(session);
    let drop_events = event_center.clone();
    map.insert(
        PointerEventKind::Drop,
        Rc::new(move |model: &mut GraphModel, event: &PointerEvent| -> GraphResult<()> {
            let Some(drag) = drop_session.borrow_mut().take() else {
                return Ok(());
            };
            let center = model.transform().container_to_canvas(event.position);
            let node = drag.config.build(Uuid::new_v4(), center);
            let id = model.batch(|m| {
                m.clear_faker_element();
                m.add_node(node)
            })?;
            log::debug!("dnd committed node {}", id);
            drop_events.emit(NODE_DND_ADD, &EventArgs::for_element(id).at(center));
            Ok(())
        }),
    );

    let cancel_session = Rc::clone(session);
    let cancel_events = event_center.clone();
    map.insert(
        PointerEventKind::MouseUp,
        Rc::new(move |model: &mut GraphModel, event: &PointerEvent| -> GraphResult<()> {
            if cancel_session.borrow_mut().take().is_some() {
                model.clear_faker_element();
                cancel_events.emit(NODE_DND_CANCEL, &EventArgs::default().at(event.position));
            }
            Ok(())
        }),
    );

    map
}

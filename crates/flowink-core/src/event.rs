//! Event delivery channel shared by renderers and collaborators.

use crate::element::ElementId;
use kurbo::Point;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Emitted when a node is committed by a drag-and-drop gesture.
pub const NODE_DND_ADD: &str = "node:dnd-add";
/// Emitted when a drag-and-drop gesture is cancelled.
pub const NODE_DND_CANCEL: &str = "node:dnd-cancel";

/// Payload delivered to listeners.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventArgs {
    pub element: Option<ElementId>,
    pub position: Option<Point>,
    pub data: serde_json::Value,
}

impl EventArgs {
    /// Payload about one element.
    pub fn for_element(id: ElementId) -> Self {
        Self { element: Some(id), ..Self::default() }
    }

    /// Attach a position.
    pub fn at(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }
}

/// Handle returned by [`EventCenter::on`], used to remove the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<dyn Fn(&EventArgs)>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    by_event: HashMap<String, Vec<(ListenerId, Listener)>>,
}

/// Cloneable, single-threaded event bus.
///
/// Clones share the same listener table.
#[derive(Clone, Default)]
pub struct EventCenter {
    inner: Rc<RefCell<Listeners>>,
}

impl fmt::Debug for EventCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("EventCenter")
            .field("events", &inner.by_event.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl EventCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `event`.
    pub fn on(&self, event: &str, listener: impl Fn(&EventArgs) + 'static) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_id);
        inner.next_id += 1;
        inner
            .by_event
            .entry(event.to_string())
            .or_default()
            .push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn off(&self, event: &str, id: ListenerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Some(listeners) = inner.by_event.get_mut(event) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        before != listeners.len()
    }

    /// Deliver `args` to every listener of `event`, in registration order.
    pub fn emit(&self, event: &str, args: &EventArgs) {
        // Snapshot so listeners may register or remove listeners
        let listeners: Vec<Listener> = self
            .inner
            .borrow()
            .by_event
            .get(event)
            .map(|ls| ls.iter().map(|(_, l)| Rc::clone(l)).collect())
            .unwrap_or_default();
        log::debug!("emit {} to {} listener(s)", event, listeners.len());
        for listener in listeners {
            listener(args);
        }
    }

    /// Number of listeners registered for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.inner.borrow().by_event.get(event).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_emit_reaches_listeners_in_order() {
        let events = EventCenter::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l1 = Rc::clone(&log);
        events.on("node:click", move |_| l1.borrow_mut().push(1));
        let l2 = Rc::clone(&log);
        events.on("node:click", move |_| l2.borrow_mut().push(2));

        events.emit("node:click", &EventArgs::default());
        assert_eq!(*log.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_off_removes_listener() {
        let events = EventCenter::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let id = events.on("blank:click", move |_| h.set(h.get() + 1));

        assert!(events.off("blank:click", id));
        assert!(!events.off("blank:click", id));
        events.emit("blank:click", &EventArgs::default());
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_clones_share_listeners() {
        let events = EventCenter::new();
        let shared = events.clone();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        shared.on(NODE_DND_ADD, move |_| h.set(h.get() + 1));

        events.emit(NODE_DND_ADD, &EventArgs::default());
        assert_eq!(hits.get(), 1);
        assert_eq!(events.listener_count(NODE_DND_ADD), 1);
    }

    #[test]
    fn test_listener_may_register_during_emit() {
        let events = EventCenter::new();
        let inner = events.clone();
        events.on("a", move |_| {
            inner.on("b", |_| {});
        });
        events.emit("a", &EventArgs::default());
        assert_eq!(events.listener_count("b"), 1);
    }
}

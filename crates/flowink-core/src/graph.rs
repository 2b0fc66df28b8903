//! Graph model: committed elements, preview element and edit state.

use crate::edit_config::EditConfig;
use crate::element::{EdgeGeometry, Element, ElementId, ElementKind};
use crate::notify::{ModelChange, Notifier, Subscription};
use crate::transform::ViewTransform;
use kurbo::Vec2;
use std::collections::HashMap;
use thiserror::Error;

/// Graph model errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("Element not found: {0}")]
    NotFound(ElementId),
    #[error("Duplicate element id: {0}")]
    DuplicateId(ElementId),
    #[error("Edge endpoint {0} is not a node in this graph")]
    MissingEndpoint(ElementId),
    #[error("Element {0} is not a node")]
    NotANode(ElementId),
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// The scene model the render pipeline reads from.
///
/// Every mutating operation notifies subscribers; wrap related mutations in
/// [`GraphModel::batch`] so they are delivered as one consistent change.
#[derive(Debug, Default)]
pub struct GraphModel {
    elements: HashMap<ElementId, Element>,
    /// Insertion order, used as the z-order tie-break.
    insertion_order: Vec<ElementId>,
    /// Transient preview shown during a creation gesture.
    faker_element: Option<Element>,
    edit_config: EditConfig,
    transform: ViewTransform,
    notifier: Notifier,
}

impl GraphModel {
    /// Empty model with default edit flags and an identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&mut self) -> Subscription {
        self.notifier.subscribe()
    }

    /// Run `f` with notifications coalesced into a single change.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.notifier.begin_batch();
        let result = f(self);
        self.notifier.end_batch();
        result
    }

    /// Add a node.
    pub fn add_node(&mut self, node: Element) -> GraphResult<ElementId> {
        if !node.is_node() {
            return Err(GraphError::NotANode(node.id));
        }
        self.insert(node)
    }

    /// Add an edge. Both endpoints must be existing nodes.
    pub fn add_edge(&mut self, edge: Element) -> GraphResult<ElementId> {
        if let ElementKind::Edge(EdgeGeometry { source, target, .. }) = &edge.kind {
            for endpoint in [*source, *target] {
                if !self.elements.get(&endpoint).is_some_and(Element::is_node) {
                    return Err(GraphError::MissingEndpoint(endpoint));
                }
            }
        }
        self.insert(edge)
    }

    fn insert(&mut self, element: Element) -> GraphResult<ElementId> {
        let id = element.id;
        if self.elements.contains_key(&id) {
            return Err(GraphError::DuplicateId(id));
        }
        self.insertion_order.push(id);
        self.elements.insert(id, element);
        self.notifier.notify(ModelChange::Elements);
        Ok(id)
    }

    /// Look up a committed element. The preview is not included.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Number of committed elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether no element is committed. A preview may still be showing.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in paint order (back to front).
    ///
    /// Sorted by z-index; equal z-indices keep insertion order.
    pub fn sort_elements(&self) -> Vec<&Element> {
        let mut ordered: Vec<&Element> = self
            .insertion_order
            .iter()
            .filter_map(|id| self.elements.get(id))
            .collect();
        // sort_by_key is stable
        ordered.sort_by_key(|e| e.z_index);
        ordered
    }

    /// Set an element's rendering priority.
    pub fn set_z_index(&mut self, id: ElementId, z_index: i64) -> GraphResult<()> {
        let element = self.elements.get_mut(&id).ok_or(GraphError::NotFound(id))?;
        element.z_index = z_index;
        self.notifier.notify(ModelChange::Elements);
        Ok(())
    }

    /// Raise an element above every other element.
    pub fn to_front(&mut self, id: ElementId) -> GraphResult<()> {
        let top = self
            .elements
            .values()
            .filter(|e| e.id != id)
            .map(|e| e.z_index)
            .max();
        let element = self.elements.get_mut(&id).ok_or(GraphError::NotFound(id))?;
        if let Some(top) = top {
            if element.z_index <= top {
                element.z_index = top + 1;
                self.notifier.notify(ModelChange::Elements);
            }
        }
        Ok(())
    }

    /// Select a single element, clearing the rest.
    pub fn select(&mut self, id: ElementId) -> GraphResult<()> {
        if !self.elements.contains_key(&id) {
            return Err(GraphError::NotFound(id));
        }
        for element in self.elements.values_mut() {
            element.selected = element.id == id;
        }
        self.notifier.notify(ModelChange::Selection);
        Ok(())
    }

    /// Add an element to the selection, keeping the rest selected.
    pub fn add_to_selection(&mut self, id: ElementId) -> GraphResult<()> {
        let element = self.elements.get_mut(&id).ok_or(GraphError::NotFound(id))?;
        element.selected = true;
        self.notifier.notify(ModelChange::Selection);
        Ok(())
    }

    /// Selected elements in paint order.
    pub fn selected_elements(&self) -> Vec<&Element> {
        self.sort_elements().into_iter().filter(|e| e.selected).collect()
    }

    /// Set (or clear) the hovered element.
    pub fn set_hovered(&mut self, id: Option<ElementId>) -> GraphResult<()> {
        if let Some(id) = id {
            if !self.elements.contains_key(&id) {
                return Err(GraphError::NotFound(id));
            }
        }
        for element in self.elements.values_mut() {
            element.hovered = Some(element.id) == id;
        }
        self.notifier.notify(ModelChange::Selection);
        Ok(())
    }

    /// The transient preview element, if a creation gesture is active.
    pub fn faker_element(&self) -> Option<&Element> {
        self.faker_element.as_ref()
    }

    /// Show `element` as the preview, replacing any previous one.
    pub fn set_faker_element(&mut self, element: Element) {
        self.faker_element = Some(element);
        self.notifier.notify(ModelChange::Preview);
    }

    /// Clear the preview. Returns the cleared element.
    pub fn clear_faker_element(&mut self) -> Option<Element> {
        let cleared = self.faker_element.take();
        if cleared.is_some() {
            self.notifier.notify(ModelChange::Preview);
        }
        cleared
    }

    /// Current edit-mode flags.
    pub fn edit_config(&self) -> &EditConfig {
        &self.edit_config
    }

    /// Change edit-mode flags. Notifies only if something changed.
    pub fn update_edit_config(&mut self, f: impl FnOnce(&mut EditConfig)) {
        let before = self.edit_config.clone();
        f(&mut self.edit_config);
        if self.edit_config != before {
            self.notifier.notify(ModelChange::EditConfig);
        }
    }

    /// Canvas to container transform.
    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    /// Pan the canvas by `delta` container pixels, unless panning is stopped.
    pub fn translate(&mut self, delta: Vec2) {
        if self.edit_config.stop_move_graph {
            return;
        }
        self.transform.translate(delta);
        self.notifier.notify(ModelChange::Transform);
    }
}

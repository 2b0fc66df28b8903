//! Root container: sizing and pointer event binding.

use crate::error::{RenderError, RenderResult};
use flowink_core::{EventMap, GraphModel, GraphOptions, PointerEvent};

/// Inline style of the root container.
///
/// `None` leaves the axis to the surrounding layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerStyle {
    pub width: Option<String>,
    pub height: Option<String>,
}

impl ContainerStyle {
    /// Pixel size for each axis given in `options`.
    pub fn from_options(options: &GraphOptions) -> Self {
        Self {
            width: options.width.map(px),
            height: options.height.map(px),
        }
    }
}

fn px(value: f64) -> String {
    format!("{}px", value)
}

/// Holds the event map bound to the root container for one mount.
#[derive(Debug, Default)]
pub struct SurfaceBinder {
    bound: Option<EventMap>,
    bind_count: usize,
}

impl SurfaceBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the collaborator's handlers. Fails if already bound.
    pub fn bind(&mut self, event_map: &EventMap) -> RenderResult<()> {
        if self.bound.is_some() {
            return Err(RenderError::AlreadyMounted);
        }
        log::debug!("binding {} pointer handler(s) to root container", event_map.len());
        self.bound = Some(event_map.clone());
        self.bind_count += 1;
        Ok(())
    }

    /// Release the bound handlers. No-op when nothing is bound.
    pub fn unbind(&mut self) {
        if self.bound.take().is_some() {
            log::debug!("root container handlers released");
        }
    }

    /// Whether handlers are bound for the current mount.
    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    /// The bound event map, if any.
    pub fn bound(&self) -> Option<&EventMap> {
        self.bound.as_ref()
    }

    /// How many times handlers have been bound over this binder's life.
    pub fn bind_count(&self) -> usize {
        self.bind_count
    }

    /// Route a pointer event to its bound handler.
    ///
    /// Returns `Ok(false)` when no handler listens for the event. Handler
    /// errors are returned to the caller untouched.
    pub fn dispatch(&self, graph: &mut GraphModel, event: &PointerEvent) -> RenderResult<bool> {
        let map = self.bound.as_ref().ok_or(RenderError::NotMounted)?;
        let Some(handler) = map.get(event.kind) else {
            return Ok(false);
        };
        handler(graph, event)?;
        Ok(true)
    }
}

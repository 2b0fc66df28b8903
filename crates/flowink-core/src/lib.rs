//! FlowInk Core Library
//!
//! Editor state consumed by the FlowInk render pipeline: elements, the graph
//! model with its change notifications, global options and the interaction
//! collaborators (drag-and-drop, snaplines, tools, event delivery).

pub mod dnd;
pub mod edit_config;
pub mod element;
pub mod event;
pub mod graph;
pub mod notify;
pub mod options;
pub mod snapline;
pub mod tool;
pub mod transform;

pub use dnd::{DragAndDrop, EventMap, NodeConfig, PointerEvent, PointerEventKind, PointerHandler};
pub use edit_config::EditConfig;
pub use element::{EdgeGeometry, Element, ElementId, ElementKind, NodeGeometry};
pub use event::{EventArgs, EventCenter, ListenerId};
pub use graph::{GraphError, GraphModel, GraphResult};
pub use notify::{ModelChange, Subscription};
pub use options::{BackgroundConfig, ConfigError, ConfigResult, GraphOptions, GridConfig, GridKind};
pub use snapline::{SnaplineModel, SnaplinePosition};
pub use tool::{ToolContext, ToolEntry};
pub use transform::ViewTransform;

//! FlowInk Render Library
//!
//! Scene composition for FlowInk: element renderers, the fixed overlay
//! stack and the mount/re-render driver. Backends implement [`Renderer`]
//! and consume composed [`Frame`]s.

pub mod compositor;
pub mod content;
mod error;
pub mod gate;
pub mod layer;
pub mod overlays;
mod reconcile;
mod renderer;
pub mod surface;
mod view;
pub mod views;

pub use compositor::{Composition, compose};
pub use error::{RenderError, RenderResult};
pub use gate::OverlayGate;
pub use layer::{DrawCommand, Frame, Layer, LayerKind, MountDiff, ViewKey};
pub use reconcile::Reconciler;
pub use renderer::{DisplayItem, DisplayListRenderer, Renderer, flatten};
pub use surface::{ContainerStyle, SurfaceBinder};
pub use view::GraphView;
pub use views::{ElementView, MountedView, ViewFactory, ViewProps, ViewRegistry};

//! Frame-to-frame identity tracking.

use crate::layer::{Frame, LayerKind, MountDiff, ViewKey};
use std::collections::HashSet;

/// Remembers which views and layers the previous frame mounted.
#[derive(Debug, Default)]
pub struct Reconciler {
    views: Vec<ViewKey>,
    layers: Vec<LayerKind>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare `frame` with the previous one and remember it.
    pub fn reconcile(&mut self, frame: &Frame) -> MountDiff {
        let views = frame.view_keys();
        let layers = frame.all_layer_kinds();

        let previous: HashSet<ViewKey> = self.views.iter().copied().collect();
        let next: HashSet<ViewKey> = views.iter().copied().collect();
        let (retained, mounted): (Vec<ViewKey>, Vec<ViewKey>) =
            views.iter().copied().partition(|k| previous.contains(k));
        let unmounted = self.views.iter().copied().filter(|k| !next.contains(k)).collect();

        let layers_mounted = layers.iter().copied().filter(|l| !self.layers.contains(l)).collect();
        let layers_unmounted = self.layers.iter().copied().filter(|l| !layers.contains(l)).collect();

        self.views = views;
        self.layers = layers;

        MountDiff {
            mounted,
            retained,
            unmounted,
            layers_mounted,
            layers_unmounted,
        }
    }

    /// Forget everything, as after an unmount.
    pub fn reset(&mut self) {
        self.views.clear();
        self.layers.clear();
    }
}

//! Change notification for the graph model.
//!
//! Subscribers receive [`ModelChange`] values over an mpsc channel and pull
//! a fresh snapshot from the model when they drain it. Mutations made inside
//! [`GraphModel::batch`](crate::GraphModel::batch) are coalesced into one
//! notification so a subscriber never observes a half-applied update.

use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};

/// What kind of state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelChange {
    /// Elements were added, removed, moved or reordered.
    Elements,
    /// Selection or hover flags changed.
    Selection,
    /// The transient preview element was set or cleared.
    Preview,
    /// Edit configuration flags changed.
    EditConfig,
    /// The view transform changed.
    Transform,
    /// Several changes applied together.
    Batch,
}

/// Receiving end of a model subscription.
#[derive(Debug)]
pub struct Subscription {
    rx: Receiver<ModelChange>,
}

impl Subscription {
    /// Drain every pending notification.
    ///
    /// Returns an empty vector when nothing changed since the last call.
    pub fn drain(&self) -> Vec<ModelChange> {
        let mut changes = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(change) => changes.push(change),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        changes
    }

    /// Whether at least one notification is pending, consuming all of them.
    pub fn has_changes(&self) -> bool {
        !self.drain().is_empty()
    }
}

/// Fan-out of change notifications with batching.
#[derive(Debug, Default)]
pub struct Notifier {
    subscribers: Vec<Sender<ModelChange>>,
    batch_depth: usize,
    batch_dirty: bool,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new subscription.
    pub fn subscribe(&mut self) -> Subscription {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        Subscription { rx }
    }

    /// Live subscriptions, as of the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Publish a change, or record it if a batch is open.
    pub fn notify(&mut self, change: ModelChange) {
        if self.batch_depth > 0 {
            self.batch_dirty = true;
            return;
        }
        self.publish(change);
    }

    /// Open a (possibly nested) batch.
    pub fn begin_batch(&mut self) {
        self.batch_depth += 1;
    }

    /// Close a batch; the outermost close publishes one `Batch` change.
    pub fn end_batch(&mut self) {
        self.batch_depth = self.batch_depth.saturating_sub(1);
        if self.batch_depth == 0 && self.batch_dirty {
            self.batch_dirty = false;
            self.publish(ModelChange::Batch);
        }
    }

    fn publish(&mut self, change: ModelChange) {
        // Dropped subscriptions are pruned on send failure
        self.subscribers.retain(|tx| tx.send(change).is_ok());
    }
}

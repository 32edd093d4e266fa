//! Single-consumer broadcast loop
//!
//! Every producer (the round scheduler and each connection handler) holds a
//! [`BroadcastHandle`] and only enqueues. The [`Broadcaster`] task drains the
//! queue in order, which gives one total order over everything participants
//! see, and it is the only code that mutates the [`ConnectionRegistry`].

use crate::registry::{ConnectionId, ConnectionRegistry, OutboundSink};
use log::{debug, error, warn};
use shared::Message;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Events queued for the broadcast loop
pub enum BroadcastEvent {
    Register { id: ConnectionId, sink: OutboundSink },
    Unregister { id: ConnectionId },
    Publish(Message),
}

/// Cloneable producer side of the broadcast queue. Enqueueing never blocks.
#[derive(Clone)]
pub struct BroadcastHandle {
    events: mpsc::UnboundedSender<BroadcastEvent>,
    next_id: Arc<AtomicU64>,
}

impl BroadcastHandle {
    /// Allocates an id for a new connection and queues its registration.
    /// Anything published after this call reaches the new connection.
    pub fn register(&self, sink: OutboundSink) -> ConnectionId {
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.send(BroadcastEvent::Register { id, sink });
        id
    }

    pub fn unregister(&self, id: ConnectionId) {
        self.send(BroadcastEvent::Unregister { id });
    }

    pub fn publish(&self, message: Message) {
        self.send(BroadcastEvent::Publish(message));
    }

    fn send(&self, event: BroadcastEvent) {
        if let Err(e) = self.events.send(event) {
            error!("Failed to queue broadcast event: {}", e);
        }
    }
}

/// Owns the registry and fans each published message out to it.
pub struct Broadcaster {
    events: mpsc::UnboundedReceiver<BroadcastEvent>,
    registry: ConnectionRegistry,
}

impl Broadcaster {
    pub fn new() -> (Self, BroadcastHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let broadcaster = Self {
            events: rx,
            registry: ConnectionRegistry::new(),
        };
        let handle = BroadcastHandle {
            events: tx,
            next_id: Arc::new(AtomicU64::new(1)),
        };
        (broadcaster, handle)
    }

    /// Processes events until every handle has been dropped.
    pub async fn run(mut self) {
        while let Some(event) = self.events.recv().await {
            self.handle_event(event).await;
        }
        debug!("Broadcast queue closed");
    }

    pub async fn handle_event(&mut self, event: BroadcastEvent) {
        match event {
            BroadcastEvent::Register { id, sink } => self.registry.insert(id, sink),
            BroadcastEvent::Unregister { id } => {
                self.registry.remove(id).await;
            }
            BroadcastEvent::Publish(message) => self.broadcast(&message).await,
        }
    }

    /// Delivers one message to every registered connection, pruning any
    /// connection whose write fails.
    async fn broadcast(&mut self, message: &Message) {
        let text = match serde_json::to_string(message) {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to encode message from {}: {}", message.username, e);
                return;
            }
        };

        debug!(
            "Broadcasting {} to {} connections",
            text,
            self.registry.len()
        );

        for (id, e) in self.registry.deliver(&text).await {
            warn!("Write to connection {} failed: {}", id, e);
            self.registry.remove(id).await;
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }
}

/// In-memory outbound sink for tests. Dropping the receiver makes writes fail.
#[cfg(test)]
pub(crate) fn channel_sink() -> (OutboundSink, futures::channel::mpsc::UnboundedReceiver<String>) {
    use crate::error::BoxError;
    use futures::SinkExt;

    let (tx, rx) = futures::channel::mpsc::unbounded::<String>();
    let sink = tx.sink_map_err(|e| -> BoxError { Box::new(e) });
    (Box::pin(sink), rx)
}

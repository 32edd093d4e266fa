//! Live connection set for the broadcast loop
//!
//! The registry is owned by the [`Broadcaster`](crate::broadcaster::Broadcaster)
//! and only ever touched from its task. Other components reach it indirectly
//! by queueing register/unregister events, so there is no lock around
//! iteration or removal.

use crate::error::BoxError;
use futures::{Sink, SinkExt};
use log::{debug, info};
use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;

/// Outbound half of a participant's transport. Accepts encoded JSON text.
pub type OutboundSink = Pin<Box<dyn Sink<String, Error = BoxError> + Send>>;

/// Server-assigned connection identifier. Distinct from the participant
/// identity, which is whatever username the client puts in its messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Registered connections and their outbound sinks
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, OutboundSink>,
}

impl ConnectionRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection. A repeated id replaces the earlier sink.
    pub fn insert(&mut self, id: ConnectionId, sink: OutboundSink) {
        self.connections.insert(id, sink);
        info!(
            "Connection {} registered ({} live)",
            id,
            self.connections.len()
        );
    }

    /// Removes a connection and closes its transport. Returns false if it
    /// was already gone, e.g. pruned after a failed write.
    pub async fn remove(&mut self, id: ConnectionId) -> bool {
        match self.connections.remove(&id) {
            Some(mut sink) => {
                if let Err(e) = sink.close().await {
                    debug!("Closing connection {} failed: {}", id, e);
                }
                info!(
                    "Connection {} removed ({} live)",
                    id,
                    self.connections.len()
                );
                true
            }
            None => false,
        }
    }

    /// Writes `text` to every connection in turn. A failed write does not
    /// stop delivery to the rest; failures are returned for pruning.
    pub async fn deliver(&mut self, text: &str) -> Vec<(ConnectionId, BoxError)> {
        let mut failed = Vec::new();
        for (id, sink) in self.connections.iter_mut() {
            if let Err(e) = sink.send(text.to_string()).await {
                failed.push((*id, e));
            }
        }
        failed
    }

    /// Whether `id` is still registered.
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.connections.contains_key(&id)
    }

    /// Number of live connections.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

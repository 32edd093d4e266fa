//! Per-connection guess handling

use crate::broadcaster::BroadcastHandle;
use crate::error::BoxError;
use crate::registry::ConnectionId;
use crate::round::RoundState;
use crate::scores::ScoreLedger;
use futures::{Stream, StreamExt};
use log::info;
use shared::{Message, CORRECT_GUESS};
use std::sync::Arc;

/// Reads one participant's messages, scores correct guesses, and relays
/// everything to the broadcast queue.
pub struct ConnectionHandler {
    id: ConnectionId,
    round: Arc<RoundState>,
    scores: Arc<ScoreLedger>,
    outbox: BroadcastHandle,
}

impl ConnectionHandler {
    pub fn new(
        id: ConnectionId,
        round: Arc<RoundState>,
        scores: Arc<ScoreLedger>,
        outbox: BroadcastHandle,
    ) -> Self {
        Self {
            id,
            round,
            scores,
            outbox,
        }
    }

    /// Runs until the inbound stream fails or ends, then unregisters the
    /// connection. There is no retry; a decode error counts as a disconnect.
    pub async fn run<S>(self, mut inbound: S)
    where
        S: Stream<Item = Result<Message, BoxError>> + Unpin,
    {
        loop {
            match inbound.next().await {
                Some(Ok(message)) => {
                    let relayed = self.handle_message(message).await;
                    self.outbox.publish(relayed);
                }
                Some(Err(e)) => {
                    info!("Connection {} read failed: {}", self.id, e);
                    break;
                }
                None => {
                    info!("Connection {} closed by peer", self.id);
                    break;
                }
            }
        }
        self.outbox.unregister(self.id);
    }

    /// Scores one message and returns what should be relayed: the message
    /// itself, or an acknowledgment under the same sender if it solved the
    /// active puzzle.
    pub async fn handle_message(&self, message: Message) -> Message {
        self.scores.ensure(&message.username).await;

        if self.round.is_solved_by(&message.message).await {
            self.scores.increment(&message.username).await;
            info!("{} solved the puzzle", message.username);
            return Message::new(message.username, CORRECT_GUESS);
        }

        message
    }
}

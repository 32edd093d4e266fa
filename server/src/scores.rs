//! Per-participant score ledger

use log::info;
use shared::Scores;
use tokio::sync::Mutex;

/// Correct-guess counts keyed by participant identity.
///
/// Entries are created on a participant's first message and never removed,
/// so scores outlive disconnects and rotations.
#[derive(Debug, Default)]
pub struct ScoreLedger {
    scores: Mutex<Scores>,
}

impl ScoreLedger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a zero entry if the identity has none yet.
    pub async fn ensure(&self, identity: &str) {
        let mut scores = self.scores.lock().await;
        if !scores.contains_key(identity) {
            scores.insert(identity.to_string(), 0);
            info!("Tracking score for {}", identity);
        }
    }

    /// Adds one point, creating the entry at zero first if needed.
    pub async fn increment(&self, identity: &str) {
        let mut scores = self.scores.lock().await;
        *scores.entry(identity.to_string()).or_insert(0) += 1;
    }

    /// Current score, or `None` for an identity never seen.
    pub async fn get(&self, identity: &str) -> Option<u32> {
        self.scores.lock().await.get(identity).copied()
    }

    /// Copy of the whole ledger, detached from later mutation.
    pub async fn snapshot(&self) -> Scores {
        self.scores.lock().await.clone()
    }
}

//! The currently active puzzle, shared between the scheduler and every
//! connection handler.

use shared::Puzzle;
use tokio::sync::Mutex;

/// Holds the active puzzle. Each rotation replaces it wholesale, so readers
/// see either the previous puzzle or the new one.
///
/// Empty until the first rotation; no guess can match before then.
#[derive(Debug, Default)]
pub struct RoundState {
    current: Mutex<Option<Puzzle>>,
}

impl RoundState {
    /// Empty state, before the first rotation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the active puzzle.
    pub async fn set(&self, puzzle: Puzzle) {
        *self.current.lock().await = Some(puzzle);
    }

    /// Snapshot of the active puzzle.
    pub async fn get(&self) -> Option<Puzzle> {
        self.current.lock().await.clone()
    }

    /// Checks a guess against the active puzzle without cloning it.
    pub async fn is_solved_by(&self, guess: &str) -> bool {
        self.current
            .lock()
            .await
            .as_ref()
            .is_some_and(|puzzle| puzzle.is_solved_by(guess))
    }
}

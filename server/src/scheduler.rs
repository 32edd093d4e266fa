//! Round lifecycle: puzzle rotation and mid-round hints
//!
//! Two independent timers share one start instant. Rotation fires every
//! round interval; the hint timer fires on the same period but half an
//! interval later, so each hint lands midway through the round it belongs
//! to:
//!
//! ```text
//! t = 0      1.0      1.5      2.0      2.5      3.0   (round intervals)
//!            rotate   hint     rotate   hint     rotate
//! ```
//!
//! Both timers only produce messages; delivery is the broadcaster's job.

use crate::broadcaster::BroadcastHandle;
use crate::round::RoundState;
use crate::scores::ScoreLedger;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{Message, Puzzle, PuzzleSet};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub struct RoundScheduler {
    puzzles: Arc<PuzzleSet>,
    round: Arc<RoundState>,
    scores: Arc<ScoreLedger>,
    outbox: BroadcastHandle,
    round_interval: Duration,
    rng: Mutex<StdRng>,
}

impl RoundScheduler {
    pub fn new(
        puzzles: Arc<PuzzleSet>,
        round: Arc<RoundState>,
        scores: Arc<ScoreLedger>,
        outbox: BroadcastHandle,
        round_interval: Duration,
    ) -> Self {
        Self {
            puzzles,
            round,
            scores,
            outbox,
            round_interval,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Makes puzzle selection reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Starts the rotation and hint timers. They run until aborted.
    pub fn spawn(self) -> (JoinHandle<()>, JoinHandle<()>) {
        let scheduler = Arc::new(self);
        let start = Instant::now();

        let rotation = {
            let scheduler = Arc::clone(&scheduler);
            tokio::spawn(async move { scheduler.run_rotation(start).await })
        };
        let hints = tokio::spawn(async move { scheduler.run_hints(start).await });

        (rotation, hints)
    }

    async fn run_rotation(&self, start: Instant) {
        let mut ticker = interval_at(start + self.round_interval, self.round_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            self.rotate().await;
        }
    }

    async fn run_hints(&self, start: Instant) {
        let first = start + self.round_interval + self.round_interval / 2;
        let mut ticker = interval_at(first, self.round_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            self.reveal_hint().await;
        }
    }

    /// Picks the next puzzle, makes it active, then announces the standings
    /// followed by the new scrambled word.
    pub async fn rotate(&self) -> Puzzle {
        let puzzle = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            self.puzzles.choose(&mut *rng).clone()
        };
        self.round.set(puzzle.clone()).await;

        let standings = self.scores.snapshot().await;
        self.outbox.publish(Message::scores(&standings));
        self.outbox.publish(Message::puzzle(&puzzle));

        info!("New round: {}", puzzle.scrambled);
        debug!("Answer is {}", puzzle.answer);
        puzzle
    }

    /// Announces the hint for whichever puzzle is active right now.
    /// Does nothing before the first rotation.
    pub async fn reveal_hint(&self) -> Option<Puzzle> {
        let puzzle = self.round.get().await?;
        self.outbox.publish(Message::hint(&puzzle));
        info!("Hint for {}: {}", puzzle.scrambled, puzzle.hint);
        Some(puzzle)
    }
}

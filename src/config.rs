/// How a unit of recovery work is scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Schedule {
    #[default]
    Sequential,
    Parallel,
}

/// Tuning for a recovery run. The defaults recover every block and every
/// candidate byte in order on the calling thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecoveryConfig {
    /// Blocks are independent of each other, so may be recovered concurrently.
    pub blocks: Schedule,
    /// The 256 guesses for a single byte position. The lowest validating guess
    /// is always the one accepted, whichever schedule is used.
    pub candidates: Schedule,
    /// Size of a dedicated thread pool for parallel work. `None` uses rayon's
    /// global pool.
    pub threads: Option<usize>,
}

impl RecoveryConfig {
    pub fn parallel() -> Self {
        Self {
            blocks: Schedule::Parallel,
            ..Self::default()
        }
    }

    pub fn with_candidates(mut self, candidates: Schedule) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub(crate) fn is_parallel(&self) -> bool {
        self.blocks == Schedule::Parallel || self.candidates == Schedule::Parallel
    }
}

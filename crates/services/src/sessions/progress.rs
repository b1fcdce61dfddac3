use std::sync::Arc;

use storage::repository::ProgressRepository;
use tutor_core::model::Progress;

/// Loads and saves the child's progress counters.
///
/// Storage failures are logged and swallowed; a database hiccup must never
/// interrupt a session that can keep running on in-memory state.
#[derive(Clone)]
pub struct ProgressLedger {
    repo: Arc<dyn ProgressRepository>,
}

impl ProgressLedger {
    #[must_use]
    pub fn new(repo: Arc<dyn ProgressRepository>) -> Self {
        Self { repo }
    }

    /// Loads saved progress, starting fresh if the row is missing or
    /// unreadable.
    pub async fn load_or_default(&self) -> Progress {
        match self.repo.get_progress().await {
            Ok(Some(progress)) => progress,
            Ok(None) => Progress::new(),
            Err(err) => {
                tracing::warn!(%err, "failed to load progress; starting fresh");
                Progress::new()
            }
        }
    }

    pub async fn persist(&self, progress: &Progress) {
        if let Err(err) = self.repo.save_progress(progress).await {
            tracing::warn!(%err, "failed to save progress");
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

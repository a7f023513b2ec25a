//! Run summary types.

use super::result::ProcessingResult;

/// Summary of a complete run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of repositories checked.
    pub repositories_checked: usize,

    /// Number of release notifications sent.
    pub notifications_sent: usize,

    /// Number of repositories whose latest release was already announced.
    pub unchanged: usize,

    /// Number of repositories without a published release.
    pub skipped: usize,

    /// Number of repositories that failed to process.
    pub failed: usize,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Updates the summary with a processing result.
    pub fn record_result(&mut self, result: &ProcessingResult) {
        self.repositories_checked += 1;
        match result {
            ProcessingResult::Notified { .. } => self.notifications_sent += 1,
            ProcessingResult::Unchanged { .. } => self.unchanged += 1,
            ProcessingResult::Skipped { .. } => self.skipped += 1,
            ProcessingResult::Failed { .. } => self.failed += 1,
        }
    }

    /// Returns true if any repository failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

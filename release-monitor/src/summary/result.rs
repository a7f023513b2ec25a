//! Processing result types.

/// Result of processing a single repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingResult {
    /// A new release was announced.
    Notified {
        /// Repository slug.
        repository: String,
        /// Name of the announced release.
        release: String,
    },

    /// The latest release was already announced.
    Unchanged {
        /// Repository slug.
        repository: String,
        /// Name of the latest release.
        release: String,
    },

    /// Processing was skipped.
    Skipped {
        /// Repository slug.
        repository: String,
        /// Reason for skipping.
        reason: String,
    },

    /// Processing failed.
    Failed {
        /// Repository slug.
        repository: String,
        /// Error message.
        error: String,
    },
}

impl ProcessingResult {
    /// Returns the repository slug this result is for.
    #[must_use]
    pub fn repository(&self) -> &str {
        match self {
            Self::Notified { repository, .. }
            | Self::Unchanged { repository, .. }
            | Self::Skipped { repository, .. }
            | Self::Failed { repository, .. } => repository,
        }
    }
}

use thiserror::Error;

/// Errors surfaced by the sequencing core and its drivers.
///
/// Running past the last mutation is not an error: it is reported as
/// [`StepOutcome::Exhausted`](crate::harness::sequencer::StepOutcome::Exhausted).
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("mutation sequence must contain at least one slot")]
    EmptySequence,

    #[error("starting index {index} is outside 0..{len}")]
    StartOutOfRange { index: usize, len: usize },

    #[error("mutation {index} failed: {source}")]
    MutationFailed {
        index: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("mutation {index} panicked: {message}")]
    MutationPanicked { index: usize, message: String },

    #[error("snapshot capture after mutation {index} failed: {source}")]
    Capture {
        index: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("harness already has a live trigger binding")]
    AlreadyBound,
}

impl HarnessError {
    /// Index of the mutation the error is correlated with, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::MutationFailed { index, .. }
            | Self::MutationPanicked { index, .. }
            | Self::Capture { index, .. }
            | Self::StartOutOfRange { index, .. } => Some(*index),
            Self::EmptySequence | Self::AlreadyBound => None,
        }
    }
}

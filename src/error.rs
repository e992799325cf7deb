use thiserror::Error;

/// Failure classes for poll operations.
///
/// Validation errors (`InvalidUrl`, `InvalidDate`, `IndexOutOfRange`) are
/// raised before any remote mutation starts. Transport errors on a read
/// abort the whole operation; on a write they are folded into a per-item
/// outcome line instead of propagating.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("Invalid URL format.")]
    InvalidUrl,

    #[error("Invalid date: {value}")]
    InvalidDate { value: String },

    #[error("Index {index} out of range.")]
    IndexOutOfRange { index: i64 },

    /// The remote host answered with a non-2xx status.
    #[error("HTTP {status}")]
    Status { status: u16 },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

impl PollError {
    pub fn invalid_date(value: impl Into<String>) -> Self {
        PollError::InvalidDate {
            value: value.into(),
        }
    }

    /// True for errors a caller can fix by correcting their input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PollError::InvalidUrl
                | PollError::InvalidDate { .. }
                | PollError::IndexOutOfRange { .. }
        )
    }
}

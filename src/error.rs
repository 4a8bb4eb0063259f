//! Error types for the assistant core

use thiserror::Error;

use crate::backend::BackendError;

/// Result type for assistant operations
pub type AssistantResult<T> = Result<T, AssistantError>;

/// Errors surfaced by the tool surface and the query/cache core.
///
/// Validation errors (`InvalidRange`, `InvalidTimeRange`, `InvalidQuery`,
/// `FolderNotFound`) are raised before any backend call and have no side
/// effects. `StaleOrUnknownIndex` short-circuits before a backend fetch is
/// attempted. Backend failures are never retried here; they carry enough
/// context for the caller to decide whether to re-issue the call.
#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("'days' must be between 1 and {max}, got {days}")]
    InvalidRange { days: i64, max: i64 },

    #[error("invalid time range: {reason}")]
    InvalidTimeRange { reason: String },

    #[error("invalid search query: {reason}")]
    InvalidQuery { reason: String },

    #[error("folder '{name}' not found")]
    FolderNotFound { name: String },

    #[error("item #{number} is not in the current listing: {reason}")]
    StaleOrUnknownIndex { number: usize, reason: String },

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl AssistantError {
    pub fn invalid_time_range(reason: impl Into<String>) -> Self {
        AssistantError::InvalidTimeRange {
            reason: reason.into(),
        }
    }

    pub fn invalid_query(reason: impl Into<String>) -> Self {
        AssistantError::InvalidQuery {
            reason: reason.into(),
        }
    }

    pub fn folder_not_found(name: impl Into<String>) -> Self {
        AssistantError::FolderNotFound { name: name.into() }
    }

    pub fn stale_index(number: usize, reason: impl Into<String>) -> Self {
        AssistantError::StaleOrUnknownIndex {
            number,
            reason: reason.into(),
        }
    }
}

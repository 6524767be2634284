//! Plex Assistant Error Types
//!
//! Centralized error handling for the command pipeline.

use thiserror::Error;

/// Central error type for Plex Assistant
#[derive(Error, Debug)]
pub enum AssistError {
    /// Nothing matched the request; carries the spoken "not found" message.
    #[error("{0}")]
    MediaNotFound(String),

    /// A title was resolved but no library entity carries it.
    #[error("No library entity titled '{title}'")]
    EntityNotFound { title: String },

    #[error("Cast device not found: {0}")]
    DeviceNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Library error: {0}")]
    Library(String),

    #[error("Lock poisoned: {0}")]
    Lock(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Plex Assistant operations
pub type AssistResult<T> = Result<T, AssistError>;

/// Helper to convert Mutex poison errors
impl<T> From<std::sync::PoisonError<T>> for AssistError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        AssistError::Lock(err.to_string())
    }
}

/// Failures of the media narrowing state machine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("No library entity titled '{title}'")]
    EntityNotFound { title: String },

    #[error("Season {0} not found")]
    SeasonNotFound(u32),

    #[error("Season {season} episode {episode} not found")]
    EpisodeNotFound { season: u32, episode: u32 },

    #[error("Track {0} not found")]
    TrackNotFound(u32),

    #[error("{0} has no playable items")]
    NoPlayable(String),

    #[error("Nothing matched the selection")]
    Empty,

    #[error("Library provider error: {0}")]
    Provider(String),
}

impl From<ResolveError> for AssistError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::EntityNotFound { title } => AssistError::EntityNotFound { title },
            other => AssistError::Library(other.to_string()),
        }
    }
}

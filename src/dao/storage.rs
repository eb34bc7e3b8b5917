use std::error::Error;
use thiserror::Error;
use uuid::Uuid;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying database.
///
/// Besides plain unavailability this carries the typed outcomes of
/// conditional writes: transitions such as locking a bet or finalizing a
/// game are guarded inside the store, so losing a guard surfaces here.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend cannot be reached or failed internally.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Human-readable description of the failure.
        message: String,
        /// Underlying backend error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A referenced row does not exist.
    #[error("{entity} `{id}` not found")]
    NotFound {
        /// Entity kind, e.g. "game".
        entity: &'static str,
        /// Identifier that failed to resolve.
        id: Uuid,
    },
    /// A bet write arrived at or after the game's cutoff.
    #[error("betting closed for this game")]
    CutoffClosed,
    /// A bet write hit a bet that is already locked or scored.
    #[error("bet is locked")]
    BetLocked,
    /// Finalization hit a game that is already finished.
    #[error("game already finalized")]
    AlreadyFinalized,
    /// A game insert referenced a closed round.
    #[error("round is closed")]
    RoundClosed,
    /// A user insert reused an existing nickname.
    #[error("nickname `{0}` is already taken")]
    NicknameTaken(String),
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}

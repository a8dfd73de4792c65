//! Error types for the carrier lifecycle core.
//!
//! The dispatcher itself never fails; every error surfaced by a trigger call
//! originates in a registered observer. Observer errors are caller-defined
//! and unconstrained, so they cross the dispatch boundary as an opaque boxed
//! error rather than a fixed taxonomy.

/// Result type alias for carrier operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Catch-all error type returned by lifecycle observers.
///
/// Observers are user-supplied closures; whatever error type they produce is
/// boxed at the dispatch boundary and carried opaquely, either into the log
/// record (absorb mode) or out of the trigger call (propagate mode).
pub type ObserverError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for the carrier crate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An observer failed while `fail_on_error` was enabled.
    ///
    /// Transparent: `Display` and `source()` delegate to the original
    /// observer error, so callers see the failure exactly as raised and can
    /// downcast to the observer's concrete error type.
    #[error(transparent)]
    Observer(#[from] ObserverError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an observer error from any error value.
    #[must_use]
    pub fn observer(err: impl Into<ObserverError>) -> Self {
        Self::Observer(err.into())
    }
}

//! Shared error types for the services crate.

use thiserror::Error;

use reader_core::model::ChapterId;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use storage::CatalogError;

/// Failures of the external word lookup.
///
/// These never reach readers of the resolver: `WordResolver` turns each
/// variant into a sentinel `WordDetail` via [`LookupError::placeholder`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LookupError {
    #[error("word must not be empty")]
    InvalidInput,
    #[error("AI lookup is not configured")]
    Disabled,
    #[error("AI lookup returned an empty response")]
    EmptyResponse,
    #[error("AI lookup returned an invalid format: {0}")]
    InvalidFormat(String),
    #[error("AI lookup failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl LookupError {
    /// Translation text shown in place of a result, distinct per failure kind.
    #[must_use]
    pub fn placeholder(&self) -> &'static str {
        match self {
            LookupError::InvalidInput => "(Invalid input)",
            LookupError::Disabled => "(AI lookup unavailable)",
            LookupError::EmptyResponse | LookupError::InvalidFormat(_) => {
                "(AI lookup failed - invalid format)"
            }
            LookupError::HttpStatus(_) | LookupError::Http(_) => "(AI lookup failed - error)",
        }
    }
}

/// Invalid transitions of a review session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReviewError {
    #[error("no card is being presented")]
    NoCard,
    #[error("card must be revealed before it can be judged")]
    NotRevealed,
    #[error("review session already finished")]
    Finished,
}

/// Errors emitted by `ReadingService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReadingError {
    #[error("chapter {0} not found")]
    ChapterNotFound(ChapterId),
    #[error("no difficult words marked in chapter {0}")]
    NoDifficultWords(ChapterId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_distinguish_failure_kinds() {
        let invalid = LookupError::InvalidInput.placeholder();
        let disabled = LookupError::Disabled.placeholder();
        let format = LookupError::InvalidFormat("x".into()).placeholder();
        let status = LookupError::HttpStatus(reqwest::StatusCode::BAD_GATEWAY).placeholder();

        assert_eq!(LookupError::EmptyResponse.placeholder(), format);
        let all = [invalid, disabled, format, status];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}

//! Shared error types for the services crate.

use thiserror::Error;

use practice_core::model::InputError;
use storage::StorageError;

/// Errors emitted while fetching the question catalog.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog is not a valid question list: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors emitted by `TimerSettingsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TimerSettingsError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

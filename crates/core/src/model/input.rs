use thiserror::Error;

/// Rejections raised at the input boundary, before anything reaches the session store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputError {
    #[error("daily goal must be a positive whole number, got {raw:?}")]
    InvalidGoal { raw: String },

    #[error("timer threshold must be a positive mm:ss duration, got {raw:?}")]
    InvalidThreshold { raw: String },
}

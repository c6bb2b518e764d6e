//! Display settings stored beside the session blob.

use crate::repository::{KeyValueStore, StorageError};

/// Storage key of the timer threshold, a decimal integer of milliseconds.
pub const TIMER_THRESHOLD_KEY: &str = "timerThreshold";

/// Read the raw timer threshold.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the stored value is not an unsigned
/// integer, or any backend read error.
pub fn load_timer_threshold_millis(kv: &dyn KeyValueStore) -> Result<Option<u64>, StorageError> {
    let Some(raw) = kv.get(TIMER_THRESHOLD_KEY)? else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|err| StorageError::Serialization(err.to_string()))
}

/// Overwrite the stored timer threshold.
///
/// # Errors
///
/// Returns `StorageError` if the backend write fails.
pub fn save_timer_threshold_millis(kv: &dyn KeyValueStore, millis: u64) -> Result<(), StorageError> {
    kv.set(TIMER_THRESHOLD_KEY, &millis.to_string())
}

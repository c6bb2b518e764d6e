use std::sync::Arc;

use practice_core::model::TimerThreshold;
use storage::KeyValueStore;
use storage::settings::{load_timer_threshold_millis, save_timer_threshold_millis};

use crate::error::TimerSettingsError;

/// Loads and saves the per-question time threshold.
#[derive(Clone)]
pub struct TimerSettingsService {
    kv: Arc<dyn KeyValueStore>,
}

impl TimerSettingsService {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Persisted threshold, or the default when missing or unusable.
    #[must_use]
    pub fn load(&self) -> TimerThreshold {
        match load_timer_threshold_millis(self.kv.as_ref()) {
            Ok(Some(millis)) => TimerThreshold::from_millis(millis).unwrap_or_else(|| {
                tracing::warn!(millis, "ignoring zero timer threshold");
                TimerThreshold::default()
            }),
            Ok(None) => TimerThreshold::default(),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unreadable timer threshold");
                TimerThreshold::default()
            }
        }
    }

    /// Persist `threshold`.
    ///
    /// # Errors
    ///
    /// Returns `TimerSettingsError::Storage` if the write fails.
    pub fn save(&self, threshold: TimerThreshold) -> Result<TimerThreshold, TimerSettingsError> {
        save_timer_threshold_millis(self.kv.as_ref(), threshold.as_millis())?;
        tracing::debug!(millis = threshold.as_millis(), "saved timer threshold");
        Ok(threshold)
    }

    /// Parse user input (`m`, `mm`, `mm:ss` or `mmss`) and persist it.
    ///
    /// # Errors
    ///
    /// Returns `TimerSettingsError::Input` for unparseable input, or
    /// `TimerSettingsError::Storage` if the write fails.
    pub fn save_input(&self, raw: &str) -> Result<TimerThreshold, TimerSettingsError> {
        let threshold = TimerThreshold::parse(raw)?;
        self.save(threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::InMemoryStore;
    use storage::settings::TIMER_THRESHOLD_KEY;

    fn service() -> (Arc<InMemoryStore>, TimerSettingsService) {
        let kv = Arc::new(InMemoryStore::new());
        let service = TimerSettingsService::new(kv.clone());
        (kv, service)
    }

    #[test]
    fn defaults_when_nothing_is_stored() {
        let (_, service) = service();
        assert_eq!(service.load().as_millis(), TimerThreshold::DEFAULT_MILLIS);
    }

    #[test]
    fn malformed_value_falls_back_to_default() {
        let (kv, service) = service();
        kv.set(TIMER_THRESHOLD_KEY, "soon").unwrap();
        assert_eq!(service.load(), TimerThreshold::default());
        kv.set(TIMER_THRESHOLD_KEY, "0").unwrap();
        assert_eq!(service.load(), TimerThreshold::default());
    }

    #[test]
    fn save_input_persists_parsed_threshold() {
        let (kv, service) = service();
        let saved = service.save_input("1:30").unwrap();
        assert_eq!(saved.as_millis(), 90_000);
        assert_eq!(kv.get(TIMER_THRESHOLD_KEY).unwrap().as_deref(), Some("90000"));
        assert_eq!(service.load(), saved);
    }

    #[test]
    fn invalid_input_is_rejected_and_not_saved() {
        let (kv, service) = service();
        let err = service.save_input("abc").unwrap_err();
        assert!(matches!(err, TimerSettingsError::Input(_)));
        assert_eq!(kv.get(TIMER_THRESHOLD_KEY).unwrap(), None);
    }
}

use std::collections::BTreeMap;

use practice_core::model::{AnswerMemory, AnswerRecord, AnsweredSet, Filter, QuestionId};
use serde::{Deserialize, Serialize};

use crate::repository::{KeyValueStore, StorageError};

/// Storage key of the persisted session blob.
pub const SESSION_KEY: &str = "bitsat-practice-storage";

/// Persisted shape of one question's answer record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedAnswer {
    pub selected_option: Option<usize>,
    pub show_solution: bool,
}

impl From<AnswerRecord> for PersistedAnswer {
    fn from(record: AnswerRecord) -> Self {
        Self {
            selected_option: record.selected_option,
            show_solution: record.solution_revealed,
        }
    }
}

impl From<PersistedAnswer> for AnswerRecord {
    fn from(persisted: PersistedAnswer) -> Self {
        Self {
            selected_option: persisted.selected_option,
            solution_revealed: persisted.show_solution,
        }
    }
}

/// The durable subset of the practice session.
///
/// Field names are the on-disk names. Missing fields fall back to their
/// defaults, so a blob written by an older build still loads. The catalog,
/// the filtered view and the stopwatch anchor are never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedSession {
    pub current_question_index: usize,
    pub selected_filters: Filter,
    /// Kept signed so a non-positive goal can be detected and replaced.
    pub daily_goal: i64,
    pub questions_done_today: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_session_timestamp: Option<i64>,
    pub answered_questions: BTreeMap<QuestionId, bool>,
    pub question_states: BTreeMap<QuestionId, PersistedAnswer>,
}

impl Default for PersistedSession {
    fn default() -> Self {
        Self {
            current_question_index: 0,
            selected_filters: Filter::default(),
            daily_goal: i64::from(practice_core::model::DailyGoal::DEFAULT),
            questions_done_today: 0,
            last_session_timestamp: None,
            answered_questions: BTreeMap::new(),
            question_states: BTreeMap::new(),
        }
    }
}

impl PersistedSession {
    /// Ids counted toward the daily goal. Entries stored as `false` are ignored.
    #[must_use]
    pub fn answered_set(&self) -> AnsweredSet {
        self.answered_questions
            .iter()
            .filter(|(_, answered)| **answered)
            .map(|(id, _)| id.clone())
            .collect()
    }

    #[must_use]
    pub fn answer_memory(&self) -> AnswerMemory {
        self.question_states
            .iter()
            .map(|(id, persisted)| (id.clone(), AnswerRecord::from(*persisted)))
            .collect()
    }

    #[must_use]
    pub fn answered_map(answered: &AnsweredSet) -> BTreeMap<QuestionId, bool> {
        answered.iter().map(|id| (id.clone(), true)).collect()
    }

    #[must_use]
    pub fn question_state_map(memory: &AnswerMemory) -> BTreeMap<QuestionId, PersistedAnswer> {
        memory
            .iter()
            .map(|(id, record)| (id.clone(), PersistedAnswer::from(*record)))
            .collect()
    }

    /// Serialize to the stored JSON form.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if serialization fails.
    pub fn to_json(&self) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(|err| StorageError::Serialization(err.to_string()))
    }

    /// Parse a stored blob.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for malformed JSON or mistyped fields.
    pub fn from_json(raw: &str) -> Result<Self, StorageError> {
        serde_json::from_str(raw).map_err(|err| StorageError::Serialization(err.to_string()))
    }
}

/// Load the session blob; `Ok(None)` when nothing was stored yet.
///
/// # Errors
///
/// Returns `StorageError` when the backend fails or the blob is malformed.
pub fn load_session(kv: &dyn KeyValueStore) -> Result<Option<PersistedSession>, StorageError> {
    kv.get(SESSION_KEY)?
        .map(|raw| PersistedSession::from_json(&raw))
        .transpose()
}

/// Overwrite the session blob.
///
/// # Errors
///
/// Returns `StorageError` when serialization or the backend write fails.
pub fn save_session(kv: &dyn KeyValueStore, session: &PersistedSession) -> Result<(), StorageError> {
    let raw = session.to_json()?;
    kv.set(SESSION_KEY, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;

    #[test]
    fn missing_fields_use_defaults() {
        let session = PersistedSession::from_json("{\"dailyGoal\": 5}").unwrap();
        assert_eq!(session.daily_goal, 5);
        assert_eq!(session.current_question_index, 0);
        assert_eq!(session.last_session_timestamp, None);
        assert!(session.selected_filters.is_empty());
    }

    #[test]
    fn false_answered_entries_are_not_counted() {
        let raw = r#"{"answeredQuestions": {"q1": true, "q2": false}}"#;
        let session = PersistedSession::from_json(raw).unwrap();
        let answered = session.answered_set();
        assert!(answered.contains(&QuestionId::from("q1")));
        assert!(!answered.contains(&QuestionId::from("q2")));
    }

    #[test]
    fn malformed_blob_is_serialization_error() {
        let kv = InMemoryStore::new();
        kv.set(SESSION_KEY, "{not json").unwrap();
        let err = load_session(&kv).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn absent_blob_loads_as_none() {
        let kv = InMemoryStore::new();
        assert!(load_session(&kv).unwrap().is_none());
    }

    #[test]
    fn answer_records_map_to_on_disk_names() {
        let persisted = PersistedAnswer::from(AnswerRecord {
            selected_option: Some(3),
            solution_revealed: true,
        });
        let json = serde_json::to_value(persisted).unwrap();
        assert_eq!(json, serde_json::json!({"selectedOption": 3, "showSolution": true}));
    }
}

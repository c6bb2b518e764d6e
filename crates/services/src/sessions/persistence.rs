use chrono::{DateTime, Utc};
use practice_core::model::DailyGoal;
use practice_core::time::{from_epoch_millis, to_epoch_millis};
use storage::PersistedSession;

use super::state::SessionState;

/// Overlay a persisted blob on the defaults.
///
/// Fields that cannot be used (a non-positive goal, an unrepresentable
/// timestamp) fall back to their defaults individually.
#[must_use]
pub fn restore_state(persisted: &PersistedSession, now: DateTime<Utc>) -> SessionState {
    let daily_goal = DailyGoal::from_persisted(persisted.daily_goal).unwrap_or_else(|| {
        tracing::warn!(goal = persisted.daily_goal, "ignoring invalid persisted daily goal");
        DailyGoal::default()
    });
    let last_activity = persisted
        .last_session_timestamp
        .and_then(from_epoch_millis)
        .unwrap_or(now);

    SessionState::from_parts(
        persisted.selected_filters.clone().normalized(),
        persisted.current_question_index,
        daily_goal,
        persisted.questions_done_today,
        last_activity,
        persisted.answered_set(),
        persisted.answer_memory(),
    )
}

/// The durable subset of `state`.
#[must_use]
pub fn snapshot_state(state: &SessionState) -> PersistedSession {
    PersistedSession {
        current_question_index: state.position(),
        selected_filters: state.filter().clone(),
        daily_goal: i64::from(state.daily_goal().get()),
        questions_done_today: state.questions_done_today(),
        last_session_timestamp: Some(to_epoch_millis(state.last_activity())),
        answered_questions: PersistedSession::answered_map(state.answered()),
        question_states: PersistedSession::question_state_map(state.answers()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use practice_core::DayBoundary;
    use practice_core::model::{FilterPatch, Question, QuestionId};
    use practice_core::time::fixed_now;

    use crate::sessions::SessionAction;

    fn physics(id: &str) -> Question {
        Question {
            id: QuestionId::from(id),
            subject: "Physics".into(),
            topic: "Optics".into(),
            source: "NCERT".into(),
            text: "?".into(),
            options: vec!["a".into(), "b".into(), "c".into()],
            correct_option: 0,
            solution: None,
        }
    }

    #[test]
    fn durable_subset_round_trips() {
        let days = DayBoundary::utc();
        let now = fixed_now();
        let state = SessionState::new(now)
            .apply(
                SessionAction::IngestCatalog(vec![physics("q1"), physics("q2")]),
                now,
                days,
            )
            .apply(
                SessionAction::SetFilter(FilterPatch::new().topic(Some("Optics"))),
                now,
                days,
            )
            .apply(SessionAction::Answer(2), now, days)
            .apply(SessionAction::GoToNext, now, days)
            .apply(SessionAction::ToggleSolution, now, days)
            .apply(SessionAction::StartStopwatch, now, days);

        let snapshot = snapshot_state(&state);
        let json = snapshot.to_json().unwrap();
        let reloaded = PersistedSession::from_json(&json).unwrap();
        let restored = restore_state(&reloaded, now + Duration::hours(1));

        assert_eq!(restored.filter(), state.filter());
        assert_eq!(restored.position(), state.position());
        assert_eq!(restored.daily_goal(), state.daily_goal());
        assert_eq!(restored.questions_done_today(), state.questions_done_today());
        assert_eq!(restored.last_activity(), state.last_activity());
        assert_eq!(restored.answered(), state.answered());
        assert_eq!(restored.answers(), state.answers());

        assert!(restored.catalog().is_empty());
        assert_eq!(restored.view_len(), 0);
        assert!(restored.stopwatch_started_at().is_none());
    }

    #[test]
    fn invalid_goal_and_missing_timestamp_fall_back() {
        let persisted = PersistedSession {
            daily_goal: -2,
            last_session_timestamp: None,
            questions_done_today: 3,
            ..PersistedSession::default()
        };
        let now = fixed_now();
        let state = restore_state(&persisted, now);
        assert_eq!(state.daily_goal(), DailyGoal::default());
        assert_eq!(state.last_activity(), now);
        assert_eq!(state.questions_done_today(), 3);
    }

    #[test]
    fn empty_string_filter_restores_as_unset() {
        let blob = r#"{"selectedFilters":{"subject":"","topic":null,"source":""}}"#;
        let persisted = PersistedSession::from_json(blob).unwrap();
        let now = fixed_now();
        let state = restore_state(&persisted, now).apply(
            SessionAction::IngestCatalog(vec![physics("q1")]),
            now,
            DayBoundary::utc(),
        );

        assert!(state.filter().is_empty());
        assert_eq!(state.filter().subject, None);
        assert_eq!(state.view_len(), 1);
    }
}

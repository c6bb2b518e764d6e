use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use practice_core::model::{
    AnswerRecord, CatalogFacets, DailyGoal, Filter, FilterPatch, Question,
};
use practice_core::{Clock, DayBoundary};
use storage::KeyValueStore;
use storage::snapshot::{load_session, save_session};

use super::persistence::{restore_state, snapshot_state};
use super::state::{SessionAction, SessionState};

/// The single authoritative practice session.
///
/// Built once at startup and handed to every consumer by reference. Each
/// action runs one [`SessionAction`] through [`SessionState::apply_in_place`] and
/// then overwrites the persisted blob. No action fails: invalid situations
/// are no-ops, and storage failures are logged and otherwise ignored.
pub struct SessionStore {
    state: SessionState,
    clock: Clock,
    days: DayBoundary,
    kv: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    /// Restore the session persisted in `kv`, or start from defaults when the
    /// blob is missing, unreadable or malformed.
    #[must_use]
    pub fn restore(clock: Clock, kv: Arc<dyn KeyValueStore>) -> Self {
        let now = clock.now();
        let state = match load_session(kv.as_ref()) {
            Ok(Some(persisted)) => {
                tracing::debug!(
                    answered = persisted.answered_questions.len(),
                    "restored practice session"
                );
                restore_state(&persisted, now)
            }
            Ok(None) => {
                tracing::debug!("no persisted practice session, using defaults");
                SessionState::new(now)
            }
            Err(err) => {
                tracing::warn!(error = %err, "discarding unreadable practice session");
                SessionState::new(now)
            }
        };

        Self {
            state,
            clock,
            days: DayBoundary::default(),
            kv,
        }
    }

    /// Use a specific calendar-day boundary instead of the local time zone.
    #[must_use]
    pub fn with_day_boundary(mut self, days: DayBoundary) -> Self {
        self.days = days;
        self
    }

    /// Apply `action` at the clock's current time and persist the result.
    pub fn dispatch(&mut self, action: SessionAction) {
        let now = self.clock.now();
        tracing::debug!(action = action_name(&action), "session action");
        self.state.apply_in_place(action, now, self.days);
        self.flush();
    }

    /// Write the durable subset. Failures are logged, never raised.
    pub fn flush(&self) {
        let snapshot = snapshot_state(&self.state);
        if let Err(err) = save_session(self.kv.as_ref(), &snapshot) {
            tracing::warn!(error = %err, "failed to persist practice session");
        }
    }

    // ─── Actions ───────────────────────────────────────────────────────────

    pub fn ingest_catalog(&mut self, questions: Vec<Question>) {
        let offered = questions.len();
        self.dispatch(SessionAction::IngestCatalog(questions));
        tracing::info!(
            offered,
            kept = self.state.catalog().len(),
            "catalog ingested"
        );
    }

    pub fn set_filter(&mut self, patch: FilterPatch) {
        self.dispatch(SessionAction::SetFilter(patch));
    }

    pub fn clear_filter(&mut self) {
        self.dispatch(SessionAction::ClearFilter);
    }

    pub fn go_to_next(&mut self) {
        self.dispatch(SessionAction::GoToNext);
    }

    pub fn go_to_previous(&mut self) {
        self.dispatch(SessionAction::GoToPrevious);
    }

    pub fn set_daily_goal(&mut self, goal: DailyGoal) {
        self.dispatch(SessionAction::SetDailyGoal(goal));
    }

    pub fn select_option(&mut self, option: usize) {
        self.dispatch(SessionAction::SelectOption(option));
    }

    pub fn mark_answered(&mut self) {
        self.dispatch(SessionAction::MarkAnswered);
    }

    /// Select `option` and count the question toward today's goal.
    pub fn answer(&mut self, option: usize) {
        self.dispatch(SessionAction::Answer(option));
    }

    pub fn toggle_solution_visibility(&mut self) {
        self.dispatch(SessionAction::ToggleSolution);
    }

    pub fn check_daily_rollover(&mut self) {
        self.dispatch(SessionAction::CheckDailyRollover);
    }

    pub fn start_stopwatch(&mut self) {
        self.dispatch(SessionAction::StartStopwatch);
    }

    pub fn restart_stopwatch(&mut self) {
        self.dispatch(SessionAction::RestartStopwatch);
    }

    // ─── Reads ─────────────────────────────────────────────────────────────

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Mutable access to the clock, for advancing fixed clocks in tests and demos.
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.state.current_question()
    }

    #[must_use]
    pub fn current_answer(&self) -> AnswerRecord {
        self.state.current_answer()
    }

    pub fn filtered_questions(&self) -> impl Iterator<Item = &Question> {
        self.state.filtered_questions()
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.state.position()
    }

    #[must_use]
    pub fn view_len(&self) -> usize {
        self.state.view_len()
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.state.has_next()
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.state.has_previous()
    }

    #[must_use]
    pub fn filter(&self) -> &Filter {
        self.state.filter()
    }

    #[must_use]
    pub fn facets(&self) -> &CatalogFacets {
        self.state.facets()
    }

    #[must_use]
    pub fn daily_goal(&self) -> DailyGoal {
        self.state.daily_goal()
    }

    #[must_use]
    pub fn questions_done_today(&self) -> u32 {
        self.state.questions_done_today()
    }

    #[must_use]
    pub fn stopwatch_started_at(&self) -> Option<DateTime<Utc>> {
        self.state.stopwatch_started_at()
    }

    /// Milliseconds since the stopwatch anchor, `None` before it was started.
    #[must_use]
    pub fn elapsed_millis(&self) -> Option<u64> {
        let started = self.state.stopwatch_started_at()?;
        let elapsed = self.clock.now().signed_duration_since(started);
        Some(u64::try_from(elapsed.num_milliseconds()).unwrap_or(0))
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("catalog_len", &self.state.catalog().len())
            .field("view_len", &self.state.view_len())
            .field("position", &self.state.position())
            .field("done_today", &self.state.questions_done_today())
            .field("clock", &self.clock)
            .field("days", &self.days)
            .finish_non_exhaustive()
    }
}

fn action_name(action: &SessionAction) -> &'static str {
    match action {
        SessionAction::IngestCatalog(_) => "ingest_catalog",
        SessionAction::SetFilter(_) => "set_filter",
        SessionAction::ClearFilter => "clear_filter",
        SessionAction::GoToNext => "go_to_next",
        SessionAction::GoToPrevious => "go_to_previous",
        SessionAction::SetDailyGoal(_) => "set_daily_goal",
        SessionAction::SelectOption(_) => "select_option",
        SessionAction::MarkAnswered => "mark_answered",
        SessionAction::Answer(_) => "answer",
        SessionAction::ToggleSolution => "toggle_solution",
        SessionAction::CheckDailyRollover => "check_daily_rollover",
        SessionAction::StartStopwatch => "start_stopwatch",
        SessionAction::RestartStopwatch => "restart_stopwatch",
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

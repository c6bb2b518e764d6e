use std::sync::Arc;

use chrono::{DateTime, Utc};
use practice_core::DayBoundary;
use practice_core::model::{
    AnswerMemory, AnswerRecord, AnsweredSet, CatalogFacets, DailyGoal, Filter, FilterPatch,
    Question, QuestionId, is_supported_subject,
};

//
// ─── ACTIONS ───────────────────────────────────────────────────────────────────
//

/// Every mutation the session supports. Applied with [`SessionState::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Replace the catalog with the supported-subject subset of the given questions.
    IngestCatalog(Vec<Question>),
    /// Merge a partial filter update and return to the first question.
    SetFilter(FilterPatch),
    ClearFilter,
    GoToNext,
    GoToPrevious,
    SetDailyGoal(DailyGoal),
    /// Record a selection for the current question (also reveals its solution).
    SelectOption(usize),
    /// Count the current question toward today's goal, once per question.
    MarkAnswered,
    /// `SelectOption` followed by `MarkAnswered` as one transition.
    Answer(usize),
    ToggleSolution,
    CheckDailyRollover,
    StartStopwatch,
    RestartStopwatch,
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Everything the practice session knows, as a plain value.
///
/// The filtered view is a list of catalog indices recomputed whenever the
/// catalog or the filter changes. The current selection and solution
/// visibility are not stored; [`SessionState::current_answer`] derives them
/// from the answer memory on demand.
#[derive(Debug, Clone)]
pub struct SessionState {
    catalog: Arc<[Question]>,
    facets: CatalogFacets,
    filter: Filter,
    view: Vec<usize>,
    position: usize,
    daily_goal: DailyGoal,
    questions_done_today: u32,
    last_activity: DateTime<Utc>,
    answered: AnsweredSet,
    answers: AnswerMemory,
    stopwatch_started_at: Option<DateTime<Utc>>,
}

impl SessionState {
    /// Fresh session: empty catalog, no filter, default goal, nothing answered.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            catalog: Arc::from(Vec::new()),
            facets: CatalogFacets::from_catalog(&[]),
            filter: Filter::default(),
            view: Vec::new(),
            position: 0,
            daily_goal: DailyGoal::default(),
            questions_done_today: 0,
            last_activity: now,
            answered: AnsweredSet::new(),
            answers: AnswerMemory::new(),
            stopwatch_started_at: None,
        }
    }

    /// Rebuild a session from its durable parts. The catalog arrives later
    /// through [`SessionAction::IngestCatalog`], which re-validates `position`.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn from_parts(
        filter: Filter,
        position: usize,
        daily_goal: DailyGoal,
        questions_done_today: u32,
        last_activity: DateTime<Utc>,
        answered: AnsweredSet,
        answers: AnswerMemory,
    ) -> Self {
        Self {
            filter,
            position,
            daily_goal,
            questions_done_today,
            last_activity,
            answered,
            answers,
            ..Self::new(last_activity)
        }
    }

    /// Apply one action and return the next state.
    ///
    /// Guarded actions (no current question, navigation at a boundary) return
    /// the state unchanged.
    #[must_use]
    pub fn apply(mut self, action: SessionAction, now: DateTime<Utc>, days: DayBoundary) -> Self {
        self.apply_in_place(action, now, days);
        self
    }

    /// [`SessionState::apply`] without moving the state.
    pub fn apply_in_place(&mut self, action: SessionAction, now: DateTime<Utc>, days: DayBoundary) {
        match action {
            SessionAction::IngestCatalog(questions) => {
                let allowed: Vec<Question> = questions
                    .into_iter()
                    .filter(|question| is_supported_subject(&question.subject))
                    .collect();
                self.facets = CatalogFacets::from_catalog(&allowed);
                self.catalog = Arc::from(allowed);
                self.rebuild_view();
                if self.position >= self.view.len() {
                    self.position = 0;
                }
                self.roll_over_if_new_day(now, days);
            }
            SessionAction::SetFilter(patch) => {
                self.filter = std::mem::take(&mut self.filter).merged(patch);
                self.rebuild_view();
                self.position = 0;
            }
            SessionAction::ClearFilter => {
                self.filter = Filter::default();
                self.rebuild_view();
                self.position = 0;
            }
            SessionAction::GoToNext => {
                if self.position + 1 < self.view.len() {
                    self.position += 1;
                    self.stopwatch_started_at = Some(now);
                }
            }
            SessionAction::GoToPrevious => {
                if self.position > 0 && !self.view.is_empty() {
                    self.position -= 1;
                    self.stopwatch_started_at = Some(now);
                }
            }
            SessionAction::SetDailyGoal(goal) => self.daily_goal = goal,
            SessionAction::SelectOption(option) => self.select_option(option),
            SessionAction::MarkAnswered => self.mark_answered(now),
            SessionAction::Answer(option) => {
                self.select_option(option);
                self.mark_answered(now);
            }
            SessionAction::ToggleSolution => {
                if let Some(id) = self.current_id() {
                    let revealed = !self.answers.get_or_default(&id).solution_revealed;
                    self.answers.set_solution_revealed(&id, revealed);
                }
            }
            SessionAction::CheckDailyRollover => self.roll_over_if_new_day(now, days),
            SessionAction::StartStopwatch | SessionAction::RestartStopwatch => {
                self.stopwatch_started_at = Some(now);
            }
        }
    }

    fn rebuild_view(&mut self) {
        self.view = self
            .catalog
            .iter()
            .enumerate()
            .filter(|(_, question)| self.filter.matches(question))
            .map(|(index, _)| index)
            .collect();
    }

    fn current_id(&self) -> Option<QuestionId> {
        self.current_question().map(|question| question.id.clone())
    }

    fn select_option(&mut self, option: usize) {
        if let Some(id) = self.current_id() {
            self.answers.record_selection(&id, option);
        }
    }

    fn mark_answered(&mut self, now: DateTime<Utc>) {
        let Some(id) = self.current_id() else {
            return;
        };
        if self.answered.insert(id) {
            self.questions_done_today = self.questions_done_today.saturating_add(1);
            self.last_activity = now;
        }
    }

    fn roll_over_if_new_day(&mut self, now: DateTime<Utc>, days: DayBoundary) {
        if days.is_earlier_day(self.last_activity, now) {
            self.questions_done_today = 0;
            self.last_activity = now;
        }
    }

    // ─── Reads ─────────────────────────────────────────────────────────────

    /// Catalog after the subject allow-list, in catalog order.
    #[must_use]
    pub fn catalog(&self) -> &[Question] {
        &self.catalog
    }

    #[must_use]
    pub fn facets(&self) -> &CatalogFacets {
        &self.facets
    }

    #[must_use]
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Questions matching the current filter, in catalog order.
    pub fn filtered_questions(&self) -> impl Iterator<Item = &Question> {
        self.view.iter().map(|&index| &self.catalog[index])
    }

    #[must_use]
    pub fn view_len(&self) -> usize {
        self.view.len()
    }

    /// Index into the filtered view.
    ///
    /// A restored index is kept as-is until the catalog arrives so that it
    /// survives a reload; ingesting the catalog moves it back to 0 if it no
    /// longer points into the view.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.view
            .get(self.position)
            .and_then(|&index| self.catalog.get(index))
    }

    /// Selection and solution visibility of the current question.
    #[must_use]
    pub fn current_answer(&self) -> AnswerRecord {
        derive_current(self)
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.position > 0 && !self.view.is_empty()
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.position + 1 < self.view.len()
    }

    #[must_use]
    pub fn daily_goal(&self) -> DailyGoal {
        self.daily_goal
    }

    #[must_use]
    pub fn questions_done_today(&self) -> u32 {
        self.questions_done_today
    }

    #[must_use]
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    #[must_use]
    pub fn answered(&self) -> &AnsweredSet {
        &self.answered
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMemory {
        &self.answers
    }

    #[must_use]
    pub fn stopwatch_started_at(&self) -> Option<DateTime<Utc>> {
        self.stopwatch_started_at
    }
}

/// Selection and solution visibility for the question at the current
/// position; the blank record when there is no current question or it was
/// never touched.
#[must_use]
pub fn derive_current(state: &SessionState) -> AnswerRecord {
    state
        .current_question()
        .map(|question| state.answers.get_or_default(&question.id))
        .unwrap_or_default()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

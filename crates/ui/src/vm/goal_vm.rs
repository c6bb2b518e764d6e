use practice_core::model::{DailyGoal, InputError};
use services::SessionStore;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoalVm {
    pub progress_label: String,
    pub percent: u8,
    pub is_met: bool,
    /// Pre-filled value for the goal editor.
    pub editor_value: String,
}

#[must_use]
pub fn map_goal(session: &SessionStore) -> GoalVm {
    let goal = session.daily_goal();
    let done = session.questions_done_today();
    GoalVm {
        progress_label: format!("{done} / {}", goal.get()),
        percent: goal.progress_percent(done),
        is_met: goal.is_met(done),
        editor_value: goal.get().to_string(),
    }
}

/// Validate goal editor text before it reaches the session.
///
/// # Errors
///
/// Returns `InputError::InvalidGoal` for non-numeric or non-positive input.
pub fn parse_goal_input(raw: &str) -> Result<DailyGoal, InputError> {
    DailyGoal::parse(raw)
}

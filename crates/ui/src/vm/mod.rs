mod filter_vm;
mod goal_vm;
mod markdown_vm;
mod question_vm;
mod timer_vm;

pub use filter_vm::{
    ALL, ChoiceVm, FilterControlsVm, SelectVm, control_value_to_filter, describe_filter,
    map_filter_controls, source_changed, subject_changed, topic_changed,
};
pub use goal_vm::{GoalVm, map_goal, parse_goal_input};
pub use markdown_vm::{markdown_to_html, sanitize_html, strip_html_tags};
pub use question_vm::{
    EMPTY_HINT, EMPTY_TITLE, OptionFeedback, OptionVm, QuestionCardVm, QuestionPanelVm,
    map_question_panel, option_feedback,
};
pub use timer_vm::{StopwatchTicker, TICK_INTERVAL, TimerPillVm, map_timer_pill};

mod answer;
mod facets;
mod filter;
mod goal;
mod ids;
mod input;
mod question;
mod timer;

pub use answer::{AnswerMemory, AnswerRecord, AnsweredSet};
pub use facets::CatalogFacets;
pub use filter::{Filter, FilterPatch};
pub use goal::DailyGoal;
pub use ids::QuestionId;
pub use input::InputError;
pub use question::{Question, SUPPORTED_SUBJECTS, is_supported_subject};
pub use timer::{TimerIndicator, TimerThreshold, format_stopwatch};

use crate::model::ids::QuestionId;

/// Subjects the practice catalog keeps. Anything else is dropped on ingest.
pub const SUPPORTED_SUBJECTS: [&str; 3] = ["Physics", "Chemistry", "Mathematics"];

/// Case-sensitive membership test against [`SUPPORTED_SUBJECTS`].
#[must_use]
pub fn is_supported_subject(subject: &str) -> bool {
    SUPPORTED_SUBJECTS.contains(&subject)
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question as supplied by the catalog.
///
/// Bodies are marked-up text (markdown with `$...$` math); rendering is left
/// to the presentation layer. Questions are never mutated after load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub subject: String,
    pub topic: String,
    pub source: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_option: usize,
    pub solution: Option<String>,
}

impl Question {
    /// Number of answer options.
    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_option
    }

    /// True when `correct_option` points at one of the options.
    #[must_use]
    pub fn has_valid_answer_key(&self) -> bool {
        self.correct_option < self.options.len()
    }

    #[must_use]
    pub fn solution(&self) -> Option<&str> {
        self.solution.as_deref()
    }

    #[must_use]
    pub fn has_solution(&self) -> bool {
        self.solution.is_some()
    }
}

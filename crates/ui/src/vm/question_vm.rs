use practice_core::model::{AnswerRecord, Question, QuestionId};
use services::SessionStore;

use super::markdown_vm::markdown_to_html;

pub const EMPTY_TITLE: &str = "No questions match your filters";
pub const EMPTY_HINT: &str = "Try adjusting your filters to find questions.";

/// How an option is marked once the question has been answered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionFeedback {
    Neutral,
    Correct,
    Incorrect,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub label: char,
    pub html: String,
    pub selected: bool,
    pub feedback: OptionFeedback,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionCardVm {
    pub id: QuestionId,
    pub subject: String,
    pub topic: String,
    pub source: String,
    pub position_label: String,
    pub prompt_html: String,
    pub options: Vec<OptionVm>,
    /// Rendered solution, present only while revealed.
    pub solution_html: Option<String>,
    /// `None` when the question has no solution to toggle.
    pub solution_toggle_label: Option<&'static str>,
    pub can_go_previous: bool,
    pub can_go_next: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuestionPanelVm {
    Empty {
        title: &'static str,
        hint: &'static str,
    },
    Card(Box<QuestionCardVm>),
}

#[must_use]
pub fn option_feedback(question: &Question, answer: AnswerRecord, index: usize) -> OptionFeedback {
    let Some(selected) = answer.selected_option else {
        return OptionFeedback::Neutral;
    };
    if question.is_correct(index) {
        OptionFeedback::Correct
    } else if selected == index {
        OptionFeedback::Incorrect
    } else {
        OptionFeedback::Neutral
    }
}

#[must_use]
pub fn map_question_panel(session: &SessionStore) -> QuestionPanelVm {
    let Some(question) = session.current_question() else {
        return QuestionPanelVm::Empty {
            title: EMPTY_TITLE,
            hint: EMPTY_HINT,
        };
    };
    let answer = session.current_answer();

    let options = question
        .options
        .iter()
        .enumerate()
        .map(|(index, body)| OptionVm {
            index,
            label: option_label(index),
            html: markdown_to_html(body),
            selected: answer.selected_option == Some(index),
            feedback: option_feedback(question, answer, index),
        })
        .collect();

    let solution_html = question
        .solution()
        .filter(|_| answer.solution_revealed)
        .map(markdown_to_html);
    let solution_toggle_label = question.has_solution().then_some(if answer.solution_revealed {
        "Hide Solution"
    } else {
        "Show Solution"
    });

    QuestionPanelVm::Card(Box::new(QuestionCardVm {
        id: question.id.clone(),
        subject: question.subject.clone(),
        topic: question.topic.clone(),
        source: question.source.clone(),
        position_label: format!("{} / {}", session.position() + 1, session.view_len()),
        prompt_html: markdown_to_html(&question.text),
        options,
        solution_html,
        solution_toggle_label,
        can_go_previous: session.has_previous(),
        can_go_next: session.has_next(),
    }))
}

/// `A`, `B`, ... for the first 26 options, then `?`.
fn option_label(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .filter(|index| *index < 26)
        .map_or('?', |index| char::from(b'A' + index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use practice_core::time::fixed_clock;
    use std::sync::Arc;
    use storage::InMemoryStore;

    fn question(id: &str, solution: Option<&str>) -> Question {
        Question {
            id: QuestionId::from(id),
            subject: "Chemistry".into(),
            topic: "Bonding".into(),
            source: "NCERT".into(),
            text: "Which bond is **strongest**?".into(),
            options: vec!["Ionic".into(), "Covalent".into(), "Hydrogen".into()],
            correct_option: 1,
            solution: solution.map(Into::into),
        }
    }

    fn session(questions: Vec<Question>) -> SessionStore {
        let mut store = SessionStore::restore(fixed_clock(), Arc::new(InMemoryStore::new()));
        store.ingest_catalog(questions);
        store
    }

    fn card(store: &SessionStore) -> QuestionCardVm {
        match map_question_panel(store) {
            QuestionPanelVm::Card(card) => *card,
            QuestionPanelVm::Empty { .. } => panic!("expected a question card"),
        }
    }

    #[test]
    fn empty_view_renders_the_empty_state() {
        let store = session(Vec::new());
        assert_eq!(
            map_question_panel(&store),
            QuestionPanelVm::Empty {
                title: EMPTY_TITLE,
                hint: EMPTY_HINT
            }
        );
    }

    #[test]
    fn unanswered_question_is_neutral() {
        let store = session(vec![question("c1", Some("Shared pairs."))]);
        let card = card(&store);
        assert_eq!(card.position_label, "1 / 1");
        assert!(card.prompt_html.contains("<strong>strongest</strong>"));
        assert!(card.options.iter().all(|o| o.feedback == OptionFeedback::Neutral));
        assert_eq!(card.solution_html, None);
        assert_eq!(card.solution_toggle_label, Some("Show Solution"));
        assert!(!card.can_go_previous);
        assert!(!card.can_go_next);
    }

    #[test]
    fn wrong_answer_marks_both_options() {
        let mut store = session(vec![question("c1", Some("Shared pairs.")), question("c2", None)]);
        store.answer(0);
        let card = card(&store);

        let feedback: Vec<OptionFeedback> = card.options.iter().map(|o| o.feedback).collect();
        assert_eq!(
            feedback,
            vec![
                OptionFeedback::Incorrect,
                OptionFeedback::Correct,
                OptionFeedback::Neutral
            ]
        );
        assert!(card.options[0].selected);
        assert_eq!(card.options[0].label, 'A');
        assert!(card.solution_html.unwrap().contains("Shared pairs."));
        assert_eq!(card.solution_toggle_label, Some("Hide Solution"));
        assert!(card.can_go_next);
    }

    #[test]
    fn question_without_solution_has_no_toggle() {
        let mut store = session(vec![question("c2", None)]);
        store.answer(1);
        let card = card(&store);
        assert_eq!(card.solution_toggle_label, None);
        assert_eq!(card.solution_html, None);
        assert_eq!(card.options[1].feedback, OptionFeedback::Correct);
    }

    #[test]
    fn labels_run_out_after_z() {
        assert_eq!(option_label(25), 'Z');
        assert_eq!(option_label(26), '?');
    }
}

use std::collections::{BTreeMap, BTreeSet};

use crate::model::ids::QuestionId;

//
// ─── ANSWER RECORD ─────────────────────────────────────────────────────────────
//

/// What the user did on one question: the picked option and whether the
/// solution is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnswerRecord {
    pub selected_option: Option<usize>,
    pub solution_revealed: bool,
}

//
// ─── ANSWER MEMORY ─────────────────────────────────────────────────────────────
//

/// Per-question answer records, independent of filter and navigation.
///
/// Entries are created on first interaction and never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerMemory {
    records: BTreeMap<QuestionId, AnswerRecord>,
}

impl AnswerMemory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: &QuestionId) -> Option<&AnswerRecord> {
        self.records.get(id)
    }

    /// Record for `id`, or the blank record when the question was never touched.
    #[must_use]
    pub fn get_or_default(&self, id: &QuestionId) -> AnswerRecord {
        self.records.get(id).copied().unwrap_or_default()
    }

    /// Store a selection. Selecting always reveals the solution.
    pub fn record_selection(&mut self, id: &QuestionId, option: usize) -> AnswerRecord {
        let record = self.records.entry(id.clone()).or_default();
        record.selected_option = Some(option);
        record.solution_revealed = true;
        *record
    }

    /// Set solution visibility, keeping any recorded selection.
    pub fn set_solution_revealed(&mut self, id: &QuestionId, revealed: bool) -> AnswerRecord {
        let record = self.records.entry(id.clone()).or_default();
        record.solution_revealed = revealed;
        *record
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &AnswerRecord)> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<(QuestionId, AnswerRecord)> for AnswerMemory {
    fn from_iter<T: IntoIterator<Item = (QuestionId, AnswerRecord)>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

//
// ─── ANSWERED SET ──────────────────────────────────────────────────────────────
//

/// Questions that have already been counted toward the daily goal.
///
/// Monotonic: ids are only ever added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnsweredSet {
    ids: BTreeSet<QuestionId>,
}

impl AnsweredSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: &QuestionId) -> bool {
        self.ids.contains(id)
    }

    /// Adds `id`; returns `true` only the first time.
    pub fn insert(&mut self, id: QuestionId) -> bool {
        self.ids.insert(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestionId> {
        self.ids.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<QuestionId> for AnsweredSet {
    fn from_iter<T: IntoIterator<Item = QuestionId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

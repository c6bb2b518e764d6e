use std::collections::{BTreeMap, BTreeSet};

use crate::model::question::{Question, SUPPORTED_SUBJECTS};

/// Distinct subjects, topics (per subject) and sources of a catalog, sorted.
///
/// Feeds the filter controls. Every supported subject has a topic entry even
/// when the catalog holds none of its questions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFacets {
    pub subjects: Vec<String>,
    pub topics_by_subject: BTreeMap<String, Vec<String>>,
    pub sources: Vec<String>,
}

impl CatalogFacets {
    #[must_use]
    pub fn from_catalog(questions: &[Question]) -> Self {
        let mut subjects = BTreeSet::new();
        let mut sources = BTreeSet::new();
        let mut topics: BTreeMap<String, BTreeSet<String>> = SUPPORTED_SUBJECTS
            .iter()
            .map(|subject| ((*subject).to_string(), BTreeSet::new()))
            .collect();

        for question in questions {
            subjects.insert(question.subject.clone());
            sources.insert(question.source.clone());
            topics
                .entry(question.subject.clone())
                .or_default()
                .insert(question.topic.clone());
        }

        Self {
            subjects: subjects.into_iter().collect(),
            topics_by_subject: topics
                .into_iter()
                .map(|(subject, set)| (subject, set.into_iter().collect()))
                .collect(),
            sources: sources.into_iter().collect(),
        }
    }

    /// Topics offered for the selected subject; nothing without a subject.
    #[must_use]
    pub fn topics_for(&self, subject: Option<&str>) -> &[String] {
        subject
            .and_then(|subject| self.topics_by_subject.get(subject))
            .map_or(&[], Vec::as_slice)
    }
}

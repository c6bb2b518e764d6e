use serde::{Deserialize, Serialize};

use crate::model::question::Question;

/// Active subject/topic/source constraints. All `None` means "no filtering".
///
/// A topic without a subject is accepted and simply applied as-is; the
/// controls never produce that combination, but restored data might.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub subject: Option<String>,
    pub topic: Option<String>,
    pub source: Option<String>,
}

impl Filter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        constraint(&self.subject).is_none()
            && constraint(&self.topic).is_none()
            && constraint(&self.source).is_none()
    }

    /// Exact, case-sensitive match of every constraint that is set. An empty
    /// string counts as unset.
    #[must_use]
    pub fn matches(&self, question: &Question) -> bool {
        let field_ok = |wanted: &Option<String>, actual: &str| {
            constraint(wanted).is_none_or(|wanted| wanted == actual)
        };
        field_ok(&self.subject, &question.subject)
            && field_ok(&self.topic, &question.topic)
            && field_ok(&self.source, &question.source)
    }

    /// Merge a partial update into this filter.
    #[must_use]
    pub fn merged(mut self, patch: FilterPatch) -> Self {
        if let Some(subject) = patch.subject {
            self.subject = subject;
        }
        if let Some(topic) = patch.topic {
            self.topic = topic;
        }
        if let Some(source) = patch.source {
            self.source = source;
        }
        self.normalized()
    }

    /// Replace empty-string fields with `None`.
    #[must_use]
    pub fn normalized(self) -> Self {
        let clean = |field: Option<String>| field.filter(|value| !value.is_empty());
        Self {
            subject: clean(self.subject),
            topic: clean(self.topic),
            source: clean(self.source),
        }
    }
}

fn constraint(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// Partial filter update.
///
/// The outer `Option` says whether a field is touched at all; the inner one
/// carries the new value, where `None` clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub subject: Option<Option<String>>,
    pub topic: Option<Option<String>>,
    pub source: Option<Option<String>>,
}

impl FilterPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn subject(mut self, value: Option<impl Into<String>>) -> Self {
        self.subject = Some(value.map(Into::into));
        self
    }

    #[must_use]
    pub fn topic(mut self, value: Option<impl Into<String>>) -> Self {
        self.topic = Some(value.map(Into::into));
        self
    }

    #[must_use]
    pub fn source(mut self, value: Option<impl Into<String>>) -> Self {
        self.source = Some(value.map(Into::into));
        self
    }
}

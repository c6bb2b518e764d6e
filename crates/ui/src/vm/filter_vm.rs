use practice_core::model::{Filter, FilterPatch};
use services::SessionStore;

/// Control value meaning "no constraint".
pub const ALL: &str = "all";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceVm {
    pub value: String,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectVm {
    pub label: &'static str,
    pub value: String,
    pub choices: Vec<ChoiceVm>,
    pub disabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterControlsVm {
    pub subject: SelectVm,
    pub topic: SelectVm,
    pub source: SelectVm,
}

#[must_use]
pub fn map_filter_controls(session: &SessionStore) -> FilterControlsVm {
    let filter = session.filter();
    let facets = session.facets();

    FilterControlsVm {
        subject: select("Subject", "All Subjects", filter.subject.as_deref(), &facets.subjects),
        topic: SelectVm {
            disabled: filter.subject.is_none(),
            ..select(
                "Topic",
                "All Topics",
                filter.topic.as_deref(),
                facets.topics_for(filter.subject.as_deref()),
            )
        },
        source: select("Source", "All Sources", filter.source.as_deref(), &facets.sources),
    }
}

fn select(
    label: &'static str,
    all_label: &str,
    current: Option<&str>,
    values: &[String],
) -> SelectVm {
    let choices = std::iter::once(ChoiceVm {
        value: ALL.to_string(),
        label: all_label.to_string(),
    })
    .chain(values.iter().map(|value| ChoiceVm {
        value: value.clone(),
        label: value.clone(),
    }))
    .collect();

    SelectVm {
        label,
        value: current.unwrap_or(ALL).to_string(),
        choices,
        disabled: false,
    }
}

/// Map a control value to a filter field; the sentinel means "unset".
#[must_use]
pub fn control_value_to_filter(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty() && value != ALL).then(|| value.to_string())
}

/// Picking a subject always clears the topic.
#[must_use]
pub fn subject_changed(value: &str) -> FilterPatch {
    FilterPatch::new()
        .subject(control_value_to_filter(value))
        .topic(None::<String>)
}

#[must_use]
pub fn topic_changed(value: &str) -> FilterPatch {
    FilterPatch::new().topic(control_value_to_filter(value))
}

#[must_use]
pub fn source_changed(value: &str) -> FilterPatch {
    FilterPatch::new().source(control_value_to_filter(value))
}

/// Short summary of the active filter for status lines.
#[must_use]
pub fn describe_filter(filter: &Filter) -> String {
    if filter.is_empty() {
        return "all questions".to_string();
    }
    [&filter.subject, &filter.topic, &filter.source]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" / ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use practice_core::model::{Question, QuestionId};
    use practice_core::time::fixed_clock;
    use std::sync::Arc;
    use storage::InMemoryStore;

    fn question(id: &str, subject: &str, topic: &str, source: &str) -> Question {
        Question {
            id: QuestionId::from(id),
            subject: subject.into(),
            topic: topic.into(),
            source: source.into(),
            text: "?".into(),
            options: vec!["a".into(), "b".into()],
            correct_option: 0,
            solution: None,
        }
    }

    fn session() -> SessionStore {
        let mut store = SessionStore::restore(fixed_clock(), Arc::new(InMemoryStore::new()));
        store.ingest_catalog(vec![
            question("p1", "Physics", "Optics", "NCERT"),
            question("p2", "Physics", "Waves", "HC Verma"),
            question("m1", "Mathematics", "Limits", "NCERT"),
        ]);
        store
    }

    fn values(select: &SelectVm) -> Vec<&str> {
        select.choices.iter().map(|c| c.value.as_str()).collect()
    }

    #[test]
    fn sentinel_means_unset() {
        assert_eq!(control_value_to_filter(ALL), None);
        assert_eq!(control_value_to_filter(""), None);
        assert_eq!(control_value_to_filter("Physics"), Some("Physics".to_string()));
    }

    #[test]
    fn topic_is_disabled_without_subject() {
        let controls = map_filter_controls(&session());
        assert_eq!(values(&controls.subject), vec![ALL, "Mathematics", "Physics"]);
        assert_eq!(controls.subject.value, ALL);
        assert!(controls.topic.disabled);
        assert_eq!(values(&controls.topic), vec![ALL]);
        assert_eq!(values(&controls.source), vec![ALL, "HC Verma", "NCERT"]);
    }

    #[test]
    fn changing_subject_clears_topic() {
        let mut store = session();
        store.set_filter(subject_changed("Physics"));
        store.set_filter(topic_changed("Waves"));
        assert_eq!(store.view_len(), 1);

        let controls = map_filter_controls(&store);
        assert!(!controls.topic.disabled);
        assert_eq!(controls.topic.value, "Waves");
        assert_eq!(values(&controls.topic), vec![ALL, "Optics", "Waves"]);

        store.set_filter(subject_changed("Mathematics"));
        assert_eq!(store.filter().topic, None);
        assert_eq!(describe_filter(store.filter()), "Mathematics");

        store.set_filter(subject_changed(ALL));
        assert!(store.filter().is_empty());
        assert_eq!(describe_filter(store.filter()), "all questions");
    }
}

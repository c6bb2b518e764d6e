use std::collections::BTreeMap;

use practice_core::model::{AnswerMemory, AnswerRecord, AnsweredSet, Filter, QuestionId};
use storage::snapshot::{load_session, save_session};
use storage::{FileStore, KeyValueStore, PersistedSession, SESSION_KEY};

fn sample_session() -> PersistedSession {
    let mut answered = AnsweredSet::new();
    answered.insert(QuestionId::from("phy-1"));
    let mut memory = AnswerMemory::new();
    memory.record_selection(&QuestionId::from("phy-1"), 2);
    memory.set_solution_revealed(&QuestionId::from("chem-4"), true);

    PersistedSession {
        current_question_index: 3,
        selected_filters: Filter {
            subject: Some("Physics".into()),
            topic: Some("Optics".into()),
            source: None,
        },
        daily_goal: 12,
        questions_done_today: 4,
        last_session_timestamp: Some(1_700_000_000_000),
        answered_questions: PersistedSession::answered_map(&answered),
        question_states: PersistedSession::question_state_map(&memory),
    }
}

#[test]
fn file_store_round_trips_session_blob() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    let session = sample_session();

    save_session(&store, &session).unwrap();

    // A fresh handle over the same directory simulates a restart.
    let reopened = FileStore::open(dir.path()).unwrap();
    let loaded = load_session(&reopened).unwrap().expect("blob present");
    assert_eq!(loaded, session);
    assert_eq!(
        loaded.answer_memory().get(&QuestionId::from("chem-4")),
        Some(&AnswerRecord {
            selected_option: None,
            solution_revealed: true
        })
    );
}

#[test]
fn blob_uses_exact_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    save_session(&store, &sample_session()).unwrap();

    let raw = store.get(SESSION_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let mut keys: Vec<&str> = json
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "answeredQuestions",
            "currentQuestionIndex",
            "dailyGoal",
            "lastSessionTimestamp",
            "questionStates",
            "questionsDoneToday",
            "selectedFilters",
        ]
    );
    assert_eq!(json["selectedFilters"]["source"], serde_json::Value::Null);
    assert_eq!(json["answeredQuestions"]["phy-1"], true);
    assert_eq!(json["questionStates"]["phy-1"]["selectedOption"], 2);
}

#[test]
fn each_save_replaces_the_previous_blob() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    save_session(&store, &sample_session()).unwrap();

    let replacement = PersistedSession {
        answered_questions: BTreeMap::new(),
        ..PersistedSession::default()
    };
    save_session(&store, &replacement).unwrap();

    let loaded = load_session(&store).unwrap().unwrap();
    assert_eq!(loaded, replacement);
    assert!(loaded.answered_set().is_empty());
}

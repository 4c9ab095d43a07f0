use std::sync::Arc;

use quizbot::engine::{QuizEngine, QuizProgress, Step, Verdict};
use quizbot::questions::QuestionBank;
use quizbot::store::{SqliteStore, StateStore};

const ABC_QUESTIONS: &str = r#"[
    {"text": "first", "options": ["A", "B", "C"], "correct_option": 0},
    {"text": "second", "options": ["A", "B", "C"], "correct_option": 1},
    {"text": "third", "options": ["A", "B", "C"], "correct_option": 2}
]"#;

async fn sqlite_engine(name: &str) -> (QuizEngine, SqliteStore) {
    let store = SqliteStore::connect(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("connect");
    store.create_table().await.expect("create table");
    let questions = QuestionBank::from_json(ABC_QUESTIONS).expect("questions");
    (QuizEngine::new(Arc::new(store.clone()), questions), store)
}

#[tokio::test]
async fn quiz_state_survives_in_sqlite() {
    let (engine, store) = sqlite_engine("memdb_quiz_flow").await;
    assert_eq!(engine.questions().len(), 3);

    let prompt = engine.start_quiz(1001).await.unwrap();
    assert_eq!(prompt.index, 0);
    assert_eq!(prompt.options, vec!["A", "B", "C"]);

    engine.submit_answer(1001, "A").await.unwrap();
    let outcome = engine.submit_answer(1001, "Z").await.unwrap();
    assert_eq!(
        outcome.verdict,
        Verdict::Incorrect {
            correct_answer: "B".into()
        }
    );
    assert_eq!(store.get_question_index(1001).await.unwrap(), 2);
    assert_eq!(store.get_correct_count(1001).await.unwrap(), 1);
    assert_eq!(
        engine.progress(1001).await.unwrap(),
        QuizProgress::InProgress(2)
    );

    let outcome = engine.submit_answer(1001, "C").await.unwrap();
    assert_eq!(
        outcome.step,
        Step::Complete {
            correct_count: 2,
            total: 3
        }
    );

    let stats = engine.get_statistics(1001).await.unwrap();
    assert!(stats.has_record);
    assert_eq!(stats.correct_count, 2);
    assert_eq!(stats.total_questions, 3);
}

#[tokio::test]
async fn high_scorers_are_counted_across_users() {
    let (engine, store) = sqlite_engine("memdb_high_scorers").await;
    for (user_id, correct) in [3, 2, 1, 0, 3].into_iter().enumerate() {
        store.upsert(user_id as i64, 3, correct).await.unwrap();
    }

    // A fresh run for user 0 resets its full score.
    engine.start_quiz(0).await.unwrap();

    let stats = engine.get_statistics(0).await.unwrap();
    assert_eq!(stats.total_users, 5);
    assert_eq!(stats.correct_count, 0);
    assert_eq!(stats.high_scorers, 1);
}

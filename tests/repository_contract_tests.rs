use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use study_centre::{
    app_state::AppState,
    config::Config,
    errors::AppError,
    models::domain::{Question, QuestionBank, QuestionId},
    repositories::{
        parse_bank, BuiltinQuestionBankRepository, FileQuestionBankRepository,
        InMemoryQuestionBankRepository, QuestionBankRepository,
    },
    services::ExamOptions,
};

const WIRING_BANK: &str = r#"{
  "id": "wiring-basics",
  "title": "Wiring Basics",
  "passThreshold": 75,
  "questions": [
    {
      "id": 1,
      "question": "Which colour is the protective conductor?",
      "options": ["Brown", "Blue", "Green and yellow"],
      "correctAnswer": 2,
      "explanation": "The protective conductor is green and yellow."
    },
    {
      "id": 2,
      "question": "What is the nominal UK single-phase voltage?",
      "options": ["110 V", "230 V", "400 V"],
      "correctAnswer": 1,
      "explanation": "UK single-phase supplies are nominally 230 V."
    }
  ]
}"#;

const ISOLATION_CHECKS: &str = r#"{
  "id": "safe-isolation-checks",
  "title": "Safe Isolation Checks",
  "questions": [
    {
      "id": "prove-tester",
      "prompt": "When should the voltage indicator be proved?",
      "options": ["Before testing only", "Before and after testing"],
      "correctIndex": 1,
      "explanation": "Prove the tester on a known source before and after use."
    }
  ]
}"#;

fn question(id: u64) -> Question {
    Question::multiple_choice(id, "Prompt", &["A", "B"], 0, "A is right")
        .expect("fixture question should be valid")
}

fn bank(id: &str) -> QuestionBank {
    QuestionBank::new(id, "Fixture", vec![question(1), question(2)])
        .expect("fixture bank should be valid")
}

fn bank_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("temp dir should be created");
    for (name, json) in files {
        fs::write(dir.path().join(name), json).expect("bank file should be written");
    }
    dir
}

/// Behaviour every repository implementation must share.
fn assert_repository_contract(repo: &dyn QuestionBankRepository, known_id: &str) {
    let listed = repo.list().expect("listing should succeed");
    assert!(listed.iter().any(|summary| summary.id == known_id));

    let ids: Vec<_> = listed.iter().map(|summary| summary.id.clone()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted, "banks should be listed in id order");

    let found = repo
        .find_by_id(known_id)
        .expect("lookup should succeed")
        .expect("listed bank should be found");
    assert_eq!(found.id(), known_id);
    assert!(!found.is_empty());

    assert!(repo
        .find_by_id("no-such-bank")
        .expect("lookup should succeed")
        .is_none());
}

#[test]
fn test_in_memory_repository_contract() {
    let repo = InMemoryQuestionBankRepository::new(vec![bank("beta"), bank("alpha")])
        .expect("repository should build");

    assert_repository_contract(&repo, "alpha");
}

#[test]
fn test_builtin_repository_contract() {
    assert_repository_contract(&BuiltinQuestionBankRepository::new(), "cdm-regulations");
}

#[test]
fn test_file_repository_contract() {
    let dir = bank_dir(&[
        ("wiring.json", WIRING_BANK),
        ("isolation.json", ISOLATION_CHECKS),
        ("notes.txt", "not a bank"),
    ]);

    let repo = FileQuestionBankRepository::load(dir.path()).expect("directory should load");

    assert_repository_contract(&repo, "wiring-basics");
    assert_eq!(repo.list().expect("listing should succeed").len(), 2);
    assert_eq!(repo.dir(), dir.path());
}

#[test]
fn test_file_repository_accepts_both_field_spellings() {
    let dir = bank_dir(&[("wiring.json", WIRING_BANK), ("isolation.json", ISOLATION_CHECKS)]);
    let repo = FileQuestionBankRepository::load(dir.path()).expect("directory should load");

    let checks = repo
        .find_by_id("safe-isolation-checks")
        .expect("lookup should succeed")
        .expect("bank should exist");
    let prove = checks
        .get(&QuestionId::from("prove-tester"))
        .expect("text id should resolve");
    assert_eq!(prove.correct_index(), 1);

    let wiring = repo
        .find_by_id("wiring-basics")
        .expect("lookup should succeed")
        .expect("bank should exist");
    assert_eq!(wiring.pass_threshold(), Some(75));
    assert!(wiring.get(&QuestionId::Number(2)).is_some());
}

#[test]
fn test_file_repository_rejects_malformed_bank() {
    let broken = WIRING_BANK.replace("\"correctAnswer\": 1", "\"correctAnswer\": 7");
    let dir = bank_dir(&[("wiring.json", &broken)]);

    let err = FileQuestionBankRepository::load(dir.path()).err().expect("load should fail");

    match err {
        AppError::ConfigurationError(msg) => assert!(msg.contains("wiring.json")),
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[test]
fn test_file_repository_rejects_duplicate_bank_ids() {
    let dir = bank_dir(&[("a.json", WIRING_BANK), ("b.json", WIRING_BANK)]);

    let err = FileQuestionBankRepository::load(dir.path()).err().expect("load should fail");

    assert!(err.is_configuration());
}

#[test]
fn test_missing_directory_is_io_error() {
    let dir = TempDir::new().expect("temp dir should be created");
    let missing = dir.path().join("absent");

    let err = FileQuestionBankRepository::load(&missing).err().expect("load should fail");

    assert!(matches!(err, AppError::IoError(_)));
}

#[test]
fn test_parse_bank_rejects_duplicate_question_ids() {
    let duplicated = WIRING_BANK.replace("\"id\": 2", "\"id\": 1");

    let err = parse_bank("inline", &duplicated).unwrap_err();

    assert!(err.is_configuration());
}

#[test]
fn test_app_state_reads_bank_dir() {
    let dir = bank_dir(&[("wiring.json", WIRING_BANK)]);
    let config = Config {
        bank_dir: Some(dir.path().to_path_buf()),
        ..Config::test_config()
    };

    let state = AppState::new(config).expect("state should build");
    let session = state
        .quiz_service
        .start_quiz("wiring-basics")
        .expect("quiz should start");

    assert_eq!(session.total(), 2);
    assert_eq!(session.pass_threshold(), 75);
}

#[test]
fn test_seeded_mock_exam_is_repeatable() {
    let state = AppState::with_repository(
        Config::test_config(),
        Arc::new(BuiltinQuestionBankRepository::new()),
    )
    .expect("state should build");
    let options = || ExamOptions {
        question_count: Some(10),
        seed: Some(42),
        ..ExamOptions::default()
    };

    let first = state
        .quiz_service
        .start_mock_exam("scaffolding-awareness", options())
        .expect("exam should start");
    let second = state
        .quiz_service
        .start_mock_exam("scaffolding-awareness", options())
        .expect("exam should start");

    let ids = |s: &study_centre::models::domain::QuizSession| {
        s.bank().questions().iter().map(|q| q.id().clone()).collect::<Vec<_>>()
    };
    assert_eq!(first.total(), 10);
    assert_eq!(ids(&first), ids(&second));
    assert!(first.deadline().is_some());
}

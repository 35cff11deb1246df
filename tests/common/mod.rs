#![allow(dead_code)]

use flashcard_bot::db::WordStore;
use flashcard_bot::services::ConversationController;
use tempfile::TempDir;

/// Keeps the temporary directory alive as long as the store is in use.
pub struct TestStore {
    pub store: WordStore,
    _dir: TempDir,
}

pub async fn create_test_store() -> TestStore {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let store = WordStore::open(&dir.path().join("words.db"))
        .await
        .expect("failed to open word store");
    TestStore { store, _dir: dir }
}

pub struct TestController {
    pub controller: ConversationController,
    _dir: TempDir,
}

pub async fn create_test_controller(shared_words: &[(&str, &str)]) -> TestController {
    let TestStore { store, _dir } = create_test_store().await;
    for (word, translation) in shared_words {
        store
            .insert(word, translation, None)
            .await
            .expect("failed to insert shared word");
    }
    TestController {
        controller: ConversationController::new(store, 4),
        _dir,
    }
}

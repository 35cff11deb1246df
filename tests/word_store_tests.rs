use std::sync::Arc;

use flashcard_bot::core::UserId;
use flashcard_bot::db::{StoreError, ValidationError};
use flashcard_bot::seed::{self, STARTER_WORDS};

mod common;

const ALICE: UserId = UserId(100);
const BOB: UserId = UserId(200);

#[tokio::test]
async fn insert_query_delete_round_trip() {
    let test = common::create_test_store().await;
    let store = &test.store;

    let id = store.insert("Hello", "Привет", Some(ALICE)).await.unwrap();
    assert!(id > 0);

    let pool = store.query_pool(ALICE).await.unwrap();
    assert_eq!(pool.len(), 1);
    assert_eq!(pool[0].id, id);
    assert_eq!(pool[0].word, "Hello");
    assert_eq!(pool[0].translation, "Привет");
    assert_eq!(pool[0].owner, Some(ALICE));

    assert_eq!(store.delete_by_word_and_owner("Hello", ALICE).await.unwrap(), 1);
    assert!(store.query_pool(ALICE).await.unwrap().iter().all(|e| e.word != "Hello"));
    assert_eq!(store.delete_by_word_and_owner("Hello", ALICE).await.unwrap(), 0);
}

#[tokio::test]
async fn insert_trims_and_rejects_blank_values() {
    let test = common::create_test_store().await;
    let store = &test.store;

    store.insert("  Green ", " Зелёный ", Some(ALICE)).await.unwrap();
    let pool = store.query_pool(ALICE).await.unwrap();
    assert_eq!(pool[0].word, "Green");
    assert_eq!(pool[0].translation, "Зелёный");

    let err = store.insert("   ", "Пусто", Some(ALICE)).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(ValidationError::EmptyWord)));
    let err = store.insert("Empty", "", Some(ALICE)).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(ValidationError::EmptyTranslation)));

    assert_eq!(store.query_pool(ALICE).await.unwrap().len(), 1);
}

#[tokio::test]
async fn pool_contains_shared_and_own_rows_only() {
    let test = common::create_test_store().await;
    let store = &test.store;

    store.insert("Peace", "Мир", None).await.unwrap();
    store.insert("Car", "Машина", Some(ALICE)).await.unwrap();
    store.insert("House", "Дом", Some(BOB)).await.unwrap();

    let alice: Vec<String> = store.query_pool(ALICE).await.unwrap().into_iter().map(|e| e.word).collect();
    let bob: Vec<String> = store.query_pool(BOB).await.unwrap().into_iter().map(|e| e.word).collect();

    assert_eq!(alice, vec!["Peace", "Car"]);
    assert_eq!(bob, vec!["Peace", "House"]);
}

#[tokio::test]
async fn delete_never_touches_shared_or_foreign_rows() {
    let test = common::create_test_store().await;
    let store = &test.store;

    store.insert("Peace", "Мир", None).await.unwrap();
    store.insert("House", "Дом", Some(BOB)).await.unwrap();

    assert_eq!(store.delete_by_word_and_owner("Peace", ALICE).await.unwrap(), 0);
    assert_eq!(store.delete_by_word_and_owner("House", ALICE).await.unwrap(), 0);

    assert_eq!(store.query_pool(BOB).await.unwrap().len(), 2);
}

#[tokio::test]
async fn delete_removes_every_own_row_with_that_word() {
    let test = common::create_test_store().await;
    let store = &test.store;

    store.insert("Hello", "Привет", Some(ALICE)).await.unwrap();
    store.insert("Hello", "Здравствуй", Some(ALICE)).await.unwrap();
    store.insert("Hello", "Привет", None).await.unwrap();

    assert_eq!(store.delete_by_word_and_owner("Hello", ALICE).await.unwrap(), 2);
    let pool = store.query_pool(ALICE).await.unwrap();
    assert_eq!(pool.len(), 1);
    assert_eq!(pool[0].owner, None);
}

#[tokio::test]
async fn concurrent_inserts_stay_isolated_per_user() {
    let test = common::create_test_store().await;
    let store = Arc::new(test.store.clone());

    let mut handles = Vec::new();
    for (user, prefix) in [(ALICE, "alice"), (BOB, "bob")] {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            for i in 0..20 {
                store
                    .insert(&format!("{prefix}{i}"), "перевод", Some(user))
                    .await
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let alice = store.query_pool(ALICE).await.unwrap();
    let bob = store.query_pool(BOB).await.unwrap();
    assert_eq!(alice.len(), 20);
    assert_eq!(bob.len(), 20);
    assert!(alice.iter().all(|e| e.owner == Some(ALICE) && e.word.starts_with("alice")));
    assert!(bob.iter().all(|e| e.owner == Some(BOB) && e.word.starts_with("bob")));
}

#[tokio::test]
async fn concurrent_insert_and_delete_of_one_owner_account_for_every_row() {
    const INSERTS: u64 = 30;

    let test = common::create_test_store().await;
    let store = Arc::new(test.store.clone());
    store.insert("Hello", "Привет", None).await.unwrap();

    let inserter = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            for _ in 0..INSERTS {
                store.insert("Hello", "Привет", Some(ALICE)).await.unwrap();
                tokio::task::yield_now().await;
            }
        })
    };
    let deleter = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            let mut deleted = 0;
            for _ in 0..INSERTS {
                deleted += store.delete_by_word_and_owner("Hello", ALICE).await.unwrap();
                tokio::task::yield_now().await;
            }
            deleted
        })
    };

    inserter.await.unwrap();
    let deleted = deleter.await.unwrap();

    let remaining = store
        .query_pool(ALICE)
        .await
        .unwrap()
        .into_iter()
        .filter(|e| e.owner == Some(ALICE))
        .count() as u64;
    assert_eq!(deleted + remaining, INSERTS);

    assert_eq!(store.delete_by_word_and_owner("Hello", ALICE).await.unwrap(), remaining);
    let pool = store.query_pool(ALICE).await.unwrap();
    assert_eq!(pool.len(), 1);
    assert_eq!(pool[0].owner, None);
}

#[tokio::test]
async fn seeding_runs_once() {
    let test = common::create_test_store().await;
    let store = &test.store;

    seed::seed_shared_words(store).await.unwrap();
    seed::seed_shared_words(store).await.unwrap();

    let pool = store.query_pool(ALICE).await.unwrap();
    assert_eq!(pool.len(), STARTER_WORDS.len());
    assert!(pool.iter().all(|e| e.owner.is_none()));

    assert_eq!(store.seed_shared_words(STARTER_WORDS).await.unwrap(), 0);
}

#[tokio::test]
async fn reopening_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("words.db");

    let store = flashcard_bot::db::WordStore::open(&path).await.unwrap();
    store.insert("Sun", "Солнце", Some(ALICE)).await.unwrap();
    store.close().await;

    let reopened = flashcard_bot::db::WordStore::open(&path).await.unwrap();
    let pool = reopened.query_pool(ALICE).await.unwrap();
    assert_eq!(pool.len(), 1);
    assert_eq!(pool[0].word, "Sun");
}

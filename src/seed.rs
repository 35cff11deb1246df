use crate::db::{StoreError, WordStore};

/// Shared starter vocabulary (English word, Russian translation).
pub const STARTER_WORDS: &[(&str, &str)] = &[
    ("Peace", "Мир"),
    ("Green", "Зелёный"),
    ("White", "Белый"),
    ("Hello", "Привет"),
    ("Car", "Машина"),
    ("House", "Дом"),
    ("Book", "Книга"),
    ("Water", "Вода"),
    ("Sun", "Солнце"),
    ("Friend", "Друг"),
];

pub async fn seed_shared_words(store: &WordStore) -> Result<(), StoreError> {
    let inserted = store.seed_shared_words(STARTER_WORDS).await?;
    if inserted > 0 {
        tracing::info!(inserted, "seeded shared starter vocabulary");
    } else {
        tracing::debug!("shared vocabulary already present, skipping seed");
    }
    Ok(())
}

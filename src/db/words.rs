use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

use super::{StoreError, ValidationError, WordStore};
use crate::core::UserId;

pub type EntryId = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub id: EntryId,
    pub word: String,
    pub translation: String,
    pub owner: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl WordStore {
    pub async fn insert(
        &self,
        word: &str,
        translation: &str,
        owner: Option<UserId>,
    ) -> Result<EntryId, StoreError> {
        let (word, translation) = validate_pair(word, translation)?;

        let _guard = self.write_lock.lock().await;
        let result = sqlx::query(
            r#"INSERT INTO "words" ("word", "translation", "owner_id", "created_at") VALUES (?, ?, ?, ?)"#,
        )
        .bind(word)
        .bind(translation)
        .bind(owner.map(UserId::get))
        .bind(Utc::now())
        .execute(self.pool())
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, owner = ?owner, "word inserted");
        Ok(id)
    }

    /// Deletes the owner's rows for `word`. Shared rows have a NULL owner and
    /// can never match the `=` comparison.
    pub async fn delete_by_word_and_owner(&self, word: &str, owner: UserId) -> Result<u64, StoreError> {
        let _guard = self.write_lock.lock().await;
        let result = sqlx::query(r#"DELETE FROM "words" WHERE "word" = ? AND "owner_id" = ?"#)
            .bind(word)
            .bind(owner.get())
            .execute(self.pool())
            .await?;

        let deleted = result.rows_affected();
        debug!(deleted, owner = %owner, "words deleted");
        Ok(deleted)
    }

    pub async fn query_pool(&self, owner: UserId) -> Result<Vec<WordEntry>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT "id", "word", "translation", "owner_id", "created_at"
            FROM "words"
            WHERE "owner_id" IS NULL OR "owner_id" = ?
            ORDER BY "id" ASC
            "#,
        )
        .bind(owner.get())
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(map_word_entry).collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }

    /// Inserts `entries` as shared rows, but only into a store that has no
    /// shared rows yet. Returns the number of rows written.
    pub async fn seed_shared_words(&self, entries: &[(&str, &str)]) -> Result<u64, StoreError> {
        let _guard = self.write_lock.lock().await;

        let existing: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "words" WHERE "owner_id" IS NULL"#)
            .fetch_one(self.pool())
            .await?;
        if existing > 0 {
            return Ok(0);
        }

        let mut tx = self.pool().begin().await?;
        let now = Utc::now();
        let mut inserted = 0u64;
        for (word, translation) in entries {
            let (word, translation) = validate_pair(word, translation)?;
            sqlx::query(
                r#"INSERT INTO "words" ("word", "translation", "owner_id", "created_at") VALUES (?, ?, NULL, ?)"#,
            )
            .bind(word)
            .bind(translation)
            .bind(now)
            .execute(&mut *tx)
            .await?;
            inserted += 1;
        }
        tx.commit().await?;

        Ok(inserted)
    }
}

fn validate_pair<'a>(word: &'a str, translation: &'a str) -> Result<(&'a str, &'a str), ValidationError> {
    let word = word.trim();
    if word.is_empty() {
        return Err(ValidationError::EmptyWord);
    }
    let translation = translation.trim();
    if translation.is_empty() {
        return Err(ValidationError::EmptyTranslation);
    }
    Ok((word, translation))
}

fn map_word_entry(row: &SqliteRow) -> Result<WordEntry, sqlx::Error> {
    let owner: Option<i64> = row.try_get("owner_id")?;
    Ok(WordEntry {
        id: row.try_get("id")?,
        word: row.try_get("word")?,
        translation: row.try_get("translation")?,
        owner: owner.map(UserId),
        created_at: row.try_get("created_at")?,
    })
}

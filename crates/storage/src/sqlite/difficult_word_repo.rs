use async_trait::async_trait;
use reader_core::model::{ChapterId, Word};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{chapter_id_to_i64, conn, ser};
use crate::repository::{DifficultWordRepository, DifficultWords, StorageError};

#[async_trait]
impl DifficultWordRepository for SqliteRepository {
    async fn load_words(&self, chapter: ChapterId) -> Result<DifficultWords, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT word
            FROM difficult_words
            WHERE chapter_id = ?1
            ",
        )
        .bind(chapter_id_to_i64(chapter)?)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("word").map(Word::new).map_err(ser))
            .collect()
    }

    async fn save_words(
        &self,
        chapter: ChapterId,
        words: &DifficultWords,
    ) -> Result<(), StorageError> {
        let chapter_id = chapter_id_to_i64(chapter)?;
        let marked_at = self.clock.now();
        let mut tx = self.pool.begin().await.map_err(conn)?;

        // Keep marked_at for words that stay; drop the rest.
        let existing: Vec<String> =
            sqlx::query_scalar("SELECT word FROM difficult_words WHERE chapter_id = ?1")
                .bind(chapter_id)
                .fetch_all(&mut *tx)
                .await
                .map_err(conn)?;
        for stale in existing.iter().filter(|w| !words.contains(w.as_str())) {
            sqlx::query("DELETE FROM difficult_words WHERE chapter_id = ?1 AND word = ?2")
                .bind(chapter_id)
                .bind(stale)
                .execute(&mut *tx)
                .await
                .map_err(conn)?;
        }

        for word in words.iter().filter(|w| w.is_valid()) {
            sqlx::query(
                r"
                INSERT INTO difficult_words (chapter_id, word, marked_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(chapter_id, word) DO NOTHING
                ",
            )
            .bind(chapter_id)
            .bind(word.as_str())
            .bind(marked_at)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        Ok(())
    }

    async fn clear_words(&self, chapter: ChapterId) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM difficult_words WHERE chapter_id = ?1")
            .bind(chapter_id_to_i64(chapter)?)
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }
}

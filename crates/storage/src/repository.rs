use async_trait::async_trait;
use reader_core::model::{Chapter, ChapterId, Word};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Words a reader flagged in one chapter. Order carries no meaning; the
/// set is sorted so callers see a stable order.
pub type DifficultWords = BTreeSet<Word>;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Read-only source of chapter text and interactive word lists.
#[async_trait]
pub trait ChapterRepository: Send + Sync {
    /// Fetch a chapter by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_chapter(&self, id: ChapterId) -> Result<Option<Chapter>, StorageError>;

    /// All chapter ids in ascending order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn list_chapter_ids(&self) -> Result<Vec<ChapterId>, StorageError>;
}

/// Per-chapter store of difficult words.
///
/// Callers load once when a chapter opens and save the whole set after
/// every change; the last save wins.
#[async_trait]
pub trait DifficultWordRepository: Send + Sync {
    /// Load the difficult words of a chapter; unknown chapters yield an empty set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn load_words(&self, chapter: ChapterId) -> Result<DifficultWords, StorageError>;

    /// Replace the difficult words of a chapter.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the set cannot be stored.
    async fn save_words(
        &self,
        chapter: ChapterId,
        words: &DifficultWords,
    ) -> Result<(), StorageError>;

    /// Forget every difficult word of a chapter.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn clear_words(&self, chapter: ChapterId) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    chapters: Arc<Mutex<BTreeMap<ChapterId, Chapter>>>,
    difficult: Arc<Mutex<HashMap<ChapterId, DifficultWords>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a chapter.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn upsert_chapter(&self, chapter: Chapter) -> Result<(), StorageError> {
        let mut guard = self
            .chapters
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(chapter.id(), chapter);
        Ok(())
    }
}

#[async_trait]
impl ChapterRepository for InMemoryRepository {
    async fn get_chapter(&self, id: ChapterId) -> Result<Option<Chapter>, StorageError> {
        let guard = self
            .chapters
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&id).cloned())
    }

    async fn list_chapter_ids(&self) -> Result<Vec<ChapterId>, StorageError> {
        let guard = self
            .chapters
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.keys().copied().collect())
    }
}

#[async_trait]
impl DifficultWordRepository for InMemoryRepository {
    async fn load_words(&self, chapter: ChapterId) -> Result<DifficultWords, StorageError> {
        let guard = self
            .difficult
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&chapter).cloned().unwrap_or_default())
    }

    async fn save_words(
        &self,
        chapter: ChapterId,
        words: &DifficultWords,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .difficult
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(chapter, words.clone());
        Ok(())
    }

    async fn clear_words(&self, chapter: ChapterId) -> Result<(), StorageError> {
        let mut guard = self
            .difficult
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&chapter);
        Ok(())
    }
}

/// Aggregates chapter and difficult-word repositories behind trait objects
/// for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub chapters: Arc<dyn ChapterRepository>,
    pub difficult_words: Arc<dyn DifficultWordRepository>,
}

impl Storage {
    /// Use one in-memory repository for both concerns; keep a clone of
    /// `repo` to seed chapters.
    #[must_use]
    pub fn from_in_memory(repo: InMemoryRepository) -> Self {
        let chapters: Arc<dyn ChapterRepository> = Arc::new(repo.clone());
        let difficult_words: Arc<dyn DifficultWordRepository> = Arc::new(repo);
        Self {
            chapters,
            difficult_words,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reader_core::model::ChapterWord;

    fn build_chapter(id: u64) -> Chapter {
        Chapter::new(
            ChapterId::new(id),
            format!("Chapter {id}"),
            "你好，世界。",
            vec![ChapterWord {
                word: Word::new("你好"),
                pinyin: "nǐ hǎo".into(),
                translation: "hello".into(),
            }],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn lists_chapter_ids_in_order() {
        let repo = InMemoryRepository::new();
        repo.upsert_chapter(build_chapter(3)).unwrap();
        repo.upsert_chapter(build_chapter(1)).unwrap();

        let ids = repo.list_chapter_ids().await.unwrap();
        assert_eq!(ids, vec![ChapterId::new(1), ChapterId::new(3)]);
        assert!(repo.get_chapter(ChapterId::new(2)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn difficult_words_are_scoped_per_chapter() {
        let repo = InMemoryRepository::new();
        let words: DifficultWords = [Word::new("你好"), Word::new("世界")].into_iter().collect();
        repo.save_words(ChapterId::new(1), &words).await.unwrap();

        assert_eq!(repo.load_words(ChapterId::new(1)).await.unwrap(), words);
        assert!(repo.load_words(ChapterId::new(2)).await.unwrap().is_empty());

        repo.clear_words(ChapterId::new(1)).await.unwrap();
        assert!(repo.load_words(ChapterId::new(1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn storage_views_share_one_in_memory_repo() {
        let repo = InMemoryRepository::new();
        let storage = Storage::from_in_memory(repo.clone());
        repo.upsert_chapter(build_chapter(5)).unwrap();

        let chapter = storage.chapters.get_chapter(ChapterId::new(5)).await.unwrap();
        assert_eq!(chapter.map(|c| c.id()), Some(ChapterId::new(5)));

        let words: DifficultWords = [Word::new("你好")].into_iter().collect();
        storage
            .difficult_words
            .save_words(ChapterId::new(5), &words)
            .await
            .unwrap();
        assert_eq!(repo.load_words(ChapterId::new(5)).await.unwrap(), words);
    }

    #[tokio::test]
    async fn last_save_wins() {
        let repo = InMemoryRepository::new();
        let first: DifficultWords = [Word::new("a")].into_iter().collect();
        let second: DifficultWords = [Word::new("b")].into_iter().collect();
        repo.save_words(ChapterId::new(1), &first).await.unwrap();
        repo.save_words(ChapterId::new(1), &second).await.unwrap();

        assert_eq!(repo.load_words(ChapterId::new(1)).await.unwrap(), second);
    }
}

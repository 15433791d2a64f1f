//! Chapters shipped as a JSON file.
//!
//! ```json
//! { "chapters": [ { "id": 1, "title": "...", "content": "...",
//!                   "words": [ { "word": "...", "pinyin": "...", "translation": "..." } ] } ] }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use reader_core::model::{Chapter, ChapterError, ChapterId};
use serde::Deserialize;
use thiserror::Error;

use crate::repository::{ChapterRepository, StorageError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("cannot read chapter catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid chapter catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate chapter id {0}")]
    DuplicateId(ChapterId),

    #[error(transparent)]
    Chapter(#[from] ChapterError),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    chapters: Vec<Chapter>,
}

/// Immutable chapter collection keyed by id.
#[derive(Debug, Clone, Default)]
pub struct ChapterCatalog {
    chapters: BTreeMap<ChapterId, Chapter>,
}

impl ChapterCatalog {
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two chapters share an id, or
    /// `CatalogError::Chapter` if a chapter is invalid.
    pub fn from_chapters(chapters: Vec<Chapter>) -> Result<Self, CatalogError> {
        let mut by_id = BTreeMap::new();
        for chapter in chapters {
            chapter.validate()?;
            let id = chapter.id();
            if by_id.insert(id, chapter).is_some() {
                return Err(CatalogError::DuplicateId(id));
            }
        }
        Ok(Self { chapters: by_id })
    }

    /// # Errors
    ///
    /// Returns `CatalogError` if the JSON is malformed or fails validation.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_chapters(file.chapters)
    }

    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read, otherwise as
    /// [`ChapterCatalog::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chapter> {
        self.chapters.values()
    }
}

#[async_trait]
impl ChapterRepository for ChapterCatalog {
    async fn get_chapter(&self, id: ChapterId) -> Result<Option<Chapter>, StorageError> {
        Ok(self.chapters.get(&id).cloned())
    }

    async fn list_chapter_ids(&self) -> Result<Vec<ChapterId>, StorageError> {
        Ok(self.chapters.keys().copied().collect())
    }
}

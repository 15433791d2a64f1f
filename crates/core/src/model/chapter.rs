use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ChapterId, Word, WordDetail};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChapterError {
    #[error("chapter {0} has an empty title")]
    EmptyTitle(ChapterId),
}

/// A known interactive word of a chapter together with its dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterWord {
    pub word: Word,
    pub pinyin: String,
    pub translation: String,
}

impl ChapterWord {
    #[must_use]
    pub fn detail(&self) -> WordDetail {
        WordDetail::new(self.pinyin.clone(), self.translation.clone())
    }
}

/// Static reading material: the text plus the words readers can select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    id: ChapterId,
    title: String,
    content: String,
    #[serde(default)]
    words: Vec<ChapterWord>,
}

impl Chapter {
    /// # Errors
    ///
    /// Returns `ChapterError::EmptyTitle` if the title is blank.
    pub fn new(
        id: ChapterId,
        title: impl Into<String>,
        content: impl Into<String>,
        words: Vec<ChapterWord>,
    ) -> Result<Self, ChapterError> {
        let chapter = Self {
            id,
            title: title.into(),
            content: content.into(),
            words,
        };
        chapter.validate()?;
        Ok(chapter)
    }

    /// Check invariants on a chapter that came from deserialization.
    ///
    /// # Errors
    ///
    /// Returns `ChapterError::EmptyTitle` if the title is blank.
    pub fn validate(&self) -> Result<(), ChapterError> {
        if self.title.trim().is_empty() {
            return Err(ChapterError::EmptyTitle(self.id));
        }
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> ChapterId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn words(&self) -> &[ChapterWord] {
        &self.words
    }

    /// Words the segmenter should treat as interactive.
    pub fn interactive_words(&self) -> impl Iterator<Item = &Word> {
        self.words.iter().map(|entry| &entry.word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_title() {
        let err = Chapter::new(ChapterId::new(1), "  ", "text", Vec::new()).unwrap_err();
        assert_eq!(err, ChapterError::EmptyTitle(ChapterId::new(1)));
    }

    #[test]
    fn deserializes_without_words() {
        let chapter: Chapter =
            serde_json::from_str(r#"{"id": 2, "title": "Two", "content": "你好"}"#).unwrap();
        assert_eq!(chapter.id(), ChapterId::new(2));
        assert!(chapter.words().is_empty());
    }
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Word, WordDetail};

/// Shown in place of a missing pinyin or translation.
pub const PLACEHOLDER_TEXT: &str = "...";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FlashcardError {
    #[error("flashcard word must not be empty")]
    EmptyWord,
}

/// A review card for one difficult word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    character: Word,
    pinyin: String,
    translations: Vec<String>,
}

impl Flashcard {
    /// # Errors
    ///
    /// Returns `FlashcardError::EmptyWord` if `character` is blank.
    pub fn new(
        character: Word,
        pinyin: impl Into<String>,
        translations: Vec<String>,
    ) -> Result<Self, FlashcardError> {
        if !character.is_valid() {
            return Err(FlashcardError::EmptyWord);
        }
        Ok(Self {
            character,
            pinyin: pinyin.into(),
            translations,
        })
    }

    /// Build a card carrying a single translation, sentinel details included.
    #[must_use]
    pub fn from_detail(character: Word, detail: &WordDetail) -> Self {
        Self {
            character,
            pinyin: detail.pinyin.clone(),
            translations: vec![detail.translation.clone()],
        }
    }

    #[must_use]
    pub fn character(&self) -> &Word {
        &self.character
    }

    #[must_use]
    pub fn pinyin(&self) -> &str {
        &self.pinyin
    }

    #[must_use]
    pub fn translations(&self) -> &[String] {
        &self.translations
    }

    /// Copy with blank fields replaced by `PLACEHOLDER_TEXT` so the back
    /// of a card is never empty.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let pinyin = if self.pinyin.trim().is_empty() {
            PLACEHOLDER_TEXT.to_string()
        } else {
            self.pinyin.clone()
        };
        let translations = if self.translations.is_empty() {
            vec![PLACEHOLDER_TEXT.to_string()]
        } else {
            self.translations.clone()
        };
        Self {
            character: self.character.clone(),
            pinyin,
            translations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_character() {
        let err = Flashcard::new(Word::new(" "), "a", vec![]).unwrap_err();
        assert_eq!(err, FlashcardError::EmptyWord);
    }

    #[test]
    fn from_detail_keeps_sentinels() {
        let card = Flashcard::from_detail(
            Word::new("龙"),
            &WordDetail::sentinel("(AI lookup failed - error)"),
        );
        assert_eq!(card.pinyin(), "?");
        assert_eq!(card.translations(), ["(AI lookup failed - error)"]);
    }

    #[test]
    fn sanitized_fills_blank_fields() {
        let card = Flashcard::new(Word::new("龙"), "", Vec::new()).unwrap();
        let clean = card.sanitized();
        assert_eq!(clean.pinyin(), PLACEHOLDER_TEXT);
        assert_eq!(clean.translations(), [PLACEHOLDER_TEXT]);
        assert_eq!(clean.character(), card.character());
    }
}

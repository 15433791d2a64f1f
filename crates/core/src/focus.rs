use crate::model::{Word, WordDetail};

/// Which word the reader is currently inspecting, if any.
///
/// A single value replaces separate "open", "loading" and "has data" flags:
/// the lookup panel for a word is open exactly when the focus names it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WordFocus {
    #[default]
    Idle,
    Loading {
        word: Word,
    },
    Ready {
        word: Word,
        detail: WordDetail,
    },
}

impl WordFocus {
    /// Focus `word` and wait for its lookup. Replaces any previous focus.
    pub fn begin(&mut self, word: Word) {
        *self = WordFocus::Loading { word };
    }

    /// Deliver a lookup result.
    ///
    /// Returns `false` and leaves the focus untouched when `word` is no
    /// longer the focused word; late results are dropped.
    pub fn complete(&mut self, word: &Word, detail: WordDetail) -> bool {
        if !self.is_open_for(word) {
            return false;
        }
        *self = WordFocus::Ready {
            word: word.clone(),
            detail,
        };
        true
    }

    pub fn close(&mut self) {
        *self = WordFocus::Idle;
    }

    #[must_use]
    pub fn word(&self) -> Option<&Word> {
        match self {
            WordFocus::Idle => None,
            WordFocus::Loading { word } | WordFocus::Ready { word, .. } => Some(word),
        }
    }

    #[must_use]
    pub fn is_open_for(&self, word: &Word) -> bool {
        self.word() == Some(word)
    }

    #[must_use]
    pub fn is_loading_for(&self, word: &Word) -> bool {
        matches!(self, WordFocus::Loading { word: focused } if focused == word)
    }

    #[must_use]
    pub fn detail_for(&self, word: &Word) -> Option<&WordDetail> {
        match self {
            WordFocus::Ready {
                word: focused,
                detail,
            } if focused == word => Some(detail),
            _ => None,
        }
    }
}

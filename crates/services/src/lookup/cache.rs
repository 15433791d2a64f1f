use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use reader_core::model::{Word, WordDetail};

/// Lookup results remembered for one reading session.
///
/// Cloning shares the underlying map. Concurrent inserts for the same word
/// are last-write-wins.
#[derive(Debug, Clone, Default)]
pub struct WordCache {
    entries: Arc<RwLock<HashMap<Word, WordDetail>>>,
}

impl WordCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, word: &str) -> Option<WordDetail> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(word)
            .cloned()
    }

    pub fn insert(&self, word: Word, detail: WordDetail) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(word, detail);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

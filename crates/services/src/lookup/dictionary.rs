use std::collections::HashMap;

use reader_core::model::{Chapter, ChapterWord, Word, WordDetail};

/// Synchronous local word source, preferred over any network lookup.
pub trait Dictionary: Send + Sync {
    fn get(&self, word: &str) -> Option<WordDetail>;
}

/// Dictionary built from the word lists that ship with chapters.
#[derive(Debug, Clone, Default)]
pub struct LocalDictionary {
    entries: HashMap<Word, WordDetail>,
}

impl LocalDictionary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect entries from chapters; a word listed twice keeps its first entry.
    pub fn from_chapters<'a>(chapters: impl IntoIterator<Item = &'a Chapter>) -> Self {
        let mut dictionary = Self::new();
        for chapter in chapters {
            dictionary.extend(chapter.words());
        }
        dictionary
    }

    pub fn extend<'a>(&mut self, words: impl IntoIterator<Item = &'a ChapterWord>) {
        for entry in words {
            if entry.word.is_valid() {
                self.entries
                    .entry(entry.word.clone())
                    .or_insert_with(|| entry.detail());
            }
        }
    }

    pub fn insert(&mut self, word: Word, detail: WordDetail) {
        self.entries.insert(word, detail);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Dictionary for LocalDictionary {
    fn get(&self, word: &str) -> Option<WordDetail> {
        self.entries.get(word).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reader_core::model::ChapterId;

    fn entry(word: &str, translation: &str) -> ChapterWord {
        ChapterWord {
            word: Word::new(word),
            pinyin: "p".into(),
            translation: translation.into(),
        }
    }

    #[test]
    fn first_entry_wins_across_chapters() {
        let one = Chapter::new(ChapterId::new(1), "1", "", vec![entry("春节", "first")]).unwrap();
        let two = Chapter::new(
            ChapterId::new(2),
            "2",
            "",
            vec![entry("春节", "second"), entry("", "blank")],
        )
        .unwrap();

        let dictionary = LocalDictionary::from_chapters([&one, &two]);
        assert_eq!(dictionary.len(), 1);
        assert_eq!(dictionary.get("春节").unwrap().translation, "first");
        assert!(dictionary.get("").is_none());
    }
}

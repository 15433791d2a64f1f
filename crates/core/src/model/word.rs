use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Pinyin carried by a detail that stands in for a failed lookup.
pub const SENTINEL_PINYIN: &str = "?";

/// A token of the source script, compared by exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Word(String);

impl Word {
    #[must_use]
    pub fn new(word: impl Into<String>) -> Self {
        Self(word.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A word is usable for matching and lookup once it has visible content.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.0.trim().is_empty()
    }

    /// Length in characters, not bytes.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Word {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Word {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for Word {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Pinyin and translation for a word.
///
/// A detail may be a sentinel (`pinyin == "?"`) describing why the lookup
/// failed; that is an ordinary value, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordDetail {
    pub pinyin: String,
    pub translation: String,
}

impl WordDetail {
    #[must_use]
    pub fn new(pinyin: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            pinyin: pinyin.into(),
            translation: translation.into(),
        }
    }

    /// Placeholder detail for a lookup that could not produce a result.
    #[must_use]
    pub fn sentinel(placeholder: impl Into<String>) -> Self {
        Self::new(SENTINEL_PINYIN, placeholder)
    }

    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.pinyin == SENTINEL_PINYIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn blank_words_are_invalid() {
        assert!(!Word::new("").is_valid());
        assert!(!Word::new("  \t").is_valid());
        assert!(Word::new("学习").is_valid());
    }

    #[test]
    fn char_len_counts_characters() {
        assert_eq!(Word::new("学习").char_len(), 2);
        assert_eq!(Word::new("学习").as_str().len(), 6);
    }

    #[test]
    fn words_can_be_looked_up_by_str() {
        let mut map = HashMap::new();
        map.insert(Word::new("你好"), 1);
        assert_eq!(map.get("你好"), Some(&1));
    }

    #[test]
    fn sentinel_detail_is_recognised() {
        let detail = WordDetail::sentinel("(Invalid input)");
        assert!(detail.is_sentinel());
        assert_eq!(detail.translation, "(Invalid input)");
        assert!(!WordDetail::new("nǐ hǎo", "hello").is_sentinel());
    }
}

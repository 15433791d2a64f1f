use serde::{Deserialize, Serialize};

use super::Word;

/// One piece of segmented chapter text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TextSegment {
    /// A known interactive word.
    Word(Word),
    /// A run of ordinary characters, never containing a line break.
    PlainText(String),
    LineBreak,
}

impl TextSegment {
    /// The source text this segment covers.
    #[must_use]
    pub fn as_text(&self) -> &str {
        match self {
            TextSegment::Word(word) => word.as_str(),
            TextSegment::PlainText(text) => text,
            TextSegment::LineBreak => "\n",
        }
    }

    #[must_use]
    pub fn word(&self) -> Option<&Word> {
        match self {
            TextSegment::Word(word) => Some(word),
            _ => None,
        }
    }
}

//! Splits chapter text into interactive words, plain text and line breaks.
//!
//! Matching is greedy longest-match-first: at every position the longest
//! known word starting there wins, a line break is emitted on its own, and
//! everything else is collected into `PlainText` runs. Choices are never
//! revisited, so overlapping words are resolved purely by position and
//! length.

use std::collections::{HashMap, HashSet};

use crate::model::{TextSegment, Word};

/// Prepared word list for repeated segmentation of the same chapter.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    // Keyed by first char; each bucket is ordered longest first.
    by_first_char: HashMap<char, Vec<Word>>,
    len: usize,
}

impl Segmenter {
    /// Build a segmenter from a raw word list.
    ///
    /// Blank entries, entries containing a line break and duplicates are
    /// dropped. Among words of equal length the first one listed is tried
    /// first.
    pub fn new<I, W>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut candidates: Vec<Word> = words
            .into_iter()
            .map(|w| Word::new(w.as_ref()))
            .filter(|w| w.is_valid() && !w.as_str().contains('\n'))
            .filter(|w| seen.insert(w.clone()))
            .collect();
        candidates.sort_by_key(|w| std::cmp::Reverse(w.char_len()));

        let len = candidates.len();
        let mut by_first_char: HashMap<char, Vec<Word>> = HashMap::new();
        for word in candidates {
            if let Some(first) = word.as_str().chars().next() {
                by_first_char.entry(first).or_default().push(word);
            }
        }

        Self { by_first_char, len }
    }

    /// Number of usable words after filtering.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Segment `text`. Concatenating `as_text()` of the result gives back
    /// `text` unchanged.
    #[must_use]
    pub fn segment(&self, text: &str) -> Vec<TextSegment> {
        let mut segments = Vec::new();
        let mut plain = String::new();
        let mut rest = text;

        while let Some(ch) = rest.chars().next() {
            if let Some(word) = self.longest_match(ch, rest) {
                flush_plain(&mut plain, &mut segments);
                rest = &rest[word.as_str().len()..];
                segments.push(TextSegment::Word(word.clone()));
            } else if ch == '\n' {
                flush_plain(&mut plain, &mut segments);
                segments.push(TextSegment::LineBreak);
                rest = &rest[1..];
            } else {
                plain.push(ch);
                rest = &rest[ch.len_utf8()..];
            }
        }
        flush_plain(&mut plain, &mut segments);

        segments
    }

    fn longest_match(&self, first: char, rest: &str) -> Option<&Word> {
        self.by_first_char
            .get(&first)?
            .iter()
            .find(|word| rest.starts_with(word.as_str()))
    }
}

fn flush_plain(plain: &mut String, segments: &mut Vec<TextSegment>) {
    if !plain.is_empty() {
        segments.push(TextSegment::PlainText(std::mem::take(plain)));
    }
}

/// Segment `text` against `words` in one call.
#[must_use]
pub fn segment<I, W>(text: &str, words: I) -> Vec<TextSegment>
where
    I: IntoIterator<Item = W>,
    W: AsRef<str>,
{
    Segmenter::new(words).segment(text)
}

use std::collections::{HashMap, HashSet};
use std::fmt;

use reader_core::model::{Flashcard, Word};
use tracing::{debug, info};

use super::progress::{Face, ReviewState, ReviewSummary, ReviewView};
use super::shuffle::{RandomShuffler, Shuffler};
use crate::error::ReviewError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Judgment {
    Known,
    Unknown,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Multi-pass flashcard review.
///
/// The first round shows every card. Each later round shows, reshuffled,
/// the cards whose most recent judgment was "not known", until every card
/// is mastered.
///
/// Only the latest judgment per word is stored. Mastered and retry words
/// are both read from that record, so they can never overlap or drift.
pub struct ReviewSession {
    original: Vec<Flashcard>,
    round_deck: Vec<Flashcard>,
    index: usize,
    face: Face,
    round: u32,
    judgments: HashMap<Word, Judgment>,
    judgment_count: usize,
    finished: bool,
    shuffler: Box<dyn Shuffler>,
}

impl ReviewSession {
    /// Start a session with a random card order.
    #[must_use]
    pub fn start(flashcards: Vec<Flashcard>) -> Self {
        Self::start_with_shuffler(flashcards, RandomShuffler::new())
    }

    /// Start a session whose rounds are ordered by `shuffler`.
    ///
    /// Cards repeating an earlier character are dropped and blank fields
    /// get placeholders.
    #[must_use]
    pub fn start_with_shuffler(
        flashcards: Vec<Flashcard>,
        shuffler: impl Shuffler + 'static,
    ) -> Self {
        let mut seen = HashSet::new();
        let original: Vec<Flashcard> = flashcards
            .iter()
            .filter(|card| seen.insert(card.character().clone()))
            .map(Flashcard::sanitized)
            .collect();

        let mut session = Self {
            original,
            round_deck: Vec::new(),
            index: 0,
            face: Face::Down,
            round: 1,
            judgments: HashMap::new(),
            judgment_count: 0,
            finished: false,
            shuffler: Box::new(shuffler),
        };
        session.reset_rounds();
        session
    }

    fn reset_rounds(&mut self) {
        self.judgments.clear();
        self.judgment_count = 0;
        self.round = 1;
        self.index = 0;
        self.face = Face::Down;
        self.round_deck = self.original.clone();
        self.shuffler.shuffle(&mut self.round_deck);
    }

    #[must_use]
    pub fn original_deck(&self) -> &[Flashcard] {
        &self.original
    }

    /// Cards of the current round, in presentation order.
    #[must_use]
    pub fn round_deck(&self) -> &[Flashcard] {
        &self.round_deck
    }

    #[must_use]
    pub fn current_card(&self) -> Option<&Flashcard> {
        if self.finished {
            return None;
        }
        self.round_deck.get(self.index)
    }

    #[must_use]
    pub fn is_mastered(&self, word: &Word) -> bool {
        self.judgments.get(word) == Some(&Judgment::Known)
    }

    /// Words whose latest judgment was "known", in deck order.
    #[must_use]
    pub fn mastered_words(&self) -> Vec<&Word> {
        self.words_judged(Judgment::Known)
    }

    /// Words whose latest judgment was "not known", in deck order.
    #[must_use]
    pub fn retry_words(&self) -> Vec<&Word> {
        self.words_judged(Judgment::Unknown)
    }

    fn words_judged(&self, judgment: Judgment) -> Vec<&Word> {
        self.original
            .iter()
            .map(Flashcard::character)
            .filter(|word| self.judgments.get(*word) == Some(&judgment))
            .collect()
    }

    fn mastered_count(&self) -> usize {
        self.judgments
            .values()
            .filter(|j| **j == Judgment::Known)
            .count()
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        self.view().progress()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.original.is_empty() && self.mastered_count() == self.original.len()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn view(&self) -> ReviewView {
        let state = if self.finished {
            ReviewState::Finished
        } else if self.original.is_empty() {
            ReviewState::Empty
        } else if let Some(card) = self.round_deck.get(self.index) {
            ReviewState::Presenting {
                card: card.clone(),
                face: self.face,
            }
        } else {
            ReviewState::Complete
        };
        let position = if matches!(state, ReviewState::Presenting { .. }) {
            self.index + 1
        } else {
            0
        };

        ReviewView {
            state,
            mastered: self.mastered_count(),
            total: self.original.len(),
            round: self.round,
            position,
            round_len: self.round_deck.len(),
        }
    }

    #[must_use]
    pub fn summary(&self) -> ReviewSummary {
        ReviewSummary {
            total: self.original.len(),
            mastered: self.mastered_count(),
            rounds: self.round,
            judgments: self.judgment_count,
        }
    }

    /// Turn the current card over.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Finished` after `finish`, or
    /// `ReviewError::NoCard` when no card is presented.
    pub fn flip(&mut self) -> Result<ReviewView, ReviewError> {
        self.ensure_open()?;
        if self.current_card().is_none() {
            return Err(ReviewError::NoCard);
        }
        self.face = self.face.flipped();
        Ok(self.view())
    }

    /// Record whether the learner knew the revealed card and move on.
    ///
    /// At the end of a round the next one is built immediately from the
    /// words not yet mastered; when there are none the session is complete.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Finished` after `finish`, `ReviewError::NoCard`
    /// when no card is presented, or `ReviewError::NotRevealed` while the
    /// card is face down.
    pub fn judge(&mut self, knew_it: bool) -> Result<ReviewView, ReviewError> {
        self.ensure_open()?;
        let word = self
            .current_card()
            .map(|card| card.character().clone())
            .ok_or(ReviewError::NoCard)?;
        if self.face != Face::Up {
            return Err(ReviewError::NotRevealed);
        }

        let judgment = if knew_it {
            Judgment::Known
        } else {
            Judgment::Unknown
        };
        debug!(%word, knew_it, round = self.round, "judged card");
        self.judgments.insert(word, judgment);
        self.judgment_count += 1;
        self.index += 1;
        self.face = Face::Down;

        if self.index >= self.round_deck.len() {
            self.start_next_round();
        }
        Ok(self.view())
    }

    fn start_next_round(&mut self) {
        let mut next: Vec<Flashcard> = self
            .original
            .iter()
            .filter(|card| !self.is_mastered(card.character()))
            .cloned()
            .collect();

        self.index = 0;
        if next.is_empty() {
            self.round_deck.clear();
            info!(
                cards = self.original.len(),
                rounds = self.round,
                judgments = self.judgment_count,
                "review complete"
            );
            return;
        }

        self.shuffler.shuffle(&mut next);
        self.round += 1;
        debug!(round = self.round, cards = next.len(), "starting review round");
        self.round_deck = next;
    }

    /// Start over with every card unjudged and a freshly shuffled deck.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Finished` after `finish`.
    pub fn restart(&mut self) -> Result<ReviewView, ReviewError> {
        self.ensure_open()?;
        self.reset_rounds();
        Ok(self.view())
    }

    /// Leave the session. No transition is accepted afterwards.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Finished` if the session was already finished.
    pub fn finish(&mut self) -> Result<ReviewSummary, ReviewError> {
        self.ensure_open()?;
        self.finished = true;
        let summary = self.summary();
        info!(
            mastered = summary.mastered,
            total = summary.total,
            "review session finished"
        );
        Ok(summary)
    }

    fn ensure_open(&self) -> Result<(), ReviewError> {
        if self.finished {
            return Err(ReviewError::Finished);
        }
        Ok(())
    }
}

impl fmt::Debug for ReviewSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReviewSession")
            .field("cards_len", &self.original.len())
            .field("round", &self.round)
            .field("round_len", &self.round_deck.len())
            .field("index", &self.index)
            .field("face", &self.face)
            .field("mastered", &self.mastered_count())
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

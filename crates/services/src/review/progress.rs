use reader_core::model::Flashcard;

/// Which side of the current card is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Down,
    Up,
}

impl Face {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Face::Down => Face::Up,
            Face::Up => Face::Down,
        }
    }
}

/// Observable state of a review session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewState {
    /// The session started without cards.
    Empty,
    Presenting {
        card: Flashcard,
        face: Face,
    },
    /// Every card is mastered. The session can still be restarted.
    Complete,
    /// The learner left the session.
    Finished,
}

/// Snapshot returned by every session operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewView {
    pub state: ReviewState,
    pub mastered: usize,
    pub total: usize,
    /// 1-based pass number.
    pub round: u32,
    /// 1-based position of the current card within the round, 0 when none.
    pub position: usize,
    pub round_len: usize,
}

impl ReviewView {
    /// Mastered share of the deck in `[0, 1]`; 0 for an empty deck.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.mastered as f64 / self.total as f64;
        ratio.clamp(0.0, 1.0)
    }

    /// True when no card will be presented without a restart.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self.state, ReviewState::Presenting { .. })
    }

    #[must_use]
    pub fn card(&self) -> Option<&Flashcard> {
        match &self.state {
            ReviewState::Presenting { card, .. } => Some(card),
            _ => None,
        }
    }

    #[must_use]
    pub fn face(&self) -> Option<Face> {
        match self.state {
            ReviewState::Presenting { face, .. } => Some(face),
            _ => None,
        }
    }
}

/// Totals for a session, reported when it completes or is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewSummary {
    pub total: usize,
    pub mastered: usize,
    pub rounds: u32,
    pub judgments: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(mastered: usize, total: usize) -> ReviewView {
        ReviewView {
            state: ReviewState::Complete,
            mastered,
            total,
            round: 1,
            position: 0,
            round_len: 0,
        }
    }

    #[test]
    fn progress_of_empty_deck_is_zero() {
        assert!(view(0, 0).progress().abs() < f64::EPSILON);
    }

    #[test]
    fn progress_is_a_fraction() {
        assert!((view(1, 4).progress() - 0.25).abs() < f64::EPSILON);
        assert!((view(4, 4).progress() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn face_flips_both_ways() {
        assert_eq!(Face::Down.flipped(), Face::Up);
        assert_eq!(Face::Up.flipped(), Face::Down);
    }
}

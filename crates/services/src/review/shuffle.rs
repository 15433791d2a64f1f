use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use reader_core::model::Flashcard;

/// Orders the cards of each review round.
pub trait Shuffler: Send {
    fn shuffle(&mut self, cards: &mut [Flashcard]);
}

/// Uniform random permutation (Fisher-Yates).
pub struct RandomShuffler {
    rng: StdRng,
}

impl RandomShuffler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible permutations for a given seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomShuffler {
    fn default() -> Self {
        Self::new()
    }
}

impl Shuffler for RandomShuffler {
    fn shuffle(&mut self, cards: &mut [Flashcard]) {
        cards.shuffle(&mut self.rng);
    }
}

/// Leaves cards in deck order.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepOrder;

impl Shuffler for KeepOrder {
    fn shuffle(&mut self, _cards: &mut [Flashcard]) {}
}

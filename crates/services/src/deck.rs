use std::collections::{HashMap, HashSet};

use futures::stream::{self, StreamExt};
use reader_core::model::{Flashcard, Word, WordDetail};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::lookup::WordResolver;

/// Lookups in flight at once while building a deck.
const MAX_CONCURRENT_LOOKUPS: usize = 8;

/// Flashcards produced for a set of difficult words.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardDeck {
    pub flashcards: Vec<Flashcard>,
}

impl FlashcardDeck {
    #[must_use]
    pub fn len(&self) -> usize {
        self.flashcards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flashcards.is_empty()
    }
}

/// Turns difficult words into flashcards, resolving details that were not
/// supplied up front.
#[derive(Clone)]
pub struct DeckBuilder {
    resolver: WordResolver,
}

impl DeckBuilder {
    #[must_use]
    pub fn new(resolver: WordResolver) -> Self {
        Self { resolver }
    }

    /// Build one card per distinct word.
    ///
    /// Words found in `prefetched` come first, in input order, and never
    /// reach the resolver. The rest are resolved concurrently and follow in
    /// input order. A failed lookup yields a card with sentinel details.
    pub async fn build<'a>(
        &self,
        words: impl IntoIterator<Item = &'a Word>,
        prefetched: &HashMap<Word, WordDetail>,
    ) -> FlashcardDeck {
        let mut seen = HashSet::new();
        let mut flashcards = Vec::new();
        let mut missing = Vec::new();

        for word in words {
            if !seen.insert(word) {
                continue;
            }
            match prefetched.get(word) {
                Some(detail) => flashcards.push(Flashcard::from_detail(word.clone(), detail)),
                None => missing.push(word),
            }
        }
        let prefetched_count = flashcards.len();

        let resolved: Vec<WordDetail> = stream::iter(&missing)
            .map(|word| self.resolver.resolve(word))
            .buffered(MAX_CONCURRENT_LOOKUPS)
            .collect()
            .await;
        flashcards.extend(
            missing
                .into_iter()
                .zip(resolved)
                .map(|(word, detail)| Flashcard::from_detail(word.clone(), &detail)),
        );

        info!(
            total = flashcards.len(),
            prefetched = prefetched_count,
            resolved = flashcards.len() - prefetched_count,
            "built flashcard deck"
        );
        FlashcardDeck { flashcards }
    }
}

use std::sync::Arc;

use reader_core::Segmenter;
use reader_core::model::{Chapter, ChapterId, TextSegment, Word, WordDetail};
use storage::repository::{ChapterRepository, DifficultWordRepository, Storage};
use storage::DifficultWords;
use tracing::{debug, info};

use crate::deck::{DeckBuilder, FlashcardDeck};
use crate::error::ReadingError;
use crate::lookup::WordResolver;
use crate::review::{ReviewSession, Shuffler};

/// An opened chapter: its text split into segments plus the words the
/// learner has already marked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterView {
    pub chapter: Chapter,
    pub segments: Vec<TextSegment>,
    pub difficult: DifficultWords,
}

impl ChapterView {
    #[must_use]
    pub fn is_difficult(&self, word: &Word) -> bool {
        self.difficult.contains(word)
    }
}

/// Reading workflow over one chapter at a time.
///
/// Every change to a chapter's difficult words is saved right away.
#[derive(Clone)]
pub struct ReadingService {
    chapters: Arc<dyn ChapterRepository>,
    difficult_words: Arc<dyn DifficultWordRepository>,
    resolver: WordResolver,
    decks: DeckBuilder,
}

impl ReadingService {
    #[must_use]
    pub fn new(storage: &Storage, resolver: WordResolver) -> Self {
        Self {
            chapters: Arc::clone(&storage.chapters),
            difficult_words: Arc::clone(&storage.difficult_words),
            decks: DeckBuilder::new(resolver.clone()),
            resolver,
        }
    }

    #[must_use]
    pub fn resolver(&self) -> &WordResolver {
        &self.resolver
    }

    /// # Errors
    ///
    /// Returns `ReadingError::Storage` if the chapter source fails.
    pub async fn chapter_ids(&self) -> Result<Vec<ChapterId>, ReadingError> {
        Ok(self.chapters.list_chapter_ids().await?)
    }

    /// Load a chapter, segment it against its word list and attach the
    /// stored difficult words.
    ///
    /// # Errors
    ///
    /// Returns `ReadingError::ChapterNotFound` for an unknown id.
    /// Returns `ReadingError::Storage` if repository access fails.
    pub async fn open_chapter(&self, id: ChapterId) -> Result<ChapterView, ReadingError> {
        let chapter = self.chapter(id).await?;
        let segments = Segmenter::new(chapter.interactive_words()).segment(chapter.content());
        let difficult = self.difficult_words.load_words(id).await?;
        debug!(
            chapter = %id,
            segments = segments.len(),
            difficult = difficult.len(),
            "opened chapter"
        );
        Ok(ChapterView {
            chapter,
            segments,
            difficult,
        })
    }

    /// The stored difficult words of a chapter.
    ///
    /// # Errors
    ///
    /// Returns `ReadingError::Storage` if repository access fails.
    pub async fn difficult_words(&self, chapter: ChapterId) -> Result<DifficultWords, ReadingError> {
        Ok(self.difficult_words.load_words(chapter).await?)
    }

    /// Ids of the chapters before and after `id`, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `ReadingError::ChapterNotFound` when `id` is not listed.
    /// Returns `ReadingError::Storage` if the chapter source fails.
    pub async fn neighbours(
        &self,
        id: ChapterId,
    ) -> Result<(Option<ChapterId>, Option<ChapterId>), ReadingError> {
        let ids = self.chapters.list_chapter_ids().await?;
        let pos = ids
            .iter()
            .position(|candidate| *candidate == id)
            .ok_or(ReadingError::ChapterNotFound(id))?;
        let previous = pos.checked_sub(1).map(|i| ids[i]);
        let next = ids.get(pos + 1).copied();
        Ok((previous, next))
    }

    /// Resolve `word` and mark it difficult in `chapter`.
    ///
    /// The word is marked even when the lookup comes back as a sentinel;
    /// blank words are resolved but never stored.
    ///
    /// # Errors
    ///
    /// Returns `ReadingError::ChapterNotFound` for an unknown chapter.
    /// Returns `ReadingError::Storage` if saving fails.
    pub async fn lookup_word(
        &self,
        chapter: ChapterId,
        word: &Word,
    ) -> Result<WordDetail, ReadingError> {
        self.chapter(chapter).await?;
        let detail = self.resolver.resolve(word).await;
        if !word.is_valid() {
            return Ok(detail);
        }

        let mut difficult = self.difficult_words.load_words(chapter).await?;
        if difficult.insert(word.clone()) {
            self.difficult_words.save_words(chapter, &difficult).await?;
            debug!(chapter = %chapter, %word, "marked difficult word");
        }
        Ok(detail)
    }

    /// Remove `word` from the chapter's difficult words. Returns whether it
    /// was marked.
    ///
    /// # Errors
    ///
    /// Returns `ReadingError::Storage` if loading or saving fails.
    pub async fn unmark_word(&self, chapter: ChapterId, word: &Word) -> Result<bool, ReadingError> {
        let mut difficult = self.difficult_words.load_words(chapter).await?;
        if !difficult.remove(word) {
            return Ok(false);
        }
        self.difficult_words.save_words(chapter, &difficult).await?;
        debug!(chapter = %chapter, %word, "unmarked difficult word");
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns `ReadingError::Storage` if clearing fails.
    pub async fn reset_chapter(&self, chapter: ChapterId) -> Result<(), ReadingError> {
        self.difficult_words.clear_words(chapter).await?;
        info!(chapter = %chapter, "cleared difficult words");
        Ok(())
    }

    /// Flashcards for the chapter's difficult words.
    ///
    /// Details already known to the dictionary or cache are handed to the
    /// deck builder up front; only the rest are looked up.
    ///
    /// # Errors
    ///
    /// Returns `ReadingError::ChapterNotFound` for an unknown chapter.
    /// Returns `ReadingError::NoDifficultWords` when nothing is marked.
    /// Returns `ReadingError::Storage` if repository access fails.
    pub async fn build_flashcards(&self, chapter: ChapterId) -> Result<FlashcardDeck, ReadingError> {
        self.chapter(chapter).await?;
        let difficult = self.difficult_words.load_words(chapter).await?;
        if difficult.is_empty() {
            return Err(ReadingError::NoDifficultWords(chapter));
        }
        let prefetched = self.resolver.prefetched(&difficult);
        Ok(self.decks.build(&difficult, &prefetched).await)
    }

    /// Start reviewing the chapter's difficult words in random order.
    ///
    /// # Errors
    ///
    /// Same as [`ReadingService::build_flashcards`].
    pub async fn start_review(&self, chapter: ChapterId) -> Result<ReviewSession, ReadingError> {
        let deck = self.build_flashcards(chapter).await?;
        Ok(ReviewSession::start(deck.flashcards))
    }

    /// Like [`ReadingService::start_review`] with a caller-chosen card order.
    ///
    /// # Errors
    ///
    /// Same as [`ReadingService::build_flashcards`].
    pub async fn start_review_with(
        &self,
        chapter: ChapterId,
        shuffler: impl Shuffler + 'static,
    ) -> Result<ReviewSession, ReadingError> {
        let deck = self.build_flashcards(chapter).await?;
        Ok(ReviewSession::start_with_shuffler(deck.flashcards, shuffler))
    }

    /// Load a chapter without segmenting it.
    ///
    /// # Errors
    ///
    /// Returns `ReadingError::ChapterNotFound` for an unknown id.
    /// Returns `ReadingError::Storage` if the chapter source fails.
    pub async fn chapter(&self, id: ChapterId) -> Result<Chapter, ReadingError> {
        self.chapters
            .get_chapter(id)
            .await?
            .ok_or(ReadingError::ChapterNotFound(id))
    }
}

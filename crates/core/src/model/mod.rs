mod chapter;
mod flashcard;
mod ids;
mod segment;
mod word;

pub use chapter::{Chapter, ChapterError, ChapterWord};
pub use flashcard::{Flashcard, FlashcardError, PLACEHOLDER_TEXT};
pub use ids::{ChapterId, ParseIdError};
pub use segment::TextSegment;
pub use word::{SENTINEL_PINYIN, Word, WordDetail};

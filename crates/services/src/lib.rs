#![forbid(unsafe_code)]

pub mod app_services;
pub mod deck;
pub mod error;
pub mod lookup;
pub mod reading;
pub mod review;

pub use app_services::AppServices;
pub use deck::{DeckBuilder, FlashcardDeck};
pub use error::{AppServicesError, LookupError, ReadingError, ReviewError};
pub use lookup::{
    AiLookupClient, AiLookupConfig, Dictionary, LocalDictionary, LookupClient, WordCache,
    WordResolver,
};
pub use reading::{ChapterView, ReadingService};
pub use review::{
    Face, KeepOrder, RandomShuffler, ReviewSession, ReviewState, ReviewSummary, ReviewView,
    Shuffler,
};

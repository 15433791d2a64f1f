mod progress;
mod session;
mod shuffle;

pub use progress::{Face, ReviewState, ReviewSummary, ReviewView};
pub use session::ReviewSession;
pub use shuffle::{KeepOrder, RandomShuffler, Shuffler};

#![forbid(unsafe_code)]

pub mod focus;
pub mod model;
pub mod segmenter;
pub mod time;

pub use focus::WordFocus;
pub use segmenter::{Segmenter, segment};
pub use time::Clock;

mod cache;
mod client;
mod dictionary;
mod resolver;

pub use cache::WordCache;
pub use client::{AiLookupClient, AiLookupConfig, LookupClient};
pub use dictionary::{Dictionary, LocalDictionary};
pub use resolver::WordResolver;

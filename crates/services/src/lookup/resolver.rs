use std::collections::HashMap;
use std::sync::Arc;

use reader_core::model::{Word, WordDetail};
use tracing::{debug, warn};

use super::cache::WordCache;
use super::client::LookupClient;
use super::dictionary::Dictionary;
use crate::error::LookupError;

/// Resolves words to pinyin and translation.
///
/// Order of preference: local dictionary, then this resolver's cache, then
/// the lookup client. Successful client results are cached; failures are
/// returned as sentinel details and never cached, so the next call retries.
#[derive(Clone)]
pub struct WordResolver {
    dictionary: Arc<dyn Dictionary>,
    client: Arc<dyn LookupClient>,
    cache: WordCache,
}

impl WordResolver {
    #[must_use]
    pub fn new(dictionary: Arc<dyn Dictionary>, client: Arc<dyn LookupClient>) -> Self {
        Self {
            dictionary,
            client,
            cache: WordCache::new(),
        }
    }

    /// Share an existing cache instead of starting empty.
    #[must_use]
    pub fn with_cache(mut self, cache: WordCache) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub fn cache(&self) -> &WordCache {
        &self.cache
    }

    /// Detail already available without a network call.
    #[must_use]
    pub fn known(&self, word: &str) -> Option<WordDetail> {
        self.dictionary.get(word).or_else(|| self.cache.get(word))
    }

    /// Known details for `words`, keyed by word; words without one are absent.
    pub fn prefetched<'a>(
        &self,
        words: impl IntoIterator<Item = &'a Word>,
    ) -> HashMap<Word, WordDetail> {
        words
            .into_iter()
            .filter_map(|word| self.known(word.as_str()).map(|detail| (word.clone(), detail)))
            .collect()
    }

    /// Resolve `word`. Never fails; problems come back as sentinel details.
    pub async fn resolve(&self, word: &Word) -> WordDetail {
        if !word.is_valid() {
            warn!("rejected lookup of an empty word");
            return WordDetail::sentinel(LookupError::InvalidInput.placeholder());
        }

        if let Some(detail) = self.dictionary.get(word.as_str()) {
            debug!(%word, "resolved from local dictionary");
            return detail;
        }
        if let Some(detail) = self.cache.get(word.as_str()) {
            debug!(%word, "resolved from cache");
            return detail;
        }

        match self.client.lookup(word.as_str()).await {
            Ok(detail) => {
                debug!(%word, pinyin = %detail.pinyin, "resolved through lookup client");
                self.cache.insert(word.clone(), detail.clone());
                detail
            }
            Err(err) => {
                warn!(%word, error = %err, "word lookup failed");
                WordDetail::sentinel(err.placeholder())
            }
        }
    }
}

use std::path::Path;
use std::sync::Arc;

use storage::repository::{ChapterRepository, Storage};
use storage::ChapterCatalog;
use tracing::info;

use crate::error::AppServicesError;
use crate::lookup::{AiLookupClient, AiLookupConfig, LocalDictionary, LookupClient, WordResolver};
use crate::reading::ReadingService;

/// Assembles app-facing services from a chapter catalog, a database and the
/// lookup configuration.
#[derive(Clone)]
pub struct AppServices {
    reading: Arc<ReadingService>,
    ai_enabled: bool,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and a JSON chapter catalog.
    ///
    /// The local dictionary is taken from the catalog's word lists. Without
    /// `ai`, words missing from it resolve to the "unavailable" sentinel.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the catalog cannot be read, the database
    /// cannot be initialized or the HTTP client cannot be built.
    pub async fn new_sqlite(
        db_url: &str,
        chapters_path: impl AsRef<Path>,
        ai: Option<AiLookupConfig>,
    ) -> Result<Self, AppServicesError> {
        let catalog = ChapterCatalog::from_path(chapters_path)?;
        let dictionary = LocalDictionary::from_chapters(catalog.iter());
        info!(
            chapters = catalog.len(),
            dictionary = dictionary.len(),
            "loaded chapter catalog"
        );

        let chapters: Arc<dyn ChapterRepository> = Arc::new(catalog);
        let storage = Storage::sqlite(db_url, chapters).await?;

        let client = AiLookupClient::new(ai)?;
        if !client.enabled() {
            info!("AI lookup disabled; set READER_AI_API_KEY to enable it");
        }

        Ok(Self::from_parts(&storage, dictionary, Arc::new(client)))
    }

    /// Build services over existing storage and lookup collaborators.
    #[must_use]
    pub fn from_parts(
        storage: &Storage,
        dictionary: LocalDictionary,
        client: Arc<dyn LookupClient>,
    ) -> Self {
        let ai_enabled = client.enabled();
        let resolver = WordResolver::new(Arc::new(dictionary), client);
        Self {
            reading: Arc::new(ReadingService::new(storage, resolver)),
            ai_enabled,
        }
    }

    #[must_use]
    pub fn reading(&self) -> Arc<ReadingService> {
        Arc::clone(&self.reading)
    }

    #[must_use]
    pub fn ai_enabled(&self) -> bool {
        self.ai_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;

    #[test]
    fn ai_flag_follows_the_injected_client() {
        let storage = Storage::from_in_memory(InMemoryRepository::new());

        let disabled = AiLookupClient::new(None).unwrap();
        let services = AppServices::from_parts(&storage, LocalDictionary::new(), Arc::new(disabled));
        assert!(!services.ai_enabled());

        let enabled = AiLookupClient::new(Some(AiLookupConfig::new("key"))).unwrap();
        let services = AppServices::from_parts(&storage, LocalDictionary::new(), Arc::new(enabled));
        assert!(services.ai_enabled());
    }
}

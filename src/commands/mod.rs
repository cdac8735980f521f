pub mod auth;
pub mod clear;
pub mod day;
pub mod month;
pub mod refresh;
pub mod status;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use expocal_core::config::AppConfig;
use expocal_core::constants::FETCH_FAILED_MESSAGE;
use expocal_core::{
    Credential, Event, EventCache, EventSource, ExpoError, ExpoResult, FileStore, Origin,
    Snapshot, SystemClock,
};
use expocal_provider_gemini::{GeminiSettings, GeminiSource};
use owo_colors::OwoColorize;
use tracing::debug;

use crate::utils::tui::create_spinner;

/// Everything a command needs, loaded once per invocation.
pub struct Context {
    pub config: AppConfig,
    pub store: Arc<FileStore>,
    pub clock: Arc<SystemClock>,
}

impl Context {
    pub fn load() -> Result<Self> {
        let config = AppConfig::load()?;
        let store = Arc::new(FileStore::in_dir(&config.data_path()));
        debug!(store = %store.path().display(), "Loaded config");

        Ok(Context {
            config,
            store,
            clock: Arc::new(SystemClock),
        })
    }

    pub fn credential(&self) -> Result<Credential> {
        Ok(Credential::load(self.store.as_ref())?)
    }

    /// Engine wired to the Gemini source. Fails when no API key is stored.
    pub fn event_cache(&self) -> Result<EventCache> {
        let credential = self.credential()?;
        let source = GeminiSource::new(
            credential,
            GeminiSettings::from(&self.config),
            self.clock.clone(),
        )?;

        Ok(EventCache::new(Arc::new(source), self.store.clone(), self.clock.clone())
            .with_fetch_timeout(self.config.fetch_timeout()?))
    }

    /// Engine for commands that only touch what is already stored.
    pub fn offline_cache(&self) -> EventCache {
        EventCache::new(Arc::new(Unconnected), self.store.clone(), self.clock.clone())
    }

    /// Events to show, refreshing when needed. A failed refresh prints one
    /// message and falls back to whatever was stored before.
    pub async fn load_events(&self, force_refresh: bool) -> Result<Option<Snapshot>> {
        let cache = self.event_cache()?;

        let spinner = create_spinner(if force_refresh {
            "Searching the web for exhibitions".to_string()
        } else {
            "Loading events".to_string()
        });
        let result = cache.get_events(force_refresh).await;
        spinner.finish_and_clear();

        match result {
            Ok(snapshot) => {
                if snapshot.origin == Origin::Source {
                    println!(
                        "{}",
                        format!("Fetched {} events", snapshot.events.len()).dimmed()
                    );
                }
                Ok(Some(snapshot))
            }
            Err(e) if e.is_recoverable() => {
                debug!("Falling back to stored events: {e}");
                eprintln!("{}", FETCH_FAILED_MESSAGE.red());
                Ok(cache.cached()?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Source used when no key is needed. Never fetches.
struct Unconnected;

#[async_trait]
impl EventSource for Unconnected {
    async fn fetch(&self) -> ExpoResult<Vec<Event>> {
        Err(ExpoError::CredentialMissing)
    }

    fn name(&self) -> &str {
        "none"
    }
}

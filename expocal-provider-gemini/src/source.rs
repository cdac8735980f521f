use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use expocal_core::config::AppConfig;
use expocal_core::event::EventRecord;
use expocal_core::{Clock, Credential, Event, EventSource, ExpoError, ExpoResult};
use tracing::{debug, info};

use crate::client::GeminiClient;
use crate::prompts::{event_schema, extraction_prompt, search_prompt};
use crate::protocol::GenerateContentRequest;

/// Used in place of an empty search answer so extraction still runs.
const NO_INFORMATION: &str = "No information found.";

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_base: String,
    pub model: String,
    pub region: String,
    pub focus: String,
}

impl From<&AppConfig> for GeminiSettings {
    fn from(config: &AppConfig) -> Self {
        GeminiSettings {
            api_base: config.api_base.clone(),
            model: config.model.clone(),
            region: config.region.clone(),
            focus: config.focus.clone(),
        }
    }
}

pub struct GeminiSource {
    client: GeminiClient,
    settings: GeminiSettings,
    clock: Arc<dyn Clock>,
}

impl GeminiSource {
    pub fn new(
        credential: Credential,
        settings: GeminiSettings,
        clock: Arc<dyn Clock>,
    ) -> ExpoResult<Self> {
        let client = GeminiClient::new(credential, &settings.api_base, &settings.model)?;
        Ok(GeminiSource {
            client,
            settings,
            clock,
        })
    }

    /// Step 1: grounded free-text search.
    async fn search(&self) -> ExpoResult<String> {
        let prompt = search_prompt(self.clock.now(), &self.settings.region, &self.settings.focus);
        let request = GenerateContentRequest::prompt(prompt).with_search();

        let text = self
            .client
            .generate(&request)
            .await
            .map_err(|e| step_failed("Search", e))?;

        debug!(chars = text.len(), "Search step finished");
        if text.trim().is_empty() {
            Ok(NO_INFORMATION.to_string())
        } else {
            Ok(text)
        }
    }

    /// Step 2: schema-constrained extraction of the search text.
    async fn extract(&self, raw_text: &str) -> ExpoResult<Vec<Event>> {
        let prompt = extraction_prompt(raw_text, &self.settings.region);
        let request = GenerateContentRequest::prompt(prompt).with_json_schema(event_schema());

        let json_text = self
            .client
            .generate(&request)
            .await
            .map_err(|e| step_failed("Extraction", e))?;

        parse_events(&json_text).map_err(|e| step_failed("Extraction", e))
    }
}

#[async_trait]
impl EventSource for GeminiSource {
    async fn fetch(&self) -> ExpoResult<Vec<Event>> {
        let raw_text = self.search().await?;
        let events = self.extract(&raw_text).await?;
        info!(count = events.len(), model = self.client.model(), "Extracted events");
        Ok(events)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

fn step_failed(step: &str, error: ExpoError) -> ExpoError {
    match error {
        ExpoError::FetchFailed(message) => ExpoError::FetchFailed(format!("{step} step: {message}")),
        other => ExpoError::FetchFailed(format!("{step} step: {other}")),
    }
}

/// Parse the extraction output, dropping records without a name or a date
/// and making ids unique within the batch.
fn parse_events(json_text: &str) -> ExpoResult<Vec<Event>> {
    let body = strip_code_fence(json_text);
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let records: Vec<EventRecord> = serde_json::from_str(body)
        .map_err(|e| ExpoError::FetchFailed(format!("Response is not an event list: {e}")))?;

    let total = records.len();
    let mut events: Vec<Event> = records
        .into_iter()
        .filter(|r| r.has_name() && r.has_start_date())
        .map(Event::from)
        .collect();

    if events.len() < total {
        debug!(dropped = total - events.len(), "Dropped records without name or date");
    }

    assign_ids(&mut events);
    Ok(events)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn assign_ids(events: &mut [Event]) {
    let mut seen = HashSet::new();

    for event in events.iter_mut() {
        let base = if event.id.trim().is_empty() {
            slug(&format!("{} {}", event.name, event.start_date))
        } else {
            event.id.trim().to_string()
        };

        let mut id = base.clone();
        let mut n = 2;
        while !seen.insert(id.clone()) {
            id = format!("{base}-{n}");
            n += 1;
        }
        event.id = id;
    }
}

fn slug(text: &str) -> String {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

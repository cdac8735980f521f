//! The event cache engine.
//!
//! Serves the last fetched batch while it is younger than `CACHE_DURATION`,
//! otherwise asks the `EventSource` for a new one and replaces the stored
//! batch and timestamp in a single store write. Concurrent callers are
//! coalesced onto one in-flight fetch.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::constants::{CACHE_DURATION, DEFAULT_FETCH_TIMEOUT, KEY_EVENTS, KEY_TIMESTAMP};
use crate::day_index::DayIndex;
use crate::error::{ExpoError, ExpoResult};
use crate::event::Event;
use crate::source::EventSource;
use crate::store::{Store, StoreOp};

/// A complete batch and the instant it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub events: Vec<Event>,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(events: Vec<Event>, fetched_at: DateTime<Utc>) -> Self {
        // Stored with millisecond precision; keep the in-memory copy identical
        let fetched_at = DateTime::from_timestamp_millis(fetched_at.timestamp_millis())
            .unwrap_or(fetched_at);
        CacheEntry { events, fetched_at }
    }

    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.fetched_at
    }

    /// Younger than `window` at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        match chrono::Duration::from_std(window) {
            Ok(window) => self.age(now) < window,
            Err(_) => true,
        }
    }

    fn decode(events: &str, timestamp: &str) -> ExpoResult<Self> {
        let millis: i64 = timestamp
            .trim()
            .parse()
            .map_err(|_| ExpoError::CacheCorrupt(format!("bad timestamp '{timestamp}'")))?;
        let fetched_at = DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| ExpoError::CacheCorrupt(format!("timestamp {millis} out of range")))?;
        let events: Vec<Event> =
            serde_json::from_str(events).map_err(|e| ExpoError::CacheCorrupt(e.to_string()))?;

        Ok(CacheEntry { events, fetched_at })
    }

    fn encode(&self) -> ExpoResult<Vec<StoreOp>> {
        let events = serde_json::to_string(&self.events)
            .map_err(|e| ExpoError::Serialization(e.to_string()))?;

        Ok(vec![
            StoreOp::put(KEY_EVENTS, events),
            StoreOp::put(KEY_TIMESTAMP, self.fetched_at.timestamp_millis().to_string()),
        ])
    }
}

/// Where a `Snapshot` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Served from the store without contacting the source.
    Cache,
    /// Fetched from the source just now (or by a fetch this call joined).
    Source,
}

/// The events a caller gets to display.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub events: Vec<Event>,
    pub fetched_at: DateTime<Utc>,
    pub origin: Origin,
    /// Older than the staleness window. Only ever set by `EventCache::cached`.
    pub stale: bool,
}

impl Snapshot {
    fn new(entry: CacheEntry, origin: Origin, stale: bool) -> Self {
        Snapshot {
            events: entry.events,
            fetched_at: entry.fetched_at,
            origin,
            stale,
        }
    }

    pub fn index(&self) -> DayIndex {
        DayIndex::build(&self.events)
    }
}

#[derive(Default)]
struct Flight {
    /// Outcome of the most recent fetch, handed to callers that queued
    /// behind it.
    last: Option<Result<CacheEntry, String>>,
}

pub struct EventCache {
    source: Arc<dyn EventSource>,
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    fetch_timeout: Duration,
    /// Bumped (under the flight lock) every time a fetch finishes.
    completed: AtomicU64,
    flight: Mutex<Flight>,
}

impl EventCache {
    pub fn new(source: Arc<dyn EventSource>, store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        EventCache {
            source,
            store,
            clock,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            completed: AtomicU64::new(0),
            flight: Mutex::new(Flight::default()),
        }
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    // LIFECYCLE:

    /// Read the stored entry. Anything incomplete or unparsable counts as
    /// no entry at all.
    pub fn load(&self) -> ExpoResult<Option<CacheEntry>> {
        let mut values = self.store.get_many(&[KEY_EVENTS, KEY_TIMESTAMP])?.into_iter();
        let events = values.next().flatten();
        let timestamp = values.next().flatten();

        let result = match (events, timestamp) {
            (None, None) => return Ok(None),
            (Some(events), Some(timestamp)) => CacheEntry::decode(&events, &timestamp),
            (Some(_), None) => Err(ExpoError::CacheCorrupt("events without timestamp".into())),
            (None, Some(_)) => Err(ExpoError::CacheCorrupt("timestamp without events".into())),
        };

        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => {
                warn!("Ignoring cached events: {e}");
                Ok(None)
            }
        }
    }

    /// Replace the stored batch and timestamp together.
    pub fn save(&self, entry: &CacheEntry) -> ExpoResult<()> {
        self.store.apply(&entry.encode()?)
    }

    pub fn clear(&self) -> ExpoResult<()> {
        self.store
            .apply(&[StoreOp::delete(KEY_EVENTS), StoreOp::delete(KEY_TIMESTAMP)])?;
        info!("Cleared cached events");
        Ok(())
    }

    /// The stored entry regardless of age, for showing previous data after
    /// a failed refresh.
    pub fn cached(&self) -> ExpoResult<Option<Snapshot>> {
        let now = self.clock.now();
        Ok(self.load()?.map(|entry| {
            let stale = !entry.is_fresh(now, CACHE_DURATION);
            Snapshot::new(entry, Origin::Cache, stale)
        }))
    }

    // EVENTS:

    /// Events to display, fetching only when the cache is missing, stale or
    /// `force_refresh` is set.
    ///
    /// On failure the stored entry is left untouched and `FetchFailed` is
    /// returned.
    pub async fn get_events(&self, force_refresh: bool) -> ExpoResult<Snapshot> {
        let observed = self.completed.load(Ordering::Acquire);
        let mut flight = self.flight.lock().await;

        // A fetch finished while we were queued: share its outcome
        if self.completed.load(Ordering::Acquire) != observed {
            if let Some(last) = &flight.last {
                debug!("Joining result of the fetch that was in flight");
                return match last {
                    Ok(entry) => Ok(Snapshot::new(entry.clone(), Origin::Source, false)),
                    Err(message) => Err(ExpoError::FetchFailed(message.clone())),
                };
            }
        }

        if !force_refresh {
            if let Some(entry) = self.load()? {
                let now = self.clock.now();
                if entry.is_fresh(now, CACHE_DURATION) {
                    debug!(
                        count = entry.events.len(),
                        age_minutes = entry.age(now).num_minutes(),
                        "Serving cached events"
                    );
                    return Ok(Snapshot::new(entry, Origin::Cache, false));
                }
                info!(age_hours = entry.age(now).num_hours(), "Cached events are stale");
            }
        }

        let outcome = self.fetch_and_store().await;

        flight.last = Some(match &outcome {
            Ok(entry) => Ok(entry.clone()),
            Err(ExpoError::FetchFailed(message)) => Err(message.clone()),
            Err(e) => Err(e.to_string()),
        });
        self.completed.fetch_add(1, Ordering::Release);

        outcome.map(|entry| Snapshot::new(entry, Origin::Source, false))
    }

    async fn fetch_and_store(&self) -> ExpoResult<CacheEntry> {
        info!(source = self.source.name(), "Fetching events");

        let events = match timeout(self.fetch_timeout, self.source.fetch()).await {
            Ok(Ok(events)) => events,
            Ok(Err(ExpoError::FetchFailed(message))) => {
                warn!("Fetch failed: {message}");
                return Err(ExpoError::FetchFailed(message));
            }
            Ok(Err(e)) => {
                warn!("Fetch failed: {e}");
                return Err(ExpoError::FetchFailed(e.to_string()));
            }
            Err(_) => {
                let message = format!(
                    "timed out after {}",
                    humantime::format_duration(self.fetch_timeout)
                );
                warn!("Fetch failed: {message}");
                return Err(ExpoError::FetchFailed(message));
            }
        };

        let entry = CacheEntry::new(events, self.clock.now());
        self.save(&entry)?;

        info!(count = entry.events.len(), "Stored new batch");
        Ok(entry)
    }
}

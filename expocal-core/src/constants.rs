use std::time::Duration;

/// How long a fetched batch is served without contacting the source.
pub const CACHE_DURATION: Duration = Duration::from_secs(60 * 60 * 12);

/// Default upper bound for one complete fetch (search + extract).
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(120);

/// Shortest input accepted as an API key.
pub const MIN_CREDENTIAL_LEN: usize = 10;

/// Store keys.
pub const KEY_CREDENTIAL: &str = "lanka_expo_api_key";
pub const KEY_EVENTS: &str = "lanka_expo_events";
pub const KEY_TIMESTAMP: &str = "lanka_expo_timestamp";

/// Message shown whenever a refresh fails and older data stays on screen.
pub const FETCH_FAILED_MESSAGE: &str =
    "Failed to update exhibition data. Please try again later.";

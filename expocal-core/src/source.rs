//! Where event batches come from.

use async_trait::async_trait;

use crate::error::ExpoResult;
use crate::event::Event;

/// A producer of complete event batches.
///
/// Implementations run their whole pipeline (for Gemini: search, then
/// extract) and either return every record or fail with
/// `ExpoError::FetchFailed`. Partial batches are never returned.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch(&self) -> ExpoResult<Vec<Event>>;

    /// Short name for logs and status output.
    fn name(&self) -> &str;
}

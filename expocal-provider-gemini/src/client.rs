//! Thin HTTP client for `models/{model}:generateContent`.

use expocal_core::{Credential, ExpoError, ExpoResult};
use reqwest::Client;
use tracing::{debug, warn};

use crate::protocol::{GenerateContentRequest, GenerateContentResponse};

#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    api_base: String,
    model: String,
    credential: Credential,
}

impl GeminiClient {
    pub fn new(credential: Credential, api_base: &str, model: &str) -> ExpoResult<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| ExpoError::Config(format!("Could not build HTTP client: {e}")))?;

        Ok(GeminiClient {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
            credential,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    /// Send one request and return the first candidate's text.
    pub async fn generate(&self, request: &GenerateContentRequest) -> ExpoResult<String> {
        let url = self.endpoint();
        debug!("Sending request to Gemini: {}", url);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", self.credential.expose())
            .json(request)
            .send()
            .await
            .map_err(|e| ExpoError::FetchFailed(format!("Request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExpoError::FetchFailed(format!("Could not read response: {e}")))?;

        if !status.is_success() {
            warn!("Gemini API error: {} - {}", status, body);
            return Err(ExpoError::FetchFailed(format!("Gemini returned {status}")));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| ExpoError::FetchFailed(format!("Failed to parse response: {e}")))?;

        Ok(parsed.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_trims_trailing_slash() {
        let key = Credential::parse("AIzaSyExampleKey123").unwrap();
        let client = GeminiClient::new(
            key,
            "https://generativelanguage.googleapis.com/v1beta/",
            "gemini-2.5-flash",
        )
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}

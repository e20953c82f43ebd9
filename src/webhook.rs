use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;

use crate::events::StatusUpdate;

/// Outbound client for webhook notifications. Holds a shared `reqwest::Client`
/// so connections are pooled across deliveries and requests.
#[derive(Clone)]
pub struct WebhookClient {
    client: Client,
}

impl WebhookClient {
    pub fn new() -> Self {
        WebhookClient {
            client: Client::new(),
        }
    }

    /// POSTs one progress event as JSON to the given URL.
    ///
    /// The Content-Type header is set first and caller headers are merged in
    /// after it, so a caller-supplied `content-type` wins.
    ///
    /// Any failure (invalid caller header, network error, non-2xx status) is
    /// returned as an error for the caller to log; nothing is retried.
    pub async fn send_update(
        &self,
        url: &str,
        extra_headers: &HashMap<String, String>,
        event: &StatusUpdate,
    ) -> Result<(), String> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in extra_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| format!("Invalid webhook header name '{}': {}", name, e))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| format!("Invalid webhook header value for '{}': {}", name, e))?;
            headers.insert(name, value);
        }

        let body = serde_json::to_vec(event)
            .map_err(|e| format!("Failed to serialize webhook event: {}", e))?;

        let response = self
            .client
            .post(url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| format!("HTTP request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Webhook returned {}: {}", status, body));
        }

        Ok(())
    }
}

impl Default for WebhookClient {
    fn default() -> Self {
        Self::new()
    }
}

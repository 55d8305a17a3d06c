//! Upstream catalog API client.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::config::{TimeoutConfig, UpstreamConfig};

/// Errors from catalog fetches.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network failure or non-success status from the catalog host.
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered, but not with the expected JSON shape.
    #[error("catalog returned an invalid payload")]
    InvalidPayload,
}

/// Client for the upstream catalog API (search, info).
#[derive(Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(upstream: &UpstreamConfig, timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(&upstream.user_agent)
            .danger_accept_invalid_certs(upstream.accept_invalid_certs)
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.api_request_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: upstream.catalog_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Search the catalog by name. Returns the raw upstream payload;
    /// callers treat anything that is not an array as an empty result.
    pub async fn search(&self, query: &str) -> Result<Value, CatalogError> {
        let url = format!(
            "{}/function/h10.php?page=search&name={}",
            self.base_url,
            urlencoding::encode(query)
        );
        let text = self.client.get(&url).send().await?.text().await?;
        Ok(parse_payload(text))
    }

    /// Fetch the info record for one title.
    ///
    /// # Errors
    /// - `CatalogError::InvalidPayload` - payload is not a JSON object
    ///   (after unwrapping a possible string-wrapped body)
    pub async fn info(&self, id: &str) -> Result<Value, CatalogError> {
        let url = format!(
            "{}/function/h10.php?page=info&id={}",
            self.base_url,
            urlencoding::encode(id)
        );
        let text = self.client.get(&url).send().await?.text().await?;

        let info = parse_payload(text);
        if info.is_object() {
            Ok(info)
        } else {
            Err(CatalogError::InvalidPayload)
        }
    }
}

/// Best-effort JSON parse. The upstream occasionally double-encodes
/// (a JSON string whose contents are themselves JSON), so one level of
/// string-wrapping is unwrapped. Anything unparseable stays a plain
/// string for the caller's shape checks to reject.
fn parse_payload(text: String) -> Value {
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::String(inner)) => serde_json::from_str(&inner).unwrap_or(Value::String(inner)),
        Ok(value) => value,
        Err(_) => Value::String(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_payload_unwraps_json() {
        assert!(parse_payload("{\"id\":\"1\"}".to_string()).is_object());
        assert!(parse_payload("[1,2]".to_string()).is_array());
    }

    #[test]
    fn parse_payload_unwraps_string_wrapped_json() {
        let wrapped = serde_json::to_string("{\"id\":\"5\"}").unwrap();
        assert!(parse_payload(wrapped).is_object());
    }

    #[test]
    fn parse_payload_keeps_garbage_as_string() {
        let value = parse_payload("<html>err</html>".to_string());
        assert_eq!(value, Value::String("<html>err</html>".to_string()));
    }
}

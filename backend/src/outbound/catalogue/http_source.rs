//! Reqwest-backed catalogue source adapter.
//!
//! Owns transport details only: query serialisation, timeout and HTTP error
//! mapping, and JSON decoding into artwork candidates.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::CatalogueResponseDto;
use crate::domain::ports::{CatalogueSource, CatalogueSourceError};
use crate::domain::review::{ArtworkCandidate, GameName};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Catalogue source adapter performing HTTP GET requests against the
/// catalogue's games search endpoint.
pub struct CatalogueHttpSource {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl CatalogueHttpSource {
    /// Build an adapter with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, api_key: Option<String>) -> Result<Self, reqwest::Error> {
        Self::with_timeout(endpoint, api_key, DEFAULT_TIMEOUT)
    }

    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(
        endpoint: Url,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl CatalogueSource for CatalogueHttpSource {
    async fn search(
        &self,
        game_name: &GameName,
    ) -> Result<Vec<ArtworkCandidate>, CatalogueSourceError> {
        let mut request = self
            .client
            .get(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("search", game_name.as_ref())]);
        if let Some(key) = self.api_key.as_deref() {
            request = request.query(&[("key", key)]);
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_candidates(body.as_ref())
    }
}

fn parse_candidates(body: &[u8]) -> Result<Vec<ArtworkCandidate>, CatalogueSourceError> {
    let decoded: CatalogueResponseDto = serde_json::from_slice(body).map_err(|error| {
        CatalogueSourceError::decode(format!("invalid catalogue JSON payload: {error}"))
    })?;
    Ok(decoded.into_candidates())
}

fn map_transport_error(error: reqwest::Error) -> CatalogueSourceError {
    if error.is_timeout() {
        CatalogueSourceError::timeout(error.to_string())
    } else {
        CatalogueSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> CatalogueSourceError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => CatalogueSourceError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            CatalogueSourceError::timeout(message)
        }
        _ if status.is_client_error() => CatalogueSourceError::invalid_request(message),
        _ => CatalogueSourceError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the non-network mapping helpers.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(StatusCode::TOO_MANY_REQUESTS)]
    fn throttling_maps_to_rate_limited(#[case] status: StatusCode) {
        assert!(matches!(
            map_status_error(status, b""),
            CatalogueSourceError::RateLimited { .. }
        ));
    }

    #[rstest]
    #[case(StatusCode::REQUEST_TIMEOUT)]
    #[case(StatusCode::GATEWAY_TIMEOUT)]
    fn timeouts_map_to_timeout(#[case] status: StatusCode) {
        assert!(matches!(
            map_status_error(status, b""),
            CatalogueSourceError::Timeout { .. }
        ));
    }

    #[rstest]
    fn client_errors_map_to_invalid_request() {
        let error = map_status_error(StatusCode::UNPROCESSABLE_ENTITY, b"{\"error\":\"bad\"}");
        match error {
            CatalogueSourceError::InvalidRequest { message } => {
                assert!(message.contains("422"));
                assert!(message.contains("bad"));
            }
            other => panic!("expected invalid request, got {other:?}"),
        }
    }

    #[rstest]
    fn server_errors_map_to_transport() {
        assert!(matches!(
            map_status_error(StatusCode::BAD_GATEWAY, b""),
            CatalogueSourceError::Transport { .. }
        ));
    }

    #[rstest]
    fn body_preview_truncates_long_payloads() {
        let long = "x".repeat(400);
        let preview = body_preview(long.as_bytes());
        assert!(preview.ends_with("..."));
        assert!(preview.chars().count() <= 163);
    }

    #[rstest]
    fn malformed_json_is_a_decode_error() {
        assert!(matches!(
            parse_candidates(b"not json"),
            Err(CatalogueSourceError::Decode { .. })
        ));
    }
}

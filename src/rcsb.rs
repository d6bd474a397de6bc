use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER, USER_AGENT};

use crate::domain::PdbId;
use crate::error::PdbError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub trait RcsbClient: Send + Sync {
    /// Fetches the raw HTML of the structure summary page.
    fn fetch_structure_page(&self, id: &PdbId) -> Result<String, PdbError>;

    /// Fetches the assembly image bytes.
    fn fetch_image(&self, id: &PdbId) -> Result<Vec<u8>, PdbError>;
}

#[derive(Clone)]
pub struct RcsbHttpClient {
    client: Client,
}

impl RcsbHttpClient {
    pub fn new() -> Result<Self, PdbError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("pdb-scout/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| PdbError::Network(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| PdbError::Network(err.to_string()))?;
        Ok(Self { client })
    }

    pub fn structure_url(id: &PdbId) -> String {
        format!("https://www.rcsb.org/structure/{id}")
    }

    pub fn image_url(id: &PdbId) -> String {
        format!("https://cdn.rcsb.org/images/structures/{id}_assembly-1.jpeg")
    }

    // Single attempt: lookups never retry, callers decide what a failure
    // means for the rest of a batch.
    fn get(&self, url: &str) -> Result<Response, PdbError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| PdbError::Network(err.to_string()))?;
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        match status_error(response.status().as_u16(), retry_after) {
            None => Ok(response),
            Some(err) => Err(err),
        }
    }
}

impl RcsbClient for RcsbHttpClient {
    fn fetch_structure_page(&self, id: &PdbId) -> Result<String, PdbError> {
        let response = self.get(&Self::structure_url(id))?;
        response.text().map_err(|err| PdbError::Network(err.to_string()))
    }

    fn fetch_image(&self, id: &PdbId) -> Result<Vec<u8>, PdbError> {
        let response = self.get(&Self::image_url(id))?;
        let bytes = response
            .bytes()
            .map_err(|err| PdbError::Network(err.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Maps an HTTP status to the lookup error taxonomy. `None` means the
/// response is usable. The Retry-After hint is only kept for 429 responses,
/// where it carries the rate-limit delay.
fn status_error(status: u16, retry_after: Option<String>) -> Option<PdbError> {
    match status {
        200..=299 => None,
        429 => Some(PdbError::ClientStatus {
            status,
            retry_after,
        }),
        400..=499 => Some(PdbError::ClientStatus {
            status,
            retry_after: None,
        }),
        500..=599 => Some(PdbError::ServerStatus { status }),
        _ => Some(PdbError::UnexpectedStatus { status }),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn success_statuses_pass_through() {
        assert!(status_error(200, None).is_none());
        assert!(status_error(204, None).is_none());
    }

    #[test]
    fn client_errors_map_without_hint() {
        let err = status_error(404, Some("5".to_string())).unwrap();
        assert_matches!(
            err,
            PdbError::ClientStatus {
                status: 404,
                retry_after: None,
            }
        );
    }

    #[test]
    fn rate_limit_captures_retry_after() {
        let err = status_error(429, Some("120".to_string())).unwrap();
        assert_matches!(
            err,
            PdbError::ClientStatus {
                status: 429,
                retry_after: Some(ref secs),
            } if secs == "120"
        );

        let err = status_error(429, None).unwrap();
        assert_matches!(
            err,
            PdbError::ClientStatus {
                status: 429,
                retry_after: None,
            }
        );
    }

    #[test]
    fn server_errors_map() {
        let err = status_error(503, None).unwrap();
        assert_matches!(err, PdbError::ServerStatus { status: 503 });
    }

    #[test]
    fn anything_else_is_unexpected() {
        let err = status_error(302, None).unwrap();
        assert_matches!(err, PdbError::UnexpectedStatus { status: 302 });
    }

    #[test]
    fn urls_are_built_from_the_lowercased_id() {
        let id: PdbId = "1TUP".parse().unwrap();
        assert_eq!(
            RcsbHttpClient::structure_url(&id),
            "https://www.rcsb.org/structure/1tup"
        );
        assert_eq!(
            RcsbHttpClient::image_url(&id),
            "https://cdn.rcsb.org/images/structures/1tup_assembly-1.jpeg"
        );
    }
}

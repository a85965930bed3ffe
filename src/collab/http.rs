//! Blocking HTTP document fetcher.

use crate::collab::{CollabResult, CollaboratorError, ContentFetcher};
use crate::defaults;
use std::time::Duration;
use tracing::debug;

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> reqwest::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    pub fn with_defaults() -> reqwest::Result<Self> {
        Self::new(
            Duration::from_secs(defaults::FETCH_TIMEOUT_SECS),
            defaults::USER_AGENT,
        )
    }
}

/// Only web locators are fetched.
pub fn check_scheme(url: &str) -> CollabResult<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(CollaboratorError::InvalidUrl {
            url: url.to_string(),
        })
    }
}

impl ContentFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> CollabResult<String> {
        check_scheme(url)?;
        let fetch_error = |err: reqwest::Error| CollaboratorError::Fetch {
            url: url.to_string(),
            message: err.to_string(),
        };

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(fetch_error)?;
        let body = response.text().map_err(fetch_error)?;
        debug!(url, bytes = body.len(), "fetched document");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_web_schemes() {
        assert!(check_scheme("http://example.com").is_ok());
        assert!(check_scheme("https://example.com/a?b=c").is_ok());
    }

    #[test]
    fn rejects_other_schemes_without_network() {
        let fetcher = HttpFetcher::with_defaults().unwrap();
        for url in ["ftp://example.com", "file:///etc/hosts", "example.com", ""] {
            match fetcher.fetch(url) {
                Err(CollaboratorError::InvalidUrl { url: reported }) => assert_eq!(reported, url),
                other => panic!("Expected InvalidUrl for {:?}, got {:?}", url, other),
            }
        }
    }
}

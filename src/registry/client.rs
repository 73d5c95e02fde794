// src/registry/client.rs
// =============================================================================
// The HTTP transport behind every request we make.
//
// Everything that talks to the network goes through the Fetch trait. The real
// implementation wraps a reqwest Client; tests swap in an in-memory fake that
// serves canned pages, so the crawler can be exercised without internet.
//
// Rust concepts:
// - Traits: a shared interface the crawler is generic over
// - async-trait: lets traits have async methods
// - Result<T, E>: every fetch says exactly how it failed
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::error::FetchError;

/// Fetches a URL and hands back its body.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// GET `url` and return the body as text; anything but 2xx is an error
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;

    /// GET `url` and parse the body as JSON
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        let body = self.fetch_text(url).await?;
        serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// Fetch over real HTTP(S) using reqwest
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Create an HTTP client with reasonable settings
    // We'll reuse this client for all requests (connection pooling)
    pub fn new(timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(transport)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why #[async_trait]?
//    - The macro rewrites async trait methods into methods returning a boxed
//      future, which works with every Rust version we support
//
// 2. What does map_err do?
//    - Converts the error inside a Result into another type
//    - Here: reqwest::Error -> FetchError::Transport { url, source }
//
// 3. Why is fetch_json a provided method?
//    - Implementors only write fetch_text
//    - Every implementation gets JSON decoding for free
// -----------------------------------------------------------------------------

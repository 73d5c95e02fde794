// src/error.rs
// =============================================================================
// Error types shared across the crate.
//
// Library-style modules (config, registry, store) return these typed errors.
// main.rs wraps everything in anyhow::Result at the very top.
//
// Most network failures never reach the caller as errors at all: the registry
// and crawl modules log them and fall back to an empty/zero value. FetchError
// exists so the transport seam can describe *what* went wrong before that
// fallback happens.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Failure to fetch a URL or decode its body.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered, but not with 2xx
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// Connection, TLS, timeout, or body read failure
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Body was not the JSON we expected
    #[error("invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A relative link could not be resolved against the base URL
    #[error("cannot resolve link '{href}': {source}")]
    BadLink {
        href: String,
        #[source]
        source: url::ParseError,
    },
}

/// Problems while resolving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no seed package configured (set settings.seed_package or pass --package)")]
    MissingSeed,

    #[error("invalid registry base URL '{url}': {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Problems reading or writing the data_*.json documents.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

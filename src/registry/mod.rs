// src/registry/mod.rs
// =============================================================================
// Everything that talks to npm over the network.
//
// Submodules:
// - client: the Fetch trait and its reqwest implementation
// - api: weekly downloads, maintainers, and author enrichment
// =============================================================================

mod api;
mod client;

pub use api::RegistryClient;
pub use client::{Fetch, HttpFetcher};

#[cfg(test)]
pub use client::fake;

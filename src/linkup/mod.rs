//! Linkup web search: the upstream that supplies result snippets and citation URLs.

pub mod client;
pub mod types;

pub use client::{LinkupClient, LinkupError, SearchClient};
pub use types::SearchResult;

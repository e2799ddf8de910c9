//! Feed acquisition: resolving targets, fetching, discovery, parsing.
//!
//! The module is organized into four submodules:
//!
//! - [`sources`] - Resolve CLI arguments (URLs or URL-list files) into targets
//! - [`fetcher`] - Bounded-time HTTP retrieval with one auto-discovery hop
//! - [`discovery`] - Best-effort feed `<link>` extraction from HTML pages
//! - [`parser`] - Low-level feed parsing using the `feed-rs` crate
//!
//! Resolution failures abort the run; fetch and parse failures are per-target
//! and tolerated by the aggregator.

mod discovery;
mod fetcher;
mod parser;
mod sources;

pub use fetcher::{fetch_feed, http_client, FetchError, FetchedFeed, USER_AGENT};
pub use parser::{parse_feed, ParseError, ParsedEntry, ParsedFeed};
pub use sources::{resolve, SourceError};

//! Feed acquisition: source lookup, HTTP retrieval and RSS parsing.
//!
//! - [`catalog`] - Source identifier to feed URL, with a default fallback
//! - [`fetcher`] - Single-attempt HTTP GET with browser-like headers
//! - [`parser`] - Defensive extraction of item titles from RSS XML
//!
//! All fallible operations return [`FeedError`], whose [`FeedError::kind`]
//! tells transport, HTTP-status, parse and structure failures apart.

pub mod catalog;
mod error;
pub mod fetcher;
pub mod parser;

pub use catalog::{CatalogError, FeedCatalog, BUILTIN_FEEDS, DEFAULT_SOURCE};
pub use error::{ErrorKind, FeedError};
pub use fetcher::{FetchFeed, HttpFetcher, DEFAULT_MAX_FEED_SIZE};
pub use parser::{parse_rss, ParseFeed, RawItem, RssParser};

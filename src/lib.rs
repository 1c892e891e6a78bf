//! Sentiment-tagged headlines from news RSS feeds.
//!
//! - [`feed`] - Source catalog, HTTP fetching and RSS parsing
//! - [`sentiment`] - Polarity scoring and positive/negative/neutral labels
//! - [`pipeline`] - Composes the above into one request
//! - [`server`] - `GET /trending-news` with per-IP rate limiting
//! - [`config`] - Optional TOML configuration

pub mod config;
pub mod feed;
pub mod pipeline;
pub mod sentiment;
pub mod server;

pub use pipeline::{Headline, HeadlinePipeline, MAX_HEADLINES};

//! Headline pipeline: catalog, fetch, parse, classify, truncate.

use crate::feed::{FeedCatalog, FeedError, FetchFeed, ParseFeed, RssParser};
use crate::sentiment::{Sentiment, SentimentClassifier};
use serde::Serialize;

/// Most headlines returned for one request.
pub const MAX_HEADLINES: usize = 10;

/// A feed item title tagged with its sentiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Headline {
    pub title: String,
    pub sentiment: Sentiment,
}

/// Composes the feed collaborators into one operation.
///
/// Holds no mutable state, so a single instance serves concurrent requests
/// behind an `Arc`.
#[derive(Debug)]
pub struct HeadlinePipeline<F, P = RssParser> {
    catalog: FeedCatalog,
    fetcher: F,
    parser: P,
    classifier: SentimentClassifier,
}

impl<F: FetchFeed> HeadlinePipeline<F> {
    /// Pipeline using the RSS parser.
    pub fn new(catalog: FeedCatalog, fetcher: F, classifier: SentimentClassifier) -> Self {
        Self::with_parser(catalog, fetcher, RssParser, classifier)
    }
}

impl<F: FetchFeed, P: ParseFeed> HeadlinePipeline<F, P> {
    pub fn with_parser(
        catalog: FeedCatalog,
        fetcher: F,
        parser: P,
        classifier: SentimentClassifier,
    ) -> Self {
        Self {
            catalog,
            fetcher,
            parser,
            classifier,
        }
    }

    pub fn catalog(&self) -> &FeedCatalog {
        &self.catalog
    }

    /// Fetches the feed for `source` and returns up to [`MAX_HEADLINES`]
    /// classified headlines in document order.
    ///
    /// # Errors
    ///
    /// The first failing stage's [`FeedError`] is returned unchanged; later
    /// stages do not run.
    pub async fn run(&self, source: &str) -> Result<Vec<Headline>, FeedError> {
        let url = self.catalog.resolve(source);
        tracing::debug!(source = %source, url = %url, "Fetching feed");

        let bytes = self.fetcher.fetch(url).await.inspect_err(|e| {
            tracing::warn!(source = %source, url = %url, kind = ?e.kind(), error = %e, "Feed fetch failed");
        })?;

        let items = self.parser.parse(&bytes).inspect_err(|e| {
            tracing::warn!(source = %source, url = %url, kind = ?e.kind(), error = %e, "Feed parse failed");
        })?;

        let total = items.len();
        let headlines: Vec<Headline> = items
            .into_iter()
            .take(MAX_HEADLINES)
            .map(|item| {
                let sentiment = self.classifier.classify(&item.title);
                Headline {
                    title: item.title,
                    sentiment,
                }
            })
            .collect();

        tracing::debug!(
            source = %source,
            items = total,
            returned = headlines.len(),
            "Classified headlines"
        );
        Ok(headlines)
    }
}

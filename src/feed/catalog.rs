use std::collections::HashMap;
use thiserror::Error;
use url::Url;

/// Source used when a caller does not name one, and the fallback for
/// unknown source identifiers.
pub const DEFAULT_SOURCE: &str = "google";

/// Feeds every catalog starts with. Keys are lower-case.
pub const BUILTIN_FEEDS: &[(&str, &str)] = &[
    ("google", "https://news.google.com/rss?hl=en-US&gl=US&ceid=US:en"),
    ("bbc", "http://feeds.bbci.co.uk/news/rss.xml"),
    ("cnn", "http://rss.cnn.com/rss/cnn_topstories.rss"),
];

/// Errors raised while registering a feed in the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The URL string could not be parsed.
    #[error("Invalid feed URL for '{source_id}': {error}")]
    InvalidUrl {
        source_id: String,
        error: url::ParseError,
    },
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme for '{source_id}': {scheme} (only http/https allowed)")]
    UnsupportedScheme { source_id: String, scheme: String },
    /// Blank source identifier.
    #[error("Feed source identifier must not be empty")]
    EmptySource,
}

/// Immutable mapping from source identifier to feed URL.
///
/// Built once at startup and shared read-only between requests. The
/// default source is always present, which makes [`FeedCatalog::resolve`]
/// total.
#[derive(Debug, Clone)]
pub struct FeedCatalog {
    feeds: HashMap<String, String>,
}

impl Default for FeedCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FeedCatalog {
    /// Catalog holding only [`BUILTIN_FEEDS`].
    pub fn builtin() -> Self {
        let feeds = BUILTIN_FEEDS
            .iter()
            .map(|(source, url)| ((*source).to_string(), (*url).to_string()))
            .collect();
        Self { feeds }
    }

    /// Adds or replaces a feed. The source identifier is folded to lower case.
    pub fn with_feed(mut self, source: &str, url: &str) -> Result<Self, CatalogError> {
        let key = source.trim().to_lowercase();
        if key.is_empty() {
            return Err(CatalogError::EmptySource);
        }

        let parsed = Url::parse(url).map_err(|error| CatalogError::InvalidUrl {
            source_id: key.clone(),
            error,
        })?;
        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(CatalogError::UnsupportedScheme {
                    source_id: key,
                    scheme: scheme.to_owned(),
                })
            }
        }

        if let Some(previous) = self.feeds.insert(key.clone(), url.to_string()) {
            tracing::debug!(source = %key, previous = %previous, url = %url, "Overriding feed URL");
        }
        Ok(self)
    }

    /// Adds every `(source, url)` pair, failing on the first invalid entry.
    pub fn with_feeds<'a, I>(self, feeds: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        feeds
            .into_iter()
            .try_fold(self, |catalog, (source, url)| catalog.with_feed(source, url))
    }

    /// Feed URL for `source`, case-insensitive. Unknown identifiers resolve
    /// to the [`DEFAULT_SOURCE`] feed.
    pub fn resolve(&self, source: &str) -> &str {
        self.feeds
            .get(&source.to_lowercase())
            .or_else(|| self.feeds.get(DEFAULT_SOURCE))
            .map(String::as_str)
            // The default entry is inserted by `builtin()` and can only be replaced.
            .unwrap_or(BUILTIN_FEEDS[0].1)
    }

    /// Known source identifiers, sorted.
    pub fn sources(&self) -> Vec<&str> {
        let mut sources: Vec<&str> = self.feeds.keys().map(String::as_str).collect();
        sources.sort_unstable();
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const GOOGLE: &str = "https://news.google.com/rss?hl=en-US&gl=US&ceid=US:en";

    #[test]
    fn test_builtin_sources() {
        let catalog = FeedCatalog::builtin();
        assert_eq!(catalog.resolve("google"), GOOGLE);
        assert_eq!(catalog.resolve("bbc"), "http://feeds.bbci.co.uk/news/rss.xml");
        assert_eq!(catalog.resolve("cnn"), "http://rss.cnn.com/rss/cnn_topstories.rss");
        assert_eq!(catalog.sources(), vec!["bbc", "cnn", "google"]);
    }

    #[test]
    fn test_unknown_source_falls_back_to_google() {
        let catalog = FeedCatalog::builtin();
        assert_eq!(catalog.resolve("reuters"), GOOGLE);
        assert_eq!(catalog.resolve(""), GOOGLE);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = FeedCatalog::builtin();
        assert_eq!(catalog.resolve("BBC"), catalog.resolve("bbc"));
        assert_eq!(catalog.resolve("CnN"), catalog.resolve("cnn"));
    }

    #[test]
    fn test_with_feed_adds_and_overrides() {
        let catalog = FeedCatalog::builtin()
            .with_feed("Reuters", "https://example.com/reuters.rss")
            .unwrap()
            .with_feed("cnn", "http://127.0.0.1:9000/cnn.rss")
            .unwrap();

        assert_eq!(catalog.resolve("reuters"), "https://example.com/reuters.rss");
        assert_eq!(catalog.resolve("CNN"), "http://127.0.0.1:9000/cnn.rss");
        assert_eq!(catalog.resolve("nope"), GOOGLE);
    }

    #[test]
    fn test_overridden_default_is_used_as_fallback() {
        let catalog = FeedCatalog::builtin()
            .with_feed("google", "https://example.com/google.rss")
            .unwrap();
        assert_eq!(catalog.resolve("unknown"), "https://example.com/google.rss");
    }

    #[test]
    fn test_with_feed_rejects_invalid_entries() {
        let err = FeedCatalog::builtin()
            .with_feed("local", "file:///etc/passwd")
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedScheme { .. }));

        let err = FeedCatalog::builtin()
            .with_feed("broken", "not a url")
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidUrl { .. }));

        let err = FeedCatalog::builtin()
            .with_feed("  ", "https://example.com/feed")
            .unwrap_err();
        assert!(matches!(err, CatalogError::EmptySource));
    }

    #[test]
    fn test_with_feeds_stops_at_first_error() {
        let result = FeedCatalog::builtin().with_feeds([
            ("one", "https://example.com/one.rss"),
            ("two", "ftp://example.com/two.rss"),
        ]);
        assert!(result.is_err());
    }

    proptest! {
        #[test]
        fn prop_unknown_sources_resolve_to_default(source in "[a-z0-9]{1,12}") {
            prop_assume!(!["google", "bbc", "cnn"].contains(&source.as_str()));
            let catalog = FeedCatalog::builtin();
            prop_assert_eq!(catalog.resolve(&source), GOOGLE);
        }

        #[test]
        fn prop_case_does_not_change_resolution(
            idx in 0usize..3,
            mask in proptest::collection::vec(any::<bool>(), 6),
        ) {
            let catalog = FeedCatalog::builtin();
            let source = BUILTIN_FEEDS[idx].0;
            let mixed: String = source
                .chars()
                .zip(mask.iter().cycle())
                .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c })
                .collect();
            prop_assert_eq!(catalog.resolve(&mixed), catalog.resolve(source));
        }
    }
}

//! Headline sentiment classification.
//!
//! Classification has two layers:
//!
//! - **Scoring**: a [`PolarityScorer`] maps text to a polarity in `[-1.0, 1.0]`.
//!   [`LexiconScorer`] is the bundled implementation.
//! - **Thresholding**: [`Sentiment::from_polarity`] buckets the score. The
//!   thresholds are fixed and independent of the scorer in use.
//!
//! # Example
//!
//! ```
//! use trending_news::sentiment::{Sentiment, SentimentClassifier};
//!
//! let classifier = SentimentClassifier::default();
//! assert_eq!(classifier.classify("Markets rally on strong earnings"), Sentiment::Positive);
//! ```

mod lexicon;

pub use lexicon::LexiconScorer;

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Scores above this are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.1;
/// Scores below this are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

/// Sentiment label attached to a headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Buckets a polarity score. The neutral band `[-0.1, 0.1]` is closed.
    pub fn from_polarity(score: f64) -> Self {
        if score > POSITIVE_THRESHOLD {
            Sentiment::Positive
        } else if score < NEGATIVE_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Natural-language polarity scoring.
///
/// Implementations must be pure: the same text always yields the same
/// score, in `[-1.0, 1.0]`.
pub trait PolarityScorer: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

/// Maps text to a [`Sentiment`] through a pluggable [`PolarityScorer`].
#[derive(Clone)]
pub struct SentimentClassifier {
    scorer: Arc<dyn PolarityScorer>,
}

impl Default for SentimentClassifier {
    fn default() -> Self {
        Self::new(LexiconScorer::new())
    }
}

impl fmt::Debug for SentimentClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentimentClassifier").finish_non_exhaustive()
    }
}

impl SentimentClassifier {
    pub fn new<S: PolarityScorer + 'static>(scorer: S) -> Self {
        Self {
            scorer: Arc::new(scorer),
        }
    }

    pub fn classify(&self, text: &str) -> Sentiment {
        Sentiment::from_polarity(self.scorer.polarity(text))
    }
}

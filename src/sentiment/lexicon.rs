//! Bag-of-words polarity scorer tuned for news headlines.

use super::PolarityScorer;
use std::collections::{HashMap, HashSet};

/// Weight applied to a polar word that follows a negation ("not good").
const NEGATION_FACTOR: f64 = -0.5;

/// Lexicon-based [`PolarityScorer`].
///
/// Each known word carries a polarity. The score of a text is the mean
/// polarity of the known words it contains, after applying any intensifier
/// ("very") and negation ("not", "n't") that precede each word. Text with no
/// known words scores `0.0`.
pub struct LexiconScorer {
    polarity: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            polarity: Self::build_polarity_lexicon(),
            intensifiers: Self::build_intensifiers(),
            negations: Self::build_negations(),
        }
    }

    fn is_negation(&self, token: &str) -> bool {
        self.negations.contains(token) || token.ends_with("n't")
    }

    fn build_polarity_lexicon() -> HashMap<&'static str, f64> {
        [
            // Markets and economy
            ("rally", 0.5), ("rallies", 0.5), ("surge", 0.4), ("surges", 0.4),
            ("soar", 0.5), ("soars", 0.5), ("gain", 0.3), ("gains", 0.3),
            ("boom", 0.4), ("booming", 0.5), ("growth", 0.3), ("rebound", 0.3),
            ("recovery", 0.3), ("profit", 0.3), ("profits", 0.3), ("record", 0.2),
            ("crash", -0.6), ("crashes", -0.6), ("plunge", -0.5), ("plunges", -0.5),
            ("slump", -0.5), ("slumps", -0.5), ("tumble", -0.4), ("tumbles", -0.4),
            ("recession", -0.5), ("layoffs", -0.4), ("losses", -0.4), ("loss", -0.4),
            ("bankrupt", -0.6), ("bankruptcy", -0.6), ("inflation", -0.2), ("debt", -0.2),
            // Qualities
            ("good", 0.7), ("great", 0.8), ("excellent", 1.0), ("best", 1.0),
            ("better", 0.5), ("strong", 0.433), ("stronger", 0.45), ("positive", 0.227),
            ("happy", 0.8), ("hope", 0.3), ("hopeful", 0.5), ("optimistic", 0.5),
            ("success", 0.3), ("successful", 0.75), ("win", 0.8), ("wins", 0.8),
            ("victory", 0.6), ("breakthrough", 0.5), ("celebrate", 0.5), ("celebrates", 0.5),
            ("boost", 0.3), ("boosts", 0.3), ("improve", 0.3), ("improves", 0.3),
            ("safe", 0.5), ("peace", 0.5), ("love", 0.5), ("beautiful", 0.85),
            ("wonderful", 1.0), ("amazing", 0.6), ("historic", 0.2), ("new", 0.136),
            ("free", 0.4), ("easy", 0.433), ("innovative", 0.5), ("healthy", 0.5),
            ("bad", -0.7), ("worse", -0.4), ("worst", -1.0), ("terrible", -1.0),
            ("awful", -1.0), ("horrible", -1.0), ("poor", -0.4), ("weak", -0.375),
            ("weaker", -0.4), ("negative", -0.3), ("sad", -0.5), ("angry", -0.5),
            ("fear", -0.4), ("fears", -0.4), ("worried", -0.4), ("concern", -0.2),
            ("concerns", -0.2), ("fail", -0.5), ("fails", -0.5), ("failure", -0.5),
            ("lose", -0.4), ("loses", -0.4), ("defeat", -0.4), ("wrong", -0.5),
            ("dangerous", -0.6), ("deadly", -0.7), ("dead", -0.2), ("death", -0.5),
            ("killed", -0.6), ("kills", -0.6), ("violent", -0.8), ("violence", -0.6),
            // Events
            ("disaster", -0.8), ("catastrophe", -0.8), ("catastrophic", -0.9), ("tragedy", -0.7),
            ("tragic", -0.75), ("crisis", -0.5), ("war", -0.5), ("attack", -0.5),
            ("attacks", -0.5), ("conflict", -0.4), ("chaos", -0.6), ("scandal", -0.5),
            ("fraud", -0.6), ("collapse", -0.6), ("collapses", -0.6), ("threat", -0.4),
            ("threatens", -0.4), ("warning", -0.3), ("outbreak", -0.4), ("shortage", -0.3),
            ("flood", -0.4), ("floods", -0.4), ("wildfire", -0.5), ("earthquake", -0.5),
            ("hurricane", -0.4), ("storm", -0.2), ("injured", -0.5), ("victims", -0.5),
        ]
        .into_iter()
        .collect()
    }

    fn build_intensifiers() -> HashMap<&'static str, f64> {
        [
            ("very", 1.3), ("extremely", 1.5), ("really", 1.2), ("highly", 1.3),
            ("so", 1.2), ("most", 1.3), ("incredibly", 1.4), ("slightly", 0.7),
            ("somewhat", 0.8), ("barely", 0.5),
        ]
        .into_iter()
        .collect()
    }

    fn build_negations() -> HashSet<&'static str> {
        ["not", "no", "never", "without", "nor", "cannot", "neither"]
            .into_iter()
            .collect()
    }
}

impl PolarityScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> f64 {
        let lower = text.to_lowercase();
        let tokens = lower
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .map(|t| t.trim_matches('\''))
            .filter(|t| !t.is_empty());

        let mut total = 0.0;
        let mut matched = 0usize;
        let mut intensity = 1.0;
        let mut negated = false;

        for token in tokens {
            if self.is_negation(token) {
                negated = true;
                continue;
            }
            if let Some(factor) = self.intensifiers.get(token) {
                intensity *= factor;
                continue;
            }
            // Negation carries past filler words ("not a good day"), intensity does not
            if let Some(&value) = self.polarity.get(token) {
                let mut score = value * intensity;
                if negated {
                    score *= NEGATION_FACTOR;
                }
                total += score;
                matched += 1;
                negated = false;
            }
            intensity = 1.0;
        }

        if matched == 0 {
            return 0.0;
        }
        (total / matched as f64).clamp(-1.0, 1.0)
    }
}

use sentiscope_core::SentimentScores;
use std::collections::HashMap;
use std::fmt;
use tracing::trace;
use vader_sentiment::SentimentIntensityAnalyzer;

pub trait SentimentScorer {
    fn score(&self, text: &str) -> SentimentScores;
}

/// Lexicon and rule based polarity scoring (VADER).
pub struct VaderScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderScorer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for VaderScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaderScorer").finish_non_exhaustive()
    }
}

impl SentimentScorer for VaderScorer {
    fn score(&self, text: &str) -> SentimentScores {
        let scores = scores_from_map(&self.analyzer.polarity_scores(text));
        trace!("Scored {} chars: {}", text.len(), scores);
        scores
    }
}

fn scores_from_map(raw: &HashMap<&str, f64>) -> SentimentScores {
    let get = |key: &str| raw.get(key).copied().unwrap_or(0.0);
    SentimentScores {
        neg: get("neg"),
        neu: get("neu"),
        pos: get("pos"),
        compound: get("compound"),
    }
}

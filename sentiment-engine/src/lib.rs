pub mod categorizer;
pub mod scorer;

pub use categorizer::*;
pub use scorer::*;

use sentiscope_core::{PostId, PostRecord};

/// Score `text` and attach the derived category.
pub fn annotate<S>(scorer: &S, id: PostId, text: String) -> PostRecord
where
    S: SentimentScorer + ?Sized,
{
    let sentiment = scorer.score(&text);
    let category = categorize(sentiment.compound);

    PostRecord {
        id,
        text,
        sentiment,
        category,
    }
}

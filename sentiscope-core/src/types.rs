use crate::error::FetchError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier as handed out by the source API. Live results carry string ids,
/// older sample dumps carry integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Numeric(u64),
    Text(String),
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Numeric(id) => write!(f, "{id}"),
            PostId::Text(id) => f.write_str(id),
        }
    }
}

impl From<String> for PostId {
    fn from(id: String) -> Self {
        PostId::Text(id)
    }
}

impl From<&str> for PostId {
    fn from(id: &str) -> Self {
        PostId::Text(id.to_string())
    }
}

impl From<u64> for PostId {
    fn from(id: u64) -> Self {
        PostId::Numeric(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

impl fmt::Display for SentimentScores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "neg={:.3} neu={:.3} pos={:.3} compound={:.4}",
            self.neg, self.neu, self.pos, self.compound
        )
    }
}

/// Sentiment bucket. Declaration order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Positive,
    Neutral,
    #[serde(rename = "Less Negative")]
    LessNegative,
    #[serde(rename = "Highly Negative")]
    HighlyNegative,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Positive,
        Category::Neutral,
        Category::LessNegative,
        Category::HighlyNegative,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Positive => "Positive",
            Category::Neutral => "Neutral",
            Category::LessNegative => "Less Negative",
            Category::HighlyNegative => "Highly Negative",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: PostId,
    pub text: String,
    pub sentiment: SentimentScores,
    pub category: Category,
}

pub type FetchResult = Result<Vec<PostRecord>, FetchError>;

/// Anything that can produce annotated posts for a keyword.
pub trait PostSource {
    async fn fetch(&self, keyword: &str, count: u32) -> FetchResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_id_accepts_both_shapes() {
        let numeric: PostId = serde_json::from_str("1789012345678901234").unwrap();
        assert_eq!(numeric, PostId::Numeric(1789012345678901234));

        let text: PostId = serde_json::from_str("\"1789012345678901234\"").unwrap();
        assert_eq!(text, PostId::Text("1789012345678901234".to_string()));

        assert_eq!(numeric.to_string(), text.to_string());
    }

    #[test]
    fn test_category_serialized_names() {
        assert_eq!(
            serde_json::to_string(&Category::HighlyNegative).unwrap(),
            "\"Highly Negative\""
        );
        assert_eq!(
            serde_json::to_string(&Category::LessNegative).unwrap(),
            "\"Less Negative\""
        );
        let parsed: Category = serde_json::from_str("\"Positive\"").unwrap();
        assert_eq!(parsed, Category::Positive);
    }

    #[test]
    fn test_category_order() {
        let mut shuffled = vec![
            Category::HighlyNegative,
            Category::Positive,
            Category::LessNegative,
            Category::Neutral,
        ];
        shuffled.sort();
        assert_eq!(shuffled, Category::ALL.to_vec());
    }

    #[test]
    fn test_post_record_from_sample_json() {
        let json = r#"{
            "id": 42,
            "text": "Loving the new release",
            "sentiment": {"neg": 0.0, "neu": 0.4, "pos": 0.6, "compound": 0.6369},
            "category": "Positive"
        }"#;

        let record: PostRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, PostId::Numeric(42));
        assert_eq!(record.category, Category::Positive);
        assert!((record.sentiment.compound - 0.6369).abs() < f64::EPSILON);
    }
}

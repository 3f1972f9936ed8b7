use crate::error::CoreError;
use crate::types::PostRecord;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Keyword-indexed dump of pre-built post records, used instead of live
/// fetching during development.
#[derive(Debug, Clone, Default)]
pub struct SampleData {
    posts_by_keyword: BTreeMap<String, Vec<PostRecord>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SampleLookup {
    Found(Vec<PostRecord>),
    /// Nothing indexed under the keyword. Not an error; carries the known
    /// keywords so the caller can tell the user what is available.
    Missing { available: Vec<String> },
}

impl SampleLookup {
    pub fn into_posts(self) -> Vec<PostRecord> {
        match self {
            SampleLookup::Found(posts) => posts,
            SampleLookup::Missing { .. } => Vec::new(),
        }
    }
}

impl SampleData {
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        info!("Loading sample data from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, CoreError> {
        let raw: BTreeMap<String, Vec<PostRecord>> = serde_json::from_str(contents)?;
        let posts_by_keyword = raw
            .into_iter()
            .map(|(keyword, posts)| (keyword.to_lowercase(), posts))
            .collect::<BTreeMap<_, _>>();
        debug!("Sample data indexes {} keywords", posts_by_keyword.len());
        Ok(Self { posts_by_keyword })
    }

    pub fn keywords(&self) -> Vec<String> {
        self.posts_by_keyword.keys().cloned().collect()
    }

    pub fn lookup(&self, keyword: &str) -> SampleLookup {
        match self.posts_by_keyword.get(&keyword.to_lowercase()) {
            Some(posts) => SampleLookup::Found(posts.clone()),
            None => SampleLookup::Missing {
                available: self.keywords(),
            },
        }
    }
}

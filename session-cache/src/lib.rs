use sentiscope_core::{FetchResult, PostRecord, PostSource};
use std::collections::HashMap;
use tracing::{debug, info};

#[cfg(test)]
mod tests;

/// Cache key: the keyword and count exactly as the caller supplied them.
pub type CacheKey = (String, u32);

/// Session-lifetime memo over a [`PostSource`].
///
/// Only successful results are stored, including empty ones. Entries never
/// expire; the cache lives as long as the session that owns it.
pub struct RequestCache<S> {
    source: S,
    entries: HashMap<CacheKey, Vec<PostRecord>>,
}

impl<S: PostSource> RequestCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            entries: HashMap::new(),
        }
    }

    pub async fn get_or_fetch(&mut self, keyword: &str, count: u32) -> FetchResult {
        let key = (keyword.to_string(), count);

        if let Some(records) = self.entries.get(&key) {
            debug!("Cache hit for {:?} (count {})", keyword, count);
            return Ok(records.clone());
        }

        info!("Cache miss for {:?} (count {}), fetching", keyword, count);
        let records = self.source.fetch(keyword, count).await?;
        self.entries.insert(key, records.clone());
        Ok(records)
    }

    pub fn contains(&self, keyword: &str, count: u32) -> bool {
        self.entries.contains_key(&(keyword.to_string(), count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        debug!("Clearing {} cached results", self.entries.len());
        self.entries.clear();
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

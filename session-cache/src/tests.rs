#[cfg(test)]
mod tests {
    use crate::RequestCache;
    use sentiscope_core::{
        Category, FetchError, FetchResult, PostId, PostRecord, PostSource, SentimentScores,
    };
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    /// Answers from a script and counts how often it is asked.
    struct CountingSource {
        calls: Cell<usize>,
        replies: RefCell<VecDeque<FetchResult>>,
    }

    impl CountingSource {
        fn new(replies: Vec<FetchResult>) -> Self {
            Self {
                calls: Cell::new(0),
                replies: RefCell::new(replies.into()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.get()
        }
    }

    impl PostSource for CountingSource {
        async fn fetch(&self, _keyword: &str, _count: u32) -> FetchResult {
            self.calls.set(self.calls.get() + 1);
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn record(id: u64, text: &str) -> PostRecord {
        PostRecord {
            id: PostId::Numeric(id),
            text: text.to_string(),
            sentiment: SentimentScores {
                neg: 0.0,
                neu: 0.4,
                pos: 0.6,
                compound: 0.7,
            },
            category: Category::Positive,
        }
    }

    #[tokio::test]
    async fn test_hit_skips_source() {
        let posts = vec![record(1, "great"), record(2, "lovely")];
        let mut cache = RequestCache::new(CountingSource::new(vec![Ok(posts.clone())]));

        let first = cache.get_or_fetch("AI", 10).await.unwrap();
        let second = cache.get_or_fetch("AI", 10).await.unwrap();

        assert_eq!(first, posts);
        assert_eq!(second, first);
        assert_eq!(cache.source().calls(), 1);
        assert!(cache.contains("AI", 10));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let mut cache = RequestCache::new(CountingSource::new(vec![
            Err(FetchError::unexpected("boom")),
            Ok(vec![record(1, "recovered")]),
        ]));

        let error = cache.get_or_fetch("AI", 10).await.unwrap_err();
        assert_eq!(error, FetchError::unexpected("boom"));
        assert!(cache.is_empty());

        let retried = cache.get_or_fetch("AI", 10).await.unwrap();
        assert_eq!(retried.len(), 1);
        assert_eq!(cache.source().calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_success_is_cached() {
        let mut cache = RequestCache::new(CountingSource::new(vec![
            Ok(Vec::new()),
            Ok(vec![record(1, "late")]),
        ]));

        assert!(cache.get_or_fetch("quiet", 10).await.unwrap().is_empty());
        assert!(cache.get_or_fetch("quiet", 10).await.unwrap().is_empty());
        assert_eq!(cache.source().calls(), 1);
    }

    #[tokio::test]
    async fn test_keys_use_raw_keyword_and_count() {
        let mut cache = RequestCache::new(CountingSource::new(vec![]));

        cache.get_or_fetch("AI", 10).await.unwrap();
        cache.get_or_fetch("AI", 20).await.unwrap();
        cache.get_or_fetch("ai", 10).await.unwrap();
        // 5 and 10 both clamp to 10 downstream but stay distinct here
        cache.get_or_fetch("AI", 5).await.unwrap();

        assert_eq!(cache.source().calls(), 4);
        assert_eq!(cache.len(), 4);
    }

    #[tokio::test]
    async fn test_clear_forces_refetch() {
        let mut cache = RequestCache::new(CountingSource::new(vec![]));

        cache.get_or_fetch("AI", 10).await.unwrap();
        cache.clear();
        assert!(!cache.contains("AI", 10));

        cache.get_or_fetch("AI", 10).await.unwrap();
        assert_eq!(cache.source().calls(), 2);
    }
}

use crate::api::{SearchApi, SearchPage, SearchQuery};
use crate::clock::{Clock, SystemClock};
use crate::metrics::{FetchEvent, FetchMetrics, MetricsCollector};
use crate::retry::{AttemptFailure, RetryDecision, RetryPolicy};
use sentiment_engine::{annotate, SentimentScorer};
use sentiscope_core::{FetchError, FetchResult, PostId, PostRecord, PostSource};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

pub const MIN_RESULTS: u32 = 10;
pub const MAX_RESULTS: u32 = 100;

/// The search endpoint only accepts page sizes in `[10, 100]`.
pub fn clamp_count(count: u32) -> u32 {
    count.clamp(MIN_RESULTS, MAX_RESULTS)
}

/// Fetches recent posts for a keyword and annotates them with sentiment.
///
/// Retryable conditions (empty pages, short rate limits) are absorbed here;
/// everything that reaches the caller is either a list of records or a
/// [`FetchError`].
pub struct PostFetcher<A, S, C = SystemClock> {
    api: A,
    scorer: S,
    policy: RetryPolicy,
    clock: C,
    search_window: chrono::Duration,
    cancel: CancellationToken,
    metrics: MetricsCollector,
}

impl<A, S, C> PostFetcher<A, S, C>
where
    A: SearchApi,
    S: SentimentScorer,
    C: Clock,
{
    pub fn new(api: A, scorer: S, policy: RetryPolicy, clock: C) -> Self {
        Self {
            api,
            scorer,
            policy,
            clock,
            search_window: chrono::Duration::minutes(60),
            cancel: CancellationToken::new(),
            metrics: MetricsCollector::new(),
        }
    }

    pub fn with_search_window(mut self, window: chrono::Duration) -> Self {
        self.search_window = window;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Swap the token observed by subsequent fetches. A cancelled token stays
    /// cancelled, so interactive callers install a fresh one per request.
    pub fn set_cancellation(&mut self, cancel: CancellationToken) {
        self.cancel = cancel;
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn metrics(&self) -> FetchMetrics {
        self.metrics.get_metrics().await
    }

    pub async fn export_metrics(&self) -> Result<String, serde_json::Error> {
        self.metrics.export_metrics().await
    }

    pub async fn fetch_posts(&self, keyword: &str, count: u32) -> FetchResult {
        let request_id = Uuid::new_v4();
        self.run_attempts(keyword, count)
            .instrument(info_span!("fetch", %request_id, keyword))
            .await
    }

    async fn run_attempts(&self, keyword: &str, count: u32) -> FetchResult {
        self.metrics.record(FetchEvent::Started).await;

        if !self.api.is_authenticated() {
            warn!("No bearer token configured, skipping search");
            self.metrics.record(FetchEvent::MissingCredentials).await;
            return Err(FetchError::no_credentials());
        }

        let count = clamp_count(count);
        let query = SearchQuery::recent(keyword, count, self.clock.now(), self.search_window);
        let max_attempts = self.policy.max_attempts;

        for attempt in 1..=max_attempts {
            info!(
                "Attempt {}/{} at {}",
                attempt,
                max_attempts,
                self.clock.now().format("%Y-%m-%d %H:%M:%S")
            );
            self.metrics.record(FetchEvent::Attempt).await;

            let outcome = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return self.interrupted().await,
                outcome = self.api.search_recent(&query) => outcome,
            };

            // A page whose posts are all blank counts as empty.
            let failure = match outcome.map(|page| self.annotate_page(page)) {
                Ok(records) if !records.is_empty() => {
                    info!("Fetched {} posts for {:?}", records.len(), keyword);
                    self.metrics.record(FetchEvent::Success).await;
                    return Ok(records);
                }
                Ok(_) => {
                    self.metrics.record(FetchEvent::EmptyPage).await;
                    AttemptFailure::Empty
                }
                Err(error) => AttemptFailure::from(error),
            };

            match self.policy.decide(failure, self.clock.now()) {
                RetryDecision::RetryNow => {}
                RetryDecision::RetryAfter(backoff) => {
                    self.metrics.record(FetchEvent::RateLimitWait(backoff)).await;
                    tokio::select! {
                        biased;
                        _ = self.cancel.cancelled() => return self.interrupted().await,
                        _ = self.clock.sleep(backoff) => {}
                    }
                }
                RetryDecision::GiveUp(error) => {
                    let event = match error {
                        FetchError::RateLimited { .. } => FetchEvent::RateLimitAbort,
                        _ => FetchEvent::Unexpected,
                    };
                    self.metrics.record(event).await;
                    return Err(error);
                }
            }
        }

        warn!("Failed after {} attempts. Try again later.", max_attempts);
        Ok(Vec::new())
    }

    async fn interrupted(&self) -> FetchResult {
        warn!("Fetch interrupted by user");
        self.metrics.record(FetchEvent::Cancelled).await;
        Ok(Vec::new())
    }

    fn annotate_page(&self, page: SearchPage) -> Vec<PostRecord> {
        page.posts
            .into_iter()
            .filter(|post| {
                let keep = !post.text.trim().is_empty();
                if !keep {
                    debug!("Skipping post {} with empty text", post.id);
                }
                keep
            })
            .map(|post| annotate(&self.scorer, PostId::Text(post.id), post.text))
            .collect()
    }
}

impl<A, S, C> PostSource for PostFetcher<A, S, C>
where
    A: SearchApi,
    S: SentimentScorer,
    C: Clock,
{
    async fn fetch(&self, keyword: &str, count: u32) -> FetchResult {
        self.fetch_posts(keyword, count).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_count() {
        assert_eq!(clamp_count(0), MIN_RESULTS);
        assert_eq!(clamp_count(9), MIN_RESULTS);
        assert_eq!(clamp_count(10), 10);
        assert_eq!(clamp_count(55), 55);
        assert_eq!(clamp_count(100), 100);
        assert_eq!(clamp_count(101), MAX_RESULTS);
        assert_eq!(clamp_count(u32::MAX), MAX_RESULTS);
    }
}

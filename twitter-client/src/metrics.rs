use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchMetrics {
    pub fetches: u64,
    pub attempts: u64,
    pub successful_fetches: u64,
    pub empty_pages: u64,
    pub rate_limit_waits: u64,
    pub rate_limit_aborts: u64,
    pub unexpected_failures: u64,
    pub cancellations: u64,
    pub missing_credentials: u64,
    pub total_backoff: Duration,
    pub last_fetch_time: Option<SystemTime>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FetchEvent {
    Started,
    Attempt,
    Success,
    EmptyPage,
    RateLimitWait(Duration),
    RateLimitAbort,
    Unexpected,
    Cancelled,
    MissingCredentials,
}

#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    metrics: Arc<RwLock<FetchMetrics>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, event: FetchEvent) {
        let mut metrics = self.metrics.write().await;

        match event {
            FetchEvent::Started => {
                metrics.fetches += 1;
                metrics.last_fetch_time = Some(SystemTime::now());
            }
            FetchEvent::Attempt => metrics.attempts += 1,
            FetchEvent::Success => metrics.successful_fetches += 1,
            FetchEvent::EmptyPage => metrics.empty_pages += 1,
            FetchEvent::RateLimitWait(backoff) => {
                metrics.rate_limit_waits += 1;
                metrics.total_backoff += backoff;
            }
            FetchEvent::RateLimitAbort => metrics.rate_limit_aborts += 1,
            FetchEvent::Unexpected => metrics.unexpected_failures += 1,
            FetchEvent::Cancelled => metrics.cancellations += 1,
            FetchEvent::MissingCredentials => metrics.missing_credentials += 1,
        }
    }

    pub async fn get_metrics(&self) -> FetchMetrics {
        self.metrics.read().await.clone()
    }

    pub async fn export_metrics(&self) -> Result<String, serde_json::Error> {
        let metrics = self.get_metrics().await;
        serde_json::to_string_pretty(&metrics)
    }
}

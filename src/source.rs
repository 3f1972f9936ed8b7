use sentiment_engine::VaderScorer;
use sentiscope_core::{
    AppConfig, CoreError, FetchError, FetchResult, PostSource, SampleData, SampleLookup,
};
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use twitter_client::{PostFetcher, RetryPolicy, SystemClock, TwitterApiClient};

pub type LiveFetcher = PostFetcher<TwitterApiClient, VaderScorer, SystemClock>;

/// Serves pre-built records from the sample data file. A file that failed to
/// load is reported on every fetch rather than at start-up.
pub struct SampleSource {
    data: Result<SampleData, String>,
}

impl SampleSource {
    pub fn load(path: &Path) -> Self {
        let data = SampleData::load(path).map_err(|e| {
            warn!("Could not load sample data from {}: {}", path.display(), e);
            e.to_string()
        });
        Self { data }
    }

    /// Known keywords when `keyword` has no sample entry.
    pub fn missing_keywords(&self, keyword: &str) -> Option<Vec<String>> {
        match self.data.as_ref().ok()?.lookup(keyword) {
            SampleLookup::Found(_) => None,
            SampleLookup::Missing { available } => Some(available),
        }
    }
}

impl PostSource for SampleSource {
    async fn fetch(&self, keyword: &str, _count: u32) -> FetchResult {
        let data = self.data.as_ref().map_err(|e| {
            FetchError::unexpected(format!("Failed to load sample data: {}", e))
        })?;

        let lookup = data.lookup(keyword);
        if let SampleLookup::Missing { available } = &lookup {
            info!(
                "No sample data for {:?}. Available keywords: {:?}",
                keyword, available
            );
        }
        Ok(lookup.into_posts())
    }
}

pub enum Source {
    Live(Box<LiveFetcher>),
    Sample(SampleSource),
}

impl Source {
    pub fn from_config(config: &AppConfig, sample: bool) -> Result<Self, CoreError> {
        if sample {
            info!("Using sample data from {}", config.sample_data_path.display());
            return Ok(Source::Sample(SampleSource::load(&config.sample_data_path)));
        }

        let client = TwitterApiClient::from_config(config)?;
        let fetcher = PostFetcher::new(
            client,
            VaderScorer::new(),
            RetryPolicy::from(&config.retry),
            SystemClock,
        )
        .with_search_window(chrono::Duration::minutes(
            config.search_window_minutes as i64,
        ));
        Ok(Source::Live(Box::new(fetcher)))
    }

    /// Install the token that interrupts the next fetch.
    pub fn rearm(&mut self, cancel: CancellationToken) {
        if let Source::Live(fetcher) = self {
            fetcher.set_cancellation(cancel);
        }
    }

    pub fn missing_keywords(&self, keyword: &str) -> Option<Vec<String>> {
        match self {
            Source::Live(_) => None,
            Source::Sample(sample) => sample.missing_keywords(keyword),
        }
    }

    /// Fetch counters as JSON. Sample data has none.
    pub async fn export_metrics(&self) -> Option<String> {
        match self {
            Source::Live(fetcher) => match fetcher.export_metrics().await {
                Ok(json) => Some(json),
                Err(e) => {
                    warn!("Could not export fetch metrics: {}", e);
                    None
                }
            },
            Source::Sample(_) => None,
        }
    }
}

impl PostSource for Source {
    async fn fetch(&self, keyword: &str, count: u32) -> FetchResult {
        match self {
            Source::Live(fetcher) => fetcher.fetch(keyword, count).await,
            Source::Sample(sample) => sample.fetch(keyword, count).await,
        }
    }
}

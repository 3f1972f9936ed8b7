pub mod api;
pub mod clock;
pub mod fetcher;
pub mod metrics;
pub mod rate_limit;
pub mod retry;


pub use api::{SearchApi, SearchPage, SearchQuery, TwitterApiClient, TwitterPost};
pub use clock::{Clock, SystemClock};
pub use fetcher::{clamp_count, PostFetcher, MAX_RESULTS, MIN_RESULTS};
pub use metrics::FetchMetrics;
pub use rate_limit::RateLimitSignal;
pub use retry::{AttemptFailure, RetryDecision, RetryPolicy};

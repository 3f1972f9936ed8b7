use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, Response, StatusCode};
use sentiscope_core::{AppConfig, CoreError, TwitterApiError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};
use url::Url;

const SEARCH_RECENT_PATH: &str = "/2/tweets/search/recent";
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Post fields requested from the search endpoint.
pub const TWEET_FIELDS: [&str; 2] = ["author_id", "text"];

#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub query: String,
    pub max_results: u32,
    pub start_time: DateTime<Utc>,
    pub fields: Vec<&'static str>,
}

impl SearchQuery {
    /// Query for `keyword` limited to posts newer than `now - window`.
    pub fn recent(
        keyword: &str,
        max_results: u32,
        now: DateTime<Utc>,
        window: chrono::Duration,
    ) -> Self {
        Self {
            query: keyword.to_string(),
            max_results,
            start_time: now - window,
            fields: TWEET_FIELDS.to_vec(),
        }
    }

    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("query", self.query.clone()),
            ("max_results", self.max_results.to_string()),
            (
                "start_time",
                self.start_time.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
            ("tweet.fields", self.fields.join(",")),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwitterPost {
    pub id: String,
    pub text: String,
    pub author_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchMeta {
    pub result_count: Option<u32>,
    pub newest_id: Option<String>,
    pub oldest_id: Option<String>,
    pub next_token: Option<String>,
}

/// One page of recent-search results. The API omits `data` entirely when
/// nothing matched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(default, rename = "data")]
    pub posts: Vec<TwitterPost>,
    pub meta: Option<SearchMeta>,
}

impl SearchPage {
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Boundary to the recent-search endpoint, so the fetcher can run against a
/// test double.
pub trait SearchApi {
    fn is_authenticated(&self) -> bool;

    async fn search_recent(&self, query: &SearchQuery) -> Result<SearchPage, TwitterApiError>;
}

#[derive(Debug, Clone)]
pub struct TwitterApiClient {
    http_client: Client,
    search_url: Url,
    bearer_token: Option<String>,
}

impl TwitterApiClient {
    pub fn new(
        base_url: &str,
        user_agent: &str,
        bearer_token: Option<String>,
    ) -> Result<Self, CoreError> {
        let search_url = Url::parse(base_url)
            .and_then(|base| base.join(SEARCH_RECENT_PATH))
            .map_err(|e| CoreError::InvalidInput {
                message: format!("Invalid API base URL '{}': {}", base_url, e),
            })?;

        let http_client = Client::builder().user_agent(user_agent).build()?;

        Ok(Self {
            http_client,
            search_url,
            bearer_token,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, CoreError> {
        Self::new(
            &config.api_base_url,
            &config.user_agent,
            config.bearer_token.clone(),
        )
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }

    async fn classify_response(response: Response) -> Result<SearchPage, TwitterApiError> {
        let status = response.status();

        if status.is_success() {
            debug!("Search request successful: {}", status);
            return response.json::<SearchPage>().await.map_err(|e| {
                error!("Failed to parse search response: {}", e);
                TwitterApiError::InvalidResponse {
                    details: format!("Failed to parse search response: {}", e),
                }
            });
        }

        error!("Search request failed with status: {}", status);

        match status {
            StatusCode::TOO_MANY_REQUESTS => {
                let headers = response
                    .headers()
                    .iter()
                    .filter_map(|(name, value)| {
                        value
                            .to_str()
                            .ok()
                            .map(|value| (name.as_str().to_lowercase(), value.to_string()))
                    })
                    .collect::<BTreeMap<_, _>>();
                warn!("Rate limited by search endpoint");
                Err(TwitterApiError::RateLimitExceeded {
                    status: Some(status.as_u16()),
                    headers,
                })
            }
            StatusCode::UNAUTHORIZED => Err(TwitterApiError::InvalidToken),
            StatusCode::FORBIDDEN => Err(TwitterApiError::Forbidden {
                resource: SEARCH_RECENT_PATH.to_string(),
            }),
            status if status.is_server_error() => Err(TwitterApiError::ServerError {
                status_code: status.as_u16(),
            }),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(TwitterApiError::RequestFailed {
                    status_code: status.as_u16(),
                    body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
                })
            }
        }
    }
}

impl SearchApi for TwitterApiClient {
    fn is_authenticated(&self) -> bool {
        self.bearer_token.is_some()
    }

    async fn search_recent(&self, query: &SearchQuery) -> Result<SearchPage, TwitterApiError> {
        let token = self
            .bearer_token
            .as_deref()
            .ok_or(TwitterApiError::InvalidToken)?;

        info!(
            "Searching recent posts: query={:?} max_results={}",
            query.query, query.max_results
        );

        let response = self
            .http_client
            .get(self.search_url.clone())
            .bearer_auth(token)
            .query(&query.query_params())
            .send()
            .await
            .map_err(|e| {
                error!("Network error for {}: {}", SEARCH_RECENT_PATH, e);
                TwitterApiError::Network {
                    message: e.to_string(),
                }
            })?;

        let page = Self::classify_response(response).await?;
        debug!(
            "Search returned {} posts (meta: {:?})",
            page.posts.len(),
            page.meta
        );
        Ok(page)
    }
}

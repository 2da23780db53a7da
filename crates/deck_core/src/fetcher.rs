use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT},
    Client,
};
use shared::{
    domain::Profile,
    error::FetchError,
    protocol::decode_batch,
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://random-data-api.com/api/users/random_user";
pub const DEFAULT_BATCH_SIZE: u32 = 80;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_USER_AGENT: &str = concat!("profile-deck/", env!("CARGO_PKG_VERSION"));

/// Outcome of the single fetch a browsing session performs.
///
/// `Ready` always carries at least one profile; an empty batch is `Empty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    Loading,
    Ready(Vec<Profile>),
    Empty,
    Failed(String),
}

impl FetchResult {
    /// Collapses every failure cause into the same user-facing message.
    pub fn from_batch(batch: Result<Vec<Profile>, FetchError>) -> Self {
        match batch {
            Ok(profiles) if profiles.is_empty() => Self::Empty,
            Ok(profiles) => Self::Ready(profiles),
            Err(err) => Self::Failed(err.user_message().to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Loading)
    }
}

#[async_trait]
pub trait DataFetcher: Send + Sync {
    /// Performs the remote call and decodes the batch.
    async fn fetch_batch(&self) -> Result<Vec<Profile>, FetchError>;

    async fn fetch(&self) -> FetchResult {
        let batch = self.fetch_batch().await;
        match &batch {
            Ok(profiles) => debug!(count = profiles.len(), "profile batch fetched"),
            Err(err) => warn!(
                error = %err,
                transport = err.is_transport(),
                decode = err.is_decode(),
                "profile fetch failed"
            ),
        }
        FetchResult::from_batch(batch)
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub endpoint: String,
    pub batch_size: u32,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    /// The endpoint with `size` set to the batch size; a `size` already in
    /// the endpoint query is replaced.
    pub fn request_url(&self) -> Result<Url, FetcherSetupError> {
        let mut url = Url::parse(&self.endpoint)?;
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "size")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair("size", &self.batch_size.to_string());
        Ok(url)
    }
}

#[derive(Debug, Error)]
pub enum FetcherSetupError {
    #[error("invalid endpoint url: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("invalid user agent header: {0}")]
    InvalidUserAgent(#[from] reqwest::header::InvalidHeaderValue),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Fetches the profile batch from the random user API.
pub struct HttpProfileFetcher {
    http: Client,
    request_url: Url,
}

impl HttpProfileFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetcherSetupError> {
        let request_url = config.request_url()?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { http, request_url })
    }

    pub fn request_url(&self) -> &Url {
        &self.request_url
    }
}

#[async_trait]
impl DataFetcher for HttpProfileFetcher {
    async fn fetch_batch(&self) -> Result<Vec<Profile>, FetchError> {
        debug!(url = %self.request_url, "requesting profile batch");
        let response = self
            .http
            .get(self.request_url.clone())
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        decode_batch(&body)
    }
}

/// Stand-in used when a session must start without a working fetcher,
/// e.g. the configured endpoint could not be parsed.
pub struct UnavailableFetcher {
    reason: String,
}

impl UnavailableFetcher {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl DataFetcher for UnavailableFetcher {
    async fn fetch_batch(&self) -> Result<Vec<Profile>, FetchError> {
        Err(FetchError::Transport(format!(
            "fetcher unavailable: {}",
            self.reason
        )))
    }
}

#[cfg(test)]
#[path = "tests/fetcher_tests.rs"]
mod tests;

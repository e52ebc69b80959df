//! Best-effort JSON client for the backend endpoints.
//!
//! Every endpoint is a plain GET returning JSON. Any failure (network error,
//! non-2xx status, non-JSON content type, undecodable body) is reported as a
//! [`FetchError`] by [`ApiClient::try_fetch`]; the per-endpoint helpers log
//! it and return `None` so the caller can substitute demo data. Nothing is
//! retried.
//!
//! List endpoints are decoded entry by entry: an entry that does not fit the
//! record type is dropped and the rest of the list is kept.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use qdash_model::lenient::decode_list;
use qdash_model::{
    BackendInfo, EntanglementData, Endpoint, JobRecord, MeasurementResults, MetricsSnapshot,
    QuantumStateData, Recommendation, TestProbe,
};

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Why a fetch produced no data.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connection, timeout, or body transfer failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{endpoint} returned status {status}")]
    Status { endpoint: Endpoint, status: u16 },

    /// The body is not declared as JSON.
    #[error("{endpoint} returned non-JSON content type '{content_type}'")]
    NotJson {
        endpoint: Endpoint,
        content_type: String,
    },

    /// The body is JSON but does not have the expected shape.
    #[error("{endpoint} returned an undecodable body: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL cannot be used.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

/// Client for the dashboard backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    /// Base URL without trailing slash.
    base_url: String,
}

impl ApiClient {
    /// Create a client; every request is aborted after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> FetchResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|e| FetchError::InvalidUrl(format!("{base_url}: {e}")))?;

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of an endpoint.
    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// GET an endpoint and decode its JSON body.
    #[instrument(skip(self))]
    pub async fn try_fetch<T: DeserializeOwned>(&self, endpoint: Endpoint) -> FetchResult<T> {
        let url = self.url(endpoint);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !is_json_media_type(&content_type) {
            return Err(FetchError::NotJson {
                endpoint,
                content_type,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode { endpoint, source })
    }

    /// GET a list endpoint, keeping every entry that decodes.
    pub async fn try_fetch_list<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
    ) -> FetchResult<Vec<T>> {
        let items: Vec<serde_json::Value> = self.try_fetch(endpoint).await?;
        Ok(keep_decodable(endpoint, items))
    }

    /// Like [`ApiClient::try_fetch`] but logs the failure and yields `None`.
    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Option<T> {
        match self.try_fetch(endpoint).await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(endpoint = %endpoint, error = %e, "fetch failed");
                None
            }
        }
    }

    /// Like [`ApiClient::try_fetch_list`] but logs the failure and yields `None`.
    pub async fn fetch_list<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Option<Vec<T>> {
        match self.try_fetch_list(endpoint).await {
            Ok(items) => Some(items),
            Err(e) => {
                warn!(endpoint = %endpoint, error = %e, "fetch failed");
                None
            }
        }
    }

    pub async fn metrics(&self) -> Option<MetricsSnapshot> {
        self.fetch(Endpoint::Metrics).await
    }

    pub async fn jobs(&self) -> Option<Vec<JobRecord>> {
        self.fetch_list(Endpoint::Jobs).await
    }

    pub async fn backends(&self) -> Option<Vec<BackendInfo>> {
        self.fetch_list(Endpoint::Backends).await
    }

    pub async fn measurement_results(&self) -> Option<MeasurementResults> {
        self.fetch(Endpoint::MeasurementResults).await
    }

    pub async fn entanglement_data(&self) -> Option<EntanglementData> {
        self.fetch(Endpoint::EntanglementData).await
    }

    pub async fn quantum_state_data(&self) -> Option<QuantumStateData> {
        self.fetch(Endpoint::QuantumStateData).await
    }

    pub async fn recommendations(&self) -> Option<Vec<Recommendation>> {
        self.fetch_list(Endpoint::Recommendations).await
    }

    pub async fn test(&self) -> Option<TestProbe> {
        self.fetch(Endpoint::Test).await
    }
}

/// Decode list entries one by one and drop the ones that do not fit.
fn keep_decodable<T: DeserializeOwned>(endpoint: Endpoint, items: Vec<serde_json::Value>) -> Vec<T> {
    let (kept, dropped) = decode_list(items);
    if dropped > 0 {
        warn!(endpoint = %endpoint, dropped, kept = kept.len(), "skipped undecodable entries");
    }
    kept
}

/// Check the media type of a `Content-Type` value, ignoring parameters.
fn is_json_media_type(content_type: &str) -> bool {
    let media = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    media == "application/json" || (media.starts_with("application/") && media.ends_with("+json"))
}

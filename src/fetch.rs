// REST snapshot fetcher: one-shot GET of the full scoreboard, used at
// startup, on the self-heal cadence, and whenever the backend sends a
// refresh sentinel over the live feed.

use async_trait::async_trait;
use tracing::debug;

use crate::wire::{Aggregate, ApiTeam, SnapshotResponse};

/// Errors from a snapshot fetch. `Unauthorized` is split out because the
/// orchestrator surfaces it differently from a generic server error.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned status {status}")]
    Http { status: u16 },
    #[error("not authenticated with the scoreboard backend")]
    Unauthorized,
    #[error("could not decode snapshot body: {0}")]
    Decode(String),
}

/// Source of full scoreboard snapshots. The orchestrator only sees this
/// trait, so tests can drive it with scripted stubs.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<(Vec<ApiTeam>, Option<Aggregate>), FetchError>;
}

/// Production source: GET `{http_url}/dashboard` with an optional bearer
/// token, accepting both the wrapped and the bare-array response shapes.
pub struct HttpSnapshotSource {
    http: reqwest::Client,
    url: String,
    bearer_token: Option<String>,
}

impl HttpSnapshotSource {
    pub fn new(http_url: &str, bearer_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: format!("{}/dashboard", http_url.trim_end_matches('/')),
            bearer_token,
        }
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    async fn fetch_snapshot(&self) -> Result<(Vec<ApiTeam>, Option<Aggregate>), FetchError> {
        let mut request = self.http.get(&self.url);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(FetchError::Unauthorized);
        }
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let snapshot: SnapshotResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        let (teams, aggregate) = snapshot.into_parts();
        debug!("Fetched snapshot with {} teams", teams.len());
        Ok((teams, aggregate))
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

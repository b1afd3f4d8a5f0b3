use crate::types::{ChatReply, ConnectionStatus, ModelCatalog};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";
const SERVER_URL_VAR: &str = "KESTREL_SERVER_URL";

const CONNECTION_PATH: &str = "/api/connection";
const STATS_PATH: &str = "/api/connection/stats";
const CHAT_PATH: &str = "/api/chat";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server error {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Outbound port for the three dashboard endpoints.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Pings the server. `None` means unreachable (or an unusable payload);
    /// the cause is logged, never raised.
    async fn connection_status(&self) -> Option<ConnectionStatus>;

    /// Fetches available and active models, same contract as
    /// [`connection_status`](Self::connection_status).
    async fn model_catalog(&self) -> Option<ModelCatalog>;

    /// Submits a prompt for the selected model. Unlike the status fetches,
    /// failures propagate so the caller can render an explicit error state.
    async fn submit_chat(&self, prompt: &str, model: &str) -> Result<ChatReply, ApiError>;
}

pub struct HttpDashboard {
    client: Client,
    base_url: String,
}

#[derive(serde::Serialize)]
struct ChatRequest<'a> {
    prompt: &'a str,
    model: &'a str,
}

impl HttpDashboard {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let parsed = Url::parse(base_url)
            .with_context(|| format!("invalid dashboard server url: {base_url}"))?;
        Ok(Self {
            client: Client::new(),
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Reads `KESTREL_SERVER_URL`, falling back to the default local server
    /// when unset or unparseable.
    pub fn from_env() -> Self {
        let base = std::env::var(SERVER_URL_VAR).unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        match Self::new(&base) {
            Ok(dashboard) => dashboard,
            Err(err) => {
                tracing::warn!(%base, %err, "falling back to default server url");
                Self {
                    client: Client::new(),
                    base_url: DEFAULT_SERVER_URL.to_string(),
                }
            }
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        let url = self.endpoint(path);
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(%url, %err, "unable to reach server");
                return None;
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                tracing::error!(%url, %err, "failed to read response body");
                return None;
            }
        };
        if !status.is_success() {
            tracing::error!(%url, %status, "server returned an error");
            return None;
        }

        match serde_json::from_str(&body) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                tracing::error!(%url, %err, "malformed payload");
                None
            }
        }
    }
}

#[async_trait]
impl DashboardApi for HttpDashboard {
    async fn connection_status(&self) -> Option<ConnectionStatus> {
        self.fetch_json(CONNECTION_PATH).await
    }

    async fn model_catalog(&self) -> Option<ModelCatalog> {
        self.fetch_json(STATS_PATH).await
    }

    async fn submit_chat(&self, prompt: &str, model: &str) -> Result<ChatReply, ApiError> {
        let url = self.endpoint(CHAT_PATH);
        let response = self
            .client
            .post(&url)
            .json(&ChatRequest { prompt, model })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status { status, body });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

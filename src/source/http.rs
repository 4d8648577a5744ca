use super::{LogSource, SourceError, Subscription, frame_lines};
use crate::domain::SeverityLevel;
use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

pub const MONITOR_PATH: &str = "v1/sys/monitor";
pub const TOKEN_HEADER: &str = "X-Vault-Token";

#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    pub address: String,
    pub token: Option<String>,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            address: "http://127.0.0.1:8200".to_string(),
            token: None,
            connect_timeout: Duration::from_secs(30),
            user_agent: format!("rask-log-monitor/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Streams server logs from the `sys/monitor` endpoint.
///
/// Each `open` issues one long-lived GET; the response body is the stream.
#[derive(Debug, Clone)]
pub struct HttpLogSource {
    client: reqwest::Client,
    monitor_url: Url,
    token: Option<String>,
}

impl HttpLogSource {
    pub fn new(config: HttpSourceConfig) -> Result<Self, SourceError> {
        let monitor_url = Self::monitor_url_for(&config.address)?;

        // No overall request timeout: the response body stays open for as long
        // as the server keeps streaming.
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(SourceError::ClientBuild)?;

        Ok(Self {
            client,
            monitor_url,
            token: config.token,
        })
    }

    pub fn monitor_url(&self) -> &Url {
        &self.monitor_url
    }

    fn monitor_url_for(address: &str) -> Result<Url, SourceError> {
        let invalid = |reason: String| SourceError::InvalidAddress {
            address: address.to_string(),
            reason,
        };

        let mut base = Url::parse(address).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", base.scheme())));
        }
        if base.cannot_be_a_base() {
            return Err(invalid("address cannot be used as a base URL".to_string()));
        }

        // Keep any path prefix (e.g. a proxy mount) when joining.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        base.join(MONITOR_PATH).map_err(|e| invalid(e.to_string()))
    }

    fn request_url(&self, severity: SeverityLevel) -> Url {
        let mut url = self.monitor_url.clone();
        url.query_pairs_mut()
            .append_pair("log_level", severity.as_query_value());
        url
    }
}

#[async_trait]
impl LogSource for HttpLogSource {
    async fn open(
        &self,
        severity: SeverityLevel,
        cancel: CancellationToken,
    ) -> Result<Subscription, SourceError> {
        let url = self.request_url(severity);
        debug!(%url, %severity, "Opening log monitor stream");

        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.header(TOKEN_HEADER, token);
        }

        let response = request.send().await.map_err(SourceError::Connect)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Rejected {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        Ok(frame_lines(response.bytes_stream(), cancel))
    }
}

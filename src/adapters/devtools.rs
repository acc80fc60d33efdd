//! Discovery of a running browser's DevTools websocket address.

use crate::utils::error::{Result, ScrapeError};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// `GET /json/version` 的回應
#[derive(Debug, Clone, Deserialize)]
pub struct VersionInfo {
    #[serde(rename = "Browser")]
    pub browser: Option<String>,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
}

pub async fn fetch_version(client: &Client, endpoint: &str) -> Result<VersionInfo> {
    let url = format!("{}/json/version", endpoint.trim_end_matches('/'));
    tracing::debug!("Querying DevTools endpoint {}", url);

    let response = client
        .get(&url)
        .timeout(DISCOVERY_TIMEOUT)
        .send()
        .await?
        .error_for_status()?;
    Ok(response.json().await?)
}

/// Turn a DevTools endpoint into a websocket URL.
///
/// `ws://` and `wss://` addresses are returned unchanged; `http(s)://host:port`
/// is looked up through `/json/version`.
pub async fn resolve_websocket_url(endpoint: &str) -> Result<String> {
    if endpoint.starts_with("ws://") || endpoint.starts_with("wss://") {
        return Ok(endpoint.to_string());
    }
    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        return Err(ScrapeError::InvalidConfigValueError {
            field: "browser.ws_endpoint".to_string(),
            value: endpoint.to_string(),
            reason: "expected a ws://, wss://, http:// or https:// address".to_string(),
        });
    }

    let info = fetch_version(&Client::new(), endpoint).await?;
    if let Some(browser) = &info.browser {
        tracing::info!("🧭 Found {} at {}", browser, endpoint);
    }
    Ok(info.web_socket_debugger_url)
}

//! [`BrowserSession`] backed by chromiumoxide (Chrome DevTools Protocol).
//!
//! Queries run as page scripts so XPath and CSS locators behave the same,
//! scoped or not. Every matched node is tagged with a `data-profile-scraper-node`
//! attribute and later addressed through that tag.

use crate::adapters::devtools;
use crate::config::browser::BrowserSettings;
use crate::domain::ports::{BrowserSession, Locator};
use crate::utils::error::{Result, ScrapeError};
use async_trait::async_trait;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures_util::StreamExt;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};

const NODE_ATTR: &str = "data-profile-scraper-node";

/// 以標記屬性指向頁面上的某個元素
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeHandle(String);

impl NodeHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub struct CdpSession {
    browser: Browser,
    page: Page,
    /// 由本程式啟動的瀏覽器才整個關閉；連線進來的只關分頁
    launched: bool,
    query_seq: AtomicU64,
    handler_handle: tokio::task::JoinHandle<()>,
}

impl CdpSession {
    /// Launch a new Chrome process.
    pub async fn launch(settings: &BrowserSettings) -> Result<Self> {
        let mut builder = BrowserConfig::builder();
        if !settings.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &settings.executable {
            builder = builder.chrome_executable(path);
        }
        if let Some(dir) = &settings.user_data_dir {
            builder = builder.user_data_dir(dir);
        }
        let config = builder
            .build()
            .map_err(|e| ScrapeError::session(format!("Failed to build browser config: {}", e)))?;

        tracing::info!("🚀 Launching browser (headless: {})", settings.headless);
        let (browser, handler) = Browser::launch(config).await?;
        Self::from_parts(browser, handler, true).await
    }

    /// Attach to a running browser through its DevTools endpoint.
    pub async fn connect(endpoint: &str) -> Result<Self> {
        let ws_url = devtools::resolve_websocket_url(endpoint).await?;
        tracing::info!("🔌 Connecting to browser at {}", ws_url);
        let (browser, handler) = Browser::connect(ws_url).await?;
        Self::from_parts(browser, handler, false).await
    }

    /// 依設定決定連線或啟動
    pub async fn from_settings(settings: &BrowserSettings) -> Result<Self> {
        match settings.existing_endpoint() {
            Some(endpoint) => Self::connect(endpoint).await,
            None => Self::launch(settings).await,
        }
    }

    async fn from_parts(
        browser: Browser,
        mut handler: chromiumoxide::Handler,
        launched: bool,
    ) -> Result<Self> {
        let handler_handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler: {}", e);
                }
            }
        });

        let page = browser.new_page("about:blank").await?;
        Ok(Self {
            browser,
            page,
            launched,
            query_seq: AtomicU64::new(0),
            handler_handle,
        })
    }

    async fn evaluate(&self, expression: String) -> Result<Value> {
        let params = EvaluateParams::builder()
            .expression(expression)
            .return_by_value(true)
            .await_promise(true)
            .build()
            .map_err(|e| ScrapeError::ScriptError { message: e })?;
        let result = self.page.evaluate_expression(params).await?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    async fn query(
        &self,
        locator: &Locator,
        scope: Option<&NodeHandle>,
        first_only: bool,
    ) -> Result<Vec<NodeHandle>> {
        let seq = self.query_seq.fetch_add(1, Ordering::Relaxed);
        let script = query_script(locator, scope, first_only, &format!("q{}-", seq))?;

        match self.evaluate(script).await? {
            Value::Array(ids) => Ok(ids
                .into_iter()
                .filter_map(|id| id.as_str().map(|s| NodeHandle(s.to_string())))
                .collect()),
            // scope 節點已不在頁面上
            Value::Null => Err(ScrapeError::not_found(format!(
                "{} (stale scope {})",
                locator,
                scope.map(NodeHandle::as_str).unwrap_or("document")
            ))),
            other => Err(ScrapeError::ScriptError {
                message: format!("unexpected query result: {}", other),
            }),
        }
    }

    async fn node_value(&self, element: &NodeHandle, body: &str) -> Result<Value> {
        let script = format!(
            "(() => {{ const el = document.querySelector('[{attr}=\"' + {id} + '\"]'); \
             if (!el) return {{ missing: true }}; return {{ value: {body} }}; }})()",
            attr = NODE_ATTR,
            id = serde_json::to_string(element.as_str())?,
            body = body,
        );
        let result = self.evaluate(script).await?;
        if result.get("missing").is_some() {
            return Err(ScrapeError::not_found(format!("node {}", element.as_str())));
        }
        Ok(result.get("value").cloned().unwrap_or(Value::Null))
    }
}

/// 產生查詢腳本：找出符合的節點、打上標記並回傳標記值
fn query_script(
    locator: &Locator,
    scope: Option<&NodeHandle>,
    first_only: bool,
    prefix: &str,
) -> Result<String> {
    let (kind, expr) = match locator {
        Locator::XPath(expr) => ("xpath", expr.clone()),
        other => ("css", other.to_css().unwrap_or_default()),
    };
    let scope = match scope {
        Some(handle) => serde_json::to_string(handle.as_str())?,
        None => "null".to_string(),
    };

    Ok(format!(
        r#"(() => {{
  const attr = {attr};
  const scopeId = {scope};
  const root = scopeId === null ? document : document.querySelector('[' + attr + '="' + scopeId + '"]');
  if (!root) return null;
  let nodes = [];
  if ({kind} === "xpath") {{
    const r = document.evaluate({expr}, root, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null);
    for (let i = 0; i < r.snapshotLength; i++) nodes.push(r.snapshotItem(i));
  }} else {{
    nodes = Array.from(root.querySelectorAll({expr}));
  }}
  nodes = nodes.filter(n => n.nodeType === 1);
  if ({first_only}) nodes = nodes.slice(0, 1);
  const prefix = {prefix};
  return nodes.map((n, i) => {{
    if (!n.hasAttribute(attr)) n.setAttribute(attr, prefix + i);
    return n.getAttribute(attr);
  }});
}})()"#,
        attr = serde_json::to_string(NODE_ATTR)?,
        scope = scope,
        kind = serde_json::to_string(kind)?,
        expr = serde_json::to_string(&expr)?,
        first_only = first_only,
        prefix = serde_json::to_string(prefix)?,
    ))
}

#[async_trait]
impl BrowserSession for CdpSession {
    type Element = NodeHandle;

    async fn navigate(&self, url: &str) -> Result<()> {
        tracing::debug!("goto {}", url);
        self.page.goto(url).await?;
        Ok(())
    }

    async fn find_element(
        &self,
        locator: &Locator,
        scope: Option<&NodeHandle>,
    ) -> Result<NodeHandle> {
        self.query(locator, scope, true)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ScrapeError::not_found(locator))
    }

    async fn find_elements(
        &self,
        locator: &Locator,
        scope: Option<&NodeHandle>,
    ) -> Result<Vec<NodeHandle>> {
        self.query(locator, scope, false).await
    }

    async fn execute_script(&self, script: &str) -> Result<Value> {
        self.evaluate(script.to_string()).await
    }

    async fn attribute(&self, element: &NodeHandle, name: &str) -> Result<Option<String>> {
        // 與 WebDriver 相同：屬性（property）優先，例如 href 會是絕對網址
        let name = serde_json::to_string(name)?;
        let body = format!(
            "(typeof el[{name}] === 'string' ? el[{name}] : el.getAttribute({name}))",
            name = name
        );
        Ok(self
            .node_value(element, &body)
            .await?
            .as_str()
            .map(str::to_string))
    }

    async fn text(&self, element: &NodeHandle) -> Result<String> {
        Ok(self
            .node_value(element, "el.innerText")
            .await?
            .as_str()
            .unwrap_or_default()
            .to_string())
    }

    async fn quit(&mut self) -> Result<()> {
        if self.launched {
            self.browser.close().await?;
            if let Err(e) = self.browser.wait().await {
                tracing::debug!("Browser process wait failed: {}", e);
            }
        } else {
            self.page.clone().close().await?;
        }
        self.handler_handle.abort();
        tracing::info!("🛑 Browser session closed");
        Ok(())
    }
}

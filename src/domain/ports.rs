use crate::utils::error::{Result, ScrapeError};
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// 等待元素出現時的輪詢間隔
pub const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// 查詢描述子：在整頁或某個子樹中找出零或多個元素
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    XPath(String),
    Css(String),
    ClassName(String),
    TagName(String),
    Id(String),
}

impl Locator {
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    pub fn class_name(name: impl Into<String>) -> Self {
        Self::ClassName(name.into())
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Self::TagName(name.into())
    }

    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// 非 XPath 的定位方式都能轉成 CSS selector
    pub fn to_css(&self) -> Option<String> {
        match self {
            Self::XPath(_) => None,
            Self::Css(selector) => Some(selector.clone()),
            Self::ClassName(name) => Some(format!(".{}", name)),
            Self::TagName(name) => Some(name.clone()),
            Self::Id(id) => Some(format!("#{}", id)),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::XPath(expr) => write!(f, "xpath `{}`", expr),
            Self::Css(selector) => write!(f, "css `{}`", selector),
            Self::ClassName(name) => write!(f, "class `{}`", name),
            Self::TagName(name) => write!(f, "tag `{}`", name),
            Self::Id(id) => write!(f, "id `{}`", id),
        }
    }
}

/// Browser automation collaborator driven by the scraper.
///
/// `scope` narrows a query to the subtree of an element found earlier; `None`
/// searches the whole document. Lookups that match nothing return
/// `ScrapeError::ElementNotFound`.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    type Element: Clone + Send + Sync + fmt::Debug;

    async fn navigate(&self, url: &str) -> Result<()>;

    async fn find_element(
        &self,
        locator: &Locator,
        scope: Option<&Self::Element>,
    ) -> Result<Self::Element>;

    async fn find_elements(
        &self,
        locator: &Locator,
        scope: Option<&Self::Element>,
    ) -> Result<Vec<Self::Element>>;

    async fn execute_script(&self, script: &str) -> Result<serde_json::Value>;

    async fn attribute(&self, element: &Self::Element, name: &str) -> Result<Option<String>>;

    /// 元素的可見文字
    async fn text(&self, element: &Self::Element) -> Result<String>;

    async fn quit(&mut self) -> Result<()>;

    /// Poll `find_element` until it succeeds or `timeout` elapses.
    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<Self::Element> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if let Ok(element) = self.find_element(locator, None).await {
                return Ok(element);
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(ScrapeError::Timeout {
                    locator: locator.to_string(),
                    timeout,
                });
            }
            tokio::time::sleep(WAIT_POLL_INTERVAL).await;
        }
    }
}

/// 擷取結果的輸出目的地
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 前 `misses` 次查詢找不到元素
    struct SlowPage {
        misses: usize,
        lookups: AtomicUsize,
    }

    impl SlowPage {
        fn new(misses: usize) -> Self {
            Self {
                misses,
                lookups: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl BrowserSession for SlowPage {
        type Element = usize;

        async fn navigate(&self, _url: &str) -> Result<()> {
            Ok(())
        }

        async fn find_element(&self, locator: &Locator, _scope: Option<&usize>) -> Result<usize> {
            let n = self.lookups.fetch_add(1, Ordering::SeqCst);
            if n < self.misses {
                Err(ScrapeError::not_found(locator))
            } else {
                Ok(n)
            }
        }

        async fn find_elements(&self, locator: &Locator, scope: Option<&usize>) -> Result<Vec<usize>> {
            Ok(self.find_element(locator, scope).await.into_iter().collect())
        }

        async fn execute_script(&self, _script: &str) -> Result<serde_json::Value> {
            Ok(serde_json::Value::Null)
        }

        async fn attribute(&self, _element: &usize, _name: &str) -> Result<Option<String>> {
            Ok(None)
        }

        async fn text(&self, element: &usize) -> Result<String> {
            Ok(element.to_string())
        }

        async fn quit(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_wait_for_times_out_after_deadline() {
        let page = SlowPage::new(usize::MAX);
        let timeout = Duration::from_millis(600);
        let started = tokio::time::Instant::now();

        let err = page.wait_for(&Locator::tag("main"), timeout).await.unwrap_err();

        assert!(started.elapsed() >= timeout);
        match err {
            ScrapeError::Timeout { locator, timeout: waited } => {
                assert_eq!(locator, "tag `main`");
                assert_eq!(waited, timeout);
            }
            other => panic!("expected Timeout, got {:?}", other),
        }
        // 每 250ms 輪詢一次
        assert!(page.lookups.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn test_wait_for_returns_once_element_appears() {
        let page = SlowPage::new(2);

        let element = page
            .wait_for(&Locator::tag("main"), Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(element, 2);
        assert_eq!(page.lookups.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_locator_to_css() {
        assert_eq!(Locator::class_name("mn-connections").to_css().as_deref(), Some(".mn-connections"));
        assert_eq!(Locator::id("about").to_css().as_deref(), Some("#about"));
        assert_eq!(Locator::tag("h1").to_css().as_deref(), Some("h1"));
        assert_eq!(Locator::xpath("//main").to_css(), None);
    }

    #[test]
    fn test_locator_display() {
        assert_eq!(Locator::xpath("..").to_string(), "xpath `..`");
        assert_eq!(Locator::tag("main").to_string(), "tag `main`");
    }
}

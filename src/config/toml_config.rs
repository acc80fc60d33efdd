use crate::adapters::output::OutputFormat;
use crate::config::browser::BrowserSettings;
use crate::core::scraper::{ScraperOptions, SETTLE_DELAY, SIGN_IN_TIMEOUT, WAIT_FOR_ELEMENT_TIMEOUT};
use crate::core::selectors::NETWORK_URL;
use crate::utils::error::{Result, ScrapeError};
use crate::utils::validation::{
    validate_http_url, validate_path, validate_range, validate_required_field, validate_url,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub target: TargetConfig,
    pub browser: BrowserSettings,
    pub scrape: ScrapeConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub connections: bool,
    pub close_on_complete: bool,
    pub wait_timeout_ms: u64,
    pub sign_in_timeout_ms: u64,
    pub settle_delay_ms: u64,
    pub network_url: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            connections: true,
            close_on_complete: true,
            wait_timeout_ms: WAIT_FOR_ELEMENT_TIMEOUT.as_millis() as u64,
            sign_in_timeout_ms: SIGN_IN_TIMEOUT.as_millis() as u64,
            settle_delay_ms: SETTLE_DELAY.as_millis() as u64,
            network_url: NETWORK_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// 未指定時輸出到 stdout
    pub path: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ScrapeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PROFILE_URL})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;
        static ENV_VAR_RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("static env var regex"));

        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn target_url(&self) -> Result<&str> {
        validate_required_field("target.url", &self.target.url).map(String::as_str)
    }

    /// 轉成 scraper 的建構參數
    pub fn scraper_options(&self) -> Result<ScraperOptions> {
        let mut options = ScraperOptions::new(self.target_url()?);
        options.connections = self.scrape.connections;
        options.close_on_complete = self.scrape.close_on_complete;
        options.wait_timeout = Duration::from_millis(self.scrape.wait_timeout_ms);
        options.sign_in_timeout = Duration::from_millis(self.scrape.sign_in_timeout_ms);
        options.settle_delay = Duration::from_millis(self.scrape.settle_delay_ms);
        options.network_url = self.scrape.network_url.clone();
        Ok(options)
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_http_url("target.url", self.target_url()?)?;
        validate_http_url("scrape.network_url", &self.scrape.network_url)?;

        if let Some(endpoint) = self.browser.existing_endpoint() {
            validate_url("browser.ws_endpoint", endpoint, &["ws", "wss", "http", "https"])?;
        }
        if let Some(path) = &self.output.path {
            validate_path("output.path", path)?;
        }

        validate_range("scrape.wait_timeout_ms", self.scrape.wait_timeout_ms, 1, 60_000)?;
        validate_range("scrape.sign_in_timeout_ms", self.scrape.sign_in_timeout_ms, 1, 60_000)?;
        validate_range("scrape.settle_delay_ms", self.scrape.settle_delay_ms, 0, 60_000)?;
        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

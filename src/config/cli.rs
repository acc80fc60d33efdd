use crate::adapters::output::OutputFormat;
use crate::config::toml_config::TomlConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "profile-scraper")]
#[command(about = "Scrape a social profile page through a signed-in browser")]
pub struct CliConfig {
    /// Profile URL to scrape (overrides `target.url`)
    #[arg(long)]
    pub url: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// DevTools endpoint of a running browser (ws://... or http://host:port)
    #[arg(long)]
    pub ws_endpoint: Option<String>,

    /// Chrome executable to launch when no endpoint is given
    #[arg(long)]
    pub chrome_path: Option<PathBuf>,

    /// Browser profile directory holding an existing session
    #[arg(long)]
    pub user_data_dir: Option<PathBuf>,

    #[arg(long, help = "Launch the browser without a window")]
    pub headless: bool,

    #[arg(long, help = "Skip the connections page")]
    pub no_connections: bool,

    #[arg(long, help = "Leave the browser open after scraping")]
    pub keep_open: bool,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// 載入設定檔（若有）並套用命令列覆蓋
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path.display());
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };
        self.apply_overrides(&mut config);
        config.browser = config.browser.resolve();
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(url) = &self.url {
            config.target.url = Some(url.clone());
        }
        if let Some(endpoint) = &self.ws_endpoint {
            config.browser.ws_endpoint = Some(endpoint.clone());
        }
        if let Some(path) = &self.chrome_path {
            config.browser.executable = Some(path.clone());
        }
        if let Some(dir) = &self.user_data_dir {
            config.browser.user_data_dir = Some(dir.clone());
        }
        if self.headless {
            config.browser.headless = true;
        }
        if self.no_connections {
            config.scrape.connections = false;
        }
        if self.keep_open {
            config.scrape.close_on_complete = false;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(output) = &self.output {
            config.output.path = Some(output.clone());
        }
    }
}

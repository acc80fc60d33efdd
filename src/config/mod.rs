pub mod browser;
#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub use browser::BrowserSettings;
#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

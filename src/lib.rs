pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

#[cfg(feature = "browser")]
pub use adapters::cdp::CdpSession;

pub use adapters::storage::LocalStorage;
pub use config::TomlConfig;
pub use core::scraper::{ProfileScraper, ScrapeOutcome, ScraperOptions};
pub use domain::model::{Accomplishment, Contact, Education, Experience, Interest, Profile};
pub use domain::ports::{BrowserSession, Locator};
pub use utils::error::{Result, ScrapeError};

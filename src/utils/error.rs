use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("No locator matched for field '{field}' ({attempts} tried)")]
    LocatorExhausted { field: String, attempts: usize },

    #[error("Element not found: {locator}")]
    ElementNotFound { locator: String },

    #[error("Timed out after {timeout:?} waiting for {locator}")]
    Timeout { locator: String, timeout: Duration },

    #[error("Browser session error: {message}")]
    SessionError { message: String },

    #[error("Script evaluation failed: {message}")]
    ScriptError { message: String },

    #[cfg(feature = "browser")]
    #[error("Browser protocol error: {0}")]
    BrowserError(#[from] chromiumoxide::error::CdpError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Locator,
    Session,
    Parsing,
    Network,
    Io,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScrapeError {
    pub fn session(message: impl Into<String>) -> Self {
        Self::SessionError {
            message: message.into(),
        }
    }

    pub fn not_found(locator: impl std::fmt::Display) -> Self {
        Self::ElementNotFound {
            locator: locator.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::LocatorExhausted { .. } | Self::ElementNotFound { .. } => ErrorCategory::Locator,
            Self::Timeout { .. } | Self::SessionError { .. } | Self::ScriptError { .. } => {
                ErrorCategory::Session
            }
            #[cfg(feature = "browser")]
            Self::BrowserError(_) => ErrorCategory::Session,
            Self::CsvError(_) | Self::SerializationError(_) => ErrorCategory::Parsing,
            Self::HttpError(_) => ErrorCategory::Network,
            Self::IoError(_) => ErrorCategory::Io,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 欄位缺失只會讓該欄位留空
            ErrorCategory::Locator | ErrorCategory::Parsing => ErrorSeverity::Low,
            ErrorCategory::Session | ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Locator => "The page markup may have changed; check the locator tables",
            ErrorCategory::Session => {
                "Make sure the browser is running, reachable and signed in, then retry"
            }
            ErrorCategory::Parsing => "Inspect the extracted text; the item was skipped",
            ErrorCategory::Network => "Check the DevTools endpoint address and that Chrome was started with --remote-debugging-port",
            ErrorCategory::Io => "Check file permissions and available disk space",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Timeout { locator, .. } => {
                format!("The page did not show {} in time", locator)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            Self::MissingConfigError { field } => {
                format!("Setting '{}' is required", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

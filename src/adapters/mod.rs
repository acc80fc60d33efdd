// Adapters layer: concrete implementations for external systems (browser, output, storage).

#[cfg(feature = "browser")]
pub mod cdp;
pub mod devtools;
pub mod output;
pub mod storage;

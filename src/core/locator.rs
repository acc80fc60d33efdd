//! Ordered-fallback element lookup: try each locator in turn, first success wins.

use crate::domain::ports::{BrowserSession, Locator};
use crate::utils::error::{Result, ScrapeError};

/// 依序嘗試每個 locator，回傳第一個找到的元素
pub async fn first_element<S: BrowserSession>(
    session: &S,
    field: &str,
    locators: &[Locator],
    scope: Option<&S::Element>,
) -> Result<S::Element> {
    for locator in locators {
        match session.find_element(locator, scope).await {
            Ok(element) => {
                tracing::debug!("{}: matched {}", field, locator);
                return Ok(element);
            }
            Err(e) => tracing::debug!("{}: {} did not match ({})", field, locator, e),
        }
    }

    Err(ScrapeError::LocatorExhausted {
        field: field.to_string(),
        attempts: locators.len(),
    })
}

/// 依序嘗試每個 locator，回傳第一個非空的元素集合
pub async fn first_elements<S: BrowserSession>(
    session: &S,
    field: &str,
    locators: &[Locator],
    scope: Option<&S::Element>,
) -> Result<Vec<S::Element>> {
    for locator in locators {
        match session.find_elements(locator, scope).await {
            Ok(elements) if !elements.is_empty() => {
                tracing::debug!("{}: {} matched {} elements", field, locator, elements.len());
                return Ok(elements);
            }
            Ok(_) => tracing::debug!("{}: {} matched nothing", field, locator),
            Err(e) => tracing::debug!("{}: {} failed ({})", field, locator, e),
        }
    }

    Err(ScrapeError::LocatorExhausted {
        field: field.to_string(),
        attempts: locators.len(),
    })
}

/// Text of the first element matched by `locators`, trimmed.
pub async fn first_text<S: BrowserSession>(
    session: &S,
    field: &str,
    locators: &[Locator],
    scope: Option<&S::Element>,
) -> Result<String> {
    let element = first_element(session, field, locators, scope).await?;
    Ok(session.text(&element).await?.trim().to_string())
}

pub mod classifier;
pub mod locator;
pub mod report;
pub mod scraper;
pub mod selectors;

pub use crate::domain::model::{Accomplishment, Contact, Education, Experience, Interest, Profile};
pub use crate::domain::ports::{BrowserSession, Locator};
pub use crate::utils::error::Result;

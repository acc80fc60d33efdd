use crate::core::classifier::{parse_education, parse_experience};
use crate::core::locator::{first_element, first_elements, first_text};
use crate::core::report::{ScrapeReport, Step, StepStatus};
use crate::core::selectors;
use crate::domain::model::{Accomplishment, Contact, Interest, Profile};
use crate::domain::ports::{BrowserSession, Locator};
use crate::utils::error::{Result, ScrapeError};
use std::time::Duration;

pub const WAIT_FOR_ELEMENT_TIMEOUT: Duration = Duration::from_secs(1);
pub const SIGN_IN_TIMEOUT: Duration = Duration::from_secs(5);
pub const SETTLE_DELAY: Duration = Duration::from_secs(1);

const MAX_HEADLINE_LEN: usize = 200;

/// 建構參數
#[derive(Debug, Clone)]
pub struct ScraperOptions {
    pub url: String,
    /// 建構時先導航到目標頁面
    pub fetch: bool,
    /// 建構時直接執行擷取
    pub scrape: bool,
    pub close_on_complete: bool,
    /// 是否前往人脈頁面讀取聯絡人
    pub connections: bool,
    pub wait_timeout: Duration,
    pub sign_in_timeout: Duration,
    pub settle_delay: Duration,
    pub network_url: String,
    /// 預先填好的欄位，不必重新擷取
    pub seed: Option<Profile>,
}

impl ScraperOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            fetch: true,
            scrape: true,
            close_on_complete: true,
            connections: true,
            wait_timeout: WAIT_FOR_ELEMENT_TIMEOUT,
            sign_in_timeout: SIGN_IN_TIMEOUT,
            settle_delay: SETTLE_DELAY,
            network_url: selectors::NETWORK_URL.to_string(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ownership {
    Owned,
    CallerOwned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    Completed(ScrapeReport),
    NotSignedIn(ScrapeReport),
}

impl ScrapeOutcome {
    pub fn report(&self) -> &ScrapeReport {
        match self {
            Self::Completed(report) | Self::NotSignedIn(report) => report,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

struct SectionItems<T> {
    items: Vec<T>,
    skipped: usize,
}

impl<T> SectionItems<T> {
    fn status(&self) -> StepStatus {
        if self.skipped > 0 {
            StepStatus::Partial {
                items: self.items.len(),
                skipped: self.skipped,
            }
        } else {
            StepStatus::Extracted {
                items: self.items.len(),
            }
        }
    }
}

/// Scrapes one profile page through a [`BrowserSession`].
///
/// Every step is best effort: a missing section or a timeout leaves the
/// matching fields empty and is recorded in the [`ScrapeReport`]. Only the
/// sign-in check stops the run early.
pub struct ProfileScraper<S: BrowserSession> {
    session: S,
    options: ScraperOptions,
    ownership: Ownership,
    profile: Profile,
    outcome: Option<ScrapeOutcome>,
    closed: bool,
}

impl<S: BrowserSession> ProfileScraper<S> {
    /// 由 scraper 擁有 session，`close_on_complete` 時會關閉它
    pub fn new(session: S, mut options: ScraperOptions) -> Self {
        let mut profile = options.seed.take().unwrap_or_default();
        if profile.linkedin_url.is_none() {
            profile.linkedin_url = Some(options.url.clone());
        }
        Self {
            session,
            options,
            ownership: Ownership::Owned,
            profile,
            outcome: None,
            closed: false,
        }
    }

    /// 呼叫端提供的 session，永遠不會被 scraper 關閉
    pub fn with_session(session: S, options: ScraperOptions) -> Self {
        Self {
            ownership: Ownership::CallerOwned,
            ..Self::new(session, options)
        }
    }

    /// Build a scraper that owns `session`, then navigate and scrape as the
    /// `fetch` and `scrape` flags ask.
    pub async fn open(session: S, options: ScraperOptions) -> Result<Self> {
        Self::new(session, options).start().await
    }

    pub async fn open_with_session(session: S, options: ScraperOptions) -> Result<Self> {
        Self::with_session(session, options).start().await
    }

    async fn start(mut self) -> Result<Self> {
        if self.options.fetch {
            tracing::info!("🌐 Navigating to {}", self.options.url);
            self.session.navigate(&self.options.url).await?;
        }
        if self.options.scrape {
            self.scrape().await;
        }
        Ok(self)
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn profile_mut(&mut self) -> &mut Profile {
        &mut self.profile
    }

    pub fn into_profile(self) -> Profile {
        self.profile
    }

    /// 取回 session（呼叫端自行負責關閉）
    pub fn into_session(self) -> S {
        self.session
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// 最近一次 `scrape` 的結果
    pub fn outcome(&self) -> Option<&ScrapeOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn company(&self) -> Option<&str> {
        self.profile.company()
    }

    pub fn job_title(&self) -> Option<&str> {
        self.profile.job_title()
    }

    pub async fn is_signed_in(&self) -> bool {
        let marker = Locator::class_name(selectors::VERIFY_LOGIN_CLASS);
        self.session
            .wait_for(&marker, self.options.sign_in_timeout)
            .await
            .is_ok()
    }

    /// Run every extraction step against the current page.
    ///
    /// Never fails: problems are logged and recorded per step.
    pub async fn scrape(&mut self) -> ScrapeOutcome {
        let mut report = ScrapeReport::default();

        if !self.is_signed_in().await {
            tracing::warn!("❌ You are not logged in!");
            report.record(
                Step::SignIn,
                StepStatus::Absent {
                    reason: "not signed in".to_string(),
                },
            );
            let outcome = ScrapeOutcome::NotSignedIn(report);
            self.outcome = Some(outcome.clone());
            return outcome;
        }
        report.record(Step::SignIn, StepStatus::Done);

        self.scrape_logged_in(&mut report).await;
        let outcome = ScrapeOutcome::Completed(report);
        self.outcome = Some(outcome.clone());
        outcome
    }

    async fn scrape_logged_in(&mut self, report: &mut ScrapeReport) {
        let result = self.wait_for_main().await;
        record(report, Step::WaitForMain, result);

        let result = self.get_name_and_location().await;
        record(report, Step::NameAndLocation, result);

        let result = self.get_headline().await;
        record(report, Step::Headline, result);

        self.profile.open_to_work = self.is_open_to_work().await;
        report.record(Step::OpenToWork, StepStatus::Done);

        let result = self.get_about().await;
        record(report, Step::About, result);

        let result = self.scroll_page().await;
        record(report, Step::Scroll, result);

        let result = self.get_experiences().await;
        record(report, Step::Experience, result);

        let result = self.get_educations().await;
        record(report, Step::Education, result);

        let result = self.get_interests().await;
        record(report, Step::Interests, result);

        let result = self.get_accomplishments().await;
        record(report, Step::Accomplishments, result);

        if self.options.connections {
            let result = self.get_contacts().await;
            record(report, Step::Contacts, result);
        } else {
            report.record(Step::Contacts, StepStatus::Skipped);
        }

        if self.options.close_on_complete {
            let result = self.close().await;
            record(report, Step::Teardown, result);
        } else {
            report.record(Step::Teardown, StepStatus::Skipped);
        }

        tracing::info!(
            "✅ Scraped {}: {} experience(s), {} education(s), {} contact(s)",
            self.profile.name.as_deref().unwrap_or("<unknown>"),
            self.profile.experiences.len(),
            self.profile.educations.len(),
            self.profile.contacts.len()
        );
    }

    async fn wait_for_main(&self) -> Result<StepStatus> {
        let main = Locator::tag(selectors::TOP_CARD_TAG);
        self.session.wait_for(&main, self.options.wait_timeout).await?;
        tokio::time::sleep(self.options.settle_delay).await;
        Ok(StepStatus::Done)
    }

    pub async fn get_name_and_location(&mut self) -> Result<StepStatus> {
        let session = &self.session;
        let panel = first_element(session, "top panel", &selectors::top_panel(), None).await?;

        let name = first_text(session, "name", &selectors::name_in_panel(), Some(&panel)).await?;
        self.profile.name = Some(name);

        let location =
            first_text(session, "location", &selectors::location_in_panel(), Some(&panel)).await?;
        self.profile.set_location(location);
        Ok(StepStatus::Extracted { items: 2 })
    }

    pub async fn get_headline(&mut self) -> Result<StepStatus> {
        for locator in selectors::headline() {
            let elements = match self.session.find_elements(&locator, None).await {
                Ok(elements) => elements,
                Err(e) => {
                    tracing::debug!("headline: {} failed ({})", locator, e);
                    continue;
                }
            };

            for element in &elements {
                let Ok(text) = self.session.text(element).await else {
                    continue;
                };
                let text = text.trim();
                if is_headline_candidate(text, self.profile.name.as_deref()) {
                    self.profile.headline = Some(text.to_string());
                    return Ok(StepStatus::Extracted { items: 1 });
                }
            }
        }

        self.profile.headline = None;
        Err(ScrapeError::LocatorExhausted {
            field: "headline".to_string(),
            attempts: selectors::headline().len(),
        })
    }

    pub async fn is_open_to_work(&self) -> bool {
        let session = &self.session;
        let title = async {
            let picture =
                first_element(session, "profile picture", &selectors::profile_picture(), None)
                    .await?;
            let img = first_element(session, "picture image", &selectors::picture_image(), Some(&picture))
                .await?;
            session.attribute(&img, "title").await
        };

        match title.await {
            Ok(Some(title)) => title.contains(selectors::OPEN_TO_WORK_MARKER),
            Ok(None) => false,
            Err(e) => {
                tracing::debug!("open-to-work: {}", e);
                false
            }
        }
    }

    pub async fn get_about(&mut self) -> Result<StepStatus> {
        let session = &self.session;
        let about = async {
            let anchor = first_element(session, "about", &selectors::about_anchor(), None).await?;
            let parent = first_element(session, "about parent", &selectors::parent(), Some(&anchor)).await?;
            first_text(session, "about body", &selectors::about_body(), Some(&parent)).await
        };

        match about.await {
            Ok(text) => {
                self.profile.about = vec![text];
                Ok(StepStatus::Extracted { items: 1 })
            }
            Err(e) => {
                self.profile.about.clear();
                Err(e)
            }
        }
    }

    /// 捲動頁面，觸發延遲載入的區塊
    async fn scroll_page(&self) -> Result<StepStatus> {
        for script in selectors::SCROLL_SCRIPTS {
            self.session.execute_script(script).await?;
        }
        Ok(StepStatus::Done)
    }

    pub async fn get_experiences(&mut self) -> Result<StepStatus> {
        let section = self
            .collect_section(
                "experience",
                &selectors::experience_section(),
                &selectors::experience_items(),
                parse_experience,
            )
            .await?;
        let status = section.status();
        for experience in section.items {
            self.profile.add_experience(experience);
        }
        Ok(status)
    }

    pub async fn get_educations(&mut self) -> Result<StepStatus> {
        let section = self
            .collect_section(
                "education",
                &selectors::education_section(),
                &selectors::education_items(),
                parse_education,
            )
            .await?;
        let status = section.status();
        for education in section.items {
            self.profile.add_education(education);
        }
        Ok(status)
    }

    /// Find the section container, enumerate its items and parse each one.
    ///
    /// Container and item lookups are independent first-match-wins searches.
    /// An item whose text cannot be read is skipped; blank or too-short items
    /// are dropped by `parse` without counting as failures.
    async fn collect_section<T>(
        &self,
        field: &str,
        containers: &[Locator],
        items: &[Locator],
        parse: fn(&str) -> Option<T>,
    ) -> Result<SectionItems<T>> {
        let session = &self.session;
        let section = first_element(session, &format!("{} section", field), containers, None).await?;
        let elements =
            first_elements(session, &format!("{} items", field), items, Some(&section)).await?;

        let mut collected = SectionItems {
            items: Vec::with_capacity(elements.len()),
            skipped: 0,
        };
        for (i, element) in elements.iter().enumerate() {
            match session.text(element).await {
                Ok(text) => {
                    if let Some(item) = parse(text.trim()) {
                        collected.items.push(item);
                    }
                }
                Err(e) => {
                    tracing::warn!("Error parsing {} item {}: {}", field, i, e);
                    collected.skipped += 1;
                }
            }
        }
        Ok(collected)
    }

    pub async fn get_interests(&mut self) -> Result<StepStatus> {
        let session = &self.session;
        let container = session
            .wait_for(&selectors::interests_section(), self.options.wait_timeout)
            .await?;
        let elements =
            first_elements(session, "interest items", &selectors::interest_items(), Some(&container))
                .await?;

        let mut collected = SectionItems {
            items: Vec::new(),
            skipped: 0,
        };
        for element in &elements {
            match first_text(session, "interest title", &selectors::heading(), Some(element)).await {
                Ok(title) => collected.items.push(Interest::new(title)),
                Err(e) => {
                    tracing::debug!("interest skipped: {}", e);
                    collected.skipped += 1;
                }
            }
        }

        let status = collected.status();
        for interest in collected.items {
            self.profile.add_interest(interest);
        }
        Ok(status)
    }

    pub async fn get_accomplishments(&mut self) -> Result<StepStatus> {
        let session = &self.session;
        let container = session
            .wait_for(&selectors::accomplishments_section(), self.options.wait_timeout)
            .await?;
        let blocks = first_elements(
            session,
            "accomplishment blocks",
            &selectors::accomplishment_blocks(),
            Some(&container),
        )
        .await?;

        let mut collected = SectionItems {
            items: Vec::new(),
            skipped: 0,
        };
        for block in &blocks {
            match self.read_accomplishment_block(block).await {
                Ok(mut items) => collected.items.append(&mut items),
                Err(e) => {
                    tracing::debug!("accomplishment block skipped: {}", e);
                    collected.skipped += 1;
                }
            }
        }

        let status = collected.status();
        for accomplishment in collected.items {
            self.profile.add_accomplishment(accomplishment);
        }
        Ok(status)
    }

    async fn read_accomplishment_block(&self, block: &S::Element) -> Result<Vec<Accomplishment>> {
        let session = &self.session;
        let category = first_text(session, "accomplishment category", &selectors::heading(), Some(block)).await?;
        let list = first_element(session, "accomplishment list", &selectors::list(), Some(block)).await?;

        let mut items = Vec::new();
        let lis = or_none(
            first_elements(session, "accomplishment items", &selectors::list_items(), Some(&list)).await,
        )?;
        for li in &lis {
            let title = session.text(li).await?;
            items.push(Accomplishment::new(category.clone(), title.trim()));
        }
        Ok(items)
    }

    /// Leaves the profile page for the network page; callers that need the
    /// profile page again must navigate back themselves.
    pub async fn get_contacts(&mut self) -> Result<StepStatus> {
        let session = &self.session;
        tracing::info!("🔗 Loading connections from {}", self.options.network_url);
        session.navigate(&self.options.network_url).await?;
        let container = session
            .wait_for(&selectors::connections_container(), self.options.wait_timeout)
            .await?;

        let mut collected = SectionItems {
            items: Vec::new(),
            skipped: 0,
        };
        let cards = or_none(
            first_elements(session, "connection cards", &selectors::connection_cards(), Some(&container))
                .await,
        )?;
        for card in &cards {
            match self.read_contact_card(card).await {
                Ok(contact) => collected.items.push(contact),
                Err(e) => {
                    tracing::debug!("connection card skipped: {}", e);
                    collected.skipped += 1;
                }
            }
        }

        let status = collected.status();
        for contact in collected.items {
            self.profile.add_contact(contact);
        }
        Ok(status)
    }

    async fn read_contact_card(&self, card: &S::Element) -> Result<Contact> {
        let session = &self.session;
        let anchor = first_element(session, "connection link", &selectors::connection_link(), Some(card)).await?;
        let url = session.attribute(&anchor, "href").await?;

        let details =
            first_element(session, "connection details", &selectors::connection_details(), Some(card)).await?;
        let name = first_text(session, "connection name", &selectors::connection_name(), Some(&details)).await?;
        let occupation = first_text(
            session,
            "connection occupation",
            &selectors::connection_occupation(),
            Some(&details),
        )
        .await?;

        Ok(Contact {
            name,
            occupation,
            url,
        })
    }

    /// 關閉自己擁有的 session；呼叫端提供的 session 不動
    pub async fn close(&mut self) -> Result<StepStatus> {
        match self.ownership {
            Ownership::CallerOwned => {
                tracing::debug!("Session belongs to the caller, leaving it open");
                Ok(StepStatus::Skipped)
            }
            Ownership::Owned if self.closed => Ok(StepStatus::Skipped),
            Ownership::Owned => {
                self.session.quit().await?;
                self.closed = true;
                Ok(StepStatus::Done)
            }
        }
    }
}

/// 容器存在但沒有任何項目時視為空集合
fn or_none<T>(result: Result<Vec<T>>) -> Result<Vec<T>> {
    match result {
        Err(ScrapeError::LocatorExhausted { .. }) => Ok(Vec::new()),
        other => other,
    }
}

fn record(report: &mut ScrapeReport, step: Step, result: Result<StepStatus>) {
    let status = match result {
        Ok(status) => status,
        Err(
            e @ (ScrapeError::LocatorExhausted { .. }
            | ScrapeError::ElementNotFound { .. }
            | ScrapeError::Timeout { .. }),
        ) => StepStatus::Absent {
            reason: e.to_string(),
        },
        Err(e) => StepStatus::Failed {
            error: e.to_string(),
        },
    };
    report.record(step, status);
}

/// 排除看起來不像標題的文字（網址、純數字、人脈數、名字本身）
pub fn is_headline_candidate(text: &str, name: Option<&str>) -> bool {
    let lower = text.to_lowercase();
    !text.is_empty()
        && text.chars().count() < MAX_HEADLINE_LEN
        && !text.starts_with("http")
        && !text.chars().all(|c| c.is_ascii_digit())
        && !text.contains('·')
        && !lower.contains("connections")
        && !lower.contains("followers")
        && Some(text) != name
}

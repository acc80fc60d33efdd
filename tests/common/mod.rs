#![allow(dead_code)]

use async_trait::async_trait;
use profile_scraper::core::selectors;
use profile_scraper::utils::error::{Result, ScrapeError};
use profile_scraper::{BrowserSession, Locator};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const PROFILE_URL: &str = "https://www.linkedin.com/in/ada-lovelace";
pub const NETWORK_URL: &str = "https://www.linkedin.com/mynetwork/invite-connect/connections/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeElement {
    pub page: String,
    pub id: usize,
}

#[derive(Debug, Default)]
struct FakeNode {
    text: String,
    attributes: HashMap<String, String>,
}

/// A page whose query results are scripted up front.
#[derive(Debug, Default)]
pub struct FakePage {
    nodes: Vec<FakeNode>,
    queries: HashMap<(Option<usize>, Locator), Vec<usize>>,
    broken_text: HashSet<usize>,
}

impl FakePage {
    pub fn node(&mut self, text: &str) -> usize {
        self.nodes.push(FakeNode {
            text: text.to_string(),
            attributes: HashMap::new(),
        });
        self.nodes.len() - 1
    }

    pub fn node_with_attr(&mut self, text: &str, name: &str, value: &str) -> usize {
        let id = self.node(text);
        self.nodes[id]
            .attributes
            .insert(name.to_string(), value.to_string());
        id
    }

    /// `locator` evaluated in `scope` returns `ids`.
    pub fn on(&mut self, scope: Option<usize>, locator: Locator, ids: Vec<usize>) {
        self.queries.insert((scope, locator), ids);
    }

    /// 讀取文字時會失敗的節點
    pub fn break_text(&mut self, id: usize) {
        self.broken_text.insert(id);
    }
}

pub struct ScriptedSession {
    pages: HashMap<String, FakePage>,
    current: Mutex<String>,
    pub navigations: Mutex<Vec<String>>,
    pub scripts: Mutex<Vec<String>>,
    pub queries: AtomicUsize,
    pub quit_calls: AtomicUsize,
}

impl ScriptedSession {
    pub fn new(start_url: &str) -> Self {
        Self {
            pages: HashMap::new(),
            current: Mutex::new(start_url.to_string()),
            navigations: Mutex::new(Vec::new()),
            scripts: Mutex::new(Vec::new()),
            queries: AtomicUsize::new(0),
            quit_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_page(mut self, url: &str, page: FakePage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn quit_count(&self) -> usize {
        self.quit_calls.load(Ordering::SeqCst)
    }

    fn current_url(&self) -> String {
        self.current.lock().unwrap().clone()
    }

    fn lookup(&self, locator: &Locator, scope: Option<&FakeElement>) -> Vec<FakeElement> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let url = self.current_url();
        let Some(page) = self.pages.get(&url) else {
            return Vec::new();
        };
        // 不同頁面的 scope 已失效
        if scope.is_some_and(|s| s.page != url) {
            return Vec::new();
        }
        page.queries
            .get(&(scope.map(|s| s.id), locator.clone()))
            .map(|ids| {
                ids.iter()
                    .map(|&id| FakeElement {
                        page: url.clone(),
                        id,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn node(&self, element: &FakeElement) -> Result<&FakeNode> {
        self.pages
            .get(&element.page)
            .and_then(|p| p.nodes.get(element.id))
            .ok_or_else(|| ScrapeError::not_found(format!("node {}", element.id)))
    }
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    type Element = FakeElement;

    async fn navigate(&self, url: &str) -> Result<()> {
        self.navigations.lock().unwrap().push(url.to_string());
        *self.current.lock().unwrap() = url.to_string();
        Ok(())
    }

    async fn find_element(
        &self,
        locator: &Locator,
        scope: Option<&FakeElement>,
    ) -> Result<FakeElement> {
        self.lookup(locator, scope)
            .into_iter()
            .next()
            .ok_or_else(|| ScrapeError::not_found(locator))
    }

    async fn find_elements(
        &self,
        locator: &Locator,
        scope: Option<&FakeElement>,
    ) -> Result<Vec<FakeElement>> {
        Ok(self.lookup(locator, scope))
    }

    async fn execute_script(&self, script: &str) -> Result<serde_json::Value> {
        self.scripts.lock().unwrap().push(script.to_string());
        Ok(serde_json::Value::Null)
    }

    async fn attribute(&self, element: &FakeElement, name: &str) -> Result<Option<String>> {
        Ok(self.node(element)?.attributes.get(name).cloned())
    }

    async fn text(&self, element: &FakeElement) -> Result<String> {
        let page = self
            .pages
            .get(&element.page)
            .ok_or_else(|| ScrapeError::session("page gone"))?;
        if page.broken_text.contains(&element.id) {
            return Err(ScrapeError::session("stale element reference"));
        }
        Ok(self.node(element)?.text.clone())
    }

    async fn quit(&mut self) -> Result<()> {
        self.quit_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    // 測試不需要真的等待
    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<FakeElement> {
        self.find_element(locator, None)
            .await
            .map_err(|_| ScrapeError::Timeout {
                locator: locator.to_string(),
                timeout,
            })
    }
}

/// Page with only the sign-in marker and `main`.
pub fn signed_in_page() -> FakePage {
    let mut page = FakePage::default();
    let nav = page.node("Home");
    let main = page.node("");
    page.on(None, Locator::class_name(selectors::VERIFY_LOGIN_CLASS), vec![nav]);
    page.on(None, Locator::tag(selectors::TOP_CARD_TAG), vec![main]);
    page
}

/// A full profile page: every field is reachable through the first locator
/// of its table.
pub fn full_profile_page() -> FakePage {
    let mut page = signed_in_page();

    let panel = page.node("");
    let name = page.node("Ada Lovelace");
    let location = page.node("London, United Kingdom");
    page.on(None, selectors::top_panel()[0].clone(), vec![panel]);
    page.on(Some(panel), selectors::name_in_panel()[0].clone(), vec![name]);
    page.on(Some(panel), selectors::location_in_panel()[0].clone(), vec![location]);

    let counter = page.node("500+ connections");
    let headline = page.node("Analyst at Analytical Engines");
    page.on(None, selectors::headline()[0].clone(), vec![counter, headline]);

    let picture = page.node("");
    let img = page.node_with_attr("", "title", "Ada #OPEN_TO_WORK");
    page.on(None, selectors::profile_picture()[0].clone(), vec![picture]);
    page.on(Some(picture), selectors::picture_image()[0].clone(), vec![img]);

    let anchor = page.node("");
    let about_parent = page.node("");
    let about = page.node("  Poet of mathematics.  ");
    page.on(None, selectors::about_anchor()[0].clone(), vec![anchor]);
    page.on(Some(anchor), selectors::parent()[0].clone(), vec![about_parent]);
    page.on(Some(about_parent), selectors::about_body()[0].clone(), vec![about]);

    let exp_section = page.node("");
    let exp_1 = page.node(
        "Software Engineer\nAcme Corp\nJan 2020 – Mar 2022\nSan Francisco, CA\nBuilt things",
    );
    let exp_2 = page.node("Analyst\nAnalytical Engines\n2 yrs 3 mos\nRemote");
    page.on(None, selectors::experience_section()[0].clone(), vec![exp_section]);
    page.on(Some(exp_section), selectors::experience_items()[0].clone(), vec![exp_1, exp_2]);

    let edu_section = page.node("");
    let edu_1 = page.node("Acme Corp");
    let edu_2 = page.node("University of London\nMathematics\n2012 - 2016");
    page.on(None, selectors::education_section()[0].clone(), vec![edu_section]);
    page.on(Some(edu_section), selectors::education_items()[0].clone(), vec![edu_1, edu_2]);

    let interests = page.node("");
    let interest = page.node("");
    let interest_title = page.node(" Poetry ");
    page.on(None, selectors::interests_section(), vec![interests]);
    page.on(Some(interests), selectors::interest_items()[0].clone(), vec![interest]);
    page.on(Some(interest), selectors::heading()[0].clone(), vec![interest_title]);

    let accomplishments = page.node("");
    let block = page.node("");
    let category = page.node("Publications");
    let list = page.node("");
    let li_1 = page.node("Notes on the Analytical Engine");
    let li_2 = page.node("Sketch of the Engine ");
    page.on(None, selectors::accomplishments_section(), vec![accomplishments]);
    page.on(Some(accomplishments), selectors::accomplishment_blocks()[0].clone(), vec![block]);
    page.on(Some(block), selectors::heading()[0].clone(), vec![category]);
    page.on(Some(block), selectors::list()[0].clone(), vec![list]);
    page.on(Some(list), selectors::list_items()[0].clone(), vec![li_1, li_2]);

    page
}

pub fn network_page() -> FakePage {
    let mut page = FakePage::default();
    let container = page.node("");
    let card = page.node("");
    let link = page.node_with_attr("", "href", "https://www.linkedin.com/in/charles-babbage");
    let details = page.node("");
    let name = page.node("Charles Babbage ");
    let occupation = page.node(" Inventor");
    page.on(None, selectors::connections_container(), vec![container]);
    page.on(Some(container), selectors::connection_cards()[0].clone(), vec![card]);
    page.on(Some(card), selectors::connection_link()[0].clone(), vec![link]);
    page.on(Some(card), selectors::connection_details()[0].clone(), vec![details]);
    page.on(Some(details), selectors::connection_name()[0].clone(), vec![name]);
    page.on(Some(details), selectors::connection_occupation()[0].clone(), vec![occupation]);
    page
}

pub fn fast_options() -> profile_scraper::ScraperOptions {
    let mut options = profile_scraper::ScraperOptions::new(PROFILE_URL);
    options.settle_delay = Duration::ZERO;
    options.network_url = NETWORK_URL.to_string();
    options
}

//! Locator tables for each profile field, in priority order.

use crate::domain::ports::Locator;

/// 登入後才會出現的全域導覽列
pub const VERIFY_LOGIN_CLASS: &str = "global-nav__primary-link";

pub const TOP_CARD_TAG: &str = "main";

pub const NETWORK_URL: &str = "https://www.linkedin.com/mynetwork/invite-connect/connections/";

pub const SCROLL_SCRIPTS: [&str; 2] = [
    "window.scrollTo(0, Math.ceil(document.body.scrollHeight/2));",
    "window.scrollTo(0, Math.ceil(document.body.scrollHeight/1.5));",
];

pub const OPEN_TO_WORK_MARKER: &str = "#OPEN_TO_WORK";

pub fn top_panel() -> Vec<Locator> {
    vec![Locator::xpath("//*[@class='mt2 relative']")]
}

pub fn name_in_panel() -> Vec<Locator> {
    vec![Locator::tag("h1")]
}

pub fn location_in_panel() -> Vec<Locator> {
    vec![Locator::xpath(
        ".//*[@class='text-body-small inline t-black--light break-words']",
    )]
}

pub fn headline() -> Vec<Locator> {
    vec![
        Locator::xpath("//div[contains(@class, 'text-body-medium') and contains(@class, 'break-words')]"),
        Locator::xpath("//div[@class='text-body-medium break-words']"),
        Locator::xpath("//*[contains(@class, 'pv-text-details__left-panel')]//div[contains(@class, 'text-body-medium')]"),
        Locator::xpath("//section[contains(@class, 'pv-top-card')]//div[contains(@class, 'text-body-medium')]"),
    ]
}

pub fn profile_picture() -> Vec<Locator> {
    vec![Locator::class_name("pv-top-card-profile-picture")]
}

pub fn picture_image() -> Vec<Locator> {
    vec![Locator::tag("img")]
}

pub fn about_anchor() -> Vec<Locator> {
    vec![Locator::id("about")]
}

pub fn parent() -> Vec<Locator> {
    vec![Locator::xpath("..")]
}

pub fn about_body() -> Vec<Locator> {
    vec![Locator::class_name("display-flex")]
}

/// Containers of a titled section such as "Experience" or "Education".
pub fn section_containers(keyword: &str, title: &str) -> Vec<Locator> {
    vec![
        Locator::xpath(format!("//section[contains(@data-section, '{}')]", keyword)),
        Locator::xpath(format!("//section[.//span[contains(text(), '{}')]]", title)),
        Locator::xpath(format!("//div[@id='{}']", keyword)),
        Locator::xpath(format!("//section[.//h2[contains(text(), '{}')]]", title)),
        Locator::xpath(format!(
            "//div[contains(@class, '{}')]//div[contains(@class, 'pvs-list__container')]",
            keyword
        )),
        Locator::xpath(format!("//main//section[.//span[text()='{}']]", title)),
    ]
}

/// Repeated entries inside a section container.
pub fn section_items(keyword: &str) -> Vec<Locator> {
    vec![
        Locator::xpath(".//div[contains(@class, 'pvs-list__paged-list-item')]"),
        Locator::xpath(".//li[contains(@class, 'pvs-list__paged-list-item')]"),
        Locator::xpath(format!(".//div[contains(@class, '{}-item')]", keyword)),
        Locator::xpath(".//div[@data-view-name='profile-component-entity']"),
    ]
}

pub fn experience_section() -> Vec<Locator> {
    section_containers("experience", "Experience")
}

pub fn experience_items() -> Vec<Locator> {
    section_items("experience")
}

pub fn education_section() -> Vec<Locator> {
    section_containers("education", "Education")
}

pub fn education_items() -> Vec<Locator> {
    section_items("education")
}

pub fn interests_section() -> Locator {
    Locator::xpath(
        "//*[@class='pv-profile-section pv-interests-section artdeco-container-card artdeco-card ember-view']",
    )
}

pub fn interest_items() -> Vec<Locator> {
    vec![Locator::xpath(
        ".//*[@class='pv-interest-entity pv-profile-section__card-item ember-view']",
    )]
}

pub fn accomplishments_section() -> Locator {
    Locator::xpath(
        "//*[@class='pv-profile-section pv-accomplishments-section artdeco-container-card artdeco-card ember-view']",
    )
}

pub fn accomplishment_blocks() -> Vec<Locator> {
    vec![Locator::xpath(
        ".//div[@class='pv-accomplishments-block__content break-words']",
    )]
}

pub fn heading() -> Vec<Locator> {
    vec![Locator::tag("h3")]
}

pub fn list() -> Vec<Locator> {
    vec![Locator::tag("ul")]
}

pub fn list_items() -> Vec<Locator> {
    vec![Locator::tag("li"), Locator::xpath("./li")]
}

pub fn connections_container() -> Locator {
    Locator::class_name("mn-connections")
}

pub fn connection_cards() -> Vec<Locator> {
    vec![
        Locator::class_name("mn-connection-card"),
        Locator::xpath(".//li[contains(@class, 'mn-connection-card')]"),
    ]
}

pub fn connection_link() -> Vec<Locator> {
    vec![Locator::class_name("mn-connection-card__link")]
}

pub fn connection_details() -> Vec<Locator> {
    vec![Locator::class_name("mn-connection-card__details")]
}

pub fn connection_name() -> Vec<Locator> {
    vec![Locator::class_name("mn-connection-card__name")]
}

pub fn connection_occupation() -> Vec<Locator> {
    vec![Locator::class_name("mn-connection-card__occupation")]
}

//! Line heuristics that turn the visible text of one section item into fields.
//!
//! The rules are applied in a fixed order and are not a calendar or address
//! parser. A description line that happens to mention a month or contain a
//! comma is misread as a date or a location; that order is kept as is.

use crate::domain::model::{Education, Experience};
use regex::Regex;
use std::sync::LazyLock;

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const DURATION_WORDS: [&str; 4] = ["yrs", "mos", "year", "month"];

pub const LOCATION_KEYWORDS: [&str; 2] = ["remote", "hybrid"];

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19|20)\d{2}\b").expect("static year regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Duration,
    Location,
    Description,
}

/// 分類規則；教育經歷額外把含年份的行視為日期
#[derive(Debug, Clone, Copy, Default)]
pub struct LineRules {
    pub years_are_dates: bool,
}

impl LineRules {
    pub const EXPERIENCE: LineRules = LineRules {
        years_are_dates: false,
    };
    pub const EDUCATION: LineRules = LineRules {
        years_are_dates: true,
    };

    pub fn classify(&self, line: &str) -> LineKind {
        if is_duration_line(line) || (self.years_are_dates && YEAR_RE.is_match(line)) {
            LineKind::Duration
        } else if is_location_line(line) {
            LineKind::Location
        } else {
            LineKind::Description
        }
    }
}

pub fn is_duration_line(line: &str) -> bool {
    MONTH_ABBREVIATIONS.iter().any(|m| line.contains(m))
        || DURATION_WORDS.iter().any(|w| line.contains(w))
}

pub fn is_location_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    line.contains(',') || LOCATION_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// 一個項目拆出來的欄位
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBlock {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub duration: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

/// Trimmed, non-empty lines of `text`.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

pub fn classify_block(text: &str, rules: LineRules) -> TextBlock {
    let lines = split_lines(text);
    let mut block = TextBlock {
        primary: lines.first().map(|s| s.to_string()),
        secondary: lines.get(1).map(|s| s.to_string()),
        ..Default::default()
    };

    let mut description: Vec<&str> = Vec::new();
    for line in lines.iter().skip(2) {
        match rules.classify(line) {
            LineKind::Duration => block.duration = Some(line.to_string()),
            LineKind::Location => block.location = Some(line.to_string()),
            LineKind::Description => description.push(line),
        }
    }

    let description = description.join(" ");
    let description = description.trim();
    if !description.is_empty() {
        block.description = Some(description.to_string());
    }
    block
}

/// Split a date range on an en-dash or hyphen.
///
/// Only the first two parts are used; with fewer than two both ends are
/// `None`. Empty parts are `None` as well.
pub fn split_date_range(duration: &str) -> (Option<String>, Option<String>) {
    let normalized = duration.replace('–', "-");
    let parts: Vec<&str> = normalized.split('-').collect();
    if parts.len() < 2 {
        return (None, None);
    }

    let part = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };
    (part(parts[0]), part(parts[1]))
}

/// 經歷項目至少要有兩行（職稱與公司）
pub fn parse_experience(text: &str) -> Option<Experience> {
    let block = classify_block(text, LineRules::EXPERIENCE);
    block.secondary.as_ref()?;

    let (from_date, to_date) = block
        .duration
        .as_deref()
        .map(split_date_range)
        .unwrap_or((None, None));

    Some(Experience {
        position_title: block.primary,
        institution_name: block.secondary,
        from_date,
        to_date,
        duration: block.duration,
        location: block.location,
        description: block.description,
        linkedin_url: None,
    })
}

/// 教育項目只需要一行（學校名稱）
pub fn parse_education(text: &str) -> Option<Education> {
    let block = classify_block(text, LineRules::EDUCATION);
    block.primary.as_ref()?;

    let (from_date, to_date) = block
        .duration
        .as_deref()
        .map(split_date_range)
        .unwrap_or((None, None));

    Some(Education {
        institution_name: block.primary,
        degree: block.secondary,
        from_date,
        to_date,
        location: block.location,
        description: block.description,
        linkedin_url: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_end_to_end() {
        let text = "Software Engineer\nAcme Corp\nJan 2020 – Mar 2022\nSan Francisco, CA\nBuilt things";
        let exp = parse_experience(text).unwrap();

        assert_eq!(
            exp,
            Experience {
                position_title: Some("Software Engineer".to_string()),
                institution_name: Some("Acme Corp".to_string()),
                from_date: Some("Jan 2020".to_string()),
                to_date: Some("Mar 2022".to_string()),
                duration: Some("Jan 2020 – Mar 2022".to_string()),
                location: Some("San Francisco, CA".to_string()),
                description: Some("Built things".to_string()),
                linkedin_url: None,
            }
        );
    }

    #[test]
    fn test_single_line_education() {
        let edu = parse_education("Acme Corp").unwrap();
        assert_eq!(edu.institution_name.as_deref(), Some("Acme Corp"));
        assert_eq!(edu.degree, None);
        assert_eq!(edu.from_date, None);
        assert_eq!(edu.to_date, None);
        assert_eq!(edu.description, None);
    }

    #[test]
    fn test_single_line_experience_is_skipped() {
        assert!(parse_experience("Acme Corp").is_none());
        assert!(parse_experience("  \n \n").is_none());
        assert!(parse_education("   ").is_none());
    }

    #[test]
    fn test_primary_and_secondary_are_trimmed() {
        let block = classify_block("  \n  Staff Engineer  \n\n  Initech \n", LineRules::EXPERIENCE);
        assert_eq!(block.primary.as_deref(), Some("Staff Engineer"));
        assert_eq!(block.secondary.as_deref(), Some("Initech"));
        assert_eq!(block.duration, None);
    }

    #[test]
    fn test_split_date_range() {
        assert_eq!(
            split_date_range("Jan 2020 - Present"),
            (Some("Jan 2020".to_string()), Some("Present".to_string()))
        );
        assert_eq!(split_date_range("3 yrs 2 mos"), (None, None));
        assert_eq!(split_date_range(""), (None, None));
        assert_eq!(
            split_date_range("2015 – 2019 - extra"),
            (Some("2015".to_string()), Some("2019".to_string()))
        );
        assert_eq!(split_date_range("2015 -"), (Some("2015".to_string()), None));
    }

    #[test]
    fn test_duration_wins_over_location() {
        // 同時含月份與逗號時，期間判斷優先
        assert_eq!(LineRules::EXPERIENCE.classify("Jun 2019, Berlin"), LineKind::Duration);
        assert_eq!(LineRules::EXPERIENCE.classify("Berlin, Germany"), LineKind::Location);
        assert_eq!(LineRules::EXPERIENCE.classify("Fully REMOTE"), LineKind::Location);
        assert_eq!(LineRules::EXPERIENCE.classify("Hybrid"), LineKind::Location);
        assert_eq!(LineRules::EXPERIENCE.classify("Shipped the billing system"), LineKind::Description);
    }

    #[test]
    fn test_location_lines_never_reach_description() {
        let text = "Engineer\nAcme\nled the team, shipped v2\nRemote\nwrote docs\nhybrid setup";
        let exp = parse_experience(text).unwrap();
        assert_eq!(exp.description.as_deref(), Some("wrote docs"));
        assert_eq!(exp.location.as_deref(), Some("hybrid setup"));
    }

    #[test]
    fn test_description_keeps_order() {
        let text = "Engineer\nAcme\nfirst line\n2 yrs\nsecond line\nthird line";
        let exp = parse_experience(text).unwrap();
        assert_eq!(exp.description.as_deref(), Some("first line second line third line"));
        assert_eq!(exp.duration.as_deref(), Some("2 yrs"));
        assert_eq!(exp.from_date, None);
        assert_eq!(exp.to_date, None);
    }

    #[test]
    fn test_education_year_lines_are_dates() {
        let text = "State University\nBSc Computer Science\n2012 - 2016\nRobotics club";
        let edu = parse_education(text).unwrap();
        assert_eq!(edu.degree.as_deref(), Some("BSc Computer Science"));
        assert_eq!(edu.from_date.as_deref(), Some("2012"));
        assert_eq!(edu.to_date.as_deref(), Some("2016"));
        assert_eq!(edu.description.as_deref(), Some("Robotics club"));

        // 經歷不套用年份規則
        assert_eq!(LineRules::EXPERIENCE.classify("2012 - 2016"), LineKind::Description);
    }
}

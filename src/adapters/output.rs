use crate::core::report::ScrapeReport;
use crate::domain::model::Profile;
use crate::utils::error::{Result, ScrapeError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// JSON 輸出的外層結構
#[derive(Debug, Serialize)]
pub struct ScrapeOutput<'a> {
    pub scraped_at: DateTime<Utc>,
    pub signed_in: bool,
    pub company: Option<&'a str>,
    pub job_title: Option<&'a str>,
    pub profile: &'a Profile,
    pub report: &'a ScrapeReport,
}

impl<'a> ScrapeOutput<'a> {
    pub fn new(profile: &'a Profile, report: &'a ScrapeReport, signed_in: bool) -> Self {
        Self {
            scraped_at: Utc::now(),
            signed_in,
            company: profile.company(),
            job_title: profile.job_title(),
            profile,
            report,
        }
    }
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    section: &'static str,
    title: Option<&'a str>,
    organization: Option<&'a str>,
    from_date: Option<&'a str>,
    to_date: Option<&'a str>,
    location: Option<&'a str>,
    description: Option<&'a str>,
}

/// One row per experience and education entry, in page order.
pub fn to_csv(profile: &Profile) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for exp in &profile.experiences {
        writer.serialize(CsvRow {
            section: "experience",
            title: exp.position_title.as_deref(),
            organization: exp.institution_name.as_deref(),
            from_date: exp.from_date.as_deref(),
            to_date: exp.to_date.as_deref(),
            location: exp.location.as_deref(),
            description: exp.description.as_deref(),
        })?;
    }
    for edu in &profile.educations {
        writer.serialize(CsvRow {
            section: "education",
            title: edu.degree.as_deref(),
            organization: edu.institution_name.as_deref(),
            from_date: edu.from_date.as_deref(),
            to_date: edu.to_date.as_deref(),
            location: edu.location.as_deref(),
            description: edu.description.as_deref(),
        })?;
    }

    writer
        .into_inner()
        .map_err(|e| ScrapeError::IoError(e.into_error()))
}

pub fn render(output: &ScrapeOutput<'_>, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_vec_pretty(output)?),
        OutputFormat::Csv => to_csv(output.profile),
        OutputFormat::Text => Ok(output.profile.to_string().into_bytes()),
    }
}

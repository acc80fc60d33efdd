use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub position_title: Option<String>,
    pub institution_name: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    /// 原始的期間行，例如 "Jan 2020 - Present · 2 yrs"
    pub duration: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub institution_name: Option<String>,
    pub degree: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
    pub title: String,
}

impl Interest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accomplishment {
    pub category: String,
    pub title: String,
}

impl Accomplishment {
    pub fn new(category: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub occupation: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub linkedin_url: Option<String>,
    pub name: Option<String>,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub about: Vec<String>,
    pub open_to_work: bool,
    pub experiences: Vec<Experience>,
    pub educations: Vec<Education>,
    pub interests: Vec<Interest>,
    pub accomplishments: Vec<Accomplishment>,
    pub contacts: Vec<Contact>,
    pub also_viewed_urls: Vec<String>,
}

impl Profile {
    pub fn new(linkedin_url: impl Into<String>) -> Self {
        Self {
            linkedin_url: Some(linkedin_url.into()),
            ..Default::default()
        }
    }

    pub fn add_about(&mut self, about: impl Into<String>) {
        self.about.push(about.into());
    }

    pub fn add_experience(&mut self, experience: Experience) {
        self.experiences.push(experience);
    }

    pub fn add_education(&mut self, education: Education) {
        self.educations.push(education);
    }

    pub fn add_interest(&mut self, interest: Interest) {
        self.interests.push(interest);
    }

    pub fn add_accomplishment(&mut self, accomplishment: Accomplishment) {
        self.accomplishments.push(accomplishment);
    }

    pub fn add_contact(&mut self, contact: Contact) {
        self.contacts.push(contact);
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = Some(location.into());
    }

    /// 最近一份工作的公司名稱
    pub fn company(&self) -> Option<&str> {
        self.experiences
            .first()
            .and_then(|e| e.institution_name.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// 最近一份工作的職稱
    pub fn job_title(&self) -> Option<&str> {
        self.experiences
            .first()
            .and_then(|e| e.position_title.as_deref())
            .filter(|s| !s.is_empty())
    }
}

fn or_dash(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", or_dash(&self.name))?;
        if let Some(location) = &self.location {
            writeln!(f, "{}", location)?;
        }
        if self.open_to_work {
            writeln!(f, "#OPEN_TO_WORK")?;
        }

        writeln!(f, "\nHeadline\n{}", or_dash(&self.headline))?;

        writeln!(f, "\nAbout")?;
        for block in &self.about {
            writeln!(f, "{}", block)?;
        }

        writeln!(f, "\nExperience")?;
        for exp in &self.experiences {
            writeln!(
                f,
                "- {} at {} ({} - {}){}",
                or_dash(&exp.position_title),
                or_dash(&exp.institution_name),
                or_dash(&exp.from_date),
                or_dash(&exp.to_date),
                exp.location
                    .as_deref()
                    .map(|l| format!(", {}", l))
                    .unwrap_or_default()
            )?;
        }

        writeln!(f, "\nEducation")?;
        for edu in &self.educations {
            writeln!(
                f,
                "- {}{} ({} - {})",
                or_dash(&edu.institution_name),
                edu.degree
                    .as_deref()
                    .map(|d| format!(", {}", d))
                    .unwrap_or_default(),
                or_dash(&edu.from_date),
                or_dash(&edu.to_date)
            )?;
        }

        writeln!(f, "\nInterest")?;
        for interest in &self.interests {
            writeln!(f, "- {}", interest.title)?;
        }

        writeln!(f, "\nAccomplishments")?;
        for acc in &self.accomplishments {
            writeln!(f, "- {}: {}", acc.category, acc.title)?;
        }

        writeln!(f, "\nContacts")?;
        for contact in &self.contacts {
            writeln!(
                f,
                "- {} ({}) {}",
                contact.name,
                contact.occupation,
                contact.url.as_deref().unwrap_or("")
            )?;
        }
        Ok(())
    }
}

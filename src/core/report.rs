use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    SignIn,
    WaitForMain,
    NameAndLocation,
    Headline,
    OpenToWork,
    About,
    Scroll,
    Experience,
    Education,
    Interests,
    Accomplishments,
    Contacts,
    Teardown,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::SignIn => "sign-in check",
            Step::WaitForMain => "main content",
            Step::NameAndLocation => "name and location",
            Step::Headline => "headline",
            Step::OpenToWork => "open-to-work flag",
            Step::About => "about",
            Step::Scroll => "scroll",
            Step::Experience => "experience",
            Step::Education => "education",
            Step::Interests => "interests",
            Step::Accomplishments => "accomplishments",
            Step::Contacts => "contacts",
            Step::Teardown => "teardown",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    Done,
    /// 成功，附帶取得的項目數
    Extracted { items: usize },
    /// 找不到對應的區塊或欄位
    Absent { reason: String },
    /// 部分項目解析失敗後被略過
    Partial { items: usize, skipped: usize },
    Failed { error: String },
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDiagnostic {
    pub step: Step,
    #[serde(flatten)]
    pub status: StepStatus,
}

/// Diagnostics collected while scraping, one entry per step in run order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeReport {
    pub steps: Vec<StepDiagnostic>,
}

impl ScrapeReport {
    pub fn record(&mut self, step: Step, status: StepStatus) {
        match &status {
            StepStatus::Done => tracing::debug!("{}: done", step),
            StepStatus::Extracted { items } => tracing::debug!("{}: {} item(s)", step, items),
            StepStatus::Absent { reason } => tracing::info!("{}: not found ({})", step, reason),
            StepStatus::Partial { items, skipped } => {
                tracing::warn!("{}: {} item(s), {} skipped", step, items, skipped)
            }
            StepStatus::Failed { error } => tracing::warn!("{}: failed ({})", step, error),
            StepStatus::Skipped => tracing::debug!("{}: skipped", step),
        }
        self.steps.push(StepDiagnostic { step, status });
    }

    pub fn status(&self, step: Step) -> Option<&StepStatus> {
        self.steps
            .iter()
            .find(|d| d.step == step)
            .map(|d| &d.status)
    }

    pub fn order(&self) -> Vec<Step> {
        self.steps.iter().map(|d| d.step).collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepDiagnostic> {
        self.steps
            .iter()
            .filter(|d| matches!(d.status, StepStatus::Failed { .. } | StepStatus::Absent { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_lookup() {
        let mut report = ScrapeReport::default();
        report.record(Step::Headline, StepStatus::Extracted { items: 1 });
        report.record(
            Step::Interests,
            StepStatus::Absent {
                reason: "container missing".to_string(),
            },
        );

        assert_eq!(report.order(), vec![Step::Headline, Step::Interests]);
        assert_eq!(report.status(Step::Headline), Some(&StepStatus::Extracted { items: 1 }));
        assert_eq!(report.status(Step::About), None);
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn test_serialized_shape() {
        let diag = StepDiagnostic {
            step: Step::Experience,
            status: StepStatus::Partial { items: 2, skipped: 1 },
        };
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"step": "experience", "status": "partial", "items": 2, "skipped": 1})
        );
    }
}

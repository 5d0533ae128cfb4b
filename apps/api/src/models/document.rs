use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of documents a user can keep.
pub const MAX_DOCUMENTS: usize = 5;

/// What kind of document the user uploaded. Rendered verbatim as a prompt heading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentLabel {
    Resume,
    #[serde(rename = "Cover Letter")]
    CoverLetter,
    Portfolio,
    #[serde(rename = "Project Summary")]
    ProjectSummary,
    #[serde(rename = "Skills Overview")]
    SkillsOverview,
    #[default]
    Other,
}

impl DocumentLabel {
    pub const ALL: [DocumentLabel; 6] = [
        DocumentLabel::Resume,
        DocumentLabel::CoverLetter,
        DocumentLabel::Portfolio,
        DocumentLabel::ProjectSummary,
        DocumentLabel::SkillsOverview,
        DocumentLabel::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentLabel::Resume => "Resume",
            DocumentLabel::CoverLetter => "Cover Letter",
            DocumentLabel::Portfolio => "Portfolio",
            DocumentLabel::ProjectSummary => "Project Summary",
            DocumentLabel::SkillsOverview => "Skills Overview",
            DocumentLabel::Other => "Other",
        }
    }

    /// Guesses a label from an uploaded file's name.
    pub fn guess(file_name: &str) -> Self {
        let lower = file_name.to_lowercase();
        if lower.contains("resume") || lower.contains("cv") {
            DocumentLabel::Resume
        } else if lower.contains("cover") {
            DocumentLabel::CoverLetter
        } else if lower.contains("portfolio") {
            DocumentLabel::Portfolio
        } else if lower.contains("project") {
            DocumentLabel::ProjectSummary
        } else if lower.contains("skill") {
            DocumentLabel::SkillsOverview
        } else {
            DocumentLabel::Other
        }
    }
}

impl fmt::Display for DocumentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub label: DocumentLabel,
    pub content: String,
}

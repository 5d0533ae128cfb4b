use serde::{Deserialize, Serialize};

/// Structured fields pulled from a job posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub details: Vec<String>,
}

impl JobData {
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// What the scraper saw on a page. Built per request and never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageData {
    pub url: String,
    pub platform: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub cleaned_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_data: Option<JobData>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of generated emails kept in history.
pub const MAX_HISTORY: usize = 50;

/// One generated email. Field names match the extension's `emailHistory` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "email")]
    pub generated_email: String,
    #[serde(rename = "url")]
    pub source_url: String,
    #[serde(rename = "title")]
    pub page_title: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl HistoryEntry {
    pub fn new(generated_email: String, source_url: String, page_title: String) -> Self {
        Self {
            generated_email,
            source_url,
            page_title,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Short label for a history row: the page title when it is short, else the host.
    pub fn source_name(&self) -> String {
        if !self.page_title.is_empty() && self.page_title.chars().count() < 40 {
            return self.page_title.clone();
        }
        host_of(&self.source_url)
            .map(|h| h.trim_start_matches("www.").to_string())
            .unwrap_or_else(|| {
                if self.page_title.is_empty() {
                    "Unknown".to_string()
                } else {
                    self.page_title.clone()
                }
            })
    }

    /// First 100 characters of the email on one line.
    pub fn preview(&self) -> String {
        let head: String = self.generated_email.chars().take(100).collect();
        format!("{}...", head.replace('\n', " "))
    }

    /// Relative age: "Just now", "5m ago", "3h ago", "2d ago", or a date after a week.
    pub fn time_ago(&self, now: DateTime<Utc>) -> String {
        let seconds = (now.timestamp_millis() - self.timestamp) / 1000;
        match seconds {
            s if s < 60 => "Just now".to_string(),
            s if s < 3_600 => format!("{}m ago", s / 60),
            s if s < 86_400 => format!("{}h ago", s / 3_600),
            s if s < 604_800 => format!("{}d ago", s / 86_400),
            _ => DateTime::<Utc>::from_timestamp_millis(self.timestamp)
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

fn host_of(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("://")?;
    let host = rest.split(['/', '?', '#']).next()?;
    let host = host.rsplit('@').next()?.split(':').next()?;
    (!host.is_empty()).then_some(host)
}

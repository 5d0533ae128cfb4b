//! Job posting heuristics.
//!
//! Two sources, in order: schema.org `JobPosting` JSON-LD (most boards and
//! ATS pages embed it), then a per-board CSS selector table that fills
//! whatever the JSON-LD left empty.

use scraper::Html;
use serde_json::Value;

use super::{element_text, parse_selector, select_attr, select_text};
use crate::models::page::JobData;

const MAX_DETAILS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Board {
    LinkedIn,
    Indeed,
    Greenhouse,
    Lever,
    Glassdoor,
}

/// CSS selector lists for each field. An empty string means "no selector".
struct Selectors {
    title: &'static str,
    company: &'static str,
    location: &'static str,
    salary: &'static str,
    description: &'static str,
    details: &'static str,
}

impl Board {
    /// Expects a lowercased URL.
    pub fn from_url(url: &str) -> Option<Self> {
        if url.contains("linkedin.com") {
            Some(Board::LinkedIn)
        } else if url.contains("indeed.com") {
            Some(Board::Indeed)
        } else if url.contains("greenhouse.io") {
            Some(Board::Greenhouse)
        } else if url.contains("lever.co") {
            Some(Board::Lever)
        } else if url.contains("glassdoor.") {
            Some(Board::Glassdoor)
        } else {
            None
        }
    }

    pub fn platform(self) -> &'static str {
        match self {
            Board::LinkedIn => "LinkedIn",
            Board::Indeed => "Indeed",
            Board::Greenhouse => "Greenhouse",
            Board::Lever => "Lever",
            Board::Glassdoor => "Glassdoor",
        }
    }

    fn selectors(self) -> Selectors {
        match self {
            Board::LinkedIn => Selectors {
                title: ".job-details-jobs-unified-top-card__job-title, .top-card-layout__title, .topcard__title",
                company: ".job-details-jobs-unified-top-card__company-name, .topcard__org-name-link",
                location: ".job-details-jobs-unified-top-card__bullet, .topcard__flavor--bullet",
                salary: ".compensation__salary, .salary",
                description: ".jobs-description__content, .show-more-less-html__markup, .description__text",
                details: ".description__job-criteria-text, .job-details-jobs-unified-top-card__job-insight",
            },
            Board::Indeed => Selectors {
                title: "[data-testid=\"jobsearch-JobInfoHeader-title\"], h1.jobsearch-JobInfoHeader-title",
                company: "[data-testid=\"inlineHeader-companyName\"], [data-company-name=\"true\"]",
                location: "[data-testid=\"inlineHeader-companyLocation\"], [data-testid=\"job-location\"]",
                salary: "#salaryInfoAndJobType",
                description: "#jobDescriptionText",
                details: "[data-testid=\"jobsearch-JobMetadataHeader-item\"]",
            },
            Board::Greenhouse => Selectors {
                title: ".app-title, .job__title h1",
                company: ".company-name",
                location: ".location, .job__location",
                salary: ".pay-range, .job__pay-range",
                description: "#content, .job__description",
                details: "",
            },
            Board::Lever => Selectors {
                title: ".posting-headline h2",
                company: "",
                location: ".posting-categories .location",
                salary: ".posting-categories .compensation, [data-qa=\"salary-range\"]",
                description: "[data-qa=\"job-description\"], .posting-page .section.page-centered",
                details: ".posting-categories .posting-category",
            },
            Board::Glassdoor => Selectors {
                title: "[data-test=\"job-title\"], [data-test=\"jobTitle\"]",
                company: "[data-test=\"employer-name\"], [data-test=\"employerName\"]",
                location: "[data-test=\"location\"], [data-test=\"emp-location\"]",
                salary: "[data-test=\"detailSalary\"]",
                description: ".jobDescriptionContent, [data-test=\"jobDescriptionContent\"]",
                details: "",
            },
        }
    }
}

/// Job fields for the page, if it looks like a posting.
pub fn extract_job_data(document: &Html, url: &str) -> Option<JobData> {
    let from_json_ld = json_ld_job_posting(document);
    let board = Board::from_url(&url.to_lowercase());

    match (from_json_ld, board) {
        (None, None) => None,
        (Some(job), None) => Some(job),
        (json_ld, Some(board)) => {
            let mut job = json_ld.unwrap_or_default();
            fill_from_selectors(&mut job, document, &board.selectors());
            Some(job)
        }
    }
}

fn fill_from_selectors(job: &mut JobData, document: &Html, selectors: &Selectors) {
    let pick = |css: &str| -> String {
        if css.is_empty() {
            return String::new();
        }
        select_text(document, css).unwrap_or_default()
    };

    fill(&mut job.title, || {
        let title = pick(selectors.title);
        if title.is_empty() {
            pick("h1")
        } else {
            title
        }
    });
    fill(&mut job.company, || {
        let company = pick(selectors.company);
        if company.is_empty() {
            select_attr(document, "meta[property=\"og:site_name\"]", "content").unwrap_or_default()
        } else {
            company
        }
    });
    fill(&mut job.location, || pick(selectors.location));
    fill(&mut job.salary, || pick(selectors.salary));
    fill(&mut job.description, || pick(selectors.description));

    if job.details.is_empty() && !selectors.details.is_empty() {
        if let Some(selector) = parse_selector(selectors.details) {
            for detail in document.select(&selector).map(element_text) {
                if !detail.is_empty() && !job.details.contains(&detail) {
                    job.details.push(detail);
                }
                if job.details.len() == MAX_DETAILS {
                    break;
                }
            }
        }
    }
}

fn fill(field: &mut String, value: impl FnOnce() -> String) {
    if field.trim().is_empty() {
        *field = value();
    }
}

// schema.org JobPosting

fn json_ld_job_posting(document: &Html) -> Option<JobData> {
    let selector = parse_selector("script[type=\"application/ld+json\"]")?;
    document
        .select(&selector)
        .filter_map(|script| {
            let raw: String = script.text().collect();
            serde_json::from_str::<Value>(raw.trim()).ok()
        })
        .find_map(|value| find_job_posting(&value).map(job_from_json_ld))
}

fn find_job_posting(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.iter().find_map(find_job_posting),
        Value::Object(map) => {
            if is_job_posting(map.get("@type")) {
                return Some(value);
            }
            map.get("@graph").and_then(find_job_posting)
        }
        _ => None,
    }
}

fn is_job_posting(kind: Option<&Value>) -> bool {
    match kind {
        Some(Value::String(s)) => s == "JobPosting",
        Some(Value::Array(kinds)) => kinds.iter().any(|k| k.as_str() == Some("JobPosting")),
        _ => false,
    }
}

fn job_from_json_ld(posting: &Value) -> JobData {
    let company = match posting.get("hiringOrganization") {
        Some(Value::String(name)) => name.trim().to_string(),
        Some(org) => scalar(org.get("name")).unwrap_or_default(),
        None => String::new(),
    };

    let mut details = Vec::new();
    match posting.get("employmentType") {
        Some(Value::Array(kinds)) => details.extend(kinds.iter().filter_map(|k| scalar(Some(k)))),
        other => details.extend(scalar(other)),
    }
    if let Some(posted) = scalar(posting.get("datePosted")) {
        details.push(format!("Posted {posted}"));
    }

    JobData {
        title: scalar(posting.get("title")).unwrap_or_default(),
        company,
        location: json_ld_location(posting),
        salary: posting.get("baseSalary").map(json_ld_salary).unwrap_or_default(),
        description: scalar(posting.get("description"))
            .map(|html| html_to_text(&html))
            .unwrap_or_default(),
        details,
    }
}

fn json_ld_location(posting: &Value) -> String {
    let places: Vec<&Value> = match posting.get("jobLocation") {
        Some(Value::Array(places)) => places.iter().collect(),
        Some(place) => vec![place],
        None => Vec::new(),
    };

    let mut locations: Vec<String> = places
        .into_iter()
        .filter_map(|place| {
            let address = place.get("address").unwrap_or(place);
            if let Some(text) = address.as_str() {
                return Some(text.trim().to_string());
            }
            let country = address
                .get("addressCountry")
                .and_then(|c| scalar(c.get("name")).or_else(|| scalar(Some(c))));
            let parts: Vec<String> = [
                scalar(address.get("addressLocality")),
                scalar(address.get("addressRegion")),
                country,
            ]
            .into_iter()
            .flatten()
            .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        })
        .collect();

    if scalar(posting.get("jobLocationType")).as_deref() == Some("TELECOMMUTE") {
        locations.push("Remote".to_string());
    }
    locations.join("; ")
}

fn json_ld_salary(salary: &Value) -> String {
    if let Some(text) = scalar(Some(salary)) {
        return text;
    }
    let currency = scalar(salary.get("currency")).unwrap_or_default();
    let value = salary.get("value").unwrap_or(salary);
    let unit = scalar(value.get("unitText")).map(|u| u.to_lowercase());

    let amount = match (scalar(value.get("minValue")), scalar(value.get("maxValue"))) {
        (Some(min), Some(max)) => format!("{min}-{max}"),
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => scalar(value.get("value")).or_else(|| scalar(Some(value))).unwrap_or_default(),
    };
    if amount.is_empty() {
        return String::new();
    }

    let mut out = [currency, amount]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if let Some(unit) = unit {
        out.push_str(" per ");
        out.push_str(&unit);
    }
    out
}

/// Strings and numbers as text; anything else is `None`.
fn scalar(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    element_text(fragment.root_element())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREENHOUSE_WITH_JSON_LD: &str = r#"<html><head>
        <script type="application/ld+json">
        {
          "@context": "https://schema.org",
          "@type": "JobPosting",
          "title": "Senior Rust Engineer",
          "hiringOrganization": {"@type": "Organization", "name": "Acme Robotics"},
          "jobLocation": [
            {"@type": "Place", "address": {"addressLocality": "Berlin", "addressCountry": "DE"}},
            {"@type": "Place", "address": {"addressLocality": "Lisbon", "addressCountry": {"name": "Portugal"}}}
          ],
          "baseSalary": {"@type": "MonetaryAmount", "currency": "EUR",
                         "value": {"@type": "QuantitativeValue", "minValue": 90000, "maxValue": 120000, "unitText": "YEAR"}},
          "employmentType": ["FULL_TIME"],
          "datePosted": "2024-05-01",
          "description": "<p>Own our <b>motion planning</b> stack.</p><ul><li>Rust</li></ul>"
        }
        </script></head>
        <body><div class="pay-range">ignored because JSON-LD wins</div></body></html>"#;

    const LINKEDIN_PAGE: &str = r#"<html><head>
        <meta property="og:site_name" content="LinkedIn">
        </head><body>
        <h1 class="top-card-layout__title">Platform Engineer</h1>
        <a class="topcard__org-name-link">Globex</a>
        <span class="topcard__flavor--bullet">Austin, TX</span>
        <div class="show-more-less-html__markup">Build our deploy pipeline.</div>
        <ul>
          <li><span class="description__job-criteria-text">Mid-Senior level</span></li>
          <li><span class="description__job-criteria-text">Full-time</span></li>
          <li><span class="description__job-criteria-text">Full-time</span></li>
        </ul>
        </body></html>"#;

    #[test]
    fn test_json_ld_job_posting() {
        let document = Html::parse_document(GREENHOUSE_WITH_JSON_LD);
        let job = extract_job_data(&document, "https://boards.greenhouse.io/acme/jobs/1").unwrap();
        assert_eq!(job.title, "Senior Rust Engineer");
        assert_eq!(job.company, "Acme Robotics");
        assert_eq!(job.location, "Berlin, DE; Lisbon, Portugal");
        assert_eq!(job.salary, "EUR 90000-120000 per year");
        assert_eq!(job.description, "Own our motion planning stack. Rust");
        assert_eq!(job.details, vec!["FULL_TIME", "Posted 2024-05-01"]);
    }

    #[test]
    fn test_json_ld_inside_graph_on_unknown_site() {
        let html = r#"<html><head><script type="application/ld+json">
            {"@graph": [{"@type": "WebPage"}, {"@type": ["JobPosting"], "title": "Data Engineer",
              "hiringOrganization": "Initech", "jobLocationType": "TELECOMMUTE"}]}
            </script></head><body></body></html>"#;
        let document = Html::parse_document(html);
        let job = extract_job_data(&document, "https://careers.initech.com/42").unwrap();
        assert_eq!(job.title, "Data Engineer");
        assert_eq!(job.company, "Initech");
        assert_eq!(job.location, "Remote");
    }

    #[test]
    fn test_linkedin_selectors() {
        let document = Html::parse_document(LINKEDIN_PAGE);
        let job = extract_job_data(&document, "https://www.linkedin.com/jobs/view/1").unwrap();
        assert_eq!(job.title, "Platform Engineer");
        assert_eq!(job.company, "Globex");
        assert_eq!(job.location, "Austin, TX");
        assert_eq!(job.description, "Build our deploy pipeline.");
        assert_eq!(job.details, vec!["Mid-Senior level", "Full-time"]);
        assert!(job.salary.is_empty());
    }

    #[test]
    fn test_lever_company_falls_back_to_site_name() {
        let html = r#"<html><head><meta property="og:site_name" content="Hooli"></head><body>
            <div class="posting-headline"><h2>Backend Engineer</h2></div>
            <div class="posting-categories">
              <div class="posting-category location">Remote</div>
              <div class="posting-category commitment">Full-time</div>
            </div></body></html>"#;
        let document = Html::parse_document(html);
        let job = extract_job_data(&document, "https://jobs.lever.co/hooli/abc").unwrap();
        assert_eq!(job.title, "Backend Engineer");
        assert_eq!(job.company, "Hooli");
        assert_eq!(job.location, "Remote");
        assert_eq!(job.details, vec!["Remote", "Full-time"]);
    }

    #[test]
    fn test_plain_page_is_not_a_posting() {
        let document = Html::parse_document("<html><body><h1>About us</h1></body></html>");
        assert!(extract_job_data(&document, "https://acme.io/about").is_none());
    }

    #[test]
    fn test_salary_variants() {
        assert_eq!(json_ld_salary(&serde_json::json!("$100k")), "$100k");
        assert_eq!(
            json_ld_salary(&serde_json::json!({"currency": "USD", "value": {"value": 50, "unitText": "HOUR"}})),
            "USD 50 per hour"
        );
        assert_eq!(json_ld_salary(&serde_json::json!({"currency": "USD"})), "");
    }
}

//! Page Reader — turns a web page into prompt-ready `PageData`.
//!
//! Clients that already hold the DOM (a browser extension content script)
//! post the HTML; otherwise the page is fetched once by URL.

use std::collections::HashSet;
use std::time::Duration;

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod job_boards;

use crate::models::page::PageData;

/// Main content is capped before it ever reaches the prompt builder.
pub const MAX_MAIN_CONTENT_CHARS: usize = 15_000;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Elements whose text is noise for an LLM: scripts, chrome, ads, banners.
const NOISE_SELECTOR: &str = "script, style, noscript, iframe, svg, template, nav, footer, header, \
    [role=\"navigation\"], [role=\"banner\"], [role=\"contentinfo\"], \
    .ad, .ads, .popup, #cookie-banner, .menu, .sidebar";

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Failed to scrape page content: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Failed to scrape page content: {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to scrape page content: {0} has no readable text")]
    Empty(String),

    #[error("Failed to scrape page content: missing page URL")]
    MissingUrl,
}

/// The page to read. `html` is the DOM snapshot, when the caller has one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageSource {
    pub url: String,
    #[serde(default)]
    pub html: Option<String>,
    /// Title as the browser shows it, used when the HTML has none.
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Clone)]
pub struct PageReader {
    client: Client,
}

impl PageReader {
    pub fn new(fetch_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(fetch_timeout)
            .build()?;
        Ok(Self { client })
    }

    pub async fn read(&self, source: PageSource) -> Result<PageData, ScrapeError> {
        let url = source.url.trim().to_string();
        if url.is_empty() {
            return Err(ScrapeError::MissingUrl);
        }

        let html = match source.html {
            Some(html) if !html.trim().is_empty() => html,
            _ => self.fetch(&url).await?,
        };

        let mut page = scrape_html(&url, &html);
        if page.title.is_none() {
            page.title = source.title.filter(|t| !t.trim().is_empty());
        }
        if page.cleaned_text.trim().is_empty() {
            return Err(ScrapeError::Empty(url));
        }

        info!(
            "Read {} chars from {} page {}{}",
            page.cleaned_text.chars().count(),
            page.platform,
            page.url,
            if page.job_data.is_some() { " (job posting)" } else { "" }
        );
        Ok(page)
    }

    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        debug!("Fetching {url}");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Page fetch for {url} returned {status}");
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Platform tag inferred from the URL.
pub fn platform_for(url: &str) -> &'static str {
    let lower = url.to_lowercase();
    job_boards::Board::from_url(&lower)
        .map(job_boards::Board::platform)
        .unwrap_or_else(|| {
            if lower.contains("github.com") {
                "GitHub"
            } else {
                "Web"
            }
        })
}

/// Extracts page data from an HTML document. Pure; never fails.
pub fn scrape_html(url: &str, html: &str) -> PageData {
    let document = Html::parse_document(html);
    let platform = platform_for(url);

    let title = select_text(&document, "title").filter(|t| !t.is_empty());
    let summary = select_attr(&document, "meta[name=\"description\"]", "content")
        .or_else(|| select_attr(&document, "meta[property=\"og:description\"]", "content"))
        .unwrap_or_default();

    let main_content: String = visible_text(&document)
        .chars()
        .take(MAX_MAIN_CONTENT_CHARS)
        .collect();

    let cleaned_text = format!(
        "SOURCE URL: {url}\nPLATFORM: {platform}\nPage Title: {}\nSummary: {summary}\n--- MAIN CONTENT ---\n{main_content}",
        title.as_deref().unwrap_or_default(),
    );
    let cleaned_text = if main_content.is_empty() && summary.is_empty() {
        String::new()
    } else {
        cleaned_text
    };

    let job_data = job_boards::extract_job_data(&document, url).filter(|job| job.has_title());

    PageData {
        url: url.to_string(),
        platform: platform.to_string(),
        title,
        cleaned_text,
        job_data,
    }
}

/// Body text with noise elements dropped and whitespace collapsed.
fn visible_text(document: &Html) -> String {
    let Some(noise) = parse_selector(NOISE_SELECTOR) else {
        return String::new();
    };
    let noisy: HashSet<_> = document.select(&noise).map(|el| el.id()).collect();

    let root = parse_selector("body")
        .and_then(|body| document.select(&body).next())
        .unwrap_or_else(|| document.root_element());

    let mut words: Vec<&str> = Vec::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        if node.ancestors().any(|a| noisy.contains(&a.id())) {
            continue;
        }
        words.extend(text.split_whitespace());
    }
    words.join(" ")
}

pub(crate) fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!("Invalid selector {css:?}: {e:?}");
            None
        }
    }
}

/// Collapsed text of an element.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first non-empty match of `css`.
pub(crate) fn select_text(document: &Html, css: &str) -> Option<String> {
    let selector = parse_selector(css)?;
    document
        .select(&selector)
        .map(element_text)
        .find(|t| !t.is_empty())
}

pub(crate) fn select_attr(document: &Html, css: &str, attr: &str) -> Option<String> {
    let selector = parse_selector(css)?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr(attr))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    const COMPANY_PAGE: &str = r#"<!doctype html>
        <html><head>
          <title>Acme Robotics | About</title>
          <meta name="description" content="Acme builds warehouse robots.">
          <style>.x { color: red }</style>
        </head><body>
          <header>Top banner</header>
          <nav><a href="/">Home</a> <a href="/jobs">Jobs</a></nav>
          <main>
            <h1>We build   robots</h1>
            <p>Our fleet moves
               2 million parcels a day.</p>
            <div class="sidebar">Related links</div>
            <script>console.log("tracking")</script>
          </main>
          <div id="cookie-banner">Accept cookies</div>
          <footer>Copyright Acme</footer>
        </body></html>"#;

    #[test]
    fn test_platform_from_url() {
        assert_eq!(platform_for("https://www.linkedin.com/jobs/view/123"), "LinkedIn");
        assert_eq!(platform_for("https://github.com/acme"), "GitHub");
        assert_eq!(platform_for("https://boards.greenhouse.io/acme/jobs/1"), "Greenhouse");
        assert_eq!(platform_for("https://jobs.lever.co/acme/abc"), "Lever");
        assert_eq!(platform_for("https://www.indeed.com/viewjob?jk=1"), "Indeed");
        assert_eq!(platform_for("https://acme.io/about"), "Web");
    }

    #[test]
    fn test_scrape_drops_noise_and_collapses_whitespace() {
        let page = scrape_html("https://acme.io/about", COMPANY_PAGE);
        assert_eq!(page.platform, "Web");
        assert_eq!(page.title.as_deref(), Some("Acme Robotics | About"));
        assert!(page.cleaned_text.contains("Summary: Acme builds warehouse robots."));
        assert!(page
            .cleaned_text
            .contains("We build robots Our fleet moves 2 million parcels a day."));
        for noise in ["Top banner", "Home", "Related links", "tracking", "Accept cookies", "Copyright"] {
            assert!(!page.cleaned_text.contains(noise), "kept noise: {noise}");
        }
        assert!(page.job_data.is_none());
    }

    #[test]
    fn test_main_content_is_capped() {
        let long = "word ".repeat(MAX_MAIN_CONTENT_CHARS);
        let html = format!("<html><body><p>{long}</p></body></html>");
        let page = scrape_html("https://acme.io", &html);
        let main = page.cleaned_text.split("--- MAIN CONTENT ---\n").nth(1).unwrap();
        assert_eq!(main.chars().count(), MAX_MAIN_CONTENT_CHARS);
    }

    #[test]
    fn test_blank_page_has_no_text() {
        let page = scrape_html("https://acme.io", "<html><body><script>x()</script></body></html>");
        assert!(page.cleaned_text.is_empty());
    }

    #[tokio::test]
    async fn test_read_uses_posted_html_without_fetching() {
        let server = MockServer::start().await;
        Mock::given(matchers::any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let reader = PageReader::new(Duration::from_secs(5)).unwrap();
        let page = reader
            .read(PageSource {
                url: format!("{}/about", server.uri()),
                html: Some(COMPANY_PAGE.to_string()),
                title: None,
            })
            .await
            .unwrap();
        assert_eq!(page.title.as_deref(), Some("Acme Robotics | About"));
    }

    #[tokio::test]
    async fn test_read_fetches_when_no_html() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/about"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string(COMPANY_PAGE),
            )
            .expect(1)
            .mount(&server)
            .await;

        let reader = PageReader::new(Duration::from_secs(5)).unwrap();
        let page = reader
            .read(PageSource {
                url: format!("{}/about", server.uri()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(page.cleaned_text.contains("2 million parcels"));
    }

    #[tokio::test]
    async fn test_read_reports_bad_status_and_empty_pages() {
        let server = MockServer::start().await;
        Mock::given(matchers::path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let reader = PageReader::new(Duration::from_secs(5)).unwrap();
        let err = reader
            .read(PageSource {
                url: format!("{}/gone", server.uri()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Status { status: 404, .. }));
        assert!(err.to_string().starts_with("Failed to scrape"));

        let err = reader
            .read(PageSource {
                url: "https://acme.io/blank".to_string(),
                html: Some("<html><body></body></html>".to_string()),
                title: Some("Blank".to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Empty(_)));

        let err = reader.read(PageSource::default()).await.unwrap_err();
        assert!(matches!(err, ScrapeError::MissingUrl));
    }
}

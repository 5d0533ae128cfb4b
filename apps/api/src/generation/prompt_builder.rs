//! Prompt Builder — pure assembly of the single prompt sent to a provider.

use crate::generation::prompts::{
    EMAIL_WRITER_INSTRUCTIONS, EMAIL_WRITER_TASK, JOB_DETAILS_HEADING, NO_DOCUMENTS_FALLBACK,
    NO_NOTE_FALLBACK,
};
use crate::models::document::Document;
use crate::models::page::{JobData, PageData};

/// Hard ceiling on page text included in the prompt, in characters.
pub const MAX_PAGE_TEXT_CHARS: usize = 8_000;

/// Hard ceiling on the job description inside the job block, in characters.
pub const MAX_JOB_DESCRIPTION_CHARS: usize = 3_000;

pub fn build_prompt(page: &PageData, documents: &[Document], personal_note: &str) -> String {
    let documents_block = documents_section(documents);
    let job_block = page
        .job_data
        .as_ref()
        .filter(|job| job.has_title())
        .map(job_section)
        .unwrap_or_default();
    let page_text = truncate_chars(&page.cleaned_text, MAX_PAGE_TEXT_CHARS);
    let note = if personal_note.trim().is_empty() {
        NO_NOTE_FALLBACK
    } else {
        personal_note.trim()
    };
    let platform = non_empty_or(&page.platform, "Unknown");
    let url = non_empty_or(&page.url, "Unknown");

    format!(
        "{instructions}

---

## SENDER'S PROFILE & DOCUMENTS:
{documents_block}

---

## RECIPIENT INFO (from webpage):
Platform: {platform}
URL: {url}
{job_block}
## WEBPAGE CONTENT:
{page_text}

## SENDER'S ADDITIONAL NOTES:
{note}

---

{task}",
        instructions = EMAIL_WRITER_INSTRUCTIONS,
        task = EMAIL_WRITER_TASK,
    )
}

/// Each document as a labeled block, or the fallback sentence when there are none.
fn documents_section(documents: &[Document]) -> String {
    if documents.is_empty() {
        return NO_DOCUMENTS_FALLBACK.to_string();
    }
    documents
        .iter()
        .map(|doc| format!("### {}:\n{}", doc.label, doc.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn job_section(job: &JobData) -> String {
    let mut lines = vec![
        String::new(),
        JOB_DETAILS_HEADING.to_string(),
        format!("- Job Title: {}", non_empty_or(&job.title, "N/A")),
        format!("- Company: {}", non_empty_or(&job.company, "N/A")),
        format!("- Location: {}", non_empty_or(&job.location, "N/A")),
    ];
    if !job.salary.trim().is_empty() {
        lines.push(format!("- Salary: {}", job.salary.trim()));
    }
    if !job.details.is_empty() {
        lines.push(format!("- Details: {}", job.details.join(", ")));
    }
    if !job.description.trim().is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "Job Description Summary:\n{}",
            truncate_chars(&job.description, MAX_JOB_DESCRIPTION_CHARS)
        ));
    }
    lines.push(String::new());
    lines.join("\n")
}

/// First `max` characters of `text`. Not word- or sentence-aware.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::DocumentLabel;

    fn page(text: &str) -> PageData {
        PageData {
            url: "https://jobs.lever.co/acme/1".to_string(),
            platform: "Lever".to_string(),
            title: Some("Acme - Rust Engineer".to_string()),
            cleaned_text: text.to_string(),
            job_data: None,
        }
    }

    fn job(title: &str) -> JobData {
        JobData {
            title: title.to_string(),
            company: "Acme".to_string(),
            location: String::new(),
            salary: "$150k".to_string(),
            description: "Build robots in Rust.".to_string(),
            details: vec!["Full-time".to_string(), "Remote".to_string()],
        }
    }

    #[test]
    fn test_no_documents_uses_fallback_phrase() {
        let prompt = build_prompt(&page("about us"), &[], "");
        assert!(prompt.contains(
            "## SENDER'S PROFILE & DOCUMENTS:\nNot provided - use generic introduction\n"
        ));
        assert!(prompt.contains("## SENDER'S ADDITIONAL NOTES:\nNone"));
    }

    #[test]
    fn test_documents_render_as_labeled_blocks() {
        let documents = vec![
            Document {
                name: "cv.pdf".to_string(),
                label: DocumentLabel::Resume,
                content: "8 years of Rust".to_string(),
            },
            Document {
                name: "p.txt".to_string(),
                label: DocumentLabel::ProjectSummary,
                content: "Wrote a JIT".to_string(),
            },
        ];
        let prompt = build_prompt(&page("about us"), &documents, "Mention Berlin");
        assert!(prompt.contains("### Resume:\n8 years of Rust\n\n### Project Summary:\nWrote a JIT"));
        assert!(!prompt.contains(NO_DOCUMENTS_FALLBACK));
        assert!(prompt.contains("Mention Berlin"));
    }

    #[test]
    fn test_job_block_omitted_without_title() {
        let mut data = page("about us");
        assert!(!build_prompt(&data, &[], "").contains("JOB LISTING DETAILS"));

        data.job_data = Some(job("  "));
        assert!(!build_prompt(&data, &[], "").contains("JOB LISTING DETAILS"));
    }

    #[test]
    fn test_job_block_fields() {
        let mut data = page("about us");
        data.job_data = Some(job("Rust Engineer"));
        let prompt = build_prompt(&data, &[], "");
        assert!(prompt.contains("JOB LISTING DETAILS"));
        assert!(prompt.contains("- Job Title: Rust Engineer"));
        assert!(prompt.contains("- Company: Acme"));
        assert!(prompt.contains("- Location: N/A"));
        assert!(prompt.contains("- Salary: $150k"));
        assert!(prompt.contains("- Details: Full-time, Remote"));
        assert!(prompt.contains("Job Description Summary:\nBuild robots in Rust."));
    }

    #[test]
    fn test_page_text_cut_to_exact_ceiling() {
        let text = "é".repeat(MAX_PAGE_TEXT_CHARS + 500);
        let prompt = build_prompt(&page(&text), &[], "");
        let expected = "é".repeat(MAX_PAGE_TEXT_CHARS);
        assert!(prompt.contains(&format!("## WEBPAGE CONTENT:\n{expected}\n\n")));
        assert!(!prompt.contains(&"é".repeat(MAX_PAGE_TEXT_CHARS + 1)));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("hello", 5), "hello");
        assert_eq!(truncate_chars("hello", 50), "hello");
        assert_eq!(truncate_chars("añb", 2), "añ");
        assert_eq!(truncate_chars("", 2), "");
    }

    #[test]
    fn test_job_description_is_cut() {
        let mut data = page("x");
        let mut posting = job("Engineer");
        posting.description = "a".repeat(MAX_JOB_DESCRIPTION_CHARS + 10);
        data.job_data = Some(posting);
        let prompt = build_prompt(&data, &[], "");
        assert!(prompt.contains(&"a".repeat(MAX_JOB_DESCRIPTION_CHARS)));
        assert!(!prompt.contains(&"a".repeat(MAX_JOB_DESCRIPTION_CHARS + 1)));
    }

    #[test]
    fn test_template_frames_the_prompt() {
        let prompt = build_prompt(&page("x"), &[], "");
        assert!(prompt.starts_with(EMAIL_WRITER_INSTRUCTIONS));
        assert!(prompt.ends_with(EMAIL_WRITER_TASK));
        assert!(prompt.contains("Platform: Lever\nURL: https://jobs.lever.co/acme/1"));
    }
}

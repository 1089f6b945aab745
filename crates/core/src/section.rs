//! Section classification and the per-kind sub-parsers.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::model::{Link, Skills};

static LABELED_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-\s*(.+?)\s*[:—-]\s*(https?://\S+)\s*$").expect("valid labeled link regex")
});
static BARE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-\s*(https?://\S+)\s*$").expect("valid bare link regex"));
static SKILL_CATEGORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\*\*([^*]+)\*\*(.*)$").expect("valid skill category regex")
});

/// The closed set of section handlers, chosen by title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Links,
    WorkExperience,
    Skills,
    Summary,
    Education,
    Text,
}

impl SectionKind {
    /// Case-insensitive exact match on the trimmed title.
    pub fn classify(title: &str) -> Self {
        let title = title.trim();
        if title.eq_ignore_ascii_case("links") {
            SectionKind::Links
        } else if title.eq_ignore_ascii_case("work experience") {
            SectionKind::WorkExperience
        } else if title.eq_ignore_ascii_case("skills") {
            SectionKind::Skills
        } else if title.eq_ignore_ascii_case("summary") {
            SectionKind::Summary
        } else if title.eq_ignore_ascii_case("education") {
            SectionKind::Education
        } else {
            SectionKind::Text
        }
    }
}

/// Reads `- Label: URL`, `- Label — URL`, `- Label - URL` and bare `- URL`
/// lines. Anything else is dropped.
pub fn parse_links<S: AsRef<str>>(body: &[S]) -> Vec<Link> {
    body.iter()
        .filter_map(|raw| {
            let line = raw.as_ref().trim();
            if !line.starts_with('-') {
                return None;
            }

            if let Some(caps) = LABELED_LINK.captures(line) {
                return Some(Link {
                    label: caps[1].trim().to_string(),
                    url: caps[2].trim().to_string(),
                });
            }

            if let Some(caps) = BARE_LINK.captures(line) {
                let url = caps[1].trim().to_string();
                return Some(Link {
                    label: url.clone(),
                    url,
                });
            }

            trace!(line, "dropping unrecognized link line");
            None
        })
        .collect()
}

/// Reads `**Category**` lines and the description line that follows them.
///
/// A trailing colon on the category is dropped. Text after the closing `**`
/// on the same line is taken as the description directly. A category whose
/// next non-blank line is another bold line, or that ends the body, is
/// dropped.
pub fn parse_skills<S: AsRef<str>>(body: &[S]) -> Skills {
    let mut skills = Skills::default();
    let mut pending: Option<String> = None;

    for raw in body {
        let line = raw.as_ref().trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = SKILL_CATEGORY.captures(line) {
            if let Some(dropped) = pending.take() {
                trace!(category = %dropped, "dropping skill category without description");
            }

            let category = caps[1].trim().trim_end_matches(':').trim().to_string();
            let inline = caps[2].trim().trim_start_matches(':').trim();
            if inline.is_empty() {
                pending = Some(category);
            } else {
                skills.insert(category, inline);
            }
            continue;
        }

        match pending.take() {
            Some(category) => skills.insert(category, line),
            None => trace!(line, "dropping skill line without category"),
        }
    }

    if let Some(dropped) = pending {
        trace!(category = %dropped, "dropping skill category without description");
    }

    skills
}

/// Joins the non-blank lines of a Summary section with single spaces.
pub fn summary_text<S: AsRef<str>>(body: &[S]) -> String {
    body.iter()
        .map(|raw| raw.as_ref().trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keeps the non-blank lines of an Education section, right-trimmed.
pub fn education_lines<S: AsRef<str>>(body: &[S]) -> Vec<String> {
    body.iter()
        .map(|raw| raw.as_ref().trim_end())
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

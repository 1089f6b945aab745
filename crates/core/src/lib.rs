//! # resumark-core
//!
//! Parses a hand-written Markdown résumé into a [`Document`] and renders it
//! into a static HTML template.
//!
//! The résumé dialect:
//!
//! ```text
//! # Jane Doe                      <- name
//! Austin, TX                      <- contact lines
//! jane@x.com                      <- email
//! - Open to relocation            <- meta bullets
//!
//! ## Links
//! - GitHub: https://github.com/jane
//!
//! ## Work Experience
//! ### Engineer                    <- one job per ### heading
//! **Acme**                        <- company
//! Austin, TX                      <- location
//! 01/2020 – 01/2022               <- dates
//! Acme builds anvils.             <- company description
//! **Highlights:**                 <- bullet group heading
//! - Shipped feature A
//! ```
//!
//! Every other `##` section is rendered to HTML by a small block renderer.
//! Arbitrary Markdown documents can also be rendered to pages through the
//! CommonMark pipeline in [`page`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod adapter;
pub mod block;
pub mod error;
pub mod escape;
pub mod html_renderer;
pub mod inline;
pub mod job;
pub mod model;
pub mod page;
pub mod pipeline;
pub mod section;
pub mod segment;
pub mod slugify;
pub mod streaming_rewriter;
pub mod template;

pub use adapter::{MarkdownStream, PipeAdapter, get_event_iterator};
pub use error::{Error, Result};
pub use inline::render_inline;
pub use model::{BulletGroup, Document, Job, Link, Resume, Section, SectionBody, Skills};
pub use page::{Heading, RenderedPage, render_page};
pub use pipeline::{BuildReport, BuildRequest, PageReport, PageRequest, build_page, build_resume};
pub use streaming_rewriter::{RewriteOptions, StreamingRewriter};
pub use template::Template;

use crate::block::{BlockOptions, parse_blocks};
use crate::html_renderer::{blocks_to_html, links_to_html};
use crate::job::{Grouping, parse_jobs};
use crate::section::{SectionKind, education_lines, parse_links, parse_skills, summary_text};
use crate::segment::segment;

/// Page title used when the résumé has no `# Name` line.
pub const DEFAULT_TITLE: &str = "Resume";

/// Grammar switches covering the differences between résumé dialects.
/// Everything is off by default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    /// Omit the Links section from `sections`; links still fill `Document.links`.
    pub drop_links_section: bool,
    /// Ignore bullet group headings inside jobs.
    pub flat_bullets: bool,
    /// Render `<!-- -->` lines in text sections instead of skipping them.
    pub keep_comments: bool,
}

impl ParseOptions {
    fn grouping(&self) -> Grouping {
        if self.flat_bullets {
            Grouping::Flat
        } else {
            Grouping::Headed
        }
    }

    fn block_options(&self) -> BlockOptions {
        BlockOptions {
            keep_comments: self.keep_comments,
        }
    }
}

/// Parses résumé Markdown into a document.
///
/// Parsing never fails: fields that cannot be found are left empty and
/// unrecognized lines are dropped. The result depends only on `source` and
/// `options`, so the same input always serializes to the same JSON.
pub fn parse_resume(source: &str, options: &ParseOptions) -> Document {
    let segments = segment(source);
    let header = segments.header;

    let mut resume = Resume {
        name: header.name,
        contact_lines: header.contact_lines,
        email: header.email,
        meta_bullets: header.meta_bullets,
        ..Resume::default()
    };

    let mut used_slugs = HashSet::new();
    let mut sections = Vec::with_capacity(segments.sections.len());

    for raw in segments.sections {
        let kind = SectionKind::classify(raw.title);
        debug!(title = raw.title, ?kind, lines = raw.body.len(), "classified section");

        let body = match kind {
            SectionKind::Links => {
                let links = parse_links(&raw.body);
                resume.links.extend(links.iter().cloned());
                if options.drop_links_section {
                    continue;
                }
                SectionBody::Links {
                    html: links_to_html(&links),
                    links,
                }
            }
            SectionKind::WorkExperience => {
                let jobs = parse_jobs(&raw.body, options.grouping());
                resume.work.extend(jobs.iter().cloned());
                SectionBody::Work { items: jobs }
            }
            SectionKind::Skills => {
                let skills = parse_skills(&raw.body);
                resume.skills.extend(skills.clone());
                SectionBody::Skills {
                    skills,
                    html: render_text(&raw.body, options),
                }
            }
            SectionKind::Summary => {
                let text = summary_text(&raw.body);
                if !text.is_empty() {
                    if !resume.summary.is_empty() {
                        resume.summary.push(' ');
                    }
                    resume.summary.push_str(&text);
                }
                SectionBody::Text {
                    html: render_text(&raw.body, options),
                }
            }
            SectionKind::Education => {
                resume.education.extend(education_lines(&raw.body));
                SectionBody::Text {
                    html: render_text(&raw.body, options),
                }
            }
            SectionKind::Text => SectionBody::Text {
                html: render_text(&raw.body, options),
            },
        };

        sections.push(Section {
            title: raw.title.to_string(),
            id: slugify::slugify(raw.title, &mut used_slugs),
            body,
        });
    }

    let title = if resume.name.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        resume.name.clone()
    };

    Document {
        title,
        resume,
        sections,
    }
}

fn render_text(body: &[&str], options: &ParseOptions) -> String {
    blocks_to_html(parse_blocks(body, options.block_options()))
}

/// Crate version, surfaced by the bindings and the CLI.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const JANE: &str = "# Jane Doe\nAustin, TX\njane@x.com\n\n## Links\n- GitHub: https://github.com/jane\n\n## Work Experience\n### Engineer\n**Acme**\nAustin, TX\n01/2020 – 01/2022\nBuilt things.\n- Shipped feature A\n";

    #[test]
    fn parses_the_reference_resume() {
        let doc = parse_resume(JANE, &ParseOptions::default());

        assert_eq!(doc.title, "Jane Doe");
        assert_eq!(doc.resume.name, "Jane Doe");
        assert_eq!(doc.resume.contact_lines, vec!["Austin, TX".to_string()]);
        assert_eq!(doc.resume.email, "jane@x.com");
        assert_eq!(
            serde_json::to_value(&doc.resume.links).unwrap(),
            json!([{"label": "GitHub", "url": "https://github.com/jane"}])
        );
        assert_eq!(
            serde_json::to_value(&doc.resume.work).unwrap(),
            json!([{
                "title": "Engineer",
                "company": "Acme",
                "location": "Austin, TX",
                "dates": "01/2020 – 01/2022",
                "companyDescription": "Built things.",
                "groups": [{"heading": null, "bullets": ["Shipped feature A"]}]
            }])
        );
    }

    #[test]
    fn serializes_the_whole_document() {
        let doc = parse_resume(JANE, &ParseOptions::default());
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["title"], "Jane Doe");
        assert_eq!(value["contactLines"], json!(["Austin, TX"]));
        assert_eq!(value["metaBullets"], json!([]));
        assert_eq!(value["skills"], json!({}));
        assert_eq!(value["sections"][0]["kind"], "links");
        assert_eq!(value["sections"][0]["id"], "links");
        assert_eq!(value["sections"][1]["kind"], "work");
        assert_eq!(value["sections"][1]["id"], "work-experience");
        assert_eq!(value["sections"][1]["items"][0]["company"], "Acme");
    }

    #[test]
    fn reparsing_is_byte_identical() {
        let options = ParseOptions::default();
        let first = serde_json::to_string(&parse_resume(JANE, &options)).unwrap();
        let second = serde_json::to_string(&parse_resume(JANE, &options)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_work_section_yields_no_jobs() {
        let doc = parse_resume("# J\n## Work Experience\nComing soon.\n", &ParseOptions::default());
        assert!(doc.resume.work.is_empty());
        assert_eq!(doc.sections[0].body, SectionBody::Work { items: Vec::new() });
    }

    #[test]
    fn plain_company_line_is_read_as_location() {
        let doc = parse_resume(
            "# J\n## Work Experience\n### Engineer\nAcme\n01/2020 – 01/2022\n",
            &ParseOptions::default(),
        );
        let job = &doc.resume.work[0];
        assert_eq!(job.company, "");
        assert_eq!(job.location, "Acme");
        assert_eq!(job.dates, "01/2020 – 01/2022");
    }

    #[test]
    fn missing_name_defaults_the_title() {
        let doc = parse_resume("Austin, TX\n\n## Summary\nHi\n", &ParseOptions::default());
        assert_eq!(doc.resume.name, "");
        assert_eq!(doc.title, DEFAULT_TITLE);
    }

    #[test]
    fn every_links_section_contributes() {
        let source = "# J\n## Links\n- A: https://a.dev\n## Links\n- B: https://b.dev\n";
        let doc = parse_resume(source, &ParseOptions::default());

        let labels: Vec<_> = doc.resume.links.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B"]);
        let ids: Vec<_> = doc.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["links", "links-1"]);
    }

    #[test]
    fn can_drop_the_links_section() {
        let options = ParseOptions {
            drop_links_section: true,
            ..ParseOptions::default()
        };
        let doc = parse_resume(JANE, &options);

        assert_eq!(doc.resume.links.len(), 1);
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].body.kind(), "work");
    }

    #[test]
    fn fills_summary_education_and_skills() {
        let source = "# J\n## Summary\nBuilds\nsystems.\n\n## Education\nBS CS\nState U\n\n## Skills\n**Languages**\nRust\n\n## Hobbies\n- Climbing\n";
        let doc = parse_resume(source, &ParseOptions::default());

        assert_eq!(doc.resume.summary, "Builds systems.");
        assert_eq!(doc.resume.education, vec!["BS CS".to_string(), "State U".to_string()]);
        assert_eq!(doc.resume.skills.get("Languages"), Some("Rust"));

        assert_eq!(
            doc.sections[0].body,
            SectionBody::Text {
                html: "<p>Builds systems.</p>".into()
            }
        );
        match &doc.sections[2].body {
            SectionBody::Skills { html, skills } => {
                assert_eq!(skills.len(), 1);
                assert_eq!(
                    html,
                    "<div class=\"companyline\"><strong>Languages</strong></div>\n<p>Rust</p>"
                );
            }
            other => panic!("expected skills section, got {other:?}"),
        }
        assert_eq!(
            doc.sections[3].body,
            SectionBody::Text {
                html: "<ul><li>Climbing</li></ul>".into()
            }
        );
    }

    #[test]
    fn text_sections_never_leak_script_tags() {
        let doc = parse_resume(
            "# J\n## About\n<script>alert(1)</script>\n- <b>bold</b>\n",
            &ParseOptions::default(),
        );
        let SectionBody::Text { html } = &doc.sections[0].body else {
            panic!("expected text section");
        };
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("<li>&lt;b&gt;bold&lt;/b&gt;</li>"));
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: ParseOptions = serde_json::from_str(r#"{"flatBullets": true}"#).unwrap();
        assert!(options.flat_bullets);
        assert!(!options.drop_links_section);
        assert!(!options.keep_comments);
    }
}

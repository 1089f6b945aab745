//! Splits a résumé into its header block and `##` sections.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[\w.+-]+@[\w.-]+\.\w+\b").expect("valid email regex")
});

/// Fields found before the first `##` heading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub contact_lines: Vec<String>,
    pub email: String,
    pub meta_bullets: Vec<String>,
}

/// A `##` heading and the raw lines below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSection<'a> {
    pub title: &'a str,
    pub body: Vec<&'a str>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segments<'a> {
    pub header: Header,
    pub sections: Vec<RawSection<'a>>,
}

/// Segments `source` into a header and ordered sections.
///
/// A line opens a section only when it starts with `## ` at column zero, so
/// `###` job headings stay inside their section's body.
pub fn segment(source: &str) -> Segments<'_> {
    let mut header_lines = Vec::new();
    let mut sections: Vec<RawSection<'_>> = Vec::new();

    for line in source.lines() {
        if let Some(title) = line.strip_prefix("## ") {
            sections.push(RawSection {
                title: title.trim(),
                body: Vec::new(),
            });
            continue;
        }

        match sections.last_mut() {
            Some(section) => section.body.push(line),
            None => header_lines.push(line),
        }
    }

    Segments {
        header: parse_header(&header_lines),
        sections,
    }
}

fn parse_header(lines: &[&str]) -> Header {
    let mut header = Header::default();

    let rest = match lines.iter().position(|line| line.starts_with("# ")) {
        Some(index) => {
            header.name = lines[index][2..].trim().to_string();
            &lines[index + 1..]
        }
        None => lines,
    };

    for line in rest.iter().map(|line| line.trim()) {
        if line.is_empty() {
            continue;
        }

        if let Some(bullet) = line.strip_prefix("- ") {
            header.meta_bullets.push(bullet.trim().to_string());
        } else if header.email.is_empty() && EMAIL.is_match(line) {
            header.email = line.to_string();
        } else {
            header.contact_lines.push(line.to_string());
        }
    }

    header
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_header_and_sections() {
        let source = "# Jane Doe\nAustin, TX\njane@x.com\n- US citizen\n\n## Summary\nHello.\n\n## Links\n- GitHub: https://github.com/jane\n";
        let segments = segment(source);

        assert_eq!(
            segments.header,
            Header {
                name: "Jane Doe".into(),
                contact_lines: vec!["Austin, TX".into()],
                email: "jane@x.com".into(),
                meta_bullets: vec!["US citizen".into()],
            }
        );
        assert_eq!(
            segments.sections,
            vec![
                RawSection {
                    title: "Summary",
                    body: vec!["Hello.", ""],
                },
                RawSection {
                    title: "Links",
                    body: vec!["- GitHub: https://github.com/jane"],
                },
            ]
        );
    }

    #[test]
    fn trims_the_name() {
        let segments = segment("#   Jane Doe  \n\n## Skills");
        assert_eq!(segments.header.name, "Jane Doe");
    }

    #[test]
    fn ignores_lines_before_the_name() {
        let segments = segment("<!-- draft -->\n# Jane\nRemote");
        assert_eq!(segments.header.name, "Jane");
        assert_eq!(segments.header.contact_lines, vec!["Remote".to_string()]);
    }

    #[test]
    fn missing_name_leaves_it_empty() {
        let segments = segment("Austin, TX\n## Summary\nText");
        assert_eq!(segments.header.name, "");
        assert_eq!(segments.header.contact_lines, vec!["Austin, TX".to_string()]);
        assert_eq!(segments.sections.len(), 1);
    }

    #[test]
    fn first_email_wins() {
        let segments = segment("# J\nj@a.com\nother@b.org");
        assert_eq!(segments.header.email, "j@a.com");
        assert_eq!(segments.header.contact_lines, vec!["other@b.org".to_string()]);
    }

    #[test]
    fn heading_without_body_yields_empty_section() {
        let segments = segment("# J\n## Education\n## Skills\n- Rust");
        assert_eq!(segments.sections[0].title, "Education");
        assert!(segments.sections[0].body.is_empty());
        assert_eq!(segments.sections[1].body, vec!["- Rust"]);
    }

    #[test]
    fn job_headings_stay_in_the_body() {
        let segments = segment("# J\n## Work Experience\n### Engineer\n**Acme**");
        assert_eq!(segments.sections.len(), 1);
        assert_eq!(segments.sections[0].body, vec!["### Engineer", "**Acme**"]);
    }

    #[test]
    fn accepts_crlf_line_endings() {
        let segments = segment("# Jane\r\n\r\n## Summary\r\nHi\r\n");
        assert_eq!(segments.header.name, "Jane");
        assert_eq!(segments.sections[0].body, vec!["Hi"]);
    }
}

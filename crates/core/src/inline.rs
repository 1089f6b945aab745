//! Inline Markdown: links, code spans, bold and italic.
//!
//! The input is HTML-escaped before any substitution so the output is always
//! a safe fragment. Substitutions run in a fixed order: links, code, bold,
//! italic. Link targets are set aside before the emphasis passes run, so a
//! `*` inside a URL is never read as emphasis.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::escape::{escape_html, sanitize_url};

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("valid code regex"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("valid bold regex"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*]+)\*").expect("valid italic regex"));
const SLOT_OPEN: char = '\u{E000}';
const SLOT_CLOSE: char = '\u{E001}';

static LINK_SLOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{E000}(\\d+)\u{E001}").expect("valid slot regex"));

/// Renders one line or paragraph of inline Markdown to HTML.
pub fn render_inline(text: &str) -> String {
    // Slot delimiters are reserved; drop any that appear in the input.
    let escaped = escape_html(text.trim()).replace([SLOT_OPEN, SLOT_CLOSE], "");

    let mut anchors = Vec::new();
    let slotted = LINK.replace_all(&escaped, |caps: &Captures<'_>| {
        let href = sanitize_url(&caps[2]);
        anchors.push(format!(
            "<a href=\"{href}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
            emphasize(&caps[1])
        ));
        format!("{SLOT_OPEN}{}{SLOT_CLOSE}", anchors.len() - 1)
    });

    let rendered = emphasize(&slotted);
    if anchors.is_empty() {
        return rendered;
    }

    LINK_SLOT
        .replace_all(&rendered, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| anchors.get(index))
                .cloned()
                .unwrap_or_default()
        })
        .into_owned()
}

fn emphasize(text: &str) -> String {
    let text = CODE.replace_all(text, "<code>${1}</code>");
    let text = BOLD.replace_all(&text, "<strong>${1}</strong>");
    ITALIC.replace_all(&text, "<em>${1}</em>").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_emphasis_markup() {
        assert_eq!(
            render_inline("This is **bold** and *italic* text."),
            "This is <strong>bold</strong> and <em>italic</em> text."
        );
    }

    #[test]
    fn renders_inline_code() {
        assert_eq!(
            render_inline("Use `cargo build` daily"),
            "Use <code>cargo build</code> daily"
        );
    }

    #[test]
    fn renders_links_with_new_tab_attributes() {
        assert_eq!(
            render_inline("See [my site](https://example.com)."),
            "See <a href=\"https://example.com\" target=\"_blank\" rel=\"noopener noreferrer\">my site</a>."
        );
    }

    #[test]
    fn escapes_before_substituting() {
        let html = render_inline("<script>alert('x')</script> **ok**");
        assert!(!html.contains("<script>"));
        assert!(html.starts_with("&lt;script&gt;"));
        assert!(html.ends_with("<strong>ok</strong>"));
    }

    #[test]
    fn leaves_asterisks_inside_urls_alone() {
        let html = render_inline("[docs](https://x.com/*a*/b) and *here*");
        assert!(html.contains("href=\"https://x.com/*a*/b\""));
        assert!(html.ends_with("and <em>here</em>"));
    }

    #[test]
    fn keeps_emphasis_around_links() {
        assert_eq!(
            render_inline("**see [x](https://x.com)**"),
            "<strong>see <a href=\"https://x.com\" target=\"_blank\" rel=\"noopener noreferrer\">x</a></strong>"
        );
    }

    #[test]
    fn emphasizes_link_text() {
        let html = render_inline("[**Repo**](https://github.com/jane)");
        assert!(html.contains("><strong>Repo</strong></a>"));
    }

    #[test]
    fn neutralizes_script_urls() {
        let html = render_inline("[click](javascript:alert(1))");
        assert!(html.contains("href=\"#\""));
        assert!(!html.contains("javascript"));
    }

    #[test]
    fn unbalanced_markers_stay_literal() {
        assert_eq!(render_inline("2 ** 3 and `open"), "2 ** 3 and `open");
    }

    #[test]
    fn literal_slot_markers_are_not_expanded() {
        let html = render_inline("[a](https://a.dev) \u{E000}0\u{E001}");
        assert_eq!(html.matches("<a ").count(), 1);
        assert!(html.ends_with("</a> 0"));
    }

    #[test]
    fn escapes_ampersands_in_urls() {
        let html = render_inline("[q](https://x.com/?a=1&b=2)");
        assert!(html.contains("href=\"https://x.com/?a=1&amp;b=2\""));
    }
}

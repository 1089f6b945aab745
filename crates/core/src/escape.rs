//! HTML escaping and link sanitizing shared by the inline and block renderers.

use std::borrow::Cow;

/// Escapes the five characters that carry meaning in HTML text and quoted
/// attribute values.
///
/// | char | entity   |
/// |------|----------|
/// | `&`  | `&amp;`  |
/// | `<`  | `&lt;`   |
/// | `>`  | `&gt;`   |
/// | `"`  | `&quot;` |
/// | `'`  | `&#39;`  |
///
/// Borrows the input untouched when nothing needs escaping.
///
/// Modeled on markdown-rs's encoder:
/// <https://github.com/wooorm/markdown-rs/blob/main/src/util/encode.rs>
pub fn escape_html(s: &str) -> Cow<'_, str> {
    let mut result: Option<String> = None;
    let mut start = 0;

    for (index, byte) in s.bytes().enumerate() {
        let replacement = match byte {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#39;",
            _ => continue,
        };

        let out = result.get_or_insert_with(|| String::with_capacity(s.len() + 16));
        out.push_str(&s[start..index]);
        out.push_str(replacement);
        start = index + 1;
    }

    match result {
        Some(mut out) => {
            out.push_str(&s[start..]);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(s),
    }
}

const SAFE_SCHEMES: [&str; 4] = ["http", "https", "mailto", "tel"];

/// Returns `url` when it is relative or uses a safe scheme, `"#"` otherwise.
///
/// A scheme is whatever precedes the first `:` as long as no `/`, `?` or `#`
/// appears before it, so `docs/a:b` stays relative.
///
/// See markdown-rs's `sanitize_uri`:
/// <https://github.com/wooorm/markdown-rs/blob/main/src/util/sanitize_uri.rs>
pub fn sanitize_url(url: &str) -> &str {
    let trimmed = url.trim();
    let Some(colon) = trimmed.find(':') else {
        return trimmed;
    };

    let head = &trimmed[..colon];
    if head.contains(['/', '?', '#']) {
        return trimmed;
    }

    if SAFE_SCHEMES
        .iter()
        .any(|scheme| head.eq_ignore_ascii_case(scheme))
    {
        trimmed
    } else {
        "#"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_basic_characters() {
        assert_eq!(escape_html("&"), "&amp;");
        assert_eq!(escape_html("<"), "&lt;");
        assert_eq!(escape_html(">"), "&gt;");
        assert_eq!(escape_html("\""), "&quot;");
        assert_eq!(escape_html("'"), "&#39;");
    }

    #[test]
    fn escapes_script_tags() {
        assert_eq!(
            escape_html("<script>alert('xss')</script>"),
            "&lt;script&gt;alert(&#39;xss&#39;)&lt;/script&gt;"
        );
    }

    #[test]
    fn borrows_plain_text() {
        let plain = "Austin, TX — 10 years";
        assert!(matches!(escape_html(plain), Cow::Borrowed(_)));
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn keeps_multibyte_text_intact() {
        assert_eq!(
            escape_html("Café & <naïve> \"text\""),
            "Café &amp; &lt;naïve&gt; &quot;text&quot;"
        );
    }

    #[test]
    fn allows_web_and_relative_urls() {
        assert_eq!(sanitize_url("https://github.com/jane"), "https://github.com/jane");
        assert_eq!(sanitize_url("HTTP://example.com"), "HTTP://example.com");
        assert_eq!(sanitize_url("mailto:jane@x.com"), "mailto:jane@x.com");
        assert_eq!(sanitize_url("/projects/"), "/projects/");
        assert_eq!(sanitize_url("docs/a:b"), "docs/a:b");
        assert_eq!(sanitize_url("#top"), "#top");
    }

    #[test]
    fn rejects_script_schemes() {
        assert_eq!(sanitize_url("javascript:alert(1)"), "#");
        assert_eq!(sanitize_url(" JavaScript:void(0)"), "#");
        assert_eq!(sanitize_url("data:text/html;base64,xx"), "#");
    }
}

//! Static HTML templates with `__NAME__`-style placeholders.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::{Error, Result};
use crate::escape::escape_html;
use crate::model::Document;
use crate::page::RenderedPage;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"__(TITLE|NAME|DATA_JSON|CONFIG_JSON|JSON|CONTENT)__")
        .expect("valid placeholder regex")
});

/// Minimal page skeleton used by `page` builds without a template.
pub const DEFAULT_PAGE_TEMPLATE: &str = "<!doctype html>
<html lang=\"en\">
<head>
<meta charset=\"utf-8\" />
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />
<title>__TITLE__</title>
</head>
<body>
<main>
__CONTENT__
</main>
</body>
</html>
";

/// Values for each placeholder. A `None` leaves its token in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    pub title: Option<String>,
    pub name: Option<String>,
    pub data_json: Option<String>,
    pub config_json: Option<String>,
    pub json: Option<String>,
    pub content: Option<String>,
}

impl Placeholders {
    /// Résumé builds: escaped title and name plus the embedded document and config.
    pub fn for_resume(document: &Document, config: &Value) -> Result<Self> {
        Ok(Self {
            title: Some(escape_html(&document.title).into_owned()),
            name: Some(escape_html(&document.resume.name).into_owned()),
            data_json: Some(script_safe_json(document)?),
            config_json: Some(script_safe_json(config)?),
            json: Some(script_safe_json(&json!({
                "model": document,
                "config": config,
            }))?),
            content: None,
        })
    }

    /// Page builds: escaped title and the rendered HTML body.
    pub fn for_page(page: &RenderedPage) -> Self {
        Self {
            title: Some(escape_html(&page.title).into_owned()),
            content: Some(page.html.clone()),
            ..Self::default()
        }
    }

    fn lookup(&self, token: &str) -> Option<&str> {
        let value = match token {
            "TITLE" => &self.title,
            "NAME" => &self.name,
            "DATA_JSON" => &self.data_json,
            "CONFIG_JSON" => &self.config_json,
            "JSON" => &self.json,
            "CONTENT" => &self.content,
            _ => return None,
        };
        value.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Reads a template from disk.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::TemplateNotFound(path.to_path_buf()));
        }

        let source = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(source))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Substitutes every placeholder in one left-to-right pass. Inserted text
    /// is never rescanned, so a value containing `__TITLE__` stays literal.
    pub fn render(&self, values: &Placeholders) -> String {
        PLACEHOLDER
            .replace_all(&self.source, |caps: &Captures<'_>| {
                values
                    .lookup(&caps[1])
                    .unwrap_or(&caps[0])
                    .to_string()
            })
            .into_owned()
    }
}

/// Serializes `value` as JSON that can sit inside a `<script>` element.
pub fn script_safe_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value)?;
    Ok(json.replace("</", "<\\/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParseOptions, parse_resume};
    use pretty_assertions::assert_eq;

    #[test]
    fn fills_known_placeholders_and_keeps_unknown_ones() {
        let template = Template::new("<h1>__TITLE__</h1> __UNKNOWN__ __NAME__");
        let values = Placeholders {
            title: Some("T".into()),
            ..Placeholders::default()
        };

        assert_eq!(template.render(&values), "<h1>T</h1> __UNKNOWN__ __NAME__");
    }

    #[test]
    fn substituted_text_is_not_rescanned() {
        let template = Template::new("__TITLE__|__CONTENT__");
        let values = Placeholders {
            title: Some("__CONTENT__".into()),
            content: Some("body".into()),
            ..Placeholders::default()
        };

        assert_eq!(template.render(&values), "__CONTENT__|body");
    }

    #[test]
    fn embedded_json_cannot_close_the_script() {
        let json = script_safe_json(&"</script><script>alert(1)").unwrap();
        assert_eq!(json, r#""<\/script><script>alert(1)""#);
    }

    #[test]
    fn resume_placeholders_escape_and_embed() {
        let doc = parse_resume("# Jane <Doe>\n## Summary\n</script>\n", &ParseOptions::default());
        let config = json!({"ui": {"defaultView": "short"}});
        let values = Placeholders::for_resume(&doc, &config).unwrap();

        assert_eq!(values.title.as_deref(), Some("Jane &lt;Doe&gt;"));
        assert_eq!(values.name.as_deref(), Some("Jane &lt;Doe&gt;"));
        assert_eq!(
            values.config_json.as_deref(),
            Some(r#"{"ui":{"defaultView":"short"}}"#)
        );

        let data = values.data_json.unwrap();
        assert!(!data.contains("</"));
        let parsed: Value = serde_json::from_str(&data).unwrap();
        assert_eq!(parsed["name"], "Jane <Doe>");

        let combined: Value = serde_json::from_str(&values.json.unwrap()).unwrap();
        assert_eq!(combined["model"]["title"], "Jane <Doe>");
        assert_eq!(combined["config"]["ui"]["defaultView"], "short");
    }

    #[test]
    fn load_reports_missing_templates() {
        let err = Template::load(Path::new("/definitely/not/here.html")).unwrap_err();
        assert!(matches!(err, Error::TemplateNotFound(_)));
    }
}

//! File-level builds: read Markdown, render through a template, write HTML.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::page::{Heading, render_page};
use crate::streaming_rewriter::RewriteOptions;
use crate::template::{DEFAULT_PAGE_TEMPLATE, Placeholders, Template};
use crate::{ParseOptions, parse_resume};

/// Inputs for a résumé build.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub template: PathBuf,
    /// Optional JSON object handed to the template as-is.
    pub config: Option<PathBuf>,
    pub options: ParseOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub output: PathBuf,
    pub title: String,
    pub sections: usize,
    pub jobs: usize,
}

/// Parses the résumé at `request.input` and writes the filled template.
///
/// Fails before anything is written when the input or template is missing,
/// the config is malformed, or the résumé has no `# Name` heading.
pub fn build_resume(request: &BuildRequest) -> Result<BuildReport> {
    let source = read_source(&request.input)?;
    let template = Template::load(&request.template)?;
    let config = load_config(request.config.as_deref())?;

    let document = parse_resume(&source, &request.options);
    if document.resume.name.is_empty() {
        return Err(Error::MissingName);
    }

    let html = template.render(&Placeholders::for_resume(&document, &config)?);
    write_atomic(&request.output, html.as_bytes())?;

    let report = BuildReport {
        output: request.output.clone(),
        title: document.title,
        sections: document.sections.len(),
        jobs: document.resume.work.len(),
    };
    info!(
        output = %report.output.display(),
        sections = report.sections,
        jobs = report.jobs,
        "wrote resume"
    );
    Ok(report)
}

/// Reads a template config. No path means an empty object.
pub fn load_config(path: Option<&Path>) -> Result<Value> {
    let Some(path) = path else {
        return Ok(Value::Object(Map::new()));
    };

    let raw = read_source(path)?;
    let value: Value = serde_json::from_str(&raw).map_err(|source| Error::InvalidConfig {
        path: path.to_path_buf(),
        source,
    })?;

    if !value.is_object() {
        return Err(Error::ConfigNotObject(path.to_path_buf()));
    }

    debug!(path = %path.display(), "loaded config");
    Ok(value)
}

/// Inputs for rendering a standalone Markdown page.
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    pub input: PathBuf,
    /// Defaults to the input path with an `.html` extension.
    pub output: Option<PathBuf>,
    /// Defaults to [`DEFAULT_PAGE_TEMPLATE`].
    pub template: Option<PathBuf>,
    pub rewrite: RewriteOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    pub output: PathBuf,
    pub title: String,
    pub headings: Vec<Heading>,
}

pub fn build_page(request: &PageRequest) -> Result<PageReport> {
    if !is_markdown(&request.input) {
        return Err(Error::NotMarkdown(request.input.clone()));
    }

    let source = read_source(&request.input)?;
    let template = match &request.template {
        Some(path) => Template::load(path)?,
        None => Template::new(DEFAULT_PAGE_TEMPLATE),
    };

    let output = request
        .output
        .clone()
        .unwrap_or_else(|| request.input.with_extension("html"));

    let page = render_page(&source, request.rewrite)?;
    let html = template.render(&Placeholders::for_page(&page));

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| Error::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    write_atomic(&output, html.as_bytes())?;

    info!(output = %output.display(), title = %page.title, "wrote page");
    Ok(PageReport {
        output,
        title: page.title,
        headings: page.headings,
    })
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown"))
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes through a temp file in the destination directory and renames it
/// into place, so readers never observe a partial file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = NamedTempFile::new_in(dir).map_err(write_err)?;
    if let Some(permissions) = output_permissions(path).map_err(write_err)? {
        file.as_file()
            .set_permissions(permissions)
            .map_err(write_err)?;
    }
    file.write_all(contents).map_err(write_err)?;
    file.as_file().sync_all().map_err(write_err)?;
    file.persist(path).map_err(|err| write_err(err.error))?;
    Ok(())
}

/// Temp files are created owner-only. An overwrite keeps the existing file's
/// mode; a new file gets the usual world-readable `0644`.
fn output_permissions(path: &Path) -> io::Result<Option<fs::Permissions>> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(Some(metadata.permissions())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(default_permissions()),
        Err(err) => Err(err),
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}

#![deny(missing_docs)]
//! Node.js bindings that surface the resumark parser.

use napi_derive::napi;
use resumark_core::ParseOptions;

/// Returns the version string reported by the core crate.
#[napi]
pub fn version() -> String {
    resumark_core::version().to_string()
}

/// Parses résumé Markdown and returns the document as a JSON string.
///
/// `options` is an optional JSON object such as `{"flatBullets": true}`.
#[napi(js_name = "parseResume")]
pub fn parse_resume(source: String, options: Option<String>) -> napi::Result<String> {
    let options: ParseOptions = match options {
        Some(raw) => serde_json::from_str(&raw).map_err(to_napi_error)?,
        None => ParseOptions::default(),
    };

    let document = resumark_core::parse_resume(&source, &options);
    serde_json::to_string(&document).map_err(to_napi_error)
}

/// Renders inline résumé Markdown (bold, italic, code, links) to escaped HTML.
#[napi(js_name = "renderInline")]
pub fn render_inline(text: String) -> String {
    resumark_core::render_inline(&text)
}

fn to_napi_error(err: serde_json::Error) -> napi::Error {
    napi::Error::from_reason(err.to_string())
}

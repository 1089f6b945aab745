use js_sys::Function;
use resumark_core::{
    MarkdownStream, ParseOptions, RewriteOptions, StreamingRewriter, get_event_iterator,
    render_page,
};
use std::io::{self, Write};
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

/// Parses résumé Markdown into the document JSON consumed by the templates.
///
/// `options` is an optional JSON object, e.g. `{"dropLinksSection": true}`.
#[wasm_bindgen(js_name = parse_resume)]
pub fn parse_resume(input: &str, options: Option<String>) -> Result<String, JsError> {
    let options: ParseOptions = match options {
        Some(raw) => serde_json::from_str(&raw).map_err(to_js_error)?,
        None => ParseOptions::default(),
    };

    let document = resumark_core::parse_resume(input, &options);
    serde_json::to_string(&document).map_err(to_js_error)
}

/// Renders one line of inline résumé Markdown to escaped HTML.
#[wasm_bindgen(js_name = render_inline)]
pub fn render_inline(text: &str) -> String {
    resumark_core::render_inline(text)
}

/// Renders a Markdown page into an HTML `String`.
#[wasm_bindgen(js_name = render_html)]
pub fn render_html(input: &str) -> Result<String, JsError> {
    render_page(input, RewriteOptions::default())
        .map(|page| page.html)
        .map_err(to_js_error)
}

/// Streams rendered HTML chunks into the provided JavaScript callback.
///
/// The callback is invoked with each UTF-8 chunk produced by the streaming
/// renderer, so callers can forward output to a `WritableStream`, append to the
/// DOM incrementally, or buffer it manually.
#[wasm_bindgen(js_name = stream_html)]
pub fn stream_html(
    input: &str,
    chunk_callback: &Function,
    enforce_img_loading_lazy: Option<bool>,
) -> Result<(), JsError> {
    let options = RewriteOptions {
        enforce_img_loading_lazy: enforce_img_loading_lazy.unwrap_or(true),
        ..RewriteOptions::default()
    };

    let writer = JsChunkWriter::new(chunk_callback.clone());
    let rewriter = StreamingRewriter::new(writer, options);

    let rewriter = get_event_iterator(input)
        .stream_to_writer(rewriter)
        .map_err(to_js_error)?;

    rewriter.into_inner().map_err(to_js_error)?;
    Ok(())
}

fn to_js_error<E: ToString>(err: E) -> JsError {
    JsError::new(&err.to_string())
}

struct JsChunkWriter {
    callback: Function,
}

impl JsChunkWriter {
    fn new(callback: Function) -> Self {
        Self { callback }
    }
}

impl Write for JsChunkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let chunk = std::str::from_utf8(buf)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

        self.callback
            .call1(&JsValue::UNDEFINED, &JsValue::from_str(chunk))
            .map_err(js_callback_error)?;

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn js_callback_error(err: JsValue) -> io::Error {
    let message = err
        .as_string()
        .or_else(|| {
            js_sys::JSON::stringify(&err)
                .ok()
                .and_then(|s| s.as_string())
        })
        .unwrap_or_else(|| "callback threw".to_string());
    io::Error::other(message)
}

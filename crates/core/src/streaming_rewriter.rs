//! Streaming HTML rewriter glue that feeds rendered Markdown into lol_html without buffering.

use lol_html::errors::RewritingError;
use lol_html::{HtmlRewriter, OutputSink, Selector, Settings, element};
use std::borrow::Cow;
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// Configuration flags that control how the streaming rewriter manipulates HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteOptions {
    /// When enabled, missing `loading` attributes on `<img>` tags are defaulted to `lazy`.
    pub enforce_img_loading_lazy: bool,
    /// When enabled, absolute `http(s)` links open in a new tab with `rel="noopener noreferrer"`.
    pub external_links_new_tab: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        RewriteOptions {
            enforce_img_loading_lazy: true,
            external_links_new_tab: true,
        }
    }
}

/// Implements [`Write`] so the `PipeAdapter` can push raw HTML directly into lol_html.
///
/// The destination writer is shared through a single `Rc<RefCell<Option<W>>>`, which
/// satisfies lol_html's `OutputSink` trait without buffering rewritten output.
pub struct StreamingRewriter<W: Write> {
    rewriter: Option<HtmlRewriter<'static, OutputProxy<W>>>,
    target: Rc<RefCell<Option<W>>>,
    sink_error: Rc<RefCell<Option<io::Error>>>,
}

impl<W: Write> StreamingRewriter<W> {
    /// Creates a rewriter that forwards lol_html output into `writer`.
    pub fn new(writer: W, options: RewriteOptions) -> Self {
        let target = Rc::new(RefCell::new(Some(writer)));
        let sink_error = Rc::new(RefCell::new(None));
        let output_sink = OutputProxy {
            target: Rc::clone(&target),
            sink_error: Rc::clone(&sink_error),
        };
        let rewriter = HtmlRewriter::new(options.into_settings(), output_sink);

        Self {
            rewriter: Some(rewriter),
            target,
            sink_error,
        }
    }

    /// Consumes the rewriter, ensures lol_html has flushed, and returns the underlying writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.finalize_if_needed()?;

        let cell = Rc::try_unwrap(self.target)
            .map_err(|_| io::Error::other("rewriter still borrowed"))?;

        cell.into_inner()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "writer missing"))
    }

    fn finalize_if_needed(&mut self) -> io::Result<()> {
        if let Some(rewriter) = self.rewriter.take() {
            rewriter.end().map_err(rewriting_error_to_io)?;
        }

        take_sink_error(&self.sink_error)
    }
}

impl<W: Write> Write for StreamingRewriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let rewriter = self
            .rewriter
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "rewriter finalized"))?;

        rewriter.write(buf).map_err(rewriting_error_to_io)?;
        take_sink_error(&self.sink_error)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.finalize_if_needed()
    }
}

impl RewriteOptions {
    fn into_settings(self) -> Settings<'static, 'static> {
        let mut settings = Settings::default();
        let mut handlers = Vec::new();

        if self.enforce_img_loading_lazy {
            handlers.push(lazy_img_handler());
        }

        if self.external_links_new_tab {
            handlers.push(external_link_handler());
        }

        settings.element_content_handlers = handlers;
        settings
    }
}

fn lazy_img_handler() -> (
    Cow<'static, Selector>,
    lol_html::ElementContentHandlers<'static>,
) {
    element!("img", |el| {
        if el.get_attribute("loading").is_none() {
            el.set_attribute("loading", "lazy")?;
        }

        Ok(())
    })
}

fn external_link_handler() -> (
    Cow<'static, Selector>,
    lol_html::ElementContentHandlers<'static>,
) {
    element!("a[href]", |el| {
        let external = el
            .get_attribute("href")
            .is_some_and(|href| is_external_url(&href));

        if external {
            if el.get_attribute("target").is_none() {
                el.set_attribute("target", "_blank")?;
            }
            el.set_attribute("rel", "noopener noreferrer")?;
        }

        Ok(())
    })
}

fn is_external_url(href: &str) -> bool {
    let href = href.trim_start();
    ["http://", "https://"].iter().any(|scheme| {
        href.get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
    })
}

fn take_sink_error(cell: &Rc<RefCell<Option<io::Error>>>) -> io::Result<()> {
    match cell.borrow_mut().take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn rewriting_error_to_io(err: RewritingError) -> io::Error {
    io::Error::other(err)
}

struct OutputProxy<W: Write> {
    target: Rc<RefCell<Option<W>>>,
    sink_error: Rc<RefCell<Option<io::Error>>>,
}

impl<W: Write> OutputSink for OutputProxy<W> {
    fn handle_chunk(&mut self, chunk: &[u8]) {
        if chunk.is_empty() || self.sink_error.borrow().is_some() {
            return;
        }

        if let Some(writer) = self.target.borrow_mut().as_mut() {
            if let Err(err) = writer.write_all(chunk) {
                *self.sink_error.borrow_mut() = Some(err);
            }
        }
    }
}

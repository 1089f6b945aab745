use pulldown_cmark::{Event, Options, Parser, html};
use std::io::{self, Write};

/// A bridge that accepts an Iterator of Markdown Events and streams
/// the resulting HTML directly to an io::Write, avoiding intermediate String allocation.
pub struct PipeAdapter<W> {
    writer: W,
}

impl<W: Write> PipeAdapter<W> {
    /// Create a new adapter wrapping an IO writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the event iterator, drives the HTML into the writer, flushes
    /// it and hands it back.
    pub fn drive<'a, I>(self, events: I) -> io::Result<W>
    where
        I: Iterator<Item = Event<'a>>,
    {
        let mut writer = self.writer;
        html::write_html_io(&mut writer, events)?;

        // Flushing finalizes a `StreamingRewriter`, so do it before handing back.
        writer.flush()?;
        Ok(writer)
    }
}

/// Extension for any Markdown event stream.
pub trait MarkdownStream<'a>: Iterator<Item = Event<'a>> + Sized {
    /// Streams the rendered HTML into `writer` and returns it.
    fn stream_to_writer<W: Write>(self, writer: W) -> io::Result<W> {
        PipeAdapter::new(writer).drive(self)
    }
}

impl<'a, I> MarkdownStream<'a> for I where I: Iterator<Item = Event<'a>> {}

/// CommonMark plus the GFM extensions documents in this repo rely on.
pub fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options
}

/// Starts a Markdown event stream over `input`.
pub fn get_event_iterator(input: &str) -> Parser<'_> {
    Parser::new_ext(input, markdown_options())
}

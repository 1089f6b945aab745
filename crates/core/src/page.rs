//! Full CommonMark rendering for standalone Markdown pages.

use std::collections::HashSet;
use std::io;

use pulldown_cmark::{CowStr, Event, HeadingLevel, Tag, TagEnd};
use serde::Serialize;
use tracing::debug;

use crate::adapter::{MarkdownStream, get_event_iterator};
use crate::slugify::slugify;
use crate::streaming_rewriter::{RewriteOptions, StreamingRewriter};

/// Title used when a page has no level-one heading.
pub const DEFAULT_PAGE_TITLE: &str = "Documentation";

/// An anchored heading, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub depth: u8,
    pub text: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedPage {
    pub title: String,
    pub html: String,
    pub headings: Vec<Heading>,
}

/// Renders `source` to HTML.
///
/// Headings down to `###` get unique `id` attributes. The HTML is streamed
/// through [`StreamingRewriter`] with `options` before it is collected.
pub fn render_page(source: &str, options: RewriteOptions) -> io::Result<RenderedPage> {
    let mut events: Vec<Event<'_>> = get_event_iterator(source).collect();
    let headings = anchor_headings(&mut events);

    let title = headings
        .iter()
        .find(|heading| heading.depth == 1)
        .map(|heading| heading.text.clone())
        .unwrap_or_else(|| DEFAULT_PAGE_TITLE.to_string());

    let rewriter = events
        .into_iter()
        .stream_to_writer(StreamingRewriter::new(Vec::new(), options))?;
    let html = String::from_utf8(rewriter.into_inner()?)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

    debug!(%title, headings = headings.len(), bytes = html.len(), "rendered page");

    Ok(RenderedPage {
        title,
        html,
        headings,
    })
}

fn anchored_depth(level: HeadingLevel) -> Option<u8> {
    match level {
        HeadingLevel::H1 => Some(1),
        HeadingLevel::H2 => Some(2),
        HeadingLevel::H3 => Some(3),
        _ => None,
    }
}

fn anchor_headings(events: &mut [Event<'_>]) -> Vec<Heading> {
    // (index of the Start event, depth, collected text)
    let mut found: Vec<(usize, u8, String)> = Vec::new();
    let mut open: Option<(usize, u8, String)> = None;

    for (index, event) in events.iter().enumerate() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                open = anchored_depth(*level).map(|depth| (index, depth, String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, buf)) = open.as_mut() {
                    buf.push_str(text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, _, buf)) = open.as_mut() {
                    buf.push(' ');
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(heading) = open.take() {
                    found.push(heading);
                }
            }
            _ => {}
        }
    }

    let mut used_slugs = HashSet::new();
    found
        .into_iter()
        .map(|(index, depth, text)| {
            let text = text.trim().to_string();
            let slug = slugify(&text, &mut used_slugs);
            if let Event::Start(Tag::Heading { id, .. }) = &mut events[index] {
                *id = Some(CowStr::from(slug.clone()));
            }
            Heading { depth, text, slug }
        })
        .collect()
}

use std::io::{self, Write};

use crate::block::Block;
use crate::escape::{escape_html, sanitize_url};
use crate::inline::render_inline;
use crate::model::Link;

/// Writes section blocks as HTML, one block per line.
pub struct HtmlRenderer<W: Write> {
    writer: W,
    wrote_block: bool,
}

impl<W: Write> HtmlRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            wrote_block: false,
        }
    }

    pub fn render<I>(mut self, blocks: I) -> io::Result<W>
    where
        I: IntoIterator<Item = Block>,
    {
        for block in blocks {
            self.separate()?;
            match block {
                Block::Paragraph(text) => {
                    self.writer.write_all(b"<p>")?;
                    self.write_inline(&text)?;
                    self.writer.write_all(b"</p>")?;
                }
                Block::List(items) => {
                    self.writer.write_all(b"<ul>")?;
                    for item in &items {
                        self.writer.write_all(b"<li>")?;
                        self.write_inline(item)?;
                        self.writer.write_all(b"</li>")?;
                    }
                    self.writer.write_all(b"</ul>")?;
                }
                Block::Rule => {
                    self.writer.write_all(b"<hr />")?;
                }
                Block::Heading { level, text } => {
                    write!(self.writer, "<h{}>", level as u8)?;
                    self.write_inline(&text)?;
                    write!(self.writer, "</h{}>", level as u8)?;
                }
                Block::CompanyLine(text) => {
                    self.writer
                        .write_all(b"<div class=\"companyline\"><strong>")?;
                    self.write_inline(&text)?;
                    self.writer.write_all(b"</strong></div>")?;
                }
            }
        }

        Ok(self.writer)
    }

    /// Writes the Links section as a single list of anchors.
    pub fn render_links(mut self, links: &[Link]) -> io::Result<W> {
        if links.is_empty() {
            return Ok(self.writer);
        }

        self.writer.write_all(b"<ul>")?;
        for link in links {
            self.writer.write_all(b"<li><a href=\"")?;
            self.writer
                .write_all(escape_html(sanitize_url(&link.url)).as_bytes())?;
            self.writer
                .write_all(b"\" target=\"_blank\" rel=\"noopener noreferrer\">")?;
            self.write_inline(&link.label)?;
            self.writer.write_all(b"</a></li>")?;
        }
        self.writer.write_all(b"</ul>")?;

        Ok(self.writer)
    }

    fn separate(&mut self) -> io::Result<()> {
        if self.wrote_block {
            self.writer.write_all(b"\n")?;
        }
        self.wrote_block = true;
        Ok(())
    }

    fn write_inline(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(render_inline(text).as_bytes())
    }
}

/// Renders blocks into an owned HTML string.
pub fn blocks_to_html(blocks: Vec<Block>) -> String {
    HtmlRenderer::new(Vec::new())
        .render(blocks)
        .map(bytes_to_string)
        .unwrap_or_default()
}

/// Renders a link list into an owned HTML string.
pub fn links_to_html(links: &[Link]) -> String {
    HtmlRenderer::new(Vec::new())
        .render_links(links)
        .map(bytes_to_string)
        .unwrap_or_default()
}

// Every fragment written above comes from `&str`, so the buffer is valid UTF-8.
fn bytes_to_string(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::HeadingLevel;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_each_block_kind() {
        let html = blocks_to_html(vec![
            Block::Heading {
                level: HeadingLevel::H3,
                text: "Side *projects*".into(),
            },
            Block::CompanyLine("Acme & Co".into()),
            Block::Paragraph("Built **things**.".into()),
            Block::List(vec!["one".into(), "`two`".into()]),
            Block::Rule,
        ]);

        assert_eq!(
            html,
            "<h3>Side <em>projects</em></h3>\n\
             <div class=\"companyline\"><strong>Acme &amp; Co</strong></div>\n\
             <p>Built <strong>things</strong>.</p>\n\
             <ul><li>one</li><li><code>two</code></li></ul>\n\
             <hr />"
        );
    }

    #[test]
    fn renders_nothing_for_no_blocks() {
        assert_eq!(blocks_to_html(Vec::new()), "");
    }

    #[test]
    fn renders_link_lists() {
        let links = vec![
            Link {
                label: "GitHub".into(),
                url: "https://github.com/jane".into(),
            },
            Link {
                label: "Blog <dev>".into(),
                url: "https://jane.dev/?a=1&b=2".into(),
            },
        ];

        assert_eq!(
            links_to_html(&links),
            "<ul><li><a href=\"https://github.com/jane\" target=\"_blank\" rel=\"noopener noreferrer\">GitHub</a></li>\
             <li><a href=\"https://jane.dev/?a=1&amp;b=2\" target=\"_blank\" rel=\"noopener noreferrer\">Blog &lt;dev&gt;</a></li></ul>"
        );
        assert_eq!(links_to_html(&[]), "");
    }
}

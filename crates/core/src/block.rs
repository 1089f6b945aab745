use std::sync::LazyLock;

use regex::Regex;

static BOLD_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*(.+)\*\*$").expect("valid bold line regex"));

/// A block-level element of a generic section body.
///
/// Text is kept as raw Markdown; inline rendering happens when the block is
/// written out by [`HtmlRenderer`](crate::html_renderer::HtmlRenderer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Blank-line separated run of text lines, joined by a single space.
    Paragraph(String),
    /// Contiguous `- ` bullets.
    List(Vec<String>),
    /// A lone `---` line.
    Rule,
    /// `###` or deeper sub-heading.
    Heading { level: HeadingLevel, text: String },
    /// A line that is entirely `**bold**`.
    CompanyLine(String),
}

/// Sub-heading depth inside a section body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingLevel {
    H3 = 3,
    H4,
}

/// Knobs for [`parse_blocks`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockOptions {
    /// Keep `<!-- ... -->` lines as paragraph text instead of skipping them.
    pub keep_comments: bool,
}

/// Splits a section body into blocks.
///
/// A line is a bullet only when it starts with `- ` after trimming; any other
/// non-blank line closes an open list.
pub fn parse_blocks<S>(lines: &[S], options: BlockOptions) -> Vec<Block>
where
    S: AsRef<str>,
{
    let mut builder = BlockBuilder::default();

    for raw in lines {
        let line = raw.as_ref().trim();

        if line.is_empty() {
            builder.flush();
            continue;
        }

        if !options.keep_comments && line.starts_with("<!--") {
            continue;
        }

        if line == "---" {
            builder.flush();
            builder.blocks.push(Block::Rule);
            continue;
        }

        if let Some(text) = line.strip_prefix("#### ") {
            builder.flush();
            builder.blocks.push(Block::Heading {
                level: HeadingLevel::H4,
                text: text.trim().to_string(),
            });
            continue;
        }

        if let Some(text) = line.strip_prefix("### ") {
            builder.flush();
            builder.blocks.push(Block::Heading {
                level: HeadingLevel::H3,
                text: text.trim().to_string(),
            });
            continue;
        }

        if let Some(item) = line.strip_prefix("- ") {
            builder.flush_paragraph();
            builder.list.push(item.trim().to_string());
            continue;
        }

        if let Some(caps) = BOLD_LINE.captures(line) {
            builder.flush();
            let inner = caps.get(1).map_or("", |m| m.as_str());
            builder
                .blocks
                .push(Block::CompanyLine(inner.trim_matches('*').trim().to_string()));
            continue;
        }

        builder.flush_list();
        builder.paragraph.push(line.to_string());
    }

    builder.flush();
    builder.blocks
}

#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<Block>,
    paragraph: Vec<String>,
    list: Vec<String>,
}

impl BlockBuilder {
    fn flush(&mut self) {
        self.flush_paragraph();
        self.flush_list();
    }

    fn flush_paragraph(&mut self) {
        if !self.paragraph.is_empty() {
            let text = self.paragraph.join(" ");
            self.paragraph.clear();
            self.blocks.push(Block::Paragraph(text));
        }
    }

    fn flush_list(&mut self) {
        if !self.list.is_empty() {
            self.blocks.push(Block::List(std::mem::take(&mut self.list)));
        }
    }
}

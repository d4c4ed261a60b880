pub mod rich_text;

use std::fmt;
use std::ops::Range;

use serde_json::Value;

pub use rich_text::RichText;

/// One unit of page content: a typed payload plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub content: BlockContent,
    /// Byte span of the block record in its source, when it was parsed from one.
    pub span: Option<Range<usize>>,
}

impl Block {
    pub fn new(content: BlockContent) -> Self {
        Block {
            content,
            span: None,
        }
    }

    pub fn with_span(mut self, span: Range<usize>) -> Self {
        self.span = Some(span);
        self
    }

    /// The block's kind discriminant, as the source system names it.
    pub fn kind(&self) -> &str {
        self.content.kind()
    }
}

/// Heading depth. The source system only has three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    One,
    Two,
    Three,
}

impl HeadingLevel {
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            "heading_1" => Some(HeadingLevel::One),
            "heading_2" => Some(HeadingLevel::Two),
            "heading_3" => Some(HeadingLevel::Three),
            _ => None,
        }
    }

    pub fn kind(self) -> &'static str {
        match self {
            HeadingLevel::One => "heading_1",
            HeadingLevel::Two => "heading_2",
            HeadingLevel::Three => "heading_3",
        }
    }

    pub fn number(self) -> u8 {
        match self {
            HeadingLevel::One => 1,
            HeadingLevel::Two => 2,
            HeadingLevel::Three => 3,
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// The kind-specific payload of a block.
///
/// Known kinds get their own variant; everything else lands in `Unsupported`
/// with the raw payload kept for display.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    Paragraph(Vec<RichText>),
    Heading {
        level: HeadingLevel,
        text: Vec<RichText>,
    },
    BulletedListItem(Vec<RichText>),
    NumberedListItem(Vec<RichText>),
    ToDo {
        text: Vec<RichText>,
        checked: bool,
    },
    Code {
        text: Vec<RichText>,
        language: String,
    },
    Unsupported {
        kind: String,
        payload: Value,
    },
}

impl BlockContent {
    pub fn kind(&self) -> &str {
        match self {
            BlockContent::Paragraph(_) => "paragraph",
            BlockContent::Heading { level, .. } => level.kind(),
            BlockContent::BulletedListItem(_) => "bulleted_list_item",
            BlockContent::NumberedListItem(_) => "numbered_list_item",
            BlockContent::ToDo { .. } => "to_do",
            BlockContent::Code { .. } => "code",
            BlockContent::Unsupported { kind, .. } => kind,
        }
    }

    /// The block's rich-text spans, or `None` for kinds that carry none.
    pub fn rich_text(&self) -> Option<&[RichText]> {
        match self {
            BlockContent::Paragraph(text)
            | BlockContent::Heading { text, .. }
            | BlockContent::BulletedListItem(text)
            | BlockContent::NumberedListItem(text)
            | BlockContent::ToDo { text, .. }
            | BlockContent::Code { text, .. } => Some(text),
            BlockContent::Unsupported { .. } => None,
        }
    }

    /// Text of the leading span. Only the first span is ever displayed.
    pub fn first_text(&self) -> Option<&str> {
        self.rich_text()
            .and_then(|spans| spans.first())
            .map(|span| span.text.as_str())
    }
}

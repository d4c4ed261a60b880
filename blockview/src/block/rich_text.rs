use serde::Deserialize;

/// A fragment of styled text. Styling is dropped; only the raw text is kept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "SpanRecord")]
pub struct RichText {
    pub text: String,
}

impl RichText {
    pub fn new(text: impl Into<String>) -> Self {
        RichText { text: text.into() }
    }
}

/// Wire shape of a span. `text` is either a bare string or the hosted API's
/// `{ "content": ... }` object; mention and equation spans only have `plain_text`.
#[derive(Deserialize)]
struct SpanRecord {
    #[serde(default)]
    text: Option<SpanText>,
    #[serde(default)]
    plain_text: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SpanText {
    Plain(String),
    Content { content: String },
}

impl TryFrom<SpanRecord> for RichText {
    type Error = String;

    fn try_from(record: SpanRecord) -> Result<Self, Self::Error> {
        match (record.text, record.plain_text) {
            (Some(SpanText::Plain(text)), _) => Ok(RichText { text }),
            (Some(SpanText::Content { content }), _) => Ok(RichText { text: content }),
            (None, Some(text)) => Ok(RichText { text }),
            (None, None) => Err("rich-text span has neither `text` nor `plain_text`".into()),
        }
    }
}

use std::ops::Range;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;
use serde_json::{Map, Value};

use crate::block::{Block, BlockContent, HeadingLevel, RichText};
use crate::parser::error::ParseError;

/// Language label the hosted API uses when a code block has none.
pub const DEFAULT_CODE_LANGUAGE: &str = "plain text";

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse a JSON block document into a list of blocks.
pub fn parse_blocks(source: &str, file_id: usize) -> Result<Vec<Block>, Vec<ParseError>> {
    let records = split_records(source, file_id).map_err(|e| vec![e])?;

    let mut blocks = Vec::with_capacity(records.len());
    let mut errors = Vec::new();

    for (position, raw) in records.into_iter().enumerate() {
        let span = raw_span(source, raw);
        match parse_record(raw.get()) {
            Ok(content) => blocks.push(Block::new(content).with_span(span)),
            Err(message) => errors.push(
                ParseError::error(message, span, file_id)
                    .with_note(format!("in block record at index {}", position)),
            ),
        }
    }

    if errors.is_empty() {
        Ok(blocks)
    } else {
        Err(errors)
    }
}

// ---------------------------------------------------------------------------
// Top-level document
// ---------------------------------------------------------------------------

/// The list-children response shape: `{ "object": "list", "results": [...] }`.
#[derive(Deserialize)]
struct ListResponse<'a> {
    #[serde(borrow)]
    results: Vec<&'a RawValue>,
}

fn split_records(source: &str, file_id: usize) -> Result<Vec<&RawValue>, ParseError> {
    // Spans stay relative to `source`; only the JSON parse skips the BOM.
    let body = source.strip_prefix('\u{feff}').unwrap_or(source);
    let bom_len = source.len() - body.len();

    let trimmed = body.trim_start();
    let start = source.len() - trimmed.len();

    let parsed = match trimmed.chars().next() {
        Some('[') => serde_json::from_str::<Vec<&RawValue>>(body),
        Some('{') => serde_json::from_str::<ListResponse<'_>>(body).map(|list| list.results),
        other => {
            let end = start + other.map_or(0, char::len_utf8);
            return Err(ParseError::error(
                "expected a JSON array of blocks or an object with a `results` array",
                start..end,
                file_id,
            ));
        }
    };

    parsed.map_err(|err| json_error(source, bom_len, file_id, &err))
}

fn json_error(
    source: &str,
    bom_len: usize,
    file_id: usize,
    err: &serde_json::Error,
) -> ParseError {
    let offset = bom_len + line_col_to_offset(&source[bom_len..], err.line(), err.column());
    let end = source[offset..]
        .chars()
        .next()
        .map_or(offset, |c| offset + c.len_utf8());
    ParseError::error(
        format!("invalid block document: {}", err),
        offset..end,
        file_id,
    )
}

/// Convert serde_json's 1-based line/column into a byte offset.
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let mut offset = (line_start + column.saturating_sub(1)).min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Byte span of a borrowed raw value within the source it was parsed from.
fn raw_span(source: &str, raw: &RawValue) -> Range<usize> {
    let text = raw.get();
    let start = (text.as_ptr() as usize)
        .saturating_sub(source.as_ptr() as usize)
        .min(source.len());
    start..(start + text.len()).min(source.len())
}

// ---------------------------------------------------------------------------
// Block records
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct TextPayload {
    #[serde(default)]
    rich_text: Vec<RichText>,
}

#[derive(Deserialize)]
struct ToDoPayload {
    #[serde(default)]
    rich_text: Vec<RichText>,
    #[serde(default)]
    checked: bool,
}

#[derive(Deserialize)]
struct CodePayload {
    #[serde(default)]
    rich_text: Vec<RichText>,
    #[serde(default = "default_language")]
    language: String,
}

fn default_language() -> String {
    DEFAULT_CODE_LANGUAGE.to_string()
}

fn parse_record(text: &str) -> Result<BlockContent, String> {
    let mut record: Map<String, Value> =
        serde_json::from_str(text).map_err(|_| "block record is not a JSON object".to_string())?;

    let kind = match record.get("type") {
        Some(Value::String(kind)) if !kind.is_empty() => kind.clone(),
        Some(Value::String(_)) => return Err("block has an empty `type`".into()),
        Some(other) => {
            return Err(format!(
                "block `type` must be a string, found {}",
                json_type_name(other)
            ));
        }
        None => return Err("block has no `type`".into()),
    };

    if let Some(level) = HeadingLevel::from_kind(&kind) {
        let text = payload::<TextPayload>(&kind, &record)?.rich_text;
        return Ok(BlockContent::Heading { level, text });
    }

    let content = match kind.as_str() {
        "paragraph" => BlockContent::Paragraph(payload::<TextPayload>(&kind, &record)?.rich_text),
        "bulleted_list_item" => {
            BlockContent::BulletedListItem(payload::<TextPayload>(&kind, &record)?.rich_text)
        }
        "numbered_list_item" => {
            BlockContent::NumberedListItem(payload::<TextPayload>(&kind, &record)?.rich_text)
        }
        "to_do" => {
            let to_do = payload::<ToDoPayload>(&kind, &record)?;
            BlockContent::ToDo {
                text: to_do.rich_text,
                checked: to_do.checked,
            }
        }
        "code" => {
            let code = payload::<CodePayload>(&kind, &record)?;
            BlockContent::Code {
                text: code.rich_text,
                language: code.language,
            }
        }
        _ => {
            let payload = match record.remove(&kind) {
                Some(payload) => payload,
                None => Value::Object(record),
            };
            BlockContent::Unsupported { kind, payload }
        }
    };

    Ok(content)
}

fn payload<T: DeserializeOwned>(kind: &str, record: &Map<String, Value>) -> Result<T, String> {
    let value = record
        .get(kind)
        .ok_or_else(|| format!("`{}` block has no `{}` payload", kind, kind))?;
    T::deserialize(value).map_err(|e| format!("invalid `{}` payload: {}", kind, e))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

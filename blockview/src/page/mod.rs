use serde::Deserialize;
use serde_json::Value;

use crate::block::RichText;

/// Title shown when a page has no title property or an empty one.
pub const UNTITLED: &str = "Untitled Document";

/// Name of the multi-select property read as the page's categories.
pub const DEFAULT_CATEGORY_PROPERTY: &str = "Category";

/// Display metadata of a page, read from a page object.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSummary {
    pub title: String,
    pub categories: Vec<String>,
    pub created_time: Option<String>,
    pub last_edited_time: Option<String>,
}

#[derive(Deserialize)]
struct SelectOption {
    name: String,
}

impl PageSummary {
    /// Parse a page object from JSON source.
    pub fn parse(source: &str, category_property: &str) -> Result<Self, serde_json::Error> {
        let page: Value = serde_json::from_str(source)?;
        Ok(Self::from_json(&page, category_property))
    }

    /// Extract the summary from an already-deserialized page object.
    ///
    /// The title comes from whichever property has `"type": "title"`; pages
    /// carry exactly one. Missing pieces fall back rather than fail.
    pub fn from_json(page: &Value, category_property: &str) -> Self {
        let properties = page.get("properties").and_then(Value::as_object);

        let title = properties
            .and_then(|props| {
                props
                    .values()
                    .find(|prop| prop.get("type").and_then(Value::as_str) == Some("title"))
            })
            .and_then(|prop| prop.get("title"))
            .and_then(|spans| Vec::<RichText>::deserialize(spans).ok())
            .map(|spans| spans.into_iter().map(|span| span.text).collect::<String>())
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        let categories = properties
            .and_then(|props| props.get(category_property))
            .and_then(|prop| prop.get("multi_select"))
            .and_then(|options| Vec::<SelectOption>::deserialize(options).ok())
            .map(|options| options.into_iter().map(|option| option.name).collect())
            .unwrap_or_default();

        PageSummary {
            title,
            categories,
            created_time: string_field(page, "created_time"),
            last_edited_time: string_field(page, "last_edited_time"),
        }
    }
}

fn string_field(page: &Value, key: &str) -> Option<String> {
    page.get(key).and_then(Value::as_str).map(str::to_string)
}

use blockview::page::PageSummary;

/// Shown in place of an empty category list.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Render a page's metadata header. Times are omitted when the page has none.
pub fn render_page_summary(summary: &PageSummary) -> Vec<String> {
    let categories = if summary.categories.is_empty() {
        UNCATEGORIZED.to_string()
    } else {
        summary.categories.join(", ")
    };

    let mut lines = vec![
        format!("Title: {}", summary.title),
        format!("Categories: {}", categories),
    ];
    if let Some(created) = &summary.created_time {
        lines.push(format!("Created: {}", created));
    }
    if let Some(edited) = &summary.last_edited_time {
        lines.push(format!("Last Edited: {}", edited));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_summary() {
        let summary = PageSummary {
            title: "Guide".into(),
            categories: vec!["Setup".into(), "Docs".into()],
            created_time: Some("2025-03-18".into()),
            last_edited_time: Some("2025-03-19".into()),
        };
        assert_eq!(
            render_page_summary(&summary),
            vec![
                "Title: Guide",
                "Categories: Setup, Docs",
                "Created: 2025-03-18",
                "Last Edited: 2025-03-19",
            ]
        );
    }

    #[test]
    fn uncategorized_without_times() {
        let summary = PageSummary {
            title: "Notes".into(),
            categories: Vec::new(),
            created_time: None,
            last_edited_time: None,
        };
        assert_eq!(
            render_page_summary(&summary),
            vec!["Title: Notes", "Categories: Uncategorized"]
        );
    }
}

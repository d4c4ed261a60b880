use blockview::block::{Block, BlockContent, HeadingLevel, RichText};
use renderer::{MalformedPolicy, RenderError, RenderOptions, render, render_with};
use serde_json::json;

fn parse(source: &str) -> Vec<Block> {
    blockview::parser::Parser::new(source.to_string(), 0)
        .parse()
        .expect("parse failed")
        .blocks
}

fn render_json(source: &str) -> Vec<String> {
    render(&parse(source))
}

fn text(s: &str) -> Vec<RichText> {
    vec![RichText::new(s)]
}

#[test]
fn empty_input_renders_no_content() {
    assert_eq!(render(&[]), vec!["no content"]);
    assert_eq!(render_json("[]"), vec!["no content"]);
}

#[test]
fn empty_input_strict_is_also_no_content() {
    let rendering = render_with(&[], &RenderOptions::strict()).unwrap();
    assert!(rendering.is_empty());
    assert_eq!(rendering.lines(), vec!["no content"]);
}

#[test]
fn to_do_checked_and_unchecked() {
    let checked = Block::new(BlockContent::ToDo {
        text: text("Buy milk"),
        checked: true,
    });
    let unchecked = Block::new(BlockContent::ToDo {
        text: text("Buy milk"),
        checked: false,
    });
    assert_eq!(render(&[checked]), vec!["[x] Buy milk"]);
    assert_eq!(render(&[unchecked]), vec!["[ ] Buy milk"]);
}

#[test]
fn heading_two() {
    let block = Block::new(BlockContent::Heading {
        level: HeadingLevel::Two,
        text: text("Features"),
    });
    assert_eq!(render(&[block]), vec!["Heading 2: Features"]);
}

#[test]
fn code_is_two_units_with_text_verbatim() {
    let block = Block::new(BlockContent::Code {
        text: text("print(1)"),
        language: "python".into(),
    });
    assert_eq!(render(&[block]), vec!["Code (python):", "print(1)"]);

    let multi = Block::new(BlockContent::Code {
        text: text("def f():\n    return 1\n"),
        language: "python".into(),
    });
    assert_eq!(
        render(&[multi]),
        vec!["Code (python):", "def f():\n    return 1\n"]
    );
}

#[test]
fn list_items() {
    let blocks = vec![
        Block::new(BlockContent::BulletedListItem(text("alpha"))),
        Block::new(BlockContent::NumberedListItem(text("first"))),
        Block::new(BlockContent::NumberedListItem(text("second"))),
    ];
    assert_eq!(render(&blocks), vec!["• alpha", "1. first", "1. second"]);
}

#[test]
fn unknown_kind_falls_back_and_continues() {
    let blocks = vec![
        Block::new(BlockContent::Unsupported {
            kind: "quote".into(),
            payload: json!({"rich_text": []}),
        }),
        Block::new(BlockContent::Paragraph(text("after"))),
    ];
    let lines = render(&blocks);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Unsupported block type: quote");
    assert!(lines[1].contains("\"rich_text\""), "dump: {}", lines[1]);
    assert_eq!(lines[2], "after");
}

#[test]
fn unsupported_dump_is_pretty_json() {
    let block = Block::new(BlockContent::Unsupported {
        kind: "callout".into(),
        payload: json!({"color": "gray"}),
    });
    assert_eq!(
        render(&[block]),
        vec!["Unsupported block type: callout", "{\n  \"color\": \"gray\"\n}"]
    );
}

#[test]
fn empty_paragraph_is_not_malformed() {
    let block = Block::new(BlockContent::Paragraph(Vec::new()));
    let rendering = render_with(&[block], &RenderOptions::strict()).unwrap();
    assert_eq!(rendering.lines(), vec!["empty paragraph"]);
    assert!(rendering.warnings.is_empty());
}

#[test]
fn malformed_block_recovers_with_placeholder() {
    let source = r#"[
        {"type": "heading_1", "heading_1": {"rich_text": [{"text": "Top"}]}},
        {"type": "bulleted_list_item", "bulleted_list_item": {"rich_text": []}},
        {"type": "paragraph", "paragraph": {"rich_text": [{"text": "still here"}]}}
    ]"#;
    let blocks = parse(source);
    let rendering = render_with(&blocks, &RenderOptions::default()).unwrap();

    assert_eq!(
        rendering.lines(),
        vec![
            "Heading 1: Top",
            "malformed block: bulleted_list_item",
            "still here"
        ]
    );
    assert_eq!(rendering.warnings.len(), 1);
    assert_eq!(rendering.warnings[0].position(), 1);
    assert_eq!(rendering.warnings[0].kind(), "bulleted_list_item");
    assert!(rendering.warnings[0].span().is_some());
}

#[test]
fn malformed_block_aborts_under_strict_policy() {
    let blocks = vec![
        Block::new(BlockContent::Paragraph(text("ok"))),
        Block::new(BlockContent::Heading {
            level: HeadingLevel::Three,
            text: Vec::new(),
        }),
        Block::new(BlockContent::Code {
            text: Vec::new(),
            language: "c".into(),
        }),
    ];
    let options = RenderOptions {
        policy: MalformedPolicy::Abort,
        annotate_kinds: false,
    };
    let err = render_with(&blocks, &options).unwrap_err();
    assert_eq!(
        err,
        RenderError::MalformedBlock {
            position: 1,
            kind: "heading_3".into(),
            span: None,
        }
    );
    assert_eq!(
        err.to_string(),
        "malformed block at index 1: `heading_3` block has no rich-text spans"
    );
}

#[test]
fn one_group_per_block_in_input_order() {
    let blocks = vec![
        Block::new(BlockContent::Code {
            text: text("x"),
            language: "rust".into(),
        }),
        Block::new(BlockContent::Paragraph(Vec::new())),
        Block::new(BlockContent::Unsupported {
            kind: "divider".into(),
            payload: json!({}),
        }),
        Block::new(BlockContent::NumberedListItem(Vec::new())),
    ];
    let rendering = render_with(&blocks, &RenderOptions::default()).unwrap();
    let positions: Vec<usize> = rendering.groups.iter().map(|g| g.position).collect();
    let kinds: Vec<&str> = rendering.groups.iter().map(|g| g.kind.as_str()).collect();
    assert_eq!(positions, vec![0, 1, 2, 3]);
    assert_eq!(kinds, vec!["code", "paragraph", "divider", "numbered_list_item"]);
}

#[test]
fn rendering_is_idempotent() {
    let blocks = parse(
        r#"[
            {"type": "to_do", "to_do": {"rich_text": [{"text": "a"}], "checked": true}},
            {"type": "toggle", "toggle": {"rich_text": [{"text": "b"}]}},
            {"type": "code", "code": {"rich_text": []}}
        ]"#,
    );
    assert_eq!(render(&blocks), render(&blocks));
}

#[test]
fn annotated_groups() {
    let blocks = vec![
        Block::new(BlockContent::Paragraph(text("hi"))),
        Block::new(BlockContent::ToDo {
            text: text("task"),
            checked: false,
        }),
    ];
    let rendering = render_with(&blocks, &RenderOptions::default().annotated()).unwrap();
    assert_eq!(
        rendering.lines(),
        vec!["Block Type: paragraph", "hi", "Block Type: to_do", "[ ] task"]
    );
}

#[test]
fn display_writes_one_line_per_unit() {
    let blocks = vec![
        Block::new(BlockContent::Heading {
            level: HeadingLevel::One,
            text: text("A"),
        }),
        Block::new(BlockContent::BulletedListItem(text("b"))),
    ];
    let rendering = render_with(&blocks, &RenderOptions::default()).unwrap();
    assert_eq!(rendering.to_string(), "Heading 1: A\n• b\n");
}

#[test]
fn full_page_snapshot() {
    let source = r#"{
        "object": "list",
        "results": [
            {"type": "heading_1", "heading_1": {"rich_text": [{"type": "text", "text": {"content": "Test Document Content"}}]}},
            {"type": "paragraph", "paragraph": {"rich_text": [{"type": "text", "text": {"content": "This is a test document."}}]}},
            {"type": "paragraph", "paragraph": {"rich_text": []}},
            {"type": "heading_2", "heading_2": {"rich_text": [{"type": "text", "text": {"content": "Features"}}]}},
            {"type": "bulleted_list_item", "bulleted_list_item": {"rich_text": [{"type": "text", "text": {"content": "Support for different block types"}}]}},
            {"type": "numbered_list_item", "numbered_list_item": {"rich_text": [{"type": "text", "text": {"content": "Rich text formatting"}}]}},
            {"type": "code", "code": {"rich_text": [{"type": "text", "text": {"content": "def hello_world():\n    print('Hello from Notion!')"}}], "language": "python"}},
            {"type": "to_do", "to_do": {"rich_text": [{"type": "text", "text": {"content": "Create test document"}}], "checked": true}},
            {"type": "to_do", "to_do": {"rich_text": [{"type": "text", "text": {"content": "Test content extraction"}}], "checked": false}},
            {"type": "divider", "divider": {}}
        ]
    }"#;
    let rendering = render_with(&parse(source), &RenderOptions::default()).unwrap();
    insta::assert_snapshot!(rendering.to_string(), @r"
    Heading 1: Test Document Content
    This is a test document.
    empty paragraph
    Heading 2: Features
    • Support for different block types
    1. Rich text formatting
    Code (python):
    def hello_world():
        print('Hello from Notion!')
    [x] Create test document
    [ ] Test content extraction
    Unsupported block type: divider
    {}
    ");
}

use blockview::block::{Block, BlockContent};

use crate::error::RenderError;
use crate::options::{MalformedPolicy, RenderOptions};
use crate::output::{BlockOutput, Rendering};

/// Marker for a paragraph with no spans. Paragraphs are the one text kind
/// allowed to be empty.
pub const EMPTY_PARAGRAPH: &str = "empty paragraph";

/// Render blocks to display lines with the default options.
///
/// Malformed blocks become placeholder lines; nothing is dropped. An empty
/// input renders as the single line `no content`.
pub fn render(blocks: &[Block]) -> Vec<String> {
    render_recovering(blocks, &RenderOptions::default()).into_lines()
}

/// Render blocks into per-block groups, applying the given malformed-block policy.
pub fn render_with(blocks: &[Block], options: &RenderOptions) -> Result<Rendering, RenderError> {
    match options.policy {
        MalformedPolicy::Placeholder => Ok(render_recovering(blocks, options)),
        MalformedPolicy::Abort => {
            let groups = blocks
                .iter()
                .enumerate()
                .map(|(position, block)| render_block(position, block, options))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Rendering {
                groups,
                warnings: Vec::new(),
            })
        }
    }
}

/// Render a single block found at `position` in its sequence.
pub fn render_block(
    position: usize,
    block: &Block,
    options: &RenderOptions,
) -> Result<BlockOutput, RenderError> {
    let lines = format_content(&block.content).ok_or_else(|| RenderError::MalformedBlock {
        position,
        kind: block.kind().to_string(),
        span: block.span.clone(),
    })?;
    Ok(group(position, block, lines, options))
}

fn render_recovering(blocks: &[Block], options: &RenderOptions) -> Rendering {
    let mut rendering = Rendering::default();

    for (position, block) in blocks.iter().enumerate() {
        match render_block(position, block, options) {
            Ok(output) => rendering.groups.push(output),
            Err(error) => {
                tracing::warn!(
                    position,
                    kind = block.kind(),
                    "block has no text, rendering placeholder"
                );
                let placeholder = vec![format!("malformed block: {}", block.kind())];
                rendering
                    .groups
                    .push(group(position, block, placeholder, options));
                rendering.warnings.push(error);
            }
        }
    }

    rendering
}

fn group(
    position: usize,
    block: &Block,
    mut lines: Vec<String>,
    options: &RenderOptions,
) -> BlockOutput {
    if options.annotate_kinds {
        lines.insert(0, format!("Block Type: {}", block.kind()));
    }
    BlockOutput {
        position,
        kind: block.kind().to_string(),
        lines,
    }
}

/// Format one block's content. `None` means a required span is missing.
fn format_content(content: &BlockContent) -> Option<Vec<String>> {
    let first = content.first_text();
    let lines = match content {
        BlockContent::Paragraph(_) => vec![first.unwrap_or(EMPTY_PARAGRAPH).to_string()],
        BlockContent::Heading { level, .. } => vec![format!("Heading {}: {}", level, first?)],
        BlockContent::BulletedListItem(_) => vec![format!("• {}", first?)],
        // Every item gets the same marker; there is no running counter.
        BlockContent::NumberedListItem(_) => vec![format!("1. {}", first?)],
        BlockContent::ToDo { checked, .. } => {
            let mark = if *checked { 'x' } else { ' ' };
            vec![format!("[{}] {}", mark, first?)]
        }
        BlockContent::Code { language, .. } => {
            vec![format!("Code ({}):", language), first?.to_string()]
        }
        BlockContent::Unsupported { kind, payload } => {
            tracing::debug!(kind = kind.as_str(), "unsupported block kind");
            vec![
                format!("Unsupported block type: {}", kind),
                format!("{:#}", payload),
            ]
        }
    };
    Some(lines)
}

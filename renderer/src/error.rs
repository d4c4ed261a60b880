use std::ops::Range;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A text-bearing block other than a paragraph has no rich-text spans.
    #[error("malformed block at index {position}: `{kind}` block has no rich-text spans")]
    MalformedBlock {
        position: usize,
        kind: String,
        /// Source span of the block record, if it was parsed from one.
        span: Option<Range<usize>>,
    },
}

impl RenderError {
    pub fn position(&self) -> usize {
        match self {
            RenderError::MalformedBlock { position, .. } => *position,
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            RenderError::MalformedBlock { kind, .. } => kind,
        }
    }

    pub fn span(&self) -> Option<&Range<usize>> {
        match self {
            RenderError::MalformedBlock { span, .. } => span.as_ref(),
        }
    }
}

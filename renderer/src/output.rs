use std::fmt;

use crate::error::RenderError;

/// Line emitted in place of an empty render.
pub const NO_CONTENT: &str = "no content";

/// The rendered lines of one input block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOutput {
    /// Index of the block in the input sequence.
    pub position: usize,
    pub kind: String,
    /// Output units, in order. A unit may itself contain newlines (code text,
    /// payload dumps), which are kept verbatim.
    pub lines: Vec<String>,
}

/// The result of rendering a block sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendering {
    /// One group per input block, in input order.
    pub groups: Vec<BlockOutput>,
    /// Malformed blocks that were replaced by a placeholder.
    pub warnings: Vec<RenderError>,
}

impl Rendering {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// All output lines, flattened. Empty input yields a single `no content` line.
    pub fn lines(&self) -> Vec<&str> {
        if self.groups.is_empty() {
            return vec![NO_CONTENT];
        }
        self.groups
            .iter()
            .flat_map(|group| group.lines.iter().map(String::as_str))
            .collect()
    }

    pub fn into_lines(self) -> Vec<String> {
        if self.groups.is_empty() {
            return vec![NO_CONTENT.to_string()];
        }
        self.groups
            .into_iter()
            .flat_map(|group| group.lines)
            .collect()
    }
}

impl fmt::Display for Rendering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

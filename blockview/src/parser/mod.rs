pub mod error;
mod structural;

pub use error::ParseError;
pub use structural::DEFAULT_CODE_LANGUAGE;

use crate::BlockList;

/// Parser entry point.
pub struct Parser {
    source: String,
    file_id: usize,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser { source, file_id }
    }

    /// Parse a JSON block document into typed blocks.
    ///
    /// Accepts either a bare array of block records or a list response object
    /// with a `results` array. Every malformed record is reported, not just
    /// the first.
    pub fn parse(&self) -> Result<BlockList, Vec<ParseError>> {
        let blocks = structural::parse_blocks(&self.source, self.file_id)?;
        tracing::debug!(blocks = blocks.len(), file_id = self.file_id, "parsed block list");
        Ok(BlockList {
            blocks,
            source_id: self.file_id,
        })
    }
}

pub mod block;
pub mod page;
pub mod parser;

use crate::block::Block;

/// A parsed list of content blocks, in source order.
#[derive(Debug, Clone)]
pub struct BlockList {
    /// Blocks in the order the source listed them.
    pub blocks: Vec<Block>,
    /// The source file ID (for error reporting with codespan-reporting).
    pub source_id: usize,
}

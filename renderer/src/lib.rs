pub mod block;
pub mod error;
pub mod options;
pub mod output;
pub mod page;

pub use block::{render, render_block, render_with};
pub use error::RenderError;
pub use options::{MalformedPolicy, RenderOptions};
pub use output::{BlockOutput, Rendering};
pub use page::render_page_summary;

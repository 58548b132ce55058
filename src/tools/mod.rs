//! Tool abstraction for the conversational scoring path.

pub mod borrower;
pub mod registry;
pub mod tool;

pub use borrower::SetBorrowerDetailsTool;
pub use registry::ToolRegistry;
pub use tool::*;

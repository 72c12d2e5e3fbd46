//! CLI command implementations.

pub mod call;
pub mod show;
pub mod tools;

// Re-export command handlers
pub use call::call;
pub use show::show;
pub use tools::tools;

//! Fetcher implementations.
//!
//! - [`CommandFetcher`]: runs an external CLI (kubectl by default) and parses
//!   its JSON output
//! - [`DirectoryFetcher`]: reads definitions exported to a local directory

pub mod command;
pub mod directory;

pub use command::{CommandFetcher, CommandSpec, RetryPolicy};
pub use directory::DirectoryFetcher;

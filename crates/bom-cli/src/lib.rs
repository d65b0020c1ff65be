//! bom CLI library.
//!
//! Configuration, command execution and output formatting for the `bom`
//! command-line tool, which generates sound-effect search queries and
//! acquires audio samples for them.

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use context::AppContext;
pub use error::{CliError, Result};
pub use output::Formatter;

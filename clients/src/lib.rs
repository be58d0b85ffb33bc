//! Support code for the `taxo` command-line client.
//!
//! - [`logger`]: `tracing` subscriber setup
//! - [`prompt`]: interactive confirmations for moves and constraint changes

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod logger;
pub mod prompt;

pub use logger::init_cli_logger;
pub use prompt::PromptConfirmations;

//! # docshare-cli
//!
//! Command tree of the `docshare` binary: sharing files with a progress
//! bar, listing, revoking, and deleting shared links, connectivity checks,
//! and configuration inspection.

pub mod commands;
pub mod output;
pub mod progress;
pub mod prompt;

pub use commands::Cli;

//! # docshare-core
//!
//! Core crate for DocShare. Contains the configuration schema, domain
//! types for pending files, share options and share history, the transport
//! event vocabulary, the collaborator trait implemented by service
//! bindings, and the unified error system.
//!
//! This crate has **no** internal dependencies on other DocShare crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;

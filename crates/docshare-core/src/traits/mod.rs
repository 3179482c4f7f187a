//! Core traits defined in `docshare-core` and implemented by other crates.

pub mod document_service;

pub use document_service::DocumentService;

//! # docshare-client
//!
//! REST binding of the document service. Packs the selected files into a
//! ZIP archive, uploads it as a new document with a progress-tracking
//! body, and creates, lists, revokes, and deletes shared links.

pub mod archive;
pub mod client;
pub mod dto;
pub mod service;
pub mod upload;

pub use client::ServiceClient;

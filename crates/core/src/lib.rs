//! Storage backend core for Arca.
//!
//! This crate adapts a file-management host to S3-compatible object storage.
//! It contains pure adapter logic with ZERO web or database dependencies.
//! Record persistence stays with the host; this crate is a transform from
//! (record/stream) to (object-store side effect + result value).
//!
//! # Modules
//!
//! - `storage` - Streaming uploads, bulk delete, and presigned read URLs

pub mod storage;

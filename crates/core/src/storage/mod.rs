//! Object storage backend for file attachments using Apache OpenDAL.
//!
//! This module streams uploaded files into an S3-compatible bucket under a
//! configurable path prefix, bulk-deletes stored objects with per-record
//! success/failure accounting, and issues presigned, time-limited read URLs.
//!
//! # Architecture
//!
//! ```text
//! upload stream ──> UploadEngine ────> ObjectClient::put_object ───> bucket
//!                        │
//!                        └── key::build_key(prefix, filename)
//!                        ┌── (same key construction)
//! stored records ──> MinioStorage ──> remove_object / presigned_get_url
//! ```
//!
//! Every operation resolves its object key through [`build_key`], so upload,
//! delete and URL issuance can never disagree about where an object lives.

mod backend;
mod client;
mod engine;
mod error;
mod key;
#[cfg(test)]
mod testing;
mod types;

pub use backend::{MinioStorage, ObjectStorageBackend};
pub use client::{ObjectClient, S3ObjectClient};
pub use engine::{BoxError, FilenameFn, MetadataFn, UploadEngine};
pub use error::StorageError;
pub use key::{build_key, normalize_prefix};
pub use types::{DeleteReport, StoredObject, UploadContext, UploadInfo};

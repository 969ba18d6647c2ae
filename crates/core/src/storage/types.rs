//! Storage types and data structures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Stream-free description of one incoming upload.
///
/// Naming and metadata strategies receive this view; the byte stream itself
/// lives in [`UploadContext`] and is consumed by the store write.
#[derive(Debug, Clone, Default)]
pub struct UploadInfo {
    /// Filename as submitted by the uploader.
    pub original_name: String,
    /// Size declared by the upload parser, when known.
    pub declared_size: Option<u64>,
    /// Declared MIME type.
    pub content_type: String,
    /// Free-form key/value pairs supplied by the caller alongside the upload.
    pub caller_metadata: HashMap<String, String>,
}

/// One upload in flight: its description plus the content stream.
///
/// Exists only for the duration of a single upload call.
pub struct UploadContext<S> {
    /// Upload description.
    pub info: UploadInfo,
    /// Content byte stream.
    pub content: S,
}

/// Durable reference to a stored object, returned after a successful upload.
///
/// This is what the host persists as its file record. `filename` is the
/// *relative* resolved name: the full object key is recomputed as
/// prefix + filename, so the pair must round-trip unchanged for later delete
/// and URL operations to find the object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Relative resolved filename (no path prefix).
    pub filename: String,
    /// Bucket the object was written to.
    pub bucket_name: String,
    /// Object size in bytes.
    pub size: u64,
    /// MIME type recorded at upload time.
    pub content_type: String,
    /// Filename as originally submitted.
    pub original_name: String,
}

/// Outcome of one bulk delete call.
///
/// Transient: persistence and retry of the failed subset stay with the
/// caller.
#[derive(Debug, Clone, Default)]
pub struct DeleteReport {
    /// Number of records whose objects were removed.
    pub success_count: usize,
    /// Records whose removal failed, in input order, unchanged.
    pub failed_records: Vec<StoredObject>,
}

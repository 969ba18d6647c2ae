//! Upload engine: streams one upload into the object store.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use futures::Stream;
use futures::future::BoxFuture;
use tracing::info;

use super::client::ObjectClient;
use super::error::StorageError;
use super::key::build_key;
use super::types::{StoredObject, UploadContext, UploadInfo};

/// Boxed error accepted from caller-supplied strategies.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Async strategy producing the stored filename for an upload.
pub type FilenameFn =
    Arc<dyn Fn(UploadInfo) -> BoxFuture<'static, Result<String, BoxError>> + Send + Sync>;

/// Async strategy producing the object metadata for an upload.
pub type MetadataFn = Arc<
    dyn Fn(UploadInfo) -> BoxFuture<'static, Result<HashMap<String, String>, BoxError>>
        + Send
        + Sync,
>;

/// Streams uploads into a bucket under a configurable path prefix.
///
/// Naming and metadata strategies are optional; when absent the engine falls
/// back to `{millisecond-epoch}-{original_name}` naming and an empty
/// metadata map, so repeated uploads of the same filename never overwrite
/// each other silently.
pub struct UploadEngine<C> {
    client: C,
    bucket_name: String,
    path_prefix: Option<String>,
    max_file_size: Option<u64>,
    filename: Option<FilenameFn>,
    metadata: Option<MetadataFn>,
}

impl<C: ObjectClient> UploadEngine<C> {
    /// Create an engine writing to `bucket_name` through `client`.
    pub fn new(client: C, bucket_name: impl Into<String>) -> Self {
        Self {
            client,
            bucket_name: bucket_name.into(),
            path_prefix: None,
            max_file_size: None,
            filename: None,
            metadata: None,
        }
    }

    /// Set the path prefix prepended to every object key.
    #[must_use]
    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = Some(prefix.into());
        self
    }

    /// Reject uploads declaring more than `max` bytes.
    #[must_use]
    pub fn with_max_file_size(mut self, max: u64) -> Self {
        self.max_file_size = Some(max);
        self
    }

    /// Install a custom filename strategy.
    #[must_use]
    pub fn with_filename_fn(mut self, f: FilenameFn) -> Self {
        self.filename = Some(f);
        self
    }

    /// Install a custom metadata strategy.
    #[must_use]
    pub fn with_metadata_fn(mut self, f: MetadataFn) -> Self {
        self.metadata = Some(f);
        self
    }

    /// Stream one upload into the store.
    ///
    /// The store write is the final step: any earlier failure leaves no
    /// object behind, and a failed write never returns a success result.
    /// One attempt only; retry policy belongs to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::FileTooLarge`] when the declared size exceeds
    /// the configured rule, [`StorageError::FilenameResolution`] or
    /// [`StorageError::MetadataResolution`] when a caller strategy fails,
    /// and [`StorageError::Write`] when the store write fails.
    pub async fn handle_upload<S>(
        &self,
        ctx: UploadContext<S>,
    ) -> Result<StoredObject, StorageError>
    where
        S: Stream<Item = std::io::Result<Bytes>> + Send + Unpin,
    {
        let UploadContext { info, content } = ctx;

        if let (Some(max), Some(size)) = (self.max_file_size, info.declared_size) {
            if size > max {
                return Err(StorageError::file_too_large(size, max));
            }
        }

        let resolved = match &self.filename {
            Some(f) => f(info.clone())
                .await
                .map_err(|e| StorageError::filename_resolution(e.to_string()))?,
            None => default_filename(&info.original_name),
        };
        // Undo the Latin-1 double-decoding some multipart parsers apply to
        // multi-byte filenames. Applied exactly once, after the strategy.
        let filename = recode_latin1_utf8(&resolved);

        let metadata = match &self.metadata {
            Some(f) => f(info.clone())
                .await
                .map_err(|e| StorageError::metadata_resolution(e.to_string()))?,
            None => HashMap::new(),
        };

        let key = build_key(self.path_prefix.as_deref(), &filename);
        let size = self
            .client
            .put_object(&key, Some(&info.content_type), &metadata, content)
            .await?;

        info!(bucket = %self.bucket_name, key = %key, size, "object stored");

        Ok(StoredObject {
            filename,
            bucket_name: self.bucket_name.clone(),
            size,
            content_type: info.content_type,
            original_name: info.original_name,
        })
    }

    /// Remove a single stored object.
    ///
    /// Present for interface completeness; hosts delete through the bulk
    /// path on [`MinioStorage`](super::MinioStorage).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Configuration`] for an incomplete record and
    /// [`StorageError::Delete`] when the store delete fails.
    pub async fn remove_file(&self, record: &StoredObject) -> Result<(), StorageError> {
        if record.filename.is_empty() || record.bucket_name.is_empty() {
            return Err(StorageError::configuration("file record is incomplete"));
        }
        let key = build_key(self.path_prefix.as_deref(), &record.filename);
        self.client.remove_object(&key).await
    }
}

/// Default stored filename: millisecond epoch plus the submitted name.
fn default_filename(original_name: &str) -> String {
    format!("{}-{original_name}", chrono::Utc::now().timestamp_millis())
}

/// Reinterpret a mis-decoded filename's Latin-1 code units as UTF-8 bytes.
///
/// Some multipart parsers decode filename bytes as Latin-1, turning a
/// multi-byte UTF-8 name into one mojibake character per byte. Names that
/// cannot have come through that defect pass through unchanged: characters
/// above U+00FF never result from a Latin-1 decode, and code units that do
/// not form valid UTF-8 mean the name really was Latin-1.
fn recode_latin1_utf8(name: &str) -> String {
    let mut bytes = Vec::with_capacity(name.len());
    for c in name.chars() {
        let Ok(byte) = u8::try_from(u32::from(c)) else {
            return name.to_string();
        };
        bytes.push(byte);
    }
    String::from_utf8(bytes).unwrap_or_else(|_| name.to_string())
}

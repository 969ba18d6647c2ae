//! Storage type adapter: bulk delete and presigned read URLs.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use futures::Stream;
use tracing::{info, warn};

use arca_shared::{ConnectionConfig, StorageOptions};

use super::client::{ObjectClient, S3ObjectClient};
use super::engine::{FilenameFn, MetadataFn, UploadEngine};
use super::error::StorageError;
use super::key::build_key;
use super::types::{DeleteReport, StoredObject, UploadContext};

/// Backend contract shared by all object-store integrations.
///
/// [`MinioStorage`] is the S3-compatible instantiation; new stores implement
/// this trait without touching the adapter logic.
pub trait ObjectStorageBackend: Send + Sync {
    /// Client type produced by [`make_client`](Self::make_client).
    type Client: ObjectClient;

    /// Build a client from the stored connection configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Configuration`] when required connection
    /// fields are missing.
    fn make_client(&self) -> Result<Self::Client, StorageError>;

    /// Stream one upload into the store.
    fn upload<S>(
        &self,
        ctx: UploadContext<S>,
    ) -> impl Future<Output = Result<StoredObject, StorageError>> + Send
    where
        S: Stream<Item = std::io::Result<Bytes>> + Send + Unpin;

    /// Remove the objects behind `records`, reporting per-record outcomes.
    fn delete_many(
        &self,
        records: Vec<StoredObject>,
    ) -> impl Future<Output = Result<DeleteReport, StorageError>> + Send;

    /// Issue a presigned, time-limited read URL for one stored record.
    fn get_read_url(
        &self,
        record: &StoredObject,
    ) -> impl Future<Output = Result<String, StorageError>> + Send;
}

/// S3-compatible storage backend (MinIO and friends).
///
/// Holds the connection parameters and per-storage options; each operation
/// resolves a client from them, so configuration problems surface at the
/// call that first needs the store.
pub struct MinioStorage {
    connection: ConnectionConfig,
    options: StorageOptions,
    filename: Option<FilenameFn>,
    metadata: Option<MetadataFn>,
}

impl MinioStorage {
    /// Create a backend from connection parameters and storage options.
    #[must_use]
    pub fn new(connection: ConnectionConfig, options: StorageOptions) -> Self {
        Self {
            connection,
            options,
            filename: None,
            metadata: None,
        }
    }

    /// Install a custom filename strategy for uploads.
    #[must_use]
    pub fn with_filename_fn(mut self, f: FilenameFn) -> Self {
        self.filename = Some(f);
        self
    }

    /// Install a custom metadata strategy for uploads.
    #[must_use]
    pub fn with_metadata_fn(mut self, f: MetadataFn) -> Self {
        self.metadata = Some(f);
        self
    }

    /// Build the upload engine for this backend.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Configuration`] when the connection or bucket
    /// configuration is incomplete.
    pub fn make(&self) -> Result<UploadEngine<S3ObjectClient>, StorageError> {
        let client = self.make_client()?;
        let mut engine = UploadEngine::new(client, self.options.bucket_name.clone());
        if let Some(prefix) = &self.options.path_prefix {
            engine = engine.with_path_prefix(prefix.clone());
        }
        if let Some(max) = self.options.max_file_size {
            engine = engine.with_max_file_size(max);
        }
        if let Some(f) = &self.filename {
            engine = engine.with_filename_fn(f.clone());
        }
        if let Some(f) = &self.metadata {
            engine = engine.with_metadata_fn(f.clone());
        }
        Ok(engine)
    }
}

impl ObjectStorageBackend for MinioStorage {
    type Client = S3ObjectClient;

    fn make_client(&self) -> Result<S3ObjectClient, StorageError> {
        S3ObjectClient::connect(&self.connection, &self.options.bucket_name)
    }

    async fn upload<S>(&self, ctx: UploadContext<S>) -> Result<StoredObject, StorageError>
    where
        S: Stream<Item = std::io::Result<Bytes>> + Send + Unpin,
    {
        self.make()?.handle_upload(ctx).await
    }

    async fn delete_many(
        &self,
        records: Vec<StoredObject>,
    ) -> Result<DeleteReport, StorageError> {
        // An unresolvable client fails the whole batch: no delete could
        // possibly succeed.
        let client = self.make_client()?;

        let report =
            delete_records(&client, self.options.path_prefix.as_deref(), records).await;
        info!(
            bucket = %self.options.bucket_name,
            succeeded = report.success_count,
            failed = report.failed_records.len(),
            "bulk delete finished"
        );
        Ok(report)
    }

    async fn get_read_url(&self, record: &StoredObject) -> Result<String, StorageError> {
        let client = self.make_client()?;
        presign_record(
            &client,
            self.options.path_prefix.as_deref(),
            self.options.expiry_secs,
            record,
        )
        .await
    }
}

/// Remove the objects behind `records` in their given order.
///
/// Failures are per record and never abort the batch: a failed record is
/// appended to the report unchanged and processing continues.
async fn delete_records<C: ObjectClient>(
    client: &C,
    path_prefix: Option<&str>,
    records: Vec<StoredObject>,
) -> DeleteReport {
    let mut report = DeleteReport::default();
    for record in records {
        let key = build_key(path_prefix, &record.filename);
        match client.remove_object(&key).await {
            Ok(()) => report.success_count += 1,
            Err(error) => {
                warn!(key = %key, %error, "object delete failed");
                report.failed_records.push(record);
            }
        }
    }
    report
}

/// Issue a fresh presigned read URL for one record.
///
/// No caching: every call starts a new expiry window.
async fn presign_record<C: ObjectClient>(
    client: &C,
    path_prefix: Option<&str>,
    expiry_secs: u64,
    record: &StoredObject,
) -> Result<String, StorageError> {
    let key = build_key(path_prefix, &record.filename);
    client
        .presigned_get_url(&key, Duration::from_secs(expiry_secs))
        .await
}

//! Object store client: trait seam plus the OpenDAL-backed implementation.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use opendal::{Operator, services};

use arca_shared::ConnectionConfig;

use super::error::StorageError;

/// Streaming operations the storage adapters need from an object store.
///
/// [`S3ObjectClient`] implements this for production; tests substitute an
/// in-memory double to simulate store behavior.
pub trait ObjectClient: Send + Sync {
    /// Stream an object's content to the store under `key`.
    ///
    /// Content is forwarded chunk by chunk; the whole object is never
    /// buffered. Returns the number of bytes written.
    fn put_object<S>(
        &self,
        key: &str,
        content_type: Option<&str>,
        metadata: &HashMap<String, String>,
        data: S,
    ) -> impl Future<Output = Result<u64, StorageError>> + Send
    where
        S: Stream<Item = std::io::Result<Bytes>> + Send + Unpin;

    /// Remove the object stored under `key`.
    fn remove_object(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Issue a presigned GET URL for `key`, valid for `expiry`.
    fn presigned_get_url(
        &self,
        key: &str,
        expiry: Duration,
    ) -> impl Future<Output = Result<String, StorageError>> + Send;
}

/// Object client backed by an OpenDAL operator.
#[derive(Debug, Clone)]
pub struct S3ObjectClient {
    op: Operator,
}

impl S3ObjectClient {
    /// Region assumed when the configuration leaves it unset (MinIO's
    /// default), so signing never depends on ambient environment lookup.
    const DEFAULT_REGION: &'static str = "us-east-1";

    /// Build a client for one bucket from connection parameters.
    ///
    /// Pure construction: no network I/O happens until the client is used.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Configuration`] when the bucket name or
    /// either credential is missing, or when the operator cannot be built.
    pub fn connect(conn: &ConnectionConfig, bucket_name: &str) -> Result<Self, StorageError> {
        if bucket_name.is_empty() {
            return Err(StorageError::configuration("bucket name must not be empty"));
        }
        if conn.access_key.is_empty() || conn.secret_key.is_empty() {
            return Err(StorageError::configuration(
                "access key and secret key must not be empty",
            ));
        }

        let builder = services::S3::default()
            .endpoint(&conn.endpoint_url())
            .bucket(bucket_name)
            .access_key_id(&conn.access_key)
            .secret_access_key(&conn.secret_key)
            .region(conn.region.as_deref().unwrap_or(Self::DEFAULT_REGION));

        let op = Operator::new(builder)
            .map_err(|e| StorageError::configuration(e.to_string()))?
            .finish();

        Ok(Self { op })
    }

    /// Wrap an existing OpenDAL operator.
    ///
    /// Lets alternative services (filesystem, other clouds) reuse the client
    /// unchanged.
    #[must_use]
    pub fn from_operator(op: Operator) -> Self {
        Self { op }
    }
}

impl ObjectClient for S3ObjectClient {
    async fn put_object<S>(
        &self,
        key: &str,
        content_type: Option<&str>,
        metadata: &HashMap<String, String>,
        mut data: S,
    ) -> Result<u64, StorageError>
    where
        S: Stream<Item = std::io::Result<Bytes>> + Send + Unpin,
    {
        let mut writer = self.op.writer_with(key);
        if let Some(content_type) = content_type {
            writer = writer.content_type(content_type);
        }
        if !metadata.is_empty() {
            writer = writer.user_metadata(metadata.clone());
        }
        let mut writer = writer
            .await
            .map_err(|e| StorageError::write(key, e.to_string()))?;

        let mut size: u64 = 0;
        while let Some(chunk) = data.next().await {
            let chunk = chunk.map_err(|e| StorageError::write(key, e.to_string()))?;
            size += chunk.len() as u64;
            writer
                .write(chunk)
                .await
                .map_err(|e| StorageError::write(key, e.to_string()))?;
        }
        writer
            .close()
            .await
            .map_err(|e| StorageError::write(key, e.to_string()))?;

        Ok(size)
    }

    async fn remove_object(&self, key: &str) -> Result<(), StorageError> {
        self.op
            .delete(key)
            .await
            .map_err(|e| StorageError::delete(key, e.to_string()))
    }

    async fn presigned_get_url(&self, key: &str, expiry: Duration) -> Result<String, StorageError> {
        let request = self
            .op
            .presign_read(key, expiry)
            .await
            .map_err(|e| StorageError::sign(key, e.to_string()))?;
        Ok(request.uri().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn fs_operator(root: &std::path::Path) -> Operator {
        let builder = services::Fs::default().root(root.to_str().expect("utf-8 temp path"));
        Operator::new(builder).expect("should build fs operator").finish()
    }

    #[test]
    fn test_connect_rejects_empty_bucket() {
        let conn = ConnectionConfig::new("ak", "sk");
        let result = S3ObjectClient::connect(&conn, "");
        assert!(matches!(result, Err(StorageError::Configuration(_))));
    }

    #[test]
    fn test_connect_rejects_missing_credentials() {
        let conn = ConnectionConfig::new("", "sk");
        assert!(matches!(
            S3ObjectClient::connect(&conn, "attachments"),
            Err(StorageError::Configuration(_))
        ));

        let conn = ConnectionConfig::new("ak", "");
        assert!(matches!(
            S3ObjectClient::connect(&conn, "attachments"),
            Err(StorageError::Configuration(_))
        ));
    }

    #[test]
    fn test_connect_succeeds_without_network() {
        let conn = ConnectionConfig::new("minioadmin", "minioadmin").with_region("us-east-1");
        assert!(S3ObjectClient::connect(&conn, "attachments").is_ok());
    }

    #[tokio::test]
    async fn test_put_object_streams_chunks() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let op = fs_operator(dir.path());
        let client = S3ObjectClient::from_operator(op.clone());

        let chunks = stream::iter(vec![
            Ok(Bytes::from_static(b"hello ")),
            Ok(Bytes::from_static(b"world")),
        ]);
        let size = client
            .put_object("greeting.txt", None, &HashMap::new(), chunks)
            .await
            .expect("should write object");
        assert_eq!(size, 11);

        let stored = op.read("greeting.txt").await.expect("should read back");
        assert_eq!(stored.to_vec(), b"hello world");
    }

    #[tokio::test]
    async fn test_put_object_surfaces_stream_errors() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let client = S3ObjectClient::from_operator(fs_operator(dir.path()));

        let chunks = stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(std::io::Error::other("connection reset")),
        ]);
        let result = client
            .put_object("broken.bin", None, &HashMap::new(), chunks)
            .await;
        assert!(matches!(result, Err(StorageError::Write { .. })));
    }

    #[tokio::test]
    async fn test_remove_object() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let op = fs_operator(dir.path());
        let client = S3ObjectClient::from_operator(op.clone());

        op.write("stale.txt", Bytes::from_static(b"x"))
            .await
            .expect("should seed object");
        client
            .remove_object("stale.txt")
            .await
            .expect("should remove object");
        assert!(op.read("stale.txt").await.is_err());
    }

    #[tokio::test]
    async fn test_presign_unsupported_surfaces_sign_error() {
        // The filesystem service cannot sign URLs; the failure must surface
        // as a signing error, never a malformed URL.
        let dir = tempfile::tempdir().expect("should create temp dir");
        let client = S3ObjectClient::from_operator(fs_operator(dir.path()));

        let result = client
            .presigned_get_url("a.txt", Duration::from_secs(60))
            .await;
        assert!(matches!(result, Err(StorageError::Sign { .. })));
    }
}

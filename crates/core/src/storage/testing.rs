//! In-memory store double shared by the adapter tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use bytes::Bytes;
use futures::{Stream, StreamExt};

use super::client::ObjectClient;
use super::error::StorageError;

/// One recorded store write.
#[derive(Debug, Clone)]
pub struct RecordedPut {
    /// Object key written.
    pub key: String,
    /// Content type attached to the write.
    pub content_type: Option<String>,
    /// User metadata attached to the write.
    pub metadata: HashMap<String, String>,
    /// Collected body bytes.
    pub body: Vec<u8>,
}

/// [`ObjectClient`] double that records calls and simulates store behavior.
#[derive(Default)]
pub struct MockClient {
    /// Writes observed, in call order.
    pub puts: Mutex<Vec<RecordedPut>>,
    /// Keys removed, in call order.
    pub removed: Mutex<Vec<String>>,
    /// Fail every write when set.
    pub fail_puts: bool,
    /// Keys whose removal fails as if the object were missing.
    pub missing_keys: HashSet<String>,
    /// Fail URL signing when set.
    pub fail_sign: bool,
}

impl ObjectClient for MockClient {
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
        if self.fail_puts {
            return Err(StorageError::write(key, "simulated write failure"));
        }

        let mut body = Vec::new();
        while let Some(chunk) = data.next().await {
            let chunk = chunk.map_err(|e| StorageError::write(key, e.to_string()))?;
            body.extend_from_slice(&chunk);
        }
        let size = body.len() as u64;

        self.puts.lock().expect("puts lock").push(RecordedPut {
            key: key.to_string(),
            content_type: content_type.map(str::to_string),
            metadata: metadata.clone(),
            body,
        });
        Ok(size)
    }

    async fn remove_object(&self, key: &str) -> Result<(), StorageError> {
        if self.missing_keys.contains(key) {
            return Err(StorageError::delete(key, "object not found"));
        }
        self.removed.lock().expect("removed lock").push(key.to_string());
        Ok(())
    }

    async fn presigned_get_url(&self, key: &str, expiry: Duration) -> Result<String, StorageError> {
        if self.fail_sign {
            return Err(StorageError::sign(key, "invalid credentials"));
        }
        // Echo the received expiry so tests can assert on it.
        Ok(format!(
            "http://stub.local/{key}?X-Amz-Expires={}",
            expiry.as_secs()
        ))
    }
}

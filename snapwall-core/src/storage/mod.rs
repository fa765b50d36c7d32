//! Object store access.
//!
//! Wraps an [`opendal::Operator`] so the rest of the crate talks in keys,
//! bytes, and public URLs. The store is the sole source of truth for
//! photos: there is no separate index, every listing re-derives current
//! state. Listings are eventually consistent and offer no transactions;
//! callers must tolerate both.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use opendal::{services, Operator};

use crate::config::{StorageBackend, StorageConfig};
use crate::{Error, Result};

/// A key/value object store holding photos, banners, and event metadata.
#[derive(Clone)]
pub struct ObjectStore {
    operator: Operator,
    public_url_prefix: String,
}

impl std::fmt::Debug for ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStore")
            .field("public_url_prefix", &self.public_url_prefix)
            .finish()
    }
}

impl ObjectStore {
    /// Build a store from configuration, selecting the backend.
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        let operator = match config.backend {
            StorageBackend::S3 => {
                tracing::info!(
                    bucket = %config.bucket,
                    endpoint = %config.endpoint,
                    "Initializing S3 object store"
                );
                let mut builder = services::S3::default()
                    .endpoint(&config.endpoint)
                    .access_key_id(&config.access_key_id)
                    .secret_access_key(&config.secret_access_key)
                    .bucket(&config.bucket);
                if let Some(region) = &config.region {
                    builder = builder.region(region);
                }
                Operator::new(builder)
                    .map_err(|e| Error::Internal(format!("S3 operator init failed: {e}")))?
                    .finish()
            }
            StorageBackend::Fs => {
                tracing::info!(root = %config.fs_root, "Initializing filesystem object store");
                let builder = services::Fs::default().root(&config.fs_root);
                Operator::new(builder)
                    .map_err(|e| Error::Internal(format!("Fs operator init failed: {e}")))?
                    .finish()
            }
            StorageBackend::Memory => {
                let builder = services::Memory::default();
                Operator::new(builder)
                    .map_err(|e| Error::Internal(format!("Memory operator init failed: {e}")))?
                    .finish()
            }
        };

        Ok(Self {
            operator,
            public_url_prefix: config.public_url_prefix.trim_end_matches('/').to_string(),
        })
    }

    /// In-memory store, for tests and throwaway local runs.
    pub fn memory(public_url_prefix: &str) -> Result<Self> {
        let config = StorageConfig {
            backend: StorageBackend::Memory,
            public_url_prefix: public_url_prefix.to_string(),
            ..StorageConfig::default()
        };
        Self::from_config(&config)
    }

    /// Write an object. Idempotent by overwrite on identical key.
    pub async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<()> {
        let size = data.len();
        self.operator
            .write_with(key, data)
            .content_type(content_type)
            .await?;
        tracing::trace!(key, size, "Wrote object");
        Ok(())
    }

    /// Read an object's bytes. `NotFound` when the key is absent.
    pub async fn get(&self, key: &str) -> Result<Bytes> {
        let buffer = self.operator.read(key).await?;
        Ok(buffer.to_bytes())
    }

    /// List object keys directly under `prefix` (a directory-style path
    /// ending in `/`). Returns full keys, in no guaranteed order.
    pub async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        let mut entries = self.operator.lister(prefix).await?;
        let mut keys = Vec::new();
        while let Some(entry) = entries.try_next().await? {
            let path = entry.path();
            // The lister may report the directory placeholder itself.
            if path.ends_with('/') {
                continue;
            }
            keys.push(path.to_string());
        }
        Ok(keys)
    }

    /// Last-modified timestamp the store observed for `key`, if the
    /// backend reports one.
    pub async fn last_modified(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let metadata = self.operator.stat(key).await?;
        Ok(metadata.last_modified())
    }

    /// Public URL viewers fetch an object from.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url_prefix, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> ObjectStore {
        ObjectStore::memory("https://pub.example.com").expect("memory store")
    }

    #[tokio::test]
    async fn test_put_then_get_roundtrip() {
        let store = test_store();
        store
            .put("events/ev123/a.jpg", Bytes::from_static(b"jpeg"), "image/jpeg")
            .await
            .unwrap();

        let data = store.get("events/ev123/a.jpg").await.unwrap();
        assert_eq!(data, Bytes::from_static(b"jpeg"));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = test_store();
        let err = store.get("events/ev123/missing.jpg").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_keys_scopes_to_prefix() {
        let store = test_store();
        store
            .put("events/ev123/a.jpg", Bytes::from_static(b"a"), "image/jpeg")
            .await
            .unwrap();
        store
            .put("events/ev123/b.jpg", Bytes::from_static(b"b"), "image/jpeg")
            .await
            .unwrap();
        store
            .put("events/other/c.jpg", Bytes::from_static(b"c"), "image/jpeg")
            .await
            .unwrap();

        let mut keys = store.list_keys("events/ev123/").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["events/ev123/a.jpg", "events/ev123/b.jpg"]);
    }

    #[tokio::test]
    async fn test_list_keys_empty_prefix_is_empty() {
        let store = test_store();
        let keys = store.list_keys("events/nothing/").await.unwrap();
        assert!(keys.is_empty());
    }

    #[test]
    fn test_public_url_joins_prefix_and_key() {
        let store = test_store();
        assert_eq!(
            store.public_url("events/ev123/a.jpg"),
            "https://pub.example.com/events/ev123/a.jpg"
        );
    }
}

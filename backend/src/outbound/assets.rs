//! Filesystem asset store adapter.
//!
//! Uploaded photos land in a flat directory under generated names of the
//! form `{unix-millis}-{random}{extension}`, so two concurrent uploads of
//! the same original filename never collide. References are plain file
//! names; anything that looks like a path is refused before touching disk.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;

use crate::domain::camper::AssetRef;
use crate::domain::ports::{AssetStore, AssetStoreError};

/// Asset store writing photo bytes to a single directory.
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    /// Open the store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, AssetStoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|error| AssetStoreError::io(format!("failed to create upload directory: {error}")))?;
        Ok(Self { root })
    }

    /// Keep the original extension when it is plain alphanumerics; drop it
    /// otherwise so hostile filenames cannot smuggle separators in.
    fn sanitised_extension(original_name: &str) -> String {
        std::path::Path::new(original_name)
            .extension()
            .and_then(|extension| extension.to_str())
            .filter(|extension| {
                !extension.is_empty()
                    && extension.len() <= 8
                    && extension.chars().all(|c| c.is_ascii_alphanumeric())
            })
            .map(|extension| format!(".{}", extension.to_ascii_lowercase()))
            .unwrap_or_default()
    }

    fn generate_name(original_name: &str) -> String {
        let suffix: u32 = rand::thread_rng().gen();
        format!(
            "{}-{}{}",
            Utc::now().timestamp_millis(),
            suffix,
            Self::sanitised_extension(original_name)
        )
    }

    /// References are bare generated names; reject anything resembling a
    /// path so `resolve`/`discard` can never escape the upload directory.
    fn locate(&self, reference: &AssetRef) -> Result<PathBuf, AssetStoreError> {
        let name = reference.as_str();
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name.contains("..")
        {
            return Err(AssetStoreError::not_found(name));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl AssetStore for FsAssetStore {
    async fn store(
        &self,
        bytes: Vec<u8>,
        original_name: &str,
    ) -> Result<AssetRef, AssetStoreError> {
        let name = Self::generate_name(original_name);
        tokio::fs::write(self.root.join(&name), bytes)
            .await
            .map_err(|error| AssetStoreError::io(format!("failed to write asset {name}: {error}")))?;
        Ok(AssetRef::new(name))
    }

    async fn resolve(&self, reference: &AssetRef) -> Result<Vec<u8>, AssetStoreError> {
        let path = self.locate(reference)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                Err(AssetStoreError::not_found(reference.as_str()))
            }
            Err(error) => Err(AssetStoreError::io(format!(
                "failed to read asset {reference}: {error}"
            ))),
        }
    }

    async fn discard(&self, reference: &AssetRef) -> Result<(), AssetStoreError> {
        let path = self.locate(reference)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // Already gone: the cascade stays idempotent.
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(AssetStoreError::io(format!(
                "failed to discard asset {reference}: {error}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    async fn open_store(dir: &tempfile::TempDir) -> FsAssetStore {
        FsAssetStore::open(dir.path().join("uploads"))
            .await
            .expect("open asset store")
    }

    #[tokio::test]
    async fn stored_bytes_resolve_byte_for_byte() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = open_store(&dir).await;

        let reference = store
            .store(b"jpeg-bytes".to_vec(), "me.jpg")
            .await
            .expect("store");
        let bytes = store.resolve(&reference).await.expect("resolve");

        assert_eq!(bytes, b"jpeg-bytes");
        assert!(reference.as_str().ends_with(".jpg"));
    }

    #[tokio::test]
    async fn identical_original_names_get_distinct_references() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = open_store(&dir).await;

        let first = store.store(b"one".to_vec(), "photo.png").await.expect("store");
        let second = store.store(b"two".to_vec(), "photo.png").await.expect("store");

        assert_ne!(first, second);
        assert_eq!(store.resolve(&first).await.expect("resolve"), b"one");
        assert_eq!(store.resolve(&second).await.expect("resolve"), b"two");
    }

    #[rstest]
    #[case("me.jpg", ".jpg")]
    #[case("UPPER.JPG", ".jpg")]
    #[case("noextension", "")]
    #[case("weird.j p g", "")]
    #[case("dotted.tar.gz", ".gz")]
    fn extensions_are_sanitised(#[case] original: &str, #[case] expected_suffix: &str) {
        let name = FsAssetStore::generate_name(original);
        if expected_suffix.is_empty() {
            assert!(!name.contains('.'), "unexpected extension in {name}");
        } else {
            assert!(name.ends_with(expected_suffix), "{name} should end with {expected_suffix}");
        }
    }

    #[rstest]
    #[case("../campers.json")]
    #[case("nested/asset.jpg")]
    #[case("back\\slash.jpg")]
    #[case("")]
    #[tokio::test]
    async fn path_like_references_are_not_found(#[case] reference: &str) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = open_store(&dir).await;

        let reference = AssetRef::new(reference);
        let error = store.resolve(&reference).await.expect_err("refused");
        assert!(matches!(error, AssetStoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn unknown_references_are_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = open_store(&dir).await;

        let error = store
            .resolve(&AssetRef::new("1700000000000-42.jpg"))
            .await
            .expect_err("missing asset");
        assert!(matches!(error, AssetStoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn discard_removes_the_asset_and_stays_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = open_store(&dir).await;

        let reference = store.store(b"bytes".to_vec(), "me.jpg").await.expect("store");
        store.discard(&reference).await.expect("discard");

        assert!(matches!(
            store.resolve(&reference).await.expect_err("gone"),
            AssetStoreError::NotFound { .. }
        ));
        store.discard(&reference).await.expect("second discard");
    }
}

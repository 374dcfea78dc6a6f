//! Object store rooted in a local directory
//!
//! Buckets map to sub-directories of the root and keys to file names.

use super::traits::ObjectStore;
use crate::domain::{FerryError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        for (label, part) in [("bucket", bucket), ("key", key)] {
            if part.is_empty()
                || part == "."
                || part == ".."
                || part.contains('/')
                || part.contains('\\')
            {
                return Err(FerryError::Storage(format!(
                    "Invalid object {label} '{part}'"
                )));
            }
        }
        Ok(self.root.join(bucket).join(key))
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    fn object_path(&self, bucket: &str, key: &str) -> String {
        self.root.join(bucket).join(key).display().to_string()
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        let path = self.resolve(bucket, key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                FerryError::Storage(format!(
                    "Failed to create bucket directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        tokio::fs::write(&path, body).await.map_err(|e| {
            FerryError::Storage(format!("Failed to write object {}: {e}", path.display()))
        })?;

        tracing::debug!(path = %path.display(), "Object written");
        Ok(())
    }
}

//! Ephemeral on-disk store for downloaded profile images.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Directory holding downloaded images for one run.
///
/// Created before roster processing, written once per user by the fetcher,
/// and removed wholesale at teardown. Execution is strictly sequential, so
/// no two writers ever touch the directory at the same time.
#[derive(Debug)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Create the store directory (and any missing parents).
    pub fn create(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        debug!("Created image store at {}", root.display());
        Ok(Self { root })
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Destination path for one user's image.
    pub fn image_path(&self, user_id: &str) -> PathBuf {
        self.root.join(format!("{user_id}.jpg"))
    }

    /// Delete the store directory and everything in it.
    pub fn cleanup(&self) -> std::io::Result<()> {
        if self.root.exists() {
            std::fs::remove_dir_all(&self.root)?;
            debug!("Removed image store at {}", self.root.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_cleanup() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().join("images");

        let store = ImageStore::create(&root).expect("create");
        assert!(root.is_dir());

        std::fs::write(store.image_path("U1"), b"jpeg bytes").expect("write");
        assert!(store.image_path("U1").exists());

        store.cleanup().expect("cleanup");
        assert!(!root.exists());
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ImageStore::create(dir.path().join("images")).expect("create");

        store.cleanup().expect("first cleanup");
        store.cleanup().expect("second cleanup");
    }

    #[test]
    fn test_image_path_named_by_user() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ImageStore::create(dir.path().join("images")).expect("create");

        let path = store.image_path("U042");
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("U042.jpg"));
        assert!(path.starts_with(store.root()));
    }
}

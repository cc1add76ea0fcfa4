use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use tracing::debug;

use crate::utils::validation::is_safe_key;

/// URL prefix under which the HTTP layer serves stored files.
pub const PUBLIC_PREFIX: &str = "/static/uploads";

/// A file received in a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn save(&self, key: &str, data: &[u8]) -> io::Result<()>;

    /// `ErrorKind::NotFound` when nothing is stored under `key`.
    async fn load(&self, key: &str) -> io::Result<Vec<u8>>;

    /// Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> io::Result<()>;

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", PUBLIC_PREFIX, key)
    }
}

fn check_key(key: &str) -> io::Result<()> {
    if is_safe_key(key) {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("unsafe storage key: {key}"),
        ))
    }
}

/// Files on local disk below `root`.
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> io::Result<PathBuf> {
        check_key(key)?;
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl FileStorage for LocalStorage {
    async fn save(&self, key: &str, data: &[u8]) -> io::Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, data).await?;
        debug!("Stored {} bytes at {}", data.len(), path.display());
        Ok(())
    }

    async fn load(&self, key: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.path_for(key)?).await
    }

    async fn delete(&self, key: &str) -> io::Result<()> {
        match tokio::fs::remove_file(self.path_for(key)?).await {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// Process-local storage, used by tests and throwaway instances.
#[derive(Default)]
pub struct MemoryStorage {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.files.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.files.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.lock().is_empty()
    }
}

#[async_trait]
impl FileStorage for MemoryStorage {
    async fn save(&self, key: &str, data: &[u8]) -> io::Result<()> {
        check_key(key)?;
        self.files.lock().insert(key.to_string(), data.to_vec());
        Ok(())
    }

    async fn load(&self, key: &str) -> io::Result<Vec<u8>> {
        check_key(key)?;
        self.files
            .lock()
            .get(key)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, key.to_string()))
    }

    async fn delete(&self, key: &str) -> io::Result<()> {
        check_key(key)?;
        self.files.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage.save("perfil/foto.png", b"png-bytes").await.unwrap();
        assert!(dir.path().join("perfil/foto.png").exists());
        assert_eq!(storage.load("perfil/foto.png").await.unwrap(), b"png-bytes");

        storage.delete("perfil/foto.png").await.unwrap();
        let err = storage.load("perfil/foto.png").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        // Second delete is a no-op.
        storage.delete("perfil/foto.png").await.unwrap();
    }

    #[tokio::test]
    async fn test_local_storage_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("uploads"));

        let err = storage.save("../escape.txt", b"x").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(!dir.path().join("escape.txt").exists());

        assert!(storage.load("/etc/passwd").await.is_err());
    }

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert!(storage.is_empty());

        storage.save("a.pdf", b"%PDF").await.unwrap();
        assert!(storage.contains("a.pdf"));
        assert_eq!(storage.load("a.pdf").await.unwrap(), b"%PDF");

        storage.delete("a.pdf").await.unwrap();
        assert!(storage.is_empty());
        assert!(storage.load("a.pdf").await.is_err());
    }

    #[test]
    fn test_url_for() {
        let storage = MemoryStorage::new();
        assert_eq!(
            storage.url_for("atestado_1_20240502090000_doc.pdf"),
            "/static/uploads/atestado_1_20240502090000_doc.pdf"
        );
    }
}

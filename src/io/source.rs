//! Byte sources: files supplied to the loader

use crate::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// A named file whose bytes can be read once
#[async_trait]
pub trait ByteSource: Send + Sync {
    /// File name used for matching against manifest paths
    fn basename(&self) -> &str;

    /// Read the whole content
    async fn read_all(&self) -> Result<Vec<u8>>;
}

/// File whose bytes are already in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvidedFile {
    pub basename: String,
    pub bytes: Vec<u8>,
}

impl ProvidedFile {
    pub fn new(basename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            basename: basename.into(),
            bytes: bytes.into(),
        }
    }
}

#[async_trait]
impl ByteSource for ProvidedFile {
    fn basename(&self) -> &str {
        &self.basename
    }

    async fn read_all(&self) -> Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// File on disk, read lazily
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskFile {
    path: PathBuf,
    basename: String,
}

impl DiskFile {
    /// Reference a file on disk; its basename is the final path component
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let basename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, basename }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ByteSource for DiskFile {
    fn basename(&self) -> &str {
        &self.basename
    }

    async fn read_all(&self) -> Result<Vec<u8>> {
        let bytes = tokio::fs::read(&self.path).await?;
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "read file");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_provided_file_reads_bytes() {
        let file = ProvidedFile::new("model.weights.bin", vec![1u8, 3, 5, 7]);
        assert_eq!(file.basename(), "model.weights.bin");
        assert_eq!(file.read_all().await.unwrap(), vec![1, 3, 5, 7]);
    }

    #[tokio::test]
    async fn test_disk_file_basename_and_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shard.bin");
        std::fs::write(&path, [9u8, 8, 7]).unwrap();

        let file = DiskFile::new(&path);
        assert_eq!(file.basename(), "shard.bin");
        assert_eq!(file.path(), path.as_path());
        assert_eq!(file.read_all().await.unwrap(), vec![9, 8, 7]);
    }

    #[tokio::test]
    async fn test_disk_file_missing_is_io_error() {
        let dir = TempDir::new().unwrap();
        let file = DiskFile::new(dir.path().join("absent.bin"));
        assert!(matches!(file.read_all().await, Err(Error::Io(_))));
    }
}

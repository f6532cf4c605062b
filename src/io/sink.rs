//! Byte sinks: where saved payloads go
//!
//! A sink receives each payload with [`ByteSink::put`] and finalizes it with
//! exactly one [`ByteSink::commit`]. How the bytes are persisted is up to the
//! implementation.

use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Destination for named byte payloads
#[async_trait]
pub trait ByteSink: Send {
    /// Stage `bytes` under `name`
    async fn put(&mut self, name: &str, bytes: Vec<u8>) -> Result<()>;

    /// Finalize a previously staged payload
    async fn commit(&mut self, name: &str) -> Result<()>;
}

/// Writes payloads as files in a directory.
///
/// `put` writes `<name>.partial`; `commit` renames it to `<name>`.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    staged: HashMap<String, PathBuf>,
}

impl DirectorySink {
    /// Sink into an existing directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            staged: HashMap::new(),
        }
    }

    /// Sink into `dir`, creating it (and parents) if missing
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self::new(dir))
    }

    /// Target directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn target(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(Error::Sink(format!("invalid payload name '{name}'")));
        }
        Ok(self.dir.join(name))
    }
}

#[async_trait]
impl ByteSink for DirectorySink {
    async fn put(&mut self, name: &str, bytes: Vec<u8>) -> Result<()> {
        let target = self.target(name)?;
        let partial = target.with_file_name(format!("{name}.partial"));
        tokio::fs::write(&partial, &bytes).await?;
        tracing::debug!(name, bytes = bytes.len(), path = %partial.display(), "staged payload");
        self.staged.insert(name.to_string(), partial);
        Ok(())
    }

    async fn commit(&mut self, name: &str) -> Result<()> {
        let partial = self
            .staged
            .remove(name)
            .ok_or_else(|| Error::Sink(format!("payload '{name}' was never staged")))?;
        let target = self.target(name)?;
        tokio::fs::rename(&partial, &target).await?;
        tracing::debug!(name, path = %target.display(), "committed payload");
        Ok(())
    }
}

/// Keeps payloads in memory and counts commits per payload
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    payloads: Vec<(String, Vec<u8>)>,
    commits: HashMap<String, usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes staged under `name`
    pub fn payload(&self, name: &str) -> Option<&[u8]> {
        self.payloads
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, bytes)| bytes.as_slice())
    }

    /// Names in the order they were staged
    pub fn names(&self) -> Vec<&str> {
        self.payloads.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Number of `put` calls seen
    pub fn put_count(&self) -> usize {
        self.payloads.len()
    }

    /// Number of commits seen for `name`
    pub fn commit_count(&self, name: &str) -> usize {
        self.commits.get(name).copied().unwrap_or(0)
    }

    /// Consume the sink, returning `(name, bytes)` pairs in staging order
    pub fn into_payloads(self) -> Vec<(String, Vec<u8>)> {
        self.payloads
    }
}

#[async_trait]
impl ByteSink for MemorySink {
    async fn put(&mut self, name: &str, bytes: Vec<u8>) -> Result<()> {
        self.payloads.push((name.to_string(), bytes));
        Ok(())
    }

    async fn commit(&mut self, name: &str) -> Result<()> {
        if self.payload(name).is_none() {
            return Err(Error::Sink(format!("payload '{name}' was never staged")));
        }
        *self.commits.entry(name.to_string()).or_insert(0) += 1;
        Ok(())
    }
}

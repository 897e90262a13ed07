use crate::domain::{DomainRecord, DomainStore, DomainUpdate};
use crate::utils::error::{MonitorError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

fn apply_to(records: &mut [DomainRecord], id: &str, update: &DomainUpdate) -> Result<()> {
    let record = records
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| MonitorError::store(format!("unknown domain id '{}'", id)))?;
    record.apply(update);
    Ok(())
}

/// In-process domain list.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<Vec<DomainRecord>>>,
}

impl MemoryStore {
    pub fn new(records: Vec<DomainRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    pub async fn snapshot(&self) -> Vec<DomainRecord> {
        self.records.read().await.clone()
    }

    pub async fn replace(&self, records: Vec<DomainRecord>) {
        *self.records.write().await = records;
    }
}

#[async_trait]
impl DomainStore for MemoryStore {
    async fn domains(&self) -> Result<Vec<DomainRecord>> {
        Ok(self.snapshot().await)
    }

    async fn apply_update(&self, id: &str, update: &DomainUpdate) -> Result<()> {
        let mut records = self.records.write().await;
        apply_to(&mut records, id, update)
    }
}

/// Domain list kept as a JSON array on disk. Re-read on every `domains()`
/// call so external edits are picked up by the next sweep.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<DomainRecord>> {
        let data = tokio::fs::read(&self.path).await?;
        if data.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&data)?)
    }

    async fn write_all(&self, records: &[DomainRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let data = serde_json::to_vec_pretty(records)?;
        // write to a sibling file first so a crash never leaves half a list behind
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &data).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl DomainStore for JsonFileStore {
    async fn domains(&self) -> Result<Vec<DomainRecord>> {
        self.read_all().await
    }

    async fn apply_update(&self, id: &str, update: &DomainUpdate) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_all().await?;
        apply_to(&mut records, id, update)?;
        self.write_all(&records).await
    }
}

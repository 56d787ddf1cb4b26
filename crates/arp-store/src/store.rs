use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::Snapshot;

/// Read/replace repository over a whole [`Snapshot`].
pub trait SnapshotStore {
    fn load(&self) -> Result<Snapshot>;

    /// Replace the stored snapshot wholesale.
    fn replace(&mut self, next: Snapshot) -> Result<()>;
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    current: Snapshot,
}

impl InMemoryStore {
    pub fn new(initial: Snapshot) -> Self {
        Self { current: initial }
    }
}

impl SnapshotStore for InMemoryStore {
    fn load(&self) -> Result<Snapshot> {
        Ok(self.current.clone())
    }

    fn replace(&mut self, next: Snapshot) -> Result<()> {
        self.current = next;
        Ok(())
    }
}

/// Pretty-printed JSON document on disk. A missing file loads as empty.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Snapshot> {
        if !self.path.exists() {
            return Ok(Snapshot::default());
        }
        let s = fs::read_to_string(&self.path)
            .with_context(|| format!("read snapshot failed: {}", self.path.display()))?;
        let snap: Snapshot = serde_json::from_str(&s)
            .with_context(|| format!("parse snapshot json failed: {}", self.path.display()))?;
        Ok(snap)
    }

    fn replace(&mut self, next: Snapshot) -> Result<()> {
        let json = serde_json::to_string_pretty(&next).context("serialize snapshot failed")?;

        // Write-then-rename so readers never see a half-written file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, format!("{json}\n"))
            .with_context(|| format!("write snapshot failed: {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replace snapshot failed: {}", self.path.display()))?;

        info!(
            path = %self.path.display(),
            contracts = next.contracts.len(),
            clients = next.clients.len(),
            opportunities = next.opportunities.len(),
            kits = next.kits.len(),
            "snapshot replaced"
        );
        Ok(())
    }
}

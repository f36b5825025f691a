//! Persisted set of listing urls that were already notified.
//!
//! The file is a plain JSON array of strings, rewritten in full on every save.
//! Entries are only ever added.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::fs;

pub type SeenSet = BTreeSet<String>;

#[derive(Debug, Clone)]
pub struct SeenStore {
    path: PathBuf,
}

impl SeenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing, unreadable, or malformed file all mean "nothing seen yet".
    pub async fn load(&self) -> SeenSet {
        let s = match fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return SeenSet::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "seen file unreadable: {e:#}");
                return SeenSet::new();
            }
        };
        match serde_json::from_str::<Vec<String>>(&s) {
            Ok(v) => v.into_iter().collect(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "seen file malformed, starting empty: {e:#}");
                SeenSet::new()
            }
        }
    }

    /// Overwrite the file with the whole set, sorted.
    pub async fn save(&self, seen: &SeenSet) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let body = serde_json::to_vec(&seen.iter().collect::<Vec<_>>())?;
        fs::write(&self.path, body)
            .await
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

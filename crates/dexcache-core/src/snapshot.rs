//! Flat-file snapshot persistence for reference lists.
//!
//! One JSON file per catalog endpoint, each a plain array of reference
//! records in upstream order. Snapshots are produced by the bulk lister
//! and are required reading for the dashboard: a missing file at startup
//! is a fatal, user-visible error naming the file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::models::CatalogRef;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Snapshot file not found: {} (run with --fetch-index to create it)", .0.display())]
    Missing(PathBuf),

    #[error("Failed to read snapshot {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse snapshot {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub struct SnapshotStore {
    data_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
        Ok(Self { data_dir })
    }

    pub fn path(&self, endpoint: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", endpoint))
    }

    /// Write the full reference list for an endpoint, overwriting any
    /// previous snapshot.
    pub fn save(&self, endpoint: &str, refs: &[CatalogRef]) -> Result<()> {
        let path = self.path(endpoint);
        let contents = serde_json::to_string_pretty(refs)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        debug!(endpoint, records = refs.len(), "Snapshot saved");
        Ok(())
    }

    pub fn load(&self, endpoint: &str) -> Result<Vec<CatalogRef>, SnapshotError> {
        let path = self.path(endpoint);
        if !path.exists() {
            return Err(SnapshotError::Missing(path));
        }

        let contents = std::fs::read_to_string(&path).map_err(|source| SnapshotError::Io {
            path: path.clone(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| SnapshotError::Parse { path, source })
    }

    /// Human-readable age of an endpoint's snapshot, from file mtime.
    /// None when the snapshot does not exist or mtime is unavailable.
    pub fn age_display(&self, endpoint: &str) -> Option<String> {
        let modified = std::fs::metadata(self.path(endpoint)).ok()?.modified().ok()?;
        let modified: DateTime<Utc> = modified.into();
        let minutes = (Utc::now() - modified).num_minutes();
        Some(format_age(minutes))
    }
}

/// Render an age in minutes the way the status bar wants it.
/// Negative ages (clock skew) read as "just now".
fn format_age(minutes: i64) -> String {
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        if minutes % 60 >= 30 {
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        if (minutes % 1440) / 60 >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

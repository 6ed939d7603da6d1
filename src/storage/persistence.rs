//! Snapshot file for the in-process store

use crate::core::{Result, StoreError};
use crate::domain::{Employee, PerformanceReview};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub version: u32,
    pub employees: Vec<Employee>,
    pub performance_reviews: Vec<PerformanceReview>,
    pub metadata: SnapshotMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub created_at: i64,
    pub employee_count: usize,
    pub review_count: usize,
}

impl StoreSnapshot {
    pub fn new(employees: Vec<Employee>, performance_reviews: Vec<PerformanceReview>) -> Self {
        let metadata = SnapshotMetadata {
            created_at: Utc::now().timestamp_millis(),
            employee_count: employees.len(),
            review_count: performance_reviews.len(),
        };
        Self {
            version: SNAPSHOT_VERSION,
            employees,
            performance_reviews,
            metadata,
        }
    }
}

pub struct SnapshotManager {
    snapshot_path: PathBuf,
}

impl SnapshotManager {
    pub fn new<P: AsRef<Path>>(snapshot_path: P) -> Self {
        Self {
            snapshot_path: snapshot_path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Write the snapshot next to its final path, then atomically swap it in.
    pub fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        let dir = match self.snapshot_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let serialized = rmp_serde::to_vec_named(snapshot)
            .map_err(|e| StoreError::Codec(format!("Failed to serialize snapshot: {e}")))?;

        let mut temp = NamedTempFile::new_in(&dir)?;
        temp.write_all(&serialized)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.snapshot_path)
            .map_err(|e| StoreError::IoError(format!("Failed to replace snapshot: {}", e.error)))?;
        Ok(())
    }

    pub fn load(&self) -> Result<Option<StoreSnapshot>> {
        if !self.snapshot_path.exists() {
            return Ok(None);
        }
        let data = fs::read(&self.snapshot_path)?;
        let snapshot: StoreSnapshot = rmp_serde::from_slice(&data)
            .map_err(|e| StoreError::Codec(format!("Failed to deserialize snapshot: {e}")))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StoreError::Codec(format!(
                "Unsupported snapshot version {}",
                snapshot.version
            )));
        }
        Ok(Some(snapshot))
    }

    pub fn exists(&self) -> bool {
        self.snapshot_path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};
    use tempfile::TempDir;

    fn employee() -> Employee {
        let ts: DateTime<Utc> = Utc.with_ymd_and_hms(2024, 12, 22, 15, 57, 39).unwrap();
        Employee {
            id: "cm4zskw1q00002q4jo2vf8p00".into(),
            last_name: Some("Doe".into()),
            first_name: "John".into(),
            email: "jdoe@example.com".into(),
            role: None,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_snapshot_save_and_load() {
        let dir = TempDir::new().unwrap();
        let manager = SnapshotManager::new(dir.path().join("nested").join("syrups.snapshot"));
        assert!(manager.load().unwrap().is_none());

        let snapshot = StoreSnapshot::new(vec![employee()], Vec::new());
        manager.save(&snapshot).unwrap();
        assert!(manager.exists());

        let loaded = manager.load().unwrap().unwrap();
        assert_eq!(loaded.employees, snapshot.employees);
        assert_eq!(loaded.metadata.employee_count, 1);
    }

    #[test]
    fn test_corrupt_snapshot_is_a_codec_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.snapshot");
        fs::write(&path, b"\xc1garbage").unwrap();

        let err = SnapshotManager::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Codec(_)));
    }
}

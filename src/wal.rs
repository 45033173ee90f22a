//! A toy write-ahead log. Appends JSON-lines entries to a file and can
//! replay them back; nothing in `Engine` calls this yet.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WalEntry {
    pub txn_id: u64,
    pub action: String,
    pub table: String,
    pub data: serde_json::Value,
}

pub struct WriteAheadLog {
    path: PathBuf,
}

impl WriteAheadLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        WriteAheadLog {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Appends one entry as a JSON line.
    pub fn log(&self, entry: &WalEntry) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(entry)
            .map_err(|e| StorageError::Io(e.to_string()))?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    /// Replays every entry written so far, in append order. Returns an
    /// empty vec if the log file doesn't exist yet.
    pub fn recover(&self) -> Result<Vec<WalEntry>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = OpenOptions::new().read(true).open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: WalEntry = serde_json::from_str(&line)
                .map_err(|e| StorageError::Io(e.to_string()))?;
            entries.push(entry);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recover_on_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let wal = WriteAheadLog::new(dir.path().join("nonexistent.log"));
        assert_eq!(wal.recover().unwrap(), Vec::new());
    }

    #[test]
    fn log_then_recover_roundtrips_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let wal = WriteAheadLog::new(dir.path().join("transaction.log"));
        let first = WalEntry {
            txn_id: 1,
            action: "INSERT".to_string(),
            table: "users".to_string(),
            data: serde_json::json!({"id": 1}),
        };
        let second = WalEntry {
            txn_id: 2,
            action: "DELETE".to_string(),
            table: "users".to_string(),
            data: serde_json::json!({"id": 1}),
        };
        wal.log(&first).unwrap();
        wal.log(&second).unwrap();
        assert_eq!(wal.recover().unwrap(), vec![first, second]);
    }
}

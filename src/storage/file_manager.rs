//! Reads/writes fixed-size, page-aligned blocks against one file.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::StorageError;

pub struct FileManager {
    path: PathBuf,
    file: File,
}

impl FileManager {
    /// Opens the file at `path`, creating it (and parent directories) if absent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)?;
        Ok(FileManager { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seeks to `page_num * size` and reads up to `size` bytes, zero-padding
    /// a short tail.
    pub fn read_page(&mut self, page_num: usize, size: usize) -> Result<Vec<u8>, StorageError> {
        let mut buf = vec![0_u8; size];
        self.file
            .seek(SeekFrom::Start((page_num as u64) * (size as u64)))?;
        let mut read_so_far = 0;
        loop {
            let n = self.file.read(&mut buf[read_so_far..])?;
            if n == 0 {
                break;
            }
            read_so_far += n;
            if read_so_far == size {
                break;
            }
        }
        Ok(buf)
    }

    /// Seeks to `page_num * bytes.len()` and writes `bytes`.
    pub fn write_page(&mut self, page_num: usize, bytes: &[u8]) -> Result<(), StorageError> {
        self.file
            .seek(SeekFrom::Start((page_num as u64) * (bytes.len() as u64)))?;
        self.file.write_all(bytes)?;
        Ok(())
    }

    /// Forces durability. A no-op beyond `File::sync_all` at this scope.
    pub fn flush(&mut self) -> Result<(), StorageError> {
        self.file.sync_all()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dbfile");
        let mut fm = FileManager::open(&path).unwrap();
        fm.write_page(0, &[1_u8; 16]).unwrap();
        fm.write_page(1, &[2_u8; 16]).unwrap();
        assert_eq!(fm.read_page(0, 16).unwrap(), vec![1_u8; 16]);
        assert_eq!(fm.read_page(1, 16).unwrap(), vec![2_u8; 16]);
    }

    #[test]
    fn short_tail_is_zero_padded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dbfile");
        let mut fm = FileManager::open(&path).unwrap();
        fm.write_page(0, &[9_u8; 4]).unwrap();
        let page = fm.read_page(0, 16).unwrap();
        assert_eq!(&page[..4], &[9_u8; 4]);
        assert_eq!(&page[4..], &[0_u8; 12]);
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dir").join("dbfile");
        let fm = FileManager::open(&path);
        assert!(fm.is_ok());
    }
}

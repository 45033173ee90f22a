//! Process-local buffer cache mapping page numbers to in-memory `Page`s.
//! No eviction policy; the cache grows monotonically. Single-threaded.

use std::collections::HashMap;
use std::path::Path;

use crate::error::StorageError;
use crate::storage::file_manager::FileManager;
use crate::storage::page::Page;

pub type PageNum = usize;

pub struct Pager {
    file_manager: FileManager,
    page_size: usize,
    cache: HashMap<PageNum, Page>,
}

impl Pager {
    pub fn open(path: impl AsRef<Path>, page_size: usize) -> Result<Self, StorageError> {
        Ok(Pager {
            file_manager: FileManager::open(path)?,
            page_size,
            cache: HashMap::new(),
        })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the cached page, populating the cache from disk on a miss.
    pub fn get_page(&mut self, page_num: PageNum) -> Result<&mut Page, StorageError> {
        if !self.cache.contains_key(&page_num) {
            let bytes = self.file_manager.read_page(page_num, self.page_size)?;
            self.cache.insert(page_num, Page::from_bytes(bytes));
        }
        Ok(self.cache.get_mut(&page_num).expect("just inserted"))
    }

    /// Writes the cached page back through to disk.
    pub fn flush_page(&mut self, page_num: PageNum) -> Result<(), StorageError> {
        if let Some(page) = self.cache.get(&page_num) {
            self.file_manager.write_page(page_num, page.as_bytes())?;
        }
        Ok(())
    }

    /// Yields pages starting at `start`, stopping at the first all-zero page.
    pub fn iter_pages(&mut self, start: PageNum) -> PagerIterator<'_> {
        PagerIterator {
            pager: self,
            next: start,
            done: false,
        }
    }
}

pub struct PagerIterator<'a> {
    pager: &'a mut Pager,
    next: PageNum,
    done: bool,
}

impl<'a> Iterator for PagerIterator<'a> {
    type Item = PageNum;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let page_num = self.next;
        match self.pager.get_page(page_num) {
            Ok(page) if page.is_all_zero() => {
                self.done = true;
                None
            }
            Ok(_) => {
                self.next += 1;
                Some(page_num)
            }
            Err(_) => {
                self.done = true;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_page_caches_on_miss() {
        let dir = tempfile::tempdir().unwrap();
        let mut pager = Pager::open(dir.path().join("dbfile"), 64).unwrap();
        let page = pager.get_page(0).unwrap();
        assert_eq!(page.size(), 64);
        assert!(page.is_all_zero());
    }

    #[test]
    fn flush_then_reopen_sees_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dbfile");
        {
            let mut pager = Pager::open(&path, 64).unwrap();
            let page = pager.get_page(2).unwrap();
            page.write(0, b"hello").unwrap();
            pager.flush_page(2).unwrap();
        }
        let mut pager2 = Pager::open(&path, 64).unwrap();
        let page = pager2.get_page(2).unwrap();
        assert_eq!(page.read(0, 5).unwrap(), b"hello");
    }

    #[test]
    fn iter_pages_stops_at_all_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dbfile");
        {
            let mut pager = Pager::open(&path, 16).unwrap();
            pager.get_page(0).unwrap().write(0, b"a").unwrap();
            pager.flush_page(0).unwrap();
            pager.get_page(1).unwrap().write(0, b"b").unwrap();
            pager.flush_page(1).unwrap();
            // page 2 left all-zero
        }
        let mut pager = Pager::open(&path, 16).unwrap();
        let pages: Vec<_> = pager.iter_pages(0).collect();
        assert_eq!(pages, vec![0, 1]);
    }
}

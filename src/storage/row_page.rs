//! Slotted row page: a multi-row variable-length layout over one `Page`,
//! with tombstone deletes.
//!
//! Header = 4 bytes: `next_free` (u16 BE) then `row_count` (u16 BE). Body is
//! a sequence of records, each prefixed by a 2-byte signed BE length. A
//! positive length is a live row; a negative length is a tombstone whose
//! absolute value is the original body length.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::PageError;
use crate::storage::page::Page;

pub const HEADER_SIZE: usize = 4;

pub struct RowPage<'a> {
    page: &'a mut Page,
    next_free: usize,
    row_count: usize,
    /// Byte offset (of the length prefix) for each slot, live or tombstoned,
    /// in insertion order. Rebuilt on open by walking the body.
    offsets: Vec<usize>,
}

impl<'a> RowPage<'a> {
    /// Wraps `page`, rebuilding the slot offsets list by scanning the body
    /// from `HEADER_SIZE` to `next_free`.
    pub fn open(page: &'a mut Page) -> Result<Self, PageError> {
        let header = page.read(0, HEADER_SIZE)?;
        let mut next_free = (&header[0..2]).read_u16::<BigEndian>().unwrap() as usize;
        let header_row_count = (&header[2..4]).read_u16::<BigEndian>().unwrap() as usize;

        if next_free == 0 {
            next_free = HEADER_SIZE;
        }

        let mut offsets = Vec::new();
        let mut idx = HEADER_SIZE;
        while idx + 2 <= next_free {
            let len_bytes = page.read(idx, 2)?;
            let signed_len = (&len_bytes[..]).read_i16::<BigEndian>().unwrap();
            offsets.push(idx);
            let body_len = signed_len.unsigned_abs() as usize;
            idx += 2 + body_len;
        }

        let row_count = offsets
            .iter()
            .filter(|&&off| {
                let len_bytes = page.read(off, 2).unwrap();
                (&len_bytes[..]).read_i16::<BigEndian>().unwrap() > 0
            })
            .count();
        let _ = header_row_count; // recomputed from the body rather than trusted blindly

        Ok(RowPage {
            page,
            next_free,
            row_count,
            offsets,
        })
    }

    fn write_header(&mut self) -> Result<(), PageError> {
        let mut buf = Vec::with_capacity(HEADER_SIZE);
        buf.write_u16::<BigEndian>(self.next_free as u16).unwrap();
        buf.write_u16::<BigEndian>(self.row_count as u16).unwrap();
        self.page.write(0, &buf)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn slot_count(&self) -> usize {
        self.offsets.len()
    }

    pub fn can_fit(&self, body: &[u8]) -> bool {
        self.next_free + 2 + body.len() <= self.page.size()
    }

    /// Appends `body` as a new live row. Returns `false` without mutation if
    /// it doesn't fit.
    pub fn add_row(&mut self, body: &[u8]) -> Result<bool, PageError> {
        if !self.can_fit(body) {
            return Ok(false);
        }
        let slot_offset = self.next_free;
        let mut len_buf = Vec::with_capacity(2);
        len_buf
            .write_i16::<BigEndian>(body.len() as i16)
            .unwrap();
        self.page.write(slot_offset, &len_buf)?;
        self.page.write(slot_offset + 2, body)?;

        self.offsets.push(slot_offset);
        self.row_count += 1;
        self.next_free = slot_offset + 2 + body.len();
        self.write_header()?;
        Ok(true)
    }

    /// Emits live record bodies in insertion order, skipping tombstones.
    pub fn get_rows(&self) -> Result<Vec<Vec<u8>>, PageError> {
        let mut rows = Vec::new();
        for &offset in &self.offsets {
            let len_bytes = self.page.read(offset, 2)?;
            let signed_len = (&len_bytes[..]).read_i16::<BigEndian>().unwrap();
            if signed_len < 0 {
                continue;
            }
            let body = self.page.read(offset + 2, signed_len as usize)?;
            rows.push(body.to_vec());
        }
        Ok(rows)
    }

    /// Replaces the body of slot `slot_index` in place. Succeeds only when
    /// `new_body.len()` equals the existing body length.
    pub fn update_row(&mut self, slot_index: usize, new_body: &[u8]) -> Result<bool, PageError> {
        let offset = match self.offsets.get(slot_index) {
            Some(&o) => o,
            None => return Ok(false),
        };
        let len_bytes = self.page.read(offset, 2)?;
        let signed_len = (&len_bytes[..]).read_i16::<BigEndian>().unwrap();
        let existing_len = signed_len.unsigned_abs() as usize;
        if existing_len != new_body.len() {
            return Ok(false);
        }
        if signed_len < 0 {
            return Ok(false);
        }
        self.page.write(offset + 2, new_body)?;
        Ok(true)
    }

    /// Rewrites the length prefix of slot `slot_index` as its negation
    /// (tombstone).
    pub fn delete_row(&mut self, slot_index: usize) -> Result<bool, PageError> {
        let offset = match self.offsets.get(slot_index) {
            Some(&o) => o,
            None => return Ok(false),
        };
        let len_bytes = self.page.read(offset, 2)?;
        let signed_len = (&len_bytes[..]).read_i16::<BigEndian>().unwrap();
        if signed_len < 0 {
            return Ok(true); // already a tombstone
        }
        let mut buf = Vec::with_capacity(2);
        buf.write_i16::<BigEndian>(-signed_len).unwrap();
        self.page.write(offset, &buf)?;
        self.row_count -= 1;
        self.write_header()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::page::Page;

    #[test]
    fn add_and_get_rows_preserves_insertion_order() {
        let mut page = Page::new(128);
        let mut rp = RowPage::open(&mut page).unwrap();
        assert!(rp.add_row(b"alpha").unwrap());
        assert!(rp.add_row(b"beta").unwrap());
        assert!(rp.add_row(b"gamma").unwrap());
        let rows = rp.get_rows().unwrap();
        assert_eq!(rows, vec![b"alpha".to_vec(), b"beta".to_vec(), b"gamma".to_vec()]);
    }

    #[test]
    fn add_row_returns_false_without_mutation_when_full() {
        let mut page = Page::new(HEADER_SIZE + 2 + 4);
        let mut rp = RowPage::open(&mut page).unwrap();
        assert!(rp.add_row(b"abcd").unwrap());
        assert!(!rp.add_row(b"x").unwrap());
        assert_eq!(rp.get_rows().unwrap(), vec![b"abcd".to_vec()]);
    }

    #[test]
    fn delete_row_tombstones_and_skips_on_scan() {
        let mut page = Page::new(128);
        let mut rp = RowPage::open(&mut page).unwrap();
        rp.add_row(b"first").unwrap();
        rp.add_row(b"second").unwrap();
        rp.add_row(b"third").unwrap();
        assert!(rp.delete_row(1).unwrap());
        let rows = rp.get_rows().unwrap();
        assert_eq!(rows, vec![b"first".to_vec(), b"third".to_vec()]);
        assert_eq!(rp.row_count(), 2);
    }

    #[test]
    fn update_row_requires_same_length() {
        let mut page = Page::new(128);
        let mut rp = RowPage::open(&mut page).unwrap();
        rp.add_row(b"abcd").unwrap();
        assert!(rp.update_row(0, b"wxyz").unwrap());
        assert_eq!(rp.get_rows().unwrap(), vec![b"wxyz".to_vec()]);
        assert!(!rp.update_row(0, b"too-long-body").unwrap());
    }

    #[test]
    fn reopen_rebuilds_offsets_and_skips_tombstones() {
        let mut page = Page::new(128);
        {
            let mut rp = RowPage::open(&mut page).unwrap();
            rp.add_row(b"one").unwrap();
            rp.add_row(b"two").unwrap();
            rp.delete_row(0).unwrap();
        }
        let rp = RowPage::open(&mut page).unwrap();
        assert_eq!(rp.get_rows().unwrap(), vec![b"two".to_vec()]);
        assert_eq!(rp.slot_count(), 2);
        assert_eq!(rp.row_count(), 1);
    }
}

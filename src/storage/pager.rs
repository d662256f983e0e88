//! # Pager
//!
//! The pager is the only component that touches the data file. It maintains a
//! fixed-capacity array of page slots over one file handle and hands out
//! whole 4 KiB pages as mutable byte slices.
//!
//! ## File Format
//!
//! The file is nothing but concatenated pages:
//!
//! ```text
//! Offset 0:      Page 0 (4096 bytes)   <- root node
//! Offset 4096:   Page 1 (4096 bytes)
//! Offset 8192:   Page 2 (4096 bytes)
//! ...
//! ```
//!
//! There is no file header, checksum, or version field; page 0's node header
//! is the first meaningful byte. The file length must be a whole multiple of
//! the page size at open time, and every flush writes a full page, so the
//! invariant heals itself across open/close cycles.
//!
//! ## Residency Policy
//!
//! | Event            | Effect                                              |
//! |------------------|-----------------------------------------------------|
//! | first access     | allocate a zeroed buffer, fill from disk if present |
//! | later accesses   | served from the slot, no I/O                        |
//! | flush            | whole page written back at `page_num * PAGE_SIZE`   |
//! | close            | flush every resident slot in `[0, page_count)`      |
//!
//! The pager never evicts: a populated slot stays resident until close. With
//! at most [`TABLE_MAX_PAGES`] slots of 4 KiB each, the worst case is a few
//! hundred kilobytes.
//!
//! ## Ownership
//!
//! The pager exclusively owns all page buffers. Callers borrow page bytes
//! through `page_mut` and must re-resolve the borrow through the pager on
//! each access; holding an index (`page_num`) instead of a pointer is what
//! keeps the borrows honest.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use eyre::{ensure, eyre, Result, WrapErr};
use log::debug;

use crate::config::{PAGE_SIZE, TABLE_MAX_PAGES};

type PageBuffer = Box<[u8; PAGE_SIZE]>;

#[derive(Debug)]
pub struct Pager {
    file: File,
    file_length: u64,
    page_count: u32,
    slots: [Option<PageBuffer>; TABLE_MAX_PAGES],
}

impl Pager {
    /// Opens the data file read-write, creating it if absent. Fails if the
    /// existing file is not a whole number of pages.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .wrap_err_with(|| format!("failed to open database file '{}'", path.display()))?;

        let file_length = file
            .seek(SeekFrom::End(0))
            .wrap_err_with(|| format!("failed to size database file '{}'", path.display()))?;

        ensure!(
            file_length % PAGE_SIZE as u64 == 0,
            "database file '{}' is corrupt: length {} is not a whole number of {}-byte pages",
            path.display(),
            file_length,
            PAGE_SIZE
        );

        let page_count = (file_length / PAGE_SIZE as u64) as u32;
        debug!(
            "opened '{}': {} bytes, {} pages",
            path.display(),
            file_length,
            page_count
        );

        Ok(Self {
            file,
            file_length,
            page_count,
            slots: std::array::from_fn(|_| None),
        })
    }

    /// Number of pages the table currently spans, counting pages created in
    /// memory but not yet flushed.
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Returns the page as a mutable byte slice, loading it from disk (or
    /// allocating it fresh) on first access.
    pub fn page_mut(&mut self, page_num: u32) -> Result<&mut [u8]> {
        ensure!(
            (page_num as usize) < TABLE_MAX_PAGES,
            "page number {} out of bounds, the table is limited to {} pages",
            page_num,
            TABLE_MAX_PAGES
        );

        let slot = &mut self.slots[page_num as usize];
        let page = match slot {
            Some(page) => page,
            None => {
                let buffer = load_page(&mut self.file, self.file_length, page_num)?;
                slot.insert(buffer)
            }
        };

        if page_num >= self.page_count {
            self.page_count = page_num + 1;
        }

        Ok(&mut page[..])
    }

    /// Writes the full page back to disk at its fixed offset. The slot must
    /// be resident.
    pub fn flush_page(&mut self, page_num: u32) -> Result<()> {
        ensure!(
            (page_num as usize) < TABLE_MAX_PAGES,
            "page number {} out of bounds, the table is limited to {} pages",
            page_num,
            TABLE_MAX_PAGES
        );

        let page = self.slots[page_num as usize]
            .as_ref()
            .ok_or_else(|| eyre!("tried to flush page {} which is not resident", page_num))?;

        let offset = page_num as u64 * PAGE_SIZE as u64;
        self.file
            .seek(SeekFrom::Start(offset))
            .wrap_err_with(|| format!("failed to seek to page {}", page_num))?;
        self.file
            .write_all(&page[..])
            .wrap_err_with(|| format!("failed to write page {}", page_num))?;

        self.file_length = self.file_length.max(offset + PAGE_SIZE as u64);
        debug!("flushed page {}", page_num);
        Ok(())
    }

    /// Flushes and releases every resident page. The first pass covers
    /// `[0, page_count)`; a second pass drops any slot outside that range,
    /// which the residency invariant says cannot exist.
    pub fn close(&mut self) -> Result<()> {
        for page_num in 0..self.page_count {
            if self.slots[page_num as usize].is_some() {
                self.flush_page(page_num)?;
                self.slots[page_num as usize] = None;
            }
        }

        for slot in self.slots.iter_mut() {
            *slot = None;
        }

        debug!("pager closed, {} pages on disk", self.page_count);
        Ok(())
    }
}

/// Reads one page worth of bytes into a fresh zeroed buffer. Pages beyond
/// the end of the file stay zeroed; a short read at the tail of a legacy
/// file leaves the missing bytes zero.
fn load_page(file: &mut File, file_length: u64, page_num: u32) -> Result<PageBuffer> {
    let mut buffer: PageBuffer = Box::new([0u8; PAGE_SIZE]);

    let pages_on_disk = file_length.div_ceil(PAGE_SIZE as u64);
    if (page_num as u64) < pages_on_disk {
        file.seek(SeekFrom::Start(page_num as u64 * PAGE_SIZE as u64))
            .wrap_err_with(|| format!("failed to seek to page {}", page_num))?;

        let mut filled = 0;
        while filled < PAGE_SIZE {
            let n = file
                .read(&mut buffer[filled..])
                .wrap_err_with(|| format!("failed to read page {}", page_num))?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        debug!("page {} cache miss, read {} bytes", page_num, filled);
    } else {
        debug!("page {} cache miss, fresh page", page_num);
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn open_missing_file_creates_empty_pager() {
        let dir = tempdir().unwrap();
        let pager = Pager::open(dir.path().join("fresh.db")).unwrap();

        assert_eq!(pager.page_count(), 0);
    }

    #[test]
    fn open_rejects_length_not_a_multiple_of_page_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("torn.db");
        fs::write(&path, vec![0u8; PAGE_SIZE + 17]).unwrap();

        let result = Pager::open(&path);

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("corrupt"));
    }

    #[test]
    fn first_access_to_new_page_is_zeroed_and_extends_page_count() {
        let dir = tempdir().unwrap();
        let mut pager = Pager::open(dir.path().join("new.db")).unwrap();

        let page = pager.page_mut(0).unwrap();
        assert!(page.iter().all(|&b| b == 0));
        assert_eq!(pager.page_count(), 1);

        pager.page_mut(3).unwrap();
        assert_eq!(pager.page_count(), 4);
    }

    #[test]
    fn page_number_at_limit_is_rejected() {
        let dir = tempdir().unwrap();
        let mut pager = Pager::open(dir.path().join("bounds.db")).unwrap();

        assert!(pager.page_mut(TABLE_MAX_PAGES as u32).is_err());
        assert!(pager.page_mut(TABLE_MAX_PAGES as u32 - 1).is_ok());
    }

    #[test]
    fn flush_of_non_resident_page_is_rejected() {
        let dir = tempdir().unwrap();
        let mut pager = Pager::open(dir.path().join("absent.db")).unwrap();

        assert!(pager.flush_page(0).is_err());
    }

    #[test]
    fn flushed_bytes_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("persist.db");

        {
            let mut pager = Pager::open(&path).unwrap();
            let page = pager.page_mut(0).unwrap();
            page[0] = 0xAB;
            page[PAGE_SIZE - 1] = 0xCD;
            pager.close().unwrap();
        }

        assert_eq!(fs::metadata(&path).unwrap().len(), PAGE_SIZE as u64);

        let mut pager = Pager::open(&path).unwrap();
        assert_eq!(pager.page_count(), 1);
        let page = pager.page_mut(0).unwrap();
        assert_eq!(page[0], 0xAB);
        assert_eq!(page[PAGE_SIZE - 1], 0xCD);
    }

    #[test]
    fn close_writes_every_resident_page() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("multi.db");

        {
            let mut pager = Pager::open(&path).unwrap();
            for page_num in 0..3 {
                let page = pager.page_mut(page_num).unwrap();
                page[0] = page_num as u8 + 1;
            }
            pager.close().unwrap();
        }

        assert_eq!(fs::metadata(&path).unwrap().len(), 3 * PAGE_SIZE as u64);

        let mut pager = Pager::open(&path).unwrap();
        for page_num in 0..3 {
            assert_eq!(pager.page_mut(page_num).unwrap()[0], page_num as u8 + 1);
        }
    }

    #[test]
    fn untouched_pages_keep_their_disk_contents_across_close() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.db");

        {
            let mut pager = Pager::open(&path).unwrap();
            pager.page_mut(0).unwrap()[10] = 1;
            pager.page_mut(1).unwrap()[10] = 2;
            pager.close().unwrap();
        }

        {
            // Touch only page 1; page 0 must remain intact on disk.
            let mut pager = Pager::open(&path).unwrap();
            pager.page_mut(1).unwrap()[10] = 9;
            pager.close().unwrap();
        }

        let mut pager = Pager::open(&path).unwrap();
        assert_eq!(pager.page_mut(0).unwrap()[10], 1);
        assert_eq!(pager.page_mut(1).unwrap()[10], 9);
    }
}

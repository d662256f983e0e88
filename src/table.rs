//! # Table
//!
//! The table owns the pager and fixes the root at page 0. Opening a fresh
//! (zero-length) file formats page 0 as an empty root leaf before anything
//! else can touch it; opening an existing file trusts the on-disk root.
//!
//! Durability is the explicit [`Table::close`]: every resident page is
//! flushed and the file handle is released. There is no destructor flush;
//! rows inserted between an open and a crash are not guaranteed to survive.

use std::path::Path;

use eyre::{bail, Result};
use log::debug;

use crate::btree::{self, LeafNodeMut, NodeType};
use crate::cursor::Cursor;
use crate::storage::Pager;

#[derive(Debug)]
pub struct Table {
    pager: Pager,
    root_page_num: u32,
}

impl Table {
    /// Opens (or creates) the database backing file and ensures the root
    /// leaf exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut pager = Pager::open(path)?;

        if pager.page_count() == 0 {
            let page = pager.page_mut(0)?;
            let mut root = LeafNodeMut::init(page)?;
            root.set_root(true);
            debug!("initialized empty database, page 0 is the root leaf");
        }

        Ok(Self {
            pager,
            root_page_num: 0,
        })
    }

    pub fn root_page_num(&self) -> u32 {
        self.root_page_num
    }

    pub(crate) fn page_mut(&mut self, page_num: u32) -> Result<&mut [u8]> {
        self.pager.page_mut(page_num)
    }

    /// Returns a cursor at the position of `key`, or at the slot where it
    /// would be inserted.
    pub fn find(&mut self, key: u32) -> Result<Cursor<'_>> {
        let root_page_num = self.root_page_num;
        let node_type = btree::node_type(self.pager.page_mut(root_page_num)?)?;

        match node_type {
            NodeType::Leaf => Cursor::find(self, root_page_num, key),
            NodeType::Internal => bail!("Need to implement searching an internal node."),
        }
    }

    /// Flushes every resident page and closes the file. This is the only
    /// durability point.
    pub fn close(mut self) -> Result<()> {
        debug!("closing table");
        self.pager.close()
    }
}

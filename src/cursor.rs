//! # Cursor
//!
//! A cursor is a position `(page_num, cell_num)` plus an end-of-table flag,
//! and is the sole means of reading or writing cells. It holds the page
//! *number*, not page bytes, and re-resolves the page through the pager on
//! every access, so no borrow of page memory outlives a single call.

use eyre::Result;

use crate::btree::{LeafNode, LeafNodeMut, SearchResult};
use crate::row::Row;
use crate::table::Table;

#[derive(Debug)]
pub struct Cursor<'a> {
    table: &'a mut Table,
    page_num: u32,
    cell_num: u32,
    end_of_table: bool,
}

impl<'a> Cursor<'a> {
    /// Positions at the first cell of the root leaf. On an empty table the
    /// cursor starts already at the end.
    pub fn begin(table: &'a mut Table) -> Result<Self> {
        let page_num = table.root_page_num();
        let page = table.page_mut(page_num)?;
        let leaf = LeafNode::from_page(&*page)?;
        let end_of_table = leaf.num_cells() == 0;

        Ok(Self {
            table,
            page_num,
            cell_num: 0,
            end_of_table,
        })
    }

    /// Positions at `key` within the leaf at `page_num`, or at the slot the
    /// key would occupy.
    pub fn find(table: &'a mut Table, page_num: u32, key: u32) -> Result<Self> {
        let page = table.page_mut(page_num)?;
        let leaf = LeafNode::from_page(&*page)?;
        let cell_num = match leaf.find(key) {
            SearchResult::Found(cell_num) | SearchResult::NotFound(cell_num) => cell_num,
        };

        Ok(Self {
            table,
            page_num,
            cell_num,
            end_of_table: false,
        })
    }

    pub fn cell_num(&self) -> u32 {
        self.cell_num
    }

    pub fn end_of_table(&self) -> bool {
        self.end_of_table
    }

    /// Key of the cell under the cursor.
    pub fn key(&mut self) -> Result<u32> {
        let page = self.table.page_mut(self.page_num)?;
        LeafNode::from_page(&*page)?.key(self.cell_num)
    }

    /// Serialized row bytes of the cell under the cursor.
    pub fn value(&mut self) -> Result<&[u8]> {
        let page = self.table.page_mut(self.page_num)?;
        let leaf = LeafNode::from_page(&*page)?;
        leaf.value(self.cell_num)
    }

    /// Moves to the next cell. Past the last cell of the leaf the cursor is
    /// at the end of the table; a multi-leaf tree would chain to the right
    /// sibling here instead.
    pub fn advance(&mut self) -> Result<()> {
        self.cell_num += 1;

        let page = self.table.page_mut(self.page_num)?;
        let leaf = LeafNode::from_page(&*page)?;
        if self.cell_num >= leaf.num_cells() {
            self.end_of_table = true;
        }
        Ok(())
    }

    /// Writes a new cell at the cursor position, shifting later cells right.
    pub fn insert(&mut self, key: u32, row: &Row) -> Result<()> {
        let page = self.table.page_mut(self.page_num)?;
        let mut leaf = LeafNodeMut::from_page(page)?;
        leaf.insert_cell(self.cell_num, key, row)
    }
}

//! # Leaf Node Layout and Access
//!
//! A leaf node is not a separate allocation; it is a typed view over one page
//! buffer owned by the pager. Cells live in a packed array right after the
//! header and are kept sorted by key with no gaps.
//!
//! ## Page Layout
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  ---------------------------------------------
//! 0       1     node_type    (0 = internal, 1 = leaf)
//! 1       1     is_root
//! 2       4     parent       (page number, reserved for splits)
//! 6       4     num_cells
//! 10      297   cell 0       (key: 4 bytes LE, row: 293 bytes)
//! 307     297   cell 1
//! ...
//! 3871    297   cell 12      (13 cells fill the page)
//! 4168..        wasted tail  (4096 - 10 - 13*297 = 225 bytes)
//! ```
//!
//! All multi-byte header fields are little-endian with no alignment padding,
//! so the header struct below is align-1 and can be read in place from any
//! offset-0 page slice.
//!
//! ## Search
//!
//! `find` is a binary search over the sorted keys. The loop invariant is
//! that the target position lies in `[lo, hi)`; on exit `lo` is the first
//! index whose key is greater than or equal to the target, which is exactly
//! the insertion point when the key is absent.
//!
//! ## Insertion
//!
//! Inserting at position `i` shifts cells `[i, num_cells)` one cell to the
//! right with a single overlapping `copy_within` (memmove semantics), then
//! writes the new key and row in place. Callers check capacity first; a full
//! leaf is an error here because node splitting is not implemented.

use eyre::{ensure, Result};
use zerocopy::byteorder::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::config::{
    LEAF_NODE_CELL_SIZE, LEAF_NODE_HEADER_SIZE, LEAF_NODE_KEY_SIZE, LEAF_NODE_MAX_CELLS, PAGE_SIZE,
    ROW_SIZE,
};
use crate::row::Row;

use super::NodeType;

/// On-disk leaf header: the common node header plus the cell count.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct LeafHeader {
    node_type: u8,
    is_root: u8,
    parent: U32,
    num_cells: U32,
}

const _: () = assert!(size_of::<LeafHeader>() == LEAF_NODE_HEADER_SIZE);

impl LeafHeader {
    fn ref_from_page(data: &[u8]) -> &Self {
        // The view constructors guarantee a full page; an align-1 header
        // parse from 10 bytes cannot fail.
        Self::ref_from_bytes(&data[..LEAF_NODE_HEADER_SIZE]).unwrap()
    }

    fn mut_from_page(data: &mut [u8]) -> &mut Self {
        Self::mut_from_bytes(&mut data[..LEAF_NODE_HEADER_SIZE]).unwrap()
    }
}

/// Outcome of a key search within one leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchResult {
    /// The key exists at this cell index.
    Found(u32),
    /// The key is absent; this is the index it would be inserted at.
    NotFound(u32),
}

/// Read-only view over a leaf page.
#[derive(Debug)]
pub struct LeafNode<'a> {
    data: &'a [u8],
}

/// Mutable view over a leaf page.
pub struct LeafNodeMut<'a> {
    data: &'a mut [u8],
}

fn cell_offset(cell_num: u32) -> usize {
    LEAF_NODE_HEADER_SIZE + cell_num as usize * LEAF_NODE_CELL_SIZE
}

fn validate(data: &[u8]) -> Result<()> {
    ensure!(
        data.len() == PAGE_SIZE,
        "invalid page size: {} != {}",
        data.len(),
        PAGE_SIZE
    );
    let header = LeafHeader::ref_from_page(data);
    let node_type = NodeType::from_byte(header.node_type)?;
    ensure!(
        node_type == NodeType::Leaf,
        "expected a leaf node, got {:?}",
        node_type
    );
    ensure!(
        header.num_cells.get() as usize <= LEAF_NODE_MAX_CELLS,
        "leaf cell count {} exceeds capacity {}",
        header.num_cells.get(),
        LEAF_NODE_MAX_CELLS
    );
    Ok(())
}

impl<'a> LeafNode<'a> {
    pub fn from_page(data: &'a [u8]) -> Result<Self> {
        validate(data)?;
        Ok(Self { data })
    }

    pub fn num_cells(&self) -> u32 {
        LeafHeader::ref_from_page(self.data).num_cells.get()
    }

    pub fn is_root(&self) -> bool {
        LeafHeader::ref_from_page(self.data).is_root != 0
    }

    pub fn parent(&self) -> u32 {
        LeafHeader::ref_from_page(self.data).parent.get()
    }

    pub fn key(&self, cell_num: u32) -> Result<u32> {
        ensure!(
            cell_num < self.num_cells(),
            "cell index {} out of bounds (num_cells={})",
            cell_num,
            self.num_cells()
        );
        Ok(read_key(self.data, cell_num))
    }

    /// The serialized row bytes of cell `cell_num`.
    pub fn value(&self, cell_num: u32) -> Result<&'a [u8]> {
        ensure!(
            cell_num < self.num_cells(),
            "cell index {} out of bounds (num_cells={})",
            cell_num,
            self.num_cells()
        );
        let start = cell_offset(cell_num) + LEAF_NODE_KEY_SIZE;
        Ok(&self.data[start..start + ROW_SIZE])
    }

    /// Binary search for `key`. Returns the cell holding it, or the index
    /// where it belongs.
    pub fn find(&self, key: u32) -> SearchResult {
        let mut lo = 0u32;
        let mut hi = self.num_cells();

        while lo != hi {
            let mid = (lo + hi) / 2;
            let key_at_mid = read_key(self.data, mid);
            if key == key_at_mid {
                return SearchResult::Found(mid);
            }
            if key < key_at_mid {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }

        SearchResult::NotFound(lo)
    }

    /// Diagnostic rendering used by the `.btree` meta-command.
    pub fn render(&self) -> String {
        let mut out = format!("leaf (size {})", self.num_cells());
        for cell_num in 0..self.num_cells() {
            out.push_str(&format!(
                "\n  - {} : {}",
                cell_num,
                read_key(self.data, cell_num)
            ));
        }
        out
    }
}

impl<'a> LeafNodeMut<'a> {
    pub fn from_page(data: &'a mut [u8]) -> Result<Self> {
        validate(data)?;
        Ok(Self { data })
    }

    /// Formats a fresh page as an empty leaf. Called exactly once per newly
    /// created leaf page.
    pub fn init(data: &'a mut [u8]) -> Result<Self> {
        ensure!(
            data.len() == PAGE_SIZE,
            "invalid page size: {} != {}",
            data.len(),
            PAGE_SIZE
        );

        let header = LeafHeader::mut_from_page(data);
        header.node_type = NodeType::Leaf as u8;
        header.is_root = 0;
        header.parent = U32::new(0);
        header.num_cells = U32::new(0);

        Ok(Self { data })
    }

    pub fn num_cells(&self) -> u32 {
        LeafHeader::ref_from_page(self.data).num_cells.get()
    }

    pub fn set_root(&mut self, is_root: bool) {
        LeafHeader::mut_from_page(self.data).is_root = is_root as u8;
    }

    pub fn key(&self, cell_num: u32) -> Result<u32> {
        self.as_ref().key(cell_num)
    }

    /// Mutable serialized row bytes of cell `cell_num`. The one-past-end
    /// index is not addressable here; new cells go through `insert_cell`.
    pub fn value_mut(&mut self, cell_num: u32) -> Result<&mut [u8]> {
        ensure!(
            cell_num < self.num_cells(),
            "cell index {} out of bounds (num_cells={})",
            cell_num,
            self.num_cells()
        );
        let start = cell_offset(cell_num) + LEAF_NODE_KEY_SIZE;
        Ok(&mut self.data[start..start + ROW_SIZE])
    }

    pub fn find(&self, key: u32) -> SearchResult {
        self.as_ref().find(key)
    }

    /// Inserts `(key, row)` at `cell_num`, shifting the cells at and after
    /// that position one slot to the right. Keys must be placed so the leaf
    /// stays sorted; `find` supplies the correct position.
    pub fn insert_cell(&mut self, cell_num: u32, key: u32, row: &Row) -> Result<()> {
        let num_cells = self.num_cells();
        ensure!(
            (num_cells as usize) < LEAF_NODE_MAX_CELLS,
            "leaf node is full ({} cells), node splitting is not implemented",
            num_cells
        );
        ensure!(
            cell_num <= num_cells,
            "insert position {} out of bounds (num_cells={})",
            cell_num,
            num_cells
        );

        if cell_num < num_cells {
            // Overlapping ranges; copy_within has memmove semantics.
            self.data.copy_within(
                cell_offset(cell_num)..cell_offset(num_cells),
                cell_offset(cell_num + 1),
            );
        }

        let start = cell_offset(cell_num);
        self.data[start..start + LEAF_NODE_KEY_SIZE].copy_from_slice(&key.to_le_bytes());
        row.serialize_into(&mut self.data[start + LEAF_NODE_KEY_SIZE..start + LEAF_NODE_CELL_SIZE])?;

        LeafHeader::mut_from_page(self.data).num_cells = U32::new(num_cells + 1);
        Ok(())
    }

    pub fn as_ref(&self) -> LeafNode<'_> {
        LeafNode { data: self.data }
    }
}

fn read_key(data: &[u8], cell_num: u32) -> u32 {
    let start = cell_offset(cell_num);
    let mut bytes = [0u8; LEAF_NODE_KEY_SIZE];
    bytes.copy_from_slice(&data[start..start + LEAF_NODE_KEY_SIZE]);
    u32::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_page() -> Vec<u8> {
        vec![0u8; PAGE_SIZE]
    }

    fn row(id: u32) -> Row {
        Row::new(id, &format!("user{}", id), &format!("user{}@example.com", id)).unwrap()
    }

    #[test]
    fn leaf_header_is_ten_bytes() {
        assert_eq!(size_of::<LeafHeader>(), LEAF_NODE_HEADER_SIZE);
    }

    #[test]
    fn init_produces_an_empty_non_root_leaf() {
        let mut page = make_page();
        let node = LeafNodeMut::init(&mut page).unwrap();

        assert_eq!(node.num_cells(), 0);
        assert!(!node.as_ref().is_root());
        assert_eq!(node.as_ref().parent(), 0);
    }

    #[test]
    fn from_page_rejects_wrong_size() {
        let page = vec![0u8; PAGE_SIZE - 1];
        assert!(LeafNode::from_page(&page).is_err());
    }

    #[test]
    fn from_page_rejects_internal_node() {
        let mut page = make_page();
        page[0] = NodeType::Internal as u8;

        let result = LeafNode::from_page(&page);

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("leaf"));
    }

    #[test]
    fn from_page_rejects_unknown_node_type_byte() {
        let mut page = make_page();
        page[0] = 0x7F;

        assert!(LeafNode::from_page(&page).is_err());
    }

    #[test]
    fn from_page_rejects_oversized_cell_count() {
        let mut page = make_page();
        LeafNodeMut::init(&mut page).unwrap();
        page[6..10].copy_from_slice(&(LEAF_NODE_MAX_CELLS as u32 + 1).to_le_bytes());

        assert!(LeafNode::from_page(&page).is_err());
    }

    #[test]
    fn insert_at_end_then_read_back() {
        let mut page = make_page();
        let mut node = LeafNodeMut::init(&mut page).unwrap();

        node.insert_cell(0, 5, &row(5)).unwrap();

        assert_eq!(node.num_cells(), 1);
        assert_eq!(node.key(0).unwrap(), 5);
        let decoded = Row::deserialize(node.as_ref().value(0).unwrap()).unwrap();
        assert_eq!(decoded.id, 5);
        assert_eq!(decoded.username(), "user5");
    }

    #[test]
    fn insert_in_middle_shifts_cells_right() {
        let mut page = make_page();
        let mut node = LeafNodeMut::init(&mut page).unwrap();

        node.insert_cell(0, 1, &row(1)).unwrap();
        node.insert_cell(1, 3, &row(3)).unwrap();
        node.insert_cell(1, 2, &row(2)).unwrap();

        assert_eq!(node.num_cells(), 3);
        for (cell_num, expected) in [1u32, 2, 3].iter().enumerate() {
            assert_eq!(node.key(cell_num as u32).unwrap(), *expected);
            let decoded = Row::deserialize(node.as_ref().value(cell_num as u32).unwrap()).unwrap();
            assert_eq!(decoded.id, *expected);
        }
    }

    #[test]
    fn insert_at_front_shifts_everything() {
        let mut page = make_page();
        let mut node = LeafNodeMut::init(&mut page).unwrap();

        for key in [2u32, 3, 4] {
            let pos = node.num_cells();
            node.insert_cell(pos, key, &row(key)).unwrap();
        }
        node.insert_cell(0, 1, &row(1)).unwrap();

        let keys: Vec<u32> = (0..node.num_cells()).map(|i| node.key(i).unwrap()).collect();
        assert_eq!(keys, [1, 2, 3, 4]);
    }

    #[test]
    fn find_locates_present_keys() {
        let mut page = make_page();
        let mut node = LeafNodeMut::init(&mut page).unwrap();

        for (pos, key) in [10u32, 20, 30].iter().enumerate() {
            node.insert_cell(pos as u32, *key, &row(*key)).unwrap();
        }

        assert_eq!(node.find(10), SearchResult::Found(0));
        assert_eq!(node.find(20), SearchResult::Found(1));
        assert_eq!(node.find(30), SearchResult::Found(2));
    }

    #[test]
    fn find_reports_insertion_point_for_absent_keys() {
        let mut page = make_page();
        let mut node = LeafNodeMut::init(&mut page).unwrap();

        for (pos, key) in [10u32, 20, 30].iter().enumerate() {
            node.insert_cell(pos as u32, *key, &row(*key)).unwrap();
        }

        assert_eq!(node.find(5), SearchResult::NotFound(0));
        assert_eq!(node.find(15), SearchResult::NotFound(1));
        assert_eq!(node.find(25), SearchResult::NotFound(2));
        assert_eq!(node.find(35), SearchResult::NotFound(3));
    }

    #[test]
    fn find_on_empty_leaf_points_at_zero() {
        let mut page = make_page();
        let node = LeafNodeMut::init(&mut page).unwrap();

        assert_eq!(node.find(99), SearchResult::NotFound(0));
    }

    #[test]
    fn full_leaf_rejects_further_inserts() {
        let mut page = make_page();
        let mut node = LeafNodeMut::init(&mut page).unwrap();

        for key in 0..LEAF_NODE_MAX_CELLS as u32 {
            node.insert_cell(key, key, &row(key)).unwrap();
        }

        let result = node.insert_cell(0, 100, &row(100));

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("full"));
        assert_eq!(node.num_cells(), LEAF_NODE_MAX_CELLS as u32);
    }

    #[test]
    fn thirteen_cells_fit_and_stay_sorted() {
        let mut page = make_page();
        let mut node = LeafNodeMut::init(&mut page).unwrap();

        // Insert in reverse so every insert shifts the whole tail.
        for key in (1..=LEAF_NODE_MAX_CELLS as u32).rev() {
            node.insert_cell(0, key, &row(key)).unwrap();
        }

        assert_eq!(node.num_cells(), LEAF_NODE_MAX_CELLS as u32);
        let keys: Vec<u32> = (0..node.num_cells()).map(|i| node.key(i).unwrap()).collect();
        assert_eq!(keys, (1..=13).collect::<Vec<u32>>());
    }

    #[test]
    fn render_lists_cells_with_positions() {
        let mut page = make_page();
        let mut node = LeafNodeMut::init(&mut page).unwrap();

        for (pos, key) in [1u32, 2, 3].iter().enumerate() {
            node.insert_cell(pos as u32, *key, &row(*key)).unwrap();
        }

        assert_eq!(
            node.as_ref().render(),
            "leaf (size 3)\n  - 0 : 1\n  - 1 : 2\n  - 2 : 3"
        );
    }

    #[test]
    fn render_of_empty_leaf_is_just_the_size_line() {
        let mut page = make_page();
        let node = LeafNodeMut::init(&mut page).unwrap();

        assert_eq!(node.as_ref().render(), "leaf (size 0)");
    }

    #[test]
    fn value_accessors_reject_out_of_range_cells() {
        let mut page = make_page();
        let mut node = LeafNodeMut::init(&mut page).unwrap();
        node.insert_cell(0, 1, &row(1)).unwrap();

        assert!(node.as_ref().value(1).is_err());
        assert!(node.value_mut(1).is_err());
        assert!(node.key(1).is_err());
    }
}

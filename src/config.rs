//! # Layout Constants
//!
//! This module centralizes the on-disk layout constants. Most values here are
//! derived from one another; constants that depend on each other are
//! co-located so a change to one is visible next to the values it affects.
//!
//! ## Derivation Graph
//!
//! ```text
//! PAGE_SIZE (4096 bytes)
//!       │
//!       └─> LEAF_NODE_SPACE_FOR_CELLS (PAGE_SIZE - LEAF_NODE_HEADER_SIZE)
//!             │
//!             └─> LEAF_NODE_MAX_CELLS (space / LEAF_NODE_CELL_SIZE = 13)
//!
//! ROW_SIZE (293 bytes = 4 id + 33 username + 256 email)
//!       │
//!       └─> LEAF_NODE_CELL_SIZE (LEAF_NODE_KEY_SIZE + ROW_SIZE = 297)
//! ```
//!
//! The invariants below are enforced by compile-time assertions; the same
//! numbers are what `.constants` prints in the REPL.

// ============================================================================
// PAGE GEOMETRY
// ============================================================================

/// Size of each database page in bytes. This is the unit of file I/O and
/// caching; the data file is always a whole number of pages.
pub const PAGE_SIZE: usize = 4096;

/// Maximum number of page slots the pager will ever hold. Fetching a page
/// number at or beyond this limit is an error.
pub const TABLE_MAX_PAGES: usize = 100;

// ============================================================================
// ROW LAYOUT
// A row is a fixed-width record: id, then username, then email, with the
// string fields NUL-padded to capacity.
// ============================================================================

/// Maximum username length in bytes, excluding the NUL terminator.
pub const USERNAME_MAX: usize = 32;

/// Maximum email length in bytes, excluding the NUL terminator.
pub const EMAIL_MAX: usize = 255;

/// On-disk width of the username field (content plus one NUL).
pub const USERNAME_CAPACITY: usize = USERNAME_MAX + 1;

/// On-disk width of the email field (content plus one NUL).
pub const EMAIL_CAPACITY: usize = EMAIL_MAX + 1;

pub const ID_SIZE: usize = size_of::<u32>();
pub const ID_OFFSET: usize = 0;
pub const USERNAME_OFFSET: usize = ID_OFFSET + ID_SIZE;
pub const EMAIL_OFFSET: usize = USERNAME_OFFSET + USERNAME_CAPACITY;

/// Serialized width of a row.
pub const ROW_SIZE: usize = ID_SIZE + USERNAME_CAPACITY + EMAIL_CAPACITY;

const _: () = assert!(ROW_SIZE == 293, "row layout drifted from the file format");

// ============================================================================
// NODE HEADERS
// Every page starts with the common node header; leaf pages extend it with
// a cell count.
// ============================================================================

pub const NODE_TYPE_SIZE: usize = size_of::<u8>();
pub const IS_ROOT_SIZE: usize = size_of::<u8>();
pub const PARENT_POINTER_SIZE: usize = size_of::<u32>();

/// Common header shared by leaf and internal nodes: type byte, root flag,
/// parent page number.
pub const COMMON_NODE_HEADER_SIZE: usize = NODE_TYPE_SIZE + IS_ROOT_SIZE + PARENT_POINTER_SIZE;

pub const LEAF_NODE_NUM_CELLS_SIZE: usize = size_of::<u32>();

/// Full leaf header: common header plus the cell count.
pub const LEAF_NODE_HEADER_SIZE: usize = COMMON_NODE_HEADER_SIZE + LEAF_NODE_NUM_CELLS_SIZE;

// ============================================================================
// LEAF BODY
// The body is a packed array of (key, row) cells kept sorted by key.
// ============================================================================

pub const LEAF_NODE_KEY_SIZE: usize = size_of::<u32>();

/// One cell: 4-byte key followed by the serialized row.
pub const LEAF_NODE_CELL_SIZE: usize = LEAF_NODE_KEY_SIZE + ROW_SIZE;

/// Bytes available for cells after the leaf header.
pub const LEAF_NODE_SPACE_FOR_CELLS: usize = PAGE_SIZE - LEAF_NODE_HEADER_SIZE;

/// Cells that fit in one leaf. Inserting beyond this requires node splitting,
/// which this store does not implement.
pub const LEAF_NODE_MAX_CELLS: usize = LEAF_NODE_SPACE_FOR_CELLS / LEAF_NODE_CELL_SIZE;

const _: () = assert!(COMMON_NODE_HEADER_SIZE == 6, "common header layout drifted");
const _: () = assert!(LEAF_NODE_HEADER_SIZE == 10, "leaf header layout drifted");
const _: () = assert!(LEAF_NODE_CELL_SIZE == 297, "cell layout drifted");
const _: () = assert!(LEAF_NODE_MAX_CELLS == 13, "leaf capacity drifted");

const _: () = assert!(
    LEAF_NODE_HEADER_SIZE + LEAF_NODE_MAX_CELLS * LEAF_NODE_CELL_SIZE <= PAGE_SIZE,
    "a full leaf must fit in one page"
);

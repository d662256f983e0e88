//! # leafdb - Minimal Persistent Row Store
//!
//! A single-table persistent key-value store behind a line-oriented REPL.
//! Records are keyed by a 32-bit unsigned id and stored in one disk file
//! organized as fixed 4 KiB pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │        CLI (REPL, meta-commands)    │
//! ├─────────────────────────────────────┤
//! │   Statement Layer (parse, execute)  │
//! ├─────────────────────────────────────┤
//! │        Cursor  │  Table             │
//! ├─────────────────────────────────────┤
//! │   B-Tree Leaf Format (page views)   │
//! ├─────────────────────────────────────┤
//! │        Pager (page cache, file)     │
//! └─────────────────────────────────────┘
//! ```
//!
//! The pager owns every page buffer; cursors and views hold page numbers and
//! re-resolve bytes through the pager per access. The tree is a single root
//! leaf holding up to 13 sorted cells; the on-disk headers reserve room for
//! internal nodes and splits, but neither is implemented.
//!
//! ## Quick Start
//!
//! ```no_run
//! use leafdb::sql::{execute_statement, prepare_statement};
//! use leafdb::Table;
//!
//! # fn main() -> eyre::Result<()> {
//! let mut table = Table::open("users.db")?;
//! let statement = prepare_statement("insert 1 alice alice@example.com")
//!     .map_err(|e| eyre::eyre!(e))?;
//! execute_statement(&mut table, statement).map_err(|e| eyre::eyre!(e))?;
//! table.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! Everything is single-threaded and synchronous; the only durability point
//! is the explicit [`Table::close`].

pub mod btree;
pub mod cli;
pub mod config;
pub mod cursor;
pub mod row;
pub mod sql;
pub mod storage;
pub mod table;

pub use cursor::Cursor;
pub use row::Row;
pub use table::Table;

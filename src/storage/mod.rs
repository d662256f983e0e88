//! # Storage Layer
//!
//! File-backed page storage. The [`Pager`] mediates all access between page
//! numbers and bytes on disk: higher layers never hold a file handle, they
//! ask the pager for a page and get a 4 KiB byte slice back.
//!
//! The design is deliberately simple compared to a general buffer pool:
//! a fixed array of slots, no eviction, no dirty tracking (every resident
//! page is written back on close), and whole-page I/O only.

mod pager;

pub use pager::Pager;

//! # CLI
//!
//! The interactive front end: a prompt loop reading line-oriented input and
//! a handler for the dot meta-commands. Both are thin wrappers over the
//! statement layer; everything they print is part of the REPL's transcript
//! contract and is covered by the end-to-end tests.

pub mod commands;
pub mod repl;

pub use commands::{CommandHandler, CommandResult};
pub use repl::Repl;

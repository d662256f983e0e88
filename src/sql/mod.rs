//! # Statement Layer
//!
//! Parsing of the two-statement language (`insert`, `select`) and the
//! executor that drives the cursor layer. Prepare and execute failures are
//! separate taxonomies because the REPL words them differently.

mod executor;
mod parser;

pub use executor::{execute_statement, ExecuteError, ExecuteResult};
pub use parser::{prepare_statement, PrepareError, Statement};

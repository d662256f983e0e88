//! Statement execution.
//!
//! The executor is glue between parsed statements and the cursor layer:
//! `insert` locates the insertion slot by key and writes one cell, `select`
//! scans the whole table from a begin-cursor. Cursors live only for the
//! duration of a single statement.

use std::error::Error;
use std::fmt;

use crate::btree::LeafNode;
use crate::config::LEAF_NODE_MAX_CELLS;
use crate::cursor::Cursor;
use crate::row::Row;
use crate::table::Table;

use super::Statement;

#[derive(Debug)]
pub enum ExecuteResult {
    Insert,
    Select { rows: Vec<Row> },
}

/// Statement-level failures. The first two are the store's own taxonomy and
/// render exactly as the REPL prints them; `Storage` carries infrastructure
/// errors (I/O, corrupt pages) through unchanged.
#[derive(Debug)]
pub enum ExecuteError {
    TableFull,
    DuplicateKey,
    Storage(eyre::Report),
}

impl fmt::Display for ExecuteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecuteError::TableFull => write!(f, "Table full."),
            ExecuteError::DuplicateKey => write!(f, "Duplicate key."),
            ExecuteError::Storage(report) => write!(f, "{:#}", report),
        }
    }
}

impl Error for ExecuteError {}

impl From<eyre::Report> for ExecuteError {
    fn from(report: eyre::Report) -> Self {
        ExecuteError::Storage(report)
    }
}

pub fn execute_statement(
    table: &mut Table,
    statement: Statement,
) -> Result<ExecuteResult, ExecuteError> {
    match statement {
        Statement::Insert { row } => execute_insert(table, row),
        Statement::Select => execute_select(table),
    }
}

fn execute_insert(table: &mut Table, row: Row) -> Result<ExecuteResult, ExecuteError> {
    let root_page_num = table.root_page_num();
    let num_cells = {
        let page = table.page_mut(root_page_num)?;
        LeafNode::from_page(&*page)?.num_cells()
    };

    if num_cells as usize >= LEAF_NODE_MAX_CELLS {
        return Err(ExecuteError::TableFull);
    }

    let mut cursor = table.find(row.id)?;
    if cursor.cell_num() < num_cells && cursor.key()? == row.id {
        return Err(ExecuteError::DuplicateKey);
    }

    cursor.insert(row.id, &row)?;
    Ok(ExecuteResult::Insert)
}

fn execute_select(table: &mut Table) -> Result<ExecuteResult, ExecuteError> {
    let mut cursor = Cursor::begin(table)?;
    let mut rows = Vec::new();

    while !cursor.end_of_table() {
        rows.push(Row::deserialize(cursor.value()?)?);
        cursor.advance()?;
    }

    Ok(ExecuteResult::Select { rows })
}

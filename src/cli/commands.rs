//! # Meta-Command Handler
//!
//! Lines starting with a period are meta-commands, handled before statement
//! parsing is attempted.
//!
//! | Command      | Effect                                        |
//! |--------------|-----------------------------------------------|
//! | `.exit`      | Close the database cleanly and leave the REPL |
//! | `.btree`     | Print the structure of the root node          |
//! | `.constants` | Print the row and leaf layout constants       |
//!
//! Anything else starting with `.` is reported as unrecognized, echoing the
//! line back.

use eyre::Result;

use crate::btree::LeafNode;
use crate::config::{
    COMMON_NODE_HEADER_SIZE, LEAF_NODE_CELL_SIZE, LEAF_NODE_HEADER_SIZE, LEAF_NODE_MAX_CELLS,
    LEAF_NODE_SPACE_FOR_CELLS, ROW_SIZE,
};
use crate::table::Table;

#[derive(Debug, PartialEq)]
pub enum CommandResult {
    Exit,
    Output(String),
    Error(String),
}

pub struct CommandHandler;

impl CommandHandler {
    pub fn is_command(input: &str) -> bool {
        input.starts_with('.')
    }

    pub fn execute(input: &str, table: &mut Table) -> CommandResult {
        match input {
            ".exit" => CommandResult::Exit,
            ".btree" => match render_tree(table) {
                Ok(text) => CommandResult::Output(text),
                Err(err) => CommandResult::Error(format!("Error: {:#}", err)),
            },
            ".constants" => CommandResult::Output(constants_text()),
            _ => CommandResult::Error(format!("Unrecognized command: {}", input)),
        }
    }
}

fn render_tree(table: &mut Table) -> Result<String> {
    let root_page_num = table.root_page_num();
    let page = table.page_mut(root_page_num)?;
    let root = LeafNode::from_page(&*page)?;
    Ok(format!("Tree:\n{}", root.render()))
}

fn constants_text() -> String {
    format!(
        "Constants:\n\
         ROW_SIZE: {}\n\
         COMMON_NODE_HEADER_SIZE: {}\n\
         LEAF_NODE_HEADER_SIZE: {}\n\
         LEAF_NODE_CELL_SIZE: {}\n\
         LEAF_NODE_SPACE_FOR_CELLS: {}\n\
         LEAF_NODE_MAX_CELLS: {}",
        ROW_SIZE,
        COMMON_NODE_HEADER_SIZE,
        LEAF_NODE_HEADER_SIZE,
        LEAF_NODE_CELL_SIZE,
        LEAF_NODE_SPACE_FOR_CELLS,
        LEAF_NODE_MAX_CELLS
    )
}

//! # REPL - Read-Eval-Print Loop
//!
//! The interactive loop over one open table. Each iteration writes the
//! `db > ` prompt (no newline), reads one line, and dispatches:
//!
//! - lines starting with `.` go to the meta-command handler;
//! - everything else is parsed as a statement and executed.
//!
//! All user-facing output, including error messages, goes to stdout so a
//! scripted session reads as one transcript. Statement and execution errors
//! are reported and the loop continues; only the exit command (or end of
//! input) leaves it, closing the table on the way out.

use std::io::{self, BufRead, Write};

use eyre::{Result, WrapErr};

use crate::cli::commands::{CommandHandler, CommandResult};
use crate::sql::{execute_statement, prepare_statement, ExecuteResult, Statement};
use crate::table::Table;

const PROMPT: &str = "db > ";

pub struct Repl {
    table: Table,
}

impl Repl {
    pub fn new(table: Table) -> Self {
        Self { table }
    }

    pub fn run(self) -> Result<()> {
        let Self { mut table } = self;
        let stdin = io::stdin();
        let mut input = String::new();

        loop {
            print!("{}", PROMPT);
            io::stdout().flush().wrap_err("failed to flush prompt")?;

            input.clear();
            let bytes_read = stdin
                .lock()
                .read_line(&mut input)
                .wrap_err("failed to read input")?;
            if bytes_read == 0 {
                // End of input without .exit still gets a clean close.
                return table.close();
            }
            let line = input.trim();

            if CommandHandler::is_command(line) {
                match CommandHandler::execute(line, &mut table) {
                    CommandResult::Exit => {
                        table.close()?;
                        println!("Bye!");
                        return Ok(());
                    }
                    CommandResult::Output(text) => println!("{}", text),
                    CommandResult::Error(message) => println!("{}", message),
                }
                continue;
            }

            match prepare_statement(line) {
                Ok(statement) => run_statement(&mut table, statement),
                Err(err) => println!("{}", err),
            }
        }
    }
}

fn run_statement(table: &mut Table, statement: Statement) {
    match execute_statement(table, statement) {
        Ok(ExecuteResult::Insert) => println!("Executed."),
        Ok(ExecuteResult::Select { rows }) => {
            for row in &rows {
                println!("{}", row);
            }
            println!("Executed.");
        }
        Err(err) => println!("Error: {}", err),
    }
}

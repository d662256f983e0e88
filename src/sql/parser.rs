//! Statement parsing.
//!
//! The statement language is two keywords with whitespace-separated
//! arguments. Keyword matching is prefix-based, so `select extra words`
//! still scans, and extra tokens after an insert's email are ignored.

use std::error::Error;
use std::fmt;

use crate::config::{EMAIL_MAX, USERNAME_MAX};
use crate::row::Row;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Insert { row: Row },
    Select,
}

/// Reasons a line fails to become a statement, worded exactly as the REPL
/// reports them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrepareError {
    Syntax,
    NegativeId,
    StringTooLong,
    Unrecognized(String),
}

impl fmt::Display for PrepareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrepareError::Syntax => write!(f, "Syntax error. Could not parse statement."),
            PrepareError::NegativeId => write!(f, "ID must be positive."),
            PrepareError::StringTooLong => write!(f, "String is too long."),
            PrepareError::Unrecognized(line) => {
                write!(f, "Unrecognized keyword at start of '{}'.", line)
            }
        }
    }
}

impl Error for PrepareError {}

pub fn prepare_statement(input: &str) -> Result<Statement, PrepareError> {
    if input.starts_with("insert") {
        prepare_insert(input)
    } else if input.starts_with("select") {
        Ok(Statement::Select)
    } else {
        Err(PrepareError::Unrecognized(input.to_string()))
    }
}

fn prepare_insert(input: &str) -> Result<Statement, PrepareError> {
    let mut parts = input.split_whitespace();
    parts.next(); // the "insert" keyword

    let (id, username, email) = match (parts.next(), parts.next(), parts.next()) {
        (Some(id), Some(username), Some(email)) => (id, username, email),
        _ => return Err(PrepareError::Syntax),
    };

    let id: i64 = id.parse().map_err(|_| PrepareError::Syntax)?;
    if id < 0 {
        return Err(PrepareError::NegativeId);
    }
    let id = u32::try_from(id).map_err(|_| PrepareError::Syntax)?;

    if username.len() > USERNAME_MAX || email.len() > EMAIL_MAX {
        return Err(PrepareError::StringTooLong);
    }

    let row = Row::new(id, username, email).map_err(|_| PrepareError::StringTooLong)?;
    Ok(Statement::Insert { row })
}

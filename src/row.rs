//! Fixed-width row codec.
//!
//! A row serializes to exactly [`ROW_SIZE`] bytes: the id as a little-endian
//! u32, then the username and email fields padded with NUL bytes to their
//! capacities. Readers treat the first NUL in a string field as the
//! terminator; bytes past it are preserved on disk but never displayed.

use std::borrow::Cow;
use std::fmt;

use eyre::{ensure, Result};

use crate::config::{
    EMAIL_CAPACITY, EMAIL_MAX, EMAIL_OFFSET, ID_OFFSET, ROW_SIZE, USERNAME_CAPACITY, USERNAME_MAX,
    USERNAME_OFFSET,
};

/// One record of the single user table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    pub id: u32,
    username: [u8; USERNAME_CAPACITY],
    email: [u8; EMAIL_CAPACITY],
}

impl Row {
    /// Builds a row from already-validated field text. The byte lengths must
    /// fit the fixed capacities; the statement parser checks user input
    /// before this is reached.
    pub fn new(id: u32, username: &str, email: &str) -> Result<Self> {
        ensure!(
            username.len() <= USERNAME_MAX,
            "username is {} bytes, limit is {}",
            username.len(),
            USERNAME_MAX
        );
        ensure!(
            email.len() <= EMAIL_MAX,
            "email is {} bytes, limit is {}",
            email.len(),
            EMAIL_MAX
        );

        let mut row = Row {
            id,
            username: [0; USERNAME_CAPACITY],
            email: [0; EMAIL_CAPACITY],
        };
        row.username[..username.len()].copy_from_slice(username.as_bytes());
        row.email[..email.len()].copy_from_slice(email.as_bytes());
        Ok(row)
    }

    pub fn username(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(until_nul(&self.username))
    }

    pub fn email(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(until_nul(&self.email))
    }

    /// Writes the row into the first [`ROW_SIZE`] bytes of `dst`.
    pub fn serialize_into(&self, dst: &mut [u8]) -> Result<()> {
        ensure!(
            dst.len() >= ROW_SIZE,
            "destination too small for row: {} < {}",
            dst.len(),
            ROW_SIZE
        );

        dst[ID_OFFSET..USERNAME_OFFSET].copy_from_slice(&self.id.to_le_bytes());
        dst[USERNAME_OFFSET..EMAIL_OFFSET].copy_from_slice(&self.username);
        dst[EMAIL_OFFSET..ROW_SIZE].copy_from_slice(&self.email);
        Ok(())
    }

    /// Reads a row back from the first [`ROW_SIZE`] bytes of `src`.
    pub fn deserialize(src: &[u8]) -> Result<Self> {
        ensure!(
            src.len() >= ROW_SIZE,
            "source too small for row: {} < {}",
            src.len(),
            ROW_SIZE
        );

        let mut id_bytes = [0u8; size_of::<u32>()];
        id_bytes.copy_from_slice(&src[ID_OFFSET..USERNAME_OFFSET]);

        let mut row = Row {
            id: u32::from_le_bytes(id_bytes),
            username: [0; USERNAME_CAPACITY],
            email: [0; EMAIL_CAPACITY],
        };
        row.username.copy_from_slice(&src[USERNAME_OFFSET..EMAIL_OFFSET]);
        row.email.copy_from_slice(&src[EMAIL_OFFSET..ROW_SIZE]);
        Ok(row)
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.id, self.username(), self.email())
    }
}

fn until_nul(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    &bytes[..end]
}

//! Error taxonomy for the data store.
//!
//! `CorruptStore` is recovered internally when loading (the store falls back
//! to a fresh seeded model); every other variant is surfaced to the user as a
//! rejection of the specific action, with the in-memory model left untouched
//! (or, for `Persist`, left as the authoritative copy for the session).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("corrupt data file: {0}")]
    CorruptStore(String),

    #[error("{0}")]
    Validation(String),

    #[error("{what} index {index} is out of range ({len} present)")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("{0} already exists")]
    Duplicate(String),

    #[error("failed to write data file: {0}")]
    Persist(#[from] std::io::Error),
}

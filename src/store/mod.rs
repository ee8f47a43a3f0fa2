//! The three keyspaces served by the dispatch loop.
//!
//! Each store owns its data outright and is only ever touched through `&mut` access from the
//! single dispatch task, so no operation can observe another one half applied.

pub mod list;
pub mod quicklist;
pub mod skiplist;
pub mod strings;
pub mod zset;

use thiserror::Error as ThisError;

use list::ListStore;
use quicklist::DEFAULT_BLOCK_CAPACITY;
use strings::StringStore;
use zset::ZsetStore;

#[derive(Debug, ThisError, PartialEq)]
pub enum StoreError {
    #[error("no such key")]
    NoSuchKey,
    #[error("no such member")]
    NoSuchMember,
    #[error("value is not an integer or out of range")]
    TypeMismatch,
    #[error("increment or decrement would overflow")]
    Overflow,
    #[error("invalid argument; {0}")]
    InvalidArgument(String),
}

pub struct Store {
    strings: StringStore,
    lists: ListStore,
    zsets: ZsetStore,
}

impl Store {
    pub fn new(list_block_capacity: usize) -> Store {
        Store {
            strings: StringStore::new(),
            lists: ListStore::new(list_block_capacity),
            zsets: ZsetStore::new(),
        }
    }

    pub fn strings(&mut self) -> &mut StringStore {
        &mut self.strings
    }

    pub fn lists(&mut self) -> &mut ListStore {
        &mut self.lists
    }

    pub fn zsets(&mut self) -> &mut ZsetStore {
        &mut self.zsets
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCK_CAPACITY)
    }
}

use bytes::Bytes;
use std::collections::HashMap;

use crate::store::quicklist::QuickList;
use crate::store::StoreError;

/// Index sentinel meaning "the last element".
pub const LAST: i64 = -1;

/// Lists keyed by name. A key exists while its list holds at least one element.
pub struct ListStore {
    lists: HashMap<String, QuickList>,
    block_capacity: usize,
}

impl ListStore {
    pub fn new(block_capacity: usize) -> ListStore {
        ListStore {
            lists: HashMap::new(),
            block_capacity,
        }
    }

    /// Returns the length of the list after the push.
    pub fn lpush(&mut self, key: &str, value: Bytes) -> usize {
        let list = self.list_mut(key);
        list.push_front(value);
        list.len()
    }

    pub fn rpush(&mut self, key: &str, value: Bytes) -> usize {
        let list = self.list_mut(key);
        list.push_back(value);
        list.len()
    }

    pub fn lpop(&mut self, key: &str) -> Result<Bytes, StoreError> {
        self.pop(key, QuickList::pop_front)
    }

    pub fn rpop(&mut self, key: &str) -> Result<Bytes, StoreError> {
        self.pop(key, QuickList::pop_back)
    }

    pub fn llen(&self, key: &str) -> usize {
        self.lists.get(key).map_or(0, QuickList::len)
    }

    /// Elements between `start` and `end`, both inclusive and zero based.
    ///
    /// `-1` stands for the last element in either position; any other negative index is
    /// rejected. An inverted range or a `start` past the end reads nothing, and an `end` past
    /// the end is clamped to the last element.
    pub fn lrange(&self, key: &str, start: i64, end: i64) -> Result<Vec<Bytes>, StoreError> {
        let list = self.lists.get(key);
        let len = list.map_or(0, QuickList::len);

        let (start, end) = match resolve_range(start, end, len)? {
            Some(range) => range,
            None => return Ok(Vec::new()),
        };

        Ok(list.map(|list| list.range(start, end)).unwrap_or_default())
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    fn list_mut(&mut self, key: &str) -> &mut QuickList {
        let capacity = self.block_capacity;
        self.lists
            .entry(key.to_string())
            .or_insert_with(|| QuickList::new(capacity))
    }

    fn pop(
        &mut self,
        key: &str,
        pop: fn(&mut QuickList) -> Option<Bytes>,
    ) -> Result<Bytes, StoreError> {
        let list = self.lists.get_mut(key).ok_or(StoreError::NoSuchKey)?;
        let value = pop(list).ok_or(StoreError::NoSuchKey)?;
        if list.is_empty() {
            self.lists.remove(key);
        }
        Ok(value)
    }
}

/// Turns client indices into an inclusive `usize` range over a sequence of `len` items.
///
/// Shared by every by-position read so lists and sorted sets clamp identically.
pub fn resolve_range(
    start: i64,
    end: i64,
    len: usize,
) -> Result<Option<(usize, usize)>, StoreError> {
    if start < LAST || end < LAST {
        return Err(StoreError::InvalidArgument(
            "range indices must be positive or -1".to_string(),
        ));
    }
    if len == 0 {
        return Ok(None);
    }

    let last = len - 1;
    let resolve = |index: i64| match index {
        LAST => last,
        index => usize::try_from(index).unwrap_or(usize::MAX),
    };
    let (start, end) = (resolve(start), resolve(end).min(last));

    if start > end {
        return Ok(None);
    }
    Ok(Some((start, end)))
}

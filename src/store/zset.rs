use std::collections::HashMap;

use crate::store::list::resolve_range;
use crate::store::skiplist::{NodeId, SkipList};
use crate::store::StoreError;

/// A sorted set: direct member lookup paired with the score-ordered skip list.
///
/// `members` and the bottom level of `list` always hold exactly the same members.
pub struct Zset {
    members: HashMap<String, NodeId>,
    list: SkipList,
}

impl Zset {
    pub fn new() -> Zset {
        Zset::with_list(SkipList::new())
    }

    pub fn with_list(list: SkipList) -> Zset {
        Zset {
            members: HashMap::new(),
            list,
        }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Adds `member` or moves it to `score`. Returns whether the member is new.
    ///
    /// An update unlinks the node and links a fresh one, so no ordering is ever patched in
    /// place.
    pub fn insert(&mut self, member: String, score: f64) -> bool {
        let is_new = match self.members.get(&member) {
            Some(&id) if self.list.score(id) == score => return false,
            Some(&id) => {
                let old = self.list.score(id);
                self.list.remove(&member, old);
                false
            }
            None => true,
        };

        let id = self.list.insert(member.clone(), score);
        self.members.insert(member, id);
        is_new
    }

    pub fn score(&self, member: &str) -> Option<f64> {
        self.members.get(member).map(|&id| self.list.score(id))
    }

    /// 1-based position in ascending `(score, member)` order.
    pub fn rank(&self, member: &str) -> Option<usize> {
        let score = self.score(member)?;
        self.list.rank(member, score)
    }

    pub fn remove(&mut self, member: &str) -> bool {
        let id = match self.members.remove(member) {
            Some(id) => id,
            None => return false,
        };
        let score = self.list.score(id);
        self.list.remove(member, score).is_some()
    }

    /// Members at zero-based ranks `start..=end`, ascending.
    pub fn range(&self, start: usize, end: usize) -> Vec<(&str, f64)> {
        if start > end || start >= self.len() {
            return Vec::new();
        }
        let first = self.list.by_rank(start + 1);
        self.list.iter_from(first).take(end - start + 1).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.list.iter()
    }
}

impl Default for Zset {
    fn default() -> Self {
        Self::new()
    }
}

/// Sorted sets keyed by name. A key exists while its set has at least one member.
#[derive(Default)]
pub struct ZsetStore {
    sets: HashMap<String, Zset>,
}

impl ZsetStore {
    pub fn new() -> ZsetStore {
        ZsetStore::default()
    }

    /// Returns whether `member` was added rather than moved.
    pub fn insert(&mut self, key: &str, member: String, score: f64) -> Result<bool, StoreError> {
        if score.is_nan() {
            return Err(StoreError::InvalidArgument("score is not a number".to_string()));
        }

        Ok(self
            .sets
            .entry(key.to_string())
            .or_default()
            .insert(member, score))
    }

    pub fn score(&self, key: &str, member: &str) -> Result<f64, StoreError> {
        self.set(key)?.score(member).ok_or(StoreError::NoSuchMember)
    }

    pub fn rank(&self, key: &str, member: &str) -> Result<usize, StoreError> {
        self.set(key)?.rank(member).ok_or(StoreError::NoSuchMember)
    }

    pub fn remove(&mut self, key: &str, member: &str) -> Result<(), StoreError> {
        let set = self.sets.get_mut(key).ok_or(StoreError::NoSuchKey)?;
        if !set.remove(member) {
            return Err(StoreError::NoSuchMember);
        }
        if set.is_empty() {
            self.sets.remove(key);
        }
        Ok(())
    }

    pub fn card(&self, key: &str) -> usize {
        self.sets.get(key).map_or(0, Zset::len)
    }

    /// Members by rank, with the same index rules as `ListStore::lrange`.
    pub fn range(&self, key: &str, start: i64, end: i64) -> Result<Vec<String>, StoreError> {
        let set = self.sets.get(key);
        let len = set.map_or(0, Zset::len);

        let (start, end) = match resolve_range(start, end, len)? {
            Some(range) => range,
            None => return Ok(Vec::new()),
        };

        Ok(set
            .map(|set| {
                set.range(start, end)
                    .into_iter()
                    .map(|(member, _)| member.to_string())
                    .collect()
            })
            .unwrap_or_default())
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    fn set(&self, key: &str) -> Result<&Zset, StoreError> {
        self.sets.get(key).ok_or(StoreError::NoSuchKey)
    }
}

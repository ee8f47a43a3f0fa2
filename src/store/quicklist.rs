use bytes::Bytes;
use std::collections::VecDeque;

pub const DEFAULT_BLOCK_CAPACITY: usize = 128;

type BlockId = usize;

struct Block {
    items: VecDeque<Bytes>,
    prev: Option<BlockId>,
    next: Option<BlockId>,
}

/// A doubly linked sequence of bounded blocks.
///
/// Blocks live in an arena and link to each other by index. Only the head and tail block may
/// hold fewer than `capacity` elements: a push goes into the end block while it has room and
/// otherwise links a fresh block holding just the new element, so a block only ever becomes
/// interior once it is full. Pops only shrink the end blocks and unlink them once empty, which
/// keeps that property. Range reads can therefore skip whole blocks by their length.
pub struct QuickList {
    blocks: Vec<Block>,
    free: Vec<BlockId>,
    head: Option<BlockId>,
    tail: Option<BlockId>,
    len: usize,
    capacity: usize,
}

impl QuickList {
    pub fn new(capacity: usize) -> QuickList {
        QuickList {
            blocks: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push_front(&mut self, value: Bytes) {
        match self.head {
            Some(head) if self.blocks[head].items.len() < self.capacity => {
                self.blocks[head].items.push_front(value);
            }
            head => {
                let block = self.alloc(value, None, head);
                match head {
                    Some(old) => self.blocks[old].prev = Some(block),
                    None => self.tail = Some(block),
                }
                self.head = Some(block);
            }
        }
        self.len += 1;
    }

    pub fn push_back(&mut self, value: Bytes) {
        match self.tail {
            Some(tail) if self.blocks[tail].items.len() < self.capacity => {
                self.blocks[tail].items.push_back(value);
            }
            tail => {
                let block = self.alloc(value, tail, None);
                match tail {
                    Some(old) => self.blocks[old].next = Some(block),
                    None => self.head = Some(block),
                }
                self.tail = Some(block);
            }
        }
        self.len += 1;
    }

    pub fn pop_front(&mut self) -> Option<Bytes> {
        let head = self.head?;
        let value = self.blocks[head].items.pop_front()?;
        self.len -= 1;

        if self.blocks[head].items.is_empty() {
            let next = self.blocks[head].next;
            match next {
                Some(next) => self.blocks[next].prev = None,
                None => self.tail = None,
            }
            self.head = next;
            self.release(head);
        }

        Some(value)
    }

    pub fn pop_back(&mut self) -> Option<Bytes> {
        let tail = self.tail?;
        let value = self.blocks[tail].items.pop_back()?;
        self.len -= 1;

        if self.blocks[tail].items.is_empty() {
            let prev = self.blocks[tail].prev;
            match prev {
                Some(prev) => self.blocks[prev].next = None,
                None => self.head = None,
            }
            self.tail = prev;
            self.release(tail);
        }

        Some(value)
    }

    /// Elements at logical positions `start..=end`, both already within `0..len`.
    ///
    /// Blocks that end before `start` are skipped by length; the walk stops at the block
    /// holding `end`.
    pub fn range(&self, start: usize, end: usize) -> Vec<Bytes> {
        if start > end || start >= self.len {
            return Vec::new();
        }
        let end = end.min(self.len - 1);

        let mut res = Vec::with_capacity(end - start + 1);
        let mut offset = 0;
        let mut cursor = self.head;

        while let Some(id) = cursor {
            let block = &self.blocks[id];
            let block_len = block.items.len();

            if offset + block_len > start {
                let lo = start.saturating_sub(offset);
                let hi = (end - offset).min(block_len - 1);
                res.extend(block.items.range(lo..=hi).cloned());

                if end < offset + block_len {
                    break;
                }
            }

            offset += block_len;
            cursor = block.next;
        }

        res
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bytes> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let id = cursor?;
            cursor = self.blocks[id].next;
            Some(self.blocks[id].items.iter())
        })
        .flatten()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len() - self.free.len()
    }

    fn alloc(&mut self, value: Bytes, prev: Option<BlockId>, next: Option<BlockId>) -> BlockId {
        let mut items = VecDeque::with_capacity(self.capacity);
        items.push_back(value);
        let block = Block { items, prev, next };

        match self.free.pop() {
            Some(id) => {
                self.blocks[id] = block;
                id
            }
            None => {
                self.blocks.push(block);
                self.blocks.len() - 1
            }
        }
    }

    fn release(&mut self, id: BlockId) {
        let block = &mut self.blocks[id];
        block.items = VecDeque::new();
        block.prev = None;
        block.next = None;
        self.free.push(id);
    }
}

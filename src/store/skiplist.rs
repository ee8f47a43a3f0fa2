//! Score-ordered skip list whose nodes live in an index-addressed arena.
//!
//! Every forward link records its span, the number of level-0 steps it jumps over, so rank
//! lookups add spans instead of walking level 0.
//!
//! ```text
//! level 2:  H ----------------------> c
//! level 1:  H ---------> b ---------> c
//! level 0:  H ---> a --> b --> x ---> c
//! ```
//!
//! Nodes are ordered by `(score, member)`, which makes ranks deterministic when scores tie.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const MAX_LEVEL: usize = 32;

/// Arena slot of a node. Slot 0 is the head sentinel.
pub type NodeId = usize;

const HEAD: NodeId = 0;

#[derive(Debug, Clone, Copy, Default)]
struct Link {
    next: Option<NodeId>,
    span: usize,
}

#[derive(Debug)]
struct Node {
    member: String,
    score: f64,
    forward: Vec<Link>,
}

impl Node {
    /// Whether this node sorts strictly before `(score, member)`.
    fn precedes(&self, score: f64, member: &str) -> bool {
        self.score < score || (self.score == score && self.member.as_str() < member)
    }
}

pub struct SkipList {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    level: usize,
    len: usize,
    rng: StdRng,
}

impl SkipList {
    pub fn new() -> SkipList {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> SkipList {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> SkipList {
        let head = Node {
            member: String::new(),
            score: f64::NEG_INFINITY,
            forward: vec![Link::default(); MAX_LEVEL],
        };

        SkipList {
            nodes: vec![head],
            free: Vec::new(),
            level: 1,
            len: 0,
            rng,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn score(&self, id: NodeId) -> f64 {
        self.nodes[id].score
    }

    pub fn member(&self, id: NodeId) -> &str {
        &self.nodes[id].member
    }

    /// Links a new node. The caller guarantees `member` is not already in the list.
    pub fn insert(&mut self, member: String, score: f64) -> NodeId {
        let mut update = [HEAD; MAX_LEVEL];
        let mut rank = [0usize; MAX_LEVEL];

        let mut x = HEAD;
        for i in (0..self.level).rev() {
            rank[i] = if i + 1 == self.level { 0 } else { rank[i + 1] };
            while let Some(next) = self.nodes[x].forward[i].next {
                if !self.nodes[next].precedes(score, &member) {
                    break;
                }
                rank[i] += self.nodes[x].forward[i].span;
                x = next;
            }
            update[i] = x;
        }

        let level = self.random_level();
        if level > self.level {
            for i in self.level..level {
                rank[i] = 0;
                update[i] = HEAD;
                self.nodes[HEAD].forward[i].span = self.len;
            }
            self.level = level;
        }

        let id = self.alloc(Node {
            member,
            score,
            forward: vec![Link::default(); level],
        });

        for i in 0..level {
            let pred = update[i];
            let pred_link = self.nodes[pred].forward[i];
            let offset = rank[0] - rank[i];

            self.nodes[id].forward[i] = Link {
                next: pred_link.next,
                span: pred_link.span - offset,
            };
            self.nodes[pred].forward[i] = Link {
                next: Some(id),
                span: offset + 1,
            };
        }

        // Levels above the new node now jump over one more element.
        for i in level..self.level {
            self.nodes[update[i]].forward[i].span += 1;
        }

        self.len += 1;
        id
    }

    /// Unlinks the node holding `(score, member)`. Returns its slot, already released.
    pub fn remove(&mut self, member: &str, score: f64) -> Option<NodeId> {
        let mut update = [HEAD; MAX_LEVEL];

        let mut x = HEAD;
        for i in (0..self.level).rev() {
            while let Some(next) = self.nodes[x].forward[i].next {
                if !self.nodes[next].precedes(score, member) {
                    break;
                }
                x = next;
            }
            update[i] = x;
        }

        let target = self.nodes[x].forward[0].next?;
        if self.nodes[target].score != score || self.nodes[target].member != member {
            return None;
        }

        for i in 0..self.level {
            let pred = update[i];
            if self.nodes[pred].forward[i].next == Some(target) {
                let bypass = self.nodes[target].forward[i];
                let link = &mut self.nodes[pred].forward[i];
                link.span = link.span + bypass.span - 1;
                link.next = bypass.next;
            } else {
                self.nodes[pred].forward[i].span -= 1;
            }
        }

        while self.level > 1 && self.nodes[HEAD].forward[self.level - 1].next.is_none() {
            self.level -= 1;
        }

        self.len -= 1;
        self.release(target);
        Some(target)
    }

    /// 1-based rank of `(score, member)`, or `None` if no such node is linked.
    pub fn rank(&self, member: &str, score: f64) -> Option<usize> {
        let mut rank = 0;
        let mut x = HEAD;

        for i in (0..self.level).rev() {
            while let Some(next) = self.nodes[x].forward[i].next {
                let node = &self.nodes[next];
                let at_or_before = node.precedes(score, member)
                    || (node.score == score && node.member == member);
                if !at_or_before {
                    break;
                }
                rank += self.nodes[x].forward[i].span;
                x = next;
            }

            if x != HEAD && self.nodes[x].member == member {
                return Some(rank);
            }
        }

        None
    }

    /// The node at 1-based `rank`.
    pub fn by_rank(&self, rank: usize) -> Option<NodeId> {
        if rank == 0 || rank > self.len {
            return None;
        }

        let mut traversed = 0;
        let mut x = HEAD;

        for i in (0..self.level).rev() {
            while let Some(next) = self.nodes[x].forward[i].next {
                let span = self.nodes[x].forward[i].span;
                if traversed + span > rank {
                    break;
                }
                traversed += span;
                x = next;
            }

            if traversed == rank {
                return Some(x);
            }
        }

        None
    }

    /// Level-0 walk starting at `from`.
    pub fn iter_from(&self, from: Option<NodeId>) -> impl Iterator<Item = (&str, f64)> + '_ {
        let mut cursor = from;
        std::iter::from_fn(move || {
            let id = cursor?;
            let node = &self.nodes[id];
            cursor = node.forward[0].next;
            Some((node.member.as_str(), node.score))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.iter_from(self.nodes[HEAD].forward[0].next)
    }

    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < MAX_LEVEL && self.rng.gen_bool(0.5) {
            level += 1;
        }
        level
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = node;
                id
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        let node = &mut self.nodes[id];
        node.member = String::new();
        node.forward = Vec::new();
        self.free.push(id);
    }
}

impl Default for SkipList {
    fn default() -> Self {
        Self::new()
    }
}

//! Prefix trie over geohash strings.
//!
//! Each node owns its children outright; there are no parent pointers.
//! Deletion walks down recursively and reports upward, by return value,
//! whether the child it just visited became a dead end, so the trie only
//! ever holds nodes for prefixes of geohashes that are still stored.
//!
//! The trie does not validate its input against the geohash alphabet; that
//! is the job of the [`SpatialIndex`](crate::SpatialIndex) above it.

use crate::compute::geohash::common_prefix;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: FxHashMap<char, TrieNode>,
    /// A complete stored geohash ends at this node
    is_end: bool,
}

impl TrieNode {
    fn count(&self) -> usize {
        1 + self.children.values().map(TrieNode::count).sum::<usize>()
    }

    /// Pushes every stored geohash at or below this node.
    fn collect_all(&self, path: &mut String, out: &mut Vec<String>) {
        if self.is_end {
            out.push(path.clone());
        }
        for (c, child) in &self.children {
            path.push(*c);
            child.collect_all(path, out);
            path.pop();
        }
    }
}

/// Outcome of a recursive removal, reported to the parent.
enum Removal {
    Absent,
    Removed { prune: bool },
}

fn remove(node: &mut TrieNode, rest: &str) -> Removal {
    let mut chars = rest.chars();
    let Some(c) = chars.next() else {
        if !node.is_end {
            return Removal::Absent;
        }
        node.is_end = false;
        return Removal::Removed {
            prune: node.children.is_empty(),
        };
    };

    let Some(child) = node.children.get_mut(&c) else {
        return Removal::Absent;
    };

    match remove(child, chars.as_str()) {
        Removal::Absent => Removal::Absent,
        Removal::Removed { prune } => {
            if prune {
                node.children.remove(&c);
            }
            Removal::Removed {
                prune: node.children.is_empty() && !node.is_end,
            }
        }
    }
}

/// A set of geohash strings stored as a character trie.
#[derive(Debug, Clone, Default)]
pub struct GeohashTrie {
    root: TrieNode,
    len: usize,
}

impl GeohashTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `geohash`. Returns `false` if it was already present, in which
    /// case the trie is unchanged.
    pub fn insert(&mut self, geohash: &str) -> bool {
        let mut node = &mut self.root;
        for c in geohash.chars() {
            node = node.children.entry(c).or_default();
        }

        if node.is_end {
            return false;
        }
        node.is_end = true;
        self.len += 1;
        true
    }

    /// Exact membership. A prefix of stored geohashes is not a match.
    pub fn search(&self, geohash: &str) -> bool {
        self.find(geohash).is_some_and(|node| node.is_end)
    }

    /// Removes `geohash` and prunes ancestors left without children or an
    /// end marker. Returns `false` if it was never stored.
    pub fn delete(&mut self, geohash: &str) -> bool {
        match remove(&mut self.root, geohash) {
            Removal::Absent => false,
            Removal::Removed { .. } => {
                self.len -= 1;
                true
            }
        }
    }

    /// Candidate geohashes for the box spanned by two corner geohashes.
    ///
    /// Takes the longest common prefix of the corners and returns every
    /// stored geohash that is prefix-compatible with it in either direction:
    /// stored values that are a prefix of the common prefix, and stored values
    /// that start with it.
    ///
    /// This is a coarse filter. The result is a superset of the geohashes
    /// whose points lie inside the box and is never a final answer; callers
    /// must re-check each candidate against exact coordinates or distance.
    /// Order is unspecified.
    pub fn collect_by_prefix_range(&self, southwest: &str, northeast: &str) -> Vec<String> {
        let prefix = common_prefix(southwest, northeast);
        let mut out = Vec::new();
        let mut path = String::with_capacity(prefix.len());
        let mut node = &self.root;

        for c in prefix.chars() {
            if node.is_end {
                out.push(path.clone());
            }
            match node.children.get(&c) {
                Some(child) => {
                    path.push(c);
                    node = child;
                }
                None => return out,
            }
        }

        node.collect_all(&mut path, &mut out);
        out
    }

    /// Every stored geohash starting with `prefix`, in unspecified order.
    pub fn collect_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(node) = self.find(prefix) {
            let mut path = prefix.to_string();
            node.collect_all(&mut path, &mut out);
        }
        out
    }

    /// Every stored geohash, in unspecified order.
    pub fn geohashes(&self) -> Vec<String> {
        self.collect_with_prefix("")
    }

    /// Number of stored geohashes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes, root included. An empty trie has one node.
    pub fn node_count(&self) -> usize {
        self.root.count()
    }

    pub fn clear(&mut self) {
        self.root = TrieNode::default();
        self.len = 0;
    }

    fn find(&self, prefix: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        for c in prefix.chars() {
            node = node.children.get(&c)?;
        }
        Some(node)
    }
}

impl<S: AsRef<str>> FromIterator<S> for GeohashTrie {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut trie = GeohashTrie::new();
        for geohash in iter {
            trie.insert(geohash.as_ref());
        }
        trie
    }
}

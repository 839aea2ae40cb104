//! Graph model shared by the extractor, the sources and the sink.
//!
//! Two containers make up an extraction result:
//! - `UserRegistry`: node identifier -> display label (last write wins).
//! - `EdgeSet`: node identifier -> set of identifiers it points to.
//!
//! Both only ever grow. `EdgeSet` exposes insertion and union-merge but no
//! removal, so a traversal can never shrink what earlier hops collected.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

pub mod depth;

pub use depth::Depth;

/// Opaque account identifier from the source network.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier -> label mapping accumulated over a traversal.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct UserRegistry {
    labels: BTreeMap<NodeId, String>,
}

impl UserRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a label for `id`, replacing any previous one.
    pub fn insert(&mut self, id: NodeId, label: impl Into<String>) -> Option<String> {
        self.labels.insert(id, label.into())
    }

    /// Copy every entry of `other` into `self` (last write wins).
    pub fn merge(&mut self, other: &UserRegistry) {
        for (id, label) in &other.labels {
            self.labels.insert(id.clone(), label.clone());
        }
    }

    #[must_use]
    pub fn get(&self, id: &NodeId) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.labels.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
        self.labels.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &str)> {
        self.labels.iter().map(|(id, label)| (id, label.as_str()))
    }
}

impl<I: Into<NodeId>, L: Into<String>> FromIterator<(I, L)> for UserRegistry {
    fn from_iter<T: IntoIterator<Item = (I, L)>>(iter: T) -> Self {
        let mut reg = Self::new();
        for (id, label) in iter {
            reg.insert(id.into(), label);
        }
        reg
    }
}

/// Directed edge set: follower -> followees.
///
/// Direction is whatever the fetcher decides; the extractor never inspects it.
/// Keys are only created together with at least one target.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct EdgeSet {
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
}

impl EdgeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `from -> to`. Returns false when the edge was already present.
    pub fn insert(&mut self, from: NodeId, to: NodeId) -> bool {
        self.adjacency.entry(from).or_default().insert(to)
    }

    /// Union-merge: `self[k] := self[k] ∪ other[k]` for every key of `other`.
    ///
    /// Idempotent, commutative and associative, so fragments may be merged
    /// repeatedly and in any order.
    pub fn merge(&mut self, other: &EdgeSet) {
        for (from, targets) in &other.adjacency {
            if targets.is_empty() {
                continue;
            }
            self.adjacency.entry(from.clone()).or_default().extend(targets.iter().cloned());
        }
    }

    /// Targets of `from`, if it has any outgoing edge.
    #[must_use]
    pub fn lookup(&self, from: &NodeId) -> Option<&BTreeSet<NodeId>> {
        self.adjacency.get(from)
    }

    #[must_use]
    pub fn contains(&self, from: &NodeId, to: &NodeId) -> bool {
        self.adjacency.get(from).is_some_and(|t| t.contains(to))
    }

    /// Number of distinct `(from, to)` pairs.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjacency.values().all(BTreeSet::is_empty)
    }

    /// Iterate adjacency lists in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &BTreeSet<NodeId>)> {
        self.adjacency.iter()
    }

    /// Iterate every `(from, to)` pair.
    pub fn edges(&self) -> impl Iterator<Item = (&NodeId, &NodeId)> {
        self.adjacency.iter().flat_map(|(from, targets)| targets.iter().map(move |to| (from, to)))
    }

    /// Every identifier referenced as a source or a target.
    #[must_use]
    pub fn referenced_ids(&self) -> BTreeSet<&NodeId> {
        let mut out = BTreeSet::new();
        for (from, to) in self.edges() {
            out.insert(from);
            out.insert(to);
        }
        out
    }
}

impl<A: Into<NodeId>, B: Into<NodeId>> FromIterator<(A, B)> for EdgeSet {
    fn from_iter<T: IntoIterator<Item = (A, B)>>(iter: T) -> Self {
        let mut set = Self::new();
        for (from, to) in iter {
            set.insert(from.into(), to.into());
        }
        set
    }
}

/// What one fetch discovered around a single node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Neighborhood {
    pub users: UserRegistry,
    pub edges: EdgeSet,
}

impl Neighborhood {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `node` follows `neighbor`; records the neighbor's label.
    pub fn follows(&mut self, node: &NodeId, neighbor: NodeId, label: impl Into<String>) {
        self.users.insert(neighbor.clone(), label);
        self.edges.insert(node.clone(), neighbor);
    }

    /// `neighbor` follows `node`; records the neighbor's label.
    pub fn followed_by(&mut self, node: &NodeId, neighbor: NodeId, label: impl Into<String>) {
        self.users.insert(neighbor.clone(), label);
        self.edges.insert(neighbor, node.clone());
    }

    /// Fold another fragment into this one.
    pub fn absorb(&mut self, other: &Neighborhood) {
        self.users.merge(&other.users);
        self.edges.merge(&other.edges);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    #[test]
    fn merge_is_union() {
        let mut a: EdgeSet = [("1", "2"), ("1", "3")].into_iter().collect();
        let b: EdgeSet = [("1", "3"), ("4", "1")].into_iter().collect();
        a.merge(&b);
        assert_eq!(a.edge_count(), 3);
        assert!(a.contains(&id("1"), &id("2")));
        assert!(a.contains(&id("4"), &id("1")));
    }

    #[test]
    fn merge_skips_empty_target_sets() {
        let other: EdgeSet = serde_json::from_str(r#"{"9": []}"#).unwrap();
        let mut set = EdgeSet::new();
        set.merge(&other);
        assert!(set.lookup(&id("9")).is_none());
        assert!(set.is_empty());
    }

    #[test]
    fn registry_last_write_wins() {
        let mut reg = UserRegistry::new();
        reg.insert(id("1"), "old");
        let newer: UserRegistry = [("1", "new"), ("2", "two")].into_iter().collect();
        reg.merge(&newer);
        assert_eq!(reg.get(&id("1")), Some("new"));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn neighborhood_records_labels_with_edges() {
        let me = id("1");
        let mut n = Neighborhood::new();
        n.follows(&me, id("10"), "user10");
        n.followed_by(&me, id("12"), "user12");
        assert_eq!(n.users.get(&id("10")), Some("user10"));
        assert!(n.edges.contains(&me, &id("10")));
        assert!(n.edges.contains(&id("12"), &me));
        assert_eq!(n.edges.referenced_ids().len(), 3);
    }

    #[test]
    fn edge_set_serializes_as_adjacency_map() {
        let set: EdgeSet = [("a", "b"), ("a", "c")].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"a":["b","c"]}"#);
    }
}

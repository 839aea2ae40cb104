//! Offline neighborhood source backed by an exported user/edge file pair.
//!
//! Plays the role of a network adapter: for one account it reports whom the
//! account follows and who follows it, capped per direction, with labels for
//! every neighbor.
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::errors::{FetchError, SinkError};
use crate::extract::Fetcher;
use crate::graph::{EdgeSet, Neighborhood, NodeId, UserRegistry};
use crate::sink;

pub const DEFAULT_MAX_FOLLOW: usize = 100;

#[derive(Debug, Clone)]
pub struct TsvSource {
    users: UserRegistry,
    following: EdgeSet,
    followers: EdgeSet,
    max_follow: usize,
}

impl TsvSource {
    /// Build a source from an in-memory dataset.
    #[must_use]
    pub fn new(users: UserRegistry, following: EdgeSet) -> Self {
        let followers: EdgeSet = following.edges().map(|(from, to)| (to.clone(), from.clone())).collect();
        Self { users, following, followers, max_follow: DEFAULT_MAX_FOLLOW }
    }

    /// Load `users` (`id\tlabel`) and `edges` (`follower\tfollowee`) files.
    ///
    /// # Errors
    /// `SinkError` if either file cannot be read or contains a malformed line.
    pub fn open(users: &Path, edges: &Path) -> Result<Self, SinkError> {
        let users = sink::read_users(BufReader::new(File::open(users)?))?;
        let edges = sink::read_edges(BufReader::new(File::open(edges)?))?;
        tracing::debug!(users = users.len(), edges = edges.edge_count(), "loaded offline dataset");
        Ok(Self::new(users, edges))
    }

    /// Cap on followees and on followers reported per node.
    #[must_use]
    pub fn with_max_follow(mut self, max_follow: usize) -> Self {
        self.max_follow = max_follow;
        self
    }

    #[must_use]
    pub fn label_of(&self, id: &NodeId) -> Option<&str> {
        self.users.get(id)
    }

    /// Find the identifier carrying `label`. The lowest identifier wins on duplicates.
    #[must_use]
    pub fn lookup_id(&self, label: &str) -> Option<&NodeId> {
        self.users.iter().find(|(_, l)| *l == label).map(|(id, _)| id)
    }

    fn is_known(&self, id: &NodeId) -> bool {
        self.users.contains(id) || self.following.lookup(id).is_some() || self.followers.lookup(id).is_some()
    }

    fn label_or_id(&self, id: &NodeId) -> String {
        self.users.get(id).map_or_else(|| id.to_string(), str::to_string)
    }

    fn capped<'a>(&self, set: Option<&'a BTreeSet<NodeId>>) -> impl Iterator<Item = &'a NodeId> {
        set.into_iter().flatten().take(self.max_follow)
    }
}

impl Fetcher for TsvSource {
    fn fetch(&self, node: &NodeId, _label: &str) -> Result<Neighborhood, FetchError> {
        if !self.is_known(node) {
            return Err(FetchError::Unavailable {
                node: node.clone(),
                reason: "no such account in dataset".to_string(),
            });
        }
        let mut out = Neighborhood::new();
        for followee in self.capped(self.following.lookup(node)) {
            out.follows(node, followee.clone(), self.label_or_id(followee));
        }
        for follower in self.capped(self.followers.lookup(node)) {
            out.followed_by(node, follower.clone(), self.label_or_id(follower));
        }
        Ok(out)
    }
}

//! Breadth-first, depth-bounded subgraph extraction.
//!
//! Starting from a set of seed nodes, every hop asks a `Fetcher` for the
//! neighborhood of each frontier node, merges the fragments, and decides which
//! edges and nodes survive according to the requested `Depth`:
//!
//! - Intermediate hops keep every edge and every discovered node.
//! - The final hop of a whole depth (e.g. `2`) keeps the new nodes, all edges of
//!   previously known followers, and only those edges of new followers that
//!   point back into previously known nodes.
//! - The final hop of a half depth (e.g. `2.5`) adds no nodes; it only keeps
//!   edges whose both ends are already known (lateral edges).
//!
//! A failing fetch is reported and skipped. Cancellation discards the hop in
//! progress and returns what the completed hops produced.
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::errors::{ExtractError, FetchError};
use crate::graph::{Depth, EdgeSet, Neighborhood, NodeId, UserRegistry};

pub mod cancel;
pub mod observer;

pub use cancel::CancellationToken;
pub use observer::{NoopObserver, Observer, TracingObserver};

/// Source of neighborhoods, one node at a time.
///
/// Implementations must tolerate being called for different nodes in any
/// order. An error means "could not tell", which is distinct from an empty
/// `Neighborhood` ("no neighbors").
pub trait Fetcher {
    /// Fetch the neighborhood of `node`.
    ///
    /// # Errors
    /// Any `FetchError`; the extractor records it and moves on.
    fn fetch(&self, node: &NodeId, label: &str) -> Result<Neighborhood, FetchError>;
}

impl<F> Fetcher for F
where
    F: Fn(&NodeId, &str) -> Result<Neighborhood, FetchError>,
{
    fn fetch(&self, node: &NodeId, label: &str) -> Result<Neighborhood, FetchError> {
        self(node, label)
    }
}

/// A node whose fetch failed during a hop.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FetchFailure {
    pub hop: u32,
    pub node: NodeId,
    pub label: String,
    pub error: String,
}

/// Per-hop progress numbers handed to the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HopStats {
    pub hop: u32,
    pub fetched: usize,
    pub failed: usize,
    pub new_nodes: usize,
    pub users: usize,
    pub edges: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Complete { hops: u32 },
    Cancelled { completed_hops: u32 },
}

/// Result of a traversal, complete or cut short.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub users: UserRegistry,
    pub edges: EdgeSet,
    pub outcome: Outcome,
    /// Failures from completed hops only.
    pub failures: Vec<FetchFailure>,
}

impl Extraction {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self.outcome, Outcome::Cancelled { .. })
    }

    #[must_use]
    pub fn completed_hops(&self) -> u32 {
        match self.outcome {
            Outcome::Complete { hops } => hops,
            Outcome::Cancelled { completed_hops } => completed_hops,
        }
    }
}

/// Extract with default settings: sequential fetches, no observer, no cancellation.
///
/// # Errors
/// `ExtractError` when `max_depth` is invalid or `seeds` is empty. Nothing is
/// fetched in that case.
pub fn extract<F: Fetcher + ?Sized>(
    fetcher: &F,
    seeds: UserRegistry,
    max_depth: f64,
) -> Result<Extraction, ExtractError> {
    let depth = Depth::new(max_depth)?;
    Extractor::new(depth).run(fetcher, seeds)
}

/// Configurable traversal driver.
pub struct Extractor<'o> {
    depth: Depth,
    cancel: CancellationToken,
    observer: &'o dyn Observer,
}

impl Extractor<'static> {
    #[must_use]
    pub fn new(depth: Depth) -> Self {
        Self { depth, cancel: CancellationToken::new(), observer: &NoopObserver }
    }
}

impl<'o> Extractor<'o> {
    #[must_use]
    pub fn with_observer<'a>(self, observer: &'a dyn Observer) -> Extractor<'a> {
        Extractor { depth: self.depth, cancel: self.cancel, observer }
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Traverse, fetching one frontier node at a time.
    ///
    /// # Errors
    /// `ExtractError::EmptySeeds` when `seeds` is empty.
    pub fn run<F: Fetcher + ?Sized>(
        &self,
        fetcher: &F,
        seeds: UserRegistry,
    ) -> Result<Extraction, ExtractError> {
        self.traverse(seeds, |hop, frontier| self.fetch_sequential(fetcher, hop, frontier))
    }

    /// Traverse, fetching each hop's frontier on the rayon pool.
    ///
    /// Results are merged in frontier order, so the output matches `run`.
    ///
    /// # Errors
    /// `ExtractError::EmptySeeds` when `seeds` is empty.
    pub fn run_parallel<F: Fetcher + Sync + ?Sized>(
        &self,
        fetcher: &F,
        seeds: UserRegistry,
    ) -> Result<Extraction, ExtractError> {
        self.traverse(seeds, |hop, frontier| self.fetch_parallel(fetcher, hop, frontier))
    }

    fn traverse<G>(&self, seeds: UserRegistry, mut fetch_hop: G) -> Result<Extraction, ExtractError>
    where
        G: FnMut(u32, &UserRegistry) -> Option<HopResults>,
    {
        if seeds.is_empty() {
            return Err(ExtractError::EmptySeeds);
        }
        let total_hops = self.depth.hops();
        let mut state = Traversal::new(seeds, self.depth);

        for hop in 1..=total_hops {
            if self.cancel.is_cancelled() {
                return Ok(self.cut_short(state, hop - 1));
            }
            self.observer.hop_started(hop, total_hops, state.frontier.len());
            let Some(results) = fetch_hop(hop, &state.frontier) else {
                return Ok(self.cut_short(state, hop - 1));
            };
            let stats = state.apply(hop, results);
            self.observer.hop_finished(&stats);
        }

        Ok(state.finish(Outcome::Complete { hops: total_hops }))
    }

    fn cut_short(&self, state: Traversal, completed_hops: u32) -> Extraction {
        self.observer.cancelled(completed_hops);
        state.finish(Outcome::Cancelled { completed_hops })
    }

    fn fetch_one<F: Fetcher + ?Sized>(
        &self,
        fetcher: &F,
        hop: u32,
        node: &NodeId,
        label: &str,
    ) -> Result<Neighborhood, FetchFailure> {
        self.observer.fetching(hop, node, label);
        fetcher.fetch(node, label).map_err(|e| {
            let failure = FetchFailure {
                hop,
                node: node.clone(),
                label: label.to_string(),
                error: e.to_string(),
            };
            self.observer.fetch_failed(&failure);
            failure
        })
    }

    fn fetch_sequential<F: Fetcher + ?Sized>(
        &self,
        fetcher: &F,
        hop: u32,
        frontier: &UserRegistry,
    ) -> Option<HopResults> {
        let mut results = HopResults::default();
        for (node, label) in frontier.iter() {
            if self.cancel.is_cancelled() {
                return None;
            }
            results.record(self.fetch_one(fetcher, hop, node, label));
        }
        // A hop that was cancelled while its last fetch ran is discarded too.
        (!self.cancel.is_cancelled()).then_some(results)
    }

    fn fetch_parallel<F: Fetcher + Sync + ?Sized>(
        &self,
        fetcher: &F,
        hop: u32,
        frontier: &UserRegistry,
    ) -> Option<HopResults> {
        let nodes: Vec<(&NodeId, &str)> = frontier.iter().collect();
        let outcomes: Vec<Option<Result<Neighborhood, FetchFailure>>> = nodes
            .par_iter()
            .map(|(node, label)| {
                if self.cancel.is_cancelled() {
                    return None;
                }
                Some(self.fetch_one(fetcher, hop, node, label))
            })
            .collect();
        if self.cancel.is_cancelled() {
            return None;
        }
        let mut results = HopResults::default();
        for outcome in outcomes {
            results.record(outcome?);
        }
        Some(results)
    }
}

/// Everything fetched during one hop, before the inclusion policy runs.
#[derive(Default)]
struct HopResults {
    found: Neighborhood,
    fetched: usize,
    failures: Vec<FetchFailure>,
}

impl HopResults {
    fn record(&mut self, outcome: Result<Neighborhood, FetchFailure>) {
        match outcome {
            Ok(fragment) => {
                self.found.absorb(&fragment);
                self.fetched += 1;
            }
            Err(failure) => self.failures.push(failure),
        }
    }
}

/// Mutable state owned by a single traversal.
struct Traversal {
    users: UserRegistry,
    edges: EdgeSet,
    frontier: UserRegistry,
    failures: Vec<FetchFailure>,
    depth: Depth,
}

impl Traversal {
    fn new(seeds: UserRegistry, depth: Depth) -> Self {
        Self {
            frontier: seeds.clone(),
            users: seeds,
            edges: EdgeSet::new(),
            failures: Vec::new(),
            depth,
        }
    }

    /// Fold a completed hop into the result.
    fn apply(&mut self, hop: u32, results: HopResults) -> HopStats {
        let HopResults { found, fetched, failures } = results;
        let final_hop = hop == self.depth.hops();

        if !final_hop {
            self.edges.merge(&found.edges);
        } else if self.depth.is_half() {
            self.keep_lateral_edges(&found.edges);
        } else {
            self.keep_edges_into_known(&found.edges);
        }

        let next_frontier: UserRegistry = found
            .users
            .iter()
            .filter(|(id, _)| !self.users.contains(id))
            .map(|(id, label)| (id.clone(), label.to_string()))
            .collect();

        // Half-depth final hops contribute edges only, never nodes.
        if !final_hop || !self.depth.is_half() {
            self.users.merge(&found.users);
        }

        let stats = HopStats {
            hop,
            fetched,
            failed: failures.len(),
            new_nodes: next_frontier.len(),
            users: self.users.len(),
            edges: self.edges.edge_count(),
        };
        self.frontier = next_frontier;
        self.failures.extend(failures);
        stats
    }

    /// Half-depth policy: both ends must already be known.
    fn keep_lateral_edges(&mut self, found: &EdgeSet) {
        let known: BTreeSet<&NodeId> = self.users.ids().chain(self.frontier.ids()).collect();
        for (from, targets) in found.iter() {
            if !known.contains(from) {
                continue;
            }
            for to in targets.iter().filter(|to| known.contains(to)) {
                self.edges.insert(from.clone(), to.clone());
            }
        }
    }

    /// Whole-depth policy: known followers keep everything; new followers keep
    /// only edges pointing back into known nodes.
    fn keep_edges_into_known(&mut self, found: &EdgeSet) {
        for (from, targets) in found.iter() {
            let known_follower = self.users.contains(from);
            for to in targets {
                if known_follower || self.users.contains(to) {
                    self.edges.insert(from.clone(), to.clone());
                }
            }
        }
    }

    fn finish(self, outcome: Outcome) -> Extraction {
        Extraction { users: self.users, edges: self.edges, outcome, failures: self.failures }
    }
}

//! Progress reporting hooks for the extractor.
//!
//! The traversal itself never prints; it calls an `Observer` at each step.
//! `TracingObserver` forwards the events to `tracing` for the CLI, and tests
//! can plug in their own recorder.
use crate::extract::{FetchFailure, HopStats};
use crate::graph::NodeId;

/// Receives traversal progress events. All methods default to no-ops.
///
/// Observers must be `Sync`: parallel hops report from worker threads.
pub trait Observer: Sync {
    fn hop_started(&self, _hop: u32, _total_hops: u32, _frontier: usize) {}
    fn fetching(&self, _hop: u32, _node: &NodeId, _label: &str) {}
    fn fetch_failed(&self, _failure: &FetchFailure) {}
    fn hop_finished(&self, _stats: &HopStats) {}
    fn cancelled(&self, _completed_hops: u32) {}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Logs progress through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn hop_started(&self, hop: u32, total_hops: u32, frontier: usize) {
        tracing::info!(hop, total_hops, frontier, "starting hop");
    }

    fn fetching(&self, hop: u32, node: &NodeId, label: &str) {
        tracing::debug!(hop, node = %node, label, "fetching neighbors");
    }

    fn fetch_failed(&self, failure: &FetchFailure) {
        tracing::warn!(
            hop = failure.hop,
            node = %failure.node,
            label = %failure.label,
            error = %failure.error,
            "fetch failed; node contributes nothing this hop"
        );
    }

    fn hop_finished(&self, stats: &HopStats) {
        tracing::info!(
            hop = stats.hop,
            fetched = stats.fetched,
            failed = stats.failed,
            new_nodes = stats.new_nodes,
            users = stats.users,
            edges = stats.edges,
            "hop finished"
        );
    }

    fn cancelled(&self, completed_hops: u32) {
        tracing::warn!(completed_hops, "traversal cancelled; returning partial result");
    }
}

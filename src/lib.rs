//! social-extract — bounded-radius social graph extraction
//!
//! Starting from one or more seed accounts, hop outward through
//! follower/following relationships and collect:
//! - a user registry (`id -> username`)
//! - a directed edge set (`follower -> followee`)
//!
//! The traversal core (`extract`) is independent of any network: it is driven
//! by a `Fetcher` that returns one node's neighborhood at a time. Fetch failures
//! are recorded and skipped; a `CancellationToken` stops the traversal early and
//! still returns every completed hop.
//!
//! # Depth
//! `--depth 2` fetches two hops and keeps the nodes found at both. `--depth 2.5`
//! fetches a third hop but only keeps edges among the nodes already known
//! after two hops (lateral edges).
//!
//! # Quickstart (Library)
//! ```
//! use social_extract::extract::extract;
//! use social_extract::graph::{Neighborhood, NodeId, UserRegistry};
//! use social_extract::errors::FetchError;
//!
//! let fetch = |node: &NodeId, _label: &str| -> Result<Neighborhood, FetchError> {
//!     let mut n = Neighborhood::new();
//!     if node.as_str() == "1" {
//!         n.follows(node, NodeId::from("2"), "bob");
//!     }
//!     Ok(n)
//! };
//! let seeds: UserRegistry = [("1", "alice")].into_iter().collect();
//! let out = extract(&fetch, seeds, 1.0).expect("valid depth");
//! assert_eq!(out.users.len(), 2);
//! assert_eq!(out.edges.edge_count(), 1);
//! ```
//!
//! # Quickstart (CLI)
//! ```text
//! social-extract graph users.tsv graph.tsv 1 --depth 1.5 \
//!     --source-users dump/users.tsv --source-edges dump/edges.tsv
//! social-extract id alice --source-users dump/users.tsv --source-edges dump/edges.tsv
//! ```
pub mod app;
pub mod cli;
pub mod errors;
pub mod extract;
pub mod graph;
pub mod sink;
pub mod source;
pub mod utils;

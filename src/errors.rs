use std::path::PathBuf;
use thiserror::Error;

use crate::graph::NodeId;

/// Fatal problems detected before the traversal issues its first fetch.
#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("Invalid depth {value}: expected a non-negative multiple of 0.5")]
    InvalidDepth { value: String },
    #[error("At least one seed node is required")]
    EmptySeeds,
}

/// A single node could not be expanded. Recorded and skipped by the extractor.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Node {node} is unavailable: {reason}")]
    Unavailable { node: NodeId, reason: String },
    #[error("Unexpected response for node {node}: {reason}")]
    Malformed { node: NodeId, reason: String },
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Malformed record on line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("Cannot write {value:?} as a TSV field: tabs and line breaks are not allowed")]
    Unrepresentable { value: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config {file}: {source}")]
    Io { file: PathBuf, source: std::io::Error },
    #[error("Invalid config {file}: {source}")]
    Toml { file: PathBuf, source: toml::de::Error },
}

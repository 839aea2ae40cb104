//! Flat-file output: one tab-separated record per line, no header.
//!
//! - users: `id<TAB>label`
//! - edges: `follower<TAB>followee`
//!
//! Records are written in identifier order. Readers accept the same format
//! and skip blank lines. Fields never contain a tab, `\n` or `\r`; writers
//! reject such values instead of escaping them.
use serde::Serialize;
use std::io::{BufRead, Write};

use crate::errors::SinkError;
use crate::extract::{Extraction, FetchFailure};
use crate::graph::{EdgeSet, NodeId, UserRegistry};

/// JSON export document.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub users: &'a UserRegistry,
    pub edges: &'a EdgeSet,
    pub completed_hops: u32,
    pub cancelled: bool,
    pub failures: &'a [FetchFailure],
}

impl<'a> From<&'a Extraction> for JsonReport<'a> {
    fn from(x: &'a Extraction) -> Self {
        Self {
            users: &x.users,
            edges: &x.edges,
            completed_hops: x.completed_hops(),
            cancelled: x.is_cancelled(),
            failures: &x.failures,
        }
    }
}

fn field(value: &str) -> Result<&str, SinkError> {
    if value.contains(['\t', '\n', '\r']) {
        return Err(SinkError::Unrepresentable { value: value.to_string() });
    }
    Ok(value)
}

/// Write the user registry.
///
/// # Errors
/// `SinkError::Unrepresentable` for an id or label containing a tab or line
/// break; otherwise propagates I/O errors from `out`.
pub fn write_users<W: Write>(users: &UserRegistry, mut out: W) -> Result<(), SinkError> {
    for (id, label) in users.iter() {
        writeln!(out, "{}\t{}", field(id.as_str())?, field(label)?)?;
    }
    out.flush()?;
    Ok(())
}

/// Write every edge.
///
/// # Errors
/// `SinkError::Unrepresentable` for an id containing a tab or line break;
/// otherwise propagates I/O errors from `out`.
pub fn write_edges<W: Write>(edges: &EdgeSet, mut out: W) -> Result<(), SinkError> {
    for (from, to) in edges.edges() {
        writeln!(out, "{}\t{}", field(from.as_str())?, field(to.as_str())?)?;
    }
    out.flush()?;
    Ok(())
}

/// Write the whole extraction as a pretty `JsonReport`.
///
/// # Errors
/// `SinkError::Json` if encoding or writing fails.
pub fn write_json<W: Write>(extraction: &Extraction, mut out: W) -> Result<(), SinkError> {
    serde_json::to_writer_pretty(&mut out, &JsonReport::from(extraction))?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

fn split_record(line: &str, lineno: usize) -> Result<Option<(&str, &str)>, SinkError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }
    match line.split_once('\t') {
        Some((a, b)) if !a.is_empty() => Ok(Some((a, b))),
        _ => Err(SinkError::Parse { line: lineno, reason: format!("expected two tab-separated fields: {line:?}") }),
    }
}

/// Parse a users file.
///
/// # Errors
/// `SinkError::Parse` on a line without a tab, `SinkError::Io` on read failure.
pub fn read_users<R: BufRead>(input: R) -> Result<UserRegistry, SinkError> {
    let mut users = UserRegistry::new();
    for (i, line) in input.lines().enumerate() {
        let line = line?;
        if let Some((id, label)) = split_record(&line, i + 1)? {
            users.insert(NodeId::from(id), label);
        }
    }
    Ok(users)
}

/// Parse an edges file.
///
/// # Errors
/// `SinkError::Parse` on a malformed line, `SinkError::Io` on read failure.
pub fn read_edges<R: BufRead>(input: R) -> Result<EdgeSet, SinkError> {
    let mut edges = EdgeSet::new();
    for (i, line) in input.lines().enumerate() {
        let line = line?;
        if let Some((from, to)) = split_record(&line, i + 1)? {
            if to.is_empty() {
                return Err(SinkError::Parse { line: i + 1, reason: "missing followee".to_string() });
            }
            edges.insert(NodeId::from(from), NodeId::from(to));
        }
    }
    Ok(edges)
}

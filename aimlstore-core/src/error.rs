//! Error types for the rule-store engine.
//!
//! Every failure here reflects either a caller programming error or a
//! corrupt/unexpected input document — none are transient, so nothing is
//! retried internally and nothing is logged. The host presents these to its
//! user and aborts the in-progress action.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by [`RuleStore`](crate::RuleStore) operations.
#[derive(Debug, Error)]
pub enum RuleStoreError {
    /// Bad or missing arguments: constructed with neither a path nor a
    /// record list (or both), or `save` called with no resolvable path.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Source document path missing or unreadable.
    #[error("rule file not found or unreadable: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not well-formed XML.
    #[error("malformed document: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Document is well-formed XML but does not fit the rule-file shape.
    #[error("malformed document: {0}")]
    Parse(String),

    /// A record node is missing a required text field. Reported, never
    /// skipped: silently dropping a record would break the round-trip
    /// guarantee.
    #[error("record {index} is missing its {field} text")]
    MalformedRecord { index: usize, field: &'static str },

    /// Index-based lookup outside `[0, len)`.
    #[error("record index {index} out of range (store holds {len} records)")]
    IndexOutOfRange { index: usize, len: usize },

    /// I/O failure while writing a document.
    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for rule-store operations.
pub type Result<T> = std::result::Result<T, RuleStoreError>;

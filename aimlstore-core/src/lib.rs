// Aimlstore Core Library
//
// Owns the canonical in-memory rule list behind an AIML-family document:
// parse a file into ordered pattern/response records, apply CRUD and bulk
// reconciliation, and serialize back out byte-compatibly.

pub mod document;
pub mod encoding;
pub mod error;
pub mod store;
pub mod types;

// Re-export main types and functions for easy use
pub use error::{Result, RuleStoreError};
pub use store::RuleStore;
pub use types::{DocumentMeta, Record, SetMode};

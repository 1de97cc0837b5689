use serde::{Deserialize, Serialize};

/// The format version stamped on every document we synthesize.
pub const DEFAULT_VERSION: &str = "1.0";

/// Author recorded in the `<meta name="author">` entry of fresh documents.
pub const DEFAULT_AUTHOR: &str = "aimlstore";

/// Language recorded in the `<meta name="language">` entry of fresh documents.
pub const DEFAULT_LANGUAGE: &str = "en";

/// One pattern/response pair — the atomic unit of the rule store.
///
/// Both fields are opaque free-form text to this crate; interpreting the
/// pattern (wildcards, matching priority) belongs to a downstream consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub pattern: String,
    pub response: String,
}

impl Record {
    pub fn new(pattern: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            response: response.into(),
        }
    }
}

impl From<(&str, &str)> for Record {
    fn from((pattern, response): (&str, &str)) -> Self {
        Self::new(pattern, response)
    }
}

/// Document-level metadata attached once when a document is synthesized.
///
/// `author` and `language` become `<meta>` entries; `version` becomes the
/// root element's attribute. All three are carried through unchanged on save
/// and otherwise opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub author: String,
    pub language: String,
    pub version: String,
}

impl Default for DocumentMeta {
    fn default() -> Self {
        Self {
            author: DEFAULT_AUTHOR.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            version: DEFAULT_VERSION.to_string(),
        }
    }
}

/// Reconciliation policy for [`RuleStore::set_records`](crate::RuleStore::set_records).
///
/// The two policies were historically near-duplicate code paths; a single
/// operation with an explicit mode keeps the ordering and tie-break rules in
/// one auditable place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetMode {
    /// Discard every existing record, then append the input verbatim.
    Overwrite,
    /// For each input pair, rewrite the response of the first existing record
    /// whose pattern matches exactly (case-sensitive, untrimmed), or append
    /// when none matches. Existing records absent from the input are kept.
    MergeByPattern,
}

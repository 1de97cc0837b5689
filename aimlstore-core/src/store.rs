//! The live rule store: owns the document tree, applies CRUD and bulk
//! reconciliation, and flushes to disk on demand.

use crate::document::{Document, RecordNode};
use crate::encoding;
use crate::error::{Result, RuleStoreError};
use crate::types::{DocumentMeta, Record, SetMode};
use std::fs;
use std::path::{Path, PathBuf};

const PATTERN_FIELD: &str = "pattern";
const RESPONSE_FIELD: &str = "template";

/// An ordered collection of pattern/response records backed by one document.
///
/// Every mutating call updates the document tree directly — the tree is the
/// only state, so there is no dirty flag and no deferred flush beyond calling
/// [`save`](Self::save) when done. Single-threaded and synchronous
/// throughout; a host needing concurrent access must serialize calls itself.
#[derive(Debug, Clone)]
pub struct RuleStore {
    document: Document,
    path: Option<PathBuf>,
}

impl RuleStore {
    /// Exclusive-argument constructor: exactly one of `path` or `records`
    /// must be given. Fails with `InvalidArgument` on neither or both.
    pub fn new(
        path: Option<&Path>,
        records: Option<&[Record]>,
        meta: DocumentMeta,
    ) -> Result<Self> {
        match (path, records) {
            (Some(path), None) => Self::open(path),
            (None, Some(records)) => Ok(Self::from_records(records, meta)),
            (Some(_), Some(_)) => Err(RuleStoreError::InvalidArgument(
                "construct from either a path or a record list, not both".to_string(),
            )),
            (None, None) => Err(RuleStoreError::InvalidArgument(
                "a path or a record list is required".to_string(),
            )),
        }
    }

    /// Parse an existing document from disk. The path is remembered so a
    /// later `save()` with no destination writes back to it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| RuleStoreError::NotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let text = encoding::decode_document(&bytes)?;
        Ok(Self {
            document: Document::parse(&text)?,
            path: Some(path.to_path_buf()),
        })
    }

    /// Synthesize a fresh document from a record list plus metadata. No path
    /// is remembered; the first `save` needs an explicit destination.
    pub fn from_records(records: &[Record], meta: DocumentMeta) -> Self {
        Self {
            document: Document::synthesize(records, &meta),
            path: None,
        }
    }

    /// The path this store was opened from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.document.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.records.is_empty()
    }

    /// Snapshot of every record in document order, both fields trimmed of
    /// surrounding whitespace. Read-only. Fails with `MalformedRecord` on
    /// the first record missing a field — a corrupt document is reported,
    /// never silently truncated.
    pub fn as_record_list(&self) -> Result<Vec<Record>> {
        self.document
            .records
            .iter()
            .enumerate()
            .map(|(index, node)| record_from_node(node, index))
            .collect()
    }

    /// The record at a zero-based position in document order, trimmed like
    /// [`as_record_list`](Self::as_record_list).
    pub fn get_record(&self, index: usize) -> Result<Record> {
        let node = self.node(index)?;
        record_from_node(node, index)
    }

    /// Append a new record at the end of the sequence. No duplicate check;
    /// positions of prior records are unchanged.
    pub fn create_record(&mut self, pattern: impl Into<String>, response: impl Into<String>) {
        self.document.records.push(RecordNode {
            pattern: Some(pattern.into()),
            response: Some(response.into()),
        });
    }

    /// Overwrite the fields of the record at `index`. A `None` or empty
    /// argument leaves that field untouched; both omitted is a no-op.
    pub fn edit_record(
        &mut self,
        index: usize,
        pattern: Option<&str>,
        response: Option<&str>,
    ) -> Result<()> {
        let node = self.node_mut(index)?;
        if let Some(pattern) = pattern.filter(|p| !p.is_empty()) {
            node.pattern = Some(pattern.to_string());
        }
        if let Some(response) = response.filter(|r| !r.is_empty()) {
            node.response = Some(response.to_string());
        }
        Ok(())
    }

    /// Remove the record at `index`; subsequent indices shift down by one.
    pub fn delete_record(&mut self, index: usize) -> Result<()> {
        self.node(index)?;
        self.document.records.remove(index);
        Ok(())
    }

    /// Remove every record, leaving metadata untouched.
    pub fn delete_all_records(&mut self) {
        self.document.records.clear();
    }

    /// Reconcile the store against a proposed record list.
    ///
    /// `Overwrite` discards the existing sequence and appends the input
    /// verbatim. `MergeByPattern` walks the input in order and, for each
    /// pair, rewrites the response of the first pre-existing record whose
    /// pattern text matches exactly (case-sensitive, untrimmed — the read
    /// path trims, this comparison deliberately does not), appending when no
    /// match exists. Only records present when the call started are match
    /// candidates, so a record appended by an earlier input pair is never
    /// matched by a later one. Pre-existing records absent from the input
    /// are kept.
    ///
    /// A malformed pre-existing record aborts the merge mid-call; in-place
    /// edits already applied are kept, as the host treats this as fatal.
    pub fn set_records(&mut self, records: &[Record], mode: SetMode) -> Result<()> {
        match mode {
            SetMode::Overwrite => {
                self.delete_all_records();
                for record in records {
                    self.create_record(record.pattern.clone(), record.response.clone());
                }
            }
            SetMode::MergeByPattern => {
                let preexisting = self.document.records.len();
                for record in records {
                    let mut matched = false;
                    for index in 0..preexisting {
                        let node = &mut self.document.records[index];
                        let pattern = node.pattern.as_deref().ok_or(
                            RuleStoreError::MalformedRecord {
                                index,
                                field: PATTERN_FIELD,
                            },
                        )?;
                        if pattern == record.pattern {
                            // A matching record with no response child is as
                            // malformed as one with no pattern: report it,
                            // don't invent the missing field.
                            if node.response.is_none() {
                                return Err(RuleStoreError::MalformedRecord {
                                    index,
                                    field: RESPONSE_FIELD,
                                });
                            }
                            node.response = Some(record.response.clone());
                            matched = true;
                            // First match only; later duplicates stay as-is.
                            break;
                        }
                    }
                    if !matched {
                        self.create_record(record.pattern.clone(), record.response.clone());
                    }
                }
            }
        }
        Ok(())
    }

    /// Render the document as a markup fragment, without a declaration.
    pub fn to_text(&self) -> Result<String> {
        self.document.to_xml(false)
    }

    /// Write the full document, declaration included, Latin-1 encoded.
    ///
    /// With no explicit path, the path remembered at construction is used;
    /// an explicit path is used for this write only and does not become the
    /// remembered path.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let target = match path {
            Some(path) => path,
            None => self.path.as_deref().ok_or_else(|| {
                RuleStoreError::InvalidArgument(
                    "no save destination: store was not opened from a file and no path was given"
                        .to_string(),
                )
            })?,
        };
        let xml = self.document.to_xml(true)?;
        fs::write(target, encoding::encode_latin1(&xml)).map_err(|source| RuleStoreError::Io {
            path: target.to_path_buf(),
            source,
        })
    }

    fn node(&self, index: usize) -> Result<&RecordNode> {
        self.document
            .records
            .get(index)
            .ok_or(RuleStoreError::IndexOutOfRange {
                index,
                len: self.document.records.len(),
            })
    }

    fn node_mut(&mut self, index: usize) -> Result<&mut RecordNode> {
        let len = self.document.records.len();
        self.document
            .records
            .get_mut(index)
            .ok_or(RuleStoreError::IndexOutOfRange { index, len })
    }
}

fn record_from_node(node: &RecordNode, index: usize) -> Result<Record> {
    let pattern = node
        .pattern
        .as_deref()
        .ok_or(RuleStoreError::MalformedRecord {
            index,
            field: PATTERN_FIELD,
        })?;
    let response = node
        .response
        .as_deref()
        .ok_or(RuleStoreError::MalformedRecord {
            index,
            field: RESPONSE_FIELD,
        })?;
    Ok(Record::new(pattern.trim(), response.trim()))
}

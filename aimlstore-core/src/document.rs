//! The on-disk document tree.
//!
//! A document is one root `<aiml>` element carrying a format-version
//! attribute, zero or more `<meta name=".." content=".."/>` entries, and an
//! ordered run of `<category>` nodes each holding one `<pattern>` and one
//! `<template>` text child. Element names follow the AIML format family so
//! files stay interchangeable with other tools in that family.
//!
//! Parsing is strict: unknown elements and stray text are rejected rather
//! than skipped, because anything this parser drops would be lost on the
//! next save.

use crate::error::{Result, RuleStoreError};
use crate::types::{DocumentMeta, Record};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

const ROOT_TAG: &str = "aiml";
const META_TAG: &str = "meta";
const RECORD_TAG: &str = "category";
const PATTERN_TAG: &str = "pattern";
const RESPONSE_TAG: &str = "template";

/// One `name -> content` metadata entry, opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaEntry {
    pub name: String,
    pub content: String,
}

/// One record node. Fields are `Option` so a structurally absent child is
/// representable: `as_record_list` reports it instead of skipping the record.
/// A present-but-empty element reads as `Some("")`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordNode {
    pub pattern: Option<String>,
    pub response: Option<String>,
}

/// The full in-memory document tree backing one store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub version: Option<String>,
    pub meta: Vec<MetaEntry>,
    pub records: Vec<RecordNode>,
}

impl Document {
    /// Synthesize a fresh document from a record list plus metadata:
    /// one meta entry per metadata field, then one record node per input
    /// pair, in the input's order.
    pub fn synthesize(records: &[Record], meta: &DocumentMeta) -> Self {
        Self {
            version: Some(meta.version.clone()),
            meta: vec![
                MetaEntry {
                    name: "author".to_string(),
                    content: meta.author.clone(),
                },
                MetaEntry {
                    name: "language".to_string(),
                    content: meta.language.clone(),
                },
            ],
            records: records
                .iter()
                .map(|r| RecordNode {
                    pattern: Some(r.pattern.clone()),
                    response: Some(r.response.clone()),
                })
                .collect(),
        }
    }

    /// Parse document text into the tree.
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = Reader::from_str(text);
        // Empty elements arrive as Start+End pairs, so `<pattern/>` reads the
        // same as `<pattern></pattern>`: present, empty text.
        reader.expand_empty_elements(true);

        let mut document = None;
        loop {
            match reader.read_event()? {
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
                Event::Text(t) => {
                    if !t.unescape()?.trim().is_empty() {
                        return Err(RuleStoreError::Parse(
                            "unexpected text outside the document root".to_string(),
                        ));
                    }
                }
                Event::Start(e) => {
                    if e.name().as_ref() != ROOT_TAG.as_bytes() {
                        return Err(RuleStoreError::Parse(format!(
                            "unexpected root element <{}>, expected <{ROOT_TAG}>",
                            String::from_utf8_lossy(e.name().as_ref())
                        )));
                    }
                    if document.is_some() {
                        return Err(RuleStoreError::Parse(
                            "multiple root elements".to_string(),
                        ));
                    }
                    let version = find_attribute(&e, "version")?;
                    let mut doc = Document {
                        version,
                        meta: Vec::new(),
                        records: Vec::new(),
                    };
                    parse_root_children(&mut reader, &mut doc)?;
                    document = Some(doc);
                }
                Event::End(_) => {
                    return Err(RuleStoreError::Parse("unexpected closing tag".to_string()))
                }
                Event::CData(_) => {
                    return Err(RuleStoreError::Parse(
                        "unexpected CDATA outside the document root".to_string(),
                    ))
                }
                Event::Eof => break,
                // Unreachable with expand_empty_elements, kept total.
                Event::Empty(_) => {
                    return Err(RuleStoreError::Parse(
                        "unexpected empty element outside the document root".to_string(),
                    ))
                }
            }
        }

        document.ok_or_else(|| RuleStoreError::Parse(format!("missing <{ROOT_TAG}> root element")))
    }

    /// Render the tree to markup. With `declaration`, a full document headed
    /// by the legacy-encoding XML declaration; without, a bare fragment.
    pub fn to_xml(&self, declaration: bool) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        if declaration {
            writer.write_event(Event::Decl(BytesDecl::new(
                "1.0",
                Some("ISO-8859-1"),
                None,
            )))?;
        }

        let mut root = BytesStart::new(ROOT_TAG);
        if let Some(version) = &self.version {
            root.push_attribute(("version", version.as_str()));
        }
        writer.write_event(Event::Start(root))?;

        for entry in &self.meta {
            let mut meta = BytesStart::new(META_TAG);
            meta.push_attribute(("name", entry.name.as_str()));
            meta.push_attribute(("content", entry.content.as_str()));
            writer.write_event(Event::Empty(meta))?;
        }

        for record in &self.records {
            writer.write_event(Event::Start(BytesStart::new(RECORD_TAG)))?;
            write_text_child(&mut writer, PATTERN_TAG, record.pattern.as_deref())?;
            write_text_child(&mut writer, RESPONSE_TAG, record.response.as_deref())?;
            writer.write_event(Event::End(BytesEnd::new(RECORD_TAG)))?;
        }

        writer.write_event(Event::End(BytesEnd::new(ROOT_TAG)))?;

        String::from_utf8(writer.into_inner())
            .map_err(|e| RuleStoreError::Parse(format!("writer produced invalid UTF-8: {e}")))
    }
}

fn write_text_child(
    writer: &mut Writer<Vec<u8>>,
    tag: &str,
    text: Option<&str>,
) -> Result<()> {
    // A missing field (only possible on a parsed-malformed tree) is left
    // missing rather than invented, so a load-then-save cannot fabricate data.
    let Some(text) = text else { return Ok(()) };
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    // Written even when empty: a Text event keeps the indenting writer from
    // breaking the line, so `<pattern></pattern>` stays free of stray
    // whitespace on reparse.
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn parse_root_children(reader: &mut Reader<&[u8]>, doc: &mut Document) -> Result<()> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                tag if tag == META_TAG.as_bytes() => {
                    let name = find_attribute(&e, "name")?.ok_or_else(|| {
                        RuleStoreError::Parse(format!("<{META_TAG}> entry missing name attribute"))
                    })?;
                    let content = find_attribute(&e, "content")?.ok_or_else(|| {
                        RuleStoreError::Parse(format!(
                            "<{META_TAG}> entry \"{name}\" missing content attribute"
                        ))
                    })?;
                    expect_element_end(reader, META_TAG)?;
                    doc.meta.push(MetaEntry { name, content });
                }
                tag if tag == RECORD_TAG.as_bytes() => {
                    let node = parse_record(reader)?;
                    doc.records.push(node);
                }
                other => {
                    return Err(RuleStoreError::Parse(format!(
                        "unexpected element <{}> in document root",
                        String::from_utf8_lossy(other)
                    )))
                }
            },
            Event::Text(t) => {
                if !t.unescape()?.trim().is_empty() {
                    return Err(RuleStoreError::Parse(
                        "unexpected text in document root".to_string(),
                    ));
                }
            }
            Event::Comment(_) | Event::PI(_) => {}
            Event::End(_) => return Ok(()),
            Event::Eof => {
                return Err(RuleStoreError::Parse(format!(
                    "document ended before </{ROOT_TAG}>"
                )))
            }
            _ => {
                return Err(RuleStoreError::Parse(
                    "unexpected content in document root".to_string(),
                ))
            }
        }
    }
}

fn parse_record(reader: &mut Reader<&[u8]>) -> Result<RecordNode> {
    let mut node = RecordNode::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                tag if tag == PATTERN_TAG.as_bytes() => {
                    let text = read_text_content(reader, PATTERN_TAG)?;
                    // First child wins; duplicates are parse errors waiting
                    // to happen, but the original format reads the first.
                    node.pattern.get_or_insert(text);
                }
                tag if tag == RESPONSE_TAG.as_bytes() => {
                    let text = read_text_content(reader, RESPONSE_TAG)?;
                    node.response.get_or_insert(text);
                }
                other => {
                    return Err(RuleStoreError::Parse(format!(
                        "unexpected element <{}> in <{RECORD_TAG}>",
                        String::from_utf8_lossy(other)
                    )))
                }
            },
            Event::Text(t) => {
                if !t.unescape()?.trim().is_empty() {
                    return Err(RuleStoreError::Parse(format!(
                        "unexpected text in <{RECORD_TAG}>"
                    )));
                }
            }
            Event::Comment(_) | Event::PI(_) => {}
            Event::End(_) => return Ok(node),
            Event::Eof => {
                return Err(RuleStoreError::Parse(format!(
                    "document ended inside <{RECORD_TAG}>"
                )))
            }
            _ => {
                return Err(RuleStoreError::Parse(format!(
                    "unexpected content in <{RECORD_TAG}>"
                )))
            }
        }
    }
}

/// Read the text body of a pattern/template element up to its closing tag.
fn read_text_content(reader: &mut Reader<&[u8]>, tag: &str) -> Result<String> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c.into_inner())),
            Event::Comment(_) => {}
            Event::End(_) => return Ok(text),
            Event::Start(e) => {
                return Err(RuleStoreError::Parse(format!(
                    "markup <{}> inside <{tag}> is not supported; patterns and \
                     templates hold plain text",
                    String::from_utf8_lossy(e.name().as_ref())
                )))
            }
            Event::Eof => {
                return Err(RuleStoreError::Parse(format!(
                    "document ended inside <{tag}>"
                )))
            }
            _ => {
                return Err(RuleStoreError::Parse(format!(
                    "unexpected content inside <{tag}>"
                )))
            }
        }
    }
}

/// Consume events until an element's closing tag, allowing only whitespace.
fn expect_element_end(reader: &mut Reader<&[u8]>, tag: &str) -> Result<()> {
    loop {
        match reader.read_event()? {
            Event::End(_) => return Ok(()),
            Event::Text(t) if t.unescape()?.trim().is_empty() => {}
            Event::Comment(_) => {}
            Event::Eof => {
                return Err(RuleStoreError::Parse(format!(
                    "document ended inside <{tag}>"
                )))
            }
            _ => {
                return Err(RuleStoreError::Parse(format!(
                    "unexpected content inside <{tag}>"
                )))
            }
        }
    }
}

fn find_attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == name.as_bytes() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

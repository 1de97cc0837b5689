//! Legacy 8-bit encoding support.
//!
//! Saved documents carry an `ISO-8859-1` declaration for byte-for-byte
//! compatibility with the original rule-file family. This is an external
//! compatibility constraint of the on-disk format, not a recommendation
//! for new data.

use crate::error::{Result, RuleStoreError};

/// Encode a UTF-8 string as Latin-1 bytes.
///
/// Code points at or below U+00FF map directly to one byte; anything above
/// is written as a numeric character reference (`&#NNNN;`), which the XML
/// reader resolves back on parse. Markup characters were already escaped by
/// the XML writer, so the references introduced here never collide.
pub fn encode_latin1(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let cp = ch as u32;
        if cp <= 0xFF {
            out.push(cp as u8);
        } else {
            out.extend_from_slice(format!("&#{cp};").as_bytes());
        }
    }
    out
}

/// Decode raw document bytes into a string, honoring the XML declaration.
///
/// A declared `ISO-8859-1` (or `latin-1`) encoding decodes each byte to the
/// same code point; everything else is treated as UTF-8.
pub fn decode_document(bytes: &[u8]) -> Result<String> {
    if declares_latin1(bytes) {
        return Ok(bytes.iter().map(|&b| b as char).collect());
    }
    String::from_utf8(bytes.to_vec())
        .map_err(|e| RuleStoreError::Parse(format!("invalid UTF-8 in document: {e}")))
}

/// Check the XML declaration (if any) for a Latin-1 encoding label.
fn declares_latin1(bytes: &[u8]) -> bool {
    if !bytes.starts_with(b"<?xml") {
        return false;
    }
    let Some(end) = bytes.windows(2).position(|w| w == b"?>") else {
        return false;
    };
    // The declaration is ASCII by definition, so a lossy view is exact here.
    let decl = String::from_utf8_lossy(&bytes[..end]).to_ascii_lowercase();
    decl.contains("iso-8859-1") || decl.contains("latin-1") || decl.contains("latin1")
}

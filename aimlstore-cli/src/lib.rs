// Aimlstore CLI utilities
//
// Console-facing helpers for the aimlstore binary: rules-file import and
// record printing. All rule-store semantics live in aimlstore-core.

pub mod import;
pub mod render;

pub use import::load_rules;
pub use render::{records_json, records_table};

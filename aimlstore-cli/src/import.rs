//! Rules-file import: a YAML or JSON list of pattern/response pairs,
//! picked by file extension.
//!
//! ```yaml
//! - pattern: "HELLO"
//!   response: "Hi!"
//! - pattern: "*"
//!   response: "Does not compute."
//! ```

use aimlstore_core::Record;
use anyhow::{bail, Context, Result};
use std::path::Path;

pub fn load_rules(path: &Path) -> Result<Vec<Record>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rules file: {}", path.display()))?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON rules file: {}", path.display())),
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid YAML rules file: {}", path.display())),
        _ => bail!(
            "Unsupported rules file extension for {} (expected .yaml, .yml, or .json)",
            path.display()
        ),
    }
}

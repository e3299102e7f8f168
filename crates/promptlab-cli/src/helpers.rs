//! Shared CLI helpers — banner and terminal formatting.

use colored::Colorize;
use serde_json::{Map, Value};

/// Print the banner shown when the server starts.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "Promptlab".cyan().bold(), version.dimmed());
    println!();
}

/// Credential status cell for the providers table.
pub fn credential_status(is_set: bool) -> String {
    if is_set {
        format!("{} (key set)", "✓".green())
    } else {
        format!("{}", "· not set".dimmed())
    }
}

/// Render payload overrides as `key=value` pairs, or `-` when there are none.
pub fn format_overrides(overrides: &Map<String, Value>) -> String {
    if overrides.is_empty() {
        return "-".to_string();
    }
    overrides
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn format_overrides_empty() {
        assert_eq!(format_overrides(&Map::new()), "-");
    }

    #[test]
    fn format_overrides_pairs() {
        let overrides = match json!({"model": "gpt-3.5-turbo", "stream": false}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        assert_eq!(
            format_overrides(&overrides),
            r#"model="gpt-3.5-turbo", stream=false"#
        );
    }

    #[test]
    fn credential_status_text() {
        assert!(credential_status(true).contains("key set"));
        assert!(credential_status(false).contains("not set"));
    }
}

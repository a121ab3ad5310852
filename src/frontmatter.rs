//! YAML front matter extraction
//!
//! A manifesto starts with a block delimited by lines consisting solely of
//! `---`. Anything that goes wrong while reading or parsing that block is
//! logged and reported as "no front matter"; callers never see an error.

use serde_yaml::{Mapping, Value};
use std::path::Path;

const DELIMITER: &str = "---";

/// Read a file and parse its front matter.
pub fn read_front_matter(path: &Path) -> Option<Mapping> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Error reading {}: {}", path.display(), e);
            return None;
        }
    };

    match parse_front_matter(&content) {
        Ok(front_matter) => front_matter,
        Err(e) => {
            tracing::warn!("Error parsing front matter in {}: {}", path.display(), e);
            None
        }
    }
}

/// Parse the front matter block at the top of `content`.
///
/// `Ok(None)` means there is no block, or the block is empty or not closed.
/// `Err` is returned only for YAML that does not parse or is not a mapping.
pub fn parse_front_matter(content: &str) -> Result<Option<Mapping>, serde_yaml::Error> {
    let Some(block) = extract_block(content) else {
        return Ok(None);
    };
    if block.trim().is_empty() {
        return Ok(None);
    }

    match serde_yaml::from_str::<Value>(&block)? {
        Value::Mapping(map) => Ok(Some(map)),
        Value::Null => Ok(None),
        other => Err(serde::de::Error::custom(format!(
            "expected a mapping, found {}",
            value_kind(&other)
        ))),
    }
}

/// Raw text between the opening and closing delimiter lines
fn extract_block(content: &str) -> Option<String> {
    let mut lines = content.lines();

    let first = lines.next()?.trim_start_matches('\u{feff}').trim_end();
    if first != DELIMITER {
        return None;
    }

    let mut block: Vec<&str> = Vec::new();
    for line in lines {
        if line.trim_end() == DELIMITER {
            return Some(block.join("\n"));
        }
        block.push(line);
    }

    // Unterminated
    None
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Render a scalar id (`id: 42` is as valid as `id: security`)
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    #[test]
    fn basic_front_matter() {
        let input = "---\nid: security\ntitle: Security Manifesto\n---\n# Security\nBody";
        let fm = parse_front_matter(input).unwrap().unwrap();
        assert_eq!(fm.get("id"), Some(&s("security")));
        assert_eq!(fm.get("title"), Some(&s("Security Manifesto")));
    }

    #[test]
    fn nested_measurement() {
        let input = "---\nid: perf\nmeasurement:\n  kpis:\n    - p99_latency\n    - throughput\n---\n";
        let fm = parse_front_matter(input).unwrap().unwrap();
        let measurement = fm.get("measurement").unwrap().as_mapping().unwrap();
        let kpis = measurement.get(s("kpis")).unwrap().as_sequence().unwrap();
        assert_eq!(kpis.len(), 2);
    }

    #[test]
    fn keeps_key_order() {
        let input = "---\nzeta: 1\nalpha: 2\nid: x\n---\n";
        let fm = parse_front_matter(input).unwrap().unwrap();
        let keys: Vec<&str> = fm.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "id"]);
    }

    #[test]
    fn front_matter_with_bom() {
        let input = "\u{feff}---\nid: bom\n---\n";
        let fm = parse_front_matter(input).unwrap().unwrap();
        assert_eq!(fm.get("id"), Some(&s("bom")));
    }

    #[test]
    fn horizontal_rule_in_body_is_not_a_delimiter() {
        let input = "---\nid: a\n---\nText\n\n---\n\nMore";
        let fm = parse_front_matter(input).unwrap().unwrap();
        assert_eq!(fm.len(), 1);
    }

    #[test]
    fn no_front_matter() {
        assert!(parse_front_matter("# Title\nBody").unwrap().is_none());
        assert!(parse_front_matter("").unwrap().is_none());
    }

    #[test]
    fn delimiter_must_be_alone_on_its_line() {
        assert!(parse_front_matter("--- id: a\n---\n").unwrap().is_none());
    }

    #[test]
    fn empty_or_unterminated_block() {
        assert!(parse_front_matter("---\n---\n").unwrap().is_none());
        assert!(parse_front_matter("---\nid: a\n").unwrap().is_none());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(parse_front_matter("---\nid: [unclosed\n---\n").is_err());
    }

    #[test]
    fn non_mapping_is_an_error() {
        assert!(parse_front_matter("---\n- a\n- b\n---\n").is_err());
        assert!(parse_front_matter("---\njust text\n---\n").is_err());
    }

    #[test]
    fn read_front_matter_swallows_errors() {
        let temp = tempfile::TempDir::new().unwrap();
        let bad = temp.path().join("bad.md");
        std::fs::write(&bad, "---\nid: [unclosed\n---\n").unwrap();
        assert!(read_front_matter(&bad).is_none());
        assert!(read_front_matter(&temp.path().join("missing.md")).is_none());

        let good = temp.path().join("good.md");
        std::fs::write(&good, "---\nid: good\n---\nbody").unwrap();
        assert!(read_front_matter(&good).is_some());
    }

    #[test]
    fn scalar_ids() {
        assert_eq!(scalar_to_string(&s("x")), Some("x".to_string()));
        assert_eq!(
            scalar_to_string(&Value::Number(42.into())),
            Some("42".to_string())
        );
        assert_eq!(scalar_to_string(&Value::Null), None);
    }
}

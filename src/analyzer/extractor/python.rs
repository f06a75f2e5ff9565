//! Pattern-Matching Extraction for Python
//!
//! Line-oriented approximation of structural facts without a full parser:
//! anchored patterns for `def name(params):` (with optional `async` prefix
//! and an immediately following triple-quoted docstring), `class Name(...):`,
//! and `import`/`from ... import` statements.
//!
//! The function-body window advances up to a fixed number of lines or until
//! a line returns to column zero with non-blank content. This block-end
//! heuristic is approximate: nested blocks and multi-line signatures can be
//! mis-bounded. That is a known precision limit of the pattern variant, not
//! a defect.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::analysis::EXCERPT_MAX_LINES;
use crate::types::{ClassFact, FileFacts, FunctionFact, Result};

static DEF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(async\s+)?def\s+(\w+)\s*\((.*?)\):").expect("def pattern"));

static CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^class\s+(\w+)(?:\(.*?\))?:").expect("class pattern"));

static IMPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:from\s+[\w.]+\s+)?import\s+(.+)").expect("import pattern"));

pub(super) fn extract(content: &str, _path: &str) -> Result<FileFacts> {
    let lines: Vec<&str> = content.lines().collect();
    let mut facts = FileFacts::default();

    for (i, line) in lines.iter().enumerate() {
        if let Some(caps) = DEF_RE.captures(line) {
            let name = caps.get(2).map_or("", |m| m.as_str()).to_string();
            let params: Vec<String> = caps
                .get(3)
                .map_or("", |m| m.as_str())
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();

            facts.functions.push(FunctionFact {
                name,
                params,
                is_async: caps.get(1).is_some(),
                line_start: i as u32 + 1,
                line_end: None,
                excerpt: body_excerpt(&lines, i),
                docstring: docstring_after(&lines, i),
            });
        }

        if let Some(caps) = CLASS_RE.captures(line) {
            facts.classes.push(ClassFact {
                name: caps.get(1).map_or("", |m| m.as_str()).to_string(),
                line_start: i as u32 + 1,
                line_end: None,
            });
        }

        if let Some(caps) = IMPORT_RE.captures(line) {
            let names = caps.get(1).map_or("", |m| m.as_str());
            facts
                .imports
                .extend(names.split(',').map(|n| n.trim().to_string()));
        }
    }

    Ok(facts)
}

/// Docstring immediately following a `def` line: a triple-quoted block
/// starting on the next line, accumulated until the closing `"""`.
/// Line-oriented like the rest of this module, so quotes embedded in
/// string expressions can fool it.
fn docstring_after(lines: &[&str], def_idx: usize) -> Option<String> {
    let first = lines.get(def_idx + 1)?.trim_start();
    let rest = first.strip_prefix("\"\"\"")?;

    // Single-line form: """Doc."""
    if let Some(end) = rest.find("\"\"\"") {
        let doc = rest[..end].trim();
        return if doc.is_empty() {
            None
        } else {
            Some(doc.to_string())
        };
    }

    let mut parts: Vec<&str> = Vec::new();
    if !rest.trim().is_empty() {
        parts.push(rest.trim());
    }
    for line in lines.iter().skip(def_idx + 2) {
        if let Some(end) = line.find("\"\"\"") {
            let head = line[..end].trim();
            if !head.is_empty() {
                parts.push(head);
            }
            break;
        }
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}

/// Body window: up to the configured line count starting at the `def`
/// line, stopping before the next column-zero non-blank line.
fn body_excerpt(lines: &[&str], def_idx: usize) -> String {
    let mut body: Vec<&str> = Vec::new();
    let mut j = def_idx;
    let limit = (def_idx + EXCERPT_MAX_LINES).min(lines.len());

    while j < limit {
        body.push(lines[j]);
        j += 1;
        if let Some(next) = lines.get(j)
            && !next.starts_with(' ')
            && !next.starts_with('\t')
            && !next.trim().is_empty()
        {
            break;
        }
    }

    body.join("\n")
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_ok(content: &str) -> FileFacts {
        extract(content, "app.py").expect("extraction failed")
    }

    #[test]
    fn test_def_with_params() {
        let facts = extract_ok("def greet(name, greeting='hi'):\n    return greeting\n");
        assert_eq!(facts.functions.len(), 1);
        let f = &facts.functions[0];
        assert_eq!(f.name, "greet");
        assert_eq!(f.params, vec!["name", "greeting='hi'"]);
        assert_eq!(f.line_start, 1);
        assert!(f.line_end.is_none());
        assert!(!f.is_async);
    }

    #[test]
    fn test_async_def_detected() {
        let facts = extract_ok("async def fetch_data(url):\n    pass\n");
        assert_eq!(facts.functions.len(), 1);
        assert!(facts.functions[0].is_async);
        assert_eq!(facts.functions[0].name, "fetch_data");
    }

    #[test]
    fn test_indented_def_is_ignored() {
        let facts = extract_ok("class A:\n    def method(self):\n        pass\n");
        // Anchored pattern only matches column-zero defs
        assert!(facts.functions.is_empty());
        assert_eq!(facts.classes.len(), 1);
    }

    #[test]
    fn test_docstring_captured() {
        let source = "def documented():\n    \"\"\"\n    Does a thing.\n    \"\"\"\n    pass\n";
        let facts = extract_ok(source);
        let doc = facts.functions[0].docstring.as_deref().expect("docstring");
        assert!(doc.contains("Does a thing."));
    }

    #[test]
    fn test_single_line_docstring() {
        let facts = extract_ok("def short():\n    \"\"\"One-liner.\"\"\"\n    pass\n");
        assert_eq!(facts.functions[0].docstring.as_deref(), Some("One-liner."));
    }

    #[test]
    fn test_no_docstring_is_none() {
        let facts = extract_ok("def plain():\n    pass\n");
        assert!(facts.functions[0].docstring.is_none());
    }

    #[test]
    fn test_class_with_bases() {
        let facts = extract_ok("class Handler(BaseHandler, Mixin):\n    pass\n");
        assert_eq!(facts.classes.len(), 1);
        assert_eq!(facts.classes[0].name, "Handler");
        assert_eq!(facts.classes[0].line_start, 1);
        assert!(facts.classes[0].line_end.is_none());
    }

    #[test]
    fn test_imports_collected() {
        let source = "import os\nfrom typing import List, Optional\n";
        let facts = extract_ok(source);
        assert_eq!(facts.imports, vec!["os", "List", "Optional"]);
    }

    #[test]
    fn test_body_stops_at_column_zero() {
        let source = "def first():\n    a = 1\n    return a\n\ndef second():\n    pass\n";
        let facts = extract_ok(source);
        assert_eq!(facts.functions.len(), 2);
        let body = &facts.functions[0].excerpt;
        assert!(body.contains("return a"));
        assert!(!body.contains("def second"));
    }

    #[test]
    fn test_body_window_is_capped() {
        let mut source = String::from("def long_one():\n");
        for i in 0..40 {
            source.push_str(&format!("    x{} = {}\n", i, i));
        }
        let facts = extract_ok(&source);
        assert_eq!(
            facts.functions[0].excerpt.lines().count(),
            EXCERPT_MAX_LINES
        );
    }

    #[test]
    fn test_multiline_signature_not_matched() {
        // Known precision limit: the anchored pattern requires the closing
        // paren and colon on the def line.
        let facts = extract_ok("def wrapped(\n    a,\n    b,\n):\n    pass\n");
        assert!(facts.functions.is_empty());
    }

    #[test]
    fn test_endpoints_never_produced() {
        let facts = extract_ok("app.route('/users')\ndef users():\n    pass\n");
        assert!(facts.endpoints.is_empty());
    }
}

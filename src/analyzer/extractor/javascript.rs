//! Syntax-Tree Extraction for the JavaScript/TypeScript Family
//!
//! Parses the full module with the tree-sitter TSX grammar (JSX and type
//! annotations in one grammar) and walks the tree collecting named function
//! declarations, arrow functions bound to variable declarators, class
//! declarations, and HTTP-route-registration call patterns of the shape
//! `<object>.<verb>('<path>', handler)`.

use tree_sitter::{Node, Parser as TsParser, Query, QueryCursor, StreamingIterator};

use crate::constants::analysis::EXCERPT_MAX_LINES;
use crate::types::{
    ClassFact, CodeDocsError, EndpointFact, FileFacts, FunctionFact, HttpMethod, Result,
};

pub(super) fn extract(content: &str, path: &str) -> Result<FileFacts> {
    let mut parser = TsParser::new();
    parser
        .set_language(&tree_sitter_typescript::LANGUAGE_TSX.into())
        .map_err(|e| CodeDocsError::Parse {
            message: format!("Failed to set TSX grammar: {}", e),
            path: path.to_string(),
        })?;

    let tree = parser
        .parse(content, None)
        .ok_or_else(|| CodeDocsError::Parse {
            message: "Failed to parse module".to_string(),
            path: path.to_string(),
        })?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(CodeDocsError::Parse {
            message: "Module contains syntax errors".to_string(),
            path: path.to_string(),
        });
    }

    let lines: Vec<&str> = content.lines().collect();
    let mut facts = FileFacts::default();

    extract_functions(root, content, &lines, &mut facts);
    extract_arrow_functions(root, content, &lines, &mut facts);
    extract_classes(root, content, &mut facts);
    extract_endpoints(root, content, path, &mut facts);

    Ok(facts)
}

fn extract_functions(root: Node, content: &str, lines: &[&str], facts: &mut FileFacts) {
    let query_str = "(function_declaration) @func";

    if let Ok(query) = Query::new(&tree_sitter_typescript::LANGUAGE_TSX.into(), query_str) {
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, root, content.as_bytes());

        while let Some(m) = matches.next() {
            for cap in m.captures.iter() {
                facts.functions.push(function_fact(cap.node, None, content, lines));
            }
        }
    }
}

/// Arrow functions bound directly to a variable declarator are attributed
/// with that variable's name.
fn extract_arrow_functions(root: Node, content: &str, lines: &[&str], facts: &mut FileFacts) {
    let query_str = r#"
        (variable_declarator
            name: (identifier) @name
            value: (arrow_function) @arrow
        )
    "#;

    if let Ok(query) = Query::new(&tree_sitter_typescript::LANGUAGE_TSX.into(), query_str) {
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, root, content.as_bytes());

        while let Some(m) = matches.next() {
            let mut name: Option<String> = None;
            let mut arrow: Option<Node> = None;

            for cap in m.captures.iter() {
                if cap.index == 0 {
                    name = Some(node_text(cap.node, content).to_string());
                } else if cap.index == 1 {
                    arrow = Some(cap.node);
                }
            }

            if let Some(arrow) = arrow {
                facts
                    .functions
                    .push(function_fact(arrow, name.as_deref(), content, lines));
            }
        }
    }
}

fn extract_classes(root: Node, content: &str, facts: &mut FileFacts) {
    let query_str = r#"
        (class_declaration
            name: (type_identifier) @name
        ) @class
    "#;

    if let Ok(query) = Query::new(&tree_sitter_typescript::LANGUAGE_TSX.into(), query_str) {
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, root, content.as_bytes());

        while let Some(m) = matches.next() {
            let mut name = String::new();
            let mut decl: Option<Node> = None;

            for cap in m.captures.iter() {
                if cap.index == 0 {
                    name = node_text(cap.node, content).to_string();
                } else if cap.index == 1 {
                    decl = Some(cap.node);
                }
            }

            if let Some(decl) = decl {
                facts.classes.push(ClassFact {
                    name,
                    line_start: decl.start_position().row as u32 + 1,
                    line_end: Some(decl.end_position().row as u32 + 1),
                });
            }
        }
    }
}

/// Call expressions whose callee is a member access on one of the five
/// HTTP-verb names, with a literal-string first argument, become endpoint
/// facts. Anything else is ignored.
fn extract_endpoints(root: Node, content: &str, path: &str, facts: &mut FileFacts) {
    let query_str = r#"
        (call_expression
            function: (member_expression
                property: (property_identifier) @verb
            )
        ) @call
    "#;

    if let Ok(query) = Query::new(&tree_sitter_typescript::LANGUAGE_TSX.into(), query_str) {
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, root, content.as_bytes());

        while let Some(m) = matches.next() {
            let mut verb = "";
            let mut call: Option<Node> = None;

            for cap in m.captures.iter() {
                if cap.index == 0 {
                    verb = node_text(cap.node, content);
                } else if cap.index == 1 {
                    call = Some(cap.node);
                }
            }

            let Some(method) = HttpMethod::from_verb(verb) else {
                continue;
            };
            let Some(call) = call else { continue };
            let Some(args) = call.child_by_field_name("arguments") else {
                continue;
            };

            let mut walker = args.walk();
            let arg_nodes: Vec<Node> = args.named_children(&mut walker).collect();

            // First argument must be a literal string
            let Some(first) = arg_nodes.first() else {
                continue;
            };
            if first.kind() != "string" {
                continue;
            }

            let route = node_text(*first, content)
                .trim_matches(|c| c == '"' || c == '\'')
                .to_string();

            let handler = arg_nodes
                .get(1)
                .filter(|n| n.kind() == "identifier")
                .map(|n| node_text(*n, content).to_string())
                .unwrap_or_else(|| "handler".to_string());

            facts.endpoints.push(EndpointFact {
                method,
                path: route,
                handler,
                source_file: path.to_string(),
            });
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn function_fact(node: Node, bound_name: Option<&str>, content: &str, lines: &[&str]) -> FunctionFact {
    let name = bound_name
        .map(str::to_string)
        .or_else(|| {
            node.child_by_field_name("name")
                .map(|n| node_text(n, content).to_string())
        })
        .unwrap_or_else(|| "anonymous".to_string());

    let params = node
        .child_by_field_name("parameters")
        .map(|p| parse_params(node_text(p, content)))
        // Single-identifier arrow parameter without parentheses
        .or_else(|| {
            node.child_by_field_name("parameter")
                .map(|p| vec![node_text(p, content).to_string()])
        })
        .unwrap_or_default();

    let line_start = node.start_position().row as u32 + 1;
    let line_end = node.end_position().row as u32 + 1;

    FunctionFact {
        name,
        params,
        is_async: has_async_keyword(node),
        line_start,
        line_end: Some(line_end),
        excerpt: excerpt(lines, line_start, line_end),
        docstring: None,
    }
}

fn node_text<'a>(node: Node, content: &'a str) -> &'a str {
    node.utf8_text(content.as_bytes()).unwrap_or("")
}

fn has_async_keyword(node: Node) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor).any(|c| c.kind() == "async")
}

/// Source excerpt starting at the declaration line, capped at the
/// configured window.
fn excerpt(lines: &[&str], line_start: u32, line_end: u32) -> String {
    let start = (line_start as usize).saturating_sub(1);
    let count = (line_end.saturating_sub(line_start) as usize + 1).min(EXCERPT_MAX_LINES);
    lines
        .iter()
        .skip(start)
        .take(count)
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split a `(a, b: T, ...rest)` parameter list into plain names.
/// Rest parameters keep a leading `...`; destructuring patterns collapse
/// to the placeholder `param`.
fn parse_params(params_text: &str) -> Vec<String> {
    let inner = params_text
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')');
    if inner.trim().is_empty() {
        return Vec::new();
    }

    split_top_level(inner)
        .into_iter()
        .filter_map(|p| {
            let p = p.trim();
            if p.is_empty() {
                return None;
            }
            if let Some(rest) = p.strip_prefix("...") {
                let name = rest.split(':').next().unwrap_or(rest).trim();
                return Some(format!("...{}", name));
            }
            if p.starts_with('{') || p.starts_with('[') {
                return Some("param".to_string());
            }
            let name = p.split(':').next().unwrap_or(p);
            let name = name.split('=').next().unwrap_or(name);
            Some(name.trim().trim_end_matches('?').to_string())
        })
        .collect()
}

/// Split on commas not nested inside brackets, so destructuring and
/// generic annotations stay in one piece.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    let mut prev = ' ';

    for (i, c) in text.char_indices() {
        match c {
            '(' | '{' | '[' | '<' => depth += 1,
            // '=>' is an arrow, not a closing angle bracket
            '>' if prev != '=' => depth -= 1,
            ')' | '}' | ']' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        prev = c;
    }
    parts.push(&text[start..]);
    parts
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_ok(content: &str) -> FileFacts {
        extract(content, "test.js").expect("extraction failed")
    }

    #[test]
    fn test_three_functions_one_class() {
        let source = r#"function alpha(a, b) {
  return a + b;
}

async function beta() {
  return 1;
}

const gamma = (x) => x * 2;

class Widget {
  render() {}
}
"#;
        let facts = extract_ok(source);

        assert_eq!(facts.functions.len(), 3);
        assert_eq!(facts.functions[0].name, "alpha");
        assert_eq!(facts.functions[0].line_start, 1);
        assert_eq!(facts.functions[0].params, vec!["a", "b"]);
        assert!(!facts.functions[0].is_async);

        assert_eq!(facts.functions[1].name, "beta");
        assert_eq!(facts.functions[1].line_start, 5);
        assert!(facts.functions[1].is_async);

        assert_eq!(facts.functions[2].name, "gamma");

        assert_eq!(facts.classes.len(), 1);
        assert_eq!(facts.classes[0].name, "Widget");
        assert_eq!(facts.classes[0].line_start, 11);
    }

    #[test]
    fn test_arrow_bound_to_const_is_named() {
        let facts = extract_ok("const handle = () => {};\n");
        assert_eq!(facts.functions.len(), 1);
        assert_eq!(facts.functions[0].name, "handle");
        assert!(facts.functions[0].params.is_empty());
    }

    #[test]
    fn test_async_arrow_function() {
        let facts = extract_ok("const load = async (id) => fetch(id);\n");
        assert_eq!(facts.functions.len(), 1);
        assert!(facts.functions[0].is_async);
        assert_eq!(facts.functions[0].params, vec!["id"]);
    }

    #[test]
    fn test_rest_parameter_is_marked() {
        let facts = extract_ok("function spread(first, ...rest) {}\n");
        assert_eq!(facts.functions[0].params, vec!["first", "...rest"]);
    }

    #[test]
    fn test_typescript_annotations_are_stripped() {
        let facts = extract_ok("function typed(count: number, label?: string): void {}\n");
        assert_eq!(facts.functions[0].params, vec!["count", "label"]);
    }

    #[test]
    fn test_endpoint_detection() {
        let facts = extract_ok("router.post('/users', createUser);\n");
        assert_eq!(facts.endpoints.len(), 1);
        let ep = &facts.endpoints[0];
        assert_eq!(ep.method, HttpMethod::Post);
        assert_eq!(ep.path, "/users");
        assert_eq!(ep.handler, "createUser");
        assert_eq!(ep.source_file, "test.js");
    }

    #[test]
    fn test_endpoint_requires_string_literal() {
        let facts = extract_ok("router.get(routePath, handler);\n");
        assert!(facts.endpoints.is_empty());
    }

    #[test]
    fn test_endpoint_ignores_non_verb_members() {
        let facts = extract_ok("app.use('/api', middleware);\n");
        assert!(facts.endpoints.is_empty());
    }

    #[test]
    fn test_endpoint_non_identifier_handler_defaults() {
        let facts = extract_ok("app.delete('/items/:id', async (req, res) => {});\n");
        assert_eq!(facts.endpoints.len(), 1);
        assert_eq!(facts.endpoints[0].handler, "handler");
        assert_eq!(facts.endpoints[0].method, HttpMethod::Delete);
    }

    #[test]
    fn test_excerpt_window_is_capped() {
        let mut source = String::from("function long() {\n");
        for i in 0..40 {
            source.push_str(&format!("  line{};\n", i));
        }
        source.push_str("}\n");

        let facts = extract_ok(&source);
        assert_eq!(facts.functions.len(), 1);
        let excerpt_lines = facts.functions[0].excerpt.lines().count();
        assert_eq!(excerpt_lines, EXCERPT_MAX_LINES);
        assert!(facts.functions[0].excerpt.starts_with("function long()"));
    }

    #[test]
    fn test_syntax_error_fails_parse() {
        let result = extract("function broken( {", "broken.js");
        assert!(result.is_err());
    }

    #[test]
    fn test_jsx_component_parses() {
        let source = "const App = () => <div className=\"root\">hi</div>;\n";
        let facts = extract_ok(source);
        assert_eq!(facts.functions.len(), 1);
        assert_eq!(facts.functions[0].name, "App");
    }
}

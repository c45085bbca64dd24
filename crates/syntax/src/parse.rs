//! Grammar-driven parsing into an owned syntax tree.
//!
//! tree-sitter nodes borrow their tree, so the concrete tree is lowered once
//! into [`SyntaxNode`] values that can be moved, shared and normalized
//! without the parser around.

use tree_sitter::{Node, Parser, Point, Tree, TreeCursor};

use crate::config::SyntaxConfig;
use crate::error::{ParseError, ParseErrorKind};

/// One node of the concrete syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    /// Grammar node kind, e.g. `function_definition` or `+`.
    pub kind: &'static str,
    /// Field name this node fills in its parent, e.g. `name` or `body`.
    pub field: Option<&'static str>,
    /// False for anonymous tokens such as keywords, operators and brackets.
    pub named: bool,
    pub children: Vec<SyntaxNode>,
}

/// Parse Python source. Any error or missing node fails the whole parse.
pub fn parse_source(source: &str, cfg: &SyntaxConfig) -> Result<SyntaxNode, ParseError> {
    cfg.validate()?;

    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::language())
        .map_err(|e| {
            ParseError::at_start(ParseErrorKind::Language {
                message: e.to_string(),
            })
        })?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::at_start(ParseErrorKind::NoTree))?;

    if tree.root_node().has_error() {
        return Err(describe_error(&tree));
    }

    let mut cursor = tree.walk();
    lower(&mut cursor, 0, cfg.max_depth)
}

fn lower(cursor: &mut TreeCursor, depth: usize, limit: usize) -> Result<SyntaxNode, ParseError> {
    let node = cursor.node();
    if depth >= limit {
        return Err(error_at(
            node.start_position(),
            ParseErrorKind::TooDeep { limit },
        ));
    }
    let field = cursor.field_name();

    let mut children = Vec::with_capacity(node.child_count());
    if cursor.goto_first_child() {
        loop {
            children.push(lower(cursor, depth + 1, limit)?);
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }

    Ok(SyntaxNode {
        kind: node.kind(),
        field,
        named: node.is_named(),
        children,
    })
}

fn describe_error(tree: &Tree) -> ParseError {
    match first_error_node(tree) {
        Some(node) if node.is_missing() => error_at(
            node.start_position(),
            ParseErrorKind::Missing {
                expected: node.kind().to_string(),
            },
        ),
        Some(node) => error_at(node.start_position(), ParseErrorKind::UnexpectedSyntax),
        None => ParseError::at_start(ParseErrorKind::UnexpectedSyntax),
    }
}

/// First ERROR or MISSING node in document order, found without recursion.
fn first_error_node(tree: &Tree) -> Option<Node<'_>> {
    let mut cursor = tree.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

fn error_at(point: Point, kind: ParseErrorKind) -> ParseError {
    ParseError {
        line: point.row + 1,
        column: point.column + 1,
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(node: &SyntaxNode) -> Vec<&'static str> {
        node.children.iter().map(|c| c.kind).collect()
    }

    #[test]
    fn lowers_module_with_fields() {
        let tree = parse_source("def f(x):\n    return x\n", &SyntaxConfig::default()).unwrap();
        assert_eq!(tree.kind, "module");
        assert_eq!(kinds(&tree), vec!["function_definition"]);

        let func = &tree.children[0];
        let name = func
            .children
            .iter()
            .find(|c| c.field == Some("name"))
            .unwrap();
        assert_eq!(name.kind, "identifier");
        assert!(func.children.iter().any(|c| c.kind == "def" && !c.named));
    }

    #[test]
    fn empty_source_is_empty_module() {
        let tree = parse_source("", &SyntaxConfig::default()).unwrap();
        assert_eq!(tree.kind, "module");
        assert!(tree.children.is_empty());
    }

    #[test]
    fn syntax_error_reports_line() {
        let src = "a = 1\nb = 2\nif a\n    pass\n";
        let err = parse_source(src, &SyntaxConfig::default()).unwrap_err();
        assert!((3..=4).contains(&err.line), "{err:?}");
        assert!(matches!(
            err.kind,
            ParseErrorKind::UnexpectedSyntax | ParseErrorKind::Missing { .. }
        ));
    }

    #[test]
    fn depth_limit_enforced() {
        let src = format!("x = {}1{}\n", "(".repeat(60), ")".repeat(60));
        let cfg = SyntaxConfig::new().with_max_depth(40);
        let err = parse_source(&src, &cfg).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TooDeep { limit: 40 });
        assert!(parse_source(&src, &SyntaxConfig::default()).is_ok());
    }

    #[test]
    fn invalid_config_rejected() {
        let cfg = SyntaxConfig::new().with_max_depth(0);
        assert!(matches!(
            parse_source("pass", &cfg).unwrap_err().kind,
            ParseErrorKind::InvalidConfig { .. }
        ));
    }
}

//! Identifier-agnostic structural trees.
//!
//! [`normalize`] is a pure recursive transform from [`SyntaxNode`] to
//! [`TreeNode`]. Names are replaced by the role they play, literals by their
//! type, parentheses disappear and comments are dropped. Child order is kept.

use crate::parse::SyntaxNode;

/// What an identifier is used for, decided by its grammar position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameRole {
    FunctionName,
    ClassName,
    Parameter,
    AttributeName,
    KeywordName,
    Variable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Int,
    Float,
    Str,
    Bool,
    None,
}

/// Structural label of a normalized node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Module,
    Block,
    FunctionDef,
    ClassDef,
    Decorated,
    Decorator,
    Parameters,
    DefaultParameter,
    TypedParameter,
    SplatParameter,
    If,
    Elif,
    Else,
    For,
    While,
    Try,
    Except,
    Finally,
    With,
    WithItem,
    Match,
    Case,
    Return,
    Assign,
    AugAssign,
    ExprStmt,
    Assert,
    Delete,
    Global,
    Nonlocal,
    Import,
    ImportFrom,
    Raise,
    Pass,
    Break,
    Continue,
    Call,
    Arguments,
    KeywordArg,
    Splat,
    BinaryOp,
    BoolOp,
    Compare,
    UnaryOp,
    Not,
    Attribute,
    Subscript,
    Slice,
    Lambda,
    Conditional,
    NamedExpr,
    Comprehension,
    ForIn,
    IfClause,
    Yield,
    Await,
    List,
    Tuple,
    Dict,
    Set,
    Pair,
    /// An anonymous operator token inside an operator node, e.g. `+` or `not in`.
    Operator(&'static str),
    Name(NameRole),
    Literal(LiteralKind),
    /// Any other named grammar node, kept by kind.
    Other(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub label: Label,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(label: Label) -> Self {
        Self {
            label,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// One element of the depth-first serialization of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Node(Label),
    /// Closes the subtree of the most recent interior node.
    End,
}

/// Normalized tree of one source file. The root is always [`Label::Module`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTree {
    pub root: TreeNode,
}

impl NormalizedTree {
    /// Depth-first symbol sequence: one symbol per node and an [`Symbol::End`]
    /// after the children of every interior node. The module root itself is
    /// not emitted, so a file with no statements serializes to nothing.
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut out = Vec::new();
        for child in &self.root.children {
            serialize(child, &mut out);
        }
        out
    }

    pub fn node_count(&self) -> usize {
        count(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }
}

fn serialize(node: &TreeNode, out: &mut Vec<Symbol>) {
    out.push(Symbol::Node(node.label));
    if !node.is_leaf() {
        for child in &node.children {
            serialize(child, out);
        }
        out.push(Symbol::End);
    }
}

fn count(node: &TreeNode) -> usize {
    1 + node.children.iter().map(count).sum::<usize>()
}

const OPERATOR_PARENTS: &[&str] = &[
    "binary_operator",
    "boolean_operator",
    "comparison_operator",
    "unary_operator",
    "augmented_assignment",
];

#[derive(Clone, Copy)]
struct Scope {
    parent: &'static str,
    in_parameters: bool,
}

/// Normalize a parsed module.
pub fn normalize(module: &SyntaxNode) -> NormalizedTree {
    let mut children = Vec::with_capacity(module.children.len());
    for child in &module.children {
        lower(
            child,
            Scope {
                parent: module.kind,
                in_parameters: false,
            },
            &mut children,
        );
    }
    NormalizedTree {
        root: TreeNode {
            label: Label::Module,
            children,
        },
    }
}

fn lower(node: &SyntaxNode, scope: Scope, out: &mut Vec<TreeNode>) {
    let literal = match node.kind {
        "comment" => return,
        "parenthesized_expression" => {
            let inner = Scope {
                parent: node.kind,
                in_parameters: false,
            };
            for child in &node.children {
                lower(child, inner, out);
            }
            return;
        }
        "identifier" | "keyword_identifier" => {
            out.push(TreeNode::leaf(Label::Name(role_of(node, scope))));
            return;
        }
        "string" | "concatenated_string" => Some(LiteralKind::Str),
        "integer" => Some(LiteralKind::Int),
        "float" => Some(LiteralKind::Float),
        "true" | "false" => Some(LiteralKind::Bool),
        "none" => Some(LiteralKind::None),
        _ => None,
    };
    if let Some(kind) = literal {
        out.push(TreeNode::leaf(Label::Literal(kind)));
        return;
    }

    if !node.named {
        if OPERATOR_PARENTS.contains(&scope.parent) {
            out.push(TreeNode::leaf(Label::Operator(node.kind)));
        }
        return;
    }

    let mut children = Vec::with_capacity(node.children.len());
    for child in &node.children {
        let child_scope = Scope {
            parent: node.kind,
            in_parameters: parameter_context(node.kind, child, scope.in_parameters),
        };
        lower(child, child_scope, &mut children);
    }
    out.push(TreeNode {
        label: structural_label(node.kind),
        children,
    });
}

fn role_of(node: &SyntaxNode, scope: Scope) -> NameRole {
    match (scope.parent, node.field) {
        ("function_definition", Some("name")) => NameRole::FunctionName,
        ("class_definition", Some("name")) => NameRole::ClassName,
        ("attribute", Some("attribute")) => NameRole::AttributeName,
        ("keyword_argument", Some("name")) => NameRole::KeywordName,
        _ if scope.in_parameters => NameRole::Parameter,
        _ => NameRole::Variable,
    }
}

/// Whether `child` of a `parent` node still declares parameters. Default
/// values and annotations are ordinary expressions.
fn parameter_context(parent: &'static str, child: &SyntaxNode, inherited: bool) -> bool {
    match parent {
        "parameters" | "lambda_parameters" => true,
        "default_parameter" | "typed_parameter" | "typed_default_parameter" => {
            inherited && !matches!(child.field, Some("value") | Some("type"))
        }
        "list_splat_pattern" | "dictionary_splat_pattern" | "tuple_pattern" => inherited,
        _ => false,
    }
}

fn structural_label(kind: &'static str) -> Label {
    match kind {
        "module" => Label::Module,
        "block" => Label::Block,
        "function_definition" => Label::FunctionDef,
        "class_definition" => Label::ClassDef,
        "decorated_definition" => Label::Decorated,
        "decorator" => Label::Decorator,
        "parameters" | "lambda_parameters" => Label::Parameters,
        "default_parameter" | "typed_default_parameter" => Label::DefaultParameter,
        "typed_parameter" => Label::TypedParameter,
        "list_splat_pattern" | "dictionary_splat_pattern" => Label::SplatParameter,
        "if_statement" => Label::If,
        "elif_clause" => Label::Elif,
        "else_clause" => Label::Else,
        "for_statement" => Label::For,
        "while_statement" => Label::While,
        "try_statement" => Label::Try,
        "except_clause" | "except_group_clause" => Label::Except,
        "finally_clause" => Label::Finally,
        "with_statement" => Label::With,
        "with_item" => Label::WithItem,
        "match_statement" => Label::Match,
        "case_clause" => Label::Case,
        "return_statement" => Label::Return,
        "assignment" => Label::Assign,
        "augmented_assignment" => Label::AugAssign,
        "expression_statement" => Label::ExprStmt,
        "assert_statement" => Label::Assert,
        "delete_statement" => Label::Delete,
        "global_statement" => Label::Global,
        "nonlocal_statement" => Label::Nonlocal,
        "import_statement" => Label::Import,
        "import_from_statement" | "future_import_statement" => Label::ImportFrom,
        "raise_statement" => Label::Raise,
        "pass_statement" => Label::Pass,
        "break_statement" => Label::Break,
        "continue_statement" => Label::Continue,
        "call" => Label::Call,
        "argument_list" => Label::Arguments,
        "keyword_argument" => Label::KeywordArg,
        "list_splat" | "dictionary_splat" => Label::Splat,
        "binary_operator" => Label::BinaryOp,
        "boolean_operator" => Label::BoolOp,
        "comparison_operator" => Label::Compare,
        "unary_operator" => Label::UnaryOp,
        "not_operator" => Label::Not,
        "attribute" => Label::Attribute,
        "subscript" => Label::Subscript,
        "slice" => Label::Slice,
        "lambda" => Label::Lambda,
        "conditional_expression" => Label::Conditional,
        "named_expression" => Label::NamedExpr,
        "list_comprehension"
        | "set_comprehension"
        | "dictionary_comprehension"
        | "generator_expression" => Label::Comprehension,
        "for_in_clause" => Label::ForIn,
        "if_clause" => Label::IfClause,
        "yield" => Label::Yield,
        "await" => Label::Await,
        "list" => Label::List,
        "tuple" | "pattern_list" | "expression_list" => Label::Tuple,
        "dictionary" => Label::Dict,
        "set" => Label::Set,
        "pair" => Label::Pair,
        other => Label::Other(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_source, SyntaxConfig};

    fn tree(src: &str) -> NormalizedTree {
        normalize(&parse_source(src, &SyntaxConfig::default()).unwrap())
    }

    fn collect(node: &TreeNode, pick: &impl Fn(Label) -> bool, out: &mut Vec<Label>) {
        if pick(node.label) {
            out.push(node.label);
        }
        for child in &node.children {
            collect(child, pick, out);
        }
    }

    fn names(src: &str) -> Vec<NameRole> {
        let mut labels = Vec::new();
        collect(&tree(src).root, &|l| matches!(l, Label::Name(_)), &mut labels);
        labels
            .into_iter()
            .filter_map(|l| match l {
                Label::Name(role) => Some(role),
                _ => None,
            })
            .collect()
    }

    fn literals(src: &str) -> Vec<LiteralKind> {
        let mut labels = Vec::new();
        collect(&tree(src).root, &|l| matches!(l, Label::Literal(_)), &mut labels);
        labels
            .into_iter()
            .filter_map(|l| match l {
                Label::Literal(kind) => Some(kind),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn renaming_leaves_tree_unchanged() {
        let a = "def area(w, h):\n    total = w * h\n    return total\n";
        let b = "def surface(width, height):\n    result = width * height  # same\n    return result\n";
        assert_eq!(tree(a), tree(b));
        assert_eq!(tree(a).symbols(), tree(b).symbols());
    }

    #[test]
    fn identifier_roles_follow_grammar_position() {
        use NameRole::*;
        let roles = names("def f(a, b=1, *args, **kw):\n    return a.b(c=d)\n");
        assert_eq!(
            roles,
            vec![
                FunctionName,
                Parameter,
                Parameter,
                Parameter,
                Parameter,
                Variable,
                AttributeName,
                KeywordName,
                Variable
            ]
        );
    }

    #[test]
    fn default_values_are_not_parameters() {
        use NameRole::*;
        let roles = names("def f(a=b):\n    pass\n");
        assert_eq!(roles, vec![FunctionName, Parameter, Variable]);
    }

    #[test]
    fn class_and_lambda_roles() {
        use NameRole::*;
        let roles = names("class Point(Base):\n    scale = lambda v: v\n");
        assert_eq!(
            roles,
            vec![ClassName, Variable, Variable, Parameter, Variable]
        );
    }

    #[test]
    fn literal_kinds() {
        use LiteralKind::*;
        assert_eq!(
            literals("a = [1, 2.5, 'x', True, None, \"y\" 'z']\n"),
            vec![Int, Float, Str, Bool, None, Str]
        );
    }

    #[test]
    fn parentheses_unwrapped() {
        assert_eq!(tree("x = (a + b)\n"), tree("x = a + b\n"));
        assert_eq!(tree("y = ((f(x)))\n"), tree("y = f(x)\n"));
    }

    #[test]
    fn operators_kept() {
        assert_ne!(tree("x = a + b\n"), tree("x = a - b\n"));
        assert_ne!(tree("x = a in b\n"), tree("x = a not in b\n"));
        assert_ne!(tree("x += 1\n"), tree("x -= 1\n"));
    }

    #[test]
    fn structure_differences_detected() {
        assert_ne!(
            tree("for i in xs:\n    f(i)\n"),
            tree("while i:\n    f(i)\n")
        );
    }

    #[test]
    fn symbols_mark_subtree_ends() {
        let t = tree("pass\nbreak\n");
        assert_eq!(
            t.symbols(),
            vec![Symbol::Node(Label::Pass), Symbol::Node(Label::Break)]
        );

        let t = tree("return x\n");
        assert_eq!(
            t.symbols(),
            vec![
                Symbol::Node(Label::Return),
                Symbol::Node(Label::Name(NameRole::Variable)),
                Symbol::End,
            ]
        );
    }

    #[test]
    fn empty_module_has_no_symbols() {
        let t = tree("# only a comment\n");
        assert!(t.is_empty());
        assert!(t.symbols().is_empty());
        assert_eq!(t.node_count(), 1);
    }
}

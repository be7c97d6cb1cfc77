// AST data structures for c-funcdefs.
// A generic, owned tree lowered from the C parser's output so the visitor
// can walk every construct the same way.

use serde::Serialize;
use std::fmt;

/// Source coordinate of a node: file, 1-based line, optional 1-based column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Coord {
    pub file: String,
    pub line: usize,
    pub column: Option<usize>,
}

impl Coord {
    pub fn new(file: impl Into<String>, line: usize, column: Option<usize>) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(column) => write!(f, "{}:{}:{}", self.file, self.line, column),
            None => write!(f, "{}:{}", self.file, self.line),
        }
    }
}

/// Node kinds produced by lowering (closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AstNodeKind {
    TranslationUnit,
    FunctionDefinition,
    Declaration,
    Declarator,
    ParameterDeclaration,
    StructType,
    EnumType,
    Enumerator,
    InitializerList,
    StaticAssert,
    // Statements
    Compound,
    ExpressionStatement,
    If,
    Switch,
    While,
    DoWhile,
    For,
    Label,
    Case,
    Default,
    Goto,
    Continue,
    Break,
    Return,
    Asm,
    // Expressions
    Identifier,
    Constant,
    StringLiteral,
    Call,
    Member,
    UnaryOp,
    BinaryOp,
    Conditional,
    Cast,
    SizeOf,
    Comma,
    StatementExpression,
    /// Constructs the lowering keeps only as opaque leaves.
    Other,
}

impl AstNodeKind {
    pub const ALL: [AstNodeKind; 38] = [
        AstNodeKind::TranslationUnit,
        AstNodeKind::FunctionDefinition,
        AstNodeKind::Declaration,
        AstNodeKind::Declarator,
        AstNodeKind::ParameterDeclaration,
        AstNodeKind::StructType,
        AstNodeKind::EnumType,
        AstNodeKind::Enumerator,
        AstNodeKind::InitializerList,
        AstNodeKind::StaticAssert,
        AstNodeKind::Compound,
        AstNodeKind::ExpressionStatement,
        AstNodeKind::If,
        AstNodeKind::Switch,
        AstNodeKind::While,
        AstNodeKind::DoWhile,
        AstNodeKind::For,
        AstNodeKind::Label,
        AstNodeKind::Case,
        AstNodeKind::Default,
        AstNodeKind::Goto,
        AstNodeKind::Continue,
        AstNodeKind::Break,
        AstNodeKind::Return,
        AstNodeKind::Asm,
        AstNodeKind::Identifier,
        AstNodeKind::Constant,
        AstNodeKind::StringLiteral,
        AstNodeKind::Call,
        AstNodeKind::Member,
        AstNodeKind::UnaryOp,
        AstNodeKind::BinaryOp,
        AstNodeKind::Conditional,
        AstNodeKind::Cast,
        AstNodeKind::SizeOf,
        AstNodeKind::Comma,
        AstNodeKind::StatementExpression,
        AstNodeKind::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AstNodeKind::TranslationUnit => "TranslationUnit",
            AstNodeKind::FunctionDefinition => "FunctionDefinition",
            AstNodeKind::Declaration => "Declaration",
            AstNodeKind::Declarator => "Declarator",
            AstNodeKind::ParameterDeclaration => "ParameterDeclaration",
            AstNodeKind::StructType => "StructType",
            AstNodeKind::EnumType => "EnumType",
            AstNodeKind::Enumerator => "Enumerator",
            AstNodeKind::InitializerList => "InitializerList",
            AstNodeKind::StaticAssert => "StaticAssert",
            AstNodeKind::Compound => "Compound",
            AstNodeKind::ExpressionStatement => "ExpressionStatement",
            AstNodeKind::If => "If",
            AstNodeKind::Switch => "Switch",
            AstNodeKind::While => "While",
            AstNodeKind::DoWhile => "DoWhile",
            AstNodeKind::For => "For",
            AstNodeKind::Label => "Label",
            AstNodeKind::Case => "Case",
            AstNodeKind::Default => "Default",
            AstNodeKind::Goto => "Goto",
            AstNodeKind::Continue => "Continue",
            AstNodeKind::Break => "Break",
            AstNodeKind::Return => "Return",
            AstNodeKind::Asm => "Asm",
            AstNodeKind::Identifier => "Identifier",
            AstNodeKind::Constant => "Constant",
            AstNodeKind::StringLiteral => "StringLiteral",
            AstNodeKind::Call => "Call",
            AstNodeKind::Member => "Member",
            AstNodeKind::UnaryOp => "UnaryOp",
            AstNodeKind::BinaryOp => "BinaryOp",
            AstNodeKind::Conditional => "Conditional",
            AstNodeKind::Cast => "Cast",
            AstNodeKind::SizeOf => "SizeOf",
            AstNodeKind::Comma => "Comma",
            AstNodeKind::StatementExpression => "StatementExpression",
            AstNodeKind::Other => "Other",
        }
    }
}

impl fmt::Display for AstNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A named child slot. Holds zero, one or many nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildSlot {
    pub name: &'static str,
    pub nodes: Vec<AstNode>,
}

/// A node in the abstract syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    pub kind: AstNodeKind,
    pub name: Option<String>,
    /// Rendered type, operator or literal text, depending on the kind.
    pub detail: Option<String>,
    pub coord: Option<Coord>,
    pub slots: Vec<ChildSlot>,
}

impl AstNode {
    pub fn new(kind: AstNodeKind) -> Self {
        Self {
            kind,
            name: None,
            detail: None,
            coord: None,
            slots: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_coord(mut self, coord: Option<Coord>) -> Self {
        self.coord = coord;
        self
    }

    /// Append a slot. Slots keep the order in which they are added.
    pub fn with_slot(mut self, name: &'static str, nodes: Vec<AstNode>) -> Self {
        self.slots.push(ChildSlot { name, nodes });
        self
    }

    pub fn with_child(self, name: &'static str, node: AstNode) -> Self {
        self.with_slot(name, vec![node])
    }

    pub fn with_optional_child(self, name: &'static str, node: Option<AstNode>) -> Self {
        self.with_slot(name, node.into_iter().collect())
    }

    pub fn slot(&self, name: &str) -> Option<&[AstNode]> {
        self.slots
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.nodes.as_slice())
    }

    /// First node of a slot, for slots that hold at most one child.
    pub fn child(&self, name: &str) -> Option<&AstNode> {
        self.slot(name).and_then(|nodes| nodes.first())
    }

    /// All direct children in slot order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = &AstNode> {
        self.slots.iter().flat_map(|s| s.nodes.iter())
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children());
        }
        count
    }

    /// Short one-line rendering, e.g. `Constant(42)` or `Identifier(x)`.
    pub fn summary(&self) -> String {
        match (&self.name, &self.detail) {
            (Some(name), _) => format!("{}({})", self.kind, name),
            (None, Some(detail)) => format!("{}({})", self.kind, detail),
            (None, None) => self.kind.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_display() {
        assert_eq!(Coord::new("a.c", 3, Some(7)).to_string(), "a.c:3:7");
        assert_eq!(Coord::new("a.c", 3, None).to_string(), "a.c:3");
    }

    #[test]
    fn test_children_follow_slot_order() {
        let node = AstNode::new(AstNodeKind::BinaryOp)
            .with_child("lhs", AstNode::new(AstNodeKind::Identifier).with_name("a"))
            .with_slot("empty", vec![])
            .with_child("rhs", AstNode::new(AstNodeKind::Constant).with_detail("1"));
        let names: Vec<String> = node.children().map(|c| c.summary()).collect();
        assert_eq!(names, vec!["Identifier(a)", "Constant(1)"]);
        assert_eq!(node.subtree_len(), 3);
        assert!(node.slot("empty").unwrap().is_empty());
        assert!(node.child("missing").is_none());
    }

    #[test]
    fn test_all_kinds_have_distinct_names() {
        let mut names: Vec<&str> = AstNodeKind::ALL.iter().map(|k| k.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), AstNodeKind::ALL.len());
    }
}

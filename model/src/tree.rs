use std::fmt;

use crate::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    Assign,
    If,
    While,
    Print,
    Function,
    Param,
    BinOp,
    Num,
    Id,
    Call,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Program => "PROGRAM",
            NodeKind::Assign => "ASSIGN",
            NodeKind::If => "IF",
            NodeKind::While => "WHILE",
            NodeKind::Print => "PRINT",
            NodeKind::Function => "FUNCTION",
            NodeKind::Param => "PARAM",
            NodeKind::BinOp => "BIN_OP",
            NodeKind::Num => "NUM",
            NodeKind::Id => "ID",
            NodeKind::Call => "CALL",
        }
    }

    pub fn is_statement(self) -> bool {
        matches!(
            self,
            NodeKind::Assign | NodeKind::If | NodeKind::While | NodeKind::Print | NodeKind::Function
        )
    }

    pub fn is_expression(self) -> bool {
        matches!(self, NodeKind::BinOp | NodeKind::Num | NodeKind::Id | NodeKind::Call)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Literal payload carried by a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeValue {
    /// Variable, parameter or function name.
    Name(String),
    /// Canonical decimal text of an integer literal.
    Number(String),
    /// Operator token kind of a `BIN_OP`.
    Operator(TokenKind),
}

impl fmt::Display for NodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeValue::Name(s) | NodeValue::Number(s) => f.write_str(s),
            NodeValue::Operator(op) => write!(f, "{op}"),
        }
    }
}

/// Generic labeled tree node. A parent owns its children outright, so the
/// structure is always a strict tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub value: Option<NodeValue>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn with_children(kind: NodeKind, children: Vec<Node>) -> Self {
        Self { kind, value: None, children }
    }

    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn program(statements: Vec<Node>) -> Self {
        Self::with_children(NodeKind::Program, statements)
    }

    pub fn id(name: impl Into<String>) -> Self {
        Self { kind: NodeKind::Id, value: Some(NodeValue::Name(name.into())), children: Vec::new() }
    }

    pub fn param(name: impl Into<String>) -> Self {
        Self { kind: NodeKind::Param, value: Some(NodeValue::Name(name.into())), children: Vec::new() }
    }

    pub fn num(digits: impl Into<String>) -> Self {
        Self { kind: NodeKind::Num, value: Some(NodeValue::Number(digits.into())), children: Vec::new() }
    }

    pub fn bin_op(op: TokenKind, left: Node, right: Node) -> Self {
        Self {
            kind: NodeKind::BinOp,
            value: Some(NodeValue::Operator(op)),
            children: vec![left, right],
        }
    }

    pub fn assign(target: impl Into<String>, value: Node) -> Self {
        Self::with_children(NodeKind::Assign, vec![Node::id(target), value])
    }

    pub fn print(value: Node) -> Self {
        Self::with_children(NodeKind::Print, vec![value])
    }

    pub fn if_(cond: Node, then_branch: Node, else_branch: Option<Node>) -> Self {
        let mut children = vec![cond, then_branch];
        children.extend(else_branch);
        Self::with_children(NodeKind::If, children)
    }

    pub fn while_(cond: Node, body: Node) -> Self {
        Self::with_children(NodeKind::While, vec![cond, body])
    }

    pub fn call(callee: impl Into<String>, args: Vec<Node>) -> Self {
        let mut children = Vec::with_capacity(args.len() + 1);
        children.push(Node::id(callee));
        children.extend(args);
        Self::with_children(NodeKind::Call, children)
    }

    pub fn function(name: impl Into<String>, params: Vec<String>, body: Node) -> Self {
        let mut children = Vec::with_capacity(params.len() + 2);
        children.push(Node::id(name));
        children.extend(params.into_iter().map(Node::param));
        children.push(body);
        Self::with_children(NodeKind::Function, children)
    }

    /// Name carried by `ID` and `PARAM` nodes.
    pub fn name(&self) -> Option<&str> {
        match &self.value {
            Some(NodeValue::Name(name)) => Some(name),
            _ => None,
        }
    }

    pub fn number(&self) -> Option<&str> {
        match &self.value {
            Some(NodeValue::Number(digits)) => Some(digits),
            _ => None,
        }
    }

    pub fn operator(&self) -> Option<TokenKind> {
        match &self.value {
            Some(NodeValue::Operator(op)) => Some(*op),
            _ => None,
        }
    }

    /// Parameter nodes of a `FUNCTION`: everything between the name and the body.
    pub fn function_params(&self) -> &[Node] {
        match self.children.len() {
            0..=2 => &[],
            n => &self.children[1..n - 1],
        }
    }

    /// Every `FUNCTION` node in the tree in pre-order, including declarations
    /// nested in other statements.
    pub fn functions(&self) -> Vec<&Node> {
        let mut found = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.kind == NodeKind::Function {
                found.push(node);
            }
            stack.extend(node.children.iter().rev());
        }
        found
    }
}

impl fmt::Display for Node {
    /// S-expression rendering, e.g. `BIN_OP(PLUS, NUM(1), ID(x))`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if self.value.is_none() && self.children.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        let mut first = true;
        if let Some(value) = &self.value {
            write!(f, "{value}")?;
            first = false;
        }
        for child in &self.children {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{child}")?;
            first = false;
        }
        f.write_str(")")
    }
}

// Structural validation of trees against the per-kind child layout.

use crate::{Node, NodeKind, NodeValue, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("root must be PROGRAM, found {0}")]
    NotAProgram(NodeKind),
    #[error("{kind} expects {expected} children, found {found}")]
    ChildCount { kind: NodeKind, expected: &'static str, found: usize },
    #[error("{parent} child {index} must be {expected}, found {found}")]
    ChildKind { parent: NodeKind, index: usize, expected: &'static str, found: NodeKind },
    #[error("{kind} node is missing its {expected} value")]
    MissingValue { kind: NodeKind, expected: &'static str },
    #[error("{kind} node must not carry a value")]
    UnexpectedValue { kind: NodeKind },
    #[error("BIN_OP operator {0} is not a binary operator")]
    InvalidOperator(TokenKind),
    #[error("NUM literal {0:?} is not a canonical in-range decimal")]
    InvalidNumber(String),
    #[error("{kind} name {name:?} is not a valid identifier")]
    InvalidName { kind: NodeKind, name: String },
}

type ShapeResult = Result<(), ShapeError>;

impl Node {
    /// Checks that `self` is a `PROGRAM` whose whole subtree matches the
    /// fixed child layout of each kind.
    pub fn check_shape(&self) -> ShapeResult {
        if self.kind != NodeKind::Program {
            return Err(ShapeError::NotAProgram(self.kind));
        }
        expect_no_value(self)?;
        for (index, stmt) in self.children.iter().enumerate() {
            expect_statement(self.kind, index, stmt)?;
        }
        Ok(())
    }
}

fn expect_statement(parent: NodeKind, index: usize, node: &Node) -> ShapeResult {
    if !node.kind.is_statement() {
        return Err(ShapeError::ChildKind { parent, index, expected: "a statement", found: node.kind });
    }
    check_statement(node)
}

fn expect_expression(parent: NodeKind, index: usize, node: &Node) -> ShapeResult {
    if !node.kind.is_expression() {
        return Err(ShapeError::ChildKind { parent, index, expected: "an expression", found: node.kind });
    }
    check_expression(node)
}

fn expect_kind(parent: NodeKind, index: usize, node: &Node, kind: NodeKind, expected: &'static str) -> ShapeResult {
    if node.kind != kind {
        return Err(ShapeError::ChildKind { parent, index, expected, found: node.kind });
    }
    Ok(())
}

fn expect_count(node: &Node, ok: bool, expected: &'static str) -> ShapeResult {
    if !ok {
        return Err(ShapeError::ChildCount { kind: node.kind, expected, found: node.children.len() });
    }
    Ok(())
}

fn expect_no_value(node: &Node) -> ShapeResult {
    match node.value {
        Some(_) => Err(ShapeError::UnexpectedValue { kind: node.kind }),
        None => Ok(()),
    }
}

fn check_statement(node: &Node) -> ShapeResult {
    expect_no_value(node)?;
    let children = &node.children;
    match node.kind {
        NodeKind::Assign => {
            expect_count(node, children.len() == 2, "2")?;
            expect_kind(node.kind, 0, &children[0], NodeKind::Id, "ID")?;
            check_leaf(&children[0])?;
            expect_expression(node.kind, 1, &children[1])
        }
        NodeKind::If => {
            expect_count(node, matches!(children.len(), 2 | 3), "2 or 3")?;
            expect_expression(node.kind, 0, &children[0])?;
            for (index, branch) in children.iter().enumerate().skip(1) {
                expect_statement(node.kind, index, branch)?;
            }
            Ok(())
        }
        NodeKind::While => {
            expect_count(node, children.len() == 2, "2")?;
            expect_expression(node.kind, 0, &children[0])?;
            expect_statement(node.kind, 1, &children[1])
        }
        NodeKind::Print => {
            expect_count(node, children.len() == 1, "1")?;
            expect_expression(node.kind, 0, &children[0])
        }
        NodeKind::Function => {
            expect_count(node, children.len() >= 2, "at least 2")?;
            expect_kind(node.kind, 0, &children[0], NodeKind::Id, "ID")?;
            check_leaf(&children[0])?;
            let last = children.len() - 1;
            for (index, param) in children.iter().enumerate().take(last).skip(1) {
                expect_kind(node.kind, index, param, NodeKind::Param, "PARAM")?;
                check_leaf(param)?;
            }
            expect_statement(node.kind, last, &children[last])
        }
        _ => unreachable!("caller only passes statement kinds"),
    }
}

fn check_expression(node: &Node) -> ShapeResult {
    match node.kind {
        NodeKind::Num | NodeKind::Id => check_leaf(node),
        NodeKind::BinOp => {
            match node.value {
                Some(NodeValue::Operator(op)) if op.is_binary_operator() => {}
                Some(NodeValue::Operator(op)) => return Err(ShapeError::InvalidOperator(op)),
                _ => return Err(ShapeError::MissingValue { kind: node.kind, expected: "operator" }),
            }
            expect_count(node, node.children.len() == 2, "2")?;
            expect_expression(node.kind, 0, &node.children[0])?;
            expect_expression(node.kind, 1, &node.children[1])
        }
        NodeKind::Call => {
            expect_no_value(node)?;
            expect_count(node, !node.children.is_empty(), "at least 1")?;
            expect_kind(node.kind, 0, &node.children[0], NodeKind::Id, "ID")?;
            check_leaf(&node.children[0])?;
            for (index, arg) in node.children.iter().enumerate().skip(1) {
                expect_expression(node.kind, index, arg)?;
            }
            Ok(())
        }
        _ => unreachable!("caller only passes expression kinds"),
    }
}

/// `NUM`, `ID` and `PARAM` carry a literal and no children.
fn check_leaf(node: &Node) -> ShapeResult {
    expect_count(node, node.children.is_empty(), "0")?;
    match (node.kind, &node.value) {
        (NodeKind::Num, Some(NodeValue::Number(digits))) => {
            let canonical = !digits.is_empty()
                && digits.bytes().all(|b| b.is_ascii_digit())
                && (digits == "0" || !digits.starts_with('0'))
                && digits.parse::<i64>().is_ok();
            if canonical { Ok(()) } else { Err(ShapeError::InvalidNumber(digits.clone())) }
        }
        (NodeKind::Id | NodeKind::Param, Some(NodeValue::Name(name))) => {
            let mut bytes = name.bytes();
            let valid = bytes.next().is_some_and(|b| b.is_ascii_alphabetic())
                && bytes.all(|b| b.is_ascii_alphanumeric());
            if valid {
                Ok(())
            } else {
                Err(ShapeError::InvalidName { kind: node.kind, name: name.clone() })
            }
        }
        (NodeKind::Num, _) => Err(ShapeError::MissingValue { kind: node.kind, expected: "number" }),
        (kind, _) => Err(ShapeError::MissingValue { kind, expected: "name" }),
    }
}

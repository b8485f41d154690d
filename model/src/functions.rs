// Function declarations collected from a whole program. Declarations are
// hoisted: a function is callable from anywhere in the program regardless of
// where (or how deeply nested) its FUNCTION statement appears.

use std::collections::HashMap;

use crate::{Node, NodeKind};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FunctionError {
    #[error("function {0} is declared more than once")]
    Duplicate(String),
    #[error("function {function} declares parameter {param} more than once")]
    DuplicateParameter { function: String, param: String },
    #[error("call to undeclared function {0}")]
    Unknown(String),
    #[error("function {function} takes {expected} argument(s) but {found} were supplied")]
    ArityMismatch { function: String, expected: usize, found: usize },
}

#[derive(Debug, Clone)]
pub struct FunctionDecl<'a> {
    pub name: &'a str,
    pub params: Vec<&'a str>,
    pub body: &'a Node,
}

/// Declarations in source (pre-order) order, indexed by name.
#[derive(Debug, Clone, Default)]
pub struct FunctionTable<'a> {
    decls: Vec<FunctionDecl<'a>>,
    index: HashMap<&'a str, usize>,
}

impl<'a> FunctionTable<'a> {
    /// Collect every declaration in `program`. Expects a tree that already
    /// passed `check_shape`.
    pub fn build(program: &'a Node) -> Result<Self, FunctionError> {
        let mut table = FunctionTable::default();
        for node in program.functions() {
            let name = node.children[0].name().unwrap_or_default();
            let mut params: Vec<&'a str> = Vec::new();
            for param in node.function_params() {
                let param = param.name().unwrap_or_default();
                if params.contains(&param) {
                    return Err(FunctionError::DuplicateParameter {
                        function: name.to_string(),
                        param: param.to_string(),
                    });
                }
                params.push(param);
            }
            if table.index.contains_key(name) {
                return Err(FunctionError::Duplicate(name.to_string()));
            }
            let body = &node.children[node.children.len() - 1];
            table.index.insert(name, table.decls.len());
            table.decls.push(FunctionDecl { name, params, body });
        }
        Ok(table)
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDecl<'a>> {
        self.index.get(name).map(|&i| &self.decls[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunctionDecl<'a>> {
        self.decls.iter()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Resolve a call site against the table.
    pub fn resolve(&self, name: &str, arg_count: usize) -> Result<&FunctionDecl<'a>, FunctionError> {
        let decl = self.get(name).ok_or_else(|| FunctionError::Unknown(name.to_string()))?;
        if decl.params.len() != arg_count {
            return Err(FunctionError::ArityMismatch {
                function: name.to_string(),
                expected: decl.params.len(),
                found: arg_count,
            });
        }
        Ok(decl)
    }

    /// Check every `CALL` in `node`, reachable or not.
    pub fn check_calls(&self, node: &Node) -> Result<(), FunctionError> {
        let mut stack = vec![node];
        while let Some(node) = stack.pop() {
            if node.kind == NodeKind::Call {
                let callee = node.children.first().and_then(Node::name).unwrap_or_default();
                self.resolve(callee, node.children.len().saturating_sub(1))?;
            }
            stack.extend(node.children.iter().rev());
        }
        Ok(())
    }
}

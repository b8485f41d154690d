// Shared data model: tokens produced by the lexer, and the tree built by the
// parser and consumed by the code generator and the evaluator.

pub mod target;
mod functions;
mod shape;
mod token;
mod tree;

pub use functions::{FunctionDecl, FunctionError, FunctionTable};
pub use shape::ShapeError;
pub use target::Platform;
pub use token::{Token, TokenKind};
pub use tree::{Node, NodeKind, NodeValue};

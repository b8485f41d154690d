// Code generation: lowers a PROGRAM tree to a self-contained C99 translation
// unit.
//
// Module organization:
// - runtime.rs: C prelude with the wrapping arithmetic and print helpers
// - names.rs: mangling of source names into the C namespace
// - globals.rs: global variable declarations, prototypes and signatures
// - function.rs: FunctionGenerator and statement emission
// - expressions.rs: three-address lowering of expressions
// - control_flow.rs: if/else and while

mod runtime;
mod names;
mod globals;
mod function;
mod expressions;
mod control_flow;

use model::{FunctionError, FunctionTable, Node, ShapeError};
use tracing::debug;

pub use runtime::{DIVISION_BY_ZERO_STATUS, RUNTIME_PRELUDE};
use function::FunctionGenerator;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenError {
    #[error("malformed tree: {0}")]
    MalformedTree(#[from] ShapeError),
    #[error(transparent)]
    Function(#[from] FunctionError),
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Codegen;

impl Codegen {
    pub fn new() -> Self {
        Self
    }

    /// Generate C source for `program`.
    ///
    /// The tree is validated before anything is emitted, so the result is
    /// either a complete translation unit or an error; never a fragment.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn gen_program(&self, program: &Node) -> Result<String, GenError> {
        program.check_shape()?;
        let functions = FunctionTable::build(program)?;
        functions.check_calls(program)?;
        debug!(functions = functions.len(), "Generating C translation unit");

        let mut sections = vec![RUNTIME_PRELUDE.to_string()];

        let globals = self.emit_globals(program);
        if !globals.is_empty() {
            sections.push(globals);
        }

        if !functions.is_empty() {
            sections.push(self.emit_prototypes(&functions));
        }

        for decl in functions.iter() {
            let body = FunctionGenerator::new(true).gen_body(std::iter::once(decl.body));
            sections.push(format!("{} {{\n{body}}}\n", globals::signature(decl)));
        }

        let main = FunctionGenerator::new(false).gen_body(&program.children);
        sections.push(format!("int main(void) {{\n{main}}}\n"));

        Ok(sections.join("\n"))
    }
}

/// Generate C source for `program` with a default generator.
pub fn generate(program: &Node) -> Result<String, GenError> {
    Codegen::new().gen_program(program)
}

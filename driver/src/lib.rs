// Driver library: the source-to-C pipeline and the external C toolchain that
// compiles and runs its output. The `toyc` binary is a thin CLI over this.

pub mod cli;
pub mod toolchain;

use codegen::GenError;
use lexer::ScanError;
use model::Node;
use parser::ParseError;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("code generation error: {0}")]
    Gen(#[from] GenError),
}

/// Scan and parse `source` into a PROGRAM tree.
pub fn parse_source(source: &str) -> Result<Node, TranslateError> {
    let tokens = lexer::lex(source)?;
    debug!(tokens = tokens.len(), "Scanned source");
    let program = parser::parse_tokens(&tokens)?;
    debug!(statements = program.children.len(), "Parsed program");
    Ok(program)
}

/// Translate `source` into a complete C translation unit.
#[tracing::instrument(level = "trace", skip_all, fields(len = source.len()))]
pub fn translate(source: &str) -> Result<String, TranslateError> {
    let program = parse_source(source)?;
    Ok(codegen::generate(&program)?)
}

mod keywords;
mod literals;
mod state_machine;

use model::Token;
use state_machine::StateMachineLexer;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),
    #[error("integer literal {0} does not fit in 64 bits")]
    NumberOutOfRange(String),
}

/// Main lexer entry point. Returns the complete token sequence or the first
/// scan error; never a partial sequence.
#[tracing::instrument(level = "trace", skip_all, fields(len = input.len()))]
pub fn lex(input: &str) -> Result<Vec<Token>, ScanError> {
    let mut lexer = StateMachineLexer::new(input);
    let tokens = lexer.tokenize()?;
    tracing::trace!(tokens = tokens.len(), "Scanned source");
    Ok(tokens)
}

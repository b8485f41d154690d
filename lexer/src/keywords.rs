use model::{Token, TokenKind};

/// Classify an identifier-shaped lexeme: reserved spellings become their
/// keyword kind (no payload), anything else is an `ID` carrying its text.
pub fn keyword_or_identifier(text: &str) -> Token {
    match TokenKind::keyword(text) {
        Some(kind) => Token::new(kind),
        None => Token::id(text),
    }
}

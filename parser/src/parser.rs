use model::{Node, Token, TokenKind};
use crate::{MAX_NESTING_DEPTH, ParseError};
use crate::statements::StatementParser;

/// Core parser struct that maintains parsing state. The cursor is private to
/// a single `parse_tokens` call.
pub(crate) struct Parser<'a> {
    pub(crate) tokens: &'a [Token],
    pub(crate) pos: usize,
    /// Depth of the tree under construction: enclosing statements and
    /// factors plus pending operator folds.
    pub(crate) depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser { tokens, pos: 0, depth: 0 }
    }

    /// program := statement*
    pub fn parse_program(&mut self) -> Result<Node, ParseError> {
        let mut program = Node::program(Vec::new());
        while !self.is_at_end() {
            let stmt = self.parse_statement()?;
            program.push(stmt);
        }
        Ok(program)
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(crate) fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn peek_kind(&self) -> Option<TokenKind> {
        self.peek_kind_at(0)
    }

    /// Inspect the token `offset` places ahead without consuming anything.
    pub(crate) fn peek_kind_at(&self, offset: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| t.kind)
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume the next token if it is one of `kinds`, returning its kind.
    pub(crate) fn match_any(&mut self, kinds: &[TokenKind]) -> Option<TokenKind> {
        let kind = self.peek_kind().filter(|k| kinds.contains(k))?;
        self.pos += 1;
        Some(kind)
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<&'a Token, ParseError> {
        self.expect_one_of(&[kind])
    }

    pub(crate) fn expect_one_of(&mut self, kinds: &[TokenKind]) -> Result<&'a Token, ParseError> {
        match self.peek() {
            Some(token) if kinds.contains(&token.kind) => {
                self.pos += 1;
                Ok(token)
            }
            _ => Err(self.unexpected(kinds)),
        }
    }

    /// Consume an `ID` and return its name.
    pub(crate) fn expect_name(&mut self) -> Result<String, ParseError> {
        let token = self.expect(TokenKind::Id)?;
        Ok(token.text().unwrap_or_default().to_string())
    }

    pub(crate) fn deepen(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep { limit: MAX_NESTING_DEPTH });
        }
        self.depth += 1;
        Ok(())
    }

    /// Run `rule` one nesting level deeper.
    pub(crate) fn nested<T>(&mut self, rule: impl FnOnce(&mut Self) -> Result<T, ParseError>) -> Result<T, ParseError> {
        self.deepen()?;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    /// Error describing the current token (or the end of input) against the
    /// set of kinds acceptable here.
    pub(crate) fn unexpected(&self, expected: &[TokenKind]) -> ParseError {
        match self.peek() {
            Some(token) => ParseError::UnexpectedToken { found: token.kind, expected: expected.to_vec() },
            None => ParseError::UnexpectedEof { expected: expected.to_vec() },
        }
    }
}

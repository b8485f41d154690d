use model::{Node, TokenKind};
use tracing::trace;
use crate::ParseError;
use crate::parser::Parser;
use crate::expressions::ExpressionParser;

/// Kinds that may begin a statement. `{` is deliberately absent: the grammar
/// has no block statement, so braced bodies are rejected at the brace.
pub(crate) const STATEMENT_START: [TokenKind; 5] = [
    TokenKind::Id,
    TokenKind::If,
    TokenKind::While,
    TokenKind::Print,
    TokenKind::Function,
];

/// Statement parsing functionality
pub(crate) trait StatementParser {
    fn parse_statement(&mut self) -> Result<Node, ParseError>;
}

impl<'a> StatementParser for Parser<'a> {
    /// Bodies of if/while/function recurse through here, so this is where
    /// statement nesting is bounded.
    fn parse_statement(&mut self) -> Result<Node, ParseError> {
        self.nested(Self::parse_statement_inner)
    }
}

impl<'a> Parser<'a> {
    fn parse_statement_inner(&mut self) -> Result<Node, ParseError> {
        trace!(pos = self.pos, next = ?self.peek_kind(), "Parsing statement");

        // Assignment is the only statement not introduced by a keyword; both
        // tokens of its prefix are inspected before anything is consumed.
        match (self.peek_kind_at(0), self.peek_kind_at(1)) {
            (Some(TokenKind::Id), Some(TokenKind::Assign)) => return self.parse_assignment(),
            (Some(TokenKind::Id), Some(found)) => {
                return Err(ParseError::UnexpectedToken { found, expected: vec![TokenKind::Assign] });
            }
            (Some(TokenKind::Id), None) => {
                return Err(ParseError::UnexpectedEof { expected: vec![TokenKind::Assign] });
            }
            _ => {}
        }

        if self.match_token(TokenKind::If) {
            return self.parse_if_stmt();
        }

        if self.match_token(TokenKind::While) {
            return self.parse_while_stmt();
        }

        if self.match_token(TokenKind::Print) {
            return self.parse_print_stmt();
        }

        if self.match_token(TokenKind::Function) {
            return self.parse_function_decl();
        }

        Err(self.unexpected(&STATEMENT_START))
    }

    fn parse_assignment(&mut self) -> Result<Node, ParseError> {
        let target = self.expect_name()?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semi)?;
        Ok(Node::assign(target, value))
    }

    fn parse_if_stmt(&mut self) -> Result<Node, ParseError> {
        let cond = self.parse_parenthesized_condition()?;
        let then_branch = self.parse_statement()?;
        let else_branch = if self.match_token(TokenKind::Else) {
            Some(self.parse_statement()?)
        } else {
            None
        };
        Ok(Node::if_(cond, then_branch, else_branch))
    }

    fn parse_while_stmt(&mut self) -> Result<Node, ParseError> {
        let cond = self.parse_parenthesized_condition()?;
        let body = self.parse_statement()?;
        Ok(Node::while_(cond, body))
    }

    fn parse_print_stmt(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::LParen)?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Semi)?;
        Ok(Node::print(value))
    }

    /// 'function' ID '(' (ID (',' ID)*)? ')' statement
    fn parse_function_decl(&mut self) -> Result<Node, ParseError> {
        let name = self.expect_name()?;
        trace!(%name, "Parsing function declaration");
        let params = self.parse_parameters()?;
        let body = self.parse_statement()?;
        Ok(Node::function(name, params, body))
    }

    fn parse_parameters(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if self.match_token(TokenKind::RParen) {
            return Ok(params);
        }
        if !self.check(TokenKind::Id) {
            return Err(self.unexpected(&[TokenKind::Id, TokenKind::RParen]));
        }
        loop {
            params.push(self.expect_name()?);
            let separator = self.expect_one_of(&[TokenKind::Comma, TokenKind::RParen])?;
            if separator.kind == TokenKind::RParen {
                return Ok(params);
            }
        }
    }

    fn parse_parenthesized_condition(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_condition()?;
        self.expect(TokenKind::RParen)?;
        Ok(cond)
    }
}

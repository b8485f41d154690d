use model::{Node, TokenKind};
use crate::ParseError;
use crate::parser::Parser;

const RELATIONAL: [TokenKind; 6] = [
    TokenKind::Eq,
    TokenKind::Ne,
    TokenKind::Lt,
    TokenKind::Le,
    TokenKind::Gt,
    TokenKind::Ge,
];

/// Expression parsing functionality. Each precedence level is an iterative
/// left fold, so `1 - 2 - 3` nests to the left.
pub(crate) trait ExpressionParser {
    /// expr := term (('+' | '-') term)*
    fn parse_expr(&mut self) -> Result<Node, ParseError>;
    /// condition := expr (relop expr)?
    fn parse_condition(&mut self) -> Result<Node, ParseError>;
}

impl<'a> ExpressionParser for Parser<'a> {
    fn parse_expr(&mut self) -> Result<Node, ParseError> {
        let depth = self.depth;
        let mut node = self.parse_term()?;
        while let Some(op) = self.match_any(&[TokenKind::Plus, TokenKind::Minus]) {
            // Each fold wraps the tree built so far one level deeper.
            self.deepen()?;
            let right = self.parse_term()?;
            node = Node::bin_op(op, node, right);
        }
        self.depth = depth;
        Ok(node)
    }

    fn parse_condition(&mut self) -> Result<Node, ParseError> {
        let left = self.parse_expr()?;
        match self.match_any(&RELATIONAL) {
            Some(op) => {
                let right = self.parse_expr()?;
                Ok(Node::bin_op(op, left, right))
            }
            None => Ok(left),
        }
    }
}

impl<'a> Parser<'a> {
    // term := factor (('*' | '/') factor)*
    fn parse_term(&mut self) -> Result<Node, ParseError> {
        let depth = self.depth;
        let mut node = self.parse_factor()?;
        while let Some(op) = self.match_any(&[TokenKind::Mult, TokenKind::Div]) {
            self.deepen()?;
            let right = self.parse_factor()?;
            node = Node::bin_op(op, node, right);
        }
        self.depth = depth;
        Ok(node)
    }

    fn parse_factor(&mut self) -> Result<Node, ParseError> {
        self.nested(Self::parse_factor_inner)
    }

    // factor := NUM | ID ('(' args? ')')? | '(' expr ')'
    fn parse_factor_inner(&mut self) -> Result<Node, ParseError> {
        let token = self.expect_one_of(&[TokenKind::Num, TokenKind::Id, TokenKind::LParen])?;
        let text = token.text().unwrap_or_default();
        match token.kind {
            TokenKind::Num => Ok(Node::num(text)),
            // A following '(' is the only thing separating a call from a variable.
            TokenKind::Id if self.match_token(TokenKind::LParen) => {
                let args = self.parse_arguments()?;
                Ok(Node::call(text, args))
            }
            TokenKind::Id => Ok(Node::id(text)),
            _ => {
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
        }
    }

    /// Arguments after the opening '(' up to and including the closing ')'.
    fn parse_arguments(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut args = Vec::new();
        if self.match_token(TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            let separator = self.expect_one_of(&[TokenKind::Comma, TokenKind::RParen])?;
            if separator.kind == TokenKind::RParen {
                return Ok(args);
            }
        }
    }
}
